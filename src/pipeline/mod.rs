//! Per-image pipeline stages.
//!
//! Each submodule implements one step; the browser is only touched through
//! [`crate::session::BrowserSession`], so every stage can be exercised
//! against a scripted session.
//!
//! ## Data Flow
//!
//! ```text
//! submit ──▶ extract ──────────────────────────────▶ docx
//! (type URL)  (wait, snapshot, sanitize, document)    (HTML → .docx)
//!               │                                      │
//!               └──────── write (atomic) ◀─────────────┘
//! ```
//!
//! 1. [`submit`]: wait for the Lens URL input, type the image URL, press Enter
//! 2. [`extract`]: wait until the result container holds enough text items,
//!    snapshot it and assemble a standalone HTML file
//! 3. [`sanitize`] / [`document`]: pure string assembly used by `extract`
//! 4. [`docx`]: parse the saved HTML and package it as WordprocessingML;
//!    runs in `spawn_blocking` because parsing and zipping are CPU-bound
//!
//! [`wait`] and [`write`] are the shared bounded-polling and temp-file-plus-
//! rename helpers.

pub mod document;
pub mod docx;
pub mod extract;
pub mod sanitize;
pub mod submit;
pub mod wait;
pub mod write;
