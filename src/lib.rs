//! # lens2docx
//!
//! Turn images hosted on the web into Word documents of the text Google
//! Lens recognises in them.
//!
//! ## Why this crate?
//!
//! Lens reads text out of photos and scans well, but it only shows the
//! result as positioned boxes on a web page. This crate drives a real Chrome
//! tab through the upload-by-URL flow, keeps only the recognised-text boxes,
//! saves them as a standalone HTML page that renders the same way offline,
//! and converts that page to `.docx`.
//!
//! ## Pipeline Overview
//!
//! ```text
//! image URL
//!  │
//!  ├─ 1. Folder   pick (or configure) the output folder
//!  ├─ 2. Submit   type the URL into the Lens input, press Enter
//!  ├─ 3. Extract  wait for the result region, snapshot, label, <stem>.html
//!  ├─ 4. Convert  HTML → paragraphs → <stem>.docx (spawn_blocking)
//!  └─ 5. Report   one ImageOutcome per image + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lens2docx::{execute, ChromeLauncher, DialogFolderPicker, RunConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfig::builder()
//!         .base_url("https://example.com/scans")
//!         .images(["page1.jpg", "page2.jpg"])
//!         .build()?;
//!     let report = execute(&DialogFolderPicker, &ChromeLauncher, &config).await?;
//!     eprintln!("{}/{} documents written to {}",
//!         report.stats.succeeded,
//!         report.stats.total_images,
//!         report.output_dir.display());
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `lens2docx` binary (clap + anyhow + indicatif + tracing-subscriber) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! lens2docx = { version = "0.1", default-features = false }
//! ```
//!
//! ## Testing without a browser
//!
//! Every step talks to the page through [`BrowserSession`]. Implement it
//! (and [`SessionLauncher`], [`FolderPicker`]) with in-memory fakes to run
//! the full pipeline in tests.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod browser;
pub mod config;
pub mod dialog;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod run;
pub mod scripts;
pub mod session;
pub mod stream;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use browser::{ChromeLauncher, ChromeSession};
pub use config::{image_url, ImageRef, RegionLocator, RunConfig, RunConfigBuilder};
pub use dialog::{DialogFolderPicker, FixedFolderPicker, FolderPicker};
pub use error::{Lens2DocxError, SessionError, Stage, StepError};
pub use output::{ImageOutcome, RunReport, RunStats};
pub use pipeline::docx::convert_html_to_docx;
pub use progress::{NoopProgressCallback, ProgressCallback, RunProgressCallback};
pub use run::{execute, execute_sync, process_image, run};
pub use session::{BrowserSession, RegionItem, RegionSnapshot, SessionLauncher};
pub use stream::{process_stream, ImageStream};
