//! HTML → DOCX conversion.
//!
//! Two passes so the structural mapping can be tested without unzipping
//! documents:
//!
//! 1. [`parse_html`] walks the DOM (via `scraper`) into a flat list of
//!    [`Block`]s, each a paragraph of styled [`Inline`] runs.
//! 2. [`render_docx`] turns the blocks into a WordprocessingML package
//!    (via `docx-rs`).
//!
//! Only text structure survives: block elements become paragraphs,
//! headings get a larger bold face, list items a bullet, `b`/`i`/`u` their
//! run formatting. Layout, images and CSS positioning are dropped. A
//! right-to-left page produces right-aligned paragraphs.

use crate::error::StepError;
use crate::pipeline::document::TextDirection;
use crate::pipeline::write::write_atomic;
use docx_rs::{AlignmentType, BreakType, Docx, Paragraph, Run};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Node};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

// ── Model ────────────────────────────────────────────────────────────────

/// Character formatting of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl RunStyle {
    fn with_tag(mut self, tag: &str) -> Self {
        match tag {
            "b" | "strong" => self.bold = true,
            "i" | "em" | "cite" => self.italic = true,
            "u" | "ins" => self.underline = true,
            _ => {}
        }
        self
    }
}

/// A piece of paragraph content.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text { text: String, style: RunStyle },
    Break,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Paragraph,
    /// `h1`–`h6`
    Heading(u8),
    ListItem,
}

/// One output paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub kind: BlockKind,
    pub inlines: Vec<Inline>,
}

impl Block {
    fn new(kind: BlockKind) -> Self {
        Self {
            kind,
            inlines: Vec::new(),
        }
    }

    /// Plain text of the block, breaks as `\n`.
    pub fn text(&self) -> String {
        self.inlines
            .iter()
            .map(|i| match i {
                Inline::Text { text, .. } => text.as_str(),
                Inline::Break => "\n",
            })
            .collect()
    }

    /// Trim edges; `None` when nothing visible remains.
    fn finish(mut self) -> Option<Self> {
        while matches!(self.inlines.last(), Some(Inline::Break)) {
            self.inlines.pop();
        }
        if let Some(Inline::Text { text, .. }) = self.inlines.last_mut() {
            let trimmed = text.trim_end().len();
            text.truncate(trimmed);
        }
        self.inlines
            .retain(|i| !matches!(i, Inline::Text { text, .. } if text.is_empty()));
        let visible = self
            .inlines
            .iter()
            .any(|i| matches!(i, Inline::Text { text, .. } if !text.trim().is_empty()));
        visible.then_some(self)
    }
}

/// Parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentModel {
    pub direction: TextDirection,
    pub blocks: Vec<Block>,
}

// ── Pass 1: HTML → blocks ────────────────────────────────────────────────

static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

static RE_RTL_STYLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)direction\s*:\s*rtl").unwrap());

/// Elements whose content never reaches the document.
const SKIPPED: &[&str] = &[
    "head", "script", "style", "noscript", "template", "svg", "title", "meta", "link",
];

fn block_kind(tag: &str) -> Option<BlockKind> {
    match tag {
        "h1" => Some(BlockKind::Heading(1)),
        "h2" => Some(BlockKind::Heading(2)),
        "h3" => Some(BlockKind::Heading(3)),
        "h4" => Some(BlockKind::Heading(4)),
        "h5" => Some(BlockKind::Heading(5)),
        "h6" => Some(BlockKind::Heading(6)),
        "li" => Some(BlockKind::ListItem),
        "p" | "div" | "section" | "article" | "header" | "footer" | "blockquote" | "pre"
        | "tr" | "table" | "ul" | "ol" | "body" | "main" | "nav" | "aside" | "figure"
        | "figcaption" | "dl" | "dt" | "dd" | "address" => Some(BlockKind::Paragraph),
        _ => None,
    }
}

struct Collector {
    blocks: Vec<Block>,
    current: Block,
}

impl Collector {
    fn flush(&mut self) {
        let block = std::mem::replace(&mut self.current, Block::new(BlockKind::Paragraph));
        if let Some(block) = block.finish() {
            self.blocks.push(block);
        }
    }

    fn start_block(&mut self, kind: BlockKind) {
        self.flush();
        self.current.kind = kind;
    }

    fn push_text(&mut self, raw: &str, style: RunStyle) {
        let cleaned: String;
        let raw = if raw.chars().all(is_xml_char) {
            raw
        } else {
            cleaned = raw.chars().filter(|c| is_xml_char(*c)).collect();
            cleaned.as_str()
        };
        let collapsed = RE_WHITESPACE.replace_all(raw, " ");
        let at_line_start = match self.current.inlines.last() {
            None | Some(Inline::Break) => true,
            Some(Inline::Text { text, .. }) => text.ends_with(' '),
        };
        let text = if at_line_start {
            collapsed.trim_start()
        } else {
            collapsed.as_ref()
        };
        if text.is_empty() {
            return;
        }
        if let Some(Inline::Text { text: prev, style: prev_style }) = self.current.inlines.last_mut()
        {
            if *prev_style == style {
                prev.push_str(text);
                return;
            }
        }
        self.current.inlines.push(Inline::Text {
            text: text.to_string(),
            style,
        });
    }

    fn push_break(&mut self) {
        if let Some(Inline::Text { text, .. }) = self.current.inlines.last_mut() {
            let trimmed = text.trim_end().len();
            text.truncate(trimmed);
        }
        self.current.inlines.push(Inline::Break);
    }

    /// Depth-first walk over `root` with an explicit stack, so arbitrarily
    /// deep markup cannot exhaust the thread stack.
    fn walk(&mut self, root: ElementRef<'_>) {
        let mut stack = vec![Visit::Enter(root, RunStyle::default())];

        while let Some(visit) = stack.pop() {
            let (element, style) = match visit {
                Visit::Text(text, style) => {
                    self.push_text(text, style);
                    continue;
                }
                Visit::EndBlock => {
                    self.flush();
                    continue;
                }
                Visit::Enter(element, style) => (element, style),
            };

            let tag = element.value().name();
            if SKIPPED.contains(&tag) {
                continue;
            }
            if tag == "br" {
                self.push_break();
                continue;
            }

            let style = style.with_tag(tag);
            if let Some(kind) = block_kind(tag) {
                self.start_block(kind);
                stack.push(Visit::EndBlock);
            }

            // Reversed so the first child is popped first.
            for child in element.children().rev() {
                match child.value() {
                    Node::Text(text) => stack.push(Visit::Text(&**text, style)),
                    Node::Element(_) => {
                        if let Some(child) = ElementRef::wrap(child) {
                            stack.push(Visit::Enter(child, style));
                        }
                    }
                    _ => {}
                }
            }
        }
    }
}

enum Visit<'a> {
    Enter(ElementRef<'a>, RunStyle),
    Text(&'a str, RunStyle),
    EndBlock,
}

/// Characters allowed in XML 1.0 text.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{d7ff}' | '\u{e000}'..='\u{fffd}')
        || c >= '\u{10000}'
}

fn detect_direction(document: &Html) -> TextDirection {
    let root = document.root_element();
    let mut candidates = vec![root];
    candidates.extend(
        root.children()
            .filter_map(ElementRef::wrap)
            .filter(|e| e.value().name() == "body"),
    );
    let rtl = candidates.iter().any(|e| {
        e.value()
            .attr("dir")
            .is_some_and(|d| d.trim().eq_ignore_ascii_case("rtl"))
            || e.value()
                .attr("style")
                .is_some_and(|s| RE_RTL_STYLE.is_match(s))
    });
    if rtl {
        TextDirection::Rtl
    } else {
        TextDirection::Ltr
    }
}

/// Parse `html` into paragraphs. Never fails: malformed markup is repaired
/// by the HTML5 parser and empty input gives an empty model.
pub fn parse_html(html: &str) -> DocumentModel {
    let document = Html::parse_document(html);
    let direction = detect_direction(&document);

    let mut collector = Collector {
        blocks: Vec::new(),
        current: Block::new(BlockKind::Paragraph),
    };
    collector.walk(document.root_element());
    collector.flush();

    DocumentModel {
        direction,
        blocks: collector.blocks,
    }
}

// ── Pass 2: blocks → DOCX ────────────────────────────────────────────────

/// Font size in half-points for a heading level.
fn heading_size(level: u8) -> usize {
    match level {
        1 => 48,
        2 => 40,
        3 => 32,
        4 => 28,
        5 => 26,
        _ => 24,
    }
}

fn render_paragraph(block: &Block, direction: TextDirection) -> Paragraph {
    let mut paragraph = Paragraph::new();
    if direction == TextDirection::Rtl {
        paragraph = paragraph.align(AlignmentType::Right);
    }
    if block.kind == BlockKind::ListItem {
        paragraph = paragraph.add_run(Run::new().add_text("\u{2022} "));
    }

    for inline in &block.inlines {
        let run = match inline {
            Inline::Break => Run::new().add_break(BreakType::TextWrapping),
            Inline::Text { text, style } => {
                let mut run = Run::new().add_text(text.as_str());
                if style.bold || matches!(block.kind, BlockKind::Heading(_)) {
                    run = run.bold();
                }
                if style.italic {
                    run = run.italic();
                }
                if style.underline {
                    run = run.underline("single");
                }
                if let BlockKind::Heading(level) = block.kind {
                    run = run.size(heading_size(level));
                }
                run
            }
        };
        paragraph = paragraph.add_run(run);
    }
    paragraph
}

/// Package `model` as `.docx` bytes.
pub fn render_docx(model: &DocumentModel) -> Result<Vec<u8>, StepError> {
    let mut docx = Docx::new();
    if model.blocks.is_empty() {
        docx = docx.add_paragraph(Paragraph::new());
    }
    for block in &model.blocks {
        docx = docx.add_paragraph(render_paragraph(block, model.direction));
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| StepError::Conversion {
            detail: e.to_string(),
        })?;
    Ok(buf.into_inner())
}

/// HTML text straight to `.docx` bytes.
pub fn html_to_docx(html: &str) -> Result<Vec<u8>, StepError> {
    let model = parse_html(html);
    debug!(
        "Parsed {} paragraphs ({:?})",
        model.blocks.len(),
        model.direction
    );
    render_docx(&model)
}

/// Read `input_html`, convert it, write `output_docx`.
///
/// A missing input (extraction never wrote it) is reported as
/// [`StepError::MissingInput`]; nothing is written in that case.
pub async fn convert_html_to_docx(
    input_html: &Path,
    output_docx: &Path,
) -> Result<PathBuf, StepError> {
    let bytes = match tokio::fs::read(input_html).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(StepError::MissingInput {
                path: input_html.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(StepError::Conversion {
                detail: format!("reading {}: {}", input_html.display(), e),
            });
        }
    };
    let html = String::from_utf8_lossy(&bytes).into_owned();

    let docx = tokio::task::spawn_blocking(move || html_to_docx(&html))
        .await
        .map_err(|e| StepError::Conversion {
            detail: format!("conversion task panicked: {e}"),
        })??;

    write_atomic(output_docx, &docx).await?;
    info!("DOCX file saved to {}", output_docx.display());
    Ok(output_docx.to_path_buf())
}
