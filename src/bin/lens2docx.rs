//! CLI binary for lens2docx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `RunConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use lens2docx::{
    execute, ChromeLauncher, DialogFolderPicker, ImageOutcome, Lens2DocxError, ProgressCallback,
    RunConfig, RunProgressCallback,
};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per image.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the image currently in flight.
    image_start: Mutex<Option<Instant>>,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    /// Hidden until `on_run_start`, so nothing is drawn while the folder
    /// dialog is open or when the run never starts.
    fn new_dynamic() -> Arc<Self> {
        Arc::new(Self {
            bar: ProgressBar::hidden(),
            image_start: Mutex::new(None),
            errors: AtomicUsize::new(0),
        })
    }

    /// Remove the bar from the terminal when the run ends early.
    fn abandon(&self) {
        self.bar.finish_and_clear();
    }

    fn activate_bar(&self, total: usize) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} images  \
             ⏱ {elapsed_precise}  {msg}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Scanning");
        self.bar.reset_eta();
        self.bar.set_draw_target(ProgressDrawTarget::stderr());
        self.bar.enable_steady_tick(Duration::from_millis(80));
    }

    fn elapsed_secs(&self) -> f64 {
        self.image_start
            .lock()
            .ok()
            .and_then(|mut s| s.take())
            .map(|t| t.elapsed().as_secs_f64())
            .unwrap_or(0.0)
    }
}

impl RunProgressCallback for CliProgressCallback {
    fn on_run_start(&self, total_images: usize) {
        self.activate_bar(total_images);
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("Processing {total_images} images…"))
        ));
    }

    fn on_image_start(&self, _index: usize, _total: usize, file_name: &str) {
        if let Ok(mut start) = self.image_start.lock() {
            *start = Some(Instant::now());
        }
        self.bar.set_message(file_name.to_string());
    }

    fn on_image_complete(&self, index: usize, total: usize, outcome: &ImageOutcome) {
        let secs = self.elapsed_secs();
        let written = outcome
            .docx_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {:<16}  {}  {}",
            green("✓"),
            index,
            total,
            outcome.file_name,
            dim(&written),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_image_error(&self, index: usize, total: usize, file_name: &str, error: &str) {
        let secs = self.elapsed_secs();
        self.errors.fetch_add(1, Ordering::SeqCst);

        let msg = if error.chars().count() > 80 {
            let cut: String = error.chars().take(79).collect();
            format!("{cut}\u{2026}")
        } else {
            error.to_string()
        };

        self.bar.println(format!(
            "  {} Image {:>3}/{:<3}  {:<16}  {}  {}",
            red("✗"),
            index,
            total,
            file_name,
            red(&msg),
            dim(&format!("{secs:.1}s")),
        ));
        self.bar.inc(1);
    }

    fn on_run_complete(&self, total_images: usize, success_count: usize) {
        let failed = total_images.saturating_sub(success_count);
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} documents written",
                green("✔"),
                bold(&success_count.to_string())
            );
        } else {
            eprintln!(
                "{} {}/{} documents written  ({} failed)",
                if failed == total_images {
                    red("✘")
                } else {
                    cyan("⚠")
                },
                bold(&success_count.to_string()),
                total_images,
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Default run: pick a folder, process image1.jpg … image3.jpg
  lens2docx

  # Skip the folder dialog
  lens2docx --output-dir ./scans

  # Other images on another host
  lens2docx --base-url https://example.com/pages --image p1.png --image p2.png

  # Headless Chrome, slower network
  lens2docx --headless --region-timeout 40 --settle-delay-ms 4000

  # Machine-readable report
  lens2docx --output-dir ./out --json > report.json

OUTPUT:
  For every image <stem>.<ext> the output folder receives
    <stem>.html   the recognised-text region as a standalone page
    <stem>.docx   the same text as a Word document

EXIT STATUS:
  0  the run completed (individual images may still have failed)
  1  no folder was selected, or Chrome could not be launched

ENVIRONMENT VARIABLES:
  Every flag can be set as LENS2DOCX_<FLAG>, e.g. LENS2DOCX_OUTPUT_DIR.
  RUST_LOG overrides the log filter.
"#;

/// Scrape Google Lens text recognition into Word documents.
#[derive(Parser, Debug)]
#[command(
    name = "lens2docx",
    version,
    about = "Run web-hosted images through Google Lens and save the recognised text as .docx",
    long_about = "Submits each image URL to Google Lens in a Chrome window, waits for the \
text-recognition result, saves it as a standalone HTML page and converts that page to a \
Word document.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Output folder. When absent a folder dialog is shown.
    #[arg(short, long, env = "LENS2DOCX_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Base URL the image file names are appended to.
    #[arg(long, env = "LENS2DOCX_BASE_URL", default_value = lens2docx::config::DEFAULT_BASE_URL)]
    base_url: String,

    /// Image file name; repeat for several. Defaults to image1.jpg, image2.jpg, image3.jpg.
    #[arg(long = "image", env = "LENS2DOCX_IMAGES", value_delimiter = ',')]
    images: Vec<String>,

    /// Search page that hosts the Lens upload panel.
    #[arg(long, env = "LENS2DOCX_SEARCH_URL", default_value = lens2docx::config::DEFAULT_SEARCH_URL)]
    search_url: String,

    /// Seconds to wait for the URL input.
    #[arg(long, env = "LENS2DOCX_SUBMIT_TIMEOUT", default_value_t = 15)]
    submit_timeout: u64,

    /// Seconds to wait for the result region (each of its two waits).
    #[arg(long, env = "LENS2DOCX_REGION_TIMEOUT", default_value_t = 20)]
    region_timeout: u64,

    /// Pause after loading the search page, in milliseconds.
    #[arg(long, env = "LENS2DOCX_SETTLE_DELAY_MS", default_value_t = 2000)]
    settle_delay_ms: u64,

    /// Run Chrome without a window.
    #[arg(long, env = "LENS2DOCX_HEADLESS")]
    headless: bool,

    /// Still try to extract results when submitting the URL failed.
    #[arg(long, env = "LENS2DOCX_EXTRACT_AFTER_FAILED_SUBMIT")]
    extract_after_failed_submit: bool,

    /// Print the run report as JSON on stdout.
    #[arg(long, env = "LENS2DOCX_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "LENS2DOCX_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "LENS2DOCX_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "LENS2DOCX_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs; --verbose always wins.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let cli_progress = show_progress.then(CliProgressCallback::new_dynamic);
    let progress_cb: Option<ProgressCallback> = cli_progress
        .clone()
        .map(|cb| cb as Arc<dyn RunProgressCallback>);
    let config = build_config(&cli, progress_cb)?;

    // ── Run ──────────────────────────────────────────────────────────────
    let result = execute(&DialogFolderPicker, &ChromeLauncher, &config).await;
    if result.is_err() {
        if let Some(ref cb) = cli_progress {
            cb.abandon();
        }
    }
    let report = match result {
        Ok(report) => report,
        Err(Lens2DocxError::NoFolderSelected) => {
            println!("{}", Lens2DocxError::NoFolderSelected);
            std::process::exit(1);
        }
        Err(e @ Lens2DocxError::BrowserLaunch { .. }) => {
            eprintln!("{} {}", red("✘"), e);
            std::process::exit(1);
        }
        Err(e) => return Err(e).context("Run failed"),
    };

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet && !show_progress {
        // The callback already printed per-image lines when the bar was on.
        for outcome in &report.outcomes {
            match outcome.first_error() {
                None if outcome.is_success() => eprintln!("  {} {}", green("✓"), outcome.file_name),
                Some(e) => eprintln!("  {} {}  {}", red("✗"), outcome.file_name, e),
                None => eprintln!("  {} {}", red("✗"), outcome.file_name),
            }
        }
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {}/{} documents  {}ms  →  {}",
            if report.stats.failed == 0 {
                green("✔")
            } else {
                cyan("⚠")
            },
            report.stats.succeeded,
            report.stats.total_images,
            report.stats.total_duration_ms,
            bold(&report.output_dir.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `RunConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<RunConfig> {
    let mut builder = RunConfig::builder()
        .base_url(cli.base_url.clone())
        .search_url(cli.search_url.clone())
        .submit_timeout(Duration::from_secs(cli.submit_timeout))
        .region_timeout(Duration::from_secs(cli.region_timeout))
        .settle_delay(Duration::from_millis(cli.settle_delay_ms))
        .headless(cli.headless)
        .extract_after_failed_submit(cli.extract_after_failed_submit);

    if !cli.images.is_empty() {
        builder = builder.images(cli.images.iter().cloned());
    }
    if let Some(ref dir) = cli.output_dir {
        builder = builder.output_dir(dir.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bar_stays_hidden_until_the_run_starts() {
        let cb = CliProgressCallback::new_dynamic();
        assert!(cb.bar.is_hidden());
        cb.abandon();
        assert!(cb.bar.is_finished());
    }

    #[test]
    fn bar_tracks_images() {
        let cb = CliProgressCallback::new_dynamic();
        cb.on_run_start(2);
        assert_eq!(cb.bar.length(), Some(2));
        cb.on_image_start(1, 2, "a.jpg");
        cb.on_image_error(1, 2, "a.jpg", "timed out");
        assert_eq!(cb.bar.position(), 1);
        assert_eq!(cb.errors.load(Ordering::SeqCst), 1);
        cb.on_run_complete(2, 0);
        assert!(cb.bar.is_finished());
    }
}
