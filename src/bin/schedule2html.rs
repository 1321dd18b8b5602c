//! CLI binary for schedule2html.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `PublishConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use schedule2html::{publish, render_schedule, PublishConfig, ScheduleStats, SCHEDULE_MARKER};
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Render the fragment to stdout
  schedule2html schedule.txt

  # Render to a file
  schedule2html schedule.txt -o fragment.html

  # Patch the page in place (backup taken first)
  schedule2html schedule.txt --target site/index.html

  # Pipe OCR output straight through
  tesseract scan.png - -l rus | schedule2html - --target site/index.html

  # Keep the tagged intermediate for inspection
  schedule2html schedule.txt --tagged-out result.txt

  # Machine-readable run stats
  schedule2html schedule.txt --target site/index.html --json

THE TARGET PAGE:
  The page must contain the marker line exactly twice; the region between
  and including both occurrences is owned by this tool:

    <!------------------------------ Insert Schedule ------------------------------>

  Before every write a backup is stored in a sibling backups/ directory
  (10 retained). A failed write restores the page from that backup.
"#;

/// Convert Russian liturgical schedule text into a parish page's HTML grid.
#[derive(Parser, Debug)]
#[command(
    name = "schedule2html",
    version,
    about = "Convert schedule text into the parish page's HTML grid",
    long_about = "Normalize noisy schedule text (document extraction or OCR output), \
tag date headings and service lines, lay them out as rows of schedule cards, and \
either print the fragment or splice it into the target page between fixed markers.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input text file, or '-' for stdin.
    input: String,

    /// Write the fragment to this file instead of stdout.
    #[arg(short, long, env = "SCHEDULE2HTML_OUTPUT")]
    output: Option<PathBuf>,

    /// Patch this page in place instead of emitting the fragment.
    #[arg(long, env = "SCHEDULE2HTML_TARGET")]
    target: Option<PathBuf>,

    /// Also write the tagged intermediate (<h3>/<br /> stream) to this file.
    #[arg(long)]
    tagged_out: Option<PathBuf>,

    /// Region delimiter literal the target page carries exactly twice.
    #[arg(long, env = "SCHEDULE2HTML_MARKER", default_value = SCHEDULE_MARKER, hide_default_value = true)]
    marker: String,

    /// Cards per row in the generated grid.
    #[arg(long, env = "SCHEDULE2HTML_ROW_SIZE", default_value_t = 4)]
    row_size: usize,

    /// Backups retained per target.
    #[arg(long, env = "SCHEDULE2HTML_BACKUP_CAP", default_value_t = 10)]
    backup_cap: usize,

    /// Backup directory name, created alongside the target.
    #[arg(long, env = "SCHEDULE2HTML_BACKUP_DIR", default_value = "backups")]
    backup_dir: String,

    /// Output structured JSON (run stats and paths) instead of the summary.
    #[arg(long, env = "SCHEDULE2HTML_JSON")]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "SCHEDULE2HTML_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "SCHEDULE2HTML_QUIET")]
    quiet: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Keep stdout clean for the fragment; all logs go to stderr.
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Read input ───────────────────────────────────────────────────────
    let raw = if cli.input == "-" {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read schedule text from stdin")?;
        buf
    } else {
        schedule2html::read_input(&PathBuf::from(&cli.input))
            .with_context(|| format!("Failed to read input '{}'", cli.input))?
    };

    // ── Build config ─────────────────────────────────────────────────────
    let config = PublishConfig::builder()
        .row_capacity(cli.row_size)
        .backup_cap(cli.backup_cap)
        .backup_dir(&cli.backup_dir)
        .marker(&cli.marker)
        .build()
        .context("Invalid configuration")?;

    // ── Run ──────────────────────────────────────────────────────────────
    if let Some(ref target) = cli.target {
        let output = publish(&raw, target, &config)
            .with_context(|| format!("Failed to update '{}'", target.display()))?;

        write_tagged(&cli, &output.schedule.tagged)?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else if !cli.quiet {
            print_stats(&output.schedule.stats);
            if output.patch.changed {
                eprintln!(
                    "{} {} updated  {}",
                    green("✔"),
                    bold(&target.display().to_string()),
                    dim(&format!("backup: {}", output.patch.backup.display()))
                );
            } else {
                eprintln!(
                    "{} {} already up to date",
                    green("✔"),
                    bold(&target.display().to_string())
                );
            }
        }
    } else {
        let output = render_schedule(&raw, &config).context("Failed to render schedule")?;

        write_tagged(&cli, &output.tagged)?;

        if cli.json {
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            match cli.output {
                Some(ref path) => {
                    std::fs::write(path, &output.fragment).with_context(|| {
                        format!("Failed to write fragment to '{}'", path.display())
                    })?;
                    if !cli.quiet {
                        print_stats(&output.stats);
                        eprintln!(
                            "{} fragment written to {}",
                            green("✔"),
                            bold(&path.display().to_string())
                        );
                    }
                }
                None => {
                    let mut stdout = io::stdout().lock();
                    stdout.write_all(output.fragment.as_bytes())?;
                    stdout.write_all(b"\n")?;
                }
            }
        }
    }

    Ok(())
}

fn write_tagged(cli: &Cli, tagged: &str) -> Result<()> {
    if let Some(ref path) = cli.tagged_out {
        std::fs::write(path, tagged)
            .with_context(|| format!("Failed to write tagged text to '{}'", path.display()))?;
        if !cli.quiet {
            eprintln!("{} tagged intermediate saved to {}", green("✔"), path.display());
        }
    }
    Ok(())
}

fn print_stats(stats: &ScheduleStats) {
    eprintln!(
        "  {} {} entr{} in {} row(s){}  {}",
        green("✓"),
        bold(&stats.entry_count.to_string()),
        if stats.entry_count == 1 { "y" } else { "ies" },
        stats.row_count,
        if stats.dropped_headings > 0 {
            format!(", {} heading(s) dropped", stats.dropped_headings)
        } else {
            String::new()
        },
        dim(&format!("{}ms", stats.duration_ms)),
    );
}
