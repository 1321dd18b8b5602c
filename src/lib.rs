//! # schedule2html
//!
//! Convert free-form Russian liturgical schedule text into the HTML grid of
//! a parish web page.
//!
//! ## Why this crate?
//!
//! The schedule arrives as noisy text — document extraction or OCR output
//! with boilerplate titles, dash-written time ranges, stray blank lines and
//! inconsistent spacing. This crate normalizes that text with a fixed rule
//! set, classifies each line as a date heading or service entry against a
//! closed Russian month/weekday vocabulary, lays the result out as rows of
//! schedule cards matching the page's Bootstrap grid, and splices the
//! fragment into the page between fixed markers — with a backup taken
//! before every write and an automatic restore if the write fails.
//!
//! ## Pipeline Overview
//!
//! ```text
//! raw text
//!  │
//!  ├─ 1. Normalize  strip boilerplate, canonicalise HH:MM tokens, collapse whitespace
//!  ├─ 2. Classify   tag date headings (<h3>) and service lines (<br />)
//!  ├─ 3. Layout     pair headings with content, group cards into rows of 4
//!  └─ 4. Patch      splice between the page markers, backup-guarded
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use schedule2html::{publish, PublishConfig};
//! use std::path::Path;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let raw = std::fs::read_to_string("schedule.txt")?;
//!     let config = PublishConfig::default();
//!     let output = publish(&raw, Path::new("site/index.html"), &config)?;
//!     eprintln!(
//!         "{} entries in {} row(s), backup at {}",
//!         output.schedule.stats.entry_count,
//!         output.schedule.stats.row_count,
//!         output.patch.backup.display()
//!     );
//!     Ok(())
//! }
//! ```
//!
//! To render the fragment without touching any file, use
//! [`render_schedule`]; to see the tagged intermediate the layout is built
//! from, use [`process_text`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `schedule2html` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only
//! deps:
//! ```toml
//! schedule2html = { version = "0.3", default-features = false }
//! ```
//!
//! ## Concurrency
//!
//! The pipeline is single-threaded and synchronous. Patching is not
//! internally coordinated: callers run at most one patch per target file at
//! a time. Backup names have whole-second resolution, so two patches of the
//! same target within one second share a backup name — accepted, not
//! locked against.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{PublishConfig, PublishConfigBuilder, SCHEDULE_MARKER};
pub use convert::{process_text, publish, publish_from_file, read_input, render_schedule};
pub use error::ScheduleError;
pub use output::{PatchOutcome, PublishOutput, ScheduleOutput, ScheduleStats};
