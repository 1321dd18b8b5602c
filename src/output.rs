//! Output types for schedule rendering and publishing.
//!
//! These are plain value types returned by the [`crate::convert`] entry
//! points and serialised verbatim by the CLI's `--json` mode.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Statistics for one render run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleStats {
    /// Date headings recognised by the classifier.
    pub heading_count: usize,
    /// Heading/content pairs that produced a card.
    pub entry_count: usize,
    /// Rows in the generated fragment.
    pub row_count: usize,
    /// Headings dropped for lack of following content.
    pub dropped_headings: usize,
    /// Wall-clock duration of the render, in milliseconds.
    pub duration_ms: u64,
}

/// The result of rendering raw schedule text into an HTML fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleOutput {
    /// Row-grouped HTML fragment ready for splicing into the page.
    pub fragment: String,
    /// Tagged intermediate (`<h3>`/`<br />` stream) the fragment was built
    /// from. Kept so callers can inspect what the classifier made of a
    /// noisy extraction.
    pub tagged: String,
    /// Run statistics.
    pub stats: ScheduleStats,
}

/// The result of patching a target page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchOutcome {
    /// The patched page.
    pub target: PathBuf,
    /// Backup taken immediately before the patch.
    pub backup: PathBuf,
    /// False when the fresh fragment was byte-identical to the page's
    /// current region and no write was performed.
    pub changed: bool,
}

/// The result of a full publish run (render + patch).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishOutput {
    pub schedule: ScheduleOutput,
    pub patch: PatchOutcome,
}
