//! Error types for the schedule2html library.
//!
//! One enum covers the whole pipeline, with variants grouped by the stage
//! that raises them. The split matters for callers:
//!
//! * Normalizer errors ([`ScheduleError::EmptyInput`]) mean "nothing to
//!   process" — the caller must not overwrite prior page state with an
//!   empty schedule.
//!
//! * Patcher precondition errors ([`ScheduleError::TargetNotFound`],
//!   [`ScheduleError::EmptyFragment`], [`ScheduleError::MarkerMismatch`])
//!   are fatal for the invocation and never auto-retried — a malformed
//!   target page needs human correction, not a guess.
//!
//! * Wrapped I/O errors ([`ScheduleError::BackupFailed`],
//!   [`ScheduleError::WriteFailed`]) are surfaced after a best-effort
//!   restore from backup; they are never silently swallowed.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the schedule2html library.
#[derive(Debug, Error)]
pub enum ScheduleError {
    // ── Normalizer errors ─────────────────────────────────────────────────
    /// The input text was empty (or whitespace-only) after trimming.
    #[error("Input text is empty — nothing to process.\nCheck the extraction step produced any text at all.")]
    EmptyInput,

    // ── Patcher precondition errors ───────────────────────────────────────
    /// The target page does not exist at the given path.
    #[error("Target page not found: '{path}'\nCheck the path exists and is readable.")]
    TargetNotFound { path: PathBuf },

    /// The generated fragment was empty; patching would blank the page.
    #[error("Refusing to patch with an empty fragment.\nThe input produced no schedule entries.")]
    EmptyFragment,

    /// The schedule marker did not occur exactly twice in the target page.
    #[error(
        "Marker found {found} time(s) in '{path}', expected exactly 2.\n\
         The insertion point is ambiguous or missing; fix the page by hand."
    )]
    MarkerMismatch { path: PathBuf, found: usize },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not read the input document.
    #[error("Failed to read input '{path}': {source}")]
    InputReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not create the backup directory or copy the backup file.
    #[error("Failed to back up '{path}': {source}")]
    BackupFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not write the patched page. The target was restored from the
    /// backup taken immediately before the write.
    #[error("Failed to write target '{path}': {source}\nThe page was restored from backup.")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_mismatch_display() {
        let e = ScheduleError::MarkerMismatch {
            path: PathBuf::from("index.html"),
            found: 1,
        };
        let msg = e.to_string();
        assert!(msg.contains("1 time(s)"), "got: {msg}");
        assert!(msg.contains("index.html"));
    }

    #[test]
    fn target_not_found_display() {
        let e = ScheduleError::TargetNotFound {
            path: PathBuf::from("/srv/site/index.html"),
        };
        assert!(e.to_string().contains("/srv/site/index.html"));
    }

    #[test]
    fn write_failed_carries_source() {
        use std::error::Error as _;
        let e = ScheduleError::WriteFailed {
            path: PathBuf::from("index.html"),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        };
        assert!(e.to_string().contains("restored from backup"));
        assert!(e.source().is_some());
    }

    #[test]
    fn empty_input_display() {
        assert!(ScheduleError::EmptyInput
            .to_string()
            .contains("nothing to process"));
    }
}
