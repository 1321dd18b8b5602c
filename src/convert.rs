//! Pipeline entry points.
//!
//! Everything here is request-scoped: each call owns its intermediates and
//! returns them as values, so two updates never share state and a failed
//! run leaves nothing behind to reset.

use crate::config::PublishConfig;
use crate::error::ScheduleError;
use crate::output::{PublishOutput, ScheduleOutput, ScheduleStats};
use crate::pipeline::{classify, layout, normalize, patch};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Normalize and tag raw schedule text.
///
/// Returns the tagged intermediate (`<h3>`/`<br />` stream) without
/// building the page fragment — useful for inspecting what the classifier
/// made of a noisy extraction.
///
/// # Errors
/// [`ScheduleError::EmptyInput`] when the input is whitespace-only.
pub fn process_text(raw: &str) -> Result<String, ScheduleError> {
    let normalized = normalize::normalize_text(raw)?;
    Ok(classify::tag_schedule(&normalized))
}

/// Convert raw schedule text into a row-grouped HTML fragment.
///
/// # Errors
/// [`ScheduleError::EmptyInput`] when the input is whitespace-only. An
/// input that normalizes fine but contains no recognisable headings is not
/// an error: it yields an empty fragment and zero counts.
pub fn render_schedule(
    raw: &str,
    config: &PublishConfig,
) -> Result<ScheduleOutput, ScheduleError> {
    let start = Instant::now();

    // ── Step 1: Normalize ────────────────────────────────────────────────
    let normalized = normalize::normalize_text(raw)?;
    debug!("Normalized input: {} bytes", normalized.len());

    // ── Step 2: Classify & tag ───────────────────────────────────────────
    let tagged = classify::tag_schedule(&normalized);
    debug!("Tagged intermediate: {} bytes", tagged.len());

    // ── Step 3: Build fragment ───────────────────────────────────────────
    let built = layout::build_fragment(&tagged, config);
    info!(
        "Built fragment: {} entries in {} row(s), {} heading(s) dropped",
        built.entry_count, built.row_count, built.dropped_headings
    );

    let stats = ScheduleStats {
        heading_count: built.heading_count,
        entry_count: built.entry_count,
        row_count: built.row_count,
        dropped_headings: built.dropped_headings,
        duration_ms: start.elapsed().as_millis() as u64,
    };

    Ok(ScheduleOutput {
        fragment: built.html,
        tagged,
        stats,
    })
}

/// Convert raw schedule text and splice the result into the target page.
///
/// # Errors
/// Render errors ([`ScheduleError::EmptyInput`]) plus every patcher
/// precondition and I/O error — see [`crate::pipeline::patch::patch_file`].
/// A failed patch leaves the target byte-identical to its pre-call state.
pub fn publish(
    raw: &str,
    target: &Path,
    config: &PublishConfig,
) -> Result<PublishOutput, ScheduleError> {
    let schedule = render_schedule(raw, config)?;
    let patch = patch::patch_file(target, &schedule.fragment, config)?;
    Ok(PublishOutput { schedule, patch })
}

/// Read raw schedule text from a document and publish it to the target page.
///
/// The input is decoded as UTF-8; undecodable bytes (legacy code-page
/// exports) are replaced rather than rejected, since the schedule
/// vocabulary matcher only needs the Cyrillic text that survives.
pub fn publish_from_file(
    input: &Path,
    target: &Path,
    config: &PublishConfig,
) -> Result<PublishOutput, ScheduleError> {
    let raw = read_input(input)?;
    publish(&raw, target, config)
}

/// Read an input document as UTF-8 with lossy fallback.
pub fn read_input(input: &Path) -> Result<String, ScheduleError> {
    let bytes = fs_read(input)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn fs_read(input: &Path) -> Result<Vec<u8>, ScheduleError> {
    std::fs::read(input).map_err(|e| ScheduleError::InputReadFailed {
        path: input.to_path_buf(),
        source: e,
    })
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn process_text_round_trip() {
        let tagged = process_text(
            "Расписание Богослужений\nАпреля, Понедельник\n08:00 Литургия\n",
        )
        .unwrap();
        assert_eq!(
            tagged,
            "<h3>Апреля, Понедельник</h3>\n<br />08:00 Литургия\n"
        );
    }

    #[test]
    fn render_counts_match_fragment() {
        let out = render_schedule(
            "Апреля, Понедельник\n08:00 Литургия\nМая, Вторник\n09:00 Молебен\n",
            &PublishConfig::default(),
        )
        .unwrap();
        assert_eq!(out.stats.entry_count, 2);
        assert_eq!(out.stats.row_count, 1);
        assert_eq!(out.fragment.matches("<h3>").count(), 2);
    }

    #[test]
    fn headingless_input_renders_empty_fragment() {
        let out = render_schedule("просто текст без дат", &PublishConfig::default()).unwrap();
        assert!(out.fragment.is_empty());
        assert_eq!(out.stats.entry_count, 0);
    }

    #[test]
    fn empty_input_refused() {
        assert!(matches!(
            render_schedule("  \n ", &PublishConfig::default()),
            Err(ScheduleError::EmptyInput)
        ));
    }

    #[test]
    fn read_input_tolerates_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("input.txt");
        std::fs::write(&path, b"\xff\xfe abc").unwrap();
        let text = read_input(&path).unwrap();
        assert!(text.contains("abc"));
    }
}
