//! Text normalizer: deterministic cleanup of raw schedule text.
//!
//! ## Why is normalization necessary?
//!
//! The raw text arrives from document extraction or OCR and is noisy in
//! predictable ways:
//!
//! - Title boilerplate ("Расписание Богослужений", "Прихода …") mixed in
//!   with the schedule body
//! - Alternate weekday spellings in parentheses, e.g. `суббота (вечер)`
//! - Time ranges written with a dash (`17-00`) instead of a colon
//! - Single-digit hours (`9:30` for `09:30`)
//! - Stray blank lines and multi-space runs from column layout
//!
//! This module applies six cheap, deterministic regex/string rules that fix
//! those artefacts without touching content. Each rule is a pure function
//! (`&str → String`) and independently testable.
//!
//! ## Rule Order
//!
//! Rules must run in this specific order: boilerplate lines go first so
//! later rules never fire inside them, dash ranges become `H:MM` tokens
//! before zero-padding so `9-30` ends up as `09:30 -`, and whitespace
//! collapsing runs last over the fully rewritten block.

use crate::error::ScheduleError;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Apply all normalization rules to raw schedule text.
///
/// Rules (applied in order):
/// 1. Trim the whole block; empty input is an error, not an empty schedule
/// 2. Delete lines carrying title boilerplate
/// 3. Fold `word (altword)` into `word, altword`
/// 4. Rewrite dash time ranges `H-MM` → `H:MM -`
/// 5. Zero-pad single-digit hours `H:MM` → `0H:MM`
/// 6. Collapse blank-line runs and multi-space runs
///
/// # Errors
/// [`ScheduleError::EmptyInput`] when the trimmed input is empty — callers
/// must treat this as "nothing to process", never as a valid zero-entry
/// schedule.
pub fn normalize_text(input: &str) -> Result<String, ScheduleError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(ScheduleError::EmptyInput);
    }

    let s = strip_boilerplate(trimmed);
    let s = fold_paren_alternates(&s);
    let s = normalize_dash_times(&s);
    let s = pad_short_hours(&s);
    let s = collapse_blank_lines(&s);
    // Boilerplate removal can leave a stray newline at the block edge.
    Ok(collapse_spaces(&s).trim().to_string())
}

// ── Rule 2: Strip boilerplate lines ──────────────────────────────────────────

static RE_BOILERPLATE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[^\n]*(?:Расписание Богослужений|Прихода)[^\n]*\n?").unwrap()
});

fn strip_boilerplate(input: &str) -> String {
    RE_BOILERPLATE.replace_all(input, "").to_string()
}

// ── Rule 3: Fold parenthesized alternate spellings ───────────────────────────

static RE_PAREN_ALT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b([а-я]+)\s*\(\s*([а-я]+)\s*\)").unwrap());

fn fold_paren_alternates(input: &str) -> String {
    RE_PAREN_ALT.replace_all(input, "$1, $2").to_string()
}

// ── Rule 4: Rewrite dash time ranges ─────────────────────────────────────────
//
// `17-00` means the range start `17:00 -`; the end time follows on the same
// line and is joined by the trailing dash. A third digit after the minute
// means the token is not a time at all, so the optional capture leaves the
// match untouched.

static RE_DASH_TIME: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d{1,2})-(\d{2})(\d)?").unwrap());

fn normalize_dash_times(input: &str) -> String {
    RE_DASH_TIME
        .replace_all(input, |caps: &Captures<'_>| {
            if caps.get(3).is_some() {
                caps[0].to_string()
            } else {
                format!("{}:{} -", &caps[1], &caps[2])
            }
        })
        .to_string()
}

// ── Rule 5: Zero-pad single-digit hours ──────────────────────────────────────
//
// A digit captured on either side means this `H:MM` sits inside a longer
// token and must not be padded.

static RE_SHORT_HOUR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d)?(\d):(\d{2})(\d)?").unwrap());

fn pad_short_hours(input: &str) -> String {
    RE_SHORT_HOUR
        .replace_all(input, |caps: &Captures<'_>| {
            if caps.get(1).is_some() || caps.get(4).is_some() {
                caps[0].to_string()
            } else {
                format!("0{}:{}", &caps[2], &caps[3])
            }
        })
        .to_string()
}

// ── Rule 6: Collapse blank lines and space runs ──────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());
static RE_SPACE_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r" {2,}").unwrap());

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n").to_string()
}

fn collapse_spaces(input: &str) -> String {
    RE_SPACE_RUNS.replace_all(input, " ").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────
