//! Line classifier & tagger: normalized text → tagged intermediate stream.
//!
//! Each non-blank line is either a **heading** (a date line naming a month
//! and a weekday) or **content** (service times and notes belonging to the
//! heading above it). The tagger emits an HTML-ish intermediate the layout
//! stage consumes: `<h3>…</h3>` for headings, `<br />`-prefixed lines for
//! content.
//!
//! The heading grammar is a closed vocabulary — no fuzzy matching. The
//! month and weekday forms live in const tables below and the matcher is
//! assembled from them once, so adding a grammatical case (or a new
//! language some day) means editing data, not pattern literals.

use once_cell::sync::Lazy;
use regex::Regex;

/// Russian month names in the grammatical cases that appear in schedule
/// headings (nominative and genitive).
const MONTH_FORMS: &[&str] = &[
    "январь", "января",
    "февраль", "февраля",
    "март", "марта",
    "апрель", "апреля",
    "май", "мая",
    "июнь", "июня",
    "июль", "июля",
    "август", "августа",
    "сентябрь", "сентября",
    "октябрь", "октября",
    "ноябрь", "ноября",
    "декабрь", "декабря",
];

/// Russian weekday names, with accusative forms where they differ.
const WEEKDAY_FORMS: &[&str] = &[
    "понедельник",
    "вторник",
    "среда", "среду",
    "четверг",
    "пятница", "пятницу",
    "суббота", "субботу",
    "воскресенье",
];

/// Matches a date heading: month form, comma, weekday form.
static RE_HEADING: Lazy<Regex> = Lazy::new(|| {
    let months = MONTH_FORMS.join("|");
    let weekdays = WEEKDAY_FORMS.join("|");
    Regex::new(&format!(r"(?i)\b(?:{months})\s*,\s*(?:{weekdays})")).unwrap()
});

/// Matches a line starting with a time token (`H:MM` / `HH:MM`).
static RE_TIME_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{1,2}:\d{2}").unwrap());

// Cosmetic pass: whitespace directly after an opening tag.
static RE_AFTER_BR: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br />\s*").unwrap());
static RE_AFTER_H3: Lazy<Regex> = Lazy::new(|| Regex::new(r"<h3>\s*").unwrap());

/// True when the line is a date heading (month, weekday).
pub fn is_heading(line: &str) -> bool {
    RE_HEADING.is_match(line)
}

/// True when the line starts with a canonical time token.
pub fn starts_with_time(line: &str) -> bool {
    RE_TIME_PREFIX.is_match(line)
}

/// Tag normalized schedule text into the `<h3>`/`<br />` intermediate.
///
/// Total: never fails. Blank lines are dropped; everything else is passed
/// through with a tag prefix:
///
/// - heading → `<h3>{line}</h3>`
/// - first content line after a heading → `<br />{line}` (hangs directly
///   under the date)
/// - every other content line → `<br /><br />{line}` (a new visual block —
///   time-slot lines and standalone notes alike)
pub fn tag_schedule(normalized: &str) -> String {
    let mut out = String::with_capacity(normalized.len() + 64);
    let mut after_heading = false;

    for line in normalized.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if is_heading(line) {
            out.push_str("<h3>");
            out.push_str(line);
            out.push_str("</h3>\n");
            after_heading = true;
        } else if after_heading {
            out.push_str("<br />");
            out.push_str(line);
            out.push('\n');
            after_heading = false;
        } else {
            out.push_str("<br /><br />");
            out.push_str(line);
            out.push('\n');
        }
    }

    let out = RE_AFTER_BR.replace_all(&out, "<br />");
    RE_AFTER_H3.replace_all(&out, "<h3>").to_string()
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headings_match_across_cases_and_forms() {
        assert!(is_heading("Апреля, Понедельник"));
        assert!(is_heading("Март, Среда"));
        assert!(is_heading("мая, воскресенье"));
        assert!(is_heading("ИЮНЯ, СУББОТУ"));
        assert!(is_heading("12 Декабря, Пятница"));
    }

    #[test]
    fn heading_tolerates_spacing_around_comma() {
        assert!(is_heading("Апреля , Понедельник"));
        assert!(is_heading("Апреля,Понедельник"));
    }

    #[test]
    fn non_headings_rejected() {
        assert!(!is_heading("08:00 Литургия"));
        assert!(!is_heading("Апреля Понедельник")); // no comma
        assert!(!is_heading("Понедельник, Апреля")); // wrong order
        assert!(!is_heading("Седмица, Понедельник")); // not a month
    }

    #[test]
    fn time_prefix_detection() {
        assert!(starts_with_time("08:00 Литургия"));
        assert!(starts_with_time("8:00"));
        assert!(!starts_with_time("Литургия в 08:00"));
    }

    #[test]
    fn first_content_line_gets_single_break() {
        let tagged = tag_schedule("Апреля, Понедельник\n08:00 Литургия");
        assert_eq!(
            tagged,
            "<h3>Апреля, Понедельник</h3>\n<br />08:00 Литургия\n"
        );
    }

    #[test]
    fn later_time_lines_get_double_break() {
        let tagged = tag_schedule("Апреля, Понедельник\n08:00 Литургия\n17:00 Вечерня");
        assert_eq!(
            tagged,
            "<h3>Апреля, Понедельник</h3>\n<br />08:00 Литургия\n<br /><br />17:00 Вечерня\n"
        );
    }

    #[test]
    fn standalone_notes_get_double_break_too() {
        let tagged = tag_schedule("Апреля, Понедельник\n08:00 Литургия\nИсповедь после службы");
        assert!(tagged.ends_with("<br /><br />Исповедь после службы\n"));
    }

    #[test]
    fn blank_lines_dropped() {
        let tagged = tag_schedule("Апреля, Понедельник\n\n  \n08:00 Литургия");
        assert_eq!(
            tagged,
            "<h3>Апреля, Понедельник</h3>\n<br />08:00 Литургия\n"
        );
    }

    #[test]
    fn consecutive_headings_each_reset_the_flag() {
        let tagged = tag_schedule("Апреля, Понедельник\nАпреля, Вторник\n08:00 Литургия");
        assert_eq!(
            tagged,
            "<h3>Апреля, Понедельник</h3>\n<h3>Апреля, Вторник</h3>\n<br />08:00 Литургия\n"
        );
    }

    #[test]
    fn tagging_is_total_on_junk() {
        let tagged = tag_schedule("???\n§§§");
        assert_eq!(tagged, "<br /><br />???\n<br /><br />§§§\n");
    }
}
