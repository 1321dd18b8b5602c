//! Schedule HTML builder: tagged intermediate → row-grouped fragment.
//!
//! The target page lays schedule cards out on a Bootstrap grid, four
//! `col-lg-3` cards per `row` block. This stage walks the `<h3>` blocks of
//! the tagged stream, pairs each heading with the content that follows it,
//! renders one card per pair, and groups cards into rows.
//!
//! Pairing is deliberately lossy in two ways, both inherited from the page
//! this feeds (see the drop counters in [`BuiltFragment`]):
//! material before the first heading is discarded, and a heading with no
//! following content produces no card.

use crate::config::PublishConfig;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

static RE_H3_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<h3>(.*?)</h3>").unwrap());

/// A built fragment plus the counts the caller reports.
#[derive(Debug, Clone)]
pub struct BuiltFragment {
    /// Row-grouped HTML, empty when no heading/content pair matched.
    pub html: String,
    /// Headings found in the tagged stream.
    pub heading_count: usize,
    /// Cards actually rendered.
    pub entry_count: usize,
    /// Rows in the fragment.
    pub row_count: usize,
    /// Headings dropped for lack of following content.
    pub dropped_headings: usize,
}

/// Build the row-grouped HTML fragment from tagged text.
///
/// Total: empty or heading-less input yields an empty fragment — "no
/// entries to render" is a valid result, not an error.
pub fn build_fragment(tagged: &str, config: &PublishConfig) -> BuiltFragment {
    // Each heading's content runs from the end of its <h3> block to the
    // start of the next one (or end of input).
    let blocks: Vec<(usize, usize, &str)> = RE_H3_BLOCK
        .captures_iter(tagged)
        .map(|caps| {
            let whole = caps.get(0).expect("capture 0 always present");
            let heading = caps.get(1).expect("capture 1 always present");
            (whole.start(), whole.end(), heading.as_str())
        })
        .collect();

    let mut cards: Vec<String> = Vec::with_capacity(blocks.len());
    let mut dropped = 0usize;

    for (i, &(_, content_start, heading)) in blocks.iter().enumerate() {
        let content_end = blocks
            .get(i + 1)
            .map(|&(next_start, _, _)| next_start)
            .unwrap_or(tagged.len());
        let content = tagged[content_start..content_end].trim();

        if content.is_empty() {
            dropped += 1;
            continue;
        }
        cards.push(render_card(heading.trim(), content));
    }

    if dropped > 0 {
        warn!(
            "{} heading(s) had no content and were dropped from the fragment",
            dropped
        );
    }

    let rows: Vec<String> = cards
        .chunks(config.row_capacity)
        .map(render_row)
        .collect();

    BuiltFragment {
        html: rows.join("\n"),
        heading_count: blocks.len(),
        entry_count: cards.len(),
        row_count: rows.len(),
        dropped_headings: dropped,
    }
}

/// One schedule card, indented to sit inside the page's `row` container.
fn render_card(date: &str, content: &str) -> String {
    format!(
        "\n        <div class=\"col-lg-3 col-sm-6 probootstrap-animate\">\n          \
         <div class=\"form-group\">\n            \
         <h3>{date}</h3>\n            \
         {content}\n          \
         </div>\n        \
         </div>"
    )
}

/// One comment-delimited `row` block wrapping up to `row_capacity` cards.
fn render_row(cards: &[String]) -> String {
    format!(
        "\n      <!------------------------------ row ------------------------------>\
         \n      <div class=\"row\">{}\n      </div>\n",
        cards.concat()
    )
}

// ── Tests ────────────────────────────────────────────────────────────────────
