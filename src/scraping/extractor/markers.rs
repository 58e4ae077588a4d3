//! Marker-phrase heuristics for splitting abstracts from JEL code lists
//!
//! The journals embed classification codes at the tail of the abstract
//! paragraph behind inconsistent marker phrasing. These are pure text
//! rules; anything they cannot recognize degrades to "no codes" rather
//! than an error.

/// AER embeds its codes as a parenthesized suffix: `... (JEL D91, E12)`.
pub(crate) const AER_JEL_MARKER: &str = " (JEL ";

/// QJE marker spellings, tried in priority order. The colon-space after
/// the marker is part of the observed phrasing and is skipped with it.
pub(crate) const QJE_JEL_MARKERS: [&str; 3] = ["JEL Codes", "JEL Code", "JELCodes"];

/// Split the AER abstract paragraph at its ` (JEL ` marker.
///
/// Returns `None` when the marker is absent, in which case the caller falls
/// back to scanning classification hyperlinks elsewhere on the page.
pub(crate) fn split_aer_marker(raw: &str) -> Option<(String, Vec<String>)> {
    let idx = raw.find(AER_JEL_MARKER)?;
    let abstract_text = raw[..idx].to_string();
    let tail_start = idx + AER_JEL_MARKER.len();
    let codes = raw
        .get(tail_start..)
        .map(code_list_from_tail)
        .unwrap_or_default();
    Some((abstract_text, codes))
}

/// Split the QJE abstract paragraph at the first marker spelling that
/// matches. With no marker at all the whole text is the abstract and the
/// code list is empty.
pub(crate) fn split_qje_marker(raw: &str) -> (String, Vec<String>) {
    for marker in QJE_JEL_MARKERS {
        if let Some(idx) = raw.find(marker) {
            let abstract_text = raw[..idx].to_string();
            // Skip the marker and its trailing ": "
            let tail_start = idx + marker.len() + 2;
            let codes = raw
                .get(tail_start..)
                .map(code_list_from_tail)
                .unwrap_or_default();
            return (abstract_text, codes);
        }
    }
    (raw.to_string(), Vec::new())
}

/// Turn the text after a marker into a code list: drop the sentence's final
/// character (and a closing parenthesis if one remains), then split on
/// `", "` when present, else treat the remainder as a single code.
fn code_list_from_tail(tail: &str) -> Vec<String> {
    let trimmed = drop_last_char(tail);
    let trimmed = trimmed.strip_suffix(')').unwrap_or(trimmed);
    split_codes(trimmed)
}

/// Split a comma-separated code list; a string without the separator is
/// one code, an empty string is no codes.
pub(crate) fn split_codes(text: &str) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }
    if text.contains(", ") {
        text.split(", ").map(str::to_string).collect()
    } else {
        vec![text.to_string()]
    }
}

/// Derive a code from a classification hyperlink: hrefs whose path mentions
/// "jel" carry the code as their trailing 3 characters.
pub(crate) fn code_from_href(href: &str) -> Option<String> {
    if !href.contains("jel") {
        return None;
    }
    let char_count = href.chars().count();
    if char_count < 3 {
        return None;
    }
    Some(href.chars().skip(char_count - 3).collect())
}

/// Remove the last character of a string, respecting char boundaries.
fn drop_last_char(s: &str) -> &str {
    match s.char_indices().last() {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
