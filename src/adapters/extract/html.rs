//! Webpage text extraction
//!
//! Strips non-content elements (head, script, style, iframe) from raw HTML,
//! collects the remaining text, and collapses whitespace into a single
//! plain string for the structured-extraction model.

use scraper::{Html, Selector};

/// Tags whose entire content is dropped before text extraction
const STRIPPED_TAGS: [&str; 4] = ["head", "script", "style", "iframe"];

/// Reduce an HTML document to plain text
pub fn strip_html(html: &str) -> String {
    let mut cleaned = html.to_owned();
    for tag in &STRIPPED_TAGS {
        cleaned = strip_tag(&cleaned, tag);
    }

    let document = Html::parse_document(&cleaned);
    let selector = Selector::parse("body").expect("static selector");

    let raw: String = match document.select(&selector).next() {
        Some(body) => body.text().collect::<Vec<_>>().join(" "),
        None => document.root_element().text().collect::<Vec<_>>().join(" "),
    };

    normalize_whitespace(&raw)
}

/// Remove all instances of one HTML tag including its content
///
/// Case-insensitive; unclosed tags drop everything to the end of input.
fn strip_tag(html: &str, tag: &str) -> String {
    let open_tag = format!("<{tag}");
    let close_tag = format!("</{tag}>");

    let mut result = String::with_capacity(html.len());
    let mut pos = 0;
    loop {
        let Some(start) = find_open_tag(html, pos, &open_tag) else {
            result.push_str(&html[pos..]);
            break;
        };
        result.push_str(&html[pos..start]);

        match find_ignore_ascii_case(html, start, &close_tag) {
            Some(close_start) => pos = close_start + close_tag.len(),
            None => break,
        }
    }
    result
}

/// Find the next opening tag, requiring a delimiter after the tag name so
/// `<head` never matches `<header`.
fn find_open_tag(html: &str, mut from: usize, open_tag: &str) -> Option<usize> {
    loop {
        let start = find_ignore_ascii_case(html, from, open_tag)?;
        match html.as_bytes().get(start + open_tag.len()) {
            None | Some(b'>') | Some(b'/') => return Some(start),
            Some(b) if b.is_ascii_whitespace() => return Some(start),
            _ => from = start + 1,
        }
    }
}

/// ASCII case-insensitive substring search over the original bytes
///
/// Matches always start at an ASCII `<`, so returned offsets are valid
/// char boundaries even in non-ASCII documents.
fn find_ignore_ascii_case(haystack: &str, from: usize, needle: &str) -> Option<usize> {
    let haystack = haystack.as_bytes();
    let needle = needle.as_bytes();
    if needle.is_empty() || from + needle.len() > haystack.len() {
        return None;
    }
    (from..=haystack.len() - needle.len())
        .find(|&i| haystack[i..i + needle.len()].eq_ignore_ascii_case(needle))
}

/// Collapse runs of whitespace into single spaces
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
