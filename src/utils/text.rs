// src/utils/text.rs
use scraper::ElementRef;

/// Text of an element with each text node trimmed, empty pieces dropped,
/// and the rest joined by a single space.
pub fn element_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Like `element_text`, but the trimmed pieces are glued together with no separator.
/// Table cells and link labels are read this way.
pub fn tight_text(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .collect::<String>()
}

/// Collapses every run of whitespace (including newlines) into a single space.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
