// src/extractors/fields.rs
//! Scalar field heuristics. Each function owns exactly one field and reads only
//! the normalized page, so they can run in any order.

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Selector};

use super::page::NormalizedPage;
use crate::models::{Language, StudyForm};
use crate::utils::text::{collapse_whitespace, element_text};

// --- Constants ---
const MIN_DESCRIPTION_CHARS: usize = 100;

// --- Regex Patterns for Text Matching (Lazy Static) ---
static BUDGET_PLACES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*бюджетн").expect("Failed to compile BUDGET_PLACES_RE")
});

static PAID_PLACES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*платн").expect("Failed to compile PAID_PLACES_RE")
});

// "года?" also covers "год"
static DURATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+)\s*(?:года?|лет)").expect("Failed to compile DURATION_RE")
});

static TOP_HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h1").expect("Failed to compile TOP_HEADING_SELECTOR")
});

/// Number of state-funded places: the integer right before "бюджетн…".
pub fn budget_places(page: &NormalizedPage) -> Option<u32> {
    first_number_before(&BUDGET_PLACES_RE, page.text())
}

/// Number of fee-paying places: the integer right before "платн…".
pub fn paid_places(page: &NormalizedPage) -> Option<u32> {
    first_number_before(&PAID_PLACES_RE, page.text())
}

/// Program length, e.g. "4 года". Empty when no year count is found.
pub fn duration(page: &NormalizedPage) -> String {
    first_number_before(&DURATION_RE, page.text())
        .map(format_years)
        .unwrap_or_default()
}

/// Formats a year count with Russian numeral agreement.
pub fn format_years(years: u32) -> String {
    let noun = match (years % 10, years % 100) {
        (1, n) if n != 11 => "год",
        (2..=4, n) if !(12..=14).contains(&n) => "года",
        _ => "лет",
    };
    format!("{} {}", years, noun)
}

/// Enrollment form: the first label found, longest labels first.
pub fn study_form(page: &NormalizedPage) -> Option<StudyForm> {
    StudyForm::DETECTION_ORDER
        .into_iter()
        .find(|form| page.text_lower().contains(form.label()))
}

/// Language of instruction. Defaults to Russian when nothing points elsewhere.
pub fn language(page: &NormalizedPage) -> Language {
    let text = page.text();
    let lower = page.text_lower();

    if text.contains("RUS+ENG") || (lower.contains("русском") && lower.contains("английском")) {
        Language::Bilingual
    } else if text.contains("ENG") || lower.contains("полностью на английском") {
        Language::English
    } else {
        Language::Russian
    }
}

/// First `<p>`/`<div>` sibling after the first `<h1>` carrying more than 100 characters.
pub fn description(page: &NormalizedPage) -> String {
    let Some(heading) = page.select(&TOP_HEADING_SELECTOR).next() else {
        return String::new();
    };

    heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .filter(|sibling| matches!(sibling.value().name(), "p" | "div"))
        .map(element_text)
        .find(|text| text.chars().count() > MIN_DESCRIPTION_CHARS)
        .map(|text| collapse_whitespace(&text))
        .unwrap_or_default()
}

/// First match whose number parses; an overflowing or non-ASCII number falls through.
fn first_number_before(pattern: &Regex, text: &str) -> Option<u32> {
    pattern
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .find_map(|m| m.as_str().parse().ok())
}
