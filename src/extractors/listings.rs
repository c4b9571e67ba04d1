// src/extractors/listings.rs

// --- Imports ---
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Selector;

use super::page::NormalizedPage;
use crate::models::ExamRequirement;
use crate::utils::text::tight_text;

// --- Constants ---
// Subject aliases, checked in order; the first alias contained in the captured subject wins
const SUBJECT_ALIASES: [(&str, &str); 13] = [
    ("математика", "Математика"),
    ("русский язык", "Русский язык"),
    ("информатика", "Информатика"),
    ("коммуникационные технологии", "Информатика"),
    ("физика", "Физика"),
    ("химия", "Химия"),
    ("биология", "Биология"),
    ("история", "История"),
    ("обществознание", "Обществознание"),
    ("литература", "Литература"),
    ("иностранный язык", "Иностранный язык"),
    ("английский язык", "Иностранный язык"),
    ("география", "География"),
];

const SPECIALIZATION_HREF_MARKERS: [&str; 2] = ["/spec_", "/spec/"];
const GENERIC_SPECIALIZATION_LINKS: [&str; 2] = ["о специализациях", "общая информация"];
const LABEL_QUOTES: &[char] = &['«', '»', '"', '\''];

// --- Regex Patterns / Selectors (Lazy Static) ---
static MIN_SCORE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"([А-Яа-яёЁ][А-Яа-яёЁ\s\-]+)\s*\(минимальный балл[:\s]*(\d+)\)")
        .expect("Failed to compile MIN_SCORE_RE")
});

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to compile LINK_SELECTOR")
});

/// Exams stated on the page itself as "<subject> (минимальный балл: N)".
/// Subjects are canonicalized; the first score seen for a subject wins.
pub fn inline_exams(page: &NormalizedPage) -> Vec<ExamRequirement> {
    let mut exams: Vec<ExamRequirement> = Vec::new();

    for caps in MIN_SCORE_RE.captures_iter(page.text()) {
        let subject = caps[1].trim().to_lowercase();
        let Ok(min_score) = caps[2].parse::<u32>() else {
            continue;
        };

        let Some((_, canonical)) = SUBJECT_ALIASES.iter().find(|(alias, _)| subject.contains(alias)) else {
            tracing::trace!("Unrecognized exam subject '{}'", subject);
            continue;
        };

        if !exams.iter().any(|exam| exam.subject == *canonical) {
            exams.push(ExamRequirement::new(*canonical, min_score));
        }
    }

    exams
}

/// Specialization labels taken from links into the program's specialization pages,
/// de-duplicated in first-seen order.
pub fn specializations(page: &NormalizedPage) -> Vec<String> {
    let mut labels: Vec<String> = Vec::new();

    for link in page.select(&LINK_SELECTOR) {
        let href = link.value().attr("href").unwrap_or_default();
        if !SPECIALIZATION_HREF_MARKERS.iter().any(|marker| href.contains(marker)) {
            continue;
        }

        let raw = tight_text(link);
        let label = raw.trim().trim_matches(LABEL_QUOTES);
        let len = label.chars().count();
        if len <= 5 || len >= 100 {
            continue;
        }
        if GENERIC_SPECIALIZATION_LINKS.contains(&label.to_lowercase().as_str()) {
            continue;
        }

        if !labels.iter().any(|known| known == label) {
            labels.push(label.to_string());
        }
    }

    labels
}
