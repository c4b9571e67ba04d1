// src/extractors/sections.rs

// --- Imports ---
use once_cell::sync::Lazy;
use scraper::{ElementRef, Selector};

use super::page::NormalizedPage;
use crate::models::Program;
use crate::schema::SECTION_SLOTS;
use crate::utils::text::{collapse_whitespace, element_text};

// --- Constants ---
// Sections shorter than this carry too little signal to keep
const MIN_SECTION_CHARS: usize = 50;

// Headings about these topics never describe the program itself
const DENYLISTED_TOPICS: [&str; 3] = ["новости", "партнер", "каталог"];

// --- CSS Selectors (Lazy Static) ---
static SECTION_HEADING_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("h2").expect("Failed to compile SECTION_HEADING_SELECTOR")
});

/// Walks `<h2>` headings in document order and fills the content fields of `program`.
///
/// A heading's content is every following sibling up to the next `<h1>`/`<h2>`.
/// Each field is written at most once: the first qualifying heading wins and later
/// headings matching an already filled field fall through to the next lexicon.
pub fn classify_sections(page: &NormalizedPage, program: &mut Program) {
    for heading in page.select(&SECTION_HEADING_SELECTOR) {
        let title = element_text(heading).to_lowercase();

        if DENYLISTED_TOPICS.iter().any(|topic| title.contains(topic)) {
            tracing::trace!("Skipping denylisted heading '{}'", title);
            continue;
        }

        let content = section_content(heading);
        if content.chars().count() < MIN_SECTION_CHARS {
            tracing::trace!("Skipping heading '{}': section too short", title);
            continue;
        }

        for slot in &SECTION_SLOTS {
            let field = (slot.slot)(program);
            if field.is_empty() && slot.keywords.iter().any(|kw| title.contains(kw)) {
                tracing::debug!("Heading '{}' assigned to {}", title, slot.name);
                *field = content;
                break;
            }
        }
    }
}

/// Text of all siblings after `heading` up to the next top- or second-level heading.
fn section_content(heading: ElementRef) -> String {
    let parts: Vec<String> = heading
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .take_while(|sibling| !matches!(sibling.value().name(), "h1" | "h2"))
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect();

    collapse_whitespace(&parts.join("\n"))
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    const FILLER: &str = "Выпускники работают в ведущих компаниях и научных центрах страны.";

    fn classify(body: &str) -> Program {
        let page = NormalizedPage::from_html(&format!("<html><body>{}</body></html>", body));
        let mut program = Program::default();
        classify_sections(&page, &mut program);
        program
    }

    #[test]
    fn test_first_career_heading_wins() {
        let program = classify(&format!(
            "<h2>Карьерные перспективы</h2><p>Первый: {FILLER}</p>\
             <h2>Карьера выпускников</h2><p>Второй: {FILLER}</p>"
        ));
        assert!(program.career.starts_with("Первый:"));
        assert!(!program.career.contains("Второй"));
    }

    #[test]
    fn test_section_stops_at_next_heading() {
        let program = classify(&format!(
            "<h2>Что я буду изучать</h2><p>{FILLER}</p><h3>Подраздел</h3><ul><li>Курс А</li><li>Курс Б</li></ul>\
             <h1>Другое</h1><p>Не относится</p>"
        ));
        assert!(program.what_to_study.contains("Подраздел"));
        assert!(program.what_to_study.contains("Курс А Курс Б"));
        assert!(!program.what_to_study.contains("Не относится"));
        assert!(!program.what_to_study.contains('\n'));
    }

    #[test]
    fn test_denylisted_and_short_sections_ignored() {
        let program = classify(&format!(
            "<h2>Новости и перспективы</h2><p>{FILLER}</p>\
             <h2>Преимущества</h2><p>Коротко</p>\
             <h2>Как поступить</h2><p>{FILLER}</p>"
        ));
        assert_eq!(program.career, "");
        assert_eq!(program.advantages, "");
        assert_eq!(program.admission_info, FILLER);
    }

    #[test]
    fn test_heading_falls_through_to_next_empty_lexicon() {
        // "о программе" would pick what_to_study, which is already filled;
        // "особенности" then matches advantages.
        let program = classify(&format!(
            "<h2>Учебный план</h2><p>План: {FILLER}</p>\
             <h2>О программе и её особенности</h2><p>Особенности: {FILLER}</p>"
        ));
        assert!(program.what_to_study.starts_with("План:"));
        assert!(program.advantages.starts_with("Особенности:"));
    }

    #[test]
    fn test_no_headings_leaves_fields_empty() {
        let program = classify("<p>Просто текст без заголовков</p>");
        assert_eq!(program, Program::default());
    }
}
