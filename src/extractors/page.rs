// src/extractors/page.rs

// --- Imports ---
use once_cell::sync::Lazy;
use scraper::element_ref::Select;
use scraper::{Html, Selector};

use crate::utils::text::element_text;

// --- CSS Selectors (Lazy Static) ---
// Boilerplate removed before any text is read
static BOILERPLATE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("script, style, noscript, nav, footer, header")
        .expect("Failed to compile BOILERPLATE_SELECTOR")
});

/// A program page with boilerplate stripped, plus its flattened text.
pub struct NormalizedPage {
    document: Html,
    text: String,
    text_lower: String,
}

impl NormalizedPage {
    /// Decodes the payload (lossy UTF-8), parses it and strips boilerplate elements.
    /// Never fails: whatever the parser recovers is what downstream heuristics see.
    pub fn from_bytes(payload: &[u8]) -> Self {
        Self::from_html(&String::from_utf8_lossy(payload))
    }

    pub fn from_html(html: &str) -> Self {
        let mut document = Html::parse_document(html);

        let boilerplate: Vec<_> = document
            .root_element()
            .select(&BOILERPLATE_SELECTOR)
            .map(|element| element.id())
            .collect();
        tracing::trace!("Stripping {} boilerplate elements", boilerplate.len());

        for id in boilerplate {
            if let Some(mut node) = document.tree.get_mut(id) {
                node.detach();
            }
        }

        let text = element_text(document.root_element());
        let text_lower = text.to_lowercase();

        Self { document, text, text_lower }
    }

    /// Full page text, text nodes joined by single spaces.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_lower(&self) -> &str {
        &self.text_lower
    }

    /// Selects elements still attached to the document.
    /// (`Html::select` walks the whole node arena, detached nodes included.)
    pub fn select<'a, 'b>(&'a self, selector: &'b Selector) -> Select<'a, 'b> {
        self.document.root_element().select(selector)
    }
}
