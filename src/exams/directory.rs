// src/exams/directory.rs

// --- Imports ---
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};

use super::matcher::normalize_name;
use crate::models::ExamRequirement;
use crate::utils::error::ExamDirectoryError;
use crate::utils::text::tight_text;

// --- Constants ---
// Markers appended to program names in the reference table
const NAME_MARKERS: [&str; 2] = ["(онлайн)", "(реализуется на английском языке)"];
const HEADER_ROWS: usize = 2;

// --- CSS Selectors (Lazy Static) ---
static TABLE_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table").expect("Failed to compile TABLE_SELECTOR")
});

static ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("tr").expect("Failed to compile ROW_SELECTOR")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td, th").expect("Failed to compile CELL_SELECTOR")
});

/// One program in the reference table.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    pub name: String,
    pub(crate) normalized: String,
    pub exams: Vec<ExamRequirement>,
}

/// Canonical program name → exam requirements, in source table order.
/// Iteration order matters: it breaks ties during matching.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExamDirectory {
    entries: Vec<DirectoryEntry>,
}

impl ExamDirectory {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a directory from (name, exams) pairs, keeping their order.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, Vec<ExamRequirement>)>,
        S: Into<String>,
    {
        let mut directory = Self::empty();
        for (name, exams) in entries {
            directory.insert(name.into(), exams);
        }
        directory
    }

    /// Parses the minimum-score reference page.
    ///
    /// The data lives in the second `<table>`. After two header rows, a 5-cell row opens a
    /// program (name, subject, score in cells 1, 2, 4) and a 3-cell row adds another exam
    /// (subject, score in cells 0, 2) to the program opened last.
    pub fn from_html(html: &str) -> Result<Self, ExamDirectoryError> {
        let document = Html::parse_document(html);
        let tables: Vec<ElementRef> = document.root_element().select(&TABLE_SELECTOR).collect();
        let table = *tables.get(1).ok_or(ExamDirectoryError::TableMissing(tables.len()))?;

        let mut directory = Self::empty();
        let mut current: Option<String> = None;

        for row in table.select(&ROW_SELECTOR).skip(HEADER_ROWS) {
            let cells: Vec<String> = row.select(&CELL_SELECTOR).map(tight_text).collect();

            match cells.len() {
                5 => {
                    let name = clean_program_name(&cells[1]);
                    let Some(min_score) = parse_score(&cells[4]) else {
                        tracing::debug!("Skipping directory row for '{}': bad score '{}'", name, cells[4]);
                        // Its follow-up rows must not leak into the previous program
                        current = None;
                        continue;
                    };
                    directory.insert(name.clone(), vec![ExamRequirement::new(cells[2].as_str(), min_score)]);
                    current = Some(name);
                }
                3 => {
                    let Some(name) = current.as_deref() else {
                        continue;
                    };
                    let Some(min_score) = parse_score(&cells[2]) else {
                        tracing::debug!("Skipping exam row for '{}': bad score '{}'", name, cells[2]);
                        continue;
                    };
                    directory.push_exam(name, ExamRequirement::new(cells[0].as_str(), min_score));
                }
                _ => {}
            }
        }

        tracing::debug!("Parsed exam directory with {} programs", directory.len());
        Ok(directory)
    }

    /// Inserts a program. A repeated name replaces the earlier exams in place.
    pub fn insert(&mut self, name: String, exams: Vec<ExamRequirement>) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.exams = exams;
            return;
        }
        let normalized = normalize_name(&name);
        self.entries.push(DirectoryEntry { name, normalized, exams });
    }

    fn push_exam(&mut self, name: &str, exam: ExamRequirement) {
        if let Some(entry) = self.entries.iter_mut().find(|entry| entry.name == name) {
            entry.exams.push(exam);
        }
    }

    pub fn get(&self, name: &str) -> Option<&[ExamRequirement]> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.exams.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &DirectoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn clean_program_name(raw: &str) -> String {
    NAME_MARKERS
        .iter()
        .fold(raw.to_string(), |name, marker| name.replace(marker, ""))
        .trim()
        .to_string()
}

fn parse_score(raw: &str) -> Option<u32> {
    raw.trim().parse().ok()
}
