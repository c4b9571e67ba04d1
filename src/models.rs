// src/models.rs
use serde::Serialize;

use crate::config::ProgramConfig;

/// One entrance exam: canonical subject plus the minimum accepted score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExamRequirement {
    pub subject: String,
    pub min_score: u32,
}

impl ExamRequirement {
    pub fn new(subject: impl Into<String>, min_score: u32) -> Self {
        Self { subject: subject.into(), min_score }
    }
}

/// Enrollment form, serialized with the labels used on the program pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StudyForm {
    #[serde(rename = "очно-заочная")]
    PartTime,
    #[serde(rename = "заочная")]
    Extramural,
    #[serde(rename = "очная")]
    FullTime,
}

impl StudyForm {
    /// Order in which the labels are searched for. "очная" is a substring of both
    /// longer labels, so it must come last.
    pub const DETECTION_ORDER: [StudyForm; 3] =
        [StudyForm::PartTime, StudyForm::Extramural, StudyForm::FullTime];

    pub fn label(self) -> &'static str {
        match self {
            StudyForm::PartTime => "очно-заочная",
            StudyForm::Extramural => "заочная",
            StudyForm::FullTime => "очная",
        }
    }
}

/// Language of instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Language {
    #[serde(rename = "RUS")]
    Russian,
    #[serde(rename = "ENG")]
    English,
    #[serde(rename = "RUS+ENG")]
    Bilingual,
}

/// Completeness verdict of a finalized record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Partial,
    Failed,
}

/// Identity and run-level values every page starts from.
#[derive(Debug, Clone)]
pub struct PageContext {
    pub campus: String,
    pub admission_year: u32,
    pub retrieved_at: String,
}

/// A program record while it is being assembled. Extractors write disjoint fields;
/// once complete it is handed to `validation::finalize` and becomes a `ProgramRecord`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Program {
    // Identity
    pub slug: String,
    pub name: String,
    pub faculty: String,
    pub codes: Vec<String>,
    pub category: String,
    pub url: String,
    pub campus: String,
    pub admission_year: u32,
    pub retrieved_at: String,

    // Admission meta
    pub budget_places: Option<u32>,
    pub paid_places: Option<u32>,
    pub duration: String,
    pub form: Option<StudyForm>,
    pub language: Option<Language>,
    pub exams: Vec<ExamRequirement>,

    // Content
    pub description: String,
    pub what_to_study: String,
    pub advantages: String,
    pub career: String,
    pub admission_info: String,
    pub specializations: Vec<String>,
}

impl Program {
    /// Creates an empty record carrying the configured identity fields.
    pub fn seeded(config: &ProgramConfig, context: &PageContext) -> Self {
        Self {
            slug: config.slug.clone(),
            name: config.name.clone(),
            faculty: config.faculty.clone(),
            codes: config.codes.clone(),
            category: config.category.clone(),
            url: config.url.clone(),
            campus: context.campus.clone(),
            admission_year: context.admission_year,
            retrieved_at: context.retrieved_at.clone(),
            ..Self::default()
        }
    }
}

/// A validated, read-only program record. Status, errors and warnings are written
/// exactly once by the validator; there are no setters.
#[derive(Debug, Clone, Serialize)]
pub struct ProgramRecord {
    #[serde(flatten)]
    program: Program,
    status: Status,
    errors: Vec<String>,
    warnings: Vec<String>,
}

impl ProgramRecord {
    pub(crate) fn new(program: Program, status: Status, errors: Vec<String>, warnings: Vec<String>) -> Self {
        Self { program, status, errors, warnings }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn slug(&self) -> &str {
        &self.program.slug
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_copies_identity() {
        let config = ProgramConfig {
            slug: "economics".to_string(),
            name: "Экономика".to_string(),
            codes: vec!["38.03.01".to_string()],
            ..ProgramConfig::default()
        };
        let context = PageContext {
            campus: "moscow".to_string(),
            admission_year: 2025,
            retrieved_at: "2025-06-01T00:00:00+00:00".to_string(),
        };

        let program = Program::seeded(&config, &context);
        assert_eq!(program.slug, "economics");
        assert_eq!(program.codes, vec!["38.03.01"]);
        assert_eq!(program.campus, "moscow");
        assert_eq!(program.admission_year, 2025);
        assert!(program.budget_places.is_none());
        assert!(program.exams.is_empty());
    }

    #[test]
    fn test_record_serializes_flat() {
        let program = Program {
            slug: "law".to_string(),
            form: Some(StudyForm::PartTime),
            language: Some(Language::Bilingual),
            ..Program::default()
        };
        let record = ProgramRecord::new(program, Status::Partial, vec![], vec!["missing_important:exams".to_string()]);
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["slug"], "law");
        assert_eq!(json["form"], "очно-заочная");
        assert_eq!(json["language"], "RUS+ENG");
        assert_eq!(json["status"], "partial");
        assert_eq!(json["warnings"][0], "missing_important:exams");
        assert!(json["budget_places"].is_null());
    }
}
