// src/manifest.rs
use serde::{Serialize, Serializer};

use crate::models::{ProgramRecord, Status};
use crate::schema::COVERAGE_FIELDS;

pub const PIPELINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Run-level values copied into the manifest.
#[derive(Debug, Clone)]
pub struct RunMetadata {
    pub campus: String,
    pub admission_year: u32,
    pub config_path: String,
    pub output_dir: String,
    pub started_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub success: usize,
    pub partial: usize,
    pub failed: usize,
    pub source_types: SourceTypes,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceTypes {
    pub html: usize,
    pub pdf: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FieldCoverage {
    pub count: usize,
    pub total: usize,
    pub percent: f64,
}

/// Coverage per tracked field, serialized as a JSON object in table order.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageTable(Vec<(&'static str, FieldCoverage)>);

impl CoverageTable {
    pub fn get(&self, field: &str) -> Option<&FieldCoverage> {
        self.0.iter().find(|(name, _)| *name == field).map(|(_, coverage)| coverage)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, FieldCoverage)> {
        self.0.iter()
    }
}

impl Serialize for CoverageTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, coverage)| (name, coverage)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedProgram {
    pub slug: String,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartialProgram {
    pub slug: String,
    pub warnings: Vec<String>,
}

/// Per-run report: status counts, field coverage and triage lists.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub pipeline_version: String,
    pub created_at: String,
    pub started_at: String,
    pub config_path: String,
    pub output_dir: String,
    pub campus: String,
    pub admission_year: u32,
    pub statistics: Statistics,
    pub field_coverage: CoverageTable,
    pub failed_programs: Vec<FailedProgram>,
    pub partial_programs: Vec<PartialProgram>,
    pub download_failed: Vec<String>,
}

/// Aggregates a batch of validated records. Pure: no I/O and no clock reads.
pub fn build_manifest(
    records: &[ProgramRecord],
    download_failed: &[String],
    metadata: &RunMetadata,
    created_at: &str,
) -> Manifest {
    let total = records.len();
    let count_status = |status: Status| records.iter().filter(|r| r.status() == status).count();

    let field_coverage = CoverageTable(
        COVERAGE_FIELDS
            .iter()
            .map(|field| {
                let count = records.iter().filter(|r| (field.is_present)(r.program())).count();
                (field.name, FieldCoverage { count, total, percent: percent(count, total) })
            })
            .collect(),
    );

    let failed_programs = records
        .iter()
        .filter(|r| r.status() == Status::Failed)
        .map(|r| FailedProgram { slug: r.slug().to_string(), errors: r.errors().to_vec() })
        .collect();

    let partial_programs = records
        .iter()
        .filter(|r| r.status() == Status::Partial)
        .map(|r| PartialProgram { slug: r.slug().to_string(), warnings: r.warnings().to_vec() })
        .collect();

    Manifest {
        pipeline_version: PIPELINE_VERSION.to_string(),
        created_at: created_at.to_string(),
        started_at: metadata.started_at.clone(),
        config_path: metadata.config_path.clone(),
        output_dir: metadata.output_dir.clone(),
        campus: metadata.campus.clone(),
        admission_year: metadata.admission_year,
        statistics: Statistics {
            total,
            success: count_status(Status::Success),
            partial: count_status(Status::Partial),
            failed: count_status(Status::Failed),
            source_types: SourceTypes { html: total, pdf: 0 },
        },
        field_coverage,
        failed_programs,
        partial_programs,
        download_failed: download_failed.to_vec(),
    }
}

/// Percentage rounded to one decimal; 0.0 for an empty batch.
fn percent(count: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    // Halves go to the even neighbour: 1 of 16 is 6.2, not 6.3
    (1000.0 * count as f64 / total as f64).round_ties_even() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExamRequirement, Language, Program, StudyForm};
    use crate::validation::finalize;

    fn metadata() -> RunMetadata {
        RunMetadata {
            campus: "moscow".to_string(),
            admission_year: 2025,
            config_path: "config/programs_moscow.json".to_string(),
            output_dir: "data/moscow".to_string(),
            started_at: "2025-06-01T10:00:00+00:00".to_string(),
        }
    }

    fn record(slug: &str, budget_places: Option<u32>, faculty: &str) -> ProgramRecord {
        finalize(Program {
            slug: slug.to_string(),
            name: slug.to_uppercase(),
            faculty: faculty.to_string(),
            url: format!("https://example.org/{}", slug),
            duration: "4 года".to_string(),
            form: Some(StudyForm::FullTime),
            language: Some(Language::Russian),
            budget_places,
            exams: vec![ExamRequirement::new("Математика", 60)],
            description: "Описание".to_string(),
            ..Program::default()
        })
    }

    #[test]
    fn test_budget_coverage_half() {
        let records = vec![
            record("a", Some(10), "Ф"),
            record("b", None, "Ф"),
            record("c", Some(25), "Ф"),
            record("d", None, ""),
        ];
        let manifest = build_manifest(&records, &[], &metadata(), "2025-06-01T11:00:00+00:00");

        assert_eq!(
            manifest.field_coverage.get("budget_places"),
            Some(&FieldCoverage { count: 2, total: 4, percent: 50.0 })
        );
        assert_eq!(manifest.statistics.total, 4);
        assert_eq!(manifest.statistics.success, 2);
        assert_eq!(manifest.statistics.partial, 1);
        assert_eq!(manifest.statistics.failed, 1);
        assert_eq!(manifest.failed_programs[0].slug, "d");
        assert_eq!(manifest.failed_programs[0].errors, vec!["missing_required:faculty"]);
        assert_eq!(manifest.partial_programs[0].slug, "b");
        assert_eq!(manifest.partial_programs[0].warnings, vec!["missing_important:budget_places"]);
    }

    #[test]
    fn test_empty_batch() {
        let manifest = build_manifest(&[], &["broken".to_string()], &metadata(), "now");
        assert_eq!(manifest.statistics.total, 0);
        for (_, coverage) in manifest.field_coverage.iter() {
            assert_eq!(coverage.count, 0);
            assert_eq!(coverage.percent, 0.0);
        }
        assert_eq!(manifest.download_failed, vec!["broken"]);
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent(1, 3), 33.3);
        assert_eq!(percent(2, 3), 66.7);
        assert_eq!(percent(3, 3), 100.0);
    }

    #[test]
    fn test_percent_rounds_half_to_even() {
        assert_eq!(percent(1, 16), 6.2);
        assert_eq!(percent(3, 16), 18.8);
        assert_eq!(percent(1, 8), 12.5);
    }

    #[test]
    fn test_serialized_shape_keeps_field_order() {
        let manifest = build_manifest(&[record("a", Some(1), "Ф")], &[], &metadata(), "now");
        let json = serde_json::to_string(&manifest).unwrap();

        let budget = json.find("\"budget_places\"").unwrap();
        let specializations = json.find("\"specializations\"").unwrap();
        assert!(budget < specializations);

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["statistics"]["source_types"]["html"], 1);
        assert_eq!(value["field_coverage"]["duration"]["percent"], 100.0);
        assert_eq!(value["pipeline_version"], PIPELINE_VERSION);
    }
}
