// src/extractors/mod.rs
pub mod fields;
pub mod listings;
pub mod page;
pub mod sections;

pub use page::NormalizedPage;

use crate::config::ProgramConfig;
use crate::exams::{matcher, ExamDirectory};
use crate::models::{PageContext, Program, ProgramRecord};
use crate::validation;

/// Runs every page heuristic and returns the assembled, not yet validated record.
/// Exams come only from the page here; see `matcher::fill_missing_exams`.
pub fn extract_program(page: &NormalizedPage, config: &ProgramConfig, context: &PageContext) -> Program {
    let mut program = Program::seeded(config, context);

    program.budget_places = fields::budget_places(page);
    program.paid_places = fields::paid_places(page);
    program.duration = fields::duration(page);
    program.form = fields::study_form(page);
    program.language = Some(fields::language(page));
    program.description = fields::description(page);
    program.exams = listings::inline_exams(page);
    program.specializations = listings::specializations(page);
    sections::classify_sections(page, &mut program);

    program
}

/// Parses one downloaded page into a finalized record using an already built directory.
pub fn parse_page(
    payload: &[u8],
    config: &ProgramConfig,
    context: &PageContext,
    directory: &ExamDirectory,
) -> ProgramRecord {
    let page = NormalizedPage::from_bytes(payload);
    let mut program = extract_program(&page, config, context);
    matcher::fill_missing_exams(&mut program, directory);
    validation::finalize(program)
}
