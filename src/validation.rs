// src/validation.rs
use crate::models::{Program, ProgramRecord, Status};
use crate::schema::{IMPORTANT_FIELDS, REQUIRED_FIELDS};

/// Checks field presence and freezes the program into a `ProgramRecord`.
///
/// Every missing required field adds `missing_required:<field>` to the errors and every
/// missing important field adds `missing_important:<field>` to the warnings.
/// Any error means `Failed`, otherwise any warning means `Partial`, otherwise `Success`.
pub fn finalize(program: Program) -> ProgramRecord {
    let errors: Vec<String> = REQUIRED_FIELDS
        .iter()
        .filter(|field| !(field.is_present)(&program))
        .map(|field| format!("missing_required:{}", field.name))
        .collect();

    let warnings: Vec<String> = IMPORTANT_FIELDS
        .iter()
        .filter(|field| !(field.is_present)(&program))
        .map(|field| format!("missing_important:{}", field.name))
        .collect();

    let status = if !errors.is_empty() {
        Status::Failed
    } else if !warnings.is_empty() {
        Status::Partial
    } else {
        Status::Success
    };

    tracing::debug!(
        "Validated '{}': {:?} ({} errors, {} warnings)",
        program.slug,
        status,
        errors.len(),
        warnings.len()
    );

    ProgramRecord::new(program, status, errors, warnings)
}
