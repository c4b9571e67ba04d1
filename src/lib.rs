// src/lib.rs
//! Extraction of academic program records from program pages, exam requirement
//! lookup, completeness validation and run-level coverage statistics.

pub mod config;
pub mod exams;
pub mod extractors;
pub mod fetch;
pub mod manifest;
pub mod models;
pub mod pipeline;
pub mod schema;
pub mod storage;
pub mod utils;
pub mod validation;

pub use config::{ProgramConfig, RunConfig};
pub use models::{ExamRequirement, Language, PageContext, Program, ProgramRecord, Status, StudyForm};
