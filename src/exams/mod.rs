// src/exams/mod.rs
pub mod directory;
pub mod matcher;
pub mod shared;

pub use directory::{DirectoryEntry, ExamDirectory};
pub use matcher::{match_exams, normalize_name};
pub use shared::SharedExamDirectory;
