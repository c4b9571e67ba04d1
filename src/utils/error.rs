// src/utils/error.rs
use thiserror::Error;

// Errors raised while fetching a page from the network
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network request failed: {0}")]
    Network(#[from] reqwest::Error), // Automatically convert reqwest errors

    #[error("HTTP error: {0}")]
    Http(reqwest::StatusCode), // e.g., 404 Not Found, 503 Service Unavailable
}

// Reasons the exam directory could not be built. These never reach callers:
// the directory degrades to an empty mapping instead.
#[derive(Error, Debug)]
pub enum ExamDirectoryError {
    #[error("No content returned for exam directory source {0}")]
    NoContent(String),

    #[error("Exam directory table not found (found {0} tables, need at least 2)")]
    TableMissing(usize),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error), // Automatically convert IO errors

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}
