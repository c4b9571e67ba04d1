// src/storage/mod.rs
use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::manifest::Manifest;
use crate::models::ProgramRecord;
use crate::utils::error::StorageError;

const RAW_DIR: &str = "raw";
const PARSED_DIR: &str = "parsed";
const DEBUG_DIR: &str = "debug";
const ALL_PROGRAMS_FILE: &str = "all_programs.json";
const MANIFEST_FILE: &str = "manifest.json";

/// Writes run outputs under a base directory:
/// `raw/<slug>.html`, `parsed/<slug>.json`, `all_programs.json`, `manifest.json`.
pub struct StorageManager {
    base_dir: PathBuf,
}

impl StorageManager {
    /// Creates a new StorageManager, creating the base, raw and parsed directories
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self, StorageError> {
        let base_path = base_dir.as_ref().to_path_buf();

        for dir in [RAW_DIR, PARSED_DIR] {
            fs::create_dir_all(base_path.join(dir)).map_err(StorageError::IoError)?;
        }

        Ok(Self { base_dir: base_path })
    }

    /// Saves the downloaded page exactly as received
    pub fn save_raw(&self, slug: &str, payload: &[u8]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(RAW_DIR).join(format!("{}.html", slug));
        fs::write(&file_path, payload).map_err(StorageError::IoError)?;
        tracing::debug!("Saved raw page to {}", file_path.display());
        Ok(file_path)
    }

    /// Saves one finalized record as pretty JSON
    pub fn save_record(&self, slug: &str, record: &ProgramRecord) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(PARSED_DIR).join(format!("{}.json", slug));
        write_json(&file_path, record)?;
        Ok(file_path)
    }

    pub fn save_all(&self, records: &[ProgramRecord]) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(ALL_PROGRAMS_FILE);
        write_json(&file_path, records)?;
        tracing::info!("Saved {} records to {}", records.len(), file_path.display());
        Ok(file_path)
    }

    pub fn save_manifest(&self, manifest: &Manifest) -> Result<PathBuf, StorageError> {
        let file_path = self.base_dir.join(MANIFEST_FILE);
        write_json(&file_path, manifest)?;
        tracing::info!("Saved manifest to {}", file_path.display());
        Ok(file_path)
    }

    /// Path for an annotated debug copy of a page; creates `debug/` on first use
    pub fn debug_path(&self, slug: &str) -> Result<PathBuf, StorageError> {
        let dir = self.base_dir.join(DEBUG_DIR);
        fs::create_dir_all(&dir).map_err(StorageError::IoError)?;
        Ok(dir.join(format!("{}.html", slug)))
    }
}

fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    let body = serde_json::to_string_pretty(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;
    fs::write(path, body).map_err(StorageError::IoError)
}
