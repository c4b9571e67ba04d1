// src/config.rs
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::utils::error::AppError;

pub const DEFAULT_CAMPUS: &str = "moscow";

/// Per-program entry of the run configuration. Every field is optional and defaults to empty.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProgramConfig {
    pub slug: String,
    pub name: String,
    pub faculty: String,
    pub url: String,
    pub category: String,
    pub codes: Vec<String>,
}

/// Top-level run configuration file.
#[derive(Debug, Clone, Deserialize)]
pub struct RunConfig {
    #[serde(default = "default_campus")]
    pub campus: String,
    #[serde(default)]
    pub programs: Vec<ProgramConfig>,
}

fn default_campus() -> String {
    DEFAULT_CAMPUS.to_string()
}

impl RunConfig {
    /// Reads and parses the configuration file. Any failure here is fatal for the run.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(AppError::Config(format!("{} not found", path.display())));
        }

        let raw = fs::read_to_string(path)?;
        let config = Self::from_json(&raw)
            .map_err(|e| AppError::Config(format!("Cannot parse {}: {}", path.display(), e)))?;

        tracing::debug!("Loaded {} program entries for campus '{}'", config.programs.len(), config.campus);
        Ok(config)
    }

    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Keeps only the first `limit` programs, if a limit is given.
    pub fn truncate(&mut self, limit: Option<usize>) {
        if let Some(limit) = limit {
            self.programs.truncate(limit);
        }
    }
}
