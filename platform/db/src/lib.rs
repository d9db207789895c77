//! In-memory fixture store.
//!
//! The dataset is loaded once at startup (built-in sample or a JSON file),
//! validated, then shared read-only for the life of the process. Query
//! functions are pure and deterministic; latency and faults are layered on
//! top by the caller.

mod dataset;
mod fixture;
mod query;

use std::path::PathBuf;

use serde::Deserialize;
use thiserror::Error;

pub use dataset::Dataset;
pub use query::{
    DEFAULT_LIMIT, DatasetStats, MAX_LIMIT, Page, ProjectFilter, SearchResults, SearchScope,
};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("failed to read fixture {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed fixture: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{table} entry keyed {key} carries id {id}")]
    KeyMismatch {
        table: &'static str,
        key: i64,
        id: i64,
    },
    #[error("employee {employee_id} references unknown department {department:?}")]
    UnknownDepartment {
        employee_id: i64,
        department: String,
    },
    #[error("employee {employee_id} references missing manager {manager_id}")]
    DanglingManager { employee_id: i64, manager_id: i64 },
    #[error("manager chain starting at employee {employee_id} loops")]
    ManagerCycle { employee_id: i64 },
    #[error("limit must be between 1 and {max}, got {got}")]
    InvalidLimit { got: i64, max: usize },
    #[error("offset must be non-negative, got {0}")]
    InvalidOffset(i64),
}

pub type DbResult<T> = Result<T, DbError>;

/// Where the dataset comes from. Environment driven, like the rest of the
/// server configuration.
#[derive(Clone, Debug, Deserialize)]
pub struct FixtureSettings {
    #[serde(default = "default_path_key")]
    env_key: String,
}

fn default_path_key() -> String {
    "FIXTURE_PATH".to_string()
}

impl Default for FixtureSettings {
    fn default() -> Self {
        Self::from_env()
    }
}

impl FixtureSettings {
    pub fn new(env_key: impl Into<String>) -> Self {
        Self {
            env_key: env_key.into(),
        }
    }

    pub fn from_env() -> Self {
        Self::new(default_path_key())
    }

    /// Fixture file named by the environment, if any.
    pub fn fixture_path(&self) -> Option<PathBuf> {
        std::env::var_os(&self.env_key)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
    }

    /// Load and validate the configured fixture, falling back to the
    /// built-in sample.
    pub fn load(&self) -> DbResult<Dataset> {
        let dataset = match self.fixture_path() {
            Some(path) => Dataset::from_json_file(&path)?,
            None => Dataset::builtin(),
        };
        dataset.validate()?;
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_env_key_falls_back_to_builtin() {
        let settings = FixtureSettings::new("PLATFORM_DB_TEST_UNSET_FIXTURE");
        assert!(settings.fixture_path().is_none());
        let dataset = settings.load().unwrap();
        assert_eq!(dataset.employee_count(), 10);
    }

    #[test]
    fn errors_read_like_sentences() {
        let err = DbError::InvalidLimit { got: 0, max: MAX_LIMIT };
        assert_eq!(err.to_string(), "limit must be between 1 and 100, got 0");
        let err = DbError::DanglingManager {
            employee_id: 4,
            manager_id: 42,
        };
        assert_eq!(err.to_string(), "employee 4 references missing manager 42");
    }
}
