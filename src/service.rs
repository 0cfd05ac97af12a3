//! Interfaces to the CSV query service and the query workflow.
//!
//! The HTTP service that stores CSV files and answers questions about them
//! lives outside this crate. Only its shape is described here, as traits,
//! together with the one piece of orchestration that involves history:
//! ask a question, then remember the answer.

use crate::history::{QueryHistory, StorageBackend};
use serde::{Deserialize, Serialize};

/// A CSV file known to the query service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvFile {
    /// Identifier used when querying the file.
    pub file_id: String,

    /// Display name of the file.
    pub file_name: String,
}

impl CsvFile {
    pub fn new(file_id: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            file_id: file_id.into(),
            file_name: file_name.into(),
        }
    }
}

/// Errors reported by the query service.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// The service could not be reached.
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with an error detail.
    #[error("Service error: {0}")]
    Rejected(String),

    /// The referenced file does not exist.
    #[error("File not found: {0}")]
    FileNotFound(String),
}

/// Answers natural-language questions about a CSV file.
pub trait QueryService {
    /// Returns the response text for `query` against `file_id`.
    fn query_file(&self, file_id: &str, query: &str) -> Result<String, ServiceError>;
}

/// Supplies the files that can be queried.
pub trait FileRegistry {
    fn list_files(&self) -> Result<Vec<CsvFile>, ServiceError>;
}

/// Runs a query and records the answer in history.
///
/// On success the query, the response, and the file's current name are
/// saved and the response is returned. A failed query records nothing.
/// History failures are logged and never change the returned result.
pub fn ask_and_record<Q, S>(
    service: &Q,
    history: &QueryHistory<S>,
    file: &CsvFile,
    query: &str,
) -> Result<String, ServiceError>
where
    Q: QueryService + ?Sized,
    S: StorageBackend,
{
    let response = service.query_file(&file.file_id, query)?;

    history.record(
        file.file_id.as_str(),
        file.file_name.as_str(),
        query,
        response.as_str(),
    );

    Ok(response)
}
