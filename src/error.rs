//! Error types for Hydra resolution, form handling and document loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while resolving Hydra documents into pages, routes and forms.
#[derive(Debug, Error)]
pub enum HydraError {
    // IO errors (exit code 3)
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("cannot read {path}: {source}")]
    ReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {url}: {message}")]
    FetchFailure { url: String, message: String },

    // Parse errors (exit code 2)
    #[error("invalid JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON-LD expansion failed: {message}")]
    ExpansionFailure { message: String },

    // Document contract errors (exit code 2)
    #[error("malformed reference: expected exactly one @id value, found {found}")]
    MalformedReference { found: usize },

    #[error("property <{property}> is not documented for class(es) {}", classes.join(", "))]
    UnknownProperty {
        property: String,
        classes: Vec<String>,
    },

    #[error("supported property in class <{class}> has no hydra:property")]
    MissingPropertyBinding { class: String },

    #[error("operation <{operation}> expects no documented class")]
    UnresolvableFormClass { operation: String },

    #[error("operation <{operation}> uses unsupported method \"{method}\"")]
    UnsupportedOperationMethod { operation: String, method: String },

    #[error("operation <{operation}> is not documented")]
    UnknownOperation { operation: String },

    #[error("no form session with id \"{id}\"")]
    UnknownSession { id: String },

    #[error("no page is loaded")]
    NoPageLoaded,

    // Configuration errors (exit code 2)
    #[error("no entry point configured")]
    MissingEntryPoint,

    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl HydraError {
    /// Returns the exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        match self {
            HydraError::FileNotFound { .. }
            | HydraError::ReadError { .. }
            | HydraError::FetchFailure { .. } => 3,
            _ => 2,
        }
    }

    /// Whether a view should offer to retry the action that failed.
    ///
    /// Only transport and expansion failures qualify; documentation
    /// mismatches fail the same way on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            HydraError::FetchFailure { .. } | HydraError::ExpansionFailure { .. }
        )
    }
}
