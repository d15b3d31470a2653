//! Client configuration.
//!
//! Loaded from a JSON file or assembled with the builder setters:
//!
//! ```json
//! {
//!   "entryPoint": "http://localhost:6543/api",
//!   "uiStyling": "styling.jsonld",
//!   "routes": [
//!     {
//!       "path": "/events/{resource}",
//!       "supportedClass": "http://example.com/vocab#Event",
//!       "supportedOperation": "http://example.com/vocab#listEvents",
//!       "view": "calendar"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::HydraError;
use crate::loader::{is_url, load_document};
use crate::router::{RouteRegistration, RouteTable};

/// Path of the API documentation when a response does not announce one.
pub const DEFAULT_API_DOC_PATH: &str = "/hydra/api-doc";

/// Default timeout for HTTP requests, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_api_doc_path() -> String {
    DEFAULT_API_DOC_PATH.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
    /// IRI of the API entry point. Required before browsing.
    #[serde(default)]
    pub entry_point: Option<String>,
    /// UI-styling document source: file path or URL.
    #[serde(default)]
    pub ui_styling: Option<String>,
    /// Custom views for GET operations.
    #[serde(default)]
    pub routes: Vec<RouteRegistration>,
    #[serde(default = "default_api_doc_path")]
    pub default_api_doc_path: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            entry_point: None,
            ui_styling: None,
            routes: Vec::new(),
            default_api_doc_path: default_api_doc_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration file.
    ///
    /// # Errors
    ///
    /// Returns the loader's errors for unreadable files, or
    /// `HydraError::InvalidConfig` when the JSON does not describe a
    /// configuration.
    pub fn load(path: &Path) -> Result<Self, HydraError> {
        let value = load_document(path)?;
        serde_json::from_value(value).map_err(|e| HydraError::InvalidConfig {
            message: format!("{}: {}", path.display(), e),
        })
    }

    pub fn entry_point(mut self, iri: impl Into<String>) -> Self {
        self.entry_point = Some(iri.into());
        self
    }

    pub fn ui_styling(mut self, source: impl Into<String>) -> Self {
        self.ui_styling = Some(source.into());
        self
    }

    pub fn route(mut self, registration: RouteRegistration) -> Self {
        self.routes.push(registration);
        self
    }

    pub fn default_api_doc_path(mut self, path: impl Into<String>) -> Self {
        self.default_api_doc_path = path.into();
        self
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check the configuration and return the entry point.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::MissingEntryPoint` when no (or an empty) entry
    /// point is set, and `HydraError::InvalidConfig` for an unparseable
    /// entry-point URL or a zero timeout.
    pub fn validate(&self) -> Result<&str, HydraError> {
        let entry_point = self
            .entry_point
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
            .ok_or(HydraError::MissingEntryPoint)?;

        if is_url(entry_point) {
            Url::parse(entry_point).map_err(|e| HydraError::InvalidConfig {
                message: format!("entry point {entry_point}: {e}"),
            })?;
        }
        if self.timeout_secs == 0 {
            return Err(HydraError::InvalidConfig {
                message: "timeoutSecs must be greater than zero".to_string(),
            });
        }
        Ok(entry_point)
    }

    /// Route table built from the configured registrations.
    pub fn route_table(&self) -> RouteTable {
        RouteTable::from_registrations(self.routes.iter().cloned())
    }

    /// The default API documentation URL for a resource at `base`.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::InvalidConfig` when `base` is not an absolute URL.
    pub fn default_api_doc_url(&self, base: &str) -> Result<String, HydraError> {
        resolve_url(base, &self.default_api_doc_path)
    }
}

/// Resolve `reference` against `base`, as a browser resolves a link.
///
/// # Errors
///
/// Returns `HydraError::InvalidConfig` if either part is not a valid URL.
pub fn resolve_url(base: &str, reference: &str) -> Result<String, HydraError> {
    Url::parse(base)
        .and_then(|base| base.join(reference))
        .map(String::from)
        .map_err(|e| HydraError::InvalidConfig {
            message: format!("cannot resolve {reference} against {base}: {e}"),
        })
}
