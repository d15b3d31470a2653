//! Document loading from files, strings and HTTP URLs.
//!
//! Loaded documents are plain JSON. They go through an [`Expander`] before
//! anything reads them as JSON-LD.

use std::path::Path;

use serde_json::Value;

use crate::error::HydraError;

#[cfg(feature = "remote")]
use std::time::Duration;

/// Default timeout for HTTP requests (10 seconds).
#[cfg(feature = "remote")]
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Media type requested from Hydra servers.
pub const JSON_LD: &str = "application/ld+json";

/// Load a JSON document from a file path.
///
/// # Errors
///
/// Returns `HydraError::FileNotFound` if the file doesn't exist,
/// or `HydraError::InvalidJson` if the file isn't valid JSON.
pub fn load_document(path: &Path) -> Result<Value, HydraError> {
    if !path.exists() {
        return Err(HydraError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| HydraError::ReadError {
        path: path.to_path_buf(),
        source,
    })?;

    load_document_str(&content)
}

/// Load a JSON document from a string.
///
/// # Errors
///
/// Returns `HydraError::InvalidJson` if the string isn't valid JSON.
pub fn load_document_str(content: &str) -> Result<Value, HydraError> {
    serde_json::from_str(content).map_err(|source| HydraError::InvalidJson { source })
}

/// Load a JSON document from an HTTP/HTTPS URL.
///
/// Requires the `remote` feature (enabled by default).
///
/// # Errors
///
/// Returns `HydraError::FetchFailure` if the request fails or the response
/// isn't valid JSON.
#[cfg(feature = "remote")]
pub fn load_document_url(url: &str) -> Result<Value, HydraError> {
    let fetch_failure = |e: reqwest::Error| HydraError::FetchFailure {
        url: url.to_string(),
        message: e.to_string(),
    };

    let client = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .build()
        .map_err(fetch_failure)?;

    client
        .get(url)
        .header(reqwest::header::ACCEPT, JSON_LD)
        .send()
        .and_then(|response| response.error_for_status())
        .and_then(|response| response.json())
        .map_err(fetch_failure)
}

/// Check if a string looks like a URL (starts with http:// or https://).
pub fn is_url(s: &str) -> bool {
    s.starts_with("http://") || s.starts_with("https://")
}

/// Load a document from a file path or URL.
///
/// URL loading requires the `remote` feature.
///
/// # Errors
///
/// Returns appropriate errors based on the source type.
pub fn load_document_auto(source: &str) -> Result<Value, HydraError> {
    if is_url(source) {
        #[cfg(feature = "remote")]
        {
            load_document_url(source)
        }
        #[cfg(not(feature = "remote"))]
        {
            Err(HydraError::FileNotFound {
                path: std::path::PathBuf::from(source),
            })
        }
    } else {
        load_document(Path::new(source))
    }
}

/// Target of the first link in an HTTP `Link` header whose `rel` contains `rel`.
///
/// Targets are returned as written; relative targets still have to be
/// resolved against the request URL.
///
/// ```
/// use hydra_client::parse_link_header;
///
/// let header = r#"</doc>; rel="http://www.w3.org/ns/hydra/core#apiDocumentation""#;
/// assert_eq!(
///     parse_link_header(header, "http://www.w3.org/ns/hydra/core#apiDocumentation"),
///     Some("/doc".to_string())
/// );
/// ```
pub fn parse_link_header(header: &str, rel: &str) -> Option<String> {
    header.split(',').find_map(|link| {
        let mut parts = link.split(';');
        let target = parts
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;
        let matches = parts.any(|param| {
            let Some((name, value)) = param.split_once('=') else {
                return false;
            };
            name.trim().eq_ignore_ascii_case("rel")
                && value
                    .trim()
                    .trim_matches('"')
                    .split_whitespace()
                    .any(|r| r == rel)
        });
        matches.then(|| target.to_string())
    })
}

/// Turns a loaded JSON-LD document into expanded form.
pub trait Expander {
    /// # Errors
    ///
    /// Returns `HydraError::ExpansionFailure` when the document cannot be expanded.
    fn expand(&self, document: Value) -> Result<Value, HydraError>;
}

/// Expander for servers that already answer in expanded form.
///
/// Documents are passed through unchanged. A document still carrying an
/// `@context` is compact and is rejected.
#[derive(Debug, Clone, Copy, Default)]
pub struct PreExpanded;

impl Expander for PreExpanded {
    fn expand(&self, document: Value) -> Result<Value, HydraError> {
        let compact = match &document {
            Value::Object(obj) => obj.contains_key("@context"),
            Value::Array(arr) => arr.iter().any(|node| node.get("@context").is_some()),
            _ => {
                return Err(HydraError::ExpansionFailure {
                    message: format!(
                        "expected a node object or array, got {}",
                        crate::jsonld::json_type_name(&document)
                    ),
                })
            }
        };
        if compact {
            return Err(HydraError::ExpansionFailure {
                message: "document has an @context; only expanded JSON-LD is accepted".to_string(),
            });
        }
        Ok(document)
    }
}
