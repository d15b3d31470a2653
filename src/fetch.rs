//! Resource fetching.
//!
//! A [`Fetcher`] retrieves resources, API documentations and submits form
//! requests. Fetchers return plain JSON; expansion is the browser's job.

use std::path::PathBuf;

use serde_json::Value;
use tracing::debug;

use crate::error::HydraError;
use crate::form::FormRequest;
use crate::loader::{is_url, load_document};

#[cfg(feature = "remote")]
use crate::{
    config::{resolve_url, ClientConfig},
    loader::{load_document_str, parse_link_header, JSON_LD},
    vocab::hydra,
};

/// A fetched resource and the API documentation it announced.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedResource {
    pub data: Value,
    /// Absolute API documentation URL from the response's `Link` header.
    pub api_doc_url: Option<String>,
}

pub trait Fetcher {
    /// Fetch the resource at `iri`.
    fn fetch_resource(&self, iri: &str) -> Result<FetchedResource, HydraError>;

    /// Fetch the API documentation at `iri`.
    fn fetch_api_documentation(&self, iri: &str) -> Result<Value, HydraError>;

    /// Send a form request. Returns the response body, if there is one.
    fn submit(&self, request: &FormRequest) -> Result<Option<Value>, HydraError>;
}

/// Blocking HTTP fetcher.
///
/// Requires the `remote` feature (enabled by default).
#[cfg(feature = "remote")]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

#[cfg(feature = "remote")]
impl HttpFetcher {
    /// # Errors
    ///
    /// Returns `HydraError::InvalidConfig` if the HTTP client cannot be built.
    pub fn new(config: &ClientConfig) -> Result<Self, HydraError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| HydraError::InvalidConfig {
                message: format!("cannot build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, HydraError> {
        self.client
            .get(url)
            .header(reqwest::header::ACCEPT, JSON_LD)
            .send()
            .and_then(|response| response.error_for_status())
            .map_err(|e| fetch_failure(url, e))
    }
}

#[cfg(feature = "remote")]
fn fetch_failure(url: &str, e: reqwest::Error) -> HydraError {
    HydraError::FetchFailure {
        url: url.to_string(),
        message: e.to_string(),
    }
}

#[cfg(feature = "remote")]
impl Fetcher for HttpFetcher {
    fn fetch_resource(&self, iri: &str) -> Result<FetchedResource, HydraError> {
        let response = self.get(iri)?;
        let final_url = response.url().to_string();

        let api_doc_url = response
            .headers()
            .get_all(reqwest::header::LINK)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(|header| parse_link_header(header, hydra::API_DOCUMENTATION_REL))
            .map(|target| resolve_url(&final_url, &target))
            .transpose()?;
        debug!(iri, api_doc = ?api_doc_url, "fetched resource");

        let body = response.text().map_err(|e| fetch_failure(iri, e))?;
        Ok(FetchedResource {
            data: load_document_str(&body)?,
            api_doc_url,
        })
    }

    fn fetch_api_documentation(&self, iri: &str) -> Result<Value, HydraError> {
        let body = self
            .get(iri)?
            .text()
            .map_err(|e| fetch_failure(iri, e))?;
        load_document_str(&body)
    }

    fn submit(&self, request: &FormRequest) -> Result<Option<Value>, HydraError> {
        let method = reqwest::Method::from_bytes(request.method.as_bytes()).map_err(|e| {
            HydraError::FetchFailure {
                url: request.url.clone(),
                message: e.to_string(),
            }
        })?;

        let body = self
            .client
            .request(method, &request.url)
            .header(reqwest::header::ACCEPT, JSON_LD)
            .header(reqwest::header::CONTENT_TYPE, JSON_LD)
            .body(request.body.to_string())
            .send()
            .and_then(|response| response.error_for_status())
            .and_then(|response| response.text())
            .map_err(|e| fetch_failure(&request.url, e))?;
        debug!(method = %request.method, url = %request.url, "submitted form");

        if body.trim().is_empty() {
            Ok(None)
        } else {
            load_document_str(&body).map(Some)
        }
    }
}

/// Read-only fetcher over a directory of JSON documents.
///
/// Resource IRIs map to files below `base_dir`: the part after `base_url`
/// (or the URL path when no base URL is set) is the relative file path,
/// with `.json` appended when it has no extension and `index.json` standing
/// in for the root.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    base_dir: PathBuf,
    base_url: Option<String>,
}

impl FileFetcher {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// File path backing `iri`.
    pub fn path_for(&self, iri: &str) -> PathBuf {
        let relative = match self.base_url.as_deref().and_then(|b| iri.strip_prefix(b)) {
            Some(rest) => rest.to_string(),
            None if is_url(iri) => url::Url::parse(iri)
                .map(|u| u.path().to_string())
                .unwrap_or_default(),
            None => iri.to_string(),
        };
        let relative = relative.trim_start_matches('/');

        if relative.is_empty() {
            return self.base_dir.join("index.json");
        }
        let path = self.base_dir.join(relative);
        if path.extension().is_none() {
            path.with_extension("json")
        } else {
            path
        }
    }

    fn load(&self, iri: &str) -> Result<Value, HydraError> {
        let path = self.path_for(iri);
        debug!(iri, path = %path.display(), "loading local document");
        load_document(&path)
    }
}

impl Fetcher for FileFetcher {
    fn fetch_resource(&self, iri: &str) -> Result<FetchedResource, HydraError> {
        Ok(FetchedResource {
            data: self.load(iri)?,
            api_doc_url: None,
        })
    }

    fn fetch_api_documentation(&self, iri: &str) -> Result<Value, HydraError> {
        self.load(iri)
    }

    fn submit(&self, request: &FormRequest) -> Result<Option<Value>, HydraError> {
        Err(HydraError::FetchFailure {
            url: request.url.clone(),
            message: "local documents are read-only".to_string(),
        })
    }
}
