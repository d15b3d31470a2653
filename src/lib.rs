//! Hydra Hypermedia Client
//!
//! Resolution of expanded JSON-LD resources against a Hydra API
//! documentation into renderable pages, navigations and forms.
//!
//! Given a resource and the API documentation it announces, this library
//! decides what each property is (a link, a literal), which operations it
//! offers, where activating an operation leads and which form a write
//! operation needs.
//!
//! # Example
//!
//! ```
//! use hydra_client::{build_page, ApiDocumentation, FormSessionStore, NavigationContext, Page, PageItemKind, RouteTable};
//! use serde_json::json;
//!
//! let api_doc = ApiDocumentation::from_expanded(&json!([{
//!     "http://www.w3.org/ns/hydra/core#supportedClass": [{
//!         "@id": "http://schema.org/Person",
//!         "http://www.w3.org/ns/hydra/core#supportedProperty": [{
//!             "http://www.w3.org/ns/hydra/core#property": [{
//!                 "@id": "http://schema.org/name",
//!                 "@type": ["http://www.w3.org/1999/02/22-rdf-syntax-ns#Property"]
//!             }]
//!         }]
//!     }]
//! }]))
//! .unwrap();
//!
//! let resource = json!([{
//!     "@id": "http://example.com/people/1",
//!     "@type": ["http://schema.org/Person"],
//!     "http://schema.org/name": [{ "@value": "Ada" }]
//! }]);
//!
//! let routes = RouteTable::new();
//! let mut sessions = FormSessionStore::new();
//! let mut ctx = NavigationContext::new(&api_doc, &routes, &mut sessions);
//!
//! let Page::Item(page) = build_page(&resource, &mut ctx).unwrap() else {
//!     panic!("expected an item page");
//! };
//! assert_eq!(page.items[0].kind, PageItemKind::Property { value: json!("Ada") });
//! ```
//!
//! # Choice sources
//!
//! | Source | Where | Choices |
//! |--------|-------|---------|
//! | `oslc:allowedValue` | supported property, or the class's resource shape | immediate |
//! | `ui:valuesConstraint` with `ui:values` | supported property | immediate |
//! | `ui:valuesConstraint` with `ui:valuesCollection` | supported property | filled after the collection is fetched |
//!
//! A field without any source is a text field.

mod api_doc;
mod browser;
mod collection;
mod config;
mod context;
mod error;
mod fetch;
mod form;
pub mod jsonld;
mod loader;
mod page;
mod router;
mod styling;
pub mod vocab;

pub use api_doc::{
    AllowedValue, ApiDocumentation, Property, PropertyKind, ResourceShape, SupportedClass,
    SupportedOperation, SupportedProperty, ValuesConstraint,
};
pub use browser::{HydraBrowser, LoadedPage, SubmitOutcome};
pub use collection::{build_collection, CollectionModel, MemberModel};
pub use config::{resolve_url, ClientConfig, DEFAULT_API_DOC_PATH, DEFAULT_TIMEOUT_SECS};
pub use context::NavigationContext;
pub use error::HydraError;
pub use fetch::{FetchedResource, Fetcher, FileFetcher};
pub use form::{
    build_form_model, fill_choices, submit_form, Choice, FieldInput, FormField, FormModel,
    FormRequest, FormSession, FormSessionStore, PendingChoices, SessionId, SessionTicket,
    TYPE_FIELD,
};
pub use jsonld::id_of;
pub use loader::{
    is_url, load_document, load_document_auto, load_document_str, parse_link_header, Expander,
    PreExpanded, JSON_LD,
};
pub use page::{build_page, build_page_items, classify, ItemPage, Page, PageItem, PageItemKind, UNKNOWN_VALUE};
pub use router::{activate, route, Navigation, RouteRegistration, RouteTable, RESOURCE_PLACEHOLDER};
pub use styling::{PropertyStyle, UiStyling};

#[cfg(feature = "remote")]
pub use fetch::HttpFetcher;
#[cfg(feature = "remote")]
pub use loader::load_document_url;
