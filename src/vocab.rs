//! Vocabulary IRIs used by the resolver.
//!
//! These are fixed: the client only understands documents that use these
//! exact terms after expansion.

/// Hydra core vocabulary.
pub mod hydra {
    // Classes
    pub const API_DOCUMENTATION: &str = "http://www.w3.org/ns/hydra/core#ApiDocumentation";
    pub const COLLECTION: &str = "http://www.w3.org/ns/hydra/core#Collection";
    pub const PAGED_COLLECTION: &str = "http://www.w3.org/ns/hydra/core#PagedCollection";
    pub const LINK: &str = "http://www.w3.org/ns/hydra/core#Link";

    // Properties
    pub const SUPPORTED_CLASS: &str = "http://www.w3.org/ns/hydra/core#supportedClass";
    pub const SUPPORTED_PROPERTY: &str = "http://www.w3.org/ns/hydra/core#supportedProperty";
    pub const SUPPORTED_OPERATION: &str = "http://www.w3.org/ns/hydra/core#supportedOperation";
    pub const PROPERTY: &str = "http://www.w3.org/ns/hydra/core#property";
    pub const METHOD: &str = "http://www.w3.org/ns/hydra/core#method";
    pub const EXPECTS: &str = "http://www.w3.org/ns/hydra/core#expects";
    pub const RETURNS: &str = "http://www.w3.org/ns/hydra/core#returns";
    pub const MEMBER: &str = "http://www.w3.org/ns/hydra/core#member";
    pub const TITLE: &str = "http://www.w3.org/ns/hydra/core#title";
    pub const DESCRIPTION: &str = "http://www.w3.org/ns/hydra/core#description";
    pub const REQUIRED: &str = "http://www.w3.org/ns/hydra/core#required";
    pub const READABLE: &str = "http://www.w3.org/ns/hydra/core#readable";
    pub const WRITEABLE: &str = "http://www.w3.org/ns/hydra/core#writeable";
    pub const ENTRYPOINT: &str = "http://www.w3.org/ns/hydra/core#entrypoint";

    /// Link relation announcing the API documentation of a response.
    pub const API_DOCUMENTATION_REL: &str = "http://www.w3.org/ns/hydra/core#apiDocumentation";

    /// Return types that make a GET operation navigate to a collection view.
    pub const COLLECTION_TYPES: &[&str] = &[COLLECTION, PAGED_COLLECTION];
}

/// RDF Schema.
pub mod rdfs {
    pub const LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
    pub const COMMENT: &str = "http://www.w3.org/2000/01/rdf-schema#comment";
    pub const SUB_CLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
    pub const RANGE: &str = "http://www.w3.org/2000/01/rdf-schema#range";
}

/// RDF syntax.
pub mod rdf {
    pub const PROPERTY: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#Property";
}

/// OSLC core, resource shape terms only.
pub mod oslc {
    pub const RESOURCE_SHAPE: &str = "http://open-services.net/ns/core#resourceShape";
    pub const PROPERTY: &str = "http://open-services.net/ns/core#property";
    pub const PROPERTY_DEFINITION: &str = "http://open-services.net/ns/core#propertyDefinition";
    pub const ALLOWED_VALUE: &str = "http://open-services.net/ns/core#allowedValue";
    pub const ALLOWED_VALUES: &str = "http://open-services.net/ns/core#allowedValues";
}

/// UI-styling extension vocabulary.
///
/// Styling documents have the shape of an API documentation (supported
/// classes wrapping supported properties) and annotate properties with these
/// terms. The values-constraint terms annotate supported properties in the
/// API documentation itself.
pub mod ui {
    pub const ORDER: &str = "http://vocab.dataunity.org/ui#order";
    pub const CSS_CLASS: &str = "http://vocab.dataunity.org/ui#cssClass";
    pub const SWAP: &str = "http://vocab.dataunity.org/ui#swap";

    pub const VALUES_CONSTRAINT: &str = "http://vocab.dataunity.org/ui#valuesConstraint";
    pub const VALUES: &str = "http://vocab.dataunity.org/ui#values";
    pub const VALUE: &str = "http://vocab.dataunity.org/ui#value";
    pub const LABEL: &str = "http://vocab.dataunity.org/ui#label";
    pub const VALUES_COLLECTION: &str = "http://vocab.dataunity.org/ui#valuesCollection";
    pub const MEMBER_VALUE_PROPERTY: &str = "http://vocab.dataunity.org/ui#memberValueProperty";
    pub const MEMBER_LABEL_PROPERTY: &str = "http://vocab.dataunity.org/ui#memberLabelProperty";
    pub const USE_IDENTIFIER: &str = "http://vocab.dataunity.org/ui#useIdentifier";
}
