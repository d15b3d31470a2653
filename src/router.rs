//! Routing of operations to navigations.
//!
//! GET operations navigate: to a registered custom view when one is
//! registered for the (class, operation) pair, otherwise to a collection or
//! item view depending on what the operation returns. POST and PUT open a
//! form session instead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::api_doc::SupportedOperation;
use crate::context::NavigationContext;
use crate::error::HydraError;
use crate::form::SessionId;
use crate::page::{PageItem, PageItemKind};

/// Placeholder in a route path replaced by the percent-encoded resource IRI.
pub const RESOURCE_PLACEHOLDER: &str = "{resource}";

/// A custom view registered for one operation of one class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteRegistration {
    /// View path, containing [`RESOURCE_PLACEHOLDER`] where the IRI goes.
    pub path: String,
    pub supported_class: String,
    pub supported_operation: String,
    /// Opaque view descriptor handed back to the view layer.
    pub view: String,
}

/// Route overrides keyed by (class IRI, operation IRI).
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: HashMap<(String, String), RouteRegistration>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_registrations(registrations: impl IntoIterator<Item = RouteRegistration>) -> Self {
        let mut table = Self::new();
        for registration in registrations {
            table.register(registration);
        }
        table
    }

    /// Register a route; a later registration for the same pair replaces the earlier one.
    pub fn register(&mut self, registration: RouteRegistration) {
        let key = (
            registration.supported_class.clone(),
            registration.supported_operation.clone(),
        );
        self.routes.insert(key, registration);
    }

    pub fn lookup(&self, class: &str, operation: &str) -> Option<&RouteRegistration> {
        self.routes
            .get(&(class.to_string(), operation.to_string()))
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Where an activated operation leads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "navigation", rename_all = "snake_case")]
pub enum Navigation {
    /// A registered custom view.
    Custom {
        view: String,
        path: String,
        resource_iri: String,
    },
    Collection {
        resource_iri: String,
    },
    Item {
        resource_iri: String,
    },
    Form {
        session: SessionId,
    },
}

/// Route `operation` of `class` applied to `resource_iri`.
///
/// `existing` is the current state of the resource; PUT forms are
/// pre-filled from it.
///
/// # Errors
///
/// Returns `HydraError::UnsupportedOperationMethod` for methods other than
/// GET, POST and PUT, or `HydraError::UnresolvableFormClass` when a write
/// operation's payload class cannot be resolved.
pub fn route(
    ctx: &mut NavigationContext<'_>,
    class: &str,
    operation: &SupportedOperation,
    resource_iri: &str,
    existing: Option<&Value>,
) -> Result<Navigation, HydraError> {
    let method = operation.method.to_ascii_uppercase();
    let navigation = match method.as_str() {
        "GET" => {
            let registered = operation
                .iri
                .as_deref()
                .and_then(|op| ctx.routes.lookup(class, op));
            if let Some(registration) = registered {
                Navigation::Custom {
                    view: registration.view.clone(),
                    path: registration.path.replace(
                        RESOURCE_PLACEHOLDER,
                        &urlencoding::encode(resource_iri),
                    ),
                    resource_iri: resource_iri.to_string(),
                }
            } else if ctx.api_doc.operation_returns_collection(operation) {
                Navigation::Collection {
                    resource_iri: resource_iri.to_string(),
                }
            } else {
                Navigation::Item {
                    resource_iri: resource_iri.to_string(),
                }
            }
        }
        "POST" | "PUT" => {
            let existing = if method == "PUT" {
                existing.cloned()
            } else {
                None
            };
            let session = ctx.sessions.create_session(
                ctx.api_doc,
                operation,
                &method,
                resource_iri,
                resource_iri,
                existing,
            )?;
            Navigation::Form { session }
        }
        _ => {
            return Err(HydraError::UnsupportedOperationMethod {
                operation: operation.iri.clone().unwrap_or_default(),
                method: operation.method.clone(),
            })
        }
    };

    debug!(class, method = %method, ?navigation, "routed operation");
    Ok(navigation)
}

/// Route a user's activation of `item` with `method`.
///
/// Links are routed against their target, other items against the resource
/// they belong to. A link without a declared operation for `method` still
/// navigates to its target when `method` is GET.
///
/// # Errors
///
/// Returns `HydraError::UnknownOperation` when the item's property declares
/// no operation for `method`, plus any error from [`route`].
pub fn activate(
    ctx: &mut NavigationContext<'_>,
    item: &PageItem,
    method: &str,
    existing: Option<&Value>,
) -> Result<Navigation, HydraError> {
    let target = match &item.kind {
        PageItemKind::Link { resource_iri } => resource_iri.clone(),
        _ => item.subject.clone().unwrap_or_default(),
    };

    let operation = item.supported_property.find_operation_with_method(method)?;
    match operation {
        Some(operation) => route(ctx, &item.supported_class, operation, &target, existing),
        None if method.eq_ignore_ascii_case("GET")
            && matches!(item.kind, PageItemKind::Link { .. }) =>
        {
            Ok(Navigation::Item {
                resource_iri: target,
            })
        }
        None => Err(HydraError::UnknownOperation {
            operation: format!("{} on <{}>", method.to_ascii_uppercase(), item.property),
        }),
    }
}
