//! Resource classification and page-item construction.
//!
//! Every non-keyword key of a resource becomes one page item. The key must be
//! documented as a supported property of one of the resource's classes; an
//! undocumented key fails the whole build rather than being skipped.

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::api_doc::{PropertyKind, SupportedOperation, SupportedProperty};
use crate::collection::{build_collection, CollectionModel};
use crate::context::NavigationContext;
use crate::error::HydraError;
use crate::form::SessionId;
use crate::jsonld::{first_value, id_of, json_type_name, node_id, types_of, unwrap_singleton};

/// Displayed in place of a value that has no literal payload.
pub const UNKNOWN_VALUE: &str = "Unknown";

/// What a page item shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PageItemKind {
    /// Navigable reference to another resource.
    Link { resource_iri: String },
    /// Literal value.
    Property { value: Value },
    /// Property of an undocumented kind, tagged with its declared type.
    Unrecognized {
        type_tag: Option<String>,
        value: Value,
    },
}

/// One renderable entry of a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageItem {
    #[serde(flatten)]
    pub kind: PageItemKind,
    /// Property IRI (the resource key).
    pub property: String,
    pub label: String,
    /// IRI of the resource the item was read from.
    pub subject: Option<String>,
    pub supported_class: String,
    pub supported_property: SupportedProperty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub css_class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub swap_type: Option<String>,
    /// Session of the inline form replacing this item, for swapped items.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub form_id: Option<SessionId>,
}

/// A page for a single (non-collection) resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemPage {
    pub iri: Option<String>,
    pub title: String,
    pub types: Vec<String>,
    /// Class-level operations of the resource's class.
    pub operations: Vec<SupportedOperation>,
    pub items: Vec<PageItem>,
}

/// A built page, ready for the view layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "page", rename_all = "snake_case")]
pub enum Page {
    Item(ItemPage),
    Collection(CollectionModel),
}

impl Page {
    pub fn title(&self) -> &str {
        match self {
            Page::Item(page) => &page.title,
            Page::Collection(collection) => &collection.title,
        }
    }
}

/// The resource's `@type` list.
pub fn classify(resource: &Value) -> Vec<String> {
    types_of(unwrap_singleton(resource))
        .into_iter()
        .map(String::from)
        .collect()
}

/// Build the page for an expanded resource: a collection page when its type
/// is (or directly extends) a Hydra collection, an item page otherwise.
///
/// # Errors
///
/// Any error from [`build_page_items`] or [`build_collection`].
pub fn build_page(resource: &Value, ctx: &mut NavigationContext<'_>) -> Result<Page, HydraError> {
    let node = unwrap_singleton(resource);
    let types = classify(node);
    let type_refs: Vec<&str> = types.iter().map(String::as_str).collect();

    if ctx.api_doc.is_collection_type(&type_refs) {
        return build_collection(node, ctx).map(Page::Collection);
    }

    let class = ctx.api_doc.find_supported_class(&type_refs);
    let title = class
        .map(|c| c.display_title().to_string())
        .or_else(|| types.first().cloned())
        .unwrap_or_default();
    let operations = class.map(|c| c.operations.clone()).unwrap_or_default();
    let items = build_page_items(node, ctx, &type_refs)?;

    Ok(Page::Item(ItemPage {
        iri: node_id(node).map(String::from),
        title,
        types,
        operations,
        items,
    }))
}

/// Build the ordered page items of `resource` typed as `types`.
///
/// Items are stably sorted by their styling order key; items without one
/// sort as 0, keeping document order among equal keys.
///
/// # Errors
///
/// Returns `HydraError::UnknownProperty` for an undocumented key,
/// `HydraError::MalformedReference` for a link value that is not a single
/// reference, and `HydraError::MissingPropertyBinding` or
/// `HydraError::UnresolvableFormClass` from the lookups it performs.
pub fn build_page_items(
    resource: &Value,
    ctx: &mut NavigationContext<'_>,
    types: &[&str],
) -> Result<Vec<PageItem>, HydraError> {
    let node = unwrap_singleton(resource);
    let Some(obj) = node.as_object() else {
        return Err(HydraError::ExpansionFailure {
            message: format!(
                "resource must be a node object, got {}",
                json_type_name(node)
            ),
        });
    };
    let subject = node_id(node).map(String::from);

    let mut items = Vec::new();
    for (key, value) in obj {
        if key.starts_with('@') {
            continue;
        }

        let sp = ctx
            .api_doc
            .find_supported_property(types, key)?
            .ok_or_else(|| HydraError::UnknownProperty {
                property: key.clone(),
                classes: types.iter().map(|t| t.to_string()).collect(),
            })?;
        let property = sp.property()?;

        let kind = match property.kind() {
            PropertyKind::Link => PageItemKind::Link {
                resource_iri: id_of(value)?.to_string(),
            },
            PropertyKind::Literal => PageItemKind::Property {
                value: first_value(node, key)
                    .and_then(|v| v.get("@value"))
                    .cloned()
                    .unwrap_or_else(|| Value::String(UNKNOWN_VALUE.to_string())),
            },
            PropertyKind::Other(type_tag) => PageItemKind::Unrecognized {
                type_tag: type_tag.map(String::from),
                value: Value::String(UNKNOWN_VALUE.to_string()),
            },
        };

        let mut item = PageItem {
            kind,
            property: key.clone(),
            label: sp.label(),
            subject: subject.clone(),
            supported_class: sp.class.clone(),
            supported_property: sp.clone(),
            order: None,
            css_class: None,
            swap_type: None,
            form_id: None,
        };
        apply_styling(&mut item, ctx, types)?;
        items.push(item);
    }

    items.sort_by_key(|item| item.order.unwrap_or(0));
    debug!(
        subject = subject.as_deref().unwrap_or("_"),
        count = items.len(),
        "built page items"
    );
    Ok(items)
}

fn apply_styling(
    item: &mut PageItem,
    ctx: &mut NavigationContext<'_>,
    types: &[&str],
) -> Result<(), HydraError> {
    let Some(style) = ctx
        .styling
        .and_then(|styling| styling.lookup(types, &item.property))
    else {
        return Ok(());
    };
    item.order = style.order;
    item.css_class = style.css_class.clone();

    let Some(swap) = &style.swap else {
        return Ok(());
    };
    let Some(post) = item.supported_property.find_operation_with_method("POST")? else {
        warn!(property = %item.property, "swap requested but the property has no POST operation");
        return Ok(());
    };
    let url = match &item.kind {
        PageItemKind::Link { resource_iri } => Some(resource_iri.clone()),
        _ => item.subject.clone(),
    };
    let Some(url) = url else {
        warn!(property = %item.property, "swap requested on an anonymous resource");
        return Ok(());
    };

    let resource_iri = item.subject.clone().unwrap_or_else(|| url.clone());
    let post = post.clone();
    let id = ctx
        .sessions
        .create_session(ctx.api_doc, &post, "POST", &url, &resource_iri, None)?;
    item.swap_type = Some(swap.clone());
    item.form_id = Some(id);
    Ok(())
}
