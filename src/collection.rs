//! Collection pages: the collection's own class plus one entry per member.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::api_doc::SupportedOperation;
use crate::context::NavigationContext;
use crate::error::HydraError;
use crate::jsonld::{node_id, types_of, unwrap_singleton, values};
use crate::page::{build_page_items, classify, PageItem};
use crate::vocab::hydra;

/// One member of a collection, classified and built like a page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemberModel {
    pub iri: Option<String>,
    pub types: Vec<String>,
    pub title: Option<String>,
    pub items: Vec<PageItem>,
}

/// A collection resource and its members.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionModel {
    pub iri: Option<String>,
    pub title: String,
    pub types: Vec<String>,
    /// Class-level operations, e.g. creating a new member.
    pub operations: Vec<SupportedOperation>,
    pub members: Vec<MemberModel>,
}

/// Build a collection from its `hydra:member` list.
///
/// Members are built independently; the first member that fails aborts the
/// whole collection.
///
/// # Errors
///
/// Any error from [`build_page_items`] for a member.
pub fn build_collection(
    resource: &Value,
    ctx: &mut NavigationContext<'_>,
) -> Result<CollectionModel, HydraError> {
    let node = unwrap_singleton(resource);
    let types: Vec<String> = types_of(node).into_iter().map(String::from).collect();
    let type_refs: Vec<&str> = types.iter().map(String::as_str).collect();

    let class = ctx.api_doc.find_supported_class(&type_refs);
    let title = class
        .map(|c| c.display_title().to_string())
        .or_else(|| types.first().cloned())
        .unwrap_or_default();
    let operations = class.map(|c| c.operations.clone()).unwrap_or_default();

    let mut members = Vec::new();
    for member in values(node, hydra::MEMBER) {
        let member_types = classify(member);
        let member_refs: Vec<&str> = member_types.iter().map(String::as_str).collect();
        let items = build_page_items(member, ctx, &member_refs)?;
        members.push(MemberModel {
            iri: node_id(member).map(String::from),
            title: ctx
                .api_doc
                .find_supported_class(&member_refs)
                .map(|c| c.display_title().to_string()),
            types: member_types,
            items,
        });
    }

    debug!(
        collection = node_id(node).unwrap_or("_"),
        members = members.len(),
        "built collection"
    );
    Ok(CollectionModel {
        iri: node_id(node).map(String::from),
        title,
        types,
        operations,
        members,
    })
}
