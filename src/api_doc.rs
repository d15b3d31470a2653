//! Index over an expanded Hydra API documentation.
//!
//! The documentation is parsed once into typed records. Supported classes are
//! looked up through an IRI map built at parse time: when a document declares
//! the same class IRI twice the later declaration wins, the same result a
//! linear scan without short-circuit would give.
//!
//! Subclass tests are one level deep. A class two `rdfs:subClassOf` hops
//! away from `hydra:Collection` is not treated as a collection.

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::HydraError;
use crate::form::Choice;
use crate::jsonld::{
    bool_value, first_string, first_value, ids_of, json_type_name, node_id, string_value,
    types_of, values,
};
use crate::vocab::{hydra, oslc, rdf, rdfs, ui};

/// An HTTP interaction declared on a class or property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedOperation {
    /// Operation IRI; `None` for blank-node operations.
    pub iri: Option<String>,
    /// HTTP method as declared (e.g. `GET`).
    pub method: String,
    /// Payload class for write operations.
    pub expects: Option<String>,
    /// Declared return class(es).
    pub returns: Vec<String>,
    pub title: Option<String>,
}

impl SupportedOperation {
    fn from_node(node: &Value) -> Self {
        Self {
            iri: node_id(node).map(String::from),
            method: first_string(node, hydra::METHOD).unwrap_or_default(),
            expects: ids_of(node, hydra::EXPECTS).into_iter().next(),
            returns: ids_of(node, hydra::RETURNS),
            title: first_string(node, hydra::TITLE).or_else(|| first_string(node, rdfs::LABEL)),
        }
    }

    /// Method comparison, ignoring ASCII case.
    ///
    /// Looser than a literal match so that documents declaring `"post"` still
    /// route; documented methods are upper-case in practice.
    pub fn has_method(&self, method: &str) -> bool {
        self.method.eq_ignore_ascii_case(method)
    }
}

/// Semantic kind of a documented property.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind<'a> {
    /// `hydra:Link`: values are references to navigate to.
    Link,
    /// `rdf:Property`: values are literals to display.
    Literal,
    /// Anything else, tagged with the property's first declared type.
    Other(Option<&'a str>),
}

/// A `rdf:Property` or `hydra:Link` wrapped by a supported property.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Property {
    pub iri: String,
    pub types: Vec<String>,
    pub label: Option<String>,
    pub range: Option<String>,
    pub operations: Vec<SupportedOperation>,
}

impl Property {
    fn from_node(node: &Value, graph: &Graph) -> Option<Self> {
        let iri = node_id(node)?.to_string();
        let node = graph.resolve(node);
        Some(Self {
            iri,
            types: types_of(node).into_iter().map(String::from).collect(),
            label: first_string(node, rdfs::LABEL),
            range: ids_of(node, rdfs::RANGE).into_iter().next(),
            operations: values(node, hydra::SUPPORTED_OPERATION)
                .iter()
                .map(|op| SupportedOperation::from_node(graph.resolve(op)))
                .collect(),
        })
    }

    pub fn kind(&self) -> PropertyKind<'_> {
        if self.types.iter().any(|t| t == hydra::LINK) {
            PropertyKind::Link
        } else if self.types.iter().any(|t| t == rdf::PROPERTY) {
            PropertyKind::Literal
        } else {
            PropertyKind::Other(self.types.first().map(String::as_str))
        }
    }
}

/// One value permitted by an OSLC `allowedValue` constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllowedValue {
    pub value: String,
    /// The value was given as a reference rather than a literal.
    pub is_iri: bool,
}

impl AllowedValue {
    fn list_from(node: &Value) -> Vec<Self> {
        let direct = values(node, oslc::ALLOWED_VALUE);
        let nested = first_value(node, oslc::ALLOWED_VALUES)
            .map(|n| values(n, oslc::ALLOWED_VALUE))
            .unwrap_or_default();
        direct
            .iter()
            .chain(nested)
            .filter_map(|v| {
                string_value(v).map(|value| AllowedValue {
                    value,
                    is_iri: v.get("@id").is_some(),
                })
            })
            .collect()
    }
}

/// Legacy UI-extension constraint on the values a form field may take.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValuesConstraint {
    /// Value/label pairs given inline in the documentation.
    Inline(Vec<Choice>),
    /// A (paged) collection whose members supply the choices.
    Collection {
        iri: String,
        member_value: String,
        member_label: String,
    },
}

impl ValuesConstraint {
    fn from_node(node: &Value) -> Option<Self> {
        if let Some(iri) = ids_of(node, ui::VALUES_COLLECTION).into_iter().next() {
            return Some(ValuesConstraint::Collection {
                iri,
                member_value: ids_of(node, ui::MEMBER_VALUE_PROPERTY)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| "@id".to_string()),
                member_label: ids_of(node, ui::MEMBER_LABEL_PROPERTY)
                    .into_iter()
                    .next()
                    .unwrap_or_else(|| rdfs::LABEL.to_string()),
            });
        }

        let choices: Vec<Choice> = values(node, ui::VALUES)
            .iter()
            .filter_map(|item| {
                let value = first_string(item, ui::VALUE)?;
                let name = first_string(item, ui::LABEL)
                    .or_else(|| first_string(item, rdfs::LABEL))
                    .unwrap_or_else(|| value.clone());
                Some(Choice { name, value })
            })
            .collect();

        if choices.is_empty() {
            None
        } else {
            Some(ValuesConstraint::Inline(choices))
        }
    }
}

/// A property as supported by one class.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedProperty {
    /// IRI of the class declaring this supported property.
    pub class: String,
    property: Option<Property>,
    pub title: Option<String>,
    pub required: bool,
    pub readable: bool,
    pub writeable: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub allowed_values: Vec<AllowedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub values_constraint: Option<ValuesConstraint>,
    /// Submit this field's value as `{"@id": value}`.
    pub use_identifier: bool,
}

impl SupportedProperty {
    fn from_node(node: &Value, class: &str, graph: &Graph) -> Self {
        let property = first_value(node, hydra::PROPERTY)
            .and_then(|p| Property::from_node(p, graph));
        let use_identifier = bool_value(node, ui::USE_IDENTIFIER)
            .unwrap_or_else(|| property.as_ref().is_some_and(|p| p.kind() == PropertyKind::Link));

        Self {
            class: class.to_string(),
            property,
            title: first_string(node, hydra::TITLE).or_else(|| first_string(node, rdfs::LABEL)),
            required: bool_value(node, hydra::REQUIRED).unwrap_or(false),
            readable: bool_value(node, hydra::READABLE).unwrap_or(true),
            writeable: bool_value(node, hydra::WRITEABLE).unwrap_or(true),
            allowed_values: AllowedValue::list_from(node),
            values_constraint: first_value(node, ui::VALUES_CONSTRAINT)
                .and_then(|c| ValuesConstraint::from_node(graph.resolve(c))),
            use_identifier,
        }
    }

    /// The wrapped property.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::MissingPropertyBinding` when the documentation
    /// omitted `hydra:property`.
    pub fn property(&self) -> Result<&Property, HydraError> {
        self.property
            .as_ref()
            .ok_or_else(|| HydraError::MissingPropertyBinding {
                class: self.class.clone(),
            })
    }

    /// Display label: explicit title, then the property's label, then its IRI.
    pub fn label(&self) -> String {
        self.title
            .clone()
            .or_else(|| self.property.as_ref().and_then(|p| p.label.clone()))
            .or_else(|| self.property.as_ref().map(|p| p.iri.clone()))
            .unwrap_or_default()
    }

    /// First operation on the wrapped property with the given method.
    pub fn find_operation_with_method(
        &self,
        method: &str,
    ) -> Result<Option<&SupportedOperation>, HydraError> {
        Ok(self
            .property()?
            .operations
            .iter()
            .find(|op| op.has_method(method)))
    }
}

/// OSLC resource shape attached to a class; only value constraints are read.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResourceShape {
    constraints: Vec<(String, Vec<AllowedValue>)>,
}

impl ResourceShape {
    fn from_node(node: &Value, graph: &Graph) -> Self {
        let constraints = values(node, oslc::PROPERTY)
            .iter()
            .map(|p| graph.resolve(p))
            .filter_map(|p| {
                let definition = ids_of(p, oslc::PROPERTY_DEFINITION).into_iter().next()?;
                Some((definition, AllowedValue::list_from(p)))
            })
            .collect();
        Self { constraints }
    }

    /// Allowed values declared for `property`, if the shape constrains it.
    pub fn allowed_values(&self, property: &str) -> Option<&[AllowedValue]> {
        self.constraints
            .iter()
            .rev()
            .find(|(definition, allowed)| definition == property && !allowed.is_empty())
            .map(|(_, allowed)| allowed.as_slice())
    }
}

/// A resource type described by the API documentation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SupportedClass {
    pub iri: String,
    pub label: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub sub_class_of: Vec<String>,
    pub supported_properties: Vec<SupportedProperty>,
    pub operations: Vec<SupportedOperation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape: Option<ResourceShape>,
}

impl SupportedClass {
    fn from_node(iri: &str, node: &Value, graph: &Graph) -> Self {
        Self {
            iri: iri.to_string(),
            label: first_string(node, rdfs::LABEL),
            title: first_string(node, hydra::TITLE),
            description: first_string(node, hydra::DESCRIPTION)
                .or_else(|| first_string(node, rdfs::COMMENT)),
            sub_class_of: ids_of(node, rdfs::SUB_CLASS_OF),
            supported_properties: values(node, hydra::SUPPORTED_PROPERTY)
                .iter()
                .map(|sp| SupportedProperty::from_node(graph.resolve(sp), iri, graph))
                .collect(),
            operations: values(node, hydra::SUPPORTED_OPERATION)
                .iter()
                .map(|op| SupportedOperation::from_node(graph.resolve(op)))
                .collect(),
            shape: first_value(node, oslc::RESOURCE_SHAPE)
                .map(|s| ResourceShape::from_node(graph.resolve(s), graph)),
        }
    }

    /// Display title: `rdfs:label`, then `hydra:title`, then the IRI.
    pub fn display_title(&self) -> &str {
        self.label
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(&self.iri)
    }

    /// Supported property wrapping `property`; the last declaration wins.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::MissingPropertyBinding` if any supported property
    /// of this class lacks its `hydra:property`.
    pub fn find_supported_property(
        &self,
        property: &str,
    ) -> Result<Option<&SupportedProperty>, HydraError> {
        let mut found = None;
        for sp in &self.supported_properties {
            if sp.property()?.iri == property {
                found = Some(sp);
            }
        }
        Ok(found)
    }
}

/// Parsed and indexed Hydra API documentation.
#[derive(Debug, Clone, Default)]
pub struct ApiDocumentation {
    pub iri: Option<String>,
    pub title: Option<String>,
    pub entrypoint: Option<String>,
    classes: Vec<SupportedClass>,
    index: HashMap<String, usize>,
}

impl ApiDocumentation {
    /// Parse an expanded API documentation.
    ///
    /// Accepts the node itself or the top-level array produced by expansion.
    /// Supported classes, properties and operations may be embedded or given
    /// as references to other top-level nodes.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::ExpansionFailure` if the input is not an expanded
    /// node object or array of node objects.
    pub fn from_expanded(doc: &Value) -> Result<Self, HydraError> {
        let nodes: Vec<&Value> = match doc {
            Value::Array(arr) => arr.iter().collect(),
            Value::Object(_) => vec![doc],
            other => {
                return Err(HydraError::ExpansionFailure {
                    message: format!(
                        "API documentation must be an object or array, got {}",
                        json_type_name(other)
                    ),
                })
            }
        };
        let graph = Graph::new(&nodes);

        let root = nodes
            .iter()
            .copied()
            .find(|n| n.get(hydra::SUPPORTED_CLASS).is_some())
            .or_else(|| nodes.first().copied());

        let mut api_doc = ApiDocumentation::default();
        let Some(root) = root else {
            return Ok(api_doc);
        };

        api_doc.iri = node_id(root).map(String::from);
        api_doc.title = first_string(root, hydra::TITLE);
        api_doc.entrypoint = ids_of(root, hydra::ENTRYPOINT).into_iter().next();

        for entry in values(root, hydra::SUPPORTED_CLASS) {
            let node = graph.resolve(entry);
            let Some(iri) = node_id(node) else {
                debug!("skipping supported class without @id");
                continue;
            };
            let class = SupportedClass::from_node(iri, node, &graph);
            api_doc.insert(class);
        }

        debug!(
            classes = api_doc.classes.len(),
            "indexed API documentation"
        );
        Ok(api_doc)
    }

    fn insert(&mut self, class: SupportedClass) {
        self.index.insert(class.iri.clone(), self.classes.len());
        self.classes.push(class);
    }

    /// All supported classes in document order, duplicates included.
    pub fn classes(&self) -> impl Iterator<Item = &SupportedClass> {
        self.classes.iter()
    }

    /// Classes matching any of `types`, in document order.
    fn matching_classes<'a>(&'a self, types: &[&str]) -> Vec<&'a SupportedClass> {
        let mut positions: Vec<usize> = types
            .iter()
            .filter_map(|t| self.index.get(*t).copied())
            .collect();
        positions.sort_unstable();
        positions.dedup();
        positions.into_iter().map(|i| &self.classes[i]).collect()
    }

    /// The supported class matching any of `types`.
    ///
    /// When several match, the one declared last in the document wins.
    pub fn find_supported_class(&self, types: &[&str]) -> Option<&SupportedClass> {
        self.matching_classes(types).pop()
    }

    /// Supported property for `property` on any class matching `types`.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::MissingPropertyBinding` if a matching class has a
    /// supported property without `hydra:property`.
    pub fn find_supported_property(
        &self,
        types: &[&str],
        property: &str,
    ) -> Result<Option<&SupportedProperty>, HydraError> {
        let mut found = None;
        for class in self.matching_classes(types) {
            if let Some(sp) = class.find_supported_property(property)? {
                found = Some(sp);
            }
        }
        Ok(found)
    }

    /// All supported properties of the class matching `types`.
    pub fn supported_properties(&self, types: &[&str]) -> &[SupportedProperty] {
        self.find_supported_class(types)
            .map(|c| c.supported_properties.as_slice())
            .unwrap_or_default()
    }

    /// Whether `class` directly declares any of `bases` as `rdfs:subClassOf`.
    pub fn is_sub_class_of(&self, class: &str, bases: &[&str]) -> bool {
        self.find_supported_class(&[class])
            .map(|c| c.sub_class_of.iter().any(|s| bases.contains(&s.as_str())))
            .unwrap_or(false)
    }

    /// Whether a type list denotes a collection: a collection type itself or
    /// a direct subclass of one.
    pub fn is_collection_type(&self, types: &[&str]) -> bool {
        types.iter().any(|t| {
            hydra::COLLECTION_TYPES.contains(t) || self.is_sub_class_of(t, hydra::COLLECTION_TYPES)
        })
    }

    /// Whether `operation` returns a collection.
    pub fn operation_returns_collection(&self, operation: &SupportedOperation) -> bool {
        let returns: Vec<&str> = operation.returns.iter().map(String::as_str).collect();
        self.is_collection_type(&returns)
    }

    /// First operation with `method` on a supported property's wrapped property.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::MissingPropertyBinding` if `hydra:property` is missing.
    pub fn find_supported_operation_with_method<'a>(
        &self,
        supported_property: &'a SupportedProperty,
        method: &str,
    ) -> Result<Option<&'a SupportedOperation>, HydraError> {
        supported_property.find_operation_with_method(method)
    }

    /// Property definition by IRI across all classes; the last declaration wins.
    pub fn find_property(&self, property: &str) -> Option<&Property> {
        self.classes
            .iter()
            .flat_map(|c| &c.supported_properties)
            .filter_map(|sp| sp.property.as_ref())
            .filter(|p| p.iri == property)
            .last()
    }

    /// Operation by IRI, declared on a class or on one of its properties.
    ///
    /// Returns the declaring class together with the operation.
    pub fn find_operation(&self, operation: &str) -> Option<(&SupportedClass, &SupportedOperation)> {
        let matches = |op: &&SupportedOperation| op.iri.as_deref() == Some(operation);
        self.classes.iter().rev().find_map(|class| {
            class
                .operations
                .iter()
                .find(matches)
                .or_else(|| {
                    class
                        .supported_properties
                        .iter()
                        .filter_map(|sp| sp.property.as_ref())
                        .flat_map(|p| &p.operations)
                        .find(matches)
                })
                .map(|op| (class, op))
        })
    }
}

/// Top-level nodes of a flattened document, by `@id`.
struct Graph<'a> {
    nodes: HashMap<&'a str, &'a Value>,
}

impl<'a> Graph<'a> {
    fn new(nodes: &[&'a Value]) -> Self {
        let nodes = nodes
            .iter()
            .filter_map(|n| node_id(n).map(|id| (id, *n)))
            .collect();
        Self { nodes }
    }

    /// A bare reference resolves to the top-level node with the same `@id`;
    /// embedded nodes are returned unchanged.
    fn resolve<'b>(&'b self, value: &'b Value) -> &'b Value {
        match value.as_object() {
            Some(obj) if obj.len() == 1 => node_id(value)
                .and_then(|id| self.nodes.get(id).copied())
                .unwrap_or(value),
            _ => value,
        }
    }
}
