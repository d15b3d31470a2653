//! UI-styling overrides for page items.
//!
//! A styling document is shaped like an API documentation: supported classes
//! wrapping supported properties. Instead of describing the API, its
//! supported properties carry presentation hints from the UI vocabulary
//! (`ui:order`, `ui:cssClass`, `ui:swap`).

use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use crate::error::HydraError;
use crate::jsonld::{first_string, first_value, literal_value, node_id, values};
use crate::vocab::{hydra, ui};

/// Presentation hints for one property of one class.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PropertyStyle {
    /// Sort key; items without one sort as 0.
    pub order: Option<i64>,
    pub css_class: Option<String>,
    /// Replace the item with an inline form of this kind.
    pub swap: Option<String>,
}

/// Styling overrides keyed by (class IRI, property IRI).
#[derive(Debug, Clone, Default)]
pub struct UiStyling {
    styles: HashMap<(String, String), PropertyStyle>,
}

impl UiStyling {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an expanded styling document.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::InvalidConfig` if a styled property has no
    /// `hydra:property` reference.
    pub fn from_expanded(doc: &Value) -> Result<Self, HydraError> {
        let mut styling = Self::new();
        let roots: &[Value] = match doc {
            Value::Array(arr) => arr,
            other => std::slice::from_ref(other),
        };

        for class in roots.iter().flat_map(|r| values(r, hydra::SUPPORTED_CLASS)) {
            let Some(class_iri) = node_id(class) else {
                continue;
            };
            for sp in values(class, hydra::SUPPORTED_PROPERTY) {
                let property = first_value(sp, hydra::PROPERTY)
                    .and_then(node_id)
                    .ok_or_else(|| HydraError::InvalidConfig {
                        message: format!("styled property of <{class_iri}> has no hydra:property"),
                    })?;
                styling.insert(class_iri, property, style_from_node(sp));
            }
        }
        Ok(styling)
    }

    /// Add or replace the style for `(class, property)`.
    pub fn insert(&mut self, class: &str, property: &str, style: PropertyStyle) {
        self.styles
            .insert((class.to_string(), property.to_string()), style);
    }

    /// Style of `property` on the first of `classes` that styles it.
    pub fn lookup(&self, classes: &[&str], property: &str) -> Option<&PropertyStyle> {
        classes
            .iter()
            .find_map(|class| self.styles.get(&(class.to_string(), property.to_string())))
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }
}

fn style_from_node(node: &Value) -> PropertyStyle {
    let order = literal_value(node, ui::ORDER).and_then(|v| match v {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    });
    let swap = match literal_value(node, ui::SWAP) {
        Some(Value::Bool(true)) => Some("form".to_string()),
        Some(Value::String(kind)) => Some(kind.clone()),
        _ => None,
    };

    PropertyStyle {
        order,
        css_class: first_string(node, ui::CSS_CLASS),
        swap,
    }
}
