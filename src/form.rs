//! Form sessions and form models for write operations.
//!
//! A form session records a pending write (method, target URL, payload class
//! and, for edits, the current resource state). Sessions are keyed by
//! `(method, url, payload class)`: two sessions for the same target and class
//! share a key and the later one replaces the earlier one.
//!
//! Choice lists backed by a collection resource start empty and are filled
//! later with [`fill_choices`]. A fill is applied only while the session that
//! built the form is still the current one.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, warn};

use crate::api_doc::{ApiDocumentation, SupportedClass, SupportedOperation, ValuesConstraint};
use crate::error::HydraError;
use crate::jsonld::{first_string, first_value, node_id, string_value, types_of, unwrap_singleton};

/// Name of the hidden field carrying the resource type.
pub const TYPE_FIELD: &str = "@type";

/// Identity of a form session: method, URL and payload class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(method: &str, url: &str, payload_class: &str) -> Self {
        Self(format!(
            "{} {} {}",
            method.to_ascii_uppercase(),
            url,
            payload_class
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A pending write operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSession {
    pub method: String,
    pub url: String,
    pub resource_iri: String,
    /// Current state of the resource being edited, if any.
    pub form_data: Option<Value>,
    pub payload_class: String,
    pub operation: SupportedOperation,
}

/// Snapshot of a session's identity and write generation.
///
/// Used to detect that a session was replaced or abandoned between building
/// a form and a late choice-list fetch landing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionTicket {
    pub id: SessionId,
    generation: u64,
}

/// In-memory store of form sessions for one navigation session.
#[derive(Debug, Default)]
pub struct FormSessionStore {
    sessions: HashMap<SessionId, (u64, FormSession)>,
    generation: u64,
    current: Option<SessionId>,
}

impl FormSessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create (or replace) the session for a write operation.
    ///
    /// The new session becomes the current one.
    ///
    /// # Errors
    ///
    /// Returns `HydraError::UnresolvableFormClass` when the operation has no
    /// `expects` class or the class is not documented.
    pub fn create_session(
        &mut self,
        api_doc: &ApiDocumentation,
        operation: &SupportedOperation,
        method: &str,
        url: &str,
        resource_iri: &str,
        existing: Option<Value>,
    ) -> Result<SessionId, HydraError> {
        let payload_class = resolve_payload_class(api_doc, operation)?;
        let id = SessionId::new(method, url, &payload_class.iri);

        let session = FormSession {
            method: method.to_ascii_uppercase(),
            url: url.to_string(),
            resource_iri: resource_iri.to_string(),
            form_data: existing,
            payload_class: payload_class.iri.clone(),
            operation: operation.clone(),
        };

        self.generation += 1;
        if self
            .sessions
            .insert(id.clone(), (self.generation, session))
            .is_some()
        {
            warn!(session = %id, "form session replaced by a newer one with the same key");
        } else {
            debug!(session = %id, "form session created");
        }
        self.current = Some(id.clone());
        Ok(id)
    }

    /// Stored session for `id`.
    pub fn get_form_data(&self, id: &SessionId) -> Option<&FormSession> {
        self.sessions.get(id).map(|(_, session)| session)
    }

    fn ticket(&self, id: &SessionId) -> Option<SessionTicket> {
        self.sessions.get(id).map(|(generation, _)| SessionTicket {
            id: id.clone(),
            generation: *generation,
        })
    }

    /// Make an existing session current again, e.g. when its form is re-entered.
    pub fn enter(&mut self, id: &SessionId) -> Result<SessionTicket, HydraError> {
        let ticket = self.ticket(id).ok_or_else(|| HydraError::UnknownSession {
            id: id.to_string(),
        })?;
        self.current = Some(id.clone());
        Ok(ticket)
    }

    /// Abandon the current session; pending results for it will be dropped.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Whether `ticket` still refers to the current, unreplaced session.
    pub fn is_current(&self, ticket: &SessionTicket) -> bool {
        self.current.as_ref() == Some(&ticket.id)
            && self
                .sessions
                .get(&ticket.id)
                .is_some_and(|(generation, _)| *generation == ticket.generation)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Follow a write response into the next form, one hop only.
    ///
    /// When the expanded response is typed with a documented class that
    /// declares a POST or PUT operation with a payload class, a session for
    /// that operation is created against the response's `@id` (or
    /// `fallback_url` when the response is anonymous).
    pub fn chain_from_response(
        &mut self,
        api_doc: &ApiDocumentation,
        response: &Value,
        fallback_url: &str,
    ) -> Result<Option<SessionId>, HydraError> {
        let node = unwrap_singleton(response);
        let types = types_of(node);
        if types.is_empty() {
            return Ok(None);
        }
        let Some(class) = api_doc.find_supported_class(&types) else {
            return Ok(None);
        };
        let Some(next) = class
            .operations
            .iter()
            .find(|op| (op.has_method("POST") || op.has_method("PUT")) && op.expects.is_some())
        else {
            return Ok(None);
        };

        let url = node_id(node).unwrap_or(fallback_url).to_string();
        debug!(class = %class.iri, method = %next.method, "chaining response into next form");
        let next = next.clone();
        self.create_session(api_doc, &next, &next.method, &url, &url, Some(node.clone()))
            .map(Some)
    }
}

fn resolve_payload_class<'a>(
    api_doc: &'a ApiDocumentation,
    operation: &SupportedOperation,
) -> Result<&'a SupportedClass, HydraError> {
    operation
        .expects
        .as_deref()
        .and_then(|expects| api_doc.find_supported_class(&[expects]))
        .ok_or_else(|| HydraError::UnresolvableFormClass {
            operation: operation
                .iri
                .clone()
                .unwrap_or_else(|| format!("{} (anonymous)", operation.method)),
        })
}

/// A selectable option: display name and submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Choice {
    pub name: String,
    pub value: String,
}

/// Where a collection-backed choice list will come from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PendingChoices {
    pub collection: String,
    pub member_value: String,
    pub member_label: String,
}

/// Input widget of a form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FieldInput {
    Text {
        value: String,
    },
    Choice {
        choices: Vec<Choice>,
        selected: Option<usize>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pending: Option<PendingChoices>,
        #[serde(skip)]
        existing: Option<String>,
    },
    Hidden {
        value: String,
    },
}

/// One field of a form model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormField {
    /// Property IRI, or `@type` for the hidden type field.
    pub property: String,
    pub label: String,
    pub required: bool,
    /// Submit the value as `{"@id": value}`.
    pub use_identifier: bool,
    #[serde(flatten)]
    pub input: FieldInput,
}

impl FormField {
    /// Set the value of a text field. Returns false for other inputs.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        match &mut self.input {
            FieldInput::Text { value } => {
                *value = text.into();
                true
            }
            _ => false,
        }
    }

    /// Select the choice whose value is `value`. Returns false if there is none.
    pub fn select(&mut self, value: &str) -> bool {
        match &mut self.input {
            FieldInput::Choice {
                choices, selected, ..
            } => match choices.iter().position(|c| c.value == value) {
                Some(index) => {
                    *selected = Some(index);
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    /// The currently selected choice of a choice field.
    pub fn selected_choice(&self) -> Option<&Choice> {
        match &self.input {
            FieldInput::Choice {
                choices, selected, ..
            } => selected.and_then(|i| choices.get(i)),
            _ => None,
        }
    }

    /// The value this field contributes to a submission, if any.
    fn submitted_value(&self) -> Option<&str> {
        match &self.input {
            FieldInput::Text { value } | FieldInput::Hidden { value } if !value.is_empty() => {
                Some(value.as_str())
            }
            FieldInput::Choice { .. } => self.selected_choice().map(|c| c.value.as_str()),
            _ => None,
        }
    }
}

/// Fields of the form for one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormModel {
    pub session: SessionTicket,
    pub method: String,
    pub url: String,
    pub title: String,
    pub fields: Vec<FormField>,
}

impl FormModel {
    pub fn field(&self, property: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.property == property)
    }

    pub fn field_mut(&mut self, property: &str) -> Option<&mut FormField> {
        self.fields.iter_mut().find(|f| f.property == property)
    }

    /// Fields whose choices still have to be fetched, with their collection IRI.
    pub fn pending_choices(&self) -> Vec<(String, String)> {
        self.fields
            .iter()
            .filter_map(|f| match &f.input {
                FieldInput::Choice {
                    pending: Some(p), ..
                } => Some((f.property.clone(), p.collection.clone())),
                _ => None,
            })
            .collect()
    }

    /// Give up on a pending choice list; the field keeps an empty list.
    pub fn abandon_choices(&mut self, property: &str) {
        if let Some(FieldInput::Choice { pending, .. }) =
            self.field_mut(property).map(|f| &mut f.input)
        {
            *pending = None;
        }
    }
}

/// A write request ready to be sent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormRequest {
    pub method: String,
    pub url: String,
    pub body: Value,
}

/// Build the form for session `id`.
///
/// One field per writeable supported property of the payload class, in
/// documentation order, followed by the hidden `@type` field.
///
/// # Errors
///
/// Returns `HydraError::UnknownSession` for an unknown id,
/// `HydraError::UnresolvableFormClass` if the payload class vanished from the
/// documentation, or `HydraError::MissingPropertyBinding`.
pub fn build_form_model(
    store: &mut FormSessionStore,
    id: &SessionId,
    api_doc: &ApiDocumentation,
) -> Result<FormModel, HydraError> {
    let ticket = store.enter(id)?;
    let session = store
        .get_form_data(id)
        .ok_or_else(|| HydraError::UnknownSession { id: id.to_string() })?;
    let class = resolve_payload_class(api_doc, &session.operation)?;

    let mut fields = Vec::new();
    for sp in class.supported_properties.iter().filter(|sp| sp.writeable) {
        let property = sp.property()?;
        let existing = session
            .form_data
            .as_ref()
            .map(unwrap_singleton)
            .and_then(|data| first_value(data, &property.iri))
            .and_then(string_value);

        let allowed = if sp.allowed_values.is_empty() {
            class
                .shape
                .as_ref()
                .and_then(|shape| shape.allowed_values(&property.iri))
                .unwrap_or_default()
        } else {
            sp.allowed_values.as_slice()
        };

        let mut use_identifier = sp.use_identifier;
        let input = if !allowed.is_empty() {
            use_identifier |= allowed.iter().any(|a| a.is_iri);
            let choices = allowed
                .iter()
                .map(|a| Choice {
                    name: a.value.clone(),
                    value: a.value.clone(),
                })
                .collect();
            choice_input(choices, None, existing)
        } else {
            match &sp.values_constraint {
                Some(ValuesConstraint::Inline(choices)) => {
                    choice_input(choices.clone(), None, existing)
                }
                Some(ValuesConstraint::Collection {
                    iri,
                    member_value,
                    member_label,
                }) => {
                    use_identifier |= member_value == "@id";
                    let pending = PendingChoices {
                        collection: iri.clone(),
                        member_value: member_value.clone(),
                        member_label: member_label.clone(),
                    };
                    choice_input(Vec::new(), Some(pending), existing)
                }
                None => FieldInput::Text {
                    value: existing.unwrap_or_default(),
                },
            }
        };

        fields.push(FormField {
            property: property.iri.clone(),
            label: sp.label(),
            required: sp.required,
            use_identifier,
            input,
        });
    }

    let resource_type = session
        .form_data
        .as_ref()
        .map(unwrap_singleton)
        .and_then(|data| types_of(data).first().map(|t| t.to_string()))
        .unwrap_or_else(|| session.payload_class.clone());
    fields.push(FormField {
        property: TYPE_FIELD.to_string(),
        label: TYPE_FIELD.to_string(),
        required: true,
        use_identifier: false,
        input: FieldInput::Hidden {
            value: resource_type,
        },
    });

    Ok(FormModel {
        session: ticket,
        method: session.method.clone(),
        url: session.url.clone(),
        title: session
            .operation
            .title
            .clone()
            .unwrap_or_else(|| class.display_title().to_string()),
        fields,
    })
}

fn choice_input(
    choices: Vec<Choice>,
    pending: Option<PendingChoices>,
    existing: Option<String>,
) -> FieldInput {
    let selected = existing
        .as_deref()
        .and_then(|value| choices.iter().position(|c| c.value == value));
    FieldInput::Choice {
        choices,
        selected,
        pending,
        existing,
    }
}

/// Fill a pending choice list from the members of its collection.
///
/// Returns false, leaving the model untouched, when the form's session is no
/// longer current or the field has nothing pending.
pub fn fill_choices(
    store: &FormSessionStore,
    model: &mut FormModel,
    property: &str,
    members: &[Value],
) -> bool {
    if !store.is_current(&model.session) {
        warn!(session = %model.session.id, property, "dropping choices for a stale form session");
        return false;
    }
    let Some(field) = model.field_mut(property) else {
        return false;
    };
    let FieldInput::Choice {
        choices,
        selected,
        pending,
        existing,
    } = &mut field.input
    else {
        return false;
    };
    let Some(source) = pending.take() else {
        return false;
    };

    *choices = members
        .iter()
        .filter_map(|member| {
            let value = if source.member_value == "@id" {
                node_id(member).map(String::from)
            } else {
                first_string(member, &source.member_value)
            }?;
            let name = first_string(member, &source.member_label).unwrap_or_else(|| value.clone());
            Some(Choice { name, value })
        })
        .collect();
    *selected = existing
        .as_deref()
        .and_then(|value| choices.iter().position(|c| c.value == value));
    debug!(property, count = choices.len(), "choice list populated");
    true
}

/// Serialize a filled-in form into a request for its session.
///
/// The body is keyed by property IRI. Choice fields submit the selected
/// choice's value, never its display name. Fields flagged `use_identifier`
/// are wrapped as `{"@id": value}`. Empty text fields are left out.
pub fn submit_form(session: &FormSession, fields: &[FormField]) -> FormRequest {
    let mut body = Map::new();
    for field in fields {
        let Some(value) = field.submitted_value() else {
            continue;
        };
        let value = if field.use_identifier {
            json!({ "@id": value })
        } else {
            Value::String(value.to_string())
        };
        body.insert(field.property.clone(), value);
    }

    FormRequest {
        method: session.method.clone(),
        url: session.url.clone(),
        body: Value::Object(body),
    }
}
