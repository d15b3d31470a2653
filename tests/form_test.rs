//! Integration tests for form sessions, form models and submission.

use hydra_client::vocab::{hydra, oslc, rdf, rdfs, ui};
use hydra_client::{
    build_form_model, fill_choices, submit_form, ApiDocumentation, Choice, FieldInput, FormField,
    FormSessionStore, HydraError, SupportedOperation, TYPE_FIELD,
};
use serde_json::{json, Value};

const EX: &str = "http://example.com/vocab#";
const WIDGET_URL: &str = "http://example.com/widgets/1";

fn ex(term: &str) -> String {
    format!("{EX}{term}")
}

fn put_widget() -> SupportedOperation {
    SupportedOperation {
        iri: Some(ex("replaceWidget")),
        method: "PUT".into(),
        expects: Some(ex("Widget")),
        returns: vec![ex("Widget")],
        title: Some("Edit widget".into()),
    }
}

fn api_doc(widget_properties: Value) -> ApiDocumentation {
    ApiDocumentation::from_expanded(&json!([{
        hydra::SUPPORTED_CLASS: [{
            "@id": ex("Widget"),
            rdfs::LABEL: [{ "@value": "Widget" }],
            hydra::SUPPORTED_PROPERTY: widget_properties
        }]
    }]))
    .unwrap()
}

fn colour_with_allowed_values() -> ApiDocumentation {
    api_doc(json!([{
        hydra::PROPERTY: [{ "@id": ex("colour"), "@type": [rdf::PROPERTY] }],
        oslc::ALLOWED_VALUE: [
            { "@value": "red" },
            { "@value": "green" },
            { "@value": "blue" }
        ]
    }]))
}

fn existing_widget() -> Value {
    json!([{
        "@id": WIDGET_URL,
        "@type": [ex("Widget")],
        ex("colour"): [{ "@value": "green" }]
    }])
}

mod choices {
    use super::*;

    #[test]
    fn oslc_allowed_values_preselect_existing() {
        let doc = colour_with_allowed_values();
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, Some(existing_widget()))
            .unwrap();

        let model = build_form_model(&mut store, &id, &doc).unwrap();

        assert_eq!(model.title, "Edit widget");
        assert_eq!(model.fields.len(), 2);
        let colour = &model.fields[0];
        match &colour.input {
            FieldInput::Choice { choices, .. } => {
                let values: Vec<&str> = choices.iter().map(|c| c.value.as_str()).collect();
                assert_eq!(values, vec!["red", "green", "blue"]);
            }
            other => panic!("expected a choice field, got {other:?}"),
        }
        assert_eq!(colour.selected_choice().unwrap().value, "green");

        let type_field = model.fields.last().unwrap();
        assert_eq!(type_field.property, TYPE_FIELD);
        assert_eq!(
            type_field.input,
            FieldInput::Hidden {
                value: ex("Widget")
            }
        );
    }

    #[test]
    fn resource_shape_supplies_allowed_values() {
        let doc = ApiDocumentation::from_expanded(&json!([{
            hydra::SUPPORTED_CLASS: [{
                "@id": ex("Widget"),
                oslc::RESOURCE_SHAPE: [{
                    oslc::PROPERTY: [{
                        oslc::PROPERTY_DEFINITION: [{ "@id": ex("size") }],
                        oslc::ALLOWED_VALUES: [{
                            oslc::ALLOWED_VALUE: [{ "@value": "S" }, { "@value": "L" }]
                        }]
                    }]
                }],
                hydra::SUPPORTED_PROPERTY: [{
                    hydra::PROPERTY: [{ "@id": ex("size"), "@type": [rdf::PROPERTY] }]
                }]
            }]
        }]))
        .unwrap();
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "POST", "http://example.com/widgets", "http://example.com/widgets", None)
            .unwrap();

        let model = build_form_model(&mut store, &id, &doc).unwrap();
        match &model.fields[0].input {
            FieldInput::Choice {
                choices, selected, ..
            } => {
                assert_eq!(choices.len(), 2);
                assert_eq!(*selected, None);
            }
            other => panic!("expected a choice field, got {other:?}"),
        }
    }

    #[test]
    fn inline_values_constraint() {
        let doc = api_doc(json!([{
            hydra::PROPERTY: [{ "@id": ex("colour"), "@type": [rdf::PROPERTY] }],
            ui::VALUES_CONSTRAINT: [{
                ui::VALUES: [
                    { ui::VALUE: [{ "@value": "r" }], ui::LABEL: [{ "@value": "Red" }] },
                    { ui::VALUE: [{ "@value": "g" }], ui::LABEL: [{ "@value": "Green" }] }
                ]
            }]
        }]));
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, None)
            .unwrap();

        let mut model = build_form_model(&mut store, &id, &doc).unwrap();
        let field = model.field_mut(&ex("colour")).unwrap();
        assert!(field.select("g"));
        assert!(!field.select("Green"));
        assert_eq!(
            field.selected_choice(),
            Some(&Choice {
                name: "Green".into(),
                value: "g".into()
            })
        );
    }

    #[test]
    fn collection_choices_fill_while_session_is_current() {
        let doc = api_doc(json!([{
            hydra::PROPERTY: [{ "@id": ex("owner"), "@type": [hydra::LINK] }],
            ui::VALUES_CONSTRAINT: [{
                ui::VALUES_COLLECTION: [{ "@id": "http://example.com/people" }]
            }]
        }]));
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, None)
            .unwrap();
        let mut model = build_form_model(&mut store, &id, &doc).unwrap();

        assert_eq!(
            model.pending_choices(),
            vec![(ex("owner"), "http://example.com/people".to_string())]
        );

        let members = vec![
            json!({ "@id": "http://example.com/people/1", rdfs::LABEL: [{ "@value": "Ada" }] }),
            json!({ "@id": "http://example.com/people/2" }),
        ];
        assert!(fill_choices(&store, &mut model, &ex("owner"), &members));
        assert!(model.pending_choices().is_empty());

        let owner = model.field(&ex("owner")).unwrap();
        assert!(owner.use_identifier);
        match &owner.input {
            FieldInput::Choice { choices, .. } => {
                assert_eq!(choices[0].name, "Ada");
                assert_eq!(choices[1].name, "http://example.com/people/2");
            }
            other => panic!("expected a choice field, got {other:?}"),
        }
    }

    #[test]
    fn stale_choice_results_are_dropped() {
        let doc = api_doc(json!([{
            hydra::PROPERTY: [{ "@id": ex("owner"), "@type": [hydra::LINK] }],
            ui::VALUES_CONSTRAINT: [{
                ui::VALUES_COLLECTION: [{ "@id": "http://example.com/people" }]
            }]
        }]));
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, None)
            .unwrap();
        let mut model = build_form_model(&mut store, &id, &doc).unwrap();

        // the user navigated away before the collection arrived
        store.clear_current();
        let members = vec![json!({ "@id": "http://example.com/people/1" })];
        assert!(!fill_choices(&store, &mut model, &ex("owner"), &members));
        assert_eq!(model.pending_choices().len(), 1);
    }
}

mod fields {
    use super::*;

    #[test]
    fn unwriteable_properties_are_skipped_and_required_is_kept() {
        let doc = api_doc(json!([
            {
                hydra::PROPERTY: [{ "@id": ex("id"), "@type": [rdf::PROPERTY] }],
                hydra::WRITEABLE: [{ "@value": false }]
            },
            {
                hydra::PROPERTY: [{ "@id": ex("name"), "@type": [rdf::PROPERTY] }],
                hydra::REQUIRED: [{ "@value": true }]
            }
        ]));
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, None)
            .unwrap();

        let model = build_form_model(&mut store, &id, &doc).unwrap();
        assert_eq!(model.fields.len(), 2);
        assert_eq!(model.fields[0].property, ex("name"));
        assert!(model.fields[0].required);
    }

    #[test]
    fn unknown_session() {
        let doc = colour_with_allowed_values();
        let mut store = FormSessionStore::new();
        let id = hydra_client::SessionId::new("POST", "http://nowhere", &ex("Widget"));
        assert!(matches!(
            build_form_model(&mut store, &id, &doc),
            Err(HydraError::UnknownSession { .. })
        ));
    }
}

mod submission {
    use super::*;

    #[test]
    fn identifier_choice_is_wrapped() {
        let doc = colour_with_allowed_values();
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, None)
            .unwrap();
        let session = store.get_form_data(&id).unwrap();

        let fields = vec![FormField {
            property: ex("colour"),
            label: "Colour".into(),
            required: false,
            use_identifier: true,
            input: FieldInput::Choice {
                choices: vec![Choice {
                    name: "Green".into(),
                    value: "green".into(),
                }],
                selected: Some(0),
                pending: None,
                existing: None,
            },
        }];

        let request = submit_form(session, &fields);
        assert_eq!(request.method, "PUT");
        assert_eq!(request.url, WIDGET_URL);
        assert_eq!(request.body, json!({ ex("colour"): { "@id": "green" } }));
    }

    #[test]
    fn edited_form_submits_values_and_type() {
        let doc = colour_with_allowed_values();
        let mut store = FormSessionStore::new();
        let id = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, WIDGET_URL, Some(existing_widget()))
            .unwrap();
        let mut model = build_form_model(&mut store, &id, &doc).unwrap();
        assert!(model.field_mut(&ex("colour")).unwrap().select("blue"));

        let request = submit_form(store.get_form_data(&id).unwrap(), &model.fields);
        assert_eq!(
            request.body,
            json!({ ex("colour"): "blue", "@type": ex("Widget") })
        );
    }
}

mod sessions {
    use super::*;

    #[test]
    fn same_key_overwrites_earlier_session() {
        let doc = colour_with_allowed_values();
        let mut store = FormSessionStore::new();
        let first = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, "http://example.com/a", None)
            .unwrap();
        let second = store
            .create_session(&doc, &put_widget(), "PUT", WIDGET_URL, "http://example.com/b", None)
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.get_form_data(&first).unwrap().resource_iri,
            "http://example.com/b"
        );
    }

    #[test]
    fn response_chains_into_next_form() {
        let doc = ApiDocumentation::from_expanded(&json!([{
            hydra::SUPPORTED_CLASS: [
                {
                    "@id": ex("Widget"),
                    hydra::SUPPORTED_PROPERTY: [{
                        hydra::PROPERTY: [{ "@id": ex("name"), "@type": [rdf::PROPERTY] }]
                    }]
                },
                {
                    "@id": ex("Draft"),
                    hydra::SUPPORTED_OPERATION: [{
                        hydra::METHOD: [{ "@value": "PUT" }],
                        hydra::EXPECTS: [{ "@id": ex("Widget") }]
                    }]
                }
            ]
        }]))
        .unwrap();
        let mut store = FormSessionStore::new();

        let response = json!([{
            "@id": "http://example.com/drafts/7",
            "@type": [ex("Draft")],
            ex("name"): [{ "@value": "gear" }]
        }]);
        let next = store
            .chain_from_response(&doc, &response, "http://example.com/drafts")
            .unwrap()
            .unwrap();
        let session = store.get_form_data(&next).unwrap();
        assert_eq!(session.method, "PUT");
        assert_eq!(session.url, "http://example.com/drafts/7");

        let model = build_form_model(&mut store, &next, &doc).unwrap();
        assert_eq!(
            model.fields[0].input,
            FieldInput::Text {
                value: "gear".into()
            }
        );

        let untyped = json!([{ "@id": "http://example.com/x" }]);
        assert!(store
            .chain_from_response(&doc, &untyped, "http://example.com/x")
            .unwrap()
            .is_none());
    }
}
