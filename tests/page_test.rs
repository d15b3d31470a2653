//! Integration tests for resource classification and page building.

use hydra_client::vocab::{hydra, rdf, rdfs, ui};
use hydra_client::{
    build_page, build_page_items, id_of, ApiDocumentation, FormSessionStore, HydraError,
    NavigationContext, Page, PageItemKind, PropertyStyle, RouteTable, UiStyling,
};
use serde_json::{json, Value};

const EX: &str = "http://example.com/vocab#";

fn ex(term: &str) -> String {
    format!("{EX}{term}")
}

fn issue_api_doc() -> ApiDocumentation {
    ApiDocumentation::from_expanded(&json!([{
        "@id": "http://example.com/api-doc",
        "@type": [hydra::API_DOCUMENTATION],
        hydra::SUPPORTED_CLASS: [
            {
                "@id": ex("Issue"),
                rdfs::LABEL: [{ "@value": "Issue" }],
                hydra::SUPPORTED_PROPERTY: [
                    {
                        hydra::TITLE: [{ "@value": "Title" }],
                        hydra::PROPERTY: [{ "@id": ex("title"), "@type": [rdf::PROPERTY] }]
                    },
                    {
                        hydra::PROPERTY: [{
                            "@id": ex("description"),
                            "@type": [rdf::PROPERTY],
                            rdfs::LABEL: [{ "@value": "Description" }]
                        }]
                    },
                    {
                        hydra::PROPERTY: [{
                            "@id": ex("comments"),
                            "@type": [hydra::LINK],
                            hydra::SUPPORTED_OPERATION: [{
                                "@id": ex("addComment"),
                                hydra::METHOD: [{ "@value": "POST" }],
                                hydra::EXPECTS: [{ "@id": ex("Comment") }]
                            }]
                        }]
                    }
                ]
            },
            {
                "@id": ex("Comment"),
                hydra::SUPPORTED_PROPERTY: [{
                    hydra::PROPERTY: [{ "@id": ex("text"), "@type": [rdf::PROPERTY] }]
                }]
            },
            {
                "@id": ex("IssueList"),
                rdfs::SUB_CLASS_OF: [{ "@id": hydra::COLLECTION }]
            }
        ]
    }]))
    .unwrap()
}

fn issue() -> Value {
    json!([{
        "@id": "http://example.com/issues/1",
        "@type": [ex("Issue")],
        ex("title"): [{ "@value": "Crash on start" }],
        ex("description"): [{ "@value": "Segfault" }],
        ex("comments"): [{ "@id": "http://example.com/issues/1/comments" }]
    }])
}

fn items_of(page: Page) -> Vec<hydra_client::PageItem> {
    match page {
        Page::Item(page) => page.items,
        Page::Collection(c) => panic!("expected item page, got collection {:?}", c.iri),
    }
}

mod page_items {
    use super::*;

    #[test]
    fn one_item_per_property_in_document_order() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let mut ctx = NavigationContext::new(&doc, &routes, &mut sessions);

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());

        let properties: Vec<&str> = items.iter().map(|i| i.property.as_str()).collect();
        assert_eq!(properties, vec![ex("title"), ex("description"), ex("comments")]);
        assert_eq!(
            items[0].kind,
            PageItemKind::Property {
                value: json!("Crash on start")
            }
        );
        assert_eq!(
            items[2].kind,
            PageItemKind::Link {
                resource_iri: "http://example.com/issues/1/comments".into()
            }
        );
        assert_eq!(items[2].subject.as_deref(), Some("http://example.com/issues/1"));
    }

    #[test]
    fn labels_fall_back_from_title_to_label_to_iri() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let mut ctx = NavigationContext::new(&doc, &routes, &mut sessions);

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());
        assert_eq!(items[0].label, "Title");
        assert_eq!(items[1].label, "Description");
        assert_eq!(items[2].label, ex("comments"));
    }

    #[test]
    fn undocumented_key_fails_the_page() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let mut ctx = NavigationContext::new(&doc, &routes, &mut sessions);

        let resource = json!({
            "@type": [ex("Issue")],
            ex("title"): [{ "@value": "x" }],
            ex("assignee"): [{ "@value": "y" }]
        });
        let err = build_page(&resource, &mut ctx).unwrap_err();
        match err {
            HydraError::UnknownProperty { property, classes } => {
                assert_eq!(property, ex("assignee"));
                assert_eq!(classes, vec![ex("Issue")]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn keyword_keys_are_skipped() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let mut ctx = NavigationContext::new(&doc, &routes, &mut sessions);

        let resource = json!({ "@id": "x", "@type": [ex("Issue")], "@reverse": {} });
        let issue_class = ex("Issue");
        let items = build_page_items(&resource, &mut ctx, &[&issue_class]).unwrap();
        assert!(items.is_empty());
    }
}

mod styling {
    use super::*;

    fn styled(styles: &[(&str, PropertyStyle)]) -> UiStyling {
        let mut styling = UiStyling::new();
        for (property, style) in styles {
            styling.insert(&ex("Issue"), &ex(property), style.clone());
        }
        styling
    }

    #[test]
    fn items_sorted_by_order_with_stable_ties() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let styling = styled(&[
            (
                "title",
                PropertyStyle {
                    order: Some(5),
                    ..Default::default()
                },
            ),
            (
                "comments",
                PropertyStyle {
                    order: Some(-1),
                    css_class: Some("muted".into()),
                    ..Default::default()
                },
            ),
        ]);
        let mut ctx =
            NavigationContext::new(&doc, &routes, &mut sessions).with_styling(Some(&styling));

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());
        let properties: Vec<&str> = items.iter().map(|i| i.property.as_str()).collect();
        // description has no order and sorts as 0
        assert_eq!(properties, vec![ex("comments"), ex("description"), ex("title")]);
        assert_eq!(items[0].css_class.as_deref(), Some("muted"));
        assert_eq!(items[1].order, None);
    }

    #[test]
    fn swap_opens_post_form_on_link_target() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let styling = styled(&[(
            "comments",
            PropertyStyle {
                swap: Some("form".into()),
                ..Default::default()
            },
        )]);
        let mut ctx =
            NavigationContext::new(&doc, &routes, &mut sessions).with_styling(Some(&styling));

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());
        let comments = items.iter().find(|i| i.property == ex("comments")).unwrap();
        assert_eq!(comments.swap_type.as_deref(), Some("form"));

        let id = comments.form_id.clone().unwrap();
        let session = sessions.get_form_data(&id).unwrap();
        assert_eq!(session.method, "POST");
        assert_eq!(session.url, "http://example.com/issues/1/comments");
        assert_eq!(session.resource_iri, "http://example.com/issues/1");
        assert_eq!(session.payload_class, ex("Comment"));
    }

    #[test]
    fn swap_without_post_operation_is_ignored() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let styling = styled(&[(
            "title",
            PropertyStyle {
                swap: Some("form".into()),
                ..Default::default()
            },
        )]);
        let mut ctx =
            NavigationContext::new(&doc, &routes, &mut sessions).with_styling(Some(&styling));

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());
        assert!(items[0].swap_type.is_none());
        assert!(items[0].form_id.is_none());
        assert!(sessions.is_empty());
    }

    #[test]
    fn styling_document_drives_order() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let styling = UiStyling::from_expanded(&json!([{
            hydra::SUPPORTED_CLASS: [{
                "@id": ex("Issue"),
                hydra::SUPPORTED_PROPERTY: [{
                    hydra::PROPERTY: [{ "@id": ex("title") }],
                    ui::ORDER: [{ "@value": 10 }]
                }]
            }]
        }]))
        .unwrap();
        let mut ctx =
            NavigationContext::new(&doc, &routes, &mut sessions).with_styling(Some(&styling));

        let items = items_of(build_page(&issue(), &mut ctx).unwrap());
        assert_eq!(items.last().unwrap().property, ex("title"));
    }
}

mod classification {
    use super::*;

    #[test]
    fn subclass_of_collection_builds_collection_page() {
        let doc = issue_api_doc();
        let routes = RouteTable::new();
        let mut sessions = FormSessionStore::new();
        let mut ctx = NavigationContext::new(&doc, &routes, &mut sessions);

        let list = json!([{
            "@id": "http://example.com/issues",
            "@type": [ex("IssueList")],
            hydra::MEMBER: issue()
        }]);
        match build_page(&list, &mut ctx).unwrap() {
            Page::Collection(collection) => {
                assert_eq!(collection.members.len(), 1);
                assert_eq!(collection.members[0].items.len(), 3);
                assert_eq!(collection.members[0].title.as_deref(), Some("Issue"));
            }
            Page::Item(_) => panic!("expected a collection page"),
        }
    }

    #[test]
    fn find_supported_class_last_match_wins() {
        let doc = ApiDocumentation::from_expanded(&json!({
            hydra::SUPPORTED_CLASS: [
                { "@id": ex("A"), rdfs::LABEL: [{ "@value": "first" }] },
                { "@id": ex("A"), rdfs::LABEL: [{ "@value": "second" }] }
            ]
        }))
        .unwrap();
        let a = ex("A");
        assert_eq!(doc.find_supported_class(&[&a]).unwrap().display_title(), "second");
        assert!(doc.find_supported_class(&["http://example.com/none"]).is_none());
    }

    #[test]
    fn subclass_check_is_not_transitive() {
        let doc = ApiDocumentation::from_expanded(&json!({
            hydra::SUPPORTED_CLASS: [
                { "@id": ex("Page"), rdfs::SUB_CLASS_OF: [{ "@id": hydra::COLLECTION }] },
                { "@id": ex("SubPage"), rdfs::SUB_CLASS_OF: [{ "@id": ex("Page") }] }
            ]
        }))
        .unwrap();
        assert!(doc.is_sub_class_of(&ex("Page"), &[hydra::COLLECTION]));
        assert!(!doc.is_sub_class_of(&ex("SubPage"), &[hydra::COLLECTION]));
    }

    #[test]
    fn id_of_requires_exactly_one_reference() {
        assert_eq!(id_of(&json!([{ "@id": "x" }])).unwrap(), "x");
        assert!(matches!(
            id_of(&json!([{ "@id": "x" }, { "@id": "y" }])),
            Err(HydraError::MalformedReference { found: 2 })
        ));
    }
}
