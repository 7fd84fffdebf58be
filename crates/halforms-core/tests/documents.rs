//! Parsing of complete documents.
//!
//! Covers the example documents of the HAL draft and nested documents whose
//! relative links must be resolved against the nearest self href.

use halforms_core::{parse, HalError, Link, Resource};
use serde_json::{json, Value};

fn orders() -> Value {
    json!({
        "_links": {
            "self": { "href": "/orders" },
            "curies": [{ "name": "ea", "href": "http://example.com/docs/rels/{rel}", "templated": true }],
            "next": { "href": "/orders?page=2" },
            "ea:find": { "href": "/orders{?id}", "templated": true },
            "ea:admin": [
                { "href": "/admins/2", "title": "Fred" },
                { "href": "/admins/5", "title": "Kate" }
            ]
        },
        "currentlyProcessing": 14,
        "shippedToday": 20,
        "_embedded": {
            "ea:order": [
                {
                    "_links": {
                        "self": { "href": "/orders/123" },
                        "ea:basket": { "href": "/baskets/98712" },
                        "ea:customer": { "href": "/customers/7809" }
                    },
                    "total": 30.00,
                    "currency": "USD",
                    "status": "shipped"
                },
                {
                    "_links": {
                        "self": { "href": "/orders/124" },
                        "ea:basket": { "href": "/baskets/97213" },
                        "ea:customer": { "href": "/customers/12369" }
                    },
                    "total": 20.00,
                    "currency": "USD",
                    "status": "processing"
                }
            ]
        }
    })
}

fn resolved(link: Option<&Link>) -> String {
    link.expect("link should exist").resolved_href().unwrap()
}

#[test]
fn test_orders_document() {
    let resource = parse("http://example.org/api/", orders());

    assert_eq!(resource.rel(), "self");
    assert_eq!(resource.self_href(), "http://example.org/orders");
    assert_eq!(
        resource.content(),
        Some(&json!({ "currentlyProcessing": 14, "shippedToday": 20 }))
    );

    assert_eq!(resource.all_links().unwrap().len(), 6);
    assert_eq!(
        resolved(resource.link("next").unwrap()),
        "http://example.org/orders?page=2"
    );
    assert!(resource.link("ea:find").unwrap().unwrap().templated());

    let admins = resource.links("ea:admin").unwrap().unwrap();
    let titles: Vec<_> = admins.iter().filter_map(|l| l.title()).collect();
    assert_eq!(titles, vec!["Fred", "Kate"]);

    let orders = resource.embeddeds("ea:order").unwrap().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].rel(), "ea:order");
    assert_eq!(orders[0].self_href(), "http://example.org/orders/123");
    assert_eq!(
        resolved(orders[1].link("ea:basket").unwrap()),
        "http://example.org/baskets/97213"
    );
    assert_eq!(orders[1].content().unwrap()["status"], "processing");
}

#[test]
fn test_cardinality_errors() {
    let resource = parse("http://example.org/", orders());

    assert!(matches!(
        resource.link("curies"),
        Err(HalError::MultivaluedLink { ref rel }) if rel == "curies"
    ));
    assert!(matches!(
        resource.links("next"),
        Err(HalError::MonovaluedLink { ref rel }) if rel == "next"
    ));
    assert!(matches!(
        resource.embedded("ea:order"),
        Err(HalError::MultivaluedEmbedded { .. })
    ));
    assert!(resource.embedded("ea:missing").unwrap().is_none());
    assert!(resource.embeddeds("ea:missing").unwrap().is_none());
}

#[test]
fn test_names_as_secondary_key() {
    let resource = parse(
        "https://hal-links.test",
        json!({
            "_links": {
                "family:members": [
                    { "href": "/person/320", "name": "father" },
                    { "href": "/person/429", "name": "mother" },
                    { "href": "/person/914", "name": "daughter" },
                    { "href": "/person/1592", "name": "daughter" }
                ],
                "family:pet": { "href": "/pet/12", "name": "dog" }
            }
        }),
    );

    let father = resource.link_named("family:members", "father").unwrap();
    assert_eq!(father.unwrap().href(), "/person/320");

    let daughters = resource
        .links_named("family:members", "daughter")
        .unwrap()
        .unwrap();
    assert_eq!(daughters.len(), 2);

    let err = resource.link_named("family:members", "daughter").unwrap_err();
    assert!(matches!(err, HalError::AmbiguousName { count: 2, .. }));
    assert!(err.is_shape_mismatch());

    assert!(resource.link_named("family:members", "son").unwrap().is_none());
    assert!(resource.links_named("family:members", "son").unwrap().is_none());

    assert_eq!(
        resource.link_named("family:pet", "dog").unwrap().unwrap().href(),
        "/pet/12"
    );
    assert!(matches!(
        resource.links_named("family:pet", "dog"),
        Err(HalError::MonovaluedLink { .. })
    ));
}

#[test]
fn test_nearest_self_is_the_base() {
    let resource = parse(
        "https://hal-links.test",
        json!({
            "_links": { "self": { "href": "/first/712" } },
            "_embedded": {
                "e1": {
                    "_links": {
                        "self": { "href": "e1/12" },
                        "other": { "href": "other/42" }
                    }
                },
                "e2": {
                    "_links": { "self": { "href": "https://elsewhere.test/e2/41" } },
                    "_embedded": {
                        "e3": { "_links": { "self": { "href": "e3/321" } } },
                        "e4": { "_links": { "self": { "href": "/e4/4289" } } }
                    }
                }
            }
        }),
    );

    assert_eq!(
        resolved(resource.link("self").unwrap()),
        "https://hal-links.test/first/712"
    );

    let e1 = resource.embedded("e1").unwrap().unwrap();
    assert_eq!(
        resolved(e1.link("self").unwrap()),
        "https://hal-links.test/first/e1/12"
    );
    assert_eq!(
        resolved(e1.link("other").unwrap()),
        "https://hal-links.test/first/e1/other/42"
    );

    let e2 = resource.embedded("e2").unwrap().unwrap();
    assert_eq!(
        resolved(e2.link("self").unwrap()),
        "https://elsewhere.test/e2/41"
    );

    let e3 = e2.embedded("e3").unwrap().unwrap();
    assert_eq!(
        resolved(e3.link("self").unwrap()),
        "https://elsewhere.test/e2/e3/321"
    );
    let e4 = e2.embedded("e4").unwrap().unwrap();
    assert_eq!(e4.self_href(), "https://elsewhere.test/e4/4289");
}

#[test]
fn test_nested_embedded() {
    let resource = parse(
        "https://hal-links.test",
        json!({
            "_embedded": {
                "level_0_0": {
                    "prop": "level0_0",
                    "_links": { "self": { "href": "/level0_0" } },
                    "_embedded": {
                        "level_1_0": { "prop": "level1_0", "_links": { "self": { "href": "/level1_0" } } },
                        "level_1_1": [
                            {
                                "prop": "level1_1_0",
                                "_links": { "self": { "href": "/level1_1_0" } },
                                "_embedded": {
                                    "level_2_1": [
                                        { "prop": "level2_1_0", "_links": { "self": { "href": "/level2_1_0" } } }
                                    ]
                                }
                            },
                            { "prop": "level1_1_1", "_links": { "self": { "href": "/level1_1_1" } } }
                        ]
                    }
                }
            },
            "foo": "bar"
        }),
    );

    let prop = |r: &Resource| r.content().unwrap()["prop"].as_str().unwrap().to_string();

    let level_0_0 = resource.embedded("level_0_0").unwrap().unwrap();
    assert_eq!(prop(level_0_0), "level0_0");

    let level_1_0 = level_0_0.embedded("level_1_0").unwrap().unwrap();
    assert_eq!(prop(level_1_0), "level1_0");
    assert_eq!(level_1_0.link("self").unwrap().unwrap().href(), "/level1_0");

    let level_1_1 = level_0_0.embeddeds("level_1_1").unwrap().unwrap();
    assert_eq!(level_1_1.len(), 2);
    assert_eq!(prop(level_1_1[1]), "level1_1_1");

    let level_2_1 = level_1_1[0].embeddeds("level_2_1").unwrap().unwrap();
    assert_eq!(level_2_1.len(), 1);
    assert_eq!(prop(level_2_1[0]), "level2_1_0");
    assert_eq!(level_2_1[0].self_href(), "https://hal-links.test/level2_1_0");

    assert_eq!(resource.all_embedded().unwrap().len(), 1);
}

#[test]
fn test_document_without_hypermedia() {
    let resource = parse("https://hal.test", json!({ "foo": "bar" }));
    assert!(resource.all_links().is_none());
    assert!(resource.all_embedded().is_none());
    assert!(resource.templates().is_none());
    assert_eq!(resource.content().unwrap()["foo"], "bar");
}

#[test]
fn test_embedded_named_by_self_link() {
    let resource = parse(
        "https://hal.test/",
        json!({
            "_embedded": {
                "people": [
                    { "_links": { "self": { "href": "/p/1", "name": "ada" } } },
                    { "_links": { "self": { "href": "/p/2", "name": "alan" } } }
                ]
            }
        }),
    );
    let ada = resource.embeddeds_named("people", "ada").unwrap().unwrap();
    assert_eq!(ada.len(), 1);
    assert_eq!(ada[0].self_href(), "https://hal.test/p/1");
    assert!(resource.embeddeds_named("people", "grace").unwrap().is_none());
}
