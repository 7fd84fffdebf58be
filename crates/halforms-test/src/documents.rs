//! Canned HAL and HAL-FORMS documents.
//!
//! Relative hrefs only, so the same document can be served under any base.

use serde_json::{json, Value};

/// The order list of the HAL draft: single and multivalued links, a curie,
/// a templated link and two embedded orders.
pub fn orders() -> Value {
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

/// A single order with an edit form and a delete form.
pub fn order() -> Value {
    json!({
        "_links": {
            "self": { "href": "/orders/123" },
            "ea:customer": { "href": "/customers/7809" }
        },
        "total": 30.00,
        "currency": "USD",
        "status": "shipped",
        "_templates": {
            "default": {
                "title": "Edit order",
                "method": "put",
                "contentType": "application/json",
                "properties": [
                    { "name": "total", "type": "number", "required": true, "value": 30.00 },
                    { "name": "currency", "regex": "^[A-Z]{3}$", "value": "USD" },
                    { "name": "status", "readOnly": true, "value": "shipped" }
                ]
            },
            "delete": {
                "title": "Cancel order",
                "method": "DELETE"
            }
        }
    })
}

/// A customer search form posting url-encoded fields to another resource.
pub fn customer_search() -> Value {
    json!({
        "_links": {
            "self": { "href": "/customers/search" },
            "results": { "href": "/customers" }
        },
        "_templates": {
            "default": {
                "title": "Find customers",
                "method": "POST",
                "contentType": "application/x-www-form-urlencoded",
                "target": "results",
                "properties": [
                    { "name": "name", "type": "search", "prompt": "Name" },
                    { "name": "email", "type": "email" }
                ]
            }
        }
    })
}

/// Resources nested three levels deep with relative self links, each level
/// resolved against its parent's self href.
pub fn nested() -> Value {
    json!({
        "_links": { "self": { "href": "/first/712" } },
        "_embedded": {
            "e1": {
                "_links": { "self": { "href": "e1/12" }, "up": { "href": "../712" } },
                "_embedded": {
                    "e2": {
                        "_links": { "self": { "href": "e2/7" }, "sibling": { "href": "8" } }
                    }
                }
            }
        }
    })
}
