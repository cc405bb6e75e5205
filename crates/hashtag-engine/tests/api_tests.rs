mod common;

use serde_json::json;

use hashtag_core::error::Error;
use hashtag_core::guardian::Guardian;
use hashtag_core::types::HashtagType;
use hashtag_engine::api::{self, RequestDefaults};

use common::{refs, service, FakeSource};

fn svc() -> hashtag_engine::HashtagAutocompleteService {
    service(FakeSource::new("folder", &["general", "news"]), FakeSource::new("tag", &["general", "rust"]))
}

#[test]
fn lookup_rejects_non_array_slugs() {
    let defaults = RequestDefaults::default();
    for params in [json!({}), json!({ "slugs": "general" }), json!({ "slugs": [1, 2] })] {
        let err = api::lookup(&svc(), &Guardian::anonymous(), &params, &defaults).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)), "params {}", params);
    }
}

#[test]
fn lookup_rejects_non_array_order() {
    let params = json!({ "slugs": ["general"], "order": "category" });
    let err = api::lookup(&svc(), &Guardian::anonymous(), &params, &RequestDefaults::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidParameters(_)));
}

#[test]
fn lookup_uses_context_order_when_order_missing() {
    let params = json!({ "slugs": ["general", "rust"] });
    let result = api::lookup(&svc(), &Guardian::anonymous(), &params, &RequestDefaults::default()).unwrap();
    assert_eq!(refs(&result[&HashtagType::Category]), vec!["general"]);
    assert_eq!(refs(&result[&HashtagType::Tag]), vec!["rust"]);

    let explicit = json!({ "slugs": ["general"], "order": ["tag", "category"] });
    let result = api::lookup(&svc(), &Guardian::anonymous(), &explicit, &RequestDefaults::default()).unwrap();
    assert_eq!(refs(&result[&HashtagType::Tag]), vec!["general"]);
}

#[test]
fn lookup_response_serializes_by_type() {
    let params = json!({ "slugs": ["news"] });
    let result = api::lookup(&svc(), &Guardian::anonymous(), &params, &RequestDefaults::default()).unwrap();
    let body = serde_json::to_value(&result).unwrap();
    assert_eq!(body["category"][0]["ref"], "news");
    assert_eq!(body["category"][0]["type"], "category");
    assert_eq!(body["tag"], json!([]));
}

#[test]
fn search_defaults_limit_and_term() {
    let defaults = RequestDefaults { context: "topic-composer".to_string(), search_limit: 2 };
    let response = api::search(&svc(), &Guardian::anonymous(), &json!({}), &defaults).unwrap();
    assert_eq!(refs(&response.results), vec!["general", "general::tag"]);

    let response = api::search(
        &svc(),
        &Guardian::anonymous(),
        &json!({ "term": "ru", "limit": 10, "order": ["tag"] }),
        &defaults,
    )
    .unwrap();
    assert_eq!(refs(&response.results), vec!["rust"]);
}

#[test]
fn search_rejects_malformed_fields() {
    let defaults = RequestDefaults::default();
    for params in [
        json!({ "term": 5 }),
        json!({ "limit": "ten" }),
        json!({ "limit": -1 }),
        json!({ "order": { "a": 1 } }),
        json!({ "context": ["x"] }),
    ] {
        let err = api::search(&svc(), &Guardian::anonymous(), &params, &defaults).unwrap_err();
        assert!(matches!(err, Error::InvalidParameters(_)), "params {}", params);
    }
}
