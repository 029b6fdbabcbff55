//! ResponseNormalizer behavior across the three known upstream shapes, plus the
//! totality and determinism guarantees.

use dashgate::normalize::{classify, normalize, normalize_with_ids, Shape};
use serde_json::{json, Value};

#[test]
fn direct_array_passes_through_in_order() {
    let raw = json!([
        { "id": "a", "n": 1 },
        { "id": "b", "n": 2 },
        { "id": "c", "n": 3 },
    ]);
    let recs = normalize(&raw, &["data"]);
    assert_eq!(recs.len(), 3);
    assert_eq!(recs.iter().map(|r| r.id.as_str()).collect::<Vec<_>>(), vec!["a", "b", "c"]);
}

#[test]
fn wrapper_candidates_tried_in_caller_order() {
    let raw = json!({ "posts": [{ "id": "p1" }], "data": [{ "id": "d1" }, { "id": "d2" }] });
    // "posts" first
    let recs = normalize(&raw, &["posts", "data"]);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, "p1");
    // "data" first
    let recs = normalize(&raw, &["data", "posts"]);
    assert_eq!(recs.len(), 2);
}

#[test]
fn wrapper_key_holding_non_array_falls_through_to_keyed_map() {
    // "data" names a scalar, so the object is enumerated as a keyed map instead.
    let raw = json!({ "data": 42, "alpha": { "n": 1 }, "beta": { "n": 2 } });
    let recs = normalize(&raw, &["data"]);
    assert_eq!(recs.len(), 3);
    // Map keys become identifiers for records without their own.
    let ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
    assert!(ids.contains(&"alpha"));
    assert!(ids.contains(&"beta"));
}

#[test]
fn keyed_map_key_becomes_identifier() {
    // Bot-status style payload keyed by platform.
    let raw = json!({ "twitter": { "status": "idle", "lastRun": "2024-01-01" } });
    let recs = normalize(&raw, &["bots", "data"]);
    assert_eq!(recs.len(), 1);
    assert_eq!(recs[0].id, "twitter");
    assert_eq!(recs[0].str_field("status"), Some("idle"));
}

#[test]
fn record_own_id_beats_keyed_map_key() {
    let raw = json!({ "k1": { "id": "own" } });
    let recs = normalize(&raw, &[]);
    assert_eq!(recs[0].id, "own");
}

#[test]
fn designated_field_beats_positional_synthesis() {
    let raw = json!([
        { "user_id": "u-9", "total_likes": 4 },
        { "total_likes": 2 },
    ]);
    let recs = normalize_with_ids(&raw, &[], Some("user_id"), "user");
    assert_eq!(recs[0].id, "u-9");
    assert_eq!(recs[1].id, "user-1");
}

#[test]
fn numeric_ids_are_stringified() {
    let raw = json!([{ "id": 7 }]);
    let recs = normalize(&raw, &[]);
    assert_eq!(recs[0].id, "7");
}

#[test]
fn positional_ids_unique_within_one_call() {
    let raw = json!([{}, {}, {}]);
    let recs = normalize(&raw, &[]);
    let mut ids: Vec<&str> = recs.iter().map(|r| r.id.as_str()).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

#[test]
fn null_and_scalar_inputs_yield_empty() {
    assert!(normalize(&Value::Null, &["data"]).is_empty());
    assert!(normalize(&json!("oops"), &["data"]).is_empty());
    assert!(normalize(&json!(42), &["data"]).is_empty());
    assert!(normalize(&json!(true), &["data"]).is_empty());
    assert!(normalize(&json!([]), &["data"]).is_empty());
    assert!(normalize(&json!({}), &["data"]).is_empty());
}

#[test]
fn deeply_malformed_inputs_never_panic() {
    let cases = vec![
        json!({ "data": { "data": { "data": null } } }),
        json!([null, 1, "x", [1, 2], { "id": "ok" }]),
        json!({ "data": [null, null] }),
        json!({ "": { "": "" } }),
    ];
    for raw in &cases {
        let _ = normalize(raw, &["data", ""]);
    }
    // Non-object rows keep their value so counts still match the payload.
    let recs = normalize(&json!([null, 1, "x"]), &[]);
    assert_eq!(recs.len(), 3);
}

#[test]
fn normalize_is_deterministic_for_same_input() {
    let raw = json!({ "data": [{ "id": "a" }, { "n": 2 }] });
    let first = normalize(&raw, &["data"]);
    let second = normalize(&raw, &["data"]);
    assert_eq!(first, second);
}

#[test]
fn classify_reports_shapes() {
    assert!(matches!(classify(&json!([1]), &[]), Shape::List(_)));
    assert!(matches!(classify(&json!({"data": [1]}), &["data"]), Shape::Wrapped("data", _)));
    assert!(matches!(classify(&json!({"x": 1}), &["data"]), Shape::Keyed(_)));
    assert!(matches!(classify(&Value::Null, &[]), Shape::Empty));
    assert!(matches!(classify(&json!(3.5), &[]), Shape::Unrecognized));
}

#[test]
fn engagement_wrapper_counts_and_values_survive() {
    // Wrapper-shape engagements list; the aggregate over it is computed elsewhere,
    // but the normalized values must be intact for it to sum to 8.
    let raw = json!({ "engagements": [
        { "id": "1", "likes": 5 },
        { "id": "2", "likes": 3 },
    ]});
    let recs = normalize(&raw, &["engagements"]);
    assert_eq!(recs.len(), 2);
    let sum: i64 = recs.iter().map(|r| r.i64_field("likes")).sum();
    assert_eq!(sum, 8);
}
