//! TabularView pagination arithmetic and column rendering.

use dashgate::normalize::normalize;
use dashgate::table::{build, cell_text, format_date_safe, paginate, Column};
use serde_json::{json, Value};

fn records(n: usize) -> Vec<dashgate::normalize::Record> {
    let items: Vec<Value> = (0..n).map(|i| json!({ "id": format!("r{}", i), "n": i })).collect();
    normalize(&Value::Array(items), &[])
}

#[test]
fn twenty_five_records_make_three_pages_of_ten() {
    let recs = records(25);
    let (page, total_pages) = paginate(&recs, 10, 1);
    assert_eq!(page.len(), 10);
    assert_eq!(total_pages, 3);

    let (page, _) = paginate(&recs, 10, 3);
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].id, "r20");
}

#[test]
fn zero_records_still_have_one_page() {
    let recs = records(0);
    let (page, total_pages) = paginate(&recs, 10, 1);
    assert!(page.is_empty());
    assert_eq!(total_pages, 1);
}

#[test]
fn out_of_range_pages_are_clamped() {
    let recs = records(25);
    let (page, total_pages) = paginate(&recs, 10, 99);
    assert_eq!(total_pages, 3);
    assert_eq!(page.len(), 5);
    assert_eq!(page[0].id, "r20");

    let (page, _) = paginate(&recs, 10, 0);
    assert_eq!(page[0].id, "r0");
}

#[test]
fn exact_multiple_has_no_short_last_page() {
    let recs = records(30);
    let (_, total_pages) = paginate(&recs, 10, 1);
    assert_eq!(total_pages, 3);
    let (page, _) = paginate(&recs, 10, 3);
    assert_eq!(page.len(), 10);
}

#[test]
fn build_reports_navigation_bounds() {
    let recs = records(25);
    let cols = vec![Column::field("N", "n")];

    let view = build(&recs, &cols, 10, 1);
    assert_eq!(view.total, 25);
    assert_eq!(view.total_pages, 3);
    assert!(!view.has_previous);
    assert!(view.has_next);
    assert_eq!(view.rows.len(), 10);
    assert_eq!(view.rows[0].id, "r0");
    assert_eq!(view.rows[0].cells, vec!["0".to_string()]);

    let view = build(&recs, &cols, 10, 3);
    assert!(view.has_previous);
    assert!(!view.has_next);
}

#[test]
fn missing_values_render_as_empty_strings() {
    let recs = normalize(&json!([{ "id": "a", "name": "Ada" }, { "id": "b" }]), &[]);
    let cols = vec![Column::field("Name", "name"), Column::field("Ghost", "ghost")];
    let view = build(&recs, &cols, 10, 1);
    assert_eq!(view.rows[0].cells, vec!["Ada".to_string(), "".to_string()]);
    assert_eq!(view.rows[1].cells, vec!["".to_string(), "".to_string()]);
}

#[test]
fn derived_columns_see_the_whole_record() {
    let recs = normalize(&json!([{ "id": "a", "likes": 2, "shares": 3 }]), &[]);
    let cols = vec![Column::derived("Engagement", |r| {
        (r.i64_field("likes") + r.i64_field("shares")).to_string()
    })];
    let view = build(&recs, &cols, 10, 1);
    assert_eq!(view.rows[0].cells, vec!["5".to_string()]);
}

#[test]
fn cell_text_rendering() {
    assert_eq!(cell_text(&Value::Null), "");
    assert_eq!(cell_text(&json!("x")), "x");
    assert_eq!(cell_text(&json!(4)), "4");
    assert_eq!(cell_text(&json!(true)), "true");
    assert_eq!(cell_text(&json!({"a": 1})), "{\"a\":1}");
}

#[test]
fn date_formatting_falls_back_safely() {
    let v = json!("2024-01-02T03:04:05Z");
    assert_eq!(format_date_safe(Some(&v), "%Y-%m-%d", "N/A"), "2024-01-02");
    assert_eq!(format_date_safe(Some(&json!("not a date")), "%Y", "N/A"), "N/A");
    assert_eq!(format_date_safe(Some(&json!("")), "%Y", "Never"), "Never");
    assert_eq!(format_date_safe(Some(&json!(12)), "%Y", "N/A"), "N/A");
    assert_eq!(format_date_safe(None, "%Y", "N/A"), "N/A");
}
