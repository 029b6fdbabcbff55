//! Pagination and column projection over normalized records.

use chrono::DateTime;
use serde::Serialize;
use serde_json::Value;

use crate::normalize::Record;

pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Pagination arithmetic: `total_pages = max(1, ceil(len / page_size))`. The
/// requested page number is clamped into range, so navigation past the bounds is
/// impossible rather than an error. Returns the page slice and the total page count.
pub fn paginate(records: &[Record], page_size: usize, page_number: usize) -> (&[Record], usize) {
    let page_size = page_size.max(1);
    let total_pages = ((records.len() + page_size - 1) / page_size).max(1);
    let page = page_number.clamp(1, total_pages);
    let start = (page - 1) * page_size;
    let end = (start + page_size).min(records.len());
    let slice = records.get(start..end).unwrap_or(&[]);
    (slice, total_pages)
}

/// A rendered column: either a direct field projection or a caller-supplied
/// derivation over the whole record.
pub enum Accessor {
    Field(&'static str),
    Derived(Box<dyn Fn(&Record) -> String + Send + Sync>),
}

pub struct Column {
    pub header: &'static str,
    pub accessor: Accessor,
}

impl Column {
    pub fn field(header: &'static str, field: &'static str) -> Self {
        Self { header, accessor: Accessor::Field(field) }
    }

    pub fn derived(header: &'static str, f: impl Fn(&Record) -> String + Send + Sync + 'static) -> Self {
        Self { header, accessor: Accessor::Derived(Box::new(f)) }
    }

    fn render(&self, record: &Record) -> String {
        match &self.accessor {
            Accessor::Field(field) => record.get(field).map(cell_text).unwrap_or_default(),
            Accessor::Derived(f) => f(record),
        }
    }
}

/// Missing and null values render as empty strings, never an error; composite
/// values render as compact JSON.
pub fn cell_text(v: &Value) -> String {
    match v {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Parse a date-like value and format it with a chrono format string, returning
/// the fallback when the value is missing, empty, or unparsable.
pub fn format_date_safe(v: Option<&Value>, fmt: &str, fallback: &str) -> String {
    let Some(s) = v.and_then(|v| v.as_str()) else {
        return fallback.to_string();
    };
    if s.is_empty() {
        return fallback.to_string();
    }
    match DateTime::parse_from_rfc3339(s) {
        Ok(dt) => dt.format(fmt).to_string(),
        Err(_) => fallback.to_string(),
    }
}

/// Serialized payload for one page of a view.
#[derive(Debug, Clone, Serialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<TableRow>,
    pub page: usize,
    pub total_pages: usize,
    pub total: usize,
    pub has_previous: bool,
    pub has_next: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct TableRow {
    pub id: String,
    pub cells: Vec<String>,
}

/// Project a normalized sequence into one rendered page.
pub fn build(records: &[Record], columns: &[Column], page_size: usize, page_number: usize) -> TableView {
    let (slice, total_pages) = paginate(records, page_size, page_number);
    let page = page_number.clamp(1, total_pages);
    TableView {
        headers: columns.iter().map(|c| c.header.to_string()).collect(),
        rows: slice
            .iter()
            .map(|r| TableRow {
                id: r.id.clone(),
                cells: columns.iter().map(|c| c.render(r)).collect(),
            })
            .collect(),
        page,
        total_pages,
        total: records.len(),
        has_previous: page > 1,
        has_next: page < total_pages,
    }
}
