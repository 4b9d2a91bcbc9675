//! Human-oriented view of a backed-up document.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::Serialize;
use serde_json::Value;
use value::{TaggedDocument, TypeTag};

/// Tag shown for a nested entry that is not `{ value, type }`.
pub const UNTAGGED: &str = "<untagged>";

static NULL: Value = Value::Null;

/// One field of a document and, for containers, its entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSummary {
    pub name: String,
    pub tag: String,
    /// Whether the tag is one the codec can decode.
    pub known: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<FieldSummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InspectReport {
    pub fields: Vec<FieldSummary>,
    /// Occurrences of each tag, nested entries included.
    pub tag_counts: BTreeMap<String, usize>,
}

impl InspectReport {
    /// Number of fields and nested entries whose tag cannot be decoded.
    #[must_use]
    pub fn unknown(&self) -> usize {
        self.tag_counts
            .iter()
            .filter(|(tag, _)| tag.parse::<TypeTag>().is_err())
            .map(|(_, count)| count)
            .sum()
    }
}

/// Builds the per-field tag tree of a document.
pub fn summarize(doc: &TaggedDocument) -> InspectReport {
    let mut report = InspectReport::default();
    let fields = doc
        .iter()
        .map(|(name, tagged)| summarize_field(name.clone(), &tagged.tag, &tagged.value, &mut report))
        .collect();
    report.fields = fields;
    report
}

fn summarize_field(
    name: String,
    tag: &str,
    value: &Value,
    report: &mut InspectReport,
) -> FieldSummary {
    *report.tag_counts.entry(tag.to_string()).or_insert(0) += 1;
    let parsed = tag.parse::<TypeTag>().ok();
    let children = match (parsed, value) {
        (Some(TypeTag::Object), Value::Object(map)) => map
            .iter()
            .map(|(key, entry)| summarize_entry(key.clone(), entry, report))
            .collect(),
        (Some(TypeTag::Array), Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(index, entry)| summarize_entry(format!("[{index}]"), entry, report))
            .collect(),
        _ => Vec::new(),
    };
    FieldSummary {
        name,
        tag: tag.to_string(),
        known: parsed.is_some(),
        children,
    }
}

fn summarize_entry(name: String, entry: &Value, report: &mut InspectReport) -> FieldSummary {
    let tag = entry
        .as_object()
        .and_then(|map| map.get("type"))
        .and_then(Value::as_str);
    match tag {
        Some(tag) => {
            let value = entry.get("value").unwrap_or(&NULL);
            summarize_field(name, tag, value, report)
        }
        None => summarize_field(name, UNTAGGED, &NULL, report),
    }
}

/// Renders a report as an indented tree followed by tag counts.
#[must_use]
pub fn format_inspect_pretty(report: &InspectReport) -> String {
    let mut out = String::new();
    for field in &report.fields {
        write_field(&mut out, field, 0);
    }
    out.push_str("tags:\n");
    for (tag, count) in &report.tag_counts {
        let _ = writeln!(out, "  {tag}: {count}");
    }
    out
}

fn write_field(out: &mut String, field: &FieldSummary, depth: usize) {
    let indent = "  ".repeat(depth);
    let _ = write!(out, "{indent}{}: {}", field.name, field.tag);
    if !field.known {
        out.push_str(" (unknown tag)");
    } else if !field.children.is_empty() {
        let _ = write!(out, " ({})", field.children.len());
    }
    out.push('\n');
    for child in &field.children {
        write_field(out, child, depth + 1);
    }
}
