use crate::line::Line;
use crate::metric::{FieldSet, FieldValue, TagSet};
use std::fmt::Write;

pub fn format_string(key: &str) -> String {
    // Measurement names, tag keys, tag values and field keys escape commas,
    // spaces and equal signs with a backslash. Tag values are never quoted.

    let mut escaped = String::with_capacity(key.len());
    for c in key.chars() {
        if matches!(c, ',' | ' ' | '=') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub fn format_value(value: &FieldValue) -> String {
    // Integers carry a trailing `i`, otherwise the collector stores them as
    // floats. Strings are double-quoted with `"` and newlines escaped.

    match value {
        FieldValue::String(string_value) => {
            let mut quoted = String::with_capacity(string_value.len() + 2);
            quoted.push('"');
            for c in string_value.chars() {
                match c {
                    '"' => quoted.push_str("\\\""),
                    '\n' => quoted.push_str("\\n"),
                    _ => quoted.push(c),
                }
            }
            quoted.push('"');
            quoted
        }
        FieldValue::I64(int_value) => format!("{}i", int_value),
        FieldValue::Boolean(bool_value) => bool_value.to_string(),
        FieldValue::F64(float_value) => float_value.to_string(),
    }
}

pub fn format_tags(tags: &TagSet) -> String {
    tags.iter()
        .map(|(tag_key, tag_value)| {
            format!("{}={}", format_string(tag_key), format_string(tag_value))
        })
        .collect::<Vec<_>>()
        .join(",")
}

pub fn format_fields(fields: &FieldSet) -> String {
    fields
        .present()
        .map(|(field_key, field_value)| {
            format!("{}={}", format_string(field_key), field_value)
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn assemble(
    measurement: &str,
    tags: &TagSet,
    fields: &FieldSet,
    timestamp: Option<i64>,
) -> String {
    // <measurement>[,<tag>=<value>...] <field>=<value>[,...][ <timestamp>]

    let mut line = format_string(measurement);
    if !tags.is_empty() {
        line.push(',');
        line.push_str(&format_tags(tags));
    }
    line.push(' ');
    line.push_str(&format_fields(fields));
    if let Some(timestamp) = timestamp {
        // Writing to a String cannot fail.
        let _ = write!(line, " {}", timestamp);
    }
    line
}

#[tracing::instrument(skip_all, level = tracing::Level::TRACE)]
pub fn join_lines<'a, I>(lines: I) -> String
where
    I: IntoIterator<Item = &'a Line>,
{
    lines
        .into_iter()
        .map(Line::to_line_protocol)
        .collect::<Vec<_>>()
        .join("\n")
}
