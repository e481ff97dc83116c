use crate::line_protocol::assemble;
use crate::metric::{FieldSet, FieldValue, TagSet, DEFAULT_FIELD_NAME};

/// One metric observation, rendered once with [`Line::to_line_protocol`].
///
/// A line is put together with the builder methods below and is not
/// changed afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    measurement: String,
    fields: FieldSet,
    tags: TagSet,
    timestamp: Option<i64>,
}

impl Line {
    /// Builds a line with a single field named `value`.
    pub fn new(measurement: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self::with_fields(
            measurement,
            FieldSet::new().field(DEFAULT_FIELD_NAME, value),
        )
    }

    pub fn with_fields(measurement: impl Into<String>, fields: FieldSet) -> Self {
        Line {
            measurement: measurement.into(),
            fields,
            tags: TagSet::new(),
            timestamp: None,
        }
    }

    pub fn tag(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.tags.insert(key.into(), value.to_string());
        self
    }

    pub fn tags<I, K, V>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: ToString,
    {
        self.tags
            .extend(tags.into_iter().map(|(key, value)| (key.into(), value.to_string())));
        self
    }

    pub fn timestamp(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn measurement(&self) -> &str {
        &self.measurement
    }

    pub fn fields(&self) -> &FieldSet {
        &self.fields
    }

    pub fn tag_set(&self) -> &TagSet {
        &self.tags
    }

    pub fn time(&self) -> Option<i64> {
        self.timestamp
    }

    /// Whether at least one field survives null filtering. A line without
    /// one is rejected by the collector.
    pub fn has_fields(&self) -> bool {
        self.fields.has_values()
    }

    pub fn to_line_protocol(&self) -> String {
        assemble(&self.measurement, &self.tags, &self.fields, self.timestamp)
    }
}

impl std::fmt::Display for Line {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&self.to_line_protocol())
    }
}
