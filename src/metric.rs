use crate::line_protocol::format_value;
use anyhow::{anyhow, Error};
use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};

/// Name given to the single field of a line built from a bare value.
pub const DEFAULT_FIELD_NAME: &str = "value";

/// Tag name to tag value. `BTreeMap<String, _>` iterates in byte-wise key
/// order, which is the order the collector sorts tags in.
pub type TagSet = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Boolean(bool),
    I64(i64),
    F64(f64),
    String(String),
}

impl FieldValue {
    /// NaN and infinities have no line-protocol form.
    pub fn is_finite(&self) -> bool {
        match self {
            FieldValue::F64(float_value) => float_value.is_finite(),
            _ => true,
        }
    }
}

/// Renders the value as it appears on the right of `key=` in a line.
impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(&format_value(self))
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::I64(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::I64(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::I64(value.into())
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::F64(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::F64(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::String(value.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::String(value)
    }
}

impl TryFrom<&Value> for FieldValue {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        match value {
            Value::Bool(v) => Ok(FieldValue::Boolean(*v)),
            Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(int_value), _) => Ok(FieldValue::I64(int_value)),
                (None, Some(float_value)) => Ok(FieldValue::F64(float_value)),
                (None, None) => Err(anyhow!("Number {} is out of range", n)),
            },
            Value::String(v) => Ok(FieldValue::String(v.clone())),
            other => Err(anyhow!("Unsupported field value: {}", other)),
        }
    }
}

/// Field name to value. A `None` value is kept in the set but never
/// rendered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: BTreeMap<String, Option<FieldValue>>,
}

impl FieldSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), Some(value.into()));
        self
    }

    pub fn null(mut self, key: impl Into<String>) -> Self {
        self.fields.insert(key.into(), None);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Option<FieldValue>) {
        self.fields.insert(key.into(), value);
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates every entry, null ones included, in byte-wise key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Option<FieldValue>> {
        self.fields.iter()
    }

    /// Iterates the entries that will be rendered.
    pub fn present(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields
            .iter()
            .filter_map(|(key, value)| value.as_ref().map(|value| (key, value)))
    }

    pub fn has_values(&self) -> bool {
        self.present().next().is_some()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldSet
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        FieldSet {
            fields: iter
                .into_iter()
                .map(|(key, value)| (key.into(), Some(value.into())))
                .collect(),
        }
    }
}

impl TryFrom<&Value> for FieldSet {
    type Error = Error;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        let Value::Object(object) = value else {
            return Err(anyhow!("Expected a JSON object of fields, got {}", value));
        };

        let mut field_set = FieldSet::new();
        for (key, field_value) in object {
            match field_value {
                Value::Null => field_set.insert(key.as_str(), None),
                other => field_set.insert(key.as_str(), Some(FieldValue::try_from(other)?)),
            }
        }
        Ok(field_set)
    }
}

/// What a caller hands to `Client::track`: a single value (or nothing) or
/// a set of named fields.
#[derive(Debug, Clone, PartialEq)]
pub enum Fields {
    Single(Option<FieldValue>),
    Multi(FieldSet),
}

impl Fields {
    /// Reads a JSON document: an object is a field set, `null` is an absent
    /// value and any other scalar is a single value.
    pub fn from_json(value: &Value) -> Result<Self, Error> {
        match value {
            Value::Object(_) => Ok(Fields::Multi(FieldSet::try_from(value)?)),
            Value::Null => Ok(Fields::Single(None)),
            other => Ok(Fields::Single(Some(FieldValue::try_from(other)?))),
        }
    }
}

impl From<FieldSet> for Fields {
    fn from(value: FieldSet) -> Self {
        Fields::Multi(value)
    }
}

impl From<Option<FieldValue>> for Fields {
    fn from(value: Option<FieldValue>) -> Self {
        Fields::Single(value)
    }
}

macro_rules! impl_fields_from_scalar {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Fields {
                fn from(value: $t) -> Self {
                    Fields::Single(Some(value.into()))
                }
            }
        )*
    };
}

impl_fields_from_scalar!(FieldValue, bool, i32, i64, u32, f32, f64, &str, String);

/// Collects tag pairs, turning each value into its string form.
pub fn tag_set<I, K, V>(tags: I) -> TagSet
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: ToString,
{
    tags.into_iter()
        .map(|(key, value)| (key.into(), value.to_string()))
        .collect()
}
