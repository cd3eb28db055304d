use super::record::{value_text, Record};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Accepted value(s) for one field of a query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QueryValue {
    Any(Vec<Value>),
    One(Value),
}

impl QueryValue {
    /// Whether `actual` satisfies this constraint
    pub fn accepts(&self, actual: &Value) -> bool {
        match self {
            QueryValue::One(expected) => values_match(expected, actual),
            QueryValue::Any(options) => options.iter().any(|expected| values_match(expected, actual)),
        }
    }
}

impl From<Value> for QueryValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => QueryValue::Any(items),
            other => QueryValue::One(other),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(Value::String(value.to_string()))
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(Value::String(value))
    }
}

impl<T: Into<Value>> From<Vec<T>> for QueryValue {
    fn from(values: Vec<T>) -> Self {
        QueryValue::Any(values.into_iter().map(Into::into).collect())
    }
}

// Falls back to text comparison so "100" matches 100
fn values_match(expected: &Value, actual: &Value) -> bool {
    expected == actual || value_text(expected) == value_text(actual)
}

/// Record filter applied before pattern analysis.
///
/// Every constrained field must match; an empty query matches all records.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Query {
    constraints: BTreeMap<String, QueryValue>,
}

impl Query {
    pub fn new() -> Self {
        Self::default()
    }

    /// Require `field` to equal `value`
    pub fn field(mut self, field: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        self.insert(field, value);
        self
    }

    /// Require `field` to equal one of `values`
    pub fn field_in<I, V>(mut self, field: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.constraints.insert(field.into(), QueryValue::Any(values));
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<QueryValue>) {
        self.constraints.insert(field.into(), value.into());
    }

    pub fn get(&self, field: &str) -> Option<&QueryValue> {
        self.constraints.get(field)
    }

    pub fn remove(&mut self, field: &str) -> Option<QueryValue> {
        self.constraints.remove(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &QueryValue)> {
        self.constraints.iter()
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn clear(&mut self) {
        self.constraints.clear();
    }

    pub fn matches(&self, record: &Record) -> bool {
        self.constraints.iter().all(|(field, constraint)| {
            let actual = record.get(field).unwrap_or(&Value::Null);
            constraint.accepts(actual)
        })
    }

    /// Records matching this query, borrowed from `data`
    pub fn filter<'r>(&self, data: &'r [Record]) -> Vec<&'r Record> {
        data.iter().filter(|record| self.matches(record)).collect()
    }
}

impl<K: Into<String>, V: Into<QueryValue>> FromIterator<(K, V)> for Query {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut query = Query::new();
        for (field, value) in iter {
            query.insert(field, value);
        }
        query
    }
}
