//! Per-field value preprocessors
//!
//! A preprocessor rewrites a field's value before it is placed in the
//! pattern tree. Returning an array makes the record branch once per
//! element, which is how `email_tokens` turns one address into several
//! searchable segments.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Signature shared by all preprocessors
pub type PreprocessorFn = dyn Fn(&Value) -> Value + Send + Sync;

/// Field name -> preprocessor registry. Cloning is cheap (functions are shared).
#[derive(Clone, Default)]
pub struct Preprocessors {
    by_field: HashMap<String, Arc<PreprocessorFn>>,
}

impl Preprocessors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a preprocessor for `field`, replacing any previous one
    pub fn insert<F>(&mut self, field: impl Into<String>, preprocessor: F)
    where
        F: Fn(&Value) -> Value + Send + Sync + 'static,
    {
        let field = field.into();
        if self.by_field.contains_key(&field) {
            tracing::debug!(target: "preprocessors", "Replacing preprocessor for '{}'", field);
        }
        self.by_field.insert(field, Arc::new(preprocessor));
    }

    pub fn remove(&mut self, field: &str) -> bool {
        self.by_field.remove(field).is_some()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.by_field.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.by_field.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_field.is_empty()
    }

    /// Field names with a registered preprocessor, sorted
    pub fn fields(&self) -> Vec<&str> {
        let mut fields: Vec<&str> = self.by_field.keys().map(String::as_str).collect();
        fields.sort_unstable();
        fields
    }

    /// Run the preprocessor registered for `field`, if any
    pub fn apply<'v>(&self, field: &str, value: &'v Value) -> Cow<'v, Value> {
        match self.by_field.get(field) {
            Some(preprocessor) => Cow::Owned(preprocessor(value)),
            None => Cow::Borrowed(value),
        }
    }
}

impl fmt::Debug for Preprocessors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Preprocessors")
            .field("fields", &self.fields())
            .finish()
    }
}

/// Split the local part of an email address into lower-cased alphabetic runs.
///
/// `"John.Doe42@example.com"` becomes `["john", "doe"]`. Non-string values
/// and strings without an `@` pass through unchanged.
pub fn email_tokens(value: &Value) -> Value {
    let Some(text) = value.as_str() else {
        return value.clone();
    };
    let Some((local, _domain)) = text.split_once('@') else {
        return value.clone();
    };

    let mut tokens: Vec<Value> = Vec::new();
    for token in local
        .split(|c: char| !c.is_alphabetic())
        .filter(|t| !t.is_empty())
    {
        let token = Value::String(token.to_lowercase());
        if !tokens.contains(&token) {
            tokens.push(token);
        }
    }
    Value::Array(tokens)
}

/// Lower-case string values
pub fn lowercase(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.to_lowercase()),
        other => other.clone(),
    }
}

/// Strip surrounding whitespace from string values
pub fn trim(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(s.trim().to_string()),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_last_registration_wins() {
        let mut preprocessors = Preprocessors::new();
        preprocessors.insert("field", lowercase);
        preprocessors.insert("field", |v: &Value| json!(format!("prefix_{}", v.as_str().unwrap_or(""))));

        assert_eq!(preprocessors.len(), 1);
        let input = json!("A");
        let out = preprocessors.apply("field", &input);
        assert_eq!(out.as_ref(), &json!("prefix_A"));
    }

    #[test]
    fn test_apply_without_preprocessor_borrows() {
        let preprocessors = Preprocessors::new();
        let value = json!("keep");
        assert!(matches!(preprocessors.apply("other", &value), Cow::Borrowed(_)));
    }

    #[test]
    fn test_email_tokens() {
        assert_eq!(
            email_tokens(&json!("John.Doe42@example.com")),
            json!(["john", "doe"])
        );
        assert_eq!(email_tokens(&json!("not-an-email")), json!("not-an-email"));
        assert_eq!(email_tokens(&json!(7)), json!(7));
    }

    #[test]
    fn test_trim_and_lowercase() {
        assert_eq!(trim(&json!("  b ")), json!("b"));
        assert_eq!(lowercase(&json!("US")), json!("us"));
        assert_eq!(lowercase(&Value::Null), Value::Null);
    }
}
