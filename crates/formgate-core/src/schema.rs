//! Contact schema: which fields a submission has and what they must satisfy.
//!
//! The schema is plain JSON Schema (draft 2020-12). Its top-level
//! `properties` map doubles as the form's field list, so coercion and
//! validation always agree on the field set.

use crate::error::FormError;
use crate::form::{FieldErrors, FieldValues, FORM_ERRORS_KEY};
use jsonschema::Draft;
use serde_json::Value;
use std::path::Path;

/// Embedded default schema.
///
/// NOTE: Use CARGO_MANIFEST_DIR to avoid fragile relative paths from src/.
const CONTACT_SCHEMA_JSON: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/schemas/contact.schema.json"
));

/// Bounded so one pathological field cannot flood the response.
const MAX_ERRORS_PER_FIELD: usize = 10;

#[derive(Debug, Clone)]
pub struct ContactSchema {
    validator: jsonschema::Validator,
    fields: Vec<String>,
}

impl ContactSchema {
    /// Name, email, message (required) and the `password` honeypot.
    pub fn default_contact() -> Result<Self, FormError> {
        let schema: Value =
            serde_json::from_str(CONTACT_SCHEMA_JSON).map_err(|e| FormError::SchemaCompile {
                message: format!("embedded contact schema is not valid JSON: {e}"),
            })?;
        Self::from_value(&schema)
    }

    pub fn from_value(schema: &Value) -> Result<Self, FormError> {
        if let Some(ty) = schema.get("type") {
            if ty != "object" {
                return Err(FormError::InvalidSchema {
                    reason: format!("top-level type must be \"object\", got {ty}"),
                });
            }
        }
        let properties = schema
            .get("properties")
            .and_then(Value::as_object)
            .ok_or_else(|| FormError::InvalidSchema {
                reason: "schema must declare a `properties` map".to_string(),
            })?;
        if properties.is_empty() {
            return Err(FormError::InvalidSchema {
                reason: "schema declares no fields".to_string(),
            });
        }
        let fields = properties.keys().cloned().collect();

        let validator = jsonschema::options()
            .with_draft(Draft::Draft202012)
            .build(schema)
            .map_err(|e| FormError::SchemaCompile {
                message: e.to_string(),
            })?;

        Ok(Self { validator, fields })
    }

    /// Load a schema file. YAML is a superset of JSON, so one parser covers both.
    pub fn from_file(path: &Path) -> Result<Self, FormError> {
        let text = std::fs::read_to_string(path).map_err(|source| FormError::SchemaRead {
            path: path.to_path_buf(),
            source,
        })?;
        let schema: Value = serde_yaml::from_str(&text).map_err(|e| FormError::SchemaParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Self::from_value(&schema)
    }

    /// Declared field names, in schema order.
    pub fn field_names(&self) -> &[String] {
        &self.fields
    }

    pub fn declares(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    /// Project raw request values onto the declared fields.
    ///
    /// Missing declared fields become `""`, undeclared keys are dropped except
    /// for `keep` (the honeypot field, which may live outside the schema).
    pub fn coerce(&self, raw: &FieldValues, keep: Option<&str>) -> FieldValues {
        let mut out: FieldValues = self
            .fields
            .iter()
            .map(|name| (name.clone(), raw.get(name).cloned().unwrap_or_default()))
            .collect();
        if let Some(extra) = keep {
            out.entry(extra.to_string())
                .or_insert_with(|| raw.get(extra).cloned().unwrap_or_default());
        }
        out
    }

    /// Validate coerced values. Only declared fields are shown to the schema.
    pub fn check(&self, fields: &FieldValues) -> Result<(), FieldErrors> {
        let instance = Value::Object(
            fields
                .iter()
                .filter(|(name, _)| self.declares(name))
                .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                .collect(),
        );

        if self.validator.is_valid(&instance) {
            return Ok(());
        }

        let mut errors = FieldErrors::new();
        for error in self.validator.iter_errors(&instance) {
            let field = field_for_pointer(&error.instance_path().to_string());
            if errors.count(&field) < MAX_ERRORS_PER_FIELD {
                errors.push(field, error.to_string());
            }
        }
        if errors.is_empty() {
            errors.push(FORM_ERRORS_KEY, "schema validation failed");
        }
        Err(errors)
    }
}

/// First segment of a JSON pointer, unescaped. Root maps to `_errors`.
fn field_for_pointer(pointer: &str) -> String {
    match pointer.trim_start_matches('/').split('/').next() {
        Some(segment) if !segment.is_empty() => segment.replace("~1", "/").replace("~0", "~"),
        _ => FORM_ERRORS_KEY.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(pairs: &[(&str, &str)]) -> FieldValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn embedded_schema_compiles() {
        let schema = ContactSchema::default_contact().expect("schema should compile");
        for name in ["name", "email", "message", "password"] {
            assert!(schema.declares(name), "missing field {name}");
        }
    }

    #[test]
    fn coerce_fills_missing_and_drops_unknown() {
        let schema = ContactSchema::default_contact().unwrap();
        let raw = values(&[("message", "hello"), ("admin", "1")]);
        let fields = schema.coerce(&raw, None);
        assert_eq!(fields.get("message").map(String::as_str), Some("hello"));
        assert_eq!(fields.get("email").map(String::as_str), Some(""));
        assert!(!fields.contains_key("admin"));
    }

    #[test]
    fn coerce_keeps_undeclared_trap_field() {
        let schema = ContactSchema::from_value(&json!({
            "type": "object",
            "properties": { "message": { "type": "string" } },
            "additionalProperties": false
        }))
        .unwrap();
        let raw = values(&[("message", "hi"), ("website", "http://spam")]);
        let fields = schema.coerce(&raw, Some("website"));
        assert_eq!(fields.get("website").map(String::as_str), Some("http://spam"));
        // the trap field is hidden from additionalProperties
        assert!(schema.check(&fields).is_ok());
    }

    #[test]
    fn empty_message_is_attributed_to_message() {
        let schema = ContactSchema::default_contact().unwrap();
        let fields = schema.coerce(&values(&[("message", "")]), None);
        let errors = schema.check(&fields).unwrap_err();
        assert_eq!(errors.count("message"), 1);
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["message"]);
    }

    #[test]
    fn email_must_be_empty_or_address_like() {
        let schema = ContactSchema::default_contact().unwrap();
        let ok = schema.coerce(&values(&[("message", "hi"), ("email", "a@b.io")]), None);
        assert!(schema.check(&ok).is_ok());
        let bad = schema.coerce(&values(&[("message", "hi"), ("email", "nope")]), None);
        let errors = schema.check(&bad).unwrap_err();
        assert_eq!(errors.count("email"), 1);
    }

    #[test]
    fn rejects_non_object_schemas() {
        let err = ContactSchema::from_value(&json!({ "type": "string" })).unwrap_err();
        assert!(matches!(err, FormError::InvalidSchema { .. }));
        let err = ContactSchema::from_value(&json!({ "type": "object" })).unwrap_err();
        assert!(matches!(err, FormError::InvalidSchema { .. }));
    }

    #[test]
    fn loads_yaml_schema_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("contact.yaml");
        std::fs::write(
            &path,
            "type: object\nproperties:\n  topic:\n    type: string\n    enum: [sales, support]\n",
        )
        .unwrap();
        let schema = ContactSchema::from_file(&path).unwrap();
        assert_eq!(schema.field_names(), ["topic".to_string()]);
        let fields = schema.coerce(&values(&[("topic", "other")]), None);
        assert_eq!(schema.check(&fields).unwrap_err().count("topic"), 1);
    }

    #[test]
    fn missing_schema_file_reports_path() {
        let err = ContactSchema::from_file(Path::new("/nonexistent/contact.yaml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/contact.yaml"));
    }

    #[test]
    fn pointer_segments_unescape() {
        assert_eq!(field_for_pointer("/message"), "message");
        assert_eq!(field_for_pointer("/a~1b/0"), "a/b");
        assert_eq!(field_for_pointer(""), FORM_ERRORS_KEY);
    }
}
