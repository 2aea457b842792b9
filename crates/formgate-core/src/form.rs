use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Submitted values keyed by field name.
pub type FieldValues = BTreeMap<String, String>;

/// Key for errors that cannot be attributed to a single field.
pub const FORM_ERRORS_KEY: &str = "_errors";

/// Field-level error annotations (`field -> messages`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    /// Number of messages recorded for `field`.
    pub fn count(&self, field: &str) -> usize {
        self.0.get(field).map_or(0, Vec::len)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Where a submission ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionStatus {
    /// Fresh form for a page load.
    Unvalidated,
    /// Failed schema validation.
    Rejected,
    /// Passed the schema but tripped the honeypot.
    FlaggedAsBot,
    Accepted,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unvalidated => "unvalidated",
            Self::Rejected => "rejected",
            Self::FlaggedAsBot => "flagged_as_bot",
            Self::Accepted => "accepted",
        }
    }
}

impl std::fmt::Display for SubmissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A contact form instance, either freshly prepared or built from a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub fields: FieldValues,
    pub valid: bool,
    pub status: SubmissionStatus,
    #[serde(default, skip_serializing_if = "FieldErrors::is_empty")]
    pub errors: FieldErrors,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Submission {
    /// Unvalidated submission with every named field set to `""`.
    pub fn empty<I, S>(field_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: field_names
                .into_iter()
                .map(|name| (name.into(), String::new()))
                .collect(),
            valid: false,
            status: SubmissionStatus::Unvalidated,
            errors: FieldErrors::new(),
            message: None,
        }
    }

    /// Value of `name`, or `""` when the field is absent.
    pub fn field(&self, name: &str) -> &str {
        self.fields.get(name).map_or("", String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_submission_has_blank_fields() {
        let sub = Submission::empty(["message", "password"]);
        assert_eq!(sub.status, SubmissionStatus::Unvalidated);
        assert!(!sub.valid);
        assert_eq!(sub.fields.len(), 2);
        assert!(sub.fields.values().all(String::is_empty));
        assert_eq!(sub.field("missing"), "");
    }

    #[test]
    fn serializes_without_empty_errors_or_message() {
        let sub = Submission::empty(["message"]);
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["status"], "unvalidated");
        assert!(json.get("errors").is_none());
        assert!(json.get("message").is_none());
    }

    #[test]
    fn field_errors_group_by_field() {
        let mut errors = FieldErrors::new();
        errors.push("message", "too short");
        errors.push("message", "required");
        errors.push(FORM_ERRORS_KEY, "bad shape");
        assert_eq!(errors.count("message"), 2);
        assert_eq!(errors.get(FORM_ERRORS_KEY), Some(&["bad shape".to_string()][..]));
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["_errors", "message"]);
    }
}
