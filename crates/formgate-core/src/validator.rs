//! The submission workflow: prepare an empty form, or judge a posted one.

use crate::error::FormError;
use crate::form::{FieldValues, Submission, SubmissionStatus};
use crate::honeypot::{HoneypotPolicy, DEFAULT_BOT_MESSAGE};
use crate::schema::ContactSchema;
use serde::{Deserialize, Serialize};

/// Machine-parseable reason codes carried by every [`Verdict`].
pub mod reason_codes {
    pub const OK: &str = "OK";
    pub const E_FIELD_INVALID: &str = "E_FIELD_INVALID";
    pub const E_HONEYPOT: &str = "E_HONEYPOT";
}

pub const INVALID_MESSAGE: &str = "one or more fields are invalid";

const HTTP_OK: u16 = 200;
const HTTP_BAD_REQUEST: u16 = 400;

/// Outcome of [`SubmissionValidator::process_submission`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub status: SubmissionStatus,
    /// Status code the HTTP surface should answer with.
    pub http_status: u16,
    pub reason_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub submission: Submission,
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        self.status == SubmissionStatus::Accepted
    }
}

#[derive(Debug, Clone)]
pub struct SubmissionValidator {
    schema: ContactSchema,
    honeypot: HoneypotPolicy,
}

impl SubmissionValidator {
    /// A bot message equal to the invalid-input message is replaced with the
    /// default so the two outcomes stay distinguishable.
    pub fn new(schema: ContactSchema, mut honeypot: HoneypotPolicy) -> Self {
        if honeypot.message.trim().is_empty() || honeypot.message == INVALID_MESSAGE {
            tracing::warn!(
                configured = %honeypot.message,
                "honeypot message must differ from the invalid message; using default"
            );
            honeypot.message = DEFAULT_BOT_MESSAGE.to_string();
        }
        Self { schema, honeypot }
    }

    /// Embedded contact schema with the honeypot enabled.
    pub fn with_defaults() -> Result<Self, FormError> {
        Ok(Self::new(
            ContactSchema::default_contact()?,
            HoneypotPolicy::default(),
        ))
    }

    pub fn schema(&self) -> &ContactSchema {
        &self.schema
    }

    pub fn honeypot(&self) -> &HoneypotPolicy {
        &self.honeypot
    }

    /// Name of the honeypot field while the check is enabled.
    pub fn trap_field(&self) -> Option<&str> {
        self.honeypot
            .enabled
            .then_some(self.honeypot.field.as_str())
    }

    /// Empty, unvalidated form for a page load.
    pub fn prepare_initial_form(&self) -> Submission {
        let mut names: Vec<&str> = self.schema.field_names().iter().map(String::as_str).collect();
        if let Some(trap) = self.trap_field() {
            if !self.schema.declares(trap) {
                names.push(trap);
            }
        }
        Submission::empty(names)
    }

    /// Schema validation first, honeypot second, acceptance last.
    ///
    /// The order is fixed: a malformed payload is always reported as invalid,
    /// so the trap is only observable to clients that already send
    /// well-formed data.
    pub fn process_submission(&self, raw: &FieldValues) -> Verdict {
        let fields = self.schema.coerce(raw, self.trap_field());

        if let Err(errors) = self.schema.check(&fields) {
            tracing::debug!(
                reason_code = reason_codes::E_FIELD_INVALID,
                fields = ?errors.fields().collect::<Vec<_>>(),
                "submission failed schema validation"
            );
            return Verdict {
                status: SubmissionStatus::Rejected,
                http_status: HTTP_BAD_REQUEST,
                reason_code: reason_codes::E_FIELD_INVALID.to_string(),
                message: Some(INVALID_MESSAGE.to_string()),
                submission: Submission {
                    fields,
                    valid: false,
                    status: SubmissionStatus::Rejected,
                    errors,
                    message: Some(INVALID_MESSAGE.to_string()),
                },
            };
        }

        if self.honeypot.is_tripped(&fields) {
            tracing::info!(
                reason_code = reason_codes::E_HONEYPOT,
                field = %self.honeypot.field,
                "honeypot tripped"
            );
            return Verdict {
                status: SubmissionStatus::FlaggedAsBot,
                http_status: HTTP_BAD_REQUEST,
                reason_code: reason_codes::E_HONEYPOT.to_string(),
                message: Some(self.honeypot.message.clone()),
                submission: Submission {
                    fields,
                    valid: true,
                    status: SubmissionStatus::FlaggedAsBot,
                    errors: Default::default(),
                    message: Some(self.honeypot.message.clone()),
                },
            };
        }

        tracing::debug!(reason_code = reason_codes::OK, "validation checks passed");
        Verdict {
            status: SubmissionStatus::Accepted,
            http_status: HTTP_OK,
            reason_code: reason_codes::OK.to_string(),
            message: None,
            submission: Submission {
                fields,
                valid: true,
                status: SubmissionStatus::Accepted,
                errors: Default::default(),
                message: None,
            },
        }
    }
}
