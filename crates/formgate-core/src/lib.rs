//! Contact submission gate.
//!
//! A submission goes through two fixed checks before it is accepted:
//!
//! 1. schema validation of the posted fields (`jsonschema`)
//! 2. the honeypot check, only reached by structurally valid payloads
//!
//! Both failures are ordinary [`Verdict`]s carrying a client-error status,
//! not `Err` values. Delivery of accepted submissions goes through the
//! [`Notifier`] seam.

pub mod error;
pub mod form;
pub mod honeypot;
pub mod notify;
pub mod schema;
pub mod validator;

pub use error::FormError;
pub use form::{FieldErrors, FieldValues, Submission, SubmissionStatus, FORM_ERRORS_KEY};
pub use honeypot::HoneypotPolicy;
pub use notify::{LogNotifier, Notifier, NotifyError};
pub use schema::ContactSchema;
pub use validator::{reason_codes, SubmissionValidator, Verdict};
