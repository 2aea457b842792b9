use crate::form::FieldValues;
use serde::{Deserialize, Serialize};

pub const DEFAULT_HONEYPOT_FIELD: &str = "password";
pub const DEFAULT_BOT_MESSAGE: &str = "submission rejected as automated";

/// Anti-automation trap: a field hidden from humans that bots tend to fill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoneypotPolicy {
    pub enabled: bool,
    pub field: String,
    /// Returned to the client when the trap fires. Must differ from the
    /// ordinary invalid-field message.
    pub message: String,
}

impl Default for HoneypotPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            field: DEFAULT_HONEYPOT_FIELD.to_string(),
            message: DEFAULT_BOT_MESSAGE.to_string(),
        }
    }
}

impl HoneypotPolicy {
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    /// Any non-empty value in the trap field counts, whitespace included.
    pub fn is_tripped(&self, fields: &FieldValues) -> bool {
        self.enabled && fields.get(&self.field).is_some_and(|v| !v.is_empty())
    }
}
