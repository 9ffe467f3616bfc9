use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Audience granted to sessions started by the authenticate mutation.
pub const ADMIN_AUDIENCE: &str = "admin";

/// Binder settings shared by every (list, strategy) pair built from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinderConfig {
    /// Audiences new sessions are scoped to (default: `["admin"]`).
    #[serde(default = "default_audiences")]
    pub audiences: Vec<String>,
}

fn default_audiences() -> Vec<String> {
    vec![ADMIN_AUDIENCE.to_string()]
}

impl Default for BinderConfig {
    fn default() -> Self {
        Self {
            audiences: default_audiences(),
        }
    }
}

impl BinderConfig {
    pub fn with_audiences(audiences: Vec<String>) -> Self {
        Self { audiences }
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        if self.audiences.is_empty() {
            return Err(AuthError::InvalidConfig {
                message: "audiences must not be empty".into(),
            });
        }
        if let Some(blank) = self.audiences.iter().find(|a| a.trim().is_empty()) {
            return Err(AuthError::InvalidConfig {
                message: format!("audience '{blank}' must not be blank"),
            });
        }
        Ok(())
    }
}
