use serde::Serialize;

use crate::access::OperationType;
use crate::types::{ItemId, ListKey};

/// Errors produced while building a binder or resolving one of its operations.
///
/// `AccessDenied` and `ValidationFailed` are the two terminal outcomes a client
/// can see. The construction variants only surface at schema-build time.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum AuthError {
    /// The list-level policy rejected the `auth` operation kind.
    #[error("You do not have access to this resource")]
    AccessDenied {
        /// Client-visible payload.
        data: AccessDeniedData,
        /// Server-side diagnostics. Never serialized to clients.
        internal: AccessDeniedInternal,
    },
    /// The strategy rejected the supplied credentials.
    #[error("{message}")]
    ValidationFailed { message: String },
    /// List key failed PascalCase validation.
    #[error("invalid list key '{0}': must be PascalCase [A-Z][a-zA-Z0-9]*")]
    InvalidListKey(String),
    /// Strategy type is empty or not alphanumeric.
    #[error("invalid auth type '{0}': must be a non-empty alphanumeric identifier")]
    InvalidAuthType(String),
    /// A list naming field is missing or is not a valid GraphQL name.
    #[error("invalid {field} '{value}': must be a non-empty GraphQL name")]
    InvalidNaming { field: &'static str, value: String },
    /// Binder configuration was rejected.
    #[error("invalid binder configuration: {message}")]
    InvalidConfig { message: String },
    /// An external collaborator (session store, policy engine, item lookup)
    /// failed operationally.
    #[error("collaborator failure: {message}")]
    Collaborator { message: String },
}

impl AuthError {
    /// Shorthand for a collaborator failure.
    pub fn collaborator(message: impl Into<String>) -> Self {
        Self::Collaborator {
            message: message.into(),
        }
    }

    /// Returns `true` for [`AuthError::AccessDenied`].
    pub fn is_access_denied(&self) -> bool {
        matches!(self, Self::AccessDenied { .. })
    }
}

/// Public part of an access denial: which operation type and field was refused.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessDeniedData {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub target: String,
}

/// Principal details captured at denial time, for server logs only.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessDeniedInternal {
    pub authed_id: Option<ItemId>,
    pub authed_list_key: Option<ListKey>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn denied() -> AuthError {
        AuthError::AccessDenied {
            data: AccessDeniedData {
                operation_type: OperationType::Mutation,
                target: "authenticateUserWithPassword".into(),
            },
            internal: AccessDeniedInternal {
                authed_id: Some(ItemId::new("user_1")),
                authed_list_key: Some(ListKey::new("User").unwrap()),
            },
        }
    }

    #[test]
    fn access_denied_display_hides_internal_data() {
        let msg = denied().to_string();
        assert_eq!(msg, "You do not have access to this resource");
        assert!(!msg.contains("user_1"));
    }

    #[test]
    fn access_denied_data_serializes_type_and_target() {
        let AuthError::AccessDenied { data, .. } = denied() else {
            unreachable!()
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"type": "mutation", "target": "authenticateUserWithPassword"})
        );
    }

    #[test]
    fn validation_failed_display_is_message_verbatim() {
        let err = AuthError::ValidationFailed {
            message: "bad credentials".into(),
        };
        assert_eq!(err.to_string(), "bad credentials");
    }

    #[test]
    fn construction_errors_name_the_value() {
        assert!(AuthError::InvalidListKey("user".into())
            .to_string()
            .contains("'user'"));
        assert!(AuthError::InvalidAuthType("pass word".into())
            .to_string()
            .contains("'pass word'"));
        let err = AuthError::InvalidNaming {
            field: "output type name",
            value: String::new(),
        };
        assert!(err.to_string().contains("output type name"));
    }

    #[test]
    fn is_access_denied_only_for_denials() {
        assert!(denied().is_access_denied());
        assert!(!AuthError::collaborator("down").is_access_denied());
    }

    #[test]
    fn auth_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthError>();
    }
}
