use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{AccessDeniedData, AccessDeniedInternal, AuthError};
use crate::query::Filter;
use crate::traits::RequestContext;
use crate::types::ListKey;

/// Operation kinds understood by list-level access control.
///
/// Authentication endpoints are checked under their own `auth` kind so that a
/// policy can grant or deny them independently of CRUD permissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    Read,
    Create,
    Update,
    Delete,
    Auth,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Auth => "auth",
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// GraphQL operation type a checked field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Query,
    Mutation,
}

/// Extra information handed to the policy engine with each check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessRequest {
    pub gql_name: String,
}

/// Outcome of a policy evaluation.
#[derive(Debug, Clone, PartialEq)]
pub enum AccessDecision {
    Denied,
    Granted,
    /// Granted, but only for items matching the filter.
    Restricted(Filter),
}

impl AccessDecision {
    pub fn is_denied(&self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Row restriction carried by the decision, if any.
    pub fn restriction(&self) -> Option<&Filter> {
        match self {
            Self::Restricted(filter) => Some(filter),
            _ => None,
        }
    }

    pub fn into_restriction(self) -> Option<Filter> {
        match self {
            Self::Restricted(filter) => Some(filter),
            _ => None,
        }
    }
}

/// Evaluate the `auth` access rule for `list_key` against the request's policy.
///
/// On denial the decision is logged at debug level, a coarse entry without the
/// decision is logged at info level, and [`AuthError::AccessDenied`] is returned.
/// Granted decisions are returned unchanged.
pub async fn check_list_access(
    context: &dyn RequestContext,
    list_key: &ListKey,
    gql_name: &str,
    operation_type: OperationType,
) -> Result<AccessDecision, AuthError> {
    let operation = OperationKind::Auth;
    let request = AccessRequest {
        gql_name: gql_name.to_string(),
    };
    let decision = context
        .list_access_control_for_user(list_key, None, operation, &request)
        .await?;

    if decision.is_denied() {
        tracing::debug!(
            operation = %operation,
            access = ?decision,
            gql_name,
            "access statically or implicitly denied"
        );
        tracing::info!(operation = %operation, gql_name, "access denied");
        return Err(AuthError::AccessDenied {
            data: AccessDeniedData {
                operation_type,
                target: gql_name.to_string(),
            },
            internal: AccessDeniedInternal {
                authed_id: context.authed_item().map(|item| item.id.clone()),
                authed_list_key: context.authed_list_key().cloned(),
            },
        });
    }

    Ok(decision)
}
