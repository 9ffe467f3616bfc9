use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::access::{AccessDecision, AccessRequest, OperationKind};
use crate::error::AuthError;
use crate::query::Filter;
use crate::types::{AuthType, Item, ListKey, ListNaming, SessionToken};

/// Boxed `Send` future returned by every collaborator operation.
///
/// Boxing keeps the traits object-safe so collaborators can be stored as
/// `Arc<dyn Trait>`.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Strategy arguments, forwarded verbatim from the GraphQL mutation.
pub type StrategyArgs = BTreeMap<String, serde_json::Value>;

/// A list (content type) the binder authenticates against.
pub trait ListAdapter: Send + Sync {
    /// Stable key of the list.
    fn key(&self) -> &ListKey;

    /// Naming scheme used for generated GraphQL names.
    ///
    /// Defaults to the list key for both names.
    fn naming(&self) -> ListNaming {
        ListNaming::for_key(self.key())
    }

    /// Look up a single item matching `filter`.
    ///
    /// `query_name` is the GraphQL field the lookup is performed for, for the
    /// list's own logging and access bookkeeping.
    fn item_query<'a>(
        &'a self,
        filter: Filter,
        context: &'a dyn RequestContext,
        query_name: &'a str,
    ) -> BoxFuture<'a, Result<Option<Item>, AuthError>>;
}

/// One declared mutation argument of a strategy, e.g. `password: String`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyArgument {
    pub name: String,
    /// GraphQL type reference in SDL form (`String`, `String!`, `[ID!]`).
    #[serde(rename = "type")]
    pub type_ref: String,
}

impl StrategyArgument {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
        }
    }
}

/// Result of credential validation.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationOutcome {
    Success { item: Item },
    /// Credentials were rejected. `message` is shown to the client as-is.
    Failure { message: String },
}

/// A pluggable credential-verification mechanism.
pub trait AuthStrategy: Send + Sync {
    fn auth_type(&self) -> &AuthType;

    /// Arguments the authenticate mutation accepts, in declaration order.
    fn input_arguments(&self) -> Vec<StrategyArgument>;

    /// Declarative argument-list fragment, e.g. `email: String, password: String`.
    fn input_fragment(&self) -> String {
        self.input_arguments()
            .iter()
            .map(|arg| format!("{}: {}", arg.name, arg.type_ref))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Verify credentials. Rejected input is a `Failure`, not an `Err`.
    fn validate<'a>(
        &'a self,
        args: &'a StrategyArgs,
    ) -> BoxFuture<'a, Result<ValidationOutcome, AuthError>>;
}

/// Item and list a new session is started for.
#[derive(Debug, Clone, Copy)]
pub struct AuthedSession<'a> {
    pub item: &'a Item,
    pub list: &'a ListKey,
}

/// Per-request context supplied by the host.
///
/// Carries the current principal and the policy and session operations. It
/// lives for one request; the binder never keeps it beyond a single call.
pub trait RequestContext: Send + Sync {
    /// Currently authenticated item, if any.
    fn authed_item(&self) -> Option<&Item>;

    /// List key of the currently authenticated item, if any.
    fn authed_list_key(&self) -> Option<&ListKey>;

    /// Evaluate list-level access control for the current user.
    fn list_access_control_for_user<'a>(
        &'a self,
        list_key: &'a ListKey,
        user_input: Option<&'a serde_json::Value>,
        operation: OperationKind,
        request: &'a AccessRequest,
    ) -> BoxFuture<'a, Result<AccessDecision, AuthError>>;

    /// Start a session for `session.item` valid for the given audiences.
    fn start_authed_session<'a>(
        &'a self,
        session: AuthedSession<'a>,
        audiences: &'a [String],
    ) -> BoxFuture<'a, Result<SessionToken, AuthError>>;

    /// End the current session. Ending a missing session is not an error.
    fn end_authed_session(&self) -> BoxFuture<'_, Result<(), AuthError>>;
}
