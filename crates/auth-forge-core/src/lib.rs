//! Binding layer that wires one authentication strategy into one list's
//! GraphQL schema fragments and resolvers.
//!
//! Credential verification, session storage and access policy are supplied by
//! the host through the traits in [`traits`]; this crate only generates names,
//! checks the `auth` access rule and delegates.

pub mod access;
pub mod binder;
pub mod cache;
pub mod config;
pub mod error;
pub mod query;
pub mod schema;
pub mod traits;
pub mod types;

pub use access::{AccessDecision, AccessRequest, OperationKind, OperationType};
pub use binder::{
    AuthSchemaBinder, AuthenticateOutput, MutationResolvers, QueryResolvers,
    UnauthenticateOutput,
};
pub use cache::{CacheControl, CacheHint, CacheScope};
pub use config::BinderConfig;
pub use error::{AccessDeniedData, AccessDeniedInternal, AuthError};
pub use query::Filter;
pub use schema::{FieldDefinition, SchemaOptions, TypeDefinition};
pub use traits::{
    AuthStrategy, AuthedSession, BoxFuture, ListAdapter, RequestContext, StrategyArgs,
    StrategyArgument, ValidationOutcome,
};
pub use types::{AuthType, GeneratedNames, Item, ItemId, ListKey, ListNaming, SessionToken};
