//! Mounts auth binders onto an async-graphql dynamic schema.

pub mod context;
pub mod resolvers;
pub mod schema_builder;
pub mod type_mapping;

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use auth_forge_core::{CacheScope, RequestContext};

pub use self::context::AuthGraphqlContext;
pub use self::schema_builder::{build_item_type, mount_binder, AuthSchemaBuilder};

/// Execute one request against `schema` with the given request context.
///
/// Returns the response together with the cache scope the resolvers settled
/// on, so the host can set its `Cache-Control` header.
pub async fn execute(
    schema: &Schema,
    request: impl Into<async_graphql::Request>,
    context: Arc<dyn RequestContext>,
) -> (async_graphql::Response, CacheScope) {
    let gql_ctx = AuthGraphqlContext::new(context);
    let cache = gql_ctx.cache.clone();
    let response = schema.execute(request.into().data(gql_ctx)).await;
    let scope = cache.scope();
    tracing::debug!(?scope, errors = response.errors.len(), "GraphQL request executed");
    (response, scope)
}
