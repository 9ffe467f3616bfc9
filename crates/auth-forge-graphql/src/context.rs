use std::sync::Arc;

use auth_forge_core::{CacheHint, RequestContext};

/// Request-scoped context inserted into every async-graphql request via `.data()`.
///
/// Resolvers access it with `ctx.data::<AuthGraphqlContext>()`. The host keeps
/// a clone of `cache` to read the response cache scope after execution.
#[derive(Clone)]
pub struct AuthGraphqlContext {
    pub request: Arc<dyn RequestContext>,
    pub cache: Arc<CacheHint>,
}

impl AuthGraphqlContext {
    pub fn new(request: Arc<dyn RequestContext>) -> Self {
        Self {
            request,
            cache: Arc::new(CacheHint::new()),
        }
    }
}
