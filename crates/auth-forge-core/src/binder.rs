use std::sync::Arc;

use serde::Serialize;

use crate::access::{check_list_access, AccessDecision, OperationType};
use crate::cache::{CacheControl, CacheScope};
use crate::config::BinderConfig;
use crate::error::AuthError;
use crate::query::Filter;
use crate::schema::{FieldDefinition, SchemaOptions, TypeDefinition};
use crate::traits::{
    AuthStrategy, AuthedSession, ListAdapter, RequestContext, StrategyArgs, ValidationOutcome,
};
use crate::types::{AuthType, GeneratedNames, Item, ListKey, SessionToken};

/// Resolved value of the authenticate mutation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AuthenticateOutput {
    pub token: SessionToken,
    pub item: Item,
}

/// Resolved value of the unauthenticate mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnauthenticateOutput {
    pub success: bool,
}

struct BinderState {
    list: Arc<dyn ListAdapter>,
    strategy: Arc<dyn AuthStrategy>,
    list_key: ListKey,
    names: GeneratedNames,
    config: BinderConfig,
}

/// Wires one authentication strategy into one list's schema and resolvers.
///
/// Built once at schema-build time and cheap to clone; all clones share the
/// same immutable state, so a binder can serve any number of concurrent
/// requests without locking.
#[derive(Clone)]
pub struct AuthSchemaBinder {
    inner: Arc<BinderState>,
}

impl std::fmt::Debug for AuthSchemaBinder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSchemaBinder")
            .field("list_key", &self.inner.list_key)
            .field("auth_type", self.inner.strategy.auth_type())
            .field("names", &self.inner.names)
            .finish()
    }
}

impl AuthSchemaBinder {
    /// Build a binder, deriving and freezing its generated names.
    ///
    /// Fails when the list naming is incomplete or not GraphQL-compatible, or
    /// when the configuration has no audiences.
    pub fn new(
        list: Arc<dyn ListAdapter>,
        strategy: Arc<dyn AuthStrategy>,
        config: BinderConfig,
    ) -> Result<Self, AuthError> {
        config.validate()?;
        let naming = list.naming();
        naming.validate()?;
        let list_key = list.key().clone();
        let names = GeneratedNames::derive(&naming, strategy.auth_type());

        tracing::debug!(
            list = %list_key,
            auth_type = %strategy.auth_type(),
            authenticate = %names.authenticate_mutation_name,
            "auth schema binder constructed"
        );

        Ok(Self {
            inner: Arc::new(BinderState {
                list,
                strategy,
                list_key,
                names,
                config,
            }),
        })
    }

    pub fn list_key(&self) -> &ListKey {
        &self.inner.list_key
    }

    pub fn auth_type(&self) -> &AuthType {
        self.inner.strategy.auth_type()
    }

    pub fn names(&self) -> &GeneratedNames {
        &self.inner.names
    }

    pub fn audiences(&self) -> &[String] {
        &self.inner.config.audiences
    }

    /// Output types: the unauthenticate result, then the authenticate result.
    pub fn schema_types(&self, _options: &SchemaOptions) -> Vec<TypeDefinition> {
        let names = &self.inner.names;
        vec![
            TypeDefinition::new(&names.unauthenticate_output_name).field(
                FieldDefinition::new("success", "Boolean").description(
                    "`true` when unauthentication succeeds.\n\
                     NOTE: unauthentication always succeeds when the request has an invalid or missing authentication token.",
                ),
            ),
            TypeDefinition::new(&names.authenticate_output_name)
                .field(FieldDefinition::new("token", "String").description(
                    "Used to make subsequent authenticated requests by setting this token in a header: 'Authorization: Bearer <token>'.",
                ))
                .field(
                    FieldDefinition::new("item", &names.output_type_name).description(format!(
                        "Retrieve information on the newly authenticated {} here.",
                        names.output_type_name
                    )),
                ),
        ]
    }

    pub fn schema_queries(&self, _options: &SchemaOptions) -> Vec<FieldDefinition> {
        let names = &self.inner.names;
        vec![FieldDefinition::new(
            &names.authenticated_query_name,
            &names.output_type_name,
        )]
    }

    pub fn schema_mutations(&self, _options: &SchemaOptions) -> Vec<FieldDefinition> {
        let names = &self.inner.names;
        vec![
            FieldDefinition::new(
                &names.authenticate_mutation_name,
                &names.authenticate_output_name,
            )
            .description(format!(
                "Authenticate and generate a token for a {} with the {} Authentication Strategy.",
                names.output_type_name,
                self.auth_type()
            ))
            .arguments(self.inner.strategy.input_arguments()),
            FieldDefinition::new(
                &names.unauthenticate_mutation_name,
                &names.unauthenticate_output_name,
            ),
        ]
    }

    pub fn query_resolvers(&self, _options: &SchemaOptions) -> QueryResolvers {
        QueryResolvers {
            authenticated_item: AuthenticatedItemResolver {
                binder: self.clone(),
            },
        }
    }

    pub fn mutation_resolvers(&self, _options: &SchemaOptions) -> MutationResolvers {
        MutationResolvers {
            authenticate: AuthenticateResolver {
                binder: self.clone(),
            },
            unauthenticate: UnauthenticateResolver {
                binder: self.clone(),
            },
        }
    }

    /// Resolve the currently authenticated item of this list.
    ///
    /// Returns `None` without an access check when the request has no
    /// principal or the principal belongs to another list.
    pub async fn authenticated_item(
        &self,
        context: &dyn RequestContext,
        info: Option<&dyn CacheControl>,
    ) -> Result<Option<Item>, AuthError> {
        if let Some(cache) = info {
            cache.set_scope(CacheScope::Private);
        }

        let authed_id = match (context.authed_item(), context.authed_list_key()) {
            (Some(item), Some(key)) if *key == self.inner.list_key => item.id.clone(),
            _ => return Ok(None),
        };

        let gql_name = self.inner.names.authenticated_query_name.as_str();
        let access = self
            .check_list_access(context, gql_name, OperationType::Query)
            .await?;

        let filter = Filter::id_eq(&authed_id).merge(access.into_restriction());
        self.inner.list.item_query(filter, context, gql_name).await
    }

    /// Validate credentials and start a session for the returned item.
    pub async fn authenticate(
        &self,
        args: &StrategyArgs,
        context: &dyn RequestContext,
    ) -> Result<AuthenticateOutput, AuthError> {
        let gql_name = self.inner.names.authenticate_mutation_name.as_str();
        self.check_list_access(context, gql_name, OperationType::Mutation)
            .await?;

        let item = match self.inner.strategy.validate(args).await? {
            ValidationOutcome::Success { item } => item,
            ValidationOutcome::Failure { message } => {
                tracing::debug!(gql_name, "credential validation failed");
                return Err(AuthError::ValidationFailed { message });
            }
        };

        let session = AuthedSession {
            item: &item,
            list: &self.inner.list_key,
        };
        let token = context
            .start_authed_session(session, &self.inner.config.audiences)
            .await?;

        tracing::debug!(
            list = %self.inner.list_key,
            item_id = %item.id,
            "authenticated session started"
        );

        Ok(AuthenticateOutput { token, item })
    }

    /// End the current session. Succeeds whether or not a session existed.
    pub async fn unauthenticate(
        &self,
        context: &dyn RequestContext,
    ) -> Result<UnauthenticateOutput, AuthError> {
        let gql_name = self.inner.names.unauthenticate_mutation_name.as_str();
        self.check_list_access(context, gql_name, OperationType::Mutation)
            .await?;
        context.end_authed_session().await?;
        Ok(UnauthenticateOutput { success: true })
    }

    /// Run the `auth` access check for this binder's list.
    pub async fn check_list_access(
        &self,
        context: &dyn RequestContext,
        gql_name: &str,
        operation_type: OperationType,
    ) -> Result<AccessDecision, AuthError> {
        check_list_access(context, &self.inner.list_key, gql_name, operation_type).await
    }
}

/// Query resolvers generated by a binder, one per query field.
#[derive(Debug, Clone)]
pub struct QueryResolvers {
    pub authenticated_item: AuthenticatedItemResolver,
}

impl QueryResolvers {
    pub fn field_names(&self) -> Vec<&str> {
        vec![self.authenticated_item.field_name()]
    }
}

/// Mutation resolvers generated by a binder, one per mutation field.
#[derive(Debug, Clone)]
pub struct MutationResolvers {
    pub authenticate: AuthenticateResolver,
    pub unauthenticate: UnauthenticateResolver,
}

impl MutationResolvers {
    pub fn field_names(&self) -> Vec<&str> {
        vec![
            self.authenticate.field_name(),
            self.unauthenticate.field_name(),
        ]
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticatedItemResolver {
    binder: AuthSchemaBinder,
}

impl AuthenticatedItemResolver {
    pub fn field_name(&self) -> &str {
        &self.binder.names().authenticated_query_name
    }

    pub async fn resolve(
        &self,
        context: &dyn RequestContext,
        info: Option<&dyn CacheControl>,
    ) -> Result<Option<Item>, AuthError> {
        self.binder.authenticated_item(context, info).await
    }
}

#[derive(Debug, Clone)]
pub struct AuthenticateResolver {
    binder: AuthSchemaBinder,
}

impl AuthenticateResolver {
    pub fn field_name(&self) -> &str {
        &self.binder.names().authenticate_mutation_name
    }

    pub async fn resolve(
        &self,
        args: &StrategyArgs,
        context: &dyn RequestContext,
    ) -> Result<AuthenticateOutput, AuthError> {
        self.binder.authenticate(args, context).await
    }
}

#[derive(Debug, Clone)]
pub struct UnauthenticateResolver {
    binder: AuthSchemaBinder,
}

impl UnauthenticateResolver {
    pub fn field_name(&self) -> &str {
        &self.binder.names().unauthenticate_mutation_name
    }

    pub async fn resolve(
        &self,
        context: &dyn RequestContext,
    ) -> Result<UnauthenticateOutput, AuthError> {
        self.binder.unauthenticate(context).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{BoxFuture, StrategyArgument};

    struct StaticList {
        key: ListKey,
    }

    impl ListAdapter for StaticList {
        fn key(&self) -> &ListKey {
            &self.key
        }

        fn item_query<'a>(
            &'a self,
            _filter: Filter,
            _context: &'a dyn RequestContext,
            _query_name: &'a str,
        ) -> BoxFuture<'a, Result<Option<Item>, AuthError>> {
            Box::pin(async { Ok(None) })
        }
    }

    struct DeclaredStrategy {
        auth_type: AuthType,
    }

    impl AuthStrategy for DeclaredStrategy {
        fn auth_type(&self) -> &AuthType {
            &self.auth_type
        }

        fn input_arguments(&self) -> Vec<StrategyArgument> {
            vec![
                StrategyArgument::new("email", "String"),
                StrategyArgument::new("password", "String"),
            ]
        }

        fn validate<'a>(
            &'a self,
            _args: &'a StrategyArgs,
        ) -> BoxFuture<'a, Result<ValidationOutcome, AuthError>> {
            Box::pin(async {
                Ok(ValidationOutcome::Failure {
                    message: "unused".into(),
                })
            })
        }
    }

    fn binder(key: &str, auth_type: &str) -> AuthSchemaBinder {
        AuthSchemaBinder::new(
            Arc::new(StaticList {
                key: ListKey::new(key).unwrap(),
            }),
            Arc::new(DeclaredStrategy {
                auth_type: AuthType::new(auth_type).unwrap(),
            }),
            BinderConfig::default(),
        )
        .unwrap()
    }

    #[test]
    fn query_resolver_keys_match_schema_queries() {
        let b = binder("User", "password");
        let opts = SchemaOptions::default();
        let schema: Vec<String> = b.schema_queries(&opts).into_iter().map(|f| f.name).collect();
        assert_eq!(b.query_resolvers(&opts).field_names(), schema);
    }

    #[test]
    fn mutation_resolver_keys_match_schema_mutations() {
        let b = binder("User", "password");
        let opts = SchemaOptions::default();
        let schema: Vec<String> = b
            .schema_mutations(&opts)
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(b.mutation_resolvers(&opts).field_names(), schema);
    }

    #[test]
    fn schema_types_are_named_from_generated_names() {
        let b = binder("User", "password");
        let types = b.schema_types(&SchemaOptions::default());
        let names: Vec<&str> = types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, ["unauthenticateUserOutput", "authenticateUserOutput"]);

        let auth_output = &types[1];
        let item = auth_output.fields.iter().find(|f| f.name == "item").unwrap();
        assert_eq!(item.type_ref, "User");
        let token = auth_output.fields.iter().find(|f| f.name == "token").unwrap();
        assert_eq!(token.type_ref, "String");
    }

    #[test]
    fn authenticate_mutation_carries_strategy_arguments() {
        let b = binder("User", "password");
        let mutations = b.schema_mutations(&SchemaOptions::default());
        assert_eq!(
            mutations[0].to_sdl(0).lines().last().unwrap(),
            "authenticateUserWithPassword(email: String, password: String): authenticateUserOutput"
        );
        assert_eq!(
            mutations[1].to_sdl(0),
            "unauthenticateUser: unauthenticateUserOutput"
        );
    }

    #[test]
    fn empty_audiences_fail_construction() {
        let result = AuthSchemaBinder::new(
            Arc::new(StaticList {
                key: ListKey::new("User").unwrap(),
            }),
            Arc::new(DeclaredStrategy {
                auth_type: AuthType::new("password").unwrap(),
            }),
            BinderConfig::with_audiences(vec![]),
        );
        assert!(matches!(result, Err(AuthError::InvalidConfig { .. })));
    }

    #[test]
    fn binder_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<AuthSchemaBinder>();
    }
}
