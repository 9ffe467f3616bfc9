//! Collaborators built from configuration alone.
//!
//! They are enough to generate names and schema fragments. The CLI never runs
//! operations, so lookups find nothing and credentials are always rejected.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use auth_forge_core::{
    AuthError, AuthSchemaBinder, AuthStrategy, AuthType, BoxFuture, Filter, Item, ListAdapter,
    ListKey, ListNaming, RequestContext, StrategyArgs, StrategyArgument, ValidationOutcome,
};
use auth_forge_graphql::{build_item_type, AuthSchemaBuilder};

use crate::config::{AuthForgeConfig, ListConfig};
use crate::error::CliError;

pub struct DeclaredList {
    key: ListKey,
    naming: ListNaming,
}

impl DeclaredList {
    pub fn from_config(list: &ListConfig) -> Result<Self, AuthError> {
        let key = ListKey::new(&list.key)?;
        let defaults = ListNaming::for_key(&key);
        let naming = ListNaming {
            item_query_name: list
                .item_query_name
                .clone()
                .unwrap_or(defaults.item_query_name),
            output_type_name: list
                .output_type_name
                .clone()
                .unwrap_or(defaults.output_type_name),
        };
        naming.validate()?;
        Ok(Self { key, naming })
    }
}

impl ListAdapter for DeclaredList {
    fn key(&self) -> &ListKey {
        &self.key
    }

    fn naming(&self) -> ListNaming {
        self.naming.clone()
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

pub struct DeclaredStrategy {
    auth_type: AuthType,
    arguments: Vec<StrategyArgument>,
}

impl DeclaredStrategy {
    pub fn new(auth_type: AuthType, arguments: Vec<StrategyArgument>) -> Self {
        Self {
            auth_type,
            arguments,
        }
    }
}

impl AuthStrategy for DeclaredStrategy {
    fn auth_type(&self) -> &AuthType {
        &self.auth_type
    }

    fn input_arguments(&self) -> Vec<StrategyArgument> {
        self.arguments.clone()
    }

    fn validate<'a>(
        &'a self,
        _args: &'a StrategyArgs,
    ) -> BoxFuture<'a, Result<ValidationOutcome, AuthError>> {
        Box::pin(async {
            Ok(ValidationOutcome::Failure {
                message: "declared strategies cannot verify credentials".to_string(),
            })
        })
    }
}

/// A declared list together with the binders of its strategies.
pub struct DeclaredBinding {
    pub naming: ListNaming,
    pub fields: Vec<String>,
    pub binders: Vec<AuthSchemaBinder>,
}

/// Build binders for every declared list and strategy.
pub fn bind_all(config: &AuthForgeConfig) -> Result<Vec<DeclaredBinding>, CliError> {
    config
        .lists
        .iter()
        .map(|list| -> Result<DeclaredBinding, CliError> {
            let adapter = Arc::new(DeclaredList::from_config(list)?);
            let naming = adapter.naming();
            let binders = list
                .strategies
                .iter()
                .map(|s| -> Result<AuthSchemaBinder, AuthError> {
                    let strategy = Arc::new(DeclaredStrategy::new(
                        AuthType::new(&s.auth_type)?,
                        s.arguments.clone(),
                    ));
                    AuthSchemaBinder::new(adapter.clone(), strategy, config.binder.clone())
                })
                .collect::<Result<Vec<_>, AuthError>>()?;
            Ok(DeclaredBinding {
                naming,
                fields: list.fields.clone(),
                binders,
            })
        })
        .collect()
}

/// Assemble the executable schema for all bindings.
pub fn assemble_schema(bindings: &[DeclaredBinding]) -> Result<Schema, CliError> {
    let mut builder = AuthSchemaBuilder::new();
    for binding in bindings {
        builder = builder.item_type(build_item_type(&binding.naming, &binding.fields));
        for binder in &binding.binders {
            builder = builder.binder(binder.clone());
        }
    }
    builder
        .build()
        .map_err(|message| CliError::Schema { message })
}
