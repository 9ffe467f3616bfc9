use std::collections::{HashMap, HashSet};

use async_graphql::dynamic::{
    self, Field, FieldFuture, FieldValue, InputValue, Object, Scalar, Schema, TypeRef,
};
use auth_forge_core::binder::{MutationResolvers, QueryResolvers};
use auth_forge_core::schema::{FieldDefinition, TypeDefinition};
use auth_forge_core::{AuthSchemaBinder, ListKey, ListNaming, SchemaOptions};

use super::resolvers::{
    resolve_authenticate, resolve_authenticated_item, resolve_item_field, resolve_output_item,
    resolve_output_success, resolve_output_token, resolve_unauthenticate,
};
use super::type_mapping::{parse_type_ref, JSON_SCALAR};

/// Assembles binders and list output types into an executable dynamic schema.
///
/// Several binders may target the same list (one per strategy). Fields and
/// types they share are registered once. A name produced by two different
/// lists, or an authenticate mutation generated twice, is rejected as a
/// collision.
#[derive(Default)]
pub struct AuthSchemaBuilder {
    binders: Vec<AuthSchemaBinder>,
    item_types: Vec<Object>,
    options: SchemaOptions,
}

impl AuthSchemaBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn options(mut self, options: SchemaOptions) -> Self {
        self.options = options;
        self
    }

    pub fn binder(mut self, binder: AuthSchemaBinder) -> Self {
        self.binders.push(binder);
        self
    }

    /// Register a list output type, typically from [`build_item_type`].
    pub fn item_type(mut self, object: Object) -> Self {
        self.item_types.push(object);
        self
    }

    /// Build the schema with depth and complexity limits.
    pub fn build(self) -> Result<Schema, String> {
        let mut query = Object::new("Query");
        let mut mutation = Object::new("Mutation");
        let mut registry = NameRegistry::default();
        let mut types_to_register: Vec<dynamic::Type> = vec![dynamic::Type::Scalar(
            Scalar::new(JSON_SCALAR).description("Arbitrary JSON value"),
        )];

        for binder in &self.binders {
            let mounted = mount_binder(binder, &self.options, &mut registry)?;
            for field in mounted.query_fields {
                query = query.field(field);
            }
            for field in mounted.mutation_fields {
                mutation = mutation.field(field);
            }
            types_to_register.extend(mounted.types);
        }

        // async-graphql requires at least one Query field
        if self.binders.is_empty() {
            query = query.field(Field::new(
                "_empty",
                TypeRef::named(TypeRef::BOOLEAN),
                |_ctx| FieldFuture::new(async { Ok(None::<FieldValue>) }),
            ));
        }

        let mutation_name = if self.binders.is_empty() {
            None
        } else {
            Some(mutation.type_name())
        };

        let mut builder = Schema::build(query.type_name(), mutation_name, None)
            .limit_depth(10)
            .limit_complexity(1000)
            .register(query);

        if !self.binders.is_empty() {
            builder = builder.register(mutation);
        }

        for ty in types_to_register {
            builder = builder.register(ty);
        }
        let mut item_type_names = HashSet::new();
        for object in self.item_types {
            let name = object.type_name().to_string();
            if registry.owners.contains_key(&name) || !item_type_names.insert(name.clone()) {
                return Err(format!("output type '{name}' is registered more than once"));
            }
            builder = builder.register(object);
        }

        builder
            .finish()
            .map_err(|e| format!("GraphQL schema build failed: {e}"))
    }
}

/// Fields and types one binder contributes to a schema.
pub struct MountedBinder {
    pub query_fields: Vec<Field>,
    pub mutation_fields: Vec<Field>,
    pub types: Vec<dynamic::Type>,
}

/// Tracks which list produced each registered name.
#[derive(Default)]
pub struct NameRegistry {
    owners: HashMap<String, ListKey>,
}

impl NameRegistry {
    /// Claim `name` for `owner`.
    ///
    /// Returns `Ok(true)` for a new name, `Ok(false)` when the same list has
    /// already registered it, and an error when another list owns it.
    pub fn claim(&mut self, name: &str, owner: &ListKey) -> Result<bool, String> {
        match self.owners.get(name) {
            Some(existing) if existing == owner => Ok(false),
            Some(existing) => Err(format!(
                "GraphQL field name collision: '{name}' is generated by both '{existing}' and '{owner}'"
            )),
            None => {
                self.owners.insert(name.to_string(), owner.clone());
                Ok(true)
            }
        }
    }

    /// Claim `name` for `owner`, failing if anything has registered it before.
    pub fn claim_exclusive(&mut self, name: &str, owner: &ListKey) -> Result<(), String> {
        if self.claim(name, owner)? {
            Ok(())
        } else {
            Err(format!(
                "GraphQL field name collision: '{name}' is generated twice for '{owner}'"
            ))
        }
    }
}

/// Turn one binder's fragments and resolvers into dynamic schema parts.
///
/// Every emitted schema field is paired with the resolver of the same name;
/// a field without a resolver is an error.
pub fn mount_binder(
    binder: &AuthSchemaBinder,
    options: &SchemaOptions,
    registry: &mut NameRegistry,
) -> Result<MountedBinder, String> {
    let owner = binder.list_key().clone();
    let output_type_name = binder.names().output_type_name.clone();

    let mut types = Vec::new();
    for def in binder.schema_types(options) {
        if registry.claim(&def.name, &owner)? {
            types.push(dynamic::Type::Object(build_output_object(
                &def,
                &output_type_name,
            )?));
        }
    }

    let query_resolvers = binder.query_resolvers(options);
    let mut query_fields = Vec::new();
    for def in binder.schema_queries(options) {
        if registry.claim(&def.name, &owner)? {
            query_fields.push(build_query_field(&def, &query_resolvers, &output_type_name)?);
        }
    }

    let mutation_resolvers = binder.mutation_resolvers(options);
    let mut mutation_fields = Vec::new();
    for def in binder.schema_mutations(options) {
        // the authenticate mutation carries strategy-specific arguments and
        // must be unique even within one list
        if def.name == mutation_resolvers.authenticate.field_name() {
            registry.claim_exclusive(&def.name, &owner)?;
            mutation_fields.push(build_mutation_field(&def, &mutation_resolvers)?);
        } else if registry.claim(&def.name, &owner)? {
            mutation_fields.push(build_mutation_field(&def, &mutation_resolvers)?);
        }
    }

    Ok(MountedBinder {
        query_fields,
        mutation_fields,
        types,
    })
}

fn build_query_field(
    def: &FieldDefinition,
    resolvers: &QueryResolvers,
    output_type_name: &str,
) -> Result<Field, String> {
    if def.name != resolvers.authenticated_item.field_name() {
        return Err(format!("no resolver generated for query field '{}'", def.name));
    }
    let resolver = resolvers.authenticated_item.clone();
    let tn = output_type_name.to_string();
    let field = Field::new(&def.name, parse_type_ref(&def.type_ref)?, move |ctx| {
        let resolver = resolver.clone();
        let tn = tn.clone();
        FieldFuture::new(async move { resolve_authenticated_item(&ctx, &resolver, &tn).await })
    });
    Ok(with_description(field, def))
}

fn build_mutation_field(
    def: &FieldDefinition,
    resolvers: &MutationResolvers,
) -> Result<Field, String> {
    let type_ref = parse_type_ref(&def.type_ref)?;

    let field = if def.name == resolvers.authenticate.field_name() {
        let resolver = resolvers.authenticate.clone();
        let mut field = Field::new(&def.name, type_ref, move |ctx| {
            let resolver = resolver.clone();
            FieldFuture::new(async move { resolve_authenticate(&ctx, &resolver).await })
        });
        for arg in &def.arguments {
            field = field.argument(InputValue::new(&arg.name, parse_type_ref(&arg.type_ref)?));
        }
        field
    } else if def.name == resolvers.unauthenticate.field_name() {
        let resolver = resolvers.unauthenticate.clone();
        Field::new(&def.name, type_ref, move |ctx| {
            let resolver = resolver.clone();
            FieldFuture::new(async move { resolve_unauthenticate(&ctx, &resolver).await })
        })
    } else {
        return Err(format!(
            "no resolver generated for mutation field '{}'",
            def.name
        ));
    };

    Ok(with_description(field, def))
}

/// Build one of the authenticate/unauthenticate output objects.
fn build_output_object(def: &TypeDefinition, output_type_name: &str) -> Result<Object, String> {
    let mut obj = Object::new(&def.name);
    for field_def in &def.fields {
        let type_ref = parse_type_ref(&field_def.type_ref)?;
        let field = match field_def.name.as_str() {
            "success" => Field::new(&field_def.name, type_ref, |ctx| {
                FieldFuture::new(async move { resolve_output_success(&ctx) })
            }),
            "token" => Field::new(&field_def.name, type_ref, |ctx| {
                FieldFuture::new(async move { resolve_output_token(&ctx) })
            }),
            "item" => {
                let tn = output_type_name.to_string();
                Field::new(&field_def.name, type_ref, move |ctx| {
                    let tn = tn.clone();
                    FieldFuture::new(async move { resolve_output_item(&ctx, &tn) })
                })
            }
            other => {
                return Err(format!(
                    "no resolver for field '{other}' of type '{}'",
                    def.name
                ))
            }
        };
        obj = obj.field(with_description(field, field_def));
    }
    Ok(obj)
}

fn with_description(field: Field, def: &FieldDefinition) -> Field {
    match &def.description {
        Some(desc) => field.description(desc),
        None => field,
    }
}

/// Build a list output object: `id: ID!` plus one JSON-valued field per name.
pub fn build_item_type(naming: &ListNaming, fields: &[String]) -> Object {
    let mut obj = Object::new(&naming.output_type_name).field(Field::new(
        "id",
        TypeRef::named_nn(TypeRef::ID),
        |ctx| FieldFuture::new(async move { resolve_item_field(&ctx, "id") }),
    ));

    for field_name in fields.iter().filter(|f| f.as_str() != "id") {
        let fn_clone = field_name.clone();
        obj = obj.field(Field::new(
            field_name,
            TypeRef::named(JSON_SCALAR),
            move |ctx| {
                let fn_clone = fn_clone.clone();
                FieldFuture::new(async move { resolve_item_field(&ctx, &fn_clone) })
            },
        ));
    }

    obj
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use auth_forge_core::{
        AuthError, AuthStrategy, AuthType, BinderConfig, BoxFuture, Filter, Item, ListAdapter,
        RequestContext, StrategyArgs, StrategyArgument, ValidationOutcome,
    };

    struct EmptyList {
        key: ListKey,
    }

    impl ListAdapter for EmptyList {
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

    struct NamedStrategy {
        auth_type: AuthType,
    }

    impl AuthStrategy for NamedStrategy {
        fn auth_type(&self) -> &AuthType {
            &self.auth_type
        }

        fn input_arguments(&self) -> Vec<StrategyArgument> {
            vec![StrategyArgument::new("secret", "String!")]
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
            Arc::new(EmptyList {
                key: ListKey::new(key).unwrap(),
            }),
            Arc::new(NamedStrategy {
                auth_type: AuthType::new(auth_type).unwrap(),
            }),
            BinderConfig::default(),
        )
        .unwrap()
    }

    fn item_type(key: &str) -> Object {
        build_item_type(
            &ListNaming::for_key(&ListKey::new(key).unwrap()),
            &["name".to_string()],
        )
    }

    #[test]
    fn build_empty_schema() {
        assert!(AuthSchemaBuilder::new().build().is_ok());
    }

    #[test]
    fn build_single_binder() {
        let schema = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .item_type(item_type("User"))
            .build()
            .unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("authenticatedUser: User"));
        assert!(sdl.contains("authenticateUserWithPassword(secret: String!): authenticateUserOutput"));
        assert!(sdl.contains("unauthenticateUser: unauthenticateUserOutput"));
    }

    #[test]
    fn two_strategies_on_one_list_share_common_fields() {
        let schema = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .binder(binder("User", "token"))
            .item_type(item_type("User"))
            .build()
            .unwrap();
        let sdl = schema.sdl();
        assert!(sdl.contains("authenticateUserWithPassword"));
        assert!(sdl.contains("authenticateUserWithToken"));
        assert_eq!(sdl.matches("unauthenticateUser:").count(), 1);
    }

    #[test]
    fn binders_for_different_lists_coexist() {
        let result = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .binder(binder("Customer", "password"))
            .item_type(item_type("User"))
            .item_type(item_type("Customer"))
            .build();
        assert!(result.is_ok(), "schema build failed: {:?}", result.err());
    }

    #[test]
    fn duplicate_item_type_rejected() {
        let err = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .item_type(item_type("User"))
            .item_type(item_type("User"))
            .build()
            .unwrap_err();
        assert!(err.contains("more than once"));
    }

    #[test]
    fn same_authenticate_name_twice_on_one_list_is_a_collision() {
        let err = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .binder(binder("User", "password"))
            .item_type(item_type("User"))
            .build()
            .unwrap_err();
        assert!(err.contains("authenticateUserWithPassword"));
        assert!(err.contains("collision"));
    }

    #[test]
    fn auth_types_differing_in_first_letter_case_collide() {
        let err = AuthSchemaBuilder::new()
            .binder(binder("User", "password"))
            .binder(binder("User", "Password"))
            .item_type(item_type("User"))
            .build()
            .unwrap_err();
        assert!(err.contains("collision"));
    }

    #[test]
    fn claim_exclusive_rejects_repeat_from_same_list() {
        let mut registry = NameRegistry::default();
        let user = ListKey::new("User").unwrap();
        assert!(registry.claim_exclusive("authenticateUserWithPassword", &user).is_ok());
        assert!(registry.claim_exclusive("authenticateUserWithPassword", &user).is_err());
    }

    #[test]
    fn name_claimed_by_other_list_is_a_collision() {
        let mut registry = NameRegistry::default();
        let user = ListKey::new("User").unwrap();
        let other = ListKey::new("Other").unwrap();
        assert_eq!(registry.claim("authenticatedUser", &user), Ok(true));
        assert_eq!(registry.claim("authenticatedUser", &user), Ok(false));
        let err = registry.claim("authenticatedUser", &other).unwrap_err();
        assert!(err.contains("collision"));
    }

    #[test]
    fn mount_pairs_every_field_with_a_resolver() {
        let b = binder("User", "password");
        let mut registry = NameRegistry::default();
        let mounted = mount_binder(&b, &SchemaOptions::default(), &mut registry).unwrap();
        assert_eq!(mounted.query_fields.len(), 1);
        assert_eq!(mounted.mutation_fields.len(), 2);
        assert_eq!(mounted.types.len(), 2);
    }
}
