use async_graphql::dynamic::{FieldValue, ResolverContext};
use async_graphql::{ErrorExtensions, Value as GqlValue};
use auth_forge_core::binder::{
    AuthenticateResolver, AuthenticatedItemResolver, UnauthenticateResolver,
};
use auth_forge_core::{AuthError, AuthenticateOutput, CacheControl, Item, UnauthenticateOutput};

use super::context::AuthGraphqlContext;
use super::type_mapping::{arguments_to_strategy_args, json_to_gql_value};

/// Message clients see for any failure they should not learn details about.
const INTERNAL_MESSAGE: &str = "An unexpected error occurred";

/// Convert an `AuthError` to an `async_graphql::Error` with extension codes.
///
/// Access denials carry their public `data` payload as an extension; the
/// internal principal details are never attached.
pub fn auth_error_to_gql(err: AuthError) -> async_graphql::Error {
    match &err {
        AuthError::AccessDenied { data, internal } => {
            tracing::debug!(
                target_field = %data.target,
                authed_id = ?internal.authed_id,
                authed_list_key = ?internal.authed_list_key,
                "rejecting field with access denied"
            );
            let public = serde_json::to_value(data)
                .map(|v| json_to_gql_value(&v))
                .unwrap_or(GqlValue::Null);
            async_graphql::Error::new(err.to_string()).extend_with(|_, e| {
                e.set("code", "ACCESS_DENIED");
                e.set("data", public);
            })
        }
        AuthError::ValidationFailed { message } => async_graphql::Error::new(message.clone())
            .extend_with(|_, e| e.set("code", "VALIDATION_ERROR")),
        AuthError::InvalidListKey(_)
        | AuthError::InvalidAuthType(_)
        | AuthError::InvalidNaming { .. }
        | AuthError::InvalidConfig { .. } => async_graphql::Error::new(err.to_string())
            .extend_with(|_, e| e.set("code", "BAD_REQUEST")),
        _ => {
            tracing::error!(error = %err, "auth resolver failed");
            async_graphql::Error::new(INTERNAL_MESSAGE)
                .extend_with(|_, e| e.set("code", "INTERNAL_ERROR"))
        }
    }
}

/// Resolve the `authenticated<Item>` query.
pub async fn resolve_authenticated_item<'a>(
    ctx: &ResolverContext<'a>,
    resolver: &AuthenticatedItemResolver,
    output_type_name: &str,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let gql_ctx = ctx.data::<AuthGraphqlContext>()?;
    let cache: &dyn CacheControl = gql_ctx.cache.as_ref();

    let item = resolver
        .resolve(gql_ctx.request.as_ref(), Some(cache))
        .await
        .map_err(auth_error_to_gql)?;

    Ok(item.map(|item| item_to_field_value(item, output_type_name)))
}

/// Resolve the `authenticate<Item>With<Strategy>` mutation.
pub async fn resolve_authenticate<'a>(
    ctx: &ResolverContext<'a>,
    resolver: &AuthenticateResolver,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let gql_ctx = ctx.data::<AuthGraphqlContext>()?;
    let args = arguments_to_strategy_args(ctx.args.as_index_map());

    let output = resolver
        .resolve(&args, gql_ctx.request.as_ref())
        .await
        .map_err(auth_error_to_gql)?;

    Ok(Some(FieldValue::owned_any(output)))
}

/// Resolve the `unauthenticate<Item>` mutation.
pub async fn resolve_unauthenticate<'a>(
    ctx: &ResolverContext<'a>,
    resolver: &UnauthenticateResolver,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let gql_ctx = ctx.data::<AuthGraphqlContext>()?;

    let output = resolver
        .resolve(gql_ctx.request.as_ref())
        .await
        .map_err(auth_error_to_gql)?;

    Ok(Some(FieldValue::owned_any(output)))
}

/// `token` field of the authenticate output.
pub fn resolve_output_token<'a>(
    ctx: &ResolverContext<'a>,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let output = ctx.parent_value.try_downcast_ref::<AuthenticateOutput>()?;
    Ok(Some(FieldValue::value(GqlValue::String(
        output.token.as_str().to_string(),
    ))))
}

/// `item` field of the authenticate output.
pub fn resolve_output_item<'a>(
    ctx: &ResolverContext<'a>,
    output_type_name: &str,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let output = ctx.parent_value.try_downcast_ref::<AuthenticateOutput>()?;
    Ok(Some(item_to_field_value(
        output.item.clone(),
        output_type_name,
    )))
}

/// `success` field of the unauthenticate output.
pub fn resolve_output_success<'a>(
    ctx: &ResolverContext<'a>,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let output = ctx.parent_value.try_downcast_ref::<UnauthenticateOutput>()?;
    Ok(Some(FieldValue::value(GqlValue::Boolean(output.success))))
}

/// Resolve one field of a list item.
pub fn resolve_item_field<'a>(
    ctx: &ResolverContext<'a>,
    field_name: &str,
) -> async_graphql::Result<Option<FieldValue<'a>>> {
    let item = ctx.parent_value.try_downcast_ref::<Item>()?;
    if field_name == "id" {
        return Ok(Some(FieldValue::value(GqlValue::String(
            item.id.as_str().to_string(),
        ))));
    }
    Ok(item
        .field(field_name)
        .map(|v| FieldValue::value(json_to_gql_value(v))))
}

fn item_to_field_value(item: Item, type_name: &str) -> FieldValue<'static> {
    FieldValue::owned_any(item).with_type(type_name.to_string())
}
