use std::sync::Arc;

use async_graphql::dynamic::Schema;
use async_graphql::Value as GqlValue;
use auth_forge_core::access::{AccessRequest, OperationKind};
use auth_forge_core::{
    AccessDecision, AuthError, AuthSchemaBinder, AuthedSession, BoxFuture, Item, ListKey,
    RequestContext, SessionToken,
};
use auth_forge_graphql::execute;

use crate::cli::GlobalOpts;
use crate::declared::{assemble_schema, DeclaredBinding};
use crate::error::CliError;

/// Anonymous request context that grants every access check.
///
/// Dry runs never reach session start because declared strategies reject all
/// credentials.
struct DryRunContext;

impl RequestContext for DryRunContext {
    fn authed_item(&self) -> Option<&Item> {
        None
    }

    fn authed_list_key(&self) -> Option<&ListKey> {
        None
    }

    fn list_access_control_for_user<'a>(
        &'a self,
        _list_key: &'a ListKey,
        _user_input: Option<&'a serde_json::Value>,
        _operation: OperationKind,
        _request: &'a AccessRequest,
    ) -> BoxFuture<'a, Result<AccessDecision, AuthError>> {
        Box::pin(async { Ok(AccessDecision::Granted) })
    }

    fn start_authed_session<'a>(
        &'a self,
        _session: AuthedSession<'a>,
        _audiences: &'a [String],
    ) -> BoxFuture<'a, Result<SessionToken, AuthError>> {
        Box::pin(async { Err(AuthError::collaborator("dry-run context does not start sessions")) })
    }

    fn end_authed_session(&self) -> BoxFuture<'_, Result<(), AuthError>> {
        Box::pin(async { Ok(()) })
    }
}

/// Summary of a successful check.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct CheckReport {
    pub lists: usize,
    pub strategies: usize,
    pub exercised: usize,
}

/// Run the `check` command: validate, assemble and exercise every generated field.
pub async fn run(global: &GlobalOpts) -> Result<(), CliError> {
    let (_, bindings) = super::load_bindings(global)?;
    let report = check(&bindings).await?;
    println!(
        "ok: {} lists, {} strategies, {} fields exercised",
        report.lists, report.strategies, report.exercised
    );
    Ok(())
}

pub(crate) async fn check(bindings: &[DeclaredBinding]) -> Result<CheckReport, CliError> {
    let schema = assemble_schema(bindings)?;
    let mut report = CheckReport {
        lists: bindings.len(),
        ..CheckReport::default()
    };

    for binding in bindings {
        let Some(first) = binding.binders.first() else {
            continue;
        };
        exercise_shared_fields(&schema, first).await?;
        report.exercised += 2;

        for binder in &binding.binders {
            report.strategies += 1;
            if exercise_authenticate(&schema, binder).await? {
                report.exercised += 1;
            }
        }
    }

    Ok(report)
}

/// The authenticated-item query and unauthenticate mutation are shared by all
/// strategies of a list, so they are exercised once.
async fn exercise_shared_fields(schema: &Schema, binder: &AuthSchemaBinder) -> Result<(), CliError> {
    let names = binder.names();

    let query = format!("{{ {} {{ id }} }}", names.authenticated_query_name);
    let data = run_document(schema, &query, &names.authenticated_query_name).await?;
    if data.get(&names.authenticated_query_name) != Some(&serde_json::Value::Null) {
        return Err(exercise_failed(
            &names.authenticated_query_name,
            "expected null for an anonymous request",
        ));
    }

    let mutation = format!("mutation {{ {} {{ success }} }}", names.unauthenticate_mutation_name);
    let data = run_document(schema, &mutation, &names.unauthenticate_mutation_name).await?;
    if data[&names.unauthenticate_mutation_name]["success"] != serde_json::Value::Bool(true) {
        return Err(exercise_failed(
            &names.unauthenticate_mutation_name,
            "expected success: true",
        ));
    }

    Ok(())
}

/// Returns `false` when the mutation has required arguments and is skipped.
async fn exercise_authenticate(schema: &Schema, binder: &AuthSchemaBinder) -> Result<bool, CliError> {
    let field = binder.names().authenticate_mutation_name.as_str();
    let has_required = binder
        .schema_mutations(&Default::default())
        .iter()
        .filter(|f| f.name == field)
        .flat_map(|f| &f.arguments)
        .any(|arg| arg.type_ref.trim_end().ends_with('!'));
    if has_required {
        tracing::debug!(field, "skipping: mutation has required arguments");
        return Ok(false);
    }

    let mutation = format!("mutation {{ {field} {{ token }} }}");
    let response = execute(schema, mutation.as_str(), Arc::new(DryRunContext)).await.0;
    let code = response
        .errors
        .first()
        .and_then(|e| e.extensions.as_ref())
        .and_then(|ext| ext.get("code"))
        .cloned();
    match code {
        Some(GqlValue::String(code)) if code == "VALIDATION_ERROR" => Ok(true),
        other => Err(exercise_failed(
            field,
            &format!("expected VALIDATION_ERROR, got {other:?}"),
        )),
    }
}

async fn run_document(
    schema: &Schema,
    document: &str,
    field: &str,
) -> Result<serde_json::Value, CliError> {
    let (response, _) = execute(schema, document, Arc::new(DryRunContext)).await;
    if let Some(err) = response.errors.first() {
        return Err(exercise_failed(field, &err.message));
    }
    response
        .data
        .into_json()
        .map_err(|e| exercise_failed(field, &e.to_string()))
}

fn exercise_failed(field: &str, reason: &str) -> CliError {
    CliError::Schema {
        message: format!("exercising '{field}' failed: {reason}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::declared::bind_all;

    fn bindings(src: &str) -> Vec<DeclaredBinding> {
        bind_all(&parse_config(src, "t.toml").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn check_exercises_every_list() {
        let src = r#"
[[lists]]
key = "User"
fields = ["name"]
[[lists.strategies]]
auth_type = "password"
arguments = [{ name = "email", type = "String" }, { name = "password", type = "String" }]
[[lists.strategies]]
auth_type = "token"
arguments = [{ name = "token", type = "String!" }]

[[lists]]
key = "Customer"
"#;
        let report = check(&bindings(src)).await.unwrap();
        assert_eq!(
            report,
            CheckReport {
                lists: 2,
                strategies: 2,
                exercised: 3,
            }
        );
    }

    #[tokio::test]
    async fn empty_config_checks_clean() {
        let report = check(&bindings("")).await.unwrap();
        assert_eq!(report, CheckReport::default());
    }

    #[tokio::test]
    async fn collision_fails_check() {
        let src = r#"
[[lists]]
key = "User"
[[lists.strategies]]
auth_type = "password"

[[lists]]
key = "Member"
item_query_name = "User"
output_type_name = "MemberAccount"
[[lists.strategies]]
auth_type = "password"
"#;
        let err = check(&bindings(src)).await.unwrap_err();
        assert!(err.to_string().contains("collision"));
    }
}
