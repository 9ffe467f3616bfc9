use auth_forge_core::GeneratedNames;
use serde::Serialize;

use crate::cli::{GlobalOpts, NamesArgs};
use crate::declared::DeclaredBinding;
use crate::error::CliError;

#[derive(Debug, Serialize)]
struct NamesRow<'a> {
    list: &'a str,
    auth_type: &'a str,
    names: &'a GeneratedNames,
}

/// Run the `names` command: print generated names per list and strategy.
pub async fn run(args: NamesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, bindings) = super::load_bindings(global)?;
    let out = render(&bindings, args.list.as_deref(), args.json)?;
    print!("{out}");
    Ok(())
}

pub(crate) fn render(
    bindings: &[DeclaredBinding],
    only_list: Option<&str>,
    json: bool,
) -> Result<String, CliError> {
    if let Some(wanted) = only_list {
        let known = bindings
            .iter()
            .flat_map(|b| b.binders.first())
            .any(|binder| binder.list_key().as_str() == wanted);
        if !known {
            return Err(CliError::InvalidArgument(format!(
                "unknown list '{wanted}' (or it declares no strategies)"
            )));
        }
    }

    let rows: Vec<NamesRow<'_>> = bindings
        .iter()
        .flat_map(|b| &b.binders)
        .filter(|binder| only_list.map_or(true, |l| binder.list_key().as_str() == l))
        .map(|binder| NamesRow {
            list: binder.list_key().as_str(),
            auth_type: binder.auth_type().as_str(),
            names: binder.names(),
        })
        .collect();

    if json {
        let mut s = serde_json::to_string_pretty(&rows)
            .map_err(|e| CliError::Other(format!("failed to serialize names: {e}")))?;
        s.push('\n');
        return Ok(s);
    }

    let mut out = String::new();
    for row in &rows {
        let n = row.names;
        out.push_str(&format!("{} ({})\n", row.list, row.auth_type));
        for (label, value) in [
            ("output type", &n.output_type_name),
            ("query", &n.authenticated_query_name),
            ("authenticate", &n.authenticate_mutation_name),
            ("unauthenticate", &n.unauthenticate_mutation_name),
            ("authenticate output", &n.authenticate_output_name),
            ("unauthenticate output", &n.unauthenticate_output_name),
        ] {
            out.push_str(&format!("  {label:<22} {value}\n"));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;
    use crate::declared::bind_all;

    const SRC: &str = r#"
[[lists]]
key = "User"
[[lists.strategies]]
auth_type = "password"
[[lists.strategies]]
auth_type = "magicLink"

[[lists]]
key = "Customer"
[[lists.strategies]]
auth_type = "password"
"#;

    fn bindings() -> Vec<DeclaredBinding> {
        bind_all(&parse_config(SRC, "t.toml").unwrap()).unwrap()
    }

    #[test]
    fn table_lists_every_strategy() {
        let out = render(&bindings(), None, false).unwrap();
        assert!(out.contains("authenticateUserWithPassword"));
        assert!(out.contains("authenticateUserWithMagicLink"));
        assert!(out.contains("authenticateCustomerWithPassword"));
    }

    #[test]
    fn filter_by_list() {
        let out = render(&bindings(), Some("Customer"), false).unwrap();
        assert!(out.contains("authenticatedCustomer"));
        assert!(!out.contains("authenticatedUser"));
    }

    #[test]
    fn json_output_parses() {
        let out = render(&bindings(), Some("User"), true).unwrap();
        let v: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(v.as_array().unwrap().len(), 2);
        assert_eq!(v[0]["names"]["authenticated_query_name"], "authenticatedUser");
        assert_eq!(v[1]["auth_type"], "magicLink");
    }

    #[test]
    fn unknown_list_is_rejected() {
        let err = render(&bindings(), Some("Nope"), false).unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument(_)));
    }
}
