use serde::{Deserialize, Serialize};

use super::{AuthType, ListKey};
use crate::error::AuthError;

/// Naming scheme a list exposes to the GraphQL layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListNaming {
    /// Stem used in per-item query names (`User` in `authenticatedUser`).
    pub item_query_name: String,
    /// Name of the list's GraphQL output object type.
    pub output_type_name: String,
}

impl ListNaming {
    /// Default naming: both names equal the list key.
    pub fn for_key(key: &ListKey) -> Self {
        Self {
            item_query_name: key.as_str().to_string(),
            output_type_name: key.as_str().to_string(),
        }
    }

    /// Checks that both names are present and are valid GraphQL names.
    pub fn validate(&self) -> Result<(), AuthError> {
        for (field, value) in [
            ("item query name", &self.item_query_name),
            ("output type name", &self.output_type_name),
        ] {
            if !is_graphql_name(value) {
                return Err(AuthError::InvalidNaming {
                    field,
                    value: value.clone(),
                });
            }
        }
        Ok(())
    }
}

/// `[_A-Za-z][_0-9A-Za-z]*`
pub fn is_graphql_name(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c == '_' || c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c == '_' || c.is_ascii_alphanumeric())
}

/// The six wire-visible names a binder generates for one (list, strategy) pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct GeneratedNames {
    pub output_type_name: String,
    pub authenticate_output_name: String,
    pub unauthenticate_output_name: String,
    pub authenticated_query_name: String,
    pub authenticate_mutation_name: String,
    pub unauthenticate_mutation_name: String,
}

impl GeneratedNames {
    /// Derive all names from the list naming and strategy type.
    ///
    /// Only `authenticate_mutation_name` depends on `auth_type`, which lets
    /// several strategies share one list without colliding.
    pub fn derive(naming: &ListNaming, auth_type: &AuthType) -> Self {
        let item = naming.item_query_name.as_str();
        Self {
            output_type_name: naming.output_type_name.clone(),
            authenticate_output_name: format!("authenticate{item}Output"),
            unauthenticate_output_name: format!("unauthenticate{item}Output"),
            authenticated_query_name: format!("authenticated{item}"),
            authenticate_mutation_name: format!(
                "authenticate{item}With{}",
                auth_type.title_case()
            ),
            unauthenticate_mutation_name: format!("unauthenticate{item}"),
        }
    }
}
