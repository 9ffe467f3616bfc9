use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::{Item, ItemId};

/// Field name that addresses an item's id in filters.
pub const ID_FIELD: &str = "id";

/// Storage-agnostic where-clause passed to [`ListAdapter::item_query`].
///
/// Lists compile this to their native query language.
///
/// [`ListAdapter::item_query`]: crate::traits::ListAdapter::item_query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op")]
#[non_exhaustive]
pub enum Filter {
    /// Field equals value.
    Eq { field: String, value: Value },
    /// Field value is one of the given values.
    In { field: String, values: Vec<Value> },
    /// All sub-filters must match (logical AND).
    And { filters: Vec<Filter> },
    /// At least one sub-filter must match (logical OR).
    Or { filters: Vec<Filter> },
    /// The sub-filter must NOT match (logical NOT).
    Not { filter: Box<Filter> },
}

impl Filter {
    /// Create an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Eq {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Create a membership filter.
    pub fn in_values(field: impl Into<String>, values: Vec<Value>) -> Self {
        Self::In {
            field: field.into(),
            values,
        }
    }

    /// Combine filters with AND.
    pub fn and(filters: Vec<Filter>) -> Self {
        Self::And { filters }
    }

    /// Combine filters with OR.
    pub fn or(filters: Vec<Filter>) -> Self {
        Self::Or { filters }
    }

    /// Negate a filter.
    pub fn negate(filter: Filter) -> Self {
        Self::Not {
            filter: Box::new(filter),
        }
    }

    /// `id == <id>`
    pub fn id_eq(id: &ItemId) -> Self {
        Self::eq(ID_FIELD, id.as_str())
    }

    /// AND this filter with an optional access restriction.
    ///
    /// Without a restriction the filter is returned unchanged.
    pub fn merge(self, restriction: Option<Filter>) -> Self {
        match restriction {
            None => self,
            Some(r) => Self::and(vec![self, r]),
        }
    }

    /// Evaluate the filter against an in-memory item.
    ///
    /// `id` resolves to the item id; other names resolve to item fields, with a
    /// missing field compared as `null`.
    pub fn matches(&self, item: &Item) -> bool {
        match self {
            Self::Eq { field, value } => field_value(item, field) == *value,
            Self::In { field, values } => {
                let actual = field_value(item, field);
                values.iter().any(|v| *v == actual)
            }
            Self::And { filters } => filters.iter().all(|f| f.matches(item)),
            Self::Or { filters } => filters.iter().any(|f| f.matches(item)),
            Self::Not { filter } => !filter.matches(item),
        }
    }
}

fn field_value(item: &Item, field: &str) -> Value {
    if field == ID_FIELD {
        return Value::String(item.id.as_str().to_string());
    }
    item.field(field).cloned().unwrap_or(Value::Null)
}
