use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Stable key of a list (content type), PascalCase `[A-Z][a-zA-Z0-9]*`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ListKey(String);

impl ListKey {
    /// Creates a new `ListKey`, validating PascalCase format.
    pub fn new(s: impl Into<String>) -> Result<Self, AuthError> {
        let s = s.into();
        if !is_pascal_case(&s) {
            return Err(AuthError::InvalidListKey(s));
        }
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_pascal_case(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric())
}

impl fmt::Display for ListKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<ListKey> for String {
    fn from(k: ListKey) -> String {
        k.0
    }
}

impl TryFrom<String> for ListKey {
    type Error = AuthError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl AsRef<str> for ListKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
