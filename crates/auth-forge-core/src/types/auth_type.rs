use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// Short identifier of an authentication mechanism, e.g. `password`.
///
/// Used in generated names after upper-casing its first character, so it is
/// restricted to ASCII alphanumerics. The first character is stored
/// lower-cased: `Password` and `password` are the same type.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AuthType(String);

impl AuthType {
    pub fn new(s: impl Into<String>) -> Result<Self, AuthError> {
        let s = s.into();
        let valid = s
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic())
            && s.chars().all(|c| c.is_ascii_alphanumeric());
        if !valid {
            return Err(AuthError::InvalidAuthType(s));
        }
        Ok(Self(downcase_first(&s)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The type with its first character upper-cased (`password` -> `Password`).
    pub fn title_case(&self) -> String {
        upcase_first(&self.0)
    }
}

/// Upper-case the first character of a string.
pub(crate) fn upcase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn downcase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

impl fmt::Display for AuthType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<AuthType> for String {
    fn from(t: AuthType) -> String {
        t.0
    }
}

impl TryFrom<String> for AuthType {
    type Error = AuthError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}
