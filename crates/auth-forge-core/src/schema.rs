//! Declarative schema fragments emitted by a binder.
//!
//! Fragments are plain data: they render to SDL for inspection and are mounted
//! onto an executable schema by the GraphQL layer.

use std::fmt::Write as _;

use serde::Serialize;

use crate::traits::StrategyArgument;

/// Options passed by the schema assembler. Currently informational only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaOptions {
    pub schema_name: Option<String>,
}

/// A field of an object type, or a root query/mutation field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDefinition {
    pub name: String,
    pub description: Option<String>,
    pub arguments: Vec<StrategyArgument>,
    /// GraphQL type reference in SDL form.
    pub type_ref: String,
}

impl FieldDefinition {
    pub fn new(name: impl Into<String>, type_ref: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            arguments: Vec::new(),
            type_ref: type_ref.into(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn arguments(mut self, arguments: Vec<StrategyArgument>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Render as an SDL field line, indented by `indent` spaces.
    pub fn to_sdl(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut out = String::new();
        if let Some(desc) = &self.description {
            push_description(&mut out, &pad, desc);
        }
        out.push_str(&pad);
        out.push_str(&self.name);
        if !self.arguments.is_empty() {
            let args = self
                .arguments
                .iter()
                .map(|a| format!("{}: {}", a.name, a.type_ref))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(out, "({args})");
        }
        let _ = write!(out, ": {}", self.type_ref);
        out
    }
}

/// An output object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDefinition {
    pub name: String,
    pub description: Option<String>,
    pub fields: Vec<FieldDefinition>,
}

impl TypeDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDefinition) -> Self {
        self.fields.push(field);
        self
    }

    pub fn to_sdl(&self) -> String {
        let mut out = String::new();
        if let Some(desc) = &self.description {
            push_description(&mut out, "", desc);
        }
        let _ = writeln!(out, "type {} {{", self.name);
        for field in &self.fields {
            out.push_str(&field.to_sdl(2));
            out.push('\n');
        }
        out.push('}');
        out
    }
}

fn push_description(out: &mut String, pad: &str, desc: &str) {
    if desc.contains('\n') {
        let _ = writeln!(out, "{pad}\"\"\"");
        for line in desc.lines() {
            let _ = writeln!(out, "{pad}{line}");
        }
        let _ = writeln!(out, "{pad}\"\"\"");
    } else {
        let _ = writeln!(out, "{pad}\"\"\" {desc} \"\"\"");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_sdl_without_arguments() {
        let field = FieldDefinition::new("authenticatedUser", "User");
        assert_eq!(field.to_sdl(0), "authenticatedUser: User");
    }

    #[test]
    fn field_sdl_with_arguments_and_description() {
        let field = FieldDefinition::new("authenticateUserWithPassword", "authenticateUserOutput")
            .description("Authenticate a User.")
            .arguments(vec![
                StrategyArgument::new("email", "String"),
                StrategyArgument::new("password", "String"),
            ]);
        assert_eq!(
            field.to_sdl(2),
            "  \"\"\" Authenticate a User. \"\"\"\n  authenticateUserWithPassword(email: String, password: String): authenticateUserOutput"
        );
    }

    #[test]
    fn type_sdl_with_multiline_description_field() {
        let ty = TypeDefinition::new("unauthenticateUserOutput").field(
            FieldDefinition::new("success", "Boolean").description("line one\nline two"),
        );
        assert_eq!(
            ty.to_sdl(),
            "type unauthenticateUserOutput {\n  \"\"\"\n  line one\n  line two\n  \"\"\"\n  success: Boolean\n}"
        );
    }
}
