use miette::{Diagnostic, NamedSource, SourceSpan};

/// A TOML syntax or shape error with the offending span highlighted.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("invalid configuration: {message}")]
#[diagnostic(code(auth_forge::config))]
pub struct ConfigDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,

    message: String,

    #[help]
    help: Option<String>,
}

impl ConfigDiagnostic {
    pub fn from_toml(error: &toml::de::Error, source: &str, filename: &str) -> Self {
        let span = error
            .span()
            .map(|r| SourceSpan::from((r.start, r.end.saturating_sub(r.start))));
        let message = error.message().trim().to_string();
        let help = if message.contains("missing field `key`") {
            Some("Every [[lists]] entry needs a PascalCase `key`.".to_string())
        } else if message.contains("missing field `auth_type`") {
            Some("Every [[lists.strategies]] entry needs an `auth_type`.".to_string())
        } else {
            None
        };
        Self {
            src: NamedSource::new(filename, source.to_string()),
            span,
            message,
            help,
        }
    }
}
