use std::path::PathBuf;

use auth_forge_core::AuthError;

use crate::diagnostic::ConfigDiagnostic;

/// Exit codes for the CLI process.
///
/// - 0: success
/// - 1: general error
/// - 2: invalid arguments / usage error
/// - 3: configuration error (unreadable, unparsable or conflicting)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success = 0,
    GeneralError = 1,
    InvalidArguments = 2,
    ConfigError = 3,
}

/// Errors returned by CLI command handlers.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum CliError {
    /// No configuration file at the resolved path.
    #[error("configuration file not found: {path}")]
    #[diagnostic(
        code(auth_forge::config_not_found),
        help("Create auth-forge.toml or pass --config <path>.")
    )]
    ConfigNotFound { path: PathBuf },

    /// IO errors (unreadable file, unwritable output).
    #[error("IO error for {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// TOML that does not parse into the configuration shape.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(ConfigDiagnostic),

    /// Configuration that parses but is semantically invalid.
    #[error("configuration error: {message}")]
    #[diagnostic(code(auth_forge::invalid_config))]
    Config { message: String },

    /// Binder construction rejected a declared list or strategy.
    #[error("invalid declaration: {0}")]
    Auth(#[from] AuthError),

    /// The assembled GraphQL schema could not be built.
    #[error("schema error: {message}")]
    Schema { message: String },

    /// A command argument names something that does not exist.
    #[error("{0}")]
    InvalidArgument(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::ConfigNotFound { .. }
            | Self::Parse(_)
            | Self::Config { .. }
            | Self::Auth(_)
            | Self::Schema { .. } => ExitCode::ConfigError,
            Self::InvalidArgument(_) => ExitCode::InvalidArguments,
            Self::Io { .. } | Self::Other(_) => ExitCode::GeneralError,
        }
    }
}
