use std::collections::HashSet;
use std::path::{Path, PathBuf};

use auth_forge_core::{AuthType, BinderConfig, StrategyArgument};
use serde::{Deserialize, Serialize};

use crate::diagnostic::ConfigDiagnostic;
use crate::error::CliError;

/// Config file used when neither `--config` nor `AUTH_FORGE_CONFIG` is set.
pub const DEFAULT_CONFIG_FILE: &str = "auth-forge.toml";

/// Lists and strategies declared in `auth-forge.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthForgeConfig {
    #[serde(default)]
    pub binder: BinderConfig,
    #[serde(default)]
    pub lists: Vec<ListConfig>,
}

/// One `[[lists]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    pub key: String,
    #[serde(default)]
    pub item_query_name: Option<String>,
    #[serde(default)]
    pub output_type_name: Option<String>,
    /// Item fields exposed on the output type besides `id`.
    #[serde(default)]
    pub fields: Vec<String>,
    #[serde(default)]
    pub strategies: Vec<StrategyConfig>,
}

/// One `[[lists.strategies]]` entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategyConfig {
    pub auth_type: String,
    #[serde(default)]
    pub arguments: Vec<StrategyArgument>,
}

impl AuthForgeConfig {
    /// Reject declarations the binders would silently merge or shadow.
    pub fn validate(&self) -> Result<(), CliError> {
        self.binder.validate()?;

        let mut keys = HashSet::new();
        for list in &self.lists {
            if !keys.insert(list.key.as_str()) {
                return Err(CliError::Config {
                    message: format!("list '{}' is declared more than once", list.key),
                });
            }

            let mut auth_types = HashSet::new();
            for strategy in &list.strategies {
                if !auth_types.insert(AuthType::new(&strategy.auth_type)?) {
                    return Err(CliError::Config {
                        message: format!(
                            "list '{}' declares strategy '{}' more than once",
                            list.key, strategy.auth_type
                        ),
                    });
                }

                let mut arg_names = HashSet::new();
                for arg in &strategy.arguments {
                    if !arg_names.insert(arg.name.as_str()) {
                        return Err(CliError::Config {
                            message: format!(
                                "strategy '{}' on list '{}' declares argument '{}' more than once",
                                strategy.auth_type, list.key, arg.name
                            ),
                        });
                    }
                }
            }

            if list.strategies.is_empty() {
                tracing::warn!(list = %list.key, "list declares no strategies; nothing is generated for it");
            }
        }
        Ok(())
    }
}

/// Resolve the config path: explicit flag or env (both via clap), else the default file.
pub fn config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Load and validate the configuration.
pub fn load_config(explicit: Option<&Path>) -> Result<AuthForgeConfig, CliError> {
    let path = config_path(explicit);
    if !path.exists() {
        return Err(CliError::ConfigNotFound { path });
    }

    let contents = std::fs::read_to_string(&path).map_err(|e| CliError::Io {
        path: path.clone(),
        source: e,
    })?;

    let config = parse_config(&contents, &path.display().to_string())?;
    tracing::debug!(
        path = %path.display(),
        lists = config.lists.len(),
        "configuration loaded"
    );
    Ok(config)
}

/// Parse and validate configuration text; `filename` labels diagnostics.
pub fn parse_config(contents: &str, filename: &str) -> Result<AuthForgeConfig, CliError> {
    let config: AuthForgeConfig = toml::from_str(contents)
        .map_err(|e| CliError::Parse(ConfigDiagnostic::from_toml(&e, contents, filename)))?;
    config.validate()?;
    Ok(config)
}
