pub mod check;
pub mod names;
pub mod sdl;

use crate::cli::GlobalOpts;
use crate::config::{load_config, AuthForgeConfig};
use crate::declared::{bind_all, DeclaredBinding};
use crate::error::CliError;

/// Load the configuration and build binders for it.
pub(crate) fn load_bindings(
    global: &GlobalOpts,
) -> Result<(AuthForgeConfig, Vec<DeclaredBinding>), CliError> {
    let config = load_config(global.config.as_deref())?;
    let bindings = bind_all(&config)?;
    Ok((config, bindings))
}
