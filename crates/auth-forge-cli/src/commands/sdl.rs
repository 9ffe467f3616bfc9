use crate::cli::{GlobalOpts, SdlArgs};
use crate::declared::assemble_schema;
use crate::error::CliError;

/// Run the `sdl` command: print or write the assembled schema.
pub async fn run(args: SdlArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let (_, bindings) = super::load_bindings(global)?;
    let sdl = assemble_schema(&bindings)?.sdl();

    match args.output {
        Some(path) => {
            std::fs::write(&path, &sdl).map_err(|e| CliError::Io {
                path: path.clone(),
                source: e,
            })?;
            tracing::info!(path = %path.display(), "schema written");
        }
        None => print!("{sdl}"),
    }
    Ok(())
}
