use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

/// Inspect the GraphQL surface generated by auth binders.
///
/// Reads list and strategy declarations from a TOML file and prints the
/// generated names and schema, or checks them for conflicts.
#[derive(Parser)]
#[command(
    name = "auth-forge",
    version,
    about = "Inspect the GraphQL surface generated by auth binders",
    after_help = "Use 'auth-forge <command> --help' for more information about a command.",
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Global options available to all subcommands.
#[derive(Args, Debug)]
pub struct GlobalOpts {
    /// Configuration file path [env: AUTH_FORGE_CONFIG]
    #[arg(
        short = 'c',
        long = "config",
        global = true,
        env = "AUTH_FORGE_CONFIG"
    )]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Print the GraphQL names generated for each list and strategy
    Names(NamesArgs),

    /// Print the SDL of the assembled schema
    Sdl(SdlArgs),

    /// Validate the configuration and report name collisions
    Check,
}

/// Arguments for `auth-forge names`.
#[derive(Args)]
pub struct NamesArgs {
    /// Only show names for this list key
    #[arg(long)]
    pub list: Option<String>,

    /// Print as JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `auth-forge sdl`.
#[derive(Args)]
pub struct SdlArgs {
    /// Write the SDL to a file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_names_json() {
        let cli = Cli::try_parse_from(["auth-forge", "names", "--json", "--list", "User"]).unwrap();
        match cli.command {
            Commands::Names(args) => {
                assert!(args.json);
                assert_eq!(args.list.as_deref(), Some("User"));
            }
            _ => panic!("expected names"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["auth-forge", "check", "-vv", "-c", "x.toml"]).unwrap();
        assert_eq!(cli.global.verbose, 2);
        assert_eq!(cli.global.config, Some(PathBuf::from("x.toml")));
    }
}
