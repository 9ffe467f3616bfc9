mod cli;
mod commands;
mod config;
mod declared;
#[allow(unused_assignments)]
mod diagnostic;
mod error;

use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();
    init_logging(cli.global.verbose);

    let result = match cli.command {
        cli::Commands::Names(args) => commands::names::run(args, &cli.global).await,
        cli::Commands::Sdl(args) => commands::sdl::run(args, &cli.global).await,
        cli::Commands::Check => commands::check::run(&cli.global).await,
    };

    match result {
        Ok(()) => std::process::exit(error::ExitCode::Success as i32),
        Err(e) => {
            let code = e.exit_code();
            eprintln!("{:?}", miette::Report::new(e));
            std::process::exit(code as i32);
        }
    }
}
