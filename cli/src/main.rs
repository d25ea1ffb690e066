mod cli;
mod commands;
mod error;
mod project;
mod ui;

use clap::Parser;
use cli::{Cli, Commands};
use error::Result;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(err) = run(cli) {
        ui::error(err.to_string());
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init(args) => commands::init::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Plan(args) => commands::plan::run(args),
        Commands::Exec(args) => commands::exec::run(args),
        Commands::Events(args) => commands::events::run(args),
        Commands::Fund(args) => commands::fund::run(args),
        Commands::Completions(args) => commands::completions::run(args),
    }
}
