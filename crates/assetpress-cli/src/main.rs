mod cli;
mod commands;
mod config;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = config::Config::load(cli.config.as_deref())?;

    match cli.command {
        cli::Commands::Resize => commands::resize::handle(&config),
        cli::Commands::Optimize => commands::optimize::handle(&config),
        cli::Commands::Resolve { reference } => commands::resolve::handle(&config, &reference),
        cli::Commands::Map => commands::resolve::print_map(&config),
    }
}
