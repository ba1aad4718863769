//! Text Tools Pro CLI

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use textpro_cli::{commands, load_config, Cli, Commands};

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "textpro=warn".into()))
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("  {} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Init { path } = &cli.command {
        return commands::init::run(path.as_deref());
    }

    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Init { .. } => Ok(()),
        Commands::Activate { key } => commands::auth::activate(&config, &key),
        Commands::Deactivate => commands::auth::deactivate(&config),
        Commands::Status { format } => commands::auth::status(&config, format),
        Commands::Validate => commands::auth::validate(&config),
        Commands::Run { feature, file } => commands::run::run(&config, &feature, file.as_deref()),
        Commands::Features { format } => commands::features::run(&config, format),
        Commands::Watch { interval } => commands::watch::run(&config, interval),
    }
}
