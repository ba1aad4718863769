//! Text Tools Pro CLI library — exposed for integration tests

pub mod buffer;
pub mod commands;
pub mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use textpro_core::TextProConfig;

pub use buffer::DocumentBuffer;

#[derive(Parser)]
#[command(name = "textpro")]
#[command(about = "Text tools with a licensed premium tier", long_about = None)]
#[command(version = textpro_core::VERSION)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to a .textpro.toml (default: search from the current directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize .textpro.toml configuration
    Init {
        /// Path to initialize (default: current directory)
        path: Option<PathBuf>,
    },

    /// Activate a license key on this machine
    Activate {
        /// License key (XXXXXXXX-XXXX-XXXX-XXXX-XXXXXXXXXXXX)
        key: String,
    },

    /// Deactivate the current license and forget it locally
    Deactivate,

    /// Show connectivity and license status
    Status {
        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Revalidate the current license now
    Validate,

    /// Run a text feature
    Run {
        /// Feature id (see `textpro features`)
        feature: String,

        /// File to operate on in place (default: stdin to stdout)
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// List features and whether they are available
    Features {
        /// Output format
        #[arg(long, value_enum, default_value = "terminal")]
        format: OutputFormat,
    },

    /// Keep the license service running and report status changes
    Watch {
        /// Tick interval in milliseconds (default: from config)
        #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
        interval: Option<u64>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Terminal,
    Json,
}

/// Loads the explicit `--config` file, or searches upward from the current
/// directory.
pub fn load_config(explicit: Option<&std::path::Path>) -> Result<TextProConfig> {
    match explicit {
        Some(path) => TextProConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            TextProConfig::find_and_load(&cwd).context("Failed to load .textpro.toml")
        }
    }
}
