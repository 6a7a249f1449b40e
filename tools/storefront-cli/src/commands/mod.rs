//! CLI command implementations.

pub mod config;
pub mod render;
pub mod simulate;

use clap::{Args, Subcommand};
use shop_core::ErrorMode;

/// Arguments for the render command.
#[derive(Args)]
pub struct RenderArgs {
    /// Write the HTML to a file instead of stdout.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Read products from a local JSON file instead of the network.
    #[arg(short, long)]
    pub products: Option<String>,

    /// Product endpoint (overrides `catalog.endpoint`).
    #[arg(long)]
    pub endpoint: Option<String>,

    /// How failed sections appear on the page: silent or visible.
    #[arg(long)]
    pub errors: Option<ErrorMode>,
}

/// Arguments for the simulate command.
#[derive(Args)]
pub struct SimulateArgs {
    /// Total units (overrides `workload.total_units`).
    #[arg(long)]
    pub total: Option<u64>,

    /// Units per chunk (overrides `workload.chunk_size`).
    #[arg(long)]
    pub chunk: Option<u64>,

    /// Step the workload in a plain loop without yielding to the runtime.
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration.
    Show,
    /// Set a config value in the config file.
    Set {
        /// Config key (dot-separated, e.g. `banner.country`).
        key: String,
        /// Value to set.
        value: String,
    },
    /// Initialize a new config file.
    Init {
        /// Force overwrite existing config.
        #[arg(short, long)]
        force: bool,
    },
    /// Validate the config file.
    Validate,
}
