//! Command-line interface definitions.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;

/// Sell-order repricing advisor
#[derive(Parser, Debug)]
#[command(name = "relister")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "relister.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Produce a repricing report
    Run(Box<RunArgs>),

    /// Manage configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Show the price grid around a price
    Tick(TickArgs),
}

/// Subcommands for `relister config`.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration with defaults applied.
    Show,
    /// Validate the configuration file.
    Validate,
}

/// Arguments for `relister run`.
#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// JSON fixture with orders, market books, sales history and costs
    #[arg(long)]
    pub fixture: PathBuf,

    /// Fetch station regions and competitor books from ESI instead of the fixture
    #[arg(long)]
    pub live_market: bool,

    /// Grouping mode: perOrder, perCharacter or global
    #[arg(long)]
    pub mode: Option<String>,

    /// Character ids to cover (defaults to the roster)
    #[arg(long = "character", value_delimiter = ',')]
    pub characters: Vec<i64>,

    /// Station ids to cover (defaults to the roster)
    #[arg(long = "station", value_delimiter = ',')]
    pub stations: Vec<i64>,

    /// Only reprice items committed to this trading cycle
    #[arg(long)]
    pub cycle: Option<String>,

    /// Competitor volume needed, as a fraction of the order's volume
    #[arg(long)]
    pub ratio: Option<Decimal>,

    /// Absolute competitor volume floor
    #[arg(long)]
    pub min_units: Option<u64>,

    /// Refresh orders expiring within this many days
    #[arg(long)]
    pub expiry_days: Option<u32>,

    /// Evaluate as of this instant (RFC 3339) instead of now
    #[arg(long)]
    pub now: Option<DateTime<Utc>>,
}

/// Arguments for `relister tick`.
#[derive(Args, Debug)]
pub struct TickArgs {
    /// Reference price
    pub price: Decimal,

    /// Number of ticks to step in each direction
    #[arg(long, default_value_t = 1)]
    pub steps: u32,
}
