//! Command-line argument parsing with clap.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};

use shake_core::CounterStrategy;

/// Clawshake - contractor matching and negotiation.
#[derive(Parser, Debug, Clone)]
#[command(name = "clawshake")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format.
    #[arg(short, long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Engine configuration file (JSON).
    #[arg(short, long, env = "CLAWSHAKE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Override the negotiation round limit.
    #[arg(long, env = "CLAWSHAKE_MAX_ROUNDS")]
    pub max_rounds: Option<u32>,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum Format {
    /// Human-readable table format.
    #[default]
    Table,
    /// JSON output for scripting.
    Json,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Evaluate a contractor profile against a job request.
    Evaluate(EvaluateArgs),

    /// Rank competing offers for a request.
    Rank(RankArgs),

    /// Advise on a rate and generate the next counter-offer.
    Counter(CounterArgs),

    /// Show the effective engine configuration.
    Config,
}

/// Arguments for the evaluate command.
#[derive(Parser, Debug, Clone)]
pub struct EvaluateArgs {
    /// Job request JSON file (`-` for stdin).
    #[arg(short, long)]
    pub request: PathBuf,

    /// Contractor profile JSON file (`-` for stdin).
    #[arg(short, long)]
    pub profile: PathBuf,
}

/// Arguments for the rank command.
#[derive(Parser, Debug, Clone)]
pub struct RankArgs {
    /// JSON array of offers, each with an optional `reputation`.
    #[arg(short, long)]
    pub offers: PathBuf,

    /// Highest rate the requester will pay.
    #[arg(long)]
    pub max_rate: f64,

    /// Preferred start date (YYYY-MM-DD).
    #[arg(long)]
    pub start_date: NaiveDate,
}

/// Arguments for the counter command.
#[derive(Parser, Debug, Clone)]
pub struct CounterArgs {
    /// Rate currently on the table.
    #[arg(long)]
    pub rate: f64,

    /// Rate being negotiated toward.
    #[arg(long)]
    pub target: f64,

    /// Current negotiation round.
    #[arg(long, default_value_t = 1)]
    pub round: u32,

    /// How far the counter moves toward the target.
    #[arg(long, value_enum, default_value_t = StrategyArg::Split)]
    pub strategy: StrategyArg,

    /// Request the negotiation belongs to.
    #[arg(long, default_value = "cli")]
    pub request_id: String,

    /// First day of the work (defaults to today).
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Last day of the work (defaults to the start date).
    #[arg(long)]
    pub end_date: Option<NaiveDate>,
}

/// Counter strategy argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    /// Meet in the middle.
    Split,
    /// Move 75% toward the target.
    Aggressive,
    /// Move 25% toward the target.
    Conservative,
}

impl From<StrategyArg> for CounterStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Split => Self::Split,
            StrategyArg::Aggressive => Self::Aggressive,
            StrategyArg::Conservative => Self::Conservative,
        }
    }
}
