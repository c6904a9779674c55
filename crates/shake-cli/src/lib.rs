//! # shake-cli
//!
//! Clawshake command-line interface.
//!
//! Feeds JSON records through the matching and negotiation engine:
//! - `evaluate` - score a contractor profile against a job request and decide
//! - `rank` - order competing offers for a requester
//! - `counter` - advise on a rate and generate the next counter-offer
//! - `config` - show the effective engine configuration
//!
//! Records use the same snake_case field names as the marketplace database.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod commands;
pub mod error;
pub mod output;

pub use cli::{Cli, Commands, CounterArgs, EvaluateArgs, Format, RankArgs, StrategyArg};
pub use error::CliError;
pub use output::OutputFormat;
