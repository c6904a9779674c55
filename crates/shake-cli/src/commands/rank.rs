//! Rank command implementation.

use std::io::Write;

use shake_agent::{RankableOffer, RankingPreferences, rank_offers};

use crate::cli::RankArgs;
use crate::commands::read_json;
use crate::error::CliError;
use crate::output::{OutputFormat, RankingReport};

/// Rank command executor.
#[derive(Debug, Default)]
pub struct RankCommand;

impl RankCommand {
    /// Create a new rank command.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the offers cannot be read or the maximum rate is
    /// not a finite number.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &RankArgs,
    ) -> Result<(), CliError> {
        if !args.max_rate.is_finite() {
            return Err(CliError::InvalidArgument(format!(
                "max rate must be finite, got {}",
                args.max_rate
            )));
        }
        let offers: Vec<RankableOffer> = read_json(&args.offers)?;
        let prefs = RankingPreferences {
            max_rate: args.max_rate,
            start_date: args.start_date,
        };
        let report = RankingReport {
            offers: rank_offers(offers, &prefs),
        };
        format.write(writer, &report)
    }
}
