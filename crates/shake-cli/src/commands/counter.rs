//! Counter command implementation.
//!
//! Advises whether to keep negotiating at a rate and, when a counter is
//! advised, generates it from a session replayed at the given round.

use std::io::Write;

use chrono::Utc;

use shake_agent::{
    EngineConfig, HistoryEntry, InMemorySessionStore, NegotiationRegistry, NegotiationSession,
    SessionStore,
};
use shake_core::{CounterOffer, CounterStrategy};

use crate::cli::CounterArgs;
use crate::error::CliError;
use crate::output::{CounterReport, OutputFormat};

/// Counter command executor.
pub struct CounterCommand<'a> {
    config: &'a EngineConfig,
}

impl<'a> CounterCommand<'a> {
    /// Create a new counter command.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if the arguments are invalid.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &CounterArgs,
    ) -> Result<(), CliError> {
        let report = self.report(args)?;
        format.write(writer, &report)
    }

    /// Builds the advice and counter-offer for the arguments.
    ///
    /// # Errors
    ///
    /// Returns an error if the rates, round, or dates are invalid.
    pub fn report(&self, args: &CounterArgs) -> Result<CounterReport, CliError> {
        if !args.rate.is_finite() || args.rate < 0.0 {
            return Err(CliError::InvalidArgument(format!(
                "rate must be a non-negative number, got {}",
                args.rate
            )));
        }
        if args.round == 0 {
            return Err(CliError::InvalidArgument("round starts at 1".into()));
        }
        let start_date = args.start_date.unwrap_or_else(|| Utc::now().date_naive());
        let end_date = args.end_date.unwrap_or(start_date);
        if start_date > end_date {
            return Err(CliError::InvalidArgument(format!(
                "start date {start_date} is after end date {end_date}"
            )));
        }

        let strategy = CounterStrategy::from(args.strategy);
        let current = CounterOffer {
            request_id: args.request_id.clone(),
            offer_id: None,
            rate: args.rate,
            start_date,
            end_date,
            message: String::new(),
            round: args.round,
            strategy,
        };

        let store = InMemorySessionStore::new();
        let mut session = NegotiationSession::new(
            args.request_id.clone(),
            HistoryEntry::Counter(current.clone()),
            self.config.max_rounds,
            Utc::now(),
        );
        session.round = args.round;
        store.put(session);
        let registry = NegotiationRegistry::with_store(store, self.config.clone());

        let advice = registry.should_counter(args.rate, args.target, args.round)?;
        let counter = if advice.should_counter() {
            registry.generate_counter(&args.request_id, &current, args.target, strategy)?
        } else {
            None
        };

        Ok(CounterReport { advice, counter })
    }
}
