//! Output formatting for CLI commands.
//!
//! Supports table (human-readable) and JSON output formats.

use std::io::Write;

use serde::Serialize;

use shake_agent::{Action, CounterAdvice, Decision, EngineConfig, Evaluation, RankedOffer};
use shake_core::CounterOffer;

use crate::cli::Format;
use crate::error::CliError;

/// Output formatter that handles both table and JSON output.
#[derive(Debug, Clone)]
pub struct OutputFormat {
    format: Format,
}

impl OutputFormat {
    /// Create a new output formatter.
    #[must_use]
    pub const fn new(format: Format) -> Self {
        Self { format }
    }

    /// Get the current format.
    #[must_use]
    pub const fn format(&self) -> Format {
        self.format
    }

    /// Check if JSON format is selected.
    #[must_use]
    pub const fn is_json(&self) -> bool {
        matches!(self.format, Format::Json)
    }

    /// Write a serializable value to the output.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write<W, T>(&self, writer: &mut W, value: &T) -> Result<(), CliError>
    where
        W: Write,
        T: Serialize + TableDisplay,
    {
        match self.format {
            Format::Json => {
                serde_json::to_writer_pretty(&mut *writer, value)
                    .map_err(|e| CliError::Format(format!("JSON serialization failed: {e}")))?;
                writeln!(writer)?;
            }
            Format::Table => {
                value.write_table(writer)?;
            }
        }
        Ok(())
    }

    /// Write a serializable value to a string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_string<T>(&self, value: &T) -> Result<String, CliError>
    where
        T: Serialize + TableDisplay,
    {
        let mut buf = Vec::new();
        self.write(&mut buf, value)?;
        String::from_utf8(buf).map_err(|e| CliError::Format(format!("UTF-8 error: {e}")))
    }
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::new(Format::Table)
    }
}

/// Trait for types that can be displayed as a table.
pub trait TableDisplay {
    /// Write the value as a human-readable table.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError>;
}

/// Evaluation of one request/profile pair and the resulting decision.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationReport {
    /// Request evaluated.
    pub request_id: String,
    /// Contractor evaluated.
    pub contractor_id: String,
    /// Matching result.
    pub evaluation: Evaluation,
    /// Chosen action.
    pub decision: Decision,
}

impl TableDisplay for EvaluationReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let eval = &self.evaluation;
        writeln!(writer, "Match: {} / {}", self.request_id, self.contractor_id)?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(
            writer,
            "Matches:          {}",
            if eval.matches { "✓ yes" } else { "✗ no" }
        )?;
        writeln!(writer, "Score:            {}", eval.score)?;
        if let Some(offer) = &eval.suggested_offer {
            writeln!(
                writer,
                "Suggested:        ${}/hr, {} to {}",
                offer.rate, offer.start_date, offer.end_date
            )?;
        }
        writeln!(writer, "Auto-respond:     {}", eval.auto_respond)?;
        writeln!(writer)?;
        writeln!(writer, "Reasons")?;
        for reason in &eval.reasons {
            writeln!(writer, "  - {reason}")?;
        }
        writeln!(writer)?;
        writeln!(writer, "Decision")?;
        writeln!(writer, "  Action:         {}", self.decision.action)?;
        writeln!(writer, "  Confidence:     {}", self.decision.confidence)?;
        if let Action::Decline { reason } = &self.decision.action {
            writeln!(writer, "  Reason:         {reason}")?;
        }
        Ok(())
    }
}

/// Ranked offers for display.
#[derive(Debug, Clone, Serialize)]
pub struct RankingReport {
    /// Offers, best first.
    pub offers: Vec<RankedOffer>,
}

impl TableDisplay for RankingReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        if self.offers.is_empty() {
            writeln!(writer, "No offers to rank")?;
            return Ok(());
        }

        writeln!(
            writer,
            "{:>4}  {:<20}  {:<20}  {:>8}  {:<10}  {:>8}  {:>8}",
            "RANK", "OFFER", "CONTRACTOR", "RATE", "START", "RATING", "SCORE"
        )?;
        writeln!(writer, "{}", "─".repeat(92))?;

        for (i, ranked) in self.offers.iter().enumerate() {
            let rating = ranked.reputation.map_or_else(
                || "-".to_string(),
                |r| format!("{:.1} ({})", r.average_score, r.total_ratings),
            );
            writeln!(
                writer,
                "{:>4}  {:<20}  {:<20}  {:>8.2}  {:<10}  {:>8}  {:>8.1}",
                i + 1,
                truncate(&ranked.offer.id, 20),
                truncate(&ranked.offer.contractor_id, 20),
                ranked.offer.rate,
                ranked.offer.start_date,
                rating,
                ranked.match_score
            )?;
        }

        writeln!(writer)?;
        writeln!(writer, "Total: {} offer(s)", self.offers.len())?;
        Ok(())
    }
}

/// Counter advice and the counter-offer it produced, if any.
#[derive(Debug, Clone, Serialize)]
pub struct CounterReport {
    /// Whether to counter, accept, or decline.
    pub advice: CounterAdvice,
    /// Generated counter-offer.
    pub counter: Option<CounterOffer>,
}

impl TableDisplay for CounterReport {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        let action = match self.advice {
            CounterAdvice::Counter { .. } => "COUNTER",
            CounterAdvice::Accept { .. } => "ACCEPT",
            CounterAdvice::Decline { .. } => "DECLINE",
        };
        writeln!(writer, "Advice:           {action}")?;
        writeln!(writer, "Reason:           {}", self.advice.reason())?;

        match &self.counter {
            Some(counter) => {
                writeln!(writer)?;
                writeln!(writer, "Counter-offer")?;
                writeln!(writer, "  Rate:           ${}/hr", counter.rate)?;
                writeln!(writer, "  Round:          {}", counter.round)?;
                writeln!(writer, "  Strategy:       {}", counter.strategy)?;
                writeln!(writer, "  Dates:          {} to {}", counter.start_date, counter.end_date)?;
                writeln!(writer, "  Message:        {}", counter.message)?;
            }
            None if self.advice.should_counter() => {
                writeln!(writer)?;
                writeln!(writer, "No counter-offer: round limit reached")?;
            }
            None => {}
        }
        Ok(())
    }
}

impl TableDisplay for EngineConfig {
    fn write_table<W: Write>(&self, writer: &mut W) -> Result<(), CliError> {
        writeln!(writer, "Engine Configuration")?;
        writeln!(writer, "══════════════════════════════════")?;
        writeln!(writer, "Max Rounds:       {}", self.max_rounds)?;
        writeln!(writer, "Accept Within:    {}%", self.accept_within_percent)?;
        writeln!(writer)?;
        writeln!(writer, "Decision Thresholds")?;
        writeln!(writer, "  Auto-accept:    >= {}", self.thresholds.auto_accept_score)?;
        writeln!(writer, "  Decline:        <  {}", self.thresholds.decline_below)?;
        writeln!(writer, "  Suggest:        >= {}", self.thresholds.suggest_from)?;
        writeln!(writer, "  Counter:        >= {}", self.thresholds.counter_from)?;
        Ok(())
    }
}

/// Truncate a string to a maximum number of characters.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len > 3 {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{head}...")
    } else {
        s.chars().take(max_len).collect()
    }
}
