//! Evaluate command implementation.
//!
//! Runs a job request and a contractor profile through the matching
//! evaluator, then applies the decision policy with the contractor's
//! negotiation preferences.

use std::io::Write;

use shake_agent::{EngineConfig, decide_for, evaluate};
use shake_core::{ContractorProfile, JobRequest};

use crate::cli::EvaluateArgs;
use crate::commands::read_json;
use crate::error::CliError;
use crate::output::{EvaluationReport, OutputFormat};

/// Evaluate command executor.
pub struct EvaluateCommand<'a> {
    config: &'a EngineConfig,
}

impl<'a> EvaluateCommand<'a> {
    /// Create a new evaluate command.
    #[must_use]
    pub const fn new(config: &'a EngineConfig) -> Self {
        Self { config }
    }

    /// Execute the command.
    ///
    /// # Errors
    ///
    /// Returns an error if an input cannot be read or fails validation.
    pub fn execute<W: Write>(
        &self,
        writer: &mut W,
        format: &OutputFormat,
        args: &EvaluateArgs,
    ) -> Result<(), CliError> {
        let request: JobRequest = read_json(&args.request)?;
        let profile: ContractorProfile = read_json(&args.profile)?;
        let report = self.report(&request, &profile)?;
        format.write(writer, &report)
    }

    /// Evaluates and decides for one pair.
    ///
    /// # Errors
    ///
    /// Returns an error if either record fails validation.
    pub fn report(
        &self,
        request: &JobRequest,
        profile: &ContractorProfile,
    ) -> Result<EvaluationReport, CliError> {
        let evaluation = evaluate(request, profile)?;
        let decision = decide_for(
            request,
            &evaluation,
            &profile.negotiation,
            &self.config.thresholds,
        );
        Ok(EvaluationReport {
            request_id: request.id.clone(),
            contractor_id: profile.contractor_id.clone(),
            evaluation,
            decision,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shake_agent::Action;
    use shake_core::{NegotiationPreferences, RatePreference, Trade};

    fn request(max_rate: f64) -> JobRequest {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        JobRequest::new("req-1", "plumber", start, end, 50.0, max_rate)
    }

    fn profile() -> ContractorProfile {
        ContractorProfile::new("sub-1")
            .with_trade(Trade::new("plumber"))
            .with_rate_preference(RatePreference::new("plumber", 75.0, 90.0, 120.0))
    }

    #[test]
    fn report_suggests_strong_match() {
        let config = EngineConfig::default();
        let report = EvaluateCommand::new(&config).report(&request(100.0), &profile()).unwrap();
        assert_eq!(report.evaluation.score, 80);
        assert!(matches!(report.decision.action, Action::Suggest { offer: Some(_) }));
    }

    #[test]
    fn report_uses_configured_thresholds() {
        let mut config = EngineConfig::default();
        config.thresholds.auto_accept_score = 80;
        let profile = profile().with_negotiation(NegotiationPreferences {
            auto_accept: true,
            ..NegotiationPreferences::default()
        });
        let report = EvaluateCommand::new(&config).report(&request(100.0), &profile).unwrap();
        assert_eq!(report.decision.action, Action::Accept);
    }

    #[test]
    fn report_rejects_invalid_request() {
        let config = EngineConfig::default();
        let mut bad = request(100.0);
        bad.trade = String::new();
        assert!(matches!(
            EvaluateCommand::new(&config).report(&bad, &profile()),
            Err(CliError::Engine(_))
        ));
    }
}
