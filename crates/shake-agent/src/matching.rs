//! Matching evaluator.
//!
//! Scores a contractor profile against a job request across five dimensions:
//!
//! | Dimension    | Points | Hard failure |
//! |--------------|--------|--------------|
//! | Trade        | 30     | yes |
//! | Location     | 20     | yes, when the request is geocoded and areas are listed |
//! | Availability | 25     | yes |
//! | Rate         | 25/15  | when the request tops out below the contractor's minimum |
//! | Requirements | 5      | yes, when the request lists any |
//!
//! Evaluation stops at the first hard failure. The partial score accumulated
//! up to that point is kept so callers can log it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use shake_core::{
    ContractorProfile, JobRequest, RatePreference, Requirement, find_rate_preference,
};

use crate::EngineError;

/// Points for a matching trade.
pub const TRADE_POINTS: u32 = 30;
/// Points for a request inside a service area.
pub const LOCATION_POINTS: u32 = 20;
/// Points for availability over the requested dates.
pub const AVAILABILITY_POINTS: u32 = 25;
/// Points when the request pays at least the preferred rate.
pub const PREFERRED_RATE_POINTS: u32 = 25;
/// Points when the request pays at least the minimum rate, or no preference exists.
pub const ACCEPTABLE_RATE_POINTS: u32 = 15;
/// Points for meeting every listed requirement.
pub const REQUIREMENTS_POINTS: u32 = 5;

/// Rate-tier score at or above which the profile's auto-negotiate flag applies.
pub const AUTO_RESPOND_RATE_SCORE: u32 = 20;

/// Rate and dates the contractor should propose.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SuggestedOffer {
    /// Proposed rate.
    pub rate: f64,
    /// Proposed first day.
    pub start_date: NaiveDate,
    /// Proposed last day.
    pub end_date: NaiveDate,
}

/// Outcome of evaluating one request against one profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// True if every hard check passed.
    pub matches: bool,
    /// Additive score. May exceed 100.
    pub score: u32,
    /// Human-readable reasons, in check order.
    pub reasons: Vec<String>,
    /// Offer to propose, set once the rate check passes.
    pub suggested_offer: Option<SuggestedOffer>,
    /// True if the engine may respond without asking the contractor.
    pub auto_respond: bool,
}

impl Evaluation {
    fn new() -> Self {
        Self {
            matches: true,
            score: 0,
            reasons: Vec::new(),
            suggested_offer: None,
            auto_respond: false,
        }
    }

    fn reject(mut self, reason: impl Into<String>) -> Self {
        self.matches = false;
        self.reasons.push(reason.into());
        self
    }
}

/// Result of comparing a request's rate band with a contractor's preferences.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateAssessment {
    /// False if the request pays less than the contractor's minimum.
    pub acceptable: bool,
    /// Rate-tier points.
    pub score: u32,
    /// Rate to propose when acceptable.
    pub suggested_rate: Option<f64>,
    /// Contractor's minimum, when a preference exists.
    pub min_acceptable: Option<f64>,
}

/// Evaluates a contractor profile against a job request.
///
/// # Errors
///
/// Returns `EngineError::Core` if either record fails validation. Invalid
/// records are never scored.
pub fn evaluate(
    request: &JobRequest,
    profile: &ContractorProfile,
) -> Result<Evaluation, EngineError> {
    request.validate()?;
    profile.validate()?;

    let evaluation = score(request, profile);
    debug!(
        request_id = %request.id,
        contractor_id = %profile.contractor_id,
        matches = evaluation.matches,
        score = evaluation.score,
        "evaluated match"
    );
    Ok(evaluation)
}

fn score(request: &JobRequest, profile: &ContractorProfile) -> Evaluation {
    let mut evaluation = Evaluation::new();

    if !profile.has_trade(&request.trade) {
        return evaluation.reject("Trade does not match");
    }
    evaluation.score += TRADE_POINTS;

    match check_location(request, profile) {
        Some(false) => return evaluation.reject("Location outside service area"),
        Some(true) => evaluation.score += LOCATION_POINTS,
        None => {}
    }

    if !check_availability(request, profile) {
        return evaluation.reject("Not available during requested dates");
    }
    evaluation.score += AVAILABILITY_POINTS;

    let rate = evaluate_rate(request, &profile.rate_preferences);
    match (rate.acceptable, rate.suggested_rate) {
        (true, Some(suggested)) => {
            evaluation.score += rate.score;
            evaluation.suggested_offer = Some(SuggestedOffer {
                rate: suggested,
                start_date: request.start_date,
                end_date: request.end_date,
            });
            if rate.score >= AUTO_RESPOND_RATE_SCORE {
                evaluation.auto_respond = profile.negotiation.auto_negotiate;
            }
        }
        _ => {
            let minimum = rate.min_acceptable.unwrap_or_default();
            return evaluation.reject(format!(
                "Rate {} below minimum {minimum}",
                request.max_rate
            ));
        }
    }

    if let Some(requirements) = request.parsed_requirements() {
        let failures = check_requirements(&requirements, profile);
        if !failures.is_empty() {
            evaluation.matches = false;
            evaluation.reasons = failures;
            return evaluation;
        }
        evaluation.score += REQUIREMENTS_POINTS;
    }

    let summary = format!("Strong match (score: {}/100)", evaluation.score);
    evaluation.reasons.push(summary);
    evaluation
}

/// Compares the request's rate band with the preference for its trade.
///
/// Without a preference for the trade the request is acceptable at its
/// maximum rate.
#[must_use]
pub fn evaluate_rate(request: &JobRequest, preferences: &[RatePreference]) -> RateAssessment {
    let Some(preference) = find_rate_preference(preferences, &request.trade) else {
        return RateAssessment {
            acceptable: true,
            score: ACCEPTABLE_RATE_POINTS,
            suggested_rate: Some(request.max_rate),
            min_acceptable: None,
        };
    };

    let max_rate = request.max_rate;
    if max_rate < preference.min_rate {
        return RateAssessment {
            acceptable: false,
            score: 0,
            suggested_rate: None,
            min_acceptable: Some(preference.min_rate),
        };
    }

    let (score, suggested) = if max_rate >= preference.preferred_rate {
        (PREFERRED_RATE_POINTS, preference.preferred_rate.min(max_rate))
    } else {
        (ACCEPTABLE_RATE_POINTS, max_rate)
    };

    RateAssessment {
        acceptable: true,
        score,
        suggested_rate: Some(suggested),
        min_acceptable: Some(preference.min_rate),
    }
}

/// Returns true if the contractor is free for the whole requested range.
///
/// A profile with no availability windows is unrestricted.
#[must_use]
pub fn check_availability(request: &JobRequest, profile: &ContractorProfile) -> bool {
    profile.availability.is_empty()
        || profile
            .availability
            .iter()
            .any(|w| w.covers(request.start_date, request.end_date))
}

/// Returns whether the request lies in a service area, or `None` when the
/// check does not apply.
///
/// The check applies when the request has coordinates and the profile lists
/// any service area. Areas without coordinates never contain the request.
#[must_use]
pub fn check_location(request: &JobRequest, profile: &ContractorProfile) -> Option<bool> {
    let point = request.coordinates()?;
    if profile.service_areas.is_empty() {
        return None;
    }
    Some(profile.service_areas.iter().any(|area| area.contains(&point)))
}

/// Returns the failure reason for every unmet requirement.
#[must_use]
pub fn check_requirements(requirements: &[Requirement], profile: &ContractorProfile) -> Vec<String> {
    let mut failures = Vec::new();
    if requirements.contains(&Requirement::Licensed) && !profile.has_license() {
        failures.push("License required but not verified".to_string());
    }
    if requirements.contains(&Requirement::Insured) && !profile.has_insurance() {
        failures.push("Insurance required but not verified".to_string());
    }
    failures
}
