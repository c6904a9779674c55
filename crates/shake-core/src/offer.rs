//! Offers and counter-offers exchanged against a job request.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{ContractorId, CoreError, CounterStrategy, OfferId, RequestId};

/// Status of an offer. Mutated exactly once, by acceptance or decline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    /// Awaiting a response.
    #[default]
    Pending,
    /// Accepted by the requester; becomes a booking.
    Accepted,
    /// Declined by the requester.
    Declined,
}

impl OfferStatus {
    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Pending, Self::Accepted | Self::Declined))
    }
}

impl std::fmt::Display for OfferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

/// A contractor's proposed rate and dates for a job request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Offer {
    /// Offer identifier.
    pub id: OfferId,
    /// Request the offer answers.
    pub request_id: RequestId,
    /// Contractor making the offer.
    pub contractor_id: ContractorId,
    /// Proposed rate.
    pub rate: f64,
    /// Proposed first day.
    pub start_date: NaiveDate,
    /// Proposed last day.
    pub end_date: NaiveDate,
    /// Free-text message to the requester.
    #[serde(default)]
    pub message: String,
    /// Negotiation round this offer belongs to.
    #[serde(default = "first_round")]
    pub round: u32,
    /// Offer status.
    #[serde(default)]
    pub status: OfferStatus,
}

const fn first_round() -> u32 {
    1
}

impl Offer {
    /// Creates a pending first-round offer.
    #[must_use]
    pub fn new(
        id: impl Into<OfferId>,
        request_id: impl Into<RequestId>,
        contractor_id: impl Into<ContractorId>,
        rate: f64,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: id.into(),
            request_id: request_id.into(),
            contractor_id: contractor_id.into(),
            rate,
            start_date,
            end_date,
            message: String::new(),
            round: 1,
            status: OfferStatus::Pending,
        }
    }

    /// Sets the message.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Sets the round.
    #[must_use]
    pub const fn with_round(mut self, round: u32) -> Self {
        self.round = round;
        self
    }

    fn transition_to(&mut self, target: OfferStatus) -> Result<(), CoreError> {
        if self.status.can_transition_to(&target) {
            self.status = target;
            Ok(())
        } else {
            Err(CoreError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            })
        }
    }

    /// Accepts the offer.
    pub fn accept(&mut self) -> Result<(), CoreError> {
        self.transition_to(OfferStatus::Accepted)
    }

    /// Declines the offer.
    pub fn decline(&mut self) -> Result<(), CoreError> {
        self.transition_to(OfferStatus::Declined)
    }

    /// Returns true if the offer still awaits a response.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self.status, OfferStatus::Pending)
    }
}

/// A counter-offer produced by the negotiation engine.
///
/// Carries no id of its own; the persistence layer assigns one when storing it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterOffer {
    /// Request under negotiation.
    pub request_id: RequestId,
    /// Offer being countered, if known.
    #[serde(default)]
    pub offer_id: Option<OfferId>,
    /// Counter rate.
    pub rate: f64,
    /// Proposed first day.
    pub start_date: NaiveDate,
    /// Proposed last day.
    pub end_date: NaiveDate,
    /// Message to the other party.
    pub message: String,
    /// Round this counter opens.
    pub round: u32,
    /// Strategy that produced the rate.
    pub strategy: CounterStrategy,
}

/// Rate and dates on the table, whether from an offer or a counter-offer.
pub trait Proposal {
    /// Proposed rate.
    fn rate(&self) -> f64;
    /// Proposed first day.
    fn start_date(&self) -> NaiveDate;
    /// Proposed last day.
    fn end_date(&self) -> NaiveDate;
    /// Round the proposal belongs to.
    fn round(&self) -> u32;
    /// Id of the originating offer, if known.
    fn offer_id(&self) -> Option<&str>;
}

impl Proposal for Offer {
    fn rate(&self) -> f64 {
        self.rate
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    fn round(&self) -> u32 {
        self.round
    }

    fn offer_id(&self) -> Option<&str> {
        Some(&self.id)
    }
}

impl Proposal for CounterOffer {
    fn rate(&self) -> f64 {
        self.rate
    }

    fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    fn end_date(&self) -> NaiveDate {
        self.end_date
    }

    fn round(&self) -> u32 {
        self.round
    }

    fn offer_id(&self) -> Option<&str> {
        self.offer_id.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offer() -> Offer {
        let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
        let end = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
        Offer::new("offer-1", "req-1", "sub-1", 95.0, start, end)
    }

    #[test]
    fn offer_defaults() {
        let o = offer();
        assert_eq!(o.round, 1);
        assert_eq!(o.status, OfferStatus::Pending);
        assert!(o.is_pending());
    }

    #[test]
    fn offer_status_transitions() {
        assert!(OfferStatus::Pending.can_transition_to(&OfferStatus::Accepted));
        assert!(OfferStatus::Pending.can_transition_to(&OfferStatus::Declined));
        assert!(!OfferStatus::Accepted.can_transition_to(&OfferStatus::Declined));
        assert!(!OfferStatus::Declined.can_transition_to(&OfferStatus::Accepted));
        assert!(!OfferStatus::Pending.can_transition_to(&OfferStatus::Pending));
    }

    #[test]
    fn offer_status_mutates_once() {
        let mut o = offer();
        o.accept().unwrap();
        assert_eq!(o.status, OfferStatus::Accepted);

        let err = o.decline().unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidStateTransition {
                from: "accepted".into(),
                to: "declined".into(),
            }
        );
        assert!(o.accept().is_err());
    }

    #[test]
    fn counter_keeps_originating_offer_id() {
        let o = offer();
        let counter = CounterOffer {
            request_id: o.request_id.clone(),
            offer_id: Proposal::offer_id(&o).map(str::to_string),
            rate: 90.0,
            start_date: o.start_date,
            end_date: o.end_date,
            message: String::new(),
            round: 2,
            strategy: CounterStrategy::Split,
        };
        assert_eq!(Proposal::offer_id(&counter), Some("offer-1"));
        assert_eq!(Proposal::round(&counter), 2);
        assert!((Proposal::rate(&counter) - 90.0).abs() < f64::EPSILON);
    }

    #[test]
    fn offer_deserializes_with_default_round() {
        let json = r#"{
            "id": "o-2", "request_id": "r-2", "contractor_id": "c-2",
            "rate": 70.0, "start_date": "2026-03-02", "end_date": "2026-03-03"
        }"#;
        let o: Offer = serde_json::from_str(json).unwrap();
        assert_eq!(o.round, 1);
        assert!(o.message.is_empty());
        assert!(o.is_pending());
    }
}
