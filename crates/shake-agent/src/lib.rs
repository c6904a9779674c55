//! # shake-agent
//!
//! Matching and negotiation engine for the Clawshake contractor marketplace.
//!
//! This crate provides:
//!
//! - **Matching** - [`evaluate`] scores a contractor profile against a job request
//! - **Decisions** - [`decide`] turns an evaluation into ACCEPT, DECLINE, SUGGEST, COUNTER, or NOTIFY
//! - **Ranking** - [`rank_offers`] orders competing offers for a requester
//! - **Negotiation** - [`NegotiationRegistry`] runs bounded multi-round counter-offers
//! - **Configuration** - [`EngineConfig`] with thresholds and round limits
//!
//! The engine performs no I/O. Records come in as plain data and decisions go
//! back out; persistence and delivery belong to the caller.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use shake_agent::{decide, evaluate, Action, DecisionThresholds};
//! use shake_core::{ContractorProfile, JobRequest, RatePreference, Trade};
//!
//! let start = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
//! let end = NaiveDate::from_ymd_opt(2026, 3, 6).unwrap();
//! let request = JobRequest::new("req-1", "plumber", start, end, 50.0, 100.0);
//! let profile = ContractorProfile::new("sub-1")
//!     .with_trade(Trade::new("plumber"))
//!     .with_rate_preference(RatePreference::new("plumber", 75.0, 90.0, 120.0));
//!
//! let evaluation = evaluate(&request, &profile).unwrap();
//! assert!(evaluation.matches);
//! assert_eq!(evaluation.score, 80);
//!
//! let decision = decide(&evaluation, &profile.negotiation, &DecisionThresholds::default());
//! assert!(matches!(decision.action, Action::Suggest { .. }));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod decision;
pub mod error;
pub mod matching;
pub mod message;
pub mod negotiation;
pub mod ranking;
pub mod store;

pub use error::EngineError;

// Re-exports for convenience
pub use config::{DecisionThresholds, EngineConfig, EngineConfigBuilder};
pub use decision::{Action, Decision, decide, decide_for};
pub use matching::{Evaluation, RateAssessment, SuggestedOffer, evaluate, evaluate_rate};
pub use message::CounterTone;
pub use negotiation::{
    CounterAdvice, CounterTerms, HistoryEntry, NegotiationRegistry, NegotiationSession,
    NegotiationStats, Outcome, SessionStatus, propose_counter, should_counter,
};
pub use ranking::{
    RankableOffer, RankedOffer, RankingPreferences, best_offer, rank_offers, score_offer,
};
pub use store::{InMemorySessionStore, SessionStore};
