//! # shake-core
//!
//! Record types and primitives for the Clawshake contractor marketplace.
//!
//! This crate provides:
//!
//! - [`JobRequest`] - A general contractor's broadcast need for a trade
//! - [`ContractorProfile`] - A subcontractor's trades, areas, rates, and calendar
//! - [`Offer`] / [`CounterOffer`] - Proposed rates exchanged during negotiation
//! - [`CounterStrategy`] - How far a counter-offer moves toward the target rate
//! - [`RatingSummary`] - Aggregated ratings used when ranking offers
//! - [`geo`] - Great-circle distance for service-area checks
//!
//! Records are plain data handed in by the persistence layer. They carry a
//! `validate()` method so callers can reject malformed input at the boundary.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod geo;
pub mod offer;
pub mod profile;
pub mod reputation;
pub mod request;
pub mod strategy;

pub use error::CoreError;
pub use geo::{Coordinates, distance_miles};
pub use offer::{CounterOffer, Offer, OfferStatus, Proposal};
pub use profile::{
    AvailabilityStatus, AvailabilityWindow, ContractorProfile, NegotiationPreferences,
    RatePreference, ServiceArea, Trade, find_rate_preference, same_trade,
};
pub use reputation::RatingSummary;
pub use request::{JobRequest, JobRequestStatus, Requirement};
pub use strategy::CounterStrategy;

/// Identifier of a job request, assigned by the persistence layer.
pub type RequestId = String;

/// Identifier of a contractor, assigned by the persistence layer.
pub type ContractorId = String;

/// Identifier of an offer, assigned by the persistence layer.
pub type OfferId = String;
