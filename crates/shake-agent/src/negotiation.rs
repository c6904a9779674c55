//! Multi-round negotiation.
//!
//! A negotiation session tracks the offers and counter-offers exchanged for
//! one job request:
//!
//! ```text
//! Active ──counter──► Active ──counter──► MaxRoundsReached
//!   │                                        │
//!   └──────────► Accepted | Declined ◄───────┘
//! ```
//!
//! The round starts at 1 and increases with every counter. Once it passes
//! `max_rounds` the session stops accepting counters and can only be completed.
//!
//! [`NegotiationRegistry`] owns the sessions through a [`SessionStore`] and
//! applies the engine's counter policy on top of them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use shake_core::{CoreError, CounterOffer, CounterStrategy, Offer, Proposal, RequestId};

use crate::config::EngineConfig;
use crate::message;
use crate::EngineError;
use crate::store::{InMemorySessionStore, SessionStore};

// ==================== Session State ====================

/// Status of a negotiation session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Counters are still being exchanged.
    #[default]
    Active,
    /// The round limit was passed; only completion remains.
    MaxRoundsReached,
    /// Terms were agreed.
    Accepted,
    /// The negotiation ended without agreement.
    Declined,
}

impl SessionStatus {
    /// Returns true if the session has been completed.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Accepted | Self::Declined)
    }

    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, _) | (Self::MaxRoundsReached, Self::Accepted | Self::Declined)
        )
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::MaxRoundsReached => write!(f, "max_rounds_reached"),
            Self::Accepted => write!(f, "accepted"),
            Self::Declined => write!(f, "declined"),
        }
    }
}

/// How a negotiation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Terms were agreed.
    Accepted,
    /// No agreement.
    Declined,
}

impl From<Outcome> for SessionStatus {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Accepted => Self::Accepted,
            Outcome::Declined => Self::Declined,
        }
    }
}

/// One proposal in a session's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HistoryEntry {
    /// An offer from a contractor.
    Offer(Offer),
    /// A counter-offer produced by the engine.
    Counter(CounterOffer),
}

impl From<Offer> for HistoryEntry {
    fn from(offer: Offer) -> Self {
        Self::Offer(offer)
    }
}

impl From<CounterOffer> for HistoryEntry {
    fn from(counter: CounterOffer) -> Self {
        Self::Counter(counter)
    }
}

impl Proposal for HistoryEntry {
    fn rate(&self) -> f64 {
        match self {
            Self::Offer(o) => o.rate(),
            Self::Counter(c) => c.rate(),
        }
    }

    fn start_date(&self) -> NaiveDate {
        match self {
            Self::Offer(o) => o.start_date(),
            Self::Counter(c) => c.start_date(),
        }
    }

    fn end_date(&self) -> NaiveDate {
        match self {
            Self::Offer(o) => o.end_date(),
            Self::Counter(c) => c.end_date(),
        }
    }

    fn round(&self) -> u32 {
        match self {
            Self::Offer(o) => Proposal::round(o),
            Self::Counter(c) => Proposal::round(c),
        }
    }

    fn offer_id(&self) -> Option<&str> {
        match self {
            Self::Offer(o) => Proposal::offer_id(o),
            Self::Counter(c) => Proposal::offer_id(c),
        }
    }
}

/// State of one request's negotiation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NegotiationSession {
    /// Request under negotiation.
    pub request_id: RequestId,
    /// Current round, starting at 1.
    pub round: u32,
    /// Every proposal in order. Append-only.
    pub history: Vec<HistoryEntry>,
    /// Session status.
    pub status: SessionStatus,
    /// Round limit.
    pub max_rounds: u32,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session was completed.
    pub completed_at: Option<DateTime<Utc>>,
}

impl NegotiationSession {
    /// Opens a session at round 1 with the initial proposal.
    #[must_use]
    pub fn new(
        request_id: impl Into<RequestId>,
        initial: HistoryEntry,
        max_rounds: u32,
        started_at: DateTime<Utc>,
    ) -> Self {
        Self {
            request_id: request_id.into(),
            round: 1,
            history: vec![initial],
            status: SessionStatus::Active,
            max_rounds,
            started_at,
            completed_at: None,
        }
    }

    /// Returns true while counters may be appended.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        matches!(self.status, SessionStatus::Active)
    }

    /// Returns true if another counter may be generated.
    #[must_use]
    pub const fn can_counter(&self) -> bool {
        self.is_active() && self.round < self.max_rounds
    }

    /// Returns the most recent proposal.
    #[must_use]
    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.history.last()
    }

    /// Appends a counter and advances the round.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotActive` if the session has left
    /// `Active`.
    pub fn add_counter(&mut self, entry: HistoryEntry) -> Result<(), EngineError> {
        if !self.is_active() {
            return Err(EngineError::SessionNotActive {
                request_id: self.request_id.clone(),
                status: self.status,
            });
        }
        self.history.push(entry);
        self.round += 1;
        if self.round > self.max_rounds {
            self.status = SessionStatus::MaxRoundsReached;
        }
        Ok(())
    }

    /// Completes the session.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidStateTransition` if already completed.
    pub fn complete(&mut self, outcome: Outcome, now: DateTime<Utc>) -> Result<(), CoreError> {
        let target = SessionStatus::from(outcome);
        if !self.status.can_transition_to(&target) {
            return Err(CoreError::InvalidStateTransition {
                from: self.status.to_string(),
                to: target.to_string(),
            });
        }
        self.status = target;
        self.completed_at = Some(now);
        Ok(())
    }
}

// ==================== Counter Policy ====================

/// Whether to keep negotiating at the current rate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterAdvice {
    /// The gap is too wide and rounds remain.
    Counter {
        /// Distance from target.
        reason: String,
    },
    /// The rate is close enough to the target.
    Accept {
        /// Why the rate is acceptable.
        reason: String,
    },
    /// The gap is too wide and no rounds remain.
    Decline {
        /// Why the negotiation should end.
        reason: String,
    },
}

impl CounterAdvice {
    /// Returns true if another counter is advised.
    #[must_use]
    pub const fn should_counter(&self) -> bool {
        matches!(self, Self::Counter { .. })
    }

    /// Returns the human-readable reason.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::Counter { reason } | Self::Accept { reason } | Self::Decline { reason } => reason,
        }
    }
}

/// Advises whether to counter `current_rate` given the gap to `target_rate`.
///
/// Rates within `accept_within_percent` of the target are accepted. Wider
/// gaps are countered while `round < max_rounds` and declined after.
///
/// # Errors
///
/// Returns `CoreError::Validation` if `target_rate` is not a positive number.
pub fn should_counter(
    current_rate: f64,
    target_rate: f64,
    round: u32,
    max_rounds: u32,
    accept_within_percent: f64,
) -> Result<CounterAdvice, CoreError> {
    if !target_rate.is_finite() || target_rate <= 0.0 {
        return Err(CoreError::validation(
            "target_rate",
            format!("must be a positive number, got {target_rate}"),
        ));
    }
    if !current_rate.is_finite() {
        return Err(CoreError::validation(
            "current_rate",
            format!("must be finite, got {current_rate}"),
        ));
    }

    let percent_diff = (current_rate - target_rate).abs() * 100.0 / target_rate;

    if percent_diff > accept_within_percent && round < max_rounds {
        return Ok(CounterAdvice::Counter {
            reason: format!("{percent_diff:.1}% from target rate"),
        });
    }
    if percent_diff <= accept_within_percent {
        return Ok(CounterAdvice::Accept {
            reason: "Within acceptable range".to_string(),
        });
    }
    Ok(CounterAdvice::Decline {
        reason: "Max rounds reached, gap too large".to_string(),
    })
}

/// Terms for a single-shot counter-offer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CounterTerms {
    /// Rate the countering party wants.
    pub target_rate: f64,
    /// Whether the alternate dates may replace the offer's.
    #[serde(default)]
    pub date_flexibility: bool,
    /// Preferred first day.
    #[serde(default)]
    pub alternate_start_date: Option<NaiveDate>,
    /// Preferred last day.
    #[serde(default)]
    pub alternate_end_date: Option<NaiveDate>,
}

impl CounterTerms {
    /// Terms with a target rate and fixed dates.
    #[must_use]
    pub const fn rate(target_rate: f64) -> Self {
        Self {
            target_rate,
            date_flexibility: false,
            alternate_start_date: None,
            alternate_end_date: None,
        }
    }
}

/// Proposes a counter at the midpoint between `offer` and the target, without
/// a session.
///
/// The rate is rounded to cents. Returns `None` once `round >= max_rounds`.
#[must_use]
pub fn propose_counter(
    offer: &Offer,
    terms: &CounterTerms,
    round: u32,
    max_rounds: u32,
) -> Option<CounterOffer> {
    if round >= max_rounds {
        return None;
    }

    let next_round = round + 1;
    let rate = (CounterStrategy::Split.counter_rate(offer.rate, terms.target_rate) * 100.0).round()
        / 100.0;
    let (start_date, end_date) = if terms.date_flexibility {
        (
            terms.alternate_start_date.unwrap_or(offer.start_date),
            terms.alternate_end_date.unwrap_or(offer.end_date),
        )
    } else {
        (offer.start_date, offer.end_date)
    };

    Some(CounterOffer {
        request_id: offer.request_id.clone(),
        offer_id: Some(offer.id.clone()),
        rate,
        start_date,
        end_date,
        message: format!("Counter-offer: ${rate}/hr. Round {next_round} of {max_rounds}."),
        round: next_round,
        strategy: CounterStrategy::Split,
    })
}

/// Rejects proposals whose rate is negative or not finite.
fn check_proposal_rate(proposal: &impl Proposal) -> Result<(), CoreError> {
    let rate = proposal.rate();
    if !rate.is_finite() || rate < 0.0 {
        return Err(CoreError::validation(
            "rate",
            format!("must be a non-negative number, got {rate}"),
        ));
    }
    Ok(())
}

// ==================== Registry ====================

/// Aggregate figures over completed sessions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct NegotiationStats {
    /// Sessions in any status.
    pub total: usize,
    /// Sessions still exchanging counters.
    pub active: usize,
    /// Completed sessions.
    pub completed: usize,
    /// Completed sessions that were accepted.
    pub accepted: usize,
    /// Mean rounds over completed sessions.
    pub average_rounds: f64,
    /// Percentage of completed sessions that were accepted.
    pub success_rate: f64,
}

/// Runs negotiations for many requests at once.
///
/// Each request id has at most one session. Operations on different request
/// ids never contend; operations on the same id are serialized by the store.
#[derive(Debug)]
pub struct NegotiationRegistry<S: SessionStore = InMemorySessionStore> {
    store: S,
    config: EngineConfig,
}

impl NegotiationRegistry<InMemorySessionStore> {
    /// Creates a registry with in-memory storage.
    #[must_use]
    pub fn new(config: EngineConfig) -> Self {
        Self::with_store(InMemorySessionStore::new(), config)
    }
}

impl Default for NegotiationRegistry<InMemorySessionStore> {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl<S: SessionStore> NegotiationRegistry<S> {
    /// Creates a registry backed by `store`.
    #[must_use]
    pub const fn with_store(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Returns the engine configuration.
    #[must_use]
    pub const fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Returns the underlying store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Opens a negotiation for `request_id` with the initial proposal.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionExists` if the request already has a
    /// session in any status and `CoreError::Validation` if the proposal's
    /// rate is negative or not finite.
    pub fn start(
        &self,
        request_id: impl Into<RequestId>,
        initial: impl Into<HistoryEntry>,
    ) -> Result<NegotiationSession, EngineError> {
        self.start_at(request_id, initial, Utc::now())
    }

    /// Same as [`start`](Self::start) with an explicit start time.
    pub fn start_at(
        &self,
        request_id: impl Into<RequestId>,
        initial: impl Into<HistoryEntry>,
        now: DateTime<Utc>,
    ) -> Result<NegotiationSession, EngineError> {
        let initial = initial.into();
        check_proposal_rate(&initial)?;
        let session = NegotiationSession::new(request_id, initial, self.config.max_rounds, now);
        if !self.store.insert_if_absent(session.clone()) {
            warn!(request_id = %session.request_id, "negotiation already exists");
            return Err(EngineError::SessionExists(session.request_id));
        }
        info!(
            request_id = %session.request_id,
            max_rounds = session.max_rounds,
            "negotiation started"
        );
        Ok(session)
    }

    /// Appends a counter to an active session.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotFound` if there is no session,
    /// `EngineError::SessionNotActive` if it no longer takes counters, and
    /// `CoreError::Validation` if the counter's rate is negative or not finite.
    pub fn add_counter(
        &self,
        request_id: &str,
        counter: impl Into<HistoryEntry>,
    ) -> Result<NegotiationSession, EngineError> {
        let entry = counter.into();
        check_proposal_rate(&entry)?;
        let result = self
            .store
            .update(request_id, |session| {
                session.add_counter(entry).map(|()| session.clone())
            })
            .ok_or_else(|| EngineError::SessionNotFound(request_id.to_string()))?;

        match &result {
            Ok(session) => info!(
                request_id,
                round = session.round,
                status = %session.status,
                "counter recorded"
            ),
            Err(e) => warn!(request_id, error = %e, "counter rejected"),
        }
        result
    }

    /// Advises whether to counter using the configured limits.
    pub fn should_counter(
        &self,
        current_rate: f64,
        target_rate: f64,
        round: u32,
    ) -> Result<CounterAdvice, EngineError> {
        Ok(should_counter(
            current_rate,
            target_rate,
            round,
            self.config.max_rounds,
            self.config.accept_within_percent,
        )?)
    }

    /// Generates the next counter for a session without recording it.
    ///
    /// Returns `Ok(None)` when the session has used its rounds or is no longer
    /// active. The rate is rounded to a whole unit and the message is the
    /// first phrasing for the new round.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotFound` if there is no session and
    /// `CoreError::Validation` if either rate is not finite.
    pub fn generate_counter(
        &self,
        request_id: &str,
        current: &impl Proposal,
        target_rate: f64,
        strategy: CounterStrategy,
    ) -> Result<Option<CounterOffer>, EngineError> {
        let current_rate = current.rate();
        for (field, value) in [("current_rate", current_rate), ("target_rate", target_rate)] {
            if !value.is_finite() {
                return Err(CoreError::validation(field, format!("must be finite, got {value}")).into());
            }
        }

        self.store
            .update(request_id, |session| {
                if !session.can_counter() {
                    return None;
                }
                let round = session.round + 1;
                let rate = strategy.counter_rate_whole(current_rate, target_rate);
                Some(CounterOffer {
                    request_id: session.request_id.clone(),
                    offer_id: current.offer_id().map(str::to_string),
                    rate,
                    start_date: current.start_date(),
                    end_date: current.end_date(),
                    message: message::render(round, session.max_rounds, rate),
                    round,
                    strategy,
                })
            })
            .ok_or_else(|| EngineError::SessionNotFound(request_id.to_string()))
    }

    /// Completes a session with the given outcome.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotFound` if there is no session and
    /// `CoreError::InvalidStateTransition` if it was already completed.
    pub fn complete(
        &self,
        request_id: &str,
        outcome: Outcome,
    ) -> Result<NegotiationSession, EngineError> {
        self.complete_at(request_id, outcome, Utc::now())
    }

    /// Same as [`complete`](Self::complete) with an explicit completion time.
    pub fn complete_at(
        &self,
        request_id: &str,
        outcome: Outcome,
        now: DateTime<Utc>,
    ) -> Result<NegotiationSession, EngineError> {
        let result = self
            .store
            .update(request_id, |session| {
                session.complete(outcome, now).map(|()| session.clone())
            })
            .ok_or_else(|| EngineError::SessionNotFound(request_id.to_string()))?;

        match result {
            Ok(session) => {
                info!(
                    request_id,
                    status = %session.status,
                    rounds = session.round,
                    "negotiation completed"
                );
                Ok(session)
            }
            Err(e) => {
                warn!(request_id, error = %e, "completion rejected");
                Err(e.into())
            }
        }
    }

    /// Returns a snapshot of a session.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotFound` if there is no session.
    pub fn status(&self, request_id: &str) -> Result<NegotiationSession, EngineError> {
        self.store
            .get(request_id)
            .ok_or_else(|| EngineError::SessionNotFound(request_id.to_string()))
    }

    /// Removes a session.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::SessionNotFound` if there is no session.
    pub fn remove(&self, request_id: &str) -> Result<NegotiationSession, EngineError> {
        let session = self
            .store
            .delete(request_id)
            .ok_or_else(|| EngineError::SessionNotFound(request_id.to_string()))?;
        info!(request_id, status = %session.status, "negotiation removed");
        Ok(session)
    }

    /// Mean rounds over completed sessions, or 0.0 with none.
    #[must_use]
    pub fn average_rounds(&self) -> f64 {
        self.stats().average_rounds
    }

    /// Percentage of completed sessions that were accepted, or 0.0 with none.
    #[must_use]
    pub fn success_rate(&self) -> f64 {
        self.stats().success_rate
    }

    /// Computes aggregate figures over every stored session.
    #[must_use]
    pub fn stats(&self) -> NegotiationStats {
        let sessions = self.store.snapshot();
        let completed: Vec<_> = sessions.iter().filter(|s| s.status.is_terminal()).collect();
        let accepted = completed
            .iter()
            .filter(|s| s.status == SessionStatus::Accepted)
            .count();

        let (average_rounds, success_rate) = if completed.is_empty() {
            (0.0, 0.0)
        } else {
            let rounds: u64 = completed.iter().map(|s| u64::from(s.round)).sum();
            let count = completed.len() as f64;
            (rounds as f64 / count, accepted as f64 / count * 100.0)
        };

        NegotiationStats {
            total: sessions.len(),
            active: sessions.iter().filter(|s| s.is_active()).count(),
            completed: completed.len(),
            accepted,
            average_rounds,
            success_rate,
        }
    }
}
