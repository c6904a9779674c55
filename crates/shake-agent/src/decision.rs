//! Decision policy.
//!
//! Turns an [`Evaluation`] and the contractor's negotiation preferences into
//! one of five actions. The rules are checked in order and the first match
//! wins:
//!
//! 1. `score >= auto_accept_score` and auto-accept enabled → [`Action::Accept`]
//! 2. `score < decline_below` → [`Action::Decline`]
//! 3. `suggest_from <= score < auto_accept_score` → [`Action::Suggest`]
//! 4. auto-negotiate enabled and `score >= counter_from` → [`Action::Counter`]
//! 5. otherwise → [`Action::Notify`]
//!
//! With the default thresholds rule 3 covers every score from 60 to 84, so
//! rule 4 only fires for scores of 85 and above when auto-accept is off.
//!
//! Rules look at the score only. Callers route non-matching evaluations
//! elsewhere before asking for a decision.

use serde::{Deserialize, Serialize};
use tracing::debug;

use shake_core::{JobRequest, NegotiationPreferences};

use crate::config::DecisionThresholds;
use crate::matching::{Evaluation, SuggestedOffer};

/// What the engine does with an evaluated request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Action {
    /// Accept the request at the suggested terms.
    Accept,
    /// Decline the request.
    Decline {
        /// Evaluation reasons joined with `", "`.
        reason: String,
    },
    /// Suggest the offer to the contractor for approval.
    Suggest {
        /// Offer to suggest.
        offer: Option<SuggestedOffer>,
    },
    /// Open a counter-offer automatically.
    Counter {
        /// Terms to counter with.
        counter: Option<SuggestedOffer>,
    },
    /// Notify the contractor without acting.
    Notify,
}

impl Action {
    /// Returns the wire name of the action.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Accept => "ACCEPT",
            Self::Decline { .. } => "DECLINE",
            Self::Suggest { .. } => "SUGGEST",
            Self::Counter { .. } => "COUNTER",
            Self::Notify => "NOTIFY",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// An action with the engine's confidence in it (0–100 for ordinary scores).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    /// Chosen action and its payload.
    #[serde(flatten)]
    pub action: Action,
    /// Confidence in the action.
    pub confidence: u32,
}

/// Chooses an action for an evaluation.
#[must_use]
pub fn decide(
    evaluation: &Evaluation,
    preferences: &NegotiationPreferences,
    thresholds: &DecisionThresholds,
) -> Decision {
    let score = evaluation.score;

    if score >= thresholds.auto_accept_score && preferences.auto_accept {
        return Decision {
            action: Action::Accept,
            confidence: score,
        };
    }

    if score < thresholds.decline_below {
        return Decision {
            action: Action::Decline {
                reason: evaluation.reasons.join(", "),
            },
            confidence: 100u32.saturating_sub(score),
        };
    }

    if score >= thresholds.suggest_from && score < thresholds.auto_accept_score {
        return Decision {
            action: Action::Suggest {
                offer: evaluation.suggested_offer,
            },
            confidence: score,
        };
    }

    if preferences.auto_negotiate && score >= thresholds.counter_from {
        return Decision {
            action: Action::Counter {
                counter: evaluation.suggested_offer,
            },
            confidence: score,
        };
    }

    Decision {
        action: Action::Notify,
        confidence: score,
    }
}

/// Chooses an action for an evaluation of `request`.
///
/// Same rules as [`decide`]; the request only tags the trace event.
#[must_use]
pub fn decide_for(
    request: &JobRequest,
    evaluation: &Evaluation,
    preferences: &NegotiationPreferences,
    thresholds: &DecisionThresholds,
) -> Decision {
    let decision = decide(evaluation, preferences, thresholds);
    debug!(
        request_id = %request.id,
        action = decision.action.name(),
        confidence = decision.confidence,
        "decided"
    );
    decision
}
