//! Rating summaries used when ranking competing offers.
//!
//! Ratings are 1–5 star scores left after a booking completes. The reputation
//! collaborator aggregates them into an average and a count.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Lowest star rating.
pub const MIN_RATING: u8 = 1;

/// Highest star rating.
pub const MAX_RATING: u8 = 5;

/// Aggregated ratings for a contractor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RatingSummary {
    /// Mean star rating (1.0–5.0), or 0.0 with no ratings.
    pub average_score: f64,
    /// Number of ratings received.
    pub total_ratings: u32,
}

impl RatingSummary {
    /// Creates a summary from precomputed values.
    #[must_use]
    pub const fn new(average_score: f64, total_ratings: u32) -> Self {
        Self {
            average_score,
            total_ratings,
        }
    }

    /// Aggregates raw star ratings.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Validation` if any rating is outside 1–5.
    pub fn from_scores(scores: &[u8]) -> Result<Self, CoreError> {
        if let Some(bad) = scores
            .iter()
            .find(|s| !(MIN_RATING..=MAX_RATING).contains(*s))
        {
            return Err(CoreError::validation(
                "score",
                format!("rating must be between {MIN_RATING} and {MAX_RATING}, got {bad}"),
            ));
        }
        if scores.is_empty() {
            return Ok(Self::default());
        }
        let total: u32 = scores.iter().map(|s| u32::from(*s)).sum();
        let count = scores.len() as u32;
        Ok(Self {
            average_score: f64::from(total) / f64::from(count),
            total_ratings: count,
        })
    }

    /// Returns true if nobody has rated the contractor yet.
    #[must_use]
    pub const fn is_unrated(&self) -> bool {
        self.total_ratings == 0
    }
}
