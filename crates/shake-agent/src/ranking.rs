//! Offer ranking.
//!
//! Orders competing offers for one request by a composite score:
//!
//! - price headroom: `max(0, (max_rate - rate) * 10)`
//! - reputation: `average_score * 20 + min(total_ratings, 10) * 2`
//! - early start: `10` if the offer starts on or before the preferred date

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shake_core::{Offer, RatingSummary};

/// Points per currency unit below the requester's maximum rate.
pub const PRICE_WEIGHT: f64 = 10.0;
/// Points per star of average rating.
pub const RATING_WEIGHT: f64 = 20.0;
/// Points per rating received, up to [`RATING_COUNT_CAP`].
pub const RATING_COUNT_WEIGHT: f64 = 2.0;
/// Ratings beyond this count add nothing.
pub const RATING_COUNT_CAP: u32 = 10;
/// Bonus for starting on or before the preferred date.
pub const EARLY_START_BONUS: f64 = 10.0;

/// An offer together with its contractor's reputation, if known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankableOffer {
    /// The offer.
    #[serde(flatten)]
    pub offer: Offer,
    /// Contractor's rating summary.
    #[serde(default)]
    pub reputation: Option<RatingSummary>,
}

impl RankableOffer {
    /// Wraps an offer with no reputation.
    #[must_use]
    pub const fn new(offer: Offer) -> Self {
        Self {
            offer,
            reputation: None,
        }
    }

    /// Attaches a rating summary.
    #[must_use]
    pub const fn with_reputation(mut self, reputation: RatingSummary) -> Self {
        self.reputation = Some(reputation);
        self
    }
}

/// What the requester is comparing offers against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankingPreferences {
    /// Highest rate the requester will pay.
    pub max_rate: f64,
    /// Preferred start date.
    pub start_date: NaiveDate,
}

/// A scored offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedOffer {
    /// The offer.
    #[serde(flatten)]
    pub offer: Offer,
    /// Contractor's rating summary.
    pub reputation: Option<RatingSummary>,
    /// Composite ranking score.
    pub match_score: f64,
}

/// Scores a single offer.
#[must_use]
pub fn score_offer(candidate: &RankableOffer, prefs: &RankingPreferences) -> f64 {
    let mut score = ((prefs.max_rate - candidate.offer.rate) * PRICE_WEIGHT).max(0.0);

    if let Some(reputation) = &candidate.reputation {
        score += reputation.average_score * RATING_WEIGHT;
        score += f64::from(reputation.total_ratings.min(RATING_COUNT_CAP)) * RATING_COUNT_WEIGHT;
    }

    if candidate.offer.start_date <= prefs.start_date {
        score += EARLY_START_BONUS;
    }

    score
}

/// Ranks offers best first. Offers with equal scores keep their input order.
#[must_use]
pub fn rank_offers(offers: Vec<RankableOffer>, prefs: &RankingPreferences) -> Vec<RankedOffer> {
    let mut ranked: Vec<RankedOffer> = offers
        .into_iter()
        .map(|candidate| {
            let match_score = score_offer(&candidate, prefs);
            RankedOffer {
                offer: candidate.offer,
                reputation: candidate.reputation,
                match_score,
            }
        })
        .collect();

    // sort_by is stable
    ranked.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    ranked
}

/// Returns the highest-ranked offer, if any.
#[must_use]
pub fn best_offer(offers: Vec<RankableOffer>, prefs: &RankingPreferences) -> Option<RankedOffer> {
    rank_offers(offers, prefs).into_iter().next()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    fn offer(id: &str, rate: f64, start: u32) -> RankableOffer {
        RankableOffer::new(Offer::new(id, "req-1", format!("sub-{id}"), rate, date(start), date(start + 4)))
    }

    fn prefs() -> RankingPreferences {
        RankingPreferences {
            max_rate: 100.0,
            start_date: date(5),
        }
    }

    #[test]
    fn score_components() {
        let plain = offer("a", 90.0, 5);
        assert!((score_offer(&plain, &prefs()) - 110.0).abs() < 1e-9);

        let late = offer("b", 90.0, 6);
        assert!((score_offer(&late, &prefs()) - 100.0).abs() < 1e-9);

        let over_budget = offer("c", 120.0, 9);
        assert!(score_offer(&over_budget, &prefs()).abs() < 1e-9);

        let reputable = offer("d", 100.0, 9).with_reputation(RatingSummary::new(4.5, 25));
        assert!((score_offer(&reputable, &prefs()) - 110.0).abs() < 1e-9);
    }

    #[test]
    fn reputation_can_outrank_price() {
        let cheap = offer("cheap", 95.0, 5);
        let trusted = offer("trusted", 99.0, 5).with_reputation(RatingSummary::new(4.8, 12));

        let ranked = rank_offers(vec![cheap, trusted], &prefs());
        assert_eq!(ranked[0].offer.id, "trusted");
        assert_eq!(ranked[1].offer.id, "cheap");
        assert!(ranked[0].match_score > ranked[1].match_score);
    }

    #[test]
    fn ties_keep_input_order() {
        let ranked = rank_offers(
            vec![offer("first", 90.0, 5), offer("second", 90.0, 5), offer("third", 90.0, 5)],
            &prefs(),
        );
        let ids: Vec<_> = ranked.iter().map(|r| r.offer.id.as_str()).collect();
        assert_eq!(ids, ["first", "second", "third"]);
    }

    #[test]
    fn best_offer_of_none() {
        assert!(best_offer(Vec::new(), &prefs()).is_none());
        let best = best_offer(vec![offer("a", 99.0, 5), offer("b", 80.0, 5)], &prefs()).unwrap();
        assert_eq!(best.offer.id, "b");
    }

    #[test]
    fn rankable_offer_reads_flat_json() {
        let json = r#"{
            "id": "o-1", "request_id": "req-1", "contractor_id": "sub-1",
            "rate": 85.0, "start_date": "2026-03-02", "end_date": "2026-03-06",
            "reputation": {"average_score": 4.8, "total_ratings": 25}
        }"#;
        let candidate: RankableOffer = serde_json::from_str(json).unwrap();
        assert!((candidate.offer.rate - 85.0).abs() < f64::EPSILON);
        assert_eq!(candidate.reputation, Some(RatingSummary::new(4.8, 25)));

        let json = r#"{
            "id": "o-2", "request_id": "req-1", "contractor_id": "sub-2",
            "rate": 85.0, "start_date": "2026-03-02", "end_date": "2026-03-06"
        }"#;
        let candidate: RankableOffer = serde_json::from_str(json).unwrap();
        assert!(candidate.reputation.is_none());
    }

    proptest! {
        #[test]
        fn ranking_is_a_sorted_permutation(rates in prop::collection::vec(0.0f64..200.0, 0..20)) {
            let offers: Vec<_> = rates
                .iter()
                .enumerate()
                .map(|(i, r)| offer(&i.to_string(), *r, 5))
                .collect();
            let ranked = rank_offers(offers, &prefs());

            prop_assert_eq!(ranked.len(), rates.len());
            for pair in ranked.windows(2) {
                prop_assert!(pair[0].match_score >= pair[1].match_score);
                if pair[0].match_score == pair[1].match_score {
                    let a: usize = pair[0].offer.id.parse().unwrap();
                    let b: usize = pair[1].offer.id.parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        #[test]
        fn cheaper_offer_ranks_at_least_as_high(
            low in 0.0f64..150.0,
            extra in 0.0f64..50.0,
            avg in 1.0f64..5.0,
            count in 0u32..40,
        ) {
            let reputation = RatingSummary::new(avg, count);
            let cheap = offer("cheap", low, 5).with_reputation(reputation);
            let costly = offer("costly", low + extra, 5).with_reputation(reputation);
            prop_assert!(score_offer(&cheap, &prefs()) >= score_offer(&costly, &prefs()));
        }
    }
}
