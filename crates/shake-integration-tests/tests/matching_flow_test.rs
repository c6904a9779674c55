//! Integration tests for the matching flow.
//!
//! Tests the path from a broadcast job request to a ranked shortlist:
//! 1. Records arrive as JSON from the marketplace database
//! 2. Each contractor profile is evaluated against the request
//! 3. The decision policy picks an action per contractor
//! 4. Offers from matching contractors are ranked for the requester

use chrono::NaiveDate;
use shake_agent::{
    Action, DecisionThresholds, EngineConfig, NegotiationRegistry, RankableOffer,
    RankingPreferences, decide, decide_for, evaluate, rank_offers,
};
use shake_core::{
    AvailabilityWindow, ContractorProfile, CounterStrategy, JobRequest, NegotiationPreferences,
    Offer, RatePreference, RatingSummary, ServiceArea, Trade,
};

// ============================================================================
// Helper Functions
// ============================================================================

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
}

fn austin_request() -> JobRequest {
    JobRequest::new("req-austin", "electrician", date(9), date(13), 60.0, 110.0)
        .with_location("Austin, TX")
        .with_coordinates(30.2672, -97.7431)
        .with_requirements("licensed")
        .with_scope("Panel upgrade, 200A service")
}

fn electrician(id: &str, min: f64, preferred: f64) -> ContractorProfile {
    ContractorProfile::new(id)
        .with_trade(Trade::new("Electrician").licensed(format!("TX-{id}")).insured())
        .with_service_area(ServiceArea::around(30.30, -97.70, 30.0))
        .with_rate_preference(RatePreference::new("electrician", min, preferred, preferred + 40.0))
        .with_availability(AvailabilityWindow::available(date(1), date(31)))
}

// ============================================================================
// Database Record Tests
// ============================================================================

#[test]
fn evaluates_database_shaped_records() {
    let request: JobRequest = serde_json::from_str(
        r#"{
            "id": "req-42",
            "requester_id": "gc-7",
            "trade": "plumber",
            "location": "Round Rock, TX",
            "latitude": 30.5083,
            "longitude": -97.6789,
            "start_date": "2026-04-06",
            "end_date": "2026-04-10",
            "min_rate": 55.0,
            "max_rate": 95.0,
            "scope": "Rough-in for 3 bathrooms",
            "requirements": "licensed, insured",
            "status": "open"
        }"#,
    )
    .unwrap();

    let profile: ContractorProfile = serde_json::from_str(
        r#"{
            "contractor_id": "sub-12",
            "trades": [
                {"trade": "plumber", "licensed": true, "license_number": "M-4411", "insurance_verified": true}
            ],
            "service_areas": [
                {"city": "Austin", "state": "TX", "latitude": 30.2672, "longitude": -97.7431}
            ],
            "rate_preferences": [
                {"trade": "plumber", "min_rate": 70.0, "preferred_rate": 85.0, "max_rate": 110.0}
            ],
            "availability": [
                {"start_date": "2026-04-01", "end_date": "2026-04-30", "status": "available"}
            ],
            "negotiation": {"auto_negotiate": true, "auto_accept": true, "strategy": "aggressive"}
        }"#,
    )
    .unwrap();

    // Round Rock is about 18 miles from Austin, inside the default 25-mile radius.
    let evaluation = evaluate(&request, &profile).unwrap();
    assert!(evaluation.matches, "reasons: {:?}", evaluation.reasons);
    assert_eq!(evaluation.score, 105);
    assert!(evaluation.auto_respond);
    assert!((evaluation.suggested_offer.unwrap().rate - 85.0).abs() < f64::EPSILON);

    let decision = decide_for(
        &request,
        &evaluation,
        &profile.negotiation,
        &DecisionThresholds::default(),
    );
    assert_eq!(decision.action, Action::Accept);
    assert_eq!(decision.confidence, 105);
}

#[test]
fn rejects_malformed_profile() {
    let profile: ContractorProfile = serde_json::from_str(
        r#"{
            "contractor_id": "sub-13",
            "trades": [{"trade": "plumber"}],
            "rate_preferences": [
                {"trade": "plumber", "min_rate": 90.0, "preferred_rate": 80.0, "max_rate": 110.0}
            ]
        }"#,
    )
    .unwrap();
    let request = JobRequest::new("req-1", "plumber", date(2), date(3), 50.0, 100.0);

    assert!(evaluate(&request, &profile).is_err());
}

// ============================================================================
// Broadcast Flow Tests
// ============================================================================

#[test]
fn broadcast_routes_each_contractor() {
    let request = austin_request();
    let thresholds = DecisionThresholds::default();

    let auto = NegotiationPreferences {
        auto_negotiate: true,
        auto_accept: true,
        strategy: CounterStrategy::Split,
    };

    let profiles = vec![
        // Full match: 30 + 20 + 25 + 25 + 5
        electrician("sub-a", 70.0, 95.0).with_negotiation(auto),
        // Rate only acceptable: 30 + 20 + 25 + 15 + 5
        electrician("sub-b", 80.0, 125.0),
        // Minimum above the request's max rate
        electrician("sub-c", 120.0, 140.0),
        // Wrong trade
        ContractorProfile::new("sub-d").with_trade(Trade::new("roofer")),
        // Out of area (Dallas)
        ContractorProfile::new("sub-e")
            .with_trade(Trade::new("electrician").licensed("TX-e"))
            .with_service_area(ServiceArea::around(32.7767, -96.7970, 25.0)),
        // Not licensed
        ContractorProfile::new("sub-f").with_trade(Trade::new("electrician")),
    ];

    let actions: Vec<(String, u32, String)> = profiles
        .iter()
        .map(|profile| {
            let evaluation = evaluate(&request, profile).unwrap();
            let decision = decide(&evaluation, &profile.negotiation, &thresholds);
            (
                profile.contractor_id.clone(),
                evaluation.score,
                decision.action.name().to_string(),
            )
        })
        .collect();

    assert_eq!(
        actions,
        vec![
            ("sub-a".to_string(), 105, "ACCEPT".to_string()),
            ("sub-b".to_string(), 95, "NOTIFY".to_string()),
            ("sub-c".to_string(), 75, "SUGGEST".to_string()),
            ("sub-d".to_string(), 0, "DECLINE".to_string()),
            ("sub-e".to_string(), 30, "NOTIFY".to_string()),
            ("sub-f".to_string(), 70, "SUGGEST".to_string()),
        ]
    );
}

#[test]
fn decline_reason_lists_failures() {
    let request = austin_request();
    let profile = ContractorProfile::new("sub-x").with_trade(Trade::new("plumber"));
    let evaluation = evaluate(&request, &profile).unwrap();
    let decision = decide(&evaluation, &profile.negotiation, &DecisionThresholds::default());

    assert_eq!(
        decision.action,
        Action::Decline {
            reason: "Trade does not match".into()
        }
    );
    assert_eq!(decision.confidence, 100);
}

// ============================================================================
// Counter Handoff Tests
// ============================================================================

#[test]
fn counter_decision_opens_negotiation() {
    let request = austin_request();
    let profile = electrician("sub-a", 70.0, 95.0).with_negotiation(NegotiationPreferences {
        auto_negotiate: true,
        auto_accept: false,
        strategy: CounterStrategy::Conservative,
    });

    let evaluation = evaluate(&request, &profile).unwrap();
    let decision = decide(&evaluation, &profile.negotiation, &DecisionThresholds::default());
    let Action::Counter { counter: Some(terms) } = decision.action else {
        panic!("expected counter, got {:?}", decision.action);
    };

    // The requester opened at their minimum; the contractor counters toward the suggested rate.
    let registry = NegotiationRegistry::new(EngineConfig::default());
    let opening = Offer::new("offer-1", &request.id, "gc", request.min_rate, terms.start_date, terms.end_date);
    registry.start(&request.id, opening.clone()).unwrap();

    let counter = registry
        .generate_counter(&request.id, &opening, terms.rate, profile.negotiation.strategy)
        .unwrap()
        .unwrap();
    // 60 + 0.25 * (95 - 60) = 68.75
    assert!((counter.rate - 69.0).abs() < f64::EPSILON);
    assert_eq!(counter.strategy, CounterStrategy::Conservative);
    assert_eq!(counter.start_date, date(9));
}

// ============================================================================
// Ranking Tests
// ============================================================================

#[test]
fn requester_ranks_matching_offers() {
    let request = austin_request();
    let candidates = [
        ("sub-a", 95.0, None),
        ("sub-b", 105.0, Some(RatingSummary::from_scores(&[5, 5, 5, 4, 5, 5]).unwrap())),
        ("sub-c", 90.0, Some(RatingSummary::new(2.5, 4))),
    ];

    let offers: Vec<RankableOffer> = candidates
        .iter()
        .map(|(id, rate, reputation)| {
            let offer = Offer::new(format!("offer-{id}"), &request.id, *id, *rate, date(9), date(13));
            let candidate = RankableOffer::new(offer);
            match reputation {
                Some(r) => candidate.with_reputation(*r),
                None => candidate,
            }
        })
        .collect();

    let prefs = RankingPreferences {
        max_rate: request.max_rate,
        start_date: request.start_date,
    };
    let ranked = rank_offers(offers, &prefs);

    // sub-a: 150 + 10 = 160
    // sub-b: 50 + 96.67 + 12 + 10 = 168.67
    // sub-c: 200 + 50 + 8 + 10 = 268
    let ids: Vec<_> = ranked.iter().map(|r| r.offer.contractor_id.as_str()).collect();
    assert_eq!(ids, ["sub-c", "sub-b", "sub-a"]);
    assert!((ranked[0].match_score - 268.0).abs() < 1e-9);
    assert!((ranked[2].match_score - 160.0).abs() < 1e-9);
}
