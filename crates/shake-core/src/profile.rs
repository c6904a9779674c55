//! Contractor profiles: trades, service areas, rates, availability.
//!
//! Profiles are owned by the profile-management layer; the engine only reads
//! them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::check_rate;
use crate::{ContractorId, Coordinates, CoreError, CounterStrategy};

/// Default travel radius for a service area, in miles.
pub const DEFAULT_RADIUS_MILES: f64 = 25.0;

/// A trade the contractor works in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trade {
    /// Trade name, e.g. "plumber".
    pub trade: String,
    /// Whether the contractor holds a license for this trade.
    #[serde(default)]
    pub licensed: bool,
    /// License number, if licensed.
    #[serde(default)]
    pub license_number: Option<String>,
    /// Whether proof of insurance has been verified.
    #[serde(default)]
    pub insurance_verified: bool,
}

impl Trade {
    /// Creates an unlicensed, uninsured trade entry.
    #[must_use]
    pub fn new(trade: impl Into<String>) -> Self {
        Self {
            trade: trade.into(),
            licensed: false,
            license_number: None,
            insurance_verified: false,
        }
    }

    /// Marks the trade as licensed under the given number.
    #[must_use]
    pub fn licensed(mut self, license_number: impl Into<String>) -> Self {
        self.licensed = true;
        self.license_number = Some(license_number.into());
        self
    }

    /// Marks insurance as verified.
    #[must_use]
    pub const fn insured(mut self) -> Self {
        self.insurance_verified = true;
        self
    }

    /// Case-insensitive trade name comparison.
    #[must_use]
    pub fn is(&self, trade: &str) -> bool {
        same_trade(&self.trade, trade)
    }
}

/// Compares trade names ignoring surrounding whitespace and Unicode case.
#[must_use]
pub fn same_trade(a: &str, b: &str) -> bool {
    a.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .eq(b.trim().chars().flat_map(char::to_lowercase))
}

/// Returns the first preference listed for `trade`.
#[must_use]
pub fn find_rate_preference<'a>(
    preferences: &'a [RatePreference],
    trade: &str,
) -> Option<&'a RatePreference> {
    preferences.iter().find(|p| same_trade(&p.trade, trade))
}

fn default_radius() -> f64 {
    DEFAULT_RADIUS_MILES
}

/// Where the contractor is willing to travel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceArea {
    /// City name, when declared by place.
    #[serde(default)]
    pub city: Option<String>,
    /// State or region, when declared by place.
    #[serde(default)]
    pub state: Option<String>,
    /// Center latitude.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Center longitude.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// Travel radius in miles.
    #[serde(default = "default_radius")]
    pub radius_miles: f64,
}

impl ServiceArea {
    /// Creates an area centered on the given point.
    #[must_use]
    pub const fn around(latitude: f64, longitude: f64, radius_miles: f64) -> Self {
        Self {
            city: None,
            state: None,
            latitude: Some(latitude),
            longitude: Some(longitude),
            radius_miles,
        }
    }

    /// Creates an area declared only by city and state.
    #[must_use]
    pub fn city(city: impl Into<String>, state: impl Into<String>) -> Self {
        Self {
            city: Some(city.into()),
            state: Some(state.into()),
            latitude: None,
            longitude: None,
            radius_miles: DEFAULT_RADIUS_MILES,
        }
    }

    /// Returns the center point if geocoded.
    #[must_use]
    pub fn center(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// Returns true if `point` lies within the radius. Non-geocoded areas never contain a point.
    #[must_use]
    pub fn contains(&self, point: &Coordinates) -> bool {
        self.center()
            .is_some_and(|center| center.distance_to(point) <= self.radius_miles)
    }
}

/// Rate expectations for one trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatePreference {
    /// Trade this preference applies to.
    pub trade: String,
    /// Walk-away rate.
    pub min_rate: f64,
    /// Rate the contractor would like to get.
    pub preferred_rate: f64,
    /// Top of the contractor's range.
    pub max_rate: f64,
}

impl RatePreference {
    /// Creates a rate preference.
    #[must_use]
    pub fn new(trade: impl Into<String>, min_rate: f64, preferred_rate: f64, max_rate: f64) -> Self {
        Self {
            trade: trade.into(),
            min_rate,
            preferred_rate,
            max_rate,
        }
    }

    fn validate(&self) -> Result<(), CoreError> {
        check_rate("rate_preferences.min_rate", self.min_rate)?;
        check_rate("rate_preferences.preferred_rate", self.preferred_rate)?;
        check_rate("rate_preferences.max_rate", self.max_rate)?;
        if self.min_rate > self.preferred_rate || self.preferred_rate > self.max_rate {
            return Err(CoreError::validation(
                "rate_preferences",
                format!(
                    "{}: expected min <= preferred <= max, got {} / {} / {}",
                    self.trade, self.min_rate, self.preferred_rate, self.max_rate
                ),
            ));
        }
        Ok(())
    }
}

/// Whether an availability window is bookable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    /// Open for work.
    #[default]
    Available,
    /// Blocked out.
    Unavailable,
}

/// A calendar window the contractor has declared.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityWindow {
    /// First day of the window.
    pub start_date: NaiveDate,
    /// Last day of the window.
    pub end_date: NaiveDate,
    /// Whether the window is bookable.
    #[serde(default)]
    pub status: AvailabilityStatus,
}

impl AvailabilityWindow {
    /// Creates an available window.
    #[must_use]
    pub const fn available(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            status: AvailabilityStatus::Available,
        }
    }

    /// Creates a blocked-out window.
    #[must_use]
    pub const fn unavailable(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        Self {
            start_date,
            end_date,
            status: AvailabilityStatus::Unavailable,
        }
    }

    /// Returns true if this is an available window fully containing `[start, end]`.
    #[must_use]
    pub fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.status == AvailabilityStatus::Available
            && start >= self.start_date
            && end <= self.end_date
    }
}

/// How the contractor wants the engine to act on their behalf.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct NegotiationPreferences {
    /// Let the engine send counter-offers automatically.
    #[serde(default)]
    pub auto_negotiate: bool,
    /// Let the engine accept strong matches automatically.
    #[serde(default)]
    pub auto_accept: bool,
    /// How far counter-offers move toward the target rate.
    #[serde(default)]
    pub strategy: CounterStrategy,
}

/// A subcontractor's profile as seen by the matching engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractorProfile {
    /// Contractor identifier.
    pub contractor_id: ContractorId,
    /// Trades the contractor works in.
    #[serde(default)]
    pub trades: Vec<Trade>,
    /// Where the contractor travels.
    #[serde(default)]
    pub service_areas: Vec<ServiceArea>,
    /// Rate expectations per trade.
    #[serde(default)]
    pub rate_preferences: Vec<RatePreference>,
    /// Declared availability. Empty means unrestricted.
    #[serde(default)]
    pub availability: Vec<AvailabilityWindow>,
    /// Automation preferences.
    #[serde(default)]
    pub negotiation: NegotiationPreferences,
}

impl ContractorProfile {
    /// Creates an empty profile.
    #[must_use]
    pub fn new(contractor_id: impl Into<ContractorId>) -> Self {
        Self {
            contractor_id: contractor_id.into(),
            trades: Vec::new(),
            service_areas: Vec::new(),
            rate_preferences: Vec::new(),
            availability: Vec::new(),
            negotiation: NegotiationPreferences::default(),
        }
    }

    /// Adds a trade.
    #[must_use]
    pub fn with_trade(mut self, trade: Trade) -> Self {
        self.trades.push(trade);
        self
    }

    /// Adds a service area.
    #[must_use]
    pub fn with_service_area(mut self, area: ServiceArea) -> Self {
        self.service_areas.push(area);
        self
    }

    /// Adds a rate preference.
    #[must_use]
    pub fn with_rate_preference(mut self, preference: RatePreference) -> Self {
        self.rate_preferences.push(preference);
        self
    }

    /// Adds an availability window.
    #[must_use]
    pub fn with_availability(mut self, window: AvailabilityWindow) -> Self {
        self.availability.push(window);
        self
    }

    /// Sets the negotiation preferences.
    #[must_use]
    pub const fn with_negotiation(mut self, negotiation: NegotiationPreferences) -> Self {
        self.negotiation = negotiation;
        self
    }

    /// Returns true if the profile lists `trade` (case-insensitive).
    #[must_use]
    pub fn has_trade(&self, trade: &str) -> bool {
        self.trades.iter().any(|t| t.is(trade))
    }

    /// Returns the rate preference for `trade`, if any.
    #[must_use]
    pub fn rate_preference_for(&self, trade: &str) -> Option<&RatePreference> {
        find_rate_preference(&self.rate_preferences, trade)
    }

    /// Returns true if any trade entry is licensed.
    #[must_use]
    pub fn has_license(&self) -> bool {
        self.trades.iter().any(|t| t.licensed)
    }

    /// Returns true if any trade entry has verified insurance.
    #[must_use]
    pub fn has_insurance(&self) -> bool {
        self.trades.iter().any(|t| t.insurance_verified)
    }

    /// Validates the profile at the engine boundary.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.trades.iter().any(|t| t.trade.trim().is_empty()) {
            return Err(CoreError::validation("trades", "trade name must not be empty"));
        }
        for area in &self.service_areas {
            if !area.radius_miles.is_finite() || area.radius_miles < 0.0 {
                return Err(CoreError::validation(
                    "service_areas.radius_miles",
                    format!("must be a non-negative distance, got {}", area.radius_miles),
                ));
            }
            match (area.latitude, area.longitude) {
                (Some(lat), Some(lon)) => Coordinates::new(lat, lon).validate("service_areas")?,
                (None, None) => {}
                _ => {
                    return Err(CoreError::validation(
                        "service_areas",
                        "both or neither of latitude/longitude must be set",
                    ));
                }
            }
        }
        for preference in &self.rate_preferences {
            preference.validate()?;
        }
        for window in &self.availability {
            if window.start_date > window.end_date {
                return Err(CoreError::validation(
                    "availability",
                    format!("{} is after {}", window.start_date, window.end_date),
                ));
            }
        }
        Ok(())
    }
}
