//! Job requests broadcast by general contractors.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::check_rate;
use crate::{Coordinates, CoreError, RequestId};

/// Lifecycle status of a job request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobRequestStatus {
    /// Accepting offers.
    #[default]
    Open,
    /// An offer was accepted and became a booking.
    Filled,
    /// Nobody was booked before the request lapsed.
    Expired,
}

impl JobRequestStatus {
    /// Checks if a transition to the target status is valid.
    #[must_use]
    pub const fn can_transition_to(&self, target: &Self) -> bool {
        matches!((self, target), (Self::Open, Self::Filled | Self::Expired))
    }
}

impl std::fmt::Display for JobRequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Filled => write!(f, "filled"),
            Self::Expired => write!(f, "expired"),
        }
    }
}

/// A requirement tag parsed from a request's comma-separated list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Requirement {
    /// At least one licensed trade (`licensed` or `license`).
    Licensed,
    /// At least one insurance-verified trade (`insured` or `insurance`).
    Insured,
    /// Any tag the engine does not check.
    Other(String),
}

impl Requirement {
    /// Parses a single tag, case-insensitively.
    #[must_use]
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_lowercase();
        match tag.as_str() {
            "licensed" | "license" => Self::Licensed,
            "insured" | "insurance" => Self::Insured,
            _ => Self::Other(tag),
        }
    }

    /// Parses a comma-separated tag list, skipping empty entries.
    #[must_use]
    pub fn parse_list(tags: &str) -> Vec<Self> {
        tags.split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(Self::parse)
            .collect()
    }
}

/// A broadcast need for a tradesperson within a date range, place, and rate band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRequest {
    /// Request identifier.
    pub id: RequestId,
    /// The general contractor who posted the request.
    #[serde(default)]
    pub requester_id: Option<String>,
    /// Trade being sought, e.g. "plumber".
    pub trade: String,
    /// Free-text location.
    #[serde(default)]
    pub location: String,
    /// Job site latitude, if geocoded.
    #[serde(default)]
    pub latitude: Option<f64>,
    /// Job site longitude, if geocoded.
    #[serde(default)]
    pub longitude: Option<f64>,
    /// First working day.
    pub start_date: NaiveDate,
    /// Last working day.
    pub end_date: NaiveDate,
    /// Lower bound of the rate band.
    pub min_rate: f64,
    /// Upper bound of the rate band.
    pub max_rate: f64,
    /// Free-text scope of work.
    #[serde(default)]
    pub scope: String,
    /// Comma-separated requirement tags, e.g. "licensed, insured".
    #[serde(default)]
    pub requirements: Option<String>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: JobRequestStatus,
}

impl JobRequest {
    /// Creates an open request with no location, scope, or requirements.
    #[must_use]
    pub fn new(
        id: impl Into<RequestId>,
        trade: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
        min_rate: f64,
        max_rate: f64,
    ) -> Self {
        Self {
            id: id.into(),
            requester_id: None,
            trade: trade.into(),
            location: String::new(),
            latitude: None,
            longitude: None,
            start_date,
            end_date,
            min_rate,
            max_rate,
            scope: String::new(),
            requirements: None,
            status: JobRequestStatus::Open,
        }
    }

    /// Sets the geocoded job site.
    #[must_use]
    pub fn with_coordinates(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    /// Sets the free-text location.
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    /// Sets the requirement tags.
    #[must_use]
    pub fn with_requirements(mut self, requirements: impl Into<String>) -> Self {
        self.requirements = Some(requirements.into());
        self
    }

    /// Sets the scope of work.
    #[must_use]
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = scope.into();
        self
    }

    /// Returns the job site if both coordinates are present.
    #[must_use]
    pub fn coordinates(&self) -> Option<Coordinates> {
        Coordinates::from_parts(self.latitude, self.longitude)
    }

    /// Returns the parsed requirement tags, or `None` if the request has none.
    #[must_use]
    pub fn parsed_requirements(&self) -> Option<Vec<Requirement>> {
        self.requirements
            .as_deref()
            .filter(|r| !r.trim().is_empty())
            .map(Requirement::parse_list)
    }

    /// Returns true if the request still accepts offers.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        matches!(self.status, JobRequestStatus::Open)
    }

    /// Validates the request at the engine boundary.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.trade.trim().is_empty() {
            return Err(CoreError::validation("trade", "must not be empty"));
        }
        check_rate("min_rate", self.min_rate)?;
        check_rate("max_rate", self.max_rate)?;
        if self.min_rate > self.max_rate {
            return Err(CoreError::validation(
                "min_rate",
                format!("{} exceeds max_rate {}", self.min_rate, self.max_rate),
            ));
        }
        if self.start_date > self.end_date {
            return Err(CoreError::validation(
                "start_date",
                format!("{} is after end_date {}", self.start_date, self.end_date),
            ));
        }
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Coordinates::new(lat, lon).validate("latitude/longitude")?,
            (None, None) => {}
            _ => {
                return Err(CoreError::validation(
                    "latitude/longitude",
                    "both or neither must be set",
                ));
            }
        }
        Ok(())
    }

    fn transition_to(&mut self, target: JobRequestStatus) -> Result<(), CoreError> {
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

    /// Marks the request filled after an offer is accepted.
    pub fn fill(&mut self) -> Result<(), CoreError> {
        self.transition_to(JobRequestStatus::Filled)
    }

    /// Marks the request expired.
    pub fn expire(&mut self) -> Result<(), CoreError> {
        self.transition_to(JobRequestStatus::Expired)
    }
}
