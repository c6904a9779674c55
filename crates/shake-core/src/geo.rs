//! Great-circle distance between coordinates.
//!
//! Service areas are a center point plus a travel radius in miles, so the
//! matching engine only needs the Haversine distance between two points.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Mean radius of the Earth in miles.
pub const EARTH_RADIUS_MILES: f64 = 3959.0;

/// Returns the Haversine distance in miles between two latitude/longitude pairs.
///
/// Inputs are degrees. Non-finite inputs yield NaN; callers validate
/// coordinates before relying on the result.
#[must_use]
pub fn distance_miles(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let d_lat = (lat2 - lat1).to_radians();
    let d_lon = (lon2 - lon1).to_radians();
    let lat1 = lat1.to_radians();
    let lat2 = lat2.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    EARTH_RADIUS_MILES * c
}

/// A point on the Earth's surface in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude in degrees, -90 to 90.
    pub latitude: f64,
    /// Longitude in degrees, -180 to 180.
    pub longitude: f64,
}

impl Coordinates {
    /// Creates coordinates without validation.
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Builds coordinates from an optional pair; both halves must be present.
    #[must_use]
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        match (latitude, longitude) {
            (Some(lat), Some(lon)) => Some(Self::new(lat, lon)),
            _ => None,
        }
    }

    /// Returns true if both components are finite and within range.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Validates the coordinates, naming `field` in the error.
    pub fn validate(&self, field: &'static str) -> Result<(), CoreError> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(CoreError::validation(
                field,
                format!(
                    "coordinates out of range: ({}, {})",
                    self.latitude, self.longitude
                ),
            ))
        }
    }

    /// Distance in miles to another point.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f64 {
        distance_miles(self.latitude, self.longitude, other.latitude, other.longitude)
    }
}
