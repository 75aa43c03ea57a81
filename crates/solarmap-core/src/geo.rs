//! Geographic coordinates and the strict `lat, lng` literal parser.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Fallback point used when no home location is configured (New York City).
pub const DEFAULT_POINT: GeoPoint = GeoPoint {
    latitude: 40.712_8,
    longitude: -74.006_0,
};

static COORDINATE_PAIR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(-?\d+(?:\.\d+)?)\s*,\s*(-?\d+(?:\.\d+)?)\s*$")
        .expect("valid coordinate pair regex")
});

/// A validated latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

impl GeoPoint {
    /// Creates a point, rejecting non-finite or out-of-range coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] when latitude is outside `[-90, 90]`
    /// or longitude is outside `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(CoreError::OutOfRange {
                field: "latitude",
                value: latitude,
                min: -90.0,
                max: 90.0,
            });
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(CoreError::OutOfRange {
                field: "longitude",
                value: longitude,
                min: -180.0,
                max: 180.0,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}, {:.6}", self.latitude, self.longitude)
    }
}

impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = COORDINATE_PAIR
            .captures(s)
            .ok_or_else(|| CoreError::InvalidCoordinates(s.trim().to_string()))?;
        let parse = |idx: usize| -> Result<f64, CoreError> {
            caps[idx]
                .parse::<f64>()
                .map_err(|_| CoreError::InvalidCoordinates(s.trim().to_string()))
        };
        Self::new(parse(1)?, parse(2)?)
    }
}

/// Parses a strict `"lat, lng"` literal.
///
/// Returns `None` if the text is not a plain numeric pair or either value is
/// out of range; callers treat that as "not a coordinate, geocode it".
#[must_use]
pub fn parse_coordinate_pair(s: &str) -> Option<GeoPoint> {
    s.parse().ok()
}
