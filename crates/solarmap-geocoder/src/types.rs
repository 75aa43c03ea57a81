//! Wire types for the geocoding response and the resolved place.

use serde::Deserialize;
use solarmap_core::GeoPoint;

/// Top-level GeoJSON `FeatureCollection` returned by the places endpoint.
#[derive(Debug, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Deserialize)]
pub struct Feature {
    /// `[longitude, latitude]`.
    pub center: [f64; 2],
    /// Human-readable address, e.g. `"Empire State Building, New York, NY"`.
    #[serde(default)]
    pub place_name: Option<String>,
}

/// A resolved location and, when it came from the service, its display name.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub point: GeoPoint,
    pub name: Option<String>,
}
