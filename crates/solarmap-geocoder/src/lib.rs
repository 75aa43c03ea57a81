//! Forward geocoding for the solar estimator.
//!
//! Turns a search string into a [`solarmap_core::GeoPoint`], either by parsing
//! a literal coordinate pair or with a single request to the places API.

pub mod client;
pub mod error;
pub mod types;

pub use client::GeocoderClient;
pub use error::GeocodeError;
pub use types::Place;
