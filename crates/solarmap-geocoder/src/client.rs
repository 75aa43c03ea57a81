//! HTTP client for a Mapbox-compatible forward geocoding endpoint.
//!
//! One request per lookup, bounded by the configured timeout, never retried.
//! Literal `"lat, lng"` queries are answered locally without touching the
//! network.

use std::fmt;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::{Client, StatusCode, Url};
use solarmap_core::{parse_coordinate_pair, GeoPoint};

use crate::error::GeocodeError;
use crate::types::{FeatureCollection, Place};

const PLACES_PATH: &str = "geocoding/v5/mapbox.places";
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Forward geocoder.
///
/// Built with [`GeocoderClient::with_base_url`]; the base URL comes from
/// configuration so tests can point it at a mock server.
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone)]
pub struct GeocoderClient {
    client: Client,
    access_token: String,
    base_url: Url,
}

impl fmt::Debug for GeocoderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeocoderClient")
            .field("access_token", &"[redacted]")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl GeocoderClient {
    /// Creates a client for the service rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeError::Http`] if the `reqwest::Client` cannot be
    /// built, or [`GeocodeError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GeocodeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `join` appends below the base path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| GeocodeError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Resolves `query` to a point.
    ///
    /// # Errors
    ///
    /// See [`GeocoderClient::resolve_place`].
    pub async fn resolve(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        self.resolve_place(query).await.map(|place| place.point)
    }

    /// Resolves `query` to a point plus the service's display name.
    ///
    /// A strict in-range `"lat, lng"` literal is returned directly with no
    /// name. Anything else (including out-of-range pairs) is sent to the
    /// service and the first candidate wins.
    ///
    /// # Errors
    ///
    /// - [`GeocodeError::EmptyQuery`] for a blank query.
    /// - [`GeocodeError::NotFound`] when the service returns no candidates.
    /// - [`GeocodeError::Unauthorized`] on HTTP 401/403.
    /// - [`GeocodeError::Http`] on network failure, timeout, or other non-2xx status.
    /// - [`GeocodeError::Deserialize`] if the body is not the expected shape.
    /// - [`GeocodeError::InvalidCandidate`] if the candidate is out of range.
    pub async fn resolve_place(&self, query: &str) -> Result<Place, GeocodeError> {
        if let Some(point) = parse_coordinate_pair(query) {
            tracing::debug!(%point, "query is a coordinate pair; skipping lookup");
            return Ok(Place { point, name: None });
        }

        let query = query.trim();
        if query.is_empty() {
            return Err(GeocodeError::EmptyQuery);
        }

        let url = self.build_url(query)?;
        tracing::debug!(query, "sending geocoding request");
        let collection = self.request_features(&url, query).await?;

        let feature =
            collection
                .features
                .into_iter()
                .next()
                .ok_or_else(|| GeocodeError::NotFound {
                    query: query.to_string(),
                })?;

        let [longitude, latitude] = feature.center;
        let point = GeoPoint::new(latitude, longitude).map_err(|_| {
            GeocodeError::InvalidCandidate {
                longitude,
                latitude,
            }
        })?;

        tracing::info!(
            query,
            %point,
            place = feature.place_name.as_deref().unwrap_or("-"),
            "geocoded search query"
        );
        Ok(Place {
            point,
            name: feature.place_name,
        })
    }

    /// Builds `{base}/geocoding/v5/mapbox.places/{query}.json?access_token=…&limit=1`
    /// with the query percent-encoded as a single path segment.
    fn build_url(&self, query: &str) -> Result<Url, GeocodeError> {
        let encoded = utf8_percent_encode(query, NON_ALPHANUMERIC);
        let mut url = self
            .base_url
            .join(&format!("{PLACES_PATH}/{encoded}.json"))
            .map_err(|e| GeocodeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        url.query_pairs_mut()
            .append_pair("access_token", &self.access_token)
            .append_pair("limit", "1");
        Ok(url)
    }

    /// Sends the GET, maps auth failures, asserts 2xx, and decodes the body.
    ///
    /// URLs are stripped from transport errors so the token never reaches
    /// user-facing messages.
    async fn request_features(
        &self,
        url: &Url,
        query: &str,
    ) -> Result<FeatureCollection, GeocodeError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(reqwest::Error::without_url)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(GeocodeError::Unauthorized {
                status: status.as_u16(),
            });
        }

        let response = response
            .error_for_status()
            .map_err(reqwest::Error::without_url)?;
        let body = response
            .text()
            .await
            .map_err(reqwest::Error::without_url)?;
        serde_json::from_str(&body).map_err(|e| GeocodeError::Deserialize {
            context: format!("places(query={query})"),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
