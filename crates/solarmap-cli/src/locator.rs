//! Search-box behaviour shared by the one-shot commands and the session.
//!
//! Coordinate pairs always resolve offline. Free-text search needs a usable
//! access token; without one the locator stays usable for coordinates and
//! reports why text search is unavailable.

use solarmap_core::{parse_coordinate_pair, AppConfig};
use solarmap_geocoder::{GeocodeError, GeocoderClient, Place};

#[derive(Debug, Clone)]
pub(crate) struct Locator {
    geocoder: Result<GeocoderClient, String>,
}

impl Locator {
    pub(crate) fn from_config(config: &AppConfig) -> Self {
        let geocoder = config
            .access_token()
            .map_err(|e| e.to_string())
            .and_then(|token| {
                GeocoderClient::with_base_url(
                    token,
                    config.geocoder_timeout_secs,
                    &config.user_agent,
                    &config.geocoder_base_url,
                )
                .map_err(|e| e.to_string())
            });

        if let Err(reason) = &geocoder {
            tracing::warn!(%reason, "address search disabled");
        }
        Self { geocoder }
    }

    /// Banner shown at startup when text search cannot work.
    pub(crate) fn blocked_notice(&self) -> Option<String> {
        self.geocoder.as_ref().err().map(|reason| {
            format!(
                "Address search is unavailable: {reason}.\n\
                 Set {} to a valid Mapbox access token to enable it.\n\
                 Coordinates such as \"40.7128, -74.0060\" still work.",
                solarmap_core::app_config::ACCESS_TOKEN_VAR
            )
        })
    }

    /// Resolves a search-box entry, returning a user-facing message on failure.
    pub(crate) async fn locate(&self, query: &str) -> Result<Place, String> {
        if let Some(point) = parse_coordinate_pair(query) {
            return Ok(Place { point, name: None });
        }
        match &self.geocoder {
            Ok(client) => client.resolve_place(query).await.map_err(|e| {
                tracing::warn!(error = %e, "geocoding failed");
                describe(&e)
            }),
            Err(_) => Err(
                "Address search is unavailable without an access token. \
                 Enter coordinates as \"lat, lng\" instead."
                    .to_string(),
            ),
        }
    }
}

pub(crate) fn describe(err: &GeocodeError) -> String {
    match err {
        GeocodeError::EmptyQuery => "Type an address or coordinates to search.".to_string(),
        GeocodeError::NotFound { query } => {
            format!("No location found for \"{query}\". Try a more specific address.")
        }
        GeocodeError::Unauthorized { .. } => format!(
            "The geocoding service rejected the access token. Check {}.",
            solarmap_core::app_config::ACCESS_TOKEN_VAR
        ),
        GeocodeError::Http(e) if e.is_timeout() => {
            "The geocoding service did not answer in time. Please try again.".to_string()
        }
        GeocodeError::Http(_) => {
            "Could not reach the geocoding service. Check your connection and try again."
                .to_string()
        }
        other => format!("Search failed: {other}."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::path::PathBuf;

    use solarmap_core::SolarConfiguration;

    fn config(token: Option<&str>) -> AppConfig {
        AppConfig {
            mapbox_access_token: token.map(str::to_string),
            geocoder_base_url: "http://127.0.0.1:9".to_string(),
            geocoder_timeout_secs: 1,
            user_agent: "solarmap-test".to_string(),
            analysis_delay_ms: 0,
            log_level: "info".to_string(),
            home: None,
            solar: SolarConfiguration::default(),
            report_dir: PathBuf::from("."),
        }
    }

    #[test]
    fn missing_token_blocks_text_search() {
        let locator = Locator::from_config(&config(None));
        let notice = locator.blocked_notice().expect("should be blocked");
        assert!(notice.contains("SOLARMAP_MAPBOX_TOKEN"));
    }

    #[test]
    fn valid_token_is_not_blocked() {
        let locator = Locator::from_config(&config(Some("pk.abc")));
        assert!(locator.blocked_notice().is_none());
    }

    #[tokio::test]
    async fn coordinates_resolve_without_token() {
        let locator = Locator::from_config(&config(None));
        let place = locator.locate("51.5, -0.12").await.expect("offline");
        assert!((place.point.latitude() - 51.5).abs() < f64::EPSILON);
        assert!(place.name.is_none());
    }

    #[tokio::test]
    async fn text_search_without_token_explains_itself() {
        let locator = Locator::from_config(&config(Some("not-a-token")));
        let message = locator.locate("Berlin").await.unwrap_err();
        assert!(message.contains("lat, lng"), "{message}");
    }

    #[test]
    fn not_found_message_names_query() {
        let message = describe(&GeocodeError::NotFound {
            query: "Atlantis".to_string(),
        });
        assert!(message.contains("Atlantis"));
    }
}
