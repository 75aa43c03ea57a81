use thiserror::Error;

/// Errors returned by [`crate::GeocoderClient`].
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The query was empty after trimming; no request was made.
    #[error("search query is empty")]
    EmptyQuery,

    /// The service answered but returned no candidates.
    #[error("no location found for \"{query}\"")]
    NotFound { query: String },

    /// The service rejected the access token (HTTP 401/403).
    #[error("geocoding service rejected the access token (HTTP {status})")]
    Unauthorized { status: u16 },

    /// Network, TLS, timeout, or non-2xx failure from the underlying HTTP client.
    #[error("geocoding request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The first candidate's coordinates are outside the valid ranges.
    #[error("geocoding candidate has invalid coordinates [{longitude}, {latitude}]")]
    InvalidCandidate { longitude: f64, latitude: f64 },

    /// The configured base URL could not be parsed.
    #[error("invalid geocoder base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl GeocodeError {
    /// `true` for failures of the transport rather than of the query.
    #[must_use]
    pub fn is_network(&self) -> bool {
        matches!(self, GeocodeError::Http(_))
    }
}
