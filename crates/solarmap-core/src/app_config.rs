use std::path::PathBuf;

use crate::error::ConfigError;
use crate::geo::GeoPoint;
use crate::solar_config::SolarConfiguration;

pub const ACCESS_TOKEN_VAR: &str = "SOLARMAP_MAPBOX_TOKEN";

const TOKEN_PREFIXES: [&str; 3] = ["pk.", "sk.", "tk."];

#[derive(Clone)]
pub struct AppConfig {
    /// Raw credential as found in the environment; see [`AppConfig::access_token`].
    pub mapbox_access_token: Option<String>,
    pub geocoder_base_url: String,
    pub geocoder_timeout_secs: u64,
    pub user_agent: String,
    /// Minimum time the processing indicator is shown before an analysis runs.
    pub analysis_delay_ms: u64,
    pub log_level: String,
    /// Stand-in for browser geolocation; `None` means use [`crate::DEFAULT_POINT`].
    pub home: Option<GeoPoint>,
    pub solar: SolarConfiguration,
    pub report_dir: PathBuf,
}

impl AppConfig {
    /// Returns the geocoding credential after checking its shape.
    ///
    /// A missing or malformed token only disables geocoding; the rest of the
    /// session keeps working, so this is checked on demand rather than at load.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::MissingEnvVar`] if no token is configured.
    /// - [`ConfigError::InvalidEnvVar`] if the token is blank, contains
    ///   whitespace, or lacks a `pk.`/`sk.`/`tk.` prefix.
    pub fn access_token(&self) -> Result<&str, ConfigError> {
        let raw = self
            .mapbox_access_token
            .as_deref()
            .ok_or_else(|| ConfigError::MissingEnvVar(ACCESS_TOKEN_VAR.to_string()))?;
        validate_access_token(raw)
    }

    #[must_use]
    pub fn home_point(&self) -> GeoPoint {
        self.home.unwrap_or(crate::DEFAULT_POINT)
    }
}

fn validate_access_token(raw: &str) -> Result<&str, ConfigError> {
    let invalid = |reason: &str| ConfigError::InvalidEnvVar {
        var: ACCESS_TOKEN_VAR.to_string(),
        reason: reason.to_string(),
    };
    let token = raw.trim();
    if token.is_empty() {
        return Err(invalid("token is empty"));
    }
    if token.chars().any(char::is_whitespace) {
        return Err(invalid("token contains whitespace"));
    }
    if !TOKEN_PREFIXES.iter().any(|p| token.starts_with(p)) {
        return Err(invalid("expected a token starting with pk., sk., or tk."));
    }
    Ok(token)
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "mapbox_access_token",
                &self.mapbox_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("geocoder_timeout_secs", &self.geocoder_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("analysis_delay_ms", &self.analysis_delay_ms)
            .field("log_level", &self.log_level)
            .field("home", &self.home)
            .field("solar", &self.solar)
            .field("report_dir", &self.report_dir)
            .finish()
    }
}
