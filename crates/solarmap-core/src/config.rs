use crate::app_config::{AppConfig, ACCESS_TOKEN_VAR};
use crate::geo::GeoPoint;
use crate::solar_config::{Parameter, SolarConfiguration};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid. A missing or
/// malformed access token is not an error here; see [`AppConfig::access_token`].
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if a value is present but invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_param = |var: &str,
                       param: Parameter,
                       config: SolarConfiguration|
     -> Result<SolarConfiguration, ConfigError> {
        let Ok(raw) = lookup(var) else {
            return Ok(config);
        };
        let value = raw
            .trim()
            .parse::<f64>()
            .map_err(|e| invalid(var, e.to_string()))?;
        config
            .with(param, value)
            .map_err(|e| invalid(var, e.to_string()))
    };

    let mapbox_access_token = lookup(ACCESS_TOKEN_VAR).ok();
    let geocoder_base_url = or_default("SOLARMAP_GEOCODER_BASE_URL", "https://api.mapbox.com");
    let geocoder_timeout_secs = parse_u64("SOLARMAP_GEOCODER_TIMEOUT_SECS", "10")?;
    if geocoder_timeout_secs == 0 {
        return Err(invalid(
            "SOLARMAP_GEOCODER_TIMEOUT_SECS",
            "timeout must be at least 1 second".to_string(),
        ));
    }
    let user_agent = or_default("SOLARMAP_USER_AGENT", "solarmap/0.1 (solar-estimator)");
    let analysis_delay_ms = parse_u64("SOLARMAP_ANALYSIS_DELAY_MS", "2000")?;
    let log_level = or_default("SOLARMAP_LOG_LEVEL", "info");
    let report_dir = PathBuf::from(or_default("SOLARMAP_REPORT_DIR", "."));

    let home = match lookup("SOLARMAP_HOME") {
        Ok(raw) if !raw.trim().is_empty() => Some(
            raw.parse::<GeoPoint>()
                .map_err(|e| invalid("SOLARMAP_HOME", e.to_string()))?,
        ),
        _ => None,
    };

    let mut solar = SolarConfiguration::default();
    solar = parse_param("SOLARMAP_PANEL_EFFICIENCY", Parameter::PanelEfficiency, solar)?;
    solar = parse_param("SOLARMAP_SYSTEM_LOSS", Parameter::SystemLoss, solar)?;
    solar = parse_param("SOLARMAP_ELECTRICITY_RATE", Parameter::ElectricityRate, solar)?;

    Ok(AppConfig {
        mapbox_access_token,
        geocoder_base_url,
        geocoder_timeout_secs,
        user_agent,
        analysis_delay_ms,
        log_level,
        home,
        solar,
        report_dir,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
