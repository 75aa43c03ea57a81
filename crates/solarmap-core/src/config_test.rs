use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

fn assert_invalid(result: Result<AppConfig, ConfigError>, expected_var: &str) {
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == expected_var),
        "expected InvalidEnvVar({expected_var}), got: {result:?}"
    );
}

#[test]
fn empty_env_yields_defaults() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should load");

    assert!(cfg.mapbox_access_token.is_none());
    assert_eq!(cfg.geocoder_base_url, "https://api.mapbox.com");
    assert_eq!(cfg.geocoder_timeout_secs, 10);
    assert_eq!(cfg.user_agent, "solarmap/0.1 (solar-estimator)");
    assert_eq!(cfg.analysis_delay_ms, 2000);
    assert_eq!(cfg.log_level, "info");
    assert!(cfg.home.is_none());
    assert_eq!(cfg.home_point(), crate::DEFAULT_POINT);
    assert_eq!(cfg.solar, SolarConfiguration::default());
    assert_eq!(cfg.report_dir, std::path::PathBuf::from("."));
}

#[test]
fn missing_token_is_reported_on_demand_not_at_load() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(matches!(
        cfg.access_token(),
        Err(ConfigError::MissingEnvVar(ref v)) if v == "SOLARMAP_MAPBOX_TOKEN"
    ));
}

#[test]
fn well_formed_token_is_returned_trimmed() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_MAPBOX_TOKEN", "  pk.abc123  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.access_token().unwrap(), "pk.abc123");
}

#[test]
fn malformed_tokens_are_rejected() {
    for raw in ["", "   ", "abc123", "pk.abc 123", "your-token-here"] {
        let mut map = HashMap::new();
        map.insert("SOLARMAP_MAPBOX_TOKEN", raw);
        let cfg = build_app_config(lookup_from_map(&map)).expect("token never fails load");
        assert!(
            matches!(cfg.access_token(), Err(ConfigError::InvalidEnvVar { .. })),
            "{raw:?} should be rejected"
        );
    }
}

#[test]
fn debug_redacts_token() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_MAPBOX_TOKEN", "pk.secret-value");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-value"));
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn home_parses_coordinate_pair() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_HOME", "37.7749, -122.4194");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let home = cfg.home.expect("home should be set");
    assert!((home.latitude() - 37.7749).abs() < f64::EPSILON);
    assert_eq!(cfg.home_point(), home);
}

#[test]
fn blank_home_falls_back_to_default() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_HOME", "  ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.home_point(), crate::DEFAULT_POINT);
}

#[test]
fn invalid_home_fails() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_HOME", "somewhere nice");
    assert_invalid(build_app_config(lookup_from_map(&map)), "SOLARMAP_HOME");

    let mut map = HashMap::new();
    map.insert("SOLARMAP_HOME", "95, 10");
    assert_invalid(build_app_config(lookup_from_map(&map)), "SOLARMAP_HOME");
}

#[test]
fn timeout_override_and_validation() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_GEOCODER_TIMEOUT_SECS", "3");
    assert_eq!(
        build_app_config(lookup_from_map(&map))
            .unwrap()
            .geocoder_timeout_secs,
        3
    );

    map.insert("SOLARMAP_GEOCODER_TIMEOUT_SECS", "0");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "SOLARMAP_GEOCODER_TIMEOUT_SECS",
    );

    map.insert("SOLARMAP_GEOCODER_TIMEOUT_SECS", "soon");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "SOLARMAP_GEOCODER_TIMEOUT_SECS",
    );
}

#[test]
fn analysis_delay_override() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_ANALYSIS_DELAY_MS", "0");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.analysis_delay_ms, 0);

    map.insert("SOLARMAP_ANALYSIS_DELAY_MS", "-5");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "SOLARMAP_ANALYSIS_DELAY_MS",
    );
}

#[test]
fn solar_parameters_override_defaults() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_PANEL_EFFICIENCY", "22.5");
    map.insert("SOLARMAP_SYSTEM_LOSS", "12");
    map.insert("SOLARMAP_ELECTRICITY_RATE", "0.25");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!((cfg.solar.panel_efficiency_percent - 22.5).abs() < f64::EPSILON);
    assert!((cfg.solar.system_loss_percent - 12.0).abs() < f64::EPSILON);
    assert!((cfg.solar.electricity_rate - 0.25).abs() < f64::EPSILON);
}

#[test]
fn solar_parameters_out_of_range_fail() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_PANEL_EFFICIENCY", "40");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "SOLARMAP_PANEL_EFFICIENCY",
    );

    let mut map = HashMap::new();
    map.insert("SOLARMAP_ELECTRICITY_RATE", "cheap");
    assert_invalid(
        build_app_config(lookup_from_map(&map)),
        "SOLARMAP_ELECTRICITY_RATE",
    );
}

#[test]
fn base_url_and_log_level_overrides() {
    let mut map = HashMap::new();
    map.insert("SOLARMAP_GEOCODER_BASE_URL", "http://localhost:9000");
    map.insert("SOLARMAP_LOG_LEVEL", "debug");
    map.insert("SOLARMAP_REPORT_DIR", "/tmp/reports");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.geocoder_base_url, "http://localhost:9000");
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.report_dir, std::path::PathBuf::from("/tmp/reports"));
}
