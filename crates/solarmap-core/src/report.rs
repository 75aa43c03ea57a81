//! Plain-text solar report and its export file.
//!
//! [`format_report`] is pure: the generation timestamp is an argument, so the
//! same inputs always produce the same bytes. Every figure printed comes from
//! [`SolarMetrics`] as computed, or from integer products of those values.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, Utc};

use crate::engine::{Payback, SolarMetrics, SYSTEM_COST_PER_KW};
use crate::error::CoreError;
use crate::geo::GeoPoint;
use crate::solar_config::SolarConfiguration;

/// Horizon used for lifetime savings and offset figures.
pub const LIFETIME_YEARS: u64 = 25;

const RULE: &str = "==================================================";

/// Renders the full report.
#[must_use]
pub fn format_report(
    metrics: &SolarMetrics,
    point: GeoPoint,
    config: &SolarConfiguration,
    generated_at: DateTime<Utc>,
) -> String {
    let annual_savings = metrics.annual_savings();
    let lines = vec![
        RULE.to_string(),
        "SOLAR POTENTIAL ANALYSIS REPORT".to_string(),
        RULE.to_string(),
        format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
        String::new(),
        heading("LOCATION"),
        format!("Latitude:               {:.6}", point.latitude()),
        format!("Longitude:              {:.6}", point.longitude()),
        String::new(),
        heading("ROOF ANALYSIS"),
        format!("Total roof area:        {} m²", group_thousands(metrics.roof_area_m2.into())),
        format!("Usable area:            {} m²", group_thousands(metrics.usable_area_m2.into())),
        format!(
            "Solar irradiance:       {} kWh/m²/year",
            group_thousands(metrics.annual_irradiance.into())
        ),
        String::new(),
        heading("SYSTEM SPECIFICATION"),
        format!("System size:            {} kW", group_thousands(metrics.system_size_kw.into())),
        format!("Panel efficiency:       {}%", config.panel_efficiency_percent),
        format!("System losses:          {}%", config.system_loss_percent),
        format!(
            "Estimated cost:         ${} (${}/kW installed)",
            group_thousands(metrics.system_cost()),
            group_thousands(SYSTEM_COST_PER_KW.into())
        ),
        String::new(),
        heading("ENERGY PRODUCTION"),
        format!(
            "Annual production:      {} kWh",
            group_thousands(metrics.annual_production_kwh.into())
        ),
        String::new(),
        heading("FINANCIAL ANALYSIS"),
        format!("Electricity rate:       ${}/kWh", config.electricity_rate),
        format!("Monthly savings:        ${}", group_thousands(metrics.monthly_savings.into())),
        format!("Annual savings:         ${}", group_thousands(annual_savings)),
        format!(
            "{LIFETIME_YEARS}-year savings:        ${}",
            group_thousands(annual_savings * LIFETIME_YEARS)
        ),
        format!("Payback period:         {}", metrics.payback),
        String::new(),
        heading("ENVIRONMENTAL IMPACT"),
        format!(
            "CO2 offset per year:    {} kg",
            group_thousands(metrics.co2_savings_kg.into())
        ),
        format!(
            "CO2 offset ({LIFETIME_YEARS} years):  {} kg",
            group_thousands(u64::from(metrics.co2_savings_kg) * LIFETIME_YEARS)
        ),
        String::new(),
        heading("RECOMMENDATIONS"),
    ];

    let mut out = lines;
    out.extend(recommendations(metrics).into_iter().map(|r| format!("- {r}")));
    out.push(String::new());
    out.push(RULE.to_string());
    out.push("Estimates are indicative only and do not replace an on-site survey.".to_string());
    out.push(String::new());
    out.join("\n")
}

fn heading(title: &str) -> String {
    format!("{title}\n{}", "-".repeat(title.len()))
}

fn recommendations(metrics: &SolarMetrics) -> Vec<&'static str> {
    let mut recs = Vec::new();
    if metrics.system_size_kw == 0 {
        recs.push("The usable roof area is too small for a meaningful installation.");
    }
    recs.push(match metrics.payback {
        Payback::Years(y) if y <= 8.0 => {
            "Excellent investment: the system pays for itself within 8 years."
        }
        Payback::Years(y) if y <= 12.0 => {
            "Good investment: payback falls well inside typical panel warranties."
        }
        Payback::Years(_) => {
            "Moderate investment: compare financing options before committing."
        }
        Payback::Undefined => {
            "Payback cannot be estimated because projected savings are zero; \
             review the electricity rate."
        }
    });
    recs.push("Obtain quotes from at least three certified installers.");
    recs.push("Check federal, state and utility incentives, which can shorten payback.");
    recs.push("Have the roof structure and orientation confirmed before installation.");
    recs
}

/// Formats an integer with comma thousands separators (`29068` → `"29,068"`).
#[must_use]
pub fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `Solar_Report_<lat>_<lng>_<YYYY-MM-DD>.txt`, coordinates to four decimals.
#[must_use]
pub fn report_filename(point: GeoPoint, date: NaiveDate) -> String {
    format!(
        "Solar_Report_{:.4}_{:.4}_{}.txt",
        point.latitude(),
        point.longitude(),
        date.format("%Y-%m-%d")
    )
}

/// Writes the report into `dir` and returns the full path of the new file.
///
/// # Errors
///
/// Returns [`CoreError::Export`] if the file cannot be written.
pub fn export_report(
    dir: &Path,
    metrics: &SolarMetrics,
    point: GeoPoint,
    config: &SolarConfiguration,
    generated_at: DateTime<Utc>,
) -> Result<PathBuf, CoreError> {
    let path = dir.join(report_filename(point, generated_at.date_naive()));
    let body = format_report(metrics, point, config, generated_at);
    std::fs::write(&path, body).map_err(|source| CoreError::Export {
        path: path.clone(),
        source,
    })?;
    tracing::info!(path = %path.display(), "report exported");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::clock::{Clock, FixedClock};
    use crate::engine::{analyze, ScriptedSource};
    use crate::geo::DEFAULT_POINT;

    fn generated_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap()
    }

    fn reference_metrics() -> SolarMetrics {
        analyze(
            DEFAULT_POINT,
            &SolarConfiguration::default(),
            &mut ScriptedSource::new([40.0, 150.0]),
        )
    }

    #[test]
    fn report_contains_every_section_in_order() {
        let report = format_report(
            &reference_metrics(),
            DEFAULT_POINT,
            &SolarConfiguration::default(),
            generated_at(),
        );
        let sections = [
            "LOCATION",
            "ROOF ANALYSIS",
            "SYSTEM SPECIFICATION",
            "ENERGY PRODUCTION",
            "FINANCIAL ANALYSIS",
            "ENVIRONMENTAL IMPACT",
            "RECOMMENDATIONS",
        ];
        let mut last = 0;
        for section in sections {
            let pos = report[last..]
                .find(&format!("\n{section}\n"))
                .unwrap_or_else(|| panic!("section {section} missing or out of order"));
            last += pos + 1;
        }
    }

    #[test]
    fn report_prints_engine_values_without_drift() {
        let report = format_report(
            &reference_metrics(),
            DEFAULT_POINT,
            &SolarConfiguration::default(),
            generated_at(),
        );
        for expected in [
            "Generated: 2026-03-14 09:30:00 UTC",
            "Latitude:               40.712800",
            "Longitude:              -74.006000",
            "Total roof area:        160 m²",
            "Usable area:            128 m²",
            "Solar irradiance:       1,650 kWh/m²/year",
            "System size:            26 kW",
            "Panel efficiency:       20%",
            "System losses:          14%",
            "Estimated cost:         $65,000",
            "Annual production:      29,068 kWh",
            "Electricity rate:       $0.12/kWh",
            "Monthly savings:        $291",
            "Annual savings:         $3,492",
            "25-year savings:        $87,300",
            "Payback period:         18.6 years",
            "CO2 offset per year:    11,627 kg",
            "CO2 offset (25 years):  290,675 kg",
        ] {
            assert!(report.contains(expected), "missing {expected:?} in:\n{report}");
        }
    }

    #[test]
    fn report_is_pure() {
        let metrics = reference_metrics();
        let config = SolarConfiguration::default();
        let a = format_report(&metrics, DEFAULT_POINT, &config, generated_at());
        let b = format_report(&metrics, DEFAULT_POINT, &config, generated_at());
        assert_eq!(a, b);
    }

    #[test]
    fn undefined_payback_prints_not_available() {
        let config = SolarConfiguration {
            electricity_rate: 0.0,
            ..SolarConfiguration::default()
        };
        let metrics = analyze(DEFAULT_POINT, &config, &mut ScriptedSource::new([40.0, 150.0]));
        let report = format_report(&metrics, DEFAULT_POINT, &config, generated_at());
        assert!(report.contains("Payback period:         N/A"));
        assert!(!report.contains("NaN"));
        assert!(!report.contains("inf years"));
        assert!(report.contains("Payback cannot be estimated"));
    }

    #[test]
    fn recommendation_tier_follows_payback() {
        let mut metrics = reference_metrics();
        metrics.payback = Payback::Years(6.5);
        assert!(recommendations(&metrics)[0].starts_with("Excellent"));
        metrics.payback = Payback::Years(10.0);
        assert!(recommendations(&metrics)[0].starts_with("Good"));
        metrics.payback = Payback::Years(18.6);
        assert!(recommendations(&metrics)[0].starts_with("Moderate"));
    }

    #[test]
    fn parameters_are_printed_as_configured() {
        let config = SolarConfiguration {
            panel_efficiency_percent: 21.5,
            system_loss_percent: 12.25,
            electricity_rate: 0.125,
        };
        let metrics = analyze(DEFAULT_POINT, &config, &mut ScriptedSource::new([40.0, 150.0]));
        let report = format_report(&metrics, DEFAULT_POINT, &config, generated_at());
        assert!(report.contains("Panel efficiency:       21.5%"), "{report}");
        assert!(report.contains("System losses:          12.25%"), "{report}");
        assert!(report.contains("Electricity rate:       $0.125/kWh"), "{report}");
        assert!(report.contains("($2,500/kW installed)"), "{report}");
    }

    #[test]
    fn group_thousands_inserts_commas() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1_000), "1,000");
        assert_eq!(group_thousands(29_068), "29,068");
        assert_eq!(group_thousands(1_234_567), "1,234,567");
    }

    #[test]
    fn filename_uses_four_decimals_and_iso_date() {
        let name = report_filename(DEFAULT_POINT, generated_at().date_naive());
        assert_eq!(name, "Solar_Report_40.7128_-74.0060_2026-03-14.txt");
    }

    #[test]
    fn export_writes_report_to_directory() {
        let dir = std::env::temp_dir().join(format!("solarmap-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let clock = FixedClock(generated_at());
        let metrics = reference_metrics();
        let config = SolarConfiguration::default();
        let path = export_report(&dir, &metrics, DEFAULT_POINT, &config, clock.now())
            .expect("export should succeed");

        assert!(path.ends_with("Solar_Report_40.7128_-74.0060_2026-03-14.txt"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            format_report(&metrics, DEFAULT_POINT, &config, generated_at())
        );
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn export_into_missing_directory_fails() {
        let dir = std::env::temp_dir().join("solarmap-definitely-missing/nested");
        let result = export_report(
            &dir,
            &reference_metrics(),
            DEFAULT_POINT,
            &SolarConfiguration::default(),
            generated_at(),
        );
        assert!(matches!(result, Err(CoreError::Export { .. })));
    }
}
