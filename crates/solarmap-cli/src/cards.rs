//! Terminal rendering of the results panel.

use solarmap_core::report::group_thousands;
use solarmap_core::{GeoPoint, SolarConfiguration, SolarMetrics, Theme};

const RESET: &str = "\x1b[0m";

/// ANSI escape sequences for one theme. All empty when colour is off.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Palette {
    title: &'static str,
    label: &'static str,
    value: &'static str,
    reset: &'static str,
}

impl Palette {
    pub(crate) fn for_theme(theme: Theme, color: bool) -> Self {
        if !color {
            return Self::plain();
        }
        match theme {
            Theme::Light => Self {
                title: "\x1b[1;33m",
                label: "\x1b[34m",
                value: "\x1b[1;30m",
                reset: RESET,
            },
            Theme::Dark => Self {
                title: "\x1b[1;93m",
                label: "\x1b[96m",
                value: "\x1b[1;97m",
                reset: RESET,
            },
        }
    }

    pub(crate) fn plain() -> Self {
        Self {
            title: "",
            label: "",
            value: "",
            reset: "",
        }
    }
}

pub(crate) fn render_cards(
    point: GeoPoint,
    metrics: &SolarMetrics,
    config: &SolarConfiguration,
    palette: Palette,
) -> String {
    let Palette {
        title,
        label,
        value,
        reset,
    } = palette;
    let card = |name: &str, body: String| format!("{label}{name:<13}{reset}{body}");
    let v = |text: String| format!("{value}{text}{reset}");

    [
        format!("{title}Solar analysis for {point}{reset}"),
        card(
            "Roof",
            format!(
                "{} m² total, {} m² usable, {} kWh/m²/year",
                v(group_thousands(metrics.roof_area_m2.into())),
                v(group_thousands(metrics.usable_area_m2.into())),
                v(group_thousands(metrics.annual_irradiance.into())),
            ),
        ),
        card(
            "System",
            format!(
                "{} kW at {}% efficiency, {}% losses",
                v(group_thousands(metrics.system_size_kw.into())),
                config.panel_efficiency_percent,
                config.system_loss_percent,
            ),
        ),
        card(
            "Production",
            format!(
                "{} kWh/year",
                v(group_thousands(metrics.annual_production_kwh.into()))
            ),
        ),
        card(
            "Savings",
            format!(
                "${}/month, payback {}",
                v(group_thousands(metrics.monthly_savings.into())),
                v(metrics.payback.to_string()),
            ),
        ),
        card(
            "Environment",
            format!(
                "{} kg CO₂ avoided per year",
                v(group_thousands(metrics.co2_savings_kg.into()))
            ),
        ),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    use solarmap_core::{analyze, ScriptedSource, DEFAULT_POINT};

    fn reference_metrics() -> SolarMetrics {
        analyze(
            DEFAULT_POINT,
            &SolarConfiguration::default(),
            &mut ScriptedSource::new([40.0, 150.0]),
        )
    }

    #[test]
    fn plain_cards_show_every_metric() {
        let cards = render_cards(
            DEFAULT_POINT,
            &reference_metrics(),
            &SolarConfiguration::default(),
            Palette::plain(),
        );
        assert!(cards.contains("40.712800, -74.006000"));
        assert!(cards.contains("160 m² total, 128 m² usable, 1,650 kWh/m²/year"));
        assert!(cards.contains("26 kW at 20% efficiency"));
        assert!(cards.contains("29,068 kWh/year"));
        assert!(cards.contains("$291/month, payback 18.6 years"));
        assert!(cards.contains("11,627 kg CO₂"));
        assert!(!cards.contains('\x1b'));
    }

    #[test]
    fn themes_use_different_colours() {
        let light = Palette::for_theme(Theme::Light, true);
        let dark = Palette::for_theme(Theme::Dark, true);
        assert_ne!(light.label, dark.label);
        assert_eq!(Palette::for_theme(Theme::Dark, false).label, "");
    }
}
