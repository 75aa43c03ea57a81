//! One-shot `analyze` and `report` commands.

use std::io::IsTerminal;
use std::time::Duration;

use solarmap_core::{
    analyze, export_report, format_report, AppConfig, Clock, GeoPoint, Parameter, RngSource,
    SolarConfiguration, SolarMetrics, SystemClock, Theme,
};

use crate::cards::{render_cards, Palette};
use crate::locator::Locator;
use crate::{AnalyzeArgs, EstimateArgs, ReportArgs};

struct Estimate {
    point: GeoPoint,
    place_name: Option<String>,
    config: SolarConfiguration,
    metrics: SolarMetrics,
}

/// Applies the command-line overrides on top of the configured parameters.
///
/// # Errors
///
/// Returns an error naming the parameter and its allowed range if any
/// override is out of range.
fn configured_solar(
    base: SolarConfiguration,
    args: &EstimateArgs,
) -> anyhow::Result<SolarConfiguration> {
    let mut solar = base;
    for (param, value) in [
        (Parameter::PanelEfficiency, args.efficiency),
        (Parameter::SystemLoss, args.loss),
        (Parameter::ElectricityRate, args.rate),
    ] {
        if let Some(value) = value {
            solar = solar.with(param, value)?;
        }
    }
    Ok(solar)
}

/// Locates the query and runs the estimate.
///
/// # Errors
///
/// Returns an error if an override is out of range or the query cannot be
/// resolved to a location; the message is the one shown to the user.
async fn estimate(config: &AppConfig, args: &EstimateArgs) -> anyhow::Result<Estimate> {
    let solar = configured_solar(config.solar, args)?;

    let locator = Locator::from_config(config);
    let place = locator
        .locate(&args.query)
        .await
        .map_err(anyhow::Error::msg)?;

    eprintln!("Analyzing roof at {} ...", place.point);
    if !args.no_delay && config.analysis_delay_ms > 0 {
        tokio::time::sleep(Duration::from_millis(config.analysis_delay_ms)).await;
    }

    let mut randomness = args
        .seed
        .map_or_else(RngSource::from_os_rng, RngSource::seeded);
    let metrics = analyze(place.point, &solar, &mut randomness);
    tracing::info!(point = %place.point, seeded = args.seed.is_some(), "analysis complete");

    Ok(Estimate {
        point: place.point,
        place_name: place.name,
        config: solar,
        metrics,
    })
}

/// Runs `analyze`: prints the result cards (or JSON) for one location.
///
/// # Errors
///
/// Returns an error if a parameter override is invalid, the location cannot
/// be resolved, or `--export` was given and the report file cannot be written.
pub(crate) async fn run_analyze(config: &AppConfig, args: &AnalyzeArgs) -> anyhow::Result<()> {
    let result = estimate(config, &args.estimate).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result.metrics)?);
    } else {
        if let Some(name) = &result.place_name {
            println!("{name}");
        }
        let theme = if args.dark { Theme::Dark } else { Theme::Light };
        let palette = Palette::for_theme(theme, std::io::stdout().is_terminal());
        println!(
            "{}",
            render_cards(result.point, &result.metrics, &result.config, palette)
        );
    }

    if args.export {
        let path = export_report(
            &config.report_dir,
            &result.metrics,
            result.point,
            &result.config,
            SystemClock.now(),
        )?;
        eprintln!("Report saved to {}", path.display());
    }

    Ok(())
}

/// Runs `report`: prints the full text report, or saves it with `--save`.
///
/// # Errors
///
/// Returns an error if a parameter override is invalid, the location cannot
/// be resolved, or the report file cannot be written.
pub(crate) async fn run_report(config: &AppConfig, args: &ReportArgs) -> anyhow::Result<()> {
    let result = estimate(config, &args.estimate).await?;

    if args.save {
        let dir = args.out_dir.as_ref().unwrap_or(&config.report_dir);
        let path = export_report(
            dir,
            &result.metrics,
            result.point,
            &result.config,
            SystemClock.now(),
        )?;
        println!("Report saved to {}", path.display());
    } else {
        print!(
            "{}",
            format_report(&result.metrics, result.point, &result.config, SystemClock.now())
        );
    }

    Ok(())
}
