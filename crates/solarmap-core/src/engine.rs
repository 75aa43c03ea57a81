//! Mocked solar-potential estimate for a single roof.
//!
//! The roof area and irradiance are drawn from an injected [`RandomSource`];
//! every other figure is a fixed arithmetic derivation from those two draws
//! and the [`SolarConfiguration`]. Given the same draws the result is always
//! identical, which is what the tests rely on.

use std::collections::VecDeque;
use std::fmt;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Serialize, Serializer};

use crate::geo::GeoPoint;
use crate::solar_config::SolarConfiguration;

const ROOF_AREA_BASE_M2: f64 = 120.0;
const ROOF_AREA_SPREAD_M2: f64 = 80.0;
const USABLE_ROOF_SHARE: f64 = 0.8;
const BASE_IRRADIANCE: u32 = 1500;
const IRRADIANCE_SPREAD: f64 = 300.0;
/// Annual yield per installed kW before losses (kWh/kW/yr).
pub const SPECIFIC_YIELD_KWH_PER_KW: f64 = 1300.0;
/// Grid emission factor (kg CO2 per kWh).
pub const CO2_KG_PER_KWH: f64 = 0.4;
/// Installed cost per kW, in the same currency as the electricity rate.
pub const SYSTEM_COST_PER_KW: u32 = 2500;

/// Source of uniformly distributed values.
pub trait RandomSource {
    /// Returns a value in `[low, high)`. Implementations return `low` when the
    /// range is empty.
    fn uniform(&mut self, low: f64, high: f64) -> f64;
}

/// [`RandomSource`] backed by any `rand` generator.
#[derive(Debug, Clone)]
pub struct RngSource<R> {
    rng: R,
}

/// The concrete source used outside tests.
pub type SeededSource = RngSource<StdRng>;

impl RngSource<StdRng> {
    /// Reproducible source: the same seed always yields the same draws.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Source seeded from the operating system.
    #[must_use]
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }
}

impl<R: Rng> RngSource<R> {
    /// Derives an independent seeded source, for handing to a spawned task.
    pub fn fork(&mut self) -> SeededSource {
        RngSource::seeded(self.rng.random())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn uniform(&mut self, low: f64, high: f64) -> f64 {
        if high <= low {
            return low;
        }
        self.rng.random_range(low..high)
    }
}

/// Replays a fixed list of draws, then keeps returning the lower bound.
///
/// Draws are absolute values, not fractions of the range.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    draws: VecDeque<f64>,
}

impl ScriptedSource {
    pub fn new(draws: impl IntoIterator<Item = f64>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
        }
    }
}

impl RandomSource for ScriptedSource {
    fn uniform(&mut self, low: f64, _high: f64) -> f64 {
        self.draws.pop_front().unwrap_or(low)
    }
}

/// Years until cumulative savings cover the installed cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Payback {
    /// Rounded to one decimal place.
    Years(f64),
    /// Monthly savings are zero, so the period is unbounded.
    Undefined,
}

impl Payback {
    #[must_use]
    pub fn years(self) -> Option<f64> {
        match self {
            Payback::Years(y) => Some(y),
            Payback::Undefined => None,
        }
    }
}

impl fmt::Display for Payback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payback::Years(y) => write!(f, "{y:.1} years"),
            Payback::Undefined => write!(f, "N/A"),
        }
    }
}

fn serialize_payback<S: Serializer>(payback: &Payback, serializer: S) -> Result<S::Ok, S::Error> {
    payback.years().serialize(serializer)
}

/// Derived figures for one analyzed roof.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarMetrics {
    pub roof_area_m2: u32,
    pub usable_area_m2: u32,
    /// kWh/m²/yr.
    pub annual_irradiance: u32,
    pub system_size_kw: u32,
    pub annual_production_kwh: u32,
    pub co2_savings_kg: u32,
    pub monthly_savings: u32,
    #[serde(rename = "payback_years", serialize_with = "serialize_payback")]
    pub payback: Payback,
}

impl SolarMetrics {
    /// Installed cost estimate (`system_size_kw × SYSTEM_COST_PER_KW`).
    #[must_use]
    pub fn system_cost(&self) -> u64 {
        u64::from(self.system_size_kw) * u64::from(SYSTEM_COST_PER_KW)
    }

    #[must_use]
    pub fn annual_savings(&self) -> u64 {
        u64::from(self.monthly_savings) * 12
    }
}

/// Computes the solar estimate for `point`.
///
/// Draws the roof area first and the irradiance second; stubs must supply
/// values in that order.
pub fn analyze<R>(point: GeoPoint, config: &SolarConfiguration, randomness: &mut R) -> SolarMetrics
where
    R: RandomSource + ?Sized,
{
    let roof_area_m2 =
        round_whole(ROOF_AREA_BASE_M2 + randomness.uniform(0.0, ROOF_AREA_SPREAD_M2));
    let usable_area_m2 = round_whole(f64::from(roof_area_m2) * USABLE_ROOF_SHARE);
    let system_size_kw =
        round_whole(f64::from(usable_area_m2) * config.panel_efficiency_percent / 100.0);
    let annual_irradiance =
        BASE_IRRADIANCE + round_whole(randomness.uniform(0.0, IRRADIANCE_SPREAD));
    let annual_production_kwh = round_whole(
        f64::from(system_size_kw)
            * SPECIFIC_YIELD_KWH_PER_KW
            * (1.0 - config.system_loss_percent / 100.0),
    );
    let co2_savings_kg = round_whole(f64::from(annual_production_kwh) * CO2_KG_PER_KWH);
    let monthly_savings =
        round_whole(f64::from(annual_production_kwh) * config.electricity_rate / 12.0);
    let payback = payback_period(system_size_kw, monthly_savings);

    tracing::debug!(
        latitude = point.latitude(),
        longitude = point.longitude(),
        roof_area_m2,
        system_size_kw,
        annual_production_kwh,
        "solar estimate computed"
    );

    SolarMetrics {
        roof_area_m2,
        usable_area_m2,
        annual_irradiance,
        system_size_kw,
        annual_production_kwh,
        co2_savings_kg,
        monthly_savings,
        payback,
    }
}

fn payback_period(system_size_kw: u32, monthly_savings: u32) -> Payback {
    if monthly_savings == 0 {
        return Payback::Undefined;
    }
    let cost = f64::from(system_size_kw) * f64::from(SYSTEM_COST_PER_KW);
    let years = cost / (f64::from(monthly_savings) * 12.0);
    Payback::Years((years * 10.0).round() / 10.0)
}

/// Rounds half away from zero; negative and non-finite inputs clamp to 0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn round_whole(value: f64) -> u32 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(f64::from(u32::MAX)) as u32
}
