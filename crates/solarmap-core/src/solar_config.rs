//! User-adjustable parameters for the solar estimate.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CoreError;

pub const PANEL_EFFICIENCY_RANGE: RangeInclusive<f64> = 15.0..=25.0;
pub const SYSTEM_LOSS_RANGE: RangeInclusive<f64> = 10.0..=20.0;
pub const ELECTRICITY_RATE_RANGE: RangeInclusive<f64> = 0.08..=0.30;

/// Panel efficiency, system losses and the local electricity price.
///
/// Fields are public so tests and callers can build arbitrary values; anything
/// that originates from user input should pass through [`validate`](Self::validate)
/// or [`with`](Self::with).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SolarConfiguration {
    /// Module efficiency in percent (15–25).
    pub panel_efficiency_percent: f64,
    /// Inverter, wiring and soiling losses in percent (10–20).
    pub system_loss_percent: f64,
    /// Price per kWh in local currency (0.08–0.30).
    pub electricity_rate: f64,
}

impl Default for SolarConfiguration {
    fn default() -> Self {
        Self {
            panel_efficiency_percent: 20.0,
            system_loss_percent: 14.0,
            electricity_rate: 0.12,
        }
    }
}

impl SolarConfiguration {
    /// Checks every field against its allowed range.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] naming the first offending field.
    pub fn validate(&self) -> Result<(), CoreError> {
        for param in Parameter::ALL {
            check_range(param, self.get(param))?;
        }
        Ok(())
    }

    /// Returns a copy with one parameter replaced, validating the new value.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::OutOfRange`] if `value` is outside the parameter's range.
    pub fn with(self, param: Parameter, value: f64) -> Result<Self, CoreError> {
        check_range(param, value)?;
        let mut next = self;
        match param {
            Parameter::PanelEfficiency => next.panel_efficiency_percent = value,
            Parameter::SystemLoss => next.system_loss_percent = value,
            Parameter::ElectricityRate => next.electricity_rate = value,
        }
        Ok(next)
    }

    #[must_use]
    pub fn get(&self, param: Parameter) -> f64 {
        match param {
            Parameter::PanelEfficiency => self.panel_efficiency_percent,
            Parameter::SystemLoss => self.system_loss_percent,
            Parameter::ElectricityRate => self.electricity_rate,
        }
    }
}

fn check_range(param: Parameter, value: f64) -> Result<(), CoreError> {
    let range = param.range();
    if value.is_finite() && range.contains(&value) {
        Ok(())
    } else {
        Err(CoreError::OutOfRange {
            field: param.field_name(),
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

/// One adjustable field of [`SolarConfiguration`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Parameter {
    PanelEfficiency,
    SystemLoss,
    ElectricityRate,
}

impl Parameter {
    pub const ALL: [Parameter; 3] = [
        Parameter::PanelEfficiency,
        Parameter::SystemLoss,
        Parameter::ElectricityRate,
    ];

    #[must_use]
    pub fn range(self) -> RangeInclusive<f64> {
        match self {
            Parameter::PanelEfficiency => PANEL_EFFICIENCY_RANGE,
            Parameter::SystemLoss => SYSTEM_LOSS_RANGE,
            Parameter::ElectricityRate => ELECTRICITY_RATE_RANGE,
        }
    }

    fn field_name(self) -> &'static str {
        match self {
            Parameter::PanelEfficiency => "panel efficiency",
            Parameter::SystemLoss => "system loss",
            Parameter::ElectricityRate => "electricity rate",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Parameter::PanelEfficiency => write!(f, "efficiency"),
            Parameter::SystemLoss => write!(f, "loss"),
            Parameter::ElectricityRate => write!(f, "rate"),
        }
    }
}

impl FromStr for Parameter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "efficiency" | "panel-efficiency" => Ok(Parameter::PanelEfficiency),
            "loss" | "system-loss" => Ok(Parameter::SystemLoss),
            "rate" | "electricity-rate" => Ok(Parameter::ElectricityRate),
            other => Err(CoreError::UnknownParameter(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = SolarConfiguration::default();
        assert!(cfg.validate().is_ok());
        assert!((cfg.panel_efficiency_percent - 20.0).abs() < f64::EPSILON);
        assert!((cfg.system_loss_percent - 14.0).abs() < f64::EPSILON);
        assert!((cfg.electricity_rate - 0.12).abs() < f64::EPSILON);
    }

    #[test]
    fn validate_reports_first_bad_field() {
        let cfg = SolarConfiguration {
            electricity_rate: 0.0,
            ..SolarConfiguration::default()
        };
        let err = cfg.validate().unwrap_err();
        assert!(
            matches!(err, CoreError::OutOfRange { field: "electricity rate", .. }),
            "got: {err:?}"
        );
    }

    #[test]
    fn with_replaces_single_field() {
        let cfg = SolarConfiguration::default()
            .with(Parameter::SystemLoss, 18.5)
            .expect("18.5 is in range");
        assert!((cfg.system_loss_percent - 18.5).abs() < f64::EPSILON);
        assert!((cfg.panel_efficiency_percent - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn with_rejects_out_of_range_and_nan() {
        let base = SolarConfiguration::default();
        assert!(base.with(Parameter::PanelEfficiency, 30.0).is_err());
        assert!(base.with(Parameter::PanelEfficiency, f64::NAN).is_err());
        assert!(base.with(Parameter::ElectricityRate, 0.31).is_err());
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let base = SolarConfiguration::default();
        assert!(base.with(Parameter::PanelEfficiency, 15.0).is_ok());
        assert!(base.with(Parameter::PanelEfficiency, 25.0).is_ok());
        assert!(base.with(Parameter::ElectricityRate, 0.08).is_ok());
        assert!(base.with(Parameter::ElectricityRate, 0.30).is_ok());
    }

    #[test]
    fn parameter_from_str_accepts_aliases() {
        assert_eq!("efficiency".parse::<Parameter>().unwrap(), Parameter::PanelEfficiency);
        assert_eq!("LOSS".parse::<Parameter>().unwrap(), Parameter::SystemLoss);
        assert_eq!(
            "electricity-rate".parse::<Parameter>().unwrap(),
            Parameter::ElectricityRate
        );
        assert!(matches!(
            "tilt".parse::<Parameter>(),
            Err(CoreError::UnknownParameter(ref p)) if p == "tilt"
        ));
    }
}
