//! Domain core for the solar-potential estimator.
//!
//! Coordinates, the adjustable solar parameters, the mocked estimate engine,
//! the plain-text report, session state transitions and environment-driven
//! configuration. Nothing here performs network I/O.

pub mod app_config;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod geo;
pub mod report;
pub mod session;
pub mod solar_config;

pub use app_config::AppConfig;
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::{load_app_config, load_app_config_from_env};
pub use engine::{
    analyze, Payback, RandomSource, RngSource, ScriptedSource, SeededSource, SolarMetrics,
};
pub use error::{ConfigError, CoreError};
pub use geo::{parse_coordinate_pair, GeoPoint, DEFAULT_POINT};
pub use report::{export_report, format_report, report_filename};
pub use session::{
    AnalysisRequest, MapView, Outcome, Phase, RequestStamp, SessionEvent, SessionState, Theme,
};
pub use solar_config::{Parameter, SolarConfiguration};
