//! Session state and its transition function.
//!
//! All mutation goes through [`SessionState::apply`]. Asynchronous work
//! (geocoding, the simulated analysis delay) is tagged with a [`RequestStamp`]
//! when it starts; a completion whose stamp is no longer the one the state is
//! waiting for is discarded and reported as [`Outcome::Stale`].
//!
//! Selecting a new point while an analysis is in flight cancels and replaces
//! it: the newer stamp wins and the older completion becomes stale.

use crate::engine::SolarMetrics;
use crate::geo::GeoPoint;
use crate::solar_config::SolarConfiguration;

/// Zoom level used when the map first opens.
pub const INITIAL_ZOOM: f64 = 15.0;
/// Zoom level the map flies to after a search resolves to a building.
pub const BUILDING_ZOOM: f64 = 19.0;

/// Monotonically increasing identifier for an asynchronous request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestStamp(u64);

impl RequestStamp {
    #[must_use]
    pub fn value(self) -> u64 {
        self.0
    }
}

/// A point submitted for analysis, with the configuration in force when it
/// was submitted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisRequest {
    pub stamp: RequestStamp,
    pub point: GeoPoint,
    pub config: SolarConfiguration,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    Idle,
    Analyzing(AnalysisRequest),
    Resolved {
        request: AnalysisRequest,
        metrics: SolarMetrics,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: GeoPoint,
    pub zoom: f64,
}

/// Named inputs to [`SessionState::apply`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionEvent {
    MapMoved { center: GeoPoint, zoom: f64 },
    ConfigChanged(SolarConfiguration),
    ToggleTheme,
    /// A point was picked on the map (or typed as coordinates).
    Select(GeoPoint),
    /// The analysis for `stamp` finished.
    Complete {
        stamp: RequestStamp,
        metrics: SolarMetrics,
    },
    /// The results panel was closed.
    Close,
    SearchStarted,
    SearchResolved {
        stamp: RequestStamp,
        point: GeoPoint,
    },
    SearchFailed {
        stamp: RequestStamp,
    },
}

/// What a transition did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Outcome {
    Applied,
    /// Nothing to do in the current phase (e.g. closing an idle panel with
    /// no search pending).
    Unchanged,
    /// A new analysis was started; the caller should run it.
    AnalysisStarted(AnalysisRequest),
    /// A new geocode lookup was registered; the caller should run it.
    SearchStarted(RequestStamp),
    /// The completion carried a superseded stamp and was dropped.
    Stale,
}

#[derive(Debug, Clone)]
pub struct SessionState {
    map: MapView,
    config: SolarConfiguration,
    phase: Phase,
    theme: Theme,
    pending_search: Option<RequestStamp>,
    last_stamp: u64,
}

impl SessionState {
    #[must_use]
    pub fn new(home: GeoPoint, config: SolarConfiguration) -> Self {
        Self {
            map: MapView {
                center: home,
                zoom: INITIAL_ZOOM,
            },
            config,
            phase: Phase::Idle,
            theme: Theme::default(),
            pending_search: None,
            last_stamp: 0,
        }
    }

    #[must_use]
    pub fn map(&self) -> MapView {
        self.map
    }

    #[must_use]
    pub fn config(&self) -> &SolarConfiguration {
        &self.config
    }

    #[must_use]
    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    #[must_use]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[must_use]
    pub fn is_analyzing(&self) -> bool {
        matches!(self.phase, Phase::Analyzing(_))
    }

    #[must_use]
    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some()
    }

    #[must_use]
    pub fn metrics(&self) -> Option<&SolarMetrics> {
        match &self.phase {
            Phase::Resolved { metrics, .. } => Some(metrics),
            _ => None,
        }
    }

    /// The finished request and its metrics, if the panel is showing results.
    #[must_use]
    pub fn resolved(&self) -> Option<(&AnalysisRequest, &SolarMetrics)> {
        match &self.phase {
            Phase::Resolved { request, metrics } => Some((request, metrics)),
            _ => None,
        }
    }

    #[must_use]
    pub fn selected_point(&self) -> Option<GeoPoint> {
        match self.phase {
            Phase::Idle => None,
            Phase::Analyzing(request) | Phase::Resolved { request, .. } => Some(request.point),
        }
    }

    /// Applies one event. Every event is accepted in every phase.
    pub fn apply(&mut self, event: SessionEvent) -> Outcome {
        match event {
            SessionEvent::MapMoved { center, zoom } => {
                self.map = MapView { center, zoom };
                Outcome::Applied
            }
            SessionEvent::ConfigChanged(config) => {
                self.config = config;
                Outcome::Applied
            }
            SessionEvent::ToggleTheme => {
                self.theme = self.theme.toggled();
                Outcome::Applied
            }
            SessionEvent::Select(point) => {
                // A direct pick supersedes any lookup still in flight.
                self.pending_search = None;
                self.start_analysis(point)
            }
            SessionEvent::Complete { stamp, metrics } => match self.phase {
                Phase::Analyzing(request) if request.stamp == stamp => {
                    self.phase = Phase::Resolved { request, metrics };
                    Outcome::Applied
                }
                _ => {
                    tracing::debug!(stamp = stamp.value(), "discarding stale analysis completion");
                    Outcome::Stale
                }
            },
            SessionEvent::Close => {
                // Closing also abandons a lookup in flight, so its result
                // cannot reopen the panel.
                let had_search = self.pending_search.take().is_some();
                if matches!(self.phase, Phase::Idle) && !had_search {
                    Outcome::Unchanged
                } else {
                    self.phase = Phase::Idle;
                    Outcome::Applied
                }
            }
            SessionEvent::SearchStarted => {
                let stamp = self.next_stamp();
                self.pending_search = Some(stamp);
                Outcome::SearchStarted(stamp)
            }
            SessionEvent::SearchResolved { stamp, point } => {
                if self.pending_search != Some(stamp) {
                    tracing::debug!(stamp = stamp.value(), "discarding stale search result");
                    return Outcome::Stale;
                }
                self.pending_search = None;
                self.map = MapView {
                    center: point,
                    zoom: BUILDING_ZOOM,
                };
                self.start_analysis(point)
            }
            SessionEvent::SearchFailed { stamp } => {
                if self.pending_search == Some(stamp) {
                    self.pending_search = None;
                    Outcome::Applied
                } else {
                    Outcome::Stale
                }
            }
        }
    }

    fn start_analysis(&mut self, point: GeoPoint) -> Outcome {
        let request = AnalysisRequest {
            stamp: self.next_stamp(),
            point,
            config: self.config,
        };
        self.phase = Phase::Analyzing(request);
        Outcome::AnalysisStarted(request)
    }

    fn next_stamp(&mut self) -> RequestStamp {
        self.last_stamp += 1;
        RequestStamp(self.last_stamp)
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
