//! Interactive session driving [`SessionState`].
//!
//! Stdin lines and background completions are multiplexed on one task. Every
//! state change goes through [`SessionState::apply`], so a lookup or analysis
//! that finishes after it was superseded is dropped there.

mod command;

use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;

use solarmap_core::{
    analyze, export_report, AnalysisRequest, AppConfig, Clock, Outcome, Phase, RequestStamp,
    SeededSource, SessionEvent, SessionState, SolarMetrics, SystemClock, Theme,
};
use solarmap_geocoder::Place;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;

use self::command::{parse_command, ReplCommand, HELP};
use crate::cards::{render_cards, Palette};
use crate::locator::Locator;

/// Work finished off the input loop.
#[derive(Debug)]
enum Completion {
    Search {
        stamp: RequestStamp,
        result: Result<Place, String>,
    },
    Analysis {
        stamp: RequestStamp,
        metrics: SolarMetrics,
    },
}

struct Session {
    state: SessionState,
    locator: Locator,
    rng: SeededSource,
    delay: Duration,
    color: bool,
    report_dir: PathBuf,
    tx: mpsc::UnboundedSender<Completion>,
}

/// Runs the session until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if reading stdin fails.
pub(crate) async fn run_session(config: &AppConfig, seed: Option<u64>) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let mut session = Session::new(config, seed, tx);
    session.color = std::io::stdout().is_terminal();

    if let Some(notice) = session.locator.blocked_notice() {
        println!("{notice}\n");
    }
    let map = session.state.map();
    println!(
        "Map centered on {} (zoom {}). Type `help` for commands.",
        map.center, map.zoom
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                match parse_command(&line) {
                    Ok(ReplCommand::Quit) => break,
                    Ok(command) => session.handle_command(command),
                    Err(message) => println!("{message}"),
                }
            }
            Some(completion) = rx.recv() => session.handle_completion(completion),
        }
    }

    tracing::debug!("session ended");
    Ok(())
}

impl Session {
    fn new(config: &AppConfig, seed: Option<u64>, tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self {
            state: SessionState::new(config.home_point(), config.solar),
            locator: Locator::from_config(config),
            rng: seed.map_or_else(SeededSource::from_os_rng, SeededSource::seeded),
            delay: Duration::from_millis(config.analysis_delay_ms),
            color: false,
            report_dir: config.report_dir.clone(),
            tx,
        }
    }

    fn handle_command(&mut self, command: ReplCommand) {
        match command {
            ReplCommand::Empty | ReplCommand::Quit => {}
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Search(query) => {
                if let Outcome::SearchStarted(stamp) = self.state.apply(SessionEvent::SearchStarted)
                {
                    println!("Searching for \"{query}\" ...");
                    self.spawn_search(stamp, query);
                }
            }
            ReplCommand::Click(point) => {
                let outcome = self.state.apply(SessionEvent::Select(point));
                self.start_if_requested(outcome);
            }
            ReplCommand::Move { center, zoom } => {
                let zoom = zoom.unwrap_or(self.state.map().zoom);
                self.state.apply(SessionEvent::MapMoved { center, zoom });
                println!("Map centered on {center} (zoom {zoom})");
            }
            ReplCommand::Set { param, value } => match self.state.config().with(param, value) {
                Ok(updated) => {
                    self.state.apply(SessionEvent::ConfigChanged(updated));
                    println!("{param} set to {value}; analyze a location to use it.");
                }
                Err(e) => println!("{e}"),
            },
            ReplCommand::Close => match self.state.apply(SessionEvent::Close) {
                Outcome::Applied => println!("Results closed."),
                _ => println!("No results to close."),
            },
            ReplCommand::Export => self.export(),
            ReplCommand::Theme => {
                self.state.apply(SessionEvent::ToggleTheme);
                println!("Theme: {}", theme_name(self.state.theme()));
                self.print_cards();
            }
            ReplCommand::Status => self.print_status(),
        }
    }

    fn handle_completion(&mut self, completion: Completion) {
        match completion {
            Completion::Analysis { stamp, metrics } => {
                if self.state.apply(SessionEvent::Complete { stamp, metrics }) == Outcome::Applied {
                    self.print_cards();
                }
            }
            Completion::Search {
                stamp,
                result: Ok(place),
            } => {
                let outcome = self.state.apply(SessionEvent::SearchResolved {
                    stamp,
                    point: place.point,
                });
                if outcome != Outcome::Stale {
                    if let Some(name) = &place.name {
                        println!("Found: {name}");
                    }
                }
                self.start_if_requested(outcome);
            }
            Completion::Search {
                stamp,
                result: Err(message),
            } => {
                if self.state.apply(SessionEvent::SearchFailed { stamp }) == Outcome::Applied {
                    println!("{message}");
                }
            }
        }
    }

    fn start_if_requested(&mut self, outcome: Outcome) {
        if let Outcome::AnalysisStarted(request) = outcome {
            self.spawn_analysis(request);
        }
    }

    fn spawn_search(&self, stamp: RequestStamp, query: String) {
        let locator = self.locator.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = locator.locate(&query).await;
            if tx.send(Completion::Search { stamp, result }).is_err() {
                tracing::debug!(stamp = stamp.value(), "session closed before search finished");
            }
        });
    }

    fn spawn_analysis(&mut self, request: AnalysisRequest) {
        println!("Analyzing roof at {} ...", request.point);
        let mut randomness = self.rng.fork();
        let delay = self.delay;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let metrics = analyze(request.point, &request.config, &mut randomness);
            let stamp = request.stamp;
            if tx.send(Completion::Analysis { stamp, metrics }).is_err() {
                tracing::debug!(stamp = stamp.value(), "session closed before analysis finished");
            }
        });
    }

    fn print_cards(&self) {
        if let Some((request, metrics)) = self.state.resolved() {
            let palette = Palette::for_theme(self.state.theme(), self.color);
            println!(
                "{}",
                render_cards(request.point, metrics, &request.config, palette)
            );
        }
    }

    fn export(&self) {
        let Some((request, metrics)) = self.state.resolved() else {
            println!("Nothing to export yet; analyze a location first.");
            return;
        };
        match export_report(
            &self.report_dir,
            metrics,
            request.point,
            &request.config,
            SystemClock.now(),
        ) {
            Ok(path) => println!("Report saved to {}", path.display()),
            Err(e) => {
                tracing::error!(error = %e, "report export failed");
                println!("Export failed: {e}");
            }
        }
    }

    fn print_status(&self) {
        let map = self.state.map();
        let config = self.state.config();
        let results = match self.state.phase() {
            Phase::Idle => "none".to_string(),
            Phase::Analyzing(request) => format!("analyzing {}", request.point),
            Phase::Resolved { request, .. } => format!("ready for {}", request.point),
        };
        println!("Map:         {} (zoom {})", map.center, map.zoom);
        println!("Theme:       {}", theme_name(self.state.theme()));
        println!(
            "Parameters:  efficiency {}%, loss {}%, rate {}",
            config.panel_efficiency_percent, config.system_loss_percent, config.electricity_rate
        );
        println!(
            "Search:      {}",
            if self.state.is_searching() {
                "pending"
            } else {
                "idle"
            }
        );
        println!("Results:     {results}");
    }
}

fn theme_name(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "light",
        Theme::Dark => "dark",
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
