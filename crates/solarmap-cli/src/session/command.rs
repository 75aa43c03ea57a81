use solarmap_core::{GeoPoint, Parameter};

const MAX_ZOOM: f64 = 22.0;

pub(crate) const HELP: &str = "\
Commands:
  search <address | lat, lng>   find a place and analyze the building there
  click <lat>, <lng>            analyze the roof at a point
  move <lat>, <lng> [zoom]      recenter the map
  set <efficiency|loss|rate> <value>
                                change a solar parameter
  close                         close the results panel
  export                        save the current results as a text report
  theme                         switch between light and dark cards
  status                        show map, parameters and results state
  help                          show this help
  quit                          leave the session";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReplCommand {
    Empty,
    Search(String),
    Click(GeoPoint),
    Move { center: GeoPoint, zoom: Option<f64> },
    Set { param: Parameter, value: f64 },
    Close,
    Export,
    Theme,
    Status,
    Help,
    Quit,
}

/// Parses one input line. The error is a message for the user.
pub(crate) fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(ReplCommand::Empty);
    }
    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(verb, rest)| (verb, rest.trim()));

    match verb.to_ascii_lowercase().as_str() {
        "search" | "s" => {
            if rest.is_empty() {
                Err("usage: search <address | lat, lng>".to_string())
            } else {
                Ok(ReplCommand::Search(rest.to_string()))
            }
        }
        "click" | "c" => rest
            .parse::<GeoPoint>()
            .map(ReplCommand::Click)
            .map_err(|e| e.to_string()),
        "move" | "m" => parse_move(rest),
        "set" => parse_set(rest),
        "close" => Ok(ReplCommand::Close),
        "export" => Ok(ReplCommand::Export),
        "theme" => Ok(ReplCommand::Theme),
        "status" => Ok(ReplCommand::Status),
        "help" | "?" => Ok(ReplCommand::Help),
        "quit" | "exit" | "q" => Ok(ReplCommand::Quit),
        other => Err(format!("unknown command \"{other}\"; type `help`")),
    }
}

fn parse_move(rest: &str) -> Result<ReplCommand, String> {
    // "<lat>, <lng> <zoom>": try a trailing zoom first, then the whole input.
    if let Some((coords, zoom)) = rest.rsplit_once(char::is_whitespace) {
        if let (Ok(center), Ok(zoom)) = (coords.parse::<GeoPoint>(), zoom.parse::<f64>()) {
            if !(0.0..=MAX_ZOOM).contains(&zoom) {
                return Err(format!("zoom must be between 0 and {MAX_ZOOM}"));
            }
            return Ok(ReplCommand::Move {
                center,
                zoom: Some(zoom),
            });
        }
    }
    rest.parse::<GeoPoint>()
        .map(|center| ReplCommand::Move { center, zoom: None })
        .map_err(|e| e.to_string())
}

fn parse_set(rest: &str) -> Result<ReplCommand, String> {
    let usage = || "usage: set <efficiency|loss|rate> <value>".to_string();
    let (name, value) = rest.split_once(char::is_whitespace).ok_or_else(usage)?;
    let param = name.parse::<Parameter>().map_err(|e| e.to_string())?;
    let value = value.trim().parse::<f64>().map_err(|_| usage())?;
    Ok(ReplCommand::Set { param, value })
}
