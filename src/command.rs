use crate::config::MAX_ZOOM;
use clap::{Parser, Subcommand};
use placemarks_core::entities::{Id, MapPoint};
use std::convert::Infallible;

const INPUT_TEMPLATE: &str = "{all-args}";

/// One line typed by the user.
#[derive(Debug, Parser)]
#[command(
    multicall = true,
    help_template = INPUT_TEMPLATE,
    subcommand_value_name = "COMMAND",
    subcommand_help_heading = "Commands"
)]
pub struct Input {
    #[command(subcommand)]
    pub command: Command,
}

impl Input {
    pub fn parse_line(line: &str) -> Result<Command, clap::Error> {
        Self::try_parse_from(line.split_whitespace()).map(|input| input.command)
    }
}

#[derive(Debug, Clone, PartialEq, Subcommand)]
pub enum Command {
    /// Click on the map, optionally on a point of interest
    Click {
        #[arg(allow_negative_numbers = true, value_parser = parse_lat)]
        lat: f64,
        #[arg(allow_negative_numbers = true, value_parser = parse_lng)]
        lng: f64,
        /// Id of the clicked point of interest
        poi_id: Option<Id>,
    },
    /// Remove a place by its sidebar row or its id
    #[command(visible_alias = "rm")]
    Remove {
        #[arg(value_name = "ROW|ID", value_parser = parse_target)]
        place: Target,
    },
    /// Hover a place in the sidebar
    Hover {
        #[arg(value_name = "ID|none", value_parser = parse_selection)]
        place: ::std::option::Option<Id>,
    },
    /// Select a place
    Select {
        #[arg(value_name = "ID|none", value_parser = parse_selection)]
        place: ::std::option::Option<Id>,
    },
    /// Show the sidebar
    #[command(visible_alias = "ls")]
    List,
    /// Scroll the sidebar
    Scroll {
        #[arg(allow_negative_numbers = true)]
        rows: isize,
    },
    /// Show the marker clusters
    Clusters,
    /// Change the zoom level
    Zoom {
        #[arg(value_parser = clap::value_parser!(u8).range(..=i64::from(MAX_ZOOM)))]
        level: u8,
    },
    /// Center the map on the current position
    Locate,
    /// Exit
    #[command(visible_alias = "exit")]
    Quit,
}

/// A place addressed by its (1-based) sidebar row or its id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    Row(usize),
    Id(Id),
}

fn parse_target(arg: &str) -> Result<Target, String> {
    match arg.parse::<usize>() {
        Ok(0) => Err("rows start at 1".to_string()),
        Ok(row) => Ok(Target::Row(row)),
        Err(_) => Ok(Target::Id(arg.into())),
    }
}

fn parse_selection(arg: &str) -> Result<Option<Id>, Infallible> {
    Ok((arg != "none").then(|| arg.into()))
}

fn parse_lat(arg: &str) -> Result<f64, String> {
    let lat = arg.parse::<f64>().map_err(|err| err.to_string())?;
    MapPoint::try_from_lat_lng_deg(lat, 0.0)
        .map(|pos| pos.lat)
        .ok_or_else(|| format!("{lat} is not within [-90, 90]"))
}

fn parse_lng(arg: &str) -> Result<f64, String> {
    let lng = arg.parse::<f64>().map_err(|err| err.to_string())?;
    MapPoint::try_from_lat_lng_deg(0.0, lng)
        .map(|pos| pos.lng)
        .ok_or_else(|| format!("{lng} is not within [-180, 180]"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{error::ErrorKind, CommandFactory};

    fn parse_err(line: &str) -> ErrorKind {
        Input::parse_line(line).unwrap_err().kind()
    }

    #[test]
    fn verify_commands() {
        Input::command().debug_assert();
    }

    #[test]
    fn parse_click() {
        assert_eq!(
            Command::Click {
                lat: 52.37,
                lng: 4.89,
                poi_id: None
            },
            Input::parse_line("click 52.37 4.89").unwrap()
        );
        assert_eq!(
            Command::Click {
                lat: -33.8568,
                lng: 151.2153,
                poi_id: Some("ChIJ123".into())
            },
            Input::parse_line("  click -33.8568   151.2153 ChIJ123 ").unwrap()
        );
    }

    #[test]
    fn parse_invalid_click() {
        assert_eq!(ErrorKind::MissingRequiredArgument, parse_err("click 52.37"));
        assert_eq!(ErrorKind::ValueValidation, parse_err("click north 4.89"));
        assert_eq!(ErrorKind::ValueValidation, parse_err("click 91 4.89"));
        assert_eq!(ErrorKind::ValueValidation, parse_err("click 52.37 -181"));
        assert_eq!(ErrorKind::UnknownArgument, parse_err("click 52.37 4.89 poi x"));
    }

    #[test]
    fn parse_remove_target() {
        assert_eq!(
            Command::Remove {
                place: Target::Row(2)
            },
            Input::parse_line("remove 2").unwrap()
        );
        assert_eq!(
            Command::Remove {
                place: Target::Id("ChIJ123".into())
            },
            Input::parse_line("rm ChIJ123").unwrap()
        );
        assert_eq!(ErrorKind::ValueValidation, parse_err("remove 0"));
        assert_eq!(ErrorKind::MissingRequiredArgument, parse_err("remove"));
    }

    #[test]
    fn parse_selection_values() {
        assert_eq!(Command::Hover { place: None }, Input::parse_line("hover none").unwrap());
        assert_eq!(
            Command::Select {
                place: Some("abc".into())
            },
            Input::parse_line("select abc").unwrap()
        );
        assert_eq!(ErrorKind::MissingRequiredArgument, parse_err("hover"));
    }

    #[test]
    fn parse_simple_commands() {
        assert_eq!(Command::List, Input::parse_line("ls").unwrap());
        assert_eq!(Command::Scroll { rows: -3 }, Input::parse_line("scroll -3").unwrap());
        assert_eq!(Command::Zoom { level: 12 }, Input::parse_line("zoom 12").unwrap());
        assert_eq!(Command::Clusters, Input::parse_line("clusters").unwrap());
        assert_eq!(Command::Locate, Input::parse_line("locate").unwrap());
        assert_eq!(Command::Quit, Input::parse_line("exit").unwrap());
    }

    #[test]
    fn reject_zoom_beyond_max() {
        assert_eq!(ErrorKind::ValueValidation, parse_err("zoom 23"));
    }

    #[test]
    fn reject_unknown_commands() {
        assert!(Input::parse_line("fly 1 2").is_err());
    }

    #[test]
    fn list_commands_in_help() {
        let err = Input::parse_line("help").unwrap_err();
        assert_eq!(ErrorKind::DisplayHelp, err.kind());
        let help = err.to_string();
        assert!(help.contains("click"));
        assert!(help.contains("Remove a place by its sidebar row or its id"));
    }
}
