//! Command-line options for the dashboard front-end, parsed with `clap`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::data::filter::RangeQuery;

/// Summarise, filter and export a flood-monitoring sensor log
#[derive(Parser, Debug)]
#[command(name = "flood-dashboard", version, about)]
pub struct Args {
    /// Sensor log to load (.csv or .json)
    #[arg(short, long, default_value = "waterlevel.csv")]
    pub file: PathBuf,

    /// First day of the range, YYYY-MM-DD (needs --end to take effect)
    #[arg(long, value_parser = parse_date)]
    pub start: Option<NaiveDate>,

    /// Last day of the range, YYYY-MM-DD (needs --start to take effect)
    #[arg(long, value_parser = parse_date)]
    pub end: Option<NaiveDate>,

    /// Directory to write filtered_environmental_data.csv into
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Print metrics as JSON instead of a text block
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Print the water-level series and the humidity/temperature scatter points
    #[arg(long, default_value_t = false)]
    pub series: bool,

    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Args {
    pub fn range(&self) -> RangeQuery {
        RangeQuery::from_dates(self.start, self.end)
    }
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map_err(|_| format!("Invalid date '{s}'. Expected YYYY-MM-DD."))
}
