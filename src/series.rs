//! Chart feeds: plain point lists for the renderer, in dataset order.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::data::model::Dataset;

/// One point of the water-level line chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub timestamp: NaiveDateTime,
    pub value: f64,
}

/// One point of the humidity/temperature scatter.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub humidity: f64,
    pub temperature: f64,
}

/// Water level over time.
pub fn water_level_series(dataset: &Dataset) -> Vec<SeriesPoint> {
    dataset
        .iter()
        .map(|r| SeriesPoint {
            timestamp: r.timestamp,
            value: r.water_level,
        })
        .collect()
}

/// Humidity against temperature; rows lacking either are skipped.
pub fn humidity_temperature_points(dataset: &Dataset) -> Vec<ScatterPoint> {
    dataset
        .iter()
        .filter_map(|r| {
            Some(ScatterPoint {
                humidity: r.humidity?,
                temperature: r.temperature?,
            })
        })
        .collect()
}

/// Earliest and latest timestamp, regardless of row order.
pub fn time_span(dataset: &Dataset) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let first = dataset.iter().map(|r| r.timestamp).min()?;
    let last = dataset.iter().map(|r| r.timestamp).max()?;
    Some((first, last))
}
