//! Summary statistics for the KPI row: means of the three sensor channels
//! and their fixed-baseline display deltas.

use serde::Serialize;

use crate::data::model::{Dataset, Record, HUMIDITY, TEMPERATURE};
use crate::error::MetricsError;

// ---------------------------------------------------------------------------
// Baselines
// ---------------------------------------------------------------------------

/// Subtracted from the rounded mean water level.
pub const WATER_LEVEL_BASELINE: i64 = 10;
/// Subtracted from the truncated mean humidity.
pub const HUMIDITY_BASELINE: i64 = 10;
/// Scale applied to the rounded temperature/humidity ratio.
pub const TEMPERATURE_RATIO_SCALE: i64 = 100;

// ---------------------------------------------------------------------------
// MetricsSummary
// ---------------------------------------------------------------------------

/// Means and deltas for one dataset. Recomputed on demand, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSummary {
    pub rows: usize,
    pub mean_water_level: f64,
    pub mean_humidity: f64,
    pub mean_temperature: f64,
    /// `round(mean_water_level) - 10`, halves rounded away from zero
    pub water_level_delta: i64,
    /// `trunc(mean_humidity) - 10`
    pub humidity_delta: i64,
    /// `-round(mean_temperature / mean_humidity) * 100`
    pub temperature_delta: i64,
}

/// One KPI tile: label, display value, signed delta.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Kpi {
    pub label: &'static str,
    pub value: f64,
    pub delta: i64,
}

impl MetricsSummary {
    /// The three tiles as the dashboard shows them: water level and
    /// temperature to two decimals, humidity as a whole number.
    pub fn kpis(&self) -> [Kpi; 3] {
        [
            Kpi {
                label: "Water Level",
                value: round_to(self.mean_water_level, 2),
                delta: self.water_level_delta,
            },
            Kpi {
                label: "Humidity",
                value: self.mean_humidity.trunc(),
                delta: self.humidity_delta,
            },
            Kpi {
                label: "Temperature",
                value: round_to(self.mean_temperature, 2),
                delta: self.temperature_delta,
            },
        ]
    }
}

// ---------------------------------------------------------------------------
// Computation
// ---------------------------------------------------------------------------

/// Compute means and deltas over every row of `dataset`.
///
/// Errors, in the order they are checked:
/// * [`MetricsError::EmptyDataset`] – no rows
/// * [`MetricsError::MissingColumn`] – humidity or temperature column absent
/// * [`MetricsError::IncompleteColumn`] – a row lacks a humidity or temperature value
/// * [`MetricsError::OutOfRange`] – a mean overflowed to infinity
/// * [`MetricsError::DivisionByZero`] – humidity mean is exactly zero
/// * [`MetricsError::OutOfRange`] – a delta does not fit an `i64`
pub fn compute(dataset: &Dataset) -> Result<MetricsSummary, MetricsError> {
    if dataset.is_empty() {
        return Err(MetricsError::EmptyDataset);
    }

    let mean_water_level = mean(dataset.iter().map(|r| Some(r.water_level)))
        .ok_or(MetricsError::EmptyDataset)?;
    let mean_humidity = soft_mean(dataset, HUMIDITY, |r| r.humidity)?;
    let mean_temperature = soft_mean(dataset, TEMPERATURE, |r| r.temperature)?;

    for (name, value) in [
        ("mean water_level", mean_water_level),
        ("mean humidity", mean_humidity),
        ("mean temperature", mean_temperature),
    ] {
        if !value.is_finite() {
            return Err(MetricsError::OutOfRange(name.to_string()));
        }
    }

    if mean_humidity == 0.0 {
        return Err(MetricsError::DivisionByZero);
    }

    let water_level_delta = to_i64(mean_water_level.round(), "water level delta")?
        .checked_sub(WATER_LEVEL_BASELINE)
        .ok_or_else(|| out_of_range("water level delta"))?;
    let humidity_delta = to_i64(mean_humidity.trunc(), "humidity delta")?
        .checked_sub(HUMIDITY_BASELINE)
        .ok_or_else(|| out_of_range("humidity delta"))?;
    let temperature_delta = to_i64(
        (mean_temperature / mean_humidity).round(),
        "temperature delta",
    )?
    .checked_mul(TEMPERATURE_RATIO_SCALE)
    .and_then(i64::checked_neg)
    .ok_or_else(|| out_of_range("temperature delta"))?;

    let summary = MetricsSummary {
        rows: dataset.len(),
        mean_water_level,
        mean_humidity,
        mean_temperature,
        water_level_delta,
        humidity_delta,
        temperature_delta,
    };

    log::debug!("Computed metrics over {} rows: {:?}", summary.rows, summary);
    Ok(summary)
}

/// Mean of a soft column: absent column and blank cells are told apart.
fn soft_mean(
    dataset: &Dataset,
    column: &str,
    value: impl Fn(&Record) -> Option<f64>,
) -> Result<f64, MetricsError> {
    if !dataset.has_column(column) {
        return Err(MetricsError::MissingColumn(column.to_string()));
    }
    mean(dataset.iter().map(value))
        .ok_or_else(|| MetricsError::IncompleteColumn(column.to_string()))
}

/// Arithmetic mean; `None` if the iterator is empty or any value is missing.
fn mean(mut values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, count) = values.try_fold((0.0_f64, 0_usize), |(sum, n), v| {
        v.map(|v| (sum + v, n + 1))
    })?;
    (count > 0).then(|| sum / count as f64)
}

/// 2^63, the first magnitude past `i64::MAX`.
const I64_LIMIT: f64 = 9_223_372_036_854_775_808.0;

/// Exact conversion of an already integral value.
fn to_i64(value: f64, name: &str) -> Result<i64, MetricsError> {
    if value.is_finite() && value >= -I64_LIMIT && value < I64_LIMIT {
        Ok(value as i64)
    } else {
        Err(out_of_range(name))
    }
}

fn out_of_range(name: &str) -> MetricsError {
    MetricsError::OutOfRange(name.to_string())
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let scale = 10f64.powi(decimals);
    (value * scale).round() / scale
}
