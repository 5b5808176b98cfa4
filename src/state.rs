use std::path::Path;

use anyhow::Result;

use crate::data::export::{self, ExportFile};
use crate::data::filter::RangeQuery;
use crate::data::model::Dataset;
use crate::data::{loader, schema};
use crate::error::MetricsError;
use crate::metrics::{self, MetricsSummary};
use crate::series::{self, ScatterPoint, SeriesPoint};

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// Which dataset the session is currently working against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Full,
    Filtered,
}

/// One dashboard session, independent of rendering.
///
/// Holds the validated full dataset and the current working dataset. Every
/// range is applied to the full dataset, never to a previous result.
#[derive(Debug, Clone)]
pub struct Session {
    /// Validated dataset as loaded; never replaced.
    full: Dataset,

    /// Range that produced `current`.
    range: RangeQuery,

    /// Rows passing the current range (shares storage with `full` when
    /// no range is active).
    current: Dataset,
}

impl Session {
    /// Start a session on an already validated dataset.
    pub fn new(full: Dataset) -> Self {
        Session {
            current: full.clone(),
            range: RangeQuery::unbounded(),
            full,
        }
    }

    /// Load and validate a file. Schema problems abort the whole load.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = loader::load_file(path)?;
        let dataset = schema::validate(&raw)?;
        log::info!(
            "Loaded {} readings with columns {:?}",
            dataset.len(),
            dataset.columns()
        );
        Ok(Session::new(dataset))
    }

    pub fn full(&self) -> &Dataset {
        &self.full
    }

    pub fn current(&self) -> &Dataset {
        &self.current
    }

    pub fn range(&self) -> RangeQuery {
        self.range
    }

    pub fn state(&self) -> SessionState {
        if self.range.is_active() {
            SessionState::Filtered
        } else {
            SessionState::Full
        }
    }

    /// Re-derive the working dataset from the full one.
    pub fn apply_range(&mut self, range: RangeQuery) {
        self.current = range.apply(&self.full);
        self.range = range;
        log::debug!(
            "Range {:?}..={:?} kept {} of {} rows",
            range.start,
            range.end,
            self.current.len(),
            self.full.len()
        );
    }

    /// Drop any range and work on the full dataset again.
    pub fn reset(&mut self) {
        self.apply_range(RangeQuery::unbounded());
    }

    /// Metrics over the working dataset. Failure here does not affect
    /// [`Session::export`].
    pub fn metrics(&self) -> Result<MetricsSummary, MetricsError> {
        metrics::compute(&self.current)
    }

    /// Working dataset as a downloadable CSV file.
    pub fn export(&self) -> Result<ExportFile> {
        export::export(&self.current)
    }

    pub fn water_level_series(&self) -> Vec<SeriesPoint> {
        series::water_level_series(&self.current)
    }

    pub fn humidity_temperature_points(&self) -> Vec<ScatterPoint> {
        series::humidity_temperature_points(&self.current)
    }
}
