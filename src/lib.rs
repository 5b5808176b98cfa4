//! Query and aggregation engine for a river flood-monitoring sensor log.
//!
//! A log of `timestamp`, `water_level`, `humidity` and `temperature`
//! readings is loaded and validated once, then summarised, narrowed to a
//! date range and exported as CSV. Rendering is left to the caller.

pub mod cli;
pub mod data;
pub mod error;
pub mod metrics;
pub mod series;
pub mod state;

pub use data::filter::{filter_by_range, RangeQuery};
pub use data::model::{Dataset, RawTable, Record};
pub use error::{MetricsError, SchemaError};
pub use metrics::{compute, MetricsSummary};
pub use state::{Session, SessionState};
