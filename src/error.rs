use thiserror::Error;

// ---------------------------------------------------------------------------
// Domain errors
// ---------------------------------------------------------------------------

/// Raised while turning a [`RawTable`](crate::data::model::RawTable) into a
/// validated dataset. Any of these halts the whole load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// A hard-required column is absent from the header row.
    #[error("The '{0}' column is not present in the dataset.")]
    MissingColumn(String),

    /// A timestamp cell could not be coerced (0-based data row, raw text).
    #[error("Row {0}: '{1}' is not a recognised timestamp")]
    InvalidTimestamp(usize, String),

    /// A numeric cell could not be read as a finite number.
    #[error("Row {row}, column '{column}': '{raw}' is not a finite number")]
    InvalidNumber {
        row: usize,
        column: String,
        raw: String,
    },
}

/// Raised by the metrics step only; table and export stay usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MetricsError {
    #[error("cannot compute averages over an empty dataset")]
    EmptyDataset,

    #[error("mean humidity is zero, temperature delta is undefined")]
    DivisionByZero,

    /// A soft column needed for an average is absent.
    #[error("the '{0}' column is required for metrics but is not present")]
    MissingColumn(String),

    /// A soft column is present but some rows have blank or unreadable cells.
    #[error("the '{0}' column has blank or unreadable cells")]
    IncompleteColumn(String),

    /// A mean or delta is not finite or does not fit a signed 64-bit integer.
    #[error("{0} is out of range")]
    OutOfRange(String),
}
