use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

// ---------------------------------------------------------------------------
// Well-known column names
// ---------------------------------------------------------------------------

pub const TIMESTAMP: &str = "timestamp";
pub const WATER_LEVEL: &str = "water_level";
pub const HUMIDITY: &str = "humidity";
pub const TEMPERATURE: &str = "temperature";

/// Column order used when a dataset is built directly from records.
pub const STANDARD_COLUMNS: [&str; 4] = [TIMESTAMP, WATER_LEVEL, HUMIDITY, TEMPERATURE];

// ---------------------------------------------------------------------------
// RawTable – the ingested, not yet validated table
// ---------------------------------------------------------------------------

/// Header names plus text cells, in file order. Nothing has been coerced yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        RawTable { headers, rows }
    }

    /// Position of a column in the header row.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Number of data rows (header excluded).
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Record – one sensor reading
// ---------------------------------------------------------------------------

/// A single timestamped reading (one row of the sensor log).
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub timestamp: NaiveDateTime,
    pub water_level: f64,
    /// `None` when the column is absent or this cell is blank/unreadable.
    pub humidity: Option<f64>,
    /// `None` when the column is absent or this cell is blank/unreadable.
    pub temperature: Option<f64>,
    /// Any other input columns, kept verbatim: column_name → cell text.
    pub extra: BTreeMap<String, String>,
}

impl Record {
    pub fn new(
        timestamp: NaiveDateTime,
        water_level: f64,
        humidity: Option<f64>,
        temperature: Option<f64>,
    ) -> Self {
        Record {
            timestamp,
            water_level,
            humidity,
            temperature,
            extra: BTreeMap::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Dataset – validated, immutable, cheaply shareable
// ---------------------------------------------------------------------------

/// An ordered, immutable sequence of records plus the ingested column order.
///
/// Row storage sits behind an `Arc`, so cloning a dataset (or returning it
/// unfiltered) never copies rows. Every transformation builds a new value.
#[derive(Debug, Clone)]
pub struct Dataset {
    columns: Arc<[String]>,
    records: Arc<[Record]>,
}

impl Dataset {
    /// Build a dataset from an explicit column order and its records.
    pub fn new(columns: Vec<String>, records: Vec<Record>) -> Self {
        Dataset {
            columns: columns.into(),
            records: records.into(),
        }
    }

    /// Build a dataset with the standard four columns.
    pub fn from_records(records: Vec<Record>) -> Self {
        let columns = STANDARD_COLUMNS.iter().map(|c| c.to_string()).collect();
        Dataset::new(columns, records)
    }

    /// A new dataset with the same columns and a different set of rows.
    pub fn with_records(&self, records: Vec<Record>) -> Self {
        Dataset {
            columns: Arc::clone(&self.columns),
            records: records.into(),
        }
    }

    /// Column names in ingest order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True when both datasets point at the very same row storage.
    pub fn shares_rows_with(&self, other: &Dataset) -> bool {
        Arc::ptr_eq(&self.records, &other.records)
    }
}

impl PartialEq for Dataset {
    fn eq(&self, other: &Self) -> bool {
        self.columns == other.columns && self.records == other.records
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    #[test]
    fn clones_share_row_storage() {
        let ds = Dataset::from_records(vec![Record::new(at(1), 1.0, None, None)]);
        let copy = ds.clone();
        assert!(copy.shares_rows_with(&ds));

        let rebuilt = ds.with_records(ds.records().to_vec());
        assert!(!rebuilt.shares_rows_with(&ds));
        assert_eq!(rebuilt, ds);
    }

    #[test]
    fn raw_table_looks_up_columns_by_name() {
        let raw = RawTable::new(
            vec!["timestamp".into(), "water_level".into()],
            vec![vec!["2024-01-01".into(), "3".into()]],
        );
        assert_eq!(raw.column_index("water_level"), Some(1));
        assert_eq!(raw.column_index("humidity"), None);
        assert_eq!(raw.len(), 1);
    }
}
