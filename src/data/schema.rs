use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::{Dataset, RawTable, Record, HUMIDITY, TEMPERATURE, TIMESTAMP, WATER_LEVEL};
use crate::error::SchemaError;

// ---------------------------------------------------------------------------
// Column requirements
// ---------------------------------------------------------------------------

/// How strongly the pipeline depends on a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// Absence blocks every stage.
    Hard,
    /// Absence only blocks the metrics that read the column.
    Soft,
}

/// Known columns in the order they are checked.
pub const COLUMN_REQUIREMENTS: [(&str, Requirement); 4] = [
    (WATER_LEVEL, Requirement::Hard),
    (TIMESTAMP, Requirement::Hard),
    (HUMIDITY, Requirement::Soft),
    (TEMPERATURE, Requirement::Soft),
];

/// Requirement level of a known column; `None` for free-form extra columns.
pub fn requirement(column: &str) -> Option<Requirement> {
    COLUMN_REQUIREMENTS
        .iter()
        .find(|(name, _)| *name == column)
        .map(|(_, req)| *req)
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Check the column set and coerce every cell into a typed [`Record`].
///
/// Fails on the first problem found: a missing hard column, then the first
/// row (top to bottom) whose timestamp or water level cannot be read.
/// Blank or unreadable soft cells become `None` and only affect metrics.
pub fn validate(raw: &RawTable) -> Result<Dataset, SchemaError> {
    for (name, req) in COLUMN_REQUIREMENTS {
        if req == Requirement::Hard && raw.column_index(name).is_none() {
            return Err(SchemaError::MissingColumn(name.to_string()));
        }
    }

    let hard_index = |name: &str| {
        raw.column_index(name)
            .ok_or_else(|| SchemaError::MissingColumn(name.to_string()))
    };
    let ts_idx = hard_index(TIMESTAMP)?;
    let level_idx = hard_index(WATER_LEVEL)?;
    let humidity_idx = raw.column_index(HUMIDITY);
    let temperature_idx = raw.column_index(TEMPERATURE);

    let extra_cols: Vec<(usize, &String)> = raw
        .headers
        .iter()
        .enumerate()
        .filter(|(_, h)| requirement(h).is_none())
        .collect();

    let mut records = Vec::with_capacity(raw.len());
    let mut unreadable_soft = 0usize;

    for (row, cells) in raw.rows.iter().enumerate() {
        let cell = |idx: usize| cells.get(idx).map(String::as_str).unwrap_or("");

        let raw_ts = cell(ts_idx);
        let timestamp = parse_timestamp(raw_ts)
            .ok_or_else(|| SchemaError::InvalidTimestamp(row, raw_ts.to_string()))?;

        let water_level = parse_number(cell(level_idx), row, WATER_LEVEL)?;
        let mut soft = |idx: Option<usize>| {
            let value = idx.and_then(|i| parse_finite(cell(i)));
            if idx.is_some() && value.is_none() {
                unreadable_soft += 1;
            }
            value
        };
        let humidity = soft(humidity_idx);
        let temperature = soft(temperature_idx);

        let extra: BTreeMap<String, String> = extra_cols
            .iter()
            .map(|(idx, name)| (name.to_string(), cell(*idx).to_string()))
            .collect();

        records.push(Record {
            timestamp,
            water_level,
            humidity,
            temperature,
            extra,
        });
    }

    if unreadable_soft > 0 {
        log::warn!("{unreadable_soft} blank or unreadable humidity/temperature cells");
    }
    log::debug!(
        "Validated {} rows ({} extra columns)",
        records.len(),
        extra_cols.len()
    );

    Ok(Dataset::new(raw.headers.clone(), records))
}

fn parse_finite(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

fn parse_number(s: &str, row: usize, column: &str) -> Result<f64, SchemaError> {
    parse_finite(s).ok_or_else(|| SchemaError::InvalidNumber {
            row,
            column: column.to_string(),
            raw: s.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Timestamp coercion
// ---------------------------------------------------------------------------

const DATETIME_FMTS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// Bare dates are read as midnight.
const DATE_FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parse a timestamp cell. Values carrying a UTC offset (RFC 3339) are
/// normalised to UTC; everything else is taken as wall-clock time.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    DATETIME_FMTS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .or_else(|| {
            DATE_FMTS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], rows: &[&[&str]]) -> RawTable {
        RawTable::new(
            headers.iter().map(|h| h.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn missing_water_level_is_reported_before_anything_else() {
        // No timestamp either, and a garbage row: water_level still wins.
        let raw = table(&["humidity"], &[&["not a number"]]);
        assert_eq!(
            validate(&raw),
            Err(SchemaError::MissingColumn("water_level".into()))
        );
    }

    #[test]
    fn missing_timestamp_is_fatal() {
        let raw = table(&["water_level"], &[&["1.0"]]);
        assert_eq!(
            validate(&raw),
            Err(SchemaError::MissingColumn("timestamp".into()))
        );
    }

    #[test]
    fn soft_columns_may_be_absent() {
        let raw = table(&["timestamp", "water_level"], &[&["2024-01-01", "3"]]);
        let ds = validate(&raw).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].humidity, None);
        assert_eq!(ds.records()[0].temperature, None);
        assert!(!ds.has_column(HUMIDITY));
    }

    #[test]
    fn bad_timestamp_names_row_and_value() {
        let raw = table(
            &["timestamp", "water_level"],
            &[&["2024-01-01", "1"], &["next tuesday", "2"]],
        );
        assert_eq!(
            validate(&raw),
            Err(SchemaError::InvalidTimestamp(1, "next tuesday".into()))
        );
    }

    #[test]
    fn unreadable_water_level_is_rejected() {
        let raw = table(
            &["timestamp", "water_level", "humidity"],
            &[&["2024-01-01", "1", "50"], &["2024-01-02", "NaN", "50"]],
        );
        assert_eq!(
            validate(&raw),
            Err(SchemaError::InvalidNumber {
                row: 1,
                column: "water_level".into(),
                raw: "NaN".into(),
            })
        );

        let raw = table(&["timestamp", "water_level"], &[&["2024-01-01", ""]]);
        assert!(matches!(
            validate(&raw),
            Err(SchemaError::InvalidNumber { row: 0, .. })
        ));
    }

    #[test]
    fn blank_or_unreadable_soft_cells_become_none() {
        let raw = table(
            &["timestamp", "water_level", "humidity", "temperature"],
            &[
                &["2024-01-01", "10", "", "20"],
                &["2024-01-02", "11", "n/a", "inf"],
                &["2024-01-03", "12", "55", "21"],
            ],
        );
        let ds = validate(&raw).unwrap();
        let humidity: Vec<_> = ds.iter().map(|r| r.humidity).collect();
        let temperature: Vec<_> = ds.iter().map(|r| r.temperature).collect();
        assert_eq!(humidity, vec![None, None, Some(55.0)]);
        assert_eq!(temperature, vec![Some(20.0), None, Some(21.0)]);
        assert!(ds.has_column(HUMIDITY));
    }

    #[test]
    fn extra_columns_are_kept_verbatim() {
        let raw = table(
            &["station", "timestamp", "water_level"],
            &[&["HIN-01", "2024-01-01 06:30", "2.25"]],
        );
        let ds = validate(&raw).unwrap();
        assert_eq!(ds.columns(), ["station", "timestamp", "water_level"]);
        assert_eq!(ds.records()[0].extra["station"], "HIN-01");
        assert_eq!(ds.records()[0].water_level, 2.25);
    }

    #[test]
    fn timestamp_formats() {
        let noon = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        assert_eq!(parse_timestamp("2024-03-05 12:00:00"), Some(noon));
        assert_eq!(parse_timestamp("2024-03-05T12:00:00"), Some(noon));
        assert_eq!(parse_timestamp("2024-03-05 12:00"), Some(noon));
        assert_eq!(parse_timestamp("03/05/2024 12:00"), Some(noon));
        assert_eq!(parse_timestamp("2024-03-05T14:00:00+02:00"), Some(noon));
        assert_eq!(
            parse_timestamp("2024-03-05"),
            noon.date().and_hms_opt(0, 0, 0)
        );
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("05.03.2024"), None);
    }

    #[test]
    fn requirement_levels() {
        assert_eq!(requirement("water_level"), Some(Requirement::Hard));
        assert_eq!(requirement("timestamp"), Some(Requirement::Hard));
        assert_eq!(requirement("humidity"), Some(Requirement::Soft));
        assert_eq!(requirement("station"), None);
    }
}
