use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::model::{Dataset, Record, HUMIDITY, TEMPERATURE, TIMESTAMP, WATER_LEVEL};

// ---------------------------------------------------------------------------
// Download conventions
// ---------------------------------------------------------------------------

pub const EXPORT_FILE_NAME: &str = "filtered_environmental_data.csv";
pub const EXPORT_CONTENT_TYPE: &str = "text/csv";

/// Timestamps are written the way pandas writes `datetime64` columns; the
/// fraction is omitted when it is zero.
const TIMESTAMP_FMT: &str = "%Y-%m-%d %H:%M:%S%.f";

// ---------------------------------------------------------------------------
// Serialisation
// ---------------------------------------------------------------------------

/// Render a dataset as UTF-8 CSV: header row in ingest order, one line per
/// record, no index column. Numbers use their shortest exact form so that
/// re-parsing reproduces the same values.
pub fn serialize(dataset: &Dataset) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record(dataset.columns())
        .context("writing CSV header")?;

    for (row_no, record) in dataset.iter().enumerate() {
        let cells = dataset.columns().iter().map(|col| cell_text(record, col));
        writer
            .write_record(cells)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("flushing CSV buffer: {}", e.error()))
}

fn cell_text(record: &Record, column: &str) -> String {
    match column {
        TIMESTAMP => record.timestamp.format(TIMESTAMP_FMT).to_string(),
        WATER_LEVEL => record.water_level.to_string(),
        HUMIDITY => optional_number(record.humidity),
        TEMPERATURE => optional_number(record.temperature),
        other => record.extra.get(other).cloned().unwrap_or_default(),
    }
}

fn optional_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Downloadable file
// ---------------------------------------------------------------------------

/// Serialised dataset bundled with its download name and content type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl ExportFile {
    /// Write the file into `dir` under its fixed name; returns the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported {} bytes to {}", self.bytes.len(), path.display());
        Ok(path)
    }
}

/// Serialise `dataset` under the fixed download name.
pub fn export(dataset: &Dataset) -> Result<ExportFile> {
    Ok(ExportFile {
        file_name: EXPORT_FILE_NAME.to_string(),
        content_type: EXPORT_CONTENT_TYPE.to_string(),
        bytes: serialize(dataset)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::parse_csv;
    use crate::data::schema::validate;
    use chrono::NaiveDate;

    fn sample() -> Dataset {
        let t1 = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let t2 = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_milli_opt(6, 30, 15, 250)
            .unwrap();
        Dataset::from_records(vec![
            Record::new(t1, 10.0, Some(50.0), Some(20.0)),
            Record::new(t2, 20.125, Some(49.5), Some(-3.75)),
        ])
    }

    #[test]
    fn header_and_rows_without_index() {
        let text = String::from_utf8(serialize(&sample()).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "timestamp,water_level,humidity,temperature");
        assert_eq!(lines[1], "2024-01-01 00:00:00,10,50,20");
        assert_eq!(lines[2], "2024-01-02 06:30:15.250,20.125,49.5,-3.75");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn reparsing_reproduces_the_dataset() {
        let ds = sample();
        let bytes = serialize(&ds).unwrap();
        let back = validate(&parse_csv(&bytes).unwrap()).unwrap();
        assert_eq!(back, ds);
    }

    #[test]
    fn extra_and_missing_columns_round_trip() {
        let raw = parse_csv(b"station,timestamp,water_level\n\"Sison, SdN\",2024-01-01,4\n").unwrap();
        let ds = validate(&raw).unwrap();
        let bytes = serialize(&ds).unwrap();
        assert_eq!(
            String::from_utf8(bytes.clone()).unwrap(),
            "station,timestamp,water_level\n\"Sison, SdN\",2024-01-01 00:00:00,4\n"
        );
        assert_eq!(validate(&parse_csv(&bytes).unwrap()).unwrap(), ds);
    }

    #[test]
    fn empty_dataset_is_just_a_header() {
        let ds = sample().with_records(Vec::new());
        let bytes = serialize(&ds).unwrap();
        assert_eq!(bytes, b"timestamp,water_level,humidity,temperature\n");
    }

    #[test]
    fn export_uses_fixed_name_and_type() {
        let file = export(&sample()).unwrap();
        assert_eq!(file.file_name, "filtered_environmental_data.csv");
        assert_eq!(file.content_type, "text/csv");
        assert!(file.bytes.starts_with(b"timestamp,"));
    }
}
