use chrono::{NaiveDate, NaiveDateTime};

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Range query: an optional closed time interval
// ---------------------------------------------------------------------------

/// Inclusive `[start, end]` bounds on the timestamp column.
///
/// Filtering is all-or-nothing: unless *both* bounds are set the query
/// matches the whole dataset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RangeQuery {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

impl RangeQuery {
    pub fn new(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> Self {
        RangeQuery { start, end }
    }

    /// Build a query from date-picker values. Each date becomes midnight at
    /// the start of that day, so `end` only admits readings stamped exactly
    /// at 00:00 on the end date.
    pub fn from_dates(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        RangeQuery {
            start: start.and_then(|d| d.and_hms_opt(0, 0, 0)),
            end: end.and_then(|d| d.and_hms_opt(0, 0, 0)),
        }
    }

    /// The query that matches everything.
    pub fn unbounded() -> Self {
        RangeQuery::default()
    }

    /// Both bounds, if and only if both are present.
    pub fn bounds(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        self.start.zip(self.end)
    }

    /// Whether applying this query narrows anything at all.
    pub fn is_active(&self) -> bool {
        self.bounds().is_some()
    }

    pub fn apply(&self, full: &Dataset) -> Dataset {
        filter_by_range(full, self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Filtering
// ---------------------------------------------------------------------------

/// Rows of `full` whose timestamp lies in `[start, end]`, in original order.
///
/// * Either bound missing → `full` itself (same row storage, nothing copied)
/// * `start > end`        → empty dataset
pub fn filter_by_range(
    full: &Dataset,
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Dataset {
    let Some((start, end)) = start.zip(end) else {
        return full.clone();
    };

    let records = full
        .iter()
        .filter(|r| r.timestamp >= start && r.timestamp <= end)
        .cloned()
        .collect();

    full.with_records(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    /// Deliberately not time-sorted.
    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new(at(3, 0), 3.0, Some(50.0), Some(20.0)),
            Record::new(at(1, 0), 1.0, Some(50.0), Some(20.0)),
            Record::new(at(2, 12), 2.5, Some(50.0), Some(20.0)),
            Record::new(at(2, 0), 2.0, Some(50.0), Some(20.0)),
        ])
    }

    fn levels(ds: &Dataset) -> Vec<f64> {
        ds.iter().map(|r| r.water_level).collect()
    }

    #[test]
    fn closed_interval_keeps_file_order() {
        let ds = sample();
        let out = filter_by_range(&ds, Some(at(2, 0)), Some(at(3, 0)));
        assert_eq!(levels(&out), vec![3.0, 2.5, 2.0]);
    }

    #[test]
    fn full_span_returns_everything() {
        let ds = sample();
        let out = filter_by_range(&ds, Some(at(1, 0)), Some(at(3, 0)));
        assert_eq!(out, ds);
    }

    #[test]
    fn inverted_bounds_yield_empty() {
        let ds = sample();
        let out = filter_by_range(&ds, Some(at(3, 0)), Some(at(1, 0)));
        assert!(out.is_empty());
        assert_eq!(out.columns(), ds.columns());
    }

    #[test]
    fn one_sided_bounds_do_not_filter() {
        let ds = sample();
        let left = filter_by_range(&ds, Some(at(2, 0)), None);
        let right = filter_by_range(&ds, None, Some(at(2, 0)));
        assert!(left.shares_rows_with(&ds));
        assert!(right.shares_rows_with(&ds));
        assert_eq!(left.len(), 4);
    }

    #[test]
    fn date_bounds_are_midnight() {
        let ds = sample();
        let day2 = NaiveDate::from_ymd_opt(2024, 1, 2);
        let query = RangeQuery::from_dates(day2, day2);
        assert!(query.is_active());
        // 2024-01-02 12:00 is past the midnight end bound.
        assert_eq!(levels(&query.apply(&ds)), vec![2.0]);
    }

    #[test]
    fn unbounded_query_is_inactive() {
        assert!(!RangeQuery::unbounded().is_active());
        assert!(!RangeQuery::new(Some(at(1, 0)), None).is_active());
    }
}
