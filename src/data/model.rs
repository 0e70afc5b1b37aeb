use std::collections::BTreeSet;

use super::error::DataError;

/// Year every displayed difference is measured against.
pub const DEFAULT_BASELINE_YEAR: i32 = 2015;

// ---------------------------------------------------------------------------
// TemperatureRecord – one row of the source file
// ---------------------------------------------------------------------------

/// Annual global mean near-surface air temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureRecord {
    pub year: i32,
    /// Mean temperature in Kelvin (`tas_K` in the source file).
    pub tas_k: f64,
    /// Anomaly in Kelvin (`anomaly_K`). Loaded and validated, not charted.
    pub anomaly_k: f64,
}

impl TemperatureRecord {
    pub fn new(year: i32, tas_k: f64, anomaly_k: f64) -> Self {
        Self {
            year,
            tas_k,
            anomaly_k,
        }
    }
}

// ---------------------------------------------------------------------------
// TemperatureDataset – the validated, immutable series
// ---------------------------------------------------------------------------

/// A non-empty series of records with unique years that is known to contain
/// its baseline year. Record order is kept exactly as loaded.
#[derive(Debug, Clone)]
pub struct TemperatureDataset {
    records: Vec<TemperatureRecord>,
    baseline_year: i32,
    baseline_index: usize,
}

impl TemperatureDataset {
    /// Validate `records` and build the dataset.
    pub fn from_records(
        records: Vec<TemperatureRecord>,
        baseline_year: i32,
    ) -> Result<Self, DataError> {
        if records.is_empty() {
            return Err(DataError::Empty);
        }

        let mut seen = BTreeSet::new();
        for rec in &records {
            if !seen.insert(rec.year) {
                return Err(DataError::DuplicateYear { year: rec.year });
            }
        }

        let baseline_index = records
            .iter()
            .position(|r| r.year == baseline_year)
            .ok_or(DataError::BaselineMissing {
                year: baseline_year,
            })?;

        Ok(Self {
            records,
            baseline_year,
            baseline_index,
        })
    }

    pub fn records(&self) -> &[TemperatureRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn baseline_year(&self) -> i32 {
        self.baseline_year
    }

    pub fn baseline(&self) -> &TemperatureRecord {
        &self.records[self.baseline_index]
    }

    /// `(min, max)` over all years.
    pub fn year_range(&self) -> (i32, i32) {
        self.records
            .iter()
            .fold((i32::MAX, i32::MIN), |(lo, hi), r| {
                (lo.min(r.year), hi.max(r.year))
            })
    }

    /// `(min, max)` over all mean temperatures.
    pub fn tas_range(&self) -> (f64, f64) {
        self.records
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), r| {
                (lo.min(r.tas_k), hi.max(r.tas_k))
            })
    }

    /// Nearest-year resolution.
    ///
    /// Scans left to right and only replaces the current best when a record
    /// is *strictly* closer, so on an exact tie the earlier record wins.
    pub fn resolve(&self, requested_year: f64) -> &TemperatureRecord {
        let distance = |r: &TemperatureRecord| (f64::from(r.year) - requested_year).abs();

        let mut best = &self.records[0];
        let mut best_distance = distance(best);
        for rec in &self.records[1..] {
            let d = distance(rec);
            if d < best_distance {
                best = rec;
                best_distance = d;
            }
        }
        best
    }

    /// Signed difference of `record` against the baseline record.
    pub fn diff_from_baseline(&self, record: &TemperatureRecord) -> f64 {
        record.tas_k - self.baseline().tas_k
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn three_years() -> TemperatureDataset {
        TemperatureDataset::from_records(
            vec![
                TemperatureRecord::new(2014, 288.50, 0.0),
                TemperatureRecord::new(2015, 288.70, 0.2),
                TemperatureRecord::new(2016, 289.10, 0.6),
            ],
            DEFAULT_BASELINE_YEAR,
        )
        .unwrap()
    }

    #[test]
    fn empty_dataset_is_rejected() {
        let err = TemperatureDataset::from_records(vec![], 2015).unwrap_err();
        assert!(matches!(err, DataError::Empty));
    }

    #[test]
    fn missing_baseline_is_rejected_at_construction() {
        let err = TemperatureDataset::from_records(
            vec![TemperatureRecord::new(2014, 288.5, 0.0)],
            2015,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::BaselineMissing { year: 2015 }));
        assert!(!err.is_format_error());
    }

    #[test]
    fn duplicate_year_is_rejected() {
        let err = TemperatureDataset::from_records(
            vec![
                TemperatureRecord::new(2015, 288.5, 0.0),
                TemperatureRecord::new(2015, 288.6, 0.0),
            ],
            2015,
        )
        .unwrap_err();
        assert!(matches!(err, DataError::DuplicateYear { year: 2015 }));
    }

    #[test]
    fn exact_year_resolves_to_itself() {
        let ds = three_years();
        assert_eq!(ds.resolve(2016.0).year, 2016);
        assert_eq!(ds.resolve(2015.0).year, 2015);
    }

    #[test]
    fn tie_keeps_earlier_record() {
        let ds = three_years();
        assert_eq!(ds.resolve(2014.5).year, 2014);
        assert_eq!(ds.resolve(2015.5).year, 2015);
    }

    #[test]
    fn tie_follows_load_order_not_year_order() {
        let ds = TemperatureDataset::from_records(
            vec![
                TemperatureRecord::new(2015, 288.7, 0.0),
                TemperatureRecord::new(2014, 288.5, 0.0),
            ],
            2015,
        )
        .unwrap();
        assert_eq!(ds.resolve(2014.5).year, 2015);
    }

    #[test]
    fn out_of_range_requests_clamp_to_edges() {
        let ds = three_years();
        assert_eq!(ds.resolve(1900.0).year, 2014);
        assert_eq!(ds.resolve(3000.0).year, 2016);
    }

    #[test]
    fn ranges_and_baseline() {
        let ds = three_years();
        assert_eq!(ds.year_range(), (2014, 2016));
        assert_eq!(ds.tas_range(), (288.50, 289.10));
        assert_eq!(ds.baseline().year, 2015);
        approx::assert_abs_diff_eq!(
            ds.diff_from_baseline(&ds.records()[2]),
            0.40,
            epsilon = 1e-9
        );
    }

    proptest! {
        #[test]
        fn resolve_minimises_distance_and_prefers_first(
            years in proptest::collection::btree_set(1800i32..2200, 1..40),
            requested in 1750.0f64..2250.0,
        ) {
            let mut records: Vec<TemperatureRecord> = years
                .iter()
                .map(|&y| TemperatureRecord::new(y, 288.0 + f64::from(y % 7) * 0.1, 0.0))
                .collect();
            // Baseline must exist; reuse the first year as baseline.
            let baseline = records[0].year;
            let mid = records.len() / 2;
            records.rotate_left(mid);
            let ds = TemperatureDataset::from_records(records.clone(), baseline).unwrap();

            let got = ds.resolve(requested);
            let got_d = (f64::from(got.year) - requested).abs();
            let first_min = records
                .iter()
                .position(|r| (f64::from(r.year) - requested).abs() == got_d)
                .unwrap();

            for r in &records {
                prop_assert!(got_d <= (f64::from(r.year) - requested).abs());
            }
            prop_assert_eq!(records[first_min].year, got.year);
            prop_assert_eq!(ds.resolve(requested).year, got.year);
        }
    }
}
