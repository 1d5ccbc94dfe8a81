//! # Time Series
//!
//! The aligned time-series container used throughout the engine. Missing
//! values are explicit `None` markers rather than omitted indices, which
//! keeps parallel series (irradiance, clearness, diffuse fraction,
//! temperature) index-aligned across the whole pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Ordered sequence of (UTC timestamp, optional value).
///
/// Timestamps are validated to be strictly increasing at construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeSeries<T = f64> {
    timestamps: Vec<DateTime<Utc>>,
    values: Vec<Option<T>>,
}

impl<T> TimeSeries<T> {
    /// Create a series from parallel timestamp/value vectors.
    ///
    /// Rejects length mismatches and non-increasing timestamps.
    pub fn new(timestamps: Vec<DateTime<Utc>>, values: Vec<Option<T>>) -> Result<Self> {
        if timestamps.len() != values.len() {
            return Err(EngineError::Validation(format!(
                "timestamp/value length mismatch: {} vs {}",
                timestamps.len(),
                values.len()
            )));
        }
        if let Some(w) = timestamps.windows(2).find(|w| w[0] >= w[1]) {
            return Err(EngineError::Validation(format!(
                "timestamps must be strictly increasing, found {} followed by {}",
                w[0], w[1]
            )));
        }
        Ok(Self { timestamps, values })
    }

    /// Create a series from (timestamp, value) points.
    pub fn from_points(points: Vec<(DateTime<Utc>, Option<T>)>) -> Result<Self> {
        let (timestamps, values) = points.into_iter().unzip();
        Self::new(timestamps, values)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[DateTime<Utc>] {
        &self.timestamps
    }

    pub fn values(&self) -> &[Option<T>] {
        &self.values
    }

    /// Value at index `i`, flattened over the undefined marker.
    pub fn get(&self, i: usize) -> Option<&T> {
        self.values.get(i).and_then(|v| v.as_ref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (DateTime<Utc>, Option<&T>)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().map(|v| v.as_ref()))
    }

    /// Whether `other` is sampled on exactly the same timestamps.
    pub fn is_aligned_with<U>(&self, other: &TimeSeries<U>) -> bool {
        self.timestamps == other.timestamps
    }

    /// Transform values in place of the same timestamps.
    pub fn map<U>(&self, mut f: impl FnMut(Option<&T>) -> Option<U>) -> TimeSeries<U> {
        TimeSeries {
            timestamps: self.timestamps.clone(),
            values: self.values.iter().map(|v| f(v.as_ref())).collect(),
        }
    }

    /// Combine two aligned series pointwise. Rejects misaligned inputs.
    pub fn zip_map<U, V>(
        &self,
        other: &TimeSeries<U>,
        mut f: impl FnMut(Option<&T>, Option<&U>) -> Option<V>,
    ) -> Result<TimeSeries<V>> {
        if !self.is_aligned_with(other) {
            return Err(EngineError::Validation(
                "series timestamps are not aligned".to_string(),
            ));
        }
        Ok(TimeSeries {
            timestamps: self.timestamps.clone(),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| f(a.as_ref(), b.as_ref()))
                .collect(),
        })
    }
}

impl TimeSeries<f64> {
    /// Series holding the same defined value at every timestamp.
    pub fn constant(timestamps: Vec<DateTime<Utc>>, value: f64) -> Result<Self> {
        let values = vec![Some(value); timestamps.len()];
        Self::new(timestamps, values)
    }

    /// Value at index `i`, copied out of the undefined marker.
    pub fn value_at(&self, i: usize) -> Option<f64> {
        self.values.get(i).copied().flatten()
    }

    /// Mean over defined values, `None` when nothing is defined.
    pub fn mean_defined(&self) -> Option<f64> {
        let defined: Vec<f64> = self.values.iter().filter_map(|v| *v).collect();
        if defined.is_empty() {
            None
        } else {
            Some(defined.iter().sum::<f64>() / defined.len() as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn hourly_timestamps(n: usize) -> Vec<DateTime<Utc>> {
        let start = Utc.with_ymd_and_hms(2019, 6, 1, 0, 0, 0).unwrap();
        (0..n)
            .map(|h| start + chrono::Duration::hours(h as i64))
            .collect()
    }

    #[test]
    fn test_construction_validates_lengths() {
        let ts = hourly_timestamps(3);
        let result = TimeSeries::new(ts, vec![Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_construction_rejects_unordered_timestamps() {
        let mut ts = hourly_timestamps(3);
        ts.swap(0, 2);
        let result = TimeSeries::new(ts, vec![Some(1.0), Some(2.0), Some(3.0)]);
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_construction_rejects_duplicate_timestamps() {
        let mut ts = hourly_timestamps(2);
        ts[1] = ts[0];
        let result = TimeSeries::new(ts, vec![Some(1.0), Some(2.0)]);
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_undefined_markers_preserve_alignment() {
        let series =
            TimeSeries::new(hourly_timestamps(3), vec![Some(1.0), None, Some(3.0)]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.value_at(0), Some(1.0));
        assert_eq!(series.value_at(1), None);
        assert_eq!(series.value_at(2), Some(3.0));
    }

    #[test]
    fn test_mean_defined_ignores_gaps() {
        let series =
            TimeSeries::new(hourly_timestamps(4), vec![Some(1.0), None, Some(3.0), None]).unwrap();
        assert_eq!(series.mean_defined(), Some(2.0));

        let empty = TimeSeries::new(hourly_timestamps(2), vec![None, None]).unwrap();
        assert_eq!(empty.mean_defined(), None);
    }

    #[test]
    fn test_zip_map_rejects_misaligned_series() {
        let a = TimeSeries::constant(hourly_timestamps(3), 1.0).unwrap();
        let b = TimeSeries::constant(hourly_timestamps(4), 2.0).unwrap();
        let result = a.zip_map(&b, |x, y| x.zip(y).map(|(x, y)| x + y));
        assert!(matches!(result, Err(EngineError::Validation(_))));
    }

    #[test]
    fn test_zip_map_propagates_undefined() {
        let ts = hourly_timestamps(2);
        let a = TimeSeries::new(ts.clone(), vec![Some(1.0), None]).unwrap();
        let b = TimeSeries::constant(ts, 2.0).unwrap();
        let sum = a
            .zip_map(&b, |x, y| x.zip(y).map(|(x, y)| x + y))
            .unwrap();
        assert_eq!(sum.value_at(0), Some(3.0));
        assert_eq!(sum.value_at(1), None);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let series =
            TimeSeries::new(hourly_timestamps(2), vec![Some(42.0), None]).unwrap();
        let json = serde_json::to_string(&series).unwrap();
        let back: TimeSeries = serde_json::from_str(&json).unwrap();
        assert_eq!(back, series);
    }
}
