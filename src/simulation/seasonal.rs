//! # Seasonal Aggregation
//!
//! Reduces a time series to climatological monthly means: sum within each
//! (year, month) group, then average those sums across years per calendar
//! month. The result always carries exactly 12 entries keyed by 3-letter
//! month abbreviation; months never observed stay null rather than being
//! fabricated as zero.

use chrono::Datelike;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

use crate::series::TimeSeries;

pub const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Twelve climatological monthly means in calendar order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonalProfile {
    means: [Option<f64>; 12],
}

impl SeasonalProfile {
    /// Mean for a calendar month (1 = January .. 12 = December).
    pub fn mean_for_month(&self, month: u32) -> Option<f64> {
        assert!((1..=12).contains(&month), "month {month} out of range");
        self.means[(month - 1) as usize]
    }

    /// (abbreviation, mean) pairs in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, Option<f64>)> + '_ {
        MONTH_ABBREVIATIONS
            .iter()
            .copied()
            .zip(self.means.iter().copied())
    }
}

impl Serialize for SeasonalProfile {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(12))?;
        for (abbreviation, mean) in self.iter() {
            map.serialize_entry(abbreviation, &mean)?;
        }
        map.end()
    }
}

/// Series -> 12 calendar-month climatological means.
#[derive(Debug, Clone, Copy)]
pub struct SeasonalAggregator;

impl SeasonalAggregator {
    /// Group by (year, month), sum defined values within each group, then
    /// average the sums across years per calendar month.
    pub fn monthly_climatology(series: &TimeSeries) -> SeasonalProfile {
        let mut group_sums: BTreeMap<(i32, u32), f64> = BTreeMap::new();
        for (timestamp, value) in series.iter() {
            let key = (timestamp.year(), timestamp.month());
            *group_sums.entry(key).or_insert(0.0) += value.copied().unwrap_or(0.0);
        }

        let mut per_month: [Vec<f64>; 12] = Default::default();
        for ((_, month), sum) in group_sums {
            per_month[(month - 1) as usize].push(sum);
        }

        let mut means = [None; 12];
        for (slot, sums) in means.iter_mut().zip(per_month.iter()) {
            if !sums.is_empty() {
                *slot = Some(sums.iter().sum::<f64>() / sums.len() as f64);
            }
        }
        SeasonalProfile { means }
    }
}
