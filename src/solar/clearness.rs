//! # Clearness Index
//!
//! Ratio of measured global horizontal irradiance to the orbit-corrected
//! extraterrestrial irradiance. Night hours (zero GHI) yield an undefined
//! index, which downstream estimators propagate rather than zero out.

use chrono::Datelike;
use std::f64::consts::PI;

use crate::config::ModelConstants;
use crate::series::TimeSeries;

/// Mean anomaly (rad) for a day of year.
pub fn mean_anomaly(day_of_year: u32) -> f64 {
    2.0 * PI * (day_of_year as f64 - 1.0) / 365.0
}

/// Orbital-eccentricity correction factor for the solar constant.
///
/// Fixed 4-term trigonometric series in the mean anomaly.
pub fn eccentricity_correction(mean_anomaly: f64) -> f64 {
    1.000110
        + 0.034221 * mean_anomaly.cos()
        + 0.001280 * mean_anomaly.sin()
        + 0.007190 * (2.0 * mean_anomaly).cos()
        + 0.000077 * (2.0 * mean_anomaly).sin()
}

/// GHI -> clearness index using the orbit-corrected solar constant.
#[derive(Debug, Clone, Copy)]
pub struct ClearnessIndexCalculator<'a> {
    constants: &'a ModelConstants,
}

impl<'a> ClearnessIndexCalculator<'a> {
    pub fn new(constants: &'a ModelConstants) -> Self {
        Self { constants }
    }

    /// Day-of-year-corrected solar constant (W/m2).
    pub fn corrected_solar_constant(&self, day_of_year: u32) -> f64 {
        eccentricity_correction(mean_anomaly(day_of_year)) * self.constants.solar_constant
    }

    /// Clearness index series from a GHI series at any cadence.
    ///
    /// Undefined GHI stays undefined; a ratio of exactly zero (night) maps
    /// to undefined as well, so night hours never enter daily means.
    pub fn clearness_index(&self, ghi: &TimeSeries) -> TimeSeries {
        let toa: Vec<f64> = ghi
            .timestamps()
            .iter()
            .map(|ts| self.corrected_solar_constant(ts.ordinal()))
            .collect();

        let mut i = 0;
        ghi.map(|value| {
            let denominator = toa[i];
            i += 1;
            let ghi = *value?;
            if denominator.abs() < f64::EPSILON {
                return None;
            }
            let kt = ghi / denominator;
            if kt == 0.0 {
                None
            } else {
                Some(kt)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn series_on(values: Vec<Option<f64>>) -> TimeSeries {
        let start = Utc.with_ymd_and_hms(2019, 7, 1, 0, 0, 0).unwrap();
        let timestamps: Vec<DateTime<Utc>> = (0..values.len())
            .map(|h| start + chrono::Duration::hours(h as i64))
            .collect();
        TimeSeries::new(timestamps, values).unwrap()
    }

    #[test]
    fn test_eccentricity_correction_bounds() {
        // Earth-sun distance varies about +/- 3.3% over the year
        for doy in 1..=365 {
            let re = eccentricity_correction(mean_anomaly(doy));
            assert!(re > 0.96 && re < 1.04, "re({doy}) = {re}");
        }
        // Perihelion in early January, aphelion in early July
        assert!(
            eccentricity_correction(mean_anomaly(3))
                > eccentricity_correction(mean_anomaly(185))
        );
    }

    #[test]
    fn test_corrected_solar_constant_scale() {
        let constants = ModelConstants::default();
        let calc = ClearnessIndexCalculator::new(&constants);
        let corrected = calc.corrected_solar_constant(182);
        assert!(corrected > 1316.0 * 0.96 && corrected < 1316.0 * 1.04);
    }

    #[test]
    fn test_clearness_index_plausible_range() {
        let constants = ModelConstants::default();
        let calc = ClearnessIndexCalculator::new(&constants);

        let ghi = series_on(vec![Some(100.0), Some(500.0), Some(900.0)]);
        let kt = calc.clearness_index(&ghi);
        for i in 0..kt.len() {
            let v = kt.value_at(i).unwrap();
            assert!(v > 0.0 && v < 1.2, "kt = {v}");
        }
    }

    #[test]
    fn test_zero_ghi_maps_to_undefined() {
        let constants = ModelConstants::default();
        let calc = ClearnessIndexCalculator::new(&constants);

        let ghi = series_on(vec![Some(0.0), Some(400.0), None]);
        let kt = calc.clearness_index(&ghi);
        assert_eq!(kt.value_at(0), None);
        assert!(kt.value_at(1).is_some());
        assert_eq!(kt.value_at(2), None);
    }
}
