//! # Diffuse Fraction (BRL Model)
//!
//! Splits hourly clearness indices into diffuse fractions with the BRL
//! logistic regression. Predictors per hour: the hourly clearness index,
//! apparent solar time, sun altitude at the start of the day, the daily
//! clearness index, and a persistence term over neighboring hours.

use chrono::{DateTime, Timelike, Utc};
use tracing::debug;

use crate::domain::{BrlCoefficients, BrlVariant, Location};
use crate::error::{EngineError, Result};
use crate::series::TimeSeries;
use crate::solar::ephemeris;
use crate::solar::geometry::SolarGeometry;

const HOURS_PER_DAY: usize = 24;

/// Clearness index -> diffuse fraction estimator.
#[derive(Debug, Clone, Copy)]
pub struct DiffuseFractionEstimator {
    geometry: SolarGeometry,
    coefficients: BrlCoefficients,
}

impl DiffuseFractionEstimator {
    pub fn new(location: Location, variant: BrlVariant) -> Self {
        Self {
            geometry: SolarGeometry::new(location),
            coefficients: variant.coefficients(),
        }
    }

    /// Estimator with an explicit coefficient set.
    pub fn with_coefficients(location: Location, coefficients: BrlCoefficients) -> Self {
        Self {
            geometry: SolarGeometry::new(location),
            coefficients,
        }
    }

    /// Diffuse fraction per hour, undefined wherever the clearness index is.
    ///
    /// `hourly_clearness` must cover whole UTC days at hourly cadence
    /// (midnight-aligned, a multiple of 24 points). `daily_clearness`, when
    /// given, supplies one value per day by position; days with an undefined
    /// daily value fall back to the mean of that day's defined hourly values.
    pub fn estimate(
        &self,
        hourly_clearness: &TimeSeries,
        daily_clearness: Option<&TimeSeries>,
    ) -> Result<TimeSeries> {
        validate_day_blocks(hourly_clearness)?;
        let days = hourly_clearness.len() / HOURS_PER_DAY;
        if let Some(daily) = daily_clearness {
            if daily.len() != days {
                return Err(EngineError::Validation(format!(
                    "daily clearness has {} entries for {} days",
                    daily.len(),
                    days
                )));
            }
        }
        debug!(days, "estimating diffuse fractions");

        let timestamps = hourly_clearness.timestamps();
        let mut fractions: Vec<Option<f64>> = Vec::with_capacity(hourly_clearness.len());

        for day in 0..days {
            let offset = day * HOURS_PER_DAY;
            let day_start = timestamps[offset];
            let mut ks = [None; HOURS_PER_DAY];
            for (h, slot) in ks.iter_mut().enumerate() {
                *slot = hourly_clearness.value_at(offset + h);
            }

            let k_day = daily_clearness
                .and_then(|daily| daily.value_at(day))
                .or_else(|| mean_defined(&ks));

            fractions.extend(self.daily_diffuse(day_start, &ks, k_day));
        }

        TimeSeries::new(timestamps.to_vec(), fractions)
    }

    /// Diffuse fractions for one day of 24 hourly clearness values.
    fn daily_diffuse(
        &self,
        day_start: DateTime<Utc>,
        ks: &[Option<f64>; HOURS_PER_DAY],
        k_day: Option<f64>,
    ) -> [Option<f64>; HOURS_PER_DAY] {
        let location = self.geometry.location();
        let event = self.geometry.sun_event(day_start.date_naive());

        // Polar days collapse the boundary hours to the array edges
        let sunrise_hour = event.sunrise.map_or(0, |r| r.hour() as usize);
        let sunset_hour = event.sunset.map_or(23, |s| s.hour() as usize);

        // Day-start altitude enters the regression unclipped
        let alpha = ephemeris::sun_position(location, day_start).altitude;
        let k_day = k_day.unwrap_or(0.0);
        let p = &self.coefficients;

        let mut out = [None; HOURS_PER_DAY];
        for (hour, slot) in out.iter_mut().enumerate() {
            let Some(k) = ks[hour] else {
                continue;
            };
            let at = day_start + chrono::Duration::hours(hour as i64);
            let ast = ephemeris::apparent_solar_time_hours(location, at);
            let psi = persistence(hour, ks, sunrise_hour, sunset_hour);

            let pwr = p.a0 + p.a1 * k + p.b1 * ast + p.b2 * alpha + p.b3 * k_day + p.b4 * psi;
            *slot = Some(1.0 / (1.0 + pwr.exp()));
        }
        out
    }
}

/// Persistence term over neighboring hourly clearness values.
///
/// Between sunrise and sunset hours: the average of the defined neighbors
/// (one missing uses the other). At the sunrise hour: the next hour; at the
/// sunset hour: the previous hour; outside daylight: 0. A neighbor index
/// outside 0..23, or an undefined boundary neighbor, falls back to the
/// hour's own value, which keeps the term bounded and defined whenever
/// `ks[hour]` is.
fn persistence(
    hour: usize,
    ks: &[Option<f64>; HOURS_PER_DAY],
    sunrise_hour: usize,
    sunset_hour: usize,
) -> f64 {
    let own = ks[hour].unwrap_or(0.0);
    let prev = if hour > 0 { ks[hour - 1] } else { None };
    let next = if hour < HOURS_PER_DAY - 1 { ks[hour + 1] } else { None };

    if hour > sunrise_hour && hour < sunset_hour {
        match (prev, next) {
            (Some(p), Some(n)) => (p + n) / 2.0,
            (Some(p), None) => p,
            (None, Some(n)) => n,
            (None, None) => own,
        }
    } else if hour == sunrise_hour {
        next.unwrap_or(own)
    } else if hour == sunset_hour {
        prev.unwrap_or(own)
    } else {
        0.0
    }
}

fn mean_defined(ks: &[Option<f64>; HOURS_PER_DAY]) -> Option<f64> {
    let defined: Vec<f64> = ks.iter().filter_map(|v| *v).collect();
    if defined.is_empty() {
        None
    } else {
        Some(defined.iter().sum::<f64>() / defined.len() as f64)
    }
}

/// Hourly, midnight-aligned, whole-day input; anything else is rejected
/// rather than silently mis-chunked.
fn validate_day_blocks(series: &TimeSeries) -> Result<()> {
    if series.len() % HOURS_PER_DAY != 0 {
        return Err(EngineError::Validation(format!(
            "hourly clearness length {} is not a multiple of 24",
            series.len()
        )));
    }
    let timestamps = series.timestamps();
    if let Some(first) = timestamps.first() {
        if first.hour() != 0 || first.minute() != 0 || first.second() != 0 {
            return Err(EngineError::Validation(format!(
                "hourly clearness must start at midnight UTC, starts at {first}"
            )));
        }
    }
    if let Some(w) = timestamps
        .windows(2)
        .find(|w| w[1] - w[0] != chrono::Duration::hours(1))
    {
        return Err(EngineError::Validation(format!(
            "hourly clearness must have hourly cadence, found gap {} -> {}",
            w[0], w[1]
        )));
    }
    Ok(())
}
