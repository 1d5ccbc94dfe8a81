//! # Solar Ephemeris
//!
//! Low-precision solar-position calculations: declination, equation of time,
//! altitude/azimuth, apparent solar time, and sunrise/sunset with polar
//! handling. Based on the NOAA solar-position series; accurate to well under
//! a degree, which is sufficient for hourly irradiance work.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Timelike, Utc};
use std::f64::consts::PI;

use crate::domain::Location;

/// Solar zenith at sunrise/sunset including refraction and solar radius (deg).
const RISE_SET_ZENITH_DEG: f64 = 90.833;

/// Instantaneous sun position for an observer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SunPosition {
    /// Altitude above the horizon (rad), negative below the horizon
    pub altitude: f64,
    /// Azimuth from north, clockwise (rad, 0..2pi)
    pub azimuth: f64,
}

/// Fractional year angle (rad) for a day-of-year and UTC decimal hour.
fn fractional_year(day_of_year: u32, hour: f64) -> f64 {
    2.0 * PI / 365.0 * (day_of_year as f64 - 1.0 + (hour - 12.0) / 24.0)
}

/// Solar declination (rad) from the fractional year angle.
fn declination(gamma: f64) -> f64 {
    0.006918 - 0.399912 * gamma.cos() + 0.070257 * gamma.sin() - 0.006758 * (2.0 * gamma).cos()
        + 0.000907 * (2.0 * gamma).sin()
        - 0.002697 * (3.0 * gamma).cos()
        + 0.00148 * (3.0 * gamma).sin()
}

/// Equation of time (minutes) from the fractional year angle.
fn equation_of_time_min(gamma: f64) -> f64 {
    229.18
        * (0.000075 + 0.001868 * gamma.cos() - 0.032077 * gamma.sin()
            - 0.014615 * (2.0 * gamma).cos()
            - 0.040849 * (2.0 * gamma).sin())
}

fn decimal_hour(at: DateTime<Utc>) -> f64 {
    at.hour() as f64 + at.minute() as f64 / 60.0 + at.second() as f64 / 3600.0
}

/// True solar time in minutes since solar midnight (0..1440).
fn true_solar_time_min(location: Location, at: DateTime<Utc>) -> f64 {
    let hour = decimal_hour(at);
    let gamma = fractional_year(at.ordinal(), hour);
    let eqtime = equation_of_time_min(gamma);
    (hour * 60.0 + eqtime + 4.0 * location.longitude()).rem_euclid(1440.0)
}

/// Apparent solar time in hours (0..24).
///
/// Equivalent to the solar hour angle shifted by 12 h: solar noon maps to 12.
pub fn apparent_solar_time_hours(location: Location, at: DateTime<Utc>) -> f64 {
    true_solar_time_min(location, at) / 60.0
}

/// Sun altitude/azimuth for an observer at a UTC instant.
///
/// The altitude is returned unclipped; callers decide how to treat
/// below-horizon values.
pub fn sun_position(location: Location, at: DateTime<Utc>) -> SunPosition {
    let gamma = fractional_year(at.ordinal(), decimal_hour(at));
    let decl = declination(gamma);
    let lat = location.latitude_rad();

    let ha = (true_solar_time_min(location, at) / 4.0 - 180.0).to_radians();

    let sin_alt = lat.sin() * decl.sin() + lat.cos() * decl.cos() * ha.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    // Azimuth measured from south (positive westward), then rotated so that
    // 0 = north, clockwise.
    let azimuth_south = ha.sin().atan2(ha.cos() * lat.sin() - decl.tan() * lat.cos());
    let azimuth = (azimuth_south + PI).rem_euclid(2.0 * PI);

    SunPosition { altitude, azimuth }
}

/// Sunrise and sunset instants (UTC) for a civil day.
///
/// Returns `(None, None)` when the sun is permanently up or permanently down
/// that day; never an error. Event times are wrapped into the civil day for
/// extreme longitudes, matching the hour-of-day keyed edge policy.
pub fn sun_rise_set(
    location: Location,
    date: NaiveDate,
) -> (Option<DateTime<Utc>>, Option<DateTime<Utc>>) {
    let gamma = fractional_year(date.ordinal(), 12.0);
    let decl = declination(gamma);
    let eqtime = equation_of_time_min(gamma);
    let lat = location.latitude_rad();

    let cos_omega = RISE_SET_ZENITH_DEG.to_radians().cos() / (lat.cos() * decl.cos())
        - lat.tan() * decl.tan();
    if !(-1.0..=1.0).contains(&cos_omega) || !cos_omega.is_finite() {
        // Polar day or polar night
        return (None, None);
    }
    let omega_deg = cos_omega.acos().to_degrees();

    let sunrise_min = (720.0 - 4.0 * (location.longitude() + omega_deg) - eqtime).rem_euclid(1440.0);
    let sunset_min = (720.0 - 4.0 * (location.longitude() - omega_deg) - eqtime).rem_euclid(1440.0);

    let midnight = date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    let at_minute = |minutes: f64| {
        midnight.map(|m| m + Duration::milliseconds((minutes * 60_000.0).round() as i64))
    };
    (at_minute(sunrise_min), at_minute(sunset_min))
}
