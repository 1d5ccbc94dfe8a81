//! # Solar Geometry
//!
//! Day/night bookkeeping for hourly series: sunrise/sunset events per civil
//! day and per-hour sun angles with illuminated durations.
//!
//! Hours touching sunrise or sunset get fractional durations and are sampled
//! at the midpoint of their illuminated part; all other hours sample at the
//! half hour and are zeroed outright when the sun is below the horizon.

use chrono::{DateTime, Duration, NaiveDate, Timelike, Utc};
use std::collections::BTreeMap;
use std::f64::consts::FRAC_PI_2;
use tracing::debug;

use crate::domain::{HourKind, Location, SolarAngles, SunEvent};
use crate::error::Result;
use crate::series::TimeSeries;
use crate::solar::ephemeris;

/// Sun position and day/night bookkeeping for one location.
#[derive(Debug, Clone, Copy)]
pub struct SolarGeometry {
    location: Location,
}

impl SolarGeometry {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    pub fn location(&self) -> Location {
        self.location
    }

    /// Sunrise/sunset for one civil day; both `None` in the polar case.
    pub fn sun_event(&self, date: NaiveDate) -> SunEvent {
        let (sunrise, sunset) = ephemeris::sun_rise_set(self.location, date);
        SunEvent {
            date,
            sunrise,
            sunset,
        }
    }

    /// Sunrise/sunset for every distinct civil day in a timestamp sequence.
    pub fn sun_events(&self, timestamps: &[DateTime<Utc>]) -> BTreeMap<NaiveDate, SunEvent> {
        let mut events = BTreeMap::new();
        for ts in timestamps {
            let date = ts.date_naive();
            events
                .entry(date)
                .or_insert_with(|| self.sun_event(date));
        }
        events
    }

    /// Per-hour altitude/azimuth/zenith/duration for a timestamp sequence.
    ///
    /// Every timestamp resolves to a defined angle record; degenerate cases
    /// (polar night, sub-horizon hours) come back zero-valued, never as
    /// errors.
    pub fn hourly_angles(
        &self,
        timestamps: &[DateTime<Utc>],
    ) -> Result<TimeSeries<SolarAngles>> {
        let events = self.sun_events(timestamps);
        debug!(
            location = %self.location,
            days = events.len(),
            hours = timestamps.len(),
            "computing hourly sun angles"
        );

        let values = timestamps
            .iter()
            .map(|ts| Some(self.hour_angles(*ts, &events[&ts.date_naive()])))
            .collect();
        TimeSeries::new(timestamps.to_vec(), values)
    }

    /// Angles for a single hour, applying the three-way edge policy.
    pub fn hour_angles(&self, hour_start: DateTime<Utc>, event: &SunEvent) -> SolarAngles {
        let (kind, duration_min, sample_time) = classify_hour(hour_start, event);

        let pos = ephemeris::sun_position(self.location, sample_time);
        let (altitude, azimuth, duration_min, kind) = match kind {
            HourKind::Ordinary if pos.altitude < 0.0 => {
                // Sun below horizon despite nominal day
                (0.0, 0.0, 0.0, HourKind::NoSun)
            }
            _ => (pos.altitude, pos.azimuth, duration_min, kind),
        };

        // Zenith derives from the unclipped altitude; the reported altitude
        // is clipped afterwards, so boundary-hour zeniths may exceed pi/2.
        SolarAngles {
            altitude: altitude.max(0.0),
            azimuth,
            zenith: FRAC_PI_2 - altitude,
            duration_min,
            kind,
        }
    }
}

/// Branch selection for one hour: kind, illuminated minutes, sample instant.
///
/// The `NoSun` refinement of ordinary hours happens after sampling, in
/// [`SolarGeometry::hour_angles`]; sunrise/sunset hours keep whatever
/// altitude their mid-interval sample yields.
fn classify_hour(
    hour_start: DateTime<Utc>,
    event: &SunEvent,
) -> (HourKind, f64, DateTime<Utc>) {
    if let Some(rise) = event.sunrise {
        if hour_start.hour() == rise.hour() {
            let duration = 60.0 - rise.minute() as f64 - rise.second() as f64 / 60.0;
            let sample = rise + half_duration(duration);
            return (HourKind::SunriseHour, duration, sample);
        }
    }
    if let Some(set) = event.sunset {
        if hour_start.hour() == set.hour() {
            let duration = set.minute() as f64 + set.second() as f64 / 60.0;
            let sample = hour_start + half_duration(duration);
            return (HourKind::SunsetHour, duration, sample);
        }
    }
    (
        HourKind::Ordinary,
        60.0,
        hour_start + Duration::minutes(30),
    )
}

fn half_duration(duration_min: f64) -> Duration {
    Duration::milliseconds((duration_min / 2.0 * 60_000.0).round() as i64)
}
