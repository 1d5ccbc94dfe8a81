use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{EngineError, Result};

// ============================================================================
// Geographic Types
// ============================================================================

/// Geographic location in decimal degrees.
///
/// Only constructible through the validating [`Location::new`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Create a validated location.
    ///
    /// Latitude must be within [-90, 90] and longitude within [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) || !latitude.is_finite() {
            return Err(EngineError::Validation(format!(
                "Invalid latitude: {latitude}. Latitude must be between -90 and 90."
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) || !longitude.is_finite() {
            return Err(EngineError::Validation(format!(
                "Invalid longitude: {longitude}. Longitude must be between -180 and 180."
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn latitude_rad(&self) -> f64 {
        self.latitude.to_radians()
    }

    /// Whether the location lies in the southern hemisphere.
    pub fn is_southern(&self) -> bool {
        self.latitude < 0.0
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

// ============================================================================
// Solar Geometry Types
// ============================================================================

/// Sunrise/sunset for one civil day.
///
/// Both `None` means the sun is permanently up or permanently down that day
/// (polar case). The record alone cannot distinguish the two; callers check
/// the altitude sign.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SunEvent {
    pub date: NaiveDate,
    pub sunrise: Option<DateTime<Utc>>,
    pub sunset: Option<DateTime<Utc>>,
}

impl SunEvent {
    /// Whether neither event occurs (polar always-up or always-down day).
    pub fn is_polar(&self) -> bool {
        self.sunrise.is_none() && self.sunset.is_none()
    }
}

/// Sun angles and illuminated duration for one sample interval.
///
/// `altitude` is clipped to >= 0 for reporting; `zenith` is derived before
/// the clip and may therefore slightly exceed pi/2 in boundary hours.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SolarAngles {
    /// Sun altitude above the horizon (rad, clipped >= 0)
    pub altitude: f64,
    /// Sun azimuth from north, clockwise (rad)
    pub azimuth: f64,
    /// Sun zenith angle (rad)
    pub zenith: f64,
    /// Illuminated minutes within the hour (0..60)
    pub duration_min: f64,
    /// Which edge-policy branch produced this sample
    pub kind: HourKind,
}

/// Classification of an hour against that day's sunrise/sunset.
///
/// The sunrise/sunset special-hour branching is a small per-day state
/// machine; making it explicit keeps each edge case independently testable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourKind {
    /// The wall-clock hour containing sunrise
    SunriseHour,
    /// The wall-clock hour containing sunset
    SunsetHour,
    /// A full daylight hour
    Ordinary,
    /// An hour with the sun below the horizon
    NoSun,
}

// ============================================================================
// PV System Types
// ============================================================================

/// Panel technology selecting the efficiency model and coefficient set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Technology {
    /// Crystalline silicon, empirical parametric model
    CSi,
    /// Copper indium selenide, empirical parametric model
    Cis,
    /// Cadmium telluride, empirical parametric model
    CdTe,
    /// Physics-based single-diode model
    SingleDiode,
}

/// Aperture tracking mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display)]
pub enum TrackingMode {
    /// Fixed tilt and azimuth
    Fixed,
    /// Single-axis tracking (tilted or horizontal axis)
    SingleAxis,
    /// Dual-axis tracking, always normal to the sun
    DualAxis,
}

impl TryFrom<u8> for TrackingMode {
    type Error = EngineError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(TrackingMode::Fixed),
            1 => Ok(TrackingMode::SingleAxis),
            2 => Ok(TrackingMode::DualAxis),
            other => Err(EngineError::Validation(format!(
                "Invalid setting for tracking: {other}"
            ))),
        }
    }
}

// ============================================================================
// BRL Model Coefficients
// ============================================================================

/// Published BRL coefficient variants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BrlVariant {
    /// Updated parameters from Lauret et al. (2013)
    #[default]
    Lauret,
    /// Parameters from Ridley et al. (2010)
    Ridley,
}

/// Coefficient set for the BRL logistic regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BrlCoefficients {
    pub a0: f64,
    pub a1: f64,
    pub b1: f64,
    pub b2: f64,
    pub b3: f64,
    pub b4: f64,
}

impl BrlVariant {
    pub fn coefficients(&self) -> BrlCoefficients {
        match self {
            BrlVariant::Lauret => BrlCoefficients {
                a0: -5.32,
                a1: 7.28,
                b1: -0.03,
                b2: -0.0047,
                b3: 1.72,
                b4: 1.08,
            },
            BrlVariant::Ridley => BrlCoefficients {
                a0: -5.38,
                a1: 6.63,
                b1: 0.006,
                b2: -0.007,
                b3: 1.75,
                b4: 1.31,
            },
        }
    }
}
