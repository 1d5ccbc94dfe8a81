//! # Data Acquisition Seam
//!
//! The engine never downloads or decodes anything itself. External
//! collaborators (CAMS retrieval, forecast feeds, file readers) implement
//! [`IrradianceProvider`] and hand the engine plain time series.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::domain::Location;
use crate::error::{EngineError, Result};
use crate::series::TimeSeries;

/// Sampling cadence of a requested series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
pub enum Cadence {
    #[strum(serialize = "1minute")]
    #[serde(rename = "1minute")]
    Minute,
    #[strum(serialize = "15minute")]
    #[serde(rename = "15minute")]
    QuarterHourly,
    #[strum(serialize = "1hour")]
    #[serde(rename = "1hour")]
    Hourly,
    #[strum(serialize = "1day")]
    #[serde(rename = "1day")]
    Daily,
    #[strum(serialize = "1month")]
    #[serde(rename = "1month")]
    Monthly,
}

/// Half-open UTC time range with `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self> {
        if start >= end {
            return Err(EngineError::Validation(
                "The start datetime must be before the end datetime".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }
}

/// Capability interface for irradiance (and related) series retrieval.
///
/// Implemented outside this crate; the engine only consumes the resulting
/// [`TimeSeries`].
pub trait IrradianceProvider {
    fn fetch(&self, location: Location, range: &TimeRange, cadence: Cadence)
        -> Result<TimeSeries>;
}
