//! # Aperture Irradiance Transposition
//!
//! Converts horizontal direct/diffuse irradiance into the plane of a fixed
//! or tracked aperture. Incidence geometry depends on the tracking mode; the
//! diffuse component uses an isotropic sky model with a ground-reflected
//! term.

use itertools::izip;
use tracing::debug;

use crate::config::ModelConstants;
use crate::domain::{Location, SolarAngles, TrackingMode};
use crate::error::{EngineError, Result};
use crate::series::TimeSeries;

/// In-plane direct and diffuse irradiance, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct PlaneIrradiance {
    pub direct: TimeSeries,
    pub diffuse: TimeSeries,
}

/// Horizontal -> in-plane irradiance transposer for one aperture.
#[derive(Debug, Clone, Copy)]
pub struct ApertureIrradianceTransposer {
    tilt: f64,
    azimuth: f64,
    tracking: TrackingMode,
    albedo: f64,
}

impl ApertureIrradianceTransposer {
    /// Create a transposer for an aperture at `location`.
    ///
    /// `tilt` and `azimuth` are in radians; azimuth 0 points toward the
    /// pole and pi toward the equator. Southern-hemisphere locations get pi
    /// added automatically so the convention is preserved.
    pub fn new(
        location: Location,
        tilt: f64,
        azimuth: f64,
        tracking: TrackingMode,
        constants: &ModelConstants,
    ) -> Self {
        let azimuth = if location.is_southern() {
            azimuth + std::f64::consts::PI
        } else {
            azimuth
        };
        Self {
            tilt,
            azimuth,
            tracking,
            albedo: constants.albedo,
        }
    }

    /// Direct-normal-equivalent irradiance from horizontal direct.
    ///
    /// Weighted by the illuminated fraction of each hour; undefined input
    /// stays undefined.
    pub fn direct_normal(
        &self,
        direct: &TimeSeries,
        angles: &TimeSeries<SolarAngles>,
    ) -> Result<TimeSeries> {
        direct.zip_map(angles, |d, a| {
            let (d, a) = (d?, a?);
            Some(d * (a.duration_min / 60.0) / a.zenith.cos())
        })
    }

    /// In-plane direct and diffuse irradiance.
    ///
    /// Undefined components resolve to 0 in the plane, and plane direct is
    /// clipped to >= 0 so that low sun angles never produce negative
    /// irradiance through the cosine factor.
    pub fn transpose(
        &self,
        direct: &TimeSeries,
        diffuse: &TimeSeries,
        angles: &TimeSeries<SolarAngles>,
    ) -> Result<PlaneIrradiance> {
        if !direct.is_aligned_with(diffuse) || !direct.is_aligned_with(angles) {
            return Err(EngineError::Validation(
                "direct, diffuse and angle series must share timestamps".to_string(),
            ));
        }
        debug!(tracking = %self.tracking, points = direct.len(), "transposing irradiance");

        let dni = self.direct_normal(direct, angles)?;

        let mut direct_values = Vec::with_capacity(direct.len());
        let mut diffuse_values = Vec::with_capacity(direct.len());

        for (dni, dir, diff, sun) in izip!(
            dni.values(),
            direct.values(),
            diffuse.values(),
            angles.values()
        ) {
            let plane_direct = dni
                .zip(sun.as_ref())
                .map(|(dni, sun)| dni * self.incidence(sun).cos())
                .unwrap_or(0.0)
                .max(0.0);
            direct_values.push(Some(plane_direct));

            let plane_diffuse = match (dir, diff, sun) {
                (Some(dir), Some(diff), Some(sun)) => {
                    let panel_tilt = self.panel_tilt(sun);
                    diff * (1.0 + panel_tilt.cos()) / 2.0
                        + self.albedo * (dir + diff) * (1.0 - panel_tilt.cos()) / 2.0
                }
                _ => 0.0,
            };
            diffuse_values.push(Some(plane_diffuse));
        }

        let timestamps = direct.timestamps().to_vec();
        Ok(PlaneIrradiance {
            direct: TimeSeries::new(timestamps.clone(), direct_values)?,
            diffuse: TimeSeries::new(timestamps, diffuse_values)?,
        })
    }

    /// Aperture incidence angle for the current tracking mode.
    fn incidence(&self, sun: &SolarAngles) -> f64 {
        match self.tracking {
            TrackingMode::Fixed => {
                incidence_fixed(sun.altitude, self.tilt, self.azimuth, sun.azimuth)
            }
            TrackingMode::SingleAxis => {
                incidence_single_tracking(sun.altitude, self.tilt, self.azimuth, sun.azimuth)
            }
            TrackingMode::DualAxis => 0.0,
        }
    }

    /// Effective panel tilt for the current tracking mode.
    fn panel_tilt(&self, sun: &SolarAngles) -> f64 {
        match self.tracking {
            TrackingMode::Fixed => self.tilt,
            TrackingMode::SingleAxis => {
                tilt_single_tracking(sun.altitude, self.tilt, self.azimuth, sun.azimuth)
            }
            TrackingMode::DualAxis => sun.zenith,
        }
    }
}

/// Incidence angle for a fixed aperture (cosine-sum formula).
fn incidence_fixed(sun_alt: f64, tilt: f64, azimuth: f64, sun_azimuth: f64) -> f64 {
    (sun_alt.sin() * tilt.cos() + sun_alt.cos() * tilt.sin() * (azimuth - sun_azimuth).cos())
        .clamp(-1.0, 1.0)
        .acos()
}

/// Incidence angle for a single-axis tracker.
///
/// `tilt` is the tilt of the tracking axis; a horizontal axis (tilt = 0)
/// has a simpler closed form.
fn incidence_single_tracking(sun_alt: f64, tilt: f64, azimuth: f64, sun_azimuth: f64) -> f64 {
    let cos_incidence = if tilt == 0.0 {
        (1.0 - sun_alt.cos().powi(2) * (sun_azimuth - azimuth).cos().powi(2))
            .max(0.0)
            .sqrt()
    } else {
        let projected = (sun_alt + tilt).cos()
            - tilt.cos() * sun_alt.cos() * (1.0 - (sun_azimuth - azimuth).cos());
        (1.0 - projected.powi(2)).max(0.0).sqrt()
    };
    cos_incidence.clamp(-1.0, 1.0).acos()
}

/// Effective panel tilt for a single-axis tracker.
fn tilt_single_tracking(sun_alt: f64, tilt: f64, azimuth: f64, sun_azimuth: f64) -> f64 {
    if tilt == 0.0 {
        ((sun_azimuth - azimuth).sin() / sun_alt.tan()).atan()
    } else {
        let numerator = sun_alt.cos() * (sun_azimuth - azimuth).sin();
        let denominator = (sun_alt - tilt).sin()
            + tilt.sin() * sun_alt.cos() * (1.0 - (sun_azimuth - azimuth).cos());
        (numerator / denominator).atan()
    }
}
