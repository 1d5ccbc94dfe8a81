//! # Production Simulator
//!
//! The end-to-end pipeline: split global horizontal irradiance into direct
//! and diffuse with a diffuse-fraction series, transpose into the aperture
//! plane, run the panel model sized from the nameplate capacity, clip to
//! capacity, and convert through the inverter (or apply the system-loss
//! fraction directly to DC).

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use validator::Validate;

use crate::config::ModelConstants;
use crate::domain::{BrlVariant, Location, Technology, TrackingMode};
use crate::error::{EngineError, Result};
use crate::pv::inverter::{Inverter, InverterSpec};
use crate::pv::panel::PvPanel;
use crate::pv::single_diode::{SingleDiodeParams, TemperatureModel};
use crate::series::TimeSeries;
use crate::solar::clearness::ClearnessIndexCalculator;
use crate::solar::diffuse::DiffuseFractionEstimator;
use crate::solar::geometry::SolarGeometry;
use crate::solar::transposition::ApertureIrradianceTransposer;

/// PV system description and simulation options.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SimulationRequest {
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,
    /// Panel or tracking-axis tilt (deg)
    pub tilt_deg: f64,
    /// Aperture azimuth (deg, 0 = toward pole, 180 = toward equator)
    pub azimuth_deg: f64,
    /// Tracking mode: 0 fixed, 1 single-axis, 2 dual-axis
    pub tracking: u8,
    /// Nameplate DC capacity (W)
    pub capacity_w: f64,
    /// AC inverter capacity (W); defaults to the nameplate capacity
    #[serde(default)]
    pub inverter_capacity_w: Option<f64>,
    /// Model inverter capacity and losses
    #[serde(default = "default_true")]
    pub use_inverter: bool,
    pub technology: Technology,
    /// Additional losses not caused by panel and inverter (fraction)
    #[validate(range(min = 0.0, max = 1.0))]
    #[serde(default)]
    pub system_loss: f64,
    /// BRL coefficient variant for clearness-driven runs
    #[serde(default)]
    pub brl_variant: BrlVariant,
    /// Return intermediate channels next to the AC series
    #[serde(default)]
    pub include_raw: bool,
    /// Module parameters, required for the singlediode technology
    #[serde(default)]
    pub module: Option<SingleDiodeParams>,
    /// Cell-temperature model for the singlediode technology
    #[serde(default)]
    pub temperature_model: Option<TemperatureModel>,
}

fn default_true() -> bool {
    true
}

/// Input series for one simulation run.
///
/// `global_horizontal` is mandatory. A missing `diffuse_fraction` series is
/// a caller contract violation for [`ProductionSimulator::run`]; use
/// [`ProductionSimulator::run_decomposed`] to derive it from clearness
/// indices instead. A missing temperature series falls back to the
/// reference ambient temperature.
#[derive(Debug, Clone, Default)]
pub struct SimulationInputs {
    pub global_horizontal: Option<TimeSeries>,
    pub diffuse_fraction: Option<TimeSeries>,
    pub temperature: Option<TimeSeries>,
}

/// Diagnostic channels of a simulation run.
#[derive(Debug, Clone, Serialize)]
pub struct RawChannels {
    pub plane_direct: TimeSeries,
    pub plane_diffuse: TimeSeries,
    pub temperature: TimeSeries,
}

/// AC production series, optionally with diagnostic channels.
#[derive(Debug, Clone, Serialize)]
pub struct ProductionSeries {
    /// AC power (W) at the input cadence
    pub ac_power: TimeSeries,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<RawChannels>,
}

/// End-to-end AC production simulator.
#[derive(Debug, Clone, Copy)]
pub struct ProductionSimulator<'a> {
    constants: &'a ModelConstants,
}

impl<'a> ProductionSimulator<'a> {
    pub fn new(constants: &'a ModelConstants) -> Self {
        Self { constants }
    }

    /// Run the pipeline with a supplied diffuse-fraction series.
    pub fn run(
        &self,
        request: &SimulationRequest,
        inputs: &SimulationInputs,
    ) -> Result<ProductionSeries> {
        request.validate()?;
        let tracking = TrackingMode::try_from(request.tracking)?;
        let location = Location::new(request.latitude, request.longitude)?;

        let ghi = inputs
            .global_horizontal
            .as_ref()
            .ok_or(EngineError::MissingSeries("global_horizontal"))?;
        let diffuse_fraction = inputs
            .diffuse_fraction
            .as_ref()
            .ok_or(EngineError::MissingSeries("diffuse_fraction"))?;
        info!(
            %location,
            technology = %request.technology,
            %tracking,
            points = ghi.len(),
            "running production simulation"
        );

        // Split the horizontal irradiance; gaps in either input propagate
        let direct = ghi.zip_map(diffuse_fraction, |g, d| Some(*g? * (1.0 - *d?)))?;
        let diffuse = ghi.zip_map(diffuse_fraction, |g, d| Some(*g? * *d?))?;

        let geometry = SolarGeometry::new(location);
        let angles = geometry.hourly_angles(ghi.timestamps())?;

        let transposer = ApertureIrradianceTransposer::new(
            location,
            request.tilt_deg.to_radians(),
            request.azimuth_deg.to_radians(),
            tracking,
            self.constants,
        );
        let plane = transposer.transpose(&direct, &diffuse, &angles)?;
        let irradiance = plane
            .direct
            .zip_map(&plane.diffuse, |d, f| Some(*d? + *f?))?;

        let temperature = match &inputs.temperature {
            Some(series) => {
                if !series.is_aligned_with(ghi) {
                    return Err(EngineError::Validation(
                        "temperature series is not aligned with irradiance".to_string(),
                    ));
                }
                series.clone()
            }
            None => TimeSeries::constant(
                ghi.timestamps().to_vec(),
                self.constants.reference_ambient_temp,
            )?,
        };

        let panel = PvPanel::for_technology(
            request.technology,
            request.capacity_w,
            request.module,
            request.temperature_model,
        )?;
        let dc_power = panel
            .power_series(&irradiance, &temperature, self.constants)?
            .map(|v| v.map(|v| v.min(request.capacity_w)));

        let ac_power = if request.use_inverter {
            let inverter = Inverter::new(InverterSpec::new(
                request.inverter_capacity_w.unwrap_or(request.capacity_w),
            ));
            dc_power.map(|v| v.map(|v| inverter.ac_output(*v) * (1.0 - request.system_loss)))
        } else {
            dc_power.map(|v| v.map(|v| v * (1.0 - request.system_loss)))
        };
        debug!(points = ac_power.len(), "simulation finished");

        let raw = request.include_raw.then(|| RawChannels {
            plane_direct: plane.direct,
            plane_diffuse: plane.diffuse,
            temperature,
        });
        Ok(ProductionSeries { ac_power, raw })
    }

    /// Run the pipeline from raw GHI, deriving the diffuse fraction.
    ///
    /// Computes hourly clearness indices (and daily ones when a daily GHI
    /// series is given), estimates diffuse fractions with the configured
    /// BRL variant, then delegates to [`run`](Self::run).
    pub fn run_decomposed(
        &self,
        request: &SimulationRequest,
        global_horizontal: &TimeSeries,
        daily_global_horizontal: Option<&TimeSeries>,
        temperature: Option<TimeSeries>,
    ) -> Result<ProductionSeries> {
        let location = Location::new(request.latitude, request.longitude)?;
        let calculator = ClearnessIndexCalculator::new(self.constants);

        let hourly_clearness = calculator.clearness_index(global_horizontal);
        let daily_clearness = daily_global_horizontal.map(|d| calculator.clearness_index(d));

        let estimator = DiffuseFractionEstimator::new(location, request.brl_variant);
        let diffuse_fraction =
            estimator.estimate(&hourly_clearness, daily_clearness.as_ref())?;

        self.run(
            request,
            &SimulationInputs {
                global_horizontal: Some(global_horizontal.clone()),
                diffuse_fraction: Some(diffuse_fraction),
                temperature,
            },
        )
    }
}
