//! # PV Panel Model
//!
//! Panel output as `irradiance * aperture * relative_efficiency * reference
//! efficiency`. The relative efficiency comes from one of two families: the
//! empirical parametric model with per-technology coefficient sets, or the
//! physics-based single-diode model. Technology is data (a coefficient
//! record behind an enum), not a class hierarchy.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ModelConstants;
use crate::domain::Technology;
use crate::error::{EngineError, Result};
use crate::pv::single_diode::{self, SingleDiodeParams, TemperatureModel};
use crate::series::TimeSeries;

/// Panel reference efficiency used for capacity-to-aperture sizing.
pub const SIZING_REFERENCE_EFFICIENCY: f64 = 0.153;

/// Coefficients of the empirical parametric efficiency model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HuldCoefficients {
    pub k1: f64,
    pub k2: f64,
    pub k3: f64,
    pub k4: f64,
    pub k5: f64,
    pub k6: f64,
}

/// Crystalline-silicon coefficient set
pub const HULD_CSI: HuldCoefficients = HuldCoefficients {
    k1: -0.017162,
    k2: -0.040289,
    k3: -0.004681,
    k4: 0.000148,
    k5: 0.000169,
    k6: 0.000005,
};

/// CIS coefficient set
pub const HULD_CIS: HuldCoefficients = HuldCoefficients {
    k1: -0.005521,
    k2: -0.038492,
    k3: -0.003701,
    k4: -0.000899,
    k5: -0.001248,
    k6: 0.000001,
};

/// CdTe coefficient set
pub const HULD_CDTE: HuldCoefficients = HuldCoefficients {
    k1: -0.103251,
    k2: -0.040446,
    k3: -0.001667,
    k4: -0.002075,
    k5: -0.001445,
    k6: -0.000023,
};

/// Physical panel sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Aperture area (m2)
    pub aperture_m2: f64,
    /// Reference conversion efficiency
    pub reference_efficiency: f64,
}

impl PanelSpec {
    /// Size a panel from requested nameplate capacity (W).
    ///
    /// `area = capacity * 0.001 / reference_efficiency`, which makes
    /// capacity and aperture interchangeable inputs.
    pub fn from_capacity(capacity_w: f64) -> Self {
        Self {
            aperture_m2: capacity_w * 0.001 / SIZING_REFERENCE_EFFICIENCY,
            reference_efficiency: SIZING_REFERENCE_EFFICIENCY,
        }
    }
}

/// Efficiency model family behind a panel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EfficiencyModel {
    /// Empirical parametric model
    Parametric {
        coefficients: HuldCoefficients,
        /// Module temperature coefficient of ambient temperature (degC/degC)
        ambient_coeff: f64,
        /// Module temperature coefficient of irradiance (degC/(W/m2))
        irradiance_coeff: f64,
    },
    /// Physics-based single-diode model
    SingleDiode {
        module: SingleDiodeParams,
        temperature: TemperatureModel,
    },
}

/// A sized panel with its efficiency model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PvPanel {
    spec: PanelSpec,
    model: EfficiencyModel,
}

impl PvPanel {
    /// Build a panel for a technology, sized from nameplate capacity.
    ///
    /// The single-diode technology requires module parameters; the
    /// parametric technologies carry their own coefficient sets.
    pub fn for_technology(
        technology: Technology,
        capacity_w: f64,
        module: Option<SingleDiodeParams>,
        temperature: Option<TemperatureModel>,
    ) -> Result<Self> {
        let spec = PanelSpec::from_capacity(capacity_w);
        let model = match technology {
            Technology::CSi => parametric(HULD_CSI),
            Technology::Cis => parametric(HULD_CIS),
            Technology::CdTe => parametric(HULD_CDTE),
            Technology::SingleDiode => EfficiencyModel::SingleDiode {
                module: module.ok_or(EngineError::Validation(
                    "singlediode technology requires module parameters".to_string(),
                ))?,
                temperature: temperature.unwrap_or_default(),
            },
        };
        debug!(%technology, capacity_w, aperture_m2 = spec.aperture_m2, "panel sized");
        Ok(Self { spec, model })
    }

    pub fn spec(&self) -> PanelSpec {
        self.spec
    }

    /// Relative conversion efficiency at the given operating point.
    ///
    /// Degenerate inputs (non-positive irradiance, undefined temperature)
    /// resolve to 0, never to an error.
    pub fn relative_efficiency(
        &self,
        irradiance: f64,
        ambient_temp: f64,
        windspeed: Option<f64>,
        constants: &ModelConstants,
    ) -> f64 {
        match &self.model {
            EfficiencyModel::Parametric {
                coefficients,
                ambient_coeff,
                irradiance_coeff,
            } => parametric_efficiency(
                coefficients,
                irradiance,
                ambient_temp,
                *ambient_coeff,
                *irradiance_coeff,
                constants,
            ),
            EfficiencyModel::SingleDiode {
                module,
                temperature,
            } => {
                let windspeed = windspeed.unwrap_or(constants.reference_windspeed);
                let t_cell =
                    single_diode::cell_temperature(irradiance, ambient_temp, windspeed, temperature);
                single_diode::relative_efficiency(module, irradiance, t_cell)
            }
        }
    }

    /// Electrical output (W) at the given operating point.
    pub fn power(
        &self,
        irradiance: f64,
        ambient_temp: f64,
        windspeed: Option<f64>,
        constants: &ModelConstants,
    ) -> f64 {
        irradiance
            * self.spec.aperture_m2
            * self.relative_efficiency(irradiance, ambient_temp, windspeed, constants)
            * self.spec.reference_efficiency
    }

    /// Output series for aligned irradiance and ambient-temperature series.
    ///
    /// Undefined irradiance stays undefined; an undefined temperature zeroes
    /// the efficiency for that point (the degenerate-input rule).
    pub fn power_series(
        &self,
        irradiance: &TimeSeries,
        ambient_temp: &TimeSeries,
        constants: &ModelConstants,
    ) -> Result<TimeSeries> {
        irradiance.zip_map(ambient_temp, |irr, tamb| {
            let irr = *irr?;
            let tamb = tamb.copied().unwrap_or(f64::NAN);
            Some(self.power(irr, tamb, None, constants))
        })
    }
}

fn parametric(coefficients: HuldCoefficients) -> EfficiencyModel {
    EfficiencyModel::Parametric {
        coefficients,
        ambient_coeff: 1.0,
        irradiance_coeff: 0.035,
    }
}

/// Empirical parametric relative efficiency.
fn parametric_efficiency(
    k: &HuldCoefficients,
    irradiance: f64,
    ambient_temp: f64,
    ambient_coeff: f64,
    irradiance_coeff: f64,
    constants: &ModelConstants,
) -> f64 {
    let g_norm = irradiance / constants.reference_irradiance;
    let t_norm =
        (ambient_coeff * ambient_temp + irradiance_coeff * irradiance) - constants.reference_module_temp;
    let ln_g = g_norm.ln();

    let efficiency = 1.0
        + k.k1 * ln_g
        + k.k2 * ln_g.powi(2)
        + t_norm * (k.k3 + k.k4 * ln_g + k.k5 * ln_g.powi(2))
        + k.k6 * t_norm.powi(2);

    // NaN from ln of non-positive irradiance, or an undefined temperature
    if efficiency.is_finite() {
        efficiency.max(0.0)
    } else {
        0.0
    }
}
