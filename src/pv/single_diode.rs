//! # Single-Diode Model
//!
//! Physics-based panel efficiency: SAPM cell-temperature estimation, De Soto
//! temperature/irradiance adjustment of the five diode parameters, and a
//! maximum-power-point solve on the adjusted I-V curve.

use serde::{Deserialize, Serialize};

/// Boltzmann constant (eV/K)
const BOLTZMANN_EV: f64 = 8.617332478e-5;
/// Reference band-gap energy for silicon (eV)
const EG_REF: f64 = 1.121;
/// Band-gap temperature coefficient (1/K)
const DEG_DT: f64 = -0.0002677;
/// Reference cell temperature (K)
const T_REF_K: f64 = 298.15;
/// Reference irradiance (W/m2)
const IRRAD_REF: f64 = 1000.0;

/// Reference-condition module parameters for the De Soto model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SingleDiodeParams {
    /// Short-circuit current temperature coefficient (A/K)
    pub alpha_sc: f64,
    /// Modified diode ideality factor at reference (V)
    pub a_ref: f64,
    /// Light-generated current at reference (A)
    pub i_l_ref: f64,
    /// Diode saturation current at reference (A)
    pub i_o_ref: f64,
    /// Shunt resistance at reference (ohm)
    pub r_sh_ref: f64,
    /// Series resistance (ohm)
    pub r_s: f64,
}

/// SAPM cell-temperature model coefficients.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureModel {
    pub a: f64,
    pub b: f64,
    pub delta_tau: f64,
}

impl TemperatureModel {
    pub fn open_rack_glass_glass() -> Self {
        Self {
            a: -3.47,
            b: -0.0594,
            delta_tau: 3.0,
        }
    }

    pub fn close_mount_glass_glass() -> Self {
        Self {
            a: -2.98,
            b: -0.0471,
            delta_tau: 1.0,
        }
    }

    pub fn open_rack_glass_polymer() -> Self {
        Self {
            a: -3.56,
            b: -0.075,
            delta_tau: 3.0,
        }
    }

    pub fn insulated_back_glass_polymer() -> Self {
        Self {
            a: -2.81,
            b: -0.0455,
            delta_tau: 0.0,
        }
    }

    /// Look up a named mounting configuration.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "open_rack_glass_glass" => Some(Self::open_rack_glass_glass()),
            "close_mount_glass_glass" => Some(Self::close_mount_glass_glass()),
            "open_rack_glass_polymer" => Some(Self::open_rack_glass_polymer()),
            "insulated_back_glass_polymer" => Some(Self::insulated_back_glass_polymer()),
            _ => None,
        }
    }
}

impl Default for TemperatureModel {
    fn default() -> Self {
        Self::open_rack_glass_glass()
    }
}

/// Cell temperature (degC) from irradiance, ambient temperature and wind.
pub fn cell_temperature(
    irradiance: f64,
    ambient_temp: f64,
    windspeed: f64,
    model: &TemperatureModel,
) -> f64 {
    let module_temp = irradiance * (model.a + model.b * windspeed).exp() + ambient_temp;
    module_temp + irradiance / IRRAD_REF * model.delta_tau
}

/// Diode parameters adjusted to operating conditions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustedParams {
    pub photocurrent: f64,
    pub saturation_current: f64,
    pub series_resistance: f64,
    pub shunt_resistance: f64,
    /// Modified ideality factor n*Ns*Vth (V)
    pub n_ns_vth: f64,
}

/// De Soto adjustment of the reference parameters to `effective_irradiance`
/// (W/m2) and `temp_cell` (degC).
pub fn adjust_parameters(
    module: &SingleDiodeParams,
    effective_irradiance: f64,
    temp_cell: f64,
) -> AdjustedParams {
    let t_cell_k = temp_cell + 273.15;
    let band_gap = EG_REF * (1.0 + DEG_DT * (t_cell_k - T_REF_K));

    let photocurrent = effective_irradiance / IRRAD_REF
        * (module.i_l_ref + module.alpha_sc * (t_cell_k - T_REF_K));
    let saturation_current = module.i_o_ref
        * (t_cell_k / T_REF_K).powi(3)
        * (EG_REF / (BOLTZMANN_EV * T_REF_K) - band_gap / (BOLTZMANN_EV * t_cell_k)).exp();
    let shunt_resistance = module.r_sh_ref * IRRAD_REF / effective_irradiance;
    let n_ns_vth = module.a_ref * t_cell_k / T_REF_K;

    AdjustedParams {
        photocurrent,
        saturation_current,
        series_resistance: module.r_s,
        shunt_resistance,
        n_ns_vth,
    }
}

/// Terminal power at a given diode voltage.
fn power_at(p: &AdjustedParams, diode_voltage: f64) -> f64 {
    let current = p.photocurrent
        - p.saturation_current * (diode_voltage / p.n_ns_vth).exp_m1()
        - diode_voltage / p.shunt_resistance;
    let voltage = diode_voltage - current * p.series_resistance;
    voltage * current
}

/// Maximum-power-point power (W) for adjusted diode parameters.
///
/// Golden-section search over the diode voltage; the power curve is
/// unimodal between short circuit and open circuit.
pub fn max_power(p: &AdjustedParams) -> f64 {
    if !(p.photocurrent > 0.0)
        || !(p.saturation_current > 0.0)
        || !p.n_ns_vth.is_finite()
        || !p.shunt_resistance.is_finite()
    {
        return 0.0;
    }

    let vd_upper = p.n_ns_vth * (p.photocurrent / p.saturation_current + 1.0).ln();
    if !vd_upper.is_finite() || vd_upper <= 0.0 {
        return 0.0;
    }

    const GOLDEN: f64 = 0.618_033_988_749_895;
    let (mut lo, mut hi) = (0.0_f64, vd_upper);
    let mut x1 = hi - GOLDEN * (hi - lo);
    let mut x2 = lo + GOLDEN * (hi - lo);
    let mut f1 = power_at(p, x1);
    let mut f2 = power_at(p, x2);

    for _ in 0..96 {
        if f1 < f2 {
            lo = x1;
            x1 = x2;
            f1 = f2;
            x2 = lo + GOLDEN * (hi - lo);
            f2 = power_at(p, x2);
        } else {
            hi = x2;
            x2 = x1;
            f2 = f1;
            x1 = hi - GOLDEN * (hi - lo);
            f1 = power_at(p, x1);
        }
    }

    let best = f1.max(f2);
    if best.is_finite() {
        best.max(0.0)
    } else {
        0.0
    }
}

/// Relative conversion efficiency against STC-normalized output.
///
/// `eta = P(G, T_cell) / (P(1000, 25) * G/1000)`; zero irradiance or any
/// non-finite intermediate yields 0.
pub fn relative_efficiency(module: &SingleDiodeParams, irradiance: f64, temp_cell: f64) -> f64 {
    if !(irradiance > 0.0) || !temp_cell.is_finite() {
        return 0.0;
    }
    let power = max_power(&adjust_parameters(module, irradiance, temp_cell));
    let power_stc = max_power(&adjust_parameters(module, IRRAD_REF, 25.0));
    let denominator = power_stc * (irradiance / IRRAD_REF);
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    let efficiency = power / denominator;
    if efficiency.is_finite() {
        efficiency
    } else {
        0.0
    }
}
