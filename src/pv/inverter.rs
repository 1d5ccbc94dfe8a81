//! # Inverter Model
//!
//! DC -> AC conversion through an empirical part-load efficiency curve with
//! clipping at the AC nameplate capacity.

use serde::{Deserialize, Serialize};

/// Inverter nameplate and efficiency figures.
///
/// With the default nominal efficiency of 1.0 the DC and AC nameplate
/// capacities coincide.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InverterSpec {
    /// AC nameplate capacity (W)
    pub ac_capacity: f64,
    /// Reference (weighted) efficiency of the curve
    pub eff_ref: f64,
    /// Nominal DC-to-AC efficiency
    pub eff_nom: f64,
}

impl InverterSpec {
    pub fn new(ac_capacity: f64) -> Self {
        Self {
            ac_capacity,
            eff_ref: 0.9637,
            eff_nom: 1.0,
        }
    }

    /// DC nameplate capacity derived from the AC side (W).
    pub fn dc_capacity(&self) -> f64 {
        self.ac_capacity / self.eff_nom
    }
}

/// Part-load inverter model.
#[derive(Debug, Clone, Copy)]
pub struct Inverter {
    ac_capacity: f64,
    dc_capacity: f64,
    efficiency_term: f64,
}

impl Inverter {
    pub fn new(spec: InverterSpec) -> Self {
        Self {
            ac_capacity: spec.ac_capacity,
            dc_capacity: spec.dc_capacity(),
            efficiency_term: spec.eff_nom / spec.eff_ref,
        }
    }

    /// AC output (W) for a DC input (W).
    ///
    /// Zero input short-circuits to zero output, which keeps the 1/zeta
    /// term of the curve out of a division by zero. Output never exceeds
    /// the AC nameplate and never goes negative.
    pub fn ac_output(&self, dc_in: f64) -> f64 {
        if dc_in == 0.0 {
            return 0.0;
        }
        let zeta = dc_in / self.dc_capacity;
        let efficiency = self.efficiency_term * (-0.0162 * zeta - 0.0059 / zeta + 0.9858);
        (dc_in * efficiency).min(self.ac_capacity).max(0.0)
    }
}
