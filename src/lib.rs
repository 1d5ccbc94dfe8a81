//! # Solar Yield Engine
//!
//! Solar-irradiance decomposition and PV production simulation: given a
//! horizontal irradiance time series, a location, and a PV system
//! configuration (tilt, azimuth, tracking mode, technology, nameplate
//! capacity), the engine produces an AC power time series and/or
//! climatological monthly means.
//!
//! The pipeline, leaves first:
//!
//! 1. [`solar::geometry`] - sun position and day/night bookkeeping
//! 2. [`solar::clearness`] - GHI to clearness index via the orbit-corrected
//!    extraterrestrial irradiance
//! 3. [`solar::diffuse`] - clearness index to diffuse fraction (BRL model)
//! 4. [`solar::transposition`] - horizontal to in-plane irradiance for fixed
//!    or tracked apertures
//! 5. [`pv`] - panel and inverter device models
//! 6. [`simulation`] - end-to-end production runs and seasonal aggregation
//!
//! The engine is a pure, stateless batch transform: no I/O, no global
//! state, identical inputs produce bit-identical outputs. Data retrieval
//! lives behind the [`acquisition::IrradianceProvider`] seam.

pub mod acquisition;
pub mod config;
pub mod domain;
pub mod error;
pub mod pv;
pub mod series;
pub mod simulation;
pub mod solar;

pub use config::ModelConstants;
pub use domain::{
    BrlCoefficients, BrlVariant, HourKind, Location, SolarAngles, SunEvent, Technology,
    TrackingMode,
};
pub use error::{EngineError, Result};
pub use series::TimeSeries;
pub use simulation::production::{
    ProductionSeries, ProductionSimulator, RawChannels, SimulationInputs, SimulationRequest,
};
pub use simulation::seasonal::{SeasonalAggregator, SeasonalProfile};
