//! # Production Simulation
//!
//! End-to-end orchestration of the irradiance and device models, plus the
//! climatological monthly aggregation of the resulting series.

pub mod production;
pub mod seasonal;
