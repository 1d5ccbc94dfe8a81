mod types;

pub use types::{
    BrlCoefficients, BrlVariant, HourKind, Location, SolarAngles, SunEvent, Technology,
    TrackingMode,
};
