use serde::{Deserialize, Serialize};

/// Physical reference constants threaded through every component call.
///
/// There is no hidden global configuration: each simulator borrows one of
/// these records, and two runs with identical constants and inputs produce
/// bit-identical output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConstants {
    /// Solar constant used for extraterrestrial irradiance (W/m2)
    pub solar_constant: f64,
    /// Reference ambient temperature (degC)
    pub reference_ambient_temp: f64,
    /// Reference module temperature (degC)
    pub reference_module_temp: f64,
    /// Reference irradiance (W/m2)
    pub reference_irradiance: f64,
    /// Reference wind speed (m/s)
    pub reference_windspeed: f64,
    /// Ground reflectance used for the diffuse ground contribution
    pub albedo: f64,
}

impl Default for ModelConstants {
    fn default() -> Self {
        Self {
            solar_constant: 1316.0,
            reference_ambient_temp: 20.0,
            reference_module_temp: 25.0,
            reference_irradiance: 1000.0,
            reference_windspeed: 5.0,
            albedo: 0.3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = ModelConstants::default();
        assert_eq!(constants.solar_constant, 1316.0);
        assert_eq!(constants.reference_irradiance, 1000.0);
        assert_eq!(constants.reference_module_temp, 25.0);
        assert_eq!(constants.albedo, 0.3);
    }

    #[test]
    fn test_constants_roundtrip() {
        let constants = ModelConstants::default();
        let json = serde_json::to_string(&constants).unwrap();
        let back: ModelConstants = serde_json::from_str(&json).unwrap();
        assert_eq!(back.solar_constant, constants.solar_constant);
        assert_eq!(back.reference_windspeed, constants.reference_windspeed);
    }
}
