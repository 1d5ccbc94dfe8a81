use thiserror::Error;

/// Errors surfaced by the simulation engine.
///
/// Numeric degeneracies (night-time divisions, logs of non-positive
/// irradiance, zero DC input) are resolved locally by the components and
/// never appear here.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing input series: {0}")]
    MissingSeries(&'static str),
}

impl From<validator::ValidationErrors> for EngineError {
    fn from(errors: validator::ValidationErrors) -> Self {
        EngineError::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = EngineError::Validation("latitude out of range".to_string());
        assert_eq!(err.to_string(), "Validation error: latitude out of range");

        let err = EngineError::MissingSeries("diffuse_fraction");
        assert_eq!(err.to_string(), "Missing input series: diffuse_fraction");
    }
}
