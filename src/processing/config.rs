use serde::{Serialize, Deserialize};
use crate::utils::ValidationError;

/// Tuning for [`ImageCompressor`](super::ImageCompressor)'s size-reduction loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Re-encode attempts after the first one
    pub max_iterations: u32,
    /// Factor applied to the quality on every attempt
    pub quality_step: f64,
    /// Factor applied to width and height on every attempt
    pub dimension_step: f64,
    /// Smallest width or height an attempt may produce
    pub min_dimension: u32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            quality_step: 0.95,
            dimension_step: 0.95,
            min_dimension: 1,
        }
    }
}

impl CompressorConfig {
    /// Checks that every step factor shrinks and the iteration count is sane.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_iterations > 100 {
            return Err(ValidationError::settings(format!(
                "Invalid max_iterations: {}. Must be at most 100",
                self.max_iterations
            )));
        }
        for (name, value) in [("quality_step", self.quality_step), ("dimension_step", self.dimension_step)] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ValidationError::settings(format!(
                    "Invalid {name}: {value}. Must be between 0 and 1 (exclusive)"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config: CompressorConfig = serde_json::from_str(r#"{"max_iterations": 3}"#).unwrap();
        assert_eq!(config.max_iterations, 3);
        assert_eq!(config.quality_step, 0.95);
        assert_eq!(config.min_dimension, 1);
    }

    #[test]
    fn rejects_steps_that_do_not_shrink() {
        assert!(CompressorConfig::default().validate().is_ok());

        let grow = CompressorConfig { dimension_step: 1.2, ..Default::default() };
        assert!(matches!(grow.validate(), Err(ValidationError::Settings(_))));

        let stuck = CompressorConfig { quality_step: 1.0, ..Default::default() };
        assert!(stuck.validate().is_err());

        let endless = CompressorConfig { max_iterations: u32::MAX, ..Default::default() };
        assert!(endless.validate().is_err());
    }
}
