//! Resampling configuration.
//!
//! [`ResampleConfig`] gathers every knob of a resampling run so it can be
//! stored alongside a pipeline definition and loaded back with serde.

use serde::{Deserialize, Serialize};
use crate::error::{RegridError, Result};
use crate::interpolation::{BoundaryPolicy, InterpolationMethod};

/// Which way the supplied transform maps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformDirection {
    /// Output physical points map to input physical points (used as is).
    #[default]
    OutputToInput,
    /// Input points map to output points; inverted before resampling.
    InputToOutput,
}

/// Settings for a resampling run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResampleConfig {
    /// Interpolation kernel.
    pub method: InterpolationMethod,
    /// Policy for samples outside the interpolation support. Under
    /// `Strict`, such samples receive `default_pixel_value`.
    pub boundary: BoundaryPolicy,
    /// Value written to every component of out-of-support samples.
    pub default_pixel_value: f64,
    /// Convention of the supplied transform.
    pub transform_direction: TransformDirection,
    /// Fill output chunks on the rayon pool.
    pub parallel: bool,
    /// Voxels per work chunk; cancellation is checked once per chunk.
    pub chunk_voxels: usize,
}

impl Default for ResampleConfig {
    fn default() -> Self {
        Self {
            method: InterpolationMethod::Linear,
            boundary: BoundaryPolicy::Strict,
            default_pixel_value: 0.0,
            transform_direction: TransformDirection::OutputToInput,
            parallel: true,
            chunk_voxels: 4096,
        }
    }
}

impl ResampleConfig {
    /// Set the interpolation method.
    pub fn with_method(mut self, method: InterpolationMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the boundary policy.
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    /// Set the default pixel value.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    /// Set the transform direction.
    pub fn with_transform_direction(mut self, direction: TransformDirection) -> Self {
        self.transform_direction = direction;
        self
    }

    /// Enable or disable parallel execution.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Set the chunk size in voxels.
    pub fn with_chunk_voxels(mut self, chunk_voxels: usize) -> Self {
        self.chunk_voxels = chunk_voxels;
        self
    }

    /// Check the configuration.
    ///
    /// # Errors
    /// `InvalidConfiguration` for a zero chunk size or a non-finite default
    /// pixel value or constant boundary value.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_voxels == 0 {
            return Err(RegridError::invalid_configuration("chunk_voxels must be positive"));
        }
        if !self.default_pixel_value.is_finite() {
            return Err(RegridError::invalid_configuration(format!(
                "default_pixel_value must be finite, got {}",
                self.default_pixel_value
            )));
        }
        if let BoundaryPolicy::Constant(value) = self.boundary {
            if !value.is_finite() {
                return Err(RegridError::invalid_configuration(format!(
                    "constant boundary value must be finite, got {}",
                    value
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
    fn test_default_config() {
        let config = ResampleConfig::default();
        assert_eq!(config.method, InterpolationMethod::Linear);
        assert_eq!(config.boundary, BoundaryPolicy::Strict);
        assert_eq!(config.transform_direction, TransformDirection::OutputToInput);
        assert!(config.parallel);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate() {
        assert!(ResampleConfig::default().with_chunk_voxels(0).validate().is_err());
        assert!(ResampleConfig::default()
            .with_default_pixel_value(f64::NAN)
            .validate()
            .is_err());
        assert!(ResampleConfig::default()
            .with_boundary(BoundaryPolicy::Constant(f64::INFINITY))
            .validate()
            .is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ResampleConfig =
            serde_json::from_str(r#"{"method": "b_spline", "parallel": false}"#).unwrap();
        assert_eq!(config.method, InterpolationMethod::BSpline);
        assert!(!config.parallel);
        assert_eq!(config.chunk_voxels, ResampleConfig::default().chunk_voxels);
    }

    #[test]
    fn test_json_round_trip() {
        let config = ResampleConfig::default()
            .with_method(InterpolationMethod::NearestNeighbor)
            .with_boundary(BoundaryPolicy::Constant(-1.0))
            .with_transform_direction(TransformDirection::InputToOutput);
        let json = serde_json::to_string(&config).unwrap();
        let back: ResampleConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back, config);
    }
}
