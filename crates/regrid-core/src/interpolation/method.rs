//! Interpolation method and out-of-support policy selectors.

use serde::{Deserialize, Serialize};

/// Kernel used to estimate values between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationMethod {
    /// Value of the nearest sample (ties round away from zero).
    NearestNeighbor,
    /// Multilinear blend of the 2^D surrounding samples.
    #[default]
    Linear,
    /// Cubic B-spline over the 4^D surrounding prefiltered coefficients.
    BSpline,
}

impl InterpolationMethod {
    /// Kernel width in samples along each axis.
    pub fn support_width(&self) -> usize {
        match self {
            Self::NearestNeighbor => 1,
            Self::Linear => 2,
            Self::BSpline => 4,
        }
    }
}

/// What an interpolator does for a query outside its support.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Every component of the result is the given value.
    Constant(f64),
    /// Neighbor indices are clamped into the image before weighting.
    /// B-spline clamps the query index instead and keeps mirrored neighbors.
    Clamp,
    /// The query fails with `OutOfBounds`.
    Strict,
}

impl Default for BoundaryPolicy {
    fn default() -> Self {
        Self::Strict
    }
}

/// Whether a query fell inside the interpolation support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Support {
    /// All needed neighbors exist.
    Inside,
    /// The result came from the boundary policy.
    Outside,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_method_default_is_linear() {
        assert_eq!(InterpolationMethod::default(), InterpolationMethod::Linear);
        assert_eq!(InterpolationMethod::BSpline.support_width(), 4);
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&InterpolationMethod::NearestNeighbor).unwrap(),
            "\"nearest_neighbor\""
        );
        let policy: BoundaryPolicy = serde_json::from_str("{\"constant\":-1.0}").unwrap();
        assert_eq!(policy, BoundaryPolicy::Constant(-1.0));
        let policy: BoundaryPolicy = serde_json::from_str("\"clamp\"").unwrap();
        assert_eq!(policy, BoundaryPolicy::Clamp);
    }
}
