//! Interpolation types and operations.
//!
//! This module provides the kernels that estimate pixel values at
//! continuous coordinates, and [`Interpolator`], which binds one kernel and
//! one boundary policy to a source image.

pub mod bspline;
pub mod linear;
pub mod method;
pub mod nearest;

pub use bspline::BSplineCoefficients;
pub use method::{BoundaryPolicy, InterpolationMethod, Support};

use tracing::debug;
use crate::error::{RegridError, Result};
use crate::image::{PixelValue, SampledImage};
use crate::spatial::Point;

/// Continuous indices within this distance of an integer are snapped to it.
pub const LATTICE_SNAP: f64 = 1e-8;

/// Snap coordinates that are within [`LATTICE_SNAP`] of an integer.
pub fn snap_to_lattice<const D: usize>(index: &Point<D>) -> Point<D> {
    let mut snapped = *index;
    for axis in 0..D {
        let rounded = index[axis].round();
        if (index[axis] - rounded).abs() <= LATTICE_SNAP {
            snapped[axis] = rounded;
        }
    }
    snapped
}

/// Read-only sampler bound to one image.
///
/// For [`InterpolationMethod::BSpline`] the spline coefficients are computed
/// once in [`new`](Self::new). Evaluation never mutates state, so one
/// interpolator can be shared across threads.
///
/// # Examples
/// ```rust
/// use regrid_core::image::{ImageGrid, SampledImage};
/// use regrid_core::interpolation::{BoundaryPolicy, InterpolationMethod, Interpolator};
/// use regrid_core::spatial::Point;
///
/// let grid = ImageGrid::<1>::with_size([3]).unwrap();
/// let image = SampledImage::from_buffer(grid, 1, vec![0.0f32, 10.0, 20.0]).unwrap();
/// let interpolator = Interpolator::new(&image, InterpolationMethod::Linear, BoundaryPolicy::Strict);
/// assert_eq!(interpolator.evaluate(&Point::new([1.5])).unwrap(), vec![15.0]);
/// ```
#[derive(Debug, Clone)]
pub struct Interpolator<'a, T, const D: usize> {
    image: &'a SampledImage<T, D>,
    method: InterpolationMethod,
    policy: BoundaryPolicy,
    spline: Option<BSplineCoefficients<D>>,
}

impl<'a, T: PixelValue, const D: usize> Interpolator<'a, T, D> {
    /// Bind an interpolator to `image`.
    pub fn new(image: &'a SampledImage<T, D>, method: InterpolationMethod, policy: BoundaryPolicy) -> Self {
        let spline = match method {
            InterpolationMethod::BSpline => Some(BSplineCoefficients::from_image(image)),
            _ => None,
        };
        debug!(
            "Interpolator {:?} ({:?}) bound to image of size {:?} with {} component(s){}",
            method,
            policy,
            image.size(),
            image.components(),
            if spline.is_some() { ", coefficients prefiltered" } else { "" }
        );
        Self {
            image,
            method,
            policy,
            spline,
        }
    }

    /// Interpolation method.
    pub fn method(&self) -> InterpolationMethod {
        self.method
    }

    /// Out-of-support policy.
    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    /// Source image.
    pub fn image(&self) -> &'a SampledImage<T, D> {
        self.image
    }

    /// Value at a physical point, one entry per component.
    ///
    /// # Errors
    /// `OutOfBounds` under [`BoundaryPolicy::Strict`] when the point is
    /// outside the support.
    pub fn evaluate(&self, point: &Point<D>) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.image.components()];
        self.evaluate_into(point, &mut out)?;
        Ok(out)
    }

    /// Allocation-free variant of [`evaluate`](Self::evaluate).
    ///
    /// # Errors
    /// `ComponentMismatch` if `out` does not hold one slot per component,
    /// otherwise as [`evaluate`](Self::evaluate).
    pub fn evaluate_into(&self, point: &Point<D>, out: &mut [f64]) -> Result<()> {
        self.sample_into(point, out).map(|_| ())
    }

    /// Value at a continuous index, bypassing the physical mapping.
    pub fn evaluate_index(&self, index: &Point<D>) -> Result<Vec<f64>> {
        let mut out = vec![0.0; self.image.components()];
        self.sample_index_into(index, &mut out)?;
        Ok(out)
    }

    /// Like [`evaluate_into`](Self::evaluate_into), also reporting whether
    /// the point was inside the support.
    pub fn sample_into(&self, point: &Point<D>, out: &mut [f64]) -> Result<Support> {
        let index = self.image.continuous_index(point);
        self.sample_index_into(&index, out)
    }

    /// Sample at a continuous index, reporting whether it was inside the
    /// support.
    pub fn sample_index_into(&self, index: &Point<D>, out: &mut [f64]) -> Result<Support> {
        if out.len() != self.image.components() {
            return Err(RegridError::ComponentMismatch {
                expected: self.image.components(),
                actual: out.len(),
            });
        }
        let index = snap_to_lattice(index);
        match (&self.spline, self.method) {
            (Some(spline), _) => spline.evaluate(&index, self.policy, out),
            (None, InterpolationMethod::NearestNeighbor) => {
                nearest::evaluate(self.image, &index, self.policy, out)
            }
            (None, _) => linear::evaluate(self.image, &index, self.policy, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageGeometry, ImageGrid};
    use crate::spatial::{Direction, Spacing};

    fn rotated_image() -> SampledImage<i16, 2> {
        let geometry = ImageGeometry::new(
            Point::new([5.0, -2.0]),
            Spacing::new([0.3, 0.7]),
            Direction::from_rows([[0.6, -0.8], [0.8, 0.6]]),
        )
        .unwrap();
        let grid = ImageGrid::new([5, 4], geometry).unwrap();
        SampledImage::from_fn(grid, |[x, y]| x as i16 * 7 - y as i16 * 3)
    }

    #[test]
    fn test_snap_to_lattice() {
        let snapped = snap_to_lattice(&Point::new([2.0 + 1e-10, 3.5, -1.0 - 5e-9]));
        assert_eq!(snapped, Point::new([2.0, 3.5, -1.0]));
        let untouched = snap_to_lattice(&Point::new([2.0 + 1e-6]));
        assert_eq!(untouched, Point::new([2.0 + 1e-6]));
    }

    #[test]
    fn test_every_method_exact_at_lattice() {
        let image = rotated_image();
        for method in [
            InterpolationMethod::NearestNeighbor,
            InterpolationMethod::Linear,
            InterpolationMethod::BSpline,
        ] {
            let interpolator = Interpolator::new(&image, method, BoundaryPolicy::Strict);
            for index in image.grid().indices().collect::<Vec<_>>() {
                let value = interpolator.evaluate(&image.physical_point(index)).unwrap();
                let expected = image.get(index).unwrap()[0] as f64;
                assert!(
                    (value[0] - expected).abs() < 1e-8,
                    "{:?} at {:?}: {} != {}",
                    method,
                    index,
                    value[0],
                    expected
                );
            }
        }
    }

    #[test]
    fn test_evaluate_into_checks_length() {
        let image = rotated_image();
        let interpolator = Interpolator::new(&image, InterpolationMethod::Linear, BoundaryPolicy::Clamp);
        let mut out = [0.0; 2];
        assert!(matches!(
            interpolator.evaluate_into(&Point::new([5.0, -2.0]), &mut out),
            Err(RegridError::ComponentMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_strict_out_of_bounds() {
        let image = rotated_image();
        let interpolator = Interpolator::new(&image, InterpolationMethod::Linear, BoundaryPolicy::Strict);
        let err = interpolator.evaluate_index(&Point::new([-0.5, 1.0])).unwrap_err();
        assert!(err.is_out_of_bounds());
    }

    #[test]
    fn test_constant_policy_reports_outside() {
        let image = rotated_image();
        let interpolator =
            Interpolator::new(&image, InterpolationMethod::NearestNeighbor, BoundaryPolicy::Constant(-9.0));
        let mut out = [0.0];
        let support = interpolator
            .sample_index_into(&Point::new([10.0, 0.0]), &mut out)
            .unwrap();
        assert_eq!(support, Support::Outside);
        assert_eq!(out, [-9.0]);
    }
}
