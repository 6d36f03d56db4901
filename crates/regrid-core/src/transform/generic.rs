//! Arbitrary point mappings.
//!
//! A [`GenericTransform`] wraps a user-supplied mapping function and,
//! optionally, its inverse. Dense displacement fields are expressed as a
//! generic transform `x ↦ x + u(x)`.

use std::fmt;
use std::sync::Arc;
use crate::error::{RegridError, Result};
use crate::image::SampledImage;
use crate::interpolation::{linear, BoundaryPolicy};
use crate::spatial::{Point, Vector};

/// Shared point mapping function.
pub type PointMap<const D: usize> = Arc<dyn Fn(&Point<D>) -> Point<D> + Send + Sync>;

/// Transform defined by an arbitrary mapping function.
///
/// The mapping must be deterministic and is only required to be defined at
/// the points the caller queries.
#[derive(Clone)]
pub struct GenericTransform<const D: usize> {
    forward: PointMap<D>,
    inverse: Option<PointMap<D>>,
}

impl<const D: usize> GenericTransform<D> {
    /// Wrap a forward mapping with no known inverse.
    pub fn new(forward: impl Fn(&Point<D>) -> Point<D> + Send + Sync + 'static) -> Self {
        Self {
            forward: Arc::new(forward),
            inverse: None,
        }
    }

    /// Attach an inverse mapping.
    pub fn with_inverse(
        mut self,
        inverse: impl Fn(&Point<D>) -> Point<D> + Send + Sync + 'static,
    ) -> Self {
        self.inverse = Some(Arc::new(inverse));
        self
    }

    /// Dense displacement field transform `x ↦ x + u(x)`.
    ///
    /// `field` holds one `D`-component displacement vector per voxel. `u` is
    /// linearly interpolated between voxels and is zero outside the field.
    ///
    /// # Errors
    /// `ComponentMismatch` if the field does not have `D` components.
    pub fn displacement_field(field: SampledImage<f64, D>) -> Result<Self> {
        if field.components() != D {
            return Err(RegridError::ComponentMismatch {
                expected: D,
                actual: field.components(),
            });
        }
        let field = Arc::new(field);
        Ok(Self::new(move |point: &Point<D>| {
            let index = field.continuous_index(point);
            let mut displacement = [0.0; D];
            // Constant(0) never reports out of support.
            if linear::evaluate(&field, &index, BoundaryPolicy::Constant(0.0), &mut displacement)
                .is_err()
            {
                return *point;
            }
            *point + Vector::new(displacement)
        }))
    }

    /// Map a point.
    pub fn transform_point(&self, point: &Point<D>) -> Point<D> {
        (self.forward)(point)
    }

    /// Whether an inverse mapping was supplied.
    pub fn has_inverse(&self) -> bool {
        self.inverse.is_some()
    }

    /// Swap forward and inverse mappings.
    ///
    /// # Errors
    /// `NotInvertible` if no inverse mapping was supplied.
    pub fn inverse(&self) -> Result<Self> {
        match &self.inverse {
            Some(inverse) => Ok(Self {
                forward: Arc::clone(inverse),
                inverse: Some(Arc::clone(&self.forward)),
            }),
            None => Err(RegridError::not_invertible(
                "generic transform was built without an inverse mapping",
            )),
        }
    }
}

impl<const D: usize> fmt::Debug for GenericTransform<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenericTransform")
            .field("has_inverse", &self.has_inverse())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{ImageGrid, SampledImage};

    #[test]
    fn test_generic_forward() {
        let transform = GenericTransform::<2>::new(|p| Point::new([p[0] * p[0], p[1]]));
        assert_eq!(transform.transform_point(&Point::new([3.0, 1.0])), Point::new([9.0, 1.0]));
    }

    #[test]
    fn test_generic_without_inverse() {
        let transform = GenericTransform::<2>::new(|p| *p);
        assert!(matches!(transform.inverse(), Err(RegridError::NotInvertible(_))));
    }

    #[test]
    fn test_generic_with_inverse_swaps() {
        let transform = GenericTransform::<1>::new(|p| Point::new([p[0] * 2.0]))
            .with_inverse(|p| Point::new([p[0] / 2.0]));
        let inverse = transform.inverse().unwrap();
        assert_eq!(inverse.transform_point(&Point::new([8.0])), Point::new([4.0]));
        assert!(inverse.has_inverse());
        let again = inverse.inverse().unwrap();
        assert_eq!(again.transform_point(&Point::new([8.0])), Point::new([16.0]));
    }

    #[test]
    fn test_displacement_field_constant_shift() {
        let grid = ImageGrid::<2>::with_size([4, 4]).unwrap();
        let field = SampledImage::filled(grid, 2, 0.5).unwrap();
        let transform = GenericTransform::displacement_field(field).unwrap();

        let p = transform.transform_point(&Point::new([1.25, 2.0]));
        assert!((p[0] - 1.75).abs() < 1e-12);
        assert!((p[1] - 2.5).abs() < 1e-12);

        // Outside the field the displacement is zero.
        let far = Point::new([10.0, -3.0]);
        assert_eq!(transform.transform_point(&far), far);
    }

    #[test]
    fn test_displacement_field_interpolates() {
        let grid = ImageGrid::<1>::with_size([2]).unwrap();
        let field = SampledImage::from_buffer(grid, 1, vec![0.0, 1.0]).unwrap();
        let transform = GenericTransform::displacement_field(field).unwrap();
        let p = transform.transform_point(&Point::new([0.25]));
        assert!((p[0] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_displacement_field_component_check() {
        let grid = ImageGrid::<3>::with_size([2, 2, 2]).unwrap();
        let field = SampledImage::<f64, 3>::new(grid, 2).unwrap();
        assert!(matches!(
            GenericTransform::displacement_field(field),
            Err(RegridError::ComponentMismatch { expected: 3, actual: 2 })
        ));
    }
}
