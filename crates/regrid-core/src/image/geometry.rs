//! Physical grid descriptor.
//!
//! [`ImageGeometry`] holds the origin, spacing and direction that embed a pixel
//! lattice in physical space, and converts between continuous indices and
//! physical points:
//!
//! * `point = origin + Direction * (spacing ⊙ index)`
//! * `index = (Direction^T * (point - origin)) ⊘ spacing`
//!
//! The direction is validated to be orthonormal at construction, so its
//! transpose is its inverse.

use serde::{Deserialize, Serialize};
use crate::error::{RegridError, Result};
use crate::spatial::{Direction, Point, Spacing};

/// Physical-space geometry of an image lattice.
///
/// Immutable once constructed; derive a modified copy with the `with_*`
/// methods, which re-validate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeometryParts<D>", into = "GeometryParts<D>")]
pub struct ImageGeometry<const D: usize> {
    /// Physical coordinate of the first pixel (index 0, 0, ...).
    origin: Point<D>,
    /// Physical distance between pixels along each axis.
    spacing: Spacing<D>,
    /// Orientation of the image axes (column i is axis i).
    direction: Direction<D>,
}

/// Unvalidated serialized form of [`ImageGeometry`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeometryParts<const D: usize> {
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
}

impl<const D: usize> TryFrom<GeometryParts<D>> for ImageGeometry<D> {
    type Error = RegridError;

    fn try_from(parts: GeometryParts<D>) -> Result<Self> {
        Self::new(parts.origin, parts.spacing, parts.direction)
    }
}

impl<const D: usize> From<ImageGeometry<D>> for GeometryParts<D> {
    fn from(geometry: ImageGeometry<D>) -> Self {
        Self {
            origin: geometry.origin,
            spacing: geometry.spacing,
            direction: geometry.direction,
        }
    }
}

impl<const D: usize> ImageGeometry<D> {
    /// Create a validated geometry.
    ///
    /// # Errors
    /// `InvalidGrid` if any spacing component is not finite and strictly
    /// positive, if the origin is not finite, or if `direction` is not
    /// orthonormal within 1e-6.
    pub fn new(origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Result<Self> {
        if !spacing.is_valid_spacing() {
            return Err(RegridError::invalid_grid(format!(
                "spacing must be finite and strictly positive, got {:?}",
                spacing.to_vec()
            )));
        }
        if !(0..D).all(|i| origin[i].is_finite()) {
            return Err(RegridError::invalid_grid(format!(
                "origin must be finite, got {:?}",
                origin.to_vec()
            )));
        }
        if !direction.is_orthogonal() {
            return Err(RegridError::invalid_grid(
                "direction matrix is not orthonormal within 1e-6",
            ));
        }
        Ok(Self {
            origin,
            spacing,
            direction,
        })
    }

    /// Geometry with the given origin and spacing and an identity direction.
    pub fn axis_aligned(origin: Point<D>, spacing: Spacing<D>) -> Result<Self> {
        Self::new(origin, spacing, Direction::identity())
    }

    /// Get the origin.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Get the spacing.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Get the direction.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }

    /// Copy of this geometry with a different origin.
    pub fn with_origin(&self, origin: Point<D>) -> Result<Self> {
        Self::new(origin, self.spacing, self.direction)
    }

    /// Copy of this geometry with a different spacing.
    pub fn with_spacing(&self, spacing: Spacing<D>) -> Result<Self> {
        Self::new(self.origin, spacing, self.direction)
    }

    /// Copy of this geometry with a different direction.
    pub fn with_direction(&self, direction: Direction<D>) -> Result<Self> {
        Self::new(self.origin, self.spacing, direction)
    }

    /// Convert a continuous index to a physical point.
    ///
    /// Defined for any real-valued index, which enables sub-voxel queries.
    pub fn index_to_physical(&self, index: &Point<D>) -> Point<D> {
        let scaled = index.coords().component_mul(&self.spacing);
        self.origin + self.direction * scaled
    }

    /// Convert a physical point to a continuous index.
    pub fn physical_to_index(&self, point: &Point<D>) -> Point<D> {
        let rotated = self.direction.transpose() * (*point - self.origin);
        Point::from_vector(rotated.component_div(&self.spacing))
    }

    /// Whether two geometries agree within `tolerance` on every parameter.
    pub fn approx_eq(&self, other: &Self, tolerance: f64) -> bool {
        (self.origin - other.origin).norm() <= tolerance
            && (self.spacing - other.spacing).norm() <= tolerance
            && (self.direction.0 - other.direction.0).norm() <= tolerance
    }
}

impl<const D: usize> Default for ImageGeometry<D> {
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: Spacing::uniform(1.0),
            direction: Direction::identity(),
        }
    }
}
