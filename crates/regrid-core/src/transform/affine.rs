//! Affine transform implementation.
//!
//! This module provides an affine transform (linear transformation + translation).

use serde::{Deserialize, Serialize};
use crate::error::{RegridError, Result};
use crate::spatial::{Direction, Point, Vector};

/// Determinant magnitude below which a linear part is treated as singular.
pub const SINGULAR_TOLERANCE: f64 = 1e-12;

/// Affine Transform (Linear transformation + Translation).
///
/// Represents a general affine transformation with a fixed center:
/// T(x) = A(x - c) + c + t
///
/// where:
/// * A is a D×D matrix (linear transformation: rotation, scale, shear)
/// * t is a D-dimensional translation vector
/// * c is a D-dimensional fixed center of rotation/scaling
///
/// The matrix may be singular; only [`inverse`](Self::inverse) cares.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AffineTransform<const D: usize> {
    matrix: Direction<D>,
    translation: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> AffineTransform<D> {
    /// Create a new affine transform.
    ///
    /// # Arguments
    /// * `matrix` - D×D linear transformation matrix
    /// * `translation` - Translation vector
    /// * `center` - Fixed center
    pub fn new(matrix: Direction<D>, translation: Vector<D>, center: Point<D>) -> Self {
        Self {
            matrix,
            translation,
            center,
        }
    }

    /// Create an identity affine transform.
    pub fn identity() -> Self {
        Self::new(Direction::identity(), Vector::zeros(), Point::origin())
    }

    /// Axis-aligned scaling about `center`.
    pub fn scaling(scales: [f64; D], center: Point<D>) -> Self {
        Self::new(Direction::from_diagonal(scales), Vector::zeros(), center)
    }

    /// Build from the uncentered form `T(x) = M x + o` (center at the origin).
    pub fn from_matrix_and_offset(matrix: Direction<D>, offset: Vector<D>) -> Self {
        Self::new(matrix, offset, Point::origin())
    }

    /// Get the transformation matrix.
    pub fn matrix(&self) -> &Direction<D> {
        &self.matrix
    }

    /// Get the translation vector.
    pub fn translation(&self) -> &Vector<D> {
        &self.translation
    }

    /// Get the center of rotation.
    pub fn center(&self) -> &Point<D> {
        &self.center
    }

    /// Map a point.
    pub fn transform_point(&self, point: &Point<D>) -> Point<D> {
        let linear = self.matrix * (*point - self.center);
        self.center + (linear + self.translation)
    }

    /// `(M, o)` such that `T(x) = M x + o`, with `o = c + t - A c`.
    pub fn matrix_and_offset(&self) -> (Direction<D>, Vector<D>) {
        let c = self.center.coords();
        (self.matrix, c + self.translation - self.matrix * c)
    }

    /// Inverse about the same center: `A' = A^-1`, `t' = -A^-1 t`.
    ///
    /// # Errors
    /// `Singular` if `|det(A)|` is below [`SINGULAR_TOLERANCE`].
    pub fn inverse(&self) -> Result<Self> {
        let determinant = self.matrix.determinant();
        if determinant.abs() < SINGULAR_TOLERANCE {
            return Err(RegridError::Singular { determinant });
        }
        let inverse = self
            .matrix
            .try_inverse()
            .ok_or(RegridError::Singular { determinant })?;
        Ok(Self {
            matrix: inverse,
            translation: -(inverse * self.translation),
            center: self.center,
        })
    }
}

impl<const D: usize> Default for AffineTransform<D> {
    fn default() -> Self {
        Self::identity()
    }
}
