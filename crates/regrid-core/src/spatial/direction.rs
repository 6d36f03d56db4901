//! Direction type for representing image orientation.
//!
//! Direction matrices represent orientation of image axes in physical space.
//! The same type is used for the linear part of rigid and affine transforms.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};
use super::Vector;

/// Tolerance used when checking that a matrix is orthonormal.
pub const ORTHONORMAL_TOLERANCE: f64 = 1e-6;

/// Direction matrix representing image orientation.
///
/// The direction matrix is a D×D matrix where column i represents the
/// physical direction of the i-th image axis.
///
/// This is a thin wrapper around nalgebra's SMatrix to provide
/// domain-specific functionality while maintaining all nalgebra operations.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// Create an identity direction matrix (no rotation).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Create a zero matrix.
    pub fn zeros() -> Self {
        Self(SMatrix::zeros())
    }

    /// Create a matrix from rows.
    pub fn from_rows(rows: [[f64; D]; D]) -> Self {
        let mut m = Self::zeros();
        for (r, row) in rows.iter().enumerate() {
            for (c, value) in row.iter().enumerate() {
                m.0[(r, c)] = *value;
            }
        }
        m
    }

    /// Create a diagonal matrix.
    pub fn from_diagonal(diagonal: [f64; D]) -> Self {
        let mut m = Self::zeros();
        for (i, value) in diagonal.iter().enumerate() {
            m.0[(i, i)] = *value;
        }
        m
    }

    /// Check if direction matrix is orthonormal within [`ORTHONORMAL_TOLERANCE`].
    pub fn is_orthogonal(&self) -> bool {
        self.is_orthogonal_within(ORTHONORMAL_TOLERANCE)
    }

    /// Check if `M * M^T` is the identity within `tolerance`.
    pub fn is_orthogonal_within(&self, tolerance: f64) -> bool {
        let product = self.0 * self.0.transpose();
        (0..D).all(|i| {
            (0..D).all(|j| {
                let expected = if i == j { 1.0 } else { 0.0 };
                (product[(i, j)] - expected).abs() < tolerance
            })
        })
    }

    /// Check if direction matrix is a proper rotation (det = 1).
    pub fn is_proper_rotation(&self) -> bool {
        self.is_orthogonal() && (self.determinant() - 1.0).abs() < ORTHONORMAL_TOLERANCE
    }

    /// Compute the determinant of the matrix.
    ///
    /// Computes the determinant using cofactor expansion for D=2,3 and
    /// Gaussian elimination with partial pivoting for other dimensions.
    pub fn determinant(&self) -> f64 {
        match D {
            1 => self.0[(0, 0)],
            2 => self.0[(0, 0)] * self.0[(1, 1)] - self.0[(0, 1)] * self.0[(1, 0)],
            3 => {
                let a = self.0[(0, 0)];
                let b = self.0[(0, 1)];
                let c = self.0[(0, 2)];
                let d = self.0[(1, 0)];
                let e = self.0[(1, 1)];
                let f = self.0[(1, 2)];
                let g = self.0[(2, 0)];
                let h = self.0[(2, 1)];
                let i = self.0[(2, 2)];

                a * (e * i - f * h) - b * (d * i - f * g) + c * (d * h - e * g)
            }
            _ => {
                let mut m = self.0;
                let mut det = 1.0;

                for i in 0..D {
                    let mut pivot_idx = i;
                    let mut pivot_val = m[(i, i)].abs();

                    for k in (i + 1)..D {
                        let val = m[(k, i)].abs();
                        if val > pivot_val {
                            pivot_val = val;
                            pivot_idx = k;
                        }
                    }

                    if pivot_val < 1e-300 {
                        return 0.0;
                    }

                    if pivot_idx != i {
                        m.swap_rows(i, pivot_idx);
                        det = -det;
                    }

                    det *= m[(i, i)];

                    for j in (i + 1)..D {
                        let factor = m[(j, i)] / m[(i, i)];
                        for k in i..D {
                            m[(j, k)] -= factor * m[(i, k)];
                        }
                    }
                }

                det
            }
        }
    }

    /// Transposed matrix. For an orthonormal direction this is the inverse.
    pub fn transpose(&self) -> Self {
        Self(self.0.transpose())
    }

    /// Try to compute the inverse of the matrix.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// Get the axis directions (columns) as vectors.
    pub fn axis_directions(&self) -> Vec<Vector<D>> {
        (0..D)
            .map(|i| {
                let mut v = Vector::zeros();
                for j in 0..D {
                    v[j] = self.0[(j, i)];
                }
                v
            })
            .collect()
    }

    /// Get the inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }

    /// Get mutable reference to inner nalgebra matrix.
    pub fn inner_mut(&mut self) -> &mut SMatrix<f64, D, D> {
        &mut self.0
    }
}

impl<const D: usize> Default for Direction<D> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::IndexMut<(usize, usize)> for Direction<D> {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl<const D: usize> std::ops::Mul for Direction<D> {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        Self(self.0 * other.0)
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}
