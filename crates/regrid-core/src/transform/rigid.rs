//! Rigid transform implementation.
//!
//! This module provides a rigid transform (rotation + translation).

use nalgebra::{Rotation2, Rotation3, UnitQuaternion, Quaternion};
use serde::{Deserialize, Serialize};
use crate::error::{RegridError, Result};
use crate::spatial::{Direction, Point, Vector};

/// Rigid Transform (Rotation + Translation).
///
/// Includes a fixed center of rotation: `T(x) = R(x - c) + c + t`.
/// `R` is validated to be a proper rotation (orthonormal, det = +1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RigidParts<D>", into = "RigidParts<D>")]
pub struct RigidTransform<const D: usize> {
    rotation: Direction<D>,
    translation: Vector<D>,
    center: Point<D>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RigidParts<const D: usize> {
    rotation: Direction<D>,
    translation: Vector<D>,
    center: Point<D>,
}

impl<const D: usize> TryFrom<RigidParts<D>> for RigidTransform<D> {
    type Error = RegridError;

    fn try_from(parts: RigidParts<D>) -> Result<Self> {
        Self::new(parts.rotation, parts.translation, parts.center)
    }
}

impl<const D: usize> From<RigidTransform<D>> for RigidParts<D> {
    fn from(rigid: RigidTransform<D>) -> Self {
        Self {
            rotation: rigid.rotation,
            translation: rigid.translation,
            center: rigid.center,
        }
    }
}

impl<const D: usize> RigidTransform<D> {
    /// Create a new rigid transform.
    ///
    /// # Arguments
    /// * `rotation` - Proper rotation matrix
    /// * `translation` - Translation applied after the rotation
    /// * `center` - Fixed center of rotation
    ///
    /// # Errors
    /// `InvalidTransform` if `rotation` is not orthonormal with determinant +1.
    pub fn new(rotation: Direction<D>, translation: Vector<D>, center: Point<D>) -> Result<Self> {
        if !rotation.is_proper_rotation() {
            return Err(RegridError::invalid_transform(format!(
                "rigid rotation must be orthonormal with determinant +1 (det = {})",
                rotation.determinant()
            )));
        }
        Ok(Self {
            rotation,
            translation,
            center,
        })
    }

    /// Create an identity rigid transform about the origin.
    pub fn identity() -> Self {
        Self {
            rotation: Direction::identity(),
            translation: Vector::zeros(),
            center: Point::origin(),
        }
    }

    /// Rotation matrix.
    pub fn rotation(&self) -> &Direction<D> {
        &self.rotation
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
        let rotated = self.rotation * (*point - self.center);
        self.center + (rotated + self.translation)
    }

    /// Exact inverse about the same center: `R' = R^T`, `t' = -R^T t`.
    pub fn inverse(&self) -> Self {
        let rotation = self.rotation.transpose();
        Self {
            rotation,
            translation: -(rotation * self.translation),
            center: self.center,
        }
    }

    /// `(M, o)` such that `T(x) = M x + o`, with `o = c + t - R c`.
    pub fn matrix_and_offset(&self) -> (Direction<D>, Vector<D>) {
        let c = self.center.coords();
        (self.rotation, c + self.translation - self.rotation * c)
    }

    /// Rebuild the centered form around `center` from a rotation and an offset.
    pub(crate) fn from_matrix_and_offset(
        rotation: Direction<D>,
        offset: Vector<D>,
        center: Point<D>,
    ) -> Self {
        let c = center.coords();
        Self {
            rotation,
            translation: offset - c + rotation * c,
            center,
        }
    }
}

impl RigidTransform<2> {
    /// 2D rotation by `angle` radians (counter-clockwise) about `center`.
    pub fn from_angle_2d(angle: f64, translation: Vector<2>, center: Point<2>) -> Self {
        let rotation = Rotation2::new(angle);
        Self {
            rotation: Direction(*rotation.matrix()),
            translation,
            center,
        }
    }
}

impl RigidTransform<3> {
    /// 3D rotation from Euler angles `[x, y, z]` in radians, applied as
    /// `R = Rz * Ry * Rx`.
    pub fn from_euler_3d(angles: [f64; 3], translation: Vector<3>, center: Point<3>) -> Self {
        let rotation = Rotation3::from_euler_angles(angles[0], angles[1], angles[2]);
        Self {
            rotation: Direction(*rotation.matrix()),
            translation,
            center,
        }
    }

    /// 3D rotation from a versor `[x, y, z, w]`. The quaternion is normalized.
    ///
    /// # Errors
    /// `InvalidTransform` for a zero or non-finite quaternion.
    pub fn from_versor(versor: [f64; 4], translation: Vector<3>, center: Point<3>) -> Result<Self> {
        let [x, y, z, w] = versor;
        let quaternion = Quaternion::new(w, x, y, z);
        let norm = quaternion.norm();
        if !norm.is_finite() || norm < 1e-12 {
            return Err(RegridError::invalid_transform(format!(
                "versor {:?} cannot be normalized",
                versor
            )));
        }
        let unit = UnitQuaternion::from_quaternion(quaternion);
        Ok(Self {
            rotation: Direction(*unit.to_rotation_matrix().matrix()),
            translation,
            center,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_point_eq<const D: usize>(a: &Point<D>, b: &Point<D>) {
        for i in 0..D {
            assert!((a[i] - b[i]).abs() < 1e-10, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn test_rigid_2d_rotation_about_center() {
        let transform =
            RigidTransform::from_angle_2d(FRAC_PI_2, Vector::zeros(), Point::new([1.0, 1.0]));
        // (2, 1) is one unit right of the center; rotating by 90 degrees moves it above.
        assert_point_eq(&transform.transform_point(&Point::new([2.0, 1.0])), &Point::new([1.0, 2.0]));
        assert_point_eq(&transform.transform_point(&Point::new([1.0, 1.0])), &Point::new([1.0, 1.0]));
    }

    #[test]
    fn test_rigid_3d_euler_z() {
        let transform = RigidTransform::from_euler_3d(
            [0.0, 0.0, FRAC_PI_2],
            Vector::new([1.0, 0.0, 0.0]),
            Point::origin(),
        );
        let p = transform.transform_point(&Point::new([1.0, 0.0, 0.0]));
        assert_point_eq(&p, &Point::new([1.0, 1.0, 0.0]));
    }

    #[test]
    fn test_rigid_euler_order_zyx() {
        let angles = [0.3, -0.2, 0.7];
        let transform = RigidTransform::from_euler_3d(angles, Vector::zeros(), Point::origin());
        let rx = Rotation3::from_axis_angle(&nalgebra::Vector3::x_axis(), angles[0]);
        let ry = Rotation3::from_axis_angle(&nalgebra::Vector3::y_axis(), angles[1]);
        let rz = Rotation3::from_axis_angle(&nalgebra::Vector3::z_axis(), angles[2]);
        let expected = rz * ry * rx;
        assert!((transform.rotation().inner() - expected.matrix()).abs().max() < 1e-12);
    }

    #[test]
    fn test_rigid_versor_matches_euler() {
        let half = FRAC_PI_2 / 2.0;
        let versor = RigidTransform::from_versor(
            [0.0, 0.0, half.sin(), half.cos()],
            Vector::zeros(),
            Point::origin(),
        )
        .unwrap();
        let euler = RigidTransform::from_euler_3d([0.0, 0.0, FRAC_PI_2], Vector::zeros(), Point::origin());
        assert!((versor.rotation().inner() - euler.rotation().inner()).abs().max() < 1e-12);
    }

    #[test]
    fn test_rigid_versor_zero_rejected() {
        assert!(matches!(
            RigidTransform::from_versor([0.0; 4], Vector::zeros(), Point::origin()),
            Err(RegridError::InvalidTransform(_))
        ));
    }

    #[test]
    fn test_rigid_rejects_reflection() {
        let reflection = Direction::<2>::from_diagonal([1.0, -1.0]);
        assert!(matches!(
            RigidTransform::new(reflection, Vector::zeros(), Point::origin()),
            Err(RegridError::InvalidTransform(_))
        ));
    }

    #[test]
    fn test_rigid_inverse_round_trip() {
        let transform = RigidTransform::from_euler_3d(
            [0.1, 0.4, -0.9],
            Vector::new([3.0, -1.0, 2.0]),
            Point::new([5.0, 5.0, 5.0]),
        );
        let inverse = transform.inverse();
        let p = Point::new([1.5, -2.0, 7.25]);
        assert_point_eq(&inverse.transform_point(&transform.transform_point(&p)), &p);
        assert_eq!(inverse.center(), transform.center());
    }

    #[test]
    fn test_rigid_matrix_and_offset_round_trip() {
        let transform = RigidTransform::from_angle_2d(0.6, Vector::new([1.0, 2.0]), Point::new([3.0, -4.0]));
        let (m, o) = transform.matrix_and_offset();
        let rebuilt = RigidTransform::from_matrix_and_offset(m, o, *transform.center());
        assert!((rebuilt.translation - transform.translation).norm() < 1e-12);
    }

    #[test]
    fn test_rigid_serde_validates() {
        let transform = RigidTransform::from_angle_2d(0.25, Vector::new([1.0, 0.0]), Point::origin());
        let json = serde_json::to_string(&transform).unwrap();
        let back: RigidTransform<2> = serde_json::from_str(&json).unwrap();
        assert_eq!(back, transform);

        let scaled = RigidParts::<2> {
            rotation: Direction::from_diagonal([2.0, 2.0]),
            translation: Vector::zeros(),
            center: Point::origin(),
        };
        let json = serde_json::to_string(&scaled).unwrap();
        assert!(serde_json::from_str::<RigidTransform<2>>(&json).is_err());
    }
}
