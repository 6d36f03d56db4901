//! Transform types and operations.
//!
//! This module provides spatial transforms mapping physical points of one
//! space into another. Forward maps go from the fixed (output) space to the
//! moving (input) space, which is what resampling consumes directly.
//!
//! [`SpatialTransform`] is a closed set of variants so composition and
//! inversion can pick closed forms per pair of variants.

pub mod affine;
pub mod chained;
pub mod generic;
pub mod rigid;
pub mod translation;

pub use affine::AffineTransform;
pub use chained::ChainedTransform;
pub use generic::{GenericTransform, PointMap};
pub use rigid::RigidTransform;
pub use translation::TranslationTransform;

use crate::error::Result;
use crate::spatial::{Direction, Point, Vector};

/// A mapping from one physical space to another.
#[derive(Debug, Clone, Default)]
pub enum SpatialTransform<const D: usize> {
    /// `T(x) = x`.
    #[default]
    Identity,
    /// `T(x) = x + t`.
    Translation(TranslationTransform<D>),
    /// `T(x) = R(x - c) + c + t` with `R` a proper rotation.
    Rigid(RigidTransform<D>),
    /// `T(x) = A(x - c) + c + t`.
    Affine(AffineTransform<D>),
    /// Arbitrary mapping function.
    Generic(GenericTransform<D>),
    /// Links applied in order.
    Chained(ChainedTransform<D>),
}

impl<const D: usize> SpatialTransform<D> {
    /// Map a single point.
    pub fn map(&self, point: &Point<D>) -> Point<D> {
        match self {
            Self::Identity => *point,
            Self::Translation(t) => t.transform_point(point),
            Self::Rigid(t) => t.transform_point(point),
            Self::Affine(t) => t.transform_point(point),
            Self::Generic(t) => t.transform_point(point),
            Self::Chained(t) => t.transform_point(point),
        }
    }

    /// Map a batch of points.
    pub fn map_points(&self, points: &[Point<D>]) -> Vec<Point<D>> {
        points.iter().map(|p| self.map(p)).collect()
    }

    /// Inverse transform.
    ///
    /// # Errors
    /// * `Singular` for an affine transform with `|det(A)| < 1e-12`
    /// * `NotInvertible` for a generic transform without an inverse mapping,
    ///   or a chain containing one
    pub fn inverse(&self) -> Result<Self> {
        Ok(match self {
            Self::Identity => Self::Identity,
            Self::Translation(t) => Self::Translation(t.inverse()),
            Self::Rigid(t) => Self::Rigid(t.inverse()),
            Self::Affine(t) => Self::Affine(t.inverse()?),
            Self::Generic(t) => Self::Generic(t.inverse()?),
            Self::Chained(t) => t.inverse()?,
        })
    }

    /// Transform applying `self` first and then `other`: `x ↦ other(self(x))`.
    ///
    /// Translation pairs stay translations, translation and rigid pairs stay
    /// rigid, and any linear pair involving an affine collapses into a single
    /// affine. Everything else becomes a flattened chain.
    pub fn compose(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Identity, _) => other.clone(),
            (_, Self::Identity) => self.clone(),
            (Self::Translation(a), Self::Translation(b)) => {
                Self::Translation(TranslationTransform::new(*a.translation() + *b.translation()))
            }
            _ => match (self.matrix_and_offset(), other.matrix_and_offset()) {
                (Some((m1, o1)), Some((m2, o2))) => {
                    let matrix = m2 * m1;
                    let offset = m2 * o1 + o2;
                    if self.is_affine() || other.is_affine() {
                        Self::Affine(AffineTransform::from_matrix_and_offset(matrix, offset))
                    } else {
                        let center = self
                            .center()
                            .or_else(|| other.center())
                            .unwrap_or_else(Point::origin);
                        Self::Rigid(RigidTransform::from_matrix_and_offset(matrix, offset, center))
                    }
                }
                _ => Self::Chained(ChainedTransform::new([self.clone(), other.clone()])),
            },
        }
    }

    /// Whether the transform is affine in closed form (Identity, Translation,
    /// Rigid or Affine).
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            Self::Identity | Self::Translation(_) | Self::Rigid(_) | Self::Affine(_)
        )
    }

    /// `(M, o)` such that `T(x) = M x + o`, for linear variants only.
    pub fn matrix_and_offset(&self) -> Option<(Direction<D>, Vector<D>)> {
        match self {
            Self::Identity => Some((Direction::identity(), Vector::zeros())),
            Self::Translation(t) => Some(t.matrix_and_offset()),
            Self::Rigid(t) => Some(t.matrix_and_offset()),
            Self::Affine(t) => Some(t.matrix_and_offset()),
            Self::Generic(_) | Self::Chained(_) => None,
        }
    }

    fn is_affine(&self) -> bool {
        matches!(self, Self::Affine(_))
    }

    fn center(&self) -> Option<Point<D>> {
        match self {
            Self::Rigid(t) => Some(*t.center()),
            Self::Affine(t) => Some(*t.center()),
            _ => None,
        }
    }
}

impl<const D: usize> From<TranslationTransform<D>> for SpatialTransform<D> {
    fn from(t: TranslationTransform<D>) -> Self {
        Self::Translation(t)
    }
}

impl<const D: usize> From<RigidTransform<D>> for SpatialTransform<D> {
    fn from(t: RigidTransform<D>) -> Self {
        Self::Rigid(t)
    }
}

impl<const D: usize> From<AffineTransform<D>> for SpatialTransform<D> {
    fn from(t: AffineTransform<D>) -> Self {
        Self::Affine(t)
    }
}

impl<const D: usize> From<GenericTransform<D>> for SpatialTransform<D> {
    fn from(t: GenericTransform<D>) -> Self {
        Self::Generic(t)
    }
}

impl<const D: usize> From<ChainedTransform<D>> for SpatialTransform<D> {
    fn from(t: ChainedTransform<D>) -> Self {
        Self::Chained(t)
    }
}
