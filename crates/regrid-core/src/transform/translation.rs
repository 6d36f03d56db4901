//! Translation transform implementation.

use serde::{Deserialize, Serialize};
use crate::spatial::{Direction, Point, Vector};

/// Simple Translation Transform.
///
/// Translates points by a fixed offset vector: `T(x) = x + t`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TranslationTransform<const D: usize> {
    translation: Vector<D>,
}

impl<const D: usize> TranslationTransform<D> {
    /// Create a new translation transform.
    pub fn new(translation: Vector<D>) -> Self {
        Self { translation }
    }

    /// Get the translation vector.
    pub fn translation(&self) -> &Vector<D> {
        &self.translation
    }

    /// Translate a point.
    pub fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point + self.translation
    }

    /// Exact inverse (negated offset).
    pub fn inverse(&self) -> Self {
        Self::new(-self.translation)
    }

    /// `(M, o)` such that `T(x) = M x + o`.
    pub fn matrix_and_offset(&self) -> (Direction<D>, Vector<D>) {
        (Direction::identity(), self.translation)
    }
}
