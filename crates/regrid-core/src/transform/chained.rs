//! Chained transform implementation.
//!
//! This module provides a mechanism to chain transforms together.
//! T(x) = Tn(...T2(T1(x)))

use crate::error::Result;
use crate::spatial::Point;
use super::SpatialTransform;

/// Sequence of transforms applied first to last.
///
/// Links are never themselves `Chained`: nested chains are flattened on
/// construction.
#[derive(Debug, Clone)]
pub struct ChainedTransform<const D: usize> {
    links: Vec<SpatialTransform<D>>,
}

impl<const D: usize> ChainedTransform<D> {
    /// Create a new chained transform.
    ///
    /// Identity links are dropped and nested chains are spliced in place.
    pub fn new(links: impl IntoIterator<Item = SpatialTransform<D>>) -> Self {
        let mut flat = Vec::new();
        for link in links {
            match link {
                SpatialTransform::Identity => {}
                SpatialTransform::Chained(inner) => flat.extend(inner.links),
                other => flat.push(other),
            }
        }
        Self { links: flat }
    }

    /// Links in application order.
    pub fn links(&self) -> &[SpatialTransform<D>] {
        &self.links
    }

    /// Number of links.
    pub fn len(&self) -> usize {
        self.links.len()
    }

    /// Whether the chain has no links (acts as identity).
    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Apply every link in order.
    pub fn transform_point(&self, point: &Point<D>) -> Point<D> {
        self.links
            .iter()
            .fold(*point, |p, link| link.map(&p))
    }

    /// Invert each link and apply them in reverse order.
    ///
    /// # Errors
    /// The first inversion failure among the links.
    pub fn inverse(&self) -> Result<SpatialTransform<D>> {
        self.links
            .iter()
            .rev()
            .try_fold(SpatialTransform::Identity, |acc, link| {
                Ok(acc.compose(&link.inverse()?))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegridError;
    use crate::spatial::Vector;
    use crate::transform::{GenericTransform, TranslationTransform};

    fn shift(x: f64, y: f64) -> SpatialTransform<2> {
        TranslationTransform::new(Vector::new([x, y])).into()
    }

    #[test]
    fn test_chained_transform_2d() {
        let square = GenericTransform::<2>::new(|p| Point::new([p[0] * p[0], p[1]]));
        let chain = ChainedTransform::new([shift(1.0, 0.0), square.into(), shift(0.0, 1.0)]);

        // (1, 0) -> (2, 0) -> (4, 0) -> (4, 1)
        assert_eq!(chain.transform_point(&Point::new([1.0, 0.0])), Point::new([4.0, 1.0]));
        assert_eq!(chain.len(), 3);
    }

    #[test]
    fn test_chained_flattens() {
        let inner = ChainedTransform::new([shift(1.0, 0.0), shift(0.0, 1.0)]);
        let outer = ChainedTransform::new([
            SpatialTransform::Identity,
            SpatialTransform::Chained(inner),
            shift(2.0, 2.0),
        ]);
        assert_eq!(outer.len(), 3);
        assert!(outer
            .links()
            .iter()
            .all(|link| !matches!(link, SpatialTransform::Chained(_) | SpatialTransform::Identity)));
    }

    #[test]
    fn test_chained_inverse() {
        let double = GenericTransform::<2>::new(|p| Point::new([p[0] * 2.0, p[1] * 2.0]))
            .with_inverse(|p| Point::new([p[0] / 2.0, p[1] / 2.0]));
        let chain = ChainedTransform::new([shift(1.0, -1.0), double.into()]);
        let inverse = chain.inverse().unwrap();

        let p = Point::new([3.0, 5.0]);
        assert_eq!(inverse.map(&chain.transform_point(&p)), p);
    }

    #[test]
    fn test_chained_inverse_fails_on_missing_link_inverse() {
        let opaque = GenericTransform::<2>::new(|p| *p);
        let chain = ChainedTransform::new([shift(1.0, 0.0), opaque.into()]);
        assert!(matches!(chain.inverse(), Err(RegridError::NotInvertible(_))));
    }
}
