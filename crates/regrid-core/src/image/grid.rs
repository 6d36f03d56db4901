//! Sized pixel lattice in physical space.
//!
//! An [`ImageGrid`] pairs a voxel count per axis with an [`ImageGeometry`]. It
//! owns the flattening convention shared by every buffer in this crate:
//! axis 0 varies fastest, so for a 3D grid the flat offset is
//! `x + size_x * (y + size_y * z)`. Viewed as a row-major tensor the buffer
//! has shape `[.., size_y, size_x]`.

use crate::error::{RegridError, Result};
use crate::image::ImageGeometry;
use crate::spatial::Point;

/// Voxel counts plus the geometry that places them in physical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageGrid<const D: usize> {
    size: [usize; D],
    geometry: ImageGeometry<D>,
}

impl<const D: usize> ImageGrid<D> {
    /// Create a grid.
    ///
    /// # Errors
    /// `InvalidGrid` if any axis has zero voxels or the voxel count overflows.
    pub fn new(size: [usize; D], geometry: ImageGeometry<D>) -> Result<Self> {
        if size.iter().any(|&s| s == 0) {
            return Err(RegridError::invalid_grid(format!(
                "every axis needs at least one voxel, got size {:?}",
                size
            )));
        }
        if size.iter().try_fold(1usize, |acc, &s| acc.checked_mul(s)).is_none() {
            return Err(RegridError::invalid_grid(format!(
                "voxel count of size {:?} overflows",
                size
            )));
        }
        Ok(Self { size, geometry })
    }

    /// Rebuild a grid from a size that is already known to be valid.
    pub(crate) fn from_parts(size: [usize; D], geometry: ImageGeometry<D>) -> Self {
        Self { size, geometry }
    }

    /// Grid with default geometry (zero origin, unit spacing, identity direction).
    pub fn with_size(size: [usize; D]) -> Result<Self> {
        Self::new(size, ImageGeometry::default())
    }

    /// Voxel counts per axis.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Physical geometry.
    pub fn geometry(&self) -> &ImageGeometry<D> {
        &self.geometry
    }

    /// Total number of voxels.
    pub fn num_voxels(&self) -> usize {
        self.size.iter().product()
    }

    /// Whether an integer index lies inside the grid.
    pub fn contains(&self, index: &[usize; D]) -> bool {
        index.iter().zip(self.size.iter()).all(|(&i, &s)| i < s)
    }

    /// Flat offset of an index, or `None` if it lies outside the grid.
    pub fn flat_index(&self, index: &[usize; D]) -> Option<usize> {
        if !self.contains(index) {
            return None;
        }
        let mut flat = 0;
        for axis in (0..D).rev() {
            flat = flat * self.size[axis] + index[axis];
        }
        Some(flat)
    }

    /// Inverse of [`flat_index`](Self::flat_index) for `flat < num_voxels()`.
    pub fn unravel(&self, flat: usize) -> [usize; D] {
        let mut rest = flat;
        let mut index = [0usize; D];
        for (axis, slot) in index.iter_mut().enumerate() {
            *slot = rest % self.size[axis];
            rest /= self.size[axis];
        }
        index
    }

    /// Every index of the grid in flat order.
    pub fn indices(&self) -> impl Iterator<Item = [usize; D]> + '_ {
        (0..self.num_voxels()).map(move |flat| self.unravel(flat))
    }

    /// Physical location of an integer index.
    pub fn physical_point(&self, index: &[usize; D]) -> Point<D> {
        self.geometry.index_to_physical(&Point::from_index(*index))
    }

    /// Physical locations of the `2^D` corner voxels of the grid.
    pub fn physical_extent(&self) -> Vec<Point<D>> {
        (0..1usize << D)
            .map(|mask| {
                let corner: [usize; D] = std::array::from_fn(|axis| {
                    if mask & (1 << axis) != 0 {
                        self.size[axis] - 1
                    } else {
                        0
                    }
                });
                self.physical_point(&corner)
            })
            .collect()
    }

    /// Whether two grids have the same size and geometries within `tolerance`.
    pub fn same_grid(&self, other: &Self, tolerance: f64) -> bool {
        self.size == other.size && self.geometry.approx_eq(&other.geometry, tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::{Direction, Spacing};

    #[test]
    fn test_rejects_empty_axis() {
        assert!(matches!(
            ImageGrid::<2>::with_size([4, 0]),
            Err(RegridError::InvalidGrid(_))
        ));
    }

    #[test]
    fn test_flat_index_axis_zero_fastest() {
        let grid = ImageGrid::<3>::with_size([4, 3, 2]).unwrap();
        assert_eq!(grid.num_voxels(), 24);
        assert_eq!(grid.flat_index(&[0, 0, 0]), Some(0));
        assert_eq!(grid.flat_index(&[1, 0, 0]), Some(1));
        assert_eq!(grid.flat_index(&[0, 1, 0]), Some(4));
        assert_eq!(grid.flat_index(&[0, 0, 1]), Some(12));
        assert_eq!(grid.flat_index(&[3, 2, 1]), Some(23));
        assert_eq!(grid.flat_index(&[4, 0, 0]), None);
    }

    #[test]
    fn test_unravel_inverts_flat_index() {
        let grid = ImageGrid::<3>::with_size([4, 3, 2]).unwrap();
        for (flat, index) in grid.indices().enumerate() {
            assert_eq!(grid.flat_index(&index), Some(flat));
        }
        assert_eq!(grid.unravel(23), [3, 2, 1]);
    }

    #[test]
    fn test_physical_extent() {
        let geometry = ImageGeometry::new(
            Point::<2>::new([10.0, -5.0]),
            Spacing::<2>::new([2.0, 0.5]),
            Direction::identity(),
        )
        .unwrap();
        let grid = ImageGrid::new([3, 5], geometry).unwrap();
        let corners = grid.physical_extent();
        assert_eq!(corners.len(), 4);
        assert_eq!(corners[0], Point::<2>::new([10.0, -5.0]));
        assert_eq!(corners[3], Point::<2>::new([14.0, -3.0]));
    }

    #[test]
    fn test_same_grid() {
        let a = ImageGrid::<2>::with_size([3, 3]).unwrap();
        let b = ImageGrid::<2>::with_size([3, 3]).unwrap();
        let c = ImageGrid::<2>::with_size([3, 4]).unwrap();
        assert!(a.same_grid(&b, 1e-9));
        assert!(!a.same_grid(&c, 1e-9));
    }
}
