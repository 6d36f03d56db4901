//! Sampled image with physical metadata.
//!
//! [`SampledImage`] owns a dense buffer of pixels addressed by an
//! N-dimensional index and paired with the [`ImageGrid`] that places those
//! pixels in physical space. Every pixel is a fixed-length tuple of
//! `components` values, stored contiguously.

use crate::error::{RegridError, Result};
use crate::image::{ImageGeometry, ImageGrid, PixelValue};
use crate::spatial::Point;

/// Dense N-dimensional image with physical metadata.
///
/// # Type Parameters
/// * `T` - Pixel component type
/// * `D` - Spatial dimensionality
///
/// # Coordinate Systems
/// * **Index Space**: Discrete pixel/voxel indices (integer coordinates)
/// * **Physical Space**: Continuous coordinates in mm or other units
///
/// # Examples
/// ```rust
/// use regrid_core::image::{ImageGrid, SampledImage};
///
/// let grid = ImageGrid::<3>::with_size([10, 10, 10]).unwrap();
/// let mut image = SampledImage::<f32, 3>::new(grid, 1).unwrap();
/// image.set([1, 2, 3], &[4.0]).unwrap();
/// assert_eq!(image.get([1, 2, 3]).unwrap(), &[4.0]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SampledImage<T, const D: usize> {
    grid: ImageGrid<D>,
    components: usize,
    buffer: Vec<T>,
}

impl<T: PixelValue, const D: usize> SampledImage<T, D> {
    /// Allocate a zero-filled image.
    ///
    /// # Errors
    /// `InvalidConfiguration` if `components` is zero.
    pub fn new(grid: ImageGrid<D>, components: usize) -> Result<Self> {
        Self::filled(grid, components, T::default())
    }

    /// Allocate an image with every component set to `value`.
    pub fn filled(grid: ImageGrid<D>, components: usize, value: T) -> Result<Self> {
        if components == 0 {
            return Err(RegridError::invalid_configuration(
                "pixels need at least one component",
            ));
        }
        let len = buffer_len(&grid, components)?;
        Ok(Self {
            grid,
            components,
            buffer: vec![value; len],
        })
    }

    /// Wrap an existing buffer laid out in flat order (axis 0 fastest).
    ///
    /// # Errors
    /// `BufferSizeMismatch` if `buffer.len()` is not
    /// `grid.num_voxels() * components`.
    pub fn from_buffer(grid: ImageGrid<D>, components: usize, buffer: Vec<T>) -> Result<Self> {
        if components == 0 {
            return Err(RegridError::invalid_configuration(
                "pixels need at least one component",
            ));
        }
        let expected = buffer_len(&grid, components)?;
        if buffer.len() != expected {
            return Err(RegridError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }
        Ok(Self {
            grid,
            components,
            buffer,
        })
    }

    /// Build a scalar image by evaluating `f` at every index.
    pub fn from_fn(grid: ImageGrid<D>, mut f: impl FnMut([usize; D]) -> T) -> Self {
        let buffer = grid.indices().map(&mut f).collect();
        Self {
            grid,
            components: 1,
            buffer,
        }
    }

    /// Voxel counts per axis.
    pub fn size(&self) -> [usize; D] {
        self.grid.size()
    }

    /// Sized grid of this image.
    pub fn grid(&self) -> &ImageGrid<D> {
        &self.grid
    }

    /// Physical geometry of this image.
    pub fn geometry(&self) -> &ImageGeometry<D> {
        self.grid.geometry()
    }

    /// Number of values per pixel.
    pub fn components(&self) -> usize {
        self.components
    }

    /// The whole buffer in flat order.
    pub fn as_slice(&self) -> &[T] {
        &self.buffer
    }

    /// The whole buffer in flat order, mutable.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.buffer
    }

    /// Consume the image and return its buffer.
    pub fn into_buffer(self) -> Vec<T> {
        self.buffer
    }

    /// Pixel at an integer index.
    ///
    /// # Errors
    /// `IndexOutOfRange` if any component is outside `[0, size[i])`.
    pub fn get(&self, index: [usize; D]) -> Result<&[T]> {
        let offset = self.offset(&index)?;
        Ok(&self.buffer[offset..offset + self.components])
    }

    /// Pixel at a signed index; negative components are out of range.
    pub fn get_signed(&self, index: [i64; D]) -> Result<&[T]> {
        if index.iter().any(|&i| i < 0) {
            return Err(RegridError::index_out_of_range(index, self.size()));
        }
        self.get(index.map(|i| i as usize))
    }

    /// Overwrite the pixel at an integer index.
    ///
    /// # Errors
    /// `IndexOutOfRange` for an index outside the image and
    /// `ComponentMismatch` if `pixel` does not have `components` values.
    pub fn set(&mut self, index: [usize; D], pixel: &[T]) -> Result<()> {
        if pixel.len() != self.components {
            return Err(RegridError::ComponentMismatch {
                expected: self.components,
                actual: pixel.len(),
            });
        }
        let offset = self.offset(&index)?;
        self.buffer[offset..offset + self.components].copy_from_slice(pixel);
        Ok(())
    }

    /// Physical location of an integer index.
    pub fn physical_point(&self, index: [usize; D]) -> Point<D> {
        self.grid.physical_point(&index)
    }

    /// Continuous index of a physical point.
    pub fn continuous_index(&self, point: &Point<D>) -> Point<D> {
        self.geometry().physical_to_index(point)
    }

    /// Convert every component to another pixel type.
    pub fn map_values<U: PixelValue>(&self, mut f: impl FnMut(T) -> U) -> SampledImage<U, D> {
        SampledImage {
            grid: self.grid,
            components: self.components,
            buffer: self.buffer.iter().map(|&v| f(v)).collect(),
        }
    }

    /// Same pixels placed on a different geometry of the same size.
    pub fn with_geometry(self, geometry: ImageGeometry<D>) -> Self {
        Self {
            grid: ImageGrid::from_parts(self.grid.size(), geometry),
            ..self
        }
    }

    /// Raw pixel slice at a flat voxel offset, without bounds checks beyond
    /// slice indexing.
    pub(crate) fn pixel_at_flat(&self, flat: usize) -> &[T] {
        let start = flat * self.components;
        &self.buffer[start..start + self.components]
    }

    fn offset(&self, index: &[usize; D]) -> Result<usize> {
        self.grid
            .flat_index(index)
            .map(|flat| flat * self.components)
            .ok_or_else(|| {
                RegridError::index_out_of_range(index.map(|i| i as i64), self.size())
            })
    }
}

fn buffer_len<const D: usize>(grid: &ImageGrid<D>, components: usize) -> Result<usize> {
    grid.num_voxels().checked_mul(components).ok_or_else(|| {
        RegridError::invalid_configuration(format!(
            "buffer of {} voxels with {} components overflows",
            grid.num_voxels(),
            components
        ))
    })
}
