//! Image types and operations.
//!
//! This module provides the grid descriptor, sized grids and the sampled
//! image type that pairs a dense pixel buffer with physical metadata.

pub mod geometry;
pub mod grid;
pub mod image;
pub mod pixel;
#[cfg(feature = "tensor")]
pub mod tensor;

pub use geometry::ImageGeometry;
pub use grid::ImageGrid;
pub use image::SampledImage;
pub use pixel::PixelValue;
