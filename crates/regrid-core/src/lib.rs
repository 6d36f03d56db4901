//! N-dimensional image resampling.
//!
//! Images carry their physical placement (origin, spacing, direction).
//! Spatial transforms map physical points between spaces, interpolators
//! estimate values between samples, and the resample filter combines the
//! three to move an image onto a new grid.

pub mod config;
pub mod error;
pub mod filter;
pub mod image;
pub mod interpolation;
pub mod spatial;
pub mod transform;

pub use config::{ResampleConfig, TransformDirection};
pub use error::{RegridError, Result};
pub use filter::{resample, CancellationToken, ResampleImageFilter};
pub use image::{ImageGeometry, ImageGrid, PixelValue, SampledImage};
pub use interpolation::{BoundaryPolicy, InterpolationMethod, Interpolator};
pub use spatial::{Direction, Point, Spacing, Vector};
pub use transform::SpatialTransform;
