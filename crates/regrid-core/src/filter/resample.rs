//! Resample image filter.
//!
//! This module provides ResampleImageFilter which resamples an image
//! onto a new grid using a transform and an interpolator.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;
use rayon::prelude::*;
use tracing::{info, warn};
use crate::config::{ResampleConfig, TransformDirection};
use crate::error::{RegridError, Result};
use crate::image::{ImageGrid, PixelValue, SampledImage};
use crate::interpolation::{BoundaryPolicy, InterpolationMethod, Interpolator, Support};
use crate::transform::SpatialTransform;

/// Shared flag that asks a running resample to stop.
///
/// Cloning shares the flag. Workers check it before each chunk.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// New, not yet cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Resample image filter.
///
/// Resamples an image by applying a transform to map points from the
/// output image space to the input image space, and then interpolating values.
///
/// By default the transform maps Output Physical Space -> Input Physical
/// Space. This is often the inverse of the registration transform
/// (Fixed -> Moving). Use [`TransformDirection::InputToOutput`] to supply the
/// opposite mapping; it is inverted once before sampling.
///
/// # Examples
/// ```rust
/// use regrid_core::filter::ResampleImageFilter;
/// use regrid_core::image::{ImageGrid, SampledImage};
/// use regrid_core::interpolation::InterpolationMethod;
/// use regrid_core::transform::SpatialTransform;
///
/// let grid = ImageGrid::<2>::with_size([4, 4]).unwrap();
/// let image = SampledImage::from_fn(grid, |[x, y]| (x + y) as u8);
/// let filter = ResampleImageFilter::new(grid, SpatialTransform::Identity, InterpolationMethod::Linear);
/// let output = filter.apply(&image).unwrap();
/// assert_eq!(output.get([3, 2]).unwrap(), &[5.0]);
/// ```
#[derive(Debug, Clone)]
pub struct ResampleImageFilter<const D: usize> {
    output_grid: ImageGrid<D>,
    transform: SpatialTransform<D>,
    config: ResampleConfig,
    cancellation: Option<CancellationToken>,
}

impl<const D: usize> ResampleImageFilter<D> {
    /// Create a new resample filter.
    ///
    /// # Arguments
    /// * `output_grid` - Output image size and geometry
    /// * `transform` - Transform from output space to input space
    /// * `method` - Interpolation method for input image sampling
    pub fn new(output_grid: ImageGrid<D>, transform: SpatialTransform<D>, method: InterpolationMethod) -> Self {
        Self {
            output_grid,
            transform,
            config: ResampleConfig::default().with_method(method),
            cancellation: None,
        }
    }

    /// Create from a reference image.
    ///
    /// Uses the grid (size, origin, spacing, direction) of the reference image.
    pub fn new_from_reference<T: PixelValue>(
        reference: &SampledImage<T, D>,
        transform: SpatialTransform<D>,
        method: InterpolationMethod,
    ) -> Self {
        Self::new(*reference.grid(), transform, method)
    }

    /// Set default pixel value for outside the field of view.
    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.config.default_pixel_value = value;
        self
    }

    /// Set the interpolator boundary policy.
    pub fn with_boundary_policy(mut self, policy: BoundaryPolicy) -> Self {
        self.config.boundary = policy;
        self
    }

    /// Set which way the transform maps.
    pub fn with_transform_direction(mut self, direction: TransformDirection) -> Self {
        self.config.transform_direction = direction;
        self
    }

    /// Replace every setting with `config`.
    pub fn with_config(mut self, config: ResampleConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Output grid.
    pub fn output_grid(&self) -> &ImageGrid<D> {
        &self.output_grid
    }

    /// Transform as supplied.
    pub fn transform(&self) -> &SpatialTransform<D> {
        &self.transform
    }

    /// Current settings.
    pub fn config(&self) -> &ResampleConfig {
        &self.config
    }

    /// Apply filter to an input image.
    ///
    /// The output has the input's component count and `f64` pixels. Samples
    /// the interpolator rejects as out of bounds receive the default pixel
    /// value in every component.
    ///
    /// # Errors
    /// * `InvalidConfiguration` if the settings do not validate
    /// * `NotInvertible` / `Singular` if an input-to-output transform cannot
    ///   be inverted
    /// * `Cancelled` if the cancellation token fired; no partial image is
    ///   returned
    pub fn apply<T: PixelValue>(&self, input: &SampledImage<T, D>) -> Result<SampledImage<f64, D>> {
        self.config.validate()?;

        let inverted;
        let transform = match self.config.transform_direction {
            TransformDirection::OutputToInput => &self.transform,
            TransformDirection::InputToOutput => {
                inverted = self.transform.inverse()?;
                &inverted
            }
        };

        let grid = self.output_grid;
        let components = input.components();
        let default_value = self.config.default_pixel_value;
        let chunk_voxels = self.config.chunk_voxels;
        let interpolator = Interpolator::new(input, self.config.method, self.config.boundary);
        let mut output = SampledImage::<f64, D>::new(grid, components)?;

        info!(
            "Resampling {:?} -> {:?} ({} component(s), {:?}, {:?}, parallel: {})",
            input.size(),
            grid.size(),
            components,
            self.config.method,
            self.config.boundary,
            self.config.parallel
        );
        let start = Instant::now();
        let outside = AtomicUsize::new(0);

        let fill = |(chunk_index, chunk): (usize, &mut [f64])| -> Result<()> {
            if self.is_cancelled() {
                return Err(RegridError::Cancelled);
            }
            let first_voxel = chunk_index * chunk_voxels;
            let mut chunk_outside = 0;
            for (offset, pixel) in chunk.chunks_mut(components).enumerate() {
                let index = grid.unravel(first_voxel + offset);
                let input_point = transform.map(&grid.physical_point(&index));
                match interpolator.sample_into(&input_point, pixel) {
                    Ok(Support::Inside) => {}
                    Ok(Support::Outside) => chunk_outside += 1,
                    Err(e) if e.is_out_of_bounds() => {
                        pixel.fill(default_value);
                        chunk_outside += 1;
                    }
                    Err(e) => return Err(e),
                }
            }
            outside.fetch_add(chunk_outside, Ordering::Relaxed);
            Ok(())
        };

        let buffer = output.as_mut_slice();
        let chunk_len = chunk_voxels * components;
        let result = if self.config.parallel {
            buffer.par_chunks_mut(chunk_len).enumerate().try_for_each(fill)
        } else {
            buffer.chunks_mut(chunk_len).enumerate().try_for_each(fill)
        };

        if let Err(e) = result {
            if e == RegridError::Cancelled {
                warn!("Resampling cancelled after {:?}", start.elapsed());
            }
            return Err(e);
        }

        info!(
            "Resampled {} voxels in {:?} ({} outside the interpolation support)",
            grid.num_voxels(),
            start.elapsed(),
            outside.load(Ordering::Relaxed)
        );
        Ok(output)
    }

    /// Like [`apply`](Self::apply), rounding and saturating the result back
    /// to the input pixel type.
    pub fn apply_rounded<T: PixelValue>(&self, input: &SampledImage<T, D>) -> Result<SampledImage<T, D>> {
        Ok(self.apply(input)?.map_values(T::from_f64))
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .map_or(false, CancellationToken::is_cancelled)
    }
}

/// Resample `source` onto `output_grid`.
///
/// `transform` maps output physical points to source physical points.
/// Samples outside the interpolation support receive `default_pixel_value`.
pub fn resample<T: PixelValue, const D: usize>(
    source: &SampledImage<T, D>,
    output_grid: &ImageGrid<D>,
    transform: &SpatialTransform<D>,
    method: InterpolationMethod,
    default_pixel_value: f64,
) -> Result<SampledImage<f64, D>> {
    ResampleImageFilter::new(*output_grid, transform.clone(), method)
        .with_default_pixel_value(default_pixel_value)
        .apply(source)
}
