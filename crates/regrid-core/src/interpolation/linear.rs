//! Linear interpolation implementation.
//!
//! Multilinear interpolation in any dimension: the 2^D lattice corners of the
//! cell containing the query are blended with the product of per-axis
//! weights (bilinear for 2D, trilinear for 3D).

use crate::error::{RegridError, Result};
use crate::image::{PixelValue, SampledImage};
use crate::spatial::Point;
use super::{BoundaryPolicy, Support};

/// Interpolate a continuous index into `out`.
///
/// The support is the closed box `[0, size - 1]` on every axis. Corners with
/// zero weight are never read, so a query on the last lattice plane does not
/// need a neighbor past it.
pub fn evaluate<T: PixelValue, const D: usize>(
    image: &SampledImage<T, D>,
    index: &Point<D>,
    policy: BoundaryPolicy,
    out: &mut [f64],
) -> Result<Support> {
    let size = image.size();
    let mut base = [0usize; D];
    let mut frac = [0.0f64; D];
    let mut support = Support::Inside;

    for axis in 0..D {
        let last = (size[axis] - 1) as f64;
        let mut c = index[axis];
        if !(c >= 0.0 && c <= last) {
            support = Support::Outside;
            match policy {
                BoundaryPolicy::Constant(value) => {
                    out.fill(value);
                    return Ok(Support::Outside);
                }
                BoundaryPolicy::Strict => return Err(RegridError::out_of_bounds(&index.to_vec())),
                BoundaryPolicy::Clamp => c = if c > last { last } else { 0.0 },
            }
        }
        let floor = c.floor();
        let cell = floor as usize;
        if cell >= size[axis] - 1 {
            base[axis] = size[axis] - 1;
            frac[axis] = 0.0;
        } else {
            base[axis] = cell;
            frac[axis] = c - floor;
        }
    }

    out.fill(0.0);
    for corner in 0..(1usize << D) {
        let mut weight = 1.0;
        let mut neighbor = base;
        for axis in 0..D {
            if corner & (1 << axis) != 0 {
                weight *= frac[axis];
                neighbor[axis] += 1;
            } else {
                weight *= 1.0 - frac[axis];
            }
        }
        if weight == 0.0 {
            continue;
        }
        let Some(flat) = image.grid().flat_index(&neighbor) else {
            continue;
        };
        for (slot, value) in out.iter_mut().zip(image.pixel_at_flat(flat)) {
            *slot += weight * value.to_f64();
        }
    }
    Ok(support)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::ImageGrid;

    fn plane() -> SampledImage<f32, 2> {
        // f(x, y) = x + 10 y
        let grid = ImageGrid::with_size([3, 3]).unwrap();
        SampledImage::from_fn(grid, |[x, y]| (x + 10 * y) as f32)
    }

    #[test]
    fn test_linear_reproduces_plane() {
        let image = plane();
        let mut out = [0.0];
        evaluate(&image, &Point::new([0.5, 1.25]), BoundaryPolicy::Strict, &mut out).unwrap();
        assert!((out[0] - 13.0).abs() < 1e-12);
        evaluate(&image, &Point::new([2.0, 2.0]), BoundaryPolicy::Strict, &mut out).unwrap();
        assert_eq!(out, [22.0]);
    }

    #[test]
    fn test_linear_lattice_exact() {
        let image = plane();
        let mut out = [0.0];
        for [x, y] in image.grid().indices().collect::<Vec<_>>() {
            evaluate(&image, &Point::from_index([x, y]), BoundaryPolicy::Strict, &mut out).unwrap();
            assert_eq!(out[0], image.get([x, y]).unwrap()[0] as f64);
        }
    }

    #[test]
    fn test_linear_outside_support() {
        let image = plane();
        let mut out = [0.0];
        let err = evaluate(&image, &Point::new([2.01, 0.0]), BoundaryPolicy::Strict, &mut out);
        assert!(matches!(err, Err(RegridError::OutOfBounds { .. })));

        let support =
            evaluate(&image, &Point::new([-0.1, 0.0]), BoundaryPolicy::Constant(7.5), &mut out).unwrap();
        assert_eq!(support, Support::Outside);
        assert_eq!(out, [7.5]);

        evaluate(&image, &Point::new([5.0, 0.5]), BoundaryPolicy::Clamp, &mut out).unwrap();
        assert!((out[0] - 7.0).abs() < 1e-12);
    }

    #[test]
    fn test_linear_vector_pixels() {
        let grid = ImageGrid::<1>::with_size([2]).unwrap();
        let image = SampledImage::from_buffer(grid, 2, vec![0.0, 100.0, 1.0, 200.0]).unwrap();
        let mut out = [0.0, 0.0];
        evaluate(&image, &Point::new([0.25]), BoundaryPolicy::Strict, &mut out).unwrap();
        assert_eq!(out, [0.25, 125.0]);
    }

    #[test]
    fn test_linear_single_voxel_axis() {
        let grid = ImageGrid::<2>::with_size([1, 2]).unwrap();
        let image = SampledImage::from_buffer(grid, 1, vec![4.0f64, 8.0]).unwrap();
        let mut out = [0.0];
        evaluate(&image, &Point::new([0.0, 0.5]), BoundaryPolicy::Strict, &mut out).unwrap();
        assert_eq!(out, [6.0]);
    }
}
