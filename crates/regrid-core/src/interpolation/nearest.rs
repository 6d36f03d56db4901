//! Nearest neighbor interpolation implementation.

use crate::error::{RegridError, Result};
use crate::image::{PixelValue, SampledImage};
use crate::spatial::Point;
use super::{BoundaryPolicy, Support};

/// Copy the sample nearest to a continuous index into `out`.
///
/// Half-integer coordinates round away from zero. The support is every
/// index whose rounded value lies in `[0, size)`.
pub fn evaluate<T: PixelValue, const D: usize>(
    image: &SampledImage<T, D>,
    index: &Point<D>,
    policy: BoundaryPolicy,
    out: &mut [f64],
) -> Result<Support> {
    let size = image.size();
    let mut nearest = [0usize; D];
    let mut support = Support::Inside;

    for axis in 0..D {
        let rounded = index[axis].round();
        let last = (size[axis] - 1) as f64;
        if rounded >= 0.0 && rounded <= last {
            nearest[axis] = rounded as usize;
            continue;
        }
        support = Support::Outside;
        match policy {
            BoundaryPolicy::Constant(value) => {
                out.fill(value);
                return Ok(Support::Outside);
            }
            BoundaryPolicy::Strict => return Err(RegridError::out_of_bounds(&index.to_vec())),
            BoundaryPolicy::Clamp => {
                nearest[axis] = if rounded > last { size[axis] - 1 } else { 0 };
            }
        }
    }

    let flat = image
        .grid()
        .flat_index(&nearest)
        .ok_or_else(|| RegridError::out_of_bounds(&index.to_vec()))?;
    for (slot, value) in out.iter_mut().zip(image.pixel_at_flat(flat)) {
        *slot = value.to_f64();
    }
    Ok(support)
}
