//! B-Spline interpolation implementation.
//!
//! This module provides cubic B-Spline interpolation for smooth sampling
//! of image values at continuous coordinates. Samples are first converted to
//! B-spline coefficients with the recursive prefilter of Unser et al.
//! (mirror-symmetric boundary), so the spline passes exactly through the
//! samples; evaluation then blends the 4^D surrounding coefficients.

use crate::error::{RegridError, Result};
use crate::image::{PixelValue, SampledImage};
use crate::spatial::Point;
use super::{BoundaryPolicy, Support};

/// Pole of the cubic B-spline prefilter, `sqrt(3) - 2`.
const POLE: f64 = -0.267_949_192_431_122_7;

/// Overall gain of the cubic prefilter, `(1 - z)(1 - 1/z)`.
const GAIN: f64 = 6.0;

/// Truncation tolerance for the causal initialization sum.
const INIT_TOLERANCE: f64 = 1e-14;

/// Axes shorter than this are never inside the B-spline support.
pub const MIN_AXIS_SIZE: usize = 4;

/// Cubic B-Spline basis function.
///
/// The cubic B-Spline kernel is defined as:
/// - (2/3) - |x|^2 + (1/2)|x|^3    for |x| < 1
/// - (1/6)(2 - |x|)^3              for 1 <= |x| < 2
/// - 0                             otherwise
fn cubic_bspline(x: f64) -> f64 {
    let abs_x = x.abs();
    if abs_x < 1.0 {
        (2.0 / 3.0) - abs_x.powi(2) + 0.5 * abs_x.powi(3)
    } else if abs_x < 2.0 {
        let two_minus_x = 2.0 - abs_x;
        (1.0 / 6.0) * two_minus_x.powi(3)
    } else {
        0.0
    }
}

/// Map any integer onto `[0, n)` by whole-sample mirroring about the edges.
fn mirror(index: i64, n: usize) -> usize {
    if n == 1 {
        return 0;
    }
    let period = 2 * (n as i64 - 1);
    let mut k = index.rem_euclid(period);
    if k >= n as i64 {
        k = period - k;
    }
    k as usize
}

/// Causal initial value `c+(0)` for mirror boundary conditions.
fn initial_causal(line: &[f64], z: f64) -> f64 {
    let n = line.len();
    let horizon = (INIT_TOLERANCE.ln() / z.abs().ln()).ceil() as usize;
    if horizon < n {
        let mut zn = z;
        let mut sum = line[0];
        for &value in &line[1..horizon] {
            sum += zn * value;
            zn *= z;
        }
        sum
    } else {
        let iz = 1.0 / z;
        let mut zn = z;
        let mut z2n = z.powi(n as i32 - 1);
        let mut sum = line[0] + z2n * line[n - 1];
        z2n *= z2n * iz;
        for &value in &line[1..n - 1] {
            sum += (zn + z2n) * value;
            zn *= z;
            z2n *= iz;
        }
        sum / (1.0 - zn * zn)
    }
}

/// In-place conversion of one line of samples into cubic B-spline coefficients.
fn prefilter_line(line: &mut [f64]) {
    let n = line.len();
    if n < 2 {
        return;
    }
    let z = POLE;
    for value in line.iter_mut() {
        *value *= GAIN;
    }

    let causal = initial_causal(line, z);
    line[0] = causal;
    for k in 1..n {
        line[k] += z * line[k - 1];
    }

    line[n - 1] = (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1]);
    for k in (0..n - 1).rev() {
        line[k] = z * (line[k + 1] - line[k]);
    }
}

/// Cubic B-spline coefficients of an image, computed once and then evaluated
/// at arbitrary continuous indices.
#[derive(Debug, Clone)]
pub struct BSplineCoefficients<const D: usize> {
    coefficients: SampledImage<f64, D>,
}

impl<const D: usize> BSplineCoefficients<D> {
    /// Prefilter every component of `image` separably along each axis.
    pub fn from_image<T: PixelValue>(image: &SampledImage<T, D>) -> Self {
        let size = image.size();
        let components = image.components();
        let num_voxels = image.grid().num_voxels();
        let mut coefficients = image.map_values(|v| v.to_f64());
        let buffer = coefficients.as_mut_slice();

        let mut stride = 1;
        for axis in 0..D {
            let n = size[axis];
            if n >= 2 {
                let mut line = vec![0.0; n];
                let block = stride * n;
                for outer in 0..num_voxels / block {
                    for inner in 0..stride {
                        let start = outer * block + inner;
                        for component in 0..components {
                            for (k, slot) in line.iter_mut().enumerate() {
                                *slot = buffer[(start + k * stride) * components + component];
                            }
                            prefilter_line(&mut line);
                            for (k, value) in line.iter().enumerate() {
                                buffer[(start + k * stride) * components + component] = *value;
                            }
                        }
                    }
                }
            }
            stride *= n;
        }

        Self { coefficients }
    }

    /// Coefficient image (same grid and component count as the source).
    pub fn coefficients(&self) -> &SampledImage<f64, D> {
        &self.coefficients
    }

    /// Evaluate the spline at a continuous index into `out`.
    ///
    /// The support is `[0, size - 1]` on every axis, and axes with fewer than
    /// four samples are never inside it. Neighbors past an edge are mirrored.
    /// Under `Clamp` the query itself is clamped into the image first.
    pub fn evaluate(
        &self,
        index: &Point<D>,
        policy: BoundaryPolicy,
        out: &mut [f64],
    ) -> Result<Support> {
        let size = self.coefficients.size();
        let mut neighbors = [[0usize; 4]; D];
        let mut weights = [[0.0f64; 4]; D];
        let mut support = Support::Inside;

        for axis in 0..D {
            let last = (size[axis] - 1) as f64;
            let mut c = index[axis];
            if size[axis] < MIN_AXIS_SIZE || !(c >= 0.0 && c <= last) {
                support = Support::Outside;
                match policy {
                    BoundaryPolicy::Constant(value) => {
                        out.fill(value);
                        return Ok(Support::Outside);
                    }
                    BoundaryPolicy::Strict => {
                        return Err(RegridError::out_of_bounds(&index.to_vec()))
                    }
                    BoundaryPolicy::Clamp => c = c.clamp(0.0, last),
                }
                if c.is_nan() {
                    c = 0.0;
                }
            }
            let floor = c.floor();
            let t = c - floor;
            let first = floor as i64 - 1;
            for k in 0..4 {
                neighbors[axis][k] = mirror(first + k as i64, size[axis]);
                weights[axis][k] = cubic_bspline(t - (k as f64 - 1.0));
            }
        }

        out.fill(0.0);
        let mut neighbor = [0usize; D];
        for combo in 0..4usize.pow(D as u32) {
            let mut rest = combo;
            let mut weight = 1.0;
            for axis in 0..D {
                let k = rest % 4;
                rest /= 4;
                weight *= weights[axis][k];
                neighbor[axis] = neighbors[axis][k];
            }
            if weight == 0.0 {
                continue;
            }
            let Some(flat) = self.coefficients.grid().flat_index(&neighbor) else {
                continue;
            };
            for (slot, value) in out.iter_mut().zip(self.coefficients.pixel_at_flat(flat)) {
                *slot += weight * value;
            }
        }
        Ok(support)
    }
}
