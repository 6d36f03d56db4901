//! Numeric pixel component types.

/// A numeric type that can be stored as a pixel component.
///
/// Interpolation always runs in `f64`; `from_f64` is the conversion used when
/// a result is written back into a buffer of this type. Integer types round
/// half away from zero and saturate at their bounds (NaN maps to zero),
/// floating-point types cast.
pub trait PixelValue: Copy + Default + PartialEq + Send + Sync + std::fmt::Debug + 'static {
    /// Widen to `f64`.
    fn to_f64(self) -> f64;

    /// Narrow from `f64`.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_pixel {
    ($($t:ty),*) => {
        $(
            impl PixelValue for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    // `as` saturates and maps NaN to zero.
                    value.round() as $t
                }
            }
        )*
    };
}

macro_rules! impl_float_pixel {
    ($($t:ty),*) => {
        $(
            impl PixelValue for $t {
                #[inline]
                fn to_f64(self) -> f64 {
                    self as f64
                }

                #[inline]
                fn from_f64(value: f64) -> Self {
                    value as $t
                }
            }
        )*
    };
}

impl_integer_pixel!(u8, i8, u16, i16, u32, i32, u64, i64);
impl_float_pixel!(f32, f64);
