//! Conversion between scalar images and burn tensors.
//!
//! Tensors are row-major with the last dimension fastest, so a `[Z, Y, X]`
//! tensor maps onto an image of size `[X, Y, Z]` without reordering the data.

use burn::tensor::backend::Backend;
use burn::tensor::{Tensor, TensorData};
use crate::error::{RegridError, Result};
use crate::image::{ImageGeometry, ImageGrid, PixelValue, SampledImage};

impl<T: PixelValue, const D: usize> SampledImage<T, D> {
    /// Build a scalar image from a tensor of shape `[.., Y, X]`.
    ///
    /// # Errors
    /// `InvalidGrid` for a tensor with an empty dimension, `Tensor` if the
    /// tensor data cannot be read back.
    pub fn from_tensor<B: Backend>(tensor: Tensor<B, D>, geometry: ImageGeometry<D>) -> Result<Self> {
        let dims = tensor.dims();
        let size: [usize; D] = std::array::from_fn(|axis| dims[D - 1 - axis]);
        let grid = ImageGrid::new(size, geometry)?;

        let values = tensor
            .into_data()
            .convert::<f64>()
            .to_vec::<f64>()
            .map_err(|e| RegridError::tensor(format!("failed to read tensor data: {:?}", e)))?;

        Self::from_buffer(grid, 1, values.into_iter().map(T::from_f64).collect())
    }

    /// Copy a scalar image into a tensor of shape `[.., Y, X]`.
    ///
    /// # Errors
    /// `ComponentMismatch` for multi-component images.
    pub fn to_tensor<B: Backend>(&self, device: &B::Device) -> Result<Tensor<B, D>> {
        if self.components() != 1 {
            return Err(RegridError::ComponentMismatch {
                expected: 1,
                actual: self.components(),
            });
        }
        let size = self.size();
        let shape: [usize; D] = std::array::from_fn(|axis| size[D - 1 - axis]);
        let values: Vec<f32> = self.as_slice().iter().map(|v| v.to_f64() as f32).collect();

        Ok(Tensor::<B, D>::from_data(TensorData::new(values, shape), device))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_from_tensor_reverses_axes() {
        let device = Default::default();
        // Shape [Y=2, X=3]
        let tensor = Tensor::<TestBackend, 2>::from_floats(
            [[0.0, 1.0, 2.0], [10.0, 11.0, 12.0]],
            &device,
        );
        let image = SampledImage::<f32, 2>::from_tensor(tensor, ImageGeometry::default()).unwrap();

        assert_eq!(image.size(), [3, 2]);
        assert_eq!(image.get([2, 0]).unwrap(), &[2.0]);
        assert_eq!(image.get([0, 1]).unwrap(), &[10.0]);
    }

    #[test]
    fn test_tensor_roundtrip() {
        let device = Default::default();
        let grid = ImageGrid::<3>::with_size([4, 3, 2]).unwrap();
        let image = SampledImage::<u16, 3>::from_fn(grid, |[x, y, z]| (x + 4 * y + 12 * z) as u16);

        let tensor = image.to_tensor::<TestBackend>(&device).unwrap();
        assert_eq!(tensor.dims(), [2, 3, 4]);

        let back = SampledImage::<u16, 3>::from_tensor(tensor, *image.geometry()).unwrap();
        assert_eq!(back, image);
    }

    #[test]
    fn test_to_tensor_rejects_vector_pixels() {
        let device = Default::default();
        let image = SampledImage::<f32, 2>::new(ImageGrid::with_size([2, 2]).unwrap(), 2).unwrap();
        assert!(matches!(
            image.to_tensor::<TestBackend>(&device),
            Err(RegridError::ComponentMismatch { expected: 1, actual: 2 })
        ));
    }
}
