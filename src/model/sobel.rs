//! Fixed Sobel edge filter
//!
//! Preprocessing step that collapses the input image to grayscale and
//! convolves it with the two Sobel kernels, yielding a (dx, dy) gradient
//! pair. Weights are fixed at construction and excluded from gradient
//! tracking, so the filter never trains.

use burn::{
    module::{Module, Param},
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Initializer, PaddingConfig2d,
    },
    tensor::{backend::Backend, Tensor},
};

/// Horizontal-gradient kernel
const SOBEL_DX: [[f32; 3]; 3] = [[1.0, 0.0, -1.0], [2.0, 0.0, -2.0], [1.0, 0.0, -1.0]];

/// Vertical-gradient kernel
const SOBEL_DY: [[f32; 3]; 3] = [[1.0, 2.0, 1.0], [0.0, 0.0, 0.0], [-1.0, -2.0, -1.0]];

/// Non-trainable grayscale + Sobel preprocessing module
#[derive(Module, Debug)]
pub struct Sobel<B: Backend> {
    grayscale: Conv2d<B>,
    filter: Conv2d<B>,
}

impl<B: Backend> Sobel<B> {
    /// Channels produced by the filter: one per gradient direction
    pub const OUT_CHANNELS: usize = 2;

    /// Create the filter for images with the given channel count
    pub fn new(in_channels: usize, device: &B::Device) -> Self {
        // 1x1 channel-averaging convolution to grayscale
        let grayscale = Conv2dConfig::new([in_channels, 1], [1, 1])
            .with_bias(false)
            .with_initializer(Initializer::Constant {
                value: 1.0 / in_channels as f64,
            })
            .init(device);

        let mut filter = Conv2dConfig::new([1, Self::OUT_CHANNELS], [3, 3])
            .with_padding(PaddingConfig2d::Explicit(1, 1))
            .with_bias(false)
            .init(device);
        filter.weight = Param::from_tensor(Tensor::from_floats([[SOBEL_DX], [SOBEL_DY]], device));

        Self {
            grayscale: grayscale.no_grad(),
            filter: filter.no_grad(),
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, in_channels, height, width]
    ///
    /// # Returns
    /// * Gradient tensor of shape [batch_size, 2, height, width]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        self.filter.forward(self.grayscale.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::TensorData;
    use burn_ndarray::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_output_has_two_gradient_channels() {
        let device = Default::default();
        let sobel = Sobel::<TestBackend>::new(3, &device);

        let input = Tensor::<TestBackend, 4>::zeros([2, 3, 24, 24], &device);
        let output = sobel.forward(input);

        assert_eq!(output.dims(), [2, 2, 24, 24]);
    }

    #[test]
    fn test_single_channel_input() {
        let device = Default::default();
        let sobel = Sobel::<TestBackend>::new(1, &device);

        let input = Tensor::<TestBackend, 4>::zeros([1, 1, 8, 8], &device);
        let output = sobel.forward(input);

        assert_eq!(output.dims(), [1, 2, 8, 8]);
    }

    #[test]
    fn test_horizontal_ramp_response() {
        let device = Default::default();
        let sobel = Sobel::<TestBackend>::new(3, &device);

        // Every channel holds its column index, so grayscale is a ramp along x
        let mut pixels = vec![0.0f32; 3 * 8 * 8];
        for channel in 0..3 {
            for row in 0..8 {
                for col in 0..8 {
                    pixels[channel * 64 + row * 8 + col] = col as f32;
                }
            }
        }
        let input = Tensor::<TestBackend, 4>::from_floats(
            TensorData::new(pixels, [1, 3, 8, 8]),
            &device,
        );

        let output = sobel.forward(input);

        // At interior pixels the dx kernel sees a constant slope of 1, the dy
        // kernel sees none
        let dx: f32 = output
            .clone()
            .slice([0..1, 0..1, 4..5, 4..5])
            .into_scalar();
        let dy: f32 = output.slice([0..1, 1..2, 4..5, 4..5]).into_scalar();

        assert!((dx + 8.0).abs() < 1e-4, "dx response was {}", dx);
        assert!(dy.abs() < 1e-4, "dy response was {}", dy);
    }

    #[test]
    fn test_flat_image_has_no_response() {
        let device = Default::default();
        let sobel = Sobel::<TestBackend>::new(3, &device);

        let input = Tensor::<TestBackend, 4>::ones([1, 3, 8, 8], &device);
        let output = sobel.forward(input);

        // Interior responses vanish on a constant image; borders see padding
        let interior = output.slice([0..1, 0..2, 2..6, 2..6]);
        let max_abs: f32 = interior.abs().max().into_scalar();
        assert!(max_abs < 1e-4);
    }
}
