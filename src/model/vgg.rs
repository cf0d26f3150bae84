//! VGG-style trunk built from a layer configuration list
//!
//! The trunk is described declaratively as an ordered sequence of
//! [`LayerSpec`] entries. Convolution entries expand to conv/batch-norm/ReLU
//! blocks with a shared kernel size and padding; pool markers expand to 2x2
//! max-pooling. The built stack ends by flattening channel and spatial
//! dimensions into one feature vector per sample.

use burn::{
    config::Config,
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        pool::{MaxPool2d, MaxPool2dConfig},
        BatchNorm, BatchNormConfig, Initializer, PaddingConfig2d, Relu,
    },
    tensor::{backend::Backend, Tensor},
};
use serde::{Deserialize, Serialize};

/// One entry of the trunk configuration list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerSpec {
    /// A convolution stage with its output channel count and group size
    Conv { out_channels: usize, groups: usize },
    /// A 2x2 stride-2 max-pooling stage
    MaxPool,
}

impl LayerSpec {
    /// Convolution entry with ungrouped channels
    pub fn conv(out_channels: usize) -> Self {
        LayerSpec::Conv {
            out_channels,
            groups: 1,
        }
    }
}

/// Configuration for a VGG-style trunk
#[derive(Config, Debug)]
pub struct VggTrunkConfig {
    /// Ordered layer stack
    pub layers: Vec<LayerSpec>,

    /// Number of input channels (3 for RGB, 2 after the Sobel filter)
    #[config(default = "3")]
    pub in_channels: usize,

    /// Kernel size shared by every convolution
    #[config(default = "5")]
    pub kernel_size: usize,

    /// Padding shared by every convolution, sized to preserve spatial dims
    #[config(default = "2")]
    pub padding: usize,

    /// Whether convolutions are followed by batch normalization
    #[config(default = true)]
    pub batch_norm: bool,
}

impl VggTrunkConfig {
    /// Build the trunk on the given device
    pub fn init<B: Backend>(&self, device: &B::Device) -> VggTrunk<B> {
        let mut layers = Vec::with_capacity(self.layers.len());
        let mut in_channels = self.in_channels;

        for spec in &self.layers {
            match *spec {
                LayerSpec::Conv {
                    out_channels,
                    groups,
                } => {
                    layers.push(TrunkLayer::Conv(ConvBlock::new(
                        in_channels,
                        out_channels,
                        self.kernel_size,
                        self.padding,
                        groups,
                        self.batch_norm,
                        device,
                    )));
                    in_channels = out_channels;
                }
                LayerSpec::MaxPool => {
                    layers.push(TrunkLayer::MaxPool(
                        MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
                    ));
                }
            }
        }

        VggTrunk { layers }
    }
}

/// A trunk block: convolution, optional batch-norm, ReLU
#[derive(Module, Debug)]
pub struct ConvBlock<B: Backend> {
    conv: Conv2d<B>,
    norm: Option<BatchNorm<B, 2>>,
    activation: Relu,
}

impl<B: Backend> ConvBlock<B> {
    /// Create a new convolutional block
    ///
    /// Convolutions carry no bias when batch normalization follows them, and
    /// their weights are drawn with Kaiming-normal (fan-in, ReLU gain).
    pub fn new(
        in_channels: usize,
        out_channels: usize,
        kernel_size: usize,
        padding: usize,
        groups: usize,
        batch_norm: bool,
        device: &B::Device,
    ) -> Self {
        let conv = Conv2dConfig::new([in_channels, out_channels], [kernel_size, kernel_size])
            .with_padding(PaddingConfig2d::Explicit(padding, padding))
            .with_groups(groups)
            .with_bias(!batch_norm)
            .with_initializer(Initializer::KaimingNormal {
                gain: std::f64::consts::SQRT_2,
                fan_out_only: false,
            })
            .init(device);

        let norm = if batch_norm {
            Some(BatchNormConfig::new(out_channels).init(device))
        } else {
            None
        };

        Self {
            conv,
            norm,
            activation: Relu::new(),
        }
    }

    /// Forward pass through the block
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = self.conv.forward(x);
        let x = match &self.norm {
            Some(norm) => norm.forward(x),
            None => x,
        };
        self.activation.forward(x)
    }
}

/// One built stage of the trunk
#[derive(Module, Debug)]
pub enum TrunkLayer<B: Backend> {
    Conv(ConvBlock<B>),
    MaxPool(MaxPool2d),
}

/// VGG-style feature extraction trunk
#[derive(Module, Debug)]
pub struct VggTrunk<B: Backend> {
    layers: Vec<TrunkLayer<B>>,
}

impl<B: Backend> VggTrunk<B> {
    /// Forward pass: apply every stage in order, then flatten
    ///
    /// # Arguments
    /// * `x` - Input tensor of shape [batch_size, channels, height, width]
    ///
    /// # Returns
    /// * Feature tensor of shape [batch_size, channels * height * width]
    pub fn forward(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let mut x = x;
        for layer in &self.layers {
            x = match layer {
                TrunkLayer::Conv(block) => block.forward(x),
                TrunkLayer::MaxPool(pool) => pool.forward(x),
            };
        }

        let [batch_size, channels, height, width] = x.dims();
        x.reshape([batch_size, channels * height * width])
    }

    /// Number of built stages
    pub fn num_layers(&self) -> usize {
        self.layers.len()
    }
}
