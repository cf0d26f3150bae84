//! The deep-clustering network: trunk, embedding head, replaceable top layer
//!
//! The network produces two things: a fixed-length embedding used for cluster
//! assignment (the "penultimate" output), and pseudolabel logits through a
//! linear top layer. The top layer is deliberately short-lived: an external
//! training loop discards and reinitializes it once per epoch, after cluster
//! assignments are recomputed, via [`DeepClusterNet::renew_top_layer`].

use burn::{
    config::Config,
    module::{Module, Param},
    nn::{Dropout, DropoutConfig, Initializer, Linear, LinearConfig, Relu},
    tensor::{activation::softmax, backend::Backend, Tensor},
};
use tracing::debug;

use super::sobel::Sobel;
use super::vgg::{LayerSpec, VggTrunk, VggTrunkConfig};
use crate::utils::error::DeepClusterError;

/// Channel count of the trunk's last convolution
pub const LAST_CONV_CHANNELS: usize = 512;

/// Trunk configuration list for the given input spatial size
///
/// 64-pixel inputs go through four pooled stages; 24-pixel inputs drop the
/// final pool. Any other size has no table and is rejected.
pub fn trunk_layers(input_size: usize) -> crate::utils::error::Result<Vec<LayerSpec>> {
    match input_size {
        64 => Ok(vec![
            LayerSpec::conv(64),
            LayerSpec::MaxPool,
            LayerSpec::conv(128),
            LayerSpec::MaxPool,
            LayerSpec::conv(256),
            LayerSpec::MaxPool,
            LayerSpec::conv(512),
            LayerSpec::MaxPool,
        ]),
        24 => Ok(vec![
            LayerSpec::conv(64),
            LayerSpec::MaxPool,
            LayerSpec::conv(128),
            LayerSpec::MaxPool,
            LayerSpec::conv(256),
            LayerSpec::MaxPool,
            LayerSpec::conv(512),
        ]),
        other => Err(DeepClusterError::UnsupportedInputSize(other)),
    }
}

/// Spatial size of the trunk's final feature maps (4 for 64-px input, 3 for
/// 24-px input)
pub fn post_trunk_size(input_size: usize) -> crate::utils::error::Result<usize> {
    let pools = trunk_layers(input_size)?
        .iter()
        .filter(|layer| matches!(layer, LayerSpec::MaxPool))
        .count();
    Ok(input_size >> pools)
}

/// Configuration for the deep-clustering network
#[derive(Config, Debug)]
pub struct DeepClusterNetConfig {
    /// Number of output classes (the cluster count chosen by the pipeline)
    pub num_classes: usize,

    /// Expected input spatial size (24 or 64, assumes square images)
    pub input_size: usize,

    /// Number of input channels (3 for RGB)
    #[config(default = "3")]
    pub input_channels: usize,

    /// Whether to prepend the fixed Sobel edge filter
    #[config(default = false)]
    pub sobel: bool,

    /// Embedding width produced by the feature head
    #[config(default = "1000")]
    pub embedding_dim: usize,

    /// Dropout rate ahead of the top layer
    #[config(default = "0.5")]
    pub dropout_rate: f64,
}

impl DeepClusterNetConfig {
    /// Build the network on the given device
    ///
    /// The network starts without a top layer; call
    /// [`DeepClusterNet::renew_top_layer`] before requesting logits.
    pub fn init<B: Backend>(&self, device: &B::Device) -> crate::utils::error::Result<DeepClusterNet<B>> {
        if self.num_classes == 0 {
            return Err(DeepClusterError::Config(
                "num_classes must be greater than 0".to_string(),
            ));
        }
        if self.input_channels == 0 {
            return Err(DeepClusterError::Config(
                "input_channels must be greater than 0".to_string(),
            ));
        }

        let layers = trunk_layers(self.input_size)?;
        let feature_size = post_trunk_size(self.input_size)?;

        // The Sobel filter replaces whatever comes in with a 2-channel
        // gradient pair, so the trunk sees 2 channels when it is enabled
        let trunk_channels = if self.sobel {
            Sobel::<B>::OUT_CHANNELS
        } else {
            self.input_channels
        };

        let features = VggTrunkConfig::new(layers)
            .with_in_channels(trunk_channels)
            .init(device);

        let flattened = LAST_CONV_CHANNELS * feature_size * feature_size;
        let feature_head = normal_linear(flattened, self.embedding_dim, device);

        debug!(
            input_size = self.input_size,
            sobel = self.sobel,
            embedding_dim = self.embedding_dim,
            num_classes = self.num_classes,
            "initialized clustering network"
        );

        Ok(DeepClusterNet {
            sobel: self.sobel.then(|| Sobel::new(self.input_channels, device)),
            features,
            feature_head,
            activation: Relu::new(),
            dropout: DropoutConfig::new(self.dropout_rate).init(),
            top_layer: None,
            num_classes: self.num_classes,
            embedding_dim: self.embedding_dim,
        })
    }
}

/// Deep-clustering CNN
///
/// Forward data flow:
/// - images -> (Sobel) -> trunk -> flattened features -> feature head ->
///   embedding
/// - embedding -> ReLU -> dropout -> top layer -> logits
#[derive(Module, Debug)]
pub struct DeepClusterNet<B: Backend> {
    sobel: Option<Sobel<B>>,
    features: VggTrunk<B>,
    feature_head: Linear<B>,
    activation: Relu,
    dropout: Dropout,
    top_layer: Option<Linear<B>>,

    num_classes: usize,
    embedding_dim: usize,
}

impl<B: Backend> DeepClusterNet<B> {
    /// Forward pass
    ///
    /// With `penultimate` set, returns the embedding used for cluster
    /// assignment; otherwise returns class logits through the top layer.
    ///
    /// # Panics
    /// Panics on the logits path when no top layer is installed.
    pub fn forward(&self, x: Tensor<B, 4>, penultimate: bool) -> Tensor<B, 2> {
        let embedding = self.embed(x);
        if penultimate {
            return embedding;
        }

        let top_layer = self
            .top_layer
            .as_ref()
            .expect("top layer absent: call renew_top_layer before requesting logits");

        let x = self.dropout.forward(self.activation.forward(embedding));
        top_layer.forward(x)
    }

    /// Embedding ("penultimate") transform: images to feature vectors
    pub fn embed(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = match &self.sobel {
            Some(sobel) => sobel.forward(x),
            None => x,
        };
        let x = self.features.forward(x);
        self.feature_head.forward(x)
    }

    /// Forward pass with softmax for inference
    pub fn forward_softmax(&self, x: Tensor<B, 4>) -> Tensor<B, 2> {
        softmax(self.forward(x, false), 1)
    }

    /// Discard the top layer and install a freshly initialized one
    ///
    /// Called once per epoch, after pseudolabels are recomputed. Weights are
    /// drawn from Normal(0, 0.01) and the bias starts at zero.
    pub fn renew_top_layer(mut self, device: &B::Device) -> Self {
        debug!(num_classes = self.num_classes, "renewing top layer");
        self.top_layer = Some(normal_linear(self.embedding_dim, self.num_classes, device));
        self
    }

    /// Whether a top layer is currently installed
    pub fn has_top_layer(&self) -> bool {
        self.top_layer.is_some()
    }

    /// The installed top layer, if any
    pub fn top_layer(&self) -> Option<&Linear<B>> {
        self.top_layer.as_ref()
    }

    /// Get the number of output classes
    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Get the embedding width
    pub fn embedding_dim(&self) -> usize {
        self.embedding_dim
    }
}

/// Linear layer with Normal(0, 0.01) weights and a zero bias
fn normal_linear<B: Backend>(d_input: usize, d_output: usize, device: &B::Device) -> Linear<B> {
    let mut linear = LinearConfig::new(d_input, d_output)
        .with_initializer(Initializer::Normal {
            mean: 0.0,
            std: 0.01,
        })
        .init(device);

    // the initializer also draws the bias; it must start at zero
    linear.bias = Some(Param::from_tensor(Tensor::zeros([d_output], device)));

    linear
}
