//! Model module for the deep-clustering CNN, built with the Burn framework
//!
//! This module provides:
//! - A VGG-style convolutional trunk driven by a layer configuration list
//! - A fixed (non-trainable) Sobel edge filter for preprocessing
//! - The clustering network: trunk, embedding head, and a replaceable
//!   linear top layer
//! - Serializable model configuration
//!
//! ## Architecture
//!
//! Images optionally pass through the Sobel filter, then through the
//! configured convolution/batch-norm/ReLU/max-pool stack. The flattened
//! trunk features project to a fixed-length embedding used for cluster
//! assignment; during training a linear top layer maps the embedding to
//! pseudolabel logits. The top layer is discarded and reinitialized at the
//! start of every epoch, after clusters are recomputed externally.

pub mod config;
pub mod net;
pub mod sobel;
pub mod vgg;

// Re-export main types for convenience
pub use config::ModelConfig;
pub use net::{DeepClusterNet, DeepClusterNetConfig};
pub use sobel::Sobel;
pub use vgg::{ConvBlock, LayerSpec, VggTrunk, VggTrunkConfig};

/// Default embedding width produced by the feature head
pub const DEFAULT_EMBEDDING_DIM: usize = 1000;

/// Default dropout rate ahead of the top layer
pub const DEFAULT_DROPOUT: f64 = 0.5;
