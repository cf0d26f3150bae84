//! # DeepCluster CNN
//!
//! A Rust library defining the convolutional network used in a deep-clustering
//! unsupervised representation-learning pipeline, built with the Burn framework.
//!
//! ## Features
//!
//! - **VGG-style trunk** driven by a declarative layer configuration list
//! - **Fixed Sobel preprocessing** for edge-based (color-invariant) features
//! - **Replaceable top layer** that is discarded and reinitialized each
//!   training epoch, after cluster assignments are recomputed externally
//! - **Burn framework** for portable training and inference across backends
//!
//! ## Modules
//!
//! - `model`: trunk, edge filter, clustering network, and configurations
//! - `backend`: backend/device selection (CUDA or CPU)
//! - `utils`: error types and logging helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use deepcluster_cnn::backend::{default_device, TrainingBackend};
//! use deepcluster_cnn::DeepClusterNetConfig;
//!
//! let device = default_device();
//! let net = DeepClusterNetConfig::new(100, 64)
//!     .with_sobel(true)
//!     .init::<TrainingBackend>(&device)?
//!     .renew_top_layer(&device);
//!
//! let embeddings = net.forward(images, true); // for cluster assignment
//! let logits = net.forward(images, false);    // for pseudolabel training
//! ```
//!
//! The training loop, data pipeline, and cluster assignment live outside this
//! crate; they consume the embedding/logits transforms exposed here.

pub mod backend;
pub mod model;
pub mod utils;

// Re-export commonly used items for convenience
pub use model::config::ModelConfig;
pub use model::net::{DeepClusterNet, DeepClusterNetConfig};
pub use model::sobel::Sobel;
pub use model::vgg::{ConvBlock, LayerSpec, VggTrunk, VggTrunkConfig};
pub use utils::error::{DeepClusterError, Result};

/// Input spatial sizes the trunk configuration tables cover
pub const SUPPORTED_INPUT_SIZES: [usize; 2] = [24, 64];

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
