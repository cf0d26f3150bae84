//! Model Configuration Module
//!
//! Serializable configuration for the clustering network, for persisting the
//! architecture choice alongside experiment outputs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::net::{self, DeepClusterNetConfig, LAST_CONV_CHANNELS};
use super::vgg::LayerSpec;
use super::{DEFAULT_DROPOUT, DEFAULT_EMBEDDING_DIM};
use crate::utils::error::{DeepClusterError, Result};

/// Configuration for the clustering network architecture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Whether to prepend the fixed Sobel edge filter
    pub sobel: bool,

    /// Number of output classes (the cluster count chosen by the pipeline)
    pub num_classes: usize,

    /// Expected input spatial size (24 or 64, assumes square images)
    pub input_size: usize,

    /// Number of input channels (3 for RGB)
    pub input_channels: usize,

    /// Embedding width produced by the feature head
    pub embedding_dim: usize,

    /// Dropout rate ahead of the top layer (0.0 to 1.0)
    pub dropout_rate: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            sobel: false,
            num_classes: 10,
            input_size: 64,
            input_channels: 3,
            embedding_dim: DEFAULT_EMBEDDING_DIM,
            dropout_rate: DEFAULT_DROPOUT,
        }
    }
}

impl ModelConfig {
    /// Create a new model configuration with custom parameters
    pub fn new(num_classes: usize, input_size: usize) -> Self {
        Self {
            num_classes,
            input_size,
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
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

        if !(0.0..1.0).contains(&self.dropout_rate) {
            return Err(DeepClusterError::Config(
                "dropout_rate must be in range [0.0, 1.0)".to_string(),
            ));
        }

        if self.embedding_dim == 0 {
            return Err(DeepClusterError::Config(
                "embedding_dim must be greater than 0".to_string(),
            ));
        }

        // Rejects sizes with no trunk table
        net::trunk_layers(self.input_size).map(|_| ())
    }

    /// Trunk configuration list selected by the input size
    pub fn trunk_layers(&self) -> Result<Vec<LayerSpec>> {
        net::trunk_layers(self.input_size)
    }

    /// Length of the flattened trunk output the feature head consumes
    pub fn flattened_features(&self) -> Result<usize> {
        let feature_size = net::post_trunk_size(self.input_size)?;
        Ok(LAST_CONV_CHANNELS * feature_size * feature_size)
    }

    /// Convert into the Burn-side network configuration
    pub fn to_net_config(&self) -> DeepClusterNetConfig {
        DeepClusterNetConfig::new(self.num_classes, self.input_size)
            .with_input_channels(self.input_channels)
            .with_sobel(self.sobel)
            .with_embedding_dim(self.embedding_dim)
            .with_dropout_rate(self.dropout_rate)
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| DeepClusterError::Serialization(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        serde_json::from_str(&json).map_err(|e| DeepClusterError::Serialization(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_config_default() {
        let config = ModelConfig::default();
        assert_eq!(config.num_classes, 10);
        assert_eq!(config.input_size, 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_model_config_validation() {
        let mut config = ModelConfig::default();
        config.num_classes = 0;
        assert!(config.validate().is_err());

        config = ModelConfig::default();
        config.input_size = 100; // No trunk table for this size
        assert!(matches!(
            config.validate(),
            Err(DeepClusterError::UnsupportedInputSize(100))
        ));

        config = ModelConfig::default();
        config.dropout_rate = 1.5; // Out of range
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_flattened_features() {
        let config = ModelConfig::new(10, 64);
        // 64 -> 32 -> 16 -> 8 -> 4 spatial, 512 channels
        assert_eq!(config.flattened_features().unwrap(), 512 * 4 * 4);

        let config = ModelConfig::new(10, 24);
        // 24 -> 12 -> 6 -> 3 spatial, no pool after the last conv
        assert_eq!(config.flattened_features().unwrap(), 512 * 3 * 3);
    }

    #[test]
    fn test_trunk_layer_selection() {
        let config = ModelConfig::new(10, 64);
        assert_eq!(config.trunk_layers().unwrap().len(), 8);

        let config = ModelConfig::new(10, 24);
        assert_eq!(config.trunk_layers().unwrap().len(), 7);
    }

    #[test]
    fn test_to_net_config() {
        let mut config = ModelConfig::new(42, 24);
        config.sobel = true;

        let net_config = config.to_net_config();
        assert_eq!(net_config.num_classes, 42);
        assert_eq!(net_config.input_size, 24);
        assert!(net_config.sobel);
    }

    #[test]
    fn test_save_load_round_trip() {
        let path = std::env::temp_dir().join("deepcluster_model_config_test.json");

        let mut config = ModelConfig::new(17, 24);
        config.sobel = true;
        config.save(&path).unwrap();

        let loaded = ModelConfig::load(&path).unwrap();
        assert_eq!(loaded.num_classes, 17);
        assert_eq!(loaded.input_size, 24);
        assert!(loaded.sobel);

        std::fs::remove_file(&path).ok();
    }
}
