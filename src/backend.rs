//! Backend abstraction - Multi-backend support
//!
//! Supports both CUDA (GPU) and NdArray (CPU) backends. The CPU path keeps the
//! crate usable on machines without a GPU, including CI.

use burn::backend::Autodiff;

#[cfg(feature = "cuda")]
pub type DefaultBackend = burn_cuda::Cuda;

#[cfg(all(not(feature = "cuda"), feature = "ndarray"))]
pub type DefaultBackend = burn_ndarray::NdArray;

#[cfg(all(not(feature = "cuda"), not(feature = "ndarray")))]
compile_error!("At least one backend (cuda or ndarray) must be enabled!");

/// The default autodiff backend for training
pub type TrainingBackend = Autodiff<DefaultBackend>;

/// Get the default device
pub fn default_device() -> <DefaultBackend as burn::tensor::backend::Backend>::Device {
    <DefaultBackend as burn::tensor::backend::Backend>::Device::default()
}

/// Get a human-readable name for the current backend
pub fn backend_name() -> &'static str {
    #[cfg(feature = "cuda")]
    {
        "CUDA (GPU)"
    }

    #[cfg(all(not(feature = "cuda"), feature = "ndarray"))]
    {
        "NdArray (CPU)"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_name() {
        assert!(!backend_name().is_empty());
    }

    #[test]
    fn test_default_device() {
        let _ = default_device();
    }
}
