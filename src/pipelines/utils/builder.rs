//! Shared builder pattern for pipeline construction.
//!
//! Every pipeline builder follows the same steps:
//! 1. Resolve the device request to an actual device
//! 2. Generate a cache key from model options and device
//! 3. Get or create the model from the global cache
//! 4. Get the tokenizer for the model
//! 5. Construct the final pipeline with model and tokenizer
//!
//! [`BasePipelineBuilder`] captures this once; builders only supply the
//! model-specific hooks.

use super::{build_cache_key, DeviceRequest, DeviceSelectable};
use crate::core::{global_cache, ModelOptions, Result};
use candle_core::Device;
use std::sync::Arc;
use tokenizers::Tokenizer;

pub trait BasePipelineBuilder: DeviceSelectable + Sized {
    /// The model type shared through the cache.
    type Model: Send + Sync + 'static;

    /// The model options type.
    type Options: ModelOptions + Clone;

    /// The final pipeline type (e.g., `FillMaskPipeline<M>`).
    type Pipeline;

    fn options(&self) -> &Self::Options;

    fn device_request(&self) -> &DeviceRequest;

    /// Create a new model instance with the given options and device.
    fn create_model(options: Self::Options, device: Device) -> Result<Self::Model>;

    /// Get a tokenizer for the given options.
    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Construct the final pipeline from the model and tokenizer.
    fn construct_pipeline(self, model: Arc<Self::Model>, tokenizer: Tokenizer)
        -> Result<Self::Pipeline>;

    /// Reject invalid settings before any model is loaded.
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Build the pipeline using the common pattern.
    fn build(self) -> Result<Self::Pipeline> {
        self.validate()?;

        let device = self.device_request().clone().resolve()?;
        let key = build_cache_key(self.options(), &device);

        let options = self.options().clone();
        let model = global_cache().get_or_create(&key, || {
            tracing::info!(model = %key, "building model");
            Self::create_model(options, device.clone())
        })?;

        let tokenizer = Self::get_tokenizer(self.options().clone())?;

        self.construct_pipeline(model, tokenizer)
    }
}
