use super::model::FillMaskModel;
use super::pipeline::FillMaskPipeline;
use crate::core::{ModelOptions, Result};
use crate::models::{BertSize, FillMaskBertModel, FillMaskModernBertModel, ModernBertSize};
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, DeviceSelectable};
use candle_core::Device;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// Builder for a [`FillMaskPipeline`].
///
/// Start with [`bert`](FillMaskPipelineBuilder::bert) or
/// [`modernbert`](FillMaskPipelineBuilder::modernbert), optionally pick a
/// device with `.cpu()` / `.cuda_device(i)`, then call `.build()`.
pub struct FillMaskPipelineBuilder<M: FillMaskModel> {
    options: M::Options,
    device_request: DeviceRequest,
}

impl<M: FillMaskModel> FillMaskPipelineBuilder<M> {
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Default,
        }
    }
}

impl<M: FillMaskModel> DeviceSelectable for FillMaskPipelineBuilder<M> {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl<M> BasePipelineBuilder for FillMaskPipelineBuilder<M>
where
    M: FillMaskModel + Send + Sync + 'static,
    M::Options: ModelOptions + Clone,
{
    type Model = M;
    type Options = M::Options;
    type Pipeline = FillMaskPipeline<M>;

    fn options(&self) -> &Self::Options {
        &self.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.device_request
    }

    fn create_model(options: Self::Options, device: Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(self, model: Arc<M>, tokenizer: Tokenizer) -> Result<FillMaskPipeline<M>> {
        Ok(FillMaskPipeline { model, tokenizer })
    }
}

impl FillMaskPipelineBuilder<FillMaskBertModel> {
    pub fn bert(size: BertSize) -> Self {
        Self::new(size)
    }
}

impl FillMaskPipelineBuilder<FillMaskModernBertModel> {
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self::new(size)
    }
}
