use super::model::Seq2SeqModel;
use super::pipeline::SummarizationPipeline;
use crate::core::{ModelOptions, PipelineError, Result, SummarizationConfig};
use crate::models::generation::BeamSearchConfig;
use crate::models::{T5Model, T5Size};
use crate::pipelines::utils::{BasePipelineBuilder, DeviceRequest, DeviceSelectable};
use candle_core::Device;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// Settings set on the builder; anything left `None` keeps the checkpoint's value.
#[derive(Debug, Clone, Default, PartialEq)]
struct Overrides {
    prefix: Option<String>,
    max_length: Option<usize>,
    min_length: Option<usize>,
    num_beams: Option<usize>,
    early_stopping: Option<bool>,
    length_penalty: Option<f64>,
    no_repeat_ngram_size: Option<usize>,
}

impl Overrides {
    fn apply(&self, base: &SummarizationConfig) -> SummarizationConfig {
        SummarizationConfig {
            prefix: self.prefix.clone().unwrap_or_else(|| base.prefix.clone()),
            max_length: self.max_length.unwrap_or(base.max_length),
            min_length: self.min_length.unwrap_or(base.min_length),
            num_beams: self.num_beams.unwrap_or(base.num_beams),
            early_stopping: self.early_stopping.unwrap_or(base.early_stopping),
            length_penalty: self.length_penalty.unwrap_or(base.length_penalty),
            no_repeat_ngram_size: self.no_repeat_ngram_size.unwrap_or(base.no_repeat_ngram_size),
        }
    }

    /// Checks that need no checkpoint; the merged config is checked again at build.
    fn validate(&self) -> Result<()> {
        if self.num_beams == Some(0) {
            return Err(PipelineError::InvalidParams("num_beams must be at least 1".into()));
        }
        if self.max_length == Some(0) {
            return Err(PipelineError::InvalidParams("max_length must be at least 1".into()));
        }
        if let (Some(min), Some(max)) = (self.min_length, self.max_length) {
            if min > max {
                return Err(PipelineError::InvalidParams(format!(
                    "min_length ({min}) exceeds max_length ({max})"
                )));
            }
        }
        Ok(())
    }
}

/// Builder for a [`SummarizationPipeline`].
///
/// Generation settings default to the checkpoint's own summarization
/// parameters; each setter overrides one of them.
pub struct SummarizationPipelineBuilder<M: Seq2SeqModel> {
    options: M::Options,
    device_request: DeviceRequest,
    overrides: Overrides,
}

impl<M: Seq2SeqModel> SummarizationPipelineBuilder<M> {
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Default,
            overrides: Overrides::default(),
        }
    }

    /// Upper bound on generated tokens, counting the decoder start token.
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.overrides.max_length = Some(max_length);
        self
    }

    pub fn min_length(mut self, min_length: usize) -> Self {
        self.overrides.min_length = Some(min_length);
        self
    }

    pub fn num_beams(mut self, num_beams: usize) -> Self {
        self.overrides.num_beams = Some(num_beams);
        self
    }

    pub fn early_stopping(mut self, early_stopping: bool) -> Self {
        self.overrides.early_stopping = Some(early_stopping);
        self
    }

    pub fn length_penalty(mut self, length_penalty: f64) -> Self {
        self.overrides.length_penalty = Some(length_penalty);
        self
    }

    pub fn no_repeat_ngram_size(mut self, size: usize) -> Self {
        self.overrides.no_repeat_ngram_size = Some(size);
        self
    }

    /// Text prepended to every input. T5 expects `"summarize: "`.
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.overrides.prefix = Some(prefix.into());
        self
    }
}

impl<M: Seq2SeqModel> DeviceSelectable for SummarizationPipelineBuilder<M> {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl<M> BasePipelineBuilder for SummarizationPipelineBuilder<M>
where
    M: Seq2SeqModel + Send + Sync + 'static,
    M::Options: ModelOptions + Clone,
{
    type Model = M;
    type Options = M::Options;
    type Pipeline = SummarizationPipeline<M>;

    fn options(&self) -> &Self::Options {
        &self.options
    }

    fn device_request(&self) -> &DeviceRequest {
        &self.device_request
    }

    fn validate(&self) -> Result<()> {
        self.overrides.validate()
    }

    fn create_model(options: Self::Options, device: Device) -> Result<M> {
        M::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        M::get_tokenizer(options)
    }

    fn construct_pipeline(
        self,
        model: Arc<M>,
        tokenizer: Tokenizer,
    ) -> Result<SummarizationPipeline<M>> {
        let config = self.overrides.apply(model.task_config());
        BeamSearchConfig::from(&config).validate()?;

        Ok(SummarizationPipeline {
            model,
            tokenizer,
            config,
        })
    }
}

impl SummarizationPipelineBuilder<T5Model> {
    pub fn t5(size: T5Size) -> Self {
        Self::new(size)
    }
}
