//! T5 encoder/decoder models for summarization.
//!
//! Uses `candle_transformers::models::t5` for the network and the crate's
//! beam search for decoding.

use super::generation::{beam_search, BeamSearchConfig};
use crate::core::{ModelOptions, PipelineError, Result, SummarizationConfig};
use crate::loaders::{ConfigLoader, TokenizerLoader, WeightsLoader};
use crate::pipelines::summarization_pipeline::model::Seq2SeqModel;
use candle_core::{DType, Device, Tensor, D};
use candle_nn::ops::log_softmax;
use candle_transformers::models::t5::{self, T5ForConditionalGeneration};
use std::sync::Mutex;
use tokenizers::Tokenizer;

/// Available T5 checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum T5Size {
    Small,
    Base,
    Large,
}

impl T5Size {
    pub fn model_id(&self) -> &'static str {
        match self {
            T5Size::Small => "google-t5/t5-small",
            T5Size::Base => "google-t5/t5-base",
            T5Size::Large => "google-t5/t5-large",
        }
    }
}

impl std::fmt::Display for T5Size {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            T5Size::Small => "t5-small",
            T5Size::Base => "t5-base",
            T5Size::Large => "t5-large",
        };
        write!(f, "{name}")
    }
}

impl ModelOptions for T5Size {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

pub struct T5Model {
    // encode/decode take &mut self
    model: Mutex<T5ForConditionalGeneration>,
    device: Device,
    decoder_start_token_id: u32,
    eos_token_id: u32,
    task_config: SummarizationConfig,
}

impl T5Model {
    pub fn new(size: T5Size, device: Device) -> Result<Self> {
        let model_id = size.model_id();
        let _span = tracing::info_span!("load_t5", model = model_id).entered();

        let (mut config, raw) =
            ConfigLoader::<t5::Config>::new(model_id, "config.json").load_with_raw()?;
        // Beam hypotheses diverge, so every step re-runs the full decoder prefix.
        config.use_cache = false;
        let task_config = SummarizationConfig::from_model_config(&raw)?;

        let vb = WeightsLoader::new(model_id).load(DType::F32, &device)?;
        let model = T5ForConditionalGeneration::load(vb, &config)?;

        let decoder_start_token_id = config
            .decoder_start_token_id
            .unwrap_or(config.pad_token_id) as u32;

        tracing::info!(
            model = model_id,
            device = ?device.location(),
            prefix = %task_config.prefix,
            "t5 ready"
        );

        Ok(Self {
            model: Mutex::new(model),
            device,
            decoder_start_token_id,
            eos_token_id: config.eos_token_id as u32,
            task_config,
        })
    }
}

impl Seq2SeqModel for T5Model {
    type Options = T5Size;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        T5Model::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        TokenizerLoader::new(options.model_id(), "tokenizer.json").load()
    }

    fn task_config(&self) -> &SummarizationConfig {
        &self.task_config
    }

    fn generate(&self, input_ids: &[u32], params: &BeamSearchConfig) -> Result<Vec<u32>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| PipelineError::Unexpected("t5 model lock poisoned".into()))?;
        model.clear_kv_cache();

        // 1 x L
        let input = Tensor::new(input_ids, &self.device)?.unsqueeze(0)?;
        let encoder_output = model.encode(&input)?;

        let tokens = beam_search(
            params,
            vec![self.decoder_start_token_id],
            self.eos_token_id,
            |prefix| {
                let decoder_ids = Tensor::new(prefix, &self.device)?.unsqueeze(0)?;
                // 1 x V, for the last decoder position
                let logits = model.decode(&decoder_ids, &encoder_output)?;
                let logits = logits.squeeze(0)?.to_dtype(DType::F32)?;
                Ok(log_softmax(&logits, D::Minus1)?.to_vec1::<f32>()?)
            },
        )?;

        tracing::debug!(
            input_len = input_ids.len(),
            output_len = tokens.len().saturating_sub(1),
            "t5 generation finished"
        );

        Ok(tokens.into_iter().skip(1).collect())
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes_map_to_google_t5_repos() {
        assert_eq!(T5Size::Small.model_id(), "google-t5/t5-small");
        assert_eq!(T5Size::Base.model_id(), "google-t5/t5-base");
        assert_eq!(T5Size::Large.model_id(), "google-t5/t5-large");
    }

    #[test]
    fn cache_key_uses_short_name() {
        assert_eq!(T5Size::Base.cache_key(), "t5-base");
    }
}
