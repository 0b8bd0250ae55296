//! BERT masked-language models.
//!
//! Uses `candle_transformers::models::bert` for the underlying implementation.

use crate::core::{ModelOptions, Result};
use crate::loaders::{ConfigLoader, TokenizerLoader, WeightsLoader};
use crate::pipelines::fill_mask_pipeline::model::FillMaskModel;
use candle_core::{Device, Tensor};
use candle_transformers::models::bert::{BertForMaskedLM, Config, DTYPE};
use tokenizers::{Encoding, Tokenizer};

/// Available BERT checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BertSize {
    BaseUncased,
    BaseCased,
    LargeUncased,
}

impl BertSize {
    pub fn model_id(&self) -> &'static str {
        match self {
            BertSize::BaseUncased => "google-bert/bert-base-uncased",
            BertSize::BaseCased => "google-bert/bert-base-cased",
            BertSize::LargeUncased => "google-bert/bert-large-uncased",
        }
    }
}

impl std::fmt::Display for BertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            BertSize::BaseUncased => "bert-base-uncased",
            BertSize::BaseCased => "bert-base-cased",
            BertSize::LargeUncased => "bert-large-uncased",
        };
        write!(f, "{name}")
    }
}

impl ModelOptions for BertSize {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

/// Fill-mask model using BERT with its masked-LM head.
pub struct FillMaskBertModel {
    model: BertForMaskedLM,
    device: Device,
}

impl FillMaskBertModel {
    pub fn new(size: BertSize, device: Device) -> Result<Self> {
        let model_id = size.model_id();
        let _span = tracing::info_span!("load_bert", model = model_id).entered();

        let config = ConfigLoader::<Config>::new(model_id, "config.json").load()?;
        let vb = WeightsLoader::new(model_id).load(DTYPE, &device)?;
        let model = BertForMaskedLM::load(vb, &config)?;

        tracing::info!(model = model_id, device = ?device.location(), "bert ready");
        Ok(Self { model, device })
    }
}

impl FillMaskModel for FillMaskBertModel {
    type Options = BertSize;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        FillMaskBertModel::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        TokenizerLoader::new(options.model_id(), "tokenizer.json").load()
    }

    fn logits(&self, encoding: &Encoding) -> Result<Tensor> {
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = Tensor::new(encoding.get_type_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        // 1 x L x V
        let logits = self
            .model
            .forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        Ok(logits.squeeze(0)?)
    }

    fn device(&self) -> &Device {
        &self.device
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_ids_point_at_google_bert() {
        assert_eq!(BertSize::BaseUncased.model_id(), "google-bert/bert-base-uncased");
        assert_eq!(BertSize::BaseCased.model_id(), "google-bert/bert-base-cased");
        assert_eq!(BertSize::LargeUncased.model_id(), "google-bert/bert-large-uncased");
    }

    #[test]
    fn cache_keys_are_distinct() {
        let keys: Vec<_> = [BertSize::BaseUncased, BertSize::BaseCased, BertSize::LargeUncased]
            .iter()
            .map(ModelOptions::cache_key)
            .collect();
        assert_eq!(keys, ["bert-base-uncased", "bert-base-cased", "bert-large-uncased"]);
    }
}
