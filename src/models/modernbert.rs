//! ModernBERT masked-language models.
//!
//! Uses `candle_transformers::models::modernbert` for the underlying implementation.

use crate::core::{ModelOptions, Result};
use crate::loaders::{ConfigLoader, TokenizerLoader, WeightsLoader};
use crate::pipelines::fill_mask_pipeline::model::FillMaskModel;
use candle_core::{DType, Device, Tensor};
use candle_transformers::models::modernbert::{Config, ModernBertForMaskedLM};
use tokenizers::{Encoding, Tokenizer};

/// Available ModernBERT model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModernBertSize {
    Base,
    Large,
}

impl ModernBertSize {
    pub fn model_id(&self) -> &'static str {
        match self {
            ModernBertSize::Base => "answerdotai/ModernBERT-base",
            ModernBertSize::Large => "answerdotai/ModernBERT-large",
        }
    }
}

impl std::fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

impl ModelOptions for ModernBertSize {
    fn cache_key(&self) -> String {
        self.to_string()
    }
}

/// Fill-mask model using ModernBERT.
pub struct FillMaskModernBertModel {
    model: ModernBertForMaskedLM,
    device: Device,
}

impl FillMaskModernBertModel {
    pub fn new(size: ModernBertSize, device: Device) -> Result<Self> {
        let model_id = size.model_id();
        let _span = tracing::info_span!("load_modernbert", model = model_id).entered();

        let config = ConfigLoader::<Config>::new(model_id, "config.json").load()?;
        let vb = WeightsLoader::new(model_id).load(DType::F32, &device)?;
        let model = ModernBertForMaskedLM::load(vb, &config)?;

        tracing::info!(model = model_id, device = ?device.location(), "modernbert ready");
        Ok(Self { model, device })
    }
}

impl FillMaskModel for FillMaskModernBertModel {
    type Options = ModernBertSize;

    fn new(options: Self::Options, device: Device) -> Result<Self> {
        FillMaskModernBertModel::new(options, device)
    }

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer> {
        TokenizerLoader::new(options.model_id(), "tokenizer.json").load()
    }

    fn logits(&self, encoding: &Encoding) -> Result<Tensor> {
        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let attention_mask =
            Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let logits = self.model.forward(&input_ids, &attention_mask)?;
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
    fn sizes_map_to_answerdotai_repos() {
        assert_eq!(ModernBertSize::Base.model_id(), "answerdotai/ModernBERT-base");
        assert_eq!(ModernBertSize::Large.model_id(), "answerdotai/ModernBERT-large");
        assert_eq!(ModernBertSize::Large.cache_key(), "modernbert-large");
    }
}
