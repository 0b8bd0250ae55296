use super::model::Seq2SeqModel;
use crate::core::{PipelineError, Result, SummarizationConfig};
use crate::models::generation::BeamSearchConfig;
use crate::pipelines::tokenization::TokenizedText;
use std::sync::Arc;
use tokenizers::Tokenizer;

/// A ready-to-use pipeline for abstractive summarization.
///
/// ```rust,no_run
/// use transformers_compare::pipelines::summarization_pipeline::*;
///
/// # fn main() -> transformers_compare::Result<()> {
/// let pipeline = SummarizationPipelineBuilder::t5(T5Size::Small)
///     .max_length(150)
///     .num_beams(4)
///     .early_stopping(true)
///     .build()?;
///
/// let summary = pipeline.summarize("A long article about rust ...")?;
/// println!("{summary}");
/// # Ok(())
/// # }
/// ```
pub struct SummarizationPipeline<M: Seq2SeqModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) config: SummarizationConfig,
}

impl<M: Seq2SeqModel> SummarizationPipeline<M> {
    /// Summarize `text` into a single string.
    pub fn summarize(&self, text: &str) -> Result<String> {
        let ids = self.generate_ids(text)?;
        let summary = self
            .tokenizer
            .decode(&ids, true)
            .map_err(|e| PipelineError::Tokenization(format!("failed to decode summary: {e}")))?;
        Ok(summary.trim().to_string())
    }

    /// Raw generated ids for `text`, before decoding.
    pub fn generate_ids(&self, text: &str) -> Result<Vec<u32>> {
        if text.trim().is_empty() {
            return Err(PipelineError::InvalidParams(
                "cannot summarize empty text".into(),
            ));
        }

        let input = format!("{}{}", self.config.prefix, text);
        let encoding = self
            .tokenizer
            .encode(input.as_str(), true)
            .map_err(|e| PipelineError::tokenization(&input, e))?;

        let params = BeamSearchConfig::from(&self.config);
        tracing::debug!(
            input_tokens = encoding.len(),
            num_beams = params.num_beams,
            max_length = params.max_length,
            "summarizing"
        );
        self.model.generate(encoding.get_ids(), &params)
    }

    /// Effective generation settings: checkpoint defaults with builder overrides applied.
    pub fn config(&self) -> &SummarizationConfig {
        &self.config
    }

    /// Tokenize `text` the way the model sees it, without the task prefix.
    pub fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        TokenizedText::encode(&self.tokenizer, text, true)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}
