//! Side-by-side view of how a tokenizer splits text.

use crate::core::{PipelineError, Result};
use tokenizers::Tokenizer;

/// Text broken into subword tokens, their ids, and the ids decoded back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenizedText {
    pub tokens: Vec<String>,
    pub ids: Vec<u32>,
    /// `ids` decoded with special tokens skipped.
    pub decoded: String,
}

impl TokenizedText {
    pub fn encode(tokenizer: &Tokenizer, text: &str, add_special_tokens: bool) -> Result<Self> {
        let encoding = tokenizer
            .encode(text, add_special_tokens)
            .map_err(|e| PipelineError::tokenization(text, e))?;
        let ids = encoding.get_ids().to_vec();
        let decoded = tokenizer
            .decode(&ids, true)
            .map_err(|e| PipelineError::Tokenization(format!("failed to decode ids: {e}")))?;

        Ok(Self {
            tokens: encoding.get_tokens().to_vec(),
            ids,
            decoded,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
