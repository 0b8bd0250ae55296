use super::model::FillMaskModel;
use super::placeholder::{
    resolve_placeholders, MaskScorer, MaskedSentence, Prediction, ResolvedSentence,
    TokenDistribution,
};
use crate::core::{PipelineError, Result};
use crate::pipelines::tokenization::TokenizedText;
use candle_core::{DType, IndexOp, Tensor, D};
use candle_nn::ops::softmax;
use std::sync::Arc;
use tokenizers::{Encoding, Tokenizer};

/// A ready-to-use pipeline for filling `[MASK]` placeholders.
///
/// After building with [`FillMaskPipelineBuilder`](super::FillMaskPipelineBuilder),
/// call [`fill_mask`](Self::fill_mask) to replace every mask in a sentence, or
/// [`predict_top_k`](Self::predict_top_k) to inspect the candidates for one.
///
/// ```rust,no_run
/// use transformers_compare::pipelines::fill_mask_pipeline::*;
///
/// # fn main() -> transformers_compare::Result<()> {
/// let pipeline = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).build()?;
///
/// let output = pipeline.fill_mask("Nearly all men can [MASK], but few can [MASK].")?;
/// println!("{output}");
/// # Ok(())
/// # }
/// ```
pub struct FillMaskPipeline<M: FillMaskModel> {
    pub(crate) model: Arc<M>,
    pub(crate) tokenizer: Tokenizer,
}

impl<M: FillMaskModel> FillMaskPipeline<M> {
    /// Replace every mask in `text` with its most likely token.
    ///
    /// Text without masks is returned unchanged.
    pub fn fill_mask(&self, text: &str) -> Result<String> {
        Ok(self.resolve(text)?.text)
    }

    /// Like [`fill_mask`](Self::fill_mask), also returning the per-mask predictions.
    pub fn resolve(&self, text: &str) -> Result<ResolvedSentence> {
        let sentence = MaskedSentence::parse(text, self.model.mask_token())?;
        resolve_placeholders(self, &sentence)
    }

    /// Return the top prediction for the first masked token.
    pub fn predict(&self, text: &str) -> Result<Prediction> {
        self.predict_top_k(text, 1)?
            .into_iter()
            .next()
            .ok_or_else(|| PipelineError::Unexpected("model returned no predictions".into()))
    }

    /// Return the `k` most likely tokens for the first masked token, with
    /// softmax probabilities, best first.
    pub fn predict_top_k(&self, text: &str, k: usize) -> Result<Vec<Prediction>> {
        if k == 0 {
            return Ok(vec![]);
        }
        let encoding = self.encode(text)?;
        let positions = self.mask_positions(&encoding)?;
        let position = *positions.first().ok_or(PipelineError::MaskNotFound {
            occurrence: 0,
            found: 0,
        })?;

        let logits = self.model.logits(&encoding)?;
        let distribution = Self::distribution_at(&logits, position)?;
        self.to_predictions(&distribution, k)
    }

    /// Top-k predictions for every masked token, from a single forward pass.
    ///
    /// Each mask is scored independently against the masked input.
    pub fn predict_each(&self, text: &str, k: usize) -> Result<Vec<Vec<Prediction>>> {
        let encoding = self.encode(text)?;
        let positions = self.mask_positions(&encoding)?;
        if positions.is_empty() || k == 0 {
            return Ok(vec![Vec::new(); positions.len()]);
        }

        let logits = self.model.logits(&encoding)?;
        positions
            .into_iter()
            .map(|position| {
                let distribution = Self::distribution_at(&logits, position)?;
                self.to_predictions(&distribution, k)
            })
            .collect()
    }

    /// Tokenize `text` the way the model sees it.
    pub fn tokenize(&self, text: &str) -> Result<TokenizedText> {
        TokenizedText::encode(&self.tokenizer, text, true)
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn mask_token(&self) -> &str {
        self.model.mask_token()
    }

    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }

    fn encode(&self, text: &str) -> Result<Encoding> {
        self.tokenizer
            .encode(text, true)
            .map_err(|e| PipelineError::tokenization(text, e))
    }

    fn mask_token_id(&self) -> Result<u32> {
        let mask = self.model.mask_token();
        self.tokenizer.token_to_id(mask).ok_or_else(|| {
            PipelineError::Tokenization(format!("tokenizer does not contain a '{mask}' token"))
        })
    }

    fn mask_positions(&self, encoding: &Encoding) -> Result<Vec<usize>> {
        let mask_id = self.mask_token_id()?;
        Ok(encoding
            .get_ids()
            .iter()
            .enumerate()
            .filter(|(_, id)| **id == mask_id)
            .map(|(i, _)| i)
            .collect())
    }

    fn distribution_at(logits: &Tensor, position: usize) -> Result<TokenDistribution> {
        let logits = logits.i(position)?.to_dtype(DType::F32)?;
        let probs = softmax(&logits, D::Minus1)?;
        Ok(TokenDistribution::new(probs.to_vec1::<f32>()?))
    }

    fn to_predictions(&self, distribution: &TokenDistribution, k: usize) -> Result<Vec<Prediction>> {
        distribution
            .top_k(k)
            .into_iter()
            .map(|(token_id, score)| {
                Ok(Prediction {
                    token: self.token_text(token_id)?.trim().to_string(),
                    token_id,
                    score,
                })
            })
            .collect()
    }
}

impl<M: FillMaskModel> MaskScorer for FillMaskPipeline<M> {
    fn score_placeholder(&self, masked_text: &str, occurrence: usize) -> Result<TokenDistribution> {
        let encoding = self.encode(masked_text)?;
        let positions = self.mask_positions(&encoding)?;
        let position = *positions
            .get(occurrence)
            .ok_or(PipelineError::MaskNotFound {
                occurrence,
                found: positions.len(),
            })?;

        let logits = self.model.logits(&encoding)?;
        Self::distribution_at(&logits, position)
    }

    /// Special tokens decode to their surface form rather than to nothing.
    fn token_text(&self, token_id: u32) -> Result<String> {
        self.tokenizer
            .decode(&[token_id], false)
            .map_err(|e| PipelineError::Tokenization(format!("failed to decode token {token_id}: {e}")))
    }
}
