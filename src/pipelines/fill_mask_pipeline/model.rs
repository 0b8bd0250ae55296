use crate::core::Result;
use candle_core::{Device, Tensor};
use tokenizers::{Encoding, Tokenizer};

use super::placeholder::DEFAULT_MASK_TOKEN;

/// A masked-language model usable by [`FillMaskPipeline`](super::FillMaskPipeline).
pub trait FillMaskModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: Device) -> Result<Self>
    where
        Self: Sized;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Surface form of the mask token in input text.
    fn mask_token(&self) -> &str {
        DEFAULT_MASK_TOKEN
    }

    /// Vocabulary logits for every position of `encoding`, shaped `(seq_len, vocab_size)`.
    fn logits(&self, encoding: &Encoding) -> Result<Tensor>;

    fn device(&self) -> &Device;
}
