use crate::core::{Result, SummarizationConfig};
use crate::models::generation::BeamSearchConfig;
use candle_core::Device;
use tokenizers::Tokenizer;

/// An encoder/decoder model usable by [`SummarizationPipeline`](super::SummarizationPipeline).
pub trait Seq2SeqModel {
    type Options: std::fmt::Debug + Clone;

    fn new(options: Self::Options, device: Device) -> Result<Self>
    where
        Self: Sized;

    fn get_tokenizer(options: Self::Options) -> Result<Tokenizer>;

    /// Summarization settings shipped with the checkpoint.
    fn task_config(&self) -> &SummarizationConfig;

    /// Generate output ids for `input_ids`.
    ///
    /// The decoder start token is not part of the result; a trailing EOS may be.
    fn generate(&self, input_ids: &[u32], params: &BeamSearchConfig) -> Result<Vec<u32>>;

    fn device(&self) -> &Device;
}
