//! Summarization pipeline for encoder/decoder models.
//!
//! The input is prefixed with the checkpoint's task prefix (`"summarize: "`
//! for T5), encoded, decoded with beam search and turned back into text.
//!
//! ## Main Types
//!
//! - [`SummarizationPipeline`] - High-level interface for summarization
//! - [`SummarizationPipelineBuilder`] - Builder with generation overrides
//! - [`Seq2SeqModel`] - Trait for encoder/decoder model implementations

pub mod builder;
pub mod model;
pub mod pipeline;

pub use builder::SummarizationPipelineBuilder;
pub use model::Seq2SeqModel;
pub use pipeline::SummarizationPipeline;

pub use crate::core::SummarizationConfig;
pub use crate::models::generation::BeamSearchConfig;
pub use crate::models::T5Size;
pub use crate::pipelines::utils::{BasePipelineBuilder, DeviceSelectable};
