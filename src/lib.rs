//! Masked-LM fill-mask and T5 summarization pipelines on top of candle.
//!
//! Two pipelines are provided:
//!
//! - [`pipelines::fill_mask_pipeline`] resolves every `[MASK]` placeholder in
//!   a sentence, one at a time and left to right, with a BERT-family model.
//! - [`pipelines::summarization_pipeline`] summarizes text with T5 and beam
//!   search.
//!
//! ```rust,no_run
//! use transformers_compare::pipelines::fill_mask_pipeline::*;
//! use transformers_compare::pipelines::summarization_pipeline::{
//!     SummarizationPipelineBuilder, T5Size,
//! };
//!
//! # fn main() -> transformers_compare::Result<()> {
//! let fill_mask = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).build()?;
//! println!("{}", fill_mask.fill_mask("Paris is the [MASK] of France.")?);
//!
//! let summarizer = SummarizationPipelineBuilder::t5(T5Size::Small).build()?;
//! println!("{}", summarizer.summarize("Rust is a systems programming language ...")?);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;

pub use self::core::{PipelineError, Result};

pub use models::{BertSize, ModernBertSize, T5Size};
pub use pipelines::fill_mask_pipeline::{FillMaskPipeline, FillMaskPipelineBuilder};
pub use pipelines::summarization_pipeline::{SummarizationPipeline, SummarizationPipelineBuilder};
pub use pipelines::utils::{BasePipelineBuilder, DeviceSelectable};
