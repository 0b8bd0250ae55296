//! Fill-mask pipeline for predicting masked tokens in text.
//!
//! Sentences may hold any number of `[MASK]` placeholders. Each one is
//! predicted from the original masked sentence and the best candidates are
//! substituted left to right.
//!
//! ## Main Types
//!
//! - [`FillMaskPipeline`] - High-level interface for mask filling
//! - [`FillMaskPipelineBuilder`] - Builder pattern for pipeline configuration
//! - [`FillMaskModel`] - Trait for fill-mask model implementations
//! - [`MaskedSentence`], [`MaskScorer`], [`resolve_placeholders`] - The
//!   model-independent resolution loop
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use transformers_compare::pipelines::fill_mask_pipeline::*;
//!
//! # fn main() -> transformers_compare::Result<()> {
//! let pipeline = FillMaskPipelineBuilder::bert(BertSize::BaseUncased).build()?;
//!
//! let top3 = pipeline.predict_top_k("The capital of France is [MASK].", 3)?;
//! for p in &top3 {
//!     println!("{} ({:.3})", p.token, p.score);
//! }
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;
pub mod placeholder;

pub use builder::FillMaskPipelineBuilder;
pub use model::FillMaskModel;
pub use pipeline::FillMaskPipeline;
pub use placeholder::{
    resolve_placeholders, MaskScorer, MaskedSentence, Prediction, ResolvedSentence, Segment,
    TokenDistribution, DEFAULT_MASK_TOKEN,
};

pub use crate::models::{BertSize, ModernBertSize};
pub use crate::pipelines::utils::{BasePipelineBuilder, DeviceSelectable};
