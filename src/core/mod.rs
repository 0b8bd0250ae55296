pub mod cache;
pub mod config;
pub mod error;

pub use cache::{global_cache, ModelCache, ModelOptions};
pub use config::SummarizationConfig;
pub use error::{PipelineError, Result};
