use thiserror::Error;

/// Error type returned by every pipeline, model and loader in this crate.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The number of predicted replacements does not match the number of
    /// placeholders in the sentence.
    #[error(
        "placeholder count mismatch: sentence has {placeholders} placeholder(s) but {replacements} replacement(s) were produced"
    )]
    PlaceholderMismatch {
        placeholders: usize,
        replacements: usize,
    },

    /// The tokenized input holds fewer mask tokens than the requested occurrence.
    #[error("mask occurrence {occurrence} not found: tokenized input contains {found} mask token(s)")]
    MaskNotFound { occurrence: usize, found: usize },

    #[error("scorer returned an empty token distribution")]
    EmptyDistribution,

    // Tokenization
    #[error("Tokenization failed: {0}")]
    Tokenization(String),

    // Network/Download
    #[error("Download failed: {0}")]
    Download(String),

    // Model loading
    #[error("Invalid model format: {0}")]
    ModelFormat(String),

    #[error("Invalid parameters: {0}")]
    InvalidParams(String),

    #[error("Device error: {0}")]
    Device(String),

    #[error("Unexpected: {0}")]
    Unexpected(String),

    // Pass-through from dependencies
    #[error(transparent)]
    Candle(#[from] candle_core::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(value: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Download(value.to_string())
    }
}

impl PipelineError {
    /// Wraps a `tokenizers` failure, keeping a short preview of the offending text.
    pub(crate) fn tokenization(text: &str, err: impl std::fmt::Display) -> Self {
        let preview: String = text.chars().take(50).collect();
        PipelineError::Tokenization(format!("failed on '{preview}': {err}"))
    }
}
