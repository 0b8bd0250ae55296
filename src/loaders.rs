//! Model and tokenizer loading utilities for Hugging Face Hub integration.
//!
//! This module provides loaders for downloading and loading the components of
//! a pretrained checkpoint from the Hugging Face Hub:
//! - Tokenizers (`tokenizer.json`)
//! - Model configuration files (`config.json`)
//! - Model weights (`model.safetensors`, falling back to `pytorch_model.bin`)
//!
//! ## Main Types
//!
//! - [`HfLoader`] - Generic Hugging Face file loader with retry logic
//! - [`TokenizerLoader`] - Loads tokenizers from Hugging Face repositories
//! - [`ConfigLoader`] - Loads and deserializes JSON configuration files
//! - [`WeightsLoader`] - Loads model weights into a [`VarBuilder`]
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use transformers_compare::loaders::{TokenizerLoader, WeightsLoader};
//!
//! # fn main() -> transformers_compare::Result<()> {
//! let tokenizer = TokenizerLoader::new("google-bert/bert-base-uncased", "tokenizer.json").load()?;
//! let vb = WeightsLoader::new("google-bert/bert-base-uncased")
//!     .load(candle_core::DType::F32, &candle_core::Device::Cpu)?;
//! # Ok(())
//! # }
//! ```
//!
//! All downloads retry when the Hub cache lock is held by another process.

use crate::core::{PipelineError, Result};
use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use hf_hub::{api::sync::Api, Repo, RepoType};
use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use std::path::PathBuf;
use std::time::Duration;
use tokenizers::Tokenizer;

const DEFAULT_REVISION: &str = "main";
const MAX_RETRIES: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub revision: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            revision: DEFAULT_REVISION.into(),
            filename: filename.into(),
        }
    }

    /// Download the file (or reuse the local Hub cache) and return its path.
    pub fn load(&self) -> Result<PathBuf> {
        let api = Api::new()?;
        let repo = api.repo(Repo::with_revision(
            self.repo.clone(),
            RepoType::Model,
            self.revision.clone(),
        ));

        let mut attempt = 0;
        loop {
            match repo.get(&self.filename) {
                Ok(path) => {
                    tracing::debug!(repo = %self.repo, file = %self.filename, "resolved hub file");
                    return Ok(path);
                }
                Err(e) => {
                    let lock_contention = e.to_string().contains("Lock acquisition failed");
                    if lock_contention && attempt + 1 < MAX_RETRIES {
                        // Exponential backoff: 100ms, 200ms, ...
                        let wait = Duration::from_millis(100 * (1 << attempt));
                        tracing::warn!(
                            repo = %self.repo,
                            file = %self.filename,
                            attempt,
                            "hub cache lock held, retrying in {wait:?}"
                        );
                        std::thread::sleep(wait);
                        attempt += 1;
                        continue;
                    }
                    return Err(e.into());
                }
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, filename),
        }
    }

    pub fn load(&self) -> Result<Tokenizer> {
        let path = self.tokenizer_file_loader.load()?;
        tracing::info!(repo = %self.tokenizer_file_loader.repo, "loading tokenizer");
        Tokenizer::from_file(&path).map_err(|e| {
            PipelineError::Tokenization(format!("failed to load tokenizer from {path:?}: {e}"))
        })
    }
}

/// Loads a JSON file from a repository and deserializes it into `T`.
#[derive(Debug, Clone)]
pub struct ConfigLoader<T> {
    pub config_file_loader: HfLoader,
    _config: PhantomData<T>,
}

impl<T: DeserializeOwned> ConfigLoader<T> {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            config_file_loader: HfLoader::new(repo, filename),
            _config: PhantomData,
        }
    }

    /// Returns the raw file contents alongside the parsed value, so callers
    /// can read extra sections the typed config does not model.
    pub fn load_with_raw(&self) -> Result<(T, String)> {
        let path = self.config_file_loader.load()?;
        let content = std::fs::read_to_string(&path)?;
        let config = serde_json::from_str(&content).map_err(|e| {
            PipelineError::ModelFormat(format!("failed to parse config file {path:?}: {e}"))
        })?;
        Ok((config, content))
    }

    pub fn load(&self) -> Result<T> {
        self.load_with_raw().map(|(config, _)| config)
    }
}

/// Loads checkpoint weights, preferring safetensors over pickled PyTorch files.
#[derive(Debug, Clone)]
pub struct WeightsLoader {
    pub repo: String,
}

impl WeightsLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    fn weights_file(&self) -> Result<PathBuf> {
        first_available(&self.repo, WEIGHT_FILES, |file| {
            HfLoader::new(&self.repo, file).load()
        })
    }

    pub fn load(&self, dtype: DType, device: &Device) -> Result<VarBuilder<'static>> {
        let weights = self.weights_file()?;
        tracing::info!(repo = %self.repo, file = ?weights, "loading model weights");
        var_builder_from_file(weights, dtype, device)
    }
}

const WEIGHT_FILES: &[&str] = &["model.safetensors", "pytorch_model.bin"];

/// Fetch the first of `files` that loads, keeping every failure for the final error.
fn first_available<F>(repo: &str, files: &[&str], mut fetch: F) -> Result<PathBuf>
where
    F: FnMut(&str) -> Result<PathBuf>,
{
    let mut failures = Vec::with_capacity(files.len());
    for file in files {
        match fetch(file) {
            Ok(path) => return Ok(path),
            Err(e) => {
                tracing::debug!(repo, file, "weights file unavailable: {e}");
                failures.push(format!("`{file}`: {e}"));
            }
        }
    }
    Err(PipelineError::ModelFormat(format!(
        "no loadable weights in repo {repo} ({})",
        failures.join("; ")
    )))
}

/// Build a [`VarBuilder`] from a local weights file, dispatching on its extension.
pub fn var_builder_from_file(
    weights: PathBuf,
    dtype: DType,
    device: &Device,
) -> Result<VarBuilder<'static>> {
    match weights.extension().and_then(|ext| ext.to_str()) {
        // SAFETY: the file is a read-only entry in the Hub cache and is not
        // modified while the mapping is alive.
        Some("safetensors") => Ok(unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights], dtype, device)?
        }),
        Some("bin") => Ok(VarBuilder::from_pth(&weights, dtype, device)?),
        _ => Err(PipelineError::ModelFormat(format!(
            "unsupported weight file format: {weights:?}"
        ))),
    }
}
