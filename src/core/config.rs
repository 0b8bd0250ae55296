use serde::Deserialize;

/// Task settings for summarization, read from the `task_specific_params`
/// block of a seq2seq checkpoint's `config.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct SummarizationConfig {
    /// Text prepended to every input, e.g. `"summarize: "` for T5.
    pub prefix: String,
    pub max_length: usize,
    pub min_length: usize,
    pub num_beams: usize,
    pub early_stopping: bool,
    pub length_penalty: f64,
    /// 0 disables n-gram blocking.
    pub no_repeat_ngram_size: usize,
}

impl Default for SummarizationConfig {
    fn default() -> Self {
        Self {
            prefix: "summarize: ".to_string(),
            max_length: 150,
            min_length: 0,
            num_beams: 4,
            early_stopping: true,
            length_penalty: 1.0,
            no_repeat_ngram_size: 0,
        }
    }
}

#[derive(Deserialize, Default)]
struct RawSummarizationParams {
    prefix: Option<String>,
    max_length: Option<usize>,
    min_length: Option<usize>,
    num_beams: Option<usize>,
    early_stopping: Option<bool>,
    length_penalty: Option<f64>,
    no_repeat_ngram_size: Option<usize>,
}

#[derive(Deserialize, Default)]
struct RawTaskParams {
    summarization: Option<RawSummarizationParams>,
}

#[derive(Deserialize)]
struct RawModelConfig {
    task_specific_params: Option<RawTaskParams>,
}

impl SummarizationConfig {
    /// Parse the summarization task block from a full model `config.json`.
    ///
    /// Missing fields (or a missing block) fall back to [`Default`].
    pub fn from_model_config(json: &str) -> serde_json::Result<Self> {
        let raw: RawModelConfig = serde_json::from_str(json)?;
        let params = raw
            .task_specific_params
            .and_then(|t| t.summarization)
            .unwrap_or_default();

        let defaults = Self::default();
        Ok(Self {
            prefix: params.prefix.unwrap_or(defaults.prefix),
            max_length: params.max_length.unwrap_or(defaults.max_length),
            min_length: params.min_length.unwrap_or(defaults.min_length),
            num_beams: params.num_beams.unwrap_or(defaults.num_beams),
            early_stopping: params.early_stopping.unwrap_or(defaults.early_stopping),
            length_penalty: params.length_penalty.unwrap_or(defaults.length_penalty),
            no_repeat_ngram_size: params
                .no_repeat_ngram_size
                .unwrap_or(defaults.no_repeat_ngram_size),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_t5_task_params() {
        let json = r#"{
            "d_model": 512,
            "task_specific_params": {
                "summarization": {
                    "early_stopping": true,
                    "length_penalty": 2.0,
                    "max_length": 200,
                    "min_length": 30,
                    "no_repeat_ngram_size": 3,
                    "num_beams": 4,
                    "prefix": "summarize: "
                },
                "translation_en_to_de": { "prefix": "translate English to German: " }
            }
        }"#;

        let cfg = SummarizationConfig::from_model_config(json).unwrap();
        assert_eq!(cfg.prefix, "summarize: ");
        assert_eq!(cfg.max_length, 200);
        assert_eq!(cfg.min_length, 30);
        assert_eq!(cfg.num_beams, 4);
        assert!(cfg.early_stopping);
        assert_eq!(cfg.length_penalty, 2.0);
        assert_eq!(cfg.no_repeat_ngram_size, 3);
    }

    #[test]
    fn missing_block_uses_defaults() {
        let cfg = SummarizationConfig::from_model_config(r#"{"d_model": 512}"#).unwrap();
        assert_eq!(cfg, SummarizationConfig::default());
    }

    #[test]
    fn partial_block_keeps_remaining_defaults() {
        let json = r#"{"task_specific_params": {"summarization": {"num_beams": 2}}}"#;
        let cfg = SummarizationConfig::from_model_config(json).unwrap();
        assert_eq!(cfg.num_beams, 2);
        assert_eq!(cfg.prefix, "summarize: ");
        assert_eq!(cfg.max_length, 150);
    }
}
