use crate::core::{PipelineError, Result, SummarizationConfig};

/// Beam search settings.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamSearchConfig {
    pub num_beams: usize,
    /// Upper bound on hypothesis length, counting the decoder prefix.
    pub max_length: usize,
    /// End-of-sequence is forbidden while a hypothesis is shorter than this.
    pub min_length: usize,
    /// Exponent applied to the length when ranking finished hypotheses.
    pub length_penalty: f64,
    /// Stop as soon as `num_beams` hypotheses are finished.
    pub early_stopping: bool,
    /// 0 disables n-gram blocking.
    pub no_repeat_ngram_size: usize,
}

impl Default for BeamSearchConfig {
    fn default() -> Self {
        Self {
            num_beams: 4,
            max_length: 20,
            min_length: 0,
            length_penalty: 1.0,
            early_stopping: true,
            no_repeat_ngram_size: 0,
        }
    }
}

impl BeamSearchConfig {
    pub fn new(num_beams: usize) -> Self {
        Self {
            num_beams,
            ..Default::default()
        }
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    pub fn with_min_length(mut self, min_length: usize) -> Self {
        self.min_length = min_length;
        self
    }

    pub fn with_length_penalty(mut self, length_penalty: f64) -> Self {
        self.length_penalty = length_penalty;
        self
    }

    pub fn with_early_stopping(mut self, early_stopping: bool) -> Self {
        self.early_stopping = early_stopping;
        self
    }

    pub fn with_no_repeat_ngram_size(mut self, size: usize) -> Self {
        self.no_repeat_ngram_size = size;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_beams == 0 {
            return Err(PipelineError::InvalidParams("num_beams must be at least 1".into()));
        }
        if self.max_length == 0 {
            return Err(PipelineError::InvalidParams("max_length must be at least 1".into()));
        }
        if self.min_length > self.max_length {
            return Err(PipelineError::InvalidParams(format!(
                "min_length ({}) exceeds max_length ({})",
                self.min_length, self.max_length
            )));
        }
        if !self.length_penalty.is_finite() {
            return Err(PipelineError::InvalidParams("length_penalty must be finite".into()));
        }
        Ok(())
    }
}

impl From<&SummarizationConfig> for BeamSearchConfig {
    fn from(cfg: &SummarizationConfig) -> Self {
        Self {
            num_beams: cfg.num_beams,
            max_length: cfg.max_length,
            min_length: cfg.min_length,
            length_penalty: cfg.length_penalty,
            early_stopping: cfg.early_stopping,
            no_repeat_ngram_size: cfg.no_repeat_ngram_size,
        }
    }
}
