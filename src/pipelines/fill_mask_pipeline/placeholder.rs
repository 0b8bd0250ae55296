//! Resolution of sentences holding several mask placeholders.
//!
//! A [`MaskedSentence`] is split into text segments and placeholders once.
//! [`resolve_placeholders`] asks a [`MaskScorer`] for one distribution per
//! placeholder, always against the original masked text, takes the arg-max of
//! each, and only then substitutes the chosen words back in order.

use crate::core::{PipelineError, Result};

/// Marker used by BERT-family tokenizers for a masked position.
pub const DEFAULT_MASK_TOKEN: &str = "[MASK]";

/// One piece of a [`MaskedSentence`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Text(String),
    Placeholder,
}

/// A sentence split around its placeholder markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaskedSentence {
    segments: Vec<Segment>,
    marker: String,
}

impl MaskedSentence {
    /// Parse `text` using the default `[MASK]` marker.
    pub fn new(text: &str) -> Self {
        Self::split(text, DEFAULT_MASK_TOKEN)
    }

    /// Parse `text`, treating every occurrence of `marker` as a placeholder.
    pub fn parse(text: &str, marker: &str) -> Result<Self> {
        if marker.is_empty() {
            return Err(PipelineError::InvalidParams(
                "placeholder marker must not be empty".into(),
            ));
        }
        Ok(Self::split(text, marker))
    }

    fn split(text: &str, marker: &str) -> Self {
        let mut segments = Vec::new();
        for (i, part) in text.split(marker).enumerate() {
            if i > 0 {
                segments.push(Segment::Placeholder);
            }
            if !part.is_empty() {
                segments.push(Segment::Text(part.to_string()));
            }
        }
        Self {
            segments,
            marker: marker.to_string(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn placeholder_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Placeholder))
            .count()
    }

    /// The sentence with every placeholder written as its marker.
    pub fn masked_text(&self) -> String {
        self.render(|_| self.marker.as_str())
    }

    /// Substitute `replacements` into the placeholders, left to right.
    ///
    /// Fails with [`PipelineError::PlaceholderMismatch`] unless there is exactly
    /// one replacement per placeholder.
    pub fn substitute<S: AsRef<str>>(&self, replacements: &[S]) -> Result<String> {
        let placeholders = self.placeholder_count();
        if placeholders != replacements.len() {
            return Err(PipelineError::PlaceholderMismatch {
                placeholders,
                replacements: replacements.len(),
            });
        }
        Ok(self.render(|i| replacements[i].as_ref()))
    }

    fn render<'a>(&'a self, mut fill: impl FnMut(usize) -> &'a str) -> String {
        let mut out = String::new();
        let mut next = 0;
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Placeholder => {
                    out.push_str(fill(next));
                    next += 1;
                }
            }
        }
        out
    }
}

impl std::fmt::Display for MaskedSentence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.masked_text())
    }
}

/// Scores over the vocabulary for a single masked position, indexed by token id.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenDistribution {
    scores: Vec<f32>,
}

impl TokenDistribution {
    pub fn new(scores: Vec<f32>) -> Self {
        Self { scores }
    }

    pub fn scores(&self) -> &[f32] {
        &self.scores
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// Highest-scoring `(token_id, score)`. Ties go to the lowest token id.
    pub fn argmax(&self) -> Option<(u32, f32)> {
        self.top_k(1).into_iter().next()
    }

    /// The `k` highest-scoring entries, best first. Ties keep token-id order.
    pub fn top_k(&self, k: usize) -> Vec<(u32, f32)> {
        let mut ranked: Vec<(u32, f32)> = self
            .scores
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_nan())
            .map(|(id, &s)| (id as u32, s))
            .collect();
        // Stable sort keeps the lower id first among equal scores.
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked.truncate(k);
        ranked
    }
}

/// One chosen replacement for a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Prediction {
    /// Decoded word/token, trimmed of surrounding whitespace.
    pub token: String,
    pub token_id: u32,
    pub score: f32,
}

/// Result of resolving every placeholder in a sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSentence {
    pub text: String,
    /// One prediction per placeholder, in placeholder order.
    pub predictions: Vec<Prediction>,
}

/// Anything able to score the vocabulary at a placeholder of a masked text.
pub trait MaskScorer {
    /// Distribution for placeholder number `occurrence` (0-based, left to right)
    /// of `masked_text`.
    fn score_placeholder(&self, masked_text: &str, occurrence: usize) -> Result<TokenDistribution>;

    /// Surface text of a vocabulary entry.
    fn token_text(&self, token_id: u32) -> Result<String>;
}

impl<S: MaskScorer + ?Sized> MaskScorer for &S {
    fn score_placeholder(&self, masked_text: &str, occurrence: usize) -> Result<TokenDistribution> {
        (**self).score_placeholder(masked_text, occurrence)
    }

    fn token_text(&self, token_id: u32) -> Result<String> {
        (**self).token_text(token_id)
    }
}

/// Replace every placeholder in `sentence` with the scorer's arg-max choice.
///
/// The scorer is called once per placeholder, each time with the original
/// masked text, so no prediction sees an earlier substitution.
pub fn resolve_placeholders<S: MaskScorer + ?Sized>(
    scorer: &S,
    sentence: &MaskedSentence,
) -> Result<ResolvedSentence> {
    let masked_text = sentence.masked_text();
    let count = sentence.placeholder_count();

    let mut predictions = Vec::with_capacity(count);
    for occurrence in 0..count {
        let distribution = scorer.score_placeholder(&masked_text, occurrence)?;
        let (token_id, score) = distribution
            .argmax()
            .ok_or(PipelineError::EmptyDistribution)?;
        let token = scorer.token_text(token_id)?.trim().to_string();
        tracing::debug!(occurrence, token_id, %token, score, "resolved placeholder");
        predictions.push(Prediction {
            token,
            token_id,
            score,
        });
    }

    let words: Vec<&str> = predictions.iter().map(|p| p.token.as_str()).collect();
    let text = sentence.substitute(&words)?;

    Ok(ResolvedSentence { text, predictions })
}
