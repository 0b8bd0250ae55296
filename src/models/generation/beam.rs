//! Beam search over an autoregressive decoder.
//!
//! The search is model-agnostic: callers supply a closure mapping a token
//! prefix to log-probabilities over the vocabulary for the next token.

use super::params::BeamSearchConfig;
use crate::core::{PipelineError, Result};

/// A partial or finished output sequence with its summed log-probability.
#[derive(Debug, Clone, PartialEq)]
pub struct BeamHypothesis {
    pub tokens: Vec<u32>,
    pub score: f64,
    pub finished: bool,
}

impl BeamHypothesis {
    pub fn new(tokens: Vec<u32>, score: f64) -> Self {
        Self {
            tokens,
            score,
            finished: false,
        }
    }

    pub fn extend(&self, token: u32, log_prob: f64, is_eos: bool) -> Self {
        let mut tokens = Vec::with_capacity(self.tokens.len() + 1);
        tokens.extend_from_slice(&self.tokens);
        tokens.push(token);
        Self {
            tokens,
            score: self.score + log_prob,
            finished: is_eos,
        }
    }

    /// `score / len^length_penalty`.
    pub fn normalized_score(&self, length_penalty: f64) -> f64 {
        let len = self.tokens.len().max(1) as f64;
        self.score / len.powf(length_penalty)
    }
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    score: f64,
    log_prob: f64,
    beam: usize,
    token: u32,
}

/// Best first; equal scores fall back to beam then token order.
fn rank(candidates: &mut Vec<Candidate>, keep: usize) {
    candidates.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.beam.cmp(&b.beam))
            .then(a.token.cmp(&b.token))
    });
    candidates.truncate(keep);
}

/// Tokens that would complete an n-gram of size `n` already present in `tokens`.
pub fn banned_ngram_tokens(tokens: &[u32], n: usize) -> Vec<u32> {
    if n == 0 || tokens.len() + 1 < n {
        return Vec::new();
    }
    let prefix = &tokens[tokens.len() + 1 - n..];
    tokens
        .windows(n)
        .filter(|window| &window[..n - 1] == prefix)
        .map(|window| window[n - 1])
        .collect()
}

/// Live and finished hypotheses of one beam search.
#[derive(Debug, Clone)]
pub struct BeamSearchState {
    config: BeamSearchConfig,
    /// Live hypotheses, best first.
    pub hypotheses: Vec<BeamHypothesis>,
    /// At most `num_beams` finished hypotheses, best normalized score first.
    pub finished: Vec<BeamHypothesis>,
}

impl BeamSearchState {
    pub fn new(config: BeamSearchConfig, prefix: Vec<u32>) -> Self {
        Self {
            config,
            hypotheses: vec![BeamHypothesis::new(prefix, 0.0)],
            finished: Vec::new(),
        }
    }

    fn add_finished(&mut self, hypothesis: BeamHypothesis) {
        let lp = self.config.length_penalty;
        self.finished.push(hypothesis);
        self.finished
            .sort_by(|a, b| b.normalized_score(lp).total_cmp(&a.normalized_score(lp)));
        self.finished.truncate(self.config.num_beams);
    }

    /// Advance every live hypothesis by one token.
    ///
    /// `log_probs[i]` holds next-token log-probabilities for `hypotheses[i]`.
    pub fn step(&mut self, log_probs: &[Vec<f32>], eos_token_id: u32) -> Result<()> {
        if log_probs.len() != self.hypotheses.len() {
            return Err(PipelineError::Unexpected(format!(
                "expected log-probabilities for {} hypotheses, got {}",
                self.hypotheses.len(),
                log_probs.len()
            )));
        }

        let num_beams = self.config.num_beams;
        let keep = 2 * num_beams;

        let mut candidates = Vec::with_capacity(keep * self.hypotheses.len());
        for (beam, (hyp, row)) in self.hypotheses.iter().zip(log_probs).enumerate() {
            let banned = banned_ngram_tokens(&hyp.tokens, self.config.no_repeat_ngram_size);
            let eos_allowed = hyp.tokens.len() >= self.config.min_length;

            let mut beam_candidates: Vec<Candidate> = row
                .iter()
                .enumerate()
                .filter_map(|(token, &lp)| {
                    let token = token as u32;
                    let blocked = (token == eos_token_id && !eos_allowed) || banned.contains(&token);
                    (!blocked && lp.is_finite()).then(|| Candidate {
                        score: hyp.score + lp as f64,
                        log_prob: lp as f64,
                        beam,
                        token,
                    })
                })
                .collect();
            rank(&mut beam_candidates, keep);
            candidates.extend(beam_candidates);
        }
        rank(&mut candidates, keep);

        let mut next = Vec::with_capacity(num_beams);
        for (position, cand) in candidates.iter().enumerate() {
            let parent = &self.hypotheses[cand.beam];
            if cand.token == eos_token_id {
                // EOS ranked outside the top beams would crowd out live ones.
                if position < num_beams {
                    let done = parent.extend(cand.token, cand.log_prob, true);
                    self.add_finished(done);
                }
            } else {
                next.push(parent.extend(cand.token, cand.log_prob, false));
            }
            if next.len() == num_beams {
                break;
            }
        }

        self.hypotheses = next;
        Ok(())
    }

    /// Whether the live hypotheses have reached `max_length`.
    pub fn at_max_length(&self) -> bool {
        self.hypotheses
            .first()
            .map_or(true, |h| h.tokens.len() >= self.config.max_length)
    }

    pub fn should_stop(&self) -> bool {
        if self.hypotheses.is_empty() {
            return true;
        }
        if self.finished.len() < self.config.num_beams {
            return false;
        }
        if self.config.early_stopping {
            return true;
        }

        let lp = self.config.length_penalty;
        let best_live = &self.hypotheses[0];
        let best_attainable = best_live.normalized_score(lp);
        let worst_finished = self
            .finished
            .iter()
            .map(|h| h.normalized_score(lp))
            .fold(f64::INFINITY, f64::min);
        worst_finished >= best_attainable
    }

    /// Finalize the search and return the best hypothesis.
    ///
    /// Live hypotheses only compete with finished ones when the search was
    /// cut off before it was done, or when nothing finished at all.
    pub fn into_best(mut self) -> Option<BeamHypothesis> {
        if !self.should_stop() || self.finished.is_empty() {
            let live = std::mem::take(&mut self.hypotheses);
            for hyp in live {
                self.add_finished(hyp);
            }
        }
        self.finished.into_iter().next()
    }
}

/// Run beam search from `prefix` until every beam is done or `max_length` is hit.
///
/// `next_log_probs` receives a full hypothesis (prefix included) and returns
/// log-probabilities over the vocabulary for the following token. The
/// returned tokens include the prefix and, if generated, the final EOS.
pub fn beam_search<F>(
    config: &BeamSearchConfig,
    prefix: Vec<u32>,
    eos_token_id: u32,
    mut next_log_probs: F,
) -> Result<Vec<u32>>
where
    F: FnMut(&[u32]) -> Result<Vec<f32>>,
{
    config.validate()?;

    let mut state = BeamSearchState::new(config.clone(), prefix);
    let mut steps = 0usize;
    while !state.should_stop() && !state.at_max_length() {
        let log_probs = state
            .hypotheses
            .iter()
            .map(|h| next_log_probs(&h.tokens))
            .collect::<Result<Vec<_>>>()?;
        state.step(&log_probs, eos_token_id)?;
        steps += 1;
    }

    tracing::trace!(steps, finished = state.finished.len(), "beam search finished");

    state
        .into_best()
        .map(|h| h.tokens)
        .ok_or_else(|| PipelineError::Unexpected("beam search produced no hypothesis".into()))
}
