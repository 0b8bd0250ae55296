//! Decoding strategies for sequence-to-sequence generation.

pub mod beam;
pub mod params;

pub use beam::{banned_ngram_tokens, beam_search, BeamHypothesis, BeamSearchState};
pub use params::BeamSearchConfig;
