//! Label decoding seam.
//!
//! The `LabelDecoder` trait decouples the stream controller from the search
//! algorithm that turns per-frame class scores into text. A beam-search
//! decoder with an external language-model `Scorer` is the production
//! shape; the built-in `GreedyDecoder` is the dependency-free reference.

pub mod greedy;

pub use greedy::GreedyDecoder;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

/// External language-model scorer consulted by decoder implementations to
/// re-rank candidate label sequences. Higher scores are better.
pub trait Scorer {
    fn score(&self, labels: &[usize]) -> f32;
}

/// Beam-search shaping parameters, passed through to the decoder on every
/// decode call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BeamParams {
    /// Number of beams kept alive during the search.
    pub beam_width: usize,
    /// Per-frame pruning: only the `cutoff_top_n` most probable classes
    /// are expanded.
    pub cutoff_top_n: usize,
    /// Per-frame pruning: classes beyond this cumulative probability mass
    /// are dropped.
    pub cutoff_prob: f32,
}

impl Default for BeamParams {
    fn default() -> Self {
        Self {
            beam_width: 500,
            cutoff_top_n: 40,
            cutoff_prob: 1.0,
        }
    }
}

/// One ranked decoding hypothesis.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeCandidate {
    /// Search score of this hypothesis; higher is better.
    pub score: f32,
    /// Rendered text.
    pub transcript: String,
}

/// Contract for label decoders.
pub trait LabelDecoder {
    /// Decode a `frame_count × class_count` score matrix into ranked
    /// candidates, best first.
    ///
    /// Implementations must return at least one candidate for any
    /// non-empty input; the controller treats an empty result as a decode
    /// failure.
    fn decode(
        &self,
        frames: ArrayView2<'_, f32>,
        params: &BeamParams,
        scorer: Option<&dyn Scorer>,
    ) -> Vec<DecodeCandidate>;
}
