//! Greedy CTC decoder.
//!
//! Argmax per frame, then CTC collapse: merge repeated classes, drop the
//! blank. No beam, no scorer — `BeamParams` and the optional `Scorer` are
//! accepted for trait compatibility and ignored.

use ndarray::ArrayView2;

use super::{BeamParams, DecodeCandidate, LabelDecoder, Scorer};

/// Best-path CTC decoder over a fixed label table.
pub struct GreedyDecoder {
    labels: Vec<String>,
    /// Class index of the CTC blank: one past the last label.
    blank: usize,
}

impl GreedyDecoder {
    /// Build a decoder for `labels.len() + 1` classes — one per label plus
    /// the trailing blank.
    pub fn new(labels: Vec<String>) -> Self {
        let blank = labels.len();
        Self { labels, blank }
    }

    /// Lowercase English alphabet, space and apostrophe (29 classes with
    /// the blank).
    pub fn english() -> Self {
        let mut labels: Vec<String> = ('a'..='z').map(String::from).collect();
        labels.push(" ".into());
        labels.push("'".into());
        Self::new(labels)
    }

    pub fn class_count(&self) -> usize {
        self.labels.len() + 1
    }
}

impl LabelDecoder for GreedyDecoder {
    fn decode(
        &self,
        frames: ArrayView2<'_, f32>,
        _params: &BeamParams,
        _scorer: Option<&dyn Scorer>,
    ) -> Vec<DecodeCandidate> {
        let mut transcript = String::new();
        let mut score = 0.0f32;
        let mut prev_class = self.blank;

        for frame in frames.rows() {
            let (best_class, best_score) = frame
                .iter()
                .copied()
                .enumerate()
                .fold((self.blank, f32::NEG_INFINITY), |acc, (c, s)| {
                    if s > acc.1 {
                        (c, s)
                    } else {
                        acc
                    }
                });
            score += best_score;
            // A wider model may emit classes past the label table; those
            // have no grapheme and collapse into the blank.
            let best_class = best_class.min(self.blank);

            if best_class != prev_class && best_class != self.blank {
                transcript.push_str(&self.labels[best_class]);
            }
            prev_class = best_class;
        }

        vec![DecodeCandidate { score, transcript }]
    }
}
