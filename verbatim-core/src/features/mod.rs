//! Acoustic feature extraction seam.
//!
//! The `FeatureExtractor` trait decouples the streaming pipeline from any
//! specific frontend. The built-in `MfccExtractor` covers the common case;
//! tests substitute cheap deterministic extractors.
//!
//! `&mut self` on `extract` intentionally allows implementations to reuse
//! scratch buffers across calls.

pub mod mfcc;

pub use mfcc::MfccExtractor;

use ndarray::Array2;

use crate::config::ModelConfig;
use crate::error::{Result, VerbatimError};
use crate::streaming::{AudioWindowBuffer, FeatureContextBuffer};

/// Contract for acoustic feature frontends.
pub trait FeatureExtractor {
    /// Width of the feature vector produced by `extract`.
    fn feature_width(&self) -> usize;

    /// Compute one feature vector from a preemphasized raw-audio window.
    ///
    /// `window` normally holds `window_len` samples, but the final window of
    /// a stream may be shorter — implementations must accept any non-empty
    /// length up to `window_len`.
    fn extract(&mut self, window: &[f32]) -> Vec<f32>;
}

/// Compute the full timestep matrix for a complete audio block.
///
/// Non-streaming counterpart of the stream pipeline: every row is one
/// timestep of `timestep_width` floats, ready to be batched. Runs the same
/// windowing, emit gating and context padding as a stream, so the two paths
/// cannot diverge.
///
/// # Errors
/// Configuration errors from `config.validate()`, or a
/// `FeatureWidthMismatch` if the extractor disagrees with the config.
pub fn audio_to_input_vector(
    samples: &[i16],
    extractor: &mut dyn FeatureExtractor,
    config: &ModelConfig,
) -> Result<Array2<f32>> {
    config.validate()?;
    if extractor.feature_width() != config.feature_width {
        return Err(VerbatimError::FeatureWidthMismatch {
            extractor: extractor.feature_width(),
            model: config.feature_width,
        });
    }

    let mut audio = AudioWindowBuffer::new(config.window_len, config.hop_len);
    let mut context = FeatureContextBuffer::new(config.feature_width, config.context);
    let mut rows: Vec<f32> = Vec::new();
    let mut row_count = 0usize;

    let mut push_frame = |frame: Vec<f32>, context: &mut FeatureContextBuffer| {
        if let Some(timestep) = context.push(frame) {
            rows.extend_from_slice(&timestep);
            row_count += 1;
        }
    };

    for window in audio.feed(samples) {
        push_frame(extractor.extract(&window), &mut context);
    }
    if let Some(window) = audio.flush() {
        push_frame(extractor.extract(&window), &mut context);
    }
    for _ in 0..config.context {
        if let Some(timestep) = context.push_zero() {
            rows.extend_from_slice(&timestep);
            row_count += 1;
        }
    }

    Array2::from_shape_vec((row_count, config.timestep_width()), rows)
        .map_err(|e| VerbatimError::Other(e.into()))
}
