//! `Recognizer` — owns the collaborators and creates streams.
//!
//! ## Lifecycle
//!
//! ```text
//! Recognizer::new(model, extractor, decoder, beam)   → config validated
//!     └─► create_stream()       → model state reset, buffers seeded
//!         └─► feed(..) *        → cascading buffer work, inference
//!         └─► intermediate_decode()  → best-guess transcript so far
//!         └─► finish()          → flush + final decode, stream consumed
//! ```
//!
//! A `Stream` holds `&mut Recognizer`, so the borrow checker rejects a
//! second active stream against the same model instance — the resource
//! rule from the model's recurrent state, enforced at compile time instead
//! of documented-and-hoped-for.

use std::fmt;

use ndarray::Array2;
use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::decode::{BeamParams, LabelDecoder, Scorer};
use crate::error::{Result, VerbatimError};
use crate::features::FeatureExtractor;
use crate::inference::AcousticModel;
use crate::streaming::Stream;

/// Default accumulator reservation: 150 logit frames ≈ 3 s of audio.
pub const DEFAULT_PREALLOC_FRAMES: usize = 150;

/// Top-level recognition engine.
pub struct Recognizer {
    pub(crate) model: Box<dyn AcousticModel>,
    pub(crate) extractor: Box<dyn FeatureExtractor>,
    pub(crate) decoder: Box<dyn LabelDecoder>,
    pub(crate) scorer: Option<Box<dyn Scorer>>,
    pub(crate) beam: BeamParams,
}

// The collaborators are unnamed trait objects; show the config instead.
impl fmt::Debug for Recognizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recognizer")
            .field("config", self.model.config())
            .field("scorer", &self.scorer.is_some())
            .field("beam", &self.beam)
            .finish_non_exhaustive()
    }
}

impl Recognizer {
    /// Assemble a recognizer from its collaborators.
    ///
    /// # Errors
    /// `InvalidConfig` if the model's configuration fails validation, or
    /// `FeatureWidthMismatch` if the extractor and model disagree on the
    /// feature vector width. Both are fatal — no stream can ever be
    /// created from an invalid setup.
    pub fn new(
        model: Box<dyn AcousticModel>,
        extractor: Box<dyn FeatureExtractor>,
        decoder: Box<dyn LabelDecoder>,
        beam: BeamParams,
    ) -> Result<Self> {
        let config = model.config();
        config.validate()?;
        if extractor.feature_width() != config.feature_width {
            return Err(VerbatimError::FeatureWidthMismatch {
                extractor: extractor.feature_width(),
                model: config.feature_width,
            });
        }

        info!(
            sample_rate = config.sample_rate,
            window_len = config.window_len,
            hop_len = config.hop_len,
            context = config.context,
            batch_size = config.batch_size,
            "recognizer configured"
        );

        Ok(Self {
            model,
            extractor,
            decoder,
            scorer: None,
            beam,
        })
    }

    /// Attach (or detach, with `None`) an external language-model scorer.
    /// Takes effect on the next decode.
    pub fn set_scorer(&mut self, scorer: Option<Box<dyn Scorer>>) {
        self.scorer = scorer;
    }

    /// The acoustic model's configuration.
    pub fn config(&self) -> &ModelConfig {
        self.model.config()
    }

    /// Open a stream with the default accumulator reservation.
    pub fn create_stream(&mut self) -> Result<Stream<'_>> {
        self.create_stream_with_capacity(DEFAULT_PREALLOC_FRAMES)
    }

    /// Open a stream, reserving accumulator space for `prealloc_frames`
    /// logit frames (`0` selects the default). Resets the model's
    /// recurrent state first.
    ///
    /// # Errors
    /// Propagates a failed model state reset; no stream is created.
    pub fn create_stream_with_capacity(&mut self, prealloc_frames: usize) -> Result<Stream<'_>> {
        self.model.reset_state()?;
        let prealloc = if prealloc_frames == 0 {
            DEFAULT_PREALLOC_FRAMES
        } else {
            prealloc_frames
        };
        debug!(prealloc_frames = prealloc, "stream created");
        Ok(Stream::new(self, prealloc))
    }

    /// One-shot convenience: create a stream, feed one audio block, finish.
    pub fn transcribe(&mut self, samples: &[i16]) -> Result<String> {
        let mut stream = self.create_stream()?;
        stream.feed(samples)?;
        stream.finish()
    }

    /// Reshape a flat logit buffer into score vectors and decode the best
    /// candidate.
    pub(crate) fn decode_logits(&self, logits: &[f32]) -> Result<String> {
        if logits.is_empty() {
            return Ok(String::new());
        }

        let class_count = self.model.config().class_count;
        if logits.len() % class_count != 0 {
            return Err(VerbatimError::MalformedLogits {
                len: logits.len(),
                class_count,
            });
        }
        let frame_count = logits.len() / class_count;
        let frames = Array2::from_shape_vec((frame_count, class_count), logits.to_vec())
            .map_err(|e| VerbatimError::Other(e.into()))?;

        let candidates = self
            .decoder
            .decode(frames.view(), &self.beam, self.scorer.as_deref());
        debug!(frame_count, candidates = candidates.len(), "decoded");

        candidates
            .into_iter()
            .next()
            .map(|c| c.transcript)
            .ok_or(VerbatimError::EmptyDecode {
                frames: frame_count,
            })
    }
}
