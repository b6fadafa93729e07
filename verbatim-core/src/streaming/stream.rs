//! The stream controller.
//!
//! ## Data flow (per `feed` call)
//!
//! ```text
//! raw i16 samples → AudioWindowBuffer → gated windows
//!       → FeatureExtractor::extract → feature vectors
//!       → FeatureContextBuffer → timesteps
//!       → BatchBuffer → full batches
//!       → AcousticModel::infer → logits → accumulator
//! ```
//!
//! Everything is synchronous call-and-return: `feed` returns only after all
//! cascading downstream work — zero or more inference calls — has
//! completed. The `&mut Recognizer` borrow makes a second concurrent
//! stream against the same model instance a compile error.

use tracing::{debug, info};

use crate::config::ModelConfig;
use crate::error::{Result, VerbatimError};
use crate::recognizer::Recognizer;
use crate::streaming::{AudioWindowBuffer, Batch, BatchBuffer, FeatureContextBuffer};

/// One live recognition stream.
///
/// Created by [`Recognizer::create_stream`]; consumed by [`Stream::finish`]
/// or [`Stream::discard`] (or a plain drop).
pub struct Stream<'m> {
    recognizer: &'m mut Recognizer,
    config: ModelConfig,
    audio: AudioWindowBuffer,
    context: FeatureContextBuffer,
    batch: BatchBuffer,
    /// Flat `frame_count × class_count` logits, in inference-call order.
    accumulated_logits: Vec<f32>,
}

impl<'m> Stream<'m> {
    pub(crate) fn new(recognizer: &'m mut Recognizer, prealloc_frames: usize) -> Self {
        let config = recognizer.model.config().clone();
        Self {
            audio: AudioWindowBuffer::new(config.window_len, config.hop_len),
            context: FeatureContextBuffer::new(config.feature_width, config.context),
            batch: BatchBuffer::new(config.batch_size, config.timestep_width()),
            accumulated_logits: Vec::with_capacity(prealloc_frames * config.class_count),
            config,
            recognizer,
        }
    }

    /// Feed raw samples into the pipeline.
    ///
    /// Output is identical no matter how the same sample sequence is split
    /// across calls.
    ///
    /// # Errors
    /// Only a failing inference call can fail here; buffer arithmetic never
    /// does. On error the triggering batch is lost but the stream stays
    /// consistent and may continue to be fed.
    pub fn feed(&mut self, samples: &[i16]) -> Result<()> {
        for window in self.audio.feed(samples) {
            self.process_feature_window(&window)?;
        }
        Ok(())
    }

    /// Decode the logits accumulated so far without touching any buffer
    /// state. Repeatable; an empty accumulator yields an empty transcript.
    pub fn intermediate_decode(&self) -> Result<String> {
        self.recognizer.decode_logits(&self.accumulated_logits)
    }

    /// Flush all three buffers, run any final ragged batch, decode, and
    /// release the stream.
    ///
    /// Flushing means: process the partial audio window through the same
    /// gated emission, push `C` zero feature frames so every real frame has
    /// been the center of some timestep, then submit what remains in the
    /// batch buffer with its true (unpadded) frame count.
    pub fn finish(mut self) -> Result<String> {
        if let Some(window) = self.audio.flush() {
            self.process_feature_window(&window)?;
        }
        for _ in 0..self.config.context {
            if let Some(timestep) = self.context.push_zero() {
                self.process_timestep(timestep)?;
            }
        }
        if let Some(batch) = self.batch.flush() {
            self.run_inference(batch)?;
        }

        info!(
            frames = self.accumulated_logits.len() / self.config.class_count,
            "stream finished, decoding"
        );
        self.recognizer.decode_logits(&self.accumulated_logits)
    }

    /// Release the stream without decoding. Immediate and unconditional —
    /// no partial result is salvaged.
    pub fn discard(self) {}

    /// Logit frames accumulated so far.
    pub fn accumulated_frames(&self) -> usize {
        self.accumulated_logits.len() / self.config.class_count
    }

    /// Raw view of the accumulator, frame-major.
    pub fn accumulated_logits(&self) -> &[f32] {
        &self.accumulated_logits
    }

    fn process_feature_window(&mut self, window: &[f32]) -> Result<()> {
        let frame = self.recognizer.extractor.extract(window);
        debug_assert_eq!(frame.len(), self.config.feature_width);
        if let Some(timestep) = self.context.push(frame) {
            self.process_timestep(timestep)?;
        }
        Ok(())
    }

    fn process_timestep(&mut self, timestep: Vec<f32>) -> Result<()> {
        if let Some(batch) = self.batch.push(timestep) {
            self.run_inference(batch)?;
        }
        Ok(())
    }

    fn run_inference(&mut self, batch: Batch) -> Result<()> {
        debug!(frames = batch.frame_count, "dispatching batch");
        let logits = self
            .recognizer
            .model
            .infer(&batch.features, batch.frame_count)?;

        let expected = batch.frame_count * self.config.class_count;
        if logits.len() != expected {
            return Err(VerbatimError::Inference(format!(
                "model returned {} logits for {} frames, expected {}",
                logits.len(),
                batch.frame_count,
                expected
            )));
        }

        self.accumulated_logits.extend_from_slice(&logits);
        Ok(())
    }
}
