//! Acoustic model abstraction.
//!
//! The `AcousticModel` trait decouples the streaming pipeline from any
//! specific inference backend.
//!
//! `&mut self` on `infer` and `reset_state` intentionally expresses that
//! acoustic models are stateful — recurrent hidden state carries across
//! batches within one stream. The `Stream` controller holds an exclusive
//! `&mut` borrow of its `Recognizer` for exactly this reason: at most one
//! stream can feed a given model instance at a time, and the borrow checker
//! enforces it.

pub mod stub;

pub use stub::StubAcousticModel;

use crate::config::ModelConfig;
use crate::error::Result;

/// Contract for acoustic inference backends.
pub trait AcousticModel {
    /// Shape parameters of this model's input and output. Immutable for
    /// the lifetime of the model.
    fn config(&self) -> &ModelConfig;

    /// Reset internal recurrent state. Called exactly once per stream,
    /// before any inference.
    ///
    /// # Errors
    /// Returns an error if the backend cannot reinitialise its state; no
    /// stream is created in that case.
    fn reset_state(&mut self) -> Result<()>;

    /// Run one inference step over a batch of timesteps.
    ///
    /// # Parameters
    /// - `features`: `frame_count` flattened timesteps of
    ///   `config().timestep_width()` floats each.
    /// - `frame_count`: number of real timesteps, `1..=config().batch_size`.
    ///   Implementations zero-pad up to `batch_size` internally.
    ///
    /// # Returns
    /// Exactly `frame_count * config().class_count` logits, frame-major —
    /// padding frames produce no output.
    fn infer(&mut self, features: &[f32], frame_count: usize) -> Result<Vec<f32>>;
}
