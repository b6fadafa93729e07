//! # verbatim-core
//!
//! Streaming speech-to-text pipeline core.
//!
//! ## Architecture
//!
//! ```text
//! raw i16 samples → AudioWindowBuffer → feature vectors
//!                        │ (preemphasis + half-rate emit gate)
//!                  FeatureContextBuffer → timesteps (center + 2C context)
//!                        │
//!                  BatchBuffer → AcousticModel::infer → logits
//!                        │
//!                  accumulator → LabelDecoder → text
//! ```
//!
//! The buffers hold only the minimum data for the next step and are fed
//! eagerly as audio arrives, so output is identical whether a recording is
//! fed in one call or split across many (chunk-boundary independence).
//! Everything is single-threaded and call-and-return; a `Stream`'s `&mut`
//! borrow of its `Recognizer` rules out concurrent streams against one
//! model instance.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod config;
pub mod decode;
pub mod error;
pub mod features;
pub mod inference;
pub mod recognizer;
pub mod streaming;

// Convenience re-exports for downstream crates
pub use config::ModelConfig;
pub use decode::{BeamParams, DecodeCandidate, GreedyDecoder, LabelDecoder, Scorer};
pub use error::VerbatimError;
pub use features::{audio_to_input_vector, FeatureExtractor, MfccExtractor};
pub use inference::{AcousticModel, StubAcousticModel};
pub use recognizer::{Recognizer, DEFAULT_PREALLOC_FRAMES};
pub use streaming::Stream;
