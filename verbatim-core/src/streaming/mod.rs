//! The three-stage sliding-window buffering machine and its controller.
//!
//! `AudioWindowBuffer`, `FeatureContextBuffer` and `BatchBuffer` each hold
//! only the minimum data needed for the next step; `Stream` owns all three
//! plus the logit accumulator and drives the cascade.

pub mod audio_window;
pub mod batch;
pub mod context;
pub mod stream;

pub use audio_window::{AudioWindowBuffer, EmitGate};
pub use batch::{Batch, BatchBuffer};
pub use context::FeatureContextBuffer;
pub use stream::Stream;
