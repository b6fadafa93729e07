//! `StubAcousticModel` — deterministic placeholder backend.
//!
//! Produces logits as a pure function of each timestep's content, so any
//! two runs over identically batched input yield identical output. Used by
//! the pipeline tests and the demo bin; real backends live behind the same
//! trait.

use tracing::debug;

use crate::config::ModelConfig;
use crate::error::{Result, VerbatimError};
use crate::inference::AcousticModel;

/// One-hot stub model: each timestep votes for a class derived from the sum
/// of its features.
pub struct StubAcousticModel {
    config: ModelConfig,
    /// Number of `reset_state` calls, for tests.
    pub reset_count: usize,
    /// Frame counts of every `infer` call, in order, for tests.
    pub inferred_frame_counts: Vec<usize>,
}

impl StubAcousticModel {
    pub fn new(config: ModelConfig) -> Self {
        Self {
            config,
            reset_count: 0,
            inferred_frame_counts: Vec::new(),
        }
    }
}

impl AcousticModel for StubAcousticModel {
    fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn reset_state(&mut self) -> Result<()> {
        self.reset_count += 1;
        debug!("StubAcousticModel::reset_state");
        Ok(())
    }

    fn infer(&mut self, features: &[f32], frame_count: usize) -> Result<Vec<f32>> {
        let width = self.config.timestep_width();
        if features.len() != frame_count * width {
            return Err(VerbatimError::Inference(format!(
                "expected {} floats for {} frames, got {}",
                frame_count * width,
                frame_count,
                features.len()
            )));
        }

        self.inferred_frame_counts.push(frame_count);

        let classes = self.config.class_count;
        let mut logits = Vec::with_capacity(frame_count * classes);
        for timestep in features.chunks_exact(width) {
            let sum: f32 = timestep.iter().sum();
            let hot = (sum.abs() * 16.0) as usize % classes;
            for c in 0..classes {
                logits.push(if c == hot { 1.0 } else { 0.0 });
            }
        }
        Ok(logits)
    }
}
