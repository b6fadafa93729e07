//! Feature-frame context assembly.
//!
//! Collects feature vectors until a full timestep — the center frame plus
//! `C` frames of context on each side — is available, then emits it and
//! slides by one frame. Consecutive timesteps therefore share `2C` of
//! their `2C+1` frames.
//!
//! The buffer is born with `C` zero frames: left padding so the very first
//! real frame becomes the center of the first emitted timestep. The stream
//! controller pushes `C` more zero frames at stream end so the last real
//! frame gets its turn in the center too.

use std::collections::VecDeque;

/// Accumulates feature vectors into overlapping timesteps.
pub struct FeatureContextBuffer {
    feature_width: usize,
    frames_per_timestep: usize,
    frames: VecDeque<Vec<f32>>,
}

impl FeatureContextBuffer {
    /// Create a buffer for `feature_width`-wide frames with `context`
    /// frames on each side of the center, pre-seeded with `context` zero
    /// frames.
    pub fn new(feature_width: usize, context: usize) -> Self {
        let frames_per_timestep = 2 * context + 1;
        let mut frames = VecDeque::with_capacity(frames_per_timestep);
        for _ in 0..context {
            frames.push_back(vec![0.0; feature_width]);
        }
        Self {
            feature_width,
            frames_per_timestep,
            frames,
        }
    }

    /// Append one feature vector. Returns the flattened timestep once
    /// `2C+1` frames are buffered, after sliding by one frame.
    pub fn push(&mut self, frame: Vec<f32>) -> Option<Vec<f32>> {
        debug_assert_eq!(frame.len(), self.feature_width);
        self.frames.push_back(frame);

        if self.frames.len() < self.frames_per_timestep {
            return None;
        }
        let timestep: Vec<f32> = self.frames.iter().flatten().copied().collect();
        self.frames.pop_front();
        Some(timestep)
    }

    /// Append one zero frame — right padding at stream end.
    pub fn push_zero(&mut self) -> Option<Vec<f32>> {
        let zero = vec![0.0; self.feature_width];
        self.push(zero)
    }

    /// Number of frames currently buffered.
    pub fn buffered_frames(&self) -> usize {
        self.frames.len()
    }

    #[cfg(test)]
    fn frame(&self, idx: usize) -> &[f32] {
        &self.frames[idx]
    }
}
