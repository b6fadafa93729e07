//! Model configuration and the window/stride/context arithmetic derived
//! from it.
//!
//! A `ModelConfig` is owned by the acoustic model (the model knows what it
//! was trained on) and read by the stream controller, which sizes its three
//! buffers from it. All derived quantities are functions of the config so
//! the arithmetic lives in exactly one place.

use serde::{Deserialize, Serialize};

use crate::error::{Result, VerbatimError};

/// First-order preemphasis coefficient applied to raw samples before
/// windowing.
pub const PREEMPHASIS_COEFF: f32 = 0.97;

/// Shape parameters of an acoustic model's input and output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Expected sample rate of the raw audio, in Hz.
    pub sample_rate: u32,
    /// Length of one raw-audio analysis window, in samples.
    pub window_len: usize,
    /// Raw-audio hop between successive windows, in samples.
    /// Must be strictly smaller than `window_len` (windows overlap).
    pub hop_len: usize,
    /// Width of one feature vector (e.g. number of cepstral coefficients).
    pub feature_width: usize,
    /// Context size `C`: feature frames included on each side of the
    /// center frame in a timestep.
    pub context: usize,
    /// Number of timesteps submitted to the model per inference call.
    pub batch_size: usize,
    /// Number of output classes per frame (labels + blank).
    pub class_count: usize,
}

impl ModelConfig {
    /// Feature frames per timestep: the center frame plus `C` on each side.
    pub fn frames_per_timestep(&self) -> usize {
        2 * self.context + 1
    }

    /// Flat width of one timestep in floats.
    pub fn timestep_width(&self) -> usize {
        self.feature_width * self.frames_per_timestep()
    }

    /// Check the window arithmetic this pipeline depends on.
    ///
    /// # Errors
    /// Returns `VerbatimError::InvalidConfig` describing the first violated
    /// constraint. Configuration errors are fatal at setup time — no stream
    /// is ever created against an invalid config.
    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(VerbatimError::InvalidConfig("sample_rate is zero".into()));
        }
        if self.window_len == 0 {
            return Err(VerbatimError::InvalidConfig("window_len is zero".into()));
        }
        if self.hop_len == 0 {
            return Err(VerbatimError::InvalidConfig("hop_len is zero".into()));
        }
        if self.hop_len >= self.window_len {
            return Err(VerbatimError::InvalidConfig(format!(
                "hop_len ({}) must be smaller than window_len ({})",
                self.hop_len, self.window_len
            )));
        }
        if self.feature_width == 0 {
            return Err(VerbatimError::InvalidConfig("feature_width is zero".into()));
        }
        if self.batch_size == 0 {
            return Err(VerbatimError::InvalidConfig("batch_size is zero".into()));
        }
        if self.class_count == 0 {
            return Err(VerbatimError::InvalidConfig("class_count is zero".into()));
        }
        Ok(())
    }
}

impl Default for ModelConfig {
    /// 16 kHz audio, 25 ms windows with a 10 ms hop, 26 cepstral
    /// coefficients, 9 frames of context, 16 timesteps per batch and a
    /// 29-class output (26 letters, space, apostrophe, blank).
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            window_len: 400,
            hop_len: 160,
            feature_width: 26,
            context: 9,
            batch_size: 16,
            class_count: 29,
        }
    }
}
