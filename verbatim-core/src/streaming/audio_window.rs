//! Sliding raw-audio window with preemphasis and half-rate emit gating.
//!
//! ## Algorithm
//!
//! 1. Each incoming sample is preemphasis-filtered against the previous
//!    *raw* sample and appended to the window.
//! 2. When the window reaches `window_len`, the emit gate advances; if it
//!    lands on `Ready` the full window is handed out for feature
//!    extraction.
//! 3. The window then slides left by `hop_len`, gated or not.
//!
//! The gate fires on every second completed window, so feature vectors
//! appear at half the raw hop rate — the frame rate the acoustic model was
//! trained on.

use std::collections::VecDeque;

use crate::config::PREEMPHASIS_COEFF;

/// Two-state machine deciding whether a completed window is extracted.
///
/// Advances exactly once per completed window. Starts at `AwaitingEmit`, so
/// the first completion emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmitGate {
    /// Next completion will emit.
    AwaitingEmit,
    /// Just emitted; next completion is skipped.
    Ready,
}

impl EmitGate {
    /// Transition to the other state, returning `true` when the completion
    /// that caused the transition should emit.
    pub fn advance(&mut self) -> bool {
        *self = match *self {
            EmitGate::AwaitingEmit => EmitGate::Ready,
            EmitGate::Ready => EmitGate::AwaitingEmit,
        };
        *self == EmitGate::Ready
    }
}

/// Accumulates raw samples into fixed-length overlapping windows.
pub struct AudioWindowBuffer {
    window_len: usize,
    hop_len: usize,
    /// Preemphasis-filtered samples, at most `window_len` long.
    buf: VecDeque<f32>,
    /// Last raw sample seen, seeding the filter across `feed` boundaries.
    last_sample: f32,
    gate: EmitGate,
}

impl AudioWindowBuffer {
    pub fn new(window_len: usize, hop_len: usize) -> Self {
        debug_assert!(hop_len < window_len);
        Self {
            window_len,
            hop_len,
            buf: VecDeque::with_capacity(window_len),
            last_sample: 0.0,
            gate: EmitGate::AwaitingEmit,
        }
    }

    /// Consume raw samples, returning every gated window in completion
    /// order. Feeding the same sample sequence in any chunking produces the
    /// same windows.
    pub fn feed(&mut self, samples: &[i16]) -> Vec<Vec<f32>> {
        let mut windows = Vec::new();

        for &raw in samples {
            let filtered = raw as f32 - PREEMPHASIS_COEFF * self.last_sample;
            self.last_sample = raw as f32;
            self.buf.push_back(filtered);

            if self.buf.len() == self.window_len {
                if self.gate.advance() {
                    windows.push(self.buf.iter().copied().collect());
                }
                self.buf.drain(..self.hop_len);
            }
        }

        windows
    }

    /// Run the gated emission once over whatever remains, without sliding.
    /// The final window may be shorter than `window_len`; an empty buffer
    /// performs no work and leaves the gate untouched.
    pub fn flush(&mut self) -> Option<Vec<f32>> {
        if self.buf.is_empty() {
            return None;
        }
        if self.gate.advance() {
            Some(self.buf.iter().copied().collect())
        } else {
            None
        }
    }

    /// Samples currently buffered (always `< window_len` between calls).
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }
}
