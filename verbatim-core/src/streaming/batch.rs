//! Timestep batching for inference dispatch.

/// One inference call's worth of input: `frame_count` flattened timesteps.
///
/// A full batch carries `batch_size` timesteps; the final batch of a stream
/// may carry fewer. The acoustic model zero-pads internally and reports
/// exactly `frame_count` output frames either way.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    pub features: Vec<f32>,
    pub frame_count: usize,
}

/// Accumulates timesteps until a full batch is ready.
pub struct BatchBuffer {
    batch_size: usize,
    timestep_width: usize,
    features: Vec<f32>,
    frame_count: usize,
}

impl BatchBuffer {
    pub fn new(batch_size: usize, timestep_width: usize) -> Self {
        Self {
            batch_size,
            timestep_width,
            features: Vec::with_capacity(batch_size * timestep_width),
            frame_count: 0,
        }
    }

    /// Append one timestep; returns the completed batch when the
    /// `batch_size`-th timestep arrives, leaving the buffer empty.
    pub fn push(&mut self, timestep: Vec<f32>) -> Option<Batch> {
        debug_assert_eq!(timestep.len(), self.timestep_width);
        self.features.extend_from_slice(&timestep);
        self.frame_count += 1;

        if self.frame_count == self.batch_size {
            Some(self.take())
        } else {
            None
        }
    }

    /// Drain any partial batch (1..batch_size timesteps) at stream end.
    pub fn flush(&mut self) -> Option<Batch> {
        if self.frame_count == 0 {
            None
        } else {
            Some(self.take())
        }
    }

    /// Timesteps currently buffered.
    pub fn buffered(&self) -> usize {
        self.frame_count
    }

    fn take(&mut self) -> Batch {
        let features = std::mem::replace(
            &mut self.features,
            Vec::with_capacity(self.batch_size * self.timestep_width),
        );
        Batch {
            features,
            frame_count: std::mem::replace(&mut self.frame_count, 0),
        }
    }
}
