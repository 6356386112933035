// Purpose - external interfaces: audio buffers and note events

pub mod converter;
pub mod midi;

/// Planar multi-channel sample buffer.
///
/// Storage is allocated once in `new`; every other method works in place, so
/// buffers can be reused inside the audio callback.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    buffers: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            buffers: vec![vec![0.0; num_samples]; num_channels],
            num_samples,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.buffers.len()
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    pub fn channel(&self, channel: usize) -> &[f32] {
        &self.buffers[channel]
    }

    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        &mut self.buffers[channel]
    }

    pub fn clear(&mut self) {
        for buffer in &mut self.buffers {
            buffer.fill(0.0);
        }
    }

    /// Zero `len` samples from `start` on every channel. Out-of-range parts
    /// of the region are ignored.
    pub fn clear_range(&mut self, start: usize, len: usize) {
        let start = start.min(self.num_samples);
        let end = start.saturating_add(len).min(self.num_samples);
        for buffer in &mut self.buffers {
            buffer[start..end].fill(0.0);
        }
    }

    /// Add `source` into `channel` starting at `start`.
    pub fn add_from(&mut self, channel: usize, start: usize, source: &[f32]) {
        let Some(buffer) = self.buffers.get_mut(channel) else {
            return;
        };
        let start = start.min(buffer.len());
        for (o, s) in buffer[start..].iter_mut().zip(source) {
            *o += *s;
        }
    }

    /// Multiply the first `len` samples of every channel by `gain`.
    pub fn apply_gain(&mut self, len: usize, gain: f32) {
        let len = len.min(self.num_samples);
        for buffer in &mut self.buffers {
            for sample in &mut buffer[..len] {
                *sample *= gain;
            }
        }
    }

    pub fn is_silent(&self) -> bool {
        self.buffers.iter().flatten().all(|s| *s == 0.0)
    }

    pub fn peak(&self) -> f32 {
        self.buffers
            .iter()
            .flatten()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    /// Write `frames` frames into an interleaved device buffer with
    /// `out_channels` channels. Extra device channels repeat the last
    /// buffer channel.
    pub fn write_interleaved(&self, out: &mut [f32], out_channels: usize, frames: usize) {
        if out_channels == 0 || self.buffers.is_empty() {
            out.fill(0.0);
            return;
        }

        let frames = frames.min(self.num_samples).min(out.len() / out_channels);
        let last = self.buffers.len() - 1;
        for (frame, chunk) in out.chunks_mut(out_channels).take(frames).enumerate() {
            for (ch, sample) in chunk.iter_mut().enumerate() {
                *sample = self.buffers[ch.min(last)][frame];
            }
        }
    }
}
