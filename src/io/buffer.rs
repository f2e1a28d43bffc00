/// Planar multi-channel sample buffer.
///
/// Every channel holds the same number of frames. Storage is allocated once in
/// [`AudioBuffer::new`]; afterwards the frame count can only shrink or grow
/// back within that capacity, so nothing on the render path allocates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    num_samples: usize,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
            num_samples,
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Frames allocated per channel.
    pub fn capacity(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    /// Change the active frame count, clamped to the capacity.
    pub fn set_num_samples(&mut self, num_samples: usize) {
        self.num_samples = num_samples.min(self.capacity());
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.num_samples]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        let n = self.num_samples;
        &mut self.channels[index][..n]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        let n = self.num_samples;
        self.channels.iter().map(move |c| &c[..n])
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let n = self.num_samples;
        self.channels.iter_mut().map(move |c| &mut c[..n])
    }

    /// Silence every channel.
    pub fn clear(&mut self) {
        for channel in self.channels_mut() {
            channel.fill(0.0);
        }
    }

    /// Silence `len` frames starting at `start` on every channel.
    pub fn clear_range(&mut self, start: usize, len: usize) {
        for channel in &mut self.channels {
            channel[start..start + len].fill(0.0);
        }
    }

    #[inline]
    pub fn add_sample(&mut self, channel: usize, index: usize, value: f32) {
        self.channels[channel][index] += value;
    }

    /// Add `len` frames of `source` (from frame 0) into this buffer at `start`.
    ///
    /// Only the channels both buffers have are mixed.
    pub fn add_from(&mut self, source: &AudioBuffer, start: usize, len: usize) {
        for (dst, src) in self.channels.iter_mut().zip(&source.channels) {
            for (d, s) in dst[start..start + len].iter_mut().zip(&src[..len]) {
                *d += s;
            }
        }
    }

    pub fn apply_gain(&mut self, gain: f32) {
        if gain == 1.0 {
            return;
        }
        for channel in self.channels_mut() {
            for sample in channel.iter_mut() {
                *sample *= gain;
            }
        }
    }

    /// Peak absolute value across all channels.
    pub fn peak(&self) -> f32 {
        self.channels()
            .flat_map(|c| c.iter())
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    /// Write the active frames into an interleaved device buffer.
    ///
    /// Device channels beyond this buffer's count receive the last channel.
    pub fn write_interleaved(&self, out: &mut [f32], device_channels: usize) {
        if self.channels.is_empty() || device_channels == 0 {
            return;
        }
        let last = self.channels.len() - 1;
        let frames = self.num_samples;
        for (frame, slot) in out.chunks_mut(device_channels).take(frames).enumerate() {
            for (ch, sample) in slot.iter_mut().enumerate() {
                *sample = self.channels[ch.min(last)][frame];
            }
        }
    }
}
