// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

/// Planar multi-channel output buffer.
///
/// Every channel holds the same number of samples. Allocation happens only
/// in [`AudioBuffer::new`]; rendering writes into the existing storage.
#[derive(Debug, Default, Clone)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
}

impl AudioBuffer {
    pub fn new(num_channels: usize, num_samples: usize) -> Self {
        Self {
            channels: vec![vec![0.0; num_samples]; num_channels],
        }
    }

    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    pub fn num_samples(&self) -> usize {
        self.channels.first().map_or(0, Vec::len)
    }

    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index]
    }

    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index]
    }

    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        self.channels.iter().map(Vec::as_slice)
    }

    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        self.channels.iter_mut().map(Vec::as_mut_slice)
    }

    /// Zero the first `num_samples` of every channel.
    pub fn clear(&mut self, num_samples: usize) {
        for channel in &mut self.channels {
            let end = num_samples.min(channel.len());
            channel[..end].fill(0.0);
        }
    }

    /// Interleave the first `num_frames` frames into `out`
    /// (`out.len() >= num_frames * num_channels`).
    pub fn write_interleaved(&self, out: &mut [f32], num_frames: usize) {
        let channels = self.num_channels();
        if channels == 0 {
            return;
        }

        for (frame, slot) in out.chunks_mut(channels).take(num_frames).enumerate() {
            for (ch, sample) in slot.iter_mut().enumerate() {
                *sample = self.channels[ch][frame];
            }
        }
    }
}
