//! Planar multichannel audio block.
//!
//! [`AudioBuffer`] owns one sample vector per channel, allocated up front for
//! the largest block the host will deliver. The active block length is
//! changed with [`AudioBuffer::set_len`], which never allocates, so a single
//! buffer can be reused for every callback of a stream.

#[cfg(not(feature = "std"))]
use alloc::vec;
#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Planar multichannel block processed in place by each chain stage.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioBuffer {
    channels: Vec<Vec<f32>>,
    len: usize,
}

impl AudioBuffer {
    /// Creates a zeroed buffer with `num_channels` channels of `capacity`
    /// samples. The active length starts at `capacity`.
    pub fn new(num_channels: usize, capacity: usize) -> Self {
        Self {
            channels: (0..num_channels).map(|_| vec![0.0; capacity]).collect(),
            len: capacity,
        }
    }

    /// Builds a buffer from per-channel sample vectors.
    ///
    /// The active length is the length of the shortest channel.
    pub fn from_channels(channels: Vec<Vec<f32>>) -> Self {
        let len = channels.iter().map(Vec::len).min().unwrap_or(0);
        Self { channels, len }
    }

    /// Number of channels.
    #[inline]
    pub fn num_channels(&self) -> usize {
        self.channels.len()
    }

    /// Active block length in samples.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the active block is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Samples allocated per channel.
    pub fn capacity(&self) -> usize {
        self.channels.iter().map(Vec::len).min().unwrap_or(0)
    }

    /// Sets the active block length, clamped to [`capacity`](Self::capacity).
    ///
    /// Never allocates. Returns the length actually set.
    #[inline]
    pub fn set_len(&mut self, len: usize) -> usize {
        self.len = len.min(self.capacity());
        self.len
    }

    /// Reallocates to a new channel count and capacity. Not real-time safe.
    ///
    /// Existing samples are discarded; the active length becomes `capacity`.
    pub fn resize(&mut self, num_channels: usize, capacity: usize) {
        #[cfg(feature = "tracing")]
        tracing::debug!(num_channels, capacity, "audio buffer resized");
        self.channels.resize_with(num_channels, Vec::new);
        for channel in &mut self.channels {
            channel.clear();
            channel.resize(capacity, 0.0);
        }
        self.len = capacity;
    }

    /// Active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    #[inline]
    pub fn channel(&self, index: usize) -> &[f32] {
        &self.channels[index][..self.len]
    }

    /// Mutable active samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `index >= num_channels()`.
    #[inline]
    pub fn channel_mut(&mut self, index: usize) -> &mut [f32] {
        &mut self.channels[index][..self.len]
    }

    /// Iterates the active samples of every channel.
    pub fn channels(&self) -> impl Iterator<Item = &[f32]> {
        let len = self.len;
        self.channels.iter().map(move |c| &c[..len])
    }

    /// Iterates the active samples of every channel mutably.
    pub fn channels_mut(&mut self) -> impl Iterator<Item = &mut [f32]> {
        let len = self.len;
        self.channels.iter_mut().map(move |c| &mut c[..len])
    }

    /// Zeroes the active samples of every channel.
    pub fn clear(&mut self) {
        for channel in self.channels_mut() {
            channel.fill(0.0);
        }
    }

    /// Zeroes the active samples of channel `first` and every channel after it.
    ///
    /// Used to silence outputs that have no corresponding input.
    pub fn clear_from(&mut self, first: usize) {
        let len = self.len;
        for channel in self.channels.iter_mut().skip(first) {
            channel[..len].fill(0.0);
        }
    }

    /// Deinterleaves `interleaved` (frames of `source_channels` samples) into
    /// this buffer and sets the active length to the number of frames copied.
    ///
    /// Source channels beyond [`num_channels`](Self::num_channels) are
    /// dropped. Buffer channels beyond `source_channels` are left as they are.
    /// Returns the number of frames copied.
    pub fn copy_from_interleaved(&mut self, interleaved: &[f32], source_channels: usize) -> usize {
        if source_channels == 0 {
            self.len = 0;
            return 0;
        }
        let frames = self.set_len(interleaved.len() / source_channels);
        let shared = source_channels.min(self.channels.len());
        for (ch, channel) in self.channels.iter_mut().take(shared).enumerate() {
            for (frame, sample) in channel[..frames].iter_mut().enumerate() {
                *sample = interleaved[frame * source_channels + ch];
            }
        }
        frames
    }

    /// Interleaves the active block into `out` using `target_channels` samples
    /// per frame. Target channels the buffer does not have are written as
    /// silence. Returns the number of frames written.
    pub fn copy_to_interleaved(&self, out: &mut [f32], target_channels: usize) -> usize {
        if target_channels == 0 {
            return 0;
        }
        let frames = self.len.min(out.len() / target_channels);
        for (frame, chunk) in out.chunks_exact_mut(target_channels).take(frames).enumerate() {
            for (ch, slot) in chunk.iter_mut().enumerate() {
                *slot = self.channels.get(ch).map_or(0.0, |c| c[frame]);
            }
        }
        frames
    }
}

impl Default for AudioBuffer {
    fn default() -> Self {
        Self::new(2, 0)
    }
}
