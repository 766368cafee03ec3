//! Effect lifecycle trait and stream configuration.
//!
//! The [`Effect`] trait is the contract every stage of a chain honours:
//! it is prepared for a stream, processes blocks in place, and can be
//! cleared back to silence.
//!
//! ## Design Decisions
//!
//! - **Block processing in place**: A stage receives the whole multichannel
//!   block and overwrites it, so the next stage consumes its output without
//!   any intermediate copy.
//!
//! - **Two-phase setup**: [`Effect::prepare`] may allocate (delay lines,
//!   per-channel state). [`Effect::process`] and [`Effect::reset`] never do.
//!   The host guarantees `prepare` is not called while `process` runs.
//!
//! - **Static dispatch**: The trait is object-safe, but chains hold a closed
//!   set of effects and dispatch through an enum.

use crate::AudioBuffer;

/// Stream configuration broadcast to every effect on (re)preparation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f32,
    /// Largest block the host will deliver.
    pub max_block_size: usize,
    /// Number of audio channels.
    pub num_channels: usize,
}

impl ProcessSpec {
    /// Creates a spec from its three parts.
    pub const fn new(sample_rate: f32, max_block_size: usize, num_channels: usize) -> Self {
        Self {
            sample_rate,
            max_block_size,
            num_channels,
        }
    }

    /// Stereo spec at the given rate and block size.
    pub const fn stereo(sample_rate: f32, max_block_size: usize) -> Self {
        Self::new(sample_rate, max_block_size, 2)
    }

    /// Returns `true` for the bus layouts a chain accepts: mono or stereo,
    /// with as many outputs as inputs.
    ///
    /// ```rust
    /// use cadena_core::ProcessSpec;
    ///
    /// assert!(ProcessSpec::is_supported_layout(2, 2));
    /// assert!(ProcessSpec::is_supported_layout(1, 1));
    /// assert!(!ProcessSpec::is_supported_layout(1, 2));
    /// assert!(!ProcessSpec::is_supported_layout(6, 6));
    /// ```
    pub const fn is_supported_layout(inputs: usize, outputs: usize) -> bool {
        (outputs == 1 || outputs == 2) && inputs == outputs
    }
}

impl Default for ProcessSpec {
    fn default() -> Self {
        Self::stereo(48000.0, 512)
    }
}

/// Lifecycle contract for a block-processing effect.
///
/// # Example
///
/// ```rust
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
///
/// struct Gain {
///     gain: f32,
/// }
///
/// impl Effect for Gain {
///     fn prepare(&mut self, _spec: &ProcessSpec) {}
///
///     fn process(&mut self, buffer: &mut AudioBuffer) {
///         for channel in buffer.channels_mut() {
///             for sample in channel.iter_mut() {
///                 *sample *= self.gain;
///             }
///         }
///     }
///
///     fn reset(&mut self) {}
/// }
///
/// let mut gain = Gain { gain: 0.5 };
/// let mut buffer = AudioBuffer::new(2, 4);
/// buffer.channel_mut(0).fill(1.0);
/// gain.process(&mut buffer);
/// assert_eq!(buffer.channel(0), &[0.5; 4]);
/// ```
pub trait Effect {
    /// Configures the effect for a stream.
    ///
    /// Sizes internal buffers for `spec.sample_rate`, `spec.max_block_size`
    /// and `spec.num_channels`. May allocate. Must be called before the first
    /// [`process`](Self::process) and again whenever the spec changes.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Transforms one block in place.
    ///
    /// Real-time safe: no allocation, no blocking, bounded time proportional
    /// to the block length. Channels beyond the prepared count are left
    /// untouched.
    fn process(&mut self, buffer: &mut AudioBuffer);

    /// Clears internal state to silence without deallocating.
    fn reset(&mut self);

    /// Processing latency in samples. Most effects have none.
    fn latency_samples(&self) -> usize {
        0
    }
}
