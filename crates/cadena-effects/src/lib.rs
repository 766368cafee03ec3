//! Cadena Effects - the stages of a cadena chain
//!
//! Every effect implements [`Effect`](cadena_core::Effect) (prepare / process /
//! reset on a multichannel block, in place) and
//! [`ParameterInfo`](cadena_core::ParameterInfo) (its control table):
//!
//! - [`Phaser`] - LFO-swept allpass cascade with feedback
//! - [`Chorus`] - modulated fractional delay with feedback
//! - [`Saturator`] - drive into a normalised tanh curve
//! - [`LadderFilter`] - four-pole ladder with six response modes
//! - [`ParametricFilter`] - single biquad: peak, band-pass, notch or all-pass
//!
//! Per-channel state is allocated in `prepare`; until then `process` leaves
//! the block untouched.
//!
//! ## Example
//!
//! ```rust
//! use cadena_core::{AudioBuffer, Effect, ProcessSpec};
//! use cadena_effects::Saturator;
//!
//! let mut sat = Saturator::new();
//! sat.prepare(&ProcessSpec::stereo(48000.0, 256));
//! sat.set_drive(8.0);
//!
//! let mut block = AudioBuffer::new(2, 256);
//! block.channel_mut(0).fill(0.25);
//! sat.process(&mut block);
//! assert!(block.channel(0)[255] > 0.25);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod chorus;
pub mod ladder;
pub mod parametric;
pub mod phaser;
pub mod saturator;

pub use chorus::Chorus;
pub use ladder::{LadderFilter, LadderMode};
pub use parametric::{FilterMode, ParametricFilter};
pub use phaser::Phaser;
pub use saturator::Saturator;
