//! Cadena Core - effect lifecycle, parameter model and DSP primitives
//!
//! This crate provides the building blocks shared by every stage of a cadena
//! effect chain. Everything on the audio path is allocation-free; anything that
//! may allocate is confined to `prepare`.
//!
//! # Core Abstractions
//!
//! ## Effect Lifecycle
//!
//! - [`Effect`] - `prepare` / `process` / `reset` contract for block processors
//! - [`ProcessSpec`] - sample rate, maximum block size and channel count
//! - [`AudioBuffer`] - planar multichannel block, processed in place
//!
//! ## Parameters
//!
//! - [`ParameterInfo`] - index-based parameter introspection
//! - [`ParamDescriptor`] - name, range, default, unit and stable IDs
//! - [`AtomicF32`] / [`AtomicChoice`] - torn-free cells for cross-thread control values
//! - [`SmoothedParam`] - per-sample smoothing for zipper-free changes
//!
//! ## DSP Primitives
//!
//! - [`Biquad`] - second-order IIR filter with RBJ cookbook coefficients
//! - [`InterpolatedDelay`] - fractional delay line
//! - [`Lfo`] - sine low-frequency oscillator
//! - Math helpers: [`db_to_linear`], [`soft_clip`], [`wet_dry_mix`], [`flush_denormal`]
//!
//! # no_std Support
//!
//! Disable the default `std` feature to build for embedded targets:
//!
//! ```toml
//! [dependencies]
//! cadena-core = { version = "0.1", default-features = false }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(not(feature = "std"))]
extern crate alloc;

pub mod atomic;
pub mod biquad;
pub mod buffer;
pub mod delay;
pub mod effect;
pub mod lfo;
pub mod math;
pub mod param;
pub mod param_info;

pub use atomic::{AtomicChoice, AtomicF32};
pub use biquad::{
    Biquad, allpass_coefficients, bandpass_coefficients, notch_coefficients,
    peaking_eq_coefficients,
};
pub use buffer::AudioBuffer;
pub use delay::InterpolatedDelay;
pub use effect::{Effect, ProcessSpec};
pub use lfo::Lfo;
pub use math::{
    db_to_linear, flush_denormal, limit_frequency, linear_to_db, soft_clip, wet_dry_mix,
};
pub use param::SmoothedParam;
pub use param_info::{ParamDescriptor, ParamFlags, ParamId, ParamScale, ParamUnit, ParameterInfo};
