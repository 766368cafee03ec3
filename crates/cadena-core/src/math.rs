//! Small DSP math helpers shared by the effects.
//!
//! All functions are allocation-free and `no_std`.

use libm::{expf, logf, tanhf};

/// Converts decibels to linear gain.
///
/// ```rust
/// use cadena_core::db_to_linear;
///
/// assert!((db_to_linear(0.0) - 1.0).abs() < 0.001);
/// assert!((db_to_linear(-6.02) - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn db_to_linear(db: f32) -> f32 {
    const FACTOR: f32 = core::f32::consts::LN_10 / 20.0;
    expf(db * FACTOR)
}

/// Converts linear gain to decibels. Values at or below zero read as −200 dB.
#[inline]
pub fn linear_to_db(linear: f32) -> f32 {
    const FACTOR: f32 = 20.0 / core::f32::consts::LN_10;
    logf(linear.max(1e-10)) * FACTOR
}

/// Hyperbolic-tangent saturation, approaching ±1 asymptotically.
#[inline]
pub fn soft_clip(x: f32) -> f32 {
    tanhf(x)
}

/// Replaces values too small to matter with zero so feedback paths never
/// decay into the subnormal range.
#[allow(clippy::inline_always)]
#[inline(always)]
pub fn flush_denormal(x: f32) -> f32 {
    if x.abs() < 1e-20 { 0.0 } else { x }
}

/// Limits a filter frequency to `20 Hz ..= 0.45 × sample_rate`.
///
/// The 20 Hz floor wins when the sample rate is too low to fit both bounds.
///
/// ```rust
/// use cadena_core::limit_frequency;
///
/// assert!((limit_frequency(30000.0, 48000.0) - 21600.0).abs() < 0.01);
/// assert_eq!(limit_frequency(1000.0, 40.0), 20.0);
/// ```
#[inline]
pub fn limit_frequency(freq: f32, sample_rate: f32) -> f32 {
    freq.min(sample_rate * 0.45).max(20.0)
}

/// Crossfades from `dry` (mix 0) to `wet` (mix 1).
#[inline]
pub fn wet_dry_mix(dry: f32, wet: f32, mix: f32) -> f32 {
    dry + (wet - dry) * mix
}
