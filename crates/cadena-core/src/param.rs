//! Parameter smoothing for zipper-free changes.
//!
//! Chain parameters change at block granularity. Gains and mix amounts that
//! jump at a block boundary click, so effects route them through a
//! [`SmoothedParam`], a one-pole lowpass that glides towards each new target
//! over a few milliseconds.
//!
//! ```rust
//! use cadena_core::SmoothedParam;
//!
//! let mut mix = SmoothedParam::standard(0.0, 48000.0);
//! mix.set_target(1.0);
//! for _ in 0..4800 {
//!     mix.advance();
//! }
//! assert!((mix.get() - 1.0).abs() < 1e-3);
//! ```

use libm::expf;

/// Default smoothing time used by [`SmoothedParam::standard`].
pub const STANDARD_SMOOTHING_MS: f32 = 10.0;

/// A parameter with built-in exponential smoothing.
#[derive(Debug, Clone)]
pub struct SmoothedParam {
    current: f32,
    target: f32,
    /// 1 = instant, towards 0 = slower.
    coeff: f32,
    sample_rate: f32,
    smoothing_time_ms: f32,
}

impl SmoothedParam {
    /// Creates an unsmoothed parameter (changes apply instantly until a
    /// smoothing time is configured).
    pub fn new(initial: f32) -> Self {
        Self {
            current: initial,
            target: initial,
            coeff: 1.0,
            sample_rate: 48000.0,
            smoothing_time_ms: 0.0,
        }
    }

    /// Creates a parameter with the given sample rate and smoothing time.
    pub fn with_config(initial: f32, sample_rate: f32, smoothing_time_ms: f32) -> Self {
        let mut param = Self::new(initial);
        param.sample_rate = sample_rate;
        param.smoothing_time_ms = smoothing_time_ms;
        param.recalculate_coeff();
        param
    }

    /// Creates a parameter with [`STANDARD_SMOOTHING_MS`] smoothing.
    pub fn standard(initial: f32, sample_rate: f32) -> Self {
        Self::with_config(initial, sample_rate, STANDARD_SMOOTHING_MS)
    }

    /// Sets the value to glide towards.
    #[inline]
    pub fn set_target(&mut self, target: f32) {
        self.target = target;
    }

    /// Sets the target and jumps straight to it.
    #[inline]
    pub fn set_immediate(&mut self, value: f32) {
        self.target = value;
        self.current = value;
    }

    /// Updates the sample rate and recomputes the coefficient.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate;
        self.recalculate_coeff();
    }

    /// Sets the smoothing time constant in milliseconds.
    pub fn set_smoothing_time_ms(&mut self, time_ms: f32) {
        self.smoothing_time_ms = time_ms;
        self.recalculate_coeff();
    }

    /// Advances one sample and returns the smoothed value.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        self.current += self.coeff * (self.target - self.current);
        self.current
    }

    /// Current smoothed value.
    #[inline]
    pub fn get(&self) -> f32 {
        self.current
    }

    /// Value being smoothed towards.
    #[inline]
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Returns `true` once the current value is within 1e-6 of the target.
    #[inline]
    pub fn is_settled(&self) -> bool {
        let diff = self.current - self.target;
        diff < 1e-6 && diff > -1e-6
    }

    /// Jumps the current value to the target.
    #[inline]
    pub fn snap_to_target(&mut self) {
        self.current = self.target;
    }

    fn recalculate_coeff(&mut self) {
        if self.smoothing_time_ms <= 0.0 || self.sample_rate <= 0.0 {
            self.coeff = 1.0;
            return;
        }
        let samples = self.smoothing_time_ms * 0.001 * self.sample_rate;
        self.coeff = 1.0 - expf(-1.0 / samples);
    }
}

impl Default for SmoothedParam {
    fn default() -> Self {
        Self::new(0.0)
    }
}
