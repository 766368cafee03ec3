//! Biquad (bi-quadratic) filter structure.
//!
//! A generic second-order IIR section plus coefficient helpers for the
//! responses the parametric filter offers. Coefficients follow the RBJ Audio
//! EQ Cookbook and are returned as `(b0, b1, b2, a0, a1, a2)`; pass them to
//! [`Biquad::set_coefficients`], which normalises by `a0`.

use core::f32::consts::PI;
use libm::{cosf, powf, sinf};

/// Second-order IIR filter in Direct Form I.
///
/// ```text
/// y[n] = b0*x[n] + b1*x[n-1] + b2*x[n-2]
///                - a1*y[n-1] - a2*y[n-2]
/// ```
#[derive(Debug, Clone)]
pub struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,

    x1: f32,
    x2: f32,
    y1: f32,
    y2: f32,
}

impl Biquad {
    /// Creates a passthrough biquad (`y[n] = x[n]`).
    pub fn new() -> Self {
        Self {
            b0: 1.0,
            b1: 0.0,
            b2: 0.0,
            a1: 0.0,
            a2: 0.0,
            x1: 0.0,
            x2: 0.0,
            y1: 0.0,
            y2: 0.0,
        }
    }

    /// Sets the coefficients, normalising by `a0`.
    pub fn set_coefficients(&mut self, b0: f32, b1: f32, b2: f32, a0: f32, a1: f32, a2: f32) {
        let a0_inv = 1.0 / a0;
        self.b0 = b0 * a0_inv;
        self.b1 = b1 * a0_inv;
        self.b2 = b2 * a0_inv;
        self.a1 = a1 * a0_inv;
        self.a2 = a2 * a0_inv;
    }

    /// Convenience wrapper taking the tuple the coefficient helpers return.
    #[inline]
    pub fn set_coefficient_tuple(&mut self, c: (f32, f32, f32, f32, f32, f32)) {
        self.set_coefficients(c.0, c.1, c.2, c.3, c.4, c.5);
    }

    /// Processes one sample.
    #[inline]
    pub fn process(&mut self, input: f32) -> f32 {
        let output = self.b0 * input + self.b1 * self.x1 + self.b2 * self.x2
            - self.a1 * self.y1
            - self.a2 * self.y2;

        self.x2 = self.x1;
        self.x1 = input;
        self.y2 = self.y1;
        self.y1 = crate::flush_denormal(output);

        output
    }

    /// Clears the filter history without touching the coefficients.
    pub fn clear(&mut self) {
        self.x1 = 0.0;
        self.x2 = 0.0;
        self.y1 = 0.0;
        self.y2 = 0.0;
    }
}

impl Default for Biquad {
    fn default() -> Self {
        Self::new()
    }
}

#[inline]
fn omega_terms(frequency: f32, q: f32, sample_rate: f32) -> (f32, f32) {
    let omega = 2.0 * PI * frequency / sample_rate;
    (cosf(omega), sinf(omega) / (2.0 * q))
}

/// Band-pass coefficients with constant 0 dB peak gain.
pub fn bandpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        alpha,
        0.0,
        -alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Notch (band-reject) coefficients.
pub fn notch_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        1.0,
        -2.0 * cos_omega,
        1.0,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Second-order all-pass coefficients: unity magnitude, phase turning
/// through 180° at `frequency`.
pub fn allpass_coefficients(
    frequency: f32,
    q: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        1.0 - alpha,
        -2.0 * cos_omega,
        1.0 + alpha,
        1.0 + alpha,
        -2.0 * cos_omega,
        1.0 - alpha,
    )
}

/// Peaking EQ coefficients: boost or cut of `gain_db` around `frequency`.
pub fn peaking_eq_coefficients(
    frequency: f32,
    q: f32,
    gain_db: f32,
    sample_rate: f32,
) -> (f32, f32, f32, f32, f32, f32) {
    let a = powf(10.0, gain_db / 40.0);
    let (cos_omega, alpha) = omega_terms(frequency, q, sample_rate);
    (
        1.0 + alpha * a,
        -2.0 * cos_omega,
        1.0 - alpha * a,
        1.0 + alpha / a,
        -2.0 * cos_omega,
        1.0 - alpha / a,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f32 = 48000.0;

    /// Steady-state peak amplitude of a sine at `freq` through `filter`.
    fn sine_gain(filter: &mut Biquad, freq: f32) -> f32 {
        let mut peak = 0.0f32;
        for i in 0..(SR as usize / 2) {
            let x = libm::sinf(2.0 * PI * freq * i as f32 / SR);
            let y = filter.process(x);
            if i > SR as usize / 4 {
                peak = peak.max(y.abs());
            }
        }
        peak
    }

    #[test]
    fn passthrough_by_default() {
        let mut bq = Biquad::new();
        for x in [0.5, -0.25, 1.0] {
            assert_eq!(bq.process(x), x);
        }
    }

    #[test]
    fn peaking_boosts_centre() {
        let mut bq = Biquad::new();
        bq.set_coefficient_tuple(peaking_eq_coefficients(1000.0, 1.0, 12.0, SR));
        let gain = sine_gain(&mut bq, 1000.0);
        // +12 dB ≈ 3.98x
        assert!((gain - 3.98).abs() < 0.1, "gain {gain}");
    }

    #[test]
    fn peaking_zero_gain_is_transparent() {
        let mut bq = Biquad::new();
        bq.set_coefficient_tuple(peaking_eq_coefficients(750.0, 1.0, 0.0, SR));
        let gain = sine_gain(&mut bq, 3000.0);
        assert!((gain - 1.0).abs() < 0.01, "gain {gain}");
    }

    #[test]
    fn notch_rejects_centre() {
        let mut bq = Biquad::new();
        bq.set_coefficient_tuple(notch_coefficients(1000.0, 2.0, SR));
        assert!(sine_gain(&mut bq, 1000.0) < 0.05);
    }

    #[test]
    fn bandpass_passes_centre_and_cuts_far() {
        let mut bq = Biquad::new();
        bq.set_coefficient_tuple(bandpass_coefficients(1000.0, 2.0, SR));
        assert!((sine_gain(&mut bq, 1000.0) - 1.0).abs() < 0.05);
        bq.clear();
        assert!(sine_gain(&mut bq, 100.0) < 0.1);
    }

    #[test]
    fn allpass_keeps_magnitude() {
        for freq in [200.0, 1000.0, 5000.0] {
            let mut bq = Biquad::new();
            bq.set_coefficient_tuple(allpass_coefficients(1000.0, 0.7, SR));
            let gain = sine_gain(&mut bq, freq);
            assert!((gain - 1.0).abs() < 0.02, "{freq} Hz gain {gain}");
        }
    }

    #[test]
    fn clear_resets_history() {
        let mut bq = Biquad::new();
        bq.set_coefficient_tuple(bandpass_coefficients(500.0, 1.0, SR));
        bq.process(1.0);
        bq.clear();
        assert_eq!(bq.process(0.0), 0.0);
    }
}
