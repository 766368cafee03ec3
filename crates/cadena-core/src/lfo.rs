//! Sine low-frequency oscillator for modulation effects.

use core::f32::consts::TAU;
use libm::sinf;

/// Phase-accumulating sine LFO.
///
/// ```rust
/// use cadena_core::Lfo;
///
/// let mut lfo = Lfo::new(48000.0, 2.0);
/// let value = lfo.advance();
/// assert!((-1.0..=1.0).contains(&value));
/// ```
#[derive(Debug, Clone)]
pub struct Lfo {
    /// [0.0, 1.0)
    phase: f32,
    /// Phase the oscillator returns to on [`reset`](Self::reset).
    start_phase: f32,
    phase_inc: f32,
    sample_rate: f32,
}

impl Default for Lfo {
    fn default() -> Self {
        Self::new(48000.0, 1.0)
    }
}

impl Lfo {
    /// Creates an LFO at `freq_hz`.
    pub fn new(sample_rate: f32, freq_hz: f32) -> Self {
        Self {
            phase: 0.0,
            start_phase: 0.0,
            phase_inc: freq_hz / sample_rate,
            sample_rate,
        }
    }

    /// Sets the frequency in Hz.
    #[inline]
    pub fn set_frequency(&mut self, freq_hz: f32) {
        self.phase_inc = freq_hz / self.sample_rate;
    }

    /// Current frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.phase_inc * self.sample_rate
    }

    /// Changes the sample rate, keeping the frequency in Hz.
    pub fn set_sample_rate(&mut self, sample_rate: f32) {
        let freq = self.frequency();
        self.sample_rate = sample_rate;
        self.set_frequency(freq);
    }

    /// Sets the current and reset phase (0.25 = 90°).
    pub fn set_phase(&mut self, phase: f32) {
        self.start_phase = phase - libm::floorf(phase);
        self.phase = self.start_phase;
    }

    /// Current phase in [0.0, 1.0).
    pub fn phase(&self) -> f32 {
        self.phase
    }

    /// Returns to the configured start phase.
    pub fn reset(&mut self) {
        self.phase = self.start_phase;
    }

    /// Returns the current value in [-1.0, 1.0] and advances one sample.
    #[inline]
    pub fn advance(&mut self) -> f32 {
        let out = sinf(self.phase * TAU);
        self.phase += self.phase_inc;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }
        out
    }

    /// Like [`advance`](Self::advance) but scaled to [0.0, 1.0].
    #[inline]
    pub fn advance_unipolar(&mut self) -> f32 {
        (self.advance() + 1.0) * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_cycle_per_second() {
        let mut lfo = Lfo::new(48000.0, 1.0);
        for _ in 0..48000 {
            lfo.advance();
        }
        let phase_error = lfo.phase().min(1.0 - lfo.phase());
        assert!(phase_error < 0.01);
    }

    #[test]
    fn output_range() {
        let mut lfo = Lfo::new(44100.0, 7.0);
        for _ in 0..10_000 {
            let v = lfo.advance();
            assert!((-1.0..=1.0).contains(&v));
            let u = (v + 1.0) * 0.5;
            assert!((0.0..=1.0).contains(&u));
        }
    }

    #[test]
    fn opposite_phase_cancels() {
        let mut a = Lfo::new(48000.0, 3.0);
        let mut b = Lfo::new(48000.0, 3.0);
        b.set_phase(0.5);
        for _ in 0..100 {
            assert!((a.advance() + b.advance()).abs() < 1e-3);
        }
    }

    #[test]
    fn reset_returns_to_start_phase() {
        let mut lfo = Lfo::new(48000.0, 5.0);
        lfo.set_phase(0.25);
        for _ in 0..1234 {
            lfo.advance();
        }
        lfo.reset();
        assert_eq!(lfo.phase(), 0.25);
        assert!((lfo.advance() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sample_rate_change_keeps_frequency() {
        let mut lfo = Lfo::new(44100.0, 2.5);
        lfo.set_sample_rate(96000.0);
        assert!((lfo.frequency() - 2.5).abs() < 1e-4);
    }
}
