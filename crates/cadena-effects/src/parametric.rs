//! Single-band parametric filter.

use cadena_core::{
    AudioBuffer, Biquad, Effect, ParamDescriptor, ParamId, ProcessSpec, allpass_coefficients,
    bandpass_coefficients, impl_params, limit_frequency, notch_coefficients,
    peaking_eq_coefficients,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Biquad response of a [`ParametricFilter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterMode {
    /// Bell boost or cut by the gain setting.
    #[default]
    Peak,
    /// Constant 0 dB peak band-pass.
    Bandpass,
    /// Band reject.
    Notch,
    /// Phase shift only.
    Allpass,
}

impl FilterMode {
    /// Display labels, indexed by [`FilterMode::index`].
    pub const LABELS: &'static [&'static str] = &["Peak", "Bandpass", "Notch", "Allpass"];

    /// Mode for an option index; out-of-range indices pick the last mode.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Peak,
            1 => Self::Bandpass,
            2 => Self::Notch,
            _ => Self::Allpass,
        }
    }

    /// Option index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// One biquad per channel. Coefficients are recomputed at the start of the
/// next block after any setting changes, never per sample.
///
/// Gain only affects [`FilterMode::Peak`].
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Mode | Peak, Bandpass, Notch, Allpass | Peak |
/// | 1 | Frequency | 20–20000 Hz | 750.0 |
/// | 2 | Quality | 0.1–10 | 1.0 |
/// | 3 | Gain | -24–24 dB | 0.0 |
///
/// # Example
///
/// ```rust
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
/// use cadena_effects::{FilterMode, ParametricFilter};
///
/// let mut eq = ParametricFilter::new();
/// eq.set_mode(FilterMode::Peak);
/// eq.set_frequency(2500.0);
/// eq.set_gain_db(6.0);
/// eq.prepare(&ProcessSpec::stereo(48000.0, 256));
///
/// let mut block = AudioBuffer::new(2, 256);
/// eq.process(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct ParametricFilter {
    mode: FilterMode,
    frequency: f32,
    quality: f32,
    gain_db: f32,
    sample_rate: f32,
    dirty: bool,
    filters: Vec<Biquad>,
}

impl ParametricFilter {
    /// Creates a flat peak filter at 750 Hz.
    pub fn new() -> Self {
        Self {
            mode: FilterMode::Peak,
            frequency: 750.0,
            quality: 1.0,
            gain_db: 0.0,
            sample_rate: 48000.0,
            dirty: true,
            filters: Vec::new(),
        }
    }

    /// Selects the response.
    pub fn set_mode(&mut self, mode: FilterMode) {
        if mode != self.mode {
            self.mode = mode;
            self.dirty = true;
        }
    }

    /// Current response.
    pub fn mode(&self) -> FilterMode {
        self.mode
    }

    /// Sets the centre frequency in Hz (20–20000).
    pub fn set_frequency(&mut self, freq_hz: f32) {
        let freq_hz = freq_hz.clamp(20.0, 20000.0);
        if freq_hz != self.frequency {
            self.frequency = freq_hz;
            self.dirty = true;
        }
    }

    /// Centre frequency in Hz.
    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    /// Sets the quality factor (0.1–10).
    pub fn set_quality(&mut self, q: f32) {
        let q = q.clamp(0.1, 10.0);
        if q != self.quality {
            self.quality = q;
            self.dirty = true;
        }
    }

    /// Quality factor.
    pub fn quality(&self) -> f32 {
        self.quality
    }

    /// Sets the peak gain in dB (-24–24).
    pub fn set_gain_db(&mut self, gain_db: f32) {
        let gain_db = gain_db.clamp(-24.0, 24.0);
        if gain_db != self.gain_db {
            self.gain_db = gain_db;
            self.dirty = true;
        }
    }

    /// Peak gain in dB.
    pub fn gain_db(&self) -> f32 {
        self.gain_db
    }

    fn update_coefficients(&mut self) {
        let sr = self.sample_rate;
        let freq = limit_frequency(self.frequency, sr);
        let q = self.quality;
        let coefficients = match self.mode {
            FilterMode::Peak => peaking_eq_coefficients(freq, q, self.gain_db, sr),
            FilterMode::Bandpass => bandpass_coefficients(freq, q, sr),
            FilterMode::Notch => notch_coefficients(freq, q, sr),
            FilterMode::Allpass => allpass_coefficients(freq, q, sr),
        };
        for filter in &mut self.filters {
            filter.set_coefficient_tuple(coefficients);
        }
        self.dirty = false;
    }
}

impl Default for ParametricFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for ParametricFilter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.filters = (0..spec.num_channels).map(|_| Biquad::new()).collect();
        self.update_coefficients();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        if self.dirty && !self.filters.is_empty() {
            self.update_coefficients();
        }
        for (filter, samples) in self.filters.iter_mut().zip(buffer.channels_mut()) {
            for sample in samples.iter_mut() {
                *sample = filter.process(*sample);
            }
        }
    }

    fn reset(&mut self) {
        for filter in &mut self.filters {
            filter.clear();
        }
    }
}

impl_params! {
    ParametricFilter, this {
        [0] ParamDescriptor::choice("Mode", "Mode", FilterMode::LABELS, 0)
                .with_id(ParamId(500), "filter_mode"),
            get: this.mode.index() as f32,
            set: |v| this.set_mode(FilterMode::from_index(libm::roundf(v.max(0.0)) as usize));

        [1] ParamDescriptor::frequency_hz("Frequency", "Freq", 20.0, 20000.0, 750.0)
                .with_id(ParamId(501), "filter_freq"),
            get: this.frequency,
            set: |v| this.set_frequency(v);

        [2] ParamDescriptor::custom("Quality", "Q", 0.1, 10.0, 1.0)
                .with_id(ParamId(502), "filter_quality"),
            get: this.quality,
            set: |v| this.set_quality(v);

        [3] ParamDescriptor::gain_db("Gain", "Gain", -24.0, 24.0, 0.0)
                .with_id(ParamId(503), "filter_gain"),
            get: this.gain_db,
            set: |v| this.set_gain_db(v);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadena_core::ParameterInfo;
    use core::f32::consts::TAU;

    const SR: f32 = 48000.0;

    fn sine_peak(eq: &mut ParametricFilter, freq: f32) -> f32 {
        eq.prepare(&ProcessSpec::new(SR, 2400, 1));
        let mut block = AudioBuffer::new(1, 2400);
        let mut peak = 0.0f32;
        for n in 0..10 {
            for (i, s) in block.channel_mut(0).iter_mut().enumerate() {
                *s = libm::sinf(TAU * freq * (n * 2400 + i) as f32 / SR);
            }
            eq.process(&mut block);
            if n >= 5 {
                peak = block.channel(0).iter().fold(peak, |p, s| p.max(s.abs()));
            }
        }
        peak
    }

    #[test]
    fn default_peak_is_transparent() {
        let mut eq = ParametricFilter::new();
        let peak = sine_peak(&mut eq, 3000.0);
        assert!((peak - 1.0).abs() < 0.01, "peak {peak}");
    }

    #[test]
    fn peak_gain_applies_at_centre() {
        let mut eq = ParametricFilter::new();
        eq.set_param(3, -12.0);
        eq.set_param(1, 1000.0);
        let peak = sine_peak(&mut eq, 1000.0);
        // -12 dB ≈ 0.251
        assert!((peak - 0.251).abs() < 0.02, "peak {peak}");
    }

    #[test]
    fn notch_mode_rejects_centre() {
        let mut eq = ParametricFilter::new();
        eq.set_mode(FilterMode::Notch);
        eq.set_quality(2.0);
        assert!(sine_peak(&mut eq, 750.0) < 0.05);
    }

    #[test]
    fn changes_take_effect_on_next_block() {
        let mut eq = ParametricFilter::new();
        eq.prepare(&ProcessSpec::new(SR, 64, 1));
        assert!(!eq.dirty);
        eq.set_gain_db(6.0);
        assert!(eq.dirty);
        eq.process(&mut AudioBuffer::new(1, 64));
        assert!(!eq.dirty);
        eq.set_gain_db(6.0);
        assert!(!eq.dirty, "unchanged value must not force a recompute");
    }

    #[test]
    fn settings_clamp() {
        let mut eq = ParametricFilter::new();
        eq.set_param(2, 0.0);
        eq.set_param(3, 60.0);
        eq.set_param(0, 7.0);
        assert_eq!(eq.quality(), 0.1);
        assert_eq!(eq.gain_db(), 24.0);
        assert_eq!(eq.mode(), FilterMode::Allpass);
    }

    #[test]
    fn unprepared_filter_is_noop() {
        let mut eq = ParametricFilter::new();
        eq.set_gain_db(12.0);
        let mut block = AudioBuffer::new(1, 8);
        block.channel_mut(0).fill(0.5);
        eq.process(&mut block);
        assert_eq!(block.channel(0), &[0.5; 8]);
    }
}
