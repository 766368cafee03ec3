//! Phaser built from a cascade of swept first-order allpass filters.
//!
//! Each channel runs six allpass stages whose break frequencies follow a sine
//! LFO around a centre frequency. Mixing the phase-shifted signal with the dry
//! input carves notches that sweep up and down the spectrum; feeding the last
//! stage back into the first sharpens them.

use core::f32::consts::PI;

use cadena_core::{
    AudioBuffer, Effect, Lfo, ParamDescriptor, ParamId, ProcessSpec, SmoothedParam,
    flush_denormal, impl_params, limit_frequency, wet_dry_mix,
};
use libm::{exp2f, tanf};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Allpass stages per channel.
const STAGES: usize = 6;

/// Samples between allpass coefficient updates.
///
/// At 48 kHz this is about 0.67 ms, fast enough that the sweep sounds
/// continuous while doing 1/32 of the `tanf` work.
const COEFF_UPDATE_INTERVAL: u32 = 32;

/// Sweep width in octaves either side of the centre at full depth.
const SWEEP_OCTAVES: f32 = 2.0;

/// Feedback is scaled below unity so the loop stays stable at ±100 %.
const FEEDBACK_SCALE: f32 = 0.95;

/// LFO phase offset between consecutive channels (90°).
const CHANNEL_PHASE_OFFSET: f32 = 0.25;

/// Phaser effect with LFO-modulated allpass filters.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.01–2.0 Hz | 0.2 |
/// | 1 | Depth | 1–100% | 5.0 |
/// | 2 | Centre | 20–20000 Hz | 1000.0 |
/// | 3 | Feedback | -100–100% | 0.0 |
/// | 4 | Mix | 1–100% | 5.0 |
///
/// # Example
///
/// ```rust
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
/// use cadena_effects::Phaser;
///
/// let mut phaser = Phaser::new();
/// phaser.prepare(&ProcessSpec::stereo(44100.0, 128));
/// phaser.set_depth(0.8);
/// phaser.set_mix(0.5);
///
/// let mut block = AudioBuffer::new(2, 128);
/// block.channel_mut(0)[0] = 1.0;
/// phaser.process(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct Phaser {
    rate: f32,
    depth: f32,
    center: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
    channels: Vec<PhaserChannel>,
}

/// First-order allpass: `y[n] = a·x[n] + x[n-1] - a·y[n-1]`
/// with `a = (tan(π·fc/fs) - 1) / (tan(π·fc/fs) + 1)`.
#[derive(Debug, Clone, Copy, Default)]
struct FirstOrderAllpass {
    a: f32,
    x1: f32,
    y1: f32,
}

impl FirstOrderAllpass {
    #[inline]
    fn set_frequency(&mut self, freq: f32, sample_rate: f32) {
        let freq = limit_frequency(freq, sample_rate);
        let t = tanf(PI * freq / sample_rate);
        self.a = (t - 1.0) / (t + 1.0);
    }

    #[inline]
    fn process(&mut self, input: f32) -> f32 {
        let output = self.a * input + self.x1 - self.a * self.y1;
        self.x1 = input;
        self.y1 = flush_denormal(output);
        output
    }

    fn clear(&mut self) {
        self.x1 = 0.0;
        self.y1 = 0.0;
    }
}

#[derive(Debug, Clone)]
struct PhaserChannel {
    stages: [FirstOrderAllpass; STAGES],
    lfo: Lfo,
    feedback_sample: f32,
    /// Zero forces a coefficient update on the next sample.
    coeff_countdown: u32,
    mix: SmoothedParam,
}

impl PhaserChannel {
    fn new(sample_rate: f32, index: usize, rate: f32, mix: f32) -> Self {
        let mut lfo = Lfo::new(sample_rate, rate);
        lfo.set_phase(index as f32 * CHANNEL_PHASE_OFFSET);
        Self {
            stages: [FirstOrderAllpass::default(); STAGES],
            lfo,
            feedback_sample: 0.0,
            coeff_countdown: 0,
            mix: SmoothedParam::standard(mix, sample_rate),
        }
    }

    fn reset(&mut self, mix: f32) {
        for stage in &mut self.stages {
            stage.clear();
        }
        self.lfo.reset();
        self.feedback_sample = 0.0;
        self.coeff_countdown = 0;
        self.mix.set_immediate(mix);
    }
}

impl Phaser {
    /// Creates a phaser with default settings. Call
    /// [`prepare`](Effect::prepare) before processing.
    pub fn new() -> Self {
        Self {
            rate: 0.2,
            depth: 0.05,
            center: 1000.0,
            feedback: 0.0,
            mix: 0.05,
            sample_rate: 48000.0,
            channels: Vec::new(),
        }
    }

    /// Sets the LFO rate in Hz (0.01–2).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz.clamp(0.01, 2.0);
    }

    /// LFO rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Sets the sweep depth as a fraction (0.01–1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.01, 1.0);
    }

    /// Sweep depth as a fraction.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Sets the sweep centre frequency in Hz (20–20000).
    pub fn set_center(&mut self, freq_hz: f32) {
        self.center = freq_hz.clamp(20.0, 20000.0);
    }

    /// Sweep centre frequency in Hz.
    pub fn center(&self) -> f32 {
        self.center
    }

    /// Sets the feedback as a fraction (-1–1).
    pub fn set_feedback(&mut self, feedback: f32) {
        self.feedback = feedback.clamp(-1.0, 1.0);
    }

    /// Feedback as a fraction.
    pub fn feedback(&self) -> f32 {
        self.feedback
    }

    /// Sets the wet/dry mix as a fraction (0.01–1).
    pub fn set_mix(&mut self, mix: f32) {
        self.mix = mix.clamp(0.01, 1.0);
    }

    /// Wet/dry mix as a fraction.
    pub fn mix(&self) -> f32 {
        self.mix
    }
}

impl Default for Phaser {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Phaser {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.channels = (0..spec.num_channels)
            .map(|ch| PhaserChannel::new(spec.sample_rate, ch, self.rate, self.mix))
            .collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let (rate, depth, center, mix) = (self.rate, self.depth, self.center, self.mix);
        let feedback = self.feedback * FEEDBACK_SCALE;
        let sample_rate = self.sample_rate;

        for (state, samples) in self.channels.iter_mut().zip(buffer.channels_mut()) {
            state.lfo.set_frequency(rate);
            state.mix.set_target(mix);

            for sample in samples.iter_mut() {
                // The LFO advances every sample to keep its phase exact even
                // though coefficients only follow it every few samples.
                let lfo = state.lfo.advance();
                if state.coeff_countdown == 0 {
                    state.coeff_countdown = COEFF_UPDATE_INTERVAL;
                    let swept = center * exp2f(SWEEP_OCTAVES * depth * lfo);
                    for (i, stage) in state.stages.iter_mut().enumerate() {
                        stage.set_frequency(swept * (1.0 + i as f32 * 0.1), sample_rate);
                    }
                }
                state.coeff_countdown -= 1;

                let dry = *sample;
                let mut wet = dry + state.feedback_sample * feedback;
                for stage in &mut state.stages {
                    wet = stage.process(wet);
                }
                state.feedback_sample = flush_denormal(wet);

                *sample = wet_dry_mix(dry, wet, state.mix.advance());
            }
        }
    }

    fn reset(&mut self) {
        let mix = self.mix;
        for state in &mut self.channels {
            state.reset(mix);
        }
    }
}

impl_params! {
    Phaser, this {
        [0] ParamDescriptor::rate_hz(0.01, 2.0, 0.2)
                .with_id(ParamId(100), "phaser_rate"),
            get: this.rate,
            set: |v| this.set_rate(v);

        [1] ParamDescriptor::depth(1.0, 5.0)
                .with_id(ParamId(101), "phaser_depth"),
            get: this.depth * 100.0,
            set: |v| this.set_depth(v / 100.0);

        [2] ParamDescriptor::frequency_hz("Centre", "Centre", 20.0, 20000.0, 1000.0)
                .with_id(ParamId(102), "phaser_center"),
            get: this.center,
            set: |v| this.set_center(v);

        [3] ParamDescriptor::feedback()
                .with_id(ParamId(103), "phaser_feedback"),
            get: this.feedback * 100.0,
            set: |v| this.set_feedback(v / 100.0);

        [4] ParamDescriptor::mix(1.0, 5.0)
                .with_id(ParamId(104), "phaser_mix"),
            get: this.mix * 100.0,
            set: |v| this.set_mix(v / 100.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadena_core::ParameterInfo;

    #[cfg(not(feature = "std"))]
    use alloc::vec;

    fn impulse_block(channels: usize, len: usize) -> AudioBuffer {
        let mut block = AudioBuffer::new(channels, len);
        for ch in 0..channels {
            block.channel_mut(ch)[0] = 1.0;
        }
        block
    }

    #[test]
    fn unprepared_phaser_leaves_block_untouched() {
        let mut phaser = Phaser::new();
        let mut block = impulse_block(2, 32);
        let before = block.clone();
        phaser.process(&mut block);
        assert_eq!(block, before);
    }

    #[test]
    fn allpass_stage_keeps_dc() {
        let mut stage = FirstOrderAllpass::default();
        stage.set_frequency(1000.0, 48000.0);
        let mut out = 0.0;
        for _ in 0..10_000 {
            out = stage.process(1.0);
        }
        assert!((out - 1.0).abs() < 1e-3, "dc out {out}");
    }

    #[test]
    fn full_wet_changes_signal() {
        let mut phaser = Phaser::new();
        phaser.prepare(&ProcessSpec::new(48000.0, 256, 1));
        phaser.set_mix(1.0);
        phaser.reset();
        let mut block = impulse_block(1, 256);
        phaser.process(&mut block);
        assert!(block.channel(0)[0].abs() < 1.0);
        assert!(block.channel(0)[1..].iter().any(|&s| s.abs() > 1e-3));
    }

    #[test]
    fn channels_sweep_out_of_phase() {
        let mut phaser = Phaser::new();
        phaser.prepare(&ProcessSpec::stereo(48000.0, 4096));
        phaser.set_mix(1.0);
        phaser.set_depth(1.0);
        phaser.set_rate(2.0);
        phaser.reset();

        let mut block = AudioBuffer::from_channels(vec![vec![0.5; 4096], vec![0.5; 4096]]);
        for ch in 0..2 {
            for (i, s) in block.channel_mut(ch).iter_mut().enumerate() {
                *s = libm::sinf(i as f32 * 0.05);
            }
        }
        phaser.process(&mut block);
        assert_ne!(block.channel(0), block.channel(1));
    }

    #[test]
    fn reset_restores_initial_response() {
        let mut phaser = Phaser::new();
        phaser.prepare(&ProcessSpec::stereo(44100.0, 128));
        phaser.set_param(3, 80.0);
        phaser.set_param(4, 100.0);
        phaser.reset();

        let mut first = impulse_block(2, 128);
        phaser.process(&mut first);
        phaser.process(&mut impulse_block(2, 128));
        phaser.reset();
        let mut again = impulse_block(2, 128);
        phaser.process(&mut again);
        assert_eq!(first, again);
    }

    #[test]
    fn extreme_feedback_stays_bounded() {
        for feedback in [-100.0, 100.0] {
            let mut phaser = Phaser::new();
            phaser.prepare(&ProcessSpec::new(48000.0, 512, 1));
            phaser.set_param(3, feedback);
            phaser.set_param(4, 100.0);
            let mut block = AudioBuffer::new(1, 512);
            for _ in 0..200 {
                block.channel_mut(0).fill(0.5);
                phaser.process(&mut block);
                assert!(block.channel(0).iter().all(|s| s.is_finite() && s.abs() < 50.0));
            }
        }
    }

    #[test]
    fn params_are_in_percent() {
        let mut phaser = Phaser::new();
        phaser.set_param(1, 40.0);
        assert!((phaser.depth() - 0.4).abs() < 1e-6);
        assert!((phaser.get_param(1) - 40.0).abs() < 1e-4);
        phaser.set_param(0, 50.0);
        assert_eq!(phaser.get_param(0), 2.0);
        assert_eq!(phaser.param_info(2).map(|d| d.string_id), Some("phaser_center"));
    }
}
