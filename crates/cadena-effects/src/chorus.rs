//! Chorus built on a modulated fractional delay line.

use cadena_core::{
    AudioBuffer, Effect, InterpolatedDelay, Lfo, ParamDescriptor, ParamId, ProcessSpec,
    SmoothedParam, flush_denormal, impl_params, wet_dry_mix,
};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Longest centre delay in milliseconds.
const MAX_CENTER_MS: f32 = 100.0;

/// Modulation swing in milliseconds at full depth.
const MAX_MOD_MS: f32 = 20.0;

const FEEDBACK_SCALE: f32 = 0.95;

/// LFO phase offset between consecutive channels (90°).
const CHANNEL_PHASE_OFFSET: f32 = 0.25;

/// Chorus effect: one modulated delay voice per channel.
///
/// The delay time swings between the centre delay and
/// `centre + depth × 20 ms`. The second channel's LFO runs a quarter period
/// ahead of the first, which widens a stereo image.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Rate | 0.01–100 Hz | 0.2 |
/// | 1 | Depth | 1–100% | 5.0 |
/// | 2 | Centre Delay | 1–100 ms | 7.0 |
/// | 3 | Feedback | -100–100% | 0.0 |
/// | 4 | Mix | 1–100% | 5.0 |
///
/// # Example
///
/// ```rust
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
/// use cadena_effects::Chorus;
///
/// let mut chorus = Chorus::new();
/// chorus.prepare(&ProcessSpec::stereo(44100.0, 64));
/// chorus.set_rate(1.5);
/// chorus.set_mix(0.5);
///
/// let mut block = AudioBuffer::new(2, 64);
/// chorus.process(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct Chorus {
    rate: f32,
    depth: f32,
    center_delay_ms: f32,
    feedback: f32,
    mix: f32,
    sample_rate: f32,
    channels: Vec<ChorusChannel>,
}

#[derive(Debug, Clone)]
struct ChorusChannel {
    delay: InterpolatedDelay,
    lfo: Lfo,
    /// Smoothed so centre-delay moves glide instead of jumping.
    center_ms: SmoothedParam,
    mix: SmoothedParam,
}

impl Chorus {
    /// Creates a chorus with default settings. Call
    /// [`prepare`](Effect::prepare) before processing.
    pub fn new() -> Self {
        Self {
            rate: 0.2,
            depth: 0.05,
            center_delay_ms: 7.0,
            feedback: 0.0,
            mix: 0.05,
            sample_rate: 48000.0,
            channels: Vec::new(),
        }
    }

    /// Sets the LFO rate in Hz (0.01–100).
    pub fn set_rate(&mut self, rate_hz: f32) {
        self.rate = rate_hz.clamp(0.01, 100.0);
    }

    /// LFO rate in Hz.
    pub fn rate(&self) -> f32 {
        self.rate
    }

    /// Sets the modulation depth as a fraction (0.01–1).
    pub fn set_depth(&mut self, depth: f32) {
        self.depth = depth.clamp(0.01, 1.0);
    }

    /// Modulation depth as a fraction.
    pub fn depth(&self) -> f32 {
        self.depth
    }

    /// Sets the centre delay in milliseconds (1–100).
    pub fn set_center_delay_ms(&mut self, delay_ms: f32) {
        self.center_delay_ms = delay_ms.clamp(1.0, MAX_CENTER_MS);
    }

    /// Centre delay in milliseconds.
    pub fn center_delay_ms(&self) -> f32 {
        self.center_delay_ms
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

impl Default for Chorus {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Chorus {
    fn prepare(&mut self, spec: &ProcessSpec) {
        let sr = spec.sample_rate;
        self.sample_rate = sr;
        let max_seconds = (MAX_CENTER_MS + MAX_MOD_MS) / 1000.0;
        self.channels = (0..spec.num_channels)
            .map(|ch| {
                let mut lfo = Lfo::new(sr, self.rate);
                lfo.set_phase(ch as f32 * CHANNEL_PHASE_OFFSET);
                ChorusChannel {
                    delay: InterpolatedDelay::from_time(sr, max_seconds),
                    lfo,
                    center_ms: SmoothedParam::standard(self.center_delay_ms, sr),
                    mix: SmoothedParam::standard(self.mix, sr),
                }
            })
            .collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let samples_per_ms = self.sample_rate / 1000.0;
        let swing_ms = self.depth * MAX_MOD_MS;
        let feedback = self.feedback * FEEDBACK_SCALE;
        let (rate, center, mix) = (self.rate, self.center_delay_ms, self.mix);

        for (state, samples) in self.channels.iter_mut().zip(buffer.channels_mut()) {
            state.lfo.set_frequency(rate);
            state.center_ms.set_target(center);
            state.mix.set_target(mix);

            for sample in samples.iter_mut() {
                let delay_ms = state.center_ms.advance() + swing_ms * state.lfo.advance_unipolar();
                let dry = *sample;
                let wet = state.delay.read(delay_ms * samples_per_ms);
                state.delay.write(flush_denormal(dry + wet * feedback));
                *sample = wet_dry_mix(dry, wet, state.mix.advance());
            }
        }
    }

    fn reset(&mut self) {
        for state in &mut self.channels {
            state.delay.clear();
            state.lfo.reset();
            state.center_ms.set_immediate(self.center_delay_ms);
            state.mix.set_immediate(self.mix);
        }
    }
}

impl_params! {
    Chorus, this {
        [0] ParamDescriptor::rate_hz(0.01, 100.0, 0.2)
                .with_id(ParamId(200), "chorus_rate"),
            get: this.rate,
            set: |v| this.set_rate(v);

        [1] ParamDescriptor::depth(1.0, 5.0)
                .with_id(ParamId(201), "chorus_depth"),
            get: this.depth * 100.0,
            set: |v| this.set_depth(v / 100.0);

        [2] ParamDescriptor::time_ms("Centre Delay", "Delay", 1.0, MAX_CENTER_MS, 7.0)
                .with_id(ParamId(202), "chorus_center_delay"),
            get: this.center_delay_ms,
            set: |v| this.set_center_delay_ms(v);

        [3] ParamDescriptor::feedback()
                .with_id(ParamId(203), "chorus_feedback"),
            get: this.feedback * 100.0,
            set: |v| this.set_feedback(v / 100.0);

        [4] ParamDescriptor::mix(1.0, 5.0)
                .with_id(ParamId(204), "chorus_mix"),
            get: this.mix * 100.0,
            set: |v| this.set_mix(v / 100.0);
    }
}
