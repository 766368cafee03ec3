//! Four-pole ladder filter with selectable response.
//!
//! The input is driven through `tanh`, then through four one-pole sections
//! with a saturated resonance path from the last section back to the input.
//! Each mode is a weighted sum of the input node and the four section
//! outputs, so one topology gives 12 and 24 dB/octave low-, high- and
//! band-pass responses.

use core::f32::consts::TAU;

use cadena_core::{
    AudioBuffer, Effect, ParamDescriptor, ParamId, ParamScale, ParamUnit, ProcessSpec,
    SmoothedParam, flush_denormal, impl_params, limit_frequency,
};
use libm::{expf, powf, tanhf};

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Smoothing time for cutoff and resonance, long enough to hide block-rate
/// steps in a sweep.
const SMOOTHING_MS: f32 = 50.0;

/// Ladder response mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LadderMode {
    /// 12 dB/oct low-pass.
    #[default]
    Lpf12,
    /// 12 dB/oct high-pass.
    Hpf12,
    /// 12 dB/oct band-pass.
    Bpf12,
    /// 24 dB/oct low-pass.
    Lpf24,
    /// 24 dB/oct high-pass.
    Hpf24,
    /// 24 dB/oct band-pass.
    Bpf24,
}

impl LadderMode {
    /// Display labels, indexed by [`LadderMode::index`].
    pub const LABELS: &'static [&'static str] = &["LPF12", "HPF12", "BPF12", "LPF24", "HPF24", "BPF24"];

    /// Mode for an option index; out-of-range indices pick the last mode.
    pub fn from_index(index: usize) -> Self {
        match index {
            0 => Self::Lpf12,
            1 => Self::Hpf12,
            2 => Self::Bpf12,
            3 => Self::Lpf24,
            4 => Self::Hpf24,
            _ => Self::Bpf24,
        }
    }

    /// Option index of this mode.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Stage weights (input node, then four sections) and the share of the
    /// input subtracted from the resonance path.
    fn mix(self) -> ([f32; 5], f32) {
        let (weights, comp) = match self {
            Self::Lpf12 => ([0.0, 0.0, 1.0, 0.0, 0.0], 0.5),
            Self::Hpf12 => ([1.0, -2.0, 1.0, 0.0, 0.0], 0.0),
            Self::Bpf12 => ([0.0, 0.0, -1.0, 1.0, 0.0], 0.5),
            Self::Lpf24 => ([0.0, 0.0, 0.0, 0.0, 1.0], 0.5),
            Self::Hpf24 => ([1.0, -4.0, 6.0, -4.0, 1.0], 0.0),
            Self::Bpf24 => ([0.0, 0.0, 1.0, -2.0, 1.0], 0.5),
        };
        (weights.map(|w| w * 1.2), comp)
    }
}

/// Level compensation for a drive amount.
#[inline]
fn drive_gain(drive: f32) -> f32 {
    powf(drive, -2.642) * 0.6103 + 0.3903
}

/// Ladder filter effect.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Mode | LPF12, HPF12, BPF12, LPF24, HPF24, BPF24 | LPF12 |
/// | 1 | Cutoff | 20–20000 Hz | 20000.0 |
/// | 2 | Resonance | 0–100% | 0.0 |
/// | 3 | Drive | 1–100 | 1.0 |
///
/// # Example
///
/// ```rust
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
/// use cadena_effects::{LadderFilter, LadderMode};
///
/// let mut ladder = LadderFilter::new();
/// ladder.set_mode(LadderMode::Lpf24);
/// ladder.set_cutoff(800.0);
/// ladder.set_resonance(0.3);
/// ladder.prepare(&ProcessSpec::stereo(48000.0, 128));
///
/// let mut block = AudioBuffer::new(2, 128);
/// ladder.process(&mut block);
/// ```
#[derive(Debug, Clone)]
pub struct LadderFilter {
    mode: LadderMode,
    cutoff: f32,
    resonance: f32,
    drive: f32,
    sample_rate: f32,
    channels: Vec<LadderChannel>,
}

#[derive(Debug, Clone)]
struct LadderChannel {
    /// Input node followed by the four section outputs.
    state: [f32; 5],
    /// `exp(-2π·fc/fs)`, the one-pole feedback coefficient.
    cutoff_transform: SmoothedParam,
    /// Resonance mapped onto 0.1–1.
    scaled_resonance: SmoothedParam,
}

impl LadderFilter {
    /// Creates a fully open LPF12 ladder.
    pub fn new() -> Self {
        Self {
            mode: LadderMode::Lpf12,
            cutoff: 20000.0,
            resonance: 0.0,
            drive: 1.0,
            sample_rate: 48000.0,
            channels: Vec::new(),
        }
    }

    /// Selects the response mode.
    pub fn set_mode(&mut self, mode: LadderMode) {
        self.mode = mode;
    }

    /// Current response mode.
    pub fn mode(&self) -> LadderMode {
        self.mode
    }

    /// Sets the cutoff in Hz (20–20000).
    pub fn set_cutoff(&mut self, cutoff_hz: f32) {
        self.cutoff = cutoff_hz.clamp(20.0, 20000.0);
    }

    /// Cutoff in Hz.
    pub fn cutoff(&self) -> f32 {
        self.cutoff
    }

    /// Sets the resonance as a fraction (0–1).
    pub fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance.clamp(0.0, 1.0);
    }

    /// Resonance as a fraction.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Sets the input drive (1–100).
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(1.0, 100.0);
    }

    /// Input drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    fn cutoff_transform(&self) -> f32 {
        let fc = limit_frequency(self.cutoff, self.sample_rate);
        expf(-TAU * fc / self.sample_rate)
    }

    fn scaled_resonance(&self) -> f32 {
        0.1 + 0.9 * self.resonance
    }
}

impl Default for LadderFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for LadderFilter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        let transform = self.cutoff_transform();
        let resonance = self.scaled_resonance();
        self.channels = (0..spec.num_channels)
            .map(|_| LadderChannel {
                state: [0.0; 5],
                cutoff_transform: SmoothedParam::with_config(transform, spec.sample_rate, SMOOTHING_MS),
                scaled_resonance: SmoothedParam::with_config(resonance, spec.sample_rate, SMOOTHING_MS),
            })
            .collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let (weights, comp) = self.mode.mix();
        let drive = self.drive;
        let gain = drive_gain(drive);
        let drive2 = drive * 0.04 + 0.96;
        let gain2 = drive_gain(drive2);
        let transform = self.cutoff_transform();
        let resonance = self.scaled_resonance();

        for (ch, samples) in self.channels.iter_mut().zip(buffer.channels_mut()) {
            ch.cutoff_transform.set_target(transform);
            ch.scaled_resonance.set_target(resonance);

            for sample in samples.iter_mut() {
                let a1 = ch.cutoff_transform.advance();
                let res = ch.scaled_resonance.advance();
                let g = 1.0 - a1;
                let b0 = g * 0.769_230_77;
                let b1 = g * 0.230_769_23;
                let s = &mut ch.state;

                let dx = gain * tanhf(drive * *sample);
                let a = dx + res * -4.0 * (gain2 * tanhf(drive2 * s[4]) - dx * comp);
                let b = b1 * s[0] + a1 * s[1] + b0 * a;
                let c = b1 * s[1] + a1 * s[2] + b0 * b;
                let d = b1 * s[2] + a1 * s[3] + b0 * c;
                let e = b1 * s[3] + a1 * s[4] + b0 * d;
                *s = [a, b, c, d, e].map(flush_denormal);

                *sample = weights[0] * a
                    + weights[1] * b
                    + weights[2] * c
                    + weights[3] * d
                    + weights[4] * e;
            }
        }
    }

    fn reset(&mut self) {
        let transform = self.cutoff_transform();
        let resonance = self.scaled_resonance();
        for ch in &mut self.channels {
            ch.state = [0.0; 5];
            ch.cutoff_transform.set_immediate(transform);
            ch.scaled_resonance.set_immediate(resonance);
        }
    }
}

impl_params! {
    LadderFilter, this {
        [0] ParamDescriptor::choice("Mode", "Mode", LadderMode::LABELS, 0)
                .with_id(ParamId(400), "ladder_mode"),
            get: this.mode.index() as f32,
            set: |v| this.set_mode(LadderMode::from_index(libm::roundf(v.max(0.0)) as usize));

        [1] ParamDescriptor::frequency_hz("Cutoff", "Cutoff", 20.0, 20000.0, 20000.0)
                .with_id(ParamId(401), "ladder_cutoff"),
            get: this.cutoff,
            set: |v| this.set_cutoff(v);

        [2] ParamDescriptor::custom("Resonance", "Reso", 0.0, 100.0, 0.0)
                .with_unit(ParamUnit::Percent)
                .with_id(ParamId(402), "ladder_resonance"),
            get: this.resonance * 100.0,
            set: |v| this.set_resonance(v / 100.0);

        [3] ParamDescriptor::custom("Drive", "Drive", 1.0, 100.0, 1.0)
                .with_unit(ParamUnit::Ratio)
                .with_scale(ParamScale::Logarithmic)
                .with_id(ParamId(403), "ladder_drive"),
            get: this.drive,
            set: |v| this.set_drive(v);
    }
}
