//! Normalised tanh saturation.
//!
//! `y = tanh(drive·x) / tanh(drive)`. Dividing by `tanh(drive)` keeps a
//! full-scale input at full scale whatever the drive, so raising the drive
//! thickens the sound without a matching jump in peak level.

use cadena_core::{
    AudioBuffer, Effect, ParamDescriptor, ParamId, ParamScale, ParamUnit, ProcessSpec,
    SmoothedParam, impl_params,
};
use libm::tanhf;

#[cfg(not(feature = "std"))]
use alloc::vec::Vec;

/// Drive-controlled waveshaper.
///
/// ## Parameter Indices (`ParameterInfo`)
///
/// | Index | Name | Range | Default |
/// |-------|------|-------|---------|
/// | 0 | Drive | 1–100 | 1.0 |
#[derive(Debug, Clone)]
pub struct Saturator {
    drive: f32,
    drive_smoothers: Vec<SmoothedParam>,
}

impl Saturator {
    /// Creates a saturator at drive 1.
    pub fn new() -> Self {
        Self {
            drive: 1.0,
            drive_smoothers: Vec::new(),
        }
    }

    /// Sets the drive (1–100).
    pub fn set_drive(&mut self, drive: f32) {
        self.drive = drive.clamp(1.0, 100.0);
    }

    /// Current drive.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Applies the transfer curve to one sample.
    ///
    /// ```rust
    /// use cadena_effects::Saturator;
    ///
    /// assert!((Saturator::shape(1.0, 10.0) - 1.0).abs() < 1e-6);
    /// assert_eq!(Saturator::shape(0.0, 10.0), 0.0);
    /// assert!(Saturator::shape(0.1, 10.0) > 0.1);
    /// ```
    #[inline]
    pub fn shape(x: f32, drive: f32) -> f32 {
        tanhf(drive * x) / tanhf(drive)
    }
}

impl Default for Saturator {
    fn default() -> Self {
        Self::new()
    }
}

impl Effect for Saturator {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.drive_smoothers = (0..spec.num_channels)
            .map(|_| SmoothedParam::standard(self.drive, spec.sample_rate))
            .collect();
    }

    fn process(&mut self, buffer: &mut AudioBuffer) {
        let drive = self.drive;
        for (smoother, samples) in self.drive_smoothers.iter_mut().zip(buffer.channels_mut()) {
            smoother.set_target(drive);
            for sample in samples.iter_mut() {
                *sample = Self::shape(*sample, smoother.advance());
            }
        }
    }

    fn reset(&mut self) {
        for smoother in &mut self.drive_smoothers {
            smoother.set_immediate(self.drive);
        }
    }
}

impl_params! {
    Saturator, this {
        [0] ParamDescriptor::custom("Drive", "Drive", 1.0, 100.0, 1.0)
                .with_unit(ParamUnit::Ratio)
                .with_scale(ParamScale::Logarithmic)
                .with_id(ParamId(300), "saturator_drive"),
            get: this.drive,
            set: |v| this.set_drive(v);
    }
}
