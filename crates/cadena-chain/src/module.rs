//! Tagged dispatch over the five effect types.

use cadena_core::{AudioBuffer, Effect, ParamDescriptor, ParameterInfo, ProcessSpec};
use cadena_effects::{Chorus, LadderFilter, ParametricFilter, Phaser, Saturator};

use crate::kind::EffectKind;
use crate::store::ParameterStore;

/// One long-lived effect instance of a known kind.
#[derive(Debug, Clone)]
pub enum EffectModule {
    /// [`EffectKind::Phase`].
    Phase(Phaser),
    /// [`EffectKind::Chorus`].
    Chorus(Chorus),
    /// [`EffectKind::Saturator`].
    Saturator(Saturator),
    /// [`EffectKind::LadderFilter`].
    LadderFilter(LadderFilter),
    /// [`EffectKind::ParametricFilter`].
    ParametricFilter(ParametricFilter),
}

/// Runs `$body` with `$fx` bound to the inner effect of any variant.
macro_rules! dispatch {
    ($module:expr, $fx:ident => $body:expr) => {
        match $module {
            EffectModule::Phase($fx) => $body,
            EffectModule::Chorus($fx) => $body,
            EffectModule::Saturator($fx) => $body,
            EffectModule::LadderFilter($fx) => $body,
            EffectModule::ParametricFilter($fx) => $body,
        }
    };
}

impl EffectModule {
    /// Creates the effect for `kind` with its default settings.
    pub fn new(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Phase => Self::Phase(Phaser::new()),
            EffectKind::Chorus => Self::Chorus(Chorus::new()),
            EffectKind::Saturator => Self::Saturator(Saturator::new()),
            EffectKind::LadderFilter => Self::LadderFilter(LadderFilter::new()),
            EffectKind::ParametricFilter => Self::ParametricFilter(ParametricFilter::new()),
        }
    }

    /// Kind of the wrapped effect.
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Phase(_) => EffectKind::Phase,
            Self::Chorus(_) => EffectKind::Chorus,
            Self::Saturator(_) => EffectKind::Saturator,
            Self::LadderFilter(_) => EffectKind::LadderFilter,
            Self::ParametricFilter(_) => EffectKind::ParametricFilter,
        }
    }

    /// Every parameter descriptor in index order.
    pub fn descriptors(&self) -> Vec<ParamDescriptor> {
        (0..self.param_count())
            .filter_map(|i| self.param_info(i))
            .collect()
    }

    /// Copies this module's current binding values out of `store`.
    ///
    /// Real-time safe: one atomic load and one setter call per parameter.
    #[inline]
    pub fn configure(&mut self, store: &ParameterStore) {
        let kind = self.kind();
        for index in 0..store.param_count(kind) {
            self.set_param(index, store.get(kind, index));
        }
    }
}

impl Effect for EffectModule {
    fn prepare(&mut self, spec: &ProcessSpec) {
        dispatch!(self, fx => fx.prepare(spec))
    }

    #[inline]
    fn process(&mut self, buffer: &mut AudioBuffer) {
        dispatch!(self, fx => fx.process(buffer))
    }

    fn reset(&mut self) {
        dispatch!(self, fx => fx.reset())
    }

    fn latency_samples(&self) -> usize {
        dispatch!(self, fx => fx.latency_samples())
    }
}

impl ParameterInfo for EffectModule {
    fn param_count(&self) -> usize {
        dispatch!(self, fx => fx.param_count())
    }

    fn param_info(&self, index: usize) -> Option<ParamDescriptor> {
        dispatch!(self, fx => fx.param_info(index))
    }

    fn get_param(&self, index: usize) -> f32 {
        dispatch!(self, fx => fx.get_param(index))
    }

    fn set_param(&mut self, index: usize, value: f32) {
        dispatch!(self, fx => fx.set_param(index, value))
    }
}
