//! Lock-free parameter values and bypass flags shared by both sides of a
//! chain.
//!
//! [`ParameterStore`] holds one atomic cell per parameter of every effect,
//! built from the effects' own [`ParameterInfo`](cadena_core::ParameterInfo)
//! tables, plus one bypass flag per effect. The control side writes at any
//! time; the audio thread reads once per block. Every scalar read is whole,
//! but there is no snapshot across parameters.
//!
//! Values are in descriptor units (percent, Hz, dB). Closed-choice
//! parameters live in an [`AtomicChoice`] and read back as the option index.

use std::sync::atomic::{AtomicBool, Ordering};

use cadena_core::{AtomicChoice, AtomicF32, ParamDescriptor, ParamUnit};

use crate::kind::{EffectKind, N};
use crate::module::EffectModule;

/// One parameter's shared value.
#[derive(Debug)]
pub enum ParamCell {
    /// Continuous value.
    Float(AtomicF32),
    /// Closed-choice option index.
    Choice(AtomicChoice),
}

impl ParamCell {
    fn for_descriptor(desc: &ParamDescriptor) -> Self {
        if desc.is_choice() {
            let count = desc.choice_count().min(usize::from(u8::MAX)) as u8;
            ParamCell::Choice(AtomicChoice::new(desc.default as u8, count))
        } else {
            ParamCell::Float(AtomicF32::new(desc.default))
        }
    }

    /// Current value; choices read as their index.
    #[inline]
    pub fn load(&self) -> f32 {
        match self {
            ParamCell::Float(cell) => cell.load(),
            ParamCell::Choice(cell) => f32::from(cell.load()),
        }
    }

    /// Stores an already clamped value.
    #[inline]
    fn store(&self, value: f32) {
        match self {
            ParamCell::Float(cell) => cell.store(value),
            ParamCell::Choice(cell) => cell.store(value as u8),
        }
    }
}

#[derive(Debug)]
struct EffectParams {
    descriptors: Vec<ParamDescriptor>,
    cells: Vec<ParamCell>,
    bypass: AtomicBool,
}

/// Every parameter binding and bypass flag of a chain.
///
/// ```rust
/// use cadena_chain::{EffectKind, ParameterStore};
///
/// let store = ParameterStore::new();
/// let (kind, index) = store.find("chorus_mix").unwrap();
/// assert_eq!(kind, EffectKind::Chorus);
/// assert_eq!(store.get(kind, index), 5.0);
///
/// store.set(kind, index, 250.0);
/// assert_eq!(store.get(kind, index), 100.0);
/// assert_eq!(store.format_value(kind, index), "100%");
/// ```
#[derive(Debug)]
pub struct ParameterStore {
    effects: [EffectParams; N],
}

impl ParameterStore {
    /// Builds the store from each effect's descriptors, every value at its
    /// declared default and nothing bypassed.
    pub fn new() -> Self {
        Self {
            effects: EffectKind::ALL.map(|kind| {
                let descriptors = EffectModule::new(kind).descriptors();
                let cells = descriptors.iter().map(ParamCell::for_descriptor).collect();
                EffectParams {
                    descriptors,
                    cells,
                    bypass: AtomicBool::new(false),
                }
            }),
        }
    }

    fn effect(&self, kind: EffectKind) -> &EffectParams {
        &self.effects[kind.ordinal()]
    }

    /// Number of parameters of `kind`.
    pub fn param_count(&self, kind: EffectKind) -> usize {
        self.effect(kind).descriptors.len()
    }

    /// Descriptors of `kind`, in index order.
    pub fn descriptors(&self, kind: EffectKind) -> &[ParamDescriptor] {
        &self.effect(kind).descriptors
    }

    /// Descriptor of one parameter.
    pub fn descriptor(&self, kind: EffectKind, index: usize) -> Option<&ParamDescriptor> {
        self.effect(kind).descriptors.get(index)
    }

    /// Current value. Out-of-range indices read `0.0`.
    #[inline]
    pub fn get(&self, kind: EffectKind, index: usize) -> f32 {
        self.effect(kind).cells.get(index).map_or(0.0, ParamCell::load)
    }

    /// Sets a value, clamped to the descriptor range; choices snap to the
    /// nearest option. Returns `false` for an out-of-range index.
    pub fn set(&self, kind: EffectKind, index: usize, value: f32) -> bool {
        let params = self.effect(kind);
        match (params.descriptors.get(index), params.cells.get(index)) {
            (Some(desc), Some(cell)) => {
                cell.store(desc.clamp(value));
                true
            }
            _ => false,
        }
    }

    /// Current value mapped onto 0–1 by the descriptor's scale.
    pub fn get_normalized(&self, kind: EffectKind, index: usize) -> f32 {
        self.descriptor(kind, index)
            .map_or(0.0, |desc| desc.normalize(self.get(kind, index)))
    }

    /// Sets a value from 0–1 through the descriptor's scale.
    pub fn set_normalized(&self, kind: EffectKind, index: usize, normalized: f32) -> bool {
        match self.descriptor(kind, index) {
            Some(desc) => self.set(kind, index, desc.denormalize(normalized)),
            None => false,
        }
    }

    /// Finds a parameter by string id (e.g. `"ladder_cutoff"`).
    pub fn find(&self, string_id: &str) -> Option<(EffectKind, usize)> {
        EffectKind::ALL.into_iter().find_map(|kind| {
            self.effect(kind)
                .descriptors
                .iter()
                .position(|d| d.string_id == string_id)
                .map(|index| (kind, index))
        })
    }

    /// Sets a parameter by string id. Returns `false` if no parameter has
    /// that id.
    pub fn set_by_id(&self, string_id: &str, value: f32) -> bool {
        self.find(string_id)
            .is_some_and(|(kind, index)| self.set(kind, index, value))
    }

    /// Reads a parameter by string id.
    pub fn get_by_id(&self, string_id: &str) -> Option<f32> {
        self.find(string_id).map(|(kind, index)| self.get(kind, index))
    }

    /// Effect whose bypass flag has this id (e.g. `"ladder_bypass"`).
    pub fn find_bypass(&self, string_id: &str) -> Option<EffectKind> {
        EffectKind::ALL
            .into_iter()
            .find(|kind| kind.bypass_id() == string_id)
    }

    /// Returns `true` if `kind` is bypassed.
    #[inline]
    pub fn is_bypassed(&self, kind: EffectKind) -> bool {
        self.effect(kind).bypass.load(Ordering::Acquire)
    }

    /// Sets the bypass flag of `kind`.
    pub fn set_bypassed(&self, kind: EffectKind, bypassed: bool) {
        self.effect(kind).bypass.store(bypassed, Ordering::Release);
    }

    /// Returns every value to its declared default and clears every bypass.
    pub fn reset_to_defaults(&self) {
        for params in &self.effects {
            for (desc, cell) in params.descriptors.iter().zip(&params.cells) {
                cell.store(desc.default);
            }
            params.bypass.store(false, Ordering::Release);
        }
    }

    /// Display text for the current value: the option label for choices,
    /// otherwise the number with its unit suffix.
    pub fn format_value(&self, kind: EffectKind, index: usize) -> String {
        match self.descriptor(kind, index) {
            Some(desc) => format_param(desc, self.get(kind, index)),
            None => String::new(),
        }
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Formats `value` the way `desc` would display it.
///
/// ```rust
/// use cadena_chain::format_param;
/// use cadena_core::ParamDescriptor;
///
/// let cutoff = ParamDescriptor::frequency_hz("Cutoff", "Cutoff", 20.0, 20000.0, 1000.0);
/// assert_eq!(format_param(&cutoff, 440.0), "440 Hz");
/// assert_eq!(format_param(&cutoff, 2500.0), "2.50 kHz");
/// ```
pub fn format_param(desc: &ParamDescriptor, value: f32) -> String {
    if let Some(label) = desc.label(value) {
        return label.to_string();
    }
    match desc.unit {
        ParamUnit::Hertz if value >= 1000.0 => format!("{:.2} kHz", value / 1000.0),
        ParamUnit::Hertz if value < 10.0 => format!("{value:.2} Hz"),
        ParamUnit::Hertz => format!("{value:.0} Hz"),
        ParamUnit::Decibels => format!("{value:.1} dB"),
        ParamUnit::Milliseconds => format!("{value:.1} ms"),
        ParamUnit::Percent => format!("{value:.0}%"),
        ParamUnit::Ratio => format!("{value:.1}:1"),
        ParamUnit::None => format!("{value:.2}"),
    }
}
