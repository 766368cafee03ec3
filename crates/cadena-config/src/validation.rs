//! Preset validation against the chain's effect and parameter tables.
//!
//! A preset is valid when its order lists exactly one entry per slot, every
//! entry and effect key names a known effect, no effect is configured twice,
//! and every parameter exists on its effect with a value inside the declared
//! range.
//!
//! ```rust
//! use cadena_config::{ChainPreset, ValidationError};
//!
//! let preset = ChainPreset::from_toml(r#"
//! name = "Bad"
//! [effects.reverb]
//! bypass = true
//! "#).unwrap();
//!
//! assert_eq!(
//!     preset.validate(),
//!     Err(ValidationError::UnknownEffect("reverb".into()))
//! );
//! ```

use cadena_chain::{EffectKind, N, ParameterStore};
use thiserror::Error;

use crate::preset::ChainPreset;

/// Why a preset cannot be applied.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    /// Name or ordinal that matches no effect.
    #[error("unknown effect '{0}'")]
    UnknownEffect(String),

    /// The order does not have one entry per slot.
    #[error("order lists {found} effects, expected {expected}")]
    OrderLength {
        /// Slots in a chain.
        expected: usize,
        /// Entries in the preset.
        found: usize,
    },

    /// Two effect tables resolve to the same effect.
    #[error("effect '{0}' is configured more than once")]
    DuplicateEffect(String),

    /// Parameter id not found on the effect.
    #[error("unknown parameter '{param}' for effect '{effect}'")]
    UnknownParameter {
        /// Effect id.
        effect: String,
        /// Parameter key as written.
        param: String,
    },

    /// Parameter value outside its declared range.
    #[error("parameter '{param}' value {value} out of range [{min}, {max}]")]
    OutOfRange {
        /// Parameter string id.
        param: String,
        /// The rejected value.
        value: f32,
        /// Minimum allowed value.
        min: f32,
        /// Maximum allowed value.
        max: f32,
    },

    /// More than one problem.
    #[error("{}", .0.iter().map(ToString::to_string).collect::<Vec<_>>().join("; "))]
    Multiple(Vec<ValidationError>),
}

impl ValidationError {
    fn collect(mut errors: Vec<ValidationError>) -> Result<(), ValidationError> {
        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}

/// Index of the parameter `key` names on `kind`.
///
/// Accepts the full string id (`"ladder_cutoff"`) or the id without the
/// effect prefix (`"cutoff"`).
pub fn param_index(store: &ParameterStore, kind: EffectKind, key: &str) -> Option<usize> {
    let prefix = kind.bypass_id().trim_end_matches("bypass");
    let descriptors = store.descriptors(kind);
    descriptors
        .iter()
        .position(|d| d.string_id == key)
        .or_else(|| {
            descriptors
                .iter()
                .position(|d| d.string_id.strip_prefix(prefix) == Some(key))
        })
}

/// Checks every order entry, effect key and parameter in `preset`,
/// reporting all problems at once.
pub fn validate_preset(preset: &ChainPreset) -> Result<(), ValidationError> {
    let store = ParameterStore::new();
    let mut errors = Vec::new();

    if !preset.order.is_empty() {
        if preset.order.len() != N {
            errors.push(ValidationError::OrderLength {
                expected: N,
                found: preset.order.len(),
            });
        }
        for token in &preset.order {
            if token.resolve().is_none() {
                errors.push(ValidationError::UnknownEffect(token.to_string()));
            }
        }
    }

    let mut seen = [false; N];
    for (key, settings) in &preset.effects {
        let Some(kind) = EffectKind::parse(key) else {
            errors.push(ValidationError::UnknownEffect(key.clone()));
            continue;
        };
        if seen[kind.ordinal()] {
            errors.push(ValidationError::DuplicateEffect(kind.id().to_string()));
        }
        seen[kind.ordinal()] = true;

        for (param, &value) in &settings.params {
            let Some(index) = param_index(&store, kind, param) else {
                errors.push(ValidationError::UnknownParameter {
                    effect: kind.id().to_string(),
                    param: param.clone(),
                });
                continue;
            };
            let Some(desc) = store.descriptor(kind, index) else {
                continue;
            };
            if !(value >= desc.min && value <= desc.max) {
                errors.push(ValidationError::OutOfRange {
                    param: desc.string_id.to_string(),
                    value,
                    min: desc.min,
                    max: desc.max,
                });
            }
        }
    }

    ValidationError::collect(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn param_keys_with_or_without_prefix() {
        let store = ParameterStore::new();
        let full = param_index(&store, EffectKind::LadderFilter, "ladder_cutoff");
        let short = param_index(&store, EffectKind::LadderFilter, "cutoff");
        assert!(full.is_some());
        assert_eq!(full, short);
        assert_eq!(
            param_index(&store, EffectKind::Phase, "rate"),
            param_index(&store, EffectKind::Phase, "phaser_rate")
        );
        assert_eq!(param_index(&store, EffectKind::Chorus, "phaser_rate"), None);
    }

    #[test]
    fn empty_preset_is_valid() {
        assert_eq!(validate_preset(&ChainPreset::new("Empty")), Ok(()));
    }

    #[test]
    fn reports_every_problem() {
        let preset = ChainPreset::from_toml(
            r#"
name = "Broken"
order = ["chorus", "reverb", 3]

[effects.ladder.params]
cutoff = 5.0
warmth = 1.0

[effects.3]
bypass = true
"#,
        )
        .unwrap();

        let Err(ValidationError::Multiple(errors)) = validate_preset(&preset) else {
            panic!("expected several errors");
        };
        assert!(errors.contains(&ValidationError::OrderLength {
            expected: 5,
            found: 3
        }));
        assert!(errors.contains(&ValidationError::UnknownEffect("reverb".into())));
        assert!(errors.contains(&ValidationError::UnknownParameter {
            effect: "ladder".into(),
            param: "warmth".into(),
        }));
        assert!(errors.contains(&ValidationError::DuplicateEffect("ladder".into())));
        assert!(errors.iter().any(|e| matches!(
            e,
            ValidationError::OutOfRange { param, .. } if param == "ladder_cutoff"
        )));
    }

    #[test]
    fn nan_is_out_of_range() {
        let preset = ChainPreset::new("NaN").with_param(EffectKind::Saturator, "drive", f32::NAN);
        assert!(matches!(
            validate_preset(&preset),
            Err(ValidationError::OutOfRange { .. })
        ));
    }
}
