//! Preset management for cadena chains.
//!
//! A [`ChainPreset`] is a TOML description of a whole chain: processing order,
//! bypass flags and parameter values. Presets come from the factory set
//! bundled in this crate or from user files, are checked against the chain's
//! own parameter tables, and are applied through a
//! [`ChainController`](cadena_chain::ChainController).
//!
//! # Example
//!
//! ```rust
//! use cadena_chain::{EffectKind, create_chain};
//! use cadena_config::{ChainPreset, find_factory};
//!
//! let (mut control, _audio) = create_chain();
//! find_factory("wide_chorus").unwrap().apply(&mut control).unwrap();
//! assert_eq!(control.store().get_by_id("chorus_mix"), Some(50.0));
//!
//! let preset = ChainPreset::from_toml(r#"
//! name = "Dark"
//! order = ["filter", "ladder", "saturator", "chorus", "phase"]
//! [effects.ladder.params]
//! cutoff = 400.0
//! "#).unwrap();
//! preset.apply(&mut control).unwrap();
//! assert!(!control.store().is_bypassed(EffectKind::Phase));
//! ```

mod error;
mod preset;

/// User preset directory and name lookup.
pub mod paths;

/// Preset validation.
pub mod validation;

/// Factory presets bundled with the library.
pub mod factory_presets;

pub use error::ConfigError;
pub use factory_presets::{FACTORY_PRESET_NAMES, factory_presets, find_factory, is_factory_preset};
pub use paths::{list_user_presets, load_preset, load_preset_from, user_presets_dir};
pub use preset::{ChainPreset, EffectSettings, KindToken};
pub use validation::{ValidationError, validate_preset};
