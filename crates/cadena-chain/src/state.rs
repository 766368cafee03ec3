//! Persisted chain state: the order plus every parameter binding and bypass
//! flag, as versioned JSON.
//!
//! ```json
//! {
//!   "version": 1,
//!   "order": "4,3,2,1,0",
//!   "params": { "chorus_mix": 5.0, "ladder_cutoff": 20000.0, ... },
//!   "bypass": { "chorus_bypass": false, ... }
//! }
//! ```
//!
//! Decoding is lenient in content: an order token that names nothing falls
//! back per slot, a missing parameter takes its default, an unknown key is
//! ignored and an out-of-range value is clamped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::StateError;
use crate::kind::EffectKind;
use crate::order::ChainOrder;
use crate::store::ParameterStore;

/// Format version written by this build.
pub const STATE_VERSION: u32 = 1;

fn current_version() -> u32 {
    STATE_VERSION
}

/// Snapshot of everything a chain persists.
///
/// Values are stored as `f64`, which holds every `f32` exactly, so a
/// capture/apply round trip restores bit-identical parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainState {
    /// Format version.
    #[serde(default = "current_version")]
    pub version: u32,
    /// Order as comma-joined ordinals.
    #[serde(default)]
    pub order: String,
    /// Parameter values by string id, in descriptor units.
    #[serde(default)]
    pub params: BTreeMap<String, f64>,
    /// Bypass flags by id (`"<effect>_bypass"`).
    #[serde(default)]
    pub bypass: BTreeMap<String, bool>,
}

impl Default for ChainState {
    fn default() -> Self {
        Self {
            version: STATE_VERSION,
            order: ChainOrder::identity().to_token_string(),
            params: BTreeMap::new(),
            bypass: BTreeMap::new(),
        }
    }
}

impl ChainState {
    /// Reads every binding in `store` alongside `order`.
    pub fn capture(store: &ParameterStore, order: ChainOrder) -> Self {
        let mut params = BTreeMap::new();
        let mut bypass = BTreeMap::new();
        for kind in EffectKind::ALL {
            for (index, desc) in store.descriptors(kind).iter().enumerate() {
                params.insert(
                    desc.string_id.to_string(),
                    f64::from(store.get(kind, index)),
                );
            }
            bypass.insert(kind.bypass_id().to_string(), store.is_bypassed(kind));
        }
        Self {
            version: STATE_VERSION,
            order: order.to_token_string(),
            params,
            bypass,
        }
    }

    /// Decoded order. See [`ChainOrder::from_tokens`].
    pub fn order(&self) -> ChainOrder {
        ChainOrder::from_tokens(&self.order)
    }

    /// Writes every binding into `store`.
    ///
    /// Parameters absent from the state return to their defaults and absent
    /// bypass flags are cleared, so the store ends up fully determined by
    /// the state. Returns how many keys named nothing and were skipped.
    pub fn apply_params(&self, store: &ParameterStore) -> usize {
        store.reset_to_defaults();
        let mut unknown = 0;
        for (id, &value) in &self.params {
            if !store.set_by_id(id, value as f32) {
                tracing::debug!(id = %id, "ignoring unknown parameter in state");
                unknown += 1;
            }
        }
        for (id, &bypassed) in &self.bypass {
            match store.find_bypass(id) {
                Some(kind) => store.set_bypassed(kind, bypassed),
                None => {
                    tracing::debug!(id = %id, "ignoring unknown bypass flag in state");
                    unknown += 1;
                }
            }
        }
        unknown
    }

    /// Compact JSON.
    pub fn to_json(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Indented JSON, for files meant to be read.
    pub fn to_json_pretty(&self) -> Result<String, StateError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parses a blob, rejecting malformed JSON and newer format versions.
    pub fn from_json(blob: &str) -> Result<Self, StateError> {
        let state: Self = serde_json::from_str(blob)?;
        if state.version > STATE_VERSION {
            return Err(StateError::UnsupportedVersion {
                found: state.version,
                supported: STATE_VERSION,
            });
        }
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_lists_every_binding() {
        let store = ParameterStore::new();
        let state = ChainState::capture(&store, ChainOrder::identity());
        let total: usize = EffectKind::ALL.iter().map(|&k| store.param_count(k)).sum();
        assert_eq!(state.params.len(), total);
        assert_eq!(state.bypass.len(), 5);
        assert_eq!(state.order, "0,1,2,3,4");
        assert_eq!(state.version, STATE_VERSION);
    }

    #[test]
    fn apply_restores_values_exactly() {
        let store = ParameterStore::new();
        store.set_by_id("ladder_cutoff", 1234.567);
        store.set_by_id("phaser_rate", 0.123_456_7);
        store.set_bypassed(EffectKind::Chorus, true);
        let json = ChainState::capture(&store, ChainOrder::identity())
            .to_json()
            .unwrap();

        let other = ParameterStore::new();
        let unknown = ChainState::from_json(&json).unwrap().apply_params(&other);
        assert_eq!(unknown, 0);
        for kind in EffectKind::ALL {
            for i in 0..store.param_count(kind) {
                assert_eq!(other.get(kind, i).to_bits(), store.get(kind, i).to_bits());
            }
            assert_eq!(other.is_bypassed(kind), store.is_bypassed(kind));
        }
    }

    #[test]
    fn missing_fields_fall_back() {
        let state = ChainState::from_json("{}").unwrap();
        assert_eq!(state.version, STATE_VERSION);
        assert_eq!(state.order(), ChainOrder::identity());

        let store = ParameterStore::new();
        store.set_by_id("chorus_mix", 80.0);
        store.set_bypassed(EffectKind::Phase, true);
        state.apply_params(&store);
        assert_eq!(store.get_by_id("chorus_mix"), Some(5.0));
        assert!(!store.is_bypassed(EffectKind::Phase));
    }

    #[test]
    fn unknown_keys_are_counted_and_values_clamped() {
        let blob = r#"{"version":1,"order":"4,3,2,1,0",
            "params":{"reverb_size":3.0,"filter_gain":99.0},
            "bypass":{"delay_bypass":true,"filter_bypass":true}}"#;
        let state = ChainState::from_json(blob).unwrap();
        let store = ParameterStore::new();
        assert_eq!(state.apply_params(&store), 2);
        assert_eq!(store.get_by_id("filter_gain"), Some(24.0));
        assert!(store.is_bypassed(EffectKind::ParametricFilter));
        assert_eq!(state.order().to_token_string(), "4,3,2,1,0");
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = ChainState::from_json(r#"{"version":2}"#).unwrap_err();
        assert!(matches!(
            err,
            StateError::UnsupportedVersion {
                found: 2,
                supported: 1
            }
        ));
        assert!(matches!(
            ChainState::from_json("not json"),
            Err(StateError::Json(_))
        ));
    }
}
