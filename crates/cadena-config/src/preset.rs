//! Preset file format and operations.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use cadena_chain::{ChainController, ChainOrder, EffectKind, N};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::{ValidationError, param_index, validate_preset};

/// One order entry as written in a preset: an effect id, display name or
/// ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KindToken {
    /// Zero-based ordinal.
    Ordinal(u32),
    /// Id (`"ladder"`) or display name (`"Ladder Filter"`).
    Name(String),
}

impl KindToken {
    /// The effect this entry names, if any.
    pub fn resolve(&self) -> Option<EffectKind> {
        match self {
            KindToken::Ordinal(n) => EffectKind::from_ordinal(*n as usize),
            KindToken::Name(name) => EffectKind::parse(name),
        }
    }
}

impl From<EffectKind> for KindToken {
    fn from(kind: EffectKind) -> Self {
        KindToken::Name(kind.id().to_string())
    }
}

impl fmt::Display for KindToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KindToken::Ordinal(n) => write!(f, "{n}"),
            KindToken::Name(name) => f.write_str(name),
        }
    }
}

/// Bypass flag and parameter values for one effect.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSettings {
    /// Skip this effect.
    #[serde(default, skip_serializing_if = "is_false")]
    pub bypass: bool,
    /// Values by parameter id, with or without the effect prefix.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f32>,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A named chain configuration: order, bypass flags and parameter values.
///
/// Anything a preset leaves out takes its default when applied, so applying
/// a preset always yields the same chain regardless of what ran before.
///
/// # TOML Format
///
/// ```toml
/// name = "Wide Chorus"
/// description = "Slow, deep chorus ahead of a gentle phaser"
/// order = ["chorus", "phase", "saturator", "ladder", "filter"]
///
/// [effects.chorus.params]
/// chorus_depth = 40.0
/// mix = 50.0
///
/// [effects.phase]
/// bypass = true
/// ```
///
/// `order` entries and effect keys take ids, display names or ordinals;
/// parameter keys may drop the effect prefix. An empty `order` means
/// identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainPreset {
    /// Name of the preset.
    pub name: String,

    /// Optional description of the preset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Processing order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub order: Vec<KindToken>,

    /// Settings by effect.
    #[serde(default)]
    pub effects: BTreeMap<String, EffectSettings>,
}

impl ChainPreset {
    /// Create a new empty preset.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            order: Vec::new(),
            effects: BTreeMap::new(),
        }
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the processing order.
    pub fn with_order(mut self, order: ChainOrder) -> Self {
        self.order = order.iter().map(KindToken::from).collect();
        self
    }

    /// Set the bypass flag of one effect.
    pub fn with_bypass(mut self, kind: EffectKind, bypass: bool) -> Self {
        self.settings_mut(kind).bypass = bypass;
        self
    }

    /// Set one parameter value.
    pub fn with_param(mut self, kind: EffectKind, param: impl Into<String>, value: f32) -> Self {
        self.settings_mut(kind).params.insert(param.into(), value);
        self
    }

    fn settings_mut(&mut self, kind: EffectKind) -> &mut EffectSettings {
        let key = self
            .effects
            .keys()
            .find(|key| EffectKind::parse(key) == Some(kind))
            .cloned()
            .unwrap_or_else(|| kind.id().to_string());
        self.effects.entry(key).or_default()
    }

    /// Settings for `kind`, whatever key the file used for it.
    pub fn settings(&self, kind: EffectKind) -> Option<&EffectSettings> {
        self.effects
            .iter()
            .find(|(key, _)| EffectKind::parse(key) == Some(kind))
            .map(|(_, settings)| settings)
    }

    /// Load a preset from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::reading(path, e))?;
        let preset = Self::from_toml(&content)?;
        tracing::info!(path = %path.display(), name = %preset.name, "preset file loaded");
        Ok(preset)
    }

    /// Load a preset from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Save the preset to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::creating_dir(parent, e))?;
        }

        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::writing(path, e))?;
        Ok(())
    }

    /// Convert the preset to a TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// See [`validate_preset`].
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_preset(self)
    }

    /// The processing order, identity if none is given.
    pub fn chain_order(&self) -> Result<ChainOrder, ValidationError> {
        if self.order.is_empty() {
            return Ok(ChainOrder::identity());
        }
        if self.order.len() != N {
            return Err(ValidationError::OrderLength {
                expected: N,
                found: self.order.len(),
            });
        }
        let mut kinds = EffectKind::ALL;
        for (slot, token) in kinds.iter_mut().zip(&self.order) {
            *slot = token
                .resolve()
                .ok_or_else(|| ValidationError::UnknownEffect(token.to_string()))?;
        }
        Ok(ChainOrder::new(kinds))
    }

    /// Validates, then writes every binding and the order into the chain.
    ///
    /// On error the chain is left untouched.
    pub fn apply(&self, controller: &mut ChainController) -> Result<(), ConfigError> {
        self.validate()?;
        let order = self.chain_order()?;

        let store = controller.store();
        store.reset_to_defaults();
        for kind in EffectKind::ALL {
            let Some(settings) = self.settings(kind) else {
                continue;
            };
            store.set_bypassed(kind, settings.bypass);
            for (param, &value) in &settings.params {
                if let Some(index) = param_index(store, kind, param) {
                    store.set(kind, index, value);
                }
            }
        }
        controller.set_order(order);
        tracing::info!(preset = %self.name, order = %order, "preset applied");
        Ok(())
    }

    /// Snapshot of a running chain: its requested order, every bypass flag
    /// and every parameter under its full id.
    pub fn capture(name: impl Into<String>, controller: &ChainController) -> Self {
        let store = controller.store();
        let mut preset = Self::new(name).with_order(controller.requested_order());
        for kind in EffectKind::ALL {
            let settings = EffectSettings {
                bypass: store.is_bypassed(kind),
                params: store
                    .descriptors(kind)
                    .iter()
                    .enumerate()
                    .map(|(index, desc)| (desc.string_id.to_string(), store.get(kind, index)))
                    .collect(),
            };
            preset.effects.insert(kind.id().to_string(), settings);
        }
        preset
    }
}

impl Default for ChainPreset {
    fn default() -> Self {
        Self::new("Untitled")
    }
}
