//! Where user presets live, and name-based preset lookup.
//!
//! User presets are `*.toml` files in `<config dir>/cadena/presets/`
//! (`~/.config/cadena/presets/` on Linux). A preset is found by name in this
//! order: factory preset, literal file path, file in the user directory.

use std::path::{Path, PathBuf};

use crate::error::ConfigError;
use crate::factory_presets::find_factory;
use crate::preset::ChainPreset;

const APP_NAME: &str = "cadena";
const PRESETS_SUBDIR: &str = "presets";
const PRESET_EXTENSION: &str = "toml";

/// The user presets directory. Falls back to `./cadena/presets` when the
/// platform has no config directory.
pub fn user_presets_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_NAME)
        .join(PRESETS_SUBDIR)
}

/// `.toml` files directly inside `dir`, sorted. A missing directory lists
/// nothing.
pub fn list_presets_in(dir: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };
    let mut paths: Vec<PathBuf> = entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().is_some_and(|ext| ext == PRESET_EXTENSION)
        })
        .collect();
    paths.sort();
    paths
}

/// Files in [`user_presets_dir`].
pub fn list_user_presets() -> Vec<PathBuf> {
    list_presets_in(&user_presets_dir())
}

/// File stem of a preset path (`"warm"` for `presets/warm.toml`).
pub fn preset_name_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(str::to_string)
}

/// `<dir>/<name>.toml` if it exists.
pub fn find_preset_in(dir: &Path, name: &str) -> Option<PathBuf> {
    let path = dir.join(format!("{name}.{PRESET_EXTENSION}"));
    path.is_file().then_some(path)
}

/// Resolves `name` to a preset, searching factory presets, then `name` as a
/// path, then `user_dir`.
pub fn load_preset_from(name: &str, user_dir: &Path) -> Result<ChainPreset, ConfigError> {
    if let Some(preset) = find_factory(name) {
        tracing::info!(preset = %preset.name, "using factory preset");
        return Ok(preset);
    }
    let literal = Path::new(name);
    if literal.is_file() {
        return ChainPreset::load(literal);
    }
    if let Some(path) = find_preset_in(user_dir, name) {
        tracing::info!(path = %path.display(), "using user preset");
        return ChainPreset::load(path);
    }
    Err(ConfigError::PresetNotFound(name.to_string()))
}

/// [`load_preset_from`] with the user presets directory.
pub fn load_preset(name: &str) -> Result<ChainPreset, ConfigError> {
    load_preset_from(name, &user_presets_dir())
}
