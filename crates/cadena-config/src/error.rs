//! Error types for preset operations.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::validation::ValidationError;

/// Errors from loading, saving or applying a [`ChainPreset`](crate::ChainPreset).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A preset file could not be read
    #[error("cannot read preset '{}': {source}", path.display())]
    ReadPreset {
        /// The preset file.
        path: PathBuf,
        #[source]
        /// The I/O failure.
        source: io::Error,
    },

    /// A preset file could not be written
    #[error("cannot write preset '{}': {source}", path.display())]
    WritePreset {
        /// The preset file.
        path: PathBuf,
        #[source]
        /// The I/O failure.
        source: io::Error,
    },

    /// The directory a preset is saved into could not be created
    #[error("cannot create preset directory '{}': {source}", path.display())]
    PresetDir {
        /// The directory.
        path: PathBuf,
        #[source]
        /// The I/O failure.
        source: io::Error,
    },

    /// The TOML did not describe a preset
    #[error("malformed preset TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The preset could not be encoded
    #[error("cannot encode preset as TOML: {0}")]
    Encode(#[from] toml::ser::Error),

    /// No factory preset, file or user preset matched the name
    #[error("no preset named '{0}'")]
    PresetNotFound(String),

    /// The preset names effects or parameters the chain does not have
    #[error("invalid preset: {0}")]
    Invalid(#[from] ValidationError),
}

impl ConfigError {
    pub(crate) fn reading(path: &Path, source: io::Error) -> Self {
        Self::ReadPreset {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn writing(path: &Path, source: io::Error) -> Self {
        Self::WritePreset {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(crate) fn creating_dir(path: &Path, source: io::Error) -> Self {
        Self::PresetDir {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Path of the file or directory involved, for I/O failures.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::ReadPreset { path, .. }
            | Self::WritePreset { path, .. }
            | Self::PresetDir { path, .. } => Some(path),
            _ => None,
        }
    }
}
