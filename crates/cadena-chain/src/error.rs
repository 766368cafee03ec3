//! Error types for order parsing and state decoding.

use thiserror::Error;

/// An effect name or ordinal that matches no [`EffectKind`](crate::EffectKind).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown effect '{token}'")]
pub struct ParseKindError {
    /// The text that failed to parse.
    pub token: String,
}

/// Failure of strict [`ChainOrder`](crate::ChainOrder) parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderParseError {
    /// The order did not list exactly one entry per slot.
    #[error("expected {expected} effects in the order, found {found}")]
    WrongLength {
        /// Slots in a chain.
        expected: usize,
        /// Entries supplied.
        found: usize,
    },

    /// An entry named no effect.
    #[error("position {position}: {source}")]
    UnknownKind {
        /// Zero-based slot of the bad entry.
        position: usize,
        /// What failed to parse.
        #[source]
        source: ParseKindError,
    },
}

/// Failure to encode or decode a [`ChainState`](crate::ChainState).
#[derive(Debug, Error)]
pub enum StateError {
    /// The blob was not valid state JSON.
    #[error("invalid chain state: {0}")]
    Json(#[from] serde_json::Error),

    /// The blob was written by a newer format.
    #[error("unsupported chain state version {found} (this build reads up to {supported})")]
    UnsupportedVersion {
        /// Version in the blob.
        found: u32,
        /// Highest version understood.
        supported: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn display_messages() {
        let err = OrderParseError::WrongLength {
            expected: 5,
            found: 3,
        };
        assert_eq!(err.to_string(), "expected 5 effects in the order, found 3");

        let err = OrderParseError::UnknownKind {
            position: 2,
            source: ParseKindError {
                token: "reverb".into(),
            },
        };
        assert_eq!(err.to_string(), "position 2: unknown effect 'reverb'");
        assert!(err.source().is_some());
    }

    #[test]
    fn state_error_wraps_json() {
        let json_err = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = StateError::from(json_err);
        assert!(err.to_string().starts_with("invalid chain state"));
        assert!(err.source().is_some());

        let err = StateError::UnsupportedVersion {
            found: 9,
            supported: 1,
        };
        assert!(err.to_string().contains("version 9"));
        assert!(err.source().is_none());
    }
}
