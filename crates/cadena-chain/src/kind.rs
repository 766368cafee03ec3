//! The closed set of effects a chain can hold.

use core::fmt;
use core::str::FromStr;

use crate::error::ParseKindError;

/// Number of slots in a chain and of effect kinds.
pub const N: usize = 5;

/// Identity of one processing stage.
///
/// The ordinal doubles as the slot value in a [`ChainOrder`](crate::ChainOrder)
/// and as the index of the module in the processor's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EffectKind {
    /// LFO-swept allpass phaser.
    Phase = 0,
    /// Modulated delay chorus.
    Chorus = 1,
    /// tanh saturator.
    Saturator = 2,
    /// Four-pole ladder filter.
    LadderFilter = 3,
    /// Single-band biquad filter.
    ParametricFilter = 4,
}

impl EffectKind {
    /// Every kind in ordinal order.
    pub const ALL: [EffectKind; N] = [
        EffectKind::Phase,
        EffectKind::Chorus,
        EffectKind::Saturator,
        EffectKind::LadderFilter,
        EffectKind::ParametricFilter,
    ];

    /// Zero-based ordinal.
    #[inline]
    pub const fn ordinal(self) -> usize {
        self as usize
    }

    /// Kind for an ordinal, or `None` past the last kind.
    #[inline]
    pub const fn from_ordinal(ordinal: usize) -> Option<Self> {
        if ordinal < N {
            Some(Self::ALL[ordinal])
        } else {
            None
        }
    }

    /// Short stable identifier used in presets and on the command line.
    pub const fn id(self) -> &'static str {
        match self {
            Self::Phase => "phase",
            Self::Chorus => "chorus",
            Self::Saturator => "saturator",
            Self::LadderFilter => "ladder",
            Self::ParametricFilter => "filter",
        }
    }

    /// Human-readable name.
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Phase => "Phaser",
            Self::Chorus => "Chorus",
            Self::Saturator => "Saturator",
            Self::LadderFilter => "Ladder Filter",
            Self::ParametricFilter => "Parametric Filter",
        }
    }

    /// String id of this effect's bypass flag.
    pub const fn bypass_id(self) -> &'static str {
        match self {
            Self::Phase => "phaser_bypass",
            Self::Chorus => "chorus_bypass",
            Self::Saturator => "saturator_bypass",
            Self::LadderFilter => "ladder_bypass",
            Self::ParametricFilter => "filter_bypass",
        }
    }

    /// Parses a short id, an ordinal, or a display name, ignoring ASCII case
    /// and surrounding whitespace.
    ///
    /// ```rust
    /// use cadena_chain::EffectKind;
    ///
    /// assert_eq!(EffectKind::parse("ladder"), Some(EffectKind::LadderFilter));
    /// assert_eq!(EffectKind::parse(" 4 "), Some(EffectKind::ParametricFilter));
    /// assert_eq!(EffectKind::parse("Parametric Filter"), Some(EffectKind::ParametricFilter));
    /// assert_eq!(EffectKind::parse("reverb"), None);
    /// ```
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        if let Ok(ordinal) = text.parse::<usize>() {
            return Self::from_ordinal(ordinal);
        }
        Self::ALL.into_iter().find(|kind| {
            kind.id().eq_ignore_ascii_case(text)
                || kind.display_name().eq_ignore_ascii_case(text)
                || kind.bypass_id().trim_end_matches("_bypass").eq_ignore_ascii_case(text)
        })
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for EffectKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ParseKindError {
            token: s.trim().to_string(),
        })
    }
}
