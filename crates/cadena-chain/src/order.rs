//! Processing order of a chain.

use core::fmt;
use core::str::FromStr;

use crate::error::OrderParseError;
use crate::kind::{EffectKind, N};

/// Bits per slot in the packed form.
const SLOT_BITS: u32 = 3;
const SLOT_MASK: u32 = (1 << SLOT_BITS) - 1;

/// Which effect runs in which position.
///
/// Exactly [`N`] slots. A permutation is expected but not required: a kind
/// listed twice runs twice per block, a kind left out never runs.
/// Orders are values; edits return a new order.
///
/// ```rust
/// use cadena_chain::{ChainOrder, EffectKind};
///
/// let order: ChainOrder = "filter, ladder, saturator, chorus, phase".parse().unwrap();
/// assert_eq!(order.kinds()[0], EffectKind::ParametricFilter);
/// assert_eq!(order.to_token_string(), "4,3,2,1,0");
/// assert!(order.is_permutation());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainOrder([EffectKind; N]);

impl ChainOrder {
    /// `Phase, Chorus, Saturator, LadderFilter, ParametricFilter`.
    pub const fn identity() -> Self {
        Self(EffectKind::ALL)
    }

    /// Wraps an explicit slot list.
    pub const fn new(kinds: [EffectKind; N]) -> Self {
        Self(kinds)
    }

    /// Slots in processing order.
    pub fn kinds(&self) -> &[EffectKind; N] {
        &self.0
    }

    /// Iterates slots in processing order.
    pub fn iter(&self) -> impl Iterator<Item = EffectKind> + '_ {
        self.0.iter().copied()
    }

    /// First position holding `kind`.
    pub fn position_of(&self, kind: EffectKind) -> Option<usize> {
        self.0.iter().position(|&k| k == kind)
    }

    /// Returns `true` if every kind appears exactly once.
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; N];
        for kind in self.0 {
            if seen[kind.ordinal()] {
                return false;
            }
            seen[kind.ordinal()] = true;
        }
        true
    }

    /// Order with positions `a` and `b` exchanged. Out-of-range positions
    /// leave the order unchanged.
    #[must_use]
    pub fn swap(self, a: usize, b: usize) -> Self {
        let mut kinds = self.0;
        if a < N && b < N {
            kinds.swap(a, b);
        }
        Self(kinds)
    }

    /// Order with the entry at `from` moved to `to`, shifting the entries in
    /// between. Out-of-range positions leave the order unchanged.
    ///
    /// ```rust
    /// use cadena_chain::ChainOrder;
    ///
    /// let moved = ChainOrder::identity().with_moved(4, 0);
    /// assert_eq!(moved.to_token_string(), "4,0,1,2,3");
    /// ```
    #[must_use]
    pub fn with_moved(self, from: usize, to: usize) -> Self {
        let mut kinds = self.0;
        if from < N && to < N {
            if from < to {
                kinds[from..=to].rotate_left(1);
            } else {
                kinds[to..=from].rotate_right(1);
            }
        }
        Self(kinds)
    }

    /// Comma-joined ordinals, the persisted form (`"0,1,2,3,4"`).
    pub fn to_token_string(&self) -> String {
        self.0
            .iter()
            .map(|k| k.ordinal().to_string())
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Lenient decoding of a comma-separated token list.
    ///
    /// Each slot takes the kind its token names; a missing, unparsable or
    /// out-of-range token at position `i` falls back to the kind with
    /// ordinal `i`. Extra tokens are ignored. Never fails.
    ///
    /// ```rust
    /// use cadena_chain::ChainOrder;
    ///
    /// assert_eq!(ChainOrder::from_tokens("4,3").to_token_string(), "4,3,2,3,4");
    /// assert_eq!(ChainOrder::from_tokens("9,x,,1,0").to_token_string(), "0,1,2,1,0");
    /// assert_eq!(ChainOrder::from_tokens(""), ChainOrder::identity());
    /// ```
    pub fn from_tokens(tokens: &str) -> Self {
        let mut parts = tokens.split(',');
        let mut kinds = EffectKind::ALL;
        for slot in &mut kinds {
            if let Some(kind) = parts.next().and_then(EffectKind::parse) {
                *slot = kind;
            }
        }
        Self(kinds)
    }

    /// Packs into the low `3 × N` bits of a word.
    pub(crate) const fn pack(self) -> u32 {
        let mut bits = 0;
        let mut i = 0;
        while i < N {
            bits |= (self.0[i] as u32) << (i as u32 * SLOT_BITS);
            i += 1;
        }
        bits
    }

    /// Inverse of [`pack`](Self::pack). Slot values that name no kind fall
    /// back to identity, matching [`from_tokens`](Self::from_tokens).
    pub(crate) const fn unpack(bits: u32) -> Self {
        let mut kinds = EffectKind::ALL;
        let mut i = 0;
        while i < N {
            let ordinal = (bits >> (i as u32 * SLOT_BITS)) & SLOT_MASK;
            if let Some(kind) = EffectKind::from_ordinal(ordinal as usize) {
                kinds[i] = kind;
            }
            i += 1;
        }
        Self(kinds)
    }
}

impl Default for ChainOrder {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[EffectKind; N]> for ChainOrder {
    fn from(kinds: [EffectKind; N]) -> Self {
        Self(kinds)
    }
}

impl fmt::Display for ChainOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, kind) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" → ")?;
            }
            f.write_str(kind.display_name())?;
        }
        Ok(())
    }
}

/// Strict parsing: exactly [`N`] comma-separated entries, each an ordinal,
/// short id or display name.
impl FromStr for ChainOrder {
    type Err = OrderParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split(',').collect();
        if tokens.len() != N {
            return Err(OrderParseError::WrongLength {
                expected: N,
                found: tokens.len(),
            });
        }
        let mut kinds = EffectKind::ALL;
        for (position, (slot, token)) in kinds.iter_mut().zip(tokens).enumerate() {
            *slot = token
                .parse()
                .map_err(|source| OrderParseError::UnknownKind { position, source })?;
        }
        Ok(Self(kinds))
    }
}
