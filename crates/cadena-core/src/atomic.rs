//! Lock-free cells for control values shared with the audio thread.
//!
//! Each semantic type gets its own cell. Floats live as IEEE-754 bits in an
//! `AtomicU32`, closed-choice enumerations as an index in an `AtomicU8`, and
//! on/off flags use `core::sync::atomic::AtomicBool` directly. A load always
//! returns a value some store committed in full; there is no cross-cell
//! consistency.
//!
//! Stores use `Release` and loads use `Acquire`, matching the ordering used for
//! every other cross-thread value in the chain.

use core::sync::atomic::{AtomicU8, AtomicU32, Ordering};

/// An `f32` that can be shared between threads without locking.
///
/// ```rust
/// use cadena_core::AtomicF32;
///
/// let cell = AtomicF32::new(0.25);
/// cell.store(1.5);
/// assert_eq!(cell.load(), 1.5);
/// ```
#[derive(Debug)]
pub struct AtomicF32 {
    bits: AtomicU32,
}

impl AtomicF32 {
    /// Creates a cell holding `value`.
    pub const fn new(value: f32) -> Self {
        Self {
            bits: AtomicU32::new(value.to_bits()),
        }
    }

    /// Reads the current value.
    #[inline]
    pub fn load(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Acquire))
    }

    /// Replaces the current value.
    #[inline]
    pub fn store(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Release);
    }
}

impl Default for AtomicF32 {
    fn default() -> Self {
        Self::new(0.0)
    }
}

/// Index into a closed list of options, shared between threads.
///
/// The option count is fixed at construction; stores are clamped to the last
/// valid index so a reader never sees an out-of-range choice.
///
/// ```rust
/// use cadena_core::AtomicChoice;
///
/// let mode = AtomicChoice::new(0, 4);
/// mode.store(2);
/// assert_eq!(mode.load(), 2);
/// mode.store(9);
/// assert_eq!(mode.load(), 3);
/// ```
#[derive(Debug)]
pub struct AtomicChoice {
    index: AtomicU8,
    count: u8,
}

impl AtomicChoice {
    /// Creates a cell for `count` options, starting at `initial`.
    ///
    /// A `count` of zero is treated as one option.
    pub fn new(initial: u8, count: u8) -> Self {
        let count = count.max(1);
        Self {
            index: AtomicU8::new(initial.min(count - 1)),
            count,
        }
    }

    /// Number of options.
    pub fn count(&self) -> u8 {
        self.count
    }

    /// Reads the selected index.
    #[inline]
    pub fn load(&self) -> u8 {
        self.index.load(Ordering::Acquire)
    }

    /// Selects an option, clamping to the last valid index.
    #[inline]
    pub fn store(&self, index: u8) {
        self.index.store(index.min(self.count - 1), Ordering::Release);
    }
}
