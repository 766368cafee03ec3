//! Wait-free single-slot handoff of [`ChainOrder`]s from the control side to
//! the audio thread.
//!
//! The slot is one `AtomicU32` holding a packed order plus a pending bit, so
//! `push` and `pull` are each a single `swap`:
//!
//! - a push that lands on an unconsumed order replaces it (coalescing); only
//!   the newest order is ever delivered
//! - a pull takes the pending order and leaves the slot empty
//! - an order is always read whole, never a mix of two pushes
//!
//! Neither half is `Clone`, so there is exactly one producer and one consumer.

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, AtomicUsize, Ordering};

use crate::order::ChainOrder;

/// Set while the slot holds an order the receiver has not taken.
const PENDING: u32 = 1 << 31;

#[derive(Debug)]
struct Shared {
    slot: AtomicU32,
    /// Packed order the receiver most recently adopted.
    active: AtomicU32,
    pushes: AtomicUsize,
    coalesced: AtomicUsize,
}

/// Push counters, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelStats {
    /// Orders pushed.
    pub pushes: usize,
    /// Pushes that replaced an order the receiver never took.
    pub coalesced: usize,
}

/// Control-side half of the order channel.
#[derive(Debug)]
pub struct OrderSender {
    shared: Arc<Shared>,
}

/// Audio-side half of the order channel.
#[derive(Debug)]
pub struct OrderReceiver {
    shared: Arc<Shared>,
}

/// Creates a connected sender/receiver pair. `initial` is reported as the
/// active order until the receiver adopts another.
///
/// ```rust
/// use cadena_chain::{ChainOrder, order_channel};
///
/// let (tx, rx) = order_channel(ChainOrder::identity());
/// let reversed = ChainOrder::from_tokens("4,3,2,1,0");
///
/// assert!(!tx.push(ChainOrder::identity().swap(0, 1)));
/// assert!(tx.push(reversed)); // displaced the first push
/// assert_eq!(rx.pull(), Some(reversed));
/// assert_eq!(rx.pull(), None);
/// assert_eq!(tx.active(), reversed);
/// ```
pub fn order_channel(initial: ChainOrder) -> (OrderSender, OrderReceiver) {
    let shared = Arc::new(Shared {
        slot: AtomicU32::new(0),
        active: AtomicU32::new(initial.pack()),
        pushes: AtomicUsize::new(0),
        coalesced: AtomicUsize::new(0),
    });
    (
        OrderSender {
            shared: Arc::clone(&shared),
        },
        OrderReceiver { shared },
    )
}

impl OrderSender {
    /// Offers `order` to the receiver. Never blocks.
    ///
    /// Returns `true` if this push displaced an order the receiver had not
    /// yet taken.
    pub fn push(&self, order: ChainOrder) -> bool {
        let previous = self
            .shared
            .slot
            .swap(order.pack() | PENDING, Ordering::AcqRel);
        let displaced = previous & PENDING != 0;
        self.shared.pushes.fetch_add(1, Ordering::Relaxed);
        if displaced {
            self.shared.coalesced.fetch_add(1, Ordering::Relaxed);
        }
        displaced
    }

    /// Returns `true` while a pushed order is waiting for the receiver.
    pub fn has_pending(&self) -> bool {
        self.shared.slot.load(Ordering::Acquire) & PENDING != 0
    }

    /// The order the receiver is running.
    pub fn active(&self) -> ChainOrder {
        ChainOrder::unpack(self.shared.active.load(Ordering::Acquire))
    }

    /// Push counters so far.
    pub fn stats(&self) -> ChannelStats {
        ChannelStats {
            pushes: self.shared.pushes.load(Ordering::Relaxed),
            coalesced: self.shared.coalesced.load(Ordering::Relaxed),
        }
    }
}

impl OrderReceiver {
    /// Takes the pending order, if any. Wait-free and allocation-free.
    ///
    /// A returned order is published as the active order.
    #[inline]
    pub fn pull(&self) -> Option<ChainOrder> {
        let bits = self.shared.slot.swap(0, Ordering::AcqRel);
        if bits & PENDING == 0 {
            return None;
        }
        let order = ChainOrder::unpack(bits & !PENDING);
        self.shared.active.store(order.pack(), Ordering::Release);
        Some(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::EffectKind;

    #[test]
    fn empty_channel_pulls_nothing() {
        let (tx, rx) = order_channel(ChainOrder::identity());
        assert_eq!(rx.pull(), None);
        assert!(!tx.has_pending());
        assert_eq!(tx.active(), ChainOrder::identity());
    }

    #[test]
    fn last_push_wins() {
        let (tx, rx) = order_channel(ChainOrder::identity());
        let ab = ChainOrder::identity();
        let ba = ab.swap(0, 1);
        tx.push(ab);
        tx.push(ba);
        assert!(tx.has_pending());
        assert_eq!(rx.pull(), Some(ba));
        assert!(!tx.has_pending());
        assert_eq!(
            tx.stats(),
            ChannelStats {
                pushes: 2,
                coalesced: 1
            }
        );
    }

    #[test]
    fn order_of_all_one_kind_survives() {
        // Packs to zero bits; the pending flag still marks it as present.
        let all_phase = ChainOrder::new([EffectKind::Phase; 5]);
        let (tx, rx) = order_channel(ChainOrder::identity());
        assert!(!tx.push(all_phase));
        assert_eq!(rx.pull(), Some(all_phase));
        assert_eq!(tx.active(), all_phase);
    }

    #[test]
    fn receiver_works_across_threads() {
        let (tx, rx) = order_channel(ChainOrder::identity());
        let target = ChainOrder::from_tokens("2,0,1,4,3");
        tx.push(target);
        let pulled = std::thread::spawn(move || rx.pull()).join().unwrap();
        assert_eq!(pulled, Some(target));
        assert_eq!(tx.active(), target);
    }
}
