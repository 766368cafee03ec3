//! Control-side handle of a chain.

use std::sync::Arc;

use crate::channel::{ChannelStats, OrderSender, order_channel};
use crate::error::StateError;
use crate::order::ChainOrder;
use crate::processor::ChainProcessor;
use crate::state::ChainState;
use crate::store::ParameterStore;

/// Creates a connected controller and processor sharing one parameter
/// store, both starting at [`ChainOrder::identity`].
///
/// ```rust
/// use cadena_chain::{ChainOrder, create_chain};
/// use cadena_core::{AudioBuffer, Effect, ProcessSpec};
///
/// let (mut control, mut audio) = create_chain();
/// audio.prepare(&ProcessSpec::stereo(48000.0, 256));
///
/// control.store().set_by_id("saturator_drive", 4.0);
/// control.set_order(ChainOrder::from_tokens("4,3,2,1,0"));
///
/// let mut block = AudioBuffer::new(2, 256);
/// audio.process_block(&mut block, 2);
/// assert_eq!(audio.active_order(), control.requested_order());
/// ```
pub fn create_chain() -> (ChainController, ChainProcessor) {
    let initial = ChainOrder::identity();
    let store = Arc::new(ParameterStore::new());
    let (sender, receiver) = order_channel(initial);
    let processor = ChainProcessor::new(receiver, Arc::clone(&store), initial);
    let controller = ChainController {
        sender,
        store,
        requested: initial,
    };
    (controller, processor)
}

/// Edits the order, parameters and bypass flags of a running chain, and
/// saves or restores its state. Lives on the control thread.
#[derive(Debug)]
pub struct ChainController {
    sender: OrderSender,
    store: Arc<ParameterStore>,
    requested: ChainOrder,
}

impl ChainController {
    /// Shared parameter store. Writes take effect at the next block.
    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Requests a new order. The processor adopts it at the start of its
    /// next block; if several requests land between two blocks, only the
    /// last is applied.
    pub fn set_order(&mut self, order: ChainOrder) {
        if !order.is_permutation() {
            tracing::debug!(order = %order.to_token_string(), "order repeats or omits effects");
        }
        let displaced = self.sender.push(order);
        if displaced {
            tracing::debug!("replaced an order the processor had not picked up");
        }
        tracing::debug!(order = %order, "order requested");
        self.requested = order;
    }

    /// Most recently requested order.
    pub fn requested_order(&self) -> ChainOrder {
        self.requested
    }

    /// Order the processor is running.
    pub fn active_order(&self) -> ChainOrder {
        self.sender.active()
    }

    /// Returns `true` while a requested order has not reached the processor.
    pub fn has_pending_order(&self) -> bool {
        self.sender.has_pending()
    }

    /// Order channel counters.
    pub fn channel_stats(&self) -> ChannelStats {
        self.sender.stats()
    }

    /// Captures every binding and bypass flag with the most recently
    /// *requested* order.
    ///
    /// This is not [`active_order`](Self::active_order): an order the processor
    /// has not picked up yet is the one recorded. Restoring pushes it through
    /// the channel like any other request.
    pub fn save_state(&self) -> ChainState {
        let state = ChainState::capture(&self.store, self.requested);
        tracing::info!(order = %state.order, params = state.params.len(), "chain state saved");
        state
    }

    /// [`save_state`](Self::save_state) as compact JSON.
    pub fn save_state_json(&self) -> Result<String, StateError> {
        self.save_state().to_json()
    }

    /// Applies a decoded state: bindings first, then the order.
    pub fn apply_state(&mut self, state: &ChainState) {
        let unknown = state.apply_params(&self.store);
        if unknown > 0 {
            tracing::warn!(unknown, "state named parameters this chain does not have");
        }
        self.set_order(state.order());
    }

    /// Restores a saved blob. Never fails: a blob that cannot be decoded
    /// leaves the chain at identity order with every default.
    pub fn restore_state(&mut self, blob: &str) {
        match ChainState::from_json(blob) {
            Ok(state) => {
                self.apply_state(&state);
                tracing::info!(order = %self.requested, "chain state restored");
            }
            Err(err) => {
                tracing::warn!(error = %err, "discarding unreadable chain state");
                self.apply_state(&ChainState::default());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kind::EffectKind;
    use cadena_core::AudioBuffer;

    #[test]
    fn requested_and_active_order_diverge_until_a_block_runs() {
        let (mut control, mut audio) = create_chain();
        let order = ChainOrder::identity().swap(1, 3);
        control.set_order(order);
        assert_eq!(control.requested_order(), order);
        assert_eq!(control.active_order(), ChainOrder::identity());
        assert!(control.has_pending_order());

        audio.process_block(&mut AudioBuffer::new(2, 8), 2);
        assert_eq!(control.active_order(), order);
        assert!(!control.has_pending_order());
    }

    #[test]
    fn rapid_requests_coalesce() {
        let (mut control, mut audio) = create_chain();
        for a in 0..4 {
            control.set_order(ChainOrder::identity().swap(a, a + 1));
        }
        audio.process_block(&mut AudioBuffer::new(1, 8), 1);
        assert_eq!(audio.active_order(), ChainOrder::identity().swap(3, 4));
        let stats = control.channel_stats();
        assert_eq!((stats.pushes, stats.coalesced), (4, 3));
    }

    #[test]
    fn save_restore_round_trip() {
        let (mut control, _audio) = create_chain();
        control.set_order(ChainOrder::from_tokens("2,4,0,3,1"));
        control.store().set_by_id("filter_freq", 3000.0);
        control.store().set_bypassed(EffectKind::Saturator, true);
        let blob = control.save_state_json().unwrap();

        let (mut fresh, _fresh_audio) = create_chain();
        fresh.restore_state(&blob);
        assert_eq!(fresh.requested_order().to_token_string(), "2,4,0,3,1");
        assert_eq!(fresh.store().get_by_id("filter_freq"), Some(3000.0));
        assert!(fresh.store().is_bypassed(EffectKind::Saturator));
        assert_eq!(fresh.save_state(), control.save_state());
    }

    #[test]
    fn unreadable_state_restores_defaults() {
        let (mut control, _audio) = create_chain();
        control.set_order(ChainOrder::identity().swap(0, 4));
        control.store().set_by_id("chorus_depth", 90.0);
        control.restore_state("{ definitely not json");
        assert_eq!(control.requested_order(), ChainOrder::identity());
        assert_eq!(control.save_state(), {
            let (fresh, _) = create_chain();
            fresh.save_state()
        });
    }
}
