//! Audio-thread side of a chain.

use std::sync::Arc;

use cadena_core::{AudioBuffer, Effect, ProcessSpec};

use crate::channel::OrderReceiver;
use crate::kind::{EffectKind, N};
use crate::module::EffectModule;
use crate::order::ChainOrder;
use crate::store::ParameterStore;

/// Runs the five effect modules in the active order, one block at a time.
///
/// Owns every module and the receiving half of the order channel, and reads
/// parameters and bypass flags from the shared [`ParameterStore`]. Move it to
/// the audio thread; nothing in [`process_block`](Self::process_block)
/// allocates, locks or logs.
///
/// Per block:
///
/// 1. take a pending order from the channel, if any; it stays active until
///    the next one arrives
/// 2. configure each module in the active order from the store
/// 3. zero the channels that carry no input
/// 4. run each non-bypassed slot in order, in place
#[derive(Debug)]
pub struct ChainProcessor {
    /// Indexed by [`EffectKind::ordinal`].
    modules: [EffectModule; N],
    order: ChainOrder,
    receiver: OrderReceiver,
    store: Arc<ParameterStore>,
    spec: Option<ProcessSpec>,
}

impl ChainProcessor {
    /// Creates a processor running `initial` until the channel delivers
    /// another order.
    pub fn new(receiver: OrderReceiver, store: Arc<ParameterStore>, initial: ChainOrder) -> Self {
        Self {
            modules: EffectKind::ALL.map(EffectModule::new),
            order: initial,
            receiver,
            store,
            spec: None,
        }
    }

    /// Processes one block in place.
    ///
    /// `input_channels` is how many leading channels of `buffer` carry host
    /// input; the rest are zeroed before the chain runs.
    pub fn process_block(&mut self, buffer: &mut AudioBuffer, input_channels: usize) {
        if let Some(order) = self.receiver.pull() {
            self.order = order;
        }

        for kind in self.order.iter() {
            self.modules[kind.ordinal()].configure(&self.store);
        }

        buffer.clear_from(input_channels);

        for kind in self.order.iter() {
            if !self.store.is_bypassed(kind) {
                self.modules[kind.ordinal()].process(buffer);
            }
        }
    }

    /// Order used by the most recent block.
    pub fn active_order(&self) -> ChainOrder {
        self.order
    }

    /// Spec of the last [`prepare`](Effect::prepare), if any.
    pub fn spec(&self) -> Option<ProcessSpec> {
        self.spec
    }

    /// The module for `kind`.
    pub fn module(&self, kind: EffectKind) -> &EffectModule {
        &self.modules[kind.ordinal()]
    }

    /// Shared parameter store.
    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }
}

impl Effect for ChainProcessor {
    /// Prepares all five modules, whether or not they are in the order.
    fn prepare(&mut self, spec: &ProcessSpec) {
        tracing::info!(
            sample_rate = spec.sample_rate,
            max_block_size = spec.max_block_size,
            num_channels = spec.num_channels,
            "preparing chain"
        );
        for module in &mut self.modules {
            module.prepare(spec);
        }
        self.spec = Some(*spec);
    }

    /// Treats every channel of `buffer` as input.
    fn process(&mut self, buffer: &mut AudioBuffer) {
        let channels = buffer.num_channels();
        self.process_block(buffer, channels);
    }

    fn reset(&mut self) {
        tracing::info!("resetting chain");
        for module in &mut self.modules {
            module.reset();
        }
    }

    /// Sum over the enabled slots of the active order.
    fn latency_samples(&self) -> usize {
        self.order
            .iter()
            .filter(|&kind| !self.store.is_bypassed(kind))
            .map(|kind| self.modules[kind.ordinal()].latency_samples())
            .sum()
    }
}
