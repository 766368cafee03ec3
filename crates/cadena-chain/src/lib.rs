//! Cadena Chain - a reorderable five-stage effect chain
//!
//! One instance each of the [`cadena_effects`] stages runs in series, in an
//! order that can change while audio is running. The chain is split in two:
//!
//! - [`ChainProcessor`] lives on the audio thread and owns the effects. Per
//!   block it adopts the newest requested order, copies parameter values into
//!   the effects and runs every non-bypassed slot in place.
//! - [`ChainController`] lives on the control side. It requests orders,
//!   edits parameters and bypass flags through the shared
//!   [`ParameterStore`], and saves or restores [`ChainState`].
//!
//! The two sides never lock. Orders travel through a single-slot channel
//! ([`order_channel`]) where a newer request replaces an unconsumed one;
//! parameters are individual atomics.
//!
//! ## Example
//!
//! ```rust
//! use cadena_chain::{ChainOrder, EffectKind, create_chain};
//! use cadena_core::{AudioBuffer, Effect, ProcessSpec};
//!
//! let (mut control, mut audio) = create_chain();
//! audio.prepare(&ProcessSpec::stereo(48000.0, 128));
//!
//! control.store().set_by_id("ladder_cutoff", 800.0);
//! control.store().set_bypassed(EffectKind::Chorus, true);
//! control.set_order("filter,ladder,saturator,chorus,phase".parse().unwrap());
//!
//! let mut block = AudioBuffer::new(2, 128);
//! block.channel_mut(0).fill(0.1);
//! audio.process_block(&mut block, 1);
//!
//! assert_eq!(audio.active_order(), control.requested_order());
//! assert!(block.channel(1).iter().all(|s| s.is_finite()));
//!
//! let saved = control.save_state_json().unwrap();
//! control.restore_state(&saved);
//! ```

pub mod channel;
pub mod controller;
pub mod error;
pub mod kind;
pub mod module;
pub mod order;
pub mod processor;
pub mod state;
pub mod store;

pub use channel::{ChannelStats, OrderReceiver, OrderSender, order_channel};
pub use controller::{ChainController, create_chain};
pub use error::{OrderParseError, ParseKindError, StateError};
pub use kind::{EffectKind, N};
pub use module::EffectModule;
pub use order::ChainOrder;
pub use processor::ChainProcessor;
pub use state::{ChainState, STATE_VERSION};
pub use store::{ParamCell, ParameterStore, format_param};
