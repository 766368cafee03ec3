//! Property-based tests for orders, the order channel and the store.

use cadena_chain::{ChainOrder, ChainState, EffectKind, ParameterStore, order_channel};
use proptest::prelude::*;

fn any_kind() -> impl Strategy<Value = EffectKind> {
    (0usize..5).prop_map(|i| EffectKind::ALL[i])
}

fn any_order() -> impl Strategy<Value = ChainOrder> {
    prop::array::uniform5(any_kind()).prop_map(ChainOrder::new)
}

fn any_permutation() -> impl Strategy<Value = ChainOrder> {
    Just(EffectKind::ALL.to_vec())
        .prop_shuffle()
        .prop_map(|k| ChainOrder::new([k[0], k[1], k[2], k[3], k[4]]))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// The persisted token form reproduces any order, permutation or not.
    #[test]
    fn tokens_round_trip(order in any_order()) {
        prop_assert_eq!(ChainOrder::from_tokens(&order.to_token_string()), order);
        prop_assert_eq!(order.to_token_string().parse::<ChainOrder>(), Ok(order));
    }

    /// Lenient decoding never fails and always yields five valid slots.
    #[test]
    fn lenient_decoding_is_total(text in ".{0,40}") {
        let order = ChainOrder::from_tokens(&text);
        prop_assert_eq!(order.kinds().len(), 5);
        prop_assert_eq!(ChainOrder::from_tokens(&order.to_token_string()), order);
    }

    /// Swaps and moves keep a permutation a permutation.
    #[test]
    fn edits_preserve_permutations(
        order in any_permutation(),
        a in 0usize..7,
        b in 0usize..7,
    ) {
        prop_assert!(order.swap(a, b).is_permutation());
        prop_assert!(order.with_moved(a, b).is_permutation());
        if a < 5 && b < 5 {
            prop_assert_eq!(order.swap(a, b).kinds()[b], order.kinds()[a]);
            prop_assert_eq!(order.with_moved(a, b).kinds()[b], order.kinds()[a]);
        }
    }

    /// However many orders are pushed between pulls, the pull sees the last.
    #[test]
    fn channel_delivers_latest(orders in prop::collection::vec(any_order(), 1..20)) {
        let (tx, rx) = order_channel(ChainOrder::identity());
        for &order in &orders {
            tx.push(order);
        }
        let last = *orders.last().unwrap();
        prop_assert_eq!(rx.pull(), Some(last));
        prop_assert_eq!(rx.pull(), None);
        prop_assert_eq!(tx.active(), last);
        prop_assert_eq!(tx.stats().coalesced, orders.len() - 1);
    }

    /// Normalized writes land inside the descriptor range and survive a
    /// save/restore exactly.
    #[test]
    fn store_values_survive_state(values in prop::collection::vec(0.0f32..=1.0, 21)) {
        let store = ParameterStore::new();
        let mut n = 0;
        for kind in EffectKind::ALL {
            for index in 0..store.param_count(kind) {
                store.set_normalized(kind, index, values[n % values.len()]);
                let desc = store.descriptor(kind, index).unwrap();
                let v = store.get(kind, index);
                prop_assert!(v >= desc.min && v <= desc.max, "{} = {}", desc.string_id, v);
                n += 1;
            }
        }

        let json = ChainState::capture(&store, ChainOrder::identity()).to_json().unwrap();
        let restored = ParameterStore::new();
        ChainState::from_json(&json).unwrap().apply_params(&restored);
        for kind in EffectKind::ALL {
            for index in 0..store.param_count(kind) {
                prop_assert_eq!(
                    restored.get(kind, index).to_bits(),
                    store.get(kind, index).to_bits()
                );
            }
        }
    }
}
