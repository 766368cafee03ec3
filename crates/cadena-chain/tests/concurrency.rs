//! Control and audio threads running against each other.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use cadena_chain::{ChainOrder, EffectKind, ParameterStore, create_chain, order_channel};
use cadena_core::{AudioBuffer, Effect, ProcessSpec};

/// Orders whose packed words differ in every slot, so a torn read would
/// produce something outside the set.
fn candidate_orders() -> [ChainOrder; 4] {
    [
        ChainOrder::from_tokens("0,1,2,3,4"),
        ChainOrder::from_tokens("4,3,2,1,0"),
        ChainOrder::from_tokens("1,2,3,4,0"),
        ChainOrder::from_tokens("3,4,0,1,2"),
    ]
}

#[test]
fn pulled_orders_are_never_torn() {
    let candidates = candidate_orders();
    let (tx, rx) = order_channel(candidates[0]);
    let done = Arc::new(AtomicBool::new(false));

    let reader = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut seen = Vec::new();
            while !done.load(Ordering::Acquire) {
                if let Some(order) = rx.pull() {
                    seen.push(order);
                }
            }
            if let Some(order) = rx.pull() {
                seen.push(order);
            }
            seen
        })
    };

    for i in 0..20_000 {
        tx.push(candidates[i % candidates.len()]);
    }
    let last = candidates[(20_000 - 1) % candidates.len()];
    done.store(true, Ordering::Release);
    let seen = reader.join().unwrap();

    assert!(!seen.is_empty());
    for order in &seen {
        assert!(candidates.contains(order), "torn order {order:?}");
    }
    assert_eq!(*seen.last().unwrap(), last);
    assert_eq!(tx.active(), last);
    let stats = tx.stats();
    assert_eq!(stats.pushes, 20_000);
    assert!(stats.coalesced <= stats.pushes);
}

#[test]
fn parameter_reads_are_whole_values() {
    let store = Arc::new(ParameterStore::new());
    let (kind, index) = store.find("ladder_cutoff").unwrap();
    let allowed = [100.0f32, 1234.5, 19999.0];
    let done = Arc::new(AtomicBool::new(false));

    let writer = {
        let store = Arc::clone(&store);
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut i = 0;
            while !done.load(Ordering::Acquire) {
                store.set(kind, index, allowed[i % allowed.len()]);
                i += 1;
            }
        })
    };

    for _ in 0..50_000 {
        let value = store.get(kind, index);
        assert!(
            value == 20000.0 || allowed.contains(&value),
            "torn value {value}"
        );
    }
    done.store(true, Ordering::Release);
    writer.join().unwrap();
}

#[test]
fn audio_thread_keeps_running_while_control_edits() {
    let (mut control, mut audio) = create_chain();
    audio.prepare(&ProcessSpec::stereo(48000.0, 128));
    let candidates = candidate_orders();
    let done = Arc::new(AtomicBool::new(false));

    let audio_thread = {
        let done = Arc::clone(&done);
        thread::spawn(move || {
            let mut blocks = 0usize;
            let mut block = AudioBuffer::new(2, 128);
            while !done.load(Ordering::Acquire) || blocks < 100 {
                for (i, s) in block.channel_mut(0).iter_mut().enumerate() {
                    *s = ((blocks * 128 + i) as f32 * 0.02).sin() * 0.5;
                }
                block.channel_mut(1).copy_from_slice(&[0.1; 128]);
                audio.process_block(&mut block, 2);
                for channel in block.channels() {
                    assert!(channel.iter().all(|s| s.is_finite()));
                }
                assert!(candidates.contains(&audio.active_order()));
                blocks += 1;
            }
            audio
        })
    };

    for step in 0..2_000 {
        control.set_order(candidates[step % candidates.len()]);
        let store = control.store();
        store.set_by_id("saturator_drive", 1.0 + (step % 50) as f32);
        store.set_by_id("ladder_cutoff", 200.0 + (step % 100) as f32 * 150.0);
        store.set_bypassed(EffectKind::ALL[step % 5], step % 3 == 0);
    }
    let final_order = candidates[1999 % candidates.len()];
    done.store(true, Ordering::Release);
    let mut audio = audio_thread.join().unwrap();

    // One more block picks up anything still pending.
    audio.process_block(&mut AudioBuffer::new(2, 128), 2);
    assert_eq!(audio.active_order(), final_order);
    assert_eq!(control.active_order(), final_order);
    assert!(!control.has_pending_order());
}
