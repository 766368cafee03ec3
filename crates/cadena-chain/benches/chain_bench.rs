//! Criterion benchmarks for the full chain
//!
//! Run with: cargo bench -p cadena-chain
#![allow(missing_docs)]

use cadena_chain::{ChainOrder, EffectKind, create_chain};
use cadena_core::{AudioBuffer, Effect, ProcessSpec};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn test_block(size: usize) -> AudioBuffer {
    let signal: Vec<f32> = (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 220.0 * t).sin() * 0.5
        })
        .collect();
    AudioBuffer::from_channels(vec![signal.clone(), signal])
}

fn bench_full_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("Chain");

    for &block_size in BLOCK_SIZES {
        let (control, mut audio) = create_chain();
        control.store().set_by_id("phaser_mix", 50.0);
        control.store().set_by_id("chorus_mix", 50.0);
        control.store().set_by_id("saturator_drive", 4.0);
        audio.prepare(&ProcessSpec::stereo(SAMPLE_RATE, block_size));
        let input = test_block(block_size);

        group.bench_with_input(
            BenchmarkId::from_parameter(block_size),
            &block_size,
            |b, _| {
                let mut block = input.clone();
                b.iter(|| {
                    block.clone_from(&input);
                    audio.process_block(black_box(&mut block), 2);
                    black_box(block.channel(0)[0])
                })
            },
        );
    }

    group.finish();
}

fn bench_reorder_every_block(c: &mut Criterion) {
    let (mut control, mut audio) = create_chain();
    audio.prepare(&ProcessSpec::stereo(SAMPLE_RATE, 256));
    let input = test_block(256);
    let orders = [ChainOrder::identity(), ChainOrder::from_tokens("4,3,2,1,0")];

    c.bench_function("Chain/reorder_256", |b| {
        let mut block = input.clone();
        let mut flip = 0;
        b.iter(|| {
            flip ^= 1;
            control.set_order(orders[flip]);
            block.clone_from(&input);
            audio.process_block(black_box(&mut block), 2);
            black_box(block.channel(0)[0])
        })
    });
}

fn bench_all_bypassed(c: &mut Criterion) {
    let (control, mut audio) = create_chain();
    for kind in EffectKind::ALL {
        control.store().set_bypassed(kind, true);
    }
    audio.prepare(&ProcessSpec::stereo(SAMPLE_RATE, 256));
    let input = test_block(256);

    c.bench_function("Chain/bypassed_256", |b| {
        let mut block = input.clone();
        b.iter(|| {
            block.clone_from(&input);
            audio.process_block(black_box(&mut block), 2);
            black_box(block.channel(0)[0])
        })
    });
}

criterion_group!(
    benches,
    bench_full_chain,
    bench_reorder_every_block,
    bench_all_bypassed
);
criterion_main!(benches);
