//! Criterion benchmarks for cadena-core primitives
//!
//! Run with: cargo bench -p cadena-core
#![allow(missing_docs)]

use cadena_core::{AtomicF32, Biquad, InterpolatedDelay, Lfo, peaking_eq_coefficients};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn generate_test_signal(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| {
            let t = i as f32 / SAMPLE_RATE;
            (2.0 * std::f32::consts::PI * 440.0 * t).sin() * 0.5
        })
        .collect()
}

fn bench_biquad(c: &mut Criterion) {
    let mut group = c.benchmark_group("Biquad");
    let coefficients = peaking_eq_coefficients(1000.0, 1.0, 6.0, SAMPLE_RATE);

    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("process", block_size), &block_size, |b, _| {
            let mut biquad = Biquad::new();
            biquad.set_coefficient_tuple(coefficients);
            b.iter(|| {
                for &sample in &input {
                    black_box(biquad.process(black_box(sample)));
                }
            });
        });
    }

    group.bench_function("coefficient_calc", |b| {
        b.iter(|| {
            black_box(peaking_eq_coefficients(
                black_box(1000.0),
                black_box(1.0),
                black_box(6.0),
                black_box(SAMPLE_RATE),
            ))
        });
    });

    group.finish();
}

fn bench_delay_and_lfo(c: &mut Criterion) {
    let mut group = c.benchmark_group("Modulated delay");
    for &block_size in BLOCK_SIZES {
        let input = generate_test_signal(block_size);
        group.bench_with_input(BenchmarkId::new("read_write", block_size), &block_size, |b, _| {
            let mut delay = InterpolatedDelay::from_time(SAMPLE_RATE, 0.15);
            let mut lfo = Lfo::new(SAMPLE_RATE, 0.5);
            b.iter(|| {
                for &sample in &input {
                    let d = 336.0 + lfo.advance() * 240.0;
                    black_box(delay.read(d));
                    delay.write(sample);
                }
            });
        });
    }
    group.finish();
}

fn bench_atomic_reads(c: &mut Criterion) {
    let cells: Vec<AtomicF32> = (0..19).map(|i| AtomicF32::new(i as f32)).collect();
    c.bench_function("atomic_param_sweep", |b| {
        b.iter(|| {
            let mut sum = 0.0;
            for cell in &cells {
                sum += cell.load();
            }
            black_box(sum)
        });
    });
}

criterion_group!(benches, bench_biquad, bench_delay_and_lfo, bench_atomic_reads);
criterion_main!(benches);
