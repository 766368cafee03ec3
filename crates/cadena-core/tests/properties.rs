//! Property-based tests for cadena-core primitives.
//!
//! Covers filter stability, descriptor normalization, atomic cells and the
//! interleave adapters of `AudioBuffer`.

use cadena_core::{
    AtomicChoice, AtomicF32, AudioBuffer, Biquad, InterpolatedDelay, ParamDescriptor, ParamScale,
    SmoothedParam, allpass_coefficients, bandpass_coefficients, notch_coefficients,
    peaking_eq_coefficients,
};
use proptest::prelude::*;

/// Coefficient generators indexed 0..4 (peak, band-pass, notch, all-pass).
fn configure_biquad(biquad: &mut Biquad, variant: usize, freq: f32, q: f32, gain_db: f32) {
    let sr = 48000.0;
    let coefficients = match variant % 4 {
        0 => peaking_eq_coefficients(freq, q, gain_db, sr),
        1 => bandpass_coefficients(freq, q, sr),
        2 => notch_coefficients(freq, q, sr),
        3 => allpass_coefficients(freq, q, sr),
        _ => unreachable!(),
    };
    biquad.set_coefficient_tuple(coefficients);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// Any in-range filter setting stays finite on bounded input.
    #[test]
    fn biquad_stability(
        freq in 20.0f32..20000.0f32,
        q in 0.1f32..10.0f32,
        gain_db in -24.0f32..24.0f32,
        variant in 0usize..4,
        input in prop::array::uniform32(-1.0f32..=1.0f32),
    ) {
        let mut biquad = Biquad::new();
        configure_biquad(&mut biquad, variant, freq, q, gain_db);
        for _ in 0..32 {
            for &sample in &input {
                let out = biquad.process(sample);
                prop_assert!(out.is_finite(), "variant {} freq {} q {} -> {}", variant, freq, q, out);
            }
        }
    }

    /// Normalizing then denormalizing a plain value returns it.
    #[test]
    fn descriptor_normalization_round_trip(value in 20.0f32..20000.0f32, log in any::<bool>()) {
        let mut desc = ParamDescriptor::custom("F", "F", 20.0, 20000.0, 1000.0);
        if log {
            desc = desc.with_scale(ParamScale::Logarithmic);
        }
        let back = desc.denormalize(desc.normalize(value));
        prop_assert!((back - value).abs() <= value * 1e-3, "{} -> {}", value, back);
    }

    /// Normalized values always land in [0, 1], even for out-of-range input.
    #[test]
    fn normalized_is_unit_range(value in -1.0e6f32..1.0e6f32) {
        let desc = ParamDescriptor::feedback();
        let n = desc.normalize(value);
        prop_assert!((0.0..=1.0).contains(&n));
    }

    /// Clamped values are within range for every descriptor kind.
    #[test]
    fn clamp_stays_in_range(value in any::<f32>()) {
        for desc in [
            ParamDescriptor::mix(1.0, 5.0),
            ParamDescriptor::choice("M", "M", &["a", "b", "c"], 0),
            ParamDescriptor::gain_db("G", "G", -24.0, 24.0, 0.0),
        ] {
            let c = desc.clamp(value);
            prop_assert!(c >= desc.min && c <= desc.max, "{} clamped to {}", value, c);
        }
    }

    /// Float cells store the exact bit pattern.
    #[test]
    fn atomic_f32_is_lossless(value in any::<f32>()) {
        let cell = AtomicF32::new(0.0);
        cell.store(value);
        prop_assert_eq!(cell.load().to_bits(), value.to_bits());
    }

    /// Choice cells never hold an index past the option count.
    #[test]
    fn atomic_choice_bounded(count in 1u8..16, index in any::<u8>()) {
        let cell = AtomicChoice::new(0, count);
        cell.store(index);
        prop_assert!(cell.load() < count);
    }

    /// Smoothing never overshoots the target.
    #[test]
    fn smoothing_is_monotonic(start in -10.0f32..10.0, target in -10.0f32..10.0) {
        let mut p = SmoothedParam::standard(start, 48000.0);
        p.set_target(target);
        let mut prev = start;
        for _ in 0..1000 {
            let v = p.advance();
            if target >= start {
                prop_assert!(v >= prev - 1e-6 && v <= target + 1e-6);
            } else {
                prop_assert!(v <= prev + 1e-6 && v >= target - 1e-6);
            }
            prev = v;
        }
    }

    /// Delay output is always one of the values written (or a blend of two).
    #[test]
    fn delay_reads_are_bounded(
        writes in prop::collection::vec(-1.0f32..=1.0, 1..200),
        delay in 0.0f32..300.0,
    ) {
        let mut line = InterpolatedDelay::new(128);
        for &w in &writes {
            line.write(w);
        }
        let out = line.read(delay);
        prop_assert!((-1.0..=1.0).contains(&out));
    }

    /// Interleaving a planar block and reading it back is lossless.
    #[test]
    fn interleave_round_trip(frames in prop::collection::vec((-1.0f32..1.0, -1.0f32..1.0), 0..64)) {
        let interleaved: Vec<f32> = frames.iter().flat_map(|&(l, r)| [l, r]).collect();
        let mut buffer = AudioBuffer::new(2, 64);
        let n = buffer.copy_from_interleaved(&interleaved, 2);
        prop_assert_eq!(n, frames.len());
        let mut out = vec![0.0; interleaved.len()];
        buffer.copy_to_interleaved(&mut out, 2);
        prop_assert_eq!(out, interleaved);
    }
}
