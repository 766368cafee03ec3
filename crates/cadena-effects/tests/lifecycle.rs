//! Lifecycle behaviour shared by every effect: prepare, process, reset.

use cadena_core::{AudioBuffer, Effect, ProcessSpec};
use cadena_effects::{Chorus, LadderFilter, ParametricFilter, Phaser, Saturator};

fn all_effects() -> Vec<(&'static str, Box<dyn Effect>)> {
    vec![
        ("Phaser", Box::new(Phaser::new()) as Box<dyn Effect>),
        ("Chorus", Box::new(Chorus::new()) as Box<dyn Effect>),
        ("Saturator", Box::new(Saturator::new()) as Box<dyn Effect>),
        ("LadderFilter", Box::new(LadderFilter::new()) as Box<dyn Effect>),
        ("ParametricFilter", Box::new(ParametricFilter::new()) as Box<dyn Effect>),
    ]
}

fn noise_block(channels: usize, len: usize, seed: u32) -> AudioBuffer {
    let mut state = seed.max(1);
    let mut block = AudioBuffer::new(channels, len);
    for channel in block.channels_mut() {
        for s in channel.iter_mut() {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            *s = (state as f32 / u32::MAX as f32) - 0.5;
        }
    }
    block
}

#[test]
fn process_before_prepare_leaves_block_untouched() {
    for (name, mut effect) in all_effects() {
        let mut block = noise_block(2, 64, 7);
        let before = block.clone();
        effect.process(&mut block);
        assert_eq!(block, before, "{name}");
    }
}

#[test]
fn reset_makes_processing_repeatable() {
    for (name, mut effect) in all_effects() {
        effect.prepare(&ProcessSpec::stereo(44100.0, 128));
        let mut first = noise_block(2, 128, 3);
        effect.process(&mut first);

        effect.process(&mut noise_block(2, 128, 99));
        effect.reset();

        let mut second = noise_block(2, 128, 3);
        effect.process(&mut second);
        assert_eq!(first, second, "{name}: reset did not restore initial state");
    }
}

#[test]
fn extra_channels_beyond_prepared_are_untouched() {
    for (name, mut effect) in all_effects() {
        effect.prepare(&ProcessSpec::new(48000.0, 32, 1));
        let mut block = noise_block(2, 32, 11);
        let original_right = block.channel(1).to_vec();
        effect.process(&mut block);
        assert_eq!(block.channel(1), original_right.as_slice(), "{name}");
    }
}

#[test]
fn shorter_blocks_than_prepared_are_fine() {
    for (name, mut effect) in all_effects() {
        effect.prepare(&ProcessSpec::stereo(48000.0, 512));
        let mut block = noise_block(2, 512, 5);
        for len in [512, 1, 17, 0, 300] {
            block.set_len(len);
            effect.process(&mut block);
            assert!(block.channels().all(|c| c.iter().all(|s| s.is_finite())), "{name} @ {len}");
        }
    }
}

#[test]
fn reprepare_at_new_rate_keeps_working() {
    for (name, mut effect) in all_effects() {
        effect.prepare(&ProcessSpec::stereo(48000.0, 64));
        effect.process(&mut noise_block(2, 64, 1));
        effect.prepare(&ProcessSpec::new(96000.0, 256, 1));
        let mut block = noise_block(1, 256, 2);
        effect.process(&mut block);
        assert!(block.channel(0).iter().all(|s| s.is_finite()), "{name}");
        assert_eq!(effect.latency_samples(), 0, "{name}");
    }
}
