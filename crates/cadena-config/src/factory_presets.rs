//! Factory presets bundled with cadena.
//!
//! Embedded at compile time and always available without files. Lookups are
//! case-insensitive and match either the short key or the preset's name.

use crate::ChainPreset;

/// Short keys of the factory presets, in listing order.
pub static FACTORY_PRESET_NAMES: &[&str] = &[
    "init",
    "wide_chorus",
    "acid_ladder",
    "phase_drive",
    "telephone",
];

static FACTORY_PRESETS_TOML: &[(&str, &str)] = &[
    ("init", INIT_PRESET),
    ("wide_chorus", WIDE_CHORUS_PRESET),
    ("acid_ladder", ACID_LADDER_PRESET),
    ("phase_drive", PHASE_DRIVE_PRESET),
    ("telephone", TELEPHONE_PRESET),
];

const INIT_PRESET: &str = r#"
name = "Init"
description = "Identity order, every effect at its default"
"#;

const WIDE_CHORUS_PRESET: &str = r#"
name = "Wide Chorus"
description = "Slow, deep chorus into a light ladder roll-off"
order = ["chorus", "phase", "saturator", "ladder", "filter"]

[effects.phase]
bypass = true

[effects.chorus.params]
chorus_rate = 0.6
chorus_depth = 40.0
chorus_center_delay = 12.0
chorus_feedback = 15.0
chorus_mix = 50.0

[effects.ladder.params]
ladder_cutoff = 9000.0
"#;

const ACID_LADDER_PRESET: &str = r#"
name = "Acid Ladder"
description = "Driven resonant 24 dB low-pass"
order = ["saturator", "ladder", "filter", "phase", "chorus"]

[effects.phase]
bypass = true

[effects.chorus]
bypass = true

[effects.saturator.params]
saturator_drive = 3.0

[effects.ladder.params]
ladder_mode = 3
ladder_cutoff = 650.0
ladder_resonance = 70.0
ladder_drive = 2.0

[effects.filter.params]
filter_mode = 0
filter_freq = 120.0
filter_quality = 0.7
filter_gain = 4.0
"#;

const PHASE_DRIVE_PRESET: &str = r#"
name = "Phase Drive"
description = "Swirling phaser pushed into saturation"
order = ["phase", "saturator", "chorus", "ladder", "filter"]

[effects.chorus]
bypass = true

[effects.phase.params]
phaser_rate = 0.5
phaser_depth = 80.0
phaser_center = 800.0
phaser_feedback = 60.0
phaser_mix = 50.0

[effects.saturator.params]
saturator_drive = 8.0

[effects.ladder.params]
ladder_cutoff = 8000.0
"#;

const TELEPHONE_PRESET: &str = r#"
name = "Telephone"
description = "Narrow band-pass with grit"
order = [4, 2, 3, 0, 1]

[effects.phase]
bypass = true

[effects.chorus]
bypass = true

[effects.filter.params]
mode = 1
freq = 1500.0
quality = 2.0

[effects.saturator.params]
drive = 4.0

[effects.ladder.params]
mode = 1
cutoff = 300.0
"#;

/// All factory presets, parsed.
pub fn factory_presets() -> Vec<ChainPreset> {
    FACTORY_PRESETS_TOML
        .iter()
        .filter_map(|(_, toml)| ChainPreset::from_toml(toml).ok())
        .collect()
}

/// Factory preset by short key or display name, ignoring case.
///
/// ```rust
/// use cadena_config::find_factory;
///
/// assert_eq!(find_factory("acid_ladder").unwrap().name, "Acid Ladder");
/// assert_eq!(find_factory("Acid Ladder").unwrap().name, "Acid Ladder");
/// assert!(find_factory("plate_reverb").is_none());
/// ```
pub fn find_factory(name: &str) -> Option<ChainPreset> {
    let wanted = name.trim();
    FACTORY_PRESETS_TOML
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(wanted))
        .and_then(|(_, toml)| ChainPreset::from_toml(toml).ok())
        .or_else(|| {
            factory_presets()
                .into_iter()
                .find(|preset| preset.name.eq_ignore_ascii_case(wanted))
        })
}

/// Returns `true` if `name` matches a factory preset.
pub fn is_factory_preset(name: &str) -> bool {
    find_factory(name).is_some()
}
