//! Chain setup shared by the commands that build a chain.

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow, bail};
use cadena_chain::{ChainController, ChainOrder, ChainProcessor, EffectKind, create_chain};
use clap::Args;

/// Options that configure a chain, applied in the order listed.
#[derive(Args, Debug, Default)]
pub struct ChainArgs {
    /// State blob (JSON) to restore first
    #[arg(long, value_name = "FILE")]
    pub state: Option<PathBuf>,

    /// Factory preset name, user preset name, or preset file
    #[arg(short, long)]
    pub preset: Option<String>,

    /// Processing order: five ids, names or ordinals (e.g. "4,3,2,1,0")
    #[arg(short, long)]
    pub order: Option<String>,

    /// Parameter value by string id (e.g. "ladder_cutoff=800" or "ladder_mode=LPF24")
    #[arg(short, long = "set", value_name = "ID=VALUE", value_parser = parse_key_val)]
    pub set: Vec<(String, String)>,

    /// Bypass an effect (repeatable)
    #[arg(short, long, value_name = "EFFECT")]
    pub bypass: Vec<String>,
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("invalid parameter '{s}' (expected id=value)")),
    }
}

/// Parses a strict five-entry order.
pub fn parse_order(text: &str) -> Result<ChainOrder> {
    text.parse::<ChainOrder>()
        .with_context(|| format!("invalid order '{text}'"))
}

/// Builds a chain and applies `args` to it.
pub fn build_chain(args: &ChainArgs) -> Result<(ChainController, ChainProcessor)> {
    let (mut control, audio) = create_chain();
    configure(&mut control, args)?;
    Ok((control, audio))
}

/// Applies state, preset, order, parameter values and bypass flags, in that
/// order, so later options override earlier ones.
pub fn configure(control: &mut ChainController, args: &ChainArgs) -> Result<()> {
    if let Some(path) = &args.state {
        let blob = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read state file '{}'", path.display()))?;
        control.restore_state(&blob);
    }

    if let Some(name) = &args.preset {
        let preset = cadena_config::load_preset(name)
            .with_context(|| format!("failed to load preset '{name}'"))?;
        preset
            .apply(control)
            .with_context(|| format!("failed to apply preset '{}'", preset.name))?;
    }

    if let Some(order) = &args.order {
        control.set_order(parse_order(order)?);
    }

    for (id, value) in &args.set {
        set_param(control, id, value)?;
    }

    for name in &args.bypass {
        let kind: EffectKind = name.parse()?;
        control.store().set_bypassed(kind, true);
    }

    Ok(())
}

/// Sets one parameter from text: a number, or an option label for choice
/// parameters. Out-of-range numbers are clamped.
pub fn set_param(control: &ChainController, id: &str, value: &str) -> Result<()> {
    let store = control.store();
    let (kind, index) = store
        .find(id)
        .ok_or_else(|| anyhow!("unknown parameter '{id}' (see `cadena effects`)"))?;
    let desc = store
        .descriptor(kind, index)
        .ok_or_else(|| anyhow!("unknown parameter '{id}'"))?;

    let number = match value.parse::<f32>() {
        Ok(number) if number.is_finite() => number,
        _ => match desc.choice_index(value) {
            Some(option) => option as f32,
            None if desc.is_choice() => {
                bail!("'{value}' is not an option of {id} ({})", desc.labels.join(", "))
            }
            None => bail!("invalid value '{value}' for {id}"),
        },
    };

    store.set(kind, index, number);
    tracing::debug!(id, value = number, "parameter set");
    Ok(())
}

/// Peak absolute sample.
pub fn peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0, f32::max)
}

/// Root mean square.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| f64::from(s) * f64::from(s)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}

/// Level in dBFS, floored at -120.
pub fn to_dbfs(linear: f32) -> f32 {
    if linear <= 0.0 {
        -120.0
    } else {
        cadena_core::linear_to_db(linear).max(-120.0)
    }
}
