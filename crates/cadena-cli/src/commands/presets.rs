//! Preset listing command.

use anyhow::{Context, Result};
use cadena_config::{
    ChainPreset, FACTORY_PRESET_NAMES, find_factory, list_user_presets, load_preset,
    user_presets_dir,
};
use clap::Args;

#[derive(Args)]
pub struct PresetsArgs {
    /// Print one preset as TOML
    #[arg(long, value_name = "NAME")]
    show: Option<String>,
}

pub fn run(args: PresetsArgs) -> Result<()> {
    if let Some(name) = &args.show {
        let preset = load_preset(name).with_context(|| format!("failed to load preset '{name}'"))?;
        print!("{}", preset.to_toml()?);
        return Ok(());
    }

    println!("Factory presets:");
    for key in FACTORY_PRESET_NAMES {
        if let Some(preset) = find_factory(key) {
            print_summary(key, &preset);
        }
    }

    let user = list_user_presets();
    println!();
    println!("User presets ({}):", user_presets_dir().display());
    if user.is_empty() {
        println!("  (none)");
    }
    for path in user {
        let key = cadena_config::paths::preset_name_from_path(&path).unwrap_or_default();
        match ChainPreset::load(&path) {
            Ok(preset) => print_summary(&key, &preset),
            Err(err) => println!("  {key:14}  (unreadable: {err})"),
        }
    }
    Ok(())
}

fn print_summary(key: &str, preset: &ChainPreset) {
    let order = preset
        .chain_order()
        .map_or_else(|err| format!("invalid order: {err}"), |order| order.to_string());
    println!("  {key:14}  {}", preset.name);
    if let Some(description) = &preset.description {
        println!("  {:14}  {description}", "");
    }
    println!("  {:14}  {order}", "");
}
