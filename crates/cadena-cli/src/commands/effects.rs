//! Effect listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use anyhow::Result;
use cadena_chain::{EffectKind, ParameterStore, format_param};
use clap::Args;

#[derive(Args)]
pub struct EffectsArgs {
    /// Show details for one effect (id, name or ordinal)
    #[arg(value_name = "EFFECT")]
    effect: Option<String>,
}

pub fn run(args: EffectsArgs) -> Result<()> {
    let store = ParameterStore::new();

    if let Some(name) = &args.effect {
        let kind: EffectKind = name.parse()?;
        print_details(&store, kind);
        return Ok(());
    }

    println!("Available Effects");
    println!("=================");
    println!();
    println!("  {:3}  {:10}  {:18}  {}", "#", "Id", "Name", "Parameters");
    println!("  {:3}  {:10}  {:18}  {}", "-", "--", "----", "----------");
    for kind in EffectKind::ALL {
        let params: Vec<&str> = store
            .descriptors(kind)
            .iter()
            .map(|d| d.string_id)
            .collect();
        println!(
            "  {:3}  {:10}  {:18}  {}",
            kind.ordinal(),
            kind.id(),
            kind.display_name(),
            params.join(", ")
        );
    }
    println!();
    println!("Default order: {}", cadena_chain::ChainOrder::identity());
    println!("Use 'cadena effects <EFFECT>' for parameter details.");
    Ok(())
}

fn print_details(store: &ParameterStore, kind: EffectKind) {
    let title = format!("{} ({})", kind.display_name(), kind.id());
    println!("{title}");
    println!("{}", "=".repeat(title.chars().count()));
    println!();
    println!("Ordinal: {}    Bypass flag: {}", kind.ordinal(), kind.bypass_id());
    println!();
    println!("Parameters:");
    println!();
    println!(
        "  {:22}  {:14}  {:12}  {}",
        "Id", "Name", "Default", "Range"
    );
    println!(
        "  {:22}  {:14}  {:12}  {}",
        "--", "----", "-------", "-----"
    );

    for desc in store.descriptors(kind) {
        let range = if desc.is_choice() {
            desc.labels.join(" | ")
        } else {
            format!(
                "{} .. {}",
                format_param(desc, desc.min),
                format_param(desc, desc.max)
            )
        };
        println!(
            "  {:22}  {:14}  {:12}  {}",
            desc.string_id,
            desc.name,
            format_param(desc, desc.default),
            range
        );
    }

    if let Some(first) = store.descriptors(kind).first() {
        println!();
        println!("Example usage:");
        println!();
        println!(
            "  cadena process input.wav output.wav --set {}={}",
            first.string_id, first.default
        );
        println!("  cadena process input.wav output.wav --bypass {}", kind.id());
    }
}
