//! Chain state save/inspect command.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use cadena_chain::{ChainState, EffectKind, ParameterStore, format_param};
use clap::{Args, Subcommand};

use super::common::{ChainArgs, build_chain};

#[derive(Args)]
pub struct StateArgs {
    #[command(subcommand)]
    command: StateCommand,
}

#[derive(Subcommand)]
enum StateCommand {
    /// Build a chain from options and write its state blob
    Save {
        /// Output file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        #[command(flatten)]
        chain: ChainArgs,

        /// Write compact JSON instead of indented
        #[arg(long)]
        compact: bool,
    },

    /// Print a state blob in readable form
    Show {
        /// State file (JSON)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

pub fn run(args: StateArgs) -> Result<()> {
    match args.command {
        StateCommand::Save {
            file,
            chain,
            compact,
        } => save(&file, &chain, compact),
        StateCommand::Show { file } => show(&file),
    }
}

fn save(file: &Path, chain: &ChainArgs, compact: bool) -> Result<()> {
    let (control, _audio) = build_chain(chain)?;
    let state = control.save_state();
    let json = if compact {
        state.to_json()?
    } else {
        state.to_json_pretty()?
    };
    std::fs::write(file, json).with_context(|| format!("failed to write '{}'", file.display()))?;
    tracing::info!(path = %file.display(), order = %state.order, "state file written");
    println!("Saved state ({}) to {}", state.order(), file.display());
    Ok(())
}

fn show(file: &Path) -> Result<()> {
    let blob = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read '{}'", file.display()))?;
    let state =
        ChainState::from_json(&blob).with_context(|| format!("invalid state in '{}'", file.display()))?;

    // Apply to a scratch store so missing entries show their defaults.
    let store = ParameterStore::new();
    let unknown = state.apply_params(&store);

    println!("Version: {}", state.version);
    println!("Order:   {} ({})", state.order(), state.order);
    if !state.order().is_permutation() {
        println!("         (order repeats or omits effects)");
    }
    for kind in EffectKind::ALL {
        println!();
        let marker = if store.is_bypassed(kind) { "  [bypassed]" } else { "" };
        println!("{}{marker}", kind.display_name());
        for (index, desc) in store.descriptors(kind).iter().enumerate() {
            println!(
                "  {:22}  {}",
                desc.string_id,
                format_param(desc, store.get(kind, index))
            );
        }
    }
    if unknown > 0 {
        println!();
        println!("{unknown} unknown entries ignored");
    }
    Ok(())
}
