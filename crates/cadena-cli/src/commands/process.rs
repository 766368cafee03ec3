//! File-based chain processing command.
//!
//! The file is read whole, then streamed through the chain block by block on
//! the calling thread, which plays the audio thread. Scheduled reorders are
//! pushed by a separate control thread holding the chain controller, exactly
//! as a live host would. The audio loop waits for each due reorder to be
//! pushed before starting the block it applies to, so the output does not
//! depend on thread timing.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

use anyhow::{Context, Result, bail};
use cadena_chain::{ChainController, ChainOrder};
use cadena_core::{AudioBuffer, Effect, ProcessSpec};
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};

use super::common::{ChainArgs, build_chain, parse_order, peak, rms, to_dbfs};
use crate::wav::{read_wav, write_wav};

#[derive(Args)]
pub struct ProcessArgs {
    /// Input WAV file (mono or stereo)
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output WAV file (32-bit float)
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    #[command(flatten)]
    chain: ChainArgs,

    /// Processing block size
    #[arg(long, default_value = "512")]
    block_size: usize,

    /// Switch order mid-file (e.g. "1.5=4,3,2,1,0"); repeatable
    #[arg(long, value_name = "SECONDS=ORDER", value_parser = parse_reorder)]
    reorder_at: Vec<(f64, String)>,
}

fn parse_reorder(s: &str) -> Result<(f64, String), String> {
    let (time, order) = s
        .split_once('=')
        .ok_or_else(|| format!("invalid reorder '{s}' (expected SECONDS=ORDER)"))?;
    let time: f64 = time
        .trim()
        .parse()
        .map_err(|_| format!("invalid time '{time}'"))?;
    if time.is_nan() || time < 0.0 {
        return Err(format!("invalid time '{time}'"));
    }
    Ok((time, order.trim().to_string()))
}

/// A reorder due at a sample position.
#[derive(Debug, Clone, Copy)]
struct ScheduledOrder {
    frame: usize,
    order: ChainOrder,
}

/// Shared progress between the audio loop and the control thread.
#[derive(Default)]
struct Timeline {
    /// Frame at which the audio loop will start its next block.
    position: AtomicUsize,
    /// Scheduled orders pushed so far.
    pushed: AtomicUsize,
}

/// Pushes each scheduled order once the audio loop reaches its frame.
fn run_control(mut control: ChainController, schedule: Vec<ScheduledOrder>, timeline: Arc<Timeline>) {
    for (i, event) in schedule.iter().enumerate() {
        while timeline.position.load(Ordering::Acquire) < event.frame {
            thread::yield_now();
        }
        control.set_order(event.order);
        tracing::info!(frame = event.frame, order = %event.order, "reorder pushed");
        timeline.pushed.store(i + 1, Ordering::Release);
    }
    let stats = control.channel_stats();
    tracing::debug!(pushes = stats.pushes, coalesced = stats.coalesced, "control thread done");
}

pub fn run(args: ProcessArgs) -> Result<()> {
    if args.block_size == 0 {
        bail!("block size must be at least 1");
    }

    println!("Reading {}...", args.input.display());
    let input = read_wav(&args.input)?;
    let channels = input.channels;
    if !ProcessSpec::is_supported_layout(channels, channels) {
        bail!("{channels}-channel input is not supported (mono or stereo only)");
    }
    if input.sample_rate == 0 {
        bail!("'{}' declares a sample rate of 0 Hz", args.input.display());
    }
    println!(
        "  {} frames, {} ch, {} Hz, {:.2}s",
        input.frames(),
        channels,
        input.sample_rate,
        input.duration_secs()
    );

    let (control, mut audio) = build_chain(&args.chain)?;
    let mut schedule = args
        .reorder_at
        .iter()
        .map(|(secs, text)| {
            Ok(ScheduledOrder {
                frame: (secs * f64::from(input.sample_rate)).round() as usize,
                order: parse_order(text)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;
    schedule.sort_by_key(|event| event.frame);

    println!("Chain: {}", control.requested_order());
    for event in &schedule {
        println!(
            "  at {:.3}s: {}",
            event.frame as f64 / f64::from(input.sample_rate),
            event.order
        );
    }

    audio.prepare(&ProcessSpec::new(
        input.sample_rate as f32,
        args.block_size,
        channels,
    ));

    let timeline = Arc::new(Timeline::default());
    let frames: Vec<usize> = schedule.iter().map(|event| event.frame).collect();
    let control_thread = {
        let timeline = Arc::clone(&timeline);
        thread::Builder::new()
            .name("cadena-control".into())
            .spawn(move || run_control(control, schedule, timeline))
            .context("failed to start control thread")?
    };

    let pb = ProgressBar::new(input.frames() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
            .context("invalid progress template")?
            .progress_chars("##-"),
    );

    let mut output = vec![0.0f32; input.samples.len()];
    let mut block = AudioBuffer::new(channels, args.block_size);
    let mut next_event = 0;
    let chunk_len = args.block_size * channels;

    for (i, (in_chunk, out_chunk)) in input
        .samples
        .chunks(chunk_len)
        .zip(output.chunks_mut(chunk_len))
        .enumerate()
    {
        let start = i * args.block_size;
        timeline.position.store(start, Ordering::Release);
        while next_event < frames.len() && frames[next_event] <= start {
            next_event += 1;
            while timeline.pushed.load(Ordering::Acquire) < next_event {
                thread::yield_now();
            }
        }

        let len = block.copy_from_interleaved(in_chunk, channels);
        audio.process_block(&mut block, channels);
        block.copy_to_interleaved(out_chunk, channels);
        pb.set_position((start + len) as u64);
    }

    // Releases a control thread still waiting on events past the end.
    timeline.position.store(usize::MAX, Ordering::Release);
    control_thread
        .join()
        .map_err(|_| anyhow::anyhow!("control thread panicked"))?;
    pb.finish_with_message("done");

    println!("\nFinal order: {}", audio.active_order());
    println!("\nStats:");
    println!(
        "  Input:  RMS {:.1} dB, Peak {:.1} dB",
        to_dbfs(rms(&input.samples)),
        to_dbfs(peak(&input.samples))
    );
    println!(
        "  Output: RMS {:.1} dB, Peak {:.1} dB",
        to_dbfs(rms(&output)),
        to_dbfs(peak(&output))
    );

    println!("\nWriting {}...", args.output.display());
    write_wav(&args.output, &output, channels, input.sample_rate)?;
    println!("Done!");

    Ok(())
}
