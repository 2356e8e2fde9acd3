// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use anyhow::Context;
use std::env;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use the_stepper::backends::FsAssetLoader;
use the_stepper::config::{load_sequence, ActionMap};
use the_stepper::engine::QueueRegistry;
use tracing_subscriber::EnvFilter;

/// Install the fmt subscriber, honouring `RUST_LOG` and defaulting to `info`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} <sequence.yaml> [sequence2.json ...]", args[0]);
        eprintln!("Example: {} demos/slideshow.yaml", args[0]);
        eprintln!("Set RUST_LOG=debug to trace every dispatch.");
        std::process::exit(1);
    }

    let sequence_files = &args[1..];

    println!("🎬 Step Sequencer");
    println!("═════════════════");
    println!("Sequence files: {:?}", sequence_files);
    println!();

    let mut failures = 0;
    for (i, sequence_file) in sequence_files.iter().enumerate() {
        if i > 0 {
            println!("\n{}", "─".repeat(80));
        }

        if let Err(e) = run_single_sequence(sequence_file).await {
            eprintln!("❌ Failed to play {}: {:#}", sequence_file, e);
            failures += 1;
        }
    }

    println!("\n🎉 Done!");
    if failures > 0 {
        std::process::exit(1);
    }
}

/// Play one sequence file until it goes idle or Ctrl-C is pressed.
async fn run_single_sequence(sequence_file: &str) -> anyhow::Result<()> {
    let start_time = Instant::now();
    let actions = ActionMap::with_builtins();

    let sequence = load_sequence(sequence_file, &actions)?;

    // Assets are resolved relative to the sequence file
    let asset_root = Path::new(sequence_file)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let mut registry = QueueRegistry::with_tokio(Arc::new(FsAssetLoader::new(asset_root)))
        .context("creating the queue registry")?;

    let queue = registry.create(sequence.config, sequence.name.as_deref());
    queue.add(sequence.steps)?;

    println!("📋 Sequence: {}", sequence.name.as_deref().unwrap_or(sequence_file));
    println!("🔢 Steps: {}", queue.len());
    println!("🔁 Loop: {}", queue.config().looping);
    if let Some(max_loops) = queue.config().max_loops {
        println!("   Max loops: {}", max_loops);
    }
    println!("⏱️  Default delay: {:?}", queue.config().default_delay());
    println!();

    queue.play();

    tokio::select! {
        _ = queue.wait_idle() => {
            println!("\n✅ Sequence finished after {} loops", queue.loops());
        }
        result = tokio::signal::ctrl_c() => {
            result.context("listening for Ctrl-C")?;
            println!("\n⏹️  Interrupted at step index {}", queue.current());
        }
    }

    registry.delete_all();
    println!("⏱️  Total Time: {:?}", start_time.elapsed());

    Ok(())
}
