// src/lib.rs

pub mod cli;
pub mod clock;
pub mod config;
pub mod engine;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod playback;
pub mod schedule;
pub mod types;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use chrono::NaiveDateTime;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::cli::CliArgs;
use crate::clock::{Clock, SystemClock};
use crate::config::{load_and_validate, ConfigFile};
use crate::engine::{status_channel, EngineOptions, TriggerCore, TriggerEngine};
use crate::fs::RealFileSystem;
use crate::playback::{CommandPlayer, PlaybackJob, PlaybackSerializer, Player};
use crate::schedule::next_occurrence;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - schedule loading
/// - trigger core / engine runtime
/// - playback serializer + player process backend
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = PathBuf::from(&args.config);
    let cfg = load_and_validate(&config_path, &RealFileSystem)?;

    if args.dry_run {
        print_dry_run(&cfg, SystemClock.now());
        return Ok(());
    }

    let player = CommandPlayer::from_settings(&cfg.settings);

    if let Some(ref event) = args.play_now {
        return play_now(&cfg, player, event).await;
    }

    let options = EngineOptions {
        wake_lead: cfg.settings.wake_lead,
        max_sleep: cfg.settings.max_sleep,
    };

    let serializer = PlaybackSerializer::spawn(player);
    let (reporter, status) = status_channel();
    let shutdown = CancellationToken::new();

    // Ctrl-C → graceful shutdown.
    {
        let token = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            token.cancel();
        });
    }

    let core = TriggerCore::new(Arc::new(cfg.table));
    let engine = TriggerEngine::new(core, SystemClock, serializer.queue(), options, reporter);
    engine.run(shutdown).await?;

    let last = status.snapshot();
    let summary = serializer.shutdown().await?;
    info!(
        dispatched = last.dispatched,
        played = summary.played,
        failed = summary.failed,
        dropped = summary.dropped,
        "announcer stopped"
    );

    Ok(())
}

/// Play one named announcement immediately, bypassing the schedule.
async fn play_now<P: Player>(cfg: &ConfigFile, mut player: P, event: &str) -> Result<()> {
    let (id, entry) = cfg
        .table
        .find_by_name(event)
        .ok_or_else(|| anyhow!("no announcement named '{event}' in the schedule"))?;

    info!(entry = %id, event = %entry.event_name, "playing announcement now");
    player
        .play(PlaybackJob {
            seq: 0,
            event_name: entry.event_name.clone(),
            audio: entry.audio.clone(),
        })
        .await
}

/// Simple dry-run output: print announcements and when each plays next.
fn print_dry_run(cfg: &ConfigFile, now: NaiveDateTime) {
    println!("announcer dry-run");
    println!(
        "  config.player = {} {}",
        cfg.settings.player_program,
        cfg.settings.player_args.join(" ")
    );
    println!("  config.on_invalid_entry = {:?}", cfg.settings.on_invalid_entry);
    println!(
        "  config.wake_lead_ms = {}",
        cfg.settings.wake_lead.num_milliseconds()
    );
    println!();

    println!("announcements ({}):", cfg.table.len());
    for (id, entry) in cfg.table.iter() {
        println!("  {id} {}", entry.event_name);
        println!("      at: {} on {}", entry.announcement_time, entry.days);
        if let Some(event_time) = entry.event_time {
            println!("      event_time: {event_time}");
        }
        println!("      audio: {}", entry.audio);
        println!(
            "      next: {}",
            next_occurrence(entry, now).format("%a %Y-%m-%d %H:%M")
        );
    }

    if !cfg.skipped.is_empty() {
        println!();
        println!("skipped ({}):", cfg.skipped.len());
        for skipped in &cfg.skipped {
            println!("  #{}: {}", skipped.index, skipped.reason);
        }
        warn!(count = cfg.skipped.len(), "some announcements were skipped");
    }

    debug!("dry-run complete (nothing played)");
}
