// src/playback/backend.rs

//! Pluggable player abstraction.
//!
//! The serializer talks to a `Player` instead of spawning processes itself.
//! This makes it easy to swap in a fake player in tests while keeping the
//! production implementation here.
//!
//! - `CommandPlayer` is the default implementation used by `announcer`. It
//!   runs the configured player program with the audio path appended and
//!   waits for it to exit.
//! - Tests can provide their own `Player` that, for example, records which
//!   jobs were played and sleeps on Tokio's paused clock.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::Settings;

use super::PlaybackJob;

/// Trait abstracting how an announcement is played.
///
/// `play` resolves only once playback has finished (or failed).
pub trait Player: Send {
    fn play(&mut self, job: PlaybackJob) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>>;
}

/// Plays audio by running an external program, e.g.
/// `cvlc --play-and-exit --quiet <file>`.
#[derive(Debug, Clone)]
pub struct CommandPlayer {
    program: String,
    args: Vec<String>,
}

impl CommandPlayer {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.player_program.clone(), settings.player_args.clone())
    }
}

impl Player for CommandPlayer {
    fn play(&mut self, job: PlaybackJob) -> Pin<Box<dyn Future<Output = Result<()>> + Send + '_>> {
        Box::pin(async move {
            info!(
                seq = job.seq,
                event = %job.event_name,
                audio = %job.audio,
                player = %self.program,
                "starting player process"
            );

            let mut cmd = Command::new(&self.program);
            cmd.args(&self.args)
                .arg(job.audio.path())
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            let mut child = cmd
                .spawn()
                .with_context(|| format!("spawning player '{}' for {}", self.program, job.audio))?;

            // Always consume stderr so buffers don't fill; log at debug.
            if let Some(stderr) = child.stderr.take() {
                let seq = job.seq;
                tokio::spawn(async move {
                    let mut lines = BufReader::new(stderr).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        debug!(seq, "player stderr: {}", line);
                    }
                });
            }

            let status = child
                .wait()
                .await
                .with_context(|| format!("waiting for player of {}", job.audio))?;

            if !status.success() {
                bail!(
                    "player '{}' exited with code {} for {}",
                    self.program,
                    status.code().unwrap_or(-1),
                    job.audio
                );
            }

            debug!(seq = job.seq, "player process exited cleanly");
            Ok(())
        })
    }
}
