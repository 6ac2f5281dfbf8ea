// src/cli.rs

//! Command-line surface.

use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Parser)]
#[command(
    name = "announcer",
    version,
    about = "Play recorded announcements at recurring weekly times.",
    long_about = None
)]
pub struct CliArgs {
    /// Schedule file to load.
    #[arg(
        long,
        value_name = "PATH",
        env = "ANNOUNCER_CONFIG",
        default_value = "Announcer.toml"
    )]
    pub config: String,

    /// Overrides `ANNOUNCER_LOG`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Validate the schedule, print each announcement's next time and exit.
    #[arg(long)]
    pub dry_run: bool,

    /// Play one announcement right away (sound check) and exit.
    #[arg(long, value_name = "EVENT", conflicts_with = "dry_run")]
    pub play_now: Option<String>,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
