//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::schedule::Zone;

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "nag-timer")]
#[command(about = "A recurring reminder daemon with night-window silencing")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// File holding the timers
    #[arg(short, long, default_value = "nag-timer.json")]
    pub state_file: PathBuf,

    /// How often the alarm facility checks for due timers, in milliseconds
    #[arg(long, default_value = "1000", value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_ms: u64,

    /// How long the wake assertion is held after a notification, in milliseconds
    #[arg(long, default_value = "1000")]
    pub wake_hold_ms: u64,

    /// Use a fixed UTC offset instead of the system time zone
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset_minutes: Option<i32>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_ms)
    }

    pub fn wake_hold(&self) -> Duration {
        Duration::from_millis(self.wake_hold_ms)
    }

    /// Zone night windows are placed in
    pub fn zone(&self) -> anyhow::Result<Zone> {
        match self.utc_offset_minutes {
            None => Ok(Zone::Local),
            Some(minutes) => Zone::from_offset_minutes(minutes)
                .ok_or_else(|| anyhow::anyhow!("UTC offset out of range: {} minutes", minutes)),
        }
    }
}
