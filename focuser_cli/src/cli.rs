//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "focuser", version, about = "Focuser motion controller CLI")]
pub struct Cli {
    /// Path to config TOML (typed)
    #[arg(long, value_name = "FILE", default_value = "etc/focuser.toml")]
    pub config: PathBuf,

    /// Print results and errors as JSON instead of pretty text
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Connect and print a one-shot device snapshot
    Status,
    /// Command a move and (optionally) wait for it to settle
    Move {
        /// Absolute target position in ticks
        #[arg(long, value_name = "TICKS", conflicts_with_all = ["inward", "outward"])]
        to: Option<i32>,
        /// Relative move toward the telescope, in ticks
        #[arg(long = "in", value_name = "TICKS", conflicts_with = "outward")]
        inward: Option<u32>,
        /// Relative move away from the telescope, in ticks
        #[arg(long = "out", value_name = "TICKS")]
        outward: Option<u32>,
        /// Block until the poll loop reports the move settled
        #[arg(long, action = ArgAction::SetTrue)]
        wait: bool,
    },
    /// Relabel the current physical position as the given tick value
    Sync {
        #[arg(value_name = "TICKS")]
        ticks: i32,
    },
    /// Enable or disable mechanical direction inversion
    Reverse {
        #[arg(value_parser = clap::builder::BoolishValueParser::new())]
        enabled: bool,
    },
    /// Set the maximum travel in ticks
    SetMax {
        #[arg(value_name = "TICKS")]
        ticks: i32,
    },
    /// Stream telemetry updates for a while
    Watch {
        /// How long to watch, in seconds
        #[arg(long, default_value_t = 10)]
        seconds: u64,
    },
    /// Quick health check (simulated hardware reachable, config valid)
    SelfCheck,
}
