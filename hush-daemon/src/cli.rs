//! CLI argument definitions for hush-daemon.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

use hush_core::config::HushConfig;

/// hush alert silencing daemon.
///
/// Holds the silence store, reaps expired silences, and checks
/// incoming alerts against active silences.
#[derive(Parser, Debug)]
#[command(name = "hush-daemon")]
#[command(version, about, long_about = None)]
pub struct DaemonCli {
    /// Path to hush.toml configuration file.
    #[arg(short, long, default_value = "/etc/hush/hush.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_level: Option<String>,

    /// Override log format (json, pretty).
    ///
    /// Takes precedence over the config file and environment variables.
    #[arg(long)]
    pub log_format: Option<String>,

    /// Override the silences preload file.
    #[arg(long)]
    pub silences_file: Option<String>,

    /// Validate configuration file and exit without starting the daemon.
    #[arg(long)]
    pub validate: bool,
}

impl DaemonCli {
    /// Apply command-line overrides on top of a loaded configuration.
    pub fn apply_overrides(&self, config: &mut HushConfig) {
        if let Some(level) = &self.log_level {
            config.general.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            config.general.log_format = format.clone();
        }
        if let Some(path) = &self.silences_file {
            config.suppressor.silences_file = path.clone();
        }
    }
}
