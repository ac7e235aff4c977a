//! Clock configuration loading.
//!
//! The expected YAML structure is:
//! ```yaml
//! clock:
//!   poll_interval_ms: 1000
//!   prodid: "Alarm Clock"
//!   calendar_file: "alarms.ics"
//!   save_on_exit: true
//!   log_level: "info"
//! ```
//!
//! Every field is optional; anything missing falls back to
//! [`ClockConfig::default`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use tracing::{debug, info};

use crate::calendar::DEFAULT_PRODID;

/// Default scheduler tick.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 1_000;

/// Log filter used when `RUST_LOG` is unset and the file names none.
pub const DEFAULT_LOG_LEVEL: &str = "info";

// ── Private YAML deserialization types ────────────────────────────────────────

/// Top-level wrapper that maps directly onto the YAML file layout.
#[derive(Debug, Default, Deserialize)]
struct ClockConfigFile {
    #[serde(default)]
    clock: ClockSection,
}

#[derive(Debug, Default, Deserialize)]
struct ClockSection {
    poll_interval_ms: Option<u64>,
    prodid: Option<String>,
    calendar_file: Option<PathBuf>,
    save_on_exit: Option<bool>,
    log_level: Option<String>,
}

// ── Public data structures ────────────────────────────────────────────────────

/// Runtime settings of the alarm clock.
#[derive(Debug, Clone, PartialEq)]
pub struct ClockConfig {
    /// How often the scheduler asks the queue whether anything is due.
    pub poll_interval: Duration,

    /// `PRODID` written into saved calendar files.
    pub prodid: String,

    /// Calendar file loaded at start-up and, with `save_on_exit`, written at
    /// shutdown.  `None` disables both.
    pub calendar_file: Option<PathBuf>,

    /// Write the pending alarms back to `calendar_file` on shutdown.
    pub save_on_exit: bool,

    /// `EnvFilter` directive applied when `RUST_LOG` is unset.
    pub log_level: String,
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            prodid: DEFAULT_PRODID.to_string(),
            calendar_file: None,
            save_on_exit: true,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl ClockConfig {
    /// Parses `path` into a configuration, filling gaps with defaults.
    ///
    /// A relative `calendar_file` is resolved against the directory that
    /// contains the configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, the YAML is structurally
    /// invalid, or `poll_interval_ms` is zero.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        info!("Loading clock configuration from: {}", path.display());

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot open configuration file: {}", path.display()))?;

        let file: ClockConfigFile = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML file: {}", path.display()))?;

        let defaults = Self::default();
        let section = file.clock;

        let poll_interval_ms = section
            .poll_interval_ms
            .unwrap_or(DEFAULT_POLL_INTERVAL_MS);
        if poll_interval_ms == 0 {
            bail!(
                "poll_interval_ms must be greater than zero in {}",
                path.display()
            );
        }

        let calendar_file = section.calendar_file.map(|p| match path.parent() {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        });

        let config = Self {
            poll_interval: Duration::from_millis(poll_interval_ms),
            prodid: section.prodid.unwrap_or(defaults.prodid),
            calendar_file,
            save_on_exit: section.save_on_exit.unwrap_or(defaults.save_on_exit),
            log_level: section.log_level.unwrap_or(defaults.log_level),
        };

        debug!(
            poll_interval_ms,
            prodid = %config.prodid,
            calendar_file = ?config.calendar_file,
            save_on_exit = config.save_on_exit,
            log_level = %config.log_level,
            "Clock configuration loaded"
        );

        Ok(config)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
