/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::PathBuf;
use std::process;

use chrono::{Local, Utc};
use clap::Parser;
use tracing::{error, info, warn};

use alarm_clock::alarm::parse_time_of_day;
use alarm_clock::calendar;
use alarm_clock::config::{ClockConfig, DEFAULT_LOG_LEVEL};
use alarm_clock::editor::AlarmEditor;
use alarm_clock::scheduler::{AlarmScheduler, LogNotifier};
use alarm_clock::AlarmQueue;

// ── CLI argument definition ───────────────────────────────────────────────────

/// Headless alarm clock.
///
/// Example:
///   alarm-clock -c clock.yaml -a 07:30 -a 12:15 --save alarms.ics
#[derive(Debug, Parser)]
#[command(
    name = "alarm-clock",
    about = "Alarm clock – fires queued alarms and keeps them in an iCalendar file",
    long_about = None,
)]
struct Cli {
    /// Path to the YAML clock configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// iCalendar file to load alarms from at start-up (overrides `calendar_file`).
    #[arg(short = 'l', long = "load")]
    load: Option<PathBuf>,

    /// Add an alarm at the next HH:MM (may be repeated).
    #[arg(short = 'a', long = "alarm", value_parser = parse_alarm_arg)]
    alarms: Vec<(u32, u32)>,

    /// iCalendar file to write pending alarms to on shutdown (overrides `calendar_file`).
    #[arg(short = 's', long = "save")]
    save: Option<PathBuf>,

    /// Print the pending alarms and exit without running the scheduler.
    #[arg(long = "list", default_value_t = false)]
    list: bool,
}

fn parse_alarm_arg(s: &str) -> Result<(u32, u32), String> {
    parse_time_of_day(s).map_err(|e| e.to_string())
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn init_tracing(default_level: &str) {
    // RUST_LOG wins over the configured level.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();
}

#[tokio::main]
async fn main() {
    // ── Parse CLI arguments ───────────────────────────────────────────────────
    let cli = Cli::parse();

    // ── Load configuration, then initialise logging from it ───────────────────
    let config = match &cli.config {
        Some(path) => match ClockConfig::load_from_file(path) {
            Ok(cfg) => {
                init_tracing(&cfg.log_level);
                info!("Loaded clock configuration from: {}", path.display());
                cfg
            }
            Err(e) => {
                init_tracing(DEFAULT_LOG_LEVEL);
                error!("Failed to load clock configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            init_tracing(DEFAULT_LOG_LEVEL);
            warn!("No configuration file provided, using default clock settings");
            ClockConfig::default()
        }
    };

    info!("Alarm clock starting up...");

    let load_path = cli.load.clone().or_else(|| config.calendar_file.clone());
    let save_path = cli.save.clone().or_else(|| {
        config
            .calendar_file
            .clone()
            .filter(|_| config.save_on_exit)
    });

    info!(
        poll_interval_ms = config.poll_interval.as_millis() as u64,
        prodid           = %config.prodid,
        load             = ?load_path,
        save             = ?save_path,
        "Configuration"
    );

    // ── Rehydrate the queue ───────────────────────────────────────────────────
    let queue = AlarmQueue::new();

    if let Some(path) = &load_path {
        if path.exists() {
            if let Err(e) = calendar::load_from_file(path, &queue, Utc::now().timestamp_millis()) {
                error!("Failed to load alarms: {:#}", e);
                process::exit(1);
            }
        } else if cli.load.is_some() {
            error!("Calendar file not found: {}", path.display());
            process::exit(1);
        } else {
            info!("Calendar file {} does not exist yet, starting empty", path.display());
        }
    }

    // ── Add alarms from the command line ──────────────────────────────────────
    let editor = AlarmEditor::new(queue.clone());
    for &(hour, minute) in &cli.alarms {
        if let Err(e) = editor.add(hour, minute, &Local::now()) {
            error!("Cannot add alarm {hour:02}:{minute:02}: {e}");
            process::exit(1);
        }
    }

    if cli.list {
        let list = editor.list();
        if list.is_empty() {
            println!("No pending alarms.");
        }
        for row in list.rows() {
            println!("{:>3}  {}  ({} ms)", row.rank, row.local_time, row.fire_at_ms);
        }
        return;
    }

    // ── Run until Ctrl-C ──────────────────────────────────────────────────────
    let scheduler = AlarmScheduler::new(queue.clone(), LogNotifier, config.poll_interval);
    scheduler
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C ({e}), stopping scheduler");
            }
        })
        .await;

    // ── Persist pending alarms ────────────────────────────────────────────────
    if let Some(path) = &save_path {
        if let Err(e) = calendar::save_to_file(path, &queue, &config.prodid) {
            error!("Failed to save alarms: {:#}", e);
            process::exit(1);
        }
    }

    info!("Alarm clock stopped");
}
