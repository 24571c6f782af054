//! Incubator control simulator — host entry point.
//!
//! Wires the control service to the in-memory adapters and replays a
//! stream of JSON lines through the realtime database:
//!
//! ```text
//! {"temperature": 36.8, "humidity": 52, "lux": 40}      → written to Sensor
//! {"path": "autoMode/isAutoMode", "value": false}       → written as-is
//! ```
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │  MemoryRealtimeDb   LogAnnouncer   LogEventSink   ConfigCache │
//! │  ──────────────── Port Trait Boundary ─────────────────────  │
//! │     SnapshotFeed ──▶ ControlService (evaluate · state)       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{info, warn};
use serde_json::Value;

use incubator::adapters::config_cache::{FileConfigCache, MemoryConfigCache};
use incubator::adapters::hatch_store::MemoryHatchStore;
use incubator::adapters::log_sink::LogEventSink;
use incubator::adapters::realtime_db::MemoryRealtimeDb;
use incubator::adapters::speech::LogAnnouncer;
use incubator::announce::Locale;
use incubator::app::feed::SnapshotFeed;
use incubator::app::hatch;
use incubator::app::ports::{ConfigPort, ControlConfigStore, ModeStore};
use incubator::app::service::ControlService;
use incubator::config::ControlConfig;
use incubator::hatch::SensorRecord;
use incubator::model::{Device, Mode};
use incubator::wire::{self, SENSOR_PATH};

#[derive(Clone, Copy, ValueEnum)]
enum Voice {
    Vi,
    En,
}

impl From<Voice> for Locale {
    fn from(v: Voice) -> Self {
        match v {
            Voice::Vi => Locale::Vietnamese,
            Voice::En => Locale::English,
        }
    }
}

#[derive(Parser)]
#[command(version, about = "Replay sensor readings through the incubator auto-mode controller")]
struct Args {
    /// JSON-lines input, `-` for stdin.
    #[arg(default_value = "-")]
    readings: PathBuf,

    /// Ideal temperature (°C); overrides the cached threshold.
    #[arg(long)]
    temperature_threshold: Option<f32>,

    /// Minimum humidity (%); overrides the cached threshold.
    #[arg(long)]
    humidity_threshold: Option<f32>,

    /// Start in manual mode.
    #[arg(long)]
    manual: bool,

    /// Announcement language.
    #[arg(long, value_enum, default_value_t = Voice::Vi)]
    voice: Voice,

    /// File that keeps the last thresholds between runs.
    #[arg(long)]
    config_cache: Option<PathBuf>,

    /// Start a hatch cycle with this name before replaying.
    #[arg(long)]
    hatch: Option<String>,

    /// Eggs in the hatch cycle.
    #[arg(long, default_value_t = 1)]
    eggs: u32,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_secs())
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("=== Incubator controller v{} ===", env!("CARGO_PKG_VERSION"));

    // ── Local config cache ───────────────────────────────────
    let cache: Box<dyn ConfigPort> = match &args.config_cache {
        Some(path) => Box::new(FileConfigCache::new(path)),
        None => Box::new(MemoryConfigCache::new()),
    };
    let cached = cache.load().unwrap_or_else(|e| {
        warn!("Config cache unusable ({}), using defaults", e);
        ControlConfig::default()
    });

    // ── Database seed ────────────────────────────────────────
    let mut db = MemoryRealtimeDb::new();
    if args.temperature_threshold.is_some() || args.humidity_threshold.is_some() {
        let config = ControlConfig {
            temperature_threshold: args
                .temperature_threshold
                .unwrap_or(cached.temperature_threshold),
            humidity_threshold: args.humidity_threshold.unwrap_or(cached.humidity_threshold),
            ..cached
        };
        config.validate().map_err(anyhow::Error::msg)?;
        db.save_config(&config)?;
    }
    if args.manual {
        db.set_mode(Mode::Manual)?;
    }

    // ── Service + feed ───────────────────────────────────────
    let mut service = ControlService::new(cached).with_locale(args.voice.into());
    service.sync_from(&db);
    let mut feed = SnapshotFeed::subscribe(&mut db);
    let mut speech = LogAnnouncer;
    let mut sink = LogEventSink::new();
    service.start(&mut sink);
    feed.pump(&mut service, &mut db, &mut speech, &mut sink);

    let mut cycles = MemoryHatchStore::new();
    if let Some(name) = &args.hatch {
        hatch::start_cycle(&mut cycles, name, args.eggs, now_secs())?;
    }

    // ── Replay ───────────────────────────────────────────────
    let mut history = Vec::new();
    for (n, line) in open_input(&args.readings)?.lines().enumerate() {
        let line = line.context("reading input")?;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                warn!("line {}: not JSON ({})", n + 1, e);
                continue;
            }
        };

        let target = value.get("path").and_then(Value::as_str).map(str::to_owned);
        let written = match target {
            Some(path) => db.set(&path, value.get("value").cloned().unwrap_or(Value::Null)),
            None => {
                if let Ok(reading) = wire::decode_reading(&value) {
                    history.push(SensorRecord {
                        reading,
                        timestamp: now_secs(),
                    });
                }
                db.set(SENSOR_PATH, value)
            }
        };
        if let Err(e) = written {
            warn!("line {}: write failed ({})", n + 1, e);
        }
        feed.pump(&mut service, &mut db, &mut speech, &mut sink);
    }

    // ── Shutdown ─────────────────────────────────────────────
    service.save_config_if_dirty(&*cache);

    let devices = service.devices();
    info!(
        "Done: {} evaluations, mode={}, {}",
        service.evaluation_count(),
        service.mode(),
        Device::ALL
            .iter()
            .map(|&d| format!("{}={}", d, if devices.get(d) { "on" } else { "off" }))
            .collect::<Vec<_>>()
            .join(" ")
    );
    if let Some((cycle, summary)) = hatch::active_summary(&cycles, &history)? {
        info!(
            "Hatch '{}': {} eggs, {} days left, {} samples, assessment {:?}",
            cycle.name,
            cycle.number_of_eggs,
            cycle.days_remaining(now_secs()),
            summary.samples,
            summary.assessment
        );
    }

    Ok(())
}
