//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the `log` facade (console via `env_logger` in the binary).
//! A telemetry or dashboard adapter would implement the same trait.

use log::{info, warn};

use crate::app::events::{AppEvent, ChangeSource};
use crate::app::ports::EventSink;
use crate::control::DeviationBand;

/// Adapter that logs every [`AppEvent`] to the console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

fn band(b: DeviationBand) -> &'static str {
    match b {
        DeviationBand::Nominal => "ok",
        DeviationBand::Drifting => "drift",
        DeviationBand::Alarm => "ALARM",
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started { mode, config } => {
                info!(
                    "START | mode={} | T<{:.1}\u{00b0}C RH<{:.0}% lux<{:.0}",
                    mode,
                    config.temperature_threshold,
                    config.humidity_threshold,
                    config.lux_threshold,
                );
            }
            AppEvent::Reading { reading, bands } => {
                info!(
                    "READ  | T={:.1}\u{00b0}C ({}) | RH={:.0}% ({}) | lux={:.0} ({})",
                    reading.temperature,
                    band(bands.temperature),
                    reading.humidity,
                    band(bands.humidity),
                    reading.lux,
                    band(bands.lux),
                );
            }
            AppEvent::DeviceChanged { device, on, source } => {
                let by = match source {
                    ChangeSource::Auto => "auto",
                    ChangeSource::User => "user",
                    ChangeSource::Remote => "remote",
                };
                info!(
                    "DEVICE| {} -> {} ({})",
                    device,
                    if *on { "ON" } else { "OFF" },
                    by
                );
            }
            AppEvent::ModeChanged(mode) => {
                info!("MODE  | {}", mode);
            }
            AppEvent::ConfigUpdated(config) => {
                info!(
                    "CONFIG| T<{:.1}\u{00b0}C RH<{:.0}% lux<{:.0}",
                    config.temperature_threshold, config.humidity_threshold, config.lux_threshold,
                );
            }
            AppEvent::TurnerUpdated(turner) => {
                info!(
                    "TURNER| enabled={} period={:.1}min",
                    turner.enabled,
                    turner.period_minutes()
                );
            }
            AppEvent::WriteFailed { target, error } => {
                warn!("WRITE | {:?} failed: {}", target, error);
            }
            AppEvent::CommandRejected(reason) => {
                warn!("REJECT| {}", reason);
            }
            AppEvent::SnapshotRejected { path, error } => {
                warn!("SNAP  | {} ignored: {}", path, error);
            }
        }
    }
}
