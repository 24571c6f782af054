//! Realtime database → SnapshotFeed → ControlService, end to end.
//!
//! Every test runs against [`MemoryRealtimeDb`], so the service's own writes
//! come back as echoes through the same subscriptions a dashboard would hold.

use crate::mock_ports::EventLog;

use futures_lite::future::block_on;
use serde_json::{Value, json};

use incubator::adapters::config_cache::MemoryConfigCache;
use incubator::adapters::realtime_db::MemoryRealtimeDb;
use incubator::adapters::speech::RecordingAnnouncer;
use incubator::app::commands::AppCommand;
use incubator::app::events::{AppEvent, ChangeSource};
use incubator::app::feed::SnapshotFeed;
use incubator::app::ports::{ActuatorStore, ConfigPort, ControlConfigStore, SnapshotSource};
use incubator::app::service::ControlService;
use incubator::config::ControlConfig;
use incubator::error::DecodeError;
use incubator::model::{Device, Mode, SensorReading};
use incubator::wire::{self, MODE_PATH, SENSOR_PATH};

struct Rig {
    db: MemoryRealtimeDb,
    feed: SnapshotFeed,
    svc: ControlService,
    speech: RecordingAnnouncer,
    events: EventLog,
}

impl Rig {
    fn new() -> Self {
        let mut db = MemoryRealtimeDb::new();
        let feed = SnapshotFeed::subscribe(&mut db);
        let mut svc = ControlService::new(ControlConfig::default());
        svc.sync_from(&db);
        let mut rig = Self {
            db,
            feed,
            svc,
            speech: RecordingAnnouncer::new(),
            events: EventLog::new(),
        };
        rig.pump();
        rig
    }

    fn pump(&mut self) -> usize {
        self.feed
            .pump(&mut self.svc, &mut self.db, &mut self.speech, &mut self.events)
    }

    fn publish(&mut self, t: f32, h: f32) {
        self.db
            .publish_reading(&SensorReading::new(t, h, 0.0))
            .unwrap();
    }

    fn stored(&self, device: Device) -> bool {
        self.db.get_device(device).unwrap()
    }

    fn remote_changes(&self) -> usize {
        self.events
            .events
            .iter()
            .filter(|e| {
                matches!(
                    e,
                    AppEvent::DeviceChanged {
                        source: ChangeSource::Remote,
                        ..
                    }
                )
            })
            .count()
    }
}

#[test]
fn cold_humid_reading_turns_heater_on() {
    let mut rig = Rig::new();
    rig.publish(36.0, 70.0);
    rig.pump();

    assert!(rig.stored(Device::Heater));
    assert!(!rig.stored(Device::Fan));
    assert!(!rig.stored(Device::Mister));
    assert_eq!(rig.speech.spoken(), ["Sưởi đã bật"]);
    assert_eq!(rig.remote_changes(), 0, "own echoes must not count as remote");
}

#[test]
fn warm_dry_reading_turns_fan_and_mister_on() {
    let mut rig = Rig::new();
    rig.publish(38.0, 55.0);
    rig.pump();

    assert!(!rig.stored(Device::Heater));
    assert!(rig.stored(Device::Fan));
    assert!(rig.stored(Device::Mister));
    assert_eq!(rig.speech.spoken(), ["Điều hòa đã bật", "Phun sương đã bật"]);
}

#[test]
fn repeated_reading_is_idempotent() {
    let mut rig = Rig::new();
    rig.publish(36.0, 70.0);
    rig.pump();
    // Same values with a different lux: a new snapshot, same decision.
    rig.db
        .publish_reading(&SensorReading::new(36.0, 70.0, 10.0))
        .unwrap();
    rig.pump();

    assert_eq!(rig.svc.evaluation_count(), 2);
    assert_eq!(rig.speech.spoken().len(), 1);
}

#[test]
fn queued_readings_are_each_evaluated() {
    let mut rig = Rig::new();
    rig.publish(36.0, 70.0);
    rig.publish(38.0, 55.0);
    rig.publish(37.5, 60.0);
    rig.pump();

    assert_eq!(rig.svc.evaluation_count(), 3);
    for device in Device::ALL {
        assert!(!rig.stored(device), "{device} should end off");
    }
    assert_eq!(rig.speech.spoken().len(), 6);
    assert_eq!(rig.remote_changes(), 0);
}

#[test]
fn remote_override_in_auto_is_announced_then_corrected() {
    let mut rig = Rig::new();
    rig.publish(38.0, 60.0);
    rig.pump();
    rig.speech.drain();

    // Another client switches the heater on.
    rig.db.set_device(Device::Heater, true).unwrap();
    rig.pump();

    assert_eq!(rig.remote_changes(), 1);
    assert_eq!(rig.speech.spoken(), ["Sưởi đã bật", "Sưởi đã tắt"]);
    assert!(!rig.stored(Device::Heater));
}

#[test]
fn remote_change_in_manual_is_kept() {
    let mut rig = Rig::new();
    rig.db.set(MODE_PATH, json!(false)).unwrap();
    rig.pump();
    assert_eq!(rig.svc.mode(), Mode::Manual);

    rig.publish(30.0, 30.0);
    rig.db.set_device(Device::Fan, true).unwrap();
    rig.pump();

    assert!(rig.svc.devices().fan);
    assert!(!rig.stored(Device::Heater));
    assert_eq!(rig.speech.spoken(), ["Điều hòa đã bật"]);
}

#[test]
fn config_snapshot_reevaluates_and_dirties_cache() {
    let mut rig = Rig::new();
    rig.publish(37.8, 60.0);
    rig.pump();
    assert!(rig.stored(Device::Fan));

    let warmer = ControlConfig {
        temperature_threshold: 38.5,
        ..ControlConfig::default()
    };
    rig.db.save_config(&warmer).unwrap();
    rig.pump();

    assert!(rig.stored(Device::Heater));
    assert!(!rig.stored(Device::Fan));

    let cache = MemoryConfigCache::new();
    assert!(rig.svc.save_config_if_dirty(&cache));
    assert!(!rig.svc.save_config_if_dirty(&cache));
    assert_eq!(cache.load(), Ok(warmer));
}

#[test]
fn blank_config_field_is_no_update() {
    let mut rig = Rig::new();
    rig.db
        .set(
            wire::CONFIG_PATH,
            json!({"temperatureThreshold": "", "humidityThreshold": 60}),
        )
        .unwrap();
    rig.pump();
    assert_eq!(rig.svc.config(), ControlConfig::default());
    assert!(rig.events.events.iter().any(|e| matches!(
        e,
        AppEvent::SnapshotRejected {
            error: DecodeError::NotANumber("temperatureThreshold"),
            ..
        }
    )));
}

#[test]
fn malformed_reading_is_rejected_without_writes() {
    let mut rig = Rig::new();
    rig.db
        .set(SENSOR_PATH, json!({"temperature": "warm", "humidity": 50}))
        .unwrap();
    rig.pump();

    assert!(rig.svc.last_reading().is_none());
    assert!(rig.speech.spoken().is_empty());
    assert!(rig.events.events.contains(&AppEvent::SnapshotRejected {
        path: SENSOR_PATH,
        error: DecodeError::NotANumber("temperature"),
    }));
}

#[test]
fn non_finite_reading_keeps_state() {
    let mut rig = Rig::new();
    rig.publish(36.0, 50.0);
    rig.pump();
    assert!(rig.stored(Device::Heater) && rig.stored(Device::Mister));
    rig.speech.drain();

    rig.db
        .set(SENSOR_PATH, json!({"temperature": "NaN", "humidity": "inf"}))
        .unwrap();
    rig.pump();

    assert!(rig.stored(Device::Heater) && rig.stored(Device::Mister));
    assert!(rig.svc.devices().heater && rig.svc.devices().mister);
    assert_eq!(rig.svc.last_reading(), Some(SensorReading::new(36.0, 50.0, 0.0)));
    assert!(rig.speech.spoken().is_empty());
    assert!(rig.events.events.contains(&AppEvent::SnapshotRejected {
        path: SENSOR_PATH,
        error: DecodeError::NotANumber("temperature"),
    }));
}

#[test]
fn two_commands_before_one_pump_are_not_remote() {
    let mut rig = Rig::new();
    rig.db.set(MODE_PATH, json!(false)).unwrap();
    rig.pump();

    let cmd = AppCommand::ToggleDevice(Device::Fan);
    rig.svc
        .handle_command(cmd.clone(), &mut rig.db, &mut rig.speech, &mut rig.events);
    rig.svc
        .handle_command(cmd, &mut rig.db, &mut rig.speech, &mut rig.events);
    rig.pump();

    assert_eq!(rig.speech.spoken(), ["Điều hòa đã bật", "Điều hòa đã tắt"]);
    assert_eq!(rig.remote_changes(), 0);
    assert!(!rig.stored(Device::Fan));
    assert!(!rig.svc.devices().fan);
}

#[test]
fn config_commands_between_pumps_are_not_remote() {
    let mut rig = Rig::new();
    rig.publish(37.8, 60.0);
    rig.pump();
    assert!(rig.stored(Device::Fan));
    rig.speech.drain();

    let warmer = ControlConfig {
        temperature_threshold: 38.5,
        ..ControlConfig::default()
    };
    rig.svc.handle_command(
        AppCommand::UpdateConfig(warmer),
        &mut rig.db,
        &mut rig.speech,
        &mut rig.events,
    );
    rig.svc.handle_command(
        AppCommand::UpdateConfig(ControlConfig::default()),
        &mut rig.db,
        &mut rig.speech,
        &mut rig.events,
    );
    rig.pump();

    assert_eq!(rig.speech.spoken().len(), 4);
    assert_eq!(rig.remote_changes(), 0);
    assert!(rig.stored(Device::Fan));
    assert!(!rig.stored(Device::Heater));
}

#[test]
fn queued_mode_echoes_are_not_replayed() {
    let mut rig = Rig::new();
    rig.svc
        .handle_command(AppCommand::ToggleMode, &mut rig.db, &mut rig.speech, &mut rig.events);
    rig.svc
        .handle_command(AppCommand::ToggleMode, &mut rig.db, &mut rig.speech, &mut rig.events);
    rig.pump();

    let mode_changes = rig
        .events
        .events
        .iter()
        .filter(|e| matches!(e, AppEvent::ModeChanged(_)))
        .count();
    assert_eq!(mode_changes, 2);
    assert_eq!(rig.svc.mode(), Mode::Auto);
}

#[test]
fn offline_write_still_announces() {
    let mut rig = Rig::new();
    rig.publish(36.0, 70.0);
    rig.db.set_online(false);
    rig.pump();

    assert!(rig.svc.devices().heater, "state is optimistic");
    assert_eq!(rig.speech.spoken(), ["Sưởi đã bật"]);
    assert_eq!(rig.events.write_failures(), 1);
    assert_eq!(rig.db.get(&wire::device_state_path(Device::Heater)), Value::Null);
}

#[test]
fn dropping_the_feed_unsubscribes() {
    let mut rig = Rig::new();
    assert_eq!(rig.db.subscriber_count(), 7);
    let Rig { mut db, feed, .. } = rig;
    drop(feed);
    assert_eq!(db.subscriber_count(), 0);
}

#[test]
fn subscription_can_be_awaited() {
    let mut db = MemoryRealtimeDb::new();
    db.publish_reading(&SensorReading::new(37.0, 61.0, 5.0))
        .unwrap();
    let mut sub = db.subscribe(SENSOR_PATH);
    let first = block_on(sub.next());
    assert_eq!(
        wire::decode_reading(&first).map(|r| r.humidity),
        Ok(61.0)
    );
}
