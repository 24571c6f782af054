//! Hatch-cycle workflow against the in-memory document store.

use incubator::adapters::hatch_store::MemoryHatchStore;
use incubator::app::hatch::{active_summary, cancel_active, complete_active, start_cycle};
use incubator::app::ports::HatchCycleStore;
use incubator::error::{Error, HatchError};
use incubator::hatch::{Assessment, HatchStatus, INCUBATION_DAYS, SensorRecord};
use incubator::model::SensorReading;

const DAY: u64 = 86_400;
const T0: u64 = 1_700_000_000;

fn record(t: f32, h: f32, ts: u64) -> SensorRecord {
    SensorRecord {
        reading: SensorReading::new(t, h, 0.0),
        timestamp: ts,
    }
}

#[test]
fn start_assigns_id_and_expected_date() {
    let mut store = MemoryHatchStore::new();
    let cycle = start_cycle(&mut store, "Gà ri", 24, T0).unwrap();

    assert_eq!(cycle.id, "cycle-1");
    assert_eq!(cycle.status, HatchStatus::Doing);
    assert_eq!(cycle.expected_date, T0 + INCUBATION_DAYS * DAY);
    assert_eq!(store.active().unwrap(), Some(cycle));
}

#[test]
fn only_one_cycle_at_a_time() {
    let mut store = MemoryHatchStore::new();
    start_cycle(&mut store, "first", 10, T0).unwrap();
    let err = start_cycle(&mut store, "second", 10, T0 + DAY).unwrap_err();
    assert_eq!(err, Error::Hatch(HatchError::AlreadyActive));
    assert_eq!(store.cycles().len(), 1);
}

#[test]
fn invalid_form_creates_nothing() {
    let mut store = MemoryHatchStore::new();
    assert_eq!(
        start_cycle(&mut store, "", 10, T0),
        Err(Error::Hatch(HatchError::EmptyName))
    );
    assert_eq!(
        start_cycle(&mut store, "batch", 0, T0),
        Err(Error::Hatch(HatchError::NoEggs))
    );
    assert!(store.cycles().is_empty());
}

#[test]
fn completing_frees_the_slot() {
    let mut store = MemoryHatchStore::new();
    start_cycle(&mut store, "first", 10, T0).unwrap();

    let done = complete_active(&mut store).unwrap();
    assert_eq!(done.status, HatchStatus::Done);
    assert_eq!(store.active().unwrap(), None);

    let next = start_cycle(&mut store, "second", 8, T0 + 22 * DAY).unwrap();
    assert_eq!(next.id, "cycle-2");
}

#[test]
fn cancel_without_active_cycle_fails() {
    let mut store = MemoryHatchStore::new();
    assert_eq!(
        cancel_active(&mut store),
        Err(Error::Hatch(HatchError::NoActiveCycle))
    );

    start_cycle(&mut store, "first", 10, T0).unwrap();
    let cancelled = cancel_active(&mut store).unwrap();
    assert_eq!(cancelled.status, HatchStatus::Destroy);
    assert_eq!(store.cycles()[0].status, HatchStatus::Destroy);
}

#[test]
fn summary_covers_active_cycle_only() {
    let mut store = MemoryHatchStore::new();
    assert_eq!(active_summary(&store, &[]), Ok(None));

    start_cycle(&mut store, "batch", 12, T0).unwrap();
    let history = [
        record(25.0, 40.0, T0 - DAY),
        record(37.6, 58.0, T0 + 60),
        record(38.2, 61.0, T0 + DAY),
    ];
    let (cycle, summary) = active_summary(&store, &history).unwrap().unwrap();
    assert_eq!(cycle.name, "batch");
    assert_eq!(summary.samples, 2);
    assert_eq!(summary.avg_temperature, Some(37.9));
    assert_eq!(summary.avg_humidity, Some(59.5));
    assert_eq!(summary.assessment, Assessment::Stable);
}

#[test]
fn drifting_humidity_is_flagged() {
    let mut store = MemoryHatchStore::new();
    start_cycle(&mut store, "batch", 12, T0).unwrap();
    let history = [record(37.5, 45.0, T0 + 10), record(37.7, 48.0, T0 + 20)];
    let (_, summary) = active_summary(&store, &history).unwrap().unwrap();
    assert_eq!(summary.assessment, Assessment::HumidityOutOfRange);
}
