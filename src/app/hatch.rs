//! Hatch-cycle workflow.
//!
//! Thin orchestration over [`HatchCycleStore`]: at most one cycle is in
//! progress, and only the active cycle can be completed or cancelled.

use log::info;

use crate::error::{HatchError, Result};
use crate::hatch::{CycleSummary, HatchCycle, HatchStatus, NewHatchCycle, SensorRecord, summarize};

use super::ports::HatchCycleStore;

/// Start a new cycle at `now` (Unix seconds).
pub fn start_cycle(
    store: &mut impl HatchCycleStore,
    name: &str,
    number_of_eggs: u32,
    now: u64,
) -> Result<HatchCycle> {
    let new = NewHatchCycle::new(name, number_of_eggs, now)?;
    if store.active()?.is_some() {
        return Err(HatchError::AlreadyActive.into());
    }
    let cycle = store.create(new)?;
    info!(
        "Hatch cycle {} ({}) started with {} eggs",
        cycle.id, cycle.name, cycle.number_of_eggs
    );
    Ok(cycle)
}

/// Mark the active cycle as hatched.
pub fn complete_active(store: &mut impl HatchCycleStore) -> Result<HatchCycle> {
    close_active(store, HatchStatus::Done)
}

/// Abandon the active cycle.
pub fn cancel_active(store: &mut impl HatchCycleStore) -> Result<HatchCycle> {
    close_active(store, HatchStatus::Destroy)
}

/// Assess the active cycle against `history`.  `Ok(None)` when idle.
pub fn active_summary(
    store: &impl HatchCycleStore,
    history: &[SensorRecord],
) -> Result<Option<(HatchCycle, CycleSummary)>> {
    Ok(store.active()?.map(|cycle| {
        let summary = summarize(&cycle, history);
        (cycle, summary)
    }))
}

fn close_active(store: &mut impl HatchCycleStore, status: HatchStatus) -> Result<HatchCycle> {
    let Some(mut cycle) = store.active()? else {
        return Err(HatchError::NoActiveCycle.into());
    };
    store.set_status(&cycle.id, status)?;
    cycle.status = status;
    info!("Hatch cycle {} closed as {:?}", cycle.id, status);
    Ok(cycle)
}
