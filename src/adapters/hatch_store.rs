//! In-memory hatch-cycle document store.
//!
//! Implements [`HatchCycleStore`] over a `Vec`, assigning sequential ids the
//! way the hosted document store assigns generated keys.

use log::debug;

use crate::app::ports::{HatchCycleStore, StoreError};
use crate::hatch::{HatchCycle, HatchStatus, NewHatchCycle};

#[derive(Debug, Default)]
pub struct MemoryHatchStore {
    cycles: Vec<HatchCycle>,
    next_id: u64,
}

impl MemoryHatchStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every cycle ever created, oldest first.
    pub fn cycles(&self) -> &[HatchCycle] {
        &self.cycles
    }
}

impl HatchCycleStore for MemoryHatchStore {
    fn create(&mut self, cycle: NewHatchCycle) -> Result<HatchCycle, StoreError> {
        self.next_id += 1;
        let cycle = cycle.into_cycle(format!("cycle-{}", self.next_id));
        debug!("MemoryHatchStore: created {}", cycle.id);
        self.cycles.push(cycle.clone());
        Ok(cycle)
    }

    fn active(&self) -> Result<Option<HatchCycle>, StoreError> {
        Ok(self
            .cycles
            .iter()
            .find(|c| c.status == HatchStatus::Doing)
            .cloned())
    }

    fn set_status(&mut self, id: &str, status: HatchStatus) -> Result<(), StoreError> {
        let cycle = self
            .cycles
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or(StoreError::NotFound)?;
        cycle.status = status;
        Ok(())
    }
}
