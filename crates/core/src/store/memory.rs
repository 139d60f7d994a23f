use super::wire::{parse_slot, render_slot};
use super::ResidentStore;
use crate::error::StoreResult;
use crate::resident::Resident;

/// Keeps the slot text in memory.
///
/// Residents go through the same serialised form as the file store, so corrupt-data handling
/// can be exercised without touching disk.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    slot: Option<String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing slot text, which is not checked until the first read.
    pub fn with_raw(text: impl Into<String>) -> Self {
        Self {
            slot: Some(text.into()),
        }
    }

    /// The current slot text, or `None` if the slot has never been initialised.
    pub fn raw(&self) -> Option<&str> {
        self.slot.as_deref()
    }
}

impl ResidentStore for MemoryStore {
    fn read_all(&mut self) -> StoreResult<Vec<Resident>> {
        match &self.slot {
            Some(text) => parse_slot(text),
            None => {
                self.slot = Some("[]".to_string());
                Ok(Vec::new())
            }
        }
    }

    fn write_all(&mut self, residents: &[Resident]) -> StoreResult<()> {
        self.slot = Some(render_slot(residents)?);
        Ok(())
    }
}
