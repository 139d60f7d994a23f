//! The Record Store collaborator.
//!
//! The registry keeps every resident in one named slot holding a serialised array. Access is
//! all-or-nothing: callers read the whole collection, change their copy, and write the whole
//! collection back. The last write wins.
//!
//! Two implementations are provided:
//! - [`JsonFileStore`]: one JSON file per slot under the configured data directory.
//! - [`MemoryStore`]: the slot text held in memory, for tests and dry runs.

mod file;
mod memory;
pub mod wire;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::error::StoreResult;
use crate::resident::Resident;

/// Bulk access to the persisted residents.
pub trait ResidentStore {
    /// Reads every resident. An absent slot is initialised to an empty array.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Parse`](crate::StoreError::Parse) or
    /// [`StoreError::InvalidRecord`](crate::StoreError::InvalidRecord) when the stored data is
    /// corrupt, and [`StoreError::Read`](crate::StoreError::Read) on I/O failure.
    fn read_all(&mut self) -> StoreResult<Vec<Resident>>;

    /// Replaces the stored collection with `residents`.
    fn write_all(&mut self, residents: &[Resident]) -> StoreResult<()>;
}
