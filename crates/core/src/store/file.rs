use super::wire::{parse_slot, render_slot};
use super::ResidentStore;
use crate::config::CoreConfig;
use crate::error::{StoreError, StoreResult};
use crate::resident::Resident;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Stores a slot as `<data_dir>/<slot>.json`.
///
/// Writes go to a sibling temporary file which is then renamed over the slot, so a failed write
/// leaves the previous collection intact.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(cfg: &CoreConfig) -> Self {
        Self {
            path: cfg.slot_path(),
        }
    }

    /// Uses an explicit slot file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn ensure_parent_dir(&self) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(StoreError::StorageDirCreation)?;
            }
        }
        Ok(())
    }

    fn write_text(&self, text: &str) -> StoreResult<()> {
        self.ensure_parent_dir()?;

        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, text).map_err(StoreError::Write)?;
        if let Err(e) = fs::rename(&tmp_path, &self.path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(StoreError::Write(e));
        }
        Ok(())
    }
}

impl ResidentStore for JsonFileStore {
    fn read_all(&mut self) -> StoreResult<Vec<Resident>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => {
                let residents = parse_slot(&text)?;
                tracing::debug!(
                    "read {} residents from {}",
                    residents.len(),
                    self.path.display()
                );
                Ok(residents)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                tracing::warn!(
                    "resident slot {} not found, initialising empty",
                    self.path.display()
                );
                self.write_text("[]")?;
                Ok(Vec::new())
            }
            Err(e) => Err(StoreError::Read(e)),
        }
    }

    fn write_all(&mut self, residents: &[Resident]) -> StoreResult<()> {
        let text = render_slot(residents)?;
        self.write_text(&text)?;
        tracing::debug!(
            "wrote {} residents to {}",
            residents.len(),
            self.path.display()
        );
        Ok(())
    }
}
