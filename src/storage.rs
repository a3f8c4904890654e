use crate::model::RosterState;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::NamedTempFile;

pub trait Storage {
    /// Load the full roster state from the backing store.
    fn load(&self) -> anyhow::Result<RosterState>;
    /// Persist the full state atomically.
    fn save(&self, state: &RosterState) -> anyhow::Result<()>;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<RosterState> {
        if !self.path.exists() {
            return Ok(RosterState::default());
        }
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let state: RosterState = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        Ok(state)
    }

    fn save(&self, state: &RosterState) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(state)?;
        let mut tmp = NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
            .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}

/// Storage wrapped in the scoped transaction every read-modify-write cycle
/// needs: one mutex held across load, mutation and save.
///
/// This serializes mutators within a single process, which is the model
/// this design assumes. Independent processes sharing one file would need
/// the store itself to provide exclusion (file lock or a real database).
pub struct RosterStore<S: Storage> {
    storage: S,
    lock: Mutex<()>,
}

impl<S: Storage> RosterStore<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            lock: Mutex::new(()),
        }
    }

    /// Read a consistent snapshot.
    pub fn read<T>(&self, f: impl FnOnce(&RosterState) -> T) -> anyhow::Result<T> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let state = self.storage.load()?;
        Ok(f(&state))
    }

    /// Load, mutate, save — committed only if the closure succeeds, and
    /// assumed committed only once the save returns.
    pub fn update<T>(
        &self,
        f: impl FnOnce(&mut RosterState) -> anyhow::Result<T>,
    ) -> anyhow::Result<T> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        let mut state = self.storage.load()?;
        let out = f(&mut state)?;
        self.storage.save(&state)?;
        Ok(out)
    }
}
