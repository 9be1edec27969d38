//! Persistence seam: best-effort save/load of the grid state.
//!
//! The simulation never depends on persistence succeeding — a failed save
//! is reported and dropped, a missing or corrupt snapshot simply yields a
//! fresh session. Last write wins; there is no format versioning.

use std::cell::RefCell;
use std::fs;
use std::path::PathBuf;

use crate::grid::GridState;

/// Key-value style store for serialized grid state.
pub trait SnapshotStore {
    /// Loads the most recently saved state, if any survives parsing.
    fn load(&self) -> Option<GridState>;

    /// Saves the state, best-effort. Implementations must not panic and
    /// must swallow their own I/O errors.
    fn save(&self, state: &GridState);
}

/// Snapshot store backed by a single JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store writing to `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Option<GridState> {
        let raw = fs::read_to_string(&self.path).ok()?;
        serde_json::from_str(&raw).ok()
    }

    fn save(&self, state: &GridState) {
        let serialized = match serde_json::to_string(state) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("snapshot serialize failed: {e}");
                return;
            }
        };
        if let Err(e) = fs::write(&self.path, serialized) {
            eprintln!(
                "snapshot write to \"{}\" failed: {e}",
                self.path.display()
            );
        }
    }
}

/// In-memory snapshot store for tests and embedding hosts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: RefCell<Option<String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when a snapshot has been saved.
    pub fn has_snapshot(&self) -> bool {
        self.slot.borrow().is_some()
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self) -> Option<GridState> {
        self.slot
            .borrow()
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
    }

    fn save(&self, state: &GridState) {
        match serde_json::to_string(state) {
            Ok(s) => *self.slot.borrow_mut() = Some(s),
            Err(e) => eprintln!("snapshot serialize failed: {e}"),
        }
    }
}
