use super::backend::FavoritesBackend;
use super::document::FavoriteRecord;
use crate::error::{MilsymError, Result};
use std::cell::{Cell, RefCell};

/// In-memory favorites backend for testing.
///
/// Uses `RefCell` for interior mutability; the repository that owns it is
/// driven from a single thread.
#[derive(Default)]
pub struct MemBackend {
    records: RefCell<Vec<FavoriteRecord>>,
    saves: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend whose document already holds `records`.
    pub fn with_records(records: Vec<FavoriteRecord>) -> Self {
        Self {
            records: RefCell::new(records),
            ..Self::default()
        }
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful saves.
    pub fn save_count(&self) -> usize {
        self.saves.get()
    }

    pub fn records(&self) -> Vec<FavoriteRecord> {
        self.records.borrow().clone()
    }
}

impl FavoritesBackend for MemBackend {
    fn load_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        Ok(self.records.borrow().clone())
    }

    fn save_favorites(&self, records: &[FavoriteRecord]) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(MilsymError::Store("Simulated write error".to_string()));
        }
        *self.records.borrow_mut() = records.to_vec();
        self.saves.set(self.saves.get() + 1);
        Ok(())
    }
}
