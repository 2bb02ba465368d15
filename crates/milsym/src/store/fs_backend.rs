use super::backend::FavoritesBackend;
use super::document::{read_document, write_document, FavoriteRecord};
use crate::error::Result;
use std::path::{Path, PathBuf};

/// Favorites kept in a single JSON file.
pub struct FsBackend {
    path: PathBuf,
}

impl FsBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FavoritesBackend for FsBackend {
    fn load_favorites(&self) -> Result<Vec<FavoriteRecord>> {
        read_document(&self.path)
    }

    fn save_favorites(&self, records: &[FavoriteRecord]) -> Result<()> {
        write_document(&self.path, records)
    }
}
