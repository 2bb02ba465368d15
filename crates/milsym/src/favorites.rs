//! # Favorites Repository
//!
//! An ordered list of saved attribute sets, unique by favorite id, backed by a
//! [`FavoritesBackend`]. The whole list is persisted after every mutation;
//! there is no incremental write.
//!
//! Mutations are applied to a working copy first and only become visible
//! once the backend accepted the new document, so a failed save leaves the
//! in-memory list exactly as it was.
//!
//! ## Import
//!
//! [`FavoritesRepository::import_batch`] replaces a favorite whose id matches
//! an incoming set and appends everything else, keeping incoming order.
//! Incoming sets without an id get a fresh one, and every incoming set has
//! its preview regenerated before insertion.

use std::fs;
use std::path::Path;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{MilsymError, Result};
use crate::model::AttributeSet;
use crate::services::SymbolRenderer;
use crate::standard::StandardVersion;
use crate::store::document::{decode_records, encode_sets, from_json, write_document};
use crate::store::FavoritesBackend;

/// Visibility rule for the favorites list.
///
/// A favorite is shown when it was saved under `standard` and, if a search
/// term is given, its id or tag string contains the term (case-insensitive).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FavoritesFilter {
    pub standard: StandardVersion,
    pub search_term: Option<String>,
}

impl FavoritesFilter {
    pub fn new(standard: StandardVersion) -> Self {
        Self {
            standard,
            search_term: None,
        }
    }

    pub fn with_term(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        self.search_term = if term.is_empty() { None } else { Some(term) };
        self
    }

    pub fn matches(&self, set: &AttributeSet) -> bool {
        if set.standard != self.standard {
            return false;
        }
        let Some(term) = &self.search_term else {
            return true;
        };
        let term = term.to_lowercase();
        set.favorite_id
            .as_deref()
            .is_some_and(|id| id.to_lowercase().contains(&term))
            || set.symbol_tags.to_lowercase().contains(&term)
    }
}

/// What an import did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub replaced: usize,
    pub added: usize,
}

pub struct FavoritesRepository<B: FavoritesBackend> {
    backend: B,
    favorites: Vec<AttributeSet>,
}

impl<B: FavoritesBackend> FavoritesRepository<B> {
    /// Empty repository; call [`load`](Self::load) to read the backend.
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            favorites: Vec::new(),
        }
    }

    /// Repository loaded from `backend`, previews rendered.
    pub fn open(backend: B, renderer: &dyn SymbolRenderer, preview_size: u32) -> Result<Self> {
        let mut repo = Self::new(backend);
        repo.load(renderer, preview_size)?;
        Ok(repo)
    }

    /// Replace the in-memory list with the backend's document and render
    /// every preview.
    ///
    /// Returns the number of favorites loaded.
    pub fn load(&mut self, renderer: &dyn SymbolRenderer, preview_size: u32) -> Result<usize> {
        let records = self.backend.load_favorites()?;
        let mut favorites = decode_records(&records);
        for set in &mut favorites {
            set.regenerate_preview(renderer, preview_size);
        }
        self.favorites = favorites;
        debug!(count = self.favorites.len(), "favorites loaded");
        Ok(self.favorites.len())
    }

    /// Write the current list to the backend.
    pub fn persist(&self) -> Result<()> {
        Self::save(&self.backend, &self.favorites)
    }

    /// Save a copy of `set` under a fresh id and return the id.
    pub fn add(&mut self, mut set: AttributeSet) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        set.favorite_id = Some(id.clone());

        let mut next = self.favorites.clone();
        next.push(set);
        self.commit(next)?;
        info!(favorite_id = %id, "favorite added");
        Ok(id)
    }

    /// Remove the favorite with `id` and return it.
    pub fn delete(&mut self, id: &str) -> Result<AttributeSet> {
        let index = self
            .position(id)
            .ok_or_else(|| MilsymError::FavoriteNotFound(id.to_string()))?;

        let mut next = self.favorites.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        info!(favorite_id = %id, "favorite deleted");
        Ok(removed)
    }

    /// Merge `sets` into the list: replace by id, else append.
    ///
    /// The batch is persisted once, after the whole batch merged.
    pub fn import_batch(
        &mut self,
        sets: Vec<AttributeSet>,
        renderer: &dyn SymbolRenderer,
        preview_size: u32,
    ) -> Result<ImportSummary> {
        let mut next = self.favorites.clone();
        let mut summary = ImportSummary::default();

        for mut set in sets {
            set.regenerate_preview(renderer, preview_size);
            let id = set
                .favorite_id
                .get_or_insert_with(|| Uuid::new_v4().to_string())
                .clone();

            match next.iter().position(|f| f.favorite_id.as_deref() == Some(id.as_str())) {
                Some(index) => {
                    next.remove(index);
                    summary.replaced += 1;
                }
                None => summary.added += 1,
            }
            next.push(set);
        }

        self.commit(next)?;
        info!(
            replaced = summary.replaced,
            added = summary.added,
            "favorites imported"
        );
        Ok(summary)
    }

    /// Import a favorites document from `path`.
    pub fn import_file(
        &mut self,
        path: &Path,
        renderer: &dyn SymbolRenderer,
        preview_size: u32,
    ) -> Result<ImportSummary> {
        let content = fs::read_to_string(path)?;
        let sets = decode_records(&from_json(&content)?);
        debug!(path = %path.display(), count = sets.len(), "importing favorites");
        self.import_batch(sets, renderer, preview_size)
    }

    /// Write every favorite to a document at `path`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        write_document(path, &encode_sets(&self.favorites))?;
        info!(path = %path.display(), count = self.favorites.len(), "favorites exported");
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&AttributeSet> {
        self.position(id).map(|i| &self.favorites[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttributeSet> {
        self.favorites.iter()
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    /// Favorites visible under `filter`, in list order.
    pub fn filter(&self, filter: &FavoritesFilter) -> Vec<&AttributeSet> {
        self.filter_by(|set| filter.matches(set))
    }

    pub fn filter_by<P>(&self, predicate: P) -> Vec<&AttributeSet>
    where
        P: Fn(&AttributeSet) -> bool,
    {
        self.favorites.iter().filter(|set| predicate(set)).collect()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.favorites
            .iter()
            .position(|f| f.favorite_id.as_deref() == Some(id))
    }

    fn commit(&mut self, next: Vec<AttributeSet>) -> Result<()> {
        Self::save(&self.backend, &next)?;
        self.favorites = next;
        Ok(())
    }

    fn save(backend: &B, favorites: &[AttributeSet]) -> Result<()> {
        backend.save_favorites(&encode_sets(favorites))?;
        debug!(count = favorites.len(), "favorites persisted");
        Ok(())
    }
}
