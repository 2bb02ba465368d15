//! # API Facade
//!
//! The single entry point for a UI layer. [`MilsymApi`] owns the current
//! standard, the selection workflow, the favorites repository, the search
//! aggregator and the external collaborators, and dispatches to the modules
//! that implement each operation.
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that lives in `workflow`, `favorites` and `search`
//! - **Presentation**: it returns data, never formatted text
//!
//! ## The Current Standard
//!
//! The standard is an explicit value owned here and passed down to every
//! call. Changing it abandons the current selection; favorites and search
//! results of the previous standard are filtered out on the next query.
//!
//! ## Generic Over FavoritesBackend
//!
//! - Production: `MilsymApi<FsBackend>`
//! - Testing: `MilsymApi<MemBackend>`

use futures::Stream;
use std::path::Path;
use std::sync::Arc;

use crate::attributes::Field;
use crate::code::GeometryClass;
use crate::error::{MilsymError, Result};
use crate::favorites::{FavoritesFilter, FavoritesRepository, ImportSummary};
use crate::model::AttributeSet;
use crate::search::{SearchAggregator, SearchBatch};
use crate::services::{
    DomainProvider, RecordId, RecordStore, StyleCatalog, StyleItem, SymbolRenderer,
};
use crate::standard::StandardVersion;
use crate::store::FavoritesBackend;
use crate::workflow::SymbolWorkflow;

/// The host services the engine calls out to.
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Arc<dyn SymbolRenderer>,
    pub domains: Arc<dyn DomainProvider>,
    pub records: Arc<dyn RecordStore>,
    pub catalog: Arc<dyn StyleCatalog>,
}

pub struct MilsymApi<B: FavoritesBackend> {
    standard: StandardVersion,
    preview_size: u32,
    collaborators: Collaborators,
    workflow: SymbolWorkflow,
    favorites: FavoritesRepository<B>,
    search: SearchAggregator,
}

impl<B: FavoritesBackend> MilsymApi<B> {
    /// Build the facade and load the favorites document.
    pub fn new(
        backend: B,
        collaborators: Collaborators,
        standard: StandardVersion,
        preview_size: u32,
    ) -> Result<Self> {
        let favorites =
            FavoritesRepository::open(backend, collaborators.renderer.as_ref(), preview_size)?;
        Ok(Self {
            standard,
            preview_size,
            workflow: SymbolWorkflow::new(standard, collaborators.renderer.clone(), preview_size),
            favorites,
            search: SearchAggregator::new(collaborators.catalog.clone()),
            collaborators,
        })
    }

    pub fn standard(&self) -> StandardVersion {
        self.standard
    }

    pub fn set_standard(&mut self, standard: StandardVersion) {
        self.standard = standard;
        self.workflow.set_standard(standard);
    }

    pub fn workflow(&self) -> &SymbolWorkflow {
        &self.workflow
    }

    pub fn favorites(&self) -> &FavoritesRepository<B> {
        &self.favorites
    }

    // --- Search ---

    pub fn search<'a>(&'a self, query: &'a str) -> impl Stream<Item = Result<SearchBatch>> + 'a {
        self.search.search(query, self.standard)
    }

    pub async fn search_all(&self, query: &str) -> Vec<StyleItem> {
        self.search.search_all(query, self.standard).await
    }

    pub fn search_results(&self) -> Vec<StyleItem> {
        self.search.snapshot()
    }

    // --- Selection workflow ---

    pub fn select_style(&mut self, item: Option<&StyleItem>) -> Result<Option<&str>> {
        self.workflow.select_style(item)
    }

    pub fn resolve_domains(&mut self) -> Result<()> {
        self.workflow.resolve_domains(self.collaborators.domains.as_ref())
    }

    pub fn load_values(&mut self, source: &AttributeSet) -> Result<usize> {
        self.workflow.load_values(source)
    }

    pub fn begin_new(&mut self) -> Result<()> {
        self.workflow.begin_new()
    }

    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.workflow.set_field(field, value)
    }

    pub fn commit(&mut self) -> Result<RecordId> {
        self.workflow.commit(self.collaborators.records.as_ref())
    }

    pub fn open_record(
        &mut self,
        dataset: &str,
        id: RecordId,
        geometry: GeometryClass,
    ) -> Result<()> {
        self.workflow.open_record(
            dataset,
            id,
            geometry,
            self.collaborators.records.as_ref(),
            self.collaborators.domains.as_ref(),
        )
    }

    pub fn abandon(&mut self) {
        self.workflow.abandon();
    }

    // --- Favorites ---

    /// Favorites of the current standard whose id or tags contain `term`.
    pub fn list_favorites(&self, term: &str) -> Vec<&AttributeSet> {
        self.favorites
            .filter(&FavoritesFilter::new(self.standard).with_term(term))
    }

    pub fn save_favorite(&mut self) -> Result<String> {
        self.workflow.save_as_favorite(&mut self.favorites)
    }

    pub fn delete_favorite(&mut self, id: &str) -> Result<AttributeSet> {
        self.favorites.delete(id)
    }

    pub fn load_favorite(&mut self, id: &str) -> Result<()> {
        let favorite = self
            .favorites
            .get(id)
            .cloned()
            .ok_or_else(|| MilsymError::FavoriteNotFound(id.to_string()))?;
        self.workflow
            .load_favorite(&favorite, self.collaborators.domains.as_ref())
    }

    pub fn import_favorites(&mut self, path: &Path) -> Result<ImportSummary> {
        self.favorites
            .import_file(path, self.collaborators.renderer.as_ref(), self.preview_size)
    }

    pub fn export_favorites(&self, path: &Path) -> Result<()> {
        self.favorites.export_to(path)
    }
}
