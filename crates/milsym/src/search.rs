//! # Style Search Aggregation
//!
//! A search fans out to three concurrent catalog queries, one per geometry
//! class, and merges each query's results into a shared list as soon as it
//! completes. Completion order is whatever the catalog produces; nothing
//! assumes Point returns before Line.
//!
//! ## Filtering
//!
//! Only items keyed by a symbol code survive:
//!
//! - exactly 8 characters, all digits; or
//! - exactly 10 characters, `_` at position 9 and a digit at position 10.
//!
//! Under 2525C_B2, items tagged `NEW_AT_2525D` are dropped as well.
//!
//! ## Generations
//!
//! Every call to [`SearchAggregator::search`] starts a new generation and
//! clears the shared list. In-flight queries are never cancelled; batches
//! that complete after a newer search started are reported as discarded and
//! not merged.

use futures::stream::{FuturesUnordered, Stream, StreamExt};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::code::GeometryClass;
use crate::error::{MilsymError, Result};
use crate::services::{StyleCatalog, StyleItem};
use crate::standard::StandardVersion;

/// Tag marking taxonomy entries introduced by 2525D.
pub const NEW_AT_2525D_TAG: &str = "NEW_AT_2525D";

/// Outcome of one completed sub-search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchBatch {
    pub geometry: GeometryClass,
    /// Items of this sub-search that passed the filter.
    pub accepted: usize,
    /// Size of the merged list after this batch.
    pub result_count: usize,
    /// True when a newer search started before this batch arrived.
    pub discarded: bool,
}

/// Whether a style key has the shape of a symbol code.
pub fn is_symbol_key(key: &str) -> bool {
    let chars: Vec<char> = key.chars().collect();
    match chars.len() {
        8 => chars.iter().all(char::is_ascii_digit),
        10 => chars[8] == '_' && chars[9].is_ascii_digit(),
        _ => false,
    }
}

/// Whether a style item belongs in results for `standard`.
pub fn accepts(item: &StyleItem, standard: StandardVersion) -> bool {
    if !is_symbol_key(&item.key) {
        return false;
    }
    match standard {
        StandardVersion::Mil2525CB2 => !item.tags.contains(NEW_AT_2525D_TAG),
        StandardVersion::Mil2525D => true,
    }
}

pub struct SearchAggregator {
    catalog: Arc<dyn StyleCatalog>,
    results: RwLock<Vec<StyleItem>>,
    generation: AtomicU64,
}

impl SearchAggregator {
    pub fn new(catalog: Arc<dyn StyleCatalog>) -> Self {
        Self {
            catalog,
            results: RwLock::new(Vec::new()),
            generation: AtomicU64::new(0),
        }
    }

    /// Start a search and stream one batch per completed sub-search.
    ///
    /// The shared list is cleared immediately. A failed sub-search yields an
    /// `Err` item; the others keep running.
    pub fn search<'a>(
        &'a self,
        query: &'a str,
        standard: StandardVersion,
    ) -> impl Stream<Item = Result<SearchBatch>> + 'a {
        let generation = {
            let mut results = self.results.write();
            results.clear();
            self.generation.fetch_add(1, Ordering::SeqCst) + 1
        };
        debug!(%query, %standard, generation, "style search started");

        let catalog = &self.catalog;
        let pending: FuturesUnordered<_> = GeometryClass::ALL
            .into_iter()
            .map(move |geometry| async move {
                (geometry, catalog.search_items(geometry, query).await)
            })
            .collect();

        pending.map(move |(geometry, outcome)| self.merge(generation, geometry, outcome, standard))
    }

    /// Run a search to completion and return the merged list.
    ///
    /// Failed sub-searches are logged and skipped.
    pub async fn search_all(&self, query: &str, standard: StandardVersion) -> Vec<StyleItem> {
        let mut batches = Box::pin(self.search(query, standard));
        while let Some(batch) = batches.next().await {
            if let Err(e) = batch {
                debug!(error = %e, "partial style search");
            }
        }
        self.snapshot()
    }

    /// Copy of the merged list, safe to hand to another thread.
    pub fn snapshot(&self) -> Vec<StyleItem> {
        self.results.read().clone()
    }

    pub fn result_count(&self) -> usize {
        self.results.read().len()
    }

    fn merge(
        &self,
        generation: u64,
        geometry: GeometryClass,
        outcome: Result<Vec<StyleItem>>,
        standard: StandardVersion,
    ) -> Result<SearchBatch> {
        let items = outcome.map_err(|e| {
            warn!(%geometry, error = %e, "style sub-search failed");
            MilsymError::Catalog {
                geometry,
                message: e.to_string(),
            }
        })?;

        let accepted: Vec<StyleItem> = items
            .into_iter()
            .filter(|item| accepts(item, standard))
            .collect();

        let mut results = self.results.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!(%geometry, generation, "discarding stale search batch");
            return Ok(SearchBatch {
                geometry,
                accepted: accepted.len(),
                result_count: results.len(),
                discarded: true,
            });
        }

        let count = accepted.len();
        results.extend(accepted);
        Ok(SearchBatch {
            geometry,
            accepted: count,
            result_count: results.len(),
            discarded: false,
        })
    }
}
