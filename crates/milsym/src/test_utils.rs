//! In-memory collaborators for tests.
//!
//! Available to downstream crates through the `test_utils` feature.

use async_trait::async_trait;
use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use parking_lot::Mutex;

use crate::attributes::RecordFields;
use crate::code::GeometryClass;
use crate::convert::FieldDictionary;
use crate::error::{MilsymError, Result};
use crate::model::SymbolPreview;
use crate::services::{
    DomainProvider, DomainValue, RecordId, RecordStore, StyleCatalog, StyleItem, SymbolRenderer,
};

/// Renderer producing a fake image that encodes the attributes it saw.
#[derive(Debug, Default)]
pub struct FakeRenderer {
    fail: Cell<bool>,
    renders: Cell<usize>,
}

impl FakeRenderer {
    pub fn set_fail(&self, fail: bool) {
        self.fail.set(fail);
    }

    /// Number of render calls so far, failed ones included.
    pub fn render_count(&self) -> usize {
        self.renders.get()
    }
}

impl SymbolRenderer for FakeRenderer {
    fn render(&self, attributes: &FieldDictionary, size: u32) -> Result<Option<SymbolPreview>> {
        self.renders.set(self.renders.get() + 1);
        if self.fail.get() {
            return Err(MilsymError::Store("renderer offline".into()));
        }
        if attributes.is_empty() {
            return Ok(None);
        }
        let image = attributes
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&")
            .into_bytes();
        Ok(Some(SymbolPreview { image, size }))
    }
}

/// Field domains keyed by dataset and field name.
#[derive(Debug, Default)]
pub struct FakeDomains {
    domains: HashMap<(String, String), Vec<DomainValue>>,
}

impl FakeDomains {
    pub fn with_domain(mut self, dataset: &str, field: &str, values: &[(&str, &str)]) -> Self {
        let values = values
            .iter()
            .map(|(code, display)| DomainValue::new(*code, *display))
            .collect();
        self.domains
            .insert((dataset.to_string(), field.to_string()), values);
        self
    }

    fn lookup(&self, dataset: &str, field: &str) -> Result<&Vec<DomainValue>> {
        self.domains
            .get(&(dataset.to_string(), field.to_string()))
            .ok_or_else(|| MilsymError::SchemaUnavailable {
                dataset: dataset.to_string(),
                field: field.to_string(),
            })
    }
}

impl DomainProvider for FakeDomains {
    fn domain_values(&self, dataset: &str, field: &str) -> Result<Vec<DomainValue>> {
        self.lookup(dataset, field).cloned()
    }

    fn domain_code(&self, dataset: &str, field: &str, display: &str) -> Result<Option<String>> {
        Ok(self
            .lookup(dataset, field)?
            .iter()
            .find(|v| v.display == display)
            .map(|v| v.code.clone()))
    }
}

/// A stored record: dataset plus its written fields.
#[derive(Debug, Clone)]
pub struct StoredRecord {
    pub dataset: String,
    pub fields: RecordFields,
}

/// Record store keeping everything in a map.
#[derive(Debug, Default)]
pub struct FakeRecordStore {
    records: RefCell<BTreeMap<RecordId, StoredRecord>>,
    next_id: Cell<RecordId>,
    reject: RefCell<Option<String>>,
}

impl FakeRecordStore {
    /// Make every following write fail with `message`.
    pub fn reject_writes(&self, message: &str) {
        *self.reject.borrow_mut() = Some(message.to_string());
    }

    pub fn record(&self, id: RecordId) -> Option<StoredRecord> {
        self.records.borrow().get(&id).cloned()
    }

    pub fn len(&self) -> usize {
        self.records.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.borrow().is_empty()
    }

    fn check_writable(&self) -> Result<()> {
        match self.reject.borrow().as_ref() {
            Some(message) => Err(MilsymError::CommitFailure(message.clone())),
            None => Ok(()),
        }
    }
}

impl RecordStore for FakeRecordStore {
    fn create_record(&self, dataset: &str, fields: &RecordFields) -> Result<RecordId> {
        self.check_writable()?;
        let id = self.next_id.get() + 1;
        self.next_id.set(id);
        self.records.borrow_mut().insert(
            id,
            StoredRecord {
                dataset: dataset.to_string(),
                fields: fields.clone(),
            },
        );
        Ok(id)
    }

    fn update_record(&self, dataset: &str, id: RecordId, fields: &RecordFields) -> Result<()> {
        self.check_writable()?;
        let mut records = self.records.borrow_mut();
        let record = records
            .get_mut(&id)
            .filter(|r| r.dataset == dataset)
            .ok_or_else(|| MilsymError::CommitFailure(format!("no record {id} in {dataset}")))?;
        record.fields = fields.clone();
        Ok(())
    }

    fn read_record_fields(&self, dataset: &str, id: RecordId) -> Result<FieldDictionary> {
        self.records
            .borrow()
            .get(&id)
            .filter(|r| r.dataset == dataset)
            .map(|r| r.fields.to_dictionary())
            .ok_or_else(|| MilsymError::Store(format!("no record {id} in {dataset}")))
    }
}

/// Build a style item whose declared type is read from its tags.
pub fn style_item(key: &str, tags: &str) -> StyleItem {
    let tokens: Vec<&str> = tags.split(';').collect();
    StyleItem {
        key: key.to_string(),
        tags: tags.to_string(),
        name: format!("Item {key}"),
        item_type: crate::code::geometry_tag(&tokens).unwrap_or_default(),
    }
}

/// Future that stays pending for a fixed number of polls.
pub struct Yield(usize);

impl Future for Yield {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 == 0 {
            return Poll::Ready(());
        }
        self.0 -= 1;
        cx.waker().wake_by_ref();
        Poll::Pending
    }
}

enum Canned {
    Items(Vec<StyleItem>),
    Failure(String),
}

/// Style catalog with canned per-geometry answers.
///
/// Each answer is delayed by a number of polls so tests can force a
/// completion order. Geometries without an answer return nothing.
#[derive(Default)]
pub struct FakeCatalog {
    answers: HashMap<GeometryClass, (usize, Canned)>,
    queries: Mutex<Vec<(GeometryClass, String)>>,
}

impl FakeCatalog {
    pub fn with_results(
        mut self,
        geometry: GeometryClass,
        delay: usize,
        items: Vec<StyleItem>,
    ) -> Self {
        self.answers.insert(geometry, (delay, Canned::Items(items)));
        self
    }

    pub fn with_failure(mut self, geometry: GeometryClass, delay: usize, message: &str) -> Self {
        self.answers
            .insert(geometry, (delay, Canned::Failure(message.to_string())));
        self
    }

    /// Queries received so far, in call order.
    pub fn queries(&self) -> Vec<(GeometryClass, String)> {
        self.queries.lock().clone()
    }
}

#[async_trait]
impl StyleCatalog for FakeCatalog {
    async fn search_items(&self, geometry: GeometryClass, query: &str) -> Result<Vec<StyleItem>> {
        self.queries.lock().push((geometry, query.to_string()));
        match self.answers.get(&geometry) {
            None => Ok(Vec::new()),
            Some((delay, canned)) => {
                Yield(*delay).await;
                match canned {
                    Canned::Items(items) => Ok(items.clone()),
                    Canned::Failure(message) => Err(MilsymError::Store(message.clone())),
                }
            }
        }
    }
}
