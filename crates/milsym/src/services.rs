//! # External Collaborators
//!
//! The engine never renders, digitizes, or touches the host data store
//! itself. It calls out through these narrow traits:
//!
//! - [`DomainProvider`]: coded-value vocabularies of a dataset's fields
//! - [`RecordStore`]: create, update and read records (geometry excluded)
//! - [`StyleCatalog`]: async search of the symbology style library
//! - [`SymbolRenderer`]: turns display attributes into a preview image
//!
//! In-memory implementations live in [`crate::test_utils`].

use async_trait::async_trait;

use crate::attributes::RecordFields;
use crate::code::GeometryClass;
use crate::convert::FieldDictionary;
use crate::error::Result;
use crate::model::SymbolPreview;

/// One coded value of a field domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainValue {
    pub code: String,
    pub display: String,
}

impl DomainValue {
    pub fn new(code: impl Into<String>, display: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            display: display.into(),
        }
    }
}

/// Live field-domain vocabulary of the host data store.
pub trait DomainProvider {
    /// Ordered coded values of `field` in `dataset`.
    ///
    /// Fails with `SchemaUnavailable` when the dataset or field has no domain.
    fn domain_values(&self, dataset: &str, field: &str) -> Result<Vec<DomainValue>>;

    /// Code of the domain value displayed as `display`.
    fn domain_code(&self, dataset: &str, field: &str, display: &str) -> Result<Option<String>>;
}

/// Identifier of a stored record.
pub type RecordId = i64;

/// Host data store for symbol records.
///
/// Commits are synchronous from the engine's point of view; the engine never
/// retries a failed commit.
pub trait RecordStore {
    fn create_record(&self, dataset: &str, fields: &RecordFields) -> Result<RecordId>;

    fn update_record(&self, dataset: &str, id: RecordId, fields: &RecordFields) -> Result<()>;

    /// Attribute fields of a record as text, geometry fields excluded.
    fn read_record_fields(&self, dataset: &str, id: RecordId) -> Result<FieldDictionary>;
}

/// A catalog entry of the symbology style library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleItem {
    pub key: String,
    pub tags: String,
    pub name: String,
    /// Geometry declared by the style item itself.
    pub item_type: GeometryClass,
}

/// Searchable symbology style library.
#[async_trait]
pub trait StyleCatalog: Send + Sync {
    async fn search_items(&self, geometry: GeometryClass, query: &str) -> Result<Vec<StyleItem>>;
}

/// Symbol rendering service.
pub trait SymbolRenderer {
    /// Render the display attributes at `size` pixels square.
    ///
    /// `Ok(None)` means the renderer has no symbol for these attributes.
    fn render(&self, attributes: &FieldDictionary, size: u32) -> Result<Option<SymbolPreview>>;
}
