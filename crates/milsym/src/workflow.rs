//! # Selection Workflow
//!
//! Drives one attribute set from a picked style item to a stored record.
//!
//! ```text
//! Idle --select_style--> StyleSelected --resolve_domains--> DomainsResolved
//!                                                              |
//!                              +--------- load_values ---------+--- begin_new ---+
//!                              v                                                 v
//!                           Editing <------------------ commit ---------------- AddingNew
//! ```
//!
//! `select_style(None)` or [`SymbolWorkflow::abandon`] returns to `Idle` from
//! anywhere.
//!
//! ## Failure Semantics
//!
//! - A malformed tag string rejects the style item; the workflow goes back to
//!   `Idle`.
//! - A symbol set with no dataset route leaves the workflow in
//!   `StyleSelected` with no dataset. Domain resolution is refused until
//!   another style is picked.
//! - A field without a domain in the host store is logged and skipped during
//!   resolution. Values for it are left unset.
//! - Commit failures are returned as [`MilsymError::CommitFailure`] and never
//!   retried.
//!
//! Every display change made through the workflow regenerates the preview
//! through the renderer the workflow was built with.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::attributes::{fields_for, get_spec, Field};
use crate::code::{self, GeometryClass};
use crate::error::{MilsymError, Result};
use crate::favorites::FavoritesRepository;
use crate::model::AttributeSet;
use crate::router;
use crate::services::{
    DomainProvider, DomainValue, RecordId, RecordStore, StyleItem, SymbolRenderer,
};
use crate::standard::{Affiliation, StandardVersion};
use crate::store::FavoritesBackend;

/// Fields copied from the selected symbol before domains are resolved.
const SEEDED_FIELDS: [Field; 2] = [Field::SymbolSet, Field::SymbolEntity];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WorkflowState {
    #[default]
    Idle,
    StyleSelected,
    DomainsResolved,
    Editing,
    AddingNew,
}

impl WorkflowState {
    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowState::Idle => "idle",
            WorkflowState::StyleSelected => "style-selected",
            WorkflowState::DomainsResolved => "domains-resolved",
            WorkflowState::Editing => "editing",
            WorkflowState::AddingNew => "adding-new",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub struct SymbolWorkflow {
    standard: StandardVersion,
    renderer: Arc<dyn SymbolRenderer>,
    preview_size: u32,
    state: WorkflowState,
    current: AttributeSet,
    geometry: GeometryClass,
    dataset: Option<String>,
    style: Option<StyleItem>,
    pending_legacy_code: Option<String>,
    domains: HashMap<Field, Vec<DomainValue>>,
    record_id: Option<RecordId>,
}

impl SymbolWorkflow {
    pub fn new(
        standard: StandardVersion,
        renderer: Arc<dyn SymbolRenderer>,
        preview_size: u32,
    ) -> Self {
        Self {
            standard,
            renderer,
            preview_size,
            state: WorkflowState::Idle,
            current: AttributeSet::new(standard),
            geometry: GeometryClass::default(),
            dataset: None,
            style: None,
            pending_legacy_code: None,
            domains: HashMap::new(),
            record_id: None,
        }
    }

    pub fn state(&self) -> WorkflowState {
        self.state
    }

    pub fn standard(&self) -> StandardVersion {
        self.standard
    }

    pub fn current(&self) -> &AttributeSet {
        &self.current
    }

    pub fn geometry(&self) -> GeometryClass {
        self.geometry
    }

    /// Dataset the current symbol routes to, if any.
    pub fn dataset(&self) -> Option<&str> {
        self.dataset.as_deref()
    }

    /// Record being edited, once opened or committed.
    pub fn record_id(&self) -> Option<RecordId> {
        self.record_id
    }

    /// Resolved domain of a field, for offering choices.
    pub fn domain(&self, field: Field) -> Option<&[DomainValue]> {
        self.domains.get(&field).map(Vec::as_slice)
    }

    /// Switch standards. The current selection is abandoned.
    pub fn set_standard(&mut self, standard: StandardVersion) {
        self.abandon();
        self.standard = standard;
        self.current = AttributeSet::new(standard);
    }

    /// Drop the selection and return to `Idle`.
    pub fn abandon(&mut self) {
        self.current.reset();
        self.current.favorite_id = None;
        self.current.standard = self.standard;
        self.geometry = GeometryClass::default();
        self.dataset = None;
        self.style = None;
        self.pending_legacy_code = None;
        self.domains.clear();
        self.record_id = None;
        self.state = WorkflowState::Idle;
    }

    /// Pick a style item, or clear the selection with `None`.
    ///
    /// Returns the dataset the symbol routes to. On `RouteNotFound` the
    /// workflow stays in `StyleSelected`.
    pub fn select_style(&mut self, item: Option<&StyleItem>) -> Result<Option<&str>> {
        self.abandon();
        let Some(item) = item else {
            return Ok(None);
        };

        let code = code::parse_with_item_type(&item.tags, self.standard, Some(item.item_type))?;
        self.current.set_field(Field::SymbolSet, &code.symbol_set)?;
        self.current.set_field(Field::SymbolEntity, &code.symbol_entity)?;
        self.current.symbol_tags = item.tags.clone();
        if !code.legacy_function_code.is_empty() {
            self.pending_legacy_code = Some(code.legacy_function_code);
        }
        self.style = Some(item.clone());

        debug!(
            key = %item.key,
            symbol_set = %code.symbol_set,
            geometry = %code.geometry,
            "style selected"
        );
        self.route(code.symbol_set, code.geometry).map(Some)
    }

    /// Fetch field domains for the routed dataset and infer the affiliation.
    pub fn resolve_domains(&mut self, provider: &dyn DomainProvider) -> Result<()> {
        self.expect_state("resolve_domains", &[WorkflowState::StyleSelected])?;
        let dataset = self.dataset.clone().ok_or(MilsymError::InvalidState {
            operation: "resolve_domains",
            state: "no dataset",
        })?;

        self.domains.clear();
        for spec in fields_for(self.standard).filter(|s| s.coded) {
            let name = spec.name_for(self.standard);
            match provider.domain_values(&dataset, name) {
                Ok(values) => {
                    self.domains.insert(spec.field, values);
                }
                Err(MilsymError::SchemaUnavailable { .. }) => {
                    warn!(%dataset, field = name, "no domain for field, skipping");
                }
                Err(e) => return Err(e),
            }
        }

        self.infer_affiliation(provider, &dataset)?;

        if let Some(legacy) = self.pending_legacy_code.take() {
            self.apply_coded(Field::LegacyFunctionCode, &legacy)?;
        }

        self.state = WorkflowState::DomainsResolved;
        self.refresh_preview();
        info!(%dataset, domains = self.domains.len(), "domains resolved");
        Ok(())
    }

    /// Apply every set field of `source` that the live domains accept.
    ///
    /// Coded fields are matched by code equality. A value missing from the
    /// domain clears the field, except for a seeded symbol set or entity;
    /// fields without a domain are skipped. Returns the number of fields
    /// applied.
    pub fn load_values(&mut self, source: &AttributeSet) -> Result<usize> {
        self.expect_state("load_values", &[WorkflowState::DomainsResolved])?;

        let mut applied = 0;
        for spec in fields_for(self.standard) {
            let Some(value) = source.field_text(spec.field) else {
                continue;
            };
            let accepted = if spec.coded {
                self.apply_coded(spec.field, &value)?
            } else {
                self.current.set_field(spec.field, &value)?;
                true
            };
            if accepted {
                applied += 1;
            }
        }
        if self.current.symbol_tags.is_empty() {
            self.current.symbol_tags = source.symbol_tags.clone();
        }

        self.state = WorkflowState::Editing;
        self.refresh_preview();
        debug!(applied, "values loaded");
        Ok(applied)
    }

    /// Start authoring a new record from the resolved selection.
    pub fn begin_new(&mut self) -> Result<()> {
        self.expect_state("begin_new", &[WorkflowState::DomainsResolved])?;
        self.record_id = None;
        self.state = WorkflowState::AddingNew;
        Ok(())
    }

    /// Change one field and regenerate the preview.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        self.expect_state("set_field", &[WorkflowState::Editing, WorkflowState::AddingNew])?;
        if !get_spec(field).applies_to(self.standard) {
            return Err(MilsymError::InvalidState {
                operation: "set_field",
                state: "field not in current standard",
            });
        }
        self.current.set_field(field, value)?;
        self.current.on_field_changed(self.renderer.as_ref(), self.preview_size);
        Ok(())
    }

    /// Write the current set to the host store.
    ///
    /// A new symbol is created; an opened or already committed one is
    /// updated. Afterwards the workflow is `Editing` that record.
    pub fn commit(&mut self, store: &dyn RecordStore) -> Result<RecordId> {
        self.expect_state("commit", &[WorkflowState::Editing, WorkflowState::AddingNew])?;
        let dataset = self.dataset.clone().ok_or(MilsymError::InvalidState {
            operation: "commit",
            state: "no dataset",
        })?;
        let fields = self.current.to_record_fields()?;

        let outcome = match (self.state, self.record_id) {
            (WorkflowState::Editing, Some(id)) => {
                store.update_record(&dataset, id, &fields).map(|_| id)
            }
            _ => store.create_record(&dataset, &fields),
        };
        let id = outcome.map_err(|e| match e {
            MilsymError::CommitFailure(_) => e,
            other => MilsymError::CommitFailure(other.to_string()),
        })?;

        info!(%dataset, record_id = id, "record committed");
        self.record_id = Some(id);
        self.state = WorkflowState::Editing;
        Ok(id)
    }

    /// Load an existing record for editing.
    pub fn open_record(
        &mut self,
        dataset: &str,
        id: RecordId,
        geometry: GeometryClass,
        store: &dyn RecordStore,
        provider: &dyn DomainProvider,
    ) -> Result<()> {
        let fields = store.read_record_fields(dataset, id)?;
        let source = AttributeSet::from_dictionary(&fields, self.standard)?;

        self.abandon();
        self.seed_code(&source)?;
        self.geometry = geometry;
        self.dataset = Some(dataset.to_string());
        self.state = WorkflowState::StyleSelected;

        self.resolve_domains(provider)?;
        self.load_values(&source)?;
        self.record_id = Some(id);
        debug!(%dataset, record_id = id, "record opened");
        Ok(())
    }

    /// Select a saved favorite and load its values.
    ///
    /// Geometry comes from the favorite's tags (Point when absent), the
    /// symbol set from its own fields, falling back to its tags.
    pub fn load_favorite(
        &mut self,
        favorite: &AttributeSet,
        provider: &dyn DomainProvider,
    ) -> Result<()> {
        if favorite.standard != self.standard {
            return Err(MilsymError::InvalidState {
                operation: "load_favorite",
                state: favorite.standard.as_str(),
            });
        }

        let tokens: Vec<&str> = favorite.symbol_tags.split(';').collect();
        let geometry = code::geometry_tag(&tokens).unwrap_or_default();
        let symbol_set = favorite
            .display()
            .symbol_set
            .clone()
            .or_else(|| {
                code::parse(&favorite.symbol_tags, self.standard)
                    .ok()
                    .map(|c| c.symbol_set)
            })
            .ok_or_else(|| MilsymError::MalformedTag {
                tags: favorite.symbol_tags.clone(),
                reason: "favorite has no symbol set",
            })?;

        self.abandon();
        self.seed_code(favorite)?;
        self.current.set_field(Field::SymbolSet, &symbol_set)?;
        self.current.symbol_tags = favorite.symbol_tags.clone();
        self.route(symbol_set, geometry)?;
        self.resolve_domains(provider)?;
        self.load_values(favorite)?;
        debug!(favorite_id = ?favorite.favorite_id, "favorite loaded");
        Ok(())
    }

    /// Save a copy of the current set as a new favorite.
    pub fn save_as_favorite<B: FavoritesBackend>(
        &self,
        repo: &mut FavoritesRepository<B>,
    ) -> Result<String> {
        self.expect_state(
            "save_as_favorite",
            &[
                WorkflowState::DomainsResolved,
                WorkflowState::Editing,
                WorkflowState::AddingNew,
            ],
        )?;
        let mut copy = self.current.clone();
        copy.standard = self.standard;
        repo.add(copy)
    }

    /// Copy the symbol set and entity; they stay set even when the dataset
    /// has no domain for them.
    fn seed_code(&mut self, source: &AttributeSet) -> Result<()> {
        for field in SEEDED_FIELDS {
            if let Some(value) = source.field_text(field) {
                self.current.set_field(field, &value)?;
            }
        }
        Ok(())
    }

    fn route(&mut self, symbol_set: String, geometry: GeometryClass) -> Result<&str> {
        self.geometry = geometry;
        self.state = WorkflowState::StyleSelected;
        match router::resolve(&symbol_set, geometry) {
            Some(dataset) => {
                self.dataset = Some(dataset.to_string());
                Ok(dataset)
            }
            None => {
                warn!(%symbol_set, %geometry, "no dataset for symbol");
                Err(MilsymError::RouteNotFound { symbol_set, geometry })
            }
        }
    }

    fn infer_affiliation(&mut self, provider: &dyn DomainProvider, dataset: &str) -> Result<()> {
        let Some(style) = &self.style else {
            return Ok(());
        };
        let Some(affiliation) = Affiliation::infer(&style.tags, &style.name) else {
            return Ok(());
        };

        let field = self.standard.affiliation_field();
        let display_value = self.standard.affiliation_value(affiliation);
        match provider.domain_code(dataset, field, display_value) {
            Ok(Some(code)) => {
                debug!(?affiliation, %code, "affiliation inferred");
                self.current.set_field(Field::Identity, &code)
            }
            Ok(None) => {
                debug!(?affiliation, value = %display_value, "affiliation not in domain");
                Ok(())
            }
            Err(MilsymError::SchemaUnavailable { .. }) => {
                warn!(%dataset, field, "no affiliation domain, skipping");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }

    /// Set a coded field when its domain holds `code`, otherwise clear it.
    ///
    /// A field with no resolved domain keeps whatever the selection seeded.
    fn apply_coded(&mut self, field: Field, code: &str) -> Result<bool> {
        let Some(values) = self.domains.get(&field) else {
            debug!(field = get_spec(field).name, %code, "no domain for field, skipped");
            return Ok(false);
        };
        if !values.iter().any(|v| v.code == code) {
            let seeded = SEEDED_FIELDS.contains(&field) && self.current.field_text(field).is_some();
            if !seeded {
                self.current.clear_field(field);
            }
            debug!(field = get_spec(field).name, %code, seeded, "value not in domain");
            return Ok(false);
        }
        self.current.set_field(field, code)?;
        Ok(true)
    }

    fn refresh_preview(&mut self) {
        self.current.on_field_changed(self.renderer.as_ref(), self.preview_size);
    }

    fn expect_state(&self, operation: &'static str, allowed: &[WorkflowState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(MilsymError::InvalidState {
                operation,
                state: self.state.as_str(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;
    use crate::test_utils::{FakeDomains, FakeRecordStore, FakeRenderer};

    const LAND_TAGS: &str = "Land unit;Infantry;SFGPUCI----K;x;POINT;y;10121100";

    fn style(tags: &str, name: &str) -> StyleItem {
        StyleItem {
            key: "10121100".into(),
            tags: tags.into(),
            name: name.into(),
            item_type: GeometryClass::Point,
        }
    }

    fn workflow(standard: StandardVersion) -> SymbolWorkflow {
        SymbolWorkflow::new(standard, Arc::new(FakeRenderer::default()), 64)
    }

    fn land_domains() -> FakeDomains {
        FakeDomains::default()
            .with_domain("LandUnits", "identity", &[("3", "Friend"), ("6", "Hostile/Faker")])
            .with_domain("LandUnits", "affiliation", &[("3", "Friendly"), ("6", "Hostile")])
            .with_domain("LandUnits", "symbolset", &[("10", "Land unit")])
            .with_domain("LandUnits", "echelon", &[("16", "Battalion"), ("18", "Division")])
            .with_domain("LandUnits", "extendedfunctioncode", &[("S-G-UCI---", "Infantry")])
            .with_domain("LandUnits", "reinforced", &[("R", "Reinforced")])
    }

    fn resolved(standard: StandardVersion, name: &str) -> SymbolWorkflow {
        let mut wf = workflow(standard);
        wf.select_style(Some(&style(LAND_TAGS, name))).unwrap();
        wf.resolve_domains(&land_domains()).unwrap();
        wf
    }

    #[test]
    fn select_style_decodes_and_routes() {
        let mut wf = workflow(StandardVersion::Mil2525D);
        let dataset = wf.select_style(Some(&style(LAND_TAGS, "Infantry"))).unwrap();

        assert_eq!(dataset, Some("LandUnits"));
        assert_eq!(wf.state(), WorkflowState::StyleSelected);
        assert_eq!(wf.geometry(), GeometryClass::Point);
        assert_eq!(wf.current().display().symbol_set.as_deref(), Some("10"));
        assert_eq!(wf.current().display().symbol_entity.as_deref(), Some("121100"));
        assert_eq!(wf.current().symbol_tags, LAND_TAGS);
    }

    #[test]
    fn selecting_none_returns_to_idle() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        assert_eq!(wf.select_style(None).unwrap(), None);
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert!(wf.current().is_empty());
    }

    #[test]
    fn malformed_tags_reject_the_item() {
        let mut wf = workflow(StandardVersion::Mil2525D);
        let err = wf.select_style(Some(&style("a;b", "x"))).unwrap_err();
        assert!(matches!(err, MilsymError::MalformedTag { .. }));
        assert_eq!(wf.state(), WorkflowState::Idle);
    }

    #[test]
    fn unrouted_symbol_stays_style_selected() {
        let mut wf = workflow(StandardVersion::Mil2525D);
        let err = wf
            .select_style(Some(&style("x;y;POINT;z;99000000", "x")))
            .unwrap_err();
        assert!(matches!(err, MilsymError::RouteNotFound { .. }));
        assert_eq!(wf.state(), WorkflowState::StyleSelected);
        assert_eq!(wf.dataset(), None);
        assert!(matches!(
            wf.resolve_domains(&land_domains()),
            Err(MilsymError::InvalidState { .. })
        ));
    }

    #[test]
    fn affiliation_inferred_from_display_name() {
        let wf = resolved(StandardVersion::Mil2525D, "Infantry : Hostile");
        assert_eq!(wf.state(), WorkflowState::DomainsResolved);
        assert_eq!(wf.current().display().identity.as_deref(), Some("6"));
    }

    #[test]
    fn affiliation_uses_standard_vocabulary() {
        let wf = resolved(StandardVersion::Mil2525CB2, "Infantry : Friend");
        assert_eq!(wf.current().display().identity.as_deref(), Some("3"));
    }

    #[test]
    fn legacy_code_applied_under_2525c_only() {
        let c = resolved(StandardVersion::Mil2525CB2, "Infantry");
        assert_eq!(
            c.current().display().legacy_function_code.as_deref(),
            Some("S-G-UCI---")
        );
        let d = resolved(StandardVersion::Mil2525D, "Infantry");
        assert_eq!(d.current().display().legacy_function_code, None);
    }

    #[test]
    fn missing_domains_are_skipped() {
        let wf = resolved(StandardVersion::Mil2525D, "Infantry");
        assert!(wf.domain(Field::Echelon).is_some());
        assert!(wf.domain(Field::Mobility).is_none());
    }

    #[test]
    fn load_values_matches_codes_and_copies_labels() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        let mut source = AttributeSet::new(StandardVersion::Mil2525D);
        source.set_field(Field::Echelon, "18").unwrap();
        source.set_field(Field::Mobility, "31").unwrap();
        source.set_field(Field::Reinforced, "X").unwrap();
        source.set_field(Field::UniqueDesignation, "2-7 IN").unwrap();

        let applied = wf.load_values(&source).unwrap();

        assert_eq!(applied, 2);
        assert_eq!(wf.state(), WorkflowState::Editing);
        let current = wf.current();
        assert_eq!(current.display().echelon.as_deref(), Some("18"));
        assert_eq!(current.display().mobility, None);
        assert_eq!(current.labels().reinforced, None);
        assert_eq!(current.labels().unique_designation.as_deref(), Some("2-7 IN"));
        assert!(current.preview().is_some());
    }

    #[test]
    fn value_outside_domain_is_left_unset() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry : Hostile");
        assert_eq!(wf.current().display().identity.as_deref(), Some("6"));

        let mut source = AttributeSet::new(StandardVersion::Mil2525D);
        source.set_field(Field::Identity, "9").unwrap();
        source.set_field(Field::Echelon, "16").unwrap();

        let applied = wf.load_values(&source).unwrap();

        assert_eq!(applied, 1);
        assert_eq!(wf.current().display().identity, None);
        assert_eq!(wf.current().display().echelon.as_deref(), Some("16"));
        assert_eq!(wf.current().display().symbol_set.as_deref(), Some("10"));
    }

    #[test]
    fn seeded_symbol_set_survives_unknown_value() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        let mut source = AttributeSet::new(StandardVersion::Mil2525D);
        source.set_field(Field::SymbolSet, "11").unwrap();

        assert_eq!(wf.load_values(&source).unwrap(), 0);
        assert_eq!(wf.current().display().symbol_set.as_deref(), Some("10"));
    }

    #[test]
    fn begin_new_then_commit_creates_record() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        let store = FakeRecordStore::default();
        wf.begin_new().unwrap();
        wf.set_field(Field::Echelon, "16").unwrap();

        let id = wf.commit(&store).unwrap();

        assert_eq!(wf.state(), WorkflowState::Editing);
        assert_eq!(wf.record_id(), Some(id));
        let stored = store.record(id).unwrap();
        assert_eq!(stored.dataset, "LandUnits");
        assert_eq!(
            stored.fields.get("symbolset"),
            Some(&crate::attributes::FieldValue::Integer(10))
        );
    }

    #[test]
    fn second_commit_updates() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        let store = FakeRecordStore::default();
        wf.begin_new().unwrap();
        let id = wf.commit(&store).unwrap();
        wf.set_field(Field::UniqueDesignation, "B Co").unwrap();

        assert_eq!(wf.commit(&store).unwrap(), id);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.record(id).unwrap().fields.get("uniquedesignation"),
            Some(&crate::attributes::FieldValue::Text("B Co".into()))
        );
    }

    #[test]
    fn commit_failure_is_surfaced_verbatim() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        let store = FakeRecordStore::default();
        store.reject_writes("feature class is read-only");
        wf.begin_new().unwrap();

        match wf.commit(&store) {
            Err(MilsymError::CommitFailure(message)) => {
                assert_eq!(message, "feature class is read-only")
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(wf.state(), WorkflowState::AddingNew);
    }

    #[test]
    fn operations_out_of_order_are_rejected() {
        let mut wf = workflow(StandardVersion::Mil2525D);
        assert!(matches!(
            wf.begin_new(),
            Err(MilsymError::InvalidState { operation: "begin_new", state: "idle" })
        ));
        assert!(wf.set_field(Field::Echelon, "16").is_err());
        assert!(wf.commit(&FakeRecordStore::default()).is_err());
    }

    #[test]
    fn legacy_field_rejected_under_2525d() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        wf.begin_new().unwrap();
        assert!(wf.set_field(Field::LegacyFunctionCode, "S-G-UCI---").is_err());
    }

    #[test]
    fn open_record_loads_for_editing() {
        let store = FakeRecordStore::default();
        let mut author = resolved(StandardVersion::Mil2525D, "Infantry");
        author.begin_new().unwrap();
        author.set_field(Field::Echelon, "16").unwrap();
        author.set_field(Field::StaffComments, "hold").unwrap();
        let id = author.commit(&store).unwrap();

        let mut wf = workflow(StandardVersion::Mil2525D);
        wf.open_record("LandUnits", id, GeometryClass::Point, &store, &land_domains())
            .unwrap();

        assert_eq!(wf.state(), WorkflowState::Editing);
        assert_eq!(wf.record_id(), Some(id));
        assert_eq!(wf.current().display().echelon.as_deref(), Some("16"));
        assert_eq!(wf.current().labels().staff_comments.as_deref(), Some("hold"));
        assert_eq!(wf.current().display().symbol_entity.as_deref(), Some("121100"));
    }

    #[test]
    fn favorite_round_trip_through_workflow() {
        let mut repo = FavoritesRepository::new(MemBackend::new());
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry : Friend");
        wf.begin_new().unwrap();
        wf.set_field(Field::Echelon, "18").unwrap();
        let id = wf.save_as_favorite(&mut repo).unwrap();

        let favorite = repo.get(&id).unwrap().clone();
        let mut other = workflow(StandardVersion::Mil2525D);
        other.load_favorite(&favorite, &land_domains()).unwrap();

        assert_eq!(other.state(), WorkflowState::Editing);
        assert_eq!(other.dataset(), Some("LandUnits"));
        assert_eq!(other.current().display().identity.as_deref(), Some("3"));
        assert_eq!(other.current().display().echelon.as_deref(), Some("18"));
        assert_eq!(other.current().symbol_tags, LAND_TAGS);
    }

    #[test]
    fn favorite_of_other_standard_is_refused() {
        let favorite = AttributeSet::new(StandardVersion::Mil2525CB2);
        let mut wf = workflow(StandardVersion::Mil2525D);
        assert!(wf.load_favorite(&favorite, &land_domains()).is_err());
    }

    #[test]
    fn changing_standard_abandons_selection() {
        let mut wf = resolved(StandardVersion::Mil2525D, "Infantry");
        wf.set_standard(StandardVersion::Mil2525CB2);
        assert_eq!(wf.state(), WorkflowState::Idle);
        assert_eq!(wf.current().standard, StandardVersion::Mil2525CB2);
        assert!(wf.current().is_empty());
    }
}
