//! # Domain Model: Attribute Sets
//!
//! An [`AttributeSet`] is everything needed to describe one symbol: the
//! display attributes that select and decorate the glyph, the label
//! attributes drawn around it, plus bookkeeping (favorite id, standard tag,
//! raw style tags, cached preview).
//!
//! ## Unset Values
//!
//! Every attribute is an `Option`. `None` is the only "unset" state: setting a
//! field to an empty string unsets it, so an empty string is never stored.
//! This is what lets dictionary conversions omit unset fields and still
//! round-trip.
//!
//! ## Mutation and the Preview Cache
//!
//! Fields are only mutated through [`AttributeSet::set_field`] /
//! [`AttributeSet::clear_field`], which validate the value and drop the cached
//! preview whenever a display field changes. Regenerating the preview is a
//! separate, explicit step ([`AttributeSet::on_field_changed`]) driven by the
//! owning workflow, so mutation order and render order stay visible.
//!
//! ## Lifecycle
//!
//! - Created empty for interactive authoring, or from a field dictionary
//!   (see [`AttributeSet::from_dictionary`]).
//! - [`AttributeSet::reset`] before loading a new selection, so nothing leaks
//!   from the previous symbol.

use chrono::{DateTime, Utc};
use tracing::warn;

use crate::attributes::{format_timestamp, get_spec, parse_timestamp, Field, FieldGroup, FieldKind};
use crate::error::{MilsymError, Result};
use crate::services::SymbolRenderer;
use crate::standard::StandardVersion;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayAttributes {
    pub identity: Option<String>,
    pub symbol_set: Option<String>,
    pub symbol_entity: Option<String>,
    pub indicator: Option<String>,
    pub echelon: Option<String>,
    pub mobility: Option<String>,
    pub operational_condition: Option<String>,
    pub status: Option<String>,
    pub context: Option<String>,
    pub modifier1: Option<String>,
    pub modifier2: Option<String>,
    /// 2525C_B2 only.
    pub legacy_function_code: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelAttributes {
    pub date_time_valid: Option<DateTime<Utc>>,
    pub date_time_expired: Option<DateTime<Utc>>,
    pub unique_designation: Option<String>,
    pub staff_comments: Option<String>,
    pub additional_information: Option<String>,
    pub r#type: Option<String>,
    pub common_identifier: Option<String>,
    pub speed: Option<i16>,
    pub higher_formation: Option<String>,
    pub reinforced: Option<String>,
    pub credibility: Option<String>,
    pub reliability: Option<String>,
    pub country_code: Option<String>,
}

/// Rendered symbol image, produced by the external renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolPreview {
    pub image: Vec<u8>,
    pub size: u32,
}

#[derive(Debug, Clone, Default)]
pub struct AttributeSet {
    display: DisplayAttributes,
    labels: LabelAttributes,
    /// Assigned once, when the set is saved as a favorite.
    pub favorite_id: Option<String>,
    pub standard: StandardVersion,
    /// Raw style tags the set was derived from.
    pub symbol_tags: String,
    preview: Option<SymbolPreview>,
}

// Equality ignores the preview cache.
impl PartialEq for AttributeSet {
    fn eq(&self, other: &Self) -> bool {
        self.display == other.display
            && self.labels == other.labels
            && self.favorite_id == other.favorite_id
            && self.standard == other.standard
            && self.symbol_tags == other.symbol_tags
    }
}

impl AttributeSet {
    pub fn new(standard: StandardVersion) -> Self {
        Self {
            standard,
            ..Default::default()
        }
    }

    pub fn display(&self) -> &DisplayAttributes {
        &self.display
    }

    pub fn labels(&self) -> &LabelAttributes {
        &self.labels
    }

    pub fn preview(&self) -> Option<&SymbolPreview> {
        self.preview.as_ref()
    }

    /// True when no display or label field is set.
    pub fn is_empty(&self) -> bool {
        self.display == DisplayAttributes::default() && self.labels == LabelAttributes::default()
    }

    /// Text form of a field, or `None` when unset.
    ///
    /// Integer fields keep their stored text (leading zeros included);
    /// speed is rendered in decimal and timestamps as RFC 3339.
    pub fn field_text(&self, field: Field) -> Option<String> {
        match field {
            Field::Speed => self.labels.speed.map(|v| v.to_string()),
            Field::DateTimeValid => self.labels.date_time_valid.as_ref().map(format_timestamp),
            Field::DateTimeExpired => self.labels.date_time_expired.as_ref().map(format_timestamp),
            _ => self.text_slot(field).cloned(),
        }
    }

    /// Set a field from its text form.
    ///
    /// Empty text unsets the field. Numeric and timestamp fields are
    /// validated; a value that does not coerce fails with
    /// [`MilsymError::Coercion`] and leaves the field untouched.
    pub fn set_field(&mut self, field: Field, value: &str) -> Result<()> {
        if value.is_empty() {
            self.clear_field(field);
            return Ok(());
        }

        let spec = get_spec(field);
        let coercion = || MilsymError::Coercion {
            field: spec.name,
            value: value.to_string(),
        };

        match spec.kind {
            FieldKind::Text => {
                self.store_text(field, value.to_string());
            }
            FieldKind::Integer => {
                value.trim().parse::<i32>().map_err(|_| coercion())?;
                self.store_text(field, value.to_string());
            }
            FieldKind::Short => {
                self.labels.speed = Some(value.trim().parse::<i16>().map_err(|_| coercion())?);
            }
            FieldKind::Timestamp => {
                let t = parse_timestamp(value).ok_or_else(coercion)?;
                match field {
                    Field::DateTimeExpired => self.labels.date_time_expired = Some(t),
                    _ => self.labels.date_time_valid = Some(t),
                }
            }
        }

        self.touched(field);
        Ok(())
    }

    /// Unset a single field.
    pub fn clear_field(&mut self, field: Field) {
        match field {
            Field::Speed => self.labels.speed = None,
            Field::DateTimeValid => self.labels.date_time_valid = None,
            Field::DateTimeExpired => self.labels.date_time_expired = None,
            _ => {
                if let Some(slot) = self.text_slot_mut(field) {
                    *slot = None;
                }
            }
        }
        self.touched(field);
    }

    /// Unset every display and label field and forget the style tags.
    ///
    /// The favorite id and standard tag are kept.
    pub fn reset(&mut self) {
        self.display = DisplayAttributes::default();
        self.labels = LabelAttributes::default();
        self.symbol_tags.clear();
        self.preview = None;
    }

    /// Regenerate the preview after a field change.
    ///
    /// Invoked by the owner after each mutation it wants reflected; the set
    /// never renders on its own.
    pub fn on_field_changed(&mut self, renderer: &dyn SymbolRenderer, size: u32) {
        self.regenerate_preview(renderer, size);
    }

    /// Render the display attributes and cache the result.
    ///
    /// A failed render clears the cache; it never fails the caller.
    pub fn regenerate_preview(&mut self, renderer: &dyn SymbolRenderer, size: u32) {
        let attributes = self.to_render_dictionary();
        self.preview = match renderer.render(&attributes, size) {
            Ok(preview) => preview,
            Err(e) => {
                warn!(error = %e, favorite_id = ?self.favorite_id, "symbol render failed");
                None
            }
        };
    }

    fn touched(&mut self, field: Field) {
        if get_spec(field).group == FieldGroup::Display {
            self.preview = None;
        }
    }

    fn store_text(&mut self, field: Field, value: String) {
        if let Some(slot) = self.text_slot_mut(field) {
            *slot = Some(value);
        }
    }

    fn text_slot(&self, field: Field) -> Option<&String> {
        let d = &self.display;
        let l = &self.labels;
        let slot = match field {
            Field::Identity => &d.identity,
            Field::SymbolSet => &d.symbol_set,
            Field::SymbolEntity => &d.symbol_entity,
            Field::Indicator => &d.indicator,
            Field::Echelon => &d.echelon,
            Field::Mobility => &d.mobility,
            Field::OperationalCondition => &d.operational_condition,
            Field::Status => &d.status,
            Field::Context => &d.context,
            Field::Modifier1 => &d.modifier1,
            Field::Modifier2 => &d.modifier2,
            Field::LegacyFunctionCode => &d.legacy_function_code,
            Field::UniqueDesignation => &l.unique_designation,
            Field::StaffComments => &l.staff_comments,
            Field::AdditionalInformation => &l.additional_information,
            Field::Type => &l.r#type,
            Field::CommonIdentifier => &l.common_identifier,
            Field::HigherFormation => &l.higher_formation,
            Field::Reinforced => &l.reinforced,
            Field::Credibility => &l.credibility,
            Field::Reliability => &l.reliability,
            Field::CountryCode => &l.country_code,
            Field::Speed | Field::DateTimeValid | Field::DateTimeExpired => return None,
        };
        slot.as_ref()
    }

    fn text_slot_mut(&mut self, field: Field) -> Option<&mut Option<String>> {
        let d = &mut self.display;
        let l = &mut self.labels;
        let slot = match field {
            Field::Identity => &mut d.identity,
            Field::SymbolSet => &mut d.symbol_set,
            Field::SymbolEntity => &mut d.symbol_entity,
            Field::Indicator => &mut d.indicator,
            Field::Echelon => &mut d.echelon,
            Field::Mobility => &mut d.mobility,
            Field::OperationalCondition => &mut d.operational_condition,
            Field::Status => &mut d.status,
            Field::Context => &mut d.context,
            Field::Modifier1 => &mut d.modifier1,
            Field::Modifier2 => &mut d.modifier2,
            Field::LegacyFunctionCode => &mut d.legacy_function_code,
            Field::UniqueDesignation => &mut l.unique_designation,
            Field::StaffComments => &mut l.staff_comments,
            Field::AdditionalInformation => &mut l.additional_information,
            Field::Type => &mut l.r#type,
            Field::CommonIdentifier => &mut l.common_identifier,
            Field::HigherFormation => &mut l.higher_formation,
            Field::Reinforced => &mut l.reinforced,
            Field::Credibility => &mut l.credibility,
            Field::Reliability => &mut l.reliability,
            Field::CountryCode => &mut l.country_code,
            Field::Speed | Field::DateTimeValid | Field::DateTimeExpired => return None,
        };
        Some(slot)
    }
}
