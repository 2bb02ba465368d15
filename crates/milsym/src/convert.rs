//! # Attribute Conversions
//!
//! Three representations share the registry in [`crate::attributes`]:
//!
//! | Target | Function | Unset fields | Numbers |
//! |--------|----------|--------------|---------|
//! | Field dictionary | [`AttributeSet::to_dictionary`] | omitted | text |
//! | Typed record | [`AttributeSet::to_record`] | omitted | i32 / i16 |
//! | Renderer input | [`AttributeSet::to_render_dictionary`] | omitted | text |
//!
//! Dictionary keys are the field names of the set's standard, so the same set
//! writes `identity` under 2525D and `affiliation` under 2525C_B2.
//!
//! ## Round-Trip Contract
//!
//! `from_dictionary(to_dictionary(x))` reconstructs every set field of `x`,
//! and any key absent from the dictionary decodes to unset.
//!
//! ## Echelon/Mobility and Status/Operational Condition
//!
//! Records and dictionaries keep four distinct keys. Only the renderer input
//! folds mobility into `echelon` and status into `operationalcondition`,
//! the shape the renderer expects.

use std::collections::BTreeMap;
use tracing::debug;

use crate::attributes::{
    fields_for, spec_by_name, Field, FieldGroup, FieldKind, FieldValue, RecordFields, RecordWriter,
};
use crate::error::{MilsymError, Result};
use crate::model::AttributeSet;
use crate::standard::StandardVersion;

pub type FieldDictionary = BTreeMap<String, String>;

impl AttributeSet {
    /// Every set field under its name for this set's standard.
    pub fn to_dictionary(&self) -> FieldDictionary {
        fields_for(self.standard)
            .filter_map(|spec| {
                self.field_text(spec.field)
                    .map(|text| (spec.name_for(self.standard).to_string(), text))
            })
            .collect()
    }

    /// Build a set from a field dictionary written under `standard`.
    ///
    /// Unknown keys are ignored. A value that fails to coerce aborts with
    /// [`MilsymError::Coercion`] naming the field.
    pub fn from_dictionary(fields: &FieldDictionary, standard: StandardVersion) -> Result<Self> {
        let mut set = AttributeSet::new(standard);
        for (name, value) in fields {
            match spec_by_name(name, standard) {
                Some(spec) => set.set_field(spec.field, value)?,
                None => debug!(field = %name, %standard, "ignoring unknown field"),
            }
        }
        Ok(set)
    }

    /// Write every set field to a typed record.
    ///
    /// Symbol set and entity become `Integer`, speed `Short`, timestamps
    /// `Timestamp`; everything else is `Text`.
    pub fn to_record<W: RecordWriter + ?Sized>(&self, writer: &mut W) -> Result<()> {
        for spec in fields_for(self.standard) {
            let value = match spec.kind {
                FieldKind::Text => self.field_text(spec.field).map(FieldValue::Text),
                FieldKind::Integer => match self.field_text(spec.field) {
                    Some(text) => Some(FieldValue::Integer(text.trim().parse().map_err(|_| {
                        MilsymError::Coercion {
                            field: spec.name,
                            value: text.clone(),
                        }
                    })?)),
                    None => None,
                },
                FieldKind::Short => self.labels().speed.map(FieldValue::Short),
                FieldKind::Timestamp => match spec.field {
                    Field::DateTimeExpired => self.labels().date_time_expired,
                    _ => self.labels().date_time_valid,
                }
                .map(FieldValue::Timestamp),
            };

            if let Some(value) = value {
                writer.write(spec.name_for(self.standard), value);
            }
        }
        Ok(())
    }

    /// Convenience for [`to_record`](Self::to_record) into an owned map.
    pub fn to_record_fields(&self) -> Result<RecordFields> {
        let mut record = RecordFields::new();
        self.to_record(&mut record)?;
        Ok(record)
    }

    /// Display attributes in the renderer's vocabulary.
    ///
    /// Keys are always the 2525D names. Mobility is written under `echelon`
    /// and status under `operationalcondition`, overriding those fields when
    /// both are set.
    pub fn to_render_dictionary(&self) -> FieldDictionary {
        let mut out = FieldDictionary::new();
        for spec in fields_for(self.standard).filter(|s| s.group == FieldGroup::Display) {
            let Some(text) = self.field_text(spec.field) else {
                continue;
            };
            let key = match spec.field {
                Field::Mobility => "echelon",
                Field::Status => "operationalcondition",
                _ => spec.name,
            };
            out.insert(key.to_string(), text);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dict(pairs: &[(&str, &str)]) -> FieldDictionary {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn populated(standard: StandardVersion) -> AttributeSet {
        let mut set = AttributeSet::new(standard);
        set.set_field(Field::Identity, "3").unwrap();
        set.set_field(Field::SymbolSet, "01").unwrap();
        set.set_field(Field::SymbolEntity, "110100").unwrap();
        set.set_field(Field::Echelon, "16").unwrap();
        set.set_field(Field::Status, "1").unwrap();
        set.set_field(Field::UniqueDesignation, "Eagle 1").unwrap();
        set.set_field(Field::Speed, "450").unwrap();
        set.set_field(Field::DateTimeValid, "2024-05-01T12:00:00Z").unwrap();
        set
    }

    #[test]
    fn to_dictionary_omits_unset_fields() {
        let map = populated(StandardVersion::Mil2525D).to_dictionary();
        assert_eq!(map.len(), 8);
        assert_eq!(map["symbolset"], "01");
        assert_eq!(map["speed"], "450");
        assert_eq!(map["datetimevalid"], "2024-05-01T12:00:00Z");
        assert!(!map.contains_key("mobility"));
    }

    #[test]
    fn dictionary_keys_follow_standard() {
        let d = populated(StandardVersion::Mil2525D).to_dictionary();
        assert!(d.contains_key("identity"));

        let c = populated(StandardVersion::Mil2525CB2).to_dictionary();
        assert!(c.contains_key("affiliation"));
        assert!(!c.contains_key("identity"));
    }

    #[test]
    fn round_trip_reproduces_set_fields() {
        let original = populated(StandardVersion::Mil2525D);
        let restored =
            AttributeSet::from_dictionary(&original.to_dictionary(), StandardVersion::Mil2525D)
                .unwrap();
        assert_eq!(restored, original);
    }

    #[test]
    fn mobility_and_status_survive_round_trip() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525D);
        set.set_field(Field::Mobility, "31").unwrap();
        set.set_field(Field::OperationalCondition, "2").unwrap();
        let restored =
            AttributeSet::from_dictionary(&set.to_dictionary(), StandardVersion::Mil2525D).unwrap();
        assert_eq!(restored.display().mobility.as_deref(), Some("31"));
        assert_eq!(restored.display().echelon, None);
        assert_eq!(restored.display().operational_condition.as_deref(), Some("2"));
    }

    #[test]
    fn from_dictionary_ignores_unknown_keys() {
        let set = AttributeSet::from_dictionary(
            &dict(&[("identity", "3"), ("shape", "circle")]),
            StandardVersion::Mil2525D,
        )
        .unwrap();
        assert_eq!(set.display().identity.as_deref(), Some("3"));
        assert_eq!(set.to_dictionary().len(), 1);
    }

    #[test]
    fn from_dictionary_names_failed_field() {
        let err = AttributeSet::from_dictionary(
            &dict(&[("speed", "fast")]),
            StandardVersion::Mil2525D,
        )
        .unwrap_err();
        assert!(matches!(err, MilsymError::Coercion { field: "speed", .. }));
    }

    #[test]
    fn legacy_code_is_read_only_under_2525c() {
        let map = dict(&[("extendedfunctioncode", "S-G-UCI---")]);
        let d = AttributeSet::from_dictionary(&map, StandardVersion::Mil2525D).unwrap();
        assert_eq!(d.display().legacy_function_code, None);

        let c = AttributeSet::from_dictionary(&map, StandardVersion::Mil2525CB2).unwrap();
        assert_eq!(c.display().legacy_function_code.as_deref(), Some("S-G-UCI---"));
    }

    #[test]
    fn reset_then_to_dictionary_is_empty() {
        let mut set = populated(StandardVersion::Mil2525CB2);
        set.reset();
        assert!(set.to_dictionary().is_empty());
    }

    #[test]
    fn record_uses_native_types() {
        let record = populated(StandardVersion::Mil2525D).to_record_fields().unwrap();
        assert_eq!(record.get("symbolset"), Some(&FieldValue::Integer(1)));
        assert_eq!(record.get("symbolentity"), Some(&FieldValue::Integer(110100)));
        assert_eq!(record.get("speed"), Some(&FieldValue::Short(450)));
        assert_eq!(
            record.get("datetimevalid"),
            Some(&FieldValue::Timestamp(
                Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            ))
        );
        assert_eq!(record.get("identity"), Some(&FieldValue::Text("3".into())));
    }

    #[test]
    fn record_keeps_distinct_echelon_and_mobility() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525D);
        set.set_field(Field::Echelon, "16").unwrap();
        set.set_field(Field::Mobility, "31").unwrap();
        set.set_field(Field::OperationalCondition, "2").unwrap();
        set.set_field(Field::Status, "1").unwrap();

        let record = set.to_record_fields().unwrap();
        assert_eq!(record.get("echelon"), Some(&FieldValue::Text("16".into())));
        assert_eq!(record.get("mobility"), Some(&FieldValue::Text("31".into())));
        assert_eq!(record.get("operationalcondition"), Some(&FieldValue::Text("2".into())));
        assert_eq!(record.get("status"), Some(&FieldValue::Text("1".into())));
    }

    #[test]
    fn render_dictionary_folds_shared_slots() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525D);
        set.set_field(Field::Echelon, "16").unwrap();
        set.set_field(Field::Mobility, "31").unwrap();
        set.set_field(Field::Status, "1").unwrap();
        set.set_field(Field::UniqueDesignation, "label").unwrap();

        let map = set.to_render_dictionary();
        assert_eq!(map["echelon"], "31");
        assert_eq!(map["operationalcondition"], "1");
        assert!(!map.contains_key("mobility"));
        assert!(!map.contains_key("status"));
        assert!(!map.contains_key("uniquedesignation"));
    }

    #[test]
    fn render_dictionary_uses_2525d_names() {
        let mut set = AttributeSet::new(StandardVersion::Mil2525CB2);
        set.set_field(Field::Identity, "F").unwrap();
        set.set_field(Field::LegacyFunctionCode, "S-G-UCI---").unwrap();
        let map = set.to_render_dictionary();
        assert_eq!(map["identity"], "F");
        assert_eq!(map["extendedfunctioncode"], "S-G-UCI---");
    }
}
