//! Field specifications and registry.
//!
//! This module defines the schema shared by every representation of an
//! attribute set: the field's name under each standard, its value kind, and
//! whether its values come from a coded domain.

use crate::standard::StandardVersion;

/// Every attribute an [`AttributeSet`](crate::model::AttributeSet) carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    // Display attributes
    Identity,
    SymbolSet,
    SymbolEntity,
    Indicator,
    Echelon,
    Mobility,
    OperationalCondition,
    Status,
    Context,
    Modifier1,
    Modifier2,
    LegacyFunctionCode,
    // Label attributes
    DateTimeValid,
    DateTimeExpired,
    UniqueDesignation,
    StaffComments,
    AdditionalInformation,
    Type,
    CommonIdentifier,
    Speed,
    HigherFormation,
    Reinforced,
    Credibility,
    Reliability,
    CountryCode,
}

/// The kind of value a field holds.
///
/// Determines how the value is coerced when read from a dictionary and what
/// native type it is written as in a typed record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free or coded text.
    Text,

    /// Text that must parse as a 32-bit integer (symbol set, entity).
    ///
    /// The text form is kept as-is so leading zeros survive a round-trip.
    Integer,

    /// 16-bit integer (speed).
    Short,

    /// UTC timestamp, written as RFC 3339.
    Timestamp,
}

/// Which half of an attribute set a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldGroup {
    /// Drives the rendered symbol; changes invalidate the preview.
    Display,
    /// Text labels drawn around the symbol.
    Label,
}

/// Specification for a single field.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    pub field: Field,

    /// Name used in dictionaries and records under 2525D.
    pub name: &'static str,

    /// Name under 2525C_B2, when it differs.
    pub legacy_name: Option<&'static str>,

    pub kind: FieldKind,

    pub group: FieldGroup,

    /// Whether values are codes from a domain vocabulary.
    pub coded: bool,

    /// Restricts the field to a single standard.
    pub only: Option<StandardVersion>,
}

impl FieldSpec {
    const fn new(field: Field, name: &'static str, group: FieldGroup) -> Self {
        Self {
            field,
            name,
            legacy_name: None,
            kind: FieldKind::Text,
            group,
            coded: false,
            only: None,
        }
    }

    const fn display(field: Field, name: &'static str) -> Self {
        Self::new(field, name, FieldGroup::Display).coded()
    }

    const fn label(field: Field, name: &'static str) -> Self {
        Self::new(field, name, FieldGroup::Label)
    }

    const fn kind(mut self, kind: FieldKind) -> Self {
        self.kind = kind;
        self
    }

    const fn coded(mut self) -> Self {
        self.coded = true;
        self
    }

    const fn legacy_name(mut self, name: &'static str) -> Self {
        self.legacy_name = Some(name);
        self
    }

    const fn only(mut self, standard: StandardVersion) -> Self {
        self.only = Some(standard);
        self
    }

    /// The field's external name under `standard`.
    pub fn name_for(&self, standard: StandardVersion) -> &'static str {
        match (standard, self.legacy_name) {
            (StandardVersion::Mil2525CB2, Some(name)) => name,
            _ => self.name,
        }
    }

    pub fn applies_to(&self, standard: StandardVersion) -> bool {
        self.only.is_none_or(|only| only == standard)
    }
}

/// Registry of all fields, in dictionary order.
///
/// This is the single mapping table behind `to_dictionary`,
/// `from_dictionary`, `to_record` and domain resolution. Entries are in
/// [`Field`] declaration order so a field indexes its own spec.
pub const FIELDS: &[FieldSpec] = &[
    FieldSpec::display(Field::Identity, "identity").legacy_name("affiliation"),
    FieldSpec::display(Field::SymbolSet, "symbolset").kind(FieldKind::Integer),
    FieldSpec::display(Field::SymbolEntity, "symbolentity").kind(FieldKind::Integer),
    FieldSpec::display(Field::Indicator, "indicator"),
    FieldSpec::display(Field::Echelon, "echelon"),
    FieldSpec::display(Field::Mobility, "mobility"),
    FieldSpec::display(Field::OperationalCondition, "operationalcondition"),
    FieldSpec::display(Field::Status, "status"),
    FieldSpec::display(Field::Context, "context"),
    FieldSpec::display(Field::Modifier1, "modifier1"),
    FieldSpec::display(Field::Modifier2, "modifier2"),
    FieldSpec::display(Field::LegacyFunctionCode, "extendedfunctioncode")
        .only(StandardVersion::Mil2525CB2),
    FieldSpec::label(Field::DateTimeValid, "datetimevalid").kind(FieldKind::Timestamp),
    FieldSpec::label(Field::DateTimeExpired, "datetimeexpired").kind(FieldKind::Timestamp),
    FieldSpec::label(Field::UniqueDesignation, "uniquedesignation"),
    FieldSpec::label(Field::StaffComments, "staffcomment"),
    FieldSpec::label(Field::AdditionalInformation, "additionalinformation"),
    FieldSpec::label(Field::Type, "type"),
    FieldSpec::label(Field::CommonIdentifier, "commonidentifier"),
    FieldSpec::label(Field::Speed, "speed").kind(FieldKind::Short),
    FieldSpec::label(Field::HigherFormation, "higherFormation"),
    FieldSpec::label(Field::Reinforced, "reinforced").coded(),
    FieldSpec::label(Field::Credibility, "credibility").coded(),
    FieldSpec::label(Field::Reliability, "reliability").coded(),
    FieldSpec::label(Field::CountryCode, "countrycode").coded(),
];

/// Look up the spec of a field.
pub fn get_spec(field: Field) -> &'static FieldSpec {
    &FIELDS[field as usize]
}

/// Look up a field by its external name under `standard`.
pub fn spec_by_name(name: &str, standard: StandardVersion) -> Option<&'static FieldSpec> {
    fields_for(standard).find(|spec| spec.name_for(standard) == name)
}

/// Fields carried under `standard`, in registry order.
pub fn fields_for(standard: StandardVersion) -> impl Iterator<Item = &'static FieldSpec> {
    FIELDS.iter().filter(move |spec| spec.applies_to(standard))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_in_declaration_order() {
        for (index, spec) in FIELDS.iter().enumerate() {
            assert_eq!(spec.field as usize, index, "{} is out of order", spec.name);
        }
    }

    #[test]
    fn every_field_has_a_spec() {
        assert_eq!(get_spec(Field::Speed).kind, FieldKind::Short);
        assert_eq!(get_spec(Field::SymbolSet).kind, FieldKind::Integer);
        assert_eq!(get_spec(Field::DateTimeValid).kind, FieldKind::Timestamp);
        assert_eq!(FIELDS.len(), 25);
    }

    #[test]
    fn identity_is_renamed_under_2525c() {
        let spec = get_spec(Field::Identity);
        assert_eq!(spec.name_for(StandardVersion::Mil2525D), "identity");
        assert_eq!(spec.name_for(StandardVersion::Mil2525CB2), "affiliation");
    }

    #[test]
    fn legacy_code_only_under_2525c() {
        assert!(spec_by_name("extendedfunctioncode", StandardVersion::Mil2525D).is_none());
        assert_eq!(
            spec_by_name("extendedfunctioncode", StandardVersion::Mil2525CB2).map(|s| s.field),
            Some(Field::LegacyFunctionCode)
        );
        assert_eq!(fields_for(StandardVersion::Mil2525D).count(), 24);
        assert_eq!(fields_for(StandardVersion::Mil2525CB2).count(), 25);
    }

    #[test]
    fn spec_by_name_respects_standard() {
        assert!(spec_by_name("affiliation", StandardVersion::Mil2525D).is_none());
        assert!(spec_by_name("identity", StandardVersion::Mil2525CB2).is_none());
    }

    #[test]
    fn display_fields_are_coded() {
        for spec in FIELDS.iter().filter(|s| s.group == FieldGroup::Display) {
            assert!(spec.coded, "{} should be coded", spec.name);
        }
        assert!(!get_spec(Field::UniqueDesignation).coded);
    }
}
