//! # Standard Versions
//!
//! Two incompatible symbology standards are supported. They differ in field
//! names, in the affiliation vocabulary, and in whether a legacy function code
//! is carried at all:
//!
//! | | 2525D | 2525C_B2 |
//! |---|---|---|
//! | identity field | `identity` | `affiliation` |
//! | legacy function code | - | `extendedfunctioncode` |
//! | friendly value | `Friend` | `Friendly` |
//! | hostile value | `Hostile/Faker` | `Hostile` |
//!
//! The standard is never ambient state: every parser, conversion and filter
//! takes it as an argument, and every persisted set carries it as a tag.

use crate::error::MilsymError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StandardVersion {
    #[default]
    #[serde(rename = "2525D")]
    Mil2525D,
    #[serde(rename = "2525C_B2")]
    Mil2525CB2,
}

/// Affiliation inferred from a style item's tags or display name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Affiliation {
    Friend,
    Hostile,
    Neutral,
    Unknown,
}

impl Affiliation {
    /// Checked in this order; the first keyword found wins.
    pub const ALL: [Affiliation; 4] = [
        Affiliation::Friend,
        Affiliation::Hostile,
        Affiliation::Neutral,
        Affiliation::Unknown,
    ];

    /// Upper-case keyword searched for in tags and display names.
    pub fn keyword(self) -> &'static str {
        match self {
            Affiliation::Friend => "FRIEND",
            Affiliation::Hostile => "HOSTILE",
            Affiliation::Neutral => "NEUTRAL",
            Affiliation::Unknown => "UNKNOWN",
        }
    }

    /// Infer the affiliation implied by a tag string or a display name.
    ///
    /// Tags match anywhere; the display name only matches in the text after
    /// its first colon (e.g. `"Infantry : Friend"`).
    pub fn infer(tags: &str, display_name: &str) -> Option<Affiliation> {
        let tags = tags.to_uppercase();
        let suffix = display_name
            .split_once(':')
            .map(|(_, rest)| rest.to_uppercase())
            .unwrap_or_default();

        Self::ALL
            .into_iter()
            .find(|a| tags.contains(a.keyword()) || suffix.contains(a.keyword()))
    }
}

impl StandardVersion {
    pub const ALL: [StandardVersion; 2] = [StandardVersion::Mil2525D, StandardVersion::Mil2525CB2];

    pub fn as_str(self) -> &'static str {
        match self {
            StandardVersion::Mil2525D => "2525D",
            StandardVersion::Mil2525CB2 => "2525C_B2",
        }
    }

    /// Whether symbols of this standard carry a legacy function code.
    pub fn has_legacy_code(self) -> bool {
        matches!(self, StandardVersion::Mil2525CB2)
    }

    /// Name of the field holding the identity/affiliation code.
    pub fn affiliation_field(self) -> &'static str {
        match self {
            StandardVersion::Mil2525D => "identity",
            StandardVersion::Mil2525CB2 => "affiliation",
        }
    }

    /// Display value used to look up the domain code of an affiliation.
    pub fn affiliation_value(self, affiliation: Affiliation) -> &'static str {
        match (self, affiliation) {
            (StandardVersion::Mil2525D, Affiliation::Friend) => "Friend",
            (StandardVersion::Mil2525D, Affiliation::Hostile) => "Hostile/Faker",
            (StandardVersion::Mil2525CB2, Affiliation::Friend) => "Friendly",
            (StandardVersion::Mil2525CB2, Affiliation::Hostile) => "Hostile",
            (_, Affiliation::Neutral) => "Neutral",
            (_, Affiliation::Unknown) => "Unknown",
        }
    }
}

impl fmt::Display for StandardVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StandardVersion {
    type Err = MilsymError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace('/', "_").as_str() {
            "2525D" | "MIL2525D" => Ok(StandardVersion::Mil2525D),
            "2525C_B2" | "MIL2525C_B2" => Ok(StandardVersion::Mil2525CB2),
            _ => Err(MilsymError::UnknownStandard(s.to_string())),
        }
    }
}
