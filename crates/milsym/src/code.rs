//! # Style Tag Decoding
//!
//! A style item's tag string is a semicolon-delimited list: taxonomy path,
//! geometry hint, legacy code, and finally the raw symbol code token.
//!
//! ```text
//! Land unit;Infantry;...;<legacy sidc>;...;POINT;<x>;10121100
//!                          count-5        count-3     last
//! ```
//!
//! - **Symbol code**: the last token; characters 1-2 are the symbol set,
//!   characters 3-8 the symbol entity.
//! - **Geometry**: the token three positions from the end, `POINT`, `LINE` or
//!   `AREA` in any case. Anything else is unrecognized and the caller's
//!   declared item type (or Point) is used instead.
//! - **Legacy function code** (2525C_B2 only): the token at `count-5`, when the
//!   list has more than five tokens and that token has at least ten
//!   characters, is rewritten as `{c0}-{c2}-{c4..c10}`.

use crate::error::{MilsymError, Result};
use crate::standard::StandardVersion;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Minimum number of semicolon-delimited tokens in a tag string.
const MIN_TOKENS: usize = 3;
/// Characters of the trailing code token that are decoded.
const CODE_LEN: usize = 8;
/// Minimum length of the legacy code token.
const LEGACY_MIN_LEN: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GeometryClass {
    #[default]
    Point,
    Line,
    Area,
}

impl GeometryClass {
    pub const ALL: [GeometryClass; 3] =
        [GeometryClass::Point, GeometryClass::Line, GeometryClass::Area];

    /// Parse a geometry tag (`POINT`, `LINE`, `AREA`), case-insensitively.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_uppercase().as_str() {
            "POINT" => Some(GeometryClass::Point),
            "LINE" => Some(GeometryClass::Line),
            "AREA" => Some(GeometryClass::Area),
            _ => None,
        }
    }
}

impl fmt::Display for GeometryClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            GeometryClass::Point => "point",
            GeometryClass::Line => "line",
            GeometryClass::Area => "area",
        };
        f.write_str(s)
    }
}

/// A decoded symbol identification code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolCode {
    pub symbol_set: String,
    pub symbol_entity: String,
    /// Dash-delimited legacy code; empty unless decoded under 2525C_B2.
    pub legacy_function_code: String,
    pub geometry: GeometryClass,
}

/// Decode a tag string, defaulting unrecognized geometry to Point.
pub fn parse(tags: &str, standard: StandardVersion) -> Result<SymbolCode> {
    parse_with_item_type(tags, standard, None)
}

/// Decode a tag string, falling back to the style item's declared geometry
/// when the geometry tag is missing or unrecognized.
pub fn parse_with_item_type(
    tags: &str,
    standard: StandardVersion,
    item_type: Option<GeometryClass>,
) -> Result<SymbolCode> {
    let tokens: Vec<&str> = tags.split(';').collect();
    if tokens.len() < MIN_TOKENS {
        return Err(MilsymError::MalformedTag {
            tags: tags.to_string(),
            reason: "fewer than 3 tokens",
        });
    }

    let code: Vec<char> = tokens[tokens.len() - 1].chars().collect();
    if code.len() < CODE_LEN {
        return Err(MilsymError::MalformedTag {
            tags: tags.to_string(),
            reason: "code token shorter than 8 characters",
        });
    }

    let geometry = geometry_tag(&tokens).or(item_type).unwrap_or_default();

    let legacy_function_code = if standard.has_legacy_code() {
        legacy_function_code(&tokens).unwrap_or_default()
    } else {
        String::new()
    };

    Ok(SymbolCode {
        symbol_set: code[..2].iter().collect(),
        symbol_entity: code[2..CODE_LEN].iter().collect(),
        legacy_function_code,
        geometry,
    })
}

/// Geometry named by a tag string, if the hint token is recognized.
///
/// Tag strings too short to have a hint yield `None`.
pub fn geometry_tag(tokens: &[&str]) -> Option<GeometryClass> {
    let index = tokens.len().checked_sub(MIN_TOKENS)?;
    GeometryClass::from_tag(tokens[index])
}

fn legacy_function_code(tokens: &[&str]) -> Option<String> {
    if tokens.len() <= 5 {
        return None;
    }
    let legacy: Vec<char> = tokens[tokens.len() - 5].chars().collect();
    if legacy.len() < LEGACY_MIN_LEN {
        return None;
    }
    let tail: String = legacy[4..10].iter().collect();
    Some(format!("{}-{}-{}", legacy[0], legacy[2], tail))
}
