//! # Attribute Schema
//!
//! Every representation of a symbol's attributes (the in-memory
//! [`AttributeSet`](crate::model::AttributeSet), generic field dictionaries,
//! typed records, domain lookups) is driven by one registry instead of
//! per-representation field lists:
//!
//! - **Fields**: [`Field`] enumerates the attributes; [`FIELDS`] describes each
//! - **Kinds**: how a field's text is coerced ([`FieldKind`])
//! - **Standards**: per-standard names and fields ([`FieldSpec::name_for`])
//! - **Typed values**: [`FieldValue`] and [`RecordWriter`] for record commits
//!
//! ## Field Kinds
//!
//! | Kind | Examples | Dictionary form | Record form |
//! |------|----------|-----------------|-------------|
//! | `Text` | `identity`, `uniquedesignation` | as-is | `Text` |
//! | `Integer` | `symbolset`, `symbolentity` | as-is, validated | `Integer` (i32) |
//! | `Short` | `speed` | decimal | `Short` (i16) |
//! | `Timestamp` | `datetimevalid` | RFC 3339 | `Timestamp` |

mod spec;
mod value;

pub use spec::{fields_for, get_spec, spec_by_name, Field, FieldGroup, FieldKind, FieldSpec, FIELDS};
pub use value::{format_timestamp, parse_timestamp, FieldValue, RecordFields, RecordWriter};
