//! # Milsym Architecture
//!
//! Milsym is the **attribute and code mapping engine** behind a military
//! symbol editor. It turns a symbology style item into a structured symbol
//! code, routes it to a target dataset, keeps the symbol's attributes in a
//! typed model, and moves them between three representations: the style tag
//! string, a flat field dictionary (favorites, interchange) and a typed record
//! (the host data store).
//!
//! Rendering, map interaction and the host data store are not part of this
//! crate. They are reached through the traits in [`services`].
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  UI Layer (external)                                        │
//! │  - Binds lists, forms and commands; owns the map canvas     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade, owns the current standard                   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Engine (workflow, search, favorites, convert, code, router)│
//! │  - Pure logic over Rust types; collaborators passed in      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - FavoritesBackend trait; FsBackend, MemBackend            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Data Flow
//!
//! 1. [`search`] fans a query out to the style catalog and streams filtered
//!    style items.
//! 2. [`code`] decodes the picked item's tags into a [`code::SymbolCode`].
//! 3. [`router`] maps the symbol set and geometry to a dataset.
//! 4. [`workflow`] fetches the dataset's field domains, infers the
//!    affiliation and lets the operator edit the [`model::AttributeSet`].
//! 5. [`convert`] writes the set as a typed record on commit, or as a field
//!    dictionary when it is saved to [`favorites`].
//!
//! ## Two Standards
//!
//! Every operation takes an explicit [`standard::StandardVersion`]. There is
//! no process-wide current standard below the API layer.
//!
//! ## Module Overview
//!
//! - [`api`]: The facade, entry point for all operations
//! - [`attributes`]: Field registry and typed record values
//! - [`code`]: Tag string decoding
//! - [`config`]: Configuration management
//! - [`convert`]: Dictionary and record conversions
//! - [`error`]: Error types
//! - [`favorites`]: Favorites repository and filter
//! - [`init`]: Production wiring
//! - [`model`]: The attribute set
//! - [`router`]: Symbol set to dataset routing
//! - [`search`]: Concurrent style search
//! - [`services`]: Collaborator traits
//! - [`standard`]: Standard versions and affiliations
//! - [`store`]: Favorites persistence
//! - [`workflow`]: The selection state machine

pub mod api;
pub mod attributes;
pub mod code;
pub mod config;
pub mod convert;
pub mod error;
pub mod favorites;
pub mod init;
pub mod model;
pub mod router;
pub mod search;
pub mod services;
pub mod standard;
pub mod store;
#[cfg(any(test, feature = "test_utils"))]
pub mod test_utils;
pub mod workflow;

pub use api::{Collaborators, MilsymApi};
pub use error::{MilsymError, Result};
pub use model::AttributeSet;
pub use standard::StandardVersion;
