use crate::code::GeometryClass;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MilsymError {
    #[error("Malformed style tags '{tags}': {reason}")]
    MalformedTag { tags: String, reason: &'static str },

    #[error("Cannot coerce value '{value}' for field '{field}'")]
    Coercion { field: &'static str, value: String },

    #[error("Cannot map symbol set '{symbol_set}' ({geometry}) to a dataset")]
    RouteNotFound {
        symbol_set: String,
        geometry: GeometryClass,
    },

    #[error("Commit failed: {0}")]
    CommitFailure(String),

    #[error("No domain for field '{field}' in dataset '{dataset}'")]
    SchemaUnavailable { dataset: String, field: String },

    #[error("Style search for {geometry} symbols failed: {message}")]
    Catalog {
        geometry: GeometryClass,
        message: String,
    },

    #[error("Favorite not found: {0}")]
    FavoriteNotFound(String),

    #[error("Cannot {operation} while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },

    #[error("Unknown standard version: {0}")]
    UnknownStandard(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, MilsymError>;
