//! # Initialization
//!
//! [`initialize`] wires a production [`MilsymApi`]: it locates the data
//! directory, loads [`MilsymConfig`] from it, and opens the favorites
//! document through an [`FsBackend`].
//!
//! ## Data Directory Resolution
//!
//! 1. An explicit `data_override` path, used as is.
//! 2. The `MILSYM_DATA` environment variable.
//! 3. The OS data directory for `milsym` (via the `directories` crate).

use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::api::{Collaborators, MilsymApi};
use crate::config::MilsymConfig;
use crate::error::{MilsymError, Result};
use crate::store::fs_backend::FsBackend;

pub const DATA_ENV: &str = "MILSYM_DATA";

pub struct MilsymContext {
    pub api: MilsymApi<FsBackend>,
    pub config: MilsymConfig,
    pub data_dir: PathBuf,
}

/// Locate the data directory.
pub fn data_dir(data_override: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(DATA_ENV).filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("", "", "milsym")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| MilsymError::Config("could not determine a data directory".to_string()))
}

/// Build the API over the favorites file of the resolved data directory.
pub fn initialize(
    data_override: Option<&Path>,
    collaborators: Collaborators,
) -> Result<MilsymContext> {
    let data_dir = data_dir(data_override)?;
    let config = MilsymConfig::load(&data_dir)?;
    let standard = config.standard()?;
    let favorites_path = config.favorites_path(&data_dir);

    info!(
        data_dir = %data_dir.display(),
        favorites = %favorites_path.display(),
        %standard,
        "milsym initialized"
    );

    let api = MilsymApi::new(
        FsBackend::new(favorites_path),
        collaborators,
        standard,
        config.preview_size,
    )?;

    Ok(MilsymContext {
        api,
        config,
        data_dir,
    })
}
