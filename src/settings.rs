//! Engine settings
//!
//! Loaded from JSON by the host. Every field has a default, so a partial file
//! only overrides what it names.

use std::path::PathBuf;
#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Why a settings document was rejected
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Tunable engine parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    /// Grid height
    pub rows: usize,
    /// Grid width
    pub cols: usize,
    /// Points per raw matched tile, before the chain multiplier
    pub points_per_tile: u64,
    /// Chain index at which each refill carries one bomb
    pub bomb_chain_threshold: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            rows: DEFAULT_ROWS,
            cols: DEFAULT_COLS,
            points_per_tile: POINTS_PER_TILE,
            bomb_chain_threshold: BOMB_CHAIN_THRESHOLD,
        }
    }
}

impl EngineSettings {
    /// Check ranges the engine relies on
    pub fn validate(&self) -> Result<(), SettingsError> {
        let dims = MIN_DIMENSION..=MAX_DIMENSION;
        if !dims.contains(&self.rows) || !dims.contains(&self.cols) {
            return Err(SettingsError::Invalid(format!(
                "grid {}x{} outside {}..={} per side",
                self.rows, self.cols, MIN_DIMENSION, MAX_DIMENSION
            )));
        }
        if self.points_per_tile == 0 {
            return Err(SettingsError::Invalid("points_per_tile must be positive".into()));
        }
        // Chain 1 is the swap itself; a bomb can only ride a refill from chain 2 on
        if self.bomb_chain_threshold < 2 {
            return Err(SettingsError::Invalid(format!(
                "bomb_chain_threshold {} must be at least 2",
                self.bomb_chain_threshold
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read settings from a JSON file
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Read settings from a JSON file, falling back to defaults on any error
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{e}; using default settings");
                Self::default()
            }
        }
    }
}
