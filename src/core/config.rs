//! Application configuration with documented defaults
//!
//! Paths to the data directory and the profile file, plus the pacing used
//! when a battle is played out in real time.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::battle::pacing::PacingConfig;
use crate::core::error::{BossRushError, Result};

/// Configuration for the game binary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Root of the data directory
    ///
    /// Stages live in `<data_dir>/stages/<id>.toml` and the shop catalog in
    /// `<data_dir>/catalog/<name>.toml`.
    pub data_dir: PathBuf,

    /// Stage loaded when none is named on the command line
    pub default_stage: String,

    /// Catalog loaded by the loadout screen
    pub catalog: String,

    /// Where the profile (selection, last battle, options) is stored
    pub profile_path: PathBuf,

    /// Delays between sub-turns when pacing is enabled
    pub pacing: PacingConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            default_stage: crate::stage::DEFAULT_STAGE.to_string(),
            catalog: "default".to_string(),
            profile_path: PathBuf::from("saves/profile.json"),
            pacing: PacingConfig::default(),
        }
    }
}

impl AppConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load config from a TOML file; missing keys keep their defaults
    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.default_stage.trim().is_empty() {
            return Err(BossRushError::InvalidConfig(
                "default_stage must not be empty".into(),
            ));
        }

        if self.catalog.trim().is_empty() {
            return Err(BossRushError::InvalidConfig(
                "catalog must not be empty".into(),
            ));
        }

        self.pacing.validate()
    }

    pub fn stages_dir(&self) -> PathBuf {
        self.data_dir.join("stages")
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.data_dir
            .join("catalog")
            .join(format!("{}.toml", self.catalog))
    }
}
