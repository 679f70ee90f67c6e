//! Load stage configs from TOML files

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::{BossRushError, Result};
use crate::stage::config::StageConfig;

/// Read-only source of stage configs keyed by stage id
pub trait StageProvider {
    fn load_stage(&self, id: &str) -> Result<StageConfig>;
}

/// Stages stored as `<dir>/<id>.toml`
#[derive(Debug, Clone)]
pub struct TomlStageDirectory {
    dir: PathBuf,
}

impl TomlStageDirectory {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn stage_path(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{}.toml", id))
    }
}

impl StageProvider for TomlStageDirectory {
    fn load_stage(&self, id: &str) -> Result<StageConfig> {
        if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
            return Err(BossRushError::UnknownStage(id.to_string()));
        }

        let path = self.stage_path(id);
        if !path.exists() {
            return Err(BossRushError::UnknownStage(id.to_string()));
        }

        parse_stage_file(&path)
    }
}

/// Parse a single stage file
pub fn parse_stage_file(path: &Path) -> Result<StageConfig> {
    let contents = fs::read_to_string(path)?;
    parse_stage_toml(&contents)
}

pub fn parse_stage_toml(contents: &str) -> Result<StageConfig> {
    let stage: StageConfig = toml::from_str(contents)?;
    stage.validate()?;
    Ok(stage)
}

/// Stages held in memory (tests, embedded defaults)
#[derive(Debug, Clone, Default)]
pub struct InMemoryStages {
    stages: HashMap<String, StageConfig>,
}

impl InMemoryStages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_stage(mut self, id: &str, stage: StageConfig) -> Self {
        self.stages.insert(id.to_string(), stage);
        self
    }
}

impl StageProvider for InMemoryStages {
    fn load_stage(&self, id: &str) -> Result<StageConfig> {
        let stage = self
            .stages
            .get(id)
            .copied()
            .ok_or_else(|| BossRushError::UnknownStage(id.to_string()))?;
        stage.validate()?;
        Ok(stage)
    }
}

/// Load a stage, logging and falling back to [`StageConfig::fallback`] on any error
pub fn load_stage_or_default(provider: &dyn StageProvider, id: &str) -> StageConfig {
    match provider.load_stage(id) {
        Ok(stage) => {
            tracing::info!(
                stage = id,
                hp_boss = stage.hp_boss,
                atk_boss = stage.atk_boss,
                t_max = stage.t_max,
                budget = stage.budget,
                "Stage loaded"
            );
            stage
        }
        Err(e) => {
            tracing::warn!(stage = id, error = %e, "Stage load failed, using fallback stage");
            StageConfig::fallback()
        }
    }
}
