//! Stage configuration - boss stats, turn limit, budget and hero base stats

pub mod config;
pub mod loader;

pub use config::StageConfig;
pub use loader::{
    load_stage_or_default, parse_stage_file, parse_stage_toml, InMemoryStages, StageProvider,
    TomlStageDirectory,
};

/// Stage id used when none is given
pub const DEFAULT_STAGE: &str = "boss_stage";
