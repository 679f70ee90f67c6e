use thiserror::Error;

#[derive(Error, Debug)]
pub enum BossRushError {
    #[error("Unknown stage: {0}")]
    UnknownStage(String),

    #[error("Invalid stage config: {0}")]
    InvalidStage(String),

    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Profile version mismatch: expected {expected}, found {found}")]
    ProfileVersionMismatch { expected: u32, found: u32 },

    #[error("No loadout selection stored")]
    MissingSelection,

    #[error("No winning loadout within budget")]
    NoWinningLoadout,

    #[error("Loadout costs {cost} but the budget is {budget}")]
    OverBudget { cost: i32, budget: i32 },

    #[error("Battle cancelled before it finished")]
    Cancelled,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlError(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, BossRushError>;
