//! Per-stage battle parameters

use serde::{Deserialize, Serialize};

use crate::core::error::{BossRushError, Result};

/// Immutable parameters for one boss stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    /// Boss total HP
    pub hp_boss: i32,
    /// Boss damage per turn (fixed)
    pub atk_boss: i32,
    /// Maximum number of player turns
    pub t_max: i32,
    /// Item budget
    pub budget: i32,
    /// Hero base HP
    pub hp0: i32,
    /// Hero base ATK
    pub atk0: i32,
    /// Hero base DEF
    pub def0: i32,
}

impl StageConfig {
    /// Stage used whenever the configured one cannot be loaded
    pub fn fallback() -> Self {
        Self {
            hp_boss: 300,
            atk_boss: 25,
            t_max: 10,
            budget: 100,
            hp0: 100,
            atk0: 20,
            def0: 0,
        }
    }

    /// All fields must be non-negative
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("hp_boss", self.hp_boss),
            ("atk_boss", self.atk_boss),
            ("t_max", self.t_max),
            ("budget", self.budget),
            ("hp0", self.hp0),
            ("atk0", self.atk0),
            ("def0", self.def0),
        ];

        for (name, value) in fields {
            if value < 0 {
                return Err(BossRushError::InvalidStage(format!(
                    "{} must be non-negative, got {}",
                    name, value
                )));
            }
        }

        Ok(())
    }

    /// A stage with no turns resolves without any sub-turns
    pub fn is_meaningful(&self) -> bool {
        self.t_max >= 1
    }
}

impl Default for StageConfig {
    fn default() -> Self {
        Self::fallback()
    }
}
