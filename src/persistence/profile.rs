//! Versioned player profile shared between the loadout, battle and results stages

use serde::{Deserialize, Serialize};

use crate::battle::execution::{BattleReport, BattleSetup};
use crate::core::error::{BossRushError, Result};
use crate::loadout::catalog::Catalog;
use crate::loadout::selection::LoadoutRecord;
use crate::stage::StageConfig;

/// Bump when the serialized layout changes
pub const PROFILE_VERSION: u32 = 1;

pub const DEFAULT_VOLUME: f32 = 0.8;

/// Music and sound-effect volume, each in `0.0..=1.0`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioOptions {
    pub music: f32,
    pub sfx: f32,
}

impl Default for AudioOptions {
    fn default() -> Self {
        Self {
            music: DEFAULT_VOLUME,
            sfx: DEFAULT_VOLUME,
        }
    }
}

impl AudioOptions {
    pub fn set_music(&mut self, volume: f32) {
        self.music = clamp_volume(volume);
    }

    pub fn set_sfx(&mut self, volume: f32) {
        self.sfx = clamp_volume(volume);
    }

    /// Bring values edited by hand back into range
    pub fn normalized(self) -> Self {
        Self {
            music: clamp_volume(self.music),
            sfx: clamp_volume(self.sfx),
        }
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        DEFAULT_VOLUME
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// Everything persisted across runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub version: u32,
    /// Written by the loadout stage, read at battle start
    #[serde(default)]
    pub loadout: Option<LoadoutRecord>,
    /// Written once when a battle ends
    #[serde(default)]
    pub last_battle: Option<BattleReport>,
    #[serde(default)]
    pub options: AudioOptions,
}

impl Default for Profile {
    fn default() -> Self {
        Self::new()
    }
}

impl Profile {
    pub fn new() -> Self {
        Self {
            version: PROFILE_VERSION,
            loadout: None,
            last_battle: None,
            options: AudioOptions::default(),
        }
    }

    pub fn set_loadout(&mut self, record: LoadoutRecord) {
        self.loadout = Some(record);
    }

    pub fn record_battle(&mut self, report: BattleReport) {
        self.last_battle = Some(report);
    }

    /// Initial conditions for a battle on `stage`
    ///
    /// The stored selection is re-priced against `stage` and the current
    /// catalog, so a loadout picked for another stage still has to fit this
    /// stage's budget. Without a stored loadout the hero fights unequipped.
    pub fn battle_setup(&self, catalog: &Catalog, stage: &StageConfig) -> Result<BattleSetup> {
        match &self.loadout {
            Some(record) => {
                let current = LoadoutRecord::checked(record.selection, catalog, stage)?;
                if current != *record {
                    tracing::debug!(
                        stored_cost = record.total_cost,
                        cost = current.total_cost,
                        "Stored loadout re-priced for this stage"
                    );
                }
                Ok(current.battle_setup())
            }
            None => {
                tracing::warn!("No loadout stored, fighting unequipped");
                Ok(BattleSetup::unequipped(stage))
            }
        }
    }

    /// Stored loadout, for callers that refuse to fight unequipped
    pub fn require_loadout(&self) -> Result<&LoadoutRecord> {
        self.loadout.as_ref().ok_or(BossRushError::MissingSelection)
    }
}
