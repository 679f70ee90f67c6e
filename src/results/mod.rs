//! Results stage: summary of the last battle

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::battle::execution::{BattleOutcome, BattleReport};

/// Display-ready lines for the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultSummary {
    pub outcome: BattleOutcome,
    pub title: String,
    pub turns: String,
    pub duration: String,
    pub player_hp: String,
    pub boss_hp: String,
    pub damage: String,
    pub items: String,
    pub params: String,
    pub margins: String,
}

impl ResultSummary {
    pub fn from_report(report: &BattleReport) -> Self {
        let bombs = if report.bombs_used > 0 {
            format!("{} × {}", report.bombs_used, report.bomb_damage)
        } else {
            "0".to_string()
        };
        let potions = if report.potions_used > 0 {
            format!("{} × +{}", report.potions_used, report.heal_per_potion)
        } else {
            "0".to_string()
        };

        Self {
            outcome: report.outcome,
            title: report.outcome.title().to_string(),
            turns: format!("Turns Used: {} / {}", report.turns_used, report.t_max),
            duration: format!("Duration: {:.2}s", report.duration_secs),
            player_hp: format!(
                "Player HP: {} → {}",
                report.player_hp_start, report.player_hp_end
            ),
            boss_hp: format!(
                "Boss HP:   {} → {}",
                report.boss_hp_start, report.boss_hp_end
            ),
            damage: format!(
                "Damage Dealt: {}   |   Damage Taken: {}",
                report.player_damage_dealt, report.boss_damage_dealt
            ),
            items: format!("Bombs Used: {}   |   Potions Used: {}", bombs, potions),
            params: format!(
                "ATK: {}   DEF: {}   Boss/Turn: {}",
                report.player_atk, report.player_def, report.boss_hit_per_turn
            ),
            margins: format!(
                "HP Margin: {}   |   DMG Margin (ATK×Tmax − BossHP): {}",
                report.hp_margin, report.dmg_margin
            ),
        }
    }

    pub fn lines(&self) -> [&str; 9] {
        [
            &self.title,
            &self.turns,
            &self.duration,
            &self.player_hp,
            &self.boss_hp,
            &self.damage,
            &self.items,
            &self.params,
            &self.margins,
        ]
    }
}

impl fmt::Display for ResultSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
