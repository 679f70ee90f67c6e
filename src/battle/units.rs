//! Combat participants and the damage model
//!
//! Damage is not reduced by DEF. Callers that want mitigation apply it
//! before calling [`Unit::take_damage`].

use serde::{Deserialize, Serialize};

/// Which side of the battle a unit fights on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Boss,
}

impl Side {
    pub fn opponent(self) -> Self {
        match self {
            Side::Player => Side::Boss,
            Side::Boss => Side::Player,
        }
    }
}

/// A combat participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,
    pub max_hp: i32,
    pub current_hp: i32,
    pub battle_atk: i32,
    /// Tracked for display, never applied to incoming damage
    pub battle_def: i32,
}

impl Unit {
    /// Create a unit at full HP. `max_hp` is floored at 1, ATK/DEF at 0.
    pub fn new(name: impl Into<String>, max_hp: i32, battle_atk: i32, battle_def: i32) -> Self {
        let max_hp = max_hp.max(1);
        Self {
            name: name.into(),
            max_hp,
            current_hp: max_hp,
            battle_atk: battle_atk.max(0),
            battle_def: battle_def.max(0),
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    pub fn is_dead(&self) -> bool {
        !self.is_alive()
    }

    /// Apply damage; negative amounts deal nothing.
    ///
    /// Returns true when this call brought HP to exactly 0.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        let was_alive = self.is_alive();
        self.current_hp = (self.current_hp - amount.max(0)).max(0);
        was_alive && self.current_hp == 0
    }

    /// Apply damage and return how much HP was actually removed
    pub fn take_realized_damage(&mut self, amount: i32) -> i32 {
        let before = self.current_hp;
        self.take_damage(amount);
        (before - self.current_hp).clamp(0, amount.max(0))
    }

    pub fn heal(&mut self, amount: i32) {
        self.current_hp = (self.current_hp.saturating_add(amount.max(0))).min(self.max_hp);
    }

    pub fn reset_hp(&mut self) {
        self.current_hp = self.max_hp;
    }
}
