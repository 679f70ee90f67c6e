//! Shop catalog: equipment slots and consumables
//!
//! Loaded from `data/catalog/<name>.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::core::error::{BossRushError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub cost: i32,
    pub atk_bonus: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Armor {
    pub name: String,
    pub cost: i32,
    pub def_bonus: i32,
}

/// Ring or amulet; either may carry ATK and DEF
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accessory {
    pub name: String,
    pub cost: i32,
    #[serde(default)]
    pub atk_bonus: i32,
    #[serde(default)]
    pub def_bonus: i32,
}

/// Potion (amount healed) or bomb (damage dealt)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Consumable {
    pub name: String,
    pub cost: i32,
    pub amount: i32,
}

impl Consumable {
    /// Cost used when dividing a budget; never 0
    pub fn unit_cost(&self) -> i32 {
        self.cost.max(1)
    }

    /// How many fit in `budget`
    pub fn max_affordable(&self, budget: i32) -> i32 {
        budget.max(0) / self.unit_cost()
    }
}

/// Everything the loadout screen can buy
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armors: Vec<Armor>,
    #[serde(default)]
    pub ring: Option<Accessory>,
    #[serde(default)]
    pub amulet: Option<Accessory>,
    #[serde(default)]
    pub potion: Option<Consumable>,
    #[serde(default)]
    pub bomb: Option<Consumable>,
}

impl Catalog {
    /// Load and validate a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let catalog: Catalog = toml::from_str(contents)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// The shop shipped with the game
    pub fn starter() -> Self {
        let weapon = |name: &str, cost, atk_bonus| Weapon {
            name: name.into(),
            cost,
            atk_bonus,
        };
        let armor = |name: &str, cost, def_bonus| Armor {
            name: name.into(),
            cost,
            def_bonus,
        };

        Self {
            weapons: vec![
                weapon("Bronze Sword", 10, 5),
                weapon("Iron Sword", 20, 10),
                weapon("Steel Blade", 32, 15),
                weapon("Mythril Edge", 55, 25),
            ],
            armors: vec![
                armor("Leather Vest", 8, 3),
                armor("Chain Mail", 16, 6),
                armor("Plate Armor", 28, 10),
            ],
            ring: Some(Accessory {
                name: "Strength Ring".into(),
                cost: 15,
                atk_bonus: 5,
                def_bonus: 0,
            }),
            amulet: Some(Accessory {
                name: "Defense Amulet".into(),
                cost: 12,
                atk_bonus: 0,
                def_bonus: 5,
            }),
            potion: Some(Consumable {
                name: "Health Potion".into(),
                cost: 8,
                amount: 40,
            }),
            bomb: Some(Consumable {
                name: "Damage Bomb".into(),
                cost: 12,
                amount: 50,
            }),
        }
    }

    /// Costs and bonuses must be non-negative
    pub fn validate(&self) -> Result<()> {
        let mut checks: Vec<(String, i32)> = Vec::new();

        for w in &self.weapons {
            checks.push((format!("{} cost", w.name), w.cost));
            checks.push((format!("{} atk_bonus", w.name), w.atk_bonus));
        }
        for a in &self.armors {
            checks.push((format!("{} cost", a.name), a.cost));
            checks.push((format!("{} def_bonus", a.name), a.def_bonus));
        }
        for acc in self.ring.iter().chain(self.amulet.iter()) {
            checks.push((format!("{} cost", acc.name), acc.cost));
            checks.push((format!("{} atk_bonus", acc.name), acc.atk_bonus));
            checks.push((format!("{} def_bonus", acc.name), acc.def_bonus));
        }
        for c in self.potion.iter().chain(self.bomb.iter()) {
            checks.push((format!("{} cost", c.name), c.cost));
            checks.push((format!("{} amount", c.name), c.amount));
        }

        match checks.into_iter().find(|(_, value)| *value < 0) {
            Some((field, value)) => Err(BossRushError::InvalidCatalog(format!(
                "{} must be non-negative, got {}",
                field, value
            ))),
            None => Ok(()),
        }
    }

    pub fn weapon(&self, index: Option<usize>) -> Option<&Weapon> {
        index.and_then(|i| self.weapons.get(i))
    }

    pub fn armor(&self, index: Option<usize>) -> Option<&Armor> {
        index.and_then(|i| self.armors.get(i))
    }

    pub fn heal_per_potion(&self) -> i32 {
        self.potion.as_ref().map_or(0, |p| p.amount)
    }

    pub fn dmg_per_bomb(&self) -> i32 {
        self.bomb.as_ref().map_or(0, |b| b.amount)
    }

    pub fn potion_cost(&self) -> i32 {
        self.potion.as_ref().map_or(0, |p| p.cost)
    }

    pub fn bomb_cost(&self) -> i32 {
        self.bomb.as_ref().map_or(0, |b| b.cost)
    }
}
