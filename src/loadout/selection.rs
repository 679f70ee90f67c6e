//! The player's chosen loadout and the totals derived from it

use serde::{Deserialize, Serialize};

use crate::battle::execution::BattleSetup;
use crate::core::error::{BossRushError, Result};
use crate::loadout::catalog::{Accessory, Catalog};
use crate::stage::StageConfig;

/// Weapon/armor picks, accessory toggles and consumable counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadoutSelection {
    /// `None` = no weapon
    pub weapon: Option<usize>,
    /// `None` = no armor
    pub armor: Option<usize>,
    pub ring: bool,
    pub amulet: bool,
    pub potions: i32,
    pub bombs: i32,
}

/// Quantities derived from a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LoadoutTotals {
    pub atk: i32,
    pub def: i32,
    pub cost: i32,
    pub heal: i32,
    pub bomb_damage: i32,
}

impl LoadoutSelection {
    pub fn new() -> Self {
        Self::default()
    }

    // === EDITING ===

    /// Pick a weapon; out-of-range indexes clear the slot
    pub fn select_weapon(&mut self, catalog: &Catalog, index: Option<usize>) {
        self.weapon = index.filter(|&i| i < catalog.weapons.len());
    }

    /// Pick an armor; out-of-range indexes clear the slot
    pub fn select_armor(&mut self, catalog: &Catalog, index: Option<usize>) {
        self.armor = index.filter(|&i| i < catalog.armors.len());
    }

    pub fn toggle_ring(&mut self) {
        self.ring = !self.ring;
    }

    pub fn toggle_amulet(&mut self) {
        self.amulet = !self.amulet;
    }

    pub fn set_potions(&mut self, count: i32) {
        self.potions = count.max(0);
    }

    pub fn set_bombs(&mut self, count: i32) {
        self.bombs = count.max(0);
    }

    pub fn adjust_potions(&mut self, delta: i32) {
        self.set_potions(self.potions.saturating_add(delta));
    }

    pub fn adjust_bombs(&mut self, delta: i32) {
        self.set_bombs(self.bombs.saturating_add(delta));
    }

    // === DERIVED VALUES ===

    fn ring_in_use<'a>(&self, catalog: &'a Catalog) -> Option<&'a Accessory> {
        catalog.ring.as_ref().filter(|_| self.ring)
    }

    fn amulet_in_use<'a>(&self, catalog: &'a Catalog) -> Option<&'a Accessory> {
        catalog.amulet.as_ref().filter(|_| self.amulet)
    }

    /// Cost of weapon, armor and accessories only, saturating at `i32::MAX`
    pub fn equipment_cost(&self, catalog: &Catalog) -> i32 {
        let mut cost: i32 = 0;
        if let Some(w) = catalog.weapon(self.weapon) {
            cost = cost.saturating_add(w.cost);
        }
        if let Some(a) = catalog.armor(self.armor) {
            cost = cost.saturating_add(a.cost);
        }
        if let Some(ring) = self.ring_in_use(catalog) {
            cost = cost.saturating_add(ring.cost);
        }
        if let Some(amulet) = self.amulet_in_use(catalog) {
            cost = cost.saturating_add(amulet.cost);
        }
        cost
    }

    pub fn total_cost(&self, catalog: &Catalog) -> i32 {
        self.equipment_cost(catalog)
            .saturating_add(self.potions.max(0).saturating_mul(catalog.potion_cost()))
            .saturating_add(self.bombs.max(0).saturating_mul(catalog.bomb_cost()))
    }

    pub fn total_atk(&self, catalog: &Catalog, stage: &StageConfig) -> i32 {
        let mut atk = stage.atk0;
        if let Some(w) = catalog.weapon(self.weapon) {
            atk = atk.saturating_add(w.atk_bonus);
        }
        if let Some(ring) = self.ring_in_use(catalog) {
            atk = atk.saturating_add(ring.atk_bonus);
        }
        if let Some(amulet) = self.amulet_in_use(catalog) {
            atk = atk.saturating_add(amulet.atk_bonus);
        }
        atk
    }

    pub fn total_def(&self, catalog: &Catalog, stage: &StageConfig) -> i32 {
        let mut def = stage.def0;
        if let Some(a) = catalog.armor(self.armor) {
            def = def.saturating_add(a.def_bonus);
        }
        if let Some(ring) = self.ring_in_use(catalog) {
            def = def.saturating_add(ring.def_bonus);
        }
        if let Some(amulet) = self.amulet_in_use(catalog) {
            def = def.saturating_add(amulet.def_bonus);
        }
        def
    }

    pub fn total_heal(&self, catalog: &Catalog) -> i32 {
        self.potions.max(0).saturating_mul(catalog.heal_per_potion())
    }

    pub fn total_bomb_damage(&self, catalog: &Catalog) -> i32 {
        self.bombs.max(0).saturating_mul(catalog.dmg_per_bomb())
    }

    pub fn totals(&self, catalog: &Catalog, stage: &StageConfig) -> LoadoutTotals {
        LoadoutTotals {
            atk: self.total_atk(catalog, stage),
            def: self.total_def(catalog, stage),
            cost: self.total_cost(catalog),
            heal: self.total_heal(catalog),
            bomb_damage: self.total_bomb_damage(catalog),
        }
    }

    /// A selection may start a battle only when it fits the budget
    pub fn within_budget(&self, catalog: &Catalog, stage: &StageConfig) -> bool {
        self.total_cost(catalog) <= stage.budget
    }
}

/// Selection plus derived values, handed to the battle through the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadoutRecord {
    pub selection: LoadoutSelection,
    pub player_atk: i32,
    pub player_def: i32,
    pub total_cost: i32,
    pub heal_per_potion: i32,
    pub dmg_per_bomb: i32,
}

impl LoadoutRecord {
    pub fn new(selection: LoadoutSelection, catalog: &Catalog, stage: &StageConfig) -> Self {
        Self {
            selection,
            player_atk: selection.total_atk(catalog, stage),
            player_def: selection.total_def(catalog, stage),
            total_cost: selection.total_cost(catalog),
            heal_per_potion: catalog.heal_per_potion(),
            dmg_per_bomb: catalog.dmg_per_bomb(),
        }
    }

    /// Like [`LoadoutRecord::new`], refusing selections over the stage budget
    pub fn checked(
        selection: LoadoutSelection,
        catalog: &Catalog,
        stage: &StageConfig,
    ) -> Result<Self> {
        let record = Self::new(selection, catalog, stage);
        if record.total_cost > stage.budget {
            return Err(BossRushError::OverBudget {
                cost: record.total_cost,
                budget: stage.budget,
            });
        }
        Ok(record)
    }

    /// Initial conditions for the battle resolver
    pub fn battle_setup(&self) -> BattleSetup {
        BattleSetup {
            player_atk: self.player_atk,
            player_def: self.player_def,
            potions: self.selection.potions,
            heal_per_potion: self.heal_per_potion,
            bombs: self.selection.bombs,
            dmg_per_bomb: self.dmg_per_bomb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loadout::catalog::{Armor, Weapon};

    #[test]
    fn test_empty_selection_totals() {
        let catalog = Catalog::starter();
        let stage = StageConfig::fallback();
        let totals = LoadoutSelection::new().totals(&catalog, &stage);

        assert_eq!(totals.atk, 20);
        assert_eq!(totals.def, 0);
        assert_eq!(totals.cost, 0);
        assert_eq!(totals.heal, 0);
        assert_eq!(totals.bomb_damage, 0);
    }

    #[test]
    fn test_full_selection_totals() {
        let catalog = Catalog::starter();
        let stage = StageConfig::fallback();
        let selection = LoadoutSelection {
            weapon: Some(1),
            armor: Some(0),
            ring: true,
            amulet: true,
            potions: 2,
            bombs: 1,
        };
        let totals = selection.totals(&catalog, &stage);

        assert_eq!(totals.atk, 20 + 10 + 5);
        assert_eq!(totals.def, 3 + 5);
        assert_eq!(totals.cost, 20 + 8 + 15 + 12 + 2 * 8 + 12);
        assert_eq!(totals.heal, 80);
        assert_eq!(totals.bomb_damage, 50);
        assert!(selection.within_budget(&catalog, &stage));
    }

    #[test]
    fn test_over_budget() {
        let catalog = Catalog::starter();
        let stage = StageConfig::fallback();
        let mut selection = LoadoutSelection::new();
        selection.select_weapon(&catalog, Some(3));
        selection.select_armor(&catalog, Some(2));
        assert_eq!(selection.total_cost(&catalog), 83);
        assert!(selection.within_budget(&catalog, &stage));

        selection.toggle_ring();
        selection.toggle_amulet();
        assert!(!selection.within_budget(&catalog, &stage));
    }

    #[test]
    fn test_invalid_index_clears_slot() {
        let catalog = Catalog::starter();
        let mut selection = LoadoutSelection::new();
        selection.select_weapon(&catalog, Some(0));
        assert_eq!(selection.weapon, Some(0));
        selection.select_weapon(&catalog, Some(42));
        assert_eq!(selection.weapon, None);
    }

    #[test]
    fn test_consumable_counts_never_negative() {
        let mut selection = LoadoutSelection::new();
        selection.adjust_potions(1);
        selection.adjust_potions(-3);
        assert_eq!(selection.potions, 0);

        selection.set_bombs(-2);
        assert_eq!(selection.bombs, 0);
        selection.adjust_bombs(2);
        assert_eq!(selection.bombs, 2);
    }

    #[test]
    fn test_toggled_accessory_missing_from_catalog() {
        let catalog = Catalog {
            ring: None,
            ..Catalog::starter()
        };
        let stage = StageConfig::fallback();
        let selection = LoadoutSelection {
            ring: true,
            ..Default::default()
        };
        assert_eq!(selection.total_cost(&catalog), 0);
        assert_eq!(selection.total_atk(&catalog, &stage), 20);
    }

    #[test]
    fn test_totals_saturate_on_huge_catalog_values() {
        let catalog = Catalog {
            weapons: vec![Weapon {
                name: "Crown Blade".into(),
                cost: 2_000_000_000,
                atk_bonus: i32::MAX,
            }],
            armors: vec![Armor {
                name: "Crown Plate".into(),
                cost: 2_000_000_000,
                def_bonus: i32::MAX,
            }],
            ..Catalog::starter()
        };
        let stage = StageConfig::fallback();
        let selection = LoadoutSelection {
            weapon: Some(0),
            armor: Some(0),
            ring: true,
            amulet: true,
            ..Default::default()
        };

        assert_eq!(selection.equipment_cost(&catalog), i32::MAX);
        assert_eq!(selection.total_cost(&catalog), i32::MAX);
        assert_eq!(selection.total_atk(&catalog, &stage), i32::MAX);
        assert_eq!(selection.total_def(&catalog, &stage), i32::MAX);
        assert!(!selection.within_budget(&catalog, &stage));
    }

    #[test]
    fn test_record_refuses_over_budget() {
        let catalog = Catalog::starter();
        let stage = StageConfig::fallback();
        let selection = LoadoutSelection {
            weapon: Some(3),
            armor: Some(2),
            ring: true,
            ..Default::default()
        };
        let record = LoadoutRecord::checked(selection, &catalog, &stage)
            .expect("98 fits a budget of 100");
        assert_eq!(record.total_cost, 98);

        let selection = LoadoutSelection {
            amulet: true,
            ..selection
        };
        assert!(matches!(
            LoadoutRecord::checked(selection, &catalog, &stage),
            Err(BossRushError::OverBudget {
                cost: 110,
                budget: 100
            })
        ));
    }

    #[test]
    fn test_record_battle_setup() {
        let catalog = Catalog::starter();
        let stage = StageConfig::fallback();
        let selection = LoadoutSelection {
            weapon: Some(1),
            potions: 4,
            bombs: 2,
            ..Default::default()
        };
        let record = LoadoutRecord::new(selection, &catalog, &stage);
        let setup = record.battle_setup();

        assert_eq!(record.total_cost, 20 + 32 + 24);
        assert_eq!(setup.player_atk, 30);
        assert_eq!(setup.potions, 4);
        assert_eq!(setup.heal_per_potion, 40);
        assert_eq!(setup.bombs, 2);
        assert_eq!(setup.dmg_per_bomb, 50);
    }
}
