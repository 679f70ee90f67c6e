//! Cheapest guaranteed-win loadout search
//!
//! Exhaustive enumeration: weapon (none, then ascending) -> armor (none, then
//! ascending) -> accessories {off/off, ring, amulet, both} -> potions
//! ascending -> bombs ascending. Cost is pruned after the equipment and again
//! after the potions. The first combination at the lowest cost wins ties.

use serde::{Deserialize, Serialize};

use crate::core::error::{BossRushError, Result};
use crate::loadout::catalog::Catalog;
use crate::loadout::selection::LoadoutSelection;
use crate::stage::StageConfig;

/// Accessory enumeration order as (ring, amulet)
pub const ACCESSORY_ORDER: [(bool, bool); 4] =
    [(false, false), (true, false), (false, true), (true, true)];

/// A winning loadout and the numbers that make it win
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub selection: LoadoutSelection,
    pub total_cost: i32,
    pub total_atk: i32,
    pub total_def: i32,
    /// `t_max * atk + bombs * bomb damage`
    pub damage_capacity: i64,
    /// `hp0 + potions * heal - t_max * boss attack`
    pub survivability: i64,
}

/// Projected damage over the whole turn limit
pub fn damage_capacity(stage: &StageConfig, total_atk: i32, bombs: i32, dmg_per_bomb: i32) -> i64 {
    i64::from(stage.t_max) * i64::from(total_atk) + i64::from(bombs) * i64::from(dmg_per_bomb)
}

/// HP left after the boss hits every turn until the limit
pub fn survivability(stage: &StageConfig, potions: i32, heal_per_potion: i32) -> i64 {
    i64::from(stage.hp0) + i64::from(potions) * i64::from(heal_per_potion)
        - i64::from(stage.t_max) * i64::from(stage.atk_boss)
}

/// Whether a selection is guaranteed to win under the worst-case projection
pub fn is_winning(selection: &LoadoutSelection, catalog: &Catalog, stage: &StageConfig) -> bool {
    let atk = selection.total_atk(catalog, stage);
    damage_capacity(stage, atk, selection.bombs, catalog.dmg_per_bomb()) >= i64::from(stage.hp_boss)
        && survivability(stage, selection.potions, catalog.heal_per_potion()) >= 0
}

/// Find the cheapest winning loadout within the stage budget
pub fn suggest(catalog: &Catalog, stage: &StageConfig) -> Option<Suggestion> {
    let budget = stage.budget;
    let heal = catalog.heal_per_potion();
    let bomb_dmg = catalog.dmg_per_bomb();
    let potion_cost = catalog.potion_cost();
    let bomb_cost = catalog.bomb_cost();
    let potion_divisor = catalog.potion.as_ref().map(|p| p.unit_cost());
    let bomb_divisor = catalog.bomb.as_ref().map(|b| b.unit_cost());

    let weapons = std::iter::once(None).chain((0..catalog.weapons.len()).map(Some));
    let mut best: Option<Suggestion> = None;
    let mut examined: u64 = 0;

    for weapon in weapons {
        let armors = std::iter::once(None).chain((0..catalog.armors.len()).map(Some));
        for armor in armors {
            for (ring, amulet) in ACCESSORY_ORDER {
                if (ring && catalog.ring.is_none()) || (amulet && catalog.amulet.is_none()) {
                    continue;
                }

                let equipment = LoadoutSelection {
                    weapon,
                    armor,
                    ring,
                    amulet,
                    potions: 0,
                    bombs: 0,
                };
                let equipment_cost = equipment.equipment_cost(catalog);
                if equipment_cost > budget {
                    continue;
                }
                let total_atk = equipment.total_atk(catalog, stage);

                let left = budget - equipment_cost;
                let max_potions = potion_divisor.map_or(0, |c| left / c);

                for potions in 0..=max_potions {
                    let after_potions = equipment_cost + potions * potion_cost;
                    if after_potions > budget {
                        break;
                    }
                    let left_after = budget - after_potions;
                    let max_bombs = bomb_divisor.map_or(0, |c| left_after / c);

                    for bombs in 0..=max_bombs {
                        examined += 1;
                        let cost = after_potions + bombs * bomb_cost;
                        if cost > budget {
                            break;
                        }

                        let capacity = damage_capacity(stage, total_atk, bombs, bomb_dmg);
                        let survive = survivability(stage, potions, heal);
                        if capacity < i64::from(stage.hp_boss) || survive < 0 {
                            continue;
                        }

                        if best.map_or(true, |b| cost < b.total_cost) {
                            let selection = LoadoutSelection {
                                potions,
                                bombs,
                                ..equipment
                            };
                            best = Some(Suggestion {
                                selection,
                                total_cost: cost,
                                total_atk,
                                total_def: selection.total_def(catalog, stage),
                                damage_capacity: capacity,
                                survivability: survive,
                            });
                        }
                    }
                }
            }
        }
    }

    match &best {
        Some(found) => tracing::info!(
            cost = found.total_cost,
            atk = found.total_atk,
            potions = found.selection.potions,
            bombs = found.selection.bombs,
            examined,
            "Optimizer found winning loadout"
        ),
        None => tracing::warn!(budget, examined, "Optimizer found no winning loadout"),
    }

    best
}

/// [`suggest`], with "none found" as an error
pub fn suggest_or_err(catalog: &Catalog, stage: &StageConfig) -> Result<Suggestion> {
    suggest(catalog, stage).ok_or(BossRushError::NoWinningLoadout)
}
