//! Shop listing derived from a catalog
//!
//! Equipment rows select (or toggle) a slot; quantity rows buy or return one
//! consumable at a time.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::loadout::catalog::Catalog;
use crate::loadout::selection::LoadoutSelection;

/// What a row refers to in the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopRowKind {
    Weapon(usize),
    Armor(usize),
    Ring,
    Amulet,
    Potion,
    Bomb,
}

impl ShopRowKind {
    pub fn is_consumable(self) -> bool {
        matches!(self, Self::Potion | Self::Bomb)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopRow {
    pub kind: ShopRowKind,
    pub name: String,
    /// "+N ATK", "+N DEF", "Heal N" or "DMG N"
    pub description: String,
    pub price: i32,
    /// Equipped for slot rows
    pub owned: bool,
    /// Count held for quantity rows, 0 otherwise
    pub quantity: i32,
}

impl fmt::Display for ShopRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = if self.kind.is_consumable() {
            format!("x{}", self.quantity)
        } else if self.owned {
            "[equipped]".to_string()
        } else {
            String::new()
        };
        write!(
            f,
            "{:<16} {:<9} {:>4}g {}",
            self.name, self.description, self.price, state
        )
    }
}

/// Every row the shop shows, in catalog order
pub fn shop_rows(catalog: &Catalog, selection: &LoadoutSelection) -> Vec<ShopRow> {
    let mut rows = Vec::new();

    for (i, w) in catalog.weapons.iter().enumerate() {
        rows.push(ShopRow {
            kind: ShopRowKind::Weapon(i),
            name: w.name.clone(),
            description: format!("+{} ATK", w.atk_bonus),
            price: w.cost,
            owned: selection.weapon == Some(i),
            quantity: 0,
        });
    }

    for (i, a) in catalog.armors.iter().enumerate() {
        rows.push(ShopRow {
            kind: ShopRowKind::Armor(i),
            name: a.name.clone(),
            description: format!("+{} DEF", a.def_bonus),
            price: a.cost,
            owned: selection.armor == Some(i),
            quantity: 0,
        });
    }

    if let Some(ring) = &catalog.ring {
        rows.push(ShopRow {
            kind: ShopRowKind::Ring,
            name: ring.name.clone(),
            description: format!("+{} ATK", ring.atk_bonus),
            price: ring.cost,
            owned: selection.ring,
            quantity: 0,
        });
    }

    if let Some(amulet) = &catalog.amulet {
        rows.push(ShopRow {
            kind: ShopRowKind::Amulet,
            name: amulet.name.clone(),
            description: format!("+{} DEF", amulet.def_bonus),
            price: amulet.cost,
            owned: selection.amulet,
            quantity: 0,
        });
    }

    if let Some(potion) = &catalog.potion {
        rows.push(ShopRow {
            kind: ShopRowKind::Potion,
            name: potion.name.clone(),
            description: format!("Heal {}", potion.amount),
            price: potion.cost,
            owned: selection.potions > 0,
            quantity: selection.potions,
        });
    }

    if let Some(bomb) = &catalog.bomb {
        rows.push(ShopRow {
            kind: ShopRowKind::Bomb,
            name: bomb.name.clone(),
            description: format!("DMG {}", bomb.amount),
            price: bomb.cost,
            owned: selection.bombs > 0,
            quantity: selection.bombs,
        });
    }

    rows
}

/// Buy button: pick the slot, toggle an accessory, or add one consumable
pub fn buy(selection: &mut LoadoutSelection, catalog: &Catalog, kind: ShopRowKind) {
    match kind {
        ShopRowKind::Weapon(i) => selection.select_weapon(catalog, Some(i)),
        ShopRowKind::Armor(i) => selection.select_armor(catalog, Some(i)),
        ShopRowKind::Ring => selection.toggle_ring(),
        ShopRowKind::Amulet => selection.toggle_amulet(),
        ShopRowKind::Potion => selection.adjust_potions(1),
        ShopRowKind::Bomb => selection.adjust_bombs(1),
    }
}

/// Minus button on quantity rows; equipment rows unequip
pub fn sell(selection: &mut LoadoutSelection, catalog: &Catalog, kind: ShopRowKind) {
    match kind {
        ShopRowKind::Weapon(i) if selection.weapon == Some(i) => {
            selection.select_weapon(catalog, None)
        }
        ShopRowKind::Armor(i) if selection.armor == Some(i) => selection.select_armor(catalog, None),
        ShopRowKind::Ring => selection.ring = false,
        ShopRowKind::Amulet => selection.amulet = false,
        ShopRowKind::Potion => selection.adjust_potions(-1),
        ShopRowKind::Bomb => selection.adjust_bombs(-1),
        ShopRowKind::Weapon(_) | ShopRowKind::Armor(_) => {}
    }
}
