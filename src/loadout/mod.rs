//! Loadout screen: catalog, manual selection, shop and the optimizer

pub mod catalog;
pub mod optimizer;
pub mod selection;
pub mod shop;

pub use catalog::{Accessory, Armor, Catalog, Consumable, Weapon};
pub use optimizer::{is_winning, suggest, suggest_or_err, Suggestion};
pub use selection::{LoadoutRecord, LoadoutSelection, LoadoutTotals};
pub use shop::{buy, sell, shop_rows, ShopRow, ShopRowKind};
