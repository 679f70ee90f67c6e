//! Boss Rush - budgeted loadout selection and a fixed-length boss battle

pub mod battle;
pub mod core;
pub mod loadout;
pub mod persistence;
pub mod results;
pub mod stage;
