//! Battle constants

/// Display name of the player unit
pub const PLAYER_NAME: &str = "Hero";

/// Display name of the boss unit
pub const BOSS_NAME: &str = "Boss";

/// Upper bound for the player's HP pool after potions are applied
pub const MAX_PLAYER_HP: i32 = 999_999;

// === PACING DEFAULTS (seconds) ===

pub const PRE_HIT_PLAYER_SECS: f32 = 0.20;
pub const POST_HIT_PLAYER_SECS: f32 = 0.35;
pub const PRE_HIT_BOSS_SECS: f32 = 0.20;
pub const POST_HIT_BOSS_SECS: f32 = 0.35;
pub const BOMB_PRE_SECS: f32 = 0.25;
pub const BOMB_POST_SECS: f32 = 0.45;

/// Gap after every sub-turn
pub const TURN_GAP_SECS: f32 = 0.10;
