//! Battle system - a fixed-length duel between the hero and a boss
//!
//! Key rules:
//! - Bombs are thrown once, at the start of the first player sub-turn
//! - Damage is recorded as realized (never more than the target's HP)
//! - The loop ends on a death or when the turn limit is reached
//! - Pacing and presentation observe the resolver, they never drive it

pub mod constants;
pub mod events;
pub mod execution;
pub mod pacing;
pub mod units;

// Re-exports for convenient access
pub use constants::*;
pub use events::{
    BattleEvent, BattleEventLog, BattleEventSink, BattleEventType, DamageKind, NullSink, TeeSink,
    TracingSink,
};
pub use execution::{
    BattleOutcome, BattlePhase, BattleReport, BattleResolver, BattleSetup, BattleStats,
    PendingSubTurn, StepResult, SubTurn,
};
pub use pacing::{run_paced, CancelFlag, PacingConfig};
pub use units::{Side, Unit};
