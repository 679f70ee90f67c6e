//! Battle events and the sinks that observe them
//!
//! The resolver emits events; UI, audio and animation layers subscribe by
//! implementing [`BattleEventSink`].

use serde::{Deserialize, Serialize};

use crate::battle::execution::BattleOutcome;
use crate::battle::units::Side;

/// Where a damage application came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageKind {
    Attack,
    Bomb,
}

/// Log entry for battle events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleEvent {
    /// 1-based turn the event belongs to, 0 before the first turn
    pub turn: i32,
    pub event_type: BattleEventType,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum BattleEventType {
    BattleStarted,
    TurnStarted {
        turn: i32,
    },
    DamageApplied {
        source: Side,
        target: Side,
        kind: DamageKind,
        /// Realized damage, never more than the target's HP before the hit
        amount: i32,
        target_hp_after: i32,
    },
    UnitDied {
        side: Side,
    },
    BattleEnded {
        outcome: BattleOutcome,
    },
}

/// Observer of battle events
pub trait BattleEventSink {
    fn on_event(&mut self, event: &BattleEvent);
}

/// Collects every event in order
#[derive(Debug, Clone, Default)]
pub struct BattleEventLog {
    pub events: Vec<BattleEvent>,
}

impl BattleEventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Sum of realized damage applied to `target`
    pub fn damage_to(&self, target: Side) -> i32 {
        self.events
            .iter()
            .filter_map(|e| match e.event_type {
                BattleEventType::DamageApplied {
                    target: t, amount, ..
                } if t == target => Some(amount),
                _ => None,
            })
            .sum()
    }

    pub fn ended_with(&self) -> Option<BattleOutcome> {
        self.events.iter().rev().find_map(|e| match e.event_type {
            BattleEventType::BattleEnded { outcome } => Some(outcome),
            _ => None,
        })
    }
}

impl BattleEventSink for BattleEventLog {
    fn on_event(&mut self, event: &BattleEvent) {
        self.events.push(event.clone());
    }
}

/// Forwards events to `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl BattleEventSink for TracingSink {
    fn on_event(&mut self, event: &BattleEvent) {
        match &event.event_type {
            BattleEventType::DamageApplied { .. } | BattleEventType::TurnStarted { .. } => {
                tracing::debug!(turn = event.turn, "{}", event.description)
            }
            _ => tracing::info!(turn = event.turn, "{}", event.description),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl BattleEventSink for NullSink {
    fn on_event(&mut self, _event: &BattleEvent) {}
}

/// Fan out to two sinks
pub struct TeeSink<'a, A: ?Sized, B: ?Sized> {
    pub first: &'a mut A,
    pub second: &'a mut B,
}

impl<A, B> BattleEventSink for TeeSink<'_, A, B>
where
    A: BattleEventSink + ?Sized,
    B: BattleEventSink + ?Sized,
{
    fn on_event(&mut self, event: &BattleEvent) {
        self.first.on_event(event);
        self.second.on_event(event);
    }
}
