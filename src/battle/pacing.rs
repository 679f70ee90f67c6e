//! Real-time pacing around the resolver
//!
//! The resolver never waits. This driver sleeps before and after each
//! sub-turn so a presentation layer has time to animate, and checks a
//! cancel flag between sub-turns.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::battle::constants::*;
use crate::battle::events::{BattleEvent, BattleEventSink};
use crate::battle::execution::{BattleReport, BattleResolver, PendingSubTurn, StepResult, SubTurn};
use crate::core::error::{BossRushError, Result};

/// Delays in seconds around each sub-turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    pub pre_hit_player_secs: f32,
    pub post_hit_player_secs: f32,
    pub pre_hit_boss_secs: f32,
    pub post_hit_boss_secs: f32,
    pub bomb_pre_secs: f32,
    pub bomb_post_secs: f32,
    /// Gap after every sub-turn
    pub turn_gap_secs: f32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            pre_hit_player_secs: PRE_HIT_PLAYER_SECS,
            post_hit_player_secs: POST_HIT_PLAYER_SECS,
            pre_hit_boss_secs: PRE_HIT_BOSS_SECS,
            post_hit_boss_secs: POST_HIT_BOSS_SECS,
            bomb_pre_secs: BOMB_PRE_SECS,
            bomb_post_secs: BOMB_POST_SECS,
            turn_gap_secs: TURN_GAP_SECS,
        }
    }
}

impl PacingConfig {
    /// No waiting at all
    pub fn instant() -> Self {
        Self {
            pre_hit_player_secs: 0.0,
            post_hit_player_secs: 0.0,
            pre_hit_boss_secs: 0.0,
            post_hit_boss_secs: 0.0,
            bomb_pre_secs: 0.0,
            bomb_post_secs: 0.0,
            turn_gap_secs: 0.0,
        }
    }

    pub fn validate(&self) -> Result<()> {
        let delays = [
            ("pre_hit_player_secs", self.pre_hit_player_secs),
            ("post_hit_player_secs", self.post_hit_player_secs),
            ("pre_hit_boss_secs", self.pre_hit_boss_secs),
            ("post_hit_boss_secs", self.post_hit_boss_secs),
            ("bomb_pre_secs", self.bomb_pre_secs),
            ("bomb_post_secs", self.bomb_post_secs),
            ("turn_gap_secs", self.turn_gap_secs),
        ];

        for (name, secs) in delays {
            if !secs.is_finite() || secs < 0.0 {
                return Err(BossRushError::InvalidConfig(format!(
                    "{} must be a non-negative number of seconds, got {}",
                    name, secs
                )));
            }
        }

        Ok(())
    }

    /// Wait before the pending sub-turn lands its hit
    pub fn delay_before(&self, pending: PendingSubTurn) -> Duration {
        let secs = match pending {
            PendingSubTurn::Player { throws_bombs: true } => {
                self.bomb_pre_secs + self.pre_hit_player_secs
            }
            PendingSubTurn::Player {
                throws_bombs: false,
            } => self.pre_hit_player_secs,
            PendingSubTurn::Boss => self.pre_hit_boss_secs,
        };
        secs_to_duration(secs)
    }

    /// Wait after a sub-turn, including the turn gap unless the battle is over
    pub fn delay_after(&self, result: &StepResult) -> Duration {
        let hit = match result.sub_turn {
            Some(SubTurn::Player { bombs_thrown, .. }) if bombs_thrown > 0 => {
                self.bomb_post_secs + self.post_hit_player_secs
            }
            Some(SubTurn::Player { .. }) => self.post_hit_player_secs,
            Some(SubTurn::Boss { .. }) => self.post_hit_boss_secs,
            None => 0.0,
        };
        let gap = if result.is_finished() {
            0.0
        } else {
            self.turn_gap_secs
        };
        secs_to_duration(hit + gap)
    }
}

fn secs_to_duration(secs: f32) -> Duration {
    Duration::try_from_secs_f32(secs.max(0.0)).unwrap_or(Duration::ZERO)
}

/// Cooperative stop signal checked between sub-turns
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

async fn pause(duration: Duration) {
    if duration.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(duration).await;
    }
}

/// Play the battle out in real time
///
/// Returns [`BossRushError::Cancelled`] if `cancel` fires before the last
/// sub-turn; the resolver is left where it stopped.
pub async fn run_paced<S>(
    resolver: &mut BattleResolver,
    pacing: &PacingConfig,
    sink: &mut S,
    cancel: &CancelFlag,
) -> Result<BattleReport>
where
    S: BattleEventSink + ?Sized,
{
    let sink: &mut dyn BattleEventSink = &mut ForwardSink(sink);
    resolver.start(sink);

    while let Some(pending) = resolver.pending_sub_turn() {
        if cancel.is_cancelled() {
            tracing::warn!(turn = resolver.turns_used(), "Battle cancelled");
            return Err(BossRushError::Cancelled);
        }

        pause(pacing.delay_before(pending)).await;
        let result = resolver.step(sink);
        pause(pacing.delay_after(&result)).await;
    }

    resolver.report().ok_or(BossRushError::Cancelled)
}

/// Sized wrapper so an unsized sink can be used as `&mut dyn`
struct ForwardSink<'a, S: ?Sized>(&'a mut S);

impl<S: BattleEventSink + ?Sized> BattleEventSink for ForwardSink<'_, S> {
    fn on_event(&mut self, event: &BattleEvent) {
        self.0.on_event(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::events::BattleEventLog;
    use crate::battle::execution::{BattleOutcome, BattleSetup};
    use crate::stage::StageConfig;

    #[test]
    fn test_default_pacing_valid() {
        assert!(PacingConfig::default().validate().is_ok());
        assert!(PacingConfig::instant().validate().is_ok());
    }

    #[test]
    fn test_negative_delay_rejected() {
        let pacing = PacingConfig {
            turn_gap_secs: -0.1,
            ..Default::default()
        };
        assert!(pacing.validate().is_err());

        let pacing = PacingConfig {
            bomb_pre_secs: f32::NAN,
            ..Default::default()
        };
        assert!(pacing.validate().is_err());
    }

    #[test]
    fn test_delay_before_includes_bomb_windup() {
        let pacing = PacingConfig::default();
        let with_bombs = pacing.delay_before(PendingSubTurn::Player { throws_bombs: true });
        let without = pacing.delay_before(PendingSubTurn::Player {
            throws_bombs: false,
        });
        assert!(with_bombs > without);
        assert_eq!(
            pacing.delay_before(PendingSubTurn::Boss),
            Duration::from_secs_f32(PRE_HIT_BOSS_SECS)
        );
    }

    #[test]
    fn test_no_gap_after_final_sub_turn() {
        let pacing = PacingConfig::default();
        let result = StepResult {
            sub_turn: Some(SubTurn::Boss { damage: 10 }),
            outcome: Some(BattleOutcome::Lose),
        };
        assert_eq!(
            pacing.delay_after(&result),
            Duration::from_secs_f32(POST_HIT_BOSS_SECS)
        );
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!flag.is_cancelled());
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[tokio::test]
    async fn test_paced_matches_unpaced() {
        let stage = StageConfig::fallback();
        let setup = BattleSetup {
            player_atk: 30,
            potions: 4,
            heal_per_potion: 40,
            ..Default::default()
        };

        let mut paced = BattleResolver::new(stage, setup);
        let mut log = BattleEventLog::new();
        let report = run_paced(&mut paced, &PacingConfig::instant(), &mut log, &CancelFlag::new())
            .await
            .expect("Battle should finish");

        let mut direct = BattleResolver::new(stage, setup);
        let expected = direct.run_to_end(&mut BattleEventLog::new());

        assert_eq!(report.outcome, expected.outcome);
        assert_eq!(report.turns_used, expected.turns_used);
        assert_eq!(report.player_damage_dealt, expected.player_damage_dealt);
        assert_eq!(report.boss_damage_dealt, expected.boss_damage_dealt);
        assert_eq!(log.ended_with(), Some(expected.outcome));
    }

    #[tokio::test]
    async fn test_cancelled_before_first_sub_turn() {
        let mut resolver = BattleResolver::new(StageConfig::fallback(), BattleSetup::default());
        let cancel = CancelFlag::new();
        cancel.cancel();

        let result = run_paced(
            &mut resolver,
            &PacingConfig::instant(),
            &mut BattleEventLog::new(),
            &cancel,
        )
        .await;

        assert!(matches!(result, Err(BossRushError::Cancelled)));
        assert!(!resolver.is_finished());
        assert_eq!(resolver.turns_used(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_paced_run_sleeps_between_sub_turns() {
        let stage = StageConfig {
            hp_boss: 20,
            ..StageConfig::fallback()
        };
        let mut resolver = BattleResolver::new(stage, BattleSetup::unequipped(&stage));
        let started = tokio::time::Instant::now();

        let report = run_paced(
            &mut resolver,
            &PacingConfig::default(),
            &mut BattleEventLog::new(),
            &CancelFlag::new(),
        )
        .await
        .expect("Battle should finish");

        assert_eq!(report.outcome, BattleOutcome::Win);
        let expected = Duration::from_secs_f32(PRE_HIT_PLAYER_SECS)
            + Duration::from_secs_f32(POST_HIT_PLAYER_SECS);
        assert!(started.elapsed() >= expected);
    }
}
