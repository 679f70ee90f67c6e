//! Battle execution loop
//!
//! Each turn cycle: player sub-turn (bombs on turn 0, then attack) -> boss
//! sub-turn -> turn counter. Terminal checks run after every sub-turn.
//!
//! The resolver is pure state. [`BattleResolver::step`] executes exactly one
//! sub-turn and reports it; pacing and presentation happen outside.

use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::battle::constants::{BOSS_NAME, MAX_PLAYER_HP, PLAYER_NAME};
use crate::battle::events::{BattleEvent, BattleEventSink, BattleEventType, DamageKind};
use crate::battle::units::{Side, Unit};
use crate::stage::StageConfig;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BattlePhase {
    #[default]
    PlayerTurn,
    BossTurn,
    Finished,
}

/// Battle outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BattleOutcome {
    Win,
    Lose,
    /// Both units fell
    Draw,
    /// Turn limit reached with both units standing
    BattleEnd,
}

impl BattleOutcome {
    pub fn classify(player_dead: bool, boss_dead: bool) -> Self {
        match (player_dead, boss_dead) {
            (false, true) => Self::Win,
            (true, false) => Self::Lose,
            (true, true) => Self::Draw,
            (false, false) => Self::BattleEnd,
        }
    }

    pub fn is_win(self) -> bool {
        matches!(self, Self::Win)
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Win => "Victory!",
            Self::Lose => "Defeat...",
            Self::Draw => "Both fell...",
            Self::BattleEnd => "Battle End.",
        }
    }
}

/// Initial conditions handed over from the loadout screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleSetup {
    pub player_atk: i32,
    pub player_def: i32,
    pub potions: i32,
    pub heal_per_potion: i32,
    pub bombs: i32,
    pub dmg_per_bomb: i32,
}

impl BattleSetup {
    /// Base hero stats, no items
    pub fn unequipped(stage: &StageConfig) -> Self {
        Self {
            player_atk: stage.atk0,
            player_def: stage.def0,
            ..Default::default()
        }
    }

    /// HP pool after potions are drunk at battle start
    pub fn player_hp_pool(&self, stage: &StageConfig) -> i32 {
        let healing = i64::from(self.potions.max(0)) * i64::from(self.heal_per_potion.max(0));
        (i64::from(stage.hp0) + healing).clamp(1, i64::from(MAX_PLAYER_HP)) as i32
    }
}

/// Running totals accumulated during the loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleStats {
    pub turns_used: i32,
    pub player_damage_dealt: i32,
    pub boss_damage_dealt: i32,
    pub bombs_used: i32,
    pub potions_used: i32,
    pub player_hp_start: i32,
    pub boss_hp_start: i32,
}

/// What a single sub-turn did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubTurn {
    Player {
        bombs_thrown: i32,
        bomb_damage: i32,
        /// `None` when the bombs already finished the boss
        attack_damage: Option<i32>,
    },
    Boss {
        damage: i32,
    },
}

/// Result of [`BattleResolver::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepResult {
    pub sub_turn: Option<SubTurn>,
    pub outcome: Option<BattleOutcome>,
}

impl StepResult {
    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }
}

/// The sub-turn that the next call to `step` will execute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingSubTurn {
    Player { throws_bombs: bool },
    Boss,
}

/// Final record of a battle, persisted for the results screen
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleReport {
    pub outcome: BattleOutcome,
    pub turns_used: i32,
    pub duration_secs: f32,
    pub player_hp_start: i32,
    pub player_hp_end: i32,
    pub boss_hp_start: i32,
    pub boss_hp_end: i32,
    pub player_damage_dealt: i32,
    pub boss_damage_dealt: i32,
    pub bombs_used: i32,
    pub potions_used: i32,
    pub heal_per_potion: i32,
    pub bomb_damage: i32,
    pub player_atk: i32,
    pub player_def: i32,
    pub boss_hit_per_turn: i32,
    pub t_max: i32,
    /// Player HP left at the end
    pub hp_margin: i32,
    /// `player_atk * t_max - boss HP`, bombs excluded
    pub dmg_margin: i32,
}

impl BattleReport {
    pub fn is_win(&self) -> bool {
        self.outcome.is_win()
    }
}

/// Two-unit turn loop
#[derive(Debug, Clone)]
pub struct BattleResolver {
    stage: StageConfig,
    setup: BattleSetup,
    player: Option<Unit>,
    boss: Option<Unit>,
    boss_hit_per_turn: i32,
    bombs_left: i32,
    phase: BattlePhase,
    started: bool,
    /// 1-based turn in progress, 0 before the first turn
    current_turn: i32,
    stats: BattleStats,
    outcome: Option<BattleOutcome>,
    started_at: Option<Instant>,
    duration_secs: f32,
}

impl BattleResolver {
    /// Build both units from the stage and the handed-over loadout
    pub fn new(stage: StageConfig, setup: BattleSetup) -> Self {
        let player = Unit::new(
            PLAYER_NAME,
            setup.player_hp_pool(&stage),
            setup.player_atk,
            setup.player_def,
        );
        let boss = Unit::new(BOSS_NAME, stage.hp_boss, stage.atk_boss, 0);
        Self::with_units(stage, setup, Some(player), Some(boss))
    }

    /// Use pre-built units; an absent unit counts as already dead
    pub fn with_units(
        stage: StageConfig,
        setup: BattleSetup,
        player: Option<Unit>,
        boss: Option<Unit>,
    ) -> Self {
        let stats = BattleStats {
            potions_used: setup.potions.max(0),
            player_hp_start: player.as_ref().map_or(0, |u| u.current_hp),
            boss_hp_start: boss.as_ref().map_or(0, |u| u.current_hp),
            ..Default::default()
        };

        Self {
            stage,
            setup,
            player,
            boss,
            boss_hit_per_turn: stage.atk_boss.max(0),
            bombs_left: setup.bombs.max(0),
            phase: BattlePhase::PlayerTurn,
            started: false,
            current_turn: 0,
            stats,
            outcome: None,
            started_at: None,
            duration_secs: 0.0,
        }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, BattlePhase::Finished)
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        self.outcome
    }

    pub fn stats(&self) -> &BattleStats {
        &self.stats
    }

    pub fn turns_used(&self) -> i32 {
        self.stats.turns_used
    }

    pub fn player(&self) -> Option<&Unit> {
        self.player.as_ref()
    }

    pub fn boss(&self) -> Option<&Unit> {
        self.boss.as_ref()
    }

    pub fn stage(&self) -> &StageConfig {
        &self.stage
    }

    pub fn bombs_left(&self) -> i32 {
        self.bombs_left
    }

    /// What the next `step` will do, `None` once finished
    pub fn pending_sub_turn(&self) -> Option<PendingSubTurn> {
        match self.phase {
            BattlePhase::PlayerTurn => Some(PendingSubTurn::Player {
                throws_bombs: self.bombs_pending(),
            }),
            BattlePhase::BossTurn => Some(PendingSubTurn::Boss),
            BattlePhase::Finished => None,
        }
    }

    fn bombs_pending(&self) -> bool {
        self.stats.turns_used == 0 && self.bombs_left > 0 && self.setup.dmg_per_bomb > 0
    }

    fn player_dead(&self) -> bool {
        self.player.as_ref().map_or(true, Unit::is_dead)
    }

    fn boss_dead(&self) -> bool {
        self.boss.as_ref().map_or(true, Unit::is_dead)
    }

    fn emit(&self, sink: &mut dyn BattleEventSink, event_type: BattleEventType, description: String) {
        sink.on_event(&BattleEvent {
            turn: self.current_turn,
            event_type,
            description,
        });
    }

    /// Begin the battle. Ends it at once when a unit is missing or `t_max` is 0.
    pub fn start(&mut self, sink: &mut dyn BattleEventSink) {
        if self.started {
            return;
        }
        self.started = true;
        self.started_at = Some(Instant::now());

        tracing::info!(
            player_hp = self.stats.player_hp_start,
            player_atk = self.player.as_ref().map_or(0, |u| u.battle_atk),
            boss_hp = self.stats.boss_hp_start,
            boss_hit = self.boss_hit_per_turn,
            bombs = self.bombs_left,
            t_max = self.stage.t_max,
            "Battle started"
        );
        self.emit(sink, BattleEventType::BattleStarted, "Battle start!".into());

        if self.player.is_none() || self.boss.is_none() {
            tracing::warn!("Battle is missing a unit, ending immediately");
            self.finish(sink);
        } else if !self.stage.is_meaningful() {
            self.finish(sink);
        }
    }

    /// Execute one sub-turn
    pub fn step(&mut self, sink: &mut dyn BattleEventSink) -> StepResult {
        if !self.started {
            self.start(sink);
        }

        let sub_turn = match self.phase {
            BattlePhase::Finished => None,
            BattlePhase::PlayerTurn => Some(self.player_sub_turn(sink)),
            BattlePhase::BossTurn => Some(self.boss_sub_turn(sink)),
        };

        StepResult {
            sub_turn,
            outcome: self.outcome,
        }
    }

    /// Run every remaining sub-turn and return the report
    pub fn run_to_end(&mut self, sink: &mut dyn BattleEventSink) -> BattleReport {
        while !self.step(sink).is_finished() {}
        self.build_report()
    }

    fn player_sub_turn(&mut self, sink: &mut dyn BattleEventSink) -> SubTurn {
        let attacker = self.player.as_ref().filter(|_| self.boss.is_some());
        let Some(player_atk) = attacker.map(|u| u.battle_atk) else {
            self.finish(sink);
            return SubTurn::Player {
                bombs_thrown: 0,
                bomb_damage: 0,
                attack_damage: None,
            };
        };

        self.current_turn = self.stats.turns_used + 1;
        self.emit(
            sink,
            BattleEventType::TurnStarted {
                turn: self.current_turn,
            },
            format!("Turn {} begins", self.current_turn),
        );

        let mut bombs_thrown = 0;
        let mut bomb_damage = 0;

        if self.bombs_pending() {
            let volley = self.bombs_left.saturating_mul(self.setup.dmg_per_bomb);
            bomb_damage = self.hit(Side::Player, DamageKind::Bomb, volley, sink);
            bombs_thrown = self.bombs_left;
            self.stats.bombs_used += self.bombs_left;
            self.bombs_left = 0;

            if self.boss_dead() {
                self.finish(sink);
                return SubTurn::Player {
                    bombs_thrown,
                    bomb_damage,
                    attack_damage: None,
                };
            }
        }

        let attack_damage = self.hit(Side::Player, DamageKind::Attack, player_atk, sink);

        if self.boss_dead() {
            self.finish(sink);
        } else {
            self.phase = BattlePhase::BossTurn;
        }

        SubTurn::Player {
            bombs_thrown,
            bomb_damage,
            attack_damage: Some(attack_damage),
        }
    }

    fn boss_sub_turn(&mut self, sink: &mut dyn BattleEventSink) -> SubTurn {
        if self.player.is_none() || self.boss.is_none() {
            self.finish(sink);
            return SubTurn::Boss { damage: 0 };
        }

        let damage = self.hit(Side::Boss, DamageKind::Attack, self.boss_hit_per_turn, sink);

        if self.player_dead() {
            self.finish(sink);
            return SubTurn::Boss { damage };
        }

        self.stats.turns_used += 1;
        if self.stats.turns_used >= self.stage.t_max {
            self.finish(sink);
        } else {
            self.phase = BattlePhase::PlayerTurn;
        }

        SubTurn::Boss { damage }
    }

    /// Apply `amount` from `source` to its opponent, record the realized damage
    fn hit(
        &mut self,
        source: Side,
        kind: DamageKind,
        amount: i32,
        sink: &mut dyn BattleEventSink,
    ) -> i32 {
        let target_side = source.opponent();
        let target = match target_side {
            Side::Player => self.player.as_mut(),
            Side::Boss => self.boss.as_mut(),
        };
        let Some(target) = target else {
            return 0;
        };

        let was_alive = target.is_alive();
        let realized = target.take_realized_damage(amount);
        let hp_after = target.current_hp;
        let died = was_alive && target.is_dead();
        let target_name = target.name.clone();

        match source {
            Side::Player => self.stats.player_damage_dealt += realized,
            Side::Boss => self.stats.boss_damage_dealt += realized,
        }

        tracing::debug!(
            ?source,
            ?kind,
            nominal = amount,
            realized,
            hp_after,
            "Damage applied"
        );

        let description = match (source, kind) {
            (Side::Player, DamageKind::Bomb) => format!("You throw bombs for {}!", realized),
            (Side::Player, DamageKind::Attack) => format!("You hit for {}.", realized),
            (Side::Boss, _) => format!("Boss hits for {}.", realized),
        };
        self.emit(
            sink,
            BattleEventType::DamageApplied {
                source,
                target: target_side,
                kind,
                amount: realized,
                target_hp_after: hp_after,
            },
            description,
        );

        if died {
            self.emit(
                sink,
                BattleEventType::UnitDied { side: target_side },
                format!("{} has fallen", target_name),
            );
        }

        realized
    }

    fn finish(&mut self, sink: &mut dyn BattleEventSink) {
        if self.is_finished() {
            return;
        }

        let outcome = BattleOutcome::classify(self.player_dead(), self.boss_dead());
        self.phase = BattlePhase::Finished;
        self.outcome = Some(outcome);
        self.duration_secs = self
            .started_at
            .map_or(0.0, |t| t.elapsed().as_secs_f32().max(0.0));

        tracing::info!(
            ?outcome,
            turns = self.stats.turns_used,
            dealt = self.stats.player_damage_dealt,
            taken = self.stats.boss_damage_dealt,
            "Battle ended"
        );
        self.emit(
            sink,
            BattleEventType::BattleEnded { outcome },
            outcome.title().to_string(),
        );
    }

    /// The persisted record; `None` until the battle has finished
    pub fn report(&self) -> Option<BattleReport> {
        self.is_finished().then(|| self.build_report())
    }

    fn build_report(&self) -> BattleReport {
        let player_hp_end = self.player.as_ref().map_or(0, |u| u.current_hp.max(0));
        let boss_hp_end = self.boss.as_ref().map_or(0, |u| u.current_hp.max(0));
        let player_atk = self.player.as_ref().map_or(self.setup.player_atk.max(0), |u| u.battle_atk);
        let player_def = self.player.as_ref().map_or(self.setup.player_def.max(0), |u| u.battle_def);

        BattleReport {
            outcome: self
                .outcome
                .unwrap_or_else(|| BattleOutcome::classify(self.player_dead(), self.boss_dead())),
            turns_used: self.stats.turns_used,
            duration_secs: self.duration_secs,
            player_hp_start: self.stats.player_hp_start,
            player_hp_end,
            boss_hp_start: self.stats.boss_hp_start,
            boss_hp_end,
            player_damage_dealt: self.stats.player_damage_dealt,
            boss_damage_dealt: self.stats.boss_damage_dealt,
            bombs_used: self.stats.bombs_used,
            potions_used: self.stats.potions_used,
            heal_per_potion: self.setup.heal_per_potion,
            bomb_damage: self.setup.dmg_per_bomb,
            player_atk,
            player_def,
            boss_hit_per_turn: self.boss_hit_per_turn,
            t_max: self.stage.t_max,
            hp_margin: player_hp_end,
            dmg_margin: player_atk
                .saturating_mul(self.stage.t_max)
                .saturating_sub(self.stage.hp_boss),
        }
    }
}
