//! Battle resolver integration tests

use boss_rush::battle::*;
use boss_rush::stage::StageConfig;

fn stage(hp_boss: i32, atk_boss: i32, t_max: i32) -> StageConfig {
    StageConfig {
        hp_boss,
        atk_boss,
        t_max,
        ..StageConfig::fallback()
    }
}

fn damage_events(log: &BattleEventLog) -> Vec<(Side, DamageKind, i32, i32)> {
    log.events
        .iter()
        .filter_map(|e| match e.event_type {
            BattleEventType::DamageApplied {
                target,
                kind,
                amount,
                target_hp_after,
                ..
            } => Some((target, kind, amount, target_hp_after)),
            _ => None,
        })
        .collect()
}

#[test]
fn test_opening_bomb_volley() {
    let setup = BattleSetup {
        player_atk: 30,
        bombs: 2,
        dmg_per_bomb: 50,
        ..Default::default()
    };
    let mut resolver = BattleResolver::new(stage(300, 25, 10), setup);
    let mut log = BattleEventLog::new();

    resolver.step(&mut log);

    let hits = damage_events(&log);
    assert_eq!(hits[0], (Side::Boss, DamageKind::Bomb, 100, 200));
    assert_eq!(hits[1], (Side::Boss, DamageKind::Attack, 30, 170));
    assert_eq!(resolver.stats().bombs_used, 2);
}

#[test]
fn test_overkill_hit_recorded_as_remaining_hp() {
    let stage = stage(300, 150, 10);
    let mut resolver = BattleResolver::new(stage, BattleSetup::unequipped(&stage));
    let mut log = BattleEventLog::new();
    let report = resolver.run_to_end(&mut log);

    assert_eq!(report.outcome, BattleOutcome::Lose);
    assert_eq!(report.boss_damage_dealt, 100);
    assert_eq!(report.player_hp_end, 0);
    assert_eq!(log.damage_to(Side::Player), 100);
    assert!(log
        .events
        .iter()
        .any(|e| e.event_type == BattleEventType::UnitDied { side: Side::Player }));
}

#[test]
fn test_zero_turn_limit_ends_immediately() {
    let stage = stage(300, 25, 0);
    let mut resolver = BattleResolver::new(stage, BattleSetup::unequipped(&stage));
    let report = resolver.run_to_end(&mut NullSink);

    assert_eq!(report.outcome, BattleOutcome::BattleEnd);
    assert_eq!(report.turns_used, 0);
    assert_eq!(report.player_hp_end, 100);
    assert_eq!(report.boss_hp_end, 300);
    assert_eq!(report.player_damage_dealt, 0);
}

#[test]
fn test_draw_when_both_fall() {
    // Both units enter the fight at 0 HP
    let stage = StageConfig::fallback();
    let mut player = Unit::new(PLAYER_NAME, 100, 20, 0);
    let mut boss = Unit::new(BOSS_NAME, 300, 25, 0);
    player.take_damage(100);
    boss.take_damage(300);

    let mut resolver =
        BattleResolver::with_units(stage, BattleSetup::unequipped(&stage), Some(player), Some(boss));
    let mut log = BattleEventLog::new();
    let report = resolver.run_to_end(&mut log);
    assert_eq!(report.outcome, BattleOutcome::Draw);
    assert_eq!(log.ended_with(), Some(BattleOutcome::Draw));
}

#[test]
fn test_full_battle_statistics_consistent() {
    let setup = BattleSetup {
        player_atk: 30,
        potions: 4,
        heal_per_potion: 40,
        ..Default::default()
    };
    let mut resolver = BattleResolver::new(StageConfig::fallback(), setup);
    let mut log = BattleEventLog::new();
    let report = resolver.run_to_end(&mut log);

    // 10 x 30 = 300 kills the boss on the last player sub-turn
    assert_eq!(report.outcome, BattleOutcome::Win);
    assert_eq!(report.turns_used, 9);
    assert_eq!(report.player_hp_start, 260);
    assert_eq!(report.player_hp_end, 260 - 9 * 25);
    assert_eq!(report.potions_used, 4);
    assert_eq!(report.player_damage_dealt, log.damage_to(Side::Boss));
    assert_eq!(report.boss_damage_dealt, log.damage_to(Side::Player));
    assert_eq!(report.player_damage_dealt, report.boss_hp_start - report.boss_hp_end);
    assert_eq!(report.hp_margin, 35);
    assert_eq!(report.dmg_margin, 0);
}

#[test]
fn test_turn_counter_never_exceeds_limit() {
    for t_max in 0..6 {
        let stage = stage(10_000, 1, t_max);
        let mut resolver = BattleResolver::new(stage, BattleSetup::unequipped(&stage));
        let report = resolver.run_to_end(&mut NullSink);
        assert_eq!(report.turns_used, t_max);
        assert_eq!(report.outcome, BattleOutcome::BattleEnd);
    }
}

#[test]
fn test_tracing_sink_accepts_events() {
    let stage = stage(40, 25, 10);
    let mut resolver = BattleResolver::new(stage, BattleSetup::unequipped(&stage));
    let mut log = BattleEventLog::new();
    let mut tracing_sink = TracingSink;
    let mut tee = TeeSink {
        first: &mut log,
        second: &mut tracing_sink,
    };
    let report = resolver.run_to_end(&mut tee);
    assert_eq!(report.outcome, BattleOutcome::Win);
    assert_eq!(log.ended_with(), Some(BattleOutcome::Win));
}

#[tokio::test]
async fn test_paced_battle_without_delays() {
    let stage = StageConfig::fallback();
    let setup = BattleSetup {
        player_atk: 30,
        potions: 4,
        heal_per_potion: 40,
        ..Default::default()
    };
    let mut resolver = BattleResolver::new(stage, setup);
    let mut log = BattleEventLog::new();

    let report = run_paced(&mut resolver, &PacingConfig::instant(), &mut log, &CancelFlag::new())
        .await
        .expect("Battle should finish");

    assert!(report.is_win());
    assert_eq!(resolver.report(), Some(report));
}
