//! Loadout, shop and optimizer integration tests

use std::path::Path;

use boss_rush::battle::{BattleOutcome, BattleResolver, NullSink};
use boss_rush::loadout::*;
use boss_rush::stage::{parse_stage_file, StageConfig};

fn data_path(relative: &str) -> std::path::PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("data").join(relative)
}

#[test]
fn test_fallback_stage_needs_more_attack() {
    let catalog = Catalog::load(&data_path("catalog/default.toml")).expect("Should load catalog");
    let stage = StageConfig::fallback();

    // Base ATK 20 only reaches 200 of the boss's 300 HP in 10 turns
    assert!(!is_winning(&LoadoutSelection::default(), &catalog, &stage));

    let found = suggest(&catalog, &stage).expect("Should find a loadout");
    assert!(found.total_atk >= 30);
    assert!(found.total_cost <= stage.budget);
    assert_eq!(found.total_cost, 52);
    assert_eq!(
        catalog.weapon(found.selection.weapon).map(|w| w.name.as_str()),
        Some("Iron Sword")
    );
}

#[test]
fn test_gauntlet_stage_suggestion() {
    let catalog = Catalog::starter();
    let stage = parse_stage_file(&data_path("stages/gauntlet.toml")).expect("Should load stage");

    let found = suggest(&catalog, &stage).expect("Gauntlet should be winnable");
    // Mythril Edge (ATK 80 x 8 turns) and 3 potions (120 + 120 >= 8 x 30)
    assert_eq!(found.selection.weapon, Some(3));
    assert_eq!(found.selection.potions, 3);
    assert_eq!(found.selection.bombs, 0);
    assert_eq!(found.total_cost, 79);
}

#[test]
fn test_suggestion_wins_the_battle() {
    let catalog = Catalog::starter();
    for stage in [
        StageConfig::fallback(),
        parse_stage_file(&data_path("stages/gauntlet.toml")).expect("Should load stage"),
    ] {
        let found = suggest(&catalog, &stage).expect("Should find a loadout");
        let record = LoadoutRecord::new(found.selection, &catalog, &stage);
        assert_eq!(record.total_cost, found.total_cost);

        let report = BattleResolver::new(stage, record.battle_setup()).run_to_end(&mut NullSink);
        assert_eq!(report.outcome, BattleOutcome::Win);
    }
}

#[test]
fn test_cheaper_than_any_manual_pick() {
    let catalog = Catalog::starter();
    let stage = StageConfig::fallback();
    let found = suggest(&catalog, &stage).expect("Should find a loadout");

    let manual = LoadoutSelection {
        weapon: Some(3),
        potions: 4,
        ..Default::default()
    };
    assert!(is_winning(&manual, &catalog, &stage));
    assert!(manual.total_cost(&catalog) >= found.total_cost);
}

#[test]
fn test_shop_editing_round() {
    let catalog = Catalog::starter();
    let stage = StageConfig::fallback();
    let mut selection = LoadoutSelection::default();

    let rows = shop_rows(&catalog, &selection);
    let iron = rows
        .iter()
        .find(|r| r.name == "Iron Sword")
        .expect("Iron Sword listed");
    buy(&mut selection, &catalog, iron.kind);
    for _ in 0..4 {
        buy(&mut selection, &catalog, ShopRowKind::Potion);
    }

    assert!(is_winning(&selection, &catalog, &stage));
    assert!(selection.within_budget(&catalog, &stage));
    assert_eq!(selection.total_cost(&catalog), 52);

    let rows = shop_rows(&catalog, &selection);
    assert!(rows.iter().any(|r| r.name == "Iron Sword" && r.owned));
    assert!(rows
        .iter()
        .any(|r| r.kind == ShopRowKind::Potion && r.quantity == 4));
}

#[test]
fn test_impossible_stage_reports_none() {
    let stage = StageConfig {
        atk_boss: 500,
        budget: 0,
        ..StageConfig::fallback()
    };
    assert!(suggest(&Catalog::starter(), &stage).is_none());
    assert!(suggest_or_err(&Catalog::starter(), &stage).is_err());
}
