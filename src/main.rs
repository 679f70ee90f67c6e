//! Boss Rush - Entry Point
//!
//! Command-line walk through the game flow: shop/loadout -> battle -> result.

use std::path::PathBuf;

use boss_rush::battle::{
    run_paced, BattleEvent, BattleEventSink, BattleResolver, CancelFlag, TeeSink, TracingSink,
};
use boss_rush::core::config::AppConfig;
use boss_rush::core::error::{BossRushError, Result};
use boss_rush::loadout::{self, Catalog, LoadoutRecord, LoadoutSelection};
use boss_rush::persistence::ProfileStore;
use boss_rush::results::ResultSummary;
use boss_rush::stage::{load_stage_or_default, StageConfig, TomlStageDirectory};

use clap::{Parser, Subcommand};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

/// Boss Rush - pick a loadout within budget, then fight the boss
#[derive(Parser, Debug)]
#[command(name = "boss-rush")]
#[command(about = "Turn-based boss battle with a budgeted loadout optimizer")]
struct Args {
    /// App config file (TOML); defaults are used when absent
    #[arg(long)]
    config: Option<PathBuf>,

    /// Data directory holding stages/ and catalog/
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Profile file
    #[arg(long)]
    profile: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List everything the shop sells
    Shop,

    /// Find the cheapest loadout that guarantees a win
    Suggest {
        /// Stage id (file name under data/stages/)
        #[arg(long)]
        stage: Option<String>,

        /// Store the suggestion as the current loadout
        #[arg(long)]
        save: bool,
    },

    /// Store a hand-picked loadout
    Select {
        #[arg(long)]
        stage: Option<String>,

        /// Weapon index from `shop`
        #[arg(long)]
        weapon: Option<usize>,

        /// Armor index from `shop`
        #[arg(long)]
        armor: Option<usize>,

        #[arg(long)]
        ring: bool,

        #[arg(long)]
        amulet: bool,

        #[arg(long, default_value_t = 0)]
        potions: i32,

        #[arg(long, default_value_t = 0)]
        bombs: i32,
    },

    /// Fight the boss with the stored loadout
    Battle {
        #[arg(long)]
        stage: Option<String>,

        /// Play the battle out in real time
        #[arg(long)]
        paced: bool,

        /// Refuse to fight without a stored loadout
        #[arg(long)]
        strict: bool,
    },

    /// Show the last battle's results
    Result,

    /// Show or change volume options
    Options {
        /// Music volume, 0.0 - 1.0
        #[arg(long)]
        music: Option<f32>,

        /// Sound-effect volume, 0.0 - 1.0
        #[arg(long)]
        sfx: Option<f32>,
    },
}

/// Prints each event line as it happens
struct ConsoleSink;

impl BattleEventSink for ConsoleSink {
    fn on_event(&mut self, event: &BattleEvent) {
        println!("[turn {:>2}] {}", event.turn, event.description);
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("boss_rush=info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;
    let store = ProfileStore::new(config.profile_path.clone());

    match args.command {
        Command::Shop => {
            let catalog = Catalog::load(&config.catalog_path())?;
            let profile = store.load()?;
            let selection = profile.loadout.map(|r| r.selection).unwrap_or_default();

            println!("=== SHOP ===");
            for row in loadout::shop_rows(&catalog, &selection) {
                println!("  {}", row);
            }
        }

        Command::Suggest { stage, save } => {
            let catalog = Catalog::load(&config.catalog_path())?;
            let stage = resolve_stage(&config, stage.as_deref());

            match loadout::suggest(&catalog, &stage) {
                Some(found) => {
                    print_selection(&found.selection, &catalog, &stage);
                    if save {
                        let record = LoadoutRecord::new(found.selection, &catalog, &stage);
                        store.update(|p| p.set_loadout(record))?;
                        println!("Loadout saved.");
                    }
                }
                None => {
                    println!("No winning loadout within budget {}.", stage.budget);
                    return Err(BossRushError::NoWinningLoadout);
                }
            }
        }

        Command::Select {
            stage,
            weapon,
            armor,
            ring,
            amulet,
            potions,
            bombs,
        } => {
            let catalog = Catalog::load(&config.catalog_path())?;
            let stage = resolve_stage(&config, stage.as_deref());

            let mut selection = LoadoutSelection::new();
            selection.select_weapon(&catalog, weapon);
            selection.select_armor(&catalog, armor);
            selection.ring = ring;
            selection.amulet = amulet;
            selection.set_potions(potions);
            selection.set_bombs(bombs);

            print_selection(&selection, &catalog, &stage);
            let record = LoadoutRecord::checked(selection, &catalog, &stage)?;
            store.update(|p| p.set_loadout(record))?;
            println!("Loadout saved.");
        }

        Command::Battle {
            stage,
            paced,
            strict,
        } => {
            let stage = resolve_stage(&config, stage.as_deref());
            let mut profile = store.load()?;
            if strict {
                profile.require_loadout()?;
            }
            let catalog = Catalog::load(&config.catalog_path())?;
            let setup = profile.battle_setup(&catalog, &stage)?;

            let mut resolver = BattleResolver::new(stage, setup);
            let mut console = ConsoleSink;
            let mut tracing_sink = TracingSink;
            let mut sink = TeeSink {
                first: &mut console,
                second: &mut tracing_sink,
            };

            let report = if paced {
                let rt = Runtime::new()?;
                rt.block_on(async {
                    let cancel = CancelFlag::new();
                    let on_interrupt = cancel.clone();
                    tokio::spawn(async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            on_interrupt.cancel();
                        }
                    });
                    run_paced(&mut resolver, &config.pacing, &mut sink, &cancel).await
                })?
            } else {
                resolver.run_to_end(&mut sink)
            };

            println!();
            print!("{}", ResultSummary::from_report(&report));
            profile.record_battle(report);
            store.save(&profile)?;
        }

        Command::Result => match store.load()?.last_battle {
            Some(report) => print!("{}", ResultSummary::from_report(&report)),
            None => println!("No battle fought yet."),
        },

        Command::Options { music, sfx } => {
            let profile = store.update(|p| {
                if let Some(v) = music {
                    p.options.set_music(v);
                }
                if let Some(v) = sfx {
                    p.options.set_sfx(v);
                }
            })?;
            println!("Music: {:.2}", profile.options.music);
            println!("SFX:   {:.2}", profile.options.sfx);
        }
    }

    Ok(())
}

fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_toml_file(path)?,
        None => AppConfig::new(),
    };
    if let Some(dir) = &args.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(path) = &args.profile {
        config.profile_path = path.clone();
    }
    config.validate()?;
    Ok(config)
}

fn resolve_stage(config: &AppConfig, id: Option<&str>) -> StageConfig {
    let provider = TomlStageDirectory::new(config.stages_dir());
    load_stage_or_default(&provider, id.unwrap_or(&config.default_stage))
}

fn print_selection(selection: &LoadoutSelection, catalog: &Catalog, stage: &StageConfig) {
    let totals = selection.totals(catalog, stage);
    let weapon = catalog.weapon(selection.weapon).map_or("None", |w| w.name.as_str());
    let armor = catalog.armor(selection.armor).map_or("None", |a| a.name.as_str());

    println!("Weapon:  {}", weapon);
    println!("Armor:   {}", armor);
    println!("Ring:    {}", if selection.ring { "yes" } else { "no" });
    println!("Amulet:  {}", if selection.amulet { "yes" } else { "no" });
    println!("Potions: {}", selection.potions);
    println!("Bombs:   {}", selection.bombs);
    println!(
        "ATK {}  DEF {}  Heal {}  Bomb DMG {}  Cost {} / {}",
        totals.atk, totals.def, totals.heal, totals.bomb_damage, totals.cost, stage.budget
    );
    if !selection.within_budget(catalog, stage) {
        println!("Over budget!");
    }
}
