//! End-to-end runs through the public API: ticking, prestige, bankruptcy
//! and persistence.

use idle_knight::game::actions::PlayerAction;
use idle_knight::game::config::EngineConfig;
use idle_knight::game::error::GameError;
use idle_knight::game::logic;
use idle_knight::game::rebirth;
use idle_knight::game::save;
use idle_knight::game::state::GameState;
use idle_knight::game::IdleGame;

const DAYS_PER_YEAR: f64 = 365.0;

fn game() -> IdleGame {
    IdleGame::new(EngineConfig::default()).unwrap()
}

fn age_to(state: &mut GameState, years: f64) {
    state.days = years * DAYS_PER_YEAR;
    logic::refresh_requirements(state);
}

#[test]
fn beggar_earns_and_learns() {
    let mut g = game();
    let outcome = g.tick(100);
    assert!(g.state.coins > 0.0);
    assert!(g.state.current_job().xp > 0.0 || g.state.current_job().level > 0);
    assert!(g.state.current_skill().xp > 0.0 || g.state.current_skill().level > 0);
    assert!(!outcome.died);
    assert!(!outcome.bankrupt);
    assert!(g.state.days > 14.0 * DAYS_PER_YEAR);
}

#[test]
fn beggar_reaches_farmer() {
    let mut g = game();
    let mut unlocked = Vec::new();
    for _ in 0..200 {
        unlocked.extend(g.tick(20).unlocked);
    }
    assert!(g.state.current_job().level >= 10);
    assert!(unlocked.contains(&"Farmer"));
    g.dispatch(&PlayerAction::SetJob {
        name: "Farmer".into(),
    })
    .unwrap();
    assert_eq!(g.state.current_job().name, "Farmer");
}

#[test]
fn paused_game_does_not_age() {
    let mut g = game();
    g.dispatch(&PlayerAction::SetPaused { paused: true }).unwrap();
    let days = g.state.days;
    g.tick(500);
    assert_eq!(g.state.days, days);
    assert_eq!(g.state.coins, 0.0);
}

#[test]
fn dead_character_stops_progressing() {
    let mut g = game();
    let lifespan = g.state.lifespan();
    g.state.days = lifespan - 1.0;
    let outcome = g.tick(10);
    assert!(outcome.died);
    assert!(!g.state.is_alive());
    assert_eq!(g.state.days, lifespan);

    let coins = g.state.coins;
    g.tick(100);
    assert_eq!(g.state.coins, coins);
    assert_eq!(g.state.days, lifespan);
}

#[test]
fn rebirth_one_banks_levels() {
    let mut g = game();
    {
        let s = &mut g.state;
        let strength = s.task_mut("Strength").unwrap();
        strength.level = 20;
        strength.max_level = 5;
        let beggar = s.task_mut("Beggar").unwrap();
        beggar.level = 3;
        beggar.max_level = 40;
        s.coins = 1_000.0;
        age_to(s, 66.0);
    }
    assert!(rebirth::can_rebirth_one(&g.state));
    g.dispatch(&PlayerAction::RebirthOne).unwrap();

    let s = &g.state;
    assert_eq!(s.rebirth_one_count, 1);
    assert_eq!(s.coins, 0.0);
    assert_eq!(s.age_years(), 14);
    assert_eq!(s.task("Strength").unwrap().max_level, 20);
    assert_eq!(s.task("Strength").unwrap().level, 0);
    assert_eq!(s.task("Beggar").unwrap().max_level, 40);
    assert_eq!(s.current_job().name, "Beggar");
    assert!(!s.is_completed("Rebirth note 2").unwrap());
}

#[test]
fn rebirth_one_refused_while_young() {
    let mut g = game();
    logic::refresh_requirements(&mut g.state);
    let err = g.dispatch(&PlayerAction::RebirthOne).unwrap_err();
    assert!(matches!(err, GameError::Locked(_)));
    assert_eq!(g.state.rebirth_one_count, 0);
}

#[test]
fn rebirth_two_converts_run_into_evil() {
    let mut g = game();
    {
        let s = &mut g.state;
        s.task_mut("Strength").unwrap().level = 50;
        s.task_mut("Strength").unwrap().max_level = 80;
        age_to(s, 201.0);
    }
    let gain = g.state.evil_gain();
    assert_eq!(gain, 1.0);
    g.dispatch(&PlayerAction::RebirthTwo).unwrap();

    let s = &g.state;
    assert_eq!(s.rebirth_two_count, 1);
    assert_eq!(s.evil, 1.0);
    assert!(s.tasks.iter().all(|t| t.level == 0 && t.max_level == 0));
    assert_eq!(s.age_years(), 14);
}

#[test]
fn permanent_unlocks_survive_rebirth() {
    let mut g = game();
    age_to(&mut g.state, 66.0);
    assert!(g.state.is_completed("Automation").unwrap());
    g.dispatch(&PlayerAction::SetAutoPromote { enabled: true })
        .unwrap();
    g.dispatch(&PlayerAction::RebirthOne).unwrap();

    assert!(g.state.is_completed("Automation").unwrap());
    assert!(!g.state.is_completed("Rebirth note 1").unwrap());
    assert!(g.state.auto_promote);
}

#[test]
fn overspending_leads_to_bankruptcy() {
    let mut g = game();
    {
        let s = &mut g.state;
        let cottage = s.item_id("Cottage").unwrap();
        s.current_property = cottage;
        let book = s.item_id("Book").unwrap();
        s.current_misc.push(book);
        s.coins = 1.0;
    }
    let mut bankrupt = false;
    for _ in 0..50 {
        bankrupt |= g.tick(1).bankrupt;
    }
    assert!(bankrupt);
    assert_eq!(g.state.current_property().name, "Homeless");
    assert!(g.state.current_misc.is_empty());
    assert!(g.state.coins >= 0.0);
}

#[test]
fn save_roundtrip_through_the_game() {
    let mut g = game();
    g.tick(400);
    g.state.task_mut("Strength").unwrap().max_level = 7;
    g.state.evil = 3.0;
    let json = g.export_save().unwrap();

    let loaded = IdleGame::load(Some(&json), EngineConfig::default()).unwrap();
    let (a, b) = (&g.state, &loaded.state);
    assert!((a.coins - b.coins).abs() < 1e-6);
    assert!((a.days - b.days).abs() < 1e-6);
    assert_eq!(b.evil, 3.0);
    assert_eq!(b.task("Strength").unwrap().max_level, 7);
    assert_eq!(a.current_job().level, b.current_job().level);
    assert_eq!(a.current_skill().name, b.current_skill().name);
    assert_eq!(a.time_warping_enabled, b.time_warping_enabled);
}

#[test]
fn deprecated_save_is_rejected_then_recovered() {
    let legacy = format!(
        r#"{{"version":{},"game":{{"coins":50.0,"tasks":{{
            "Beggar job":{{"level":3,"max_level":0,"xp":0.0}}
        }}}}}}"#,
        save::SAVE_VERSION
    );
    let strict = save::from_json(&legacy, EngineConfig::default());
    assert!(matches!(strict, Err(GameError::DeprecatedSave(_))));

    let recovered = IdleGame::load(Some(&legacy), EngineConfig::default()).unwrap();
    assert_eq!(recovered.state.coins, 0.0);
    assert_eq!(recovered.state.current_job().name, "Beggar");
}

#[test]
fn unreadable_import_keeps_the_running_game() {
    let mut g = game();
    g.tick(40);
    let days = g.state.days;
    assert!(g.import_save(r#"{"version":0,"game":{}}"#).is_err());
    assert!(g.import_save("]").is_err());
    assert_eq!(g.state.days, days);
}
