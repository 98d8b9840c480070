use engine::api::{
    load_foe, simulate_fight, simulate_fight_many, FightConfig, LuckPolicy,
};
use engine::content::builtin_foes;
use engine::player::StatsBlock;
use predicates::prelude::*;

fn config(foe: &str, seed: u64) -> FightConfig {
    FightConfig {
        foe_path: None,
        foe_id: Some(foe.to_string()),
        seed,
        luck_policy: LuckPolicy::Always,
        hero: None,
        max_rounds: 50,
    }
}

#[test]
fn fight_with_builtin_foe_runs_to_an_end() {
    let result = simulate_fight(config("orc", 2025)).expect("fight ran");
    assert!(result.rounds > 0);
    assert!(matches!(result.winner.as_str(), "hero" | "foe" | "draw"));
    assert!(!result.log.is_empty());
    let end = result.log.last().unwrap();
    assert!(predicate::str::contains("[END]").eval(end));
    assert!(predicate::str::contains("winner=").eval(end));
}

#[test]
fn same_config_replays_the_same_fight() {
    let a = simulate_fight(config("ogre", 77)).unwrap();
    let b = simulate_fight(config("ogre", 77)).unwrap();
    assert_eq!(a.log, b.log);
    assert_eq!(a.winner, b.winner);
    assert_eq!(a.rounds, b.rounds);
}

#[test]
fn never_policy_leaves_luck_untouched() {
    let mut cfg = config("orc", 9);
    cfg.luck_policy = LuckPolicy::Never;
    cfg.hero = Some(StatsBlock { skill: 11, stamina: 20, luck: 10, magic: 8 });
    let result = simulate_fight(cfg).unwrap();
    assert_eq!(result.hero_luck_end, 10);
}

#[test]
fn every_builtin_foe_parses() {
    for (id, _) in builtin_foes() {
        let result = simulate_fight(config(id, 1)).expect("builtin foe fights");
        assert!(result.rounds > 0);
    }
}

#[test]
fn unknown_builtin_foe_is_an_error() {
    let err = simulate_fight(config("balrog", 1)).unwrap_err();
    assert!(predicate::str::contains("unknown builtin foe").eval(&err.to_string()));
}

#[test]
fn many_fights_summarize_consistently() {
    let stats = simulate_fight_many(config("orc", 12345), 40).unwrap();
    assert_eq!(stats.trials, 40);
    assert_eq!(stats.hero_wins + stats.foe_wins + stats.draws, 40);
    assert!(stats.avg_rounds > 0.0);
}

#[test]
fn zero_trials_is_an_error() {
    assert!(simulate_fight_many(config("orc", 1), 0).is_err());
}

#[test]
fn foe_sheets_load_from_yaml_and_json() {
    let dir = std::env::temp_dir();
    let yaml_path = dir.join("ff_engine_test_foe.yaml");
    let json_path = dir.join("ff_engine_test_foe.json");
    std::fs::write(&yaml_path, "name: Night Stalker\nskill: 9\nstamina: 7\n").unwrap();
    std::fs::write(
        &json_path,
        r#"{"name": "Night Stalker", "skill": 9, "stamina": 7, "modifiers": {"damageDealt": 1}}"#,
    )
    .unwrap();

    let from_yaml = load_foe(&yaml_path).unwrap();
    assert_eq!(from_yaml.name, "Night Stalker");
    assert_eq!(from_yaml.skill, 9);

    let from_json = load_foe(&json_path).unwrap();
    assert_eq!(from_json.stamina, 7);
    assert_eq!(from_json.modifiers.damage_dealt, 1);

    let _ = std::fs::remove_file(yaml_path);
    let _ = std::fs::remove_file(json_path);
}
