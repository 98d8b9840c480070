use engine::modifiers::{
    damage_profile, normalize_enemy_modifiers, EnemyModifiers, RawEnemyModifiers,
};
use engine::player::PlayerModifiers;
use serde_json::{json, Value};

fn raw(mode: Option<&str>, dealt: Option<Value>, received: Option<Value>) -> RawEnemyModifiers {
    RawEnemyModifiers {
        mode: mode.map(str::to_string),
        damage_dealt: dealt,
        damage_received: received,
        ..Default::default()
    }
}

#[test]
fn legacy_absolute_values_become_deltas() {
    // Pre-delta saves stored the resulting damage: 5 damage = +3 over base.
    let m = normalize_enemy_modifiers(&raw(None, Some(json!(5)), None));
    assert_eq!(m.damage_dealt, 3);
    assert_eq!(m.damage_received, 0);
    assert_eq!(m.player_damage_bonus, 0);
    assert_eq!(m.player_damage_taken_bonus, 0);
}

#[test]
fn legacy_zero_damage_means_minus_base() {
    let m = normalize_enemy_modifiers(&raw(None, Some(json!(0)), Some(json!(1))));
    assert_eq!(m.damage_dealt, -2);
    assert_eq!(m.damage_received, -1);
}

#[test]
fn legacy_negative_values_floor_at_zero_damage() {
    let m = normalize_enemy_modifiers(&raw(None, Some(json!(-7)), None));
    assert_eq!(m.damage_dealt, -2);
}

#[test]
fn delta_mode_parses_strings_and_clamps() {
    let m = normalize_enemy_modifiers(&RawEnemyModifiers {
        mode: Some("delta".to_string()),
        damage_dealt: Some(json!(250)),
        damage_received: Some(json!("-7")),
        player_damage_bonus: Some(json!("junk")),
        player_damage_taken_bonus: Some(json!(2.9)),
    });
    assert_eq!(m.damage_dealt, 99);
    assert_eq!(m.damage_received, -7);
    assert_eq!(m.player_damage_bonus, 0);
    assert_eq!(m.player_damage_taken_bonus, 2);
}

#[test]
fn normalization_is_idempotent_in_delta_mode() {
    let once = normalize_enemy_modifiers(&raw(None, Some(json!(5)), Some(json!(9))));
    let twice = normalize_enemy_modifiers(&once.to_raw());
    assert_eq!(once, twice);
}

#[test]
fn profile_matches_spelled_out_scenario() {
    // damageDealt 5: the player takes 5 extra on enemy wins.
    // damageReceived -2: the enemy takes 2 less from the player.
    let enemy = EnemyModifiers { damage_dealt: 5, damage_received: -2, ..Default::default() };
    let profile = damage_profile(&enemy, &PlayerModifiers::default());
    assert_eq!(profile.to_player, 7);
    assert_eq!(profile.to_enemy, 0);
}

#[test]
fn profile_layers_all_three_adjustments() {
    let enemy = EnemyModifiers {
        damage_dealt: 1,
        damage_received: 1,
        player_damage_bonus: 2,
        player_damage_taken_bonus: 3,
    };
    let player = PlayerModifiers { damage_done: 1, damage_received: -1, skill_bonus: 0 };
    let profile = damage_profile(&enemy, &player);
    assert_eq!(profile.to_enemy, 2 + 1 + 1 + 2);
    assert_eq!(profile.to_player, 2 + 1 - 1 + 3);
}

#[test]
fn profile_never_heals() {
    let enemy = EnemyModifiers {
        damage_dealt: -99,
        damage_received: -99,
        player_damage_bonus: -99,
        player_damage_taken_bonus: -99,
    };
    let player = PlayerModifiers { damage_done: -99, damage_received: -99, skill_bonus: 0 };
    let profile = damage_profile(&enemy, &player);
    assert_eq!(profile.to_enemy, 0);
    assert_eq!(profile.to_player, 0);
}
