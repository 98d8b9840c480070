//! JSON-string boundary for the browser host. Every entry point takes and
//! returns strings; results are wrapped in an `{ok, result | error}`
//! envelope so the host never has to catch.

use engine::api::{simulate_fight, FightConfig};
use engine::session::Session;
use engine::Dice;
use serde_json::json;
use wasm_bindgen::prelude::*;

fn ok(value: serde_json::Value) -> String {
    json!({ "ok": true, "result": value }).to_string()
}

fn err(e: impl std::fmt::Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

#[wasm_bindgen]
pub fn version() -> String {
    "ff-companion-ffi 0.1.0".to_string()
}

/// Sum of `n` rolls of 1..=sides, deterministic per seed.
#[wasm_bindgen]
pub fn roll(seed: u64, n: u32, sides: u32) -> i32 {
    Dice::from_seed(seed).roll_custom(n, sides).total
}

/// Run one seeded fight; `config` is a JSON [`FightConfig`].
#[wasm_bindgen]
pub fn simulate_fight_json(config: &str) -> String {
    let cfg: FightConfig = match serde_json::from_str(config) {
        Ok(c) => c,
        Err(e) => return err(format!("invalid_config: {e}")),
    };
    match simulate_fight(cfg) {
        Ok(result) => match serde_json::to_value(&result) {
            Ok(value) => ok(value),
            Err(e) => err(e),
        },
        Err(e) => err(e),
    }
}

/// Roll a new hero and return the save document.
#[wasm_bindgen]
pub fn new_hero_json(seed: u64) -> String {
    let mut dice = Dice::from_seed(seed);
    let snapshot = Session::new_game(&mut dice).to_snapshot();
    match serde_json::to_value(&snapshot) {
        Ok(value) => ok(value),
        Err(e) => err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_is_deterministic_and_bounded() {
        let a = roll(42, 3, 6);
        let b = roll(42, 3, 6);
        assert_eq!(a, b);
        assert!((3..=18).contains(&a));
    }

    #[test]
    fn fight_envelope_reports_ok() {
        let out = simulate_fight_json(r#"{"foe_id": "orc", "seed": 7}"#);
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["ok"], true);
        assert!(value["result"]["rounds"].as_u64().unwrap() > 0);
    }

    #[test]
    fn bad_config_reports_error() {
        let out = simulate_fight_json("not json");
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["ok"], false);
        assert!(value["error"].as_str().unwrap().starts_with("invalid_config"));
    }

    #[test]
    fn new_hero_is_reproducible() {
        assert_eq!(new_hero_json(5), new_hero_json(5));
        let value: serde_json::Value = serde_json::from_str(&new_hero_json(5)).unwrap();
        assert_eq!(value["ok"], true);
        assert!(value["result"]["player"]["maxSkill"].as_i64().unwrap() >= 7);
    }
}
