use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::clamp;
use crate::player::PlayerModifiers;

/// Stamina lost by the loser of a won exchange before any modifier layering.
pub const BASE_DAMAGE: i32 = 2;

/// Modifier deltas stay inside this band no matter what a save file says.
pub const MOD_MIN: i32 = -99;
pub const MOD_MAX: i32 = 99;

/// Per-enemy damage deltas, always in the delta representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EnemyModifiers {
    /// Delta to the damage this enemy inflicts on the player.
    pub damage_dealt: i32,
    /// Delta to the damage this enemy takes from the player.
    pub damage_received: i32,
    /// Enemy-specific bonus stacked onto the player's outgoing damage.
    pub player_damage_bonus: i32,
    /// Enemy-specific bonus stacked onto the damage the player takes.
    pub player_damage_taken_bonus: i32,
}

impl EnemyModifiers {
    pub fn clamped(self) -> Self {
        Self {
            damage_dealt: clamp(self.damage_dealt, MOD_MIN, MOD_MAX),
            damage_received: clamp(self.damage_received, MOD_MIN, MOD_MAX),
            player_damage_bonus: clamp(self.player_damage_bonus, MOD_MIN, MOD_MAX),
            player_damage_taken_bonus: clamp(self.player_damage_taken_bonus, MOD_MIN, MOD_MAX),
        }
    }

    /// Wire form of these modifiers, tagged `mode: "delta"`.
    pub fn to_raw(&self) -> RawEnemyModifiers {
        RawEnemyModifiers {
            mode: Some("delta".to_string()),
            damage_dealt: Some(Value::from(self.damage_dealt)),
            damage_received: Some(Value::from(self.damage_received)),
            player_damage_bonus: Some(Value::from(self.player_damage_bonus)),
            player_damage_taken_bonus: Some(Value::from(self.player_damage_taken_bonus)),
        }
    }
}

/// Enemy modifiers as found in a save document.
///
/// `mode` selects the parser: `"delta"` is the current representation;
/// anything else is the pre-delta scheme where the two damage fields stored
/// the resulting damage rather than an adjustment. A one-time migration
/// path, not an ongoing dual-format contract.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEnemyModifiers {
    pub mode: Option<String>,
    pub damage_dealt: Option<Value>,
    pub damage_received: Option<Value>,
    pub player_damage_bonus: Option<Value>,
    pub player_damage_taken_bonus: Option<Value>,
}

/// Convert either wire representation into delta form. Non-numeric or
/// missing fields default rather than error; save loading stays resilient
/// to hand-edited and legacy files.
pub fn normalize_enemy_modifiers(raw: &RawEnemyModifiers) -> EnemyModifiers {
    match raw.mode.as_deref() {
        Some("delta") => {
            let delta = |v: &Option<Value>| clamp(coerce_int(v).unwrap_or(0), MOD_MIN, MOD_MAX);
            EnemyModifiers {
                damage_dealt: delta(&raw.damage_dealt),
                damage_received: delta(&raw.damage_received),
                player_damage_bonus: delta(&raw.player_damage_bonus),
                player_damage_taken_bonus: delta(&raw.player_damage_taken_bonus),
            }
        }
        // Pre-delta saves stored the resulting damage; converting keeps the
        // stored combat balance. The player-bonus fields did not exist yet.
        _ => {
            let legacy = |v: &Option<Value>| {
                clamp(coerce_int(v).unwrap_or(BASE_DAMAGE), 0, MOD_MAX) - BASE_DAMAGE
            };
            EnemyModifiers {
                damage_dealt: legacy(&raw.damage_dealt),
                damage_received: legacy(&raw.damage_received),
                player_damage_bonus: 0,
                player_damage_taken_bonus: 0,
            }
        }
    }
}

/// Effective stamina loss for one exchange against this enemy, floored at
/// zero in both directions. The single source of truth for exchange damage;
/// combat resolution must not recompute these inline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageProfile {
    pub to_enemy: i32,
    pub to_player: i32,
}

pub fn damage_profile(enemy: &EnemyModifiers, player: &PlayerModifiers) -> DamageProfile {
    let to_enemy =
        (BASE_DAMAGE + enemy.damage_received + player.damage_done + enemy.player_damage_bonus)
            .max(0);
    let to_player =
        (BASE_DAMAGE + enemy.damage_dealt + player.damage_received + enemy.player_damage_taken_bonus)
            .max(0);
    DamageProfile { to_enemy, to_player }
}

/// Best-effort integer coercion for save-file values: numbers, numeric
/// strings, and fractional numbers (truncated) all count.
pub(crate) fn coerce_int(value: &Option<Value>) -> Option<i32> {
    match value.as_ref()? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f.trunc() as i64))
            .map(narrow),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.trunc() as i64))
                .map(narrow)
        }
        _ => None,
    }
}

fn narrow(v: i64) -> i32 {
    v.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}

/// Lenient deserializer for numeric save-file fields: anything coercible
/// becomes the number, everything else becomes 0.
pub(crate) fn de_lenient_int<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(coerce_int(&value).unwrap_or(0))
}
