use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::combat::{attack_enemy, AttackOutcome};
use crate::content::builtin_foes;
use crate::luck::test_luck;
use crate::modifiers::EnemyModifiers;
use crate::player::{Player, StatsBlock};
use crate::roster::EnemySpec;
use crate::session::Session;
use crate::Dice;

const DEFAULT_MAX_ROUNDS: u32 = 50;

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

/// When the simulated hero accepts a Luck follow-up offer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LuckPolicy {
    /// Never spend Luck on follow-ups.
    Never,
    /// Take every follow-up offered.
    #[default]
    Always,
    /// Take follow-ups only while Luck is at or above the threshold.
    Threshold(i32),
}

impl LuckPolicy {
    fn accepts(self, luck: i32) -> bool {
        match self {
            LuckPolicy::Never => false,
            LuckPolicy::Always => true,
            LuckPolicy::Threshold(n) => luck >= n,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FightConfig {
    /// Path to a foe sheet (YAML or JSON, picked by extension).
    #[serde(default)]
    pub foe_path: Option<String>,
    /// Builtin foe id; used when no path is given. Defaults to "orc".
    #[serde(default)]
    pub foe_id: Option<String>,
    #[serde(default)]
    pub seed: u64,
    #[serde(default)]
    pub luck_policy: LuckPolicy,
    /// Hero stats; a steady mid-table hero is used when omitted.
    #[serde(default)]
    pub hero: Option<StatsBlock>,
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FightResult {
    pub winner: String,
    pub rounds: u32,
    pub hero_stamina_end: i32,
    pub hero_luck_end: i32,
    pub foe_stamina_end: i32,
    pub log: Vec<String>,
}

/// A foe as described by a content sheet.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct FoeSheet {
    pub name: String,
    pub skill: i32,
    pub stamina: i32,
    #[serde(default)]
    pub modifiers: EnemyModifiers,
}

/// A steady mid-table hero for harness runs.
pub fn sample_hero() -> StatsBlock {
    StatsBlock { skill: 9, stamina: 18, luck: 10, magic: 10 }
}

/// Run one full fight to completion with automatic Luck follow-ups per the
/// configured policy. Deterministic for a given config; the log lines match
/// the rolled dice.
pub fn simulate_fight(cfg: FightConfig) -> Result<FightResult> {
    let seed = cfg.seed;
    simulate_seeded(&cfg, seed)
}

fn simulate_seeded(cfg: &FightConfig, seed: u64) -> Result<FightResult> {
    let foe = resolve_foe(cfg)?;
    if foe.skill <= 0 || foe.stamina <= 0 {
        bail!("foe '{}' has no skill or stamina to fight with", foe.name);
    }

    let mut session = Session::default();
    session.player = Player::from_stats(cfg.hero.unwrap_or_else(sample_hero));
    session.initial = session.player.initial_stats();
    let foe_id = session.roster.add(
        EnemySpec {
            name: Some(foe.name.clone()),
            skill: foe.skill,
            stamina: foe.stamina,
            modifiers: foe.modifiers,
            ..Default::default()
        },
        false,
    );

    let mut dice = Dice::from_seed(seed);
    let mut logs: Vec<String> = Vec::new();
    logs.push(format!(
        "[START] Hero (skill {}, stamina {}, luck {}) vs {} (skill {}, stamina {})",
        session.player.skill,
        session.player.stamina,
        session.player.luck,
        foe.name,
        foe.skill,
        foe.stamina
    ));

    let mut rounds = 0u32;
    while rounds < cfg.max_rounds
        && !session.player.is_defeated()
        && session.roster.by_id(foe_id).is_some()
    {
        rounds += 1;
        let Some(slot) = session.roster.position_of(foe_id) else { break };
        let outcome = attack_enemy(
            &mut session,
            slot,
            || dice.roll(2),
            |tone, line| logs.push(format!("[{}] {line}", tone.label())),
        )?;

        let offer = match outcome {
            AttackOutcome::PlayerHit { luck_offer, .. } => luck_offer,
            AttackOutcome::EnemyHit { luck_offer, .. } => luck_offer,
            AttackOutcome::Standoff { .. } => None,
        };
        if let Some(context) = offer {
            if cfg.luck_policy.accepts(session.player.luck) {
                test_luck(
                    &mut session.player,
                    &mut session.roster,
                    context,
                    || dice.roll(2),
                    |tone, line| logs.push(format!("[{}] {line}", tone.label())),
                );
            }
        }
    }

    let foe_standing = session.roster.by_id(foe_id).is_some();
    let winner = if session.player.is_defeated() {
        "foe"
    } else if !foe_standing {
        "hero"
    } else {
        "draw"
    };
    logs.push(format!(
        "[END] winner={} hero_stamina={} hero_luck={} rounds={}",
        winner, session.player.stamina, session.player.luck, rounds
    ));

    Ok(FightResult {
        winner: winner.to_string(),
        rounds,
        hero_stamina_end: session.player.stamina,
        hero_luck_end: session.player.luck,
        foe_stamina_end: session.roster.by_id(foe_id).map_or(0, |e| e.stamina),
        log: logs,
    })
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FightStats {
    pub trials: u32,
    pub hero_wins: u32,
    pub foe_wins: u32,
    pub draws: u32,
    pub avg_rounds: f64,
    pub avg_hero_stamina_left: f64,
}

/// Monte Carlo summary over many fights; trial `i` runs with `seed + i`.
pub fn simulate_fight_many(cfg: FightConfig, trials: u32) -> Result<FightStats> {
    if trials == 0 {
        bail!("trials must be positive");
    }
    let mut stats = FightStats {
        trials,
        hero_wins: 0,
        foe_wins: 0,
        draws: 0,
        avg_rounds: 0.0,
        avg_hero_stamina_left: 0.0,
    };
    let mut total_rounds = 0u64;
    let mut total_stamina = 0i64;
    for i in 0..trials {
        let result = simulate_seeded(&cfg, cfg.seed.wrapping_add(i as u64))?;
        match result.winner.as_str() {
            "hero" => stats.hero_wins += 1,
            "foe" => stats.foe_wins += 1,
            _ => stats.draws += 1,
        }
        total_rounds += result.rounds as u64;
        total_stamina += result.hero_stamina_end as i64;
    }
    stats.avg_rounds = total_rounds as f64 / trials as f64;
    stats.avg_hero_stamina_left = total_stamina as f64 / trials as f64;
    Ok(stats)
}

fn resolve_foe(cfg: &FightConfig) -> Result<FoeSheet> {
    if let Some(path) = &cfg.foe_path {
        return load_foe(Path::new(path));
    }
    let id = cfg.foe_id.as_deref().unwrap_or("orc");
    let text = builtin_foes()
        .get(id)
        .copied()
        .ok_or_else(|| anyhow::anyhow!("unknown builtin foe '{}'", id))?;
    serde_yaml::from_str(text).with_context(|| format!("failed to parse builtin foe '{}'", id))
}

/// Load a foe sheet from disk; YAML or JSON by extension.
pub fn load_foe(path: &Path) -> Result<FoeSheet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read foe sheet: {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        serde_yaml::from_str(&text)
            .with_context(|| format!("failed to parse foe YAML: {}", path.display()))
    } else {
        serde_json::from_str(&text)
            .with_context(|| format!("failed to parse foe JSON: {}", path.display()))
    }
}
