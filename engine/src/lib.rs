use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub mod api;
pub mod combat;
pub mod content;
pub mod luck;
pub mod modifiers;
pub mod player;
pub mod roster;
pub mod session;

pub use combat::{attack_enemy, command_attack, escape, AttackOutcome, CombatError};
pub use luck::{test_luck, LuckContext, LuckOutcome};
pub use modifiers::{damage_profile, DamageProfile, EnemyModifiers, BASE_DAMAGE};
pub use player::{Player, PlayerModifiers, Potion, StatsBlock};
pub use roster::{Enemy, EnemyId, EnemySpec, Roster};
pub use session::Session;

pub struct Dice { rng: ChaCha8Rng }

impl Dice {
    pub fn from_seed(seed: u64) -> Self {
        Self { rng: ChaCha8Rng::seed_from_u64(seed) }
    }

    pub fn from_entropy() -> Self {
        Self { rng: ChaCha8Rng::from_entropy() }
    }

    pub fn d6(&mut self) -> i32 {
        self.rng.gen_range(1..=6)
    }

    /// Sum of `count` six-sided dice. `count = 2` for Luck tests and
    /// opposed combat rolls, `count = 1` for stat rolls.
    pub fn roll(&mut self, count: u32) -> i32 {
        (0..count).map(|_| self.d6()).sum()
    }

    /// Roll `count` dice with `sides` faces, keeping the individual draws
    /// so the caller can display the breakdown.
    pub fn roll_custom(&mut self, count: u32, sides: u32) -> RollBreakdown {
        let sides = sides.max(1) as i32;
        let rolls: Vec<i32> = (0..count).map(|_| self.rng.gen_range(1..=sides)).collect();
        RollBreakdown { total: rolls.iter().sum(), rolls }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RollBreakdown {
    pub total: i32,
    pub rolls: Vec<i32>,
}

/// Saturating clamp. Unlike `i32::clamp` this never panics on inverted
/// bounds; the lower bound wins.
pub fn clamp(value: i32, min: i32, max: i32) -> i32 {
    value.min(max).max(min)
}

/// Severity channel for log lines handed to the host UI.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Tone {
    Info,
    Action,
    Success,
    Warning,
    Danger,
}

impl Tone {
    pub fn label(self) -> &'static str {
        match self {
            Tone::Info => "info",
            Tone::Action => "action",
            Tone::Success => "success",
            Tone::Warning => "warning",
            Tone::Danger => "danger",
        }
    }
}

/// Install a plain fmt subscriber for `tracing` diagnostics. Safe to call
/// more than once; later calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
