use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::player::{Player, PlayerModifiers, StatsBlock};
use crate::roster::{Roster, SavedEnemy};
use crate::Dice;

/// Prepared-spell bookkeeping. Spell effects live with the host; the
/// engine only tracks which names are prepared and how many may be.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpellBook {
    prepared: IndexSet<String>,
    limit: usize,
}

impl SpellBook {
    pub fn with_limit(limit: usize) -> Self {
        Self { prepared: IndexSet::new(), limit }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn count(&self) -> usize {
        self.prepared.len()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.prepared.contains(name)
    }

    pub fn prepared(&self) -> impl Iterator<Item = &str> {
        self.prepared.iter().map(String::as_str)
    }

    /// False when the book is full or the spell is already prepared.
    pub fn prepare(&mut self, name: &str) -> bool {
        if self.prepared.len() >= self.limit || self.prepared.contains(name) {
            return false;
        }
        self.prepared.insert(name.to_string())
    }

    pub fn forget(&mut self, name: &str) -> bool {
        self.prepared.shift_remove(name)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpellsSnapshot {
    pub prepared: Vec<String>,
    pub limit: usize,
}

/// The whole mutable state of one play session. Everything the combat
/// engine touches hangs off this struct; there are no module-level
/// globals, so sessions can run side by side and tests stay isolated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    pub player: Player,
    pub initial: StatsBlock,
    pub modifiers: PlayerModifiers,
    pub roster: Roster,
    pub spells: SpellBook,
}

impl Session {
    /// Start a fresh game: roll a hero, snapshot the starting stats, reset
    /// every modifier and clear the field. The spell limit comes from the
    /// magic roll.
    pub fn new_game(dice: &mut Dice) -> Self {
        let player = Player::roll_new(dice);
        let initial = player.initial_stats();
        let spells = SpellBook::with_limit(player.magic.max(0) as usize);
        Self {
            player,
            initial,
            modifiers: PlayerModifiers::default(),
            roster: Roster::default(),
            spells,
        }
    }

    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            player: self.player.clone(),
            initial_stats: self.initial,
            player_modifiers: self.modifiers,
            enemies: self.roster.iter().map(SavedEnemy::from_enemy).collect(),
            spells: SpellsSnapshot {
                prepared: self.spells.prepared().map(str::to_string).collect(),
                limit: self.spells.limit(),
            },
        }
    }

    /// Restore a session from a save document, normalizing and clamping as
    /// it goes. Hand-edited and legacy files load without errors: missing
    /// maxima are repaired from the recorded starting stats, out-of-range
    /// values are clamped, enemy modifiers are migrated to delta form.
    pub fn from_snapshot(snapshot: Snapshot) -> Self {
        let mut player = snapshot.player;
        let initial = snapshot.initial_stats;
        if player.max_skill == 0 && initial.skill > 0 {
            player.max_skill = initial.skill;
        }
        if player.max_stamina == 0 && initial.stamina > 0 {
            player.max_stamina = initial.stamina;
        }
        if player.max_luck == 0 && initial.luck > 0 {
            player.max_luck = initial.luck;
        }
        if player.max_magic == 0 && initial.magic > 0 {
            player.max_magic = initial.magic;
        }
        player.clamp_stats();

        let mut modifiers = snapshot.player_modifiers;
        modifiers.clamp_all();

        let mut roster = Roster::default();
        roster.apply_state(snapshot.enemies);

        let mut spells = SpellBook::with_limit(snapshot.spells.limit);
        for name in snapshot.spells.prepared {
            spells.prepare(&name);
        }

        Self { player, initial, modifiers, roster, spells }
    }
}

/// The persisted document, camelCase like the browser host that writes it.
/// Only the keys the engine owns appear here; unrelated UI keys in a save
/// (notes, log, book, page number) are skipped on load and owned elsewhere.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub player: Player,
    pub initial_stats: StatsBlock,
    pub player_modifiers: PlayerModifiers,
    pub enemies: Vec<SavedEnemy>,
    pub spells: SpellsSnapshot,
}
