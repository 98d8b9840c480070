use serde::{Deserialize, Serialize};

use crate::clamp;
use crate::modifiers::{
    de_lenient_int, normalize_enemy_modifiers, EnemyModifiers, RawEnemyModifiers,
};

pub type EnemyId = u32;

/// Enemy skill and stamina live in [0, ENEMY_STAT_MAX].
pub const ENEMY_STAT_MAX: i32 = 999;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enemy {
    pub id: EnemyId,
    pub name: String,
    pub skill: i32,
    pub stamina: i32,
    pub modifiers: EnemyModifiers,
    /// True for allies created via the Creature Copy spell.
    #[serde(default)]
    pub is_copy: bool,
    /// Weak back-reference to the copy's source; lookup only, no ownership.
    #[serde(default)]
    pub copied_from_id: Option<EnemyId>,
}

impl Enemy {
    pub fn can_fight(&self) -> bool {
        self.skill > 0 && self.stamina > 0
    }

    pub fn take_damage(&mut self, damage: i32) {
        self.stamina = (self.stamina - damage).max(0);
    }

    /// Regain stamina. There is no cap against the starting roll, only the
    /// hard stat ceiling; an unlucky follow-up can leave an enemy tougher
    /// than it was rolled.
    pub fn rally(&mut self, amount: i32) {
        self.stamina = clamp(self.stamina + amount, 0, ENEMY_STAT_MAX);
    }
}

/// What a caller supplies when adding an enemy; everything has a default.
/// An explicit `id` is only honored when restoring saves.
#[derive(Debug, Clone, Default)]
pub struct EnemySpec {
    pub id: Option<EnemyId>,
    pub name: Option<String>,
    pub skill: i32,
    pub stamina: i32,
    pub modifiers: EnemyModifiers,
    pub is_copy: bool,
    pub copied_from_id: Option<EnemyId>,
}

/// One roster entry as found in a save document. Ids may be missing in old
/// files; modifiers may arrive in either wire representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SavedEnemy {
    pub id: Option<EnemyId>,
    pub name: Option<String>,
    #[serde(deserialize_with = "de_lenient_int")]
    pub skill: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub stamina: i32,
    pub modifiers: RawEnemyModifiers,
    pub is_copy: bool,
    pub copied_from_id: Option<EnemyId>,
}

impl SavedEnemy {
    pub fn from_enemy(enemy: &Enemy) -> Self {
        Self {
            id: Some(enemy.id),
            name: Some(enemy.name.clone()),
            skill: enemy.skill,
            stamina: enemy.stamina,
            modifiers: enemy.modifiers.to_raw(),
            is_copy: enemy.is_copy,
            copied_from_id: enemy.copied_from_id,
        }
    }
}

/// The ordered collection of enemies. Insertion order drives numbered
/// display and hotkey addressing; ids are monotonically assigned and never
/// reissued within a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roster {
    enemies: Vec<Enemy>,
    next_id: EnemyId,
}

impl Default for Roster {
    fn default() -> Self {
        Self { enemies: Vec::new(), next_id: 1 }
    }
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    fn claim_id(&mut self, wanted: Option<EnemyId>) -> EnemyId {
        match wanted {
            Some(id) => {
                self.next_id = self.next_id.max(id + 1);
                id
            }
            None => {
                let id = self.next_id;
                self.next_id += 1;
                id
            }
        }
    }

    /// Add an enemy. `at_top` puts it in the first slot (newly summoned
    /// allies appear first); otherwise it is appended.
    pub fn add(&mut self, spec: EnemySpec, at_top: bool) -> EnemyId {
        // A saved id that is already taken is treated as missing.
        let wanted = spec.id.filter(|id| self.by_id(*id).is_none());
        let id = self.claim_id(wanted);
        let enemy = Enemy {
            id,
            name: spec.name.unwrap_or_else(|| format!("Enemy {id}")),
            skill: clamp(spec.skill, 0, ENEMY_STAT_MAX),
            stamina: clamp(spec.stamina, 0, ENEMY_STAT_MAX),
            modifiers: spec.modifiers.clamped(),
            is_copy: spec.is_copy,
            copied_from_id: spec.copied_from_id,
        };
        if at_top {
            self.enemies.insert(0, enemy);
        } else {
            self.enemies.push(enemy);
        }
        id
    }

    /// Spawn an ally mirroring the source's current skill and stamina.
    /// Copies get a fresh id, zeroed modifiers (they fight at base
    /// capability) and a back-reference to the source.
    pub fn copy_from(&mut self, source_id: EnemyId) -> Option<EnemyId> {
        let source = self.by_id(source_id)?;
        let spec = EnemySpec {
            name: Some(format!("{} (copy)", source.name)),
            skill: source.skill,
            stamina: source.stamina,
            is_copy: true,
            copied_from_id: Some(source.id),
            ..Default::default()
        };
        Some(self.add(spec, true))
    }

    pub fn get(&self, index: usize) -> Option<&Enemy> {
        self.enemies.get(index)
    }

    pub fn by_id(&self, id: EnemyId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn by_id_mut(&mut self, id: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|e| e.id == id)
    }

    pub fn position_of(&self, id: EnemyId) -> Option<usize> {
        self.enemies.iter().position(|e| e.id == id)
    }

    pub fn remove_at(&mut self, index: usize) -> Option<Enemy> {
        if index < self.enemies.len() {
            Some(self.enemies.remove(index))
        } else {
            None
        }
    }

    pub fn remove_by_id(&mut self, id: EnemyId) -> Option<Enemy> {
        let index = self.position_of(id)?;
        Some(self.enemies.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }

    /// Remove every enemy. The id counter keeps running; ids are never
    /// reused within a session.
    pub fn clear(&mut self) {
        self.enemies.clear();
    }

    /// Rebuild the roster from saved records. Saved ids are preserved,
    /// records without one get a fresh id, modifiers are normalized, and
    /// the counter resumes past the highest id seen.
    pub fn apply_state(&mut self, saved: Vec<SavedEnemy>) {
        self.enemies.clear();
        for record in saved {
            let spec = EnemySpec {
                id: record.id,
                name: record.name,
                skill: record.skill,
                stamina: record.stamina,
                modifiers: normalize_enemy_modifiers(&record.modifiers),
                is_copy: record.is_copy,
                copied_from_id: record.copied_from_id,
            };
            self.add(spec, false);
        }
    }
}
