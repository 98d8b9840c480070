use serde::{Deserialize, Deserializer, Serialize};

use crate::clamp;
use crate::modifiers::{de_lenient_int, MOD_MAX, MOD_MIN};
use crate::Dice;

/// Stamina one meal restores.
pub const MEAL_STAMINA: i32 = 4;
/// Meals in a fresh pack at new-game time.
pub const STARTING_MEALS: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Potion {
    Skill,
    Strength,
    Fortune,
}

impl Potion {
    /// Accepts both the short names and the full labels older saves used.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "skill" | "potion of skill" => Some(Potion::Skill),
            "strength" | "potion of strength" => Some(Potion::Strength),
            "fortune" | "luck" | "potion of fortune" => Some(Potion::Fortune),
            _ => None,
        }
    }
}

fn de_potion<'de, D>(deserializer: D) -> Result<Option<Potion>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(Potion::from_name))
}

/// A new-game stat roll, also the `initialStats` record in saves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatsBlock {
    #[serde(deserialize_with = "de_lenient_int")]
    pub skill: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub stamina: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub luck: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub magic: i32,
}

/// The adventurer. One per session; replaced wholesale at new game.
/// Every mutation keeps `0 <= current <= max` for each stat.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Player {
    #[serde(deserialize_with = "de_lenient_int")]
    pub skill: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub stamina: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub luck: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub magic: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub max_skill: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub max_stamina: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub max_luck: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub max_magic: i32,
    #[serde(deserialize_with = "de_lenient_int")]
    pub meals: i32,
    #[serde(deserialize_with = "de_potion")]
    pub potion: Option<Potion>,
    pub potion_used: bool,
}

impl Player {
    /// Roll a fresh adventurer: skill 1d6+6, stamina 2d6+12, luck 1d6+6,
    /// magic 2d6+6.
    pub fn roll_new(dice: &mut Dice) -> Self {
        Self::from_stats(StatsBlock {
            skill: dice.roll(1) + 6,
            stamina: dice.roll(2) + 12,
            luck: dice.roll(1) + 6,
            magic: dice.roll(2) + 6,
        })
    }

    pub fn from_stats(stats: StatsBlock) -> Self {
        Self {
            skill: stats.skill,
            stamina: stats.stamina,
            luck: stats.luck,
            magic: stats.magic,
            max_skill: stats.skill,
            max_stamina: stats.stamina,
            max_luck: stats.luck,
            max_magic: stats.magic,
            meals: STARTING_MEALS,
            potion: None,
            potion_used: false,
        }
    }

    pub fn initial_stats(&self) -> StatsBlock {
        StatsBlock {
            skill: self.max_skill,
            stamina: self.max_stamina,
            luck: self.max_luck,
            magic: self.max_magic,
        }
    }

    /// Re-establish the stat invariant after outside mutation (loads,
    /// hand-edited saves).
    pub fn clamp_stats(&mut self) {
        self.max_skill = self.max_skill.max(0);
        self.max_stamina = self.max_stamina.max(0);
        self.max_luck = self.max_luck.max(0);
        self.max_magic = self.max_magic.max(0);
        self.skill = clamp(self.skill, 0, self.max_skill);
        self.stamina = clamp(self.stamina, 0, self.max_stamina);
        self.luck = clamp(self.luck, 0, self.max_luck);
        self.magic = clamp(self.magic, 0, self.max_magic);
        self.meals = self.meals.max(0);
    }

    pub fn adjust_stamina(&mut self, delta: i32) {
        self.stamina = clamp(self.stamina + delta, 0, self.max_stamina);
    }

    pub fn adjust_luck(&mut self, delta: i32) {
        self.luck = clamp(self.luck + delta, 0, self.max_luck);
    }

    /// Luck is a strictly depleting resource: one point per test, floored
    /// at zero, regardless of outcome.
    pub fn spend_luck(&mut self) {
        self.luck = (self.luck - 1).max(0);
    }

    pub fn is_defeated(&self) -> bool {
        self.stamina <= 0
    }

    /// Eat one meal. Returns false, changing nothing, when the pack is empty.
    pub fn eat_meal(&mut self) -> bool {
        if self.meals <= 0 {
            return false;
        }
        self.meals -= 1;
        self.adjust_stamina(MEAL_STAMINA);
        true
    }

    /// Drink the carried potion. Single use: Skill and Strength restore the
    /// matching stat to its maximum; Fortune raises the Luck ceiling by one
    /// and refills Luck. Returns what was drunk, or None if there was
    /// nothing left to drink.
    pub fn drink_potion(&mut self) -> Option<Potion> {
        if self.potion_used {
            return None;
        }
        let potion = self.potion?;
        match potion {
            Potion::Skill => self.skill = self.max_skill,
            Potion::Strength => self.stamina = self.max_stamina,
            Potion::Fortune => {
                self.max_luck += 1;
                self.luck = self.max_luck;
            }
        }
        self.potion_used = true;
        Some(potion)
    }
}

/// Combat-wide adjustments owned by the player: reset at new game,
/// free-form within [-99, 99].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerModifiers {
    /// Bonus or penalty to all outgoing damage.
    #[serde(deserialize_with = "de_lenient_int")]
    pub damage_done: i32,
    /// Bonus or penalty to all incoming damage.
    #[serde(deserialize_with = "de_lenient_int")]
    pub damage_received: i32,
    /// Additive bonus to the player's attack rolls.
    #[serde(deserialize_with = "de_lenient_int")]
    pub skill_bonus: i32,
}

impl PlayerModifiers {
    pub fn clamp_all(&mut self) {
        self.damage_done = clamp(self.damage_done, MOD_MIN, MOD_MAX);
        self.damage_received = clamp(self.damage_received, MOD_MIN, MOD_MAX);
        self.skill_bonus = clamp(self.skill_bonus, MOD_MIN, MOD_MAX);
    }
}
