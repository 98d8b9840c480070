use crate::player::Player;
use crate::roster::{EnemyId, Roster};
use crate::Tone;

/// Extra stamina an enemy loses when a follow-up Luck test succeeds.
const LUCKY_ENEMY_PENALTY: i32 = 2;
/// Stamina an enemy claws back when the follow-up test fails.
const UNLUCKY_ENEMY_RALLY: i32 = 1;

/// Where a Luck test comes from. Enemy-directed contexts carry the enemy's
/// id, never its roster position: the test may run after a confirmation
/// prompt, and the roster can have changed in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuckContext {
    General,
    PlayerHitEnemy(EnemyId),
    PlayerHitByEnemy,
}

/// What the test did to the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LuckApplied {
    /// No Luck left; nothing rolled, nothing changed.
    OutOfLuck,
    /// The referenced enemy is gone; nothing rolled, nothing changed.
    EnemyMissing,
    /// General test, no further consequence.
    General,
    EnemyDamaged { enemy: EnemyId, defeated: bool },
    EnemyRallied { enemy: EnemyId },
    PlayerHealed,
    PlayerHurt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LuckOutcome {
    pub roll: i32,
    pub lucky: bool,
    pub applied: LuckApplied,
}

impl LuckOutcome {
    fn skipped(applied: LuckApplied) -> Self {
        Self { roll: 0, lucky: false, applied }
    }
}

/// Run one Luck test: roll 2d6 against the current Luck value (success on
/// roll <= luck, judged before the point is spent), spend one point either
/// way, then apply the context consequence.
///
/// Both failure modes are soft outcomes for the caller to branch on, never
/// errors: a stale enemy reference or an empty Luck pool skips the test
/// without touching any state.
pub fn test_luck(
    player: &mut Player,
    roster: &mut Roster,
    context: LuckContext,
    mut roll_pair: impl FnMut() -> i32,
    mut log: impl FnMut(Tone, String),
) -> LuckOutcome {
    // Re-resolve the target by id before anything is spent; the caller may
    // have awaited a confirmation while the roster changed under it.
    if let LuckContext::PlayerHitEnemy(id) = context {
        if roster.by_id(id).is_none() {
            return LuckOutcome::skipped(LuckApplied::EnemyMissing);
        }
    }
    if player.luck <= 0 {
        log(Tone::Warning, "No Luck left to test.".to_string());
        return LuckOutcome::skipped(LuckApplied::OutOfLuck);
    }

    let roll = roll_pair();
    let lucky = roll <= player.luck;
    player.spend_luck();
    tracing::debug!(roll, luck_left = player.luck, lucky, "luck test");
    if lucky {
        log(Tone::Success, format!("[LUCK] Rolled {roll}: Lucky!"));
    } else {
        log(Tone::Danger, format!("[LUCK] Rolled {roll}: Unlucky."));
    }

    let applied = match context {
        LuckContext::General => LuckApplied::General,
        LuckContext::PlayerHitEnemy(id) => apply_to_enemy(roster, id, lucky, &mut log),
        LuckContext::PlayerHitByEnemy => {
            if lucky {
                player.adjust_stamina(1);
                log(
                    Tone::Success,
                    "[LUCK] You twist away from the worst of it and recover 1 stamina.".to_string(),
                );
                LuckApplied::PlayerHealed
            } else {
                player.adjust_stamina(-1);
                log(
                    Tone::Danger,
                    "[LUCK] The blow bites deeper; you lose 1 more stamina.".to_string(),
                );
                LuckApplied::PlayerHurt
            }
        }
    };

    LuckOutcome { roll, lucky, applied }
}

fn apply_to_enemy(
    roster: &mut Roster,
    id: EnemyId,
    lucky: bool,
    log: &mut impl FnMut(Tone, String),
) -> LuckApplied {
    if lucky {
        let (name, defeated) = match roster.by_id_mut(id) {
            // Presence was checked before the roll; resolve by id anyway.
            None => return LuckApplied::EnemyMissing,
            Some(enemy) => {
                enemy.take_damage(LUCKY_ENEMY_PENALTY);
                (enemy.name.clone(), enemy.stamina == 0)
            }
        };
        log(
            Tone::Success,
            format!("[LUCK][{name}] takes {LUCKY_ENEMY_PENALTY} extra damage."),
        );
        if defeated {
            roster.remove_by_id(id);
            log(Tone::Success, format!("[LUCK][{name}] is defeated!"));
        }
        LuckApplied::EnemyDamaged { enemy: id, defeated }
    } else {
        match roster.by_id_mut(id) {
            None => LuckApplied::EnemyMissing,
            Some(enemy) => {
                enemy.rally(UNLUCKY_ENEMY_RALLY);
                log(
                    Tone::Warning,
                    format!(
                        "[LUCK][{}] rallies and regains {UNLUCKY_ENEMY_RALLY} stamina.",
                        enemy.name
                    ),
                );
                LuckApplied::EnemyRallied { enemy: id }
            }
        }
    }
}
