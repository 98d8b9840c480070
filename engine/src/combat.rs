use std::cmp::Ordering;

use thiserror::Error;

use crate::luck::LuckContext;
use crate::modifiers::{damage_profile, BASE_DAMAGE};
use crate::roster::EnemyId;
use crate::session::Session;
use crate::Tone;

/// Stamina forfeited by fleeing an exchange.
pub const ESCAPE_COST: i32 = 2;

/// Validation failures. The action is aborted with no state mutation;
/// soft conditions (stale references, empty Luck pool) are outcome
/// variants instead, see [`crate::luck`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CombatError {
    #[error("no enemy at slot {0}")]
    MissingEnemy(usize),
    #[error("no enemy with id {0}")]
    UnknownEnemy(EnemyId),
    #[error("{0} has no skill or stamina left to fight")]
    NotFightable(String),
    #[error("{0} is not a copied ally")]
    NotAnAlly(String),
    #[error("{0} is an ally and cannot be targeted")]
    AllyTarget(String),
}

/// Result of one attack round. Roll totals are carried so the host can
/// display the exchange exactly as it was rolled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Equal totals; no damage either way.
    Standoff { player_roll: i32, enemy_roll: i32 },
    /// The player won the exchange. `luck_offer` is present while the
    /// enemy still stands and the player has Luck to spend; the host may
    /// prompt and then call [`crate::test_luck`] with it.
    PlayerHit {
        enemy: EnemyId,
        player_roll: i32,
        enemy_roll: i32,
        damage: i32,
        enemy_defeated: bool,
        luck_offer: Option<LuckContext>,
    },
    /// The enemy won the exchange. `player_defeated` is the terminal
    /// game-over signal, distinct from an enemy defeat.
    EnemyHit {
        enemy: EnemyId,
        player_roll: i32,
        enemy_roll: i32,
        damage: i32,
        player_defeated: bool,
        luck_offer: Option<LuckContext>,
    },
}

/// Resolve one attack round against the enemy at roster `slot`.
///
/// Rolls are strictly ordered, enemy first and then player, so seeded
/// replays and log lines always line up with the dice. Damage from the
/// primary roll is applied before any Luck follow-up is offered; declining
/// the offer needs no rollback.
pub fn attack_enemy(
    session: &mut Session,
    slot: usize,
    mut roll_pair: impl FnMut() -> i32,
    mut log: impl FnMut(Tone, String),
) -> Result<AttackOutcome, CombatError> {
    let enemy = session.roster.get(slot).ok_or(CombatError::MissingEnemy(slot))?;
    if !enemy.can_fight() {
        return Err(CombatError::NotFightable(enemy.name.clone()));
    }
    let id = enemy.id;
    let name = enemy.name.clone();
    let profile = damage_profile(&enemy.modifiers, &session.modifiers);

    let enemy_roll = roll_pair() + enemy.skill;
    let attack_skill = (session.player.skill + session.modifiers.skill_bonus).max(0);
    let player_roll = roll_pair() + attack_skill;
    log(
        Tone::Action,
        format!("[ATTACK][{name}] attack strength {enemy_roll} against your {player_roll}."),
    );
    tracing::debug!(enemy = %name, enemy_roll, player_roll, "attack exchange");

    let outcome = match player_roll.cmp(&enemy_roll) {
        Ordering::Equal => {
            log(
                Tone::Info,
                format!("[ATTACK][{name}] you parry each other; no blood is drawn."),
            );
            AttackOutcome::Standoff { player_roll, enemy_roll }
        }
        Ordering::Greater => {
            let damage = profile.to_enemy;
            let enemy_defeated = {
                let enemy = session
                    .roster
                    .by_id_mut(id)
                    .ok_or(CombatError::UnknownEnemy(id))?;
                enemy.take_damage(damage);
                enemy.stamina == 0
            };
            log(Tone::Success, format!("[ATTACK][{name}] you strike for {damage}."));
            if enemy_defeated {
                session.roster.remove_by_id(id);
                log(Tone::Success, format!("[ATTACK][{name}] is defeated!"));
            }
            let luck_offer = (!enemy_defeated && session.player.luck > 0)
                .then_some(LuckContext::PlayerHitEnemy(id));
            AttackOutcome::PlayerHit {
                enemy: id,
                player_roll,
                enemy_roll,
                damage,
                enemy_defeated,
                luck_offer,
            }
        }
        Ordering::Less => {
            let damage = profile.to_player;
            session.player.adjust_stamina(-damage);
            let player_defeated = session.player.is_defeated();
            log(Tone::Danger, format!("[ATTACK][{name}] wounds you for {damage}."));
            if player_defeated {
                log(
                    Tone::Danger,
                    "[ATTACK] Your stamina is spent. The adventure ends here.".to_string(),
                );
            }
            let luck_offer = (!player_defeated && session.player.luck > 0)
                .then_some(LuckContext::PlayerHitByEnemy);
            AttackOutcome::EnemyHit {
                enemy: id,
                player_roll,
                enemy_roll,
                damage,
                player_defeated,
                luck_offer,
            }
        }
    };
    Ok(outcome)
}

/// Result of an ally-directed exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    Standoff { ally_roll: i32, target_roll: i32 },
    TargetHit { target: EnemyId, ally_roll: i32, target_roll: i32, target_defeated: bool },
    AllyHit { ally: EnemyId, ally_roll: i32, target_roll: i32, ally_defeated: bool },
}

/// Order a copied ally to fight another enemy. Same opposed roll as a
/// player exchange, but both sides always trade the flat base damage; no
/// modifier layer applies to an ally exchange. The loser is removed by
/// identity when its stamina runs out.
pub fn command_attack(
    session: &mut Session,
    ally_id: EnemyId,
    target_id: EnemyId,
    mut roll_pair: impl FnMut() -> i32,
    mut log: impl FnMut(Tone, String),
) -> Result<CommandOutcome, CombatError> {
    let ally = session
        .roster
        .by_id(ally_id)
        .ok_or(CombatError::UnknownEnemy(ally_id))?;
    if !ally.is_copy {
        return Err(CombatError::NotAnAlly(ally.name.clone()));
    }
    if !ally.can_fight() {
        return Err(CombatError::NotFightable(ally.name.clone()));
    }
    let target = session
        .roster
        .by_id(target_id)
        .ok_or(CombatError::UnknownEnemy(target_id))?;
    if target.is_copy {
        return Err(CombatError::AllyTarget(target.name.clone()));
    }
    if !target.can_fight() {
        return Err(CombatError::NotFightable(target.name.clone()));
    }
    let (ally_name, ally_skill) = (ally.name.clone(), ally.skill);
    let (target_name, target_skill) = (target.name.clone(), target.skill);

    let ally_roll = roll_pair() + ally_skill;
    let target_roll = roll_pair() + target_skill;
    log(
        Tone::Action,
        format!("[COMMAND][{ally_name}] {ally_roll} against [{target_name}] {target_roll}."),
    );
    tracing::debug!(ally = %ally_name, target = %target_name, ally_roll, target_roll, "command attack");

    let outcome = match ally_roll.cmp(&target_roll) {
        Ordering::Equal => {
            log(Tone::Info, "[COMMAND] The blows glance off each other.".to_string());
            CommandOutcome::Standoff { ally_roll, target_roll }
        }
        Ordering::Greater => {
            let target_defeated = {
                let target = session
                    .roster
                    .by_id_mut(target_id)
                    .ok_or(CombatError::UnknownEnemy(target_id))?;
                target.take_damage(BASE_DAMAGE);
                target.stamina == 0
            };
            log(
                Tone::Success,
                format!("[COMMAND][{ally_name}] strikes [{target_name}] for {BASE_DAMAGE}."),
            );
            if target_defeated {
                session.roster.remove_by_id(target_id);
                log(Tone::Success, format!("[COMMAND][{target_name}] is defeated!"));
            }
            CommandOutcome::TargetHit { target: target_id, ally_roll, target_roll, target_defeated }
        }
        Ordering::Less => {
            let ally_defeated = {
                let ally = session
                    .roster
                    .by_id_mut(ally_id)
                    .ok_or(CombatError::UnknownEnemy(ally_id))?;
                ally.take_damage(BASE_DAMAGE);
                ally.stamina == 0
            };
            log(
                Tone::Warning,
                format!("[COMMAND][{target_name}] strikes [{ally_name}] for {BASE_DAMAGE}."),
            );
            if ally_defeated {
                session.roster.remove_by_id(ally_id);
                log(Tone::Warning, format!("[COMMAND][{ally_name}] is destroyed."));
            }
            CommandOutcome::AllyHit { ally: ally_id, ally_roll, target_roll, ally_defeated }
        }
    };
    Ok(outcome)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeOutcome {
    pub cost: i32,
    pub player_defeated: bool,
}

/// Flee the fight. Always costs stamina, and can itself end the adventure;
/// reaching zero signals the same terminal defeat as a combat loss.
pub fn escape(session: &mut Session, mut log: impl FnMut(Tone, String)) -> EscapeOutcome {
    session.player.adjust_stamina(-ESCAPE_COST);
    let player_defeated = session.player.is_defeated();
    log(
        Tone::Warning,
        format!("[ESCAPE] You flee the fight, losing {ESCAPE_COST} stamina."),
    );
    if player_defeated {
        log(
            Tone::Danger,
            "[ESCAPE] The effort is too much. The adventure ends here.".to_string(),
        );
    }
    EscapeOutcome { cost: ESCAPE_COST, player_defeated }
}
