//! Combat rules with an Action/Effect pipeline.
//!
//! This module implements the per-turn mechanic pipeline:
//! 1. The caller or a hostile policy chooses a [`CombatAction`]
//! 2. [`ActionResolver`] resolves it, rolling dice through the [`DiceEngine`]
//! 3. [`Effect`]s describing the state changes are produced with log lines
//! 4. [`apply_effects`] writes the effects onto the [`Battlefield`]
//!
//! Resolution only reads the battlefield, so the dice engine is the sole
//! source of non-determinism.

use crate::catalog::{Item, Potency, Spell, SpellArea};
use crate::combatant::{AttackMode, Combatant, CombatantId, Side, Stat, StatusEffect};
use crate::config::EncounterConfig;
use crate::dice::{DiceEngine, DiceError, DiceRoll};
use crate::world::Battlefield;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use tracing::debug;

/// What a combatant does on its turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CombatAction {
    Attack {
        mode: AttackMode,
        target: CombatantId,
    },
    Defend,
    CastSpell { spell: Spell, target: CombatantId },
    UseItem { item: Item, target: CombatantId },
    Flee,
}

impl CombatAction {
    pub fn melee(target: CombatantId) -> Self {
        CombatAction::Attack {
            mode: AttackMode::Melee,
            target,
        }
    }

    pub fn ranged(target: CombatantId) -> Self {
        CombatAction::Attack {
            mode: AttackMode::Ranged,
            target,
        }
    }

    pub fn cast(spell: Spell, target: CombatantId) -> Self {
        CombatAction::CastSpell { spell, target }
    }

    pub fn use_item(item: Item, target: CombatantId) -> Self {
        CombatAction::UseItem { item, target }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombatAction::Attack { .. } => "attack",
            CombatAction::Defend => "defend",
            CombatAction::CastSpell { .. } => "cast spell",
            CombatAction::UseItem { .. } => "use item",
            CombatAction::Flee => "flee",
        }
    }

    pub fn target(&self) -> Option<CombatantId> {
        match self {
            CombatAction::Attack { target, .. }
            | CombatAction::CastSpell { target, .. }
            | CombatAction::UseItem { target, .. } => Some(*target),
            CombatAction::Defend | CombatAction::Flee => None,
        }
    }
}

/// Why a target was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetIssue {
    NotPresent,
    Incapacitated,
    NotAnOpponent,
    NotAnAlly,
}

impl fmt::Display for TargetIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TargetIssue::NotPresent => "not present in this encounter",
            TargetIssue::Incapacitated => "already incapacitated",
            TargetIssue::NotAnOpponent => "not an opponent",
            TargetIssue::NotAnAlly => "not an ally",
        };
        write!(f, "{text}")
    }
}

/// Errors from resolving an action.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("Unknown combatant {0}")]
    UnknownActor(CombatantId),

    #[error("{0} is incapacitated and cannot act")]
    ActorIncapacitated(String),

    #[error("Invalid target {target}: {issue}")]
    InvalidTarget {
        target: CombatantId,
        issue: TargetIssue,
    },

    #[error("{0} is hostile and cannot flee")]
    HostileCannotFlee(String),

    #[error(transparent)]
    Dice(#[from] DiceError),
}

/// Effects are the result of resolving an action.
/// They describe concrete state changes to apply to the battlefield.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Effect {
    /// A dice roll occurred
    DiceRolled { roll: DiceRoll, purpose: String },

    AttackHit {
        attacker: CombatantId,
        target: CombatantId,
        attack_roll: i32,
        target_ac: i32,
        critical: bool,
    },

    AttackMissed {
        attacker: CombatantId,
        target: CombatantId,
        attack_roll: i32,
        target_ac: i32,
        fumble: bool,
    },

    /// HP changed (negative amount is damage)
    HpChanged {
        target: CombatantId,
        amount: i32,
        new_current: i32,
        incapacitated: bool,
    },

    StatusApplied {
        target: CombatantId,
        effect: StatusEffect,
    },

    /// One unit of an item was spent; the owner's inventory reconciles later
    ItemConsumed { owner: CombatantId, item: String },

    FleeAttempted {
        actor: CombatantId,
        roll: i32,
        success: bool,
    },
}

/// The result of resolving an action.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub effects: Vec<Effect>,
    pub log: Vec<String>,
}

impl Resolution {
    pub fn new(line: impl Into<String>) -> Self {
        Self {
            effects: Vec::new(),
            log: vec![line.into()],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_line(mut self, line: impl Into<String>) -> Self {
        self.log.push(line.into());
        self
    }

    /// True if this resolution contains a successful flee.
    pub fn fled(&self) -> bool {
        self.effects
            .iter()
            .any(|e| matches!(e, Effect::FleeAttempted { success: true, .. }))
    }
}

/// Whether a payload helps or hurts its targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Disposition {
    Harmful,
    Beneficial,
}

/// Resolves combat actions into effects.
#[derive(Debug, Clone)]
pub struct ActionResolver {
    defend_bonus: i32,
    flee_die: u32,
    flee_target: u32,
}

impl ActionResolver {
    pub fn new(config: &EncounterConfig) -> Self {
        Self {
            defend_bonus: config.defend_bonus,
            flee_die: config.flee_die,
            flee_target: config.flee_target,
        }
    }

    /// Resolve an action and produce effects.
    pub fn resolve(
        &self,
        dice: &mut DiceEngine,
        world: &Battlefield,
        actor_id: CombatantId,
        action: &CombatAction,
    ) -> Result<Resolution, ActionError> {
        let actor = acting(world, actor_id)?;
        if actor.is_incapacitated() {
            return Err(ActionError::ActorIncapacitated(actor.name.clone()));
        }
        debug!(actor = %actor.name, action = action.name(), "resolving action");

        match action {
            CombatAction::Attack { mode, target } => {
                self.resolve_attack(dice, world, actor_id, *mode, *target)
            }
            CombatAction::Defend => Ok(self.resolve_defend(actor_id, actor)),
            CombatAction::CastSpell { spell, target } => {
                self.resolve_cast_spell(dice, world, actor_id, spell, *target)
            }
            CombatAction::UseItem { item, target } => {
                self.resolve_use_item(dice, world, actor_id, item, *target)
            }
            CombatAction::Flee => self.resolve_flee(dice, actor_id, actor),
        }
    }

    fn resolve_attack(
        &self,
        dice: &mut DiceEngine,
        world: &Battlefield,
        attacker_id: CombatantId,
        mode: AttackMode,
        target_id: CombatantId,
    ) -> Result<Resolution, ActionError> {
        let target = check_target(world, attacker_id, target_id, Disposition::Harmful)?;
        let attacker = acting(world, attacker_id)?;

        let profile = attacker.attack_profile(mode);
        let attack_roll = dice.roll_d20(profile.attack_bonus);
        let target_ac = target.effective_armor_class();

        let resolution = Resolution::default().with_effect(Effect::DiceRolled {
            roll: attack_roll.clone(),
            purpose: format!("{} attack", mode.name()),
        });

        // The total alone decides the hit. A natural 20 or 1 only changes
        // the damage and the wording.
        if !attack_roll.meets(target_ac) {
            let line = if attack_roll.fumble {
                format!(
                    "{} fumbles a {} attack against {} (natural 1)!",
                    attacker.name,
                    mode.name(),
                    target.name
                )
            } else {
                format!(
                    "{} misses {} with a {} attack (roll {} vs AC {}).",
                    attacker.name,
                    target.name,
                    mode.name(),
                    attack_roll.total,
                    target_ac
                )
            };
            let missed = Effect::AttackMissed {
                attacker: attacker_id,
                target: target_id,
                attack_roll: attack_roll.total,
                target_ac,
                fumble: attack_roll.fumble,
            };
            return Ok(resolution.with_line(line).with_effect(missed));
        }

        let critical = attack_roll.critical;
        let damage_roll = dice.roll_damage(&profile.damage, profile.damage_modifier, critical);
        let line = if critical {
            format!(
                "{} lands a critical {} hit on {} (natural 20) for {} damage!",
                attacker.name,
                mode.name(),
                target.name,
                damage_roll.total
            )
        } else {
            format!(
                "{} hits {} with a {} attack (roll {} vs AC {}) for {} damage.",
                attacker.name,
                target.name,
                mode.name(),
                attack_roll.total,
                target_ac,
                damage_roll.total
            )
        };

        let resolution = resolution
            .with_line(line)
            .with_effect(Effect::AttackHit {
                attacker: attacker_id,
                target: target_id,
                attack_roll: attack_roll.total,
                target_ac,
                critical,
            })
            .with_effect(Effect::DiceRolled {
                roll: damage_roll.clone(),
                purpose: "damage".to_string(),
            });

        Ok(damage_effect(resolution, target_id, target, damage_roll.total))
    }

    fn resolve_defend(&self, actor_id: CombatantId, actor: &Combatant) -> Resolution {
        let effect =
            StatusEffect::until_next_turn("Defending", Stat::ArmorClass, self.defend_bonus);
        let line = format!(
            "{} takes a defensive stance ({:+} AC until their next turn).",
            actor.name, self.defend_bonus
        );
        Resolution::new(line).with_effect(Effect::StatusApplied {
            target: actor_id,
            effect,
        })
    }

    fn resolve_cast_spell(
        &self,
        dice: &mut DiceEngine,
        world: &Battlefield,
        caster_id: CombatantId,
        spell: &Spell,
        target_id: CombatantId,
    ) -> Result<Resolution, ActionError> {
        let disposition = if spell.is_harmful() {
            Disposition::Harmful
        } else {
            Disposition::Beneficial
        };
        check_target(world, caster_id, target_id, disposition)?;
        let caster = acting(world, caster_id)?;

        let (targets, reach) = match spell.area {
            SpellArea::Single => (vec![target_id], world.name_of(target_id)),
            SpellArea::AllOpponents => (world.living(caster.side.opponent()), "all foes"),
            SpellArea::AllAllies => (world.living(caster.side), "all allies"),
        };
        let line = format!("{} casts {} on {reach}.", caster.name, spell.name);

        Ok(apply_payload(
            dice,
            world,
            Resolution::new(line),
            &spell.name,
            spell.potency.as_ref(),
            spell.status.as_ref(),
            &targets,
        ))
    }

    fn resolve_use_item(
        &self,
        dice: &mut DiceEngine,
        world: &Battlefield,
        user_id: CombatantId,
        item: &Item,
        target_id: CombatantId,
    ) -> Result<Resolution, ActionError> {
        let disposition = if item.is_harmful() {
            Disposition::Harmful
        } else {
            Disposition::Beneficial
        };
        check_target(world, user_id, target_id, disposition)?;
        let user = acting(world, user_id)?;

        let line = if user_id == target_id {
            format!("{} uses {}.", user.name, item.name)
        } else {
            let target_name = world.name_of(target_id);
            format!("{} uses {} on {target_name}.", user.name, item.name)
        };
        let resolution = Resolution::new(line).with_effect(Effect::ItemConsumed {
            owner: user_id,
            item: item.name.clone(),
        });

        Ok(apply_payload(
            dice,
            world,
            resolution,
            &item.name,
            item.potency.as_ref(),
            item.status.as_ref(),
            &[target_id],
        ))
    }

    fn resolve_flee(
        &self,
        dice: &mut DiceEngine,
        actor_id: CombatantId,
        actor: &Combatant,
    ) -> Result<Resolution, ActionError> {
        if actor.side == Side::Hostile {
            return Err(ActionError::HostileCannotFlee(actor.name.clone()));
        }

        let roll = dice.roll_single(self.flee_die, 0)?;
        let success = roll.total >= self.flee_target as i32;
        let line = if success {
            format!(
                "{} breaks away and the party flees (rolled {})!",
                actor.name, roll.total
            )
        } else {
            format!(
                "{} tries to flee but cannot get away (rolled {}, needed {}).",
                actor.name, roll.total, self.flee_target
            )
        };

        let resolution = Resolution::new(line)
            .with_effect(Effect::DiceRolled {
                roll: roll.clone(),
                purpose: "flee".to_string(),
            })
            .with_effect(Effect::FleeAttempted {
                actor: actor_id,
                roll: roll.total,
                success,
            });
        Ok(resolution)
    }
}

impl Default for ActionResolver {
    fn default() -> Self {
        Self::new(&EncounterConfig::default())
    }
}

fn acting(world: &Battlefield, id: CombatantId) -> Result<&Combatant, ActionError> {
    world.get(id).ok_or(ActionError::UnknownActor(id))
}

/// Validate a target for an action of the given disposition.
fn check_target(
    world: &Battlefield,
    actor_id: CombatantId,
    target_id: CombatantId,
    disposition: Disposition,
) -> Result<&Combatant, ActionError> {
    let invalid = |issue| ActionError::InvalidTarget {
        target: target_id,
        issue,
    };
    let actor = acting(world, actor_id)?;
    let target = world
        .get(target_id)
        .ok_or_else(|| invalid(TargetIssue::NotPresent))?;

    if target.is_incapacitated() {
        return Err(invalid(TargetIssue::Incapacitated));
    }
    let issue = match disposition {
        Disposition::Harmful if target.side == actor.side => TargetIssue::NotAnOpponent,
        Disposition::Beneficial if target.side != actor.side => TargetIssue::NotAnAlly,
        _ => return Ok(target),
    };
    Err(invalid(issue))
}

/// Append damage to `target_id` and the incapacitation line if it drops.
fn damage_effect(
    resolution: Resolution,
    target_id: CombatantId,
    target: &Combatant,
    amount: i32,
) -> Resolution {
    let new_current = (target.hit_points() - amount).max(0);
    let incapacitated = new_current == 0;
    let resolution = resolution.with_effect(Effect::HpChanged {
        target: target_id,
        amount: -amount,
        new_current,
        incapacitated,
    });
    if incapacitated {
        resolution.with_line(format!("{} falls!", target.name))
    } else {
        resolution
    }
}

/// Resolve the hit point and status parts of a spell or item against targets.
///
/// The potency is rolled once and applied to every target.
fn apply_payload(
    dice: &mut DiceEngine,
    world: &Battlefield,
    mut resolution: Resolution,
    source: &str,
    potency: Option<&Potency>,
    status: Option<&StatusEffect>,
    targets: &[CombatantId],
) -> Resolution {
    let roll = potency.map(|p| dice.roll_damage(p.formula(), 0, false));
    if let Some(ref roll) = roll {
        resolution = resolution.with_effect(Effect::DiceRolled {
            roll: roll.clone(),
            purpose: source.to_string(),
        });
    }

    for &target_id in targets {
        let Some(target) = world.get(target_id) else {
            continue;
        };
        let mut still_standing = true;

        match (potency, &roll) {
            (Some(Potency::Damage(_)), Some(roll)) => {
                resolution = resolution.with_line(format!(
                    "{} takes {} damage from {}.",
                    target.name, roll.total, source
                ));
                still_standing = target.hit_points() > roll.total;
                resolution = damage_effect(resolution, target_id, target, roll.total);
            }
            (Some(Potency::Healing(_)), Some(roll)) => {
                let missing = target.max_hit_points() - target.hit_points();
                let healed = roll.total.min(missing);
                let line = format!("{} recovers {} HP from {}.", target.name, healed, source);
                let changed = Effect::HpChanged {
                    target: target_id,
                    amount: healed,
                    new_current: target.hit_points() + healed,
                    incapacitated: false,
                };
                resolution = resolution.with_line(line).with_effect(changed);
            }
            _ => {}
        }

        if let (Some(effect), true) = (status, still_standing) {
            resolution = resolution
                .with_line(format!("{} is affected by {}.", target.name, effect))
                .with_effect(Effect::StatusApplied {
                    target: target_id,
                    effect: effect.clone(),
                });
        }
    }

    resolution
}

/// Apply effects to the battlefield.
pub fn apply_effects(world: &mut Battlefield, effects: &[Effect]) {
    for effect in effects {
        apply_effect(world, effect);
    }
}

/// Apply a single effect to the battlefield.
pub fn apply_effect(world: &mut Battlefield, effect: &Effect) {
    match effect {
        Effect::HpChanged { target, amount, .. } => {
            if let Some(combatant) = world.get_mut(*target) {
                if *amount < 0 {
                    combatant.apply_damage(amount.unsigned_abs());
                } else {
                    combatant.apply_healing(amount.unsigned_abs());
                }
            }
        }
        Effect::StatusApplied { target, effect } => {
            if let Some(combatant) = world.get_mut(*target) {
                combatant.add_status_effect(effect.clone());
            }
        }
        Effect::DiceRolled { .. }
        | Effect::AttackHit { .. }
        | Effect::AttackMissed { .. }
        | Effect::ItemConsumed { .. }
        | Effect::FleeAttempted { .. } => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{get_item, get_spell};
    use crate::testing::{sample_fighter, sample_goblin, ScriptedDice};

    const FIGHTER: CombatantId = CombatantId(0);
    const GOBLIN: CombatantId = CombatantId(1);

    fn duel() -> Battlefield {
        Battlefield::new(
            vec![sample_fighter("Fighter")],
            vec![sample_goblin("Goblin")],
        )
    }

    fn resolve(
        dice: ScriptedDice,
        world: &Battlefield,
        actor: CombatantId,
        action: CombatAction,
    ) -> Result<Resolution, ActionError> {
        ActionResolver::default().resolve(&mut DiceEngine::new(dice), world, actor, &action)
    }

    /// Every hit point change as `(target, amount)`.
    fn hp_changes(resolution: &Resolution) -> Vec<(CombatantId, i32)> {
        resolution
            .effects
            .iter()
            .filter_map(|e| match e {
                Effect::HpChanged { target, amount, .. } => Some((*target, *amount)),
                _ => None,
            })
            .collect()
    }

    fn attack_effect(resolution: &Resolution) -> Option<&Effect> {
        resolution
            .effects
            .iter()
            .find(|e| matches!(e, Effect::AttackHit { .. } | Effect::AttackMissed { .. }))
    }

    fn target_issue(world: &Battlefield, action: CombatAction) -> Option<TargetIssue> {
        match resolve(ScriptedDice::maximum(), world, FIGHTER, action) {
            Err(ActionError::InvalidTarget { issue, .. }) => Some(issue),
            _ => None,
        }
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    #[test]
    fn test_attack_hit_reduces_target() {
        let mut world = duel();
        let dice = ScriptedDice::always(5).with_sides(20, 15);
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();

        assert_eq!(
            attack_effect(&resolution),
            Some(&Effect::AttackHit {
                attacker: FIGHTER,
                target: GOBLIN,
                attack_roll: 20,
                target_ac: 11,
                critical: false,
            })
        );
        assert_eq!(hp_changes(&resolution), vec![(GOBLIN, -8)]);

        apply_effects(&mut world, &resolution.effects);
        assert!(world.get(GOBLIN).unwrap().is_incapacitated());
        assert!(resolution.log.iter().any(|l| l == "Goblin falls!"));
    }

    #[test]
    fn test_attack_miss() {
        let world = duel();
        let dice = ScriptedDice::sequence([2]);
        let resolution = resolve(dice, &world, GOBLIN, CombatAction::melee(FIGHTER)).unwrap();
        assert_eq!(
            attack_effect(&resolution),
            Some(&Effect::AttackMissed {
                attacker: GOBLIN,
                target: FIGHTER,
                attack_roll: 3,
                target_ac: 15,
                fumble: false,
            })
        );
        assert!(hp_changes(&resolution).is_empty());
    }

    #[test]
    fn test_natural_one_hits_when_total_meets_armor() {
        let mut world = duel();
        world.get_mut(FIGHTER).unwrap().attack_bonus = 30;
        let dice = ScriptedDice::sequence([1, 4]);
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();

        assert!(matches!(
            attack_effect(&resolution),
            Some(Effect::AttackHit { attack_roll: 31, critical: false, .. })
        ));
        assert_eq!(hp_changes(&resolution), vec![(GOBLIN, -7)]);
        assert!(!resolution.log[0].contains("fumbles"));
    }

    #[test]
    fn test_natural_one_that_misses_is_a_fumble() {
        let world = duel();
        let dice = ScriptedDice::sequence([1]);
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();

        assert!(matches!(
            attack_effect(&resolution),
            Some(Effect::AttackMissed { attack_roll: 6, fumble: true, .. })
        ));
        assert!(hp_changes(&resolution).is_empty());
        assert!(resolution.log[0].contains("fumbles"));
    }

    #[test]
    fn test_natural_twenty_misses_out_of_reach_armor() {
        let mut world = duel();
        world.get_mut(GOBLIN).unwrap().armor_class = 40;
        let dice = ScriptedDice::sequence([20]);
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();

        assert!(matches!(
            attack_effect(&resolution),
            Some(Effect::AttackMissed { attack_roll: 25, fumble: false, .. })
        ));
        assert!(hp_changes(&resolution).is_empty());
        assert!(resolution.log[0].contains("misses"));
    }

    #[test]
    fn test_critical_hit_doubles_damage() {
        let world = duel();
        let dice = ScriptedDice::sequence([20, 2]);
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();

        assert!(matches!(
            attack_effect(&resolution),
            Some(Effect::AttackHit { critical: true, .. })
        ));
        // 2 * (2 + 3) = 10
        assert_eq!(hp_changes(&resolution), vec![(GOBLIN, -10)]);
        assert!(resolution.log[0].contains("critical"));
    }

    #[test]
    fn test_melee_adds_strength_ranged_does_not() {
        let mut world = duel();
        world.get_mut(FIGHTER).unwrap().strength_modifier = 2;
        let dice = ScriptedDice::sequence([15, 1]);

        let melee = resolve(dice.clone(), &world, FIGHTER, CombatAction::melee(GOBLIN)).unwrap();
        assert_eq!(hp_changes(&melee), vec![(GOBLIN, -6)]);
        let ranged = resolve(dice, &world, FIGHTER, CombatAction::ranged(GOBLIN)).unwrap();
        assert_eq!(hp_changes(&ranged), vec![(GOBLIN, -4)]);
    }

    // ========================================================================
    // Validation
    // ========================================================================

    #[test]
    fn test_invalid_targets() {
        let mut world = duel();
        assert_eq!(
            target_issue(&world, CombatAction::melee(FIGHTER)),
            Some(TargetIssue::NotAnOpponent)
        );
        assert_eq!(
            target_issue(&world, CombatAction::melee(CombatantId(9))),
            Some(TargetIssue::NotPresent)
        );

        let potion = get_item("Potion of Healing").unwrap();
        assert_eq!(
            target_issue(&world, CombatAction::use_item(potion, GOBLIN)),
            Some(TargetIssue::NotAnAlly)
        );

        world.get_mut(GOBLIN).unwrap().apply_damage(99);
        assert_eq!(
            target_issue(&world, CombatAction::melee(GOBLIN)),
            Some(TargetIssue::Incapacitated)
        );
    }

    #[test]
    fn test_incapacitated_actor_cannot_act() {
        let mut world = duel();
        world.get_mut(FIGHTER).unwrap().apply_damage(99);
        let dice = ScriptedDice::maximum();
        let err = resolve(dice, &world, FIGHTER, CombatAction::Defend).unwrap_err();
        assert_eq!(err, ActionError::ActorIncapacitated("Fighter".to_string()));
    }

    // ========================================================================
    // Defend, spells and items
    // ========================================================================

    #[test]
    fn test_defend_grants_armor_until_next_turn() {
        let mut world = duel();
        let dice = ScriptedDice::maximum();
        let resolution = resolve(dice, &world, FIGHTER, CombatAction::Defend).unwrap();
        // No dice, just the stance
        assert_eq!(resolution.effects.len(), 1);

        apply_effects(&mut world, &resolution.effects);
        assert_eq!(world.get(FIGHTER).unwrap().effective_armor_class(), 17);
    }

    #[test]
    fn test_healing_potion_is_consumed_and_capped() {
        let mut world = duel();
        world.get_mut(FIGHTER).unwrap().apply_damage(3);
        let potion = get_item("Potion of Healing").unwrap();
        let action = CombatAction::use_item(potion, FIGHTER);
        let resolution = resolve(ScriptedDice::maximum(), &world, FIGHTER, action).unwrap();

        assert_eq!(
            resolution.effects[0],
            Effect::ItemConsumed {
                owner: FIGHTER,
                item: "Potion of Healing".to_string(),
            }
        );
        assert_eq!(hp_changes(&resolution), vec![(FIGHTER, 3)]);
        apply_effects(&mut world, &resolution.effects);
        assert_eq!(world.get(FIGHTER).unwrap().hit_points(), 20);
    }

    #[test]
    fn test_area_spell_hits_all_living_opponents() {
        let mut world = Battlefield::new(
            vec![sample_fighter("Wizard")],
            vec![sample_goblin("A"), sample_goblin("B"), sample_goblin("C")],
        );
        world.get_mut(CombatantId(3)).unwrap().apply_damage(99);
        let spell = get_spell("Burning Hands").unwrap();
        let action = CombatAction::cast(spell, CombatantId(1));
        let resolution = resolve(ScriptedDice::always(1), &world, CombatantId(0), action).unwrap();

        assert_eq!(
            hp_changes(&resolution),
            vec![(CombatantId(1), -3), (CombatantId(2), -3)]
        );
        assert!(resolution.log[0].ends_with("on all foes."));
        apply_effects(&mut world, &resolution.effects);
        assert_eq!(world.get(CombatantId(1)).unwrap().hit_points(), 2);
    }

    #[test]
    fn test_status_spell_applies_effect() {
        let mut world = Battlefield::new(
            vec![sample_fighter("Cleric"), sample_fighter("Fighter")],
            vec![sample_goblin("Goblin")],
        );
        let bless = get_spell("Bless").unwrap();
        let action = CombatAction::cast(bless, CombatantId(1));
        let resolution = resolve(ScriptedDice::maximum(), &world, CombatantId(0), action).unwrap();

        apply_effects(&mut world, &resolution.effects);
        for id in [CombatantId(0), CombatantId(1)] {
            assert_eq!(world.get(id).unwrap().effective_attack_bonus(), 7);
        }
    }

    #[test]
    fn test_status_not_applied_to_fallen_target() {
        let world = duel();
        let spray = get_spell("Poison Spray").unwrap();
        let action = CombatAction::cast(spray, GOBLIN);
        let resolution = resolve(ScriptedDice::maximum(), &world, FIGHTER, action).unwrap();

        assert!(resolution.log.iter().any(|l| l == "Goblin falls!"));
        assert!(!resolution.log.iter().any(|l| l.contains("is affected by")));
    }

    #[test]
    fn test_flee() {
        let world = duel();
        let flee = |dice| resolve(dice, &world, FIGHTER, CombatAction::Flee).unwrap();
        assert!(flee(ScriptedDice::sequence([10])).fled());
        assert!(!flee(ScriptedDice::sequence([9])).fled());

        let dice = ScriptedDice::maximum();
        let err = resolve(dice, &world, GOBLIN, CombatAction::Flee).unwrap_err();
        assert!(matches!(err, ActionError::HostileCannotFlee(_)));
    }
}
