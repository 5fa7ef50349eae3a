//! Action selection for combatants the engine does not get input for.
//!
//! Hostiles act through a [`HostilePolicy`]; the encounter's party acts
//! through a [`PartyController`] when it is driven with
//! [`Encounter::run`](crate::encounter::Encounter::run).

use crate::combatant::{Combatant, CombatantId, Side};
use crate::dice::DiceEngine;
use crate::rules::CombatAction;
use crate::world::Battlefield;
use std::collections::VecDeque;

/// Chooses actions for hostiles.
///
/// Policies must only produce valid actions: an invalid target from a policy
/// is reported as an engine error.
pub trait HostilePolicy {
    fn choose_action(
        &mut self,
        actor: CombatantId,
        world: &Battlefield,
        dice: &mut DiceEngine,
    ) -> CombatAction;
}

impl<F> HostilePolicy for F
where
    F: FnMut(CombatantId, &Battlefield, &mut DiceEngine) -> CombatAction,
{
    fn choose_action(
        &mut self,
        actor: CombatantId,
        world: &Battlefield,
        dice: &mut DiceEngine,
    ) -> CombatAction {
        self(actor, world, dice)
    }
}

/// Chooses actions for party members.
pub trait PartyController {
    fn choose_action(&mut self, actor: CombatantId, world: &Battlefield) -> CombatAction;
}

/// Living opponents of `actor`, in roster order.
fn opponents(actor: CombatantId, world: &Battlefield) -> Vec<CombatantId> {
    let side = world.get(actor).map_or(Side::Hostile, |c| c.side);
    world.living(side.opponent())
}

/// The living opponent with the fewest hit points; ties go to roster order.
pub fn weakest_opponent(actor: CombatantId, world: &Battlefield) -> Option<CombatantId> {
    opponents(actor, world)
        .into_iter()
        .min_by_key(|&id| world.get(id).map_or(i32::MAX, Combatant::hit_points))
}

/// Melee attack on a uniformly random living opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomTarget;

impl HostilePolicy for RandomTarget {
    fn choose_action(
        &mut self,
        actor: CombatantId,
        world: &Battlefield,
        dice: &mut DiceEngine,
    ) -> CombatAction {
        let targets = opponents(actor, world);
        match dice.choose_index(targets.len()) {
            Some(index) => CombatAction::melee(targets[index]),
            None => CombatAction::Defend,
        }
    }
}

/// Melee attack on the weakest living opponent.
#[derive(Debug, Clone, Copy, Default)]
pub struct FocusWeakest;

impl HostilePolicy for FocusWeakest {
    fn choose_action(
        &mut self,
        actor: CombatantId,
        world: &Battlefield,
        _dice: &mut DiceEngine,
    ) -> CombatAction {
        weakest_opponent(actor, world)
            .map(CombatAction::melee)
            .unwrap_or(CombatAction::Defend)
    }
}

/// Drives the party without input: every member attacks the weakest hostile.
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl PartyController for Autopilot {
    fn choose_action(&mut self, actor: CombatantId, world: &Battlefield) -> CombatAction {
        weakest_opponent(actor, world)
            .map(CombatAction::melee)
            .unwrap_or(CombatAction::Defend)
    }
}

/// Plays back a fixed list of party actions, then falls back to [`Autopilot`].
#[derive(Debug, Clone, Default)]
pub struct ScriptedController {
    actions: VecDeque<CombatAction>,
}

impl ScriptedController {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            actions: actions.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.actions.len()
    }
}

impl PartyController for ScriptedController {
    fn choose_action(&mut self, actor: CombatantId, world: &Battlefield) -> CombatAction {
        self.actions
            .pop_front()
            .unwrap_or_else(|| Autopilot.choose_action(actor, world))
    }
}
