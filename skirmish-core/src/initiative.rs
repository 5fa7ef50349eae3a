//! Turn order.
//!
//! Every combatant rolls `1d20 + effective initiative modifier` once when the
//! encounter starts. The die is kept for the whole encounter; at the start of
//! each round the order is re-sorted with the current modifiers, so effects
//! that change initiative take hold without a re-roll.

use crate::combatant::{CombatantId, Side};
use crate::dice::DiceEngine;
use crate::world::Battlefield;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// One combatant's place in the order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitiativeEntry {
    pub id: CombatantId,
    /// The natural d20, rolled once.
    pub die: u32,
    /// Effective initiative modifier as of the last sort.
    pub modifier: i32,
}

impl InitiativeEntry {
    pub fn total(&self) -> i32 {
        let die = i32::try_from(self.die).unwrap_or(i32::MAX);
        die.saturating_add(self.modifier)
    }
}

/// What the scheduler yields next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnSlot {
    /// This living combatant acts now.
    Actor(CombatantId),
    /// Every entry has had its chance this round.
    RoundComplete,
    /// The given side has no one left standing.
    Halted(Side),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOrder {
    entries: Vec<InitiativeEntry>,
    cursor: usize,
}

impl TurnOrder {
    /// Roll initiative for the whole roster and sort.
    pub fn compute(dice: &mut DiceEngine, world: &Battlefield) -> Self {
        let entries = world
            .iter()
            .map(|(id, combatant)| {
                let modifier = combatant.effective_initiative_modifier();
                let roll = dice.roll_initiative(modifier);
                InitiativeEntry {
                    id,
                    die: roll.results.first().copied().unwrap_or(1),
                    modifier,
                }
            })
            .collect();

        let mut order = Self { entries, cursor: 0 };
        order.sort();
        order
    }

    /// Build an order from known dice, e.g. to replay an encounter.
    pub fn from_entries(entries: Vec<InitiativeEntry>) -> Self {
        let mut order = Self { entries, cursor: 0 };
        order.sort();
        order
    }

    /// Higher total first, then higher modifier, then roster order.
    fn sort(&mut self) {
        self.entries
            .sort_by_key(|e| (Reverse(e.total()), Reverse(e.modifier), e.id));
    }

    /// Begin a new pass: refresh modifiers from the battlefield and re-sort.
    pub fn start_round(&mut self, world: &Battlefield) {
        for entry in &mut self.entries {
            if let Some(combatant) = world.get(entry.id) {
                entry.modifier = combatant.effective_initiative_modifier();
            }
        }
        self.sort();
        self.cursor = 0;
    }

    pub fn entries(&self) -> &[InitiativeEntry] {
        &self.entries
    }

    /// The entry that acted most recently in this pass.
    pub fn current(&self) -> Option<&InitiativeEntry> {
        self.cursor.checked_sub(1).and_then(|i| self.entries.get(i))
    }

    /// Yield the next living actor, skipping the incapacitated.
    ///
    /// The party is checked before the hostiles, so a mutual wipe halts on
    /// the party.
    pub fn next_turn(&mut self, world: &Battlefield) -> TurnSlot {
        for side in [Side::Party, Side::Hostile] {
            if world.is_wiped(side) {
                return TurnSlot::Halted(side);
            }
        }

        while let Some(entry) = self.entries.get(self.cursor) {
            self.cursor += 1;
            if world.get(entry.id).is_some_and(|c| !c.is_incapacitated()) {
                return TurnSlot::Actor(entry.id);
            }
        }
        TurnSlot::RoundComplete
    }

    /// Render the order as `Name (total)` pairs.
    pub fn describe(&self, world: &Battlefield) -> String {
        self.entries
            .iter()
            .map(|e| format!("{} ({})", world.name_of(e.id), e.total()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
