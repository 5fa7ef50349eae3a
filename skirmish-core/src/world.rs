//! The battlefield: every combatant in one encounter.
//!
//! The roster holds party members first, in the order supplied, then
//! hostiles. A [`CombatantId`] is an index into it and stays stable for the
//! whole encounter.

use crate::combatant::{Combatant, CombatantId, Side};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Battlefield {
    combatants: Vec<Combatant>,
}

impl Battlefield {
    /// Build a roster from both sides. Each combatant's side is forced to
    /// the list it was supplied in.
    pub fn new(party: Vec<Combatant>, hostiles: Vec<Combatant>) -> Self {
        let party = party.into_iter().map(|mut c| {
            c.side = Side::Party;
            c
        });
        let hostiles = hostiles.into_iter().map(|mut c| {
            c.side = Side::Hostile;
            c
        });
        Self {
            combatants: party.chain(hostiles).collect(),
        }
    }

    pub fn get(&self, id: CombatantId) -> Option<&Combatant> {
        self.combatants.get(id.0)
    }

    pub fn get_mut(&mut self, id: CombatantId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id.0)
    }

    /// Name of a combatant, or a placeholder for an unknown id.
    pub fn name_of(&self, id: CombatantId) -> &str {
        self.get(id).map(|c| c.name.as_str()).unwrap_or("someone")
    }

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn into_combatants(self) -> Vec<Combatant> {
        self.combatants
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (CombatantId, &Combatant)> {
        self.combatants
            .iter()
            .enumerate()
            .map(|(i, c)| (CombatantId(i), c))
    }

    pub fn ids(&self) -> impl Iterator<Item = CombatantId> {
        (0..self.combatants.len()).map(CombatantId)
    }

    pub fn find(&self, name: &str) -> Option<CombatantId> {
        self.combatants
            .iter()
            .position(|c| c.name.eq_ignore_ascii_case(name))
            .map(CombatantId)
    }

    /// Living combatants on one side, in roster order.
    pub fn living(&self, side: Side) -> Vec<CombatantId> {
        self.iter()
            .filter(|(_, c)| c.side == side && !c.is_incapacitated())
            .map(|(id, _)| id)
            .collect()
    }

    /// True when every member of `side` is incapacitated.
    pub fn is_wiped(&self, side: Side) -> bool {
        self.combatants
            .iter()
            .filter(|c| c.side == side)
            .all(|c| c.is_incapacitated())
    }

    pub fn side(&self, side: Side) -> impl Iterator<Item = (CombatantId, &Combatant)> {
        self.iter().filter(move |(_, c)| c.side == side)
    }
}
