//! Spells and consumables usable in combat.
//!
//! Contains the [`Spell`] and [`Item`] types plus a small table of standard
//! entries the terminal driver and tests look up by name.

use crate::combatant::{Stat, StatusEffect};
use crate::dice::DiceNotation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hit point effect of a spell or item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Potency {
    Damage(DiceNotation),
    Healing(DiceNotation),
}

impl Potency {
    pub fn formula(&self) -> &DiceNotation {
        match self {
            Potency::Damage(formula) | Potency::Healing(formula) => formula,
        }
    }
}

/// Who a spell reaches besides its chosen target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpellArea {
    #[default]
    Single,
    AllOpponents,
    AllAllies,
}

/// A spell as cast in combat. Its resource cost is paid by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spell {
    pub name: String,
    #[serde(default)]
    pub potency: Option<Potency>,
    #[serde(default)]
    pub status: Option<StatusEffect>,
    #[serde(default)]
    pub area: SpellArea,
}

impl Spell {
    pub fn damage(name: impl Into<String>, formula: DiceNotation) -> Self {
        Self {
            name: name.into(),
            potency: Some(Potency::Damage(formula)),
            status: None,
            area: SpellArea::Single,
        }
    }

    pub fn healing(name: impl Into<String>, formula: DiceNotation) -> Self {
        Self {
            name: name.into(),
            potency: Some(Potency::Healing(formula)),
            status: None,
            area: SpellArea::Single,
        }
    }

    pub fn status(name: impl Into<String>, effect: StatusEffect) -> Self {
        Self {
            name: name.into(),
            potency: None,
            status: Some(effect),
            area: SpellArea::Single,
        }
    }

    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.status = Some(effect);
        self
    }

    pub fn with_area(mut self, area: SpellArea) -> Self {
        self.area = area;
        self
    }

    /// Harmful spells target opponents, everything else targets allies.
    pub fn is_harmful(&self) -> bool {
        is_harmful(self.potency.as_ref(), self.status.as_ref())
    }
}

impl fmt::Display for Spell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// A consumable used in combat. One unit is spent per use.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    #[serde(default)]
    pub potency: Option<Potency>,
    #[serde(default)]
    pub status: Option<StatusEffect>,
}

impl Item {
    pub fn healing(name: impl Into<String>, formula: DiceNotation) -> Self {
        Self {
            name: name.into(),
            potency: Some(Potency::Healing(formula)),
            status: None,
        }
    }

    pub fn damage(name: impl Into<String>, formula: DiceNotation) -> Self {
        Self {
            name: name.into(),
            potency: Some(Potency::Damage(formula)),
            status: None,
        }
    }

    pub fn status(name: impl Into<String>, effect: StatusEffect) -> Self {
        Self {
            name: name.into(),
            potency: None,
            status: Some(effect),
        }
    }

    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.status = Some(effect);
        self
    }

    pub fn is_harmful(&self) -> bool {
        is_harmful(self.potency.as_ref(), self.status.as_ref())
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

fn is_harmful(potency: Option<&Potency>, status: Option<&StatusEffect>) -> bool {
    match potency {
        Some(Potency::Damage(_)) => true,
        Some(Potency::Healing(_)) => false,
        None => status.is_some_and(|s| !s.is_beneficial()),
    }
}

/// Get a standard spell by name.
pub fn get_spell(name: &str) -> Option<Spell> {
    let name_lower = name.to_lowercase();
    SPELLS
        .iter()
        .find(|s| s.name.to_lowercase() == name_lower)
        .cloned()
}

/// Get a standard consumable by name.
pub fn get_item(name: &str) -> Option<Item> {
    let name_lower = name.to_lowercase();
    ITEMS
        .iter()
        .find(|i| i.name.to_lowercase() == name_lower)
        .cloned()
}

const fn dice(count: u32, sides: u32, modifier: i32) -> DiceNotation {
    DiceNotation::from_parts(count, sides, modifier)
}

lazy_static::lazy_static! {
    /// Standard combat spells.
    pub static ref SPELLS: Vec<Spell> = vec![
        Spell::damage("Magic Missile", dice(3, 4, 3)),
        Spell::damage("Burning Hands", dice(3, 6, 0)).with_area(SpellArea::AllOpponents),
        Spell::damage("Poison Spray", dice(1, 12, 0))
            .with_status(StatusEffect::for_rounds("Poisoned", Stat::HitPointsPerRound, -1, 2)),
        Spell::healing("Cure Wounds", dice(1, 8, 3)),
        Spell::status("Bless", StatusEffect::for_rounds("Blessed", Stat::AttackBonus, 2, 3))
            .with_area(SpellArea::AllAllies),
        Spell::status(
            "Shield of Faith",
            StatusEffect::for_rounds("Shield of Faith", Stat::ArmorClass, 2, 10),
        ),
        Spell::status("Bane", StatusEffect::for_rounds("Baned", Stat::AttackBonus, -2, 3))
            .with_area(SpellArea::AllOpponents),
    ];

    /// Standard consumables.
    pub static ref ITEMS: Vec<Item> = vec![
        Item::healing("Potion of Healing", dice(2, 4, 2)),
        Item::healing("Potion of Greater Healing", dice(4, 4, 4)),
        Item::healing("Potion of Superior Healing", dice(8, 4, 8)),
        Item::damage("Alchemist's Fire", dice(1, 4, 0))
            .with_status(StatusEffect::for_rounds("Burning", Stat::HitPointsPerRound, -1, 3)),
        Item::status(
            "Potion of Heroism",
            StatusEffect::for_rounds("Heroism", Stat::AttackBonus, 2, 10),
        ),
        Item::status(
            "Elixir of Vigor",
            StatusEffect::for_rounds("Vigor", Stat::HitPointsPerRound, 2, 3),
        ),
    ];
}
