//! Testing utilities for combat.
//!
//! This module provides tools for deterministic tests:
//! - `ScriptedDice`, a random source that rolls exactly what it is told
//! - Sample combatants matching the stat blocks used throughout the tests

use crate::combatant::{Bounty, Combatant};
use crate::dice::{DiceNotation, RandomSource};
use std::collections::{BTreeMap, VecDeque};

/// What a [`ScriptedDice`] rolls once its script runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    /// Every die shows its highest face.
    Maximum,
    /// Every die shows 1.
    Minimum,
    /// Every die shows this value, clamped to the die.
    Fixed(u32),
}

/// A random source that plays back scripted values.
///
/// Values are taken, in priority order, from the queued sequence, then from
/// the per-die-size overrides, then from the fallback. Every value is clamped
/// to `1..=sides`.
#[derive(Debug, Clone)]
pub struct ScriptedDice {
    sequence: VecDeque<u32>,
    by_sides: BTreeMap<u32, u32>,
    fallback: Fallback,
}

impl ScriptedDice {
    pub fn new(fallback: Fallback) -> Self {
        Self {
            sequence: VecDeque::new(),
            by_sides: BTreeMap::new(),
            fallback,
        }
    }

    /// Every die shows `value`.
    pub fn always(value: u32) -> Self {
        Self::new(Fallback::Fixed(value))
    }

    pub fn maximum() -> Self {
        Self::new(Fallback::Maximum)
    }

    pub fn minimum() -> Self {
        Self::new(Fallback::Minimum)
    }

    /// Play `values` in order, then fall back to maximum rolls.
    pub fn sequence(values: impl IntoIterator<Item = u32>) -> Self {
        Self::maximum().then(values)
    }

    /// Queue more values after those already scripted.
    pub fn then(mut self, values: impl IntoIterator<Item = u32>) -> Self {
        self.sequence.extend(values);
        self
    }

    /// Dice with `sides` faces show `value` whenever the sequence is empty.
    pub fn with_sides(mut self, sides: u32, value: u32) -> Self {
        self.by_sides.insert(sides, value);
        self
    }

    pub fn remaining(&self) -> usize {
        self.sequence.len()
    }
}

impl RandomSource for ScriptedDice {
    fn roll_die(&mut self, sides: u32) -> u32 {
        let value = self
            .sequence
            .pop_front()
            .or_else(|| self.by_sides.get(&sides).copied())
            .unwrap_or(match self.fallback {
                Fallback::Maximum => sides,
                Fallback::Minimum => 1,
                Fallback::Fixed(v) => v,
            });
        value.clamp(1, sides.max(1))
    }
}

/// Fighter: HP 20, AC 15, +5 to hit, `1d8+3` damage.
pub fn sample_fighter(name: &str) -> Combatant {
    Combatant::party(name, 20, 15, 5, DiceNotation::from_parts(1, 8, 3))
}

/// Goblin: HP 5, AC 11, +1 to hit, `1d6` damage, 50 XP and 2-6 gold.
pub fn sample_goblin(name: &str) -> Combatant {
    Combatant::hostile(name, 5, 11, 1, DiceNotation::from_parts(1, 6, 0))
        .with_bounty(Bounty::new(50, 2, 6).with_loot("Rusty Dagger", 50))
}
