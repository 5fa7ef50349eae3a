//! Dice rolling for combat.
//!
//! Supports `NdM`, `NdM+K` and `NdM-K` notation, advantage/disadvantage,
//! attribute generation and the derived rolls combat resolution needs.
//! All randomness flows through an injected [`RandomSource`], so a seeded or
//! scripted source makes every roll reproducible.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Most dice one notation may roll.
pub const MAX_DICE: u32 = 1_000;

/// Most faces one die may have.
pub const MAX_SIDES: u32 = 1_000;

/// Largest flat modifier, either way, a notation may carry.
pub const MAX_MODIFIER: i32 = 10_000;

/// Error type for dice parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceError {
    #[error("Invalid dice notation: {0}")]
    InvalidNotation(String),
}

/// Advantage state for d20 rolls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Advantage {
    #[default]
    Normal,
    Advantage,
    Disadvantage,
}

impl Advantage {
    /// Combine two advantage states (advantage + disadvantage = normal).
    pub fn combine(self, other: Advantage) -> Advantage {
        match (self, other) {
            (Advantage::Normal, x) | (x, Advantage::Normal) => x,
            (Advantage::Advantage, Advantage::Disadvantage) => Advantage::Normal,
            (Advantage::Disadvantage, Advantage::Advantage) => Advantage::Normal,
            (Advantage::Advantage, Advantage::Advantage) => Advantage::Advantage,
            (Advantage::Disadvantage, Advantage::Disadvantage) => Advantage::Disadvantage,
        }
    }
}

/// The single authoritative attribute-modifier table.
///
/// Score 8-9 = -1, 10-11 = 0, 12-13 = +1, and so on.
pub fn ability_modifier(score: u8) -> i32 {
    (score as i32 - 10).div_euclid(2)
}

// ============================================================================
// Random sources
// ============================================================================

/// Source of individual die results.
pub trait RandomSource {
    /// Return a uniformly distributed value in `1..=sides`.
    fn roll_die(&mut self, sides: u32) -> u32;
}

/// Adapts any `rand` generator into a [`RandomSource`].
#[derive(Debug, Clone)]
pub struct RngSource<R>(R);

impl<R: Rng> RngSource<R> {
    pub fn new(rng: R) -> Self {
        Self(rng)
    }
}

impl RngSource<StdRng> {
    /// A reproducible source: the same seed yields the same rolls.
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl<R: Rng> RandomSource for RngSource<R> {
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.0.gen_range(1..=sides.max(1))
    }
}

// ============================================================================
// Notation
// ============================================================================

/// A validated `NdM±K` dice notation.
///
/// Serialized as its string form, so any stored formula is guaranteed to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceNotation {
    count: u32,
    sides: u32,
    modifier: i32,
}

impl DiceNotation {
    /// Build a notation from its parts.
    ///
    /// Requires `1..=MAX_DICE` dice of `2..=MAX_SIDES` sides and a modifier
    /// no larger than [`MAX_MODIFIER`] either way.
    pub fn new(count: u32, sides: u32, modifier: i32) -> Result<Self, DiceError> {
        let notation = Self::from_parts(count, sides, modifier);
        if !notation.in_bounds() {
            return Err(DiceError::InvalidNotation(notation.to_string()));
        }
        Ok(notation)
    }

    /// Unchecked constructor for notations known to be valid at compile time.
    pub(crate) const fn from_parts(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Parse a dice notation string such as `1d8`, `2d6+3` or `1d4-1`.
    pub fn parse(notation: &str) -> Result<Self, DiceError> {
        let invalid = || DiceError::InvalidNotation(notation.to_string());
        let normalized = notation.trim().to_lowercase();

        let (count_str, rest) = normalized.split_once('d').ok_or_else(invalid)?;
        let (sides_str, modifier) = match rest.find(|c: char| c == '+' || c == '-') {
            Some(pos) => {
                let (sides, tail) = rest.split_at(pos);
                let value: i32 = parse_digits(&tail[1..]).ok_or_else(invalid)?;
                let sign = if tail.starts_with('-') { -1 } else { 1 };
                (sides, sign * value)
            }
            None => (rest, 0),
        };

        let count: u32 = parse_digits(count_str).ok_or_else(invalid)?;
        let sides: u32 = parse_digits(sides_str).ok_or_else(invalid)?;
        let parsed = Self::from_parts(count, sides, modifier);
        if !parsed.in_bounds() {
            return Err(invalid());
        }
        Ok(parsed)
    }

    fn in_bounds(&self) -> bool {
        (1..=MAX_DICE).contains(&self.count)
            && (2..=MAX_SIDES).contains(&self.sides)
            && (-MAX_MODIFIER..=MAX_MODIFIER).contains(&self.modifier)
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn sides(&self) -> u32 {
        self.sides
    }

    pub fn modifier(&self) -> i32 {
        self.modifier
    }

    /// The same dice with `extra` added to the flat modifier.
    pub fn with_extra_modifier(&self, extra: i32) -> Self {
        Self {
            modifier: self.modifier.saturating_add(extra),
            ..*self
        }
    }

    pub fn is_single_d20(&self) -> bool {
        self.count == 1 && self.sides == 20
    }
}

fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

impl FromStr for DiceNotation {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DiceNotation::parse(s)
    }
}

impl TryFrom<String> for DiceNotation {
    type Error = DiceError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DiceNotation::parse(&value)
    }
}

impl From<DiceNotation> for String {
    fn from(notation: DiceNotation) -> Self {
        notation.to_string()
    }
}

impl fmt::Display for DiceNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "-{}", m.abs()),
        }
    }
}

// ============================================================================
// Roll results
// ============================================================================

/// Complete, immutable result of a dice roll.
///
/// For plain rolls `total == sum(results) + modifier`. Keep-one rolls
/// (advantage, disadvantage) report both dice in `results` and the chosen die
/// in `kept`, with `total == kept + modifier`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll {
    pub notation: String,
    pub results: Vec<u32>,
    pub kept: Option<u32>,
    pub modifier: i32,
    pub total: i32,
    pub critical: bool,
    pub fumble: bool,
}

impl DiceRoll {
    /// Format the individual dice results for display.
    pub fn dice_display(&self) -> String {
        let mut kept_shown = false;
        let dice: Vec<String> = self
            .results
            .iter()
            .map(|&r| match self.kept {
                Some(k) if k == r && !kept_shown => {
                    kept_shown = true;
                    r.to_string()
                }
                Some(_) => format!("({r})"),
                None => r.to_string(),
            })
            .collect();

        let dice_str = format!("[{}]", dice.join(", "));
        match self.modifier {
            0 => dice_str,
            m if m > 0 => format!("{dice_str} + {m}"),
            m => format!("{dice_str} - {}", m.abs()),
        }
    }

    /// Check if the roll meets or exceeds a target number.
    pub fn meets(&self, target: i32) -> bool {
        self.total >= target
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dice = self.dice_display();
        write!(f, "{}: {dice} = {}", self.notation, self.total)
    }
}

/// Outcome of a morale check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoraleCheck {
    pub roll: DiceRoll,
    pub holds: bool,
}

// ============================================================================
// Engine
// ============================================================================

/// Dice engine backed by an injected random source.
pub struct DiceEngine {
    source: Box<dyn RandomSource>,
}

impl DiceEngine {
    pub fn new(source: impl RandomSource + 'static) -> Self {
        Self {
            source: Box::new(source),
        }
    }

    /// Engine with a reproducible seeded generator.
    pub fn seeded(seed: u64) -> Self {
        Self::new(RngSource::seeded(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(RngSource::from_entropy())
    }

    /// Roll one die, always in `1..=sides`.
    pub fn roll_die(&mut self, sides: u32) -> u32 {
        let sides = sides.max(1);
        self.source.roll_die(sides).clamp(1, sides)
    }

    /// Parse and roll a notation string.
    pub fn roll(&mut self, notation: &str) -> Result<DiceRoll, DiceError> {
        let parsed = DiceNotation::parse(notation)?;
        Ok(self.roll_notation(&parsed))
    }

    /// Roll an already validated notation.
    pub fn roll_notation(&mut self, notation: &DiceNotation) -> DiceRoll {
        let results: Vec<u32> = (0..notation.count)
            .map(|_| self.roll_die(notation.sides))
            .collect();
        let sum: i32 = results.iter().map(|&r| r as i32).sum();

        let natural = if notation.is_single_d20() {
            results.first().copied()
        } else {
            None
        };

        DiceRoll {
            notation: notation.to_string(),
            total: sum.saturating_add(notation.modifier),
            results,
            kept: None,
            modifier: notation.modifier,
            critical: natural == Some(20),
            fumble: natural == Some(1),
        }
    }

    pub fn roll_single(&mut self, sides: u32, modifier: i32) -> Result<DiceRoll, DiceError> {
        self.roll_multiple(1, sides, modifier)
    }

    pub fn roll_multiple(
        &mut self,
        count: u32,
        sides: u32,
        modifier: i32,
    ) -> Result<DiceRoll, DiceError> {
        let notation = DiceNotation::new(count, sides, modifier)?;
        Ok(self.roll_notation(&notation))
    }

    /// Roll `1d20 + modifier`.
    pub fn roll_d20(&mut self, modifier: i32) -> DiceRoll {
        self.roll_notation(&DiceNotation::from_parts(1, 20, modifier))
    }

    pub fn roll_with_advantage(&mut self, advantage: Advantage, modifier: i32) -> DiceRoll {
        match advantage {
            Advantage::Normal => self.roll_d20(modifier),
            Advantage::Advantage => self.roll_advantage(modifier),
            Advantage::Disadvantage => self.roll_disadvantage(modifier),
        }
    }

    /// Roll two d20 and keep the higher. Never reports a fumble.
    pub fn roll_advantage(&mut self, modifier: i32) -> DiceRoll {
        let (first, second) = (self.roll_die(20), self.roll_die(20));
        let chosen = first.max(second);
        let critical = chosen == 20;
        Self::keep_one("kh1", [first, second], chosen, modifier, critical, false)
    }

    /// Roll two d20 and keep the lower. Never reports a critical.
    pub fn roll_disadvantage(&mut self, modifier: i32) -> DiceRoll {
        let (first, second) = (self.roll_die(20), self.roll_die(20));
        let chosen = first.min(second);
        let fumble = chosen == 1;
        Self::keep_one("kl1", [first, second], chosen, modifier, false, fumble)
    }

    fn keep_one(
        keep: &str,
        rolls: [u32; 2],
        chosen: u32,
        modifier: i32,
        critical: bool,
        fumble: bool,
    ) -> DiceRoll {
        let base = format!("2d20{keep}");
        let notation = match modifier {
            0 => base,
            m if m > 0 => format!("{base}+{m}"),
            m => format!("{base}-{}", m.abs()),
        };
        DiceRoll {
            notation,
            results: rolls.to_vec(),
            kept: Some(chosen),
            modifier,
            total: (chosen as i32).saturating_add(modifier),
            critical,
            fumble,
        }
    }

    /// Generate one attribute score: 4d6, drop the lowest.
    ///
    /// All four raw dice are reported in `results`. An 18 is flagged as
    /// critical and a 3 as fumble; the flags are for display only.
    pub fn roll_attribute(&mut self) -> DiceRoll {
        let results: Vec<u32> = (0..4).map(|_| self.roll_die(6)).collect();
        let mut sorted = results.clone();
        sorted.sort_by(|a, b| b.cmp(a));
        let total: i32 = sorted.iter().take(3).map(|&r| r as i32).sum();

        DiceRoll {
            notation: "4d6kh3".to_string(),
            results,
            kept: None,
            modifier: 0,
            total,
            critical: total == 18,
            fumble: total == 3,
        }
    }

    /// Roll a full set of six attribute scores, sorted descending.
    pub fn roll_ability_scores(&mut self) -> [u8; 6] {
        let mut scores = [0u8; 6];
        for score in scores.iter_mut() {
            *score = self.roll_attribute().total as u8;
        }
        scores.sort_by(|a, b| b.cmp(a));
        scores
    }

    /// Parse `formula` and roll weapon damage. See [`DiceEngine::roll_damage`].
    pub fn roll_weapon_damage(
        &mut self,
        formula: &str,
        attribute_modifier: i32,
        is_critical: bool,
    ) -> Result<DiceRoll, DiceError> {
        let notation = DiceNotation::parse(formula)?;
        Ok(self.roll_damage(&notation, attribute_modifier, is_critical))
    }

    /// Roll damage or healing: dice plus modifiers, doubled after the
    /// modifier on a critical, never below 1.
    pub fn roll_damage(
        &mut self,
        formula: &DiceNotation,
        attribute_modifier: i32,
        is_critical: bool,
    ) -> DiceRoll {
        let notation = formula.with_extra_modifier(attribute_modifier);
        let mut roll = self.roll_notation(&notation);
        if is_critical {
            roll.total = roll.total.saturating_mul(2);
            roll.notation = format!("2x({})", roll.notation);
        }
        roll.total = roll.total.max(1);
        roll.critical = false;
        roll.fumble = false;
        roll
    }

    /// Roll `1d20 + modifier` for turn order.
    pub fn roll_initiative(&mut self, modifier: i32) -> DiceRoll {
        self.roll_d20(modifier)
    }

    /// Roll 2d6 against a morale score; the check holds on a total at or under it.
    pub fn roll_morale(&mut self, morale: u8) -> MoraleCheck {
        let roll = self.roll_notation(&DiceNotation::from_parts(2, 6, 0));
        let holds = roll.total <= morale as i32;
        MoraleCheck { roll, holds }
    }

    /// Roll `1d100`.
    pub fn roll_percentile(&mut self) -> DiceRoll {
        self.roll_notation(&DiceNotation::from_parts(1, 100, 0))
    }

    /// Uniform value in `min..=max`. Returns `min` without rolling when the
    /// range is empty.
    ///
    /// The full `0..=u32::MAX` range has one value more than a die can show,
    /// so there the top value is never rolled.
    pub fn roll_range(&mut self, min: u32, max: u32) -> u32 {
        if max <= min {
            return min;
        }
        let sides = (max - min).saturating_add(1);
        min + (self.roll_die(sides) - 1)
    }

    /// Uniform index into a collection of `len` elements.
    pub fn choose_index(&mut self, len: usize) -> Option<usize> {
        match len {
            0 => None,
            1 => Some(0),
            n => Some(self.roll_die(n as u32) as usize - 1),
        }
    }
}

impl fmt::Debug for DiceEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiceEngine").finish_non_exhaustive()
    }
}
