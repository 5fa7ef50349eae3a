//! Combat participants.
//!
//! A [`Combatant`] is the runtime snapshot of a party member or hostile for
//! the duration of one encounter. Hit points are clamped to `0..=max` and a
//! combatant at 0 is incapacitated. Timed modifiers are tracked as
//! [`StatusEffect`]s and folded into the effective stats.

use crate::dice::{ability_modifier, DiceNotation};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identity
// ============================================================================

/// Position of a combatant in the encounter roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatantId(pub usize);

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0 + 1)
    }
}

/// Which side of the fight a combatant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    Party,
    Hostile,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Party => Side::Hostile,
            Side::Hostile => Side::Party,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Side::Party => "party",
            Side::Hostile => "hostiles",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ============================================================================
// Status effects
// ============================================================================

/// The stat a status effect modifies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    AttackBonus,
    ArmorClass,
    Initiative,
    /// Hit points gained (positive) or lost (negative) at each round end.
    HitPointsPerRound,
}

impl Stat {
    pub fn label(&self) -> &'static str {
        match self {
            Stat::AttackBonus => "attack",
            Stat::ArmorClass => "AC",
            Stat::Initiative => "initiative",
            Stat::HitPointsPerRound => "HP/round",
        }
    }
}

/// How long a status effect lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EffectDuration {
    /// Decremented at each round end, removed at zero.
    Rounds(u32),
    /// Never expires during the encounter.
    Permanent,
    /// Removed when its bearer's next turn begins.
    UntilNextTurn,
}

impl fmt::Display for EffectDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EffectDuration::Rounds(1) => write!(f, "1 round"),
            EffectDuration::Rounds(n) => write!(f, "{n} rounds"),
            EffectDuration::Permanent => write!(f, "permanent"),
            EffectDuration::UntilNextTurn => write!(f, "until next turn"),
        }
    }
}

/// A timed buff or debuff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub name: String,
    pub stat: Stat,
    pub magnitude: i32,
    pub duration: EffectDuration,
}

impl StatusEffect {
    pub fn new(
        name: impl Into<String>,
        stat: Stat,
        magnitude: i32,
        duration: EffectDuration,
    ) -> Self {
        Self {
            name: name.into(),
            stat,
            magnitude,
            duration,
        }
    }

    pub fn for_rounds(name: impl Into<String>, stat: Stat, magnitude: i32, rounds: u32) -> Self {
        Self::new(name, stat, magnitude, EffectDuration::Rounds(rounds))
    }

    pub fn permanent(name: impl Into<String>, stat: Stat, magnitude: i32) -> Self {
        Self::new(name, stat, magnitude, EffectDuration::Permanent)
    }

    pub fn until_next_turn(name: impl Into<String>, stat: Stat, magnitude: i32) -> Self {
        Self::new(name, stat, magnitude, EffectDuration::UntilNextTurn)
    }

    pub fn is_beneficial(&self) -> bool {
        self.magnitude > 0
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:+} {}, {})",
            self.name,
            self.magnitude,
            self.stat.label(),
            self.duration
        )
    }
}

// ============================================================================
// Rewards
// ============================================================================

/// One entry of a hostile's loot table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    /// Drop chance in percent, rolled independently per entry.
    pub chance_percent: u8,
}

impl LootEntry {
    pub fn new(item: impl Into<String>, chance_percent: u8) -> Self {
        Self {
            item: item.into(),
            chance_percent,
        }
    }
}

/// What defeating a hostile is worth.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounty {
    pub experience: u32,
    pub gold_min: u32,
    pub gold_max: u32,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

impl Bounty {
    pub fn new(experience: u32, gold_min: u32, gold_max: u32) -> Self {
        Self {
            experience,
            gold_min,
            gold_max,
            loot: Vec::new(),
        }
    }

    pub fn with_loot(mut self, item: impl Into<String>, chance_percent: u8) -> Self {
        self.loot.push(LootEntry::new(item, chance_percent));
        self
    }
}

// ============================================================================
// Combatant
// ============================================================================

/// Ranged attack profile, when it differs from the melee one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangedAttack {
    pub attack_bonus: i32,
    pub damage: DiceNotation,
}

/// Melee or ranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AttackMode {
    Melee,
    Ranged,
}

impl AttackMode {
    pub fn name(&self) -> &'static str {
        match self {
            AttackMode::Melee => "melee",
            AttackMode::Ranged => "ranged",
        }
    }
}

/// Everything needed to roll one attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackProfile {
    pub attack_bonus: i32,
    pub damage: DiceNotation,
    pub damage_modifier: i32,
}

/// Runtime representation of any participant in an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Combatant {
    pub name: String,
    pub side: Side,
    hit_points: i32,
    max_hit_points: i32,
    pub armor_class: i32,
    pub attack_bonus: i32,
    pub damage: DiceNotation,
    #[serde(default)]
    pub ranged: Option<RangedAttack>,
    /// Added to melee damage only.
    #[serde(default)]
    pub strength_modifier: i32,
    #[serde(default)]
    pub initiative_modifier: i32,
    #[serde(default)]
    status_effects: Vec<StatusEffect>,
    #[serde(default)]
    pub bounty: Bounty,
}

impl Combatant {
    /// Create a combatant at full health.
    pub fn new(
        name: impl Into<String>,
        side: Side,
        max_hit_points: i32,
        armor_class: i32,
        attack_bonus: i32,
        damage: DiceNotation,
    ) -> Self {
        Self {
            name: name.into(),
            side,
            hit_points: max_hit_points.max(0),
            max_hit_points,
            armor_class,
            attack_bonus,
            damage,
            ranged: None,
            strength_modifier: 0,
            initiative_modifier: 0,
            status_effects: Vec::new(),
            bounty: Bounty::default(),
        }
    }

    pub fn party(
        name: impl Into<String>,
        max_hit_points: i32,
        armor_class: i32,
        attack_bonus: i32,
        damage: DiceNotation,
    ) -> Self {
        Self::new(
            name,
            Side::Party,
            max_hit_points,
            armor_class,
            attack_bonus,
            damage,
        )
    }

    pub fn hostile(
        name: impl Into<String>,
        max_hit_points: i32,
        armor_class: i32,
        attack_bonus: i32,
        damage: DiceNotation,
    ) -> Self {
        Self::new(
            name,
            Side::Hostile,
            max_hit_points,
            armor_class,
            attack_bonus,
            damage,
        )
    }

    /// Start the encounter wounded. Clamped to `0..=max`.
    pub fn with_hit_points(mut self, hit_points: i32) -> Self {
        self.hit_points = hit_points.clamp(0, self.max_hit_points.max(0));
        self
    }

    pub fn with_ranged(mut self, attack_bonus: i32, damage: DiceNotation) -> Self {
        self.ranged = Some(RangedAttack {
            attack_bonus,
            damage,
        });
        self
    }

    pub fn with_strength_modifier(mut self, modifier: i32) -> Self {
        self.strength_modifier = modifier;
        self
    }

    pub fn with_initiative_modifier(mut self, modifier: i32) -> Self {
        self.initiative_modifier = modifier;
        self
    }

    pub fn with_bounty(mut self, bounty: Bounty) -> Self {
        self.bounty = bounty;
        self
    }

    pub fn with_status_effect(mut self, effect: StatusEffect) -> Self {
        self.add_status_effect(effect);
        self
    }

    pub fn hit_points(&self) -> i32 {
        self.hit_points
    }

    pub fn max_hit_points(&self) -> i32 {
        self.max_hit_points
    }

    pub fn is_incapacitated(&self) -> bool {
        self.hit_points == 0
    }

    /// Subtract damage, clamping at 0. Returns the new hit points.
    pub fn apply_damage(&mut self, amount: u32) -> i32 {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        self.hit_points = self.hit_points.saturating_sub(amount).max(0);
        self.hit_points
    }

    /// Add healing, clamping at the maximum. Has no effect on an
    /// incapacitated combatant. Returns the new hit points.
    pub fn apply_healing(&mut self, amount: u32) -> i32 {
        if self.is_incapacitated() {
            return self.hit_points;
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        let healed = self.hit_points.saturating_add(amount);
        self.hit_points = healed.min(self.max_hit_points);
        self.hit_points
    }

    fn modifier_for(&self, stat: Stat) -> i32 {
        self.status_effects
            .iter()
            .filter(|e| e.stat == stat)
            .map(|e| e.magnitude)
            .fold(0, i32::saturating_add)
    }

    pub fn effective_attack_bonus(&self) -> i32 {
        let bonus = self.modifier_for(Stat::AttackBonus);
        self.attack_bonus.saturating_add(bonus)
    }

    pub fn effective_armor_class(&self) -> i32 {
        let bonus = self.modifier_for(Stat::ArmorClass);
        self.armor_class.saturating_add(bonus)
    }

    pub fn effective_initiative_modifier(&self) -> i32 {
        let bonus = self.modifier_for(Stat::Initiative);
        self.initiative_modifier.saturating_add(bonus)
    }

    /// Net hit point change applied at each round end.
    pub fn per_round_hit_point_change(&self) -> i32 {
        self.modifier_for(Stat::HitPointsPerRound)
    }

    /// Attack bonus, damage formula and damage modifier for one attack.
    ///
    /// Melee adds the strength modifier to damage. Ranged adds nothing and
    /// falls back to the melee profile when no ranged attack is defined.
    pub fn attack_profile(&self, mode: AttackMode) -> AttackProfile {
        let status_bonus = self.modifier_for(Stat::AttackBonus);
        match (mode, &self.ranged) {
            (AttackMode::Melee, _) => AttackProfile {
                attack_bonus: self.attack_bonus.saturating_add(status_bonus),
                damage: self.damage,
                damage_modifier: self.strength_modifier,
            },
            (AttackMode::Ranged, Some(ranged)) => AttackProfile {
                attack_bonus: ranged.attack_bonus.saturating_add(status_bonus),
                damage: ranged.damage,
                damage_modifier: 0,
            },
            (AttackMode::Ranged, None) => AttackProfile {
                attack_bonus: self.attack_bonus.saturating_add(status_bonus),
                damage: self.damage,
                damage_modifier: 0,
            },
        }
    }

    pub fn status_effects(&self) -> &[StatusEffect] {
        &self.status_effects
    }

    pub fn has_status_effect(&self, name: &str) -> bool {
        self.status_effects.iter().any(|e| e.name == name)
    }

    /// Add an effect. An effect with the same name is replaced in place.
    /// Returns true if the effect was new.
    pub fn add_status_effect(&mut self, effect: StatusEffect) -> bool {
        let existing = self
            .status_effects
            .iter_mut()
            .find(|e| e.name == effect.name);
        match existing {
            Some(existing) => {
                *existing = effect;
                false
            }
            None => {
                self.status_effects.push(effect);
                true
            }
        }
    }

    /// Remove an effect by name, returning it if it was present.
    pub fn remove_status_effect(&mut self, name: &str) -> Option<StatusEffect> {
        let index = self.status_effects.iter().position(|e| e.name == name)?;
        Some(self.status_effects.remove(index))
    }

    /// Drop effects that last until this combatant's next turn.
    pub fn begin_turn(&mut self) -> Vec<StatusEffect> {
        let (expired, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.status_effects)
            .into_iter()
            .partition(|e| e.duration == EffectDuration::UntilNextTurn);
        self.status_effects = kept;
        expired
    }

    /// Round-end bookkeeping: decrement timed effects and return those that expired.
    pub fn tick_status_effects(&mut self) -> Vec<StatusEffect> {
        let mut expired = Vec::new();
        let mut kept = Vec::with_capacity(self.status_effects.len());
        for mut effect in std::mem::take(&mut self.status_effects) {
            if let EffectDuration::Rounds(n) = effect.duration {
                let remaining = n.saturating_sub(1);
                effect.duration = EffectDuration::Rounds(remaining);
                if remaining == 0 {
                    expired.push(effect);
                    continue;
                }
            }
            kept.push(effect);
        }
        self.status_effects = kept;
        expired
    }
}

impl fmt::Display for Combatant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} (HP {}/{}, AC {})",
            self.name,
            self.hit_points,
            self.max_hit_points,
            self.effective_armor_class()
        )
    }
}

// ============================================================================
// Snapshots from persistent records
// ============================================================================

/// The six ability scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Ability {
    Strength,
    Dexterity,
    Constitution,
    Intelligence,
    Wisdom,
    Charisma,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityScores {
    pub strength: u8,
    pub dexterity: u8,
    pub constitution: u8,
    pub intelligence: u8,
    pub wisdom: u8,
    pub charisma: u8,
}

impl AbilityScores {
    pub fn new(str: u8, dex: u8, con: u8, int: u8, wis: u8, cha: u8) -> Self {
        Self {
            strength: str,
            dexterity: dex,
            constitution: con,
            intelligence: int,
            wisdom: wis,
            charisma: cha,
        }
    }

    pub fn get(&self, ability: Ability) -> u8 {
        match ability {
            Ability::Strength => self.strength,
            Ability::Dexterity => self.dexterity,
            Ability::Constitution => self.constitution,
            Ability::Intelligence => self.intelligence,
            Ability::Wisdom => self.wisdom,
            Ability::Charisma => self.charisma,
        }
    }

    pub fn modifier(&self, ability: Ability) -> i32 {
        ability_modifier(self.get(ability))
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self::new(10, 10, 10, 10, 10, 10)
    }
}

pub fn proficiency_bonus(level: u8) -> i32 {
    match level {
        0..=4 => 2,
        5..=8 => 3,
        9..=12 => 4,
        13..=16 => 5,
        _ => 6,
    }
}

/// A wielded weapon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Weapon {
    pub name: String,
    pub damage: DiceNotation,
}

impl Weapon {
    pub fn new(name: impl Into<String>, damage: DiceNotation) -> Self {
        Self {
            name: name.into(),
            damage,
        }
    }
}

/// Persisted player character data the encounter is built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterSheet {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub abilities: AbilityScores,
    pub current_hp: i32,
    pub max_hp: i32,
    pub armor_class: i32,
    pub weapon: Weapon,
    #[serde(default)]
    pub ranged_weapon: Option<Weapon>,
}

impl CharacterSheet {
    /// Snapshot for combat. Melee attacks use STR, ranged attacks and
    /// initiative use DEX, both plus proficiency.
    pub fn to_combatant(&self) -> Combatant {
        let proficiency = proficiency_bonus(self.level);
        let str_mod = self.abilities.modifier(Ability::Strength);
        let dex_mod = self.abilities.modifier(Ability::Dexterity);

        let mut combatant = Combatant::party(
            self.name.clone(),
            self.max_hp,
            self.armor_class,
            proficiency + str_mod,
            self.weapon.damage,
        )
        .with_hit_points(self.current_hp)
        .with_strength_modifier(str_mod)
        .with_initiative_modifier(dex_mod);

        if let Some(ref bow) = self.ranged_weapon {
            combatant = combatant.with_ranged(proficiency + dex_mod, bow.damage);
        }
        combatant
    }
}

/// Monster definition the hostiles of an encounter are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonsterDefinition {
    pub name: String,
    pub hit_points: i32,
    pub armor_class: i32,
    pub base_attack: i32,
    pub damage: DiceNotation,
    #[serde(default)]
    pub initiative_modifier: i32,
    #[serde(default)]
    pub bounty: Bounty,
}

impl MonsterDefinition {
    pub fn to_combatant(&self) -> Combatant {
        Combatant::hostile(
            self.name.clone(),
            self.hit_points,
            self.armor_class,
            self.base_attack,
            self.damage,
        )
        .with_initiative_modifier(self.initiative_modifier)
        .with_bounty(self.bounty.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notation(text: &str) -> DiceNotation {
        DiceNotation::parse(text).unwrap()
    }

    fn fighter() -> Combatant {
        Combatant::party("Fighter", 20, 15, 5, notation("1d8+3"))
    }

    fn bless(rounds: u32) -> StatusEffect {
        StatusEffect::for_rounds("Bless", Stat::AttackBonus, 2, rounds)
    }

    fn defending() -> StatusEffect {
        StatusEffect::until_next_turn("Defending", Stat::ArmorClass, 2)
    }

    #[test]
    fn test_damage_clamps_at_zero() {
        let mut c = fighter();
        assert_eq!(c.apply_damage(7), 13);
        assert_eq!(c.apply_damage(50), 0);
        assert!(c.is_incapacitated());
        assert_eq!(c.apply_damage(u32::MAX), 0);
    }

    #[test]
    fn test_healing_clamps_at_max() {
        let mut c = fighter().with_hit_points(5);
        assert_eq!(c.apply_healing(4), 9);
        assert_eq!(c.apply_healing(100), 20);
    }

    #[test]
    fn test_zero_amounts_change_nothing() {
        let mut c = fighter().with_hit_points(11);
        assert_eq!(c.apply_damage(0), 11);
        assert_eq!(c.apply_healing(0), 11);
    }

    #[test]
    fn test_no_healing_when_incapacitated() {
        let mut c = fighter().with_hit_points(0);
        assert!(c.is_incapacitated());
        assert_eq!(c.apply_healing(10), 0);
    }

    #[test]
    fn test_effective_stats_sum_effects() {
        let mut c = fighter();
        c.add_status_effect(bless(3));
        c.add_status_effect(StatusEffect::permanent("Ring", Stat::ArmorClass, 1));
        c.add_status_effect(defending());
        assert_eq!(c.effective_attack_bonus(), 7);
        assert_eq!(c.effective_armor_class(), 18);
        assert_eq!(c.effective_initiative_modifier(), 0);
    }

    #[test]
    fn test_same_name_refreshes() {
        let mut c = fighter();
        assert!(c.add_status_effect(bless(1)));
        assert!(!c.add_status_effect(bless(3)));
        assert_eq!(c.status_effects().len(), 1);
        assert_eq!(c.status_effects()[0].duration, EffectDuration::Rounds(3));
    }

    #[test]
    fn test_remove_status_effect() {
        let mut c = fighter()
            .with_status_effect(bless(2))
            .with_status_effect(defending());

        let removed = c.remove_status_effect("Defending");
        assert_eq!(removed, Some(defending()));
        assert_eq!(c.effective_armor_class(), 15);
        assert_eq!(c.status_effects(), &[bless(2)]);

        assert_eq!(c.remove_status_effect("Defending"), None);
        assert_eq!(c.status_effects().len(), 1);
    }

    #[test]
    fn test_effective_stats_saturate() {
        let mut c = fighter();
        c.attack_bonus = i32::MAX;
        c.add_status_effect(StatusEffect::permanent("Fury", Stat::AttackBonus, i32::MAX));
        c.add_status_effect(StatusEffect::permanent("Frenzy", Stat::AttackBonus, 5));
        assert_eq!(c.effective_attack_bonus(), i32::MAX);
        assert_eq!(c.attack_profile(AttackMode::Melee).attack_bonus, i32::MAX);
    }

    #[test]
    fn test_tick_expires_timed_effects_only() {
        let mut c = fighter()
            .with_status_effect(bless(2))
            .with_status_effect(StatusEffect::permanent("Ring", Stat::ArmorClass, 1))
            .with_status_effect(defending());

        assert!(c.tick_status_effects().is_empty());
        assert_eq!(c.status_effects().len(), 3);

        let expired = c.tick_status_effects();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].name, "Bless");
        assert!(c.has_status_effect("Ring"));
        assert!(c.has_status_effect("Defending"));
    }

    #[test]
    fn test_begin_turn_clears_until_next_turn() {
        let mut c = fighter()
            .with_status_effect(defending())
            .with_status_effect(bless(2));
        let expired = c.begin_turn();
        assert_eq!(expired.len(), 1);
        assert_eq!(c.effective_armor_class(), 15);
        assert!(c.has_status_effect("Bless"));
    }

    #[test]
    fn test_attack_profiles() {
        let archer = fighter()
            .with_strength_modifier(3)
            .with_ranged(6, notation("1d6"));
        let melee = archer.attack_profile(AttackMode::Melee);
        assert_eq!(melee.attack_bonus, 5);
        assert_eq!(melee.damage_modifier, 3);

        let ranged = archer.attack_profile(AttackMode::Ranged);
        assert_eq!(ranged.attack_bonus, 6);
        assert_eq!(ranged.damage, notation("1d6"));
        assert_eq!(ranged.damage_modifier, 0);

        let thrown = fighter()
            .with_strength_modifier(3)
            .attack_profile(AttackMode::Ranged);
        assert_eq!(thrown.damage, notation("1d8+3"));
        assert_eq!(thrown.damage_modifier, 0);
    }

    #[test]
    fn test_character_sheet_snapshot() {
        let sheet = CharacterSheet {
            name: "Roland".to_string(),
            level: 5,
            abilities: AbilityScores::new(16, 14, 14, 10, 12, 8),
            current_hp: 30,
            max_hp: 44,
            armor_class: 18,
            weapon: Weapon::new("Longsword", notation("1d8")),
            ranged_weapon: Some(Weapon::new("Longbow", notation("1d8"))),
        };
        let c = sheet.to_combatant();
        assert_eq!(c.side, Side::Party);
        assert_eq!(c.hit_points(), 30);
        assert_eq!(c.attack_bonus, 6);
        assert_eq!(c.strength_modifier, 3);
        assert_eq!(c.initiative_modifier, 2);
        assert_eq!(c.attack_profile(AttackMode::Ranged).attack_bonus, 5);
    }

    #[test]
    fn test_monster_snapshot_carries_bounty() {
        let goblin = MonsterDefinition {
            name: "Goblin".to_string(),
            hit_points: 7,
            armor_class: 15,
            base_attack: 4,
            damage: notation("1d6+2"),
            initiative_modifier: 2,
            bounty: Bounty::new(50, 1, 6).with_loot("Scimitar", 25),
        };
        let c = goblin.to_combatant();
        assert_eq!(c.side, Side::Hostile);
        assert_eq!(c.max_hit_points(), 7);
        assert_eq!(c.bounty.experience, 50);
        assert_eq!(c.bounty.loot[0].chance_percent, 25);
    }

    #[test]
    fn test_proficiency_bonus() {
        assert_eq!(proficiency_bonus(1), 2);
        assert_eq!(proficiency_bonus(5), 3);
        assert_eq!(proficiency_bonus(17), 6);
    }
}
