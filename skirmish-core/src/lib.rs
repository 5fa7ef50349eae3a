//! Turn-based combat engine for tabletop-style encounters.
//!
//! This crate provides:
//! - Dice notation parsing and rolling over an injectable random source
//! - Combatants with hit points, status effects and rewards
//! - Per-combatant initiative and turn scheduling
//! - Action/Effect rules pipeline for attacks, spells, items, defending and fleeing
//! - An encounter state machine producing a replayable log and a `CombatResult`
//!
//! # Quick Start
//!
//! ```
//! use skirmish_core::ai::Autopilot;
//! use skirmish_core::testing::{sample_fighter, sample_goblin};
//! use skirmish_core::{DiceEngine, Encounter};
//!
//! let mut encounter = Encounter::new(DiceEngine::seeded(42));
//! encounter
//!     .start(vec![sample_fighter("Roland")], vec![sample_goblin("Snik")])
//!     .unwrap();
//!
//! let result = encounter.run(&mut Autopilot).unwrap();
//! for line in &result.log {
//!     println!("{line}");
//! }
//! ```

pub mod ai;
pub mod catalog;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod encounter;
pub mod initiative;
pub mod rules;
pub mod testing;
pub mod world;

// Primary public API
pub use combatant::{
    AttackMode, Bounty, CharacterSheet, Combatant, CombatantId, MonsterDefinition, Side, Stat,
    StatusEffect,
};
pub use config::EncounterConfig;
pub use dice::{DiceEngine, DiceError, DiceNotation, DiceRoll, RandomSource, RngSource};
pub use encounter::{CombatResult, Encounter, EncounterError, EncounterState, Outcome, Step};
pub use rules::{ActionError, CombatAction};
pub use world::Battlefield;
