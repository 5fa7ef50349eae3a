//! Tunable rule constants for an encounter.

use crate::dice::{DiceError, DiceNotation, MAX_SIDES};
use serde::{Deserialize, Serialize};

/// Configuration for an encounter.
///
/// Every field has a default, so a partial JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Armor class granted by Defend until the defender's next turn.
    pub defend_bonus: i32,
    /// Die rolled for a flee attempt.
    pub flee_die: u32,
    /// A flee attempt succeeds when the die shows at least this.
    pub flee_target: u32,
    /// Hard stop for encounters that cannot finish.
    pub max_rounds: u32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            defend_bonus: 2,
            flee_die: 20,
            flee_target: 10,
            max_rounds: 100,
        }
    }
}

impl EncounterConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_defend_bonus(mut self, bonus: i32) -> Self {
        self.defend_bonus = bonus;
        self
    }

    /// Flee succeeds on `1d{die} >= target`.
    pub fn with_flee_check(mut self, die: u32, target: u32) -> Self {
        self.flee_die = die;
        self.flee_target = target;
        self
    }

    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = rounds;
        self
    }

    pub fn flee_notation(&self) -> Result<DiceNotation, DiceError> {
        DiceNotation::new(1, self.flee_die, 0)
    }

    /// Check the values are usable. Returns a description of the first problem.
    pub fn validate(&self) -> Result<(), String> {
        if self.flee_notation().is_err() {
            return Err(format!(
                "flee die must have between 2 and {MAX_SIDES} sides, got {}",
                self.flee_die
            ));
        }
        if self.max_rounds == 0 {
            return Err("max_rounds must be at least 1".to_string());
        }
        Ok(())
    }
}
