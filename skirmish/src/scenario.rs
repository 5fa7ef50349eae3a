//! Encounter files.
//!
//! An encounter file is JSON with the party's character sheets, the hostile
//! monster definitions and optional rule overrides:
//!
//! ```json
//! {
//!   "config": { "flee_target": 12 },
//!   "party": [ { "name": "Roland", "level": 3, ... } ],
//!   "hostiles": [ { "name": "Goblin", "hit_points": 7, ... } ]
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use skirmish_core::combatant::{AbilityScores, Weapon};
use skirmish_core::{
    Bounty, CharacterSheet, Combatant, DiceNotation, EncounterConfig, MonsterDefinition,
};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterFile {
    #[serde(default)]
    pub config: EncounterConfig,
    pub party: Vec<CharacterSheet>,
    pub hostiles: Vec<MonsterDefinition>,
}

impl EncounterFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading encounter file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing encounter file {}", path.display()))
    }

    /// Two adventurers ambushed on the road by three goblins.
    pub fn goblin_ambush() -> Result<Self> {
        let dice = |text: &str| DiceNotation::parse(text);

        let party = vec![
            CharacterSheet {
                name: "Roland".to_string(),
                level: 3,
                abilities: AbilityScores::new(16, 12, 14, 10, 11, 10),
                current_hp: 28,
                max_hp: 28,
                armor_class: 16,
                weapon: Weapon::new("Longsword", dice("1d8")?),
                ranged_weapon: None,
            },
            CharacterSheet {
                name: "Mira".to_string(),
                level: 3,
                abilities: AbilityScores::new(10, 16, 12, 12, 14, 10),
                current_hp: 21,
                max_hp: 21,
                armor_class: 14,
                weapon: Weapon::new("Shortsword", dice("1d6")?),
                ranged_weapon: Some(Weapon::new("Shortbow", dice("1d6")?)),
            },
        ];

        let goblin = |name: &str| -> Result<MonsterDefinition> {
            Ok(MonsterDefinition {
                name: name.to_string(),
                hit_points: 7,
                armor_class: 13,
                base_attack: 4,
                damage: dice("1d6+2")?,
                initiative_modifier: 2,
                bounty: Bounty::new(50, 1, 6).with_loot("Scimitar", 25),
            })
        };

        Ok(Self {
            config: EncounterConfig::default(),
            party,
            hostiles: vec![goblin("Snik")?, goblin("Grub")?, goblin("Nix")?],
        })
    }

    pub fn party_combatants(&self) -> Vec<Combatant> {
        self.party
            .iter()
            .map(CharacterSheet::to_combatant)
            .collect()
    }

    pub fn hostile_combatants(&self) -> Vec<Combatant> {
        self.hostiles
            .iter()
            .map(MonsterDefinition::to_combatant)
            .collect()
    }
}
