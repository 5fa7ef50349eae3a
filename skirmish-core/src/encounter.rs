//! The encounter state machine.
//!
//! An [`Encounter`] owns the battlefield for one fight. It rolls initiative,
//! hands turns to hostiles through a [`HostilePolicy`] and stops whenever a
//! party member must act. Callers answer with [`Encounter::submit`], or let a
//! [`PartyController`] answer for them with [`Encounter::run`].
//!
//! ```text
//! NotStarted -> Initiative -> RoundInProgress -> Resolved(outcome)
//! ```

use crate::ai::{HostilePolicy, PartyController, RandomTarget};
use crate::combatant::{Combatant, CombatantId, Side};
use crate::config::EncounterConfig;
use crate::dice::{DiceEngine, DiceError};
use crate::initiative::{TurnOrder, TurnSlot};
use crate::rules::{apply_effects, ActionError, ActionResolver, CombatAction, Effect, Resolution};
use crate::world::Battlefield;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncounterError {
    #[error("The {0} side has no combatants")]
    EmptySide(Side),

    #[error("Invalid combatant {name}: {reason}")]
    InvalidCombatant { name: String, reason: String },

    #[error("Two combatants are named {0}")]
    DuplicateName(String),

    #[error("Invalid encounter config: {0}")]
    InvalidConfig(String),

    #[error("Encounter already started")]
    AlreadyStarted,

    #[error("Encounter not started")]
    NotStarted,

    #[error("Encounter already resolved")]
    AlreadyResolved,

    #[error("No party member is waiting to act")]
    NotAwaitingAction,

    #[error("Encounter did not finish within {0} rounds")]
    RoundLimitExceeded(u32),

    #[error(transparent)]
    Action(#[from] ActionError),

    #[error(transparent)]
    Dice(#[from] DiceError),
}

// ============================================================================
// States and results
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
    Fled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Victory => write!(f, "Victory"),
            Outcome::Defeat => write!(f, "Defeat"),
            Outcome::Fled => write!(f, "Fled"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncounterState {
    NotStarted,
    Initiative,
    RoundInProgress,
    Resolved(Outcome),
}

/// One unit of an item spent during the encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumedItem {
    pub owner: String,
    pub item: String,
}

/// Everything the caller needs to reconcile after an encounter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatResult {
    pub outcome: Outcome,
    pub experience: u32,
    pub gold: u32,
    pub loot: Vec<String>,
    pub log: Vec<String>,
    pub rounds: u32,
    /// Final state of every combatant, in roster order.
    pub combatants: Vec<Combatant>,
    pub consumed_items: Vec<ConsumedItem>,
}

/// What the encounter needs next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// This party member must act through [`Encounter::submit`].
    AwaitingAction(CombatantId),
    Resolved(CombatResult),
}

#[derive(Debug, Clone, Copy, Default)]
struct Rewards {
    experience: u32,
    gold: u32,
}

// ============================================================================
// Encounter
// ============================================================================

pub struct Encounter {
    dice: DiceEngine,
    config: EncounterConfig,
    resolver: ActionResolver,
    policy: Box<dyn HostilePolicy>,
    state: EncounterState,
    world: Battlefield,
    order: TurnOrder,
    round: u32,
    log: Vec<String>,
    consumed: Vec<ConsumedItem>,
    fled: bool,
    awaiting: Option<CombatantId>,
    result: Option<CombatResult>,
}

impl Encounter {
    /// Create an encounter with default rules and [`RandomTarget`] hostiles.
    pub fn new(dice: DiceEngine) -> Self {
        let config = EncounterConfig::default();
        Self {
            dice,
            resolver: ActionResolver::new(&config),
            config,
            policy: Box::new(RandomTarget),
            state: EncounterState::NotStarted,
            world: Battlefield::default(),
            order: TurnOrder::default(),
            round: 0,
            log: Vec::new(),
            consumed: Vec::new(),
            fled: false,
            awaiting: None,
            result: None,
        }
    }

    pub fn with_config(mut self, config: EncounterConfig) -> Self {
        self.resolver = ActionResolver::new(&config);
        self.config = config;
        self
    }

    pub fn with_policy(mut self, policy: impl HostilePolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn state(&self) -> EncounterState {
        self.state
    }

    pub fn world(&self) -> &Battlefield {
        &self.world
    }

    pub fn config(&self) -> &EncounterConfig {
        &self.config
    }

    pub fn turn_order(&self) -> &TurnOrder {
        &self.order
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The party member the encounter is waiting on, if any.
    pub fn awaiting(&self) -> Option<CombatantId> {
        self.awaiting
    }

    /// The result, once resolved.
    pub fn result(&self) -> Option<&CombatResult> {
        self.result.as_ref()
    }

    /// Validate both sides, roll initiative and open round 1.
    pub fn start(
        &mut self,
        party: Vec<Combatant>,
        hostiles: Vec<Combatant>,
    ) -> Result<(), EncounterError> {
        match self.state {
            EncounterState::NotStarted => {}
            EncounterState::Resolved(_) => return Err(EncounterError::AlreadyResolved),
            _ => return Err(EncounterError::AlreadyStarted),
        }
        if let Err(reason) = self.config.validate() {
            return Err(EncounterError::InvalidConfig(reason));
        }
        validate_roster(&party, &hostiles)?;

        self.world = Battlefield::new(party, hostiles);
        self.state = EncounterState::Initiative;
        self.push_log(format!(
            "Combat begins: {} vs {}!",
            names(&self.world, Side::Party),
            names(&self.world, Side::Hostile)
        ));

        self.order = TurnOrder::compute(&mut self.dice, &self.world);
        let order = self.order.describe(&self.world);
        self.push_log(format!("Initiative order: {order}"));
        info!(combatants = self.world.len(), %order, "encounter started");

        self.round = 1;
        self.state = EncounterState::RoundInProgress;
        self.push_log("--- Round 1 ---");
        Ok(())
    }

    /// Run hostile turns until a party member must act or the encounter ends.
    pub fn advance(&mut self) -> Result<Step, EncounterError> {
        self.ensure_in_progress()?;
        if let Some(id) = self.awaiting {
            return Ok(Step::AwaitingAction(id));
        }
        if self.round > self.config.max_rounds {
            return Err(EncounterError::RoundLimitExceeded(self.config.max_rounds));
        }

        loop {
            match self.order.next_turn(&self.world) {
                TurnSlot::Halted(side) => {
                    let fallback = match side {
                        Side::Party => Outcome::Defeat,
                        Side::Hostile => Outcome::Victory,
                    };
                    let outcome = self.check_outcome().unwrap_or(fallback);
                    return Ok(Step::Resolved(self.conclude(outcome)));
                }
                TurnSlot::RoundComplete => {
                    self.upkeep();
                    if let Some(outcome) = self.check_outcome() {
                        return Ok(Step::Resolved(self.conclude(outcome)));
                    }
                    self.round += 1;
                    if self.round > self.config.max_rounds {
                        return Err(EncounterError::RoundLimitExceeded(self.config.max_rounds));
                    }
                    self.order.start_round(&self.world);
                    debug!(round = self.round, "new round");
                    self.push_log(format!("--- Round {} ---", self.round));
                }
                TurnSlot::Actor(id) => {
                    self.begin_turn(id);
                    let side = self.world.get(id).map(|c| c.side);
                    if side == Some(Side::Party) {
                        self.awaiting = Some(id);
                        return Ok(Step::AwaitingAction(id));
                    }

                    let action = self.policy.choose_action(id, &self.world, &mut self.dice);
                    let resolution = self.resolve(id, &action)?;
                    self.apply(resolution);
                    if let Some(outcome) = self.check_outcome() {
                        return Ok(Step::Resolved(self.conclude(outcome)));
                    }
                }
            }
        }
    }

    /// Resolve the action of the party member being waited on.
    ///
    /// On an error the encounter keeps waiting for the same actor, so a
    /// corrected action can be submitted.
    pub fn submit(&mut self, action: CombatAction) -> Result<Step, EncounterError> {
        self.ensure_in_progress()?;
        let actor = self.awaiting.ok_or(EncounterError::NotAwaitingAction)?;

        let resolution = self.resolve(actor, &action)?;
        self.awaiting = None;
        self.apply(resolution);

        match self.check_outcome() {
            Some(outcome) => Ok(Step::Resolved(self.conclude(outcome))),
            None => self.advance(),
        }
    }

    /// Drive a started encounter to the end, asking `controller` for every
    /// party action.
    pub fn run(
        &mut self,
        controller: &mut dyn PartyController,
    ) -> Result<CombatResult, EncounterError> {
        let mut step = self.advance()?;
        loop {
            match step {
                Step::Resolved(result) => return Ok(result),
                Step::AwaitingAction(id) => {
                    let action = controller.choose_action(id, &self.world);
                    step = self.submit(action)?;
                }
            }
        }
    }

    fn ensure_in_progress(&self) -> Result<(), EncounterError> {
        match self.state {
            EncounterState::RoundInProgress => Ok(()),
            EncounterState::Resolved(_) => Err(EncounterError::AlreadyResolved),
            EncounterState::NotStarted | EncounterState::Initiative => {
                Err(EncounterError::NotStarted)
            }
        }
    }

    fn resolve(
        &mut self,
        actor: CombatantId,
        action: &CombatAction,
    ) -> Result<Resolution, ActionError> {
        let resolver = &self.resolver;
        resolver.resolve(&mut self.dice, &self.world, actor, action)
    }

    fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    fn begin_turn(&mut self, id: CombatantId) {
        let Some(combatant) = self.world.get_mut(id) else {
            return;
        };
        let expired = combatant.begin_turn();
        let name = combatant.name.clone();
        for effect in expired {
            self.push_log(format!("{name}'s {} ends.", effect.name));
        }
    }

    fn apply(&mut self, resolution: Resolution) {
        apply_effects(&mut self.world, &resolution.effects);
        for effect in &resolution.effects {
            match effect {
                Effect::ItemConsumed { owner, item } => {
                    let owner = self.world.name_of(*owner).to_string();
                    self.consumed.push(ConsumedItem {
                        owner,
                        item: item.clone(),
                    });
                }
                Effect::FleeAttempted { success: true, .. } => self.fled = true,
                _ => {}
            }
        }
        self.log.extend(resolution.log);
    }

    /// Round-end processing: per-round hit point changes, then effect timers.
    fn upkeep(&mut self) {
        let ids: Vec<CombatantId> = self.world.ids().collect();
        for id in ids {
            let Some(combatant) = self.world.get_mut(id) else {
                continue;
            };
            if combatant.is_incapacitated() {
                continue;
            }

            let mut lines = Vec::new();
            let change = combatant.per_round_hit_point_change();
            if change < 0 {
                combatant.apply_damage(change.unsigned_abs());
                lines.push(format!(
                    "{} takes {} damage from lingering effects.",
                    combatant.name,
                    change.unsigned_abs()
                ));
                if combatant.is_incapacitated() {
                    lines.push(format!("{} falls!", combatant.name));
                }
            } else if change > 0 && combatant.hit_points() < combatant.max_hit_points() {
                let before = combatant.hit_points();
                let after = combatant.apply_healing(change.unsigned_abs());
                lines.push(format!("{} regenerates {} HP.", combatant.name, after - before));
            }

            for effect in combatant.tick_status_effects() {
                lines.push(format!("{}'s {} wears off.", combatant.name, effect.name));
            }
            self.log.extend(lines);
        }
    }

    /// Party wiped is checked first, so a mutual wipe is a defeat.
    fn check_outcome(&self) -> Option<Outcome> {
        if self.world.is_wiped(Side::Party) {
            Some(Outcome::Defeat)
        } else if self.world.is_wiped(Side::Hostile) {
            Some(Outcome::Victory)
        } else if self.fled {
            Some(Outcome::Fled)
        } else {
            None
        }
    }

    fn conclude(&mut self, outcome: Outcome) -> CombatResult {
        self.awaiting = None;
        self.state = EncounterState::Resolved(outcome);

        let mut loot = Vec::new();
        let rewards = match outcome {
            Outcome::Victory => self.roll_rewards(&mut loot),
            Outcome::Defeat | Outcome::Fled => Rewards::default(),
        };

        match outcome {
            Outcome::Victory => {
                self.push_log(format!(
                    "Victory! The party earns {} XP and {} gold.",
                    rewards.experience, rewards.gold
                ));
                if !loot.is_empty() {
                    self.push_log(format!("Loot: {}", loot.join(", ")));
                }
            }
            Outcome::Defeat => self.push_log("Defeat. The party has fallen."),
            Outcome::Fled => self.push_log("The party escapes. No rewards are earned."),
        }
        info!(
            %outcome,
            rounds = self.round,
            xp = rewards.experience,
            gold = rewards.gold,
            "encounter resolved"
        );

        let result = CombatResult {
            outcome,
            experience: rewards.experience,
            gold: rewards.gold,
            loot,
            log: self.log.clone(),
            rounds: self.round,
            combatants: self.world.combatants().to_vec(),
            consumed_items: self.consumed.clone(),
        };
        self.result = Some(result.clone());
        result
    }

    /// XP summed over hostiles and gold rolled per hostile, both saturating.
    /// Each loot entry is an independent percentile trial.
    fn roll_rewards(&mut self, loot: &mut Vec<String>) -> Rewards {
        let mut rewards = Rewards::default();
        for combatant in self.world.combatants() {
            if combatant.side != Side::Hostile {
                continue;
            }
            let bounty = &combatant.bounty;
            let gold = self.dice.roll_range(bounty.gold_min, bounty.gold_max);
            rewards.experience = rewards.experience.saturating_add(bounty.experience);
            rewards.gold = rewards.gold.saturating_add(gold);
            for entry in &bounty.loot {
                if self.dice.roll_percentile().total <= entry.chance_percent as i32 {
                    loot.push(entry.item.clone());
                }
            }
        }
        rewards
    }
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("state", &self.state)
            .field("round", &self.round)
            .field("world", &self.world)
            .field("awaiting", &self.awaiting)
            .finish_non_exhaustive()
    }
}

fn validate_roster(party: &[Combatant], hostiles: &[Combatant]) -> Result<(), EncounterError> {
    if party.is_empty() {
        return Err(EncounterError::EmptySide(Side::Party));
    }
    if hostiles.is_empty() {
        return Err(EncounterError::EmptySide(Side::Hostile));
    }

    let mut seen = HashSet::new();
    for combatant in party.iter().chain(hostiles) {
        if combatant.name.trim().is_empty() {
            return Err(EncounterError::InvalidCombatant {
                name: combatant.name.clone(),
                reason: "name must not be empty".to_string(),
            });
        }
        if combatant.max_hit_points() <= 0 {
            return Err(EncounterError::InvalidCombatant {
                name: combatant.name.clone(),
                reason: format!(
                    "maximum hit points must be positive, got {}",
                    combatant.max_hit_points()
                ),
            });
        }
        if !seen.insert(combatant.name.to_lowercase()) {
            return Err(EncounterError::DuplicateName(combatant.name.clone()));
        }
    }
    Ok(())
}

fn names(world: &Battlefield, side: Side) -> String {
    world
        .side(side)
        .map(|(_, c)| c.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{Autopilot, FocusWeakest, ScriptedController};
    use crate::catalog::get_item;
    use crate::combatant::{Bounty, Stat, StatusEffect};
    use crate::testing::{sample_fighter, sample_goblin, ScriptedDice};

    const FIGHTER: CombatantId = CombatantId(0);
    const GOBLIN: CombatantId = CombatantId(1);

    fn fresh(dice: ScriptedDice) -> Encounter {
        Encounter::new(DiceEngine::new(dice)).with_policy(FocusWeakest)
    }

    fn duel() -> (Vec<Combatant>, Vec<Combatant>) {
        (
            vec![sample_fighter("Fighter")],
            vec![sample_goblin("Goblin")],
        )
    }

    fn started(dice: ScriptedDice) -> Encounter {
        let mut encounter = fresh(dice);
        let (party, hostiles) = duel();
        encounter.start(party, hostiles).unwrap();
        encounter
    }

    fn logged(encounter: &Encounter, text: &str) -> bool {
        encounter.log().iter().any(|l| l.contains(text))
    }

    fn fighter_hp(encounter: &Encounter) -> i32 {
        encounter
            .world()
            .get(FIGHTER)
            .map_or(0, Combatant::hit_points)
    }

    #[test]
    fn test_start_validation() {
        let mut encounter = Encounter::new(DiceEngine::seeded(1));
        assert_eq!(
            encounter.start(vec![], vec![sample_goblin("Goblin")]),
            Err(EncounterError::EmptySide(Side::Party))
        );
        assert_eq!(
            encounter.start(vec![sample_fighter("Fighter")], vec![]),
            Err(EncounterError::EmptySide(Side::Hostile))
        );
        assert_eq!(
            encounter.start(vec![sample_fighter("Twin")], vec![sample_goblin("twin")]),
            Err(EncounterError::DuplicateName("twin".to_string()))
        );

        let downed = vec![sample_fighter("Fighter").with_hit_points(0)];
        assert_eq!(encounter.start(downed, vec![sample_goblin("G")]), Ok(()));

        let (party, hostiles) = duel();
        assert_eq!(
            encounter.start(party, hostiles),
            Err(EncounterError::AlreadyStarted)
        );
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EncounterConfig::new().with_max_rounds(0);
        let mut encounter = Encounter::new(DiceEngine::seeded(1)).with_config(config);
        let (party, hostiles) = duel();
        let err = encounter.start(party, hostiles).unwrap_err();
        assert!(matches!(err, EncounterError::InvalidConfig(_)));
    }

    #[test]
    fn test_not_started() {
        let mut encounter = Encounter::new(DiceEngine::seeded(1));
        assert_eq!(encounter.advance(), Err(EncounterError::NotStarted));
        assert_eq!(
            encounter.submit(CombatAction::Defend),
            Err(EncounterError::NotStarted)
        );
    }

    #[test]
    fn test_fighter_kills_goblin_in_one_round() {
        let mut encounter = started(ScriptedDice::always(5).with_sides(20, 15));
        assert_eq!(encounter.advance(), Ok(Step::AwaitingAction(FIGHTER)));
        // Asking again does not skip the turn
        assert_eq!(encounter.advance(), Ok(Step::AwaitingAction(FIGHTER)));

        let step = encounter.submit(CombatAction::melee(GOBLIN)).unwrap();
        let Step::Resolved(result) = step else {
            panic!("expected resolution");
        };
        assert_eq!(result.outcome, Outcome::Victory);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.experience, 50);
        // 2 + 5 - 1
        assert_eq!(result.gold, 6);
        assert_eq!(result.loot, vec!["Rusty Dagger".to_string()]);
        assert_eq!(result.combatants[1].hit_points(), 0);
        assert_eq!(
            encounter.state(),
            EncounterState::Resolved(Outcome::Victory)
        );
        assert_eq!(encounter.advance(), Err(EncounterError::AlreadyResolved));
    }

    #[test]
    fn test_invalid_target_keeps_waiting() {
        let mut encounter = started(ScriptedDice::always(5).with_sides(20, 15));
        encounter.advance().unwrap();
        let err = encounter.submit(CombatAction::melee(FIGHTER)).unwrap_err();
        assert!(matches!(
            err,
            EncounterError::Action(ActionError::InvalidTarget { .. })
        ));
        assert_eq!(encounter.awaiting(), Some(FIGHTER));
        assert!(matches!(
            encounter.submit(CombatAction::melee(GOBLIN)),
            Ok(Step::Resolved(_))
        ));
    }

    #[test]
    fn test_submit_without_waiting_party_member() {
        let mut encounter = started(ScriptedDice::maximum());
        assert_eq!(
            encounter.submit(CombatAction::Defend),
            Err(EncounterError::NotAwaitingAction)
        );
    }

    #[test]
    fn test_defeat_awards_nothing() {
        let mut encounter = fresh(ScriptedDice::maximum());
        encounter
            .start(
                vec![sample_fighter("Fighter").with_hit_points(1)],
                vec![sample_goblin("Goblin").with_initiative_modifier(5)],
            )
            .unwrap();
        let Step::Resolved(result) = encounter.advance().unwrap() else {
            panic!("expected resolution");
        };
        assert_eq!(result.outcome, Outcome::Defeat);
        assert_eq!(result.experience, 0);
        assert_eq!(result.gold, 0);
        assert!(result.loot.is_empty());
    }

    #[test]
    fn test_mutual_wipe_is_defeat() {
        let poison = StatusEffect::permanent("Poisoned", Stat::HitPointsPerRound, -1);
        let fighter = sample_fighter("Fighter")
            .with_hit_points(1)
            .with_status_effect(poison.clone());
        let goblin = sample_goblin("Goblin")
            .with_hit_points(1)
            .with_status_effect(poison);
        let mut encounter = fresh(ScriptedDice::always(2));
        encounter.start(vec![fighter], vec![goblin]).unwrap();
        let result = encounter.run(&mut Autopilot).unwrap();
        assert_eq!(result.outcome, Outcome::Defeat);
        assert_eq!(result.rounds, 1);
        assert_eq!(result.experience, 0);
        assert!(result.combatants.iter().all(Combatant::is_incapacitated));
    }

    #[test]
    fn test_flee_ends_without_rewards() {
        let mut encounter = started(ScriptedDice::always(15));
        let mut controller = ScriptedController::new([CombatAction::Flee]);
        let result = encounter.run(&mut controller).unwrap();
        assert_eq!(result.outcome, Outcome::Fled);
        assert_eq!((result.experience, result.gold), (0, 0));
        assert!(result.loot.is_empty());
    }

    #[test]
    fn test_defend_expires_on_next_turn() {
        // Everyone misses
        let mut encounter = started(ScriptedDice::always(2));
        encounter.advance().unwrap();
        encounter.submit(CombatAction::Defend).unwrap();
        assert!(logged(
            &encounter,
            "misses Fighter with a melee attack (roll 3 vs AC 17)"
        ));
        assert_eq!(encounter.awaiting(), Some(FIGHTER));
        assert_eq!(encounter.round(), 2);
        let armor = encounter.world().get(FIGHTER).unwrap().effective_armor_class();
        assert_eq!(armor, 15);
        assert!(logged(&encounter, "Fighter's Defending ends."));
    }

    #[test]
    fn test_round_limit() {
        let config = EncounterConfig::new().with_max_rounds(3);
        let mut encounter = fresh(ScriptedDice::always(2)).with_config(config);
        let (party, hostiles) = duel();
        encounter.start(party, hostiles).unwrap();
        let mut controller = ScriptedController::new(vec![CombatAction::Defend; 10]);
        let err = encounter.run(&mut controller).unwrap_err();
        assert_eq!(err, EncounterError::RoundLimitExceeded(3));
        assert_eq!(
            encounter.advance(),
            Err(EncounterError::RoundLimitExceeded(3))
        );
    }

    #[test]
    fn test_consumed_items_recorded() {
        let mut encounter = started(ScriptedDice::always(15));
        encounter.advance().unwrap();
        let potion = get_item("Potion of Healing").unwrap();
        encounter
            .submit(CombatAction::use_item(potion, FIGHTER))
            .unwrap();
        let result = encounter.run(&mut Autopilot).unwrap();
        assert_eq!(
            result.consumed_items,
            vec![ConsumedItem {
                owner: "Fighter".to_string(),
                item: "Potion of Healing".to_string(),
            }]
        );
    }

    #[test]
    fn test_full_range_gold_bounty() {
        let mut encounter = fresh(ScriptedDice::always(5).with_sides(20, 15));
        let goblin = sample_goblin("Goblin").with_bounty(Bounty::new(50, 0, u32::MAX));
        encounter
            .start(vec![sample_fighter("Fighter")], vec![goblin])
            .unwrap();
        let result = encounter.run(&mut Autopilot).unwrap();
        assert_eq!(result.outcome, Outcome::Victory);
        // 0 + 5 - 1
        assert_eq!(result.gold, 4);
    }

    #[test]
    fn test_reward_totals_saturate() {
        let bounty = Bounty::new(u32::MAX, 0, u32::MAX);
        let party = vec![sample_fighter("Fighter")];
        let hostiles = vec![
            sample_goblin("Snik").with_bounty(bounty.clone()),
            sample_goblin("Grub").with_bounty(bounty),
        ];
        let mut encounter = fresh(ScriptedDice::maximum());
        encounter.start(party, hostiles).unwrap();
        let result = encounter.run(&mut Autopilot).unwrap();
        assert_eq!(result.outcome, Outcome::Victory);
        assert_eq!(result.experience, u32::MAX);
        assert_eq!(result.gold, u32::MAX);
    }

    #[test]
    fn test_regeneration_heals_at_round_end_up_to_max() {
        let vigor = StatusEffect::for_rounds("Vigor", Stat::HitPointsPerRound, 2, 3);
        let fighter = sample_fighter("Fighter")
            .with_hit_points(17)
            .with_status_effect(vigor);
        let mut encounter = fresh(ScriptedDice::always(2));
        encounter
            .start(vec![fighter], vec![sample_goblin("Goblin")])
            .unwrap();
        encounter.advance().unwrap();

        encounter.submit(CombatAction::Defend).unwrap();
        assert_eq!(encounter.round(), 2);
        assert_eq!(fighter_hp(&encounter), 19);
        assert!(logged(&encounter, "Fighter regenerates 2 HP."));

        encounter.submit(CombatAction::Defend).unwrap();
        assert_eq!(fighter_hp(&encounter), 20);
        assert!(logged(&encounter, "Fighter regenerates 1 HP."));

        // Already at full health, so nothing is logged
        encounter.submit(CombatAction::Defend).unwrap();
        assert!(logged(&encounter, "Fighter's Vigor wears off."));
        let regenerated = encounter
            .log()
            .iter()
            .filter(|l| l.contains("regenerates"))
            .count();
        assert_eq!(regenerated, 2);
    }

    #[test]
    fn test_elixir_of_vigor_regenerates() {
        let mut encounter = fresh(ScriptedDice::always(2));
        let fighter = sample_fighter("Fighter").with_hit_points(10);
        encounter
            .start(vec![fighter], vec![sample_goblin("Goblin")])
            .unwrap();
        encounter.advance().unwrap();

        let drink = CombatAction::use_item(get_item("Elixir of Vigor").unwrap(), FIGHTER);
        encounter.submit(drink).unwrap();
        assert_eq!(fighter_hp(&encounter), 12);
        assert!(logged(&encounter, "Fighter regenerates 2 HP."));
    }
}
