//! Line-oriented play on stdin/stdout.
//!
//! Each line is one command:
//! - `attack N`, `shoot N`, `defend`, `flee`
//! - `cast <spell> [N]`, `use <item> [N]`
//! - `#status`, `#help`, `#quit`
//!
//! `N` is a roster number as shown by `#status`, or a combatant name.

use anyhow::Result;
use skirmish_core::catalog::{get_item, get_spell};
use skirmish_core::{
    Battlefield, CombatAction, CombatResult, CombatantId, Encounter, EncounterError, Step,
};
use std::io::{self, BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Act(CombatAction),
    Status,
    Help,
    Quit,
    Nothing,
}

/// Play a started encounter, asking stdin for every party action.
///
/// Returns `None` if the player quits or input ends before the fight does.
pub fn run_interactive(encounter: &mut Encounter) -> Result<Option<CombatResult>> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut stdout = io::stdout();
    let mut printed = 0;

    println!("Commands: attack N, shoot N, defend, cast <spell> N, use <item> N, flee, #help");
    println!();

    let mut step = encounter.advance()?;
    loop {
        printed = print_new_lines(encounter.log(), printed);
        let actor = match step {
            Step::Resolved(result) => return Ok(Some(result)),
            Step::AwaitingAction(id) => id,
        };

        if let Some(combatant) = encounter.world().get(actor) {
            print!(
                "[TURN] {} (HP {}/{})> ",
                combatant.name,
                combatant.hit_points(),
                combatant.max_hit_points()
            );
        }
        stdout.flush().ok();

        let Some(line) = lines.next() else {
            println!();
            return Ok(None);
        };
        let line = line?;

        match parse_command(&line, encounter.world(), actor) {
            Ok(Command::Act(action)) => match encounter.submit(action) {
                Ok(next) => step = next,
                Err(EncounterError::Action(e)) => println!("[ERROR] {e}"),
                Err(e) => return Err(e.into()),
            },
            Ok(Command::Status) => print_status(encounter.world()),
            Ok(Command::Help) => print_commands(),
            Ok(Command::Quit) => {
                println!("Goodbye!");
                return Ok(None);
            }
            Ok(Command::Nothing) => {}
            Err(message) => println!("[ERROR] {message}"),
        }
    }
}

/// Print log lines from `from` onwards. Returns the new high-water mark.
pub fn print_new_lines(log: &[String], from: usize) -> usize {
    for line in log.iter().skip(from) {
        println!("{line}");
    }
    log.len()
}

pub fn print_status(world: &Battlefield) {
    println!("[STATUS]");
    for (id, combatant) in world.iter() {
        let effects: Vec<String> = combatant
            .status_effects()
            .iter()
            .map(|e| e.to_string())
            .collect();
        let state = if combatant.is_incapacitated() {
            " (down)"
        } else {
            ""
        };
        print!(
            "  {} {} [{}] HP {}/{} AC {}{}",
            id,
            combatant.name,
            combatant.side,
            combatant.hit_points(),
            combatant.max_hit_points(),
            combatant.effective_armor_class(),
            state
        );
        if effects.is_empty() {
            println!();
        } else {
            println!(" - {}", effects.join(", "));
        }
    }
}

fn print_commands() {
    println!("[HELP]");
    println!("  attack N         - Melee attack combatant N");
    println!("  shoot N          - Ranged attack combatant N");
    println!("  defend           - +AC until your next turn");
    println!("  cast <spell> [N] - Cast a spell, on yourself if N is omitted");
    println!("  use <item> [N]   - Use an item, on yourself if N is omitted");
    println!("  flee             - Try to escape with the whole party");
    println!("  #status          - Show every combatant");
    println!("  #quit            - Give up and exit");
}

/// Parse one input line for `actor`.
pub fn parse_command(
    line: &str,
    world: &Battlefield,
    actor: CombatantId,
) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Nothing);
    }

    if let Some(command) = line.strip_prefix('#') {
        return match command.trim().to_lowercase().as_str() {
            "status" => Ok(Command::Status),
            "help" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err("Unknown command. Type #help for help.".to_string()),
        };
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    let verb = words[0].to_lowercase();
    let rest = &words[1..];

    let action = match verb.as_str() {
        "attack" | "a" => CombatAction::melee(single_target(rest, world)?),
        "shoot" | "s" => CombatAction::ranged(single_target(rest, world)?),
        "defend" | "d" => CombatAction::Defend,
        "flee" | "run" => CombatAction::Flee,
        "cast" => {
            let (name, target) = named_with_target(rest, world, actor);
            let spell = get_spell(&name)
                .ok_or_else(|| format!("Unknown spell '{name}'"))?;
            CombatAction::cast(spell, target)
        }
        "use" => {
            let (name, target) = named_with_target(rest, world, actor);
            let item = get_item(&name)
                .ok_or_else(|| format!("Unknown item '{name}'"))?;
            CombatAction::use_item(item, target)
        }
        _ => return Err(format!("Unknown action '{}'. Type #help for help.", words[0])),
    };
    Ok(Command::Act(action))
}

fn single_target(words: &[&str], world: &Battlefield) -> Result<CombatantId, String> {
    if words.is_empty() {
        return Err("Which target? Give a number or a name.".to_string());
    }
    let text = words.join(" ");
    parse_target(&text, world)
        .ok_or_else(|| format!("No combatant '{text}'"))
}

/// Split `<name words> [target]`. Without a recognisable target the actor is
/// the target.
fn named_with_target(
    words: &[&str],
    world: &Battlefield,
    actor: CombatantId,
) -> (String, CombatantId) {
    if let Some((last, name)) = words.split_last() {
        if !name.is_empty() {
            if let Some(target) = parse_target(last, world) {
                return (name.join(" "), target);
            }
        }
    }
    (words.join(" "), actor)
}

/// A 1-based roster number, optionally prefixed with `#`, or a name.
fn parse_target(text: &str, world: &Battlefield) -> Option<CombatantId> {
    let number = text.trim_start_matches('#');
    match number.parse::<usize>() {
        Ok(n) if n >= 1 => Some(CombatantId(n - 1)),
        Ok(_) => None,
        Err(_) => world.find(text),
    }
}
