//! Terminal driver for the skirmish combat engine.
//!
//! Plays one encounter on stdin/stdout:
//!
//! ```bash
//! cargo run -p skirmish -- --seed 7
//! cargo run -p skirmish -- --encounter wolves.json --auto --save-result result.json
//! ```
//!
//! Diagnostics go to stderr and are controlled with `RUST_LOG`.

mod headless;
mod scenario;

use anyhow::{bail, Context, Result};
use scenario::EncounterFile;
use skirmish_core::ai::Autopilot;
use skirmish_core::{CombatResult, DiceEngine, Encounter};
use std::path::PathBuf;
use std::str::FromStr;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line options.
#[derive(Debug, Default)]
struct Options {
    encounter: Option<PathBuf>,
    seed: Option<u64>,
    auto: bool,
    save_result: Option<PathBuf>,
    help: bool,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let options = parse_args(&args)?;
    if options.help {
        print_help();
        return Ok(());
    }

    let file = match options.encounter {
        Some(ref path) => EncounterFile::load(path)?,
        None => EncounterFile::goblin_ambush()?,
    };

    let dice = match options.seed {
        Some(seed) => {
            info!(seed, "using seeded dice");
            DiceEngine::seeded(seed)
        }
        None => DiceEngine::from_entropy(),
    };

    let mut encounter = Encounter::new(dice).with_config(file.config.clone());
    encounter.start(file.party_combatants(), file.hostile_combatants())?;
    headless::print_status(encounter.world());
    println!();

    let result = if options.auto {
        let result = encounter.run(&mut Autopilot)?;
        headless::print_new_lines(&result.log, 0);
        Some(result)
    } else {
        headless::run_interactive(&mut encounter)?
    };

    let Some(result) = result else {
        return Ok(());
    };
    print_summary(&result);

    if let Some(path) = options.save_result {
        let json = serde_json::to_string_pretty(&result)?;
        std::fs::write(&path, json)
            .with_context(|| format!("writing result to {}", path.display()))?;
        println!("[SAVED] Result written to {}", path.display());
    }
    Ok(())
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--encounter" | "-e" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--encounter needs a file");
                };
                options.encounter = Some(PathBuf::from(path));
                i += 1;
            }
            "--seed" => {
                let Some(seed) = args.get(i + 1) else {
                    bail!("--seed needs a number");
                };
                options.seed = Some(parse_seed(seed)?);
                i += 1;
            }
            "--save-result" => {
                let Some(path) = args.get(i + 1) else {
                    bail!("--save-result needs a file");
                };
                options.save_result = Some(PathBuf::from(path));
                i += 1;
            }
            "--auto" => options.auto = true,
            "--help" | "-h" => options.help = true,
            other => bail!("unknown argument '{other}', see --help"),
        }
        i += 1;
    }

    Ok(options)
}

fn parse_seed(text: &str) -> Result<u64> {
    u64::from_str(text).with_context(|| format!("invalid seed '{text}'"))
}

fn print_summary(result: &CombatResult) {
    println!();
    println!(
        "[RESULT] {} after {} round{}",
        result.outcome,
        result.rounds,
        if result.rounds == 1 { "" } else { "s" }
    );
    println!("  XP: {}  Gold: {}", result.experience, result.gold);
    if !result.loot.is_empty() {
        println!("  Loot: {}", result.loot.join(", "));
    }
    for consumed in &result.consumed_items {
        println!("  {} used {}", consumed.owner, consumed.item);
    }
}

fn print_help() {
    println!("skirmish - turn-based combat in the terminal");
    println!();
    println!("USAGE:");
    println!("  skirmish [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("  -h, --help             Show this help message");
    println!("  -e, --encounter <FILE> Encounter JSON file (default: a goblin ambush)");
    println!("  --seed <N>             Seed the dice for a reproducible fight");
    println!("  --auto                 Let the party fight on its own");
    println!("  --save-result <FILE>   Write the combat result as JSON");
    println!();
    println!("EXAMPLES:");
    println!("  skirmish                          # Play the goblin ambush");
    println!("  skirmish --seed 7 --auto          # Watch a reproducible fight");
}
