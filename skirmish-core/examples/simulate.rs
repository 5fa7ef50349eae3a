//! Play many seeded encounters and report how often the party wins.
//!
//! Run with: `cargo run -p skirmish-core --example simulate -- 500`

use skirmish_core::ai::{Autopilot, FocusWeakest};
use skirmish_core::testing::{sample_fighter, sample_goblin};
use skirmish_core::{DiceEngine, Encounter, Outcome};

fn main() {
    let runs: u64 = std::env::args()
        .nth(1)
        .and_then(|n| n.parse().ok())
        .unwrap_or(200);

    let (mut victories, mut defeats, mut rounds) = (0, 0, 0);
    for seed in 0..runs {
        let mut encounter = Encounter::new(DiceEngine::seeded(seed)).with_policy(FocusWeakest);
        let party = vec![sample_fighter("Roland")];
        let hostiles = vec![
            sample_goblin("Snik"),
            sample_goblin("Grub"),
            sample_goblin("Nix"),
            sample_goblin("Zug"),
        ];
        if let Err(e) = encounter.start(party, hostiles) {
            eprintln!("seed {seed}: {e}");
            continue;
        }

        match encounter.run(&mut Autopilot) {
            Ok(result) => {
                rounds += result.rounds as u64;
                match result.outcome {
                    Outcome::Victory => victories += 1,
                    Outcome::Defeat => defeats += 1,
                    Outcome::Fled => {}
                }
            }
            Err(e) => eprintln!("seed {seed}: {e}"),
        }
    }

    println!("=== One fighter vs four goblins, {runs} fights ===");
    println!("Victories: {victories}");
    println!("Defeats:   {defeats}");
    if runs > 0 {
        println!("Average rounds: {:.1}", rounds as f64 / runs as f64);
    }
}
