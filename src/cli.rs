//! Statescope CLI - inspect automaton bundles and run inputs headlessly

mod automaton;
mod sim;

use std::env;
use std::path::Path;

use automaton::{display_symbol, load_file, Automaton};
use sim::{Outcome, Stepper};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        println!("Statescope CLI - Automaton Inspector");
        println!("Usage: statescope-cli <file.json> [input]");
        println!();
        println!("Example: statescope-cli demos/ends_in_bbb.json bbb");
        println!();
        println!("With an input string, runs it through each deterministic");
        println!("automaton in the bundle and reports the outcome.");
        return;
    }

    let path = Path::new(&args[1]);
    let input = args.get(2);

    match load_file(path) {
        Ok(automata) => {
            println!("✅ Loaded {} automaton/automata:", automata.len());
            for a in &automata {
                print_summary(a);
                if let Some(input) = input {
                    run_input(a, input);
                }
            }
        }
        Err(e) => {
            eprintln!("❌ Could not load '{}': {}", path.display(), e);
            std::process::exit(1);
        }
    }
}

fn print_summary(a: &Automaton) {
    println!();
    println!("  {} (starting state: {})", a.kind.label(), a.starting_state);
    println!("  States: {}", a.states.len());
    for state in &a.states {
        let mark = if state.is_terminating { " (accepting)" } else { "" };
        println!("    - {}{}", state.id, mark);
    }
    println!("  Transitions: {}", a.transitions.len());
    for t in &a.transitions {
        println!("    {} --> {} : {}", t.from, t.to, display_symbol(&t.symbol));
    }
    if let Err(errors) = a.validate() {
        for e in errors {
            println!("  ⚠ {}", e);
        }
    }
}

fn run_input(a: &Automaton, input: &str) {
    if !a.is_deterministic() {
        println!("  (nondeterministic, skipping simulation)");
        return;
    }
    let mut stepper = Stepper::default();
    if !stepper.start(a, input) {
        println!("  (empty input, nothing to run)");
        return;
    }
    match stepper.run_to_completion(a) {
        Some(Outcome::Matched) => println!(
            "  ✅ \"{}\" MATCHED (ended in {})",
            input,
            stepper.current_state().unwrap_or("?")
        ),
        Some(Outcome::Failed) => println!(
            "  ❌ \"{}\" FAILED after {} symbol(s)",
            input,
            stepper.cursor()
        ),
        None => println!("  ⚠ simulation did not finish"),
    }
}
