use std::env;
use std::fs;
use std::process;

use harmonic_drill::{build_options, format_chord_string, load_exercise};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: harmonic-drill <exercise.yaml> [seed]");
        eprintln!("       harmonic-drill --close-lures <exercise.yaml> [seed]");
        process::exit(1);
    }

    let mut close_lures = false;
    let mut input_path = &args[1];
    let mut seed_arg = args.get(2);

    // Parse flags
    if args[1] == "--close-lures" {
        close_lures = true;
        if args.len() < 3 {
            eprintln!("Usage: harmonic-drill --close-lures <exercise.yaml> [seed]");
            process::exit(1);
        }
        input_path = &args[2];
        seed_arg = args.get(3);
    }

    let seed = match seed_arg {
        Some(raw) => match raw.parse::<u32>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                eprintln!("Invalid seed '{}': expected a non-negative integer", raw);
                process::exit(1);
            }
        },
        None => None,
    };

    // Read input file
    let source = match fs::read_to_string(input_path) {
        Ok(content) => content,
        Err(e) => {
            eprintln!("Error reading file '{}': {}", input_path, e);
            process::exit(1);
        }
    };

    let exercise = match load_exercise(&source) {
        Ok(exercise) => exercise,
        Err(e) => {
            eprintln!("Exercise error: {}", e);
            process::exit(1);
        }
    };

    match exercise.difficulty() {
        Some(difficulty) => println!("difficulty: {}", difficulty),
        None => println!("difficulty: unrated"),
    }

    let chords = exercise.chords();
    for (index, checkpoint) in exercise.checkpoints.iter().enumerate() {
        let label = match format_chord_string(&checkpoint.chord) {
            Some(label) => label,
            None => continue,
        };
        let options = build_options(&checkpoint.chord, &chords, close_lures, seed);
        println!("[{:>7.2}s] {}  ->  {}", checkpoint.time, label, options.join(" | "));
    }
}
