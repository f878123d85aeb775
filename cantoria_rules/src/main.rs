// CLI entry point for the chorale validator.
//
// Reads a progression as JSON from a file or stdin and prints every
// voice-leading violation found. Input format:
//
//   {
//     "key": "C major",
//     "chords": [
//       {"S": "G4", "A": "E4", "T": "C4", "B": "C3",
//        "root": "C", "quality": "major", "degree": "I"},
//       ...
//     ]
//   }
//
// A bare JSON array of chord objects is accepted too.
//
// Usage:
//   validate [OPTIONS] [FILE]
//     --key <KEY>        Override the key (e.g. "C major", "a minor")
//     --disable <RULE>   Disable a rule by name (repeatable)
//     --json             Emit raw violations as JSON instead of text

use std::io::Read;

use cantoria_rules::{Context, RulesEngine};
use cantoria_theory::ChordInput;
use serde::Deserialize;

#[derive(Deserialize)]
struct ProgressionFile {
    key: Option<String>,
    chords: Vec<ChordInput>,
}

// Either the full {key, chords} document or a bare chord array.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProgressionInput {
    File(ProgressionFile),
    Chords(Vec<ChordInput>),
}

impl ProgressionInput {
    fn into_parts(self) -> (Option<String>, Vec<ChordInput>) {
        match self {
            ProgressionInput::File(f) => (f.key, f.chords),
            ProgressionInput::Chords(chords) => (None, chords),
        }
    }
}

struct Options {
    file: Option<String>,
    key: Option<String>,
    disabled: Vec<String>,
    json: bool,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let options = parse_args();

    let raw = match read_input(options.file.as_deref()) {
        Ok(raw) => raw,
        Err(e) => {
            eprintln!("Failed to read input: {e}");
            std::process::exit(1);
        }
    };

    let progression: ProgressionInput = match serde_json::from_str(&raw) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Invalid progression JSON: {e}");
            std::process::exit(1);
        }
    };
    let (file_key, chords) = progression.into_parts();

    let key_str = options.key.or(file_key);
    let key = match key_str.as_deref() {
        Some(k) => match k.parse() {
            Ok(key) => Some(key),
            Err(e) => {
                eprintln!("Invalid key '{k}': {e}");
                std::process::exit(1);
            }
        },
        None => None,
    };

    let mut engine = RulesEngine::with_default_rules();
    for name in &options.disabled {
        engine.disable_rule(name);
    }

    let ctx = Context { key };
    let violations = engine.validate(&chords, &ctx);

    if options.json {
        match serde_json::to_string_pretty(&violations) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Failed to serialize violations: {e}");
                std::process::exit(1);
            }
        }
    } else {
        let display = engine.format_for_display(&violations);
        if display.is_empty() {
            println!("No voice-leading errors found.");
        } else {
            println!("{} error(s) found:", display.len());
            for error in &display {
                println!("  {} [{}%, {}]", error.message, error.confidence, error.rule);
            }
        }
    }

    if !violations.is_empty() {
        std::process::exit(2);
    }
}

fn read_input(file: Option<&str>) -> std::io::Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Parse command-line arguments. Uses simple `std::env::args()` matching —
/// no clap dependency.
fn parse_args() -> Options {
    let mut options = Options {
        file: None,
        key: None,
        disabled: Vec::new(),
        json: false,
    };
    let args: Vec<String> = std::env::args().collect();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "--key" => {
                i += 1;
                match args.get(i) {
                    Some(k) => options.key = Some(k.clone()),
                    None => {
                        eprintln!("--key requires a value");
                        std::process::exit(1);
                    }
                }
            }
            "--disable" => {
                i += 1;
                match args.get(i) {
                    Some(name) => options.disabled.push(name.clone()),
                    None => {
                        eprintln!("--disable requires a rule name");
                        std::process::exit(1);
                    }
                }
            }
            "--json" => {
                options.json = true;
            }
            "--help" | "-h" => {
                print_usage();
                std::process::exit(0);
            }
            other if !other.starts_with('-') && options.file.is_none() => {
                options.file = Some(other.to_string());
            }
            other => {
                eprintln!("Unknown argument: {other}");
                print_usage();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    options
}

fn print_usage() {
    println!("Usage: validate [OPTIONS] [FILE]");
    println!();
    println!("Reads a chord progression as JSON from FILE or stdin and reports");
    println!("voice-leading errors.");
    println!();
    println!("Options:");
    println!("  --key <KEY>        Override the key (e.g. \"C major\", \"a minor\")");
    println!("  --disable <RULE>   Disable a rule by name (repeatable)");
    println!("  --json             Emit raw violations as JSON instead of text");
    println!("  --help, -h         Show this help");
}
