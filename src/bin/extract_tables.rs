//! Extract fields and tables from an OCR document
//!
//! Usage:
//!   cargo run --release --bin extract_tables -- <document.json> <rules.json>
//!   cargo run --release --bin extract_tables -- <document.json> <rules.json> --pretty
//!
//! Set `RUST_LOG=debug` to see per-rule statistics.

use ocr_tables::config::RuleSet;
use ocr_tables::document::Document;
use std::path::PathBuf;
use std::process;

struct CliConfig {
    document: PathBuf,
    rules: PathBuf,
    pretty: bool,
}

impl CliConfig {
    fn from_args() -> Result<Self, String> {
        let args: Vec<String> = std::env::args().collect();
        let mut positional = Vec::new();
        let mut pretty = false;

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--pretty" | "-p" => {
                    pretty = true;
                },
                "--help" | "-h" => {
                    return Err(usage());
                },
                flag if flag.starts_with('-') => {
                    return Err(format!("unknown option {}\n{}", flag, usage()));
                },
                path => positional.push(PathBuf::from(path)),
            }
            i += 1;
        }

        match <[PathBuf; 2]>::try_from(positional) {
            Ok([document, rules]) => Ok(Self {
                document,
                rules,
                pretty,
            }),
            Err(_) => Err(usage()),
        }
    }
}

fn usage() -> String {
    "Usage: extract_tables <document.json> <rules.json> [--pretty]".to_string()
}

fn run(config: &CliConfig) -> ocr_tables::Result<String> {
    let document = Document::from_json(&std::fs::read_to_string(&config.document)?)?;
    log::info!(
        "loaded {} tokens from {}",
        document.grid.len(),
        config.document.display()
    );

    let rules = RuleSet::from_path(&config.rules)?.compile(&document.page)?;
    rules.apply(&document).to_json(config.pretty)
}

fn main() {
    env_logger::init();

    let config = match CliConfig::from_args() {
        Ok(config) => config,
        Err(message) => {
            eprintln!("{}", message);
            process::exit(2);
        },
    };

    match run(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        },
    }
}
