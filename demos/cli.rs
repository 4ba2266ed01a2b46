//! Minimal demonstration binary: `schema4-cli <schema.json> -i <instance.json>...`.
//!
//! Not part of the library's contract (see SPEC_FULL.md §1) — it exists so
//! the crate is runnable end-to-end in this workspace, the same way the
//! teacher crate ships its own `jsonschema` CLI binary alongside the library.
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;
use schema4::SchemaFactory;

#[derive(Parser)]
#[command(name = "schema4-cli")]
struct Cli {
    /// The JSON Schema to validate with (e.g. schema.json).
    schema: PathBuf,

    /// A JSON instance to validate (may be given multiple times).
    #[arg(short = 'i', long = "instance", required = true)]
    instances: Vec<PathBuf>,
}

fn read_json(path: &Path) -> serde_json::Result<serde_json::Value> {
    let file = File::open(path).unwrap_or_else(|err| {
        eprintln!("could not open '{}': {}", path.display(), err);
        process::exit(2);
    });
    serde_json::from_reader(BufReader::new(file))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let schema_json = match read_json(&cli.schema) {
        Ok(value) => value,
        Err(err) => {
            eprintln!("'{}' is not valid JSON: {}", cli.schema.display(), err);
            process::exit(2);
        }
    };

    let compiled = match SchemaFactory::get_instance().get_schema(schema_json) {
        Ok(compiled) => compiled,
        Err(err) => {
            eprintln!("schema is invalid: {}", err);
            process::exit(2);
        }
    };

    let mut all_valid = true;
    for instance_path in &cli.instances {
        let instance = match read_json(instance_path) {
            Ok(value) => value,
            Err(err) => {
                eprintln!("'{}' is not valid JSON: {}", instance_path.display(), err);
                all_valid = false;
                continue;
            }
        };
        let messages = compiled.validate_instance(&instance);
        let filename = instance_path.display();
        if messages.is_empty() {
            println!("{} - VALID", filename);
        } else {
            all_valid = false;
            println!("{} - INVALID. Errors:", filename);
            for (i, message) in messages.iter().enumerate() {
                println!("{}. [{}] {}: {}", i + 1, message.path, message.code, message.message);
            }
        }
    }

    if !all_valid {
        process::exit(1);
    }
}
