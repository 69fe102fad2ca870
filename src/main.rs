//! GIRO batch file inspector
//!
//! Decodes a batch file, checks its account hash total and prints one CSV
//! line per payment instruction.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- batch.txt > details.csv
//! cargo run -- batch.txt --no-verify > details.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info`, `debug` or `warn` to control logging verbosity

use giro_batch::{load_with, report, GiroError, Result, SerializerConfig};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().skip(1).collect();

    let mut input_path = None;
    let mut config = SerializerConfig::default();
    for arg in &args {
        match arg.as_str() {
            "--no-verify" => config = config.with_verify_hash(false),
            path => input_path = Some(path),
        }
    }
    let input_path = input_path.ok_or(GiroError::MissingArgument)?;

    let file = File::open(input_path)?;
    let batch = load_with(BufReader::new(file), &config)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    report::write_summary(&batch, handle)?;

    Ok(())
}
