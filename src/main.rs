//! Tally - a line-oriented spreadsheet with incremental formula propagation

mod config;
mod repl;

use anyhow::Context;
use log::debug;
use std::env;
use std::io;
use std::path::PathBuf;
use tally_core::Sheet;

fn print_usage() {
    eprintln!("Usage: tally [OPTIONS] [FILE]");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  [FILE]                    Saved sheet to load at start-up");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  -c, --config <FILE>       Load settings from this TOML file");
    eprintln!("  -h, --help                Print help");
    eprintln!();
    eprintln!("Set RUST_LOG=debug to trace edits and propagation on stderr.");
}

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    let mut file_path: Option<PathBuf> = None;
    let mut config_file: Option<PathBuf> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                return;
            }
            "-c" | "--config" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a file path");
                    std::process::exit(1);
                }
                config_file = Some(PathBuf::from(&args[i]));
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                print_usage();
                std::process::exit(1);
            }
            _ => {
                if file_path.is_none() {
                    file_path = Some(PathBuf::from(&args[i]));
                } else {
                    eprintln!("Error: Unexpected argument: {}", args[i]);
                    print_usage();
                    std::process::exit(1);
                }
            }
        }
        i += 1;
    }

    let (config, warnings) = config::load_config(config_file.as_deref());
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }

    if let Err(e) = run(file_path, config) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(file_path: Option<PathBuf>, config: config::Config) -> anyhow::Result<()> {
    let sheet = match file_path {
        Some(path) => Sheet::load(&path)
            .with_context(|| format!("Failed to load '{}'", path.display()))?,
        None => Sheet::new(),
    };

    let mut session = repl::Session::new(sheet, config);
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    session
        .run(stdin.lock(), &mut stdout)
        .context("Failed to run command loop")?;
    debug!("session ended with {} cell(s)", session.sheet().len());
    Ok(())
}
