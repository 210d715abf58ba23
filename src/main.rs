use anyhow::{bail, Result};
use clap::Parser;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod commands;
mod game;
mod output;

use crate::commands::Command;
use crate::game::definition::quality::{self, Severity};
use crate::game::definition::SchoolStore;
use crate::game::settings::Settings;
use crate::game::Session;
use crate::output::console::ConsoleGameOutput;
use crate::output::{GameOutput, Message};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Guess the school from its anthem.
#[derive(Debug, Parser)]
#[command(name = "anthem-quiz", version)]
struct Args {
    /// School dataset (.csv or .json). Defaults to the bundled dataset.
    #[arg(long)]
    dataset: Option<PathBuf>,

    /// Settings file (.toml)
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Seed for question selection
    #[arg(long)]
    seed: Option<u64>,

    /// Start with map answers enabled
    #[arg(long)]
    map: bool,

    /// Check the dataset for problems and exit
    #[arg(long)]
    check: bool,
}

fn check_dataset(dataset: Option<&Path>) -> Result<()> {
    let records = match dataset {
        Some(path) => SchoolStore::read(path)?,
        None => SchoolStore::bundled()?.records().to_vec(),
    };
    let issues = quality::inspect(&records);
    for issue in &issues {
        println!("{}", issue);
    }
    let failures = issues
        .iter()
        .filter(|i| i.severity() == Severity::Failure)
        .count();
    println!(
        "{} schools checked, {} failure(s), {} warning(s)",
        records.len(),
        failures,
        issues.len() - failures
    );
    let distribution = quality::grade_distribution(&records)
        .iter()
        .map(|(grade, count)| format!("{}: {}", grade, count))
        .collect::<Vec<_>>()
        .join(", ");
    println!("Grades: {} (only A and B are asked)", distribution);
    if failures > 0 {
        bail!("Dataset has {} failure(s)", failures);
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "anthem_quiz=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.check {
        return check_dataset(args.dataset.as_deref());
    }

    let settings = Settings::load(args.settings.as_deref())?;
    let store = match &args.dataset {
        Some(path) => SchoolStore::open(path)?,
        None => SchoolStore::bundled()?,
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let output = ConsoleGameOutput::new();
    let mut session = Session::new(store, settings, rng, output.clone());
    session.set_map_mode(args.map);
    let session = Arc::new(Mutex::new(session));

    {
        let session = session.clone();
        thread::spawn(move || {
            let mut last_tick = Instant::now();
            loop {
                thread::sleep(TICK_INTERVAL);
                let now = Instant::now();
                session.lock().tick(now.duration_since(last_tick));
                last_tick = now;
            }
        });
    }

    info!("Ready");
    output.say(&Message::CommandHelp);

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let command = match commands::parse(&line) {
            Ok(command) => command,
            Err(e) => {
                println!("⚠️ {:#}\n", e);
                continue;
            }
        };
        if command == Command::Quit {
            break;
        }
        if let Err(e) = commands::execute(&mut *session.lock(), &output, command) {
            error!("{:#}", e);
            println!("⚠️ {:#}\n", e);
        }
    }

    Ok(())
}
