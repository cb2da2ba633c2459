//! # GridKeys Command Line
//!
//! Generates a dungeon, validates it and prints it as JSON.

use clap::Parser;
use gridkeys::{config, GenerationConfig, Generator, GridKeysGenerator, GridKeysResult};
use log::info;
use std::path::PathBuf;

/// Command line arguments for the dungeon generator.
#[derive(Parser, Debug)]
#[command(name = "gridkeys")]
#[command(about = "Generate a grid dungeon with a solvable lock and key chain")]
#[command(version)]
struct Args {
    /// Number of rooms, entrance and exit included
    #[arg(short, long, default_value_t = config::DEFAULT_ROOM_COUNT)]
    rooms: usize,

    /// Number of locked doors
    #[arg(short, long, default_value_t = config::DEFAULT_KEY_COUNT)]
    keys: usize,

    /// Random seed (random when omitted)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,

    /// Write the JSON to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> GridKeysResult<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .parse_filters(&args.log_level)
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    info!("GridKeys v{} generating with seed {}", gridkeys::VERSION, seed);

    let config = GenerationConfig::new(args.rooms, args.keys).with_seed(seed);
    let generator = GridKeysGenerator::new();
    let mut rng = gridkeys::utils::create_rng(&config);
    let dungeon = generator.generate(&config, &mut rng)?;

    let json = dungeon.to_json(args.pretty)?;
    match args.output {
        Some(path) => {
            std::fs::write(&path, json)?;
            info!("Wrote dungeon to {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
