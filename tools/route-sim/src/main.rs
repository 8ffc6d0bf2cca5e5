use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use clap::Parser;
use geo::Point;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

mod walk;

use walk::{generate, WalkParams};

#[derive(Parser, Debug)]
#[command(
    name = "route-sim",
    author,
    version,
    about = "Generate simulated vehicle routes as location sample fixtures",
    long_about = "Walks a randomized route from an origin point, emitting evenly \
                  spaced location samples with speed and heading as a JSON array.\n\n\
                  Intended for feeding trackers and UIs during manual testing; \
                  pass --seed for reproducible routes."
)]
struct Args {
    /// Origin latitude in degrees
    #[arg(long, default_value = "28.6139")]
    lat: f64,

    /// Origin longitude in degrees
    #[arg(long, default_value = "77.2090")]
    lon: f64,

    /// Number of legs to walk
    #[arg(long, default_value = "60")]
    legs: usize,

    /// Leg length in meters
    #[arg(long, default_value = "120.0")]
    step: f64,

    /// Seconds between samples
    #[arg(long, default_value = "10")]
    interval: i64,

    /// Maximum bearing change per leg, degrees
    #[arg(long, default_value = "25.0")]
    max_turn: f64,

    /// RNG seed for reproducible routes
    #[arg(long)]
    seed: Option<u64>,

    /// Timestamp of the first sample (RFC 3339); defaults to now
    #[arg(long)]
    start: Option<String>,

    /// Output file; stdout if omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    let start: DateTime<Utc> = match &args.start {
        Some(s) => DateTime::parse_from_rfc3339(s)
            .with_context(|| format!("invalid --start timestamp: {}", s))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let params = WalkParams {
        origin: Point::new(args.lon, args.lat),
        start,
        legs: args.legs,
        step_m: args.step,
        interval: Duration::seconds(args.interval),
        max_turn_rad: args.max_turn.to_radians(),
    };

    log::info!(
        "Walking {} legs of {} m from ({}, {})",
        args.legs,
        args.step,
        args.lat,
        args.lon
    );

    let route = generate(&params, &mut rng)?;
    let json = serde_json::to_string_pretty(&route)?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            log::info!("Wrote {} samples to {}", route.len(), path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}
