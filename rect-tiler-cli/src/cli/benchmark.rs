//! Benchmark command implementation.

use std::time::Instant;

use clap::Args;

use rect_tiler::{CyclePalette, NoopRenderer, Rectangle, Rng, Tiler, TilingConfig};

use super::error::CliError;

#[derive(Args, Debug)]
pub struct BenchmarkArgs {
    /// Side length of the square region to work on.
    #[arg(long, default_value_t = 8)]
    pub size: i64,

    /// Number of full tiling runs to time.
    #[arg(short, long, default_value_t = 5)]
    pub trials: usize,

    /// Seed for the tiling runs.
    #[arg(short, long, default_value_t = 0)]
    pub seed: u64,
}

/// Execute the benchmark command.
pub fn cmd_benchmark(args: BenchmarkArgs) -> Result<(), CliError> {
    let size = args.size;
    let region = Rectangle::new((0, 0), size, size)?;

    // Enumeration
    let start = Instant::now();
    let enumerated = region.subregions().count();
    let enumerate_time = start.elapsed();

    // Truncation against a column of obstacles through the middle, so most
    // candidates get checked before one clears.
    let obstacles: Vec<Rectangle> = (0..size)
        .step_by(2)
        .map(|y| Rectangle::new((size / 2, y), 1, 1))
        .collect::<Result<_, _>>()?;
    let start = Instant::now();
    let truncated = region.truncate(&obstacles);
    let truncate_time = start.elapsed();

    // Full tiling runs
    let tiler = Tiler::new(region, TilingConfig::default());
    let mut rng = Rng::new(args.seed);
    let mut total_tiles = 0;
    let mut total_attempts = 0;
    let start = Instant::now();
    for _ in 0..args.trials {
        let tiling = tiler.run(&mut rng, &mut CyclePalette::default(), &mut NoopRenderer)?;
        total_tiles += tiling.tiles.len();
        total_attempts += tiling.stats.attempts;
    }
    let tiling_time = start.elapsed();
    let trials = args.trials.max(1) as f64;

    println!();
    println!("═══════════════════════════════════════════════");
    println!("  RECT-TILER BENCHMARK: {}x{}", size, size);
    println!("═══════════════════════════════════════════════");
    println!("  Subregions: {} in {:?}", enumerated, enumerate_time);
    println!(
        "  Truncate vs {} obstacles: {} in {:?}",
        obstacles.len(),
        truncated.map_or_else(|| "none".to_string(), |r| r.to_string()),
        truncate_time
    );
    println!("  Tiling runs: {}", args.trials);
    println!("  Avg tiles: {:.2}", total_tiles as f64 / trials);
    println!("  Avg attempts: {:.0}", total_attempts as f64 / trials);
    println!("  Time: {:?}", tiling_time);
    println!("  Avg per run: {:.3}ms", tiling_time.as_secs_f64() * 1000.0 / trials);
    println!("═══════════════════════════════════════════════");

    Ok(())
}
