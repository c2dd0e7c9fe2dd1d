//! Average command implementation.

use std::time::Instant;

use clap::Args;

use rect_tiler::{average_tile_count, Rectangle};

use super::common::StdRngSource;
use super::error::CliError;

#[derive(Args, Debug)]
pub struct AverageArgs {
    /// Number of independent full-coverage runs.
    #[arg(short, long, default_value_t = 10)]
    pub iterations: usize,

    /// Width of the bounding region.
    #[arg(long)]
    pub width: i64,

    /// Height of the bounding region.
    #[arg(long)]
    pub height: i64,

    /// Seed for reproducible runs.
    #[arg(short, long)]
    pub seed: Option<u64>,
}

/// Execute the average command: print the mean number of tiles needed to
/// cover the region.
pub fn cmd_average(args: AverageArgs) -> Result<(), CliError> {
    let bound = Rectangle::new((0, 0), args.width, args.height)?;
    let mut source = StdRngSource::new(args.seed);

    log::info!("Averaging {} runs over {}x{}", args.iterations, args.width, args.height);
    let start = Instant::now();
    let mean = average_tile_count(args.iterations, bound, &mut source)?;
    log::info!("Done in {:?}", start.elapsed());

    println!("{:.3}", mean);
    Ok(())
}
