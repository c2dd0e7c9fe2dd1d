//! rect-tiler - random rectangle tilings from the command line
//!
//! Usage:
//!   rect-tiler tile --width 16 --height 10 -o tiling.svg   Tile a region
//!   rect-tiler average --width 5 --height 5                 Mean tiles for full coverage
//!   rect-tiler overlap 1,1,2,6 2,2,4,4                      Overlap of two rectangles
//!   rect-tiler truncate obstacles.json                      Truncate against obstacles
//!   rect-tiler subregions 0,0,5,5 --count                   Enumerate sub-rectangles
//!   rect-tiler benchmark                                    Time the core operations

mod cli;

use std::error::Error;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use cli::{
    cmd_average, cmd_benchmark, cmd_overlap, cmd_subregions, cmd_tile, cmd_truncate, AverageArgs,
    BenchmarkArgs, CliError, OverlapArgs, SubregionsArgs, TileArgs, TruncateArgs,
};

/// Random greedy tilings of integer rectangles.
#[derive(Parser, Debug)]
#[command(name = "rect-tiler", version)]
struct RectTiler {
    /// Log debug detail (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Tile a region with random rectangles.
    Tile(TileArgs),
    /// Average number of tiles needed to cover a region.
    Average(AverageArgs),
    /// Print the overlap of two rectangles.
    Overlap(OverlapArgs),
    /// Truncate a rectangle against obstacles read as JSON.
    Truncate(TruncateArgs),
    /// List the sub-rectangles of a rectangle, largest first.
    Subregions(SubregionsArgs),
    /// Benchmark enumeration, truncation and tiling.
    Benchmark(BenchmarkArgs),
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp(None)
        .init();
}

fn run(command: Cmd) -> Result<(), CliError> {
    match command {
        Cmd::Tile(args) => cmd_tile(args),
        Cmd::Average(args) => cmd_average(args),
        Cmd::Overlap(args) => cmd_overlap(args),
        Cmd::Truncate(args) => cmd_truncate(args),
        Cmd::Subregions(args) => cmd_subregions(args),
        Cmd::Benchmark(args) => cmd_benchmark(args),
    }
}

fn main() -> ExitCode {
    let args = RectTiler::parse();
    init_logging(args.verbose);

    match run(args.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            let mut source = e.source();
            while let Some(cause) = source {
                log::error!("  caused by: {}", cause);
                source = cause.source();
            }
            ExitCode::FAILURE
        }
    }
}
