//! CLI command implementations.
//!
//! One module per subcommand:
//! - `tile` - Generate a random tiling as SVG, JSON or PNG
//! - `average` - Mean tile count for full coverage
//! - `overlap` - Largest common sub-rectangle of two rectangles
//! - `truncate` - Largest sub-rectangle clear of a list of obstacles
//! - `subregions` - List or count sub-rectangles
//! - `benchmark` - Time enumeration, truncation and tiling

pub mod common;
pub mod error;
pub mod recipe;
pub mod tile;
pub mod average;
pub mod overlap;
pub mod truncate;
pub mod subregions;
pub mod benchmark;

pub use error::CliError;
pub use tile::{cmd_tile, TileArgs};
pub use average::{cmd_average, AverageArgs};
pub use overlap::{cmd_overlap, OverlapArgs};
pub use truncate::{cmd_truncate, TruncateArgs};
pub use subregions::{cmd_subregions, SubregionsArgs};
pub use benchmark::{cmd_benchmark, BenchmarkArgs};
