//! # rect-tiler
//!
//! Integer rectangle geometry and randomized greedy tiling.
//!
//! A [`Tiler`] keeps sampling random rectangles inside a bounding region and
//! fits each one into the tiles placed so far, cutting it down with
//! [`Rectangle::truncate`] when it runs into a neighbor. Tiles never overlap
//! and never share interior points, so the result is a partial (or, run long
//! enough, complete) tiling of the region.
//!
//! ## Rust Lesson #7: Modules
//!
//! Rust modules are like ES6 modules but more explicit:
//! - `mod foo;` = load from `foo.rs` or `foo/mod.rs`
//! - `pub mod foo;` = also export it publicly
//! - `pub use foo::Bar;` = re-export Bar at this level
//!
//! Several modules here add methods to [`Rectangle`] with their own
//! `impl Rectangle` blocks. An inherent impl can live anywhere in the crate
//! that defines the type, so the predicates, the subregion walk and
//! truncation each sit in their own file.

pub mod geometry;
pub mod predicate;
pub mod render;
pub mod rng;
pub mod subregion;
pub mod svg;
pub mod tiling;
pub mod truncate;

// Re-export common types at crate root for convenience.
pub use geometry::{GeometryError, Point, RectSpec, Rectangle};
pub use predicate::{all_set, any_set};
pub use render::{
    Color, CyclePalette, Hatch, NoopRenderer, Palette, RandomPalette, RecordingRenderer,
    RenderError, RenderItem, Renderer,
};
pub use rng::{Rng, SampleSource};
pub use subregion::Subregions;
pub use svg::{tiling_to_svg, SvgOptions, SvgRenderer};
pub use tiling::{
    average_tile_count, build_tiling, default_attempt_limit, first_conflict, AttemptLimit, Coverage,
    Termination, Tiler, Tiling, TilingConfig, TilingError, TilingStats,
};
