//! Tile command implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use serde::Serialize;

use rect_tiler::{
    first_conflict, tiling_to_svg, AttemptLimit, Color, Coverage, CyclePalette, Hatch, NoopRenderer,
    Palette, RandomPalette, Rectangle, RenderError, RenderItem, Renderer, Rng, SvgOptions,
    Termination, Tiler, TilingConfig, TilingStats,
};

use super::common::{render_png, write_output, JsonRect, StdRngSource};
use super::error::CliError;
use super::recipe::{self, Recipe};

#[derive(Args, Debug, Default)]
pub struct TileArgs {
    /// Width of the bounding region.
    #[arg(long)]
    pub width: Option<i64>,

    /// Height of the bounding region.
    #[arg(long)]
    pub height: Option<i64>,

    /// Stop after this many tiles.
    #[arg(short = 'n', long, conflicts_with = "full")]
    pub count: Option<usize>,

    /// Keep going until the region is fully covered (the default without --count).
    #[arg(long)]
    pub full: bool,

    /// Seed for reproducible runs.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Consecutive failed attempts before giving up. 0 never gives up.
    /// Default: scaled to the square of the region's area.
    #[arg(long)]
    pub max_attempts: Option<u64>,

    /// Give every tile a random color instead of cycling the palette.
    #[arg(long)]
    pub random_colors: bool,

    /// Hatch character drawn inside candidates in --frames output
    /// (one of / \ - + x o O . *).
    #[arg(long)]
    pub hatch: Option<Hatch>,

    /// Load settings from a YAML recipe. Flags override it.
    #[arg(short, long)]
    pub recipe: Option<PathBuf>,

    /// Print an example recipe and exit.
    #[arg(long)]
    pub example_recipe: bool,

    /// Output file (- for stdout, default: stdout).
    #[arg(short, long)]
    pub output: Option<String>,

    /// Also rasterize the final tiling to this PNG file.
    #[arg(long)]
    pub png: Option<PathBuf>,

    /// PNG size multiplier.
    #[arg(long)]
    pub png_scale: Option<f32>,

    /// Write every intermediate frame as frame_NNNN.svg into this directory.
    #[arg(long)]
    pub frames: Option<PathBuf>,

    /// Print the tiling as JSON instead of SVG.
    #[arg(long)]
    pub json: bool,

    /// Leave out the unit grid.
    #[arg(long)]
    pub no_grid: bool,
}

/// Writes each frame to its own numbered SVG file.
struct FrameWriter<'a> {
    dir: &'a Path,
    options: &'a SvgOptions,
    written: usize,
}

impl Renderer for FrameWriter<'_> {
    fn render(
        &mut self,
        items: &[RenderItem],
        width: i64,
        height: i64,
    ) -> Result<(), RenderError> {
        let svg = tiling_to_svg(items, width, height, self.options)?;
        let path = self.dir.join(format!("frame_{:04}.svg", self.written));
        fs::write(&path, svg)?;
        self.written += 1;
        Ok(())
    }
}

/// Tile colors: the recipe palette in order, or random ones.
#[derive(Debug, Clone)]
enum TilePalette {
    Cycle(CyclePalette),
    Random(RandomPalette<Rng>),
}

impl Palette for TilePalette {
    fn next_color(&mut self) -> Color {
        match self {
            TilePalette::Cycle(p) => p.next_color(),
            TilePalette::Random(p) => p.next_color(),
        }
    }
}

#[derive(Serialize)]
struct TileReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    bound: JsonRect,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    tiles: Vec<JsonRect>,
    coverage: CoverageReport,
    stats: StatsReport,
}

#[derive(Serialize)]
struct CoverageReport {
    desired_area: i64,
    actual_area: i64,
    fraction: f64,
    complete: bool,
}

impl From<Coverage> for CoverageReport {
    fn from(c: Coverage) -> Self {
        Self {
            desired_area: c.desired_area,
            actual_area: c.actual_area,
            fraction: c.fraction(),
            complete: c.is_complete(),
        }
    }
}

#[derive(Serialize)]
struct StatsReport {
    attempts: u64,
    rejected_bounds: u64,
    rejected_nesting: u64,
    discarded_truncations: u64,
    accepted_direct: u64,
    accepted_truncated: u64,
}

impl From<TilingStats> for StatsReport {
    fn from(s: TilingStats) -> Self {
        Self {
            attempts: s.attempts,
            rejected_bounds: s.rejected_bounds,
            rejected_nesting: s.rejected_nesting,
            discarded_truncations: s.discarded_truncations,
            accepted_direct: s.accepted_direct,
            accepted_truncated: s.accepted_truncated,
        }
    }
}

/// Settings after merging the recipe with command-line flags.
struct Plan {
    name: Option<String>,
    description: Option<String>,
    bound: Rectangle,
    config: TilingConfig,
    seed: Option<u64>,
    palette: TilePalette,
    svg: SvgOptions,
    png_scale: f32,
}

fn resolve(args: &TileArgs) -> Result<Plan, CliError> {
    let recipe = args.recipe.as_deref().map(Recipe::load).transpose()?;
    if let Some(r) = &recipe {
        match &r.description {
            Some(description) => log::info!("Recipe: {} - {}", r.name, description),
            None => log::info!("Recipe: {}", r.name),
        }
    }

    // Flags override the recipe's size but keep its origin.
    let bound = match (recipe.as_ref().map(Recipe::bound).transpose()?, args.width, args.height) {
        (Some(b), width, height) => Rectangle::new(
            (b.x(), b.y()),
            width.unwrap_or(b.width()),
            height.unwrap_or(b.height()),
        )?,
        (None, Some(width), Some(height)) => Rectangle::new((0, 0), width, height)?,
        (None, _, _) => {
            return Err(CliError::Usage(
                "--width and --height are required without a recipe".into(),
            ));
        }
    };

    let count = if args.full {
        None
    } else {
        args.count.or(recipe.as_ref().and_then(|r| r.count))
    };
    let termination = count.map_or(Termination::FullCoverage, Termination::TileCount);

    let limit = match args.max_attempts.or(recipe.as_ref().and_then(|r| r.max_attempts)) {
        Some(0) => AttemptLimit::Unlimited,
        Some(n) => AttemptLimit::Fixed(n),
        None => AttemptLimit::Scaled,
    };

    let mut config = TilingConfig::default()
        .with_termination(termination)
        .with_max_attempts(limit);
    let hatch = match args.hatch {
        Some(hatch) => Some(hatch),
        None => recipe.as_ref().map(Recipe::candidate_hatch).transpose()?.flatten(),
    };
    if let Some(hatch) = hatch {
        config = config.with_candidate_hatch(hatch);
    }

    let seed = args.seed.or(recipe.as_ref().and_then(|r| r.seed));
    let palette = if args.random_colors || recipe.as_ref().is_some_and(|r| r.random_colors) {
        let palette_seed = seed.unwrap_or_else(rand::random);
        TilePalette::Random(RandomPalette::new(Rng::new(palette_seed)))
    } else {
        let colors = match &recipe {
            Some(r) => r.colors()?,
            None => Vec::new(),
        };
        TilePalette::Cycle(CyclePalette::new(colors))
    };

    let mut svg = recipe.as_ref().map(Recipe::svg_options).unwrap_or_default();
    if args.no_grid {
        svg = svg.with_grid(false);
    }

    let png_scale = args
        .png_scale
        .or(recipe.as_ref().and_then(|r| r.style.png_scale))
        .unwrap_or(1.0);

    Ok(Plan {
        name: recipe.as_ref().map(|r| r.name.clone()),
        description: recipe.as_ref().and_then(|r| r.description.clone()),
        bound,
        config,
        seed,
        palette,
        svg,
        png_scale,
    })
}

/// Execute the tile command.
pub fn cmd_tile(args: TileArgs) -> Result<(), CliError> {
    if args.example_recipe {
        recipe::print_example();
        return Ok(());
    }

    let plan = resolve(&args)?;
    let bound = plan.bound;
    let tiler = Tiler::new(bound, plan.config.clone());
    let mut source = StdRngSource::new(plan.seed);

    log::info!(
        "Tiling {}x{} at ({}, {}), {}",
        bound.width(),
        bound.height(),
        bound.x(),
        bound.y(),
        match plan.config.termination {
            Termination::TileCount(n) => format!("up to {} tiles", n),
            Termination::FullCoverage => "full coverage".to_string(),
        }
    );

    let start = Instant::now();
    let tiling = match &args.frames {
        Some(dir) => {
            fs::create_dir_all(dir)?;
            let mut writer = FrameWriter { dir, options: &plan.svg, written: 0 };
            let tiling = tiler.run(&mut source, &mut plan.palette.clone(), &mut writer)?;
            log::info!("Wrote {} frames to {}", writer.written, dir.display());
            tiling
        }
        None => tiler.run(&mut source, &mut plan.palette.clone(), &mut NoopRenderer)?,
    };
    let elapsed = start.elapsed();

    if let Some((i, j)) = first_conflict(&tiling.tiles) {
        log::warn!("tiles {} and {} touch: {} / {}", i, j, tiling.tiles[i], tiling.tiles[j]);
    }

    log::info!(
        "Placed {} tiles covering {}/{} ({:.1}%) in {} attempts, {:?}",
        tiling.tiles.len(),
        tiling.coverage.actual_area,
        tiling.coverage.desired_area,
        tiling.coverage.fraction() * 100.0,
        tiling.stats.attempts,
        elapsed
    );

    let canvas_width = bound.right();
    let canvas_height = bound.top();
    let needs_svg = !args.json || args.png.is_some();
    let svg = if needs_svg {
        let items = tiling.render_items(&mut plan.palette.clone());
        Some(tiling_to_svg(&items, canvas_width, canvas_height, &plan.svg)?)
    } else {
        None
    };

    let output = if args.json {
        let report = TileReport {
            name: plan.name.clone(),
            description: plan.description.clone(),
            bound: bound.into(),
            seed: plan.seed,
            tiles: tiling.tiles.iter().map(|&t| t.into()).collect(),
            coverage: tiling.coverage.into(),
            stats: tiling.stats.into(),
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        svg.clone().unwrap_or_default()
    };

    write_output(args.output.as_deref(), &output)?;

    if let (Some(png), Some(svg)) = (&args.png, &svg) {
        render_png(svg, png, plan.png_scale)?;
    }

    Ok(())
}
