//! Tiling recipes.
//!
//! Recipes are YAML files that describe a tiling run: the bounding region,
//! when to stop, the seed, and how the result should look. Anything given
//! on the command line overrides the recipe.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use rect_tiler::{Color, GeometryError, Hatch, RenderError, Rectangle, SvgOptions};

use super::error::CliError;

/// A complete recipe for one tiling run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recipe {
    /// Recipe name/title
    pub name: String,

    /// Optional description
    #[serde(default)]
    pub description: Option<String>,

    /// Region to tile
    pub bound: Bound,

    /// Stop after this many tiles (default: cover the whole bound)
    #[serde(default)]
    pub count: Option<usize>,

    /// Seed for reproducible runs
    #[serde(default)]
    pub seed: Option<u64>,

    /// Consecutive failed attempts before giving up (0 = never)
    #[serde(default)]
    pub max_attempts: Option<u64>,

    /// Tile colors in #RRGGBB form, used in order and repeated
    #[serde(default)]
    pub palette: Vec<String>,

    /// Pick a random color for every tile instead of using the palette
    #[serde(default)]
    pub random_colors: bool,

    #[serde(default)]
    pub style: Style,
}

/// Bounding region. The origin defaults to (0, 0).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bound {
    #[serde(default)]
    pub x: i64,
    #[serde(default)]
    pub y: i64,
    pub width: i64,
    pub height: i64,
}

/// Output styling.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Style {
    /// Pixels per grid unit in the SVG document
    #[serde(default)]
    pub scale: Option<f64>,

    /// Distance between hatch lines, in grid units
    #[serde(default)]
    pub hatch_spacing: Option<f64>,

    /// Draw the unit grid behind the tiles
    #[serde(default)]
    pub grid: Option<bool>,

    /// PNG size multiplier
    #[serde(default)]
    pub png_scale: Option<f32>,

    /// Hatch character drawn inside candidates in frame output
    #[serde(default)]
    pub candidate_hatch: Option<String>,
}

impl Recipe {
    /// Load a recipe from a YAML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CliError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .map_err(|source| CliError::Read { path: path.to_path_buf(), source })?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, CliError> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn bound(&self) -> Result<Rectangle, GeometryError> {
        Rectangle::new((self.bound.x, self.bound.y), self.bound.width, self.bound.height)
    }

    /// Parsed palette. Empty means "use the default colors".
    pub fn colors(&self) -> Result<Vec<Color>, RenderError> {
        self.palette.iter().map(|c| c.parse()).collect()
    }

    pub fn candidate_hatch(&self) -> Result<Option<Hatch>, RenderError> {
        self.style.candidate_hatch.as_deref().map(str::parse::<Hatch>).transpose()
    }

    pub fn svg_options(&self) -> SvgOptions {
        let defaults = SvgOptions::default();
        SvgOptions::default()
            .with_scale(self.style.scale.unwrap_or(defaults.scale))
            .with_hatch_spacing(self.style.hatch_spacing.unwrap_or(defaults.hatch_spacing))
            .with_grid(self.style.grid.unwrap_or(defaults.grid))
    }
}

/// Example recipe printed by `tile --example-recipe`.
pub const EXAMPLE: &str = r##"# Example rect-tiler recipe
name: "Warm Quilt"
description: "Twelve tiles on a 16 x 10 board"

bound:
  width: 16
  height: 10

count: 12
seed: 42
max_attempts: 100000

palette:
  - "#E63946"
  - "#F4A261"
  - "#E9C46A"
  - "#2A9D8F"
  - "#264653"

style:
  scale: 30
  grid: true
  png_scale: 2
  candidate_hatch: "x"
"##;

pub fn print_example() {
    print!("{}", EXAMPLE);
}
