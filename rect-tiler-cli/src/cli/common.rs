//! Common utilities shared across CLI commands.

use std::fs;
use std::io::{self, Read as IoRead, Write as IoWrite};
use std::path::Path;

use rand::rngs::StdRng;
use rand::{Rng as _, SeedableRng};
use resvg::usvg;
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

use rect_tiler::{RectSpec, Rectangle, SampleSource};

use super::error::CliError;

/// A rectangle as it appears in JSON input and output.
///
/// Fields are plain numbers so that malformed input (fractions, negative
/// sizes) reaches the library's validation instead of failing in serde.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JsonRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl From<JsonRect> for RectSpec {
    fn from(r: JsonRect) -> Self {
        RectSpec::new(r.x, r.y, r.width, r.height)
    }
}

impl From<Rectangle> for JsonRect {
    fn from(r: Rectangle) -> Self {
        Self {
            x: r.x() as f64,
            y: r.y() as f64,
            width: r.width() as f64,
            height: r.height() as f64,
        }
    }
}

/// Parse `x,y,width,height` into a validated rectangle.
///
/// Used as a clap value parser, hence the `String` error.
pub fn parse_rect(s: &str) -> Result<Rectangle, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 4 {
        return Err(format!("expected x,y,width,height, got {:?}", s));
    }

    let mut values = [0_i64; 4];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .parse()
            .map_err(|_| format!("{:?} is not an integer", part))?;
    }

    let [x, y, width, height] = values;
    Rectangle::new((x, y), width, height).map_err(|e| e.to_string())
}

/// `rand`-backed sample source for CLI runs.
pub struct StdRngSource(StdRng);

impl StdRngSource {
    /// Seeded when `seed` is given, otherwise seeded from the OS.
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(s) => Self(StdRng::seed_from_u64(s)),
            None => Self(StdRng::from_os_rng()),
        }
    }
}

impl SampleSource for StdRngSource {
    fn sample(&mut self, low: i64, high_inclusive: i64) -> i64 {
        self.0.random_range(low..=high_inclusive)
    }
}

/// Read a whole file, or stdin when `path` is `-`.
pub fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut content = String::new();
        io::stdin().read_to_string(&mut content)?;
        return Ok(content);
    }

    fs::read_to_string(path).map_err(|source| CliError::Read { path: path.into(), source })
}

/// Write to a file, or stdout when `path` is `None` or `-`.
pub fn write_output(path: Option<&str>, content: &str) -> Result<(), CliError> {
    match path {
        None | Some("-") => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
        Some(path) => {
            fs::write(path, content)?;
            log::info!("Wrote: {}", path);
        }
    }
    Ok(())
}

/// Rasterize an SVG document to PNG at `scale` times its natural size.
pub fn render_png(svg_content: &str, png_path: &Path, scale: f32) -> Result<(), CliError> {
    if !(scale > 0.0) {
        return Err(CliError::Usage(format!("PNG scale must be positive, got {}", scale)));
    }

    let options = usvg::Options::default();
    let tree = usvg::Tree::from_str(svg_content, &options)
        .map_err(|e| CliError::Png(e.to_string()))?;

    let size = tree.size();
    let pixmap_width = (size.width() * scale).ceil() as u32;
    let pixmap_height = (size.height() * scale).ceil() as u32;

    let mut pixmap = Pixmap::new(pixmap_width, pixmap_height).ok_or_else(|| {
        CliError::Png(format!("could not create {}x{} pixmap", pixmap_width, pixmap_height))
    })?;
    pixmap.fill(tiny_skia::Color::WHITE);

    let transform = tiny_skia::Transform::from_scale(scale, scale);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    pixmap.save_png(png_path).map_err(|e| CliError::Png(e.to_string()))?;
    log::info!("Wrote: {} ({}x{})", png_path.display(), pixmap_width, pixmap_height);
    Ok(())
}
