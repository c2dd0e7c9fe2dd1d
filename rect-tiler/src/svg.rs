//! SVG output for tilings and render frames.
//!
//! Geometry uses a y-up coordinate system with the origin at the lower-left.
//! SVG is y-down, so the drawing group is flipped with
//! `translate(0, H) scale(1, -1)` and everything inside it can be written in
//! tile coordinates directly.
//!
//! Hatches are not SVG patterns. They are generated as real line segments
//! (and circles) clipped to each rectangle, so the output also works on a
//! pen plotter.

use std::f64::consts::PI;
use std::fmt::Write as _;

use crate::geometry::Rectangle;
use crate::render::{validate_frame, Color, Hatch, RenderError, RenderItem, Renderer};

/// Fill used when an item asks for a fill but carries no color.
const DEFAULT_FILL: Color = Color::rgb(0x1F, 0x77, 0xB4);

/// A line segment in canvas units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl Line {
    #[inline]
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Length of the line segment.
    #[inline]
    pub fn length(&self) -> f64 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        (dx * dx + dy * dy).sqrt()
    }
}

/// A circular hatch mark.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mark {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
    pub filled: bool,
}

/// Everything needed to draw one hatch inside one rectangle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HatchShapes {
    pub lines: Vec<Line>,
    pub marks: Vec<Mark>,
}

/// Options for SVG output.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgOptions {
    /// Output pixels per canvas unit.
    pub scale: f64,
    /// Distance between hatch lines, in canvas units.
    pub hatch_spacing: f64,
    /// Draw unit grid lines behind the tiles.
    pub grid: bool,
}

impl Default for SvgOptions {
    fn default() -> Self {
        Self {
            scale: 20.0,
            hatch_spacing: 0.25,
            grid: true,
        }
    }
}

impl SvgOptions {
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_hatch_spacing(mut self, spacing: f64) -> Self {
        self.hatch_spacing = spacing;
        self
    }

    pub fn with_grid(mut self, grid: bool) -> Self {
        self.grid = grid;
        self
    }
}

// ============================================================================
// CLIPPING
// ============================================================================

/// Clip a line to an axis-aligned box (Liang-Barsky).
///
/// Returns `None` when the line misses the box or only grazes a corner.
pub fn clip_line_to_box(
    line: &Line,
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
) -> Option<Line> {
    let dx = line.x2 - line.x1;
    let dy = line.y2 - line.y1;
    let mut t0 = 0.0_f64;
    let mut t1 = 1.0_f64;

    let edges = [
        (-dx, line.x1 - min_x),
        (dx, max_x - line.x1),
        (-dy, line.y1 - min_y),
        (dy, max_y - line.y1),
    ];

    for (p, q) in edges {
        if p == 0.0 {
            // Parallel to this edge: either fully inside its half-plane or out.
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            if r > t1 {
                return None;
            }
            t0 = t0.max(r);
        } else {
            if r < t0 {
                return None;
            }
            t1 = t1.min(r);
        }
    }

    let clipped = Line::new(
        line.x1 + t0 * dx,
        line.y1 + t0 * dy,
        line.x1 + t1 * dx,
        line.y1 + t1 * dy,
    );
    (clipped.length() > 1e-9).then_some(clipped)
}

// ============================================================================
// HATCHING
// ============================================================================

/// Generate parallel hatch lines at `angle_degrees` and clip them to `rect`.
pub fn hatch_lines(rect: &Rectangle, spacing: f64, angle_degrees: f64) -> Vec<Line> {
    let (min_x, min_y) = (rect.x() as f64, rect.y() as f64);
    let (max_x, max_y) = (rect.right() as f64, rect.top() as f64);
    let width = max_x - min_x;
    let height = max_y - min_y;
    let angle_rad = angle_degrees * PI / 180.0;

    // Half-length long enough to cross the box at any angle.
    let reach = (width * width + height * height).sqrt();

    let perp_x = (angle_rad + PI / 2.0).cos();
    let perp_y = (angle_rad + PI / 2.0).sin();
    let dir_x = angle_rad.cos();
    let dir_y = angle_rad.sin();

    let center_x = min_x + width / 2.0;
    let center_y = min_y + height / 2.0;

    let num_lines = (reach / spacing).ceil() as i64 + 1;

    (-num_lines..=num_lines)
        .filter_map(|i| {
            let offset = i as f64 * spacing;
            let cx = center_x + perp_x * offset;
            let cy = center_y + perp_y * offset;
            let line = Line::new(
                cx - dir_x * reach,
                cy - dir_y * reach,
                cx + dir_x * reach,
                cy + dir_y * reach,
            );
            clip_line_to_box(&line, min_x, min_y, max_x, max_y)
        })
        .collect()
}

/// Centers of a regular grid with `step` spacing, inset by half a step.
fn grid_centers(rect: &Rectangle, step: f64) -> Vec<(f64, f64)> {
    let mut centers = Vec::new();
    let mut y = rect.y() as f64 + step / 2.0;
    while y < rect.top() as f64 {
        let mut x = rect.x() as f64 + step / 2.0;
        while x < rect.right() as f64 {
            centers.push((x, y));
            x += step;
        }
        y += step;
    }
    centers
}

/// Build the shapes for `hatch` inside `rect`.
pub fn hatch_shapes(rect: &Rectangle, hatch: Hatch, spacing: f64) -> HatchShapes {
    let mut shapes = HatchShapes::default();
    let step = spacing * 2.0;

    let marks = |r: f64, filled: bool| -> Vec<Mark> {
        grid_centers(rect, step)
            .into_iter()
            .map(|(cx, cy)| Mark { cx, cy, r, filled })
            .collect()
    };

    match hatch {
        Hatch::Diagonal => shapes.lines = hatch_lines(rect, spacing, 45.0),
        Hatch::BackDiagonal => shapes.lines = hatch_lines(rect, spacing, 135.0),
        Hatch::Horizontal => shapes.lines = hatch_lines(rect, spacing, 0.0),
        Hatch::Crossed => {
            shapes.lines = hatch_lines(rect, spacing, 0.0);
            shapes.lines.extend(hatch_lines(rect, spacing, 90.0));
        }
        Hatch::CrossedDiagonal => {
            shapes.lines = hatch_lines(rect, spacing, 45.0);
            shapes.lines.extend(hatch_lines(rect, spacing, 135.0));
        }
        Hatch::SmallCircle => shapes.marks = marks(step * 0.25, false),
        Hatch::LargeCircle => shapes.marks = marks(step * 0.45, false),
        Hatch::Dots => shapes.marks = marks(step * 0.08, true),
        Hatch::Stars => {
            let arm = step * 0.35;
            for (cx, cy) in grid_centers(rect, step) {
                for k in 0..3 {
                    let a = k as f64 * PI / 3.0 + PI / 2.0;
                    let (dx, dy) = (a.cos() * arm, a.sin() * arm);
                    shapes.lines.push(Line::new(cx - dx, cy - dy, cx + dx, cy + dy));
                }
            }
        }
    }

    shapes
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Render a frame as a standalone SVG document.
pub fn tiling_to_svg(
    items: &[RenderItem],
    width: i64,
    height: i64,
    options: &SvgOptions,
) -> Result<String, RenderError> {
    validate_frame(items, width, height)?;

    let mut svg = String::new();
    // Writing into a String cannot fail; the results are ignored below.
    let _ = write!(
        svg,
        r#"<?xml version="1.0" encoding="UTF-8"?>
<svg xmlns="http://www.w3.org/2000/svg" width="{:.0}" height="{:.0}" viewBox="0 0 {} {}">
<rect width="100%" height="100%" fill="white"/>
<g transform="translate(0, {}) scale(1, -1)">
"#,
        width as f64 * options.scale,
        height as f64 * options.scale,
        width,
        height,
        height,
    );

    if options.grid {
        svg.push_str("<g stroke=\"#dddddd\" stroke-width=\"0.02\">\n");
        for x in 0..=width {
            let _ = writeln!(svg, "  <line x1=\"{x}\" y1=\"0\" x2=\"{x}\" y2=\"{height}\"/>");
        }
        for y in 0..=height {
            let _ = writeln!(svg, "  <line x1=\"0\" y1=\"{y}\" x2=\"{width}\" y2=\"{y}\"/>");
        }
        svg.push_str("</g>\n");
    }

    for item in items {
        let rect = &item.rect;
        let fill = if item.fill {
            item.color.unwrap_or(DEFAULT_FILL).to_string()
        } else {
            "none".to_string()
        };
        let _ = writeln!(
            svg,
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\" \
             stroke=\"black\" stroke-width=\"0.05\"/>",
            rect.x(),
            rect.y(),
            rect.width(),
            rect.height(),
            fill
        );

        if let Some(hatch) = item.hatch {
            let shapes = hatch_shapes(rect, hatch, options.hatch_spacing);
            svg.push_str("<g stroke=\"black\" stroke-width=\"0.03\" fill=\"none\">\n");
            for line in &shapes.lines {
                let _ = writeln!(
                    svg,
                    "  <line x1=\"{:.3}\" y1=\"{:.3}\" x2=\"{:.3}\" y2=\"{:.3}\"/>",
                    line.x1, line.y1, line.x2, line.y2
                );
            }
            for mark in &shapes.marks {
                let _ = writeln!(
                    svg,
                    "  <circle cx=\"{:.3}\" cy=\"{:.3}\" r=\"{:.3}\" fill=\"{}\"/>",
                    mark.cx,
                    mark.cy,
                    mark.r,
                    if mark.filled { "black" } else { "none" }
                );
            }
            svg.push_str("</g>\n");
        }
    }

    svg.push_str("</g>\n</svg>\n");
    Ok(svg)
}

/// Renderer that turns every frame into an SVG document and keeps them.
#[derive(Debug, Clone, Default)]
pub struct SvgRenderer {
    options: SvgOptions,
    frames: Vec<String>,
}

impl SvgRenderer {
    pub fn new(options: SvgOptions) -> Self {
        Self { options, frames: Vec::new() }
    }

    pub fn frames(&self) -> &[String] {
        &self.frames
    }

    pub fn last_frame(&self) -> Option<&str> {
        self.frames.last().map(String::as_str)
    }

    pub fn into_frames(self) -> Vec<String> {
        self.frames
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, items: &[RenderItem], width: i64, height: i64) -> Result<(), RenderError> {
        let svg = tiling_to_svg(items, width, height, &self.options)?;
        self.frames.push(svg);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: i64, y: i64, w: i64, h: i64) -> Rectangle {
        Rectangle::new((x, y), w, h).unwrap()
    }

    fn inside(line: &Line, r: &Rectangle) -> bool {
        let eps = 1e-9;
        let (min_x, min_y) = (r.x() as f64 - eps, r.y() as f64 - eps);
        let (max_x, max_y) = (r.right() as f64 + eps, r.top() as f64 + eps);
        [(line.x1, line.y1), (line.x2, line.y2)]
            .iter()
            .all(|&(x, y)| x >= min_x && x <= max_x && y >= min_y && y <= max_y)
    }

    #[test]
    fn clip_keeps_inner_segment() {
        let line = Line::new(-5.0, 1.0, 5.0, 1.0);
        let clipped = clip_line_to_box(&line, 0.0, 0.0, 2.0, 2.0).unwrap();
        assert!((clipped.x1 - 0.0).abs() < 1e-9, "x1 = {}", clipped.x1);
        assert!((clipped.x2 - 2.0).abs() < 1e-9, "x2 = {}", clipped.x2);
        assert_eq!(clipped.y1, 1.0);
        assert_eq!(clipped.y2, 1.0);
    }

    #[test]
    fn clip_drops_outside_segment() {
        let line = Line::new(-5.0, 3.0, 5.0, 3.0);
        assert!(clip_line_to_box(&line, 0.0, 0.0, 2.0, 2.0).is_none());
    }

    #[test]
    fn horizontal_hatch_spacing() {
        let r = rect(0, 0, 4, 2);
        let lines = hatch_lines(&r, 0.5, 0.0);
        // Lines at y = 0.0, 0.5, ..., 2.0 (edges included).
        assert!(lines.len() >= 3 && lines.len() <= 5, "got {} lines", lines.len());
        for line in &lines {
            assert!((line.y1 - line.y2).abs() < 1e-9, "should be horizontal");
            assert!(inside(line, &r));
        }
    }

    #[test]
    fn diagonal_hatch_stays_inside() {
        let r = rect(3, 1, 2, 5);
        let lines = hatch_lines(&r, 0.25, 45.0);
        assert!(!lines.is_empty());
        assert!(lines.iter().all(|l| inside(l, &r)));
    }

    #[test]
    fn crossed_has_both_directions() {
        let r = rect(0, 0, 3, 3);
        let single = hatch_shapes(&r, Hatch::Horizontal, 0.5).lines.len();
        let crossed = hatch_shapes(&r, Hatch::Crossed, 0.5).lines.len();
        assert!(crossed >= single * 2 - 2);
    }

    #[test]
    fn circle_hatches_produce_marks() {
        let r = rect(0, 0, 2, 2);
        for hatch in [Hatch::SmallCircle, Hatch::LargeCircle, Hatch::Dots] {
            let shapes = hatch_shapes(&r, hatch, 0.25);
            assert!(!shapes.marks.is_empty(), "{:?} should produce marks", hatch);
            assert!(shapes.lines.is_empty());
        }
        assert!(hatch_shapes(&r, Hatch::Dots, 0.25).marks.iter().all(|m| m.filled));
    }

    #[test]
    fn document_contains_every_item() {
        let items = [
            RenderItem::tile(rect(0, 0, 2, 2), Color::rgb(255, 0, 0)),
            RenderItem::candidate(rect(2, 0, 3, 1)),
        ];
        let svg = tiling_to_svg(&items, 5, 5, &SvgOptions::default()).unwrap();

        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("viewBox=\"0 0 5 5\""));
        assert!(svg.contains("fill=\"#FF0000\""));
        assert!(svg.contains("<rect x=\"2\" y=\"0\" width=\"3\" height=\"1\" fill=\"none\""));
        assert!(svg.contains("<line"), "candidate should be hatched");
        assert!(svg.trim_end().ends_with("</svg>"));
    }

    #[test]
    fn document_rejects_empty_frame() {
        assert!(tiling_to_svg(&[], 5, 5, &SvgOptions::default()).is_err());
    }

    #[test]
    fn renderer_collects_frames() {
        let mut renderer = SvgRenderer::new(SvgOptions::default().with_grid(false));
        let items = [RenderItem::tile(rect(0, 0, 1, 1), Color::rgb(0, 0, 0))];
        renderer.render(&items, 2, 2).unwrap();
        renderer.render(&items, 2, 2).unwrap();
        assert_eq!(renderer.frames().len(), 2);
        assert!(!renderer.last_frame().unwrap().contains("#dddddd"));
    }
}
