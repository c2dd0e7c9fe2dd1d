//! Visualization boundary.
//!
//! The tiling driver can show its progress, but drawing is not its job. It
//! hands a list of [`RenderItem`]s to whatever [`Renderer`] the caller
//! injected, and asks a [`Palette`] for tile colors. Neither choice affects
//! which tiles get placed.
//!
//! When visualization is off, pass [`NoopRenderer`]: it reports itself as
//! disabled and the driver skips building render lists entirely.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::geometry::Rectangle;
use crate::rng::SampleSource;

/// Errors raised while validating or drawing a frame.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("canvas must have positive size, got {width}x{height}")]
    EmptyCanvas { width: i64, height: i64 },
    #[error("nothing to draw")]
    NothingToDraw,
    #[error("color must be in #RRGGBB form, got {0:?}")]
    InvalidColor(String),
    #[error("unknown hatch {0:?} (expected one of / \\ - + x o O . *)")]
    InvalidHatch(String),
    #[error("failed to write frame")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// STYLE
// ============================================================================

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || RenderError::InvalidColor(s.to_string());

        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());

        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

/// Hatch fill styles, keyed by the character that names them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hatch {
    /// `/`
    Diagonal,
    /// `\`
    BackDiagonal,
    /// `-`
    Horizontal,
    /// `+`
    Crossed,
    /// `x`
    CrossedDiagonal,
    /// `o`
    SmallCircle,
    /// `O`
    LargeCircle,
    /// `.`
    Dots,
    /// `*`
    Stars,
}

impl Hatch {
    pub fn all() -> &'static [Hatch] {
        &[
            Hatch::Diagonal,
            Hatch::BackDiagonal,
            Hatch::Horizontal,
            Hatch::Crossed,
            Hatch::CrossedDiagonal,
            Hatch::SmallCircle,
            Hatch::LargeCircle,
            Hatch::Dots,
            Hatch::Stars,
        ]
    }

    pub fn symbol(&self) -> char {
        match self {
            Hatch::Diagonal => '/',
            Hatch::BackDiagonal => '\\',
            Hatch::Horizontal => '-',
            Hatch::Crossed => '+',
            Hatch::CrossedDiagonal => 'x',
            Hatch::SmallCircle => 'o',
            Hatch::LargeCircle => 'O',
            Hatch::Dots => '.',
            Hatch::Stars => '*',
        }
    }
}

impl FromStr for Hatch {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Hatch::all()
                .iter()
                .copied()
                .find(|h| h.symbol() == c)
                .ok_or_else(|| RenderError::InvalidHatch(s.to_string())),
            _ => Err(RenderError::InvalidHatch(s.to_string())),
        }
    }
}

/// One rectangle to draw, with its style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderItem {
    pub rect: Rectangle,
    pub color: Option<Color>,
    pub hatch: Option<Hatch>,
    /// Paint the interior with `color` rather than leaving it transparent.
    pub fill: bool,
}

impl RenderItem {
    /// A candidate under consideration: diagonal hatch, no fill.
    pub fn candidate(rect: Rectangle) -> Self {
        Self::hatched(rect, Hatch::Diagonal)
    }

    /// An unfilled outline with `hatch` inside.
    pub fn hatched(rect: Rectangle, hatch: Hatch) -> Self {
        Self { rect, color: None, hatch: Some(hatch), fill: false }
    }

    /// An accepted tile: solid fill in `color`.
    pub fn tile(rect: Rectangle, color: Color) -> Self {
        Self { rect, color: Some(color), hatch: None, fill: true }
    }
}

/// Check the arguments every renderer receives.
pub fn validate_frame(items: &[RenderItem], width: i64, height: i64) -> Result<(), RenderError> {
    if width <= 0 || height <= 0 {
        return Err(RenderError::EmptyCanvas { width, height });
    }
    if items.is_empty() {
        return Err(RenderError::NothingToDraw);
    }
    Ok(())
}

// ============================================================================
// RENDERERS
// ============================================================================

/// Receives a full frame each time the driver's picture changes.
pub trait Renderer {
    /// Whether the driver should build frames at all.
    fn is_enabled(&self) -> bool {
        true
    }

    /// Draw `items` on a `width` x `height` canvas.
    fn render(&mut self, items: &[RenderItem], width: i64, height: i64) -> Result<(), RenderError>;
}

/// Renderer used when visualization is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn is_enabled(&self) -> bool {
        false
    }

    fn render(
        &mut self,
        _items: &[RenderItem],
        _width: i64,
        _height: i64,
    ) -> Result<(), RenderError> {
        Ok(())
    }
}

/// Keeps every frame in memory. Handy for tests and for callers that want
/// to post-process frames themselves.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<Vec<RenderItem>>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, items: &[RenderItem], width: i64, height: i64) -> Result<(), RenderError> {
        validate_frame(items, width, height)?;
        self.frames.push(items.to_vec());
        Ok(())
    }
}

// ============================================================================
// PALETTES
// ============================================================================

/// Chooses the color of each accepted tile.
pub trait Palette {
    fn next_color(&mut self) -> Color;
}

/// Vibrant color palette for tiles.
pub const COLORS: &[Color] = &[
    Color::rgb(0xE6, 0x39, 0x46), // Red
    Color::rgb(0xF4, 0xA2, 0x61), // Orange
    Color::rgb(0x2A, 0x9D, 0x8F), // Teal
    Color::rgb(0x26, 0x46, 0x53), // Dark blue
    Color::rgb(0xE9, 0xC4, 0x6A), // Yellow
    Color::rgb(0x83, 0x38, 0xEC), // Purple
    Color::rgb(0xFF, 0x00, 0x6E), // Pink
    Color::rgb(0x3A, 0x86, 0xFF), // Blue
    Color::rgb(0x06, 0xD6, 0xA0), // Mint
    Color::rgb(0xFB, 0x56, 0x07), // Deep orange
    Color::rgb(0x72, 0x09, 0xB7), // Violet
    Color::rgb(0x00, 0xB4, 0xD8), // Cyan
    Color::rgb(0x90, 0xBE, 0x6D), // Sage
    Color::rgb(0xF7, 0x25, 0x85), // Magenta
    Color::rgb(0x43, 0x61, 0xEE), // Indigo
];

/// Cycles through a fixed list of colors.
#[derive(Debug, Clone)]
pub struct CyclePalette {
    colors: Vec<Color>,
    next: usize,
}

impl CyclePalette {
    /// Falls back to [`COLORS`] when `colors` is empty.
    pub fn new(colors: Vec<Color>) -> Self {
        let colors = if colors.is_empty() { COLORS.to_vec() } else { colors };
        Self { colors, next: 0 }
    }
}

impl Default for CyclePalette {
    fn default() -> Self {
        Self::new(COLORS.to_vec())
    }
}

impl Palette for CyclePalette {
    fn next_color(&mut self) -> Color {
        let color = self.colors[self.next % self.colors.len()];
        self.next = self.next.wrapping_add(1);
        color
    }
}

/// Draws each channel uniformly from `0..=255`.
///
/// Uses its own sample source so color choice never disturbs the sequence
/// the tiling driver draws from.
#[derive(Debug, Clone)]
pub struct RandomPalette<S> {
    source: S,
}

impl<S: SampleSource> RandomPalette<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }
}

impl<S: SampleSource> Palette for RandomPalette<S> {
    fn next_color(&mut self) -> Color {
        let mut channel = || self.source.sample(0, 255) as u8;
        Color::rgb(channel(), channel(), channel())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::Rng;

    #[test]
    fn color_parses_hex() {
        assert_eq!("#0000ff".parse::<Color>().unwrap(), Color::rgb(0, 0, 255));
        assert_eq!("#C0C0C0".parse::<Color>().unwrap(), Color::rgb(192, 192, 192));
    }

    #[test]
    fn color_rejects_malformed() {
        for bad in ["0000ff", "#00ff", "#00ff00ff", "#00gg00", "", "#"] {
            assert!(
                matches!(bad.parse::<Color>(), Err(RenderError::InvalidColor(_))),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn color_display_round_trips() {
        let c = Color::rgb(0x80, 0x00, 0x80);
        assert_eq!(c.to_string(), "#800080");
        assert_eq!(c.to_string().parse::<Color>().unwrap(), c);
    }

    #[test]
    fn hatch_parses_every_symbol() {
        for &h in Hatch::all() {
            assert_eq!(h.symbol().to_string().parse::<Hatch>().unwrap(), h);
        }
        assert!("#".parse::<Hatch>().is_err());
        assert!("//".parse::<Hatch>().is_err());
        assert!("".parse::<Hatch>().is_err());
    }

    #[test]
    fn frame_validation() {
        let r = Rectangle::new((0, 0), 1, 1).unwrap();
        let items = [RenderItem::candidate(r)];

        assert!(validate_frame(&items, 10, 10).is_ok());
        assert!(matches!(validate_frame(&items, 0, 10), Err(RenderError::EmptyCanvas { .. })));
        assert!(matches!(validate_frame(&[], 10, 10), Err(RenderError::NothingToDraw)));
    }

    #[test]
    fn noop_renderer_is_disabled() {
        let mut r = NoopRenderer;
        assert!(!r.is_enabled());
        assert!(r.render(&[], 0, 0).is_ok());
    }

    #[test]
    fn cycle_palette_wraps() {
        let red = Color::rgb(255, 0, 0);
        let blue = Color::rgb(0, 0, 255);
        let mut p = CyclePalette::new(vec![red, blue]);
        assert_eq!(p.next_color(), red);
        assert_eq!(p.next_color(), blue);
        assert_eq!(p.next_color(), red);
    }

    #[test]
    fn empty_cycle_palette_uses_defaults() {
        let mut p = CyclePalette::new(Vec::new());
        assert_eq!(p.next_color(), COLORS[0]);
    }

    #[test]
    fn random_palette_is_seeded() {
        let mut a = RandomPalette::new(Rng::new(3));
        let mut b = RandomPalette::new(Rng::new(3));
        for _ in 0..10 {
            assert_eq!(a.next_color(), b.next_color());
        }
    }
}
