//! Randomized greedy tiling of a bounding region.
//!
//! The driver keeps drawing random rectangles and tries to fit each one into
//! the tiles placed so far:
//!
//! ```text
//! Sampling -> Validating -+-> Rejected ------------------------> Sampling
//!                         +-> AcceptedDirect ----------+
//!                         +-> Truncating -+-> AcceptedTruncated -+-> CheckTermination
//!                                         +-> Discarded -> Sampling
//! ```
//!
//! A candidate is rejected when it sticks out of the bounding region, or when
//! it contains (or sits inside) a tile that is already placed. Otherwise it is
//! accepted as-is if it touches nothing, or cut down with
//! [`Rectangle::truncate`] against the tiles it does touch. If nothing of it
//! survives, the attempt is discarded.
//!
//! The run stops when the requested number of tiles is placed or the region
//! is fully covered, whichever comes first. Because the loop is pure
//! rejection sampling, a target that cannot be reached would spin forever;
//! [`TilingConfig::max_attempts_per_tile`] turns that into
//! [`TilingError::Unfillable`].
//!
//! The default limit grows with the square of the bound's area. A free unit
//! cell is always accepted as-is, and a uniform source samples one specific
//! unit cell with probability `1 / area²`, so `k * area²` misses in a row
//! happen with probability below `e^-k` while any cell is still free.

use log::{debug, trace};
use thiserror::Error;

use crate::geometry::{GeometryError, Rectangle};
use crate::render::{
    CyclePalette, Hatch, NoopRenderer, Palette, RenderError, RenderItem, Renderer,
};
use crate::rng::SampleSource;

/// Multiplier on `area²` for [`AttemptLimit::Scaled`].
pub const ATTEMPTS_PER_AREA_SQUARED: u64 = 32;

/// Floor for [`AttemptLimit::Scaled`] on tiny bounds.
pub const MIN_ATTEMPT_LIMIT: u64 = 10_000;

/// Cap on consecutive attempts that place nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptLimit {
    /// Derived from the bound, see [`default_attempt_limit`].
    #[default]
    Scaled,
    Fixed(u64),
    Unlimited,
}

impl AttemptLimit {
    /// The concrete limit for a region, `None` when the run never gives up.
    pub fn for_area(self, area: i64) -> Option<u64> {
        match self {
            AttemptLimit::Scaled => Some(default_attempt_limit(area)),
            AttemptLimit::Fixed(n) => Some(n),
            AttemptLimit::Unlimited => None,
        }
    }
}

/// `ATTEMPTS_PER_AREA_SQUARED * area²`, saturating, never below
/// `MIN_ATTEMPT_LIMIT`.
pub fn default_attempt_limit(area: i64) -> u64 {
    let area = area.max(0) as u64;
    area.saturating_mul(area)
        .saturating_mul(ATTEMPTS_PER_AREA_SQUARED)
        .max(MIN_ATTEMPT_LIMIT)
}

/// Errors from a tiling run.
#[derive(Debug, Error)]
pub enum TilingError {
    #[error(
        "gave up after {attempts} attempts without placing another tile \
         ({placed} placed, {covered_area} of {bound_area} covered)"
    )]
    Unfillable {
        placed: usize,
        attempts: u64,
        covered_area: i64,
        bound_area: i64,
    },
    #[error("at least one iteration is required")]
    NoIterations,
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    #[error("renderer failed")]
    Render(#[from] RenderError),
}

/// When a run is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// Stop once this many tiles are placed (or the region is full).
    TileCount(usize),
    /// Stop only when the region is fully covered.
    FullCoverage,
}

/// Configuration for a tiling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilingConfig {
    pub termination: Termination,
    /// Consecutive attempts allowed without placing a tile.
    pub max_attempts_per_tile: AttemptLimit,
    /// Hatch drawn inside the candidate in visualization frames.
    pub candidate_hatch: Hatch,
}

impl Default for TilingConfig {
    fn default() -> Self {
        Self {
            termination: Termination::FullCoverage,
            max_attempts_per_tile: AttemptLimit::Scaled,
            candidate_hatch: Hatch::Diagonal,
        }
    }
}

impl TilingConfig {
    /// Stop after `count` tiles.
    pub fn with_target(mut self, count: usize) -> Self {
        self.termination = Termination::TileCount(count);
        self
    }

    pub fn with_termination(mut self, termination: Termination) -> Self {
        self.termination = termination;
        self
    }

    pub fn with_max_attempts(mut self, limit: AttemptLimit) -> Self {
        self.max_attempts_per_tile = limit;
        self
    }

    pub fn with_candidate_hatch(mut self, hatch: Hatch) -> Self {
        self.candidate_hatch = hatch;
        self
    }
}

/// Area requested versus area covered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coverage {
    pub desired_area: i64,
    pub actual_area: i64,
}

impl Coverage {
    pub fn is_complete(&self) -> bool {
        self.actual_area == self.desired_area
    }

    /// Covered fraction in `[0, 1]`.
    pub fn fraction(&self) -> f64 {
        if self.desired_area == 0 {
            return 0.0;
        }
        self.actual_area as f64 / self.desired_area as f64
    }
}

/// Counters for what happened to each attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TilingStats {
    pub attempts: u64,
    pub rejected_bounds: u64,
    pub rejected_nesting: u64,
    pub discarded_truncations: u64,
    pub accepted_direct: u64,
    pub accepted_truncated: u64,
}

/// Result of a tiling run.
#[derive(Debug, Clone)]
pub struct Tiling {
    pub tiles: Vec<Rectangle>,
    pub coverage: Coverage,
    pub stats: TilingStats,
}

impl Tiling {
    /// Filled render items for every tile, colored by `palette`.
    pub fn render_items<P: Palette + ?Sized>(&self, palette: &mut P) -> Vec<RenderItem> {
        self.tiles
            .iter()
            .map(|&tile| RenderItem::tile(tile, palette.next_color()))
            .collect()
    }
}

/// Why a candidate never reached truncation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Rejection {
    OutOfBounds,
    Nested,
}

/// Runs the greedy tiling loop over one bounding region.
#[derive(Debug, Clone)]
pub struct Tiler {
    bound: Rectangle,
    config: TilingConfig,
}

impl Tiler {
    pub fn new(bound: Rectangle, config: TilingConfig) -> Self {
        Self { bound, config }
    }

    pub fn bound(&self) -> Rectangle {
        self.bound
    }

    pub fn config(&self) -> &TilingConfig {
        &self.config
    }

    /// Consecutive misses this run tolerates, `None` for no limit.
    pub fn attempt_limit(&self) -> Option<u64> {
        self.config.max_attempts_per_tile.for_area(self.bound.area())
    }

    /// Run to completion.
    ///
    /// `source` drives every random choice. `palette` and `renderer` are only
    /// consulted when `renderer.is_enabled()`.
    pub fn run<S, P, R>(
        &self,
        source: &mut S,
        palette: &mut P,
        renderer: &mut R,
    ) -> Result<Tiling, TilingError>
    where
        S: SampleSource + ?Sized,
        P: Palette + ?Sized,
        R: Renderer + ?Sized,
    {
        let bound_area = self.bound.area();
        let (canvas_width, canvas_height) = (self.bound.right(), self.bound.top());

        let mut tiles: Vec<Rectangle> = Vec::new();
        let mut covered_area = 0_i64;
        let mut stats = TilingStats::default();
        let mut frame: Option<Vec<RenderItem>> = renderer.is_enabled().then(Vec::new);
        let mut since_last_tile = 0_u64;
        let limit = self.attempt_limit();

        while !self.is_done(tiles.len(), covered_area) {
            if limit.is_some_and(|limit| since_last_tile >= limit) {
                return Err(TilingError::Unfillable {
                    placed: tiles.len(),
                    attempts: stats.attempts,
                    covered_area,
                    bound_area,
                });
            }

            stats.attempts += 1;
            since_last_tile += 1;

            let candidate = self.sample(source)?;

            if let Some(rejection) = self.reject(&candidate, &tiles) {
                match rejection {
                    Rejection::OutOfBounds => stats.rejected_bounds += 1,
                    Rejection::Nested => stats.rejected_nesting += 1,
                }
                trace!("attempt {}: {} rejected ({:?})", stats.attempts, candidate, rejection);
                continue;
            }

            if let Some(items) = frame.as_mut() {
                items.push(RenderItem::hatched(candidate, self.config.candidate_hatch));
                renderer.render(items, canvas_width, canvas_height)?;
                items.pop();
            }

            let Some((tile, truncated)) = self.place(&candidate, &tiles) else {
                stats.discarded_truncations += 1;
                trace!("attempt {}: {} has no free subregion", stats.attempts, candidate);
                if let Some(items) = frame.as_ref().filter(|items| !items.is_empty()) {
                    renderer.render(items, canvas_width, canvas_height)?;
                }
                continue;
            };

            if truncated {
                stats.accepted_truncated += 1;
            } else {
                stats.accepted_direct += 1;
            }
            tiles.push(tile);
            covered_area += tile.area();
            since_last_tile = 0;
            debug_assert!(covered_area <= bound_area);

            debug!(
                "tile {}: {} (candidate {}, {}/{} covered)",
                tiles.len(),
                tile,
                candidate,
                covered_area,
                bound_area
            );

            if let Some(items) = frame.as_mut() {
                items.push(RenderItem::tile(tile, palette.next_color()));
                renderer.render(items, canvas_width, canvas_height)?;
            }
        }

        Ok(Tiling {
            tiles,
            coverage: Coverage { desired_area: bound_area, actual_area: covered_area },
            stats,
        })
    }

    fn is_done(&self, placed: usize, covered_area: i64) -> bool {
        if covered_area >= self.bound.area() {
            return true;
        }
        match self.config.termination {
            Termination::TileCount(target) => placed >= target,
            Termination::FullCoverage => false,
        }
    }

    /// Draw a candidate: origin inside the bound, size up to the bound's.
    ///
    /// The candidate may extend past the bound; validation catches that.
    fn sample<S: SampleSource + ?Sized>(&self, source: &mut S) -> Result<Rectangle, GeometryError> {
        let b = &self.bound;
        let x = source.sample(b.x(), b.right() - 1);
        let y = source.sample(b.y(), b.top() - 1);
        let width = source.sample(1, b.width());
        let height = source.sample(1, b.height());
        Rectangle::new((x, y), width, height)
    }

    fn reject(&self, candidate: &Rectangle, tiles: &[Rectangle]) -> Option<Rejection> {
        if !candidate.is_inside(&self.bound) {
            return Some(Rejection::OutOfBounds);
        }
        if tiles.iter().any(|t| candidate.is_inside(t) || t.is_inside(candidate)) {
            return Some(Rejection::Nested);
        }
        None
    }

    /// The tile to place for a validated candidate and whether it was cut
    /// down, or `None` when nothing of it fits.
    fn place(&self, candidate: &Rectangle, tiles: &[Rectangle]) -> Option<(Rectangle, bool)> {
        let touching: Vec<Rectangle> = tiles
            .iter()
            .filter(|t| candidate.touches(t))
            .copied()
            .collect();

        if touching.is_empty() {
            return Some((*candidate, false));
        }
        candidate.truncate(&touching).map(|tile| (tile, true))
    }
}

/// First pair of tiles `(i, j)` where one touches the other, if any.
pub fn first_conflict(tiles: &[Rectangle]) -> Option<(usize, usize)> {
    for (i, a) in tiles.iter().enumerate() {
        for (j, b) in tiles.iter().enumerate().skip(i + 1) {
            if a.touches(b) || b.touches(a) {
                return Some((i, j));
            }
        }
    }
    None
}

/// Place up to `target` tiles inside `bound`.
///
/// Returns the tiles and how much of the bound they cover. The run ends
/// early if the bound fills up first.
pub fn build_tiling<S: SampleSource + ?Sized>(
    target: usize,
    bound: Rectangle,
    source: &mut S,
) -> Result<(Vec<Rectangle>, Coverage), TilingError> {
    let tiler = Tiler::new(bound, TilingConfig::default().with_target(target));
    let tiling = tiler.run(source, &mut CyclePalette::default(), &mut NoopRenderer)?;
    Ok((tiling.tiles, tiling.coverage))
}

/// Mean number of tiles needed to cover `bound` completely, over
/// `iterations` independent runs.
pub fn average_tile_count<S: SampleSource + ?Sized>(
    iterations: usize,
    bound: Rectangle,
    source: &mut S,
) -> Result<f64, TilingError> {
    if iterations == 0 {
        return Err(TilingError::NoIterations);
    }

    let tiler = Tiler::new(bound, TilingConfig::default());
    let mut total = 0_usize;
    for trial in 0..iterations {
        let tiling = tiler.run(source, &mut CyclePalette::default(), &mut NoopRenderer)?;
        debug!("trial {}: {} tiles", trial + 1, tiling.tiles.len());
        total += tiling.tiles.len();
    }

    Ok(total as f64 / iterations as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::any_set;
    use crate::render::RecordingRenderer;
    use crate::rng::Rng;

    fn rect(x: i64, y: i64, w: i64, h: i64) -> Rectangle {
        Rectangle::new((x, y), w, h).unwrap()
    }

    /// Replays a fixed list of draws, wrapping around at the end.
    struct Script {
        values: Vec<i64>,
        pos: usize,
    }

    impl Script {
        fn new(values: &[i64]) -> Self {
            Self { values: values.to_vec(), pos: 0 }
        }
    }

    impl SampleSource for Script {
        fn sample(&mut self, low: i64, high_inclusive: i64) -> i64 {
            let v = self.values[self.pos % self.values.len()];
            self.pos += 1;
            assert!(
                v >= low && v <= high_inclusive,
                "scripted {} outside [{}, {}]",
                v,
                low,
                high_inclusive
            );
            v
        }
    }

    fn assert_valid_tiling(tiles: &[Rectangle], bound: &Rectangle) {
        for t in tiles {
            assert!(t.is_inside(bound), "{} escapes {}", t, bound);
        }
        for (i, a) in tiles.iter().enumerate() {
            for b in tiles.iter().skip(i + 1) {
                assert!(!any_set(&a.corner(b)) && !any_set(&a.borders(b)), "{} touches {}", a, b);
                assert!(!any_set(&b.corner(a)) && !any_set(&b.borders(a)), "{} touches {}", b, a);
                assert_eq!(a.overlap(b), None);
            }
        }
    }

    #[test]
    fn truncates_second_tile() {
        let bound = rect(0, 0, 4, 4);
        // (0,0,2,4) then (1,0,3,4), which gets cut down to (2,0,2,4).
        let mut source = Script::new(&[0, 0, 2, 4, 1, 0, 3, 4]);
        let tiling = Tiler::new(bound, TilingConfig::default())
            .run(&mut source, &mut CyclePalette::default(), &mut NoopRenderer)
            .unwrap();

        assert_eq!(tiling.tiles, vec![rect(0, 0, 2, 4), rect(2, 0, 2, 4)]);
        assert!(tiling.coverage.is_complete());
        assert_eq!(tiling.stats.attempts, 2);
        assert_eq!(tiling.stats.accepted_direct, 1);
        assert_eq!(tiling.stats.accepted_truncated, 1);
    }

    #[test]
    fn rejects_out_of_bounds_and_nested() {
        let bound = rect(0, 0, 4, 4);
        let mut source = Script::new(&[
            3, 3, 4, 4, // sticks out
            0, 0, 2, 4, // accepted
            0, 0, 1, 1, // inside the first tile
            0, 0, 4, 4, // contains the first tile
            2, 0, 2, 4, // accepted, fills the bound
        ]);
        let tiling = Tiler::new(bound, TilingConfig::default())
            .run(&mut source, &mut CyclePalette::default(), &mut NoopRenderer)
            .unwrap();

        assert_eq!(tiling.tiles, vec![rect(0, 0, 2, 4), rect(2, 0, 2, 4)]);
        assert_eq!(tiling.stats.rejected_bounds, 1);
        assert_eq!(tiling.stats.rejected_nesting, 2);
        assert_eq!(tiling.stats.attempts, 5);
    }

    #[test]
    fn discards_candidate_with_no_free_subregion() {
        let bound = rect(0, 0, 6, 2);
        let mut source = Script::new(&[
            0, 0, 2, 2, // A
            2, 0, 2, 2, // B, shares an edge with A
            1, 0, 2, 2, // straddles A and B: nothing survives
            4, 0, 2, 2, // C, fills the bound
        ]);
        let mut renderer = RecordingRenderer::default();
        let tiling = Tiler::new(bound, TilingConfig::default())
            .run(&mut source, &mut CyclePalette::default(), &mut renderer)
            .unwrap();

        assert_eq!(tiling.tiles, vec![rect(0, 0, 2, 2), rect(2, 0, 2, 2), rect(4, 0, 2, 2)]);
        assert_eq!(tiling.stats.discarded_truncations, 1);
        assert_eq!(tiling.stats.accepted_direct, 3);

        // Candidate frame plus outcome frame for each validated attempt.
        assert_eq!(renderer.frames.len(), 8);
        let last = renderer.frames.last().unwrap();
        assert_eq!(last.len(), 3);
        assert!(last.iter().all(|item| item.fill && item.color.is_some()));

        let discard_frame = &renderer.frames[5];
        assert_eq!(discard_frame.len(), 2, "discarded candidate should be removed");
    }

    #[test]
    fn candidate_frames_are_hatched() {
        let bound = rect(0, 0, 2, 2);
        let mut source = Script::new(&[0, 0, 2, 2]);
        let mut renderer = RecordingRenderer::default();
        Tiler::new(bound, TilingConfig::default())
            .run(&mut source, &mut CyclePalette::default(), &mut renderer)
            .unwrap();

        assert_eq!(renderer.frames.len(), 2);
        assert_eq!(renderer.frames[0], vec![RenderItem::candidate(bound)]);
        assert!(renderer.frames[1][0].fill);
    }

    #[test]
    fn candidate_hatch_is_configurable() {
        let bound = rect(0, 0, 2, 2);
        let mut source = Script::new(&[0, 0, 2, 2]);
        let mut renderer = RecordingRenderer::default();
        let config = TilingConfig::default().with_candidate_hatch(Hatch::Dots);
        Tiler::new(bound, config)
            .run(&mut source, &mut CyclePalette::default(), &mut renderer)
            .unwrap();

        assert_eq!(renderer.frames[0], vec![RenderItem::hatched(bound, Hatch::Dots)]);
    }

    #[test]
    fn gives_up_when_nothing_fits() {
        let bound = rect(0, 0, 4, 4);
        let mut source = Script::new(&[3, 3, 4, 4]);
        let config = TilingConfig::default().with_max_attempts(AttemptLimit::Fixed(10));
        let err = Tiler::new(bound, config)
            .run(&mut source, &mut CyclePalette::default(), &mut NoopRenderer)
            .unwrap_err();

        match err {
            TilingError::Unfillable { placed, attempts, covered_area, bound_area } => {
                assert_eq!(placed, 0);
                assert_eq!(attempts, 10);
                assert_eq!(covered_area, 0);
                assert_eq!(bound_area, 16);
            }
            other => panic!("expected Unfillable, got {:?}", other),
        }
    }

    #[test]
    fn full_coverage_runs_are_valid() {
        let bound = rect(0, 0, 6, 5);
        for seed in 0..20 {
            let mut rng = Rng::new(seed);
            let mut renderer = RecordingRenderer::default();
            let tiling = Tiler::new(bound, TilingConfig::default())
                .run(&mut rng, &mut CyclePalette::default(), &mut renderer)
                .unwrap();

            assert!(tiling.coverage.is_complete(), "seed {} left gaps", seed);
            assert_eq!(tiling.tiles.iter().map(|t| t.area()).sum::<i64>(), bound.area());
            assert_valid_tiling(&tiling.tiles, &bound);
            assert_eq!(first_conflict(&tiling.tiles), None);

            // Every frame made only of placed tiles is itself a valid tiling.
            for frame in renderer.frames.iter().filter(|f| f.iter().all(|i| i.fill)) {
                let tiles: Vec<_> = frame.iter().map(|i| i.rect).collect();
                assert_valid_tiling(&tiles, &bound);
                assert!(tiles.iter().map(|t| t.area()).sum::<i64>() <= bound.area());
            }
        }
    }

    #[test]
    fn default_limit_scales_with_area() {
        assert_eq!(default_attempt_limit(1), MIN_ATTEMPT_LIMIT);
        assert_eq!(default_attempt_limit(1600), 1600 * 1600 * ATTEMPTS_PER_AREA_SQUARED);
        assert_eq!(default_attempt_limit(i64::MAX), u64::MAX);

        let tiler = Tiler::new(rect(0, 0, 40, 40), TilingConfig::default());
        assert_eq!(tiler.attempt_limit(), Some(default_attempt_limit(1600)));
        let config = TilingConfig::default().with_max_attempts(AttemptLimit::Unlimited);
        assert_eq!(Tiler::new(rect(0, 0, 40, 40), config).attempt_limit(), None);
    }

    #[test]
    fn default_limit_covers_forty_by_forty() {
        let bound = rect(0, 0, 40, 40);
        for seed in [1, 7] {
            let tiling = Tiler::new(bound, TilingConfig::default())
                .run(&mut Rng::new(seed), &mut CyclePalette::default(), &mut NoopRenderer)
                .unwrap_or_else(|e| panic!("seed {} gave up: {}", seed, e));
            assert!(tiling.coverage.is_complete(), "seed {} left gaps", seed);
            assert_valid_tiling(&tiling.tiles, &bound);
        }
    }

    #[test]
    fn tile_count_target_is_respected() {
        let bound = rect(0, 0, 10, 10);
        let mut rng = Rng::new(11);
        let (tiles, coverage) = build_tiling(3, bound, &mut rng).unwrap();

        assert!(tiles.len() <= 3);
        assert!(tiles.len() == 3 || coverage.is_complete());
        assert_eq!(coverage.desired_area, 100);
        assert_eq!(coverage.actual_area, tiles.iter().map(|t| t.area()).sum::<i64>());
        assert_valid_tiling(&tiles, &bound);
    }

    #[test]
    fn zero_target_places_nothing() {
        let mut rng = Rng::new(1);
        let (tiles, coverage) = build_tiling(0, rect(0, 0, 3, 3), &mut rng).unwrap();
        assert!(tiles.is_empty());
        assert_eq!(coverage.actual_area, 0);
    }

    #[test]
    fn same_seed_same_tiling() {
        let bound = rect(0, 0, 7, 4);
        let (a, _) = build_tiling(5, bound, &mut Rng::new(99)).unwrap();
        let (b, _) = build_tiling(5, bound, &mut Rng::new(99)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn offset_bound_is_respected() {
        let bound = rect(2, 3, 4, 3);
        let mut rng = Rng::new(5);
        let tiling = Tiler::new(bound, TilingConfig::default())
            .run(&mut rng, &mut CyclePalette::default(), &mut NoopRenderer)
            .unwrap();
        assert!(tiling.coverage.is_complete());
        assert_valid_tiling(&tiling.tiles, &bound);
    }

    #[test]
    fn average_needs_iterations() {
        let mut rng = Rng::new(0);
        assert!(matches!(
            average_tile_count(0, rect(0, 0, 3, 3), &mut rng),
            Err(TilingError::NoIterations)
        ));
    }

    #[test]
    fn average_is_between_one_and_area() {
        let mut rng = Rng::new(4);
        let mean = average_tile_count(5, rect(0, 0, 3, 3), &mut rng).unwrap();
        assert!(mean >= 1.0 && mean <= 9.0, "mean {} out of range", mean);
    }

    #[test]
    fn single_cell_bound_takes_one_tile() {
        let mut rng = Rng::new(2);
        let mean = average_tile_count(3, rect(0, 0, 1, 1), &mut rng).unwrap();
        assert_eq!(mean, 1.0);
    }

    #[test]
    fn conflict_detection() {
        assert_eq!(first_conflict(&[rect(0, 0, 2, 2), rect(2, 0, 2, 2)]), None);
        assert_eq!(
            first_conflict(&[rect(0, 0, 2, 2), rect(5, 5, 1, 1), rect(1, 1, 2, 2)]),
            Some((0, 2))
        );
    }
}
