//! Enumeration of every integer sub-rectangle, largest first.
//!
//! A `W x H` rectangle has `(W(W+1)/2) * (H(H+1)/2)` integer sub-rectangles -
//! 225 for a 5x5. Truncation wants the biggest one that passes a predicate,
//! so the enumerator yields them in decreasing area: the first hit is
//! guaranteed maximal and the search can stop there.
//!
//! ## Rust Lesson #3: Lazy Iterators
//!
//! Instead of building a `Vec` of every candidate (which grows with the
//! fourth power of the side length), `Subregions` implements `Iterator` and
//! computes one rectangle per `next()` call. Not even the sizes are stored:
//! the next `(width, height)` is found by walking areas downward and trying
//! the widths that divide each one, so asking a huge rectangle for its first
//! few subregions costs next to nothing.
//!
//! Callers get all the usual adapters for free: `.find()`, `.take(n)`,
//! `.count()`, and so on.
//!
//! Among equal areas the order is wider-first, then by position with x as
//! the outer loop and y the inner one. Nothing should depend on that beyond
//! "the first match has maximal area".

use std::iter::FusedIterator;

use crate::geometry::Rectangle;

/// Lazy, area-descending iterator over the sub-rectangles of a parent.
///
/// Cloning the iterator (or calling [`Rectangle::subregions`] again) restarts
/// the sequence from the largest element.
#[derive(Debug, Clone)]
pub struct Subregions {
    parent: Rectangle,
    /// Current `(width, height)`, or `None` once exhausted.
    size: Option<(i64, i64)>,
    /// Offset of the next position inside the parent for the current size.
    dx: i64,
    dy: i64,
    remaining: u128,
}

impl Subregions {
    fn new(parent: Rectangle) -> Self {
        Self {
            parent,
            size: Some((parent.width(), parent.height())),
            dx: 0,
            dy: 0,
            remaining: parent.subregion_count(),
        }
    }

    /// The rectangle being enumerated.
    pub fn parent(&self) -> Rectangle {
        self.parent
    }

    /// The size that follows `(width, height)`: same area with a narrower
    /// width if one fits, otherwise the widest fit of the next smaller area.
    fn next_size(&self, width: i64, height: i64) -> Option<(i64, i64)> {
        let (max_w, max_h) = (self.parent.width(), self.parent.height());
        let mut area = width * height;
        let mut w = width - 1;

        loop {
            // Heights are capped by the parent, which puts a floor on width.
            let min_w = (area - 1) / max_h + 1;
            while w >= min_w {
                if area % w == 0 {
                    return Some((w, area / w));
                }
                w -= 1;
            }

            area -= 1;
            if area == 0 {
                return None;
            }
            w = max_w.min(area);
        }
    }
}

impl Iterator for Subregions {
    type Item = Rectangle;

    fn next(&mut self) -> Option<Rectangle> {
        let (w, h) = self.size?;

        let rect = Rectangle::from_parts(
            self.parent.x() + self.dx,
            self.parent.y() + self.dy,
            w,
            h,
        );

        // Advance: y inner, x outer, then the next size.
        self.dy += 1;
        if self.dy > self.parent.height() - h {
            self.dy = 0;
            self.dx += 1;
            if self.dx > self.parent.width() - w {
                self.dx = 0;
                self.size = self.next_size(w, h);
            }
        }
        self.remaining -= 1;

        Some(rect)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match usize::try_from(self.remaining) {
            Ok(n) => (n, Some(n)),
            Err(_) => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Subregions {}

impl Rectangle {
    /// Every integer sub-rectangle of self, largest area first.
    pub fn subregions(&self) -> Subregions {
        Subregions::new(*self)
    }

    /// Number of elements [`Rectangle::subregions`] yields.
    pub fn subregion_count(&self) -> u128 {
        let w = self.width() as u128;
        let h = self.height() as u128;
        (w * (w + 1) / 2) * (h * (h + 1) / 2)
    }
}
