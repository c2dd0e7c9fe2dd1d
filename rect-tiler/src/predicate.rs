//! Pairwise predicates between rectangles.
//!
//! Each predicate answers four yes/no questions at once and returns them as
//! a `[bool; 4]`:
//!
//! - [`Rectangle::contained`] and [`Rectangle::corner`] report on self's
//!   corners in the order `[LL, TL, LR, TR]`.
//! - [`Rectangle::borders`] reports on self's walls in the order
//!   `[left, right, top, bottom]`.
//!
//! `corner` alone misses a wall that passes straight through another
//! rectangle with both endpoints outside it; `borders` catches that case.

use crate::geometry::{Point, Rectangle};

pub const LOWER_LEFT: usize = 0;
pub const TOP_LEFT: usize = 1;
pub const LOWER_RIGHT: usize = 2;
pub const TOP_RIGHT: usize = 3;

pub const LEFT_WALL: usize = 0;
pub const RIGHT_WALL: usize = 1;
pub const TOP_WALL: usize = 2;
pub const BOTTOM_WALL: usize = 3;

/// True when every flag is set.
#[inline]
pub fn all_set(flags: &[bool; 4]) -> bool {
    flags.iter().all(|&f| f)
}

/// True when at least one flag is set.
#[inline]
pub fn any_set(flags: &[bool; 4]) -> bool {
    flags.iter().any(|&f| f)
}

/// Half-open span test: `lo <= v < hi`.
#[inline]
fn within(v: i64, lo: i64, hi: i64) -> bool {
    v >= lo && v < hi
}

impl Rectangle {
    /// Which of self's corners lie on the inclusive side of `other`'s
    /// matching walls.
    ///
    /// All four true means self sits entirely inside `other`, boundary
    /// included.
    pub fn contained(&self, other: &Rectangle) -> [bool; 4] {
        let mut flags = [false; 4];
        flags[LOWER_LEFT] = self.x() >= other.x() && self.y() >= other.y();
        flags[TOP_LEFT] = self.x() >= other.x() && self.top() <= other.top();
        flags[LOWER_RIGHT] = self.right() <= other.right() && self.y() >= other.y();
        flags[TOP_RIGHT] = self.right() <= other.right() && self.top() <= other.top();
        flags
    }

    /// Which of self's corners lie strictly inside `other`.
    ///
    /// A corner sitting on `other`'s boundary does not count.
    pub fn corner(&self, other: &Rectangle) -> [bool; 4] {
        self.corners().map(|p| other.strictly_contains(p))
    }

    /// Which of self's walls run through `other`.
    ///
    /// A wall counts when its position falls in `other`'s span on the
    /// perpendicular axis and its extent overlaps `other` on the parallel
    /// axis, either by starting inside `other` or by straddling its near
    /// edge. Walls lying exactly on `other`'s far boundary do not count,
    /// so rectangles that merely share an edge never border each other.
    pub fn borders(&self, other: &Rectangle) -> [bool; 4] {
        let vertical_overlap = within(self.y(), other.y(), other.top())
            || (self.y() < other.y() && self.top() > other.y());
        let horizontal_overlap = within(self.x(), other.x(), other.right())
            || (self.x() < other.x() && self.right() > other.x());

        let mut walls = [false; 4];
        walls[LEFT_WALL] = within(self.x(), other.x(), other.right()) && vertical_overlap;
        walls[RIGHT_WALL] =
            self.right() > other.x() && self.right() <= other.right() && vertical_overlap;
        walls[TOP_WALL] =
            self.top() > other.y() && self.top() <= other.top() && horizontal_overlap;
        walls[BOTTOM_WALL] = within(self.y(), other.y(), other.top()) && horizontal_overlap;
        walls
    }

    /// Self lies entirely inside `other`, boundary included.
    #[inline]
    pub fn is_inside(&self, other: &Rectangle) -> bool {
        all_set(&self.contained(other))
    }

    /// Self has a corner strictly inside `other` or a wall running through it.
    ///
    /// This is the conflict test used by truncation and by the tiling driver.
    #[inline]
    pub fn touches(&self, other: &Rectangle) -> bool {
        any_set(&self.corner(other)) || any_set(&self.borders(other))
    }

    #[inline]
    fn strictly_contains(&self, p: Point) -> bool {
        p.x > self.x() && p.x < self.right() && p.y > self.y() && p.y < self.top()
    }
}
