//! Largest-subrectangle searches: overlap and truncation.
//!
//! Both operations answer "what is the biggest piece of self that satisfies
//! a contract?":
//!
//! - **overlap**: the piece must lie inside another rectangle. This is plain
//!   rectangle intersection, so it is computed in closed form.
//! - **truncate**: the piece must not touch any obstacle (no corner strictly
//!   inside one, no wall running through one). There is no neat formula for
//!   that against an arbitrary obstacle list, so we walk
//!   [`Rectangle::subregions`] from the largest area down and stop at the
//!   first candidate that clears every obstacle.
//!
//! Truncation costs O(subregions x obstacles). That is fine for the region
//! sizes tiling works with, and hopeless for very large ones.

use crate::geometry::{GeometryError, RectSpec, Rectangle};

impl Rectangle {
    /// The largest sub-rectangle of self that lies inside `other`.
    ///
    /// Returns `None` when the two rectangles share no area (touching edges
    /// do not count).
    pub fn overlap(&self, other: &Rectangle) -> Option<Rectangle> {
        let left = self.x().max(other.x());
        let right = self.right().min(other.right());
        let bottom = self.y().max(other.y());
        let top = self.top().min(other.top());

        if left < right && bottom < top {
            Some(Rectangle::from_parts(left, bottom, right - left, top - bottom))
        } else {
            None
        }
    }

    /// The largest sub-rectangle of self that touches none of `obstacles`.
    ///
    /// With no obstacles self is returned unchanged. Returns `None` when
    /// every sub-rectangle conflicts with some obstacle.
    ///
    /// Ties between equal-area answers are broken by enumeration order; do
    /// not rely on which one you get.
    pub fn truncate(&self, obstacles: &[Rectangle]) -> Option<Rectangle> {
        if obstacles.is_empty() {
            return Some(*self);
        }

        self.subregions()
            .find(|candidate| obstacles.iter().all(|obstacle| !candidate.touches(obstacle)))
    }

    /// [`Rectangle::truncate`] for obstacle lists that have not been
    /// validated yet.
    ///
    /// Every element is converted before the search starts; the first one
    /// that is not a valid rectangle fails the call with
    /// [`GeometryError::InvalidObstacleList`].
    pub fn truncate_specs(
        &self,
        obstacles: &[RectSpec],
    ) -> Result<Option<Rectangle>, GeometryError> {
        let obstacles = obstacles
            .iter()
            .enumerate()
            .map(|(index, &spec)| {
                Rectangle::try_from(spec).map_err(|source| GeometryError::InvalidObstacleList {
                    index,
                    source: Box::new(source),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(self.truncate(&obstacles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predicate::any_set;

    fn rect(x: i64, y: i64, w: i64, h: i64) -> Rectangle {
        Rectangle::new((x, y), w, h).unwrap()
    }

    /// Overlap as defined by search: first subregion fully inside `other`.
    fn overlap_by_search(subject: &Rectangle, other: &Rectangle) -> Option<Rectangle> {
        subject.subregions().find(|r| r.is_inside(other))
    }

    #[test]
    fn overlap_of_crossing_rectangles() {
        let grey = rect(2, 2, 4, 4);
        let result = rect(1, 1, 2, 6).overlap(&grey).unwrap();
        assert_eq!(result, rect(2, 2, 1, 4));
        assert_eq!(result.area(), 4);

        assert_eq!(rect(1, 5, 6, 2).overlap(&grey), Some(rect(2, 5, 4, 1)));
        assert_eq!(rect(1, 1, 6, 2).overlap(&grey), Some(rect(2, 2, 4, 1)));
    }

    #[test]
    fn overlap_of_disjoint_rectangles_is_none() {
        assert_eq!(rect(1, 1, 2, 6).overlap(&rect(4, 1, 2, 6)), None);
        // Shared edge has zero area.
        assert_eq!(rect(0, 0, 2, 2).overlap(&rect(2, 0, 2, 2)), None);
    }

    #[test]
    fn overlap_matches_search_definition() {
        let shapes = [
            rect(0, 0, 4, 4),
            rect(1, 1, 2, 6),
            rect(2, 2, 4, 4),
            rect(3, 0, 1, 1),
            rect(0, 3, 6, 2),
            rect(5, 5, 2, 2),
        ];

        for a in &shapes {
            for b in &shapes {
                let closed = a.overlap(b);
                let searched = overlap_by_search(a, b);
                assert_eq!(
                    closed.map(|r| r.area()),
                    searched.map(|r| r.area()),
                    "area mismatch for {} vs {}",
                    a,
                    b
                );
                if let Some(r) = closed {
                    assert!(r.is_inside(a) && r.is_inside(b));
                }
            }
        }
    }

    #[test]
    fn truncate_against_single_obstacle() {
        let grey = rect(2, 2, 4, 4);

        assert_eq!(rect(1, 1, 2, 6).truncate(&[grey]), Some(rect(1, 1, 1, 6)));
        assert_eq!(rect(1, 5, 6, 2).truncate(&[grey]), Some(rect(1, 6, 6, 1)));
        assert_eq!(rect(1, 1, 6, 2).truncate(&[grey]), Some(rect(1, 1, 6, 1)));
    }

    #[test]
    fn truncate_between_two_obstacles() {
        let subject = rect(2, 1, 4, 6);
        let obstacles = [rect(1, 2, 2, 4), rect(5, 2, 2, 4)];
        assert_eq!(subject.truncate(&obstacles), Some(rect(3, 1, 2, 6)));
    }

    #[test]
    fn truncate_keeps_untouched_subject() {
        let subject = rect(1, 2, 2, 4);
        assert_eq!(subject.truncate(&[rect(5, 2, 2, 4)]), Some(subject));
        assert_eq!(subject.truncate(&[]), Some(subject));
    }

    #[test]
    fn truncate_inside_obstacle_is_none() {
        let subject = rect(3, 3, 2, 2);
        assert_eq!(subject.truncate(&[rect(2, 2, 4, 4)]), None);
    }

    #[test]
    fn truncated_result_touches_no_obstacle() {
        let subject = rect(0, 0, 6, 6);
        let obstacles = [rect(2, 2, 2, 2), rect(5, 0, 1, 3)];
        let result = subject.truncate(&obstacles).unwrap();

        assert!(result.is_inside(&subject));
        for o in &obstacles {
            assert!(!any_set(&result.corner(o)));
            assert!(!any_set(&result.borders(o)));
        }
    }

    #[test]
    fn truncate_specs_validates_every_obstacle() {
        let subject = rect(1, 1, 2, 6);
        let good = RectSpec::new(2.0, 2.0, 4.0, 4.0);
        let bad = RectSpec::new(2.0, 2.0, 0.5, 4.0);

        assert_eq!(subject.truncate_specs(&[good]), Ok(Some(rect(1, 1, 1, 6))));

        match subject.truncate_specs(&[good, bad]) {
            Err(GeometryError::InvalidObstacleList { index, .. }) => assert_eq!(index, 1),
            other => panic!("expected InvalidObstacleList, got {:?}", other),
        }
    }
}
