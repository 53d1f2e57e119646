//! Collision tests between entities and rocks
//!
//! Entities are axis-aligned rectangles; rocks are closed polygons. Both
//! tests are boolean: the simulation only needs to know whether to revert a
//! move, collect a coin or end the run.

use super::geometry::{Polygon, Rect, Segment};
use super::sweep::any_intersection;

/// True if two rectangles overlap or touch
///
/// Edges are inclusive, so rectangles sharing only a border collide.
#[inline]
pub fn rects_collide(a: &Rect, b: &Rect) -> bool {
    a.left() <= b.right() && b.left() <= a.right() && a.top() <= b.bottom() && b.top() <= a.bottom()
}

/// True if a rectangle's boundary touches or crosses a single segment
///
/// The rectangle's own edges always meet at its corners, so they are tested
/// in two groups that never touch each other: top/bottom, then left/right.
pub fn rect_touches_segment(rect: &Rect, edge: Segment) -> bool {
    let [top, bottom] = rect.horizontal_edges();
    if any_intersection(&[top, bottom, edge]) {
        return true;
    }
    let [left, right] = rect.vertical_edges();
    any_intersection(&[left, right, edge])
}

/// True if any polygon edge touches or crosses the rectangle's boundary
///
/// A rectangle sitting entirely inside a polygon without touching an edge is
/// not reported; walls only block entities crossing into them.
pub fn rect_polygon_collision(rect: &Rect, polygon: &Polygon) -> bool {
    if polygon.len() < 2 {
        return false;
    }
    polygon.edges().any(|edge| rect_touches_segment(rect, edge))
}

/// True if the rectangle collides with any of the rocks
pub fn collides_with_any_rock(rect: &Rect, rocks: &[Polygon]) -> bool {
    rocks.iter().any(|rock| rect_polygon_collision(rect, rock))
}
