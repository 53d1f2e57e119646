//! Geometric primitives for the board
//!
//! Everything lives in board space: x grows to the right, y grows downward,
//! and a rectangle's position is its top-left corner.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::config::Size;

/// A line segment between two points (endpoint order carries no meaning)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub a: DVec2,
    pub b: DVec2,
}

impl Segment {
    pub fn new(a: DVec2, b: DVec2) -> Self {
        Self { a, b }
    }

    /// Endpoints ordered left to right, bottom-up on ties
    pub fn sorted_endpoints(&self) -> (DVec2, DVec2) {
        let (a, b) = (self.a, self.b);
        if a.x < b.x || (a.x == b.x && a.y <= b.y) {
            (a, b)
        } else {
            (b, a)
        }
    }
}

/// An axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: DVec2,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            pos: DVec2::new(x, y),
            width,
            height,
        }
    }

    /// Rectangle of the given footprint placed at `pos`
    pub fn at(pos: DVec2, size: Size) -> Self {
        Self {
            pos,
            width: size.width,
            height: size.height,
        }
    }

    #[inline]
    pub fn left(&self) -> f64 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.pos.x + self.width
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.pos.y + self.height
    }

    /// The four corners: top-left, top-right, bottom-left, bottom-right
    pub fn corners(&self) -> [DVec2; 4] {
        [
            DVec2::new(self.left(), self.top()),
            DVec2::new(self.right(), self.top()),
            DVec2::new(self.left(), self.bottom()),
            DVec2::new(self.right(), self.bottom()),
        ]
    }

    /// Top and bottom edges
    pub fn horizontal_edges(&self) -> [Segment; 2] {
        let [tl, tr, bl, br] = self.corners();
        [Segment::new(tl, tr), Segment::new(bl, br)]
    }

    /// Left and right edges
    pub fn vertical_edges(&self) -> [Segment; 2] {
        let [tl, tr, bl, br] = self.corners();
        [Segment::new(tl, bl), Segment::new(tr, br)]
    }

    /// True if the whole rectangle sits inside a `board_w` x `board_h` board
    pub fn within_board(&self, board_w: f64, board_h: f64) -> bool {
        self.left() >= 0.0
            && self.top() >= 0.0
            && self.right() <= board_w
            && self.bottom() <= board_h
    }
}

/// A closed polygon (the last vertex connects back to the first)
///
/// Rocks are random walks, so polygons may self-intersect.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Polygon {
    pub vertices: Vec<DVec2>,
}

impl Polygon {
    pub fn new(vertices: Vec<DVec2>) -> Self {
        Self { vertices }
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Edges in order, including the closing edge from last to first
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| Segment::new(self.vertices[(i + n - 1) % n], self.vertices[i]))
    }

    /// Smallest distance from `point` to any vertex
    pub fn min_vertex_distance(&self, point: DVec2) -> Option<f64> {
        self.vertices
            .iter()
            .map(|v| v.distance(point))
            .min_by(|a, b| a.total_cmp(b))
    }
}
