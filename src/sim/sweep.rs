//! Sweep-line segment intersection test
//!
//! Answers "does any pair of these segments touch or cross?" with a
//! Shamos-Hoey sweep: endpoints are visited left to right while the segments
//! spanning the sweep position are kept ordered by their y at that position.
//! The first pair to meet must be neighbours in that order at some event
//! before they meet, so only newly adjacent pairs are ever tested.
//!
//! Tolerance rules:
//! - A point is on a segment when its distance to the segment is at most
//!   `GEOMETRY_EPSILON`. Shared endpoints, T-junctions and collinear overlaps
//!   all count as intersections through this rule.
//! - Zero-length segments behave as points.
//! - Removals are delayed by `GEOMETRY_EPSILON` along x so a segment that
//!   ends where another starts is still active when the second one arrives.

use glam::DVec2;

use super::geometry::Segment;
use crate::consts::GEOMETRY_EPSILON;
use crate::point_segment_distance;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum EventKind {
    Insert,
    Remove,
}

#[derive(Debug, Clone, Copy)]
struct Event {
    x: f64,
    y: f64,
    kind: EventKind,
    segment: usize,
}

/// Segment with endpoints sorted left to right
#[derive(Debug, Clone, Copy)]
struct SweepSegment {
    left: DVec2,
    right: DVec2,
}

impl SweepSegment {
    fn is_vertical(&self) -> bool {
        (self.right.x - self.left.x).abs() <= GEOMETRY_EPSILON
    }

    /// Order key at sweep position `x` while handling an event at height `event_y`
    ///
    /// Vertical segments cover a whole y range at their x; the event height is
    /// clamped into that range so anything starting on them ties with them.
    fn key(&self, x: f64, event_y: f64) -> f64 {
        if self.is_vertical() {
            return event_y.clamp(self.left.y, self.right.y);
        }
        let t = ((x - self.left.x) / (self.right.x - self.left.x)).clamp(0.0, 1.0);
        self.left.y + (self.right.y - self.left.y) * t
    }

    fn slope(&self) -> f64 {
        if self.is_vertical() {
            f64::INFINITY
        } else {
            (self.right.y - self.left.y) / (self.right.x - self.left.x)
        }
    }
}

/// Returns true if any two segments in the list touch or cross
pub fn any_intersection(segments: &[Segment]) -> bool {
    find_intersecting_pair(segments).is_some()
}

/// Returns the indices of the first intersecting pair the sweep encounters
///
/// Only existence is guaranteed to be exact; which pair is reported when
/// several intersect depends on sweep order.
pub fn find_intersecting_pair(segments: &[Segment]) -> Option<(usize, usize)> {
    if segments.len() < 2 {
        return None;
    }

    let sweep: Vec<SweepSegment> = segments
        .iter()
        .map(|s| {
            let (left, right) = s.sorted_endpoints();
            SweepSegment { left, right }
        })
        .collect();

    let mut events = Vec::with_capacity(sweep.len() * 2);
    for (i, seg) in sweep.iter().enumerate() {
        events.push(Event {
            x: seg.left.x,
            y: seg.left.y,
            kind: EventKind::Insert,
            segment: i,
        });
        events.push(Event {
            x: seg.right.x + GEOMETRY_EPSILON,
            y: seg.right.y,
            kind: EventKind::Remove,
            segment: i,
        });
    }
    events.sort_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.kind.cmp(&b.kind))
    });

    // Segment indices ordered bottom to top at the sweep position
    let mut active: Vec<usize> = Vec::with_capacity(sweep.len());

    for event in &events {
        match event.kind {
            EventKind::Insert => {
                let id = event.segment;
                let seg = &sweep[id];
                let key = seg.left.y;
                let slope = seg.slope();

                let idx = active
                    .iter()
                    .position(|&other| {
                        let other_seg = &sweep[other];
                        let other_key = other_seg.key(event.x, event.y);
                        if other_key > key + GEOMETRY_EPSILON {
                            true
                        } else if other_key < key - GEOMETRY_EPSILON {
                            false
                        } else {
                            other_seg.slope() > slope
                        }
                    })
                    .unwrap_or(active.len());
                active.insert(idx, id);

                // Walk outward through tied neighbours plus the first strict one
                // on each side
                for j in (0..idx).rev() {
                    let other = active[j];
                    if segments_intersect(&segments[id], &segments[other]) {
                        return Some(ordered_pair(id, other));
                    }
                    if sweep[other].key(event.x, event.y) < key - GEOMETRY_EPSILON {
                        break;
                    }
                }
                for &other in &active[idx + 1..] {
                    if segments_intersect(&segments[id], &segments[other]) {
                        return Some(ordered_pair(id, other));
                    }
                    if sweep[other].key(event.x, event.y) > key + GEOMETRY_EPSILON {
                        break;
                    }
                }
            }
            EventKind::Remove => {
                let Some(idx) = active.iter().position(|&s| s == event.segment) else {
                    continue;
                };
                active.remove(idx);

                // The segments on either side are now neighbours
                if idx > 0 && idx < active.len() {
                    let (below, above) = (active[idx - 1], active[idx]);
                    if segments_intersect(&segments[below], &segments[above]) {
                        return Some(ordered_pair(below, above));
                    }
                }
            }
        }
    }

    None
}

fn ordered_pair(a: usize, b: usize) -> (usize, usize) {
    if a < b { (a, b) } else { (b, a) }
}

/// Which side of the line through `a`-`b` the point `c` lies on
///
/// Uses signed perpendicular distance so the tolerance is in board units.
/// Returns 0 for points within tolerance of the line and for a
/// zero-length `a`-`b`.
fn side(a: DVec2, b: DVec2, c: DVec2) -> i8 {
    let ab = b - a;
    let len = ab.length();
    if len <= GEOMETRY_EPSILON {
        return 0;
    }
    let dist = ab.perp_dot(c - a) / len;
    if dist > GEOMETRY_EPSILON {
        1
    } else if dist < -GEOMETRY_EPSILON {
        -1
    } else {
        0
    }
}

#[inline]
fn touches(p: DVec2, seg: &Segment) -> bool {
    point_segment_distance(p, seg.a, seg.b) <= GEOMETRY_EPSILON
}

/// Pairwise test: true if the two closed segments share at least one point
pub fn segments_intersect(s: &Segment, t: &Segment) -> bool {
    let d1 = side(t.a, t.b, s.a);
    let d2 = side(t.a, t.b, s.b);
    let d3 = side(s.a, s.b, t.a);
    let d4 = side(s.a, s.b, t.b);

    // Proper crossing: each segment straddles the other's line
    if d1 * d2 < 0 && d3 * d4 < 0 {
        return true;
    }

    // Everything else that meets has an endpoint lying on the other segment
    touches(s.a, t) || touches(s.b, t) || touches(t.a, s) || touches(t.b, s)
}

/// Brute-force reference used to cross-check the sweep
#[cfg(test)]
fn any_intersection_naive(segments: &[Segment]) -> bool {
    (0..segments.len()).any(|i| {
        (i + 1..segments.len()).any(|j| segments_intersect(&segments[i], &segments[j]))
    })
}
