//! Procedural rock generation
//!
//! A rock is a short random walk closed into a polygon. Each step nudges x
//! and y independently by up to `ROCK_MAX_STEP`, so rocks come out as jagged
//! shapes that may fold over themselves or overlap other rocks.

use glam::DVec2;
use rand::Rng;

use super::geometry::Polygon;
use crate::consts::{ROCK_MAX_EXTRA_VERTICES, ROCK_MAX_STEP, ROCK_MIN_EXTRA_VERTICES};

/// Generate one rock with every vertex strictly inside the board
///
/// `max_attempts` caps the resampling of any single coordinate. If a walk
/// cannot find an in-bounds step in that many tries it stays on the previous
/// coordinate, which is already in bounds.
pub fn generate_rock<R: Rng>(
    rng: &mut R,
    board_width: f64,
    board_height: f64,
    max_attempts: u32,
) -> Polygon {
    let extra = rng.random_range(ROCK_MIN_EXTRA_VERTICES..=ROCK_MAX_EXTRA_VERTICES);
    let mut vertices = Vec::with_capacity(extra + 1);

    let start = DVec2::new(
        interior_coordinate(rng, board_width, max_attempts),
        interior_coordinate(rng, board_height, max_attempts),
    );
    vertices.push(start);

    let mut prev = start;
    for _ in 0..extra {
        let next = DVec2::new(
            step_coordinate(rng, prev.x, board_width, max_attempts),
            step_coordinate(rng, prev.y, board_height, max_attempts),
        );
        vertices.push(next);
        prev = next;
    }

    Polygon::new(vertices)
}

/// Uniform coordinate in the open interval (0, limit)
fn interior_coordinate<R: Rng>(rng: &mut R, limit: f64, max_attempts: u32) -> f64 {
    for _ in 0..max_attempts {
        let value = rng.random::<f64>() * limit;
        if value > 0.0 && value < limit {
            return value;
        }
    }
    limit / 2.0
}

/// Move `prev` by a random signed step, resampling until inside (0, limit)
///
/// Step sizes come from the open interval (0, `ROCK_MAX_STEP`).
fn step_coordinate<R: Rng>(rng: &mut R, prev: f64, limit: f64, max_attempts: u32) -> f64 {
    for _ in 0..max_attempts {
        let magnitude = rng.random::<f64>() * ROCK_MAX_STEP;
        if magnitude <= 0.0 {
            continue;
        }
        let value = if rng.random_bool(0.5) {
            prev + magnitude
        } else {
            prev - magnitude
        };
        if value > 0.0 && value < limit {
            return value;
        }
    }
    log::warn!("Rock walk stuck at {prev} (limit {limit}), holding coordinate");
    prev
}
