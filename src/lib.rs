//! Treasure Hunt - A rock-strewn coin-collecting chase game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, collisions, spawning, game state)
//! - `frame`: Per-tick snapshot handed to the presentation layer
//! - `config`: Board dimensions, speeds and sprite footprints
//! - `error`: Typed failures surfaced by the simulation

pub mod config;
pub mod error;
pub mod frame;
pub mod sim;

pub use config::{Footprints, GameConfig, Size};
pub use error::{ConfigError, PlacementError};
pub use frame::{Frame, Outcome, Sprite};

use glam::DVec2;

/// Game configuration constants
pub mod consts {
    /// Target simulation rate (ticks per second)
    pub const TICK_RATE: u32 = 60;

    /// Board dimensions
    pub const BOARD_WIDTH: f64 = 960.0;
    pub const BOARD_HEIGHT: f64 = 720.0;

    /// Player movement per tick along each held axis
    pub const PLAYER_SPEED: f64 = 3.0;
    /// Monsters move at this fraction of the player's speed
    pub const MONSTER_SPEED_RATIO: f64 = 0.25;

    /// Minimum spawn distance from the player's position
    pub const PLAYER_CLEARANCE: f64 = 250.0;
    /// Minimum spawn distance from every rock vertex
    pub const ROCK_CLEARANCE: f64 = 150.0;

    /// Last playable level; clearing it wins the game
    pub const MAX_LEVEL: u32 = 12;
    /// Rejection sampling budget for a single placement
    pub const MAX_PLACEMENT_ATTEMPTS: u32 = 100_000;

    /// Rock random walk: largest per-axis step between vertices
    pub const ROCK_MAX_STEP: f64 = 120.0;
    /// Rock random walk: extra vertices after the first (inclusive range)
    pub const ROCK_MIN_EXTRA_VERTICES: usize = 2;
    pub const ROCK_MAX_EXTRA_VERTICES: usize = 9;

    /// Distance under which points are considered coincident
    pub const GEOMETRY_EPSILON: f64 = 1e-9;
}

/// Distance from `p` to the closed segment `a`-`b`
///
/// A zero-length segment degrades to point distance.
#[inline]
pub fn point_segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}
