//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod geometry;
pub mod placement;
pub mod pursuit;
pub mod rock;
pub mod state;
pub mod sweep;
pub mod tick;

pub use collision::{collides_with_any_rock, rect_polygon_collision, rects_collide};
pub use geometry::{Polygon, Rect, Segment};
pub use placement::{is_valid_spawn, place, place_where};
pub use pursuit::pursuit_step;
pub use rock::generate_rock;
pub use state::{
    Coin, Door, EntityKind, GameEvent, GamePhase, GameState, LevelPlan, Monster, Player,
    Positioned,
};
pub use sweep::{any_intersection, segments_intersect};
pub use tick::{TickInput, autopilot_input, generate_level, tick};
