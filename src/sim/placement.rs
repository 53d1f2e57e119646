//! Spawn placement by rejection sampling
//!
//! Candidates are drawn uniformly over the positions where the footprint fits
//! on the board and the first one meeting every spawn rule wins. Rules only
//! look at entities already committed to the state, so spawn order matters:
//! rocks, player, door, then monsters and coins.

use glam::DVec2;
use rand::Rng;

use super::collision::rects_collide;
use super::geometry::Rect;
use super::state::{EntityKind, GameState, Positioned};
use crate::config::Size;
use crate::error::PlacementError;

/// Check a candidate rectangle against the spawn rules
///
/// 1. At least `player_clearance` from the player, if one exists
/// 2. No overlap with the door, any monster or any coin
/// 3. At least `rock_clearance` from every rock vertex
///
/// Distances are measured from the rectangle's position.
pub fn is_valid_spawn(state: &GameState, rect: &Rect) -> bool {
    let pos = rect.pos;

    if let Some(player) = &state.player {
        if pos.distance(player.pos()) < state.config.player_clearance {
            return false;
        }
    }

    if let Some(door) = &state.door {
        if rects_collide(&door.rect, rect) {
            return false;
        }
    }
    if state.monsters.iter().any(|m| rects_collide(&m.rect, rect)) {
        return false;
    }
    if state.coins.iter().any(|c| rects_collide(&c.rect, rect)) {
        return false;
    }

    !too_close_to_rock(state, pos)
}

/// True if `pos` is within `rock_clearance` of any rock vertex
pub fn too_close_to_rock(state: &GameState, pos: DVec2) -> bool {
    let clearance = state.config.rock_clearance;
    state
        .rocks
        .iter()
        .filter_map(|rock| rock.min_vertex_distance(pos))
        .any(|d| d < clearance)
}

/// Uniform position where a footprint of `size` fits on the board
fn sample_position<R: Rng>(rng: &mut R, board: (f64, f64), size: Size) -> DVec2 {
    let (board_w, board_h) = board;
    DVec2::new(
        rng.random::<f64>() * (board_w - size.width),
        rng.random::<f64>() * (board_h - size.height),
    )
}

/// Find a valid spawn rectangle for an entity of `kind`
///
/// Gives up after `max_placement_attempts` candidates. Nothing is committed
/// to the state; the caller pushes the returned rectangle into the right
/// collection.
pub fn place(state: &mut GameState, kind: EntityKind) -> Result<Rect, PlacementError> {
    place_where(state, kind, |_, _| true)
}

/// Like [`place`], but a candidate must also pass `accept`
///
/// `accept` shares the attempt budget with the spawn rules.
pub fn place_where<F>(
    state: &mut GameState,
    kind: EntityKind,
    accept: F,
) -> Result<Rect, PlacementError>
where
    F: Fn(&GameState, &Rect) -> bool,
{
    let size = state.config.footprints.of(kind);
    let board = (state.config.board_width, state.config.board_height);
    let attempts = state.config.max_placement_attempts;

    for attempt in 0..attempts {
        let pos = sample_position(&mut state.rng, board, size);
        let rect = Rect::at(pos, size);
        if is_valid_spawn(state, &rect) && accept(state, &rect) {
            log::debug!(
                "Placed {:?} at ({:.1}, {:.1}) after {} attempts",
                kind,
                pos.x,
                pos.y,
                attempt + 1
            );
            return Ok(rect);
        }
    }

    log::error!("Placement of {kind:?} exhausted after {attempts} attempts");
    Err(PlacementError::Exhausted { kind, attempts })
}
