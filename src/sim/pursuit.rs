//! Monster pursuit
//!
//! Monsters walk straight at the player's position at a fixed speed, with the
//! direction recomputed every tick.

use glam::DVec2;

/// Position after one step from `from` toward `target` at `speed`
///
/// A monster already sitting on its target stays put.
#[inline]
pub fn pursuit_step(from: DVec2, target: DVec2, speed: f64) -> DVec2 {
    let delta = target - from;
    let distance = delta.length();
    if distance == 0.0 {
        return from;
    }
    from + delta * (speed / distance)
}
