//! Per-tick snapshot for the presentation layer
//!
//! The renderer never touches live simulation state; it gets an owned copy of
//! what to draw each tick.

use serde::{Deserialize, Serialize};

use crate::sim::{EntityKind, GamePhase, GameState, Polygon, Rect};

/// How the game ended, if it has
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    None,
    Caught,
    Victory,
}

impl From<GamePhase> for Outcome {
    fn from(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Caught => Outcome::Caught,
            GamePhase::Victory => Outcome::Victory,
            GamePhase::Generating | GamePhase::Playing => Outcome::None,
        }
    }
}

/// A rectangle to draw with the sprite for `kind`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: EntityKind,
    pub rect: Rect,
}

/// Everything the presentation layer needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Filled polygons, in generation order
    pub rocks: Vec<Polygon>,
    /// Door, coins, monsters, then player
    pub sprites: Vec<Sprite>,
    pub score: u32,
    /// 1-based, never past the final level; a cleared game shows the final
    /// level with `Outcome::Victory`
    pub level: u32,
    pub outcome: Outcome,
}

impl Frame {
    pub fn capture(state: &GameState) -> Self {
        Self {
            rocks: state.rocks.clone(),
            sprites: state
                .sprites()
                .into_iter()
                .map(|(kind, rect)| Sprite { kind, rect })
                .collect(),
            score: state.score,
            level: state.level.min(state.config.max_level),
            outcome: state.phase.into(),
        }
    }

    /// Sprites of one kind, in draw order
    pub fn sprites_of(&self, kind: EntityKind) -> impl Iterator<Item = &Sprite> {
        self.sprites.iter().filter(move |s| s.kind == kind)
    }

    /// Status line the way the HUD shows it
    pub fn hud_text(&self) -> String {
        format!("Level: {}  Points: {}", self.level, self.score)
    }
}
