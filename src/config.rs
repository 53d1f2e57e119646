//! Game configuration
//!
//! Board dimensions, speeds, spawn clearances and the sprite footprints the
//! presentation layer hands over at load time. Loaded once, then treated as
//! immutable by the simulation.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::error::ConfigError;
use crate::sim::EntityKind;

/// Width and height of a sprite footprint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Footprint per entity kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Footprints {
    pub player: Size,
    pub monster: Size,
    pub coin: Size,
    pub door: Size,
}

impl Default for Footprints {
    fn default() -> Self {
        // Sizes of the stock sprite set
        Self {
            player: Size::new(50.0, 86.0),
            monster: Size::new(50.0, 70.0),
            coin: Size::new(40.0, 40.0),
            door: Size::new(50.0, 70.0),
        }
    }
}

impl Footprints {
    pub fn of(&self, kind: EntityKind) -> Size {
        match kind {
            EntityKind::Player => self.player,
            EntityKind::Monster => self.monster,
            EntityKind::Coin => self.coin,
            EntityKind::Door => self.door,
        }
    }
}

/// Simulation parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: f64,
    pub board_height: f64,
    /// Player movement per tick along each held axis
    pub player_speed: f64,
    /// Monster speed as a fraction of the player speed
    pub monster_speed_ratio: f64,
    /// Minimum spawn distance from the player
    pub player_clearance: f64,
    /// Minimum spawn distance from any rock vertex
    pub rock_clearance: f64,
    pub max_level: u32,
    /// Rejection sampling budget per placement
    pub max_placement_attempts: u32,
    pub footprints: Footprints,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            player_speed: PLAYER_SPEED,
            monster_speed_ratio: MONSTER_SPEED_RATIO,
            player_clearance: PLAYER_CLEARANCE,
            rock_clearance: ROCK_CLEARANCE,
            max_level: MAX_LEVEL,
            max_placement_attempts: MAX_PLACEMENT_ATTEMPTS,
            footprints: Footprints::default(),
        }
    }
}

impl GameConfig {
    /// Per-tick monster movement
    pub fn monster_speed(&self) -> f64 {
        self.player_speed * self.monster_speed_ratio
    }

    /// Parse a (possibly partial) JSON config; missing fields take defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Reject values the simulation cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("board_width", self.board_width),
            ("board_height", self.board_height),
            ("player_speed", self.player_speed),
            ("footprints.player.width", self.footprints.player.width),
            ("footprints.player.height", self.footprints.player.height),
            ("footprints.monster.width", self.footprints.monster.width),
            ("footprints.monster.height", self.footprints.monster.height),
            ("footprints.coin.width", self.footprints.coin.width),
            ("footprints.coin.height", self.footprints.coin.height),
            ("footprints.door.width", self.footprints.door.width),
            ("footprints.door.height", self.footprints.door.height),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }

        let non_negative = [
            ("monster_speed_ratio", self.monster_speed_ratio),
            ("player_clearance", self.player_clearance),
            ("rock_clearance", self.rock_clearance),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }

        if self.max_level == 0 {
            return Err(ConfigError::Invalid {
                field: "max_level",
                value: 0.0,
            });
        }
        if self.max_placement_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "max_placement_attempts",
                value: 0.0,
            });
        }
        Ok(())
    }
}
