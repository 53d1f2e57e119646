//! Game state and core simulation types
//!
//! The state owns every entity for the current level plus the RNG, so a run is
//! fully determined by its seed, its config and the inputs fed to `tick`.

use glam::DVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::geometry::{Polygon, Rect};
use crate::config::GameConfig;

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Entities for the current level still need to be spawned
    Generating,
    /// Active gameplay
    Playing,
    /// A monster reached the player
    Caught,
    /// The last level was cleared
    Victory,
}

impl GamePhase {
    /// Caught and Victory hold until an explicit restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Caught | GamePhase::Victory)
    }
}

/// Kind tag for anything drawn as a sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Player,
    Monster,
    Coin,
    Door,
}

/// Something occupying a rectangle on the board
pub trait Positioned {
    fn rect(&self) -> Rect;
    fn kind(&self) -> EntityKind;

    fn pos(&self) -> DVec2 {
        self.rect().pos
    }
}

/// The player's robot
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub rect: Rect,
}

/// A monster chasing the player
#[derive(Debug, Clone, PartialEq)]
pub struct Monster {
    pub id: u32,
    pub rect: Rect,
}

/// A coin waiting to be collected
#[derive(Debug, Clone, PartialEq)]
pub struct Coin {
    pub id: u32,
    pub rect: Rect,
}

/// The exit, usable once every coin is collected
#[derive(Debug, Clone, PartialEq)]
pub struct Door {
    pub rect: Rect,
}

macro_rules! impl_positioned {
    ($ty:ty, $kind:expr) => {
        impl Positioned for $ty {
            fn rect(&self) -> Rect {
                self.rect
            }

            fn kind(&self) -> EntityKind {
                $kind
            }
        }
    };
}

impl_positioned!(Player, EntityKind::Player);
impl_positioned!(Monster, EntityKind::Monster);
impl_positioned!(Coin, EntityKind::Coin);
impl_positioned!(Door, EntityKind::Door);

/// Entity counts for a level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPlan {
    pub rocks: usize,
    pub coins: usize,
    pub monsters: usize,
}

impl LevelPlan {
    /// Rocks grow every third level, coins every level, monsters every other
    pub fn for_level(level: u32) -> Self {
        let level = level as usize;
        Self {
            rocks: 2 + level / 3,
            coins: level,
            // One monster per even index in 0..level
            monsters: level.div_ceil(2),
        }
    }
}

/// Notable things that happened during a tick, for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A level finished spawning
    LevelGenerated { level: u32 },
    /// A coin was picked up; `score` is the new total
    CoinCollected { id: u32, score: u32 },
    /// All coins taken and the door reached
    LevelCleared { level: u32 },
    /// A monster reached the player
    Caught { monster_id: u32 },
    /// The final level was cleared
    Victory { score: u32 },
    /// Score and level were reset
    Restarted,
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: GameConfig,
    pub rng: Pcg32,
    /// Current level, 1-based
    pub level: u32,
    pub score: u32,
    pub phase: GamePhase,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Option<Player>,
    pub door: Option<Door>,
    /// Spawn order
    pub coins: Vec<Coin>,
    /// Spawn order
    pub monsters: Vec<Monster>,
    pub rocks: Vec<Polygon>,
    /// Events since the presentation layer last drained them
    pub events: Vec<GameEvent>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game at level 1, waiting to generate
    pub fn new(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            score: 0,
            phase: GamePhase::Generating,
            time_ticks: 0,
            player: None,
            door: None,
            coins: Vec::new(),
            monsters: Vec::new(),
            rocks: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Drop everything that belongs to a single level
    pub fn clear_level(&mut self) {
        self.door = None;
        self.coins.clear();
        self.monsters.clear();
        self.rocks.clear();
    }

    /// Back to level 1 with no score; the player is placed afresh
    pub fn restart(&mut self) {
        self.clear_level();
        self.player = None;
        self.level = 1;
        self.score = 0;
        self.phase = GamePhase::Generating;
        self.events.push(GameEvent::Restarted);
        log::info!("Game restarted");
    }

    /// Take the events queued since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Every placed entity rectangle in draw order: door, coins, monsters, player
    pub fn sprites(&self) -> Vec<(EntityKind, Rect)> {
        let door = self.door.iter().map(|d| (d.kind(), d.rect()));
        let coins = self.coins.iter().map(|c| (c.kind(), c.rect()));
        let monsters = self.monsters.iter().map(|m| (m.kind(), m.rect()));
        let player = self.player.iter().map(|p| (p.kind(), p.rect()));
        door.chain(coins).chain(monsters).chain(player).collect()
    }
}
