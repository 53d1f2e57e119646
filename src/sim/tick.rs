//! Fixed timestep simulation tick
//!
//! Core game loop that generates levels and advances play deterministically.

use glam::DVec2;

use super::collision::{collides_with_any_rock, rects_collide};
use super::geometry::Rect;
use super::placement::{place, place_where, too_close_to_rock};
use super::pursuit::pursuit_step;
use super::rock::generate_rock;
use super::state::{
    Coin, Door, EntityKind, GameEvent, GamePhase, GameState, LevelPlan, Monster, Player,
    Positioned,
};
use crate::error::PlacementError;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Held movement directions
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Start over from level 1 (only honoured once the game has ended)
    pub restart: bool,
    /// Quit request; `tick` ignores it and the driving loop stops before ticking
    pub quit: bool,
    /// Idle/demo mode - AI steers the player
    pub idle_mode: bool,
}

/// Advance the game by one tick
///
/// A tick in `Generating` spawns the current level; a tick in `Playing`
/// moves everything once. If spawning runs out of attempts the error is
/// returned and the phase stays `Generating`, so the next tick retries the
/// level from scratch.
pub fn tick(state: &mut GameState, input: &TickInput) -> Result<(), PlacementError> {
    if input.restart && state.phase.is_terminal() {
        state.restart();
    }

    let input = if input.idle_mode {
        autopilot_input(state)
    } else {
        input.clone()
    };

    match state.phase {
        GamePhase::Generating => generate_level(state)?,
        GamePhase::Playing => {
            state.time_ticks += 1;
            play_step(state, &input);
        }
        GamePhase::Caught | GamePhase::Victory => {}
    }

    Ok(())
}

/// Spawn rocks, player, door, monsters and coins for `state.level`
pub fn generate_level(state: &mut GameState) -> Result<(), PlacementError> {
    let plan = LevelPlan::for_level(state.level);
    state.clear_level();

    let (board_w, board_h) = (state.config.board_width, state.config.board_height);
    let attempts = state.config.max_placement_attempts;
    for _ in 0..plan.rocks {
        let rock = generate_rock(&mut state.rng, board_w, board_h, attempts);
        state.rocks.push(rock);
    }

    place_player(state)?;

    let rect = place(state, EntityKind::Door)?;
    state.door = Some(Door { rect });

    // Interleaved: a monster before every other coin
    for i in 0..plan.coins {
        if i % 2 == 0 {
            let rect = place(state, EntityKind::Monster)?;
            let id = state.next_entity_id();
            state.monsters.push(Monster { id, rect });
        }
        let rect = place(state, EntityKind::Coin)?;
        let id = state.next_entity_id();
        state.coins.push(Coin { id, rect });
    }

    state.phase = GamePhase::Playing;
    state.events.push(GameEvent::LevelGenerated { level: state.level });
    log::info!(
        "Level {}: rocks={}, coins={}, monsters={}",
        state.level,
        state.rocks.len(),
        state.coins.len(),
        state.monsters.len()
    );
    Ok(())
}

/// Place the player on a fresh game, or keep its standing position
///
/// A standing player that ends up on or too near one of the new rocks is
/// moved to a spot clear of every rock edge. While placing, the player itself
/// is taken out of the state so the player-distance rule does not apply to it.
fn place_player(state: &mut GameState) -> Result<(), PlacementError> {
    let relocating = match &state.player {
        Some(player) => {
            let blocked = too_close_to_rock(state, player.pos())
                || collides_with_any_rock(&player.rect, &state.rocks);
            if !blocked {
                return Ok(());
            }
            log::warn!(
                "Player at ({:.1}, {:.1}) too close to new rocks, relocating",
                player.rect.pos.x,
                player.rect.pos.y
            );
            true
        }
        None => false,
    };

    let previous = state.player.take();
    let placed = if relocating {
        // Every move from a rock edge is reverted, so never land on one
        place_where(state, EntityKind::Player, |state, rect| {
            !collides_with_any_rock(rect, &state.rocks)
        })
    } else {
        place(state, EntityKind::Player)
    };
    match placed {
        Ok(rect) => {
            state.player = Some(Player { rect });
            Ok(())
        }
        Err(err) => {
            state.player = previous;
            Err(err)
        }
    }
}

/// One tick of active play: move, collect, chase, then check for the exit
fn play_step(state: &mut GameState, input: &TickInput) {
    let Some(player_rect) = move_player(state, input) else {
        return;
    };

    collect_coins(state, &player_rect);

    if let Some(monster_id) = move_monsters(state, &player_rect) {
        state.phase = GamePhase::Caught;
        state.events.push(GameEvent::Caught { monster_id });
        log::info!("Caught by monster {} on level {}", monster_id, state.level);
        return;
    }

    let at_door = state
        .door
        .as_ref()
        .is_some_and(|door| rects_collide(&door.rect, &player_rect));
    if state.coins.is_empty() && at_door {
        state.events.push(GameEvent::LevelCleared { level: state.level });
        state.level += 1;
        if state.level > state.config.max_level {
            state.phase = GamePhase::Victory;
            state.events.push(GameEvent::Victory { score: state.score });
            log::info!("Victory with score {}", state.score);
        } else {
            state.phase = GamePhase::Generating;
            log::info!("Level cleared, advancing to level {}", state.level);
        }
    }
}

/// Apply held directions one axis step at a time
///
/// A step is skipped if it would leave the board and reverted if it runs into
/// a rock. Returns the player's rectangle after moving.
fn move_player(state: &mut GameState, input: &TickInput) -> Option<Rect> {
    let speed = state.config.player_speed;
    let (board_w, board_h) = (state.config.board_width, state.config.board_height);
    let player = state.player.as_mut()?;

    let steps = [
        (input.right, DVec2::X),
        (input.left, DVec2::NEG_X),
        (input.down, DVec2::Y),
        (input.up, DVec2::NEG_Y),
    ];
    for (held, dir) in steps {
        if !held {
            continue;
        }
        let moved = Rect {
            pos: player.rect.pos + dir * speed,
            ..player.rect
        };
        if !moved.within_board(board_w, board_h) {
            continue;
        }
        if collides_with_any_rock(&moved, &state.rocks) {
            continue;
        }
        player.rect = moved;
    }

    Some(player.rect)
}

/// Remove every coin touching the player and score them
fn collect_coins(state: &mut GameState, player_rect: &Rect) {
    let mut collected = Vec::new();
    state.coins.retain(|coin| {
        let hit = rects_collide(&coin.rect, player_rect);
        if hit {
            collected.push(coin.id);
        }
        !hit
    });

    for id in collected {
        state.score += 1;
        state.events.push(GameEvent::CoinCollected {
            id,
            score: state.score,
        });
    }
}

/// Step every monster toward the player; returns the first one touching it
fn move_monsters(state: &mut GameState, player_rect: &Rect) -> Option<u32> {
    let speed = state.config.monster_speed();
    let mut caught_by = None;
    for monster in &mut state.monsters {
        monster.rect.pos = pursuit_step(monster.rect.pos, player_rect.pos, speed);
        if caught_by.is_none() && rects_collide(&monster.rect, player_rect) {
            caught_by = Some(monster.id);
        }
    }
    caught_by
}

/// Steer toward the nearest coin, or the door once every coin is taken
pub fn autopilot_input(state: &GameState) -> TickInput {
    let mut input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let Some(player) = &state.player else {
        return input;
    };

    let center = |r: &Rect| r.pos + DVec2::new(r.width, r.height) / 2.0;
    let from = center(&player.rect);

    let target = state
        .coins
        .iter()
        .map(|c| c.rect())
        .min_by(|a, b| {
            center(a)
                .distance_squared(from)
                .total_cmp(&center(b).distance_squared(from))
        })
        .or_else(|| state.door.as_ref().map(|d| d.rect()));

    if let Some(target) = target {
        let delta = center(&target) - from;
        let deadzone = state.config.player_speed;
        input.right = delta.x > deadzone;
        input.left = delta.x < -deadzone;
        input.down = delta.y > deadzone;
        input.up = delta.y < -deadzone;
    }
    input
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::geometry::Polygon;

    /// Hand-built level with no rocks: player at (100, 100), door far away
    fn playing_state() -> GameState {
        let mut state = GameState::new(GameConfig::default(), 7);
        state.phase = GamePhase::Playing;
        state.player = Some(Player {
            rect: Rect::new(100.0, 100.0, 50.0, 86.0),
        });
        state.door = Some(Door {
            rect: Rect::new(800.0, 600.0, 50.0, 70.0),
        });
        state.coins.push(Coin {
            id: 100,
            rect: Rect::new(700.0, 123.0, 40.0, 40.0),
        });
        state
    }

    fn held(right: bool, left: bool, down: bool, up: bool) -> TickInput {
        TickInput {
            right,
            left,
            down,
            up,
            ..Default::default()
        }
    }

    fn player_pos(state: &GameState) -> DVec2 {
        state.player.as_ref().unwrap().rect.pos
    }

    #[test]
    fn test_generate_level_one() {
        let mut state = GameState::new(GameConfig::default(), 12345);
        tick(&mut state, &TickInput::default()).unwrap();

        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.rocks.len(), 2);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.monsters.len(), 1);
        assert!(state.door.is_some());
        assert!(state.player.is_some());
        assert_eq!(
            state.drain_events(),
            vec![GameEvent::LevelGenerated { level: 1 }]
        );
    }

    #[test]
    fn test_generated_entities_obey_spawn_rules() {
        for (seed, level) in [(1, 4), (2, 6), (3, 7)] {
            let mut state = GameState::new(GameConfig::default(), seed);
            state.level = level;
            generate_level(&mut state).unwrap();

            let plan = LevelPlan::for_level(level);
            assert_eq!(state.rocks.len(), plan.rocks);
            assert_eq!(state.coins.len(), plan.coins);
            assert_eq!(state.monsters.len(), plan.monsters);

            let player = state.player.clone().unwrap();
            for (kind, rect) in state.sprites() {
                assert!(rect.within_board(960.0, 720.0), "{kind:?} off board");
                assert!(!too_close_to_rock(&state, rect.pos), "{kind:?} near rock");
                if kind != EntityKind::Player {
                    assert!(rect.pos.distance(player.rect.pos) >= 250.0);
                }
            }
        }
    }

    #[test]
    fn test_later_spawns_checked_against_earlier() {
        let mut state = GameState::new(GameConfig::default(), 99);
        state.level = 7;
        generate_level(&mut state).unwrap();

        let door = state.door.clone().unwrap();
        let mut others: Vec<Rect> = Vec::new();
        others.extend(state.monsters.iter().map(|m| m.rect));
        others.extend(state.coins.iter().map(|c| c.rect));
        for (i, a) in others.iter().enumerate() {
            assert!(!rects_collide(a, &door.rect));
            for b in &others[i + 1..] {
                assert!(!rects_collide(a, b));
            }
        }
    }

    #[test]
    fn test_move_right() {
        let mut state = playing_state();
        tick(&mut state, &held(true, false, false, false)).unwrap();
        assert_eq!(player_pos(&state), DVec2::new(103.0, 100.0));
    }

    #[test]
    fn test_diagonal_moves_both_axes() {
        let mut state = playing_state();
        tick(&mut state, &held(false, true, false, true)).unwrap();
        assert_eq!(player_pos(&state), DVec2::new(97.0, 97.0));
    }

    #[test]
    fn test_opposite_directions_cancel() {
        let mut state = playing_state();
        tick(&mut state, &held(true, true, true, true)).unwrap();
        assert_eq!(player_pos(&state), DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_rock_blocks_move() {
        let mut state = playing_state();
        // Vertical rock edge 2 units right of the player's right side
        state.rocks.push(Polygon::new(vec![
            DVec2::new(152.0, 50.0),
            DVec2::new(152.0, 250.0),
            DVec2::new(300.0, 150.0),
        ]));

        tick(&mut state, &held(true, false, true, false)).unwrap();
        // Right is reverted, down still applies
        assert_eq!(player_pos(&state), DVec2::new(100.0, 103.0));
    }

    #[test]
    fn test_board_edges_block_move() {
        let mut state = playing_state();
        state.player.as_mut().unwrap().rect.pos = DVec2::new(0.0, 0.0);
        tick(&mut state, &held(false, true, false, true)).unwrap();
        assert_eq!(player_pos(&state), DVec2::ZERO);

        // One unit from the right edge: a full step would leave the board
        state.player.as_mut().unwrap().rect.pos = DVec2::new(909.0, 634.0);
        tick(&mut state, &held(true, false, true, false)).unwrap();
        assert_eq!(player_pos(&state), DVec2::new(909.0, 634.0));
    }

    #[test]
    fn test_collect_multiple_coins() {
        let mut state = playing_state();
        state.coins.push(Coin {
            id: 101,
            rect: Rect::new(120.0, 120.0, 40.0, 40.0),
        });
        state.coins.push(Coin {
            id: 102,
            rect: Rect::new(90.0, 150.0, 40.0, 40.0),
        });

        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.score, 2);
        assert_eq!(state.coins.len(), 1);
        assert_eq!(state.coins[0].id, 100);
        assert_eq!(
            state.drain_events(),
            vec![
                GameEvent::CoinCollected { id: 101, score: 1 },
                GameEvent::CoinCollected { id: 102, score: 2 },
            ]
        );
    }

    #[test]
    fn test_monster_pursuit_step() {
        let mut state = playing_state();
        state.player.as_mut().unwrap().rect.pos = DVec2::new(100.0, 0.0);
        state.monsters.push(Monster {
            id: 5,
            rect: Rect::new(0.0, 0.0, 20.0, 20.0),
        });

        tick(&mut state, &TickInput::default()).unwrap();
        let pos = state.monsters[0].rect.pos;
        assert!((pos.x - 0.75).abs() < 1e-12);
        assert_eq!(pos.y, 0.0);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_caught_is_terminal() {
        let mut state = playing_state();
        state.monsters.push(Monster {
            id: 9,
            rect: Rect::new(145.0, 100.0, 50.0, 70.0),
        });

        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Caught);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Caught { monster_id: 9 })
        );

        // Frozen until restart
        let monster_before = state.monsters[0].rect;
        tick(&mut state, &held(true, false, false, false)).unwrap();
        assert_eq!(state.phase, GamePhase::Caught);
        assert_eq!(state.monsters[0].rect, monster_before);
        assert_eq!(player_pos(&state), DVec2::new(100.0, 100.0));
    }

    #[test]
    fn test_caught_skips_win_check() {
        let mut state = playing_state();
        state.coins.clear();
        state.door.as_mut().unwrap().rect = Rect::new(140.0, 100.0, 50.0, 70.0);
        state.monsters.push(Monster {
            id: 3,
            rect: Rect::new(100.0, 180.0, 50.0, 70.0),
        });

        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Caught);
        assert_eq!(state.level, 1);
    }

    #[test]
    fn test_door_needs_all_coins() {
        let mut state = playing_state();
        state.door.as_mut().unwrap().rect = Rect::new(140.0, 100.0, 50.0, 70.0);
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.level, 1);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_win_advances_exactly_one_level() {
        let mut state = playing_state();
        state.coins.clear();
        state.door.as_mut().unwrap().rect = Rect::new(140.0, 100.0, 50.0, 70.0);

        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Generating);

        // The next tick builds level 2 instead of checking the door again
        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.level, 2);
        assert_eq!(state.phase, GamePhase::Playing);

        let cleared = state
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, GameEvent::LevelCleared { .. }))
            .count();
        assert_eq!(cleared, 1);
    }

    #[test]
    fn test_victory_after_last_level() {
        let mut state = playing_state();
        state.level = 12;
        state.score = 40;
        state.coins.clear();
        state.door.as_mut().unwrap().rect = Rect::new(140.0, 100.0, 50.0, 70.0);

        tick(&mut state, &TickInput::default()).unwrap();
        assert_eq!(state.phase, GamePhase::Victory);
        assert_eq!(state.level, 13);
        assert!(
            state
                .drain_events()
                .contains(&GameEvent::Victory { score: 40 })
        );

        // Restart goes straight into building level 1
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart).unwrap();
        assert_eq!(state.level, 1);
        assert_eq!(state.score, 0);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.coins.len(), 1);
    }

    #[test]
    fn test_restart_ignored_while_playing() {
        let mut state = playing_state();
        state.score = 3;
        let restart = TickInput {
            restart: true,
            ..Default::default()
        };
        tick(&mut state, &restart).unwrap();
        assert_eq!(state.score, 3);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_player_kept_between_levels_unless_blocked() {
        let mut state = GameState::new(GameConfig::default(), 2024);
        generate_level(&mut state).unwrap();

        for _ in 0..5 {
            let before = state.player.clone().unwrap();
            state.level += 1;
            generate_level(&mut state).unwrap();
            let after = state.player.clone().unwrap();

            if after.rect == before.rect {
                assert!(!too_close_to_rock(&state, after.rect.pos));
                assert!(!collides_with_any_rock(&after.rect, &state.rocks));
            } else {
                // Relocated: clear of rock vertices and rock edges
                assert!(!too_close_to_rock(&state, after.rect.pos));
                assert!(!collides_with_any_rock(&after.rect, &state.rocks));
            }
        }
    }

    #[test]
    fn test_relocated_player_never_lands_on_rock_edge() {
        // One rock whose long edge runs across the middle of the board,
        // far from both of its vertex clusters
        let rock = Polygon::new(vec![
            DVec2::new(5.0, 360.0),
            DVec2::new(955.0, 360.0),
            DVec2::new(955.0, 364.0),
        ]);
        let parked = Rect::new(5.0, 360.0, 50.0, 86.0);

        for seed in 0..300 {
            let mut state = GameState::new(GameConfig::default(), seed);
            state.rocks = vec![rock.clone()];
            state.player = Some(Player { rect: parked });

            place_player(&mut state).unwrap();
            let rect = state.player.as_ref().unwrap().rect;
            assert_ne!(rect, parked);
            assert!(!too_close_to_rock(&state, rect.pos));
            assert!(
                !collides_with_any_rock(&rect, &state.rocks),
                "seed {seed}: relocated onto rock at {rect:?}"
            );
        }
    }

    #[test]
    fn test_exhaustion_keeps_generating() {
        let config = GameConfig {
            player_clearance: 10_000.0,
            max_placement_attempts: 50,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 1);
        let err = tick(&mut state, &TickInput::default()).unwrap_err();
        assert_eq!(
            err,
            PlacementError::Exhausted {
                kind: EntityKind::Door,
                attempts: 50
            }
        );
        assert_eq!(state.phase, GamePhase::Generating);
        assert!(state.door.is_none());
    }

    #[test]
    fn test_failed_relocation_restores_player() {
        let config = GameConfig {
            rock_clearance: 10_000.0,
            max_placement_attempts: 20,
            ..GameConfig::default()
        };
        let mut state = GameState::new(config, 1);
        let rect = Rect::new(10.0, 10.0, 50.0, 86.0);
        state.player = Some(Player { rect });

        assert!(generate_level(&mut state).is_err());
        assert_eq!(state.player.as_ref().map(|p| p.rect), Some(rect));
    }

    #[test]
    fn test_autopilot_heads_for_coin_then_door() {
        let mut state = playing_state();
        let input = autopilot_input(&state);
        assert!(input.right && !input.left);
        assert!(!input.down && !input.up);

        state.coins.clear();
        let input = autopilot_input(&state);
        assert!(input.right && input.down);
    }

    #[test]
    fn test_autopilot_collects_coin() {
        let mut state = playing_state();
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };
        for _ in 0..400 {
            tick(&mut state, &idle).unwrap();
            if state.score > 0 {
                break;
            }
        }
        assert_eq!(state.score, 1);
    }

    #[test]
    fn test_determinism() {
        let mut a = GameState::new(GameConfig::default(), 555);
        let mut b = GameState::new(GameConfig::default(), 555);
        let idle = TickInput {
            idle_mode: true,
            ..Default::default()
        };

        for _ in 0..120 {
            let ra = tick(&mut a, &idle);
            let rb = tick(&mut b, &idle);
            assert_eq!(ra, rb);
        }

        assert_eq!(a.rocks, b.rocks);
        assert_eq!(a.sprites(), b.sprites());
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
    }
}
