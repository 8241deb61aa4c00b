//! Game-logic functions.
//!
//! Every public function takes the session state by `&mut` together with the
//! configuration, the current millisecond timestamp where timing matters,
//! and an injected RNG where randomness matters.  Nothing here touches the
//! terminal.

pub mod bonus;
pub mod collision;
pub mod enemy;
pub mod projectile;

use log::{debug, info};
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Direction, GameEvent, GameOverReason, GameState, GameStatus, Owner};
use crate::factory::{create_invader_wave, create_projectile, create_shields};

// ── Session setup ────────────────────────────────────────────────────────────

/// Reset the session and lay out the first wave and the shields.
pub fn init_session(state: &mut GameState, config: &GameConfig) {
    state.reset(config);
    state.invaders = create_invader_wave(config);
    state.shields = create_shields(config);
    state.push_event(GameEvent::SessionStarted);
    state.push_event(GameEvent::LevelStarted { level: state.level });
}

// ── Input-driven transitions ─────────────────────────────────────────────────

/// Shift the cannon one step, clamped to `[0, canvas_width - player_width]`.
pub fn move_player(state: &mut GameState, config: &GameConfig, direction: Direction) {
    if !state.is_running() {
        return;
    }
    let player = &mut state.player;
    let max_x = config.canvas_width - player.rect.width;
    player.rect.x = (player.rect.x + player.speed * direction.sign()).clamp(0.0, max_x);
}

pub fn move_player_left(state: &mut GameState, config: &GameConfig) {
    move_player(state, config, Direction::Left);
}

pub fn move_player_right(state: &mut GameState, config: &GameConfig) {
    move_player(state, config, Direction::Right);
}

/// Fire from the cannon's centre, capped at `max_player_projectiles` in
/// flight.  Returns whether a projectile was spawned.
pub fn player_shoot(state: &mut GameState, config: &GameConfig) -> bool {
    if !state.is_running() {
        return false;
    }
    if state.player_projectiles.len() >= config.max_player_projectiles {
        return false;
    }
    let p = &state.player.rect;
    let projectile = create_projectile(
        config,
        p.center_x() - config.projectile_width / 2.0,
        p.y,
        Owner::Player,
    );
    state.player_projectiles.push(projectile);
    state.push_event(GameEvent::PlayerFired);
    true
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.  Does nothing unless the session is
/// active, unpaused and not between waves.
///
/// Order: formation, enemy fire, projectiles, bonus, collisions.  An
/// encroachment loss ends the tick immediately.
pub fn tick(state: &mut GameState, config: &GameConfig, now: u64, rng: &mut impl Rng) {
    if !state.is_running() {
        return;
    }
    state.frame += 1;

    if enemy::advance_formation(state, config) {
        end_session(state, GameOverReason::Encroachment);
        return;
    }
    enemy::fire_at_random(state, config, now, rng);
    projectile::advance(state, config);
    bonus::update(state, config, now, rng);
    collision::resolve(state, config, now);
}

// ── Level progression & session end ──────────────────────────────────────────

/// Enter the between-waves window.  The controller finishes it later with
/// [`start_next_wave`].
pub fn begin_level_transition(state: &mut GameState) {
    if state.in_transition {
        return;
    }
    let cleared = state.level;
    state.level += 1;
    state.in_transition = true;
    info!("level {} cleared, score {}", cleared, state.score);
    state.push_event(GameEvent::LevelCleared { level: cleared });
}

/// Close the between-waves window: clear projectiles, repair shields, lay
/// out a fresh wave and set the level-scaled formation speed.
pub fn start_next_wave(state: &mut GameState, config: &GameConfig) {
    state.player_projectiles.clear();
    state.enemy_projectiles.clear();
    for shield in &mut state.shields {
        shield.health = config.shield_max_health;
    }
    state.invaders = create_invader_wave(config);
    state.enemy_speed = config.enemy_base_speed + state.level as f32 * config.enemy_level_speed_step;
    state.in_transition = false;
    debug!("level {} starts at speed {:.2}", state.level, state.enemy_speed);
    state.push_event(GameEvent::LevelStarted { level: state.level });
}

/// Mark the session over.  Idempotent.
pub fn end_session(state: &mut GameState, reason: GameOverReason) {
    if state.status != GameStatus::Playing {
        return;
    }
    state.status = GameStatus::GameOver;
    state.paused = false;
    info!("game over ({:?}), final score {}", reason, state.score);
    state.push_event(GameEvent::GameOver {
        score: state.score,
        reason,
    });
}
