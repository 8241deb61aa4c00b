//! Invader formation: marching, enemy fire and speed scaling.

use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Direction, GameEvent, GameState, Owner};
use crate::factory::create_projectile;

/// March the formation one step.  When any live invader is within the edge
/// margin in the direction of travel, the direction flips and every live
/// invader also drops by `enemy_drop`.
///
/// Returns `true` when the formation's lowest edge has come within
/// `encroachment_margin` of the player's row.
pub fn advance_formation(state: &mut GameState, config: &GameConfig) -> bool {
    let direction = state.enemy_direction;
    let at_edge = state.invaders.iter().filter(|i| i.alive).any(|i| match direction {
        Direction::Right => i.rect.right() >= config.canvas_width - config.enemy_edge_margin,
        Direction::Left => i.rect.x <= config.enemy_edge_margin,
    });

    if at_edge {
        state.enemy_direction = direction.flipped();
    }

    let dx = state.enemy_speed * state.enemy_direction.sign();
    let mut lowest: Option<f32> = None;
    for invader in state.invaders.iter_mut().filter(|i| i.alive) {
        if at_edge {
            invader.rect.y += config.enemy_drop;
        }
        invader.rect.x += dx;
        let bottom = invader.rect.bottom();
        lowest = Some(lowest.map_or(bottom, |l| l.max(bottom)));
    }

    match lowest {
        Some(bottom) => bottom >= state.player.rect.y - config.encroachment_margin,
        None => false,
    }
}

/// `speed = base + (1 - alive/total) * increment`.
pub fn recompute_speed(state: &mut GameState, config: &GameConfig) {
    let total = state.invaders.len();
    if total == 0 {
        return;
    }
    let ratio = 1.0 - state.alive_invaders() as f32 / total as f32;
    state.enemy_speed = config.enemy_base_speed + ratio * config.enemy_speed_increment;
}

/// Drop a shot from a random live invader, at most once per
/// `enemy_shoot_interval_ms`.  Returns whether a shot was fired.
pub fn fire_at_random(
    state: &mut GameState,
    config: &GameConfig,
    now: u64,
    rng: &mut impl Rng,
) -> bool {
    if let Some(last) = state.last_enemy_shot_at {
        if now.saturating_sub(last) < config.enemy_shoot_interval_ms {
            return false;
        }
    }

    let alive: Vec<usize> = state
        .invaders
        .iter()
        .enumerate()
        .filter(|(_, i)| i.alive)
        .map(|(idx, _)| idx)
        .collect();
    if alive.is_empty() {
        return false;
    }

    let shooter = state.invaders[alive[rng.gen_range(0..alive.len())]].rect;
    let projectile = create_projectile(
        config,
        shooter.center_x() - config.projectile_width / 2.0,
        shooter.bottom(),
        Owner::Enemy,
    );
    debug!("enemy fires from ({:.0}, {:.0})", projectile.rect.x, projectile.rect.y);
    state.enemy_projectiles.push(projectile);
    state.last_enemy_shot_at = Some(now);
    state.push_event(GameEvent::EnemyFired);
    true
}
