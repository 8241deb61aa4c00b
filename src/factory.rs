//! Entity constructors.
//!
//! Each returns fresh entities laid out from the configuration; none of them
//! touch `GameState`.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bonus, Invader, Owner, Projectile, Shield};
use crate::geometry::Rect;

/// A full wave, tiled left-to-right then top-to-bottom.  Front rows (closer
/// to the player) are worth less: `points = (rows - row) * 10`.
pub fn create_invader_wave(config: &GameConfig) -> Vec<Invader> {
    let mut invaders = Vec::with_capacity(config.wave_size());
    for row in 0..config.enemy_rows {
        for col in 0..config.enemy_cols {
            invaders.push(Invader {
                rect: Rect::new(
                    col as f32 * (config.enemy_width + config.enemy_gap) + config.enemy_origin_x,
                    row as f32 * (config.enemy_height + config.enemy_gap) + config.enemy_origin_y,
                    config.enemy_width,
                    config.enemy_height,
                ),
                row,
                col,
                alive: true,
                points: ((config.enemy_rows - row) * 10) as u32,
            });
        }
    }
    invaders
}

/// Shields evenly spaced across the canvas at full health.
pub fn create_shields(config: &GameConfig) -> Vec<Shield> {
    let spacing = config.canvas_width / (config.shield_count + 1) as f32;
    let y = config.canvas_height - config.shield_bottom_offset;
    (1..=config.shield_count)
        .map(|i| Shield {
            rect: Rect::new(
                spacing * i as f32 - config.shield_width / 2.0,
                y,
                config.shield_width,
                config.shield_height,
            ),
            health: config.shield_max_health,
        })
        .collect()
}

/// A saucer parked just off the left edge, heading right.
pub fn create_bonus_target(config: &GameConfig, rng: &mut impl Rng) -> Bonus {
    let points = config
        .bonus_points
        .choose(rng)
        .copied()
        .unwrap_or(config.bonus_points[0]);
    Bonus {
        rect: Rect::new(
            -config.bonus_width,
            config.bonus_y,
            config.bonus_width,
            config.bonus_height,
        ),
        speed: config.bonus_speed,
        points,
    }
}

/// A projectile whose top-left corner sits at `(x, y)`.
pub fn create_projectile(config: &GameConfig, x: f32, y: f32, owner: Owner) -> Projectile {
    let speed = match owner {
        Owner::Player => -config.projectile_speed,
        Owner::Enemy => config.projectile_speed,
    };
    Projectile {
        rect: Rect::new(x, y, config.projectile_width, config.projectile_height),
        speed,
    }
}
