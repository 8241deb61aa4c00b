//! Load-time tuning constants.
//!
//! Every component receives a `&GameConfig`; nothing reads a global.  The
//! values in `Default` are the arcade defaults on an 800×600 logical canvas.

use crate::error::GameError;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    // ── Canvas ───────────────────────────────────────────────────────────────
    pub canvas_width: f32,
    pub canvas_height: f32,

    // ── Player ───────────────────────────────────────────────────────────────
    pub player_width: f32,
    pub player_height: f32,
    pub player_speed: f32,
    /// Distance from the canvas bottom to the cannon's top edge.
    pub player_bottom_offset: f32,
    pub starting_lives: u32,

    // ── Projectiles ──────────────────────────────────────────────────────────
    pub projectile_width: f32,
    pub projectile_height: f32,
    pub projectile_speed: f32,
    pub max_player_projectiles: usize,

    // ── Invader formation ────────────────────────────────────────────────────
    pub enemy_rows: usize,
    pub enemy_cols: usize,
    pub enemy_width: f32,
    pub enemy_height: f32,
    pub enemy_gap: f32,
    pub enemy_origin_x: f32,
    pub enemy_origin_y: f32,
    pub enemy_base_speed: f32,
    pub enemy_speed_increment: f32,
    /// Added to the base speed per level when a new wave starts.
    pub enemy_level_speed_step: f32,
    pub enemy_edge_margin: f32,
    pub enemy_drop: f32,
    pub enemy_shoot_interval_ms: u64,
    pub encroachment_margin: f32,

    // ── Shields ──────────────────────────────────────────────────────────────
    pub shield_count: usize,
    pub shield_width: f32,
    pub shield_height: f32,
    pub shield_max_health: i32,
    pub shield_damage: i32,
    /// Distance from the canvas bottom to the shields' top edge.
    pub shield_bottom_offset: f32,

    // ── Bonus target ─────────────────────────────────────────────────────────
    pub bonus_width: f32,
    pub bonus_height: f32,
    pub bonus_speed: f32,
    pub bonus_y: f32,
    pub bonus_interval_ms: u64,
    pub bonus_probability: f64,
    pub bonus_points: [u32; 3],

    // ── Controller timings ───────────────────────────────────────────────────
    pub game_over_delay_ms: u64,
    pub level_transition_ms: u64,
    pub hit_flash_ms: u64,
    pub level_banner_ms: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            canvas_width: 800.0,
            canvas_height: 600.0,

            player_width: 50.0,
            player_height: 20.0,
            player_speed: 5.0,
            player_bottom_offset: 40.0,
            starting_lives: 3,

            projectile_width: 4.0,
            projectile_height: 10.0,
            projectile_speed: 7.0,
            max_player_projectiles: 3,

            enemy_rows: 5,
            enemy_cols: 10,
            enemy_width: 40.0,
            enemy_height: 30.0,
            enemy_gap: 10.0,
            enemy_origin_x: 50.0,
            enemy_origin_y: 50.0,
            enemy_base_speed: 1.0,
            enemy_speed_increment: 0.3,
            enemy_level_speed_step: 0.3,
            enemy_edge_margin: 20.0,
            enemy_drop: 15.0,
            enemy_shoot_interval_ms: 800,
            encroachment_margin: 120.0,

            shield_count: 4,
            shield_width: 80.0,
            shield_height: 40.0,
            shield_max_health: 100,
            shield_damage: 25,
            shield_bottom_offset: 150.0,

            bonus_width: 60.0,
            bonus_height: 30.0,
            bonus_speed: 2.0,
            bonus_y: 30.0,
            bonus_interval_ms: 3000,
            bonus_probability: 0.15,
            bonus_points: [50, 100, 150],

            game_over_delay_ms: 1000,
            level_transition_ms: 2500,
            hit_flash_ms: 500,
            level_banner_ms: 2000,
        }
    }
}

impl GameConfig {
    /// Total number of invaders in one wave.
    pub fn wave_size(&self) -> usize {
        self.enemy_rows * self.enemy_cols
    }

    /// Vertical position of the player's cannon.
    pub fn player_y(&self) -> f32 {
        self.canvas_height - self.player_bottom_offset
    }

    /// Reject configurations the simulation cannot lay out.
    pub fn validate(&self) -> Result<(), GameError> {
        fn invalid(field: &'static str, reason: &'static str) -> Result<(), GameError> {
            Err(GameError::InvalidConfig { field, reason })
        }

        if !(self.canvas_width > 0.0 && self.canvas_height > 0.0) {
            return invalid("canvas", "width and height must be positive");
        }
        if self.player_width <= 0.0 || self.player_width > self.canvas_width {
            return invalid("player_width", "must be positive and fit the canvas");
        }
        if self.player_bottom_offset <= 0.0 || self.player_bottom_offset > self.canvas_height {
            return invalid("player_bottom_offset", "must place the player on the canvas");
        }
        if self.enemy_rows == 0 || self.enemy_cols == 0 {
            return invalid("enemy grid", "needs at least one row and one column");
        }
        if self.max_player_projectiles == 0 {
            return invalid("max_player_projectiles", "must allow at least one shot");
        }
        if self.shield_max_health <= 0 || self.shield_damage <= 0 {
            return invalid("shield", "health and damage must be positive");
        }
        if !(0.0..=1.0).contains(&self.bonus_probability) {
            return invalid("bonus_probability", "must lie in [0, 1]");
        }
        if self.starting_lives == 0 {
            return invalid("starting_lives", "must be at least 1");
        }
        Ok(())
    }
}
