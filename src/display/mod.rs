//! Rendering layer.
//!
//! `render` is a pure read of the game state onto a `Surface`: it decides
//! what to draw and where, in logical canvas coordinates.  How the shapes
//! end up on screen is the surface's business (`terminal::TerminalSurface`
//! rasterises them into terminal cells).

pub mod presentation;
pub mod terminal;

use std::io;

use crossterm::style::Color;

use crate::config::GameConfig;
use crate::entities::{Bonus, GameState, Invader, Shield};
use crate::geometry::Rect;

// ── Colour palette ────────────────────────────────────────────────────────────

pub const C_BACKGROUND: Color = Color::Black;
pub const C_PLAYER: Color = Color::Green;
pub const C_PLAYER_HIT: Color = Color::Red;
pub const C_INVADER_BODY: Color = Color::Magenta;
pub const C_INVADER_DETAIL: Color = Color::Cyan;
pub const C_SHOT_PLAYER: Color = Color::Green;
pub const C_SHOT_ENEMY: Color = Color::Red;
pub const C_BONUS_BODY: Color = Color::Yellow;
pub const C_BONUS_DETAIL: Color = Color::Rgb { r: 255, g: 102, b: 0 };
pub const C_LEVEL: Color = Color::Cyan;
pub const C_PAUSE: Color = Color::Green;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// A 2D drawing target in logical canvas coordinates.
pub trait Surface {
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn fill_rect(&mut self, rect: Rect, color: Color) -> io::Result<()>;
    fn fill_polygon(&mut self, points: &[(f32, f32)], color: Color) -> io::Result<()>;
    fn fill_ellipse(&mut self, bounds: Rect, color: Color) -> io::Result<()>;
    fn text(&mut self, x: f32, y: f32, text: &str, color: Color, align: Align) -> io::Result<()>;
    /// Darken everything drawn so far.
    fn dim(&mut self) -> io::Result<()>;
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Draw one frame of the play field.
pub fn render<S: Surface>(
    surface: &mut S,
    state: &GameState,
    config: &GameConfig,
    now: u64,
) -> io::Result<()> {
    surface.clear(C_BACKGROUND)?;

    draw_player(surface, state, now)?;
    for invader in state.invaders.iter().filter(|i| i.alive) {
        draw_invader(surface, invader)?;
    }
    draw_projectiles(surface, state)?;
    for shield in state.shields.iter().filter(|s| s.is_standing()) {
        draw_shield(surface, shield, config)?;
    }
    if let Some(bonus) = &state.bonus {
        draw_bonus(surface, bonus)?;
    }
    draw_level(surface, state, config)?;
    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<S: Surface>(surface: &mut S, state: &GameState, now: u64) -> io::Result<()> {
    // Blink red in 100 ms steps while the hit flash lasts.
    let flashing = state.hit_flash_until.map_or(false, |until| now < until) && (now / 100) % 2 == 0;
    let color = if flashing { C_PLAYER_HIT } else { C_PLAYER };

    let p = state.player.rect;
    surface.fill_rect(p, color)?;
    // Barrel
    surface.fill_polygon(&[(p.x, p.y), (p.right(), p.y), (p.center_x(), p.y - 15.0)], color)
}

fn draw_invader<S: Surface>(surface: &mut S, invader: &Invader) -> io::Result<()> {
    let r = invader.rect;
    surface.fill_rect(r, C_INVADER_BODY)?;
    surface.fill_rect(Rect::new(r.x + 5.0, r.y + 5.0, r.width - 10.0, 5.0), C_INVADER_DETAIL)?;
    surface.fill_rect(
        Rect::new(r.x + 5.0, r.bottom() - 10.0, r.width - 10.0, 5.0),
        C_INVADER_DETAIL,
    )?;
    surface.fill_rect(Rect::new(r.x + 15.0, r.y + 10.0, 10.0, r.height - 20.0), C_INVADER_DETAIL)
}

fn draw_projectiles<S: Surface>(surface: &mut S, state: &GameState) -> io::Result<()> {
    for p in &state.player_projectiles {
        surface.fill_rect(p.rect, C_SHOT_PLAYER)?;
    }
    for p in &state.enemy_projectiles {
        surface.fill_rect(p.rect, C_SHOT_ENEMY)?;
    }
    Ok(())
}

/// Green intensity scales with remaining health.
pub fn shield_color(shield: &Shield, config: &GameConfig) -> Color {
    let fraction = (shield.health as f32 / config.shield_max_health as f32).clamp(0.0, 1.0);
    Color::Rgb {
        r: 0,
        g: (255.0 * fraction) as u8,
        b: 0,
    }
}

/// Bunker silhouette: flat top with chamfered corners, notched underside.
pub fn shield_outline(r: &Rect) -> [(f32, f32); 8] {
    [
        (r.x, r.bottom()),
        (r.x + 10.0, r.bottom() - 10.0),
        (r.right() - 10.0, r.bottom() - 10.0),
        (r.right(), r.bottom()),
        (r.right(), r.y + 20.0),
        (r.right() - 10.0, r.y + 10.0),
        (r.x + 10.0, r.y + 10.0),
        (r.x, r.y + 20.0),
    ]
}

fn draw_shield<S: Surface>(surface: &mut S, shield: &Shield, config: &GameConfig) -> io::Result<()> {
    surface.fill_polygon(&shield_outline(&shield.rect), shield_color(shield, config))
}

fn draw_bonus<S: Surface>(surface: &mut S, bonus: &Bonus) -> io::Result<()> {
    let r = bonus.rect;
    surface.fill_ellipse(r, C_BONUS_BODY)?;
    surface.fill_rect(Rect::new(r.x + 10.0, r.y + 5.0, r.width - 20.0, 5.0), C_BONUS_DETAIL)?;
    surface.fill_rect(
        Rect::new(r.x + 15.0, r.bottom() - 10.0, r.width - 30.0, 5.0),
        C_BONUS_DETAIL,
    )
}

// ── Heads-up level indicator & pause overlay ──────────────────────────────────

fn draw_level<S: Surface>(surface: &mut S, state: &GameState, config: &GameConfig) -> io::Result<()> {
    surface.text(10.0, 25.0, &format!("LEVEL: {}", state.level), C_LEVEL, Align::Left)?;

    if state.paused {
        surface.dim()?;
        let cx = config.canvas_width / 2.0;
        let cy = config.canvas_height / 2.0;
        surface.text(cx, cy, "PAUSED", C_PAUSE, Align::Center)?;
        surface.text(cx, cy + 40.0, "Press P or ESC to continue", C_PAUSE, Align::Center)?;
    }
    Ok(())
}
