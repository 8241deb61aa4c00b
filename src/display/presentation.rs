//! Screen furniture around the play field: HUD row, controls hint, start
//! panel, game-over panel and the level-complete banner.
//!
//! The `Hud` keeps its own copy of score, lives and level and only refreshes
//! it when an event says one of them changed.

use crossterm::style::Color;

use super::terminal::TerminalSurface;
use crate::config::GameConfig;
use crate::controller::Phase;
use crate::entities::{GameEvent, GameState};

const C_HUD_SCORE: Color = Color::Yellow;
const C_HUD_LIVES: Color = Color::Red;
const C_HUD_LEVEL: Color = Color::Cyan;
const C_HINT: Color = Color::DarkGrey;
const C_TITLE: Color = Color::Green;
const C_BANNER: Color = Color::Yellow;

const CONTROLS: &str = "← → / A D : Move   SPACE : Shoot   P : Pause   Q : Quit";

#[derive(Clone, Debug, PartialEq, Eq)]
struct Banner {
    title: String,
    subtitle: String,
    until: u64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hud {
    score: u32,
    lives: u32,
    level: u32,
    banner: Option<Banner>,
    banner_ms: u64,
}

impl Hud {
    pub fn new(state: &GameState, config: &GameConfig) -> Self {
        Hud {
            score: state.score,
            lives: state.lives,
            level: state.level,
            banner: None,
            banner_ms: config.level_banner_ms,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Banner lines, while the banner is still showing.
    pub fn banner(&self, now: u64) -> Option<(&str, &str)> {
        self.banner
            .as_ref()
            .filter(|b| now < b.until)
            .map(|b| (b.title.as_str(), b.subtitle.as_str()))
    }

    /// Refresh from one frame's events.
    pub fn apply(&mut self, events: &[GameEvent], state: &GameState, now: u64) {
        for event in events {
            match event {
                GameEvent::SessionStarted => {
                    self.score = state.score;
                    self.lives = state.lives;
                    self.level = state.level;
                    self.banner = None;
                }
                GameEvent::InvaderDestroyed { .. } | GameEvent::BonusDestroyed { .. } => {
                    self.score = state.score;
                }
                GameEvent::PlayerHit { lives_left } => self.lives = *lives_left,
                GameEvent::LevelCleared { level } => {
                    self.level = level + 1;
                    self.banner = Some(Banner {
                        title: format!("LEVEL {} COMPLETE!", level),
                        subtitle: format!("Preparing level {}...", level + 1),
                        until: now + self.banner_ms,
                    });
                }
                GameEvent::LevelStarted { level } => self.level = *level,
                GameEvent::GameOver { score, .. } => self.score = *score,
                _ => {}
            }
        }
    }

    /// Draw everything that is not the play field itself.
    pub fn draw(&self, surface: &mut TerminalSurface, phase: Phase, now: u64) {
        match phase {
            Phase::Idle => draw_start_panel(surface),
            _ => {
                self.draw_hud_row(surface);
                if let Some((title, subtitle)) = self.banner(now) {
                    draw_panel(
                        surface,
                        &[(title, C_BANNER), (subtitle, Color::White)],
                    );
                }
                if phase == Phase::GameOver {
                    self.draw_game_over(surface);
                }
            }
        }
        let hint_row = surface.rows() as i32 - 1;
        surface.put_str(1, hint_row, CONTROLS, C_HINT);
    }

    fn draw_hud_row(&self, surface: &mut TerminalSurface) {
        surface.put_str(1, 0, &format!("Score: {:>8}", self.score), C_HUD_SCORE);

        surface.put_centered(0, &format!("[ LEVEL {} ]", self.level), C_HUD_LEVEL);

        let hearts = "♥".repeat(self.lives as usize);
        surface.put_right(0, &format!("Lives: {}", hearts), C_HUD_LIVES);
    }

    fn draw_game_over(&self, surface: &mut TerminalSurface) {
        let score_line = format!("Final Score: {}", self.score);
        draw_panel(
            surface,
            &[
                ("╔══════════════════╗", Color::Red),
                ("║    GAME  OVER    ║", Color::Red),
                ("╚══════════════════╝", Color::Red),
                (score_line.as_str(), Color::Yellow),
                ("ENTER / R - Play Again  Q - Quit", Color::White),
            ],
        );
    }
}

fn draw_start_panel(surface: &mut TerminalSurface) {
    draw_panel(
        surface,
        &[
            ("╔══════════════════════╗", C_TITLE),
            ("║    SPACE INVADERS    ║", C_TITLE),
            ("╚══════════════════════╝", C_TITLE),
            ("", Color::Reset),
            ("ENTER - Start   Q - Quit", Color::White),
        ],
    );
}

/// Centre a block of lines on screen.
fn draw_panel(surface: &mut TerminalSurface, lines: &[(&str, Color)]) {
    let start_row = surface.rows() as i32 / 2 - lines.len() as i32 / 2;
    for (i, (text, color)) in lines.iter().enumerate() {
        surface.put_centered(start_row + i as i32, text, *color);
    }
}
