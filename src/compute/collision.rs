//! Projectile collision resolution.
//!
//! Player shots test, in priority order, the live invaders (storage order,
//! first match wins), then the bonus saucer, then the standing shields.
//! Enemy shots test the player, then the standing shields.  A shot is
//! consumed by at most one hit.  Both lists are walked from the back so
//! removals never skip an entry.

use log::{debug, warn};

use crate::compute::{begin_level_transition, enemy};
use crate::config::GameConfig;
use crate::entities::{GameEvent, GameState, Shield};
use crate::geometry::{intersects, Rect};

pub fn resolve(state: &mut GameState, config: &GameConfig, now: u64) {
    resolve_player_projectiles(state, config);
    resolve_enemy_projectiles(state, config, now);
}

pub fn resolve_player_projectiles(state: &mut GameState, config: &GameConfig) {
    for i in (0..state.player_projectiles.len()).rev() {
        let shot = state.player_projectiles[i].rect;
        if !shot.is_finite() {
            warn!("skipping malformed player projectile {:?}", shot);
            state.player_projectiles.remove(i);
            continue;
        }

        // ── 1. Invaders ──────────────────────────────────────────────────────
        let target = state
            .invaders
            .iter()
            .position(|inv| inv.alive && intersects(&shot, &inv.rect));
        if let Some(idx) = target {
            state.player_projectiles.remove(i);
            let invader = &mut state.invaders[idx];
            invader.alive = false;
            let points = invader.points;
            state.score += points;
            state.push_event(GameEvent::InvaderDestroyed { points });
            enemy::recompute_speed(state, config);
            debug!(
                "invader {} down (+{}), {} left",
                idx,
                points,
                state.alive_invaders()
            );
            if state.wave_cleared() {
                begin_level_transition(state);
            }
            continue;
        }

        // ── 2. Bonus saucer ──────────────────────────────────────────────────
        let bonus_hit = state
            .bonus
            .as_ref()
            .filter(|b| intersects(&shot, &b.rect))
            .map(|b| b.points);
        if let Some(points) = bonus_hit {
            state.player_projectiles.remove(i);
            state.score += points;
            state.bonus = None;
            debug!("bonus target down (+{})", points);
            state.push_event(GameEvent::BonusDestroyed { points });
            continue;
        }

        // ── 3. Shields ───────────────────────────────────────────────────────
        if let Some((index, health)) = damage_shield(&mut state.shields, &shot, config) {
            state.player_projectiles.remove(i);
            state.push_event(GameEvent::ShieldDamaged { index, health });
        }
    }
}

pub fn resolve_enemy_projectiles(state: &mut GameState, config: &GameConfig, now: u64) {
    for i in (0..state.enemy_projectiles.len()).rev() {
        let shot = state.enemy_projectiles[i].rect;
        if !shot.is_finite() {
            warn!("skipping malformed enemy projectile {:?}", shot);
            state.enemy_projectiles.remove(i);
            continue;
        }

        if intersects(&shot, &state.player.rect) {
            state.enemy_projectiles.remove(i);
            player_hit(state, config, now);
            continue;
        }

        if let Some((index, health)) = damage_shield(&mut state.shields, &shot, config) {
            state.enemy_projectiles.remove(i);
            state.push_event(GameEvent::ShieldDamaged { index, health });
        }
    }
}

/// Take one life.  A no-op once lives are exhausted; the controller turns the
/// `PlayerHit { lives_left: 0 }` event into a delayed game over.
pub fn player_hit(state: &mut GameState, config: &GameConfig, now: u64) {
    if state.lives == 0 || !state.is_active() {
        return;
    }
    state.lives -= 1;
    state.hit_flash_until = Some(now + config.hit_flash_ms);
    debug!("player hit, {} lives left", state.lives);
    state.push_event(GameEvent::PlayerHit {
        lives_left: state.lives,
    });
}

/// Damage the first standing shield the shot overlaps.  Health is clamped
/// at zero.  Returns the shield's index and remaining health.
fn damage_shield(shields: &mut [Shield], shot: &Rect, config: &GameConfig) -> Option<(usize, i32)> {
    let (index, shield) = shields
        .iter_mut()
        .enumerate()
        .find(|(_, s)| s.is_standing() && intersects(shot, &s.rect))?;
    shield.health = (shield.health - config.shield_damage).max(0);
    Some((index, shield.health))
}
