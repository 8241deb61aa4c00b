//! Projectile flight and off-screen culling.

use log::warn;

use crate::config::GameConfig;
use crate::entities::{GameState, Projectile};

/// Move every projectile by its signed speed.  Player shots are dropped once
/// they pass above the top edge, enemy shots once they pass below the bottom.
/// Survivors keep their relative order.
pub fn advance(state: &mut GameState, config: &GameConfig) {
    advance_list(&mut state.player_projectiles, |p| p.rect.y < 0.0);
    advance_list(&mut state.enemy_projectiles, |p| p.rect.y > config.canvas_height);
}

fn advance_list(list: &mut Vec<Projectile>, off_screen: impl Fn(&Projectile) -> bool) {
    for i in (0..list.len()).rev() {
        list[i].rect.y += list[i].speed;
        if !list[i].rect.is_finite() {
            warn!("dropping projectile with non-finite position {:?}", list[i].rect);
            list.remove(i);
        } else if off_screen(&list[i]) {
            list.remove(i);
        }
    }
}
