//! The bonus saucer: probabilistic spawning on a timer, flight, retirement.

use log::debug;
use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{Bonus, GameEvent, GameState};
use crate::factory::create_bonus_target;

/// Spawn attempt plus movement for one tick.
///
/// While no saucer is out, an attempt is made once more than
/// `bonus_interval_ms` has passed since the previous attempt.  The attempt
/// timestamp is re-armed whether or not the draw succeeds, so a failed draw
/// waits a full interval before the next one.
pub fn update(state: &mut GameState, config: &GameConfig, now: u64, rng: &mut impl Rng) {
    if state.bonus.is_none() {
        let due = match state.last_bonus_attempt_at {
            None => true,
            Some(last) => now.saturating_sub(last) > config.bonus_interval_ms,
        };
        if due {
            state.last_bonus_attempt_at = Some(now);
            if rng.gen::<f64>() < config.bonus_probability {
                let bonus = create_bonus_target(config, rng);
                debug!("bonus target worth {} appears", bonus.points);
                state.bonus = Some(bonus);
                state.push_event(GameEvent::BonusAppeared);
            }
        }
    }

    let escaped = match state.bonus.as_mut() {
        Some(bonus) => {
            bonus.rect.x += bonus.speed;
            has_exited(bonus, config)
        }
        None => false,
    };
    if escaped {
        state.bonus = None;
        state.push_event(GameEvent::BonusEscaped);
    }
}

/// Fully past the trailing edge for its direction of travel.
fn has_exited(bonus: &Bonus, config: &GameConfig) -> bool {
    if bonus.speed >= 0.0 {
        bonus.rect.x > config.canvas_width
    } else {
        bonus.rect.right() < 0.0
    }
}
