//! The game state machine.
//!
//! ```text
//! Idle ──start──▶ Active ⇄ Paused
//!                   │ wave cleared
//!                   ▼
//!             LevelTransition ──timer──▶ Active
//!                   │
//! Active ──encroachment / lives exhausted (after delay)──▶ GameOver
//! GameOver ──restart──▶ Active   (full session reset)
//! ```
//!
//! `Game` owns the config, the state and the scheduler.  Starting a session
//! hands out two task handles (frame and input); the binary passes them back
//! on every call, and calls made with a cancelled handle are ignored.

use log::{debug, info};
use rand::Rng;

use crate::compute;
use crate::config::GameConfig;
use crate::entities::{Direction, GameEvent, GameOverReason, GameState, GameStatus};
use crate::error::GameError;
use crate::scheduler::{Scheduler, TaskHandle};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Active,
    Paused,
    LevelTransition,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TimerAction {
    EndLevelTransition,
    GameOver,
}

/// Handles for the two repeating tasks of one session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionTasks {
    pub frame: TaskHandle,
    pub input: TaskHandle,
}

pub struct Game {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler<TimerAction>,
    tasks: Option<SessionTasks>,
    /// One-shot timers scheduled by the current session.
    timers: Vec<TaskHandle>,
}

impl Game {
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        config.validate()?;
        let state = GameState::new(&config);
        Ok(Game {
            config,
            state,
            scheduler: Scheduler::new(),
            tasks: None,
            timers: Vec::new(),
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct state access for tests and tooling.
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn phase(&self) -> Phase {
        match self.state.status {
            GameStatus::Idle => Phase::Idle,
            GameStatus::GameOver => Phase::GameOver,
            GameStatus::Playing if self.state.in_transition => Phase::LevelTransition,
            GameStatus::Playing if self.state.paused => Phase::Paused,
            GameStatus::Playing => Phase::Active,
        }
    }

    pub fn is_live(&self, task: TaskHandle) -> bool {
        self.scheduler.is_live(task)
    }

    /// Timers still waiting to fire.
    pub fn pending_timers(&self) -> usize {
        self.scheduler.pending_timers()
    }

    // ── Session lifecycle ────────────────────────────────────────────────────

    /// Start (or restart) a session.  Every task and timer of the previous
    /// session is cancelled before the state is reset.
    pub fn start(&mut self, now: u64) -> SessionTasks {
        self.scheduler.cancel_all();
        self.tasks = None;
        self.timers.clear();

        compute::init_session(&mut self.state, &self.config);

        let tasks = SessionTasks {
            frame: self.scheduler.spawn_repeating(),
            input: self.scheduler.spawn_repeating(),
        };
        self.tasks = Some(tasks);
        info!("session started at {} ms", now);
        tasks
    }

    pub fn restart(&mut self, now: u64) -> SessionTasks {
        self.start(now)
    }

    /// Flip pause.  Only while a session is active and not between waves.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.state.is_active() || self.state.in_transition {
            return false;
        }
        self.state.paused = !self.state.paused;
        let event = if self.state.paused {
            GameEvent::Paused
        } else {
            GameEvent::Resumed
        };
        debug!("{:?}", event);
        self.state.push_event(event);
        true
    }

    /// One-shot fire command.
    pub fn fire(&mut self) -> bool {
        compute::player_shoot(&mut self.state, &self.config)
    }

    /// Apply held directions.  Ignored for a stale input task.
    pub fn sample_input(&mut self, task: TaskHandle, held: &[Direction]) {
        if !self.is_live(task) {
            return;
        }
        for &direction in held {
            compute::move_player(&mut self.state, &self.config, direction);
        }
    }

    /// Run one frame of the update task: due timers, then the tick, then
    /// scheduling follow-ups for what happened.  Returns the frame's events.
    pub fn frame(&mut self, task: TaskHandle, now: u64, rng: &mut impl Rng) -> Vec<GameEvent> {
        if !self.is_live(task) {
            debug!("ignoring stale frame task {:?}", task);
            return Vec::new();
        }

        if !self.state.paused {
            for action in self.scheduler.take_due(now) {
                match action {
                    TimerAction::EndLevelTransition => {
                        compute::start_next_wave(&mut self.state, &self.config)
                    }
                    TimerAction::GameOver => {
                        compute::end_session(&mut self.state, GameOverReason::LivesExhausted)
                    }
                }
            }
            let scheduler = &self.scheduler;
            self.timers.retain(|h| scheduler.is_live(*h));
        }

        compute::tick(&mut self.state, &self.config, now, rng);

        let events = self.state.drain_events();
        for event in &events {
            match event {
                GameEvent::LevelCleared { .. } => {
                    let timer = self
                        .scheduler
                        .schedule_once(now + self.config.level_transition_ms, TimerAction::EndLevelTransition);
                    self.timers.push(timer);
                }
                GameEvent::PlayerHit { lives_left: 0 } => {
                    let timer = self
                        .scheduler
                        .schedule_once(now + self.config.game_over_delay_ms, TimerAction::GameOver);
                    self.timers.push(timer);
                }
                _ => {}
            }
        }

        if self.state.status == GameStatus::GameOver {
            self.stop();
        }
        events
    }

    /// Cancel the session's repeating tasks and whatever timers it still has
    /// pending (a wave cleared in the same frame as the last life is lost
    /// leaves its transition timer behind).
    fn stop(&mut self) {
        let Some(tasks) = self.tasks.take() else {
            return;
        };
        self.scheduler.cancel(tasks.frame);
        self.scheduler.cancel(tasks.input);
        let mut dropped = 0;
        for timer in std::mem::take(&mut self.timers) {
            if self.scheduler.cancel(timer) {
                dropped += 1;
            }
        }
        info!(
            "session stopped, score {}, {} pending timer(s) dropped",
            self.state.score, dropped
        );
    }
}
