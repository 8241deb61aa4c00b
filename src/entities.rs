//! All game entity types and the session state that owns them.
//!
//! `GameState` is the single source of truth: every controller function
//! takes it by `&mut` and nothing else holds entity data.

use crate::config::GameConfig;
use crate::geometry::Rect;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// No session has been started yet.
    Idle,
    Playing,
    GameOver,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn sign(self) -> f32 {
        match self {
            Direction::Left => -1.0,
            Direction::Right => 1.0,
        }
    }

    pub fn flipped(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player,
    Enemy,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameOverReason {
    /// The formation reached the player's row.
    Encroachment,
    LivesExhausted,
}

// ── Events ────────────────────────────────────────────────────────────────────

/// Something the presentation (or an audio collaborator) may react to.
/// Recorded on the state as it happens and drained once per frame.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    SessionStarted,
    PlayerFired,
    EnemyFired,
    InvaderDestroyed { points: u32 },
    BonusAppeared,
    BonusDestroyed { points: u32 },
    BonusEscaped,
    ShieldDamaged { index: usize, health: i32 },
    PlayerHit { lives_left: u32 },
    /// `level` is the level that was just cleared.
    LevelCleared { level: u32 },
    LevelStarted { level: u32 },
    Paused,
    Resumed,
    GameOver { score: u32, reason: GameOverReason },
}

// ── Entities ──────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub rect: Rect,
    pub speed: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Invader {
    pub rect: Rect,
    pub row: usize,
    pub col: usize,
    /// Dead invaders stay in the wave as tombstones.
    pub alive: bool,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Shield {
    pub rect: Rect,
    /// Clamped to `0..=max`; zero means destroyed.
    pub health: i32,
}

impl Shield {
    pub fn is_standing(&self) -> bool {
        self.health > 0
    }
}

/// The bonus saucer crossing the top of the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Bonus {
    pub rect: Rect,
    /// Signed horizontal speed; positive travels right.
    pub speed: f32,
    pub points: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Projectile {
    pub rect: Rect,
    /// Signed vertical speed: negative rises (player), positive falls (enemy).
    pub speed: f32,
}

impl Projectile {
    pub fn owner(&self) -> Owner {
        if self.speed < 0.0 {
            Owner::Player
        } else {
            Owner::Enemy
        }
    }
}

// ── Master game state ─────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub status: GameStatus,
    pub paused: bool,
    /// Set between a wave clear and the start of the next wave.
    pub in_transition: bool,
    pub score: u32,
    pub lives: u32,
    pub level: u32,

    pub player: Player,
    pub invaders: Vec<Invader>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub shields: Vec<Shield>,
    pub bonus: Option<Bonus>,

    pub enemy_direction: Direction,
    pub enemy_speed: f32,
    /// Millisecond timestamps; `None` means the event has not happened yet.
    pub last_enemy_shot_at: Option<u64>,
    pub last_bonus_attempt_at: Option<u64>,
    /// The cannon blinks until this timestamp after being hit.
    pub hit_flash_until: Option<u64>,

    pub frame: u64,
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// An idle state: nothing spawned, waiting for the first start.
    pub fn new(config: &GameConfig) -> Self {
        let mut state = GameState {
            status: GameStatus::Idle,
            paused: false,
            in_transition: false,
            score: 0,
            lives: config.starting_lives,
            level: 1,
            player: Player {
                rect: Rect::new(0.0, 0.0, config.player_width, config.player_height),
                speed: config.player_speed,
            },
            invaders: Vec::new(),
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            shields: Vec::new(),
            bonus: None,
            enemy_direction: Direction::Right,
            enemy_speed: config.enemy_base_speed,
            last_enemy_shot_at: None,
            last_bonus_attempt_at: None,
            hit_flash_until: None,
            frame: 0,
            events: Vec::new(),
        };
        state.place_player(config);
        state
    }

    /// Reinitialise every scalar and clear every collection, leaving the
    /// session active.  Calling it twice is the same as calling it once.
    pub fn reset(&mut self, config: &GameConfig) {
        self.status = GameStatus::Playing;
        self.paused = false;
        self.in_transition = false;
        self.score = 0;
        self.lives = config.starting_lives;
        self.level = 1;
        self.enemy_direction = Direction::Right;
        self.enemy_speed = config.enemy_base_speed;
        self.last_enemy_shot_at = None;
        self.last_bonus_attempt_at = None;
        self.hit_flash_until = None;
        self.frame = 0;

        self.player.speed = config.player_speed;
        self.place_player(config);

        self.invaders.clear();
        self.player_projectiles.clear();
        self.enemy_projectiles.clear();
        self.shields.clear();
        self.bonus = None;
        self.events.clear();
    }

    fn place_player(&mut self, config: &GameConfig) {
        self.player.rect = Rect::new(
            config.canvas_width / 2.0 - config.player_width / 2.0,
            config.player_y(),
            config.player_width,
            config.player_height,
        );
    }

    /// Session started and not game over.
    pub fn is_active(&self) -> bool {
        self.status == GameStatus::Playing
    }

    /// The update pass runs only in this condition.
    pub fn is_running(&self) -> bool {
        self.is_active() && !self.paused && !self.in_transition
    }

    pub fn alive_invaders(&self) -> usize {
        self.invaders.iter().filter(|i| i.alive).count()
    }

    pub fn wave_cleared(&self) -> bool {
        !self.invaders.is_empty() && self.invaders.iter().all(|i| !i.alive)
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
