use space_invaders::compute::*;
use space_invaders::config::GameConfig;
use space_invaders::entities::*;
use space_invaders::factory::{create_bonus_target, create_projectile};
use space_invaders::geometry::Rect;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A freshly started session with the start-up events already drained.
fn playing() -> (GameConfig, GameState) {
    let cfg = GameConfig::default();
    let mut s = GameState::new(&cfg);
    init_session(&mut s, &cfg);
    s.drain_events();
    (cfg, s)
}

/// Keep enemy fire and bonus attempts off for ticks stamped `now`.
fn hold_timers(s: &mut GameState, now: u64) {
    s.last_enemy_shot_at = Some(now);
    s.last_bonus_attempt_at = Some(now);
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-4
}

// ── init_session ──────────────────────────────────────────────────────────────

#[test]
fn init_session_lays_out_wave_and_shields() {
    let cfg = GameConfig::default();
    let mut s = GameState::new(&cfg);
    init_session(&mut s, &cfg);
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!(s.invaders.len(), 50);
    assert_eq!(s.shields.len(), 4);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::SessionStarted, GameEvent::LevelStarted { level: 1 }]
    );
}

// ── move_player ───────────────────────────────────────────────────────────────

#[test]
fn move_steps_by_player_speed() {
    let (cfg, mut s) = playing();
    move_player_left(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 370.0);
    move_player_right(&mut s, &cfg);
    move_player_right(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 380.0);
}

#[test]
fn move_clamps_at_both_edges() {
    let (cfg, mut s) = playing();
    s.player.rect.x = 2.0;
    move_player_left(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 0.0);

    s.player.rect.x = 748.0;
    move_player_right(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 750.0);
    move_player_right(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 750.0);
}

#[test]
fn move_ignored_while_paused() {
    let (cfg, mut s) = playing();
    s.paused = true;
    move_player_left(&mut s, &cfg);
    assert_eq!(s.player.rect.x, 375.0);
}

// ── player_shoot ──────────────────────────────────────────────────────────────

#[test]
fn shoot_spawns_from_cannon_centre() {
    let (cfg, mut s) = playing();
    assert!(player_shoot(&mut s, &cfg));
    let shot = &s.player_projectiles[0];
    assert_eq!(shot.rect, Rect::new(398.0, 560.0, 4.0, 10.0));
    assert_eq!(shot.owner(), Owner::Player);
    assert_eq!(s.drain_events(), vec![GameEvent::PlayerFired]);
}

#[test]
fn shoot_cap_at_three_player_projectiles() {
    let (cfg, mut s) = playing();
    for _ in 0..3 {
        assert!(player_shoot(&mut s, &cfg));
    }
    assert!(!player_shoot(&mut s, &cfg));
    assert_eq!(s.player_projectiles.len(), 3);
}

#[test]
fn enemy_projectiles_do_not_count_against_cap() {
    let (cfg, mut s) = playing();
    for _ in 0..5 {
        s.enemy_projectiles
            .push(create_projectile(&cfg, 10.0, 10.0, Owner::Enemy));
    }
    s.player_projectiles
        .push(create_projectile(&cfg, 10.0, 300.0, Owner::Player));
    assert!(player_shoot(&mut s, &cfg));
    assert!(player_shoot(&mut s, &cfg));
    assert!(!player_shoot(&mut s, &cfg));
}

#[test]
fn shoot_refused_outside_a_session() {
    let cfg = GameConfig::default();
    let mut s = GameState::new(&cfg);
    assert!(!player_shoot(&mut s, &cfg));
}

// ── tick basics ───────────────────────────────────────────────────────────────

#[test]
fn tick_increments_frame_only_when_running() {
    let (cfg, mut s) = playing();
    tick(&mut s, &cfg, 0, &mut seeded_rng());
    assert_eq!(s.frame, 1);

    s.paused = true;
    let before = s.clone();
    tick(&mut s, &cfg, 16, &mut seeded_rng());
    assert_eq!(s, before);
}

#[test]
fn projectiles_move_and_leave_the_field() {
    let (cfg, mut s) = playing();
    s.player_projectiles
        .push(create_projectile(&cfg, 300.0, 300.0, Owner::Player));
    s.player_projectiles
        .push(create_projectile(&cfg, 300.0, 3.0, Owner::Player));
    s.enemy_projectiles
        .push(create_projectile(&cfg, 700.0, 300.0, Owner::Enemy));
    s.enemy_projectiles
        .push(create_projectile(&cfg, 700.0, 598.0, Owner::Enemy));

    projectile::advance(&mut s, &cfg);

    assert_eq!(s.player_projectiles.len(), 1);
    assert_eq!(s.player_projectiles[0].rect.y, 293.0);
    assert_eq!(s.enemy_projectiles.len(), 1);
    assert_eq!(s.enemy_projectiles[0].rect.y, 307.0);
}

#[test]
fn survivors_keep_their_order() {
    let (cfg, mut s) = playing();
    for y in [100.0, 2.0, 200.0, 4.0, 300.0] {
        s.player_projectiles
            .push(create_projectile(&cfg, 10.0, y, Owner::Player));
    }
    projectile::advance(&mut s, &cfg);
    let ys: Vec<f32> = s.player_projectiles.iter().map(|p| p.rect.y).collect();
    assert_eq!(ys, vec![93.0, 193.0, 293.0]);
}

#[test]
fn malformed_projectile_is_dropped() {
    let (cfg, mut s) = playing();
    let mut bad = create_projectile(&cfg, 10.0, 100.0, Owner::Enemy);
    bad.rect.y = f32::NAN;
    s.enemy_projectiles.push(bad);
    s.enemy_projectiles
        .push(create_projectile(&cfg, 10.0, 100.0, Owner::Enemy));

    projectile::advance(&mut s, &cfg);
    assert_eq!(s.enemy_projectiles.len(), 1);
    assert!(s.enemy_projectiles[0].rect.is_finite());
}

// ── Enemy formation ───────────────────────────────────────────────────────────

#[test]
fn formation_marches_right_at_current_speed() {
    let (cfg, mut s) = playing();
    assert!(!enemy::advance_formation(&mut s, &cfg));
    assert_eq!(s.invaders[0].rect.x, 51.0);
    assert_eq!(s.invaders[0].rect.y, 50.0);
}

#[test]
fn formation_bounces_and_drops_at_edge() {
    let (cfg, mut s) = playing();
    for inv in s.invaders.iter_mut().skip(1) {
        inv.alive = false;
    }
    s.invaders[0].rect.x = 741.0; // right edge 781 >= 780

    enemy::advance_formation(&mut s, &cfg);

    assert_eq!(s.enemy_direction, Direction::Left);
    assert_eq!(s.invaders[0].rect.x, 740.0);
    assert_eq!(s.invaders[0].rect.y, 65.0);
}

#[test]
fn dead_invaders_do_not_trigger_the_edge() {
    let (cfg, mut s) = playing();
    s.invaders[9].alive = false;
    s.invaders[9].rect.x = 790.0;
    enemy::advance_formation(&mut s, &cfg);
    assert_eq!(s.enemy_direction, Direction::Right);
    assert_eq!(s.invaders[9].rect.x, 790.0);
}

#[test]
fn encroachment_ends_the_session_immediately() {
    let (cfg, mut s) = playing();
    hold_timers(&mut s, 0);
    s.invaders[49].rect.y = 420.0; // bottom 450 >= 560 - 120

    // A shot that would hit the player this tick never resolves.
    let p = s.player.rect;
    s.enemy_projectiles
        .push(create_projectile(&cfg, p.center_x() - 2.0, p.y - 5.0, Owner::Enemy));

    tick(&mut s, &cfg, 0, &mut seeded_rng());

    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.lives, 3);
    assert!(s.drain_events().contains(&GameEvent::GameOver {
        score: 0,
        reason: GameOverReason::Encroachment,
    }));
}

#[test]
fn speed_scales_with_losses() {
    let (cfg, mut s) = playing();
    for inv in s.invaders.iter_mut().take(25) {
        inv.alive = false;
    }
    enemy::recompute_speed(&mut s, &cfg);
    assert!(approx(s.enemy_speed, 1.15));
}

#[test]
fn enemy_fire_respects_interval() {
    let (cfg, mut s) = playing();
    let mut rng = StepRng::new(0, 0);

    assert!(enemy::fire_at_random(&mut s, &cfg, 0, &mut rng));
    assert!(!enemy::fire_at_random(&mut s, &cfg, 500, &mut rng));
    assert!(!enemy::fire_at_random(&mut s, &cfg, 799, &mut rng));
    assert!(enemy::fire_at_random(&mut s, &cfg, 800, &mut rng));
    assert_eq!(s.enemy_projectiles.len(), 2);
    assert_eq!(s.last_enemy_shot_at, Some(800));

    // First live invader, bottom centre.
    let shot = &s.enemy_projectiles[0];
    assert_eq!(shot.rect, Rect::new(68.0, 80.0, 4.0, 10.0));
    assert_eq!(shot.owner(), Owner::Enemy);
}

#[test]
fn enemy_fire_needs_a_live_invader() {
    let (cfg, mut s) = playing();
    for inv in &mut s.invaders {
        inv.alive = false;
    }
    assert!(!enemy::fire_at_random(&mut s, &cfg, 0, &mut seeded_rng()));
    assert_eq!(s.last_enemy_shot_at, None);
}

// ── Bonus target ──────────────────────────────────────────────────────────────

#[test]
fn bonus_attempt_rearms_even_when_the_draw_fails() {
    let (cfg, mut s) = playing();

    // Draw lands near 1.0: no saucer, but the attempt is stamped.
    bonus::update(&mut s, &cfg, 0, &mut StepRng::new(u64::MAX, 0));
    assert!(s.bonus.is_none());
    assert_eq!(s.last_bonus_attempt_at, Some(0));

    // Not strictly past the interval yet.
    bonus::update(&mut s, &cfg, 3000, &mut StepRng::new(0, 0));
    assert!(s.bonus.is_none());

    bonus::update(&mut s, &cfg, 3001, &mut StepRng::new(0, 0));
    let b = s.bonus.as_ref().unwrap();
    assert_eq!(b.rect.x, -58.0);
    assert_eq!(b.points, 50);
    assert_eq!(s.last_bonus_attempt_at, Some(3001));
    assert_eq!(s.drain_events(), vec![GameEvent::BonusAppeared]);
}

#[test]
fn bonus_crosses_and_escapes() {
    let (cfg, mut s) = playing();
    s.bonus = Some(create_bonus_target(&cfg, &mut StepRng::new(0, 0)));
    let mut rng = seeded_rng();

    for _ in 0..430 {
        bonus::update(&mut s, &cfg, 0, &mut rng);
    }
    assert_eq!(s.bonus.as_ref().map(|b| b.rect.x), Some(800.0));

    bonus::update(&mut s, &cfg, 0, &mut rng);
    assert!(s.bonus.is_none());
    assert_eq!(s.score, 0);
    assert!(s.drain_events().contains(&GameEvent::BonusEscaped));
}

#[test]
fn shooting_the_bonus_awards_its_points() {
    let (cfg, mut s) = playing();
    let mut bonus = create_bonus_target(&cfg, &mut StepRng::new(0, 0));
    bonus.rect.x = 100.0;
    bonus.points = 150;
    s.bonus = Some(bonus);
    s.player_projectiles
        .push(create_projectile(&cfg, 120.0, 35.0, Owner::Player));

    collision::resolve_player_projectiles(&mut s, &cfg);

    assert!(s.bonus.is_none());
    assert!(s.player_projectiles.is_empty());
    assert_eq!(s.score, 150);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::BonusDestroyed { points: 150 }]
    );
}

// ── Collisions ────────────────────────────────────────────────────────────────

#[test]
fn front_row_kill_scores_fifty() {
    let (cfg, mut s) = playing();
    hold_timers(&mut s, 0);
    s.player_projectiles
        .push(create_projectile(&cfg, 68.0, 70.0, Owner::Player));

    tick(&mut s, &cfg, 0, &mut seeded_rng());

    assert_eq!(s.score, 50);
    assert!(!s.invaders[0].alive);
    assert_eq!(s.alive_invaders(), 49);
    assert!(s.player_projectiles.is_empty());
    assert!(approx(s.enemy_speed, 1.0 + 0.3 / 50.0));
    assert!(s
        .drain_events()
        .contains(&GameEvent::InvaderDestroyed { points: 50 }));
}

#[test]
fn dead_invader_is_a_tombstone() {
    let (cfg, mut s) = playing();
    s.invaders[0].alive = false;
    s.player_projectiles
        .push(create_projectile(&cfg, 68.0, 60.0, Owner::Player));
    collision::resolve_player_projectiles(&mut s, &cfg);
    assert_eq!(s.invaders.len(), 50);
    assert_eq!(s.player_projectiles.len(), 1);
    assert_eq!(s.score, 0);
}

#[test]
fn shield_wears_down_in_quarters() {
    let (cfg, mut s) = playing();
    hold_timers(&mut s, 0);
    let mut rng = seeded_rng();

    for expected in [75, 50, 25, 0] {
        s.enemy_projectiles
            .push(create_projectile(&cfg, 158.0, 440.0, Owner::Enemy));
        tick(&mut s, &cfg, 0, &mut rng);
        assert_eq!(s.shields[0].health, expected);
        assert!(s.enemy_projectiles.is_empty());
    }
    assert!(!s.shields[0].is_standing());

    // A destroyed shield no longer blocks.
    s.enemy_projectiles
        .push(create_projectile(&cfg, 158.0, 440.0, Owner::Enemy));
    tick(&mut s, &cfg, 0, &mut rng);
    assert_eq!(s.enemy_projectiles.len(), 1);
    assert_eq!(s.shields[0].health, 0);
}

#[test]
fn player_shots_also_damage_shields() {
    let (cfg, mut s) = playing();
    s.player_projectiles
        .push(create_projectile(&cfg, 318.0, 470.0, Owner::Player));
    collision::resolve_player_projectiles(&mut s, &cfg);
    assert_eq!(s.shields[1].health, 75);
    assert_eq!(
        s.drain_events(),
        vec![GameEvent::ShieldDamaged { index: 1, health: 75 }]
    );
}

#[test]
fn enemy_shot_costs_a_life_and_flashes() {
    let (cfg, mut s) = playing();
    let p = s.player.rect;
    s.enemy_projectiles
        .push(create_projectile(&cfg, p.center_x() - 2.0, p.y - 5.0, Owner::Enemy));

    collision::resolve_enemy_projectiles(&mut s, &cfg, 1_000);

    assert_eq!(s.lives, 2);
    assert_eq!(s.hit_flash_until, Some(1_500));
    assert!(s.enemy_projectiles.is_empty());
    assert_eq!(s.drain_events(), vec![GameEvent::PlayerHit { lives_left: 2 }]);
}

#[test]
fn player_hit_is_a_noop_without_lives() {
    let (cfg, mut s) = playing();
    for _ in 0..3 {
        collision::player_hit(&mut s, &cfg, 0);
    }
    assert_eq!(s.lives, 0);
    s.drain_events();
    collision::player_hit(&mut s, &cfg, 0);
    assert_eq!(s.lives, 0);
    assert!(s.drain_events().is_empty());
}

#[test]
fn invader_outranks_an_overlapping_bonus() {
    let (cfg, mut s) = playing();
    let mut bonus = create_bonus_target(&cfg, &mut StepRng::new(0, 0));
    bonus.rect = Rect::new(40.0, 55.0, 60.0, 30.0);
    s.bonus = Some(bonus);
    s.player_projectiles
        .push(create_projectile(&cfg, 68.0, 70.0, Owner::Player));

    collision::resolve_player_projectiles(&mut s, &cfg);

    assert!(!s.invaders[0].alive);
    assert_eq!(s.bonus.as_ref().map(|b| b.rect.x), Some(40.0));
    assert_eq!(s.score, 50);
    assert!(s.player_projectiles.is_empty());
    assert_eq!(s.drain_events(), vec![GameEvent::InvaderDestroyed { points: 50 }]);
}

#[test]
fn bonus_outranks_an_overlapping_shield() {
    let (cfg, mut s) = playing();
    let mut bonus = create_bonus_target(&cfg, &mut StepRng::new(0, 0));
    bonus.rect = Rect::new(130.0, 455.0, 60.0, 30.0);
    let points = bonus.points;
    s.bonus = Some(bonus);
    s.player_projectiles
        .push(create_projectile(&cfg, 158.0, 460.0, Owner::Player));

    collision::resolve_player_projectiles(&mut s, &cfg);

    assert!(s.bonus.is_none());
    assert_eq!(s.shields[0].health, 100);
    assert_eq!(s.score, points);
    assert!(s.player_projectiles.is_empty());
    assert_eq!(s.drain_events(), vec![GameEvent::BonusDestroyed { points }]);
}

#[test]
fn player_outranks_an_overlapping_shield() {
    let (cfg, mut s) = playing();
    let p = s.player.rect;
    s.shields[1].rect = Rect::new(p.x - 20.0, p.y - 10.0, 80.0, 40.0);
    s.enemy_projectiles
        .push(create_projectile(&cfg, p.center_x() - 2.0, p.y - 5.0, Owner::Enemy));

    collision::resolve_enemy_projectiles(&mut s, &cfg, 0);

    assert_eq!(s.lives, 2);
    assert_eq!(s.shields[1].health, 100);
    assert!(s.enemy_projectiles.is_empty());
    assert_eq!(s.drain_events(), vec![GameEvent::PlayerHit { lives_left: 2 }]);
}

#[test]
fn touching_invaders_resolve_by_storage_order() {
    let cfg = GameConfig {
        enemy_gap: 0.0,
        ..GameConfig::default()
    };
    let mut s = GameState::new(&cfg);
    init_session(&mut s, &cfg);
    s.drain_events();
    // Invader 0 spans x 50..90 and invader 1 spans 90..130; the shot sits
    // mostly over invader 1.
    assert_eq!(s.invaders[1].rect.x, 90.0);
    s.player_projectiles
        .push(create_projectile(&cfg, 89.0, 60.0, Owner::Player));

    collision::resolve_player_projectiles(&mut s, &cfg);

    assert!(!s.invaders[0].alive);
    assert!(s.invaders[1].alive);
    assert_eq!(s.alive_invaders(), 49);
    assert_eq!(s.score, 50);
}

// ── Level progression ─────────────────────────────────────────────────────────

#[test]
fn last_kill_starts_exactly_one_transition() {
    let (cfg, mut s) = playing();
    hold_timers(&mut s, 0);
    for inv in s.invaders.iter_mut().skip(1) {
        inv.alive = false;
    }
    s.player_projectiles
        .push(create_projectile(&cfg, 68.0, 70.0, Owner::Player));

    tick(&mut s, &cfg, 0, &mut seeded_rng());

    assert!(s.in_transition);
    assert_eq!(s.level, 2);
    let cleared = s
        .drain_events()
        .into_iter()
        .filter(|e| matches!(e, GameEvent::LevelCleared { .. }))
        .count();
    assert_eq!(cleared, 1);

    begin_level_transition(&mut s);
    assert_eq!(s.level, 2);
    assert!(s.drain_events().is_empty());

    // The world is frozen until the next wave starts.
    let frozen = s.clone();
    tick(&mut s, &cfg, 100, &mut seeded_rng());
    assert_eq!(s, frozen);
}

#[test]
fn next_wave_restores_the_field() {
    let (cfg, mut s) = playing();
    for inv in &mut s.invaders {
        inv.alive = false;
    }
    s.shields[2].health = 25;
    s.enemy_projectiles
        .push(create_projectile(&cfg, 10.0, 10.0, Owner::Enemy));
    begin_level_transition(&mut s);

    start_next_wave(&mut s, &cfg);

    assert!(!s.in_transition);
    assert_eq!(s.alive_invaders(), 50);
    assert!(s.shields.iter().all(|sh| sh.health == 100));
    assert!(s.enemy_projectiles.is_empty() && s.player_projectiles.is_empty());
    assert!(approx(s.enemy_speed, 1.6));
    assert!(s.drain_events().contains(&GameEvent::LevelStarted { level: 2 }));
}

#[test]
fn end_session_is_idempotent() {
    let (_, mut s) = playing();
    end_session(&mut s, GameOverReason::LivesExhausted);
    end_session(&mut s, GameOverReason::Encroachment);
    assert_eq!(s.status, GameStatus::GameOver);
    assert_eq!(s.drain_events().len(), 1);
}

// ── Long-run properties ───────────────────────────────────────────────────────

#[test]
fn score_never_drops_and_lives_never_rise() {
    let (cfg, mut s) = playing();
    let mut rng = seeded_rng();
    let mut driver = StdRng::seed_from_u64(7);
    let (mut score, mut lives) = (s.score, s.lives);

    for frame in 0..3_000u64 {
        let now = frame * 16;
        match driver.gen_range(0..3) {
            0 => move_player_left(&mut s, &cfg),
            1 => move_player_right(&mut s, &cfg),
            _ => {
                player_shoot(&mut s, &cfg);
            }
        }
        tick(&mut s, &cfg, now, &mut rng);

        assert!(s.score >= score);
        assert!(s.lives <= lives);
        assert!(s.player_projectiles.len() <= cfg.max_player_projectiles);
        assert!(s.player.rect.x >= 0.0 && s.player.rect.right() <= cfg.canvas_width);
        assert!(s.shields.iter().all(|sh| (0..=100).contains(&sh.health)));
        score = s.score;
        lives = s.lives;
    }
}
