use sky_flyer::audio::Cue;
use sky_flyer::collision::INVINCIBILITY_MS;
use sky_flyer::compute::*;
use sky_flyer::entities::*;
use sky_flyer::levels::{LevelCatalog, LevelConfig};
use sky_flyer::session::GameSession;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

/// A level bound at `index` with a fresh play state.
fn make_state(index: usize) -> (PlayState, GameSession) {
    let catalog = LevelCatalog::builtin();
    let config = catalog.get_level_config(index).cloned().unwrap();
    let mut session = GameSession::new(catalog.len());
    let state = init_play_state(&config, Viewport::default());
    session.set_current_level_config(index, config);
    (state, session)
}

/// Same, with spawning pushed far into the future so tests control the pools.
fn quiet_state(index: usize) -> (PlayState, GameSession) {
    let (mut state, session) = make_state(index);
    let config = LevelConfig {
        obstacle_spawn_interval_ms: u32::MAX,
        collectible_spawn_interval_ms: u32::MAX,
        power_up_spawn_interval_ms: u32::MAX,
        ..session.current_level_config().cloned().unwrap()
    };
    state.spawner = sky_flyer::spawner::Spawner::for_level(&config);
    (state, session)
}

// ── init_play_state ───────────────────────────────────────────────────────────

#[test]
fn init_play_state_places_player_at_home() {
    let (state, _) = make_state(0);
    assert_eq!(state.player.x, 200.0);
    assert_eq!(state.player.y, 300.0);
    assert_eq!(state.player.vy, 0.0);
    assert_eq!(state.frame, 0);
    assert_eq!(state.pools.obstacles().count(), 0);
}

// ── Player physics ────────────────────────────────────────────────────────────

#[test]
fn gravity_pulls_player_down() {
    let mut player = Player::new(Viewport::default());
    update_player(&mut player, 100);
    assert!((player.vy - 80.0).abs() < 1e-3);
    assert!(player.y > 300.0);
}

#[test]
fn flap_sets_normal_velocity() {
    let (mut state, session) = make_state(0);
    flap(&mut state.player, &session);
    assert_eq!(state.player.vy, FLAP_VELOCITY_NORMAL);
    assert_eq!(state.player.flap_pose_ms, FLAP_POSE_MS);
}

#[test]
fn speed_boost_strengthens_flap() {
    let (mut state, mut session) = make_state(0);
    session.activate_power_up(PowerUpKind::Speed, 7_000);
    flap(&mut state.player, &session);
    assert_eq!(state.player.vy, FLAP_VELOCITY_BOOSTED);
}

#[test]
fn flap_pose_clears_after_timeout() {
    let mut player = Player::new(Viewport::default());
    player.flap_pose_ms = FLAP_POSE_MS;
    update_player(&mut player, 60);
    assert_eq!(player.flap_pose_ms, 40);
    update_player(&mut player, 60);
    assert_eq!(player.flap_pose_ms, 0);
}

#[test]
fn invincibility_window_expires() {
    let mut player = Player::new(Viewport::default());
    player.invincible_ms = Some(INVINCIBILITY_MS);
    update_player(&mut player, 1000);
    assert_eq!(player.invincible_ms, Some(500));
    update_player(&mut player, 500);
    assert!(!player.is_invincible());
}

#[test]
fn return_home_eases_back_to_home_column() {
    let mut player = Player::new(Viewport::default());
    player.x -= 40.0;
    player.start_return_home();

    update_player(&mut player, 150);
    // Ease-out: more than half the distance covered at half time.
    assert!(player.x > 180.0 && player.x < 200.0);

    update_player(&mut player, 150);
    assert_eq!(player.x, 200.0);
    assert!(player.return_home.is_none());
}

#[test]
fn out_of_bounds_checks_both_edges() {
    let viewport = Viewport::default();
    let mut player = Player::new(viewport);
    assert!(!is_out_of_bounds(&player, viewport));
    player.y = -25.0;
    assert!(is_out_of_bounds(&player, viewport));
    player.y = 625.0;
    assert!(is_out_of_bounds(&player, viewport));
    player.y = 620.0;
    assert!(!is_out_of_bounds(&player, viewport));
}

// ── tick ──────────────────────────────────────────────────────────────────────

#[test]
fn tick_flap_emits_cue() {
    let (mut state, mut session) = quiet_state(0);
    let mut rng = seeded_rng();
    let out = tick(&mut state, &mut session, FrameInput { flap: true }, 16, &mut rng);
    assert!(out.cues.contains(&Cue::Flap));
    assert!(state.player.vy < 0.0);
    assert_eq!(state.frame, 1);
    assert_eq!(state.elapsed_ms, 16);
}

#[test]
fn tick_counts_down_power_ups() {
    let (mut state, mut session) = quiet_state(0);
    let mut rng = seeded_rng();
    session.activate_power_up(PowerUpKind::Shield, 100);
    tick(&mut state, &mut session, FrameInput::default(), 60, &mut rng);
    assert_eq!(session.power_up_remaining_ms(PowerUpKind::Shield), 40);
    tick(&mut state, &mut session, FrameInput::default(), 60, &mut rng);
    assert!(!session.is_power_up_active(PowerUpKind::Shield));
}

#[test]
fn tick_spawns_on_level_timers() {
    let (mut state, mut session) = make_state(0);
    let mut rng = seeded_rng();
    for _ in 0..125 {
        let flap = state.player.vy > 100.0;
        tick(&mut state, &mut session, FrameInput { flap }, 16, &mut rng);
    }
    // 2000 ms elapsed: the first cloud monster is on screen.
    assert_eq!(state.pools.cloud_monsters.allocated(), 1);
}

#[test]
fn falling_out_costs_a_life() {
    let (mut state, mut session) = quiet_state(0);
    let mut rng = seeded_rng();
    state.player.y = 640.0;
    let out = tick(&mut state, &mut session, FrameInput::default(), 16, &mut rng);
    assert_eq!(session.lives(), 2);
    assert!(out.transition.is_none());
    assert!(out.cues.contains(&Cue::ObstacleHit));
    assert_eq!(state.player.y, 300.0);
    assert!(state.player.is_invincible());
}

#[test]
fn fatal_collision_produces_game_over_with_score() {
    let (mut state, mut session) = quiet_state(1);
    let mut rng = seeded_rng();
    session.increment_score(77);
    session.decrement_lives();
    session.decrement_lives();
    let (x, y) = (state.player.x, state.player.y);
    state.pools.spawn_obstacle(ObstacleKind::FlyingKitten, x, y, 0.0);

    let out = tick(&mut state, &mut session, FrameInput::default(), 16, &mut rng);
    assert_eq!(session.lives(), 0);
    assert_eq!(out.transition, Some(Transition::GameOver { score: 77, level: 2 }));
    assert!(out.cues.contains(&Cue::GameOver));
}

#[test]
fn reaching_target_completes_level_exactly_once() {
    let (mut state, mut session) = quiet_state(0);
    let mut rng = seeded_rng();
    session.increment_score(99);
    let (x, y) = (state.player.x, state.player.y);
    state.pools.collectibles.try_spawn(CollectibleKind::CinnamonRoll, x, y, 0.0);

    let out = tick(&mut state, &mut session, FrameInput::default(), 16, &mut rng);
    assert_eq!(session.score(), 109);
    assert_eq!(out.transition, Some(Transition::LevelComplete { next_level_index: 1 }));
    assert!(out.cues.contains(&Cue::LevelComplete));
    assert_eq!(session.current_level_index(), 1);

    for _ in 0..5 {
        let out = tick(&mut state, &mut session, FrameInput { flap: true }, 16, &mut rng);
        assert!(out.transition.is_none());
    }
    assert_eq!(session.current_level_index(), 1);
}

#[test]
fn reaching_final_target_wins_exactly_once() {
    let (mut state, mut session) = quiet_state(2);
    let mut rng = seeded_rng();
    session.increment_score(495);
    let (x, y) = (state.player.x, state.player.y);
    state.pools.collectibles.try_spawn(CollectibleKind::CinnamonRoll, x, y, 0.0);

    let out = tick(&mut state, &mut session, FrameInput::default(), 16, &mut rng);
    assert_eq!(out.transition, Some(Transition::Won { score: 505 }));
    assert!(out.cues.contains(&Cue::GameWon));
    assert!(session.game_won());

    let out = tick(&mut state, &mut session, FrameInput { flap: true }, 16, &mut rng);
    assert!(out.transition.is_none());
}

#[test]
fn no_target_means_no_advance() {
    let (mut state, mut session) = quiet_state(0);
    let mut config = session.current_level_config().cloned().unwrap();
    config.target_score = Some(0);
    session.set_current_level_config(0, config);
    session.increment_score(10_000);

    let mut rng = seeded_rng();
    let out = tick(&mut state, &mut session, FrameInput { flap: true }, 16, &mut rng);
    assert!(out.transition.is_none());
    assert_eq!(session.current_level_index(), 0);
}

#[test]
fn game_over_beats_level_complete_in_same_frame() {
    let (mut state, mut session) = quiet_state(0);
    let mut rng = seeded_rng();
    session.increment_score(95);
    session.decrement_lives();
    session.decrement_lives();
    let (x, y) = (state.player.x, state.player.y);
    state.pools.spawn_obstacle(ObstacleKind::CloudMonster, x, y, 0.0);
    state.pools.collectibles.try_spawn(CollectibleKind::Star, x, y, 0.0);

    let out = tick(&mut state, &mut session, FrameInput::default(), 16, &mut rng);
    assert_eq!(out.transition, Some(Transition::GameOver { score: 95, level: 1 }));
    assert_eq!(session.score(), 120);
    assert_eq!(session.current_level_index(), 0);
}

#[test]
fn same_seed_same_run() {
    let run = || {
        let (mut state, mut session) = make_state(2);
        let mut rng = seeded_rng();
        let mut transitions = Vec::new();
        for i in 0..600 {
            let input = FrameInput { flap: i % 12 == 0 };
            let out = tick(&mut state, &mut session, input, 33, &mut rng);
            transitions.push(out.transition);
        }
        (session.score(), session.lives(), state.player.y, transitions)
    };
    assert_eq!(run(), run());
}
