use sky_flyer::entities::*;
use sky_flyer::levels::{LevelCatalog, LevelConfig};
use sky_flyer::pool::Pools;
use sky_flyer::spawner::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn level(index: usize) -> LevelConfig {
    LevelCatalog::builtin().get_level_config(index).cloned().unwrap()
}

// ── SpawnTimer ────────────────────────────────────────────────────────────────

#[test]
fn timer_fires_on_interval() {
    let mut t = SpawnTimer::new(2000);
    assert_eq!(t.advance(1999), 0);
    assert_eq!(t.advance(1), 1);
    assert_eq!(t.advance(1000), 0);
}

#[test]
fn timer_catches_up_on_large_delta() {
    let mut t = SpawnTimer::new(500);
    assert_eq!(t.advance(1600), 3);
    assert_eq!(t.advance(400), 1);
}

#[test]
fn timer_interval_is_at_least_one() {
    let mut t = SpawnTimer::new(0);
    assert_eq!(t.interval_ms(), 1);
    assert_eq!(t.advance(5), 5);
}

#[test]
fn spawner_intervals_come_from_level() {
    let config = level(1);
    let s = Spawner::for_level(&config);
    assert_eq!(s.obstacles.interval_ms(), 1800);
    assert_eq!(s.collectibles.interval_ms(), 2800);
    assert_eq!(s.power_ups.interval_ms(), 7000);
}

// ── Kind choice ───────────────────────────────────────────────────────────────

#[test]
fn pick_kind_from_empty_set_is_none() {
    let mut rng = seeded_rng();
    let empty: [PowerUpKind; 0] = [];
    assert_eq!(pick_kind(&empty, &mut rng), None);
}

#[test]
fn pick_kind_stays_in_enabled_set_and_covers_it() {
    let mut rng = seeded_rng();
    let kinds = [ObstacleKind::CloudMonster, ObstacleKind::Boulder];
    let mut seen = Vec::new();
    for _ in 0..200 {
        let k = pick_kind(&kinds, &mut rng).unwrap();
        assert!(kinds.contains(&k));
        if !seen.contains(&k) {
            seen.push(k);
        }
    }
    assert_eq!(seen.len(), 2);
}

// ── Placement ─────────────────────────────────────────────────────────────────

#[test]
fn obstacles_spawn_past_right_edge_in_band() {
    let config = level(2);
    let viewport = Viewport::default();
    let mut pools = Pools::new();
    let mut rng = seeded_rng();

    for _ in 0..30 {
        spawn_obstacle(&config, &mut pools, viewport, &mut rng);
    }
    for e in pools.obstacles().filter(|e| e.active) {
        assert_eq!(e.x, viewport.width + SPAWN_MARGIN_X);
        assert!(e.y >= 120.0 && e.y <= 480.0);
        assert!((e.vx - OBSTACLE_SCROLL_SPEED_BASE * 1.4).abs() < 1e-3);
    }
}

#[test]
fn power_ups_spawn_in_narrow_band() {
    let config = level(2);
    let viewport = Viewport::default();
    let mut pools = Pools::new();
    let mut rng = seeded_rng();

    for _ in 0..10 {
        spawn_power_up(&config, &mut pools, viewport, &mut rng);
    }
    assert_eq!(pools.power_ups.active_count(), 10);
    for e in pools.power_ups.iter_active() {
        assert!(e.y >= 180.0 && e.y <= 420.0);
        assert!(config.power_up_kinds.contains(&e.kind));
    }
}

#[test]
fn collectible_speed_scales_with_level() {
    let config = level(1);
    let mut pools = Pools::new();
    let mut rng = seeded_rng();
    spawn_collectible(&config, &mut pools, Viewport::default(), &mut rng).unwrap();
    let e = pools.collectibles.get(0).unwrap();
    assert!((e.vx - COLLECTIBLE_SCROLL_SPEED_BASE * 1.2).abs() < 1e-3);
}

#[test]
fn empty_power_up_set_spawns_nothing() {
    let mut config = level(0);
    config.power_up_kinds.clear();
    let mut pools = Pools::new();
    let mut rng = seeded_rng();
    assert_eq!(spawn_power_up(&config, &mut pools, Viewport::default(), &mut rng), None);
    assert_eq!(pools.power_ups.allocated(), 0);
}

#[test]
fn full_pool_drops_spawn() {
    let config = level(0);
    let mut pools = Pools::new();
    let mut rng = seeded_rng();
    for _ in 0..20 {
        assert!(spawn_obstacle(&config, &mut pools, Viewport::default(), &mut rng).is_some());
    }
    assert_eq!(spawn_obstacle(&config, &mut pools, Viewport::default(), &mut rng), None);
    assert_eq!(pools.cloud_monsters.active_count(), 20);
}

// ── Spawner::advance ──────────────────────────────────────────────────────────

#[test]
fn advance_spawns_each_category_on_its_timer() {
    let config = level(0);
    let mut spawner = Spawner::for_level(&config);
    let mut pools = Pools::new();
    let mut rng = seeded_rng();
    let viewport = Viewport::default();

    let report = spawner.advance(1999, &config, &mut pools, viewport, &mut rng);
    assert_eq!(report, SpawnReport::default());

    let report = spawner.advance(1, &config, &mut pools, viewport, &mut rng);
    assert_eq!(report.obstacles, vec![ObstacleKind::CloudMonster]);
    assert!(report.collectibles.is_empty());

    let report = spawner.advance(1000, &config, &mut pools, viewport, &mut rng);
    assert_eq!(report.collectibles.len(), 1);
    assert!(report.obstacles.is_empty());

    let report = spawner.advance(5000, &config, &mut pools, viewport, &mut rng);
    assert_eq!(report.power_ups.len(), 1);
    assert!(config.power_up_kinds.contains(&report.power_ups[0]));
}

#[test]
fn same_seed_same_spawns() {
    let config = level(2);
    let viewport = Viewport::default();
    let run = |seed: u64| {
        let mut spawner = Spawner::for_level(&config);
        let mut pools = Pools::new();
        let mut rng = StdRng::seed_from_u64(seed);
        let mut reports = Vec::new();
        for _ in 0..100 {
            reports.push(spawner.advance(100, &config, &mut pools, viewport, &mut rng));
        }
        reports
    };
    assert_eq!(run(7), run(7));
}
