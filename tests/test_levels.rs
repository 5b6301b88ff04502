use std::io::Write;

use sky_flyer::entities::*;
use sky_flyer::error::GameError;
use sky_flyer::levels::*;

const TWO_LEVELS: &str = r#"
[[level]]
name = "Meadow"
scroll_speed_multiplier = 0.8
obstacle_kinds = ["cloud_monster"]
obstacle_spawn_interval_ms = 2500
collectible_kinds = ["star"]
collectible_spawn_interval_ms = 3000
power_up_spawn_interval_ms = 9000
target_score = 50

[[level]]
name = "Storm"
scroll_speed_multiplier = 1.6
obstacle_kinds = ["boulder", "flying_kitten"]
obstacle_spawn_interval_ms = 1200
collectible_kinds = ["coffee_cup", "cinnamon_roll"]
collectible_spawn_interval_ms = 2000
power_up_kinds = ["magnet"]
power_up_spawn_interval_ms = 5000
"#;

// ── Built-in catalog ──────────────────────────────────────────────────────────

#[test]
fn builtin_has_three_levels_in_order() {
    let catalog = LevelCatalog::builtin();
    let names: Vec<&str> = catalog.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, vec!["Sky Village", "Cinnamon Forest", "Sugar Mountains"]);
    assert_eq!(catalog.last_index(), 2);
}

#[test]
fn builtin_level_content() {
    let catalog = LevelCatalog::builtin();
    let first = catalog.get_level_config(0).unwrap();
    assert_eq!(first.scroll_speed_multiplier, 1.0);
    assert_eq!(first.obstacle_kinds, vec![ObstacleKind::CloudMonster]);
    assert_eq!(first.power_up_kinds, vec![PowerUpKind::Shield, PowerUpKind::Speed]);
    assert_eq!(first.target_score_to_advance(), Some(100));

    let last = catalog.get_level_config(2).unwrap();
    assert_eq!(last.obstacle_kinds.len(), 3);
    assert_eq!(last.obstacle_spawn_interval_ms, 1500);
    assert_eq!(last.target_score_to_advance(), Some(500));
}

#[test]
fn builtin_catalog_passes_validation() {
    let levels: Vec<LevelConfig> = LevelCatalog::builtin().iter().cloned().collect();
    assert!(LevelCatalog::new(levels).is_ok());
}

#[test]
fn out_of_range_index_is_none() {
    let catalog = LevelCatalog::builtin();
    assert!(catalog.get_level_config(3).is_none());
    assert!(catalog.get_level_config(usize::MAX).is_none());
}

// ── TOML ──────────────────────────────────────────────────────────────────────

#[test]
fn parses_catalog_from_toml() {
    let catalog = LevelCatalog::from_toml_str(TWO_LEVELS).unwrap();
    assert_eq!(catalog.len(), 2);

    let meadow = catalog.get_level_config(0).unwrap();
    assert_eq!(meadow.collectible_kinds, vec![CollectibleKind::Star]);
    assert!(meadow.power_up_kinds.is_empty());
    assert_eq!(meadow.target_score, Some(50));

    let storm = catalog.get_level_config(1).unwrap();
    assert_eq!(
        storm.obstacle_kinds,
        vec![ObstacleKind::Boulder, ObstacleKind::FlyingKitten]
    );
    assert_eq!(storm.target_score_to_advance(), None);
    assert_eq!(storm.sky_color, "");
}

#[test]
fn zero_target_means_no_target() {
    let mut level = LevelCatalog::builtin().get_level_config(0).cloned().unwrap();
    level.target_score = Some(0);
    assert_eq!(level.target_score_to_advance(), None);
}

#[test]
fn loads_catalog_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(TWO_LEVELS.as_bytes()).unwrap();
    let catalog = LevelCatalog::load(file.path()).unwrap();
    assert_eq!(catalog.get_level_config(1).map(|l| l.name.as_str()), Some("Storm"));
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = LevelCatalog::load(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, GameError::Io(_)));
}

#[test]
fn malformed_toml_is_parse_error() {
    let err = LevelCatalog::from_toml_str("[[level]\nname = ").unwrap_err();
    assert!(matches!(err, GameError::TomlParse(_)));
}

#[test]
fn unknown_kind_is_parse_error() {
    let toml = TWO_LEVELS.replace("\"boulder\"", "\"dragon\"");
    let err = LevelCatalog::from_toml_str(&toml).unwrap_err();
    assert!(matches!(err, GameError::TomlParse(_)));
}

// ── Validation ────────────────────────────────────────────────────────────────

#[test]
fn empty_catalog_is_rejected() {
    assert!(matches!(LevelCatalog::new(Vec::new()), Err(GameError::EmptyCatalog)));
    assert!(matches!(LevelCatalog::from_toml_str(""), Err(GameError::EmptyCatalog)));
}

#[test]
fn invalid_levels_report_their_index() {
    let base = LevelCatalog::builtin().get_level_config(0).cloned().unwrap();

    let mut no_obstacles = base.clone();
    no_obstacles.obstacle_kinds.clear();
    let err = LevelCatalog::new(vec![base.clone(), no_obstacles]).unwrap_err();
    assert!(matches!(err, GameError::InvalidLevel { index: 1, .. }));

    let mut stopped = base.clone();
    stopped.scroll_speed_multiplier = 0.0;
    assert!(LevelCatalog::new(vec![stopped]).is_err());

    let mut zero_interval = base.clone();
    zero_interval.collectible_spawn_interval_ms = 0;
    assert!(LevelCatalog::new(vec![zero_interval]).is_err());

    let mut repeated = base;
    repeated.power_up_kinds = vec![PowerUpKind::Shield, PowerUpKind::Shield];
    assert!(LevelCatalog::new(vec![repeated]).is_err());
}

#[test]
fn error_messages_are_readable() {
    let err = GameError::InvalidLevel { index: 2, reason: "bad".to_string() };
    assert_eq!(err.to_string(), "Invalid level 2: bad");
    assert_eq!(GameError::EmptyCatalog.to_string(), "Level catalog is empty");
}
