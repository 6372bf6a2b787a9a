use maze_nav_core::{CellCoord, OccupancyGrid};
use maze_nav_system_visibility::PruneTuning;
use maze_nav_world::{query, Level, LevelConfig};
use proptest::prelude::*;

fn config(columns: u32, rows: u32, seed: u64) -> LevelConfig {
    LevelConfig {
        columns,
        rows,
        seed,
        ..LevelConfig::default()
    }
}

fn unpruned(columns: u32, rows: u32, seed: u64) -> LevelConfig {
    LevelConfig {
        prune: PruneTuning {
            enabled: false,
            ..PruneTuning::default()
        },
        ..config(columns, rows, seed)
    }
}

#[test]
fn seeded_runs_replay_identically() {
    let settings = config(9, 7, 0xdec0_de);
    let first = Level::generate(&settings).expect("valid config");
    let second = Level::generate(&settings).expect("valid config");

    assert_eq!(query::maze(&first), query::maze(&second));
    assert_eq!(query::grid(&first), query::grid(&second));
    assert_eq!(query::wall_blocks(&first), query::wall_blocks(&second));
    assert_eq!(query::waypoints(&first), query::waypoints(&second));
    assert_eq!(query::graph(&first), query::graph(&second));

    let last = query::waypoints(&first).len() - 1;
    assert_eq!(
        query::find_path(&first, 0, last).expect("valid nodes"),
        query::find_path(&second, 0, last).expect("valid nodes")
    );
}

#[test]
fn different_seeds_produce_different_mazes() {
    let first = Level::generate(&config(8, 8, 1)).expect("valid config");
    let second = Level::generate(&config(8, 8, 2)).expect("valid config");
    assert_ne!(query::maze(&first), query::maze(&second));
}

#[test]
fn five_by_five_level_is_one_walkable_region() {
    let level = Level::generate(&config(5, 5, 7)).expect("valid config");
    let grid = query::grid(&level);

    assert_eq!((grid.width(), grid.depth()), (11, 11));
    assert_eq!(grid.walkable_region_count(), 1);
    assert_eq!(grid.open_cell_count(), 25 + 24);
}

#[test]
fn partial_json_config_falls_back_to_defaults() {
    let parsed: LevelConfig =
        serde_json::from_str(r#"{ "columns": 6, "prune": { "angle_degrees": 30.0 } }"#)
            .expect("valid json");

    assert_eq!(parsed.columns, 6);
    assert_eq!(parsed.rows, LevelConfig::default().rows);
    assert_eq!(parsed.prune.angle_degrees, 30.0);
    assert!(parsed.prune.enabled);
}

#[test]
fn path_between_waypoints_is_never_shorter_than_a_straight_line() {
    let level = Level::generate(&config(12, 12, 99)).expect("valid config");
    let waypoints = query::waypoints(&level);

    for goal in 1..waypoints.len() {
        if let Some(path) = query::find_path(&level, 0, goal).expect("valid nodes") {
            let straight = waypoints[0].distance(waypoints[goal]);
            assert!(path.length() + 1e-9 >= straight);
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn every_cell_centre_reaches_every_other(
        columns in 2u32..7,
        rows in 1u32..7,
        seed in any::<u64>(),
    ) {
        let level = Level::generate(&unpruned(columns, rows, seed)).expect("valid config");
        let origin = OccupancyGrid::cell_center(CellCoord::new(1, 1));
        let far = OccupancyGrid::cell_center(CellCoord::new(columns * 2 - 1, rows * 2 - 1));

        let route = query::find_path_between(&level, origin, far)
            .expect("valid nodes")
            .expect("unpruned maze graph is connected");

        prop_assert_eq!(route.points().first().copied(), Some(origin));
        prop_assert_eq!(route.points().last().copied(), Some(far));
        prop_assert!(route.length() + 1e-9 >= origin.distance(far));
    }

    #[test]
    fn waypoints_sit_on_walkable_cells(seed in any::<u64>()) {
        let level = Level::generate(&config(6, 4, seed)).expect("valid config");
        let grid = query::grid(&level);
        for &point in query::waypoints(&level) {
            let cell = grid.cell_containing(point).expect("waypoint inside grid");
            prop_assert!(grid.is_open(cell.column(), cell.row()));
        }
        prop_assert_eq!(query::world_boxes(&level).len(), query::wall_blocks(&level).len());
    }
}
