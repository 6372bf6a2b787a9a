#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative level state for the maze navigation pipeline.
//!
//! A [`Level`] is built once, from a configuration or an imported maze, by
//! running every pipeline stage in order. Afterwards it is immutable and
//! consumers read it exclusively through the [`query`] functions.

use log::info;
use maze_nav_core::{CellCoord, DVec2, Maze, NavError, OccupancyGrid, Scale, WallBlock};
use maze_nav_system_generation::generate_seeded;
use maze_nav_system_rasterizer::{corner_points, extract_corners, mesh_walls, rasterize};
use maze_nav_system_search::Path;
use maze_nav_system_visibility::{PruneTuning, VisibilityGraph};
use serde::{Deserialize, Serialize};

const DEFAULT_COLUMNS: u32 = 10;
const DEFAULT_ROWS: u32 = 10;
const DEFAULT_SEED: u64 = 0x6d61_7a65_5f6e_6176;

/// Parameters controlling how a level is generated and post-processed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Number of maze cell columns.
    pub columns: u32,
    /// Number of maze cell rows.
    pub rows: u32,
    /// Seed for the deterministic maze generator.
    pub seed: u64,
    /// World-space scaling applied to wall blocks.
    pub scale: Scale,
    /// Redundant-edge pruning settings.
    pub prune: PruneTuning,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            columns: DEFAULT_COLUMNS,
            rows: DEFAULT_ROWS,
            seed: DEFAULT_SEED,
            scale: Scale::default(),
            prune: PruneTuning::default(),
        }
    }
}

/// Fully processed maze ready for navigation queries.
#[derive(Clone, Debug)]
pub struct Level {
    config: LevelConfig,
    maze: Maze,
    grid: OccupancyGrid,
    wall_blocks: Vec<WallBlock>,
    corners: Vec<CellCoord>,
    graph: VisibilityGraph,
}

impl Level {
    /// Generates a fresh maze from `config` and runs the full pipeline on it.
    pub fn generate(config: &LevelConfig) -> Result<Self, NavError> {
        let maze = generate_seeded(config.columns, config.rows, config.seed)?;
        Self::from_maze(maze, config)
    }

    /// Runs the pipeline on an existing maze.
    ///
    /// The dimensions recorded in the stored configuration are taken from
    /// `maze`; the seed is kept as supplied even though it did not produce
    /// the maze.
    pub fn from_maze(maze: Maze, config: &LevelConfig) -> Result<Self, NavError> {
        let grid = rasterize(&maze)?;
        let wall_blocks = mesh_walls(&grid);
        let corners = extract_corners(&grid);
        let graph = VisibilityGraph::build(
            corner_points(&corners),
            wall_blocks.as_slice(),
            &config.prune,
        );

        let config = LevelConfig {
            columns: maze.columns(),
            rows: maze.rows(),
            ..config.clone()
        };

        info!(
            "level {}x{} ready: {} wall blocks, {} waypoints, {} edges",
            config.columns,
            config.rows,
            wall_blocks.len(),
            graph.nodes().len(),
            graph.edge_count()
        );

        Ok(Self {
            config,
            maze,
            grid,
            wall_blocks,
            corners,
            graph,
        })
    }
}

/// Waypoint path extended with the free endpoints it was requested for.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Route {
    from: DVec2,
    to: DVec2,
    path: Path,
}

impl Route {
    /// Requested start position.
    #[must_use]
    pub fn origin(&self) -> DVec2 {
        self.from
    }

    /// Requested goal position.
    #[must_use]
    pub fn destination(&self) -> DVec2 {
        self.to
    }

    /// Path through the snapped waypoints.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Full polyline: start, every waypoint, goal.
    #[must_use]
    pub fn points(&self) -> Vec<DVec2> {
        let mut points = Vec::with_capacity(self.path.len() + 2);
        points.push(self.from);
        points.extend_from_slice(self.path.points());
        points.push(self.to);
        points
    }

    /// Length of the full polyline.
    #[must_use]
    pub fn length(&self) -> f64 {
        let (Some(&first), Some(&last)) = (self.path.points().first(), self.path.points().last())
        else {
            return self.from.distance(self.to);
        };
        self.from.distance(first) + self.path.length() + last.distance(self.to)
    }
}

/// Query functions that expose read-only views of the level state.
pub mod query {
    use log::debug;
    use maze_nav_core::{CellCoord, DVec2, Maze, NavError, OccupancyGrid, WallBlock, WorldBox};
    use maze_nav_system_search::Path;
    use maze_nav_system_visibility::VisibilityGraph;

    use super::{Level, LevelConfig, Route};

    /// Configuration the level was built with.
    #[must_use]
    pub fn config(level: &Level) -> &LevelConfig {
        &level.config
    }

    /// Cell masks of the underlying maze.
    #[must_use]
    pub fn maze(level: &Level) -> &Maze {
        &level.maze
    }

    /// Rasterized walkable/solid field.
    #[must_use]
    pub fn grid(level: &Level) -> &OccupancyGrid {
        &level.grid
    }

    /// Meshed wall rectangles in grid units.
    #[must_use]
    pub fn wall_blocks(level: &Level) -> &[WallBlock] {
        &level.wall_blocks
    }

    /// Wall rectangles scaled by the configured [`maze_nav_core::Scale`].
    #[must_use]
    pub fn world_boxes(level: &Level) -> Vec<WorldBox> {
        level
            .wall_blocks
            .iter()
            .map(|block| block.to_world(level.config.scale))
            .collect()
    }

    /// Grid cells chosen as waypoints, in node order.
    #[must_use]
    pub fn corners(level: &Level) -> &[CellCoord] {
        &level.corners
    }

    /// Waypoint positions, indexed by node id.
    #[must_use]
    pub fn waypoints(level: &Level) -> &[DVec2] {
        level.graph.nodes()
    }

    /// Pruned visibility graph over the waypoints.
    #[must_use]
    pub fn graph(level: &Level) -> &VisibilityGraph {
        &level.graph
    }

    /// Shortest waypoint path between two node ids.
    pub fn find_path(level: &Level, start: usize, goal: usize) -> Result<Option<Path>, NavError> {
        maze_nav_system_search::find_path(
            start,
            goal,
            level.graph.nodes(),
            level.graph.adjacency(),
        )
    }

    /// Shortest route between two free positions.
    ///
    /// Each endpoint snaps to the nearest waypoint it can see. `Ok(None)` is
    /// returned when either endpoint sees no waypoint or the snapped
    /// waypoints are not connected.
    pub fn find_path_between(
        level: &Level,
        from: DVec2,
        to: DVec2,
    ) -> Result<Option<Route>, NavError> {
        let walls = level.wall_blocks.as_slice();
        let Some(start) = level.graph.nearest_visible_node(from, walls) else {
            debug!("no waypoint visible from {from}");
            return Ok(None);
        };
        let Some(goal) = level.graph.nearest_visible_node(to, walls) else {
            debug!("no waypoint visible from {to}");
            return Ok(None);
        };

        let route = find_path(level, start, goal)?.map(|path| Route { from, to, path });
        Ok(route)
    }
}
