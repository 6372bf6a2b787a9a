use maze_nav_core::{Adjacency, DVec2, OccupancyGrid, WallBlock};
use maze_nav_system_search::Path;
use maze_nav_world::{query, Level, LevelConfig};
use serde::Serialize;

const WALL: char = '#';
const FLOOR: char = ' ';
const TRAIL: char = '.';
const WAYPOINT: char = 'o';
const PATH_WAYPOINT: char = '*';
const START: char = 'S';
const GOAL: char = 'G';

/// Sampling distance used when tracing path segments across grid cells.
const TRAIL_STEP: f64 = 0.25;

/// Draws the occupancy grid with waypoints and, when present, the path.
pub(crate) fn render_text(level: &Level, path: Option<&Path>) -> String {
    let grid = query::grid(level);
    let mut canvas: Vec<Vec<char>> = (0..grid.depth())
        .map(|row| {
            (0..grid.width())
                .map(|column| if grid.is_open(column, row) { FLOOR } else { WALL })
                .collect()
        })
        .collect();

    if let Some(path) = path {
        for segment in path.points().windows(2) {
            trace_segment(&mut canvas, grid, segment[0], segment[1]);
        }
    }

    for &point in query::waypoints(level) {
        plot(&mut canvas, grid, point, WAYPOINT);
    }

    if let Some(path) = path {
        for &point in path.points() {
            plot(&mut canvas, grid, point, PATH_WAYPOINT);
        }
        if let (Some(&start), Some(&goal)) = (path.points().first(), path.points().last()) {
            plot(&mut canvas, grid, start, START);
            plot(&mut canvas, grid, goal, GOAL);
        }
    }

    canvas
        .iter()
        .map(|row| row.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}

fn trace_segment(canvas: &mut [Vec<char>], grid: &OccupancyGrid, from: DVec2, to: DVec2) {
    let steps = (from.distance(to) / TRAIL_STEP).ceil().max(1.0) as u32;
    for step in 0..=steps {
        let point = from.lerp(to, f64::from(step) / f64::from(steps));
        plot(canvas, grid, point, TRAIL);
    }
}

fn plot(canvas: &mut [Vec<char>], grid: &OccupancyGrid, point: DVec2, glyph: char) {
    let Some(cell) = grid.cell_containing(point) else {
        return;
    };
    if !grid.is_open(cell.column(), cell.row()) {
        return;
    }
    if let Some(slot) = canvas
        .get_mut(cell.row() as usize)
        .and_then(|row| row.get_mut(cell.column() as usize))
    {
        *slot = glyph;
    }
}

/// Machine-readable snapshot of a level and the requested path.
#[derive(Debug, Serialize)]
pub(crate) struct Report<'a> {
    config: &'a LevelConfig,
    transfer: String,
    grid: GridSummary,
    wall_blocks: &'a [WallBlock],
    waypoints: &'a [DVec2],
    adjacency: &'a Adjacency,
    path: Option<&'a Path>,
}

#[derive(Debug, Serialize)]
struct GridSummary {
    width: u32,
    depth: u32,
    open_cells: usize,
    regions: usize,
}

impl<'a> Report<'a> {
    pub(crate) fn new(level: &'a Level, transfer: String, path: Option<&'a Path>) -> Self {
        let grid = query::grid(level);
        Self {
            config: query::config(level),
            transfer,
            grid: GridSummary {
                width: grid.width(),
                depth: grid.depth(),
                open_cells: grid.open_cell_count(),
                regions: grid.walkable_region_count(),
            },
            wall_blocks: query::wall_blocks(level),
            waypoints: query::waypoints(level),
            adjacency: query::graph(level).adjacency(),
            path,
        }
    }
}
