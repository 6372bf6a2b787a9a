#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Expands cell masks into an occupancy grid and derives its geometry.
//!
//! A maze of `columns x rows` cells rasterizes to a `(2 * columns + 1) x
//! (2 * rows + 1)` grid. Cell `(c, r)` lands on the odd grid cell
//! `(2c + 1, 2r + 1)`, each opening clears the even link cell between two
//! neighbours, and everything else, the outer border included, stays solid.

use log::debug;
use maze_nav_core::{CellCoord, DVec2, Direction, Maze, NavError, OccupancyGrid, WallBlock};

/// Rasterizes `maze` into a walkable/solid field with a solid border.
pub fn rasterize(maze: &Maze) -> Result<OccupancyGrid, NavError> {
    let width = maze.columns() * 2 + 1;
    let depth = maze.rows() * 2 + 1;
    let mut cells = vec![false; width as usize * depth as usize];
    let stride = width as usize;

    for cell in maze.coords() {
        let column = cell.column() * 2 + 1;
        let row = cell.row() * 2 + 1;
        cells[row as usize * stride + column as usize] = true;

        let openings = maze.openings(cell);
        for direction in Direction::ALL {
            if !openings.contains(direction) {
                continue;
            }
            let link = match direction {
                Direction::North => (column, row - 1),
                Direction::South => (column, row + 1),
                Direction::West => (column - 1, row),
                Direction::East => (column + 1, row),
            };
            cells[link.1 as usize * stride + link.0 as usize] = true;
        }
    }

    let grid = OccupancyGrid::from_cells(width, depth, cells)?;
    debug!(
        "rasterized {}x{} maze into {width}x{depth} grid with {} walkable cells",
        maze.columns(),
        maze.rows(),
        grid.open_cell_count()
    );
    Ok(grid)
}

/// Covers every solid cell with exactly one rectangle using greedy meshing.
///
/// Cells are visited row-major. Each unclaimed solid cell starts a block that
/// first widens along its row, then deepens while the whole run of the next
/// row is still solid and unclaimed.
#[must_use]
pub fn mesh_walls(grid: &OccupancyGrid) -> Vec<WallBlock> {
    let width = grid.width();
    let depth = grid.depth();
    let mut claimed = vec![false; grid.cells().len()];
    let mut blocks = Vec::new();

    let available = |claimed: &[bool], column: u32, row: u32| -> bool {
        grid.index(column, row)
            .is_some_and(|index| !grid.cells()[index] && !claimed[index])
    };

    for row in 0..depth {
        for column in 0..width {
            if !available(&claimed, column, row) {
                continue;
            }

            let mut run = 1;
            while column + run < width && available(&claimed, column + run, row) {
                run += 1;
            }

            let mut rows = 1;
            while row + rows < depth
                && (column..column + run).all(|x| available(&claimed, x, row + rows))
            {
                rows += 1;
            }

            for z in row..row + rows {
                for x in column..column + run {
                    if let Some(index) = grid.index(x, z) {
                        claimed[index] = true;
                    }
                }
            }

            blocks.push(WallBlock::new(column, row, run, rows));
        }
    }

    debug!(
        "meshed {} solid cells into {} wall blocks",
        grid.cells().len() - grid.open_cell_count(),
        blocks.len()
    );
    blocks
}

/// Finds the walkable cells worth routing through: convex turns and dead ends.
///
/// Only non-border cells are scanned. A cell is a convex turn when a diagonal
/// neighbour is solid while both orthogonal neighbours flanking it are open,
/// and a dead end when exactly one orthogonal neighbour is open and every
/// other neighbour is solid. Results are returned in row-major order.
#[must_use]
pub fn extract_corners(grid: &OccupancyGrid) -> Vec<CellCoord> {
    let mut corners = Vec::new();
    let open = |column: u32, row: u32| grid.is_open(column, row);

    for row in 1..grid.depth().saturating_sub(1) {
        for column in 1..grid.width().saturating_sub(1) {
            if !open(column, row) {
                continue;
            }

            let north = open(column, row - 1);
            let south = open(column, row + 1);
            let west = open(column - 1, row);
            let east = open(column + 1, row);
            let north_west = open(column - 1, row - 1);
            let north_east = open(column + 1, row - 1);
            let south_west = open(column - 1, row + 1);
            let south_east = open(column + 1, row + 1);

            let convex_turn = (!north_east && north && east)
                || (!north_west && north && west)
                || (!south_east && south && east)
                || (!south_west && south && west);

            let orthogonal = [north, south, west, east]
                .into_iter()
                .filter(|flag| *flag)
                .count();
            let any_diagonal = north_west || north_east || south_west || south_east;
            let dead_end = orthogonal == 1 && !any_diagonal;

            if convex_turn || dead_end {
                corners.push(CellCoord::new(column, row));
            }
        }
    }

    debug!("extracted {} waypoint corners", corners.len());
    corners
}

/// Centres of the provided grid cells, in the same order.
#[must_use]
pub fn corner_points(corners: &[CellCoord]) -> Vec<DVec2> {
    corners
        .iter()
        .map(|&cell| OccupancyGrid::cell_center(cell))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use maze_nav_core::Openings;

    fn grid_from_rows(rows: &[&str]) -> OccupancyGrid {
        let width = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars().map(|c| c == '.'))
            .collect();
        OccupancyGrid::from_cells(width, rows.len() as u32, cells).expect("rectangular rows")
    }

    #[test]
    fn corridor_rasterizes_with_link_cells() {
        let cells = vec![
            Openings::CLOSED.with(Direction::East),
            Openings::CLOSED.with(Direction::West),
        ];
        let maze = Maze::new(2, 1, cells).expect("valid corridor");
        let grid = rasterize(&maze).expect("grid");

        assert_eq!((grid.width(), grid.depth()), (5, 3));
        let middle: Vec<bool> = (0..5).map(|column| grid.is_open(column, 1)).collect();
        assert_eq!(middle, vec![false, true, true, true, false]);
        assert_eq!(grid.open_cell_count(), 3);
    }

    #[test]
    fn solid_grid_meshes_into_one_block() {
        let grid = grid_from_rows(&["###", "###"]);
        assert_eq!(mesh_walls(&grid), vec![WallBlock::new(0, 0, 3, 2)]);
    }

    #[test]
    fn meshing_stops_deepening_at_open_cells() {
        let grid = grid_from_rows(&[
            "#####", //
            "#.#.#", //
            "#####",
        ]);
        assert_eq!(
            mesh_walls(&grid),
            vec![
                WallBlock::new(0, 0, 5, 1),
                WallBlock::new(0, 1, 1, 2),
                WallBlock::new(2, 1, 1, 2),
                WallBlock::new(4, 1, 1, 2),
                WallBlock::new(1, 2, 1, 1),
                WallBlock::new(3, 2, 1, 1),
            ]
        );
    }

    #[test]
    fn dead_ends_and_turns_become_corners() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "###.#", //
            "###.#", //
            "#####",
        ]);
        let corners = extract_corners(&grid);
        assert_eq!(
            corners,
            vec![CellCoord::new(1, 1), CellCoord::new(3, 1), CellCoord::new(3, 3)]
        );
        assert_eq!(
            corner_points(&corners)[0],
            DVec2::new(1.5, 1.5),
            "waypoints sit at cell centres"
        );
    }

    #[test]
    fn straight_corridor_interior_is_not_a_corner() {
        let grid = grid_from_rows(&[
            "#####", //
            "#...#", //
            "#####",
        ]);
        assert_eq!(
            extract_corners(&grid),
            vec![CellCoord::new(1, 1), CellCoord::new(3, 1)]
        );
    }

    #[test]
    fn tiny_grids_have_no_interior() {
        let grid = grid_from_rows(&["..", ".."]);
        assert!(extract_corners(&grid).is_empty());
    }
}
