#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the maze navigation pipeline.
//!
//! Every stage of the pipeline exchanges the plain data defined here: the
//! generator produces a [`Maze`], the rasterizer expands it into an
//! [`OccupancyGrid`] plus [`WallBlock`] values, the visibility builder emits an
//! [`Adjacency`] over waypoint positions, and the search walks that adjacency
//! with the [`MinHeap`]. Stages never share mutable state; each run owns its
//! values outright.

pub mod heap;

use std::collections::{BTreeSet, VecDeque};

pub use glam::DVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use heap::{Comparator, MinHeap};

/// Largest accepted maze edge, measured in cells.
pub const MAX_MAZE_EDGE: u32 = 4096;

/// Failures reported by the navigation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum NavError {
    /// Maze dimensions were zero or exceeded [`MAX_MAZE_EDGE`].
    #[error("maze dimensions {columns}x{rows} are outside 1..={max}", max = MAX_MAZE_EDGE)]
    InvalidDimension {
        /// Requested number of cell columns.
        columns: u32,
        /// Requested number of cell rows.
        rows: u32,
    },
    /// A node index did not address an entry of the node list.
    #[error("node {index} is outside the graph of {count} nodes")]
    UnknownNode {
        /// Offending node index.
        index: usize,
        /// Number of nodes in the graph.
        count: usize,
    },
    /// A flattened cell buffer did not match the declared dimensions.
    #[error("expected {expected} cells, got {actual}")]
    MaskCountMismatch {
        /// Cell count implied by the dimensions.
        expected: usize,
        /// Cell count that was supplied.
        actual: usize,
    },
    /// An opening leads outside the maze or is not mirrored by its neighbour.
    #[error("cell {cell:?} has an unmatched {direction:?} opening")]
    InconsistentOpening {
        /// Cell carrying the opening.
        cell: CellCoord,
        /// Direction of the opening.
        direction: Direction,
    },
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell. Row zero is the northern edge.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }
}

/// Cardinal directions between neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward decreasing row indices.
    North,
    /// Toward increasing row indices.
    South,
    /// Toward decreasing column indices.
    West,
    /// Toward increasing column indices.
    East,
}

impl Direction {
    /// Every direction in bit order.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::South,
        Direction::West,
        Direction::East,
    ];

    /// Bit used for this direction inside an [`Openings`] mask.
    #[must_use]
    pub const fn bit(self) -> u8 {
        match self {
            Self::North => 0b0001,
            Self::South => 0b0010,
            Self::West => 0b0100,
            Self::East => 0b1000,
        }
    }

    /// Direction pointing back toward the origin.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::East => Self::West,
        }
    }

    /// Neighbouring cell in this direction, if it lies inside `columns x rows`.
    #[must_use]
    pub fn step(self, cell: CellCoord, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match self {
            Self::North => (Some(cell.column()), cell.row().checked_sub(1)),
            Self::South => (Some(cell.column()), cell.row().checked_add(1)),
            Self::West => (cell.column().checked_sub(1), Some(cell.row())),
            Self::East => (cell.column().checked_add(1), Some(cell.row())),
        };
        let (column, row) = (column?, row?);
        (column < columns && row < rows).then(|| CellCoord::new(column, row))
    }
}

/// Four-bit mask of the passable walls of one maze cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Openings(u8);

impl Openings {
    /// Mask with every wall closed.
    pub const CLOSED: Self = Self(0);

    /// Builds a mask from raw bits, rejecting anything above the low nibble.
    #[must_use]
    pub const fn from_bits(bits: u8) -> Option<Self> {
        if bits & !0b1111 == 0 {
            Some(Self(bits))
        } else {
            None
        }
    }

    /// Raw mask bits.
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Reports whether the wall in `direction` is open.
    #[must_use]
    pub const fn contains(self, direction: Direction) -> bool {
        self.0 & direction.bit() != 0
    }

    /// Copy of the mask with `direction` opened.
    #[must_use]
    pub const fn with(self, direction: Direction) -> Self {
        Self(self.0 | direction.bit())
    }

    /// Number of open walls.
    #[must_use]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }
}

/// Cell grid with one [`Openings`] mask per cell, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Maze {
    columns: u32,
    rows: u32,
    cells: Vec<Openings>,
}

impl Maze {
    /// Validates and wraps a flattened mask buffer.
    ///
    /// Every opening must stay inside the grid and be mirrored by the
    /// neighbouring cell, so a maze built here is always a proper undirected
    /// passage graph.
    pub fn new(columns: u32, rows: u32, cells: Vec<Openings>) -> Result<Self, NavError> {
        let expected = validate_dimensions(columns, rows)?;
        if cells.len() != expected {
            return Err(NavError::MaskCountMismatch {
                expected,
                actual: cells.len(),
            });
        }

        let maze = Self {
            columns,
            rows,
            cells,
        };

        for cell in maze.coords() {
            let openings = maze.openings(cell);
            for direction in Direction::ALL {
                if !openings.contains(direction) {
                    continue;
                }
                let mirrored = direction
                    .step(cell, columns, rows)
                    .map(|neighbor| maze.openings(neighbor).contains(direction.opposite()));
                if mirrored != Some(true) {
                    return Err(NavError::InconsistentOpening { cell, direction });
                }
            }
        }

        Ok(maze)
    }

    /// Number of cell columns.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of cell rows.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Masks in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[Openings] {
        &self.cells
    }

    /// Mask stored for `cell`; cells outside the maze read as closed.
    #[must_use]
    pub fn openings(&self, cell: CellCoord) -> Openings {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Openings::CLOSED)
    }

    /// Flattened `row * columns + column` index of `cell`.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() >= self.columns || cell.row() >= self.rows {
            return None;
        }
        let row = usize::try_from(cell.row()).ok()?;
        let column = usize::try_from(cell.column()).ok()?;
        let width = usize::try_from(self.columns).ok()?;
        Some(row * width + column)
    }

    /// Number of passages, counting each two-sided opening once.
    #[must_use]
    pub fn passage_count(&self) -> usize {
        let sides: u32 = self.cells.iter().map(|openings| openings.count()).sum();
        (sides / 2) as usize
    }

    /// Every cell coordinate in row-major order.
    pub fn coords(&self) -> impl Iterator<Item = CellCoord> {
        let columns = self.columns;
        (0..self.rows).flat_map(move |row| (0..columns).map(move |column| CellCoord::new(column, row)))
    }
}

/// Checks maze dimensions and returns the implied cell count.
pub fn validate_dimensions(columns: u32, rows: u32) -> Result<usize, NavError> {
    let in_range = |edge: u32| (1..=MAX_MAZE_EDGE).contains(&edge);
    if !in_range(columns) || !in_range(rows) {
        return Err(NavError::InvalidDimension { columns, rows });
    }
    Ok(columns as usize * rows as usize)
}

/// Dense walkable/solid field at rasterized resolution, stored row-major.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OccupancyGrid {
    width: u32,
    depth: u32,
    cells: Vec<bool>,
}

impl OccupancyGrid {
    /// Wraps a flattened buffer where `true` marks a walkable cell.
    pub fn from_cells(width: u32, depth: u32, cells: Vec<bool>) -> Result<Self, NavError> {
        let expected = width as usize * depth as usize;
        if cells.len() != expected {
            return Err(NavError::MaskCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            depth,
            cells,
        })
    }

    /// Number of grid columns.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of grid rows.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Walkable flags in row-major order.
    #[must_use]
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Reports whether the cell is walkable. Cells outside the grid are solid.
    #[must_use]
    pub fn is_open(&self, column: u32, row: u32) -> bool {
        self.index(column, row)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(false)
    }

    /// Flattened index for the provided cell.
    #[must_use]
    pub fn index(&self, column: u32, row: u32) -> Option<usize> {
        if column >= self.width || row >= self.depth {
            return None;
        }
        Some(row as usize * self.width as usize + column as usize)
    }

    /// Grid cell containing `point`, if it lies on the grid.
    #[must_use]
    pub fn cell_containing(&self, point: DVec2) -> Option<CellCoord> {
        if !point.is_finite() || point.x < 0.0 || point.y < 0.0 {
            return None;
        }
        let column = point.x.floor() as u32;
        let row = point.y.floor() as u32;
        (column < self.width && row < self.depth).then(|| CellCoord::new(column, row))
    }

    /// Centre of `cell` in grid units; the `y` component carries the row axis.
    #[must_use]
    pub fn cell_center(cell: CellCoord) -> DVec2 {
        DVec2::new(f64::from(cell.column()) + 0.5, f64::from(cell.row()) + 0.5)
    }

    /// Number of walkable cells.
    #[must_use]
    pub fn open_cell_count(&self) -> usize {
        self.cells.iter().filter(|open| **open).count()
    }

    /// Number of 4-connected walkable regions.
    #[must_use]
    pub fn walkable_region_count(&self) -> usize {
        let mut seen = vec![false; self.cells.len()];
        let mut queue = VecDeque::new();
        let mut regions = 0;

        for row in 0..self.depth {
            for column in 0..self.width {
                let Some(start) = self.index(column, row) else {
                    continue;
                };
                if !self.cells[start] || seen[start] {
                    continue;
                }

                regions += 1;
                seen[start] = true;
                queue.push_back(CellCoord::new(column, row));

                while let Some(cell) = queue.pop_front() {
                    for direction in Direction::ALL {
                        let Some(next) = direction.step(cell, self.width, self.depth) else {
                            continue;
                        };
                        let Some(index) = self.index(next.column(), next.row()) else {
                            continue;
                        };
                        if self.cells[index] && !seen[index] {
                            seen[index] = true;
                            queue.push_back(next);
                        }
                    }
                }
            }
        }

        regions
    }
}

/// World-space extent used to scale wall blocks for consumers.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scale {
    /// World units per grid column.
    pub x: f64,
    /// Wall height in world units.
    pub y: f64,
    /// World units per grid row.
    pub z: f64,
}

impl Default for Scale {
    fn default() -> Self {
        Self {
            x: 1.0,
            y: 1.0,
            z: 1.0,
        }
    }
}

/// Axis-aligned rectangle of solid grid cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WallBlock {
    x: u32,
    z: u32,
    width: u32,
    depth: u32,
}

impl WallBlock {
    /// Creates a block anchored at grid cell `(x, z)`.
    #[must_use]
    pub const fn new(x: u32, z: u32, width: u32, depth: u32) -> Self {
        Self { x, z, width, depth }
    }

    /// First grid column covered by the block.
    #[must_use]
    pub const fn x(&self) -> u32 {
        self.x
    }

    /// First grid row covered by the block.
    #[must_use]
    pub const fn z(&self) -> u32 {
        self.z
    }

    /// Number of columns covered.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Number of rows covered.
    #[must_use]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of grid cells covered.
    #[must_use]
    pub const fn area(&self) -> u64 {
        self.width as u64 * self.depth as u64
    }

    /// Reports whether the block covers the provided grid cell.
    #[must_use]
    pub const fn contains(&self, column: u32, row: u32) -> bool {
        column >= self.x
            && column - self.x < self.width
            && row >= self.z
            && row - self.z < self.depth
    }

    /// Minimum corner in grid units.
    #[must_use]
    pub fn min(&self) -> DVec2 {
        DVec2::new(f64::from(self.x), f64::from(self.z))
    }

    /// Maximum corner in grid units.
    #[must_use]
    pub fn max(&self) -> DVec2 {
        DVec2::new(
            f64::from(self.x) + f64::from(self.width),
            f64::from(self.z) + f64::from(self.depth),
        )
    }

    /// Scales the block into world space.
    #[must_use]
    pub fn to_world(&self, scale: Scale) -> WorldBox {
        let factor = DVec2::new(scale.x, scale.z);
        WorldBox {
            min: self.min() * factor,
            max: self.max() * factor,
            height: scale.y,
        }
    }
}

/// Wall block expressed in world units.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct WorldBox {
    /// Minimum corner on the ground plane.
    pub min: DVec2,
    /// Maximum corner on the ground plane.
    pub max: DVec2,
    /// Extrusion height.
    pub height: f64,
}

/// Frozen neighbour lists of a graph whose nodes are identified by index.
///
/// Every list is sorted ascending and free of duplicates.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Adjacency {
    neighbors: Vec<Vec<usize>>,
}

impl Adjacency {
    /// Graph with `count` nodes and no edges.
    #[must_use]
    pub fn empty(count: usize) -> Self {
        Self {
            neighbors: vec![Vec::new(); count],
        }
    }

    /// Freezes a set of working neighbour sets.
    #[must_use]
    pub fn from_sets(sets: Vec<BTreeSet<usize>>) -> Self {
        Self {
            neighbors: sets.into_iter().map(|set| set.into_iter().collect()).collect(),
        }
    }

    /// Builds an undirected adjacency from an edge list, dropping self loops.
    #[must_use]
    pub fn from_edges(count: usize, edges: &[(usize, usize)]) -> Self {
        let mut sets = vec![BTreeSet::new(); count];
        for &(a, b) in edges {
            if a == b || a >= count || b >= count {
                continue;
            }
            let _ = sets[a].insert(b);
            let _ = sets[b].insert(a);
        }
        Self::from_sets(sets)
    }

    /// Working copy that can be mutated and frozen again.
    #[must_use]
    pub fn to_sets(&self) -> Vec<BTreeSet<usize>> {
        self.neighbors
            .iter()
            .map(|list| list.iter().copied().collect())
            .collect()
    }

    /// Number of nodes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    /// Reports whether the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbours of `node`; unknown nodes have none.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.neighbors.get(node).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Reports whether `from` lists `to` as a neighbour.
    #[must_use]
    pub fn contains(&self, from: usize, to: usize) -> bool {
        self.neighbors(from).binary_search(&to).is_ok()
    }

    /// Number of directed entries across all lists.
    #[must_use]
    pub fn directed_edge_count(&self) -> usize {
        self.neighbors.iter().map(Vec::len).sum()
    }

    /// Reports whether every edge is listed from both endpoints.
    #[must_use]
    pub fn is_symmetric(&self) -> bool {
        self.neighbors
            .iter()
            .enumerate()
            .all(|(node, list)| list.iter().all(|&other| self.contains(other, node)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> Vec<Openings> {
        vec![
            Openings::CLOSED.with(Direction::East),
            Openings::CLOSED.with(Direction::West).with(Direction::East),
            Openings::CLOSED.with(Direction::West),
        ]
    }

    #[test]
    fn maze_rejects_zero_dimensions() {
        assert_eq!(
            Maze::new(0, 3, Vec::new()),
            Err(NavError::InvalidDimension {
                columns: 0,
                rows: 3
            })
        );
    }

    #[test]
    fn maze_rejects_mismatched_buffer() {
        assert_eq!(
            Maze::new(2, 2, corridor()),
            Err(NavError::MaskCountMismatch {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn maze_rejects_one_sided_opening() {
        let mut cells = corridor();
        cells[2] = Openings::CLOSED;
        assert_eq!(
            Maze::new(3, 1, cells),
            Err(NavError::InconsistentOpening {
                cell: CellCoord::new(1, 0),
                direction: Direction::East,
            })
        );
    }

    #[test]
    fn maze_rejects_opening_through_border() {
        let mut cells = corridor();
        cells[0] = cells[0].with(Direction::North);
        assert!(matches!(
            Maze::new(3, 1, cells),
            Err(NavError::InconsistentOpening {
                direction: Direction::North,
                ..
            })
        ));
    }

    #[test]
    fn passage_count_counts_each_passage_once() {
        let maze = Maze::new(3, 1, corridor()).expect("valid corridor");
        assert_eq!(maze.passage_count(), 2);
    }

    #[test]
    fn openings_reject_high_bits() {
        assert_eq!(Openings::from_bits(0b1_0000), None);
        assert_eq!(Openings::from_bits(0b1010).map(Openings::count), Some(2));
    }

    #[test]
    fn direction_step_respects_bounds() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(Direction::North.step(corner, 2, 2), None);
        assert_eq!(Direction::West.step(corner, 2, 2), None);
        assert_eq!(
            Direction::East.step(corner, 2, 2),
            Some(CellCoord::new(1, 0))
        );
        assert_eq!(Direction::East.step(CellCoord::new(1, 0), 2, 2), None);
    }

    #[test]
    fn region_count_separates_islands() {
        let cells = vec![
            true, false, true, //
            true, false, true, //
            false, false, false,
        ];
        let grid = OccupancyGrid::from_cells(3, 3, cells).expect("sized grid");
        assert_eq!(grid.walkable_region_count(), 2);
        assert_eq!(grid.open_cell_count(), 4);
    }

    #[test]
    fn wall_block_scales_into_world_space() {
        let block = WallBlock::new(2, 1, 3, 1);
        let world = block.to_world(Scale {
            x: 2.0,
            y: 5.0,
            z: 0.5,
        });
        assert_eq!(world.min, DVec2::new(4.0, 0.5));
        assert_eq!(world.max, DVec2::new(10.0, 1.0));
        assert!((world.height - 5.0).abs() < f64::EPSILON);
        assert!(block.contains(4, 1));
        assert!(!block.contains(5, 1));
    }

    #[test]
    fn adjacency_from_edges_is_symmetric_and_sorted() {
        let adjacency = Adjacency::from_edges(4, &[(2, 0), (0, 1), (1, 1), (3, 9)]);
        assert_eq!(adjacency.neighbors(0), &[1, 2]);
        assert_eq!(adjacency.neighbors(1), &[0]);
        assert!(adjacency.neighbors(3).is_empty());
        assert!(adjacency.is_symmetric());
        assert_eq!(adjacency.directed_edge_count(), 4);
    }
}
