#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Randomized frontier-growth maze generator.
//!
//! Growth starts from the bottom-left cell and repeatedly accepts the
//! cheapest pending wall from a weighted frontier. A wall is only carved when
//! it leads into a cell outside the maze so far, which makes the result a
//! spanning tree over the cell grid: every pair of cells is joined by exactly
//! one route.

use log::{debug, trace};
use maze_nav_core::{validate_dimensions, CellCoord, Direction, Maze, MinHeap, NavError, Openings};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Directions explored from the seed cell. The seed sits on the southern and
/// western borders, so these are its only inward walls.
const SEED_DIRECTIONS: [Direction; 2] = [Direction::North, Direction::East];

#[derive(Clone, Copy, Debug)]
struct FrontierEdge {
    weight: u32,
    from: CellCoord,
    direction: Direction,
}

/// Generates a maze from a ChaCha stream seeded with `seed`.
///
/// Identical arguments always yield identical mazes.
pub fn generate_seeded(columns: u32, rows: u32, seed: u64) -> Result<Maze, NavError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    generate(columns, rows, &mut rng)
}

/// Generates a `columns x rows` maze drawing frontier weights from `rng`.
pub fn generate<R: Rng>(columns: u32, rows: u32, rng: &mut R) -> Result<Maze, NavError> {
    let cell_count = validate_dimensions(columns, rows)?;
    let width = columns as usize;

    let mut cells = vec![Openings::CLOSED; cell_count];
    let mut visited = vec![false; cell_count];
    let mut frontier = MinHeap::with_capacity(cell_count * 2, |a: &FrontierEdge, b: &FrontierEdge| {
        a.weight.cmp(&b.weight)
    });

    let seed = CellCoord::new(0, rows - 1);
    visited[index(seed, width)] = true;
    for direction in SEED_DIRECTIONS {
        if direction.step(seed, columns, rows).is_some() {
            let _ = frontier.push(FrontierEdge {
                weight: rng.gen(),
                from: seed,
                direction,
            });
        }
    }

    let mut passages = 0usize;
    let mut discarded = 0usize;

    while let Some(edge) = frontier.pop() {
        let Some(far) = edge.direction.step(edge.from, columns, rows) else {
            continue;
        };
        let far_index = index(far, width);
        if visited[far_index] {
            discarded += 1;
            continue;
        }

        let near_index = index(edge.from, width);
        cells[near_index] = cells[near_index].with(edge.direction);
        cells[far_index] = cells[far_index].with(edge.direction.opposite());
        visited[far_index] = true;
        passages += 1;
        trace!(
            "carved {:?} from ({}, {}) with weight {}",
            edge.direction,
            edge.from.column(),
            edge.from.row(),
            edge.weight
        );

        for direction in Direction::ALL {
            let Some(next) = direction.step(far, columns, rows) else {
                continue;
            };
            if visited[index(next, width)] {
                continue;
            }
            let _ = frontier.push(FrontierEdge {
                weight: rng.gen(),
                from: far,
                direction,
            });
        }
    }

    debug!(
        "generated {columns}x{rows} maze with {passages} passages ({discarded} frontier walls discarded)"
    );

    Maze::new(columns, rows, cells)
}

fn index(cell: CellCoord, width: usize) -> usize {
    cell.row() as usize * width + cell.column() as usize
}
