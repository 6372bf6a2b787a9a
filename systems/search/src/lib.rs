#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! A* search over straight-line graphs.
//!
//! Edges are weighted by the Euclidean distance between their endpoints, so
//! the straight-line heuristic is admissible and consistent and the first
//! time the goal leaves the open set its route is optimal.
//!
//! The open set is a [`MinHeap`] keyed by `f = g + h`. Lowering a node's cost
//! pushes a fresh entry instead of updating the old one; the stale entry is
//! skipped by the closed-set check when it eventually surfaces.

use log::{debug, trace};
use maze_nav_core::{Adjacency, DVec2, MinHeap, NavError};
use serde::Serialize;

/// Ordered route through the graph from start to goal, both included.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Path {
    nodes: Vec<usize>,
    points: Vec<DVec2>,
    length: f64,
}

impl Path {
    /// Node indices visited in order.
    #[must_use]
    pub fn nodes(&self) -> &[usize] {
        &self.nodes
    }

    /// Positions visited in order.
    #[must_use]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Sum of the traversed edge lengths.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// Number of nodes on the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`; a found path holds at least its start node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Counters describing the work done by one search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// Nodes moved into the closed set.
    pub expanded: usize,
    /// Entries pushed onto the open set.
    pub pushes: usize,
    /// Popped entries ignored because their node was already closed.
    pub stale_pops: usize,
}

/// Straight-line distance heuristic.
#[must_use]
pub fn euclidean(a: DVec2, b: DVec2) -> f64 {
    a.distance(b)
}

/// Shortest route from `start` to `goal`, or `Ok(None)` when the goal is unreachable.
pub fn find_path(
    start: usize,
    goal: usize,
    nodes: &[DVec2],
    adjacency: &Adjacency,
) -> Result<Option<Path>, NavError> {
    find_path_with_stats(start, goal, nodes, adjacency).map(|(path, _)| path)
}

/// Same as [`find_path`], additionally reporting search counters.
pub fn find_path_with_stats(
    start: usize,
    goal: usize,
    nodes: &[DVec2],
    adjacency: &Adjacency,
) -> Result<(Option<Path>, SearchStats), NavError> {
    let count = nodes.len();
    if adjacency.len() != count {
        return Err(NavError::MaskCountMismatch {
            expected: count,
            actual: adjacency.len(),
        });
    }
    for index in [start, goal] {
        if index >= count {
            return Err(NavError::UnknownNode { index, count });
        }
    }

    let target = nodes[goal];
    let mut stats = SearchStats::default();
    let mut g_score = vec![f64::INFINITY; count];
    let mut parents: Vec<Option<usize>> = vec![None; count];
    let mut closed = vec![false; count];
    let mut open = MinHeap::new(|a: &(f64, usize), b: &(f64, usize)| {
        a.0.total_cmp(&b.0).then(a.1.cmp(&b.1))
    });

    g_score[start] = 0.0;
    let _ = open.push((euclidean(nodes[start], target), start));
    stats.pushes += 1;

    while let Some((_, current)) = open.pop() {
        if closed[current] {
            stats.stale_pops += 1;
            continue;
        }

        if current == goal {
            let path = reconstruct(goal, &parents, nodes, g_score[goal]);
            debug!(
                "found path {start} -> {goal}: {} nodes, length {:.3}, {} expanded, {} stale",
                path.len(),
                path.length(),
                stats.expanded,
                stats.stale_pops
            );
            return Ok((Some(path), stats));
        }

        closed[current] = true;
        stats.expanded += 1;

        for &neighbor in adjacency.neighbors(current) {
            if neighbor >= count || closed[neighbor] {
                continue;
            }

            let tentative = g_score[current] + nodes[current].distance(nodes[neighbor]);
            if tentative >= g_score[neighbor] {
                continue;
            }

            g_score[neighbor] = tentative;
            parents[neighbor] = Some(current);
            let f_score = tentative + euclidean(nodes[neighbor], target);
            let _ = open.push((f_score, neighbor));
            stats.pushes += 1;
            trace!("relaxed {neighbor} via {current}: g={tentative:.3} f={f_score:.3}");
        }
    }

    debug!(
        "no path {start} -> {goal} after expanding {} nodes",
        stats.expanded
    );
    Ok((None, stats))
}

fn reconstruct(goal: usize, parents: &[Option<usize>], nodes: &[DVec2], length: f64) -> Path {
    let mut route = vec![goal];
    let mut current = goal;
    while let Some(parent) = parents[current] {
        route.push(parent);
        current = parent;
    }
    route.reverse();

    let points = route.iter().map(|&node| nodes[node]).collect();
    Path {
        nodes: route,
        points,
        length,
    }
}
