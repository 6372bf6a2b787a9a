#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Line-of-sight graph over maze waypoints.
//!
//! Construction happens in two passes. The first tests every unordered pair of
//! nodes against the caller's [`Obstacles`] and links the pair when nothing
//! blocks the straight segment between them. The second prunes near-parallel
//! edges so each node keeps only the shortest sightline in any narrow cone of
//! directions.

pub mod obstacles;
pub mod prune;

use std::collections::BTreeSet;

use log::{debug, warn};
use maze_nav_core::{Adjacency, DVec2, NavError};

pub use obstacles::{ray_box_entry, Obstacles, OpenField};
pub use prune::{prune, PruneTuning};

/// Links every pair of mutually visible nodes.
///
/// A pair is visible when a ray cast from the first node toward the second
/// reports no hit closer than the second node. Coincident nodes have no
/// defined direction and are left unlinked.
pub fn build_adjacency<O>(nodes: &[DVec2], obstacles: &O) -> Adjacency
where
    O: Obstacles + ?Sized,
{
    let mut sets = vec![BTreeSet::new(); nodes.len()];
    let mut visible = 0usize;

    for (i, &from) in nodes.iter().enumerate() {
        for (j, &to) in nodes.iter().enumerate().skip(i + 1) {
            let offset = to - from;
            let distance = offset.length();
            if distance <= f64::EPSILON {
                warn!("nodes {i} and {j} coincide; leaving them unlinked");
                continue;
            }

            let direction = offset / distance;
            let blocked = obstacles
                .raycast(from, direction, distance)
                .is_some_and(|hit| hit < distance);
            if blocked {
                continue;
            }

            let _ = sets[i].insert(j);
            let _ = sets[j].insert(i);
            visible += 1;
        }
    }

    let pairs = nodes.len() * nodes.len().saturating_sub(1) / 2;
    debug!("line of sight: {visible} of {pairs} node pairs visible");
    Adjacency::from_sets(sets)
}

/// Waypoints together with their frozen, pruned visibility edges.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityGraph {
    nodes: Vec<DVec2>,
    adjacency: Adjacency,
}

impl VisibilityGraph {
    /// Runs the line-of-sight pass followed by pruning.
    pub fn build<O>(nodes: Vec<DVec2>, obstacles: &O, tuning: &PruneTuning) -> Self
    where
        O: Obstacles + ?Sized,
    {
        let visible = build_adjacency(&nodes, obstacles);
        let adjacency = prune(&nodes, &visible, tuning);
        Self { nodes, adjacency }
    }

    /// Pairs externally supplied nodes with an adjacency of the same size.
    pub fn from_parts(nodes: Vec<DVec2>, adjacency: Adjacency) -> Result<Self, NavError> {
        if nodes.len() != adjacency.len() {
            return Err(NavError::MaskCountMismatch {
                expected: nodes.len(),
                actual: adjacency.len(),
            });
        }
        if let Some(index) = (0..adjacency.len())
            .flat_map(|node| adjacency.neighbors(node).iter().copied())
            .find(|&neighbor| neighbor >= nodes.len())
        {
            return Err(NavError::UnknownNode {
                index,
                count: nodes.len(),
            });
        }
        Ok(Self { nodes, adjacency })
    }

    /// Node positions indexed by node id.
    #[must_use]
    pub fn nodes(&self) -> &[DVec2] {
        &self.nodes
    }

    /// Frozen neighbour lists.
    #[must_use]
    pub fn adjacency(&self) -> &Adjacency {
        &self.adjacency
    }

    /// Position of `node`, if it exists.
    #[must_use]
    pub fn node(&self, node: usize) -> Option<DVec2> {
        self.nodes.get(node).copied()
    }

    /// Neighbours of `node`.
    #[must_use]
    pub fn neighbors(&self, node: usize) -> &[usize] {
        self.adjacency.neighbors(node)
    }

    /// Number of undirected edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.directed_edge_count() / 2
    }

    /// Node closest to `point`, ties resolved toward the lower index.
    #[must_use]
    pub fn nearest_node(&self, point: DVec2) -> Option<usize> {
        self.nodes
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance_squared(point).total_cmp(&b.distance_squared(point)))
            .map(|(index, _)| index)
    }

    /// Closest node that `point` can see through `obstacles`.
    #[must_use]
    pub fn nearest_visible_node<O>(&self, point: DVec2, obstacles: &O) -> Option<usize>
    where
        O: Obstacles + ?Sized,
    {
        let mut best: Option<(usize, f64)> = None;
        for (index, &node) in self.nodes.iter().enumerate() {
            let distance = node.distance(point);
            if best.is_some_and(|(_, closest)| distance >= closest) {
                continue;
            }
            if distance > f64::EPSILON {
                let direction = (node - point) / distance;
                let blocked = obstacles
                    .raycast(point, direction, distance)
                    .is_some_and(|hit| hit < distance);
                if blocked {
                    continue;
                }
            }
            best = Some((index, distance));
        }
        best.map(|(index, _)| index)
    }
}
