//! Removal of near-parallel sightlines.
//!
//! Nodes often see several targets lined up in almost the same direction.
//! For each node, every pair of its edges is compared; when the two
//! directions fall within half the configured cone angle of each other the
//! longer edge is dropped from both of its endpoints. Nodes are processed in
//! index order against their current edge sets, so later nodes observe the
//! removals made by earlier ones.

use std::collections::BTreeSet;

use log::{debug, trace};
use maze_nav_core::{Adjacency, DVec2};
use serde::{Deserialize, Serialize};

/// Controls the redundant-edge pruning pass.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PruneTuning {
    /// Full cone angle, in degrees, inside which two edges count as redundant.
    pub angle_degrees: f64,
    /// Disables pruning entirely when `false`.
    pub enabled: bool,
}

impl Default for PruneTuning {
    fn default() -> Self {
        Self {
            angle_degrees: 45.0,
            enabled: true,
        }
    }
}

impl PruneTuning {
    /// Minimum dot product between unit directions that triggers pruning.
    #[must_use]
    pub fn tolerance(&self) -> f64 {
        (self.angle_degrees.to_radians() / 2.0).cos()
    }
}

#[derive(Clone, Copy, Debug)]
struct Sightline {
    target: usize,
    length: f64,
    direction: DVec2,
}

/// Returns a pruned copy of `adjacency`; the input is left untouched.
///
/// Ties in length drop the edge toward the higher node index. Symmetry is
/// preserved because every removal is applied to both endpoints.
#[must_use]
pub fn prune(nodes: &[DVec2], adjacency: &Adjacency, tuning: &PruneTuning) -> Adjacency {
    if !tuning.enabled {
        return adjacency.clone();
    }

    let tolerance = tuning.tolerance();
    let mut working = adjacency.to_sets();
    let mut removed = 0usize;

    for node in 0..working.len() {
        let Some(&origin) = nodes.get(node) else {
            continue;
        };

        let sightlines: Vec<Sightline> = working[node]
            .iter()
            .filter_map(|&target| {
                let offset = *nodes.get(target)? - origin;
                Some(Sightline {
                    target,
                    length: offset.length(),
                    direction: offset.normalize_or_zero(),
                })
            })
            .collect();

        let mut discard = BTreeSet::new();
        for (index, shorter_candidate) in sightlines.iter().enumerate() {
            for other in &sightlines[index + 1..] {
                if shorter_candidate.direction.dot(other.direction) < tolerance {
                    continue;
                }
                // Sightlines are ordered by target, so `other` has the higher index.
                let longer = if other.length >= shorter_candidate.length {
                    other.target
                } else {
                    shorter_candidate.target
                };
                let _ = discard.insert(longer);
            }
        }

        for target in discard {
            let _ = working[node].remove(&target);
            let _ = working[target].remove(&node);
            removed += 1;
            trace!("pruned redundant edge {node} <-> {target}");
        }
    }

    debug!(
        "pruned {removed} redundant edges within a {:.1} degree cone",
        tuning.angle_degrees
    );
    Adjacency::from_sets(working)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_adjacency, OpenField};

    #[test]
    fn reference_tolerance_is_cos_of_half_angle() {
        let expected = 22.5_f64.to_radians().cos();
        assert!((PruneTuning::default().tolerance() - expected).abs() < 1e-12);
    }

    #[test]
    fn longer_of_two_parallel_edges_is_removed() {
        let nodes = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0), DVec2::new(10.0, 0.5)];
        let visible = build_adjacency(&nodes, &OpenField);
        let pruned = prune(&nodes, &visible, &PruneTuning::default());

        assert_eq!(pruned.neighbors(0), &[1]);
        assert_eq!(pruned.neighbors(1), &[0, 2]);
        assert_eq!(pruned.neighbors(2), &[1]);
        assert!(pruned.is_symmetric());
    }

    #[test]
    fn diverging_edges_survive() {
        let nodes = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0), DVec2::new(0.0, 5.0)];
        let visible = build_adjacency(&nodes, &OpenField);
        let pruned = prune(&nodes, &visible, &PruneTuning::default());
        assert_eq!(pruned, visible);
    }

    #[test]
    fn disabled_tuning_returns_input() {
        let nodes = [DVec2::new(0.0, 0.0), DVec2::new(5.0, 0.0), DVec2::new(10.0, 0.0)];
        let visible = build_adjacency(&nodes, &OpenField);
        let tuning = PruneTuning {
            enabled: false,
            ..PruneTuning::default()
        };
        assert_eq!(prune(&nodes, &visible, &tuning), visible);
    }

    #[test]
    fn equal_length_ties_drop_the_higher_index() {
        let nodes = [
            DVec2::new(0.0, 0.0),
            DVec2::new(4.0, 0.5),
            DVec2::new(4.0, -0.5),
        ];
        let visible = Adjacency::from_edges(3, &[(0, 1), (0, 2)]);
        let pruned = prune(&nodes, &visible, &PruneTuning::default());
        assert_eq!(pruned.neighbors(0), &[1]);
        assert!(pruned.neighbors(2).is_empty());
    }
}
