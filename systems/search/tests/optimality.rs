use maze_nav_core::{Adjacency, DVec2};
use maze_nav_system_search::find_path;
use proptest::prelude::*;

fn all_pairs_shortest(nodes: &[DVec2], adjacency: &Adjacency) -> Vec<Vec<f64>> {
    let count = nodes.len();
    let mut distance = vec![vec![f64::INFINITY; count]; count];
    for node in 0..count {
        distance[node][node] = 0.0;
        for &neighbor in adjacency.neighbors(node) {
            distance[node][neighbor] = nodes[node].distance(nodes[neighbor]);
        }
    }
    for via in 0..count {
        for from in 0..count {
            for to in 0..count {
                let candidate = distance[from][via] + distance[via][to];
                if candidate < distance[from][to] {
                    distance[from][to] = candidate;
                }
            }
        }
    }
    distance
}

fn graph() -> impl Strategy<Value = (Vec<DVec2>, Adjacency)> {
    prop::collection::vec((0u8..20, 0u8..20), 2..12).prop_flat_map(|coords| {
        let nodes: Vec<DVec2> = coords
            .iter()
            .map(|&(x, y)| DVec2::new(f64::from(x), f64::from(y)))
            .collect();
        let count = nodes.len();
        let pairs = count * (count - 1) / 2;
        prop::collection::vec(any::<bool>(), pairs).prop_map(move |mask| {
            let mut edges = Vec::new();
            let mut bit = mask.iter();
            for a in 0..count {
                for b in a + 1..count {
                    if bit.next().copied().unwrap_or(false) {
                        edges.push((a, b));
                    }
                }
            }
            (nodes.clone(), Adjacency::from_edges(count, &edges))
        })
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn routes_match_exhaustive_shortest_distances((nodes, adjacency) in graph()) {
        let reference = all_pairs_shortest(&nodes, &adjacency);

        for start in 0..nodes.len() {
            for goal in 0..nodes.len() {
                let found = find_path(start, goal, &nodes, &adjacency).expect("valid indices");
                let expected = reference[start][goal];
                match found {
                    None => prop_assert!(expected.is_infinite()),
                    Some(path) => {
                        prop_assert!((path.length() - expected).abs() < 1e-9);
                        prop_assert_eq!(path.nodes().first().copied(), Some(start));
                        prop_assert_eq!(path.nodes().last().copied(), Some(goal));
                        for step in path.nodes().windows(2) {
                            prop_assert!(adjacency.contains(step[0], step[1]));
                        }
                        let walked: f64 = path
                            .points()
                            .windows(2)
                            .map(|pair| pair[0].distance(pair[1]))
                            .sum();
                        prop_assert!((walked - path.length()).abs() < 1e-9);
                    }
                }
            }
        }
    }
}
