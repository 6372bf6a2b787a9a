//! Ray queries against the geometry that blocks line of sight.

use maze_nav_core::{DVec2, OccupancyGrid, WallBlock};

/// Overlap shorter than this along a ray counts as grazing contact, not a hit.
const CONTACT_EPSILON: f64 = 1e-9;

/// Geometry that can answer "how far until this ray hits something".
pub trait Obstacles {
    /// Distance from `origin` along the unit `direction` to the first obstacle
    /// the ray passes through, looking no farther than `max_distance`.
    ///
    /// Rays that only touch an obstacle's boundary are not blocked.
    fn raycast(&self, origin: DVec2, direction: DVec2, max_distance: f64) -> Option<f64>;
}

/// Empty space: nothing ever blocks a ray.
#[derive(Clone, Copy, Debug, Default)]
pub struct OpenField;

impl Obstacles for OpenField {
    fn raycast(&self, _origin: DVec2, _direction: DVec2, _max_distance: f64) -> Option<f64> {
        None
    }
}

impl Obstacles for OccupancyGrid {
    fn raycast(&self, origin: DVec2, direction: DVec2, max_distance: f64) -> Option<f64> {
        let extent = DVec2::new(f64::from(self.width()), f64::from(self.depth())).length();
        let reach = max_distance.min(extent + origin.length());
        if !reach.is_finite() || reach <= 0.0 {
            return None;
        }

        let end = origin + direction * reach;
        let low = origin.min(end).floor().max(DVec2::ZERO);
        let high = origin.max(end).floor();
        if high.x < 0.0 || high.y < 0.0 {
            return None;
        }

        let column_range = low.x as u32..=(high.x as u32).min(self.width().saturating_sub(1));
        let row_range = low.y as u32..=(high.y as u32).min(self.depth().saturating_sub(1));

        let mut nearest: Option<f64> = None;
        for row in row_range {
            for column in column_range.clone() {
                if self.is_open(column, row) {
                    continue;
                }
                let min = DVec2::new(f64::from(column), f64::from(row));
                let Some(hit) = ray_box_entry(origin, direction, min, min + DVec2::ONE, reach)
                else {
                    continue;
                };
                if nearest.map_or(true, |best| hit < best) {
                    nearest = Some(hit);
                }
            }
        }
        nearest
    }
}

impl Obstacles for [WallBlock] {
    fn raycast(&self, origin: DVec2, direction: DVec2, max_distance: f64) -> Option<f64> {
        self.iter()
            .filter_map(|block| {
                ray_box_entry(origin, direction, block.min(), block.max(), max_distance)
            })
            .min_by(f64::total_cmp)
    }
}

/// Entry distance of a ray into the interior of an axis-aligned box.
///
/// Returns `None` when the ray misses, only grazes the boundary, or enters
/// beyond `max_distance`. A ray that starts inside the box enters at zero.
#[must_use]
pub fn ray_box_entry(
    origin: DVec2,
    direction: DVec2,
    min: DVec2,
    max: DVec2,
    max_distance: f64,
) -> Option<f64> {
    let mut enter = 0.0_f64;
    let mut exit = max_distance;

    for axis in 0..2 {
        let start = origin.to_array()[axis];
        let step = direction.to_array()[axis];
        let low = min.to_array()[axis];
        let high = max.to_array()[axis];

        if step == 0.0 {
            if start <= low || start >= high {
                return None;
            }
            continue;
        }

        let (near, far) = {
            let a = (low - start) / step;
            let b = (high - start) / step;
            if a <= b {
                (a, b)
            } else {
                (b, a)
            }
        };
        enter = enter.max(near);
        exit = exit.min(far);
        if exit - enter <= CONTACT_EPSILON {
            return None;
        }
    }

    Some(enter)
}
