use grid_util::point::Point;

use crate::STEP_COST;

/// Estimate of the remaining cost between two points. Implementations used with
/// [Search](crate::Search) must never overestimate the 4-connected step distance, otherwise the
/// first path found is not guaranteed to be the shortest.
pub trait Heuristic {
    fn estimate(&self, from: &Point, to: &Point) -> u32;
}

/// Manhattan distance. Admissible and consistent on a 4-connected unit-cost grid, so a closed
/// cell never needs reopening.
#[derive(Clone, Copy, Debug, Default)]
pub struct Manhattan;

impl Heuristic for Manhattan {
    fn estimate(&self, from: &Point, to: &Point) -> u32 {
        from.manhattan_distance(to).unsigned_abs() * STEP_COST
    }
}

/// Always estimates zero, turning A* into Dijkstra's algorithm.
#[derive(Clone, Copy, Debug, Default)]
pub struct Dijkstra;

impl Heuristic for Dijkstra {
    fn estimate(&self, _: &Point, _: &Point) -> u32 {
        0
    }
}
