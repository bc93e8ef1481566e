//! # grid_astar
//!
//! Shortest paths on a rectangular grid with [A*](https://en.wikipedia.org/wiki/A*_search_algorithm),
//! moving in four directions at uniform cost and guided by the
//! [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry).
//!
//! A [Grid] owns its [Cell]s, each carrying a passability flag and a [Role]. A [Search] session
//! borrows the grid, keeps its own frontier and cost tables, and writes roles back into the
//! cells as it goes, so that an observer (for instance a renderer) can follow the search step
//! by step. Ties in the frontier are broken by insertion order, so runs are reproducible.
//!
//! ```
//! use grid_astar::{search, Grid, NoopObserver};
//! use grid_util::point::Point;
//!
//! let mut grid = Grid::new(3, 3);
//! grid.set_barrier(Point::new(1, 0)).unwrap();
//! grid.refresh_all_neighbors();
//! let outcome = search(&mut grid, Point::new(0, 0), Point::new(2, 0), &mut NoopObserver).unwrap();
//! assert_eq!(outcome.path_length(), Some(4));
//! ```
pub mod astar;
pub mod cell;
pub mod error;
pub mod grid;
pub mod heuristic;
pub mod observer;
pub mod solver;

use grid_util::point::Point;
use itertools::Itertools;

pub use crate::astar::{FrontierEntry, Search, SearchOutcome, Step};
pub use crate::cell::{Cell, Role};
pub use crate::error::{GridError, Result};
pub use crate::grid::Grid;
pub use crate::heuristic::{Dijkstra, Heuristic, Manhattan};
pub use crate::observer::{CancelToken, Cancellable, NoopObserver, SearchObserver};
pub use crate::solver::AstarSolver;

/// Cost of a single orthogonal move.
pub const STEP_COST: u32 = 1;
/// A cell has at most four neighbours.
pub const N_SMALLVEC_SIZE: usize = 4;

/// Searches from `start` to `end` with the [Manhattan] heuristic. Neighbour lists must have been
/// refreshed after the last barrier edit.
pub fn search<O: SearchObserver>(
    grid: &mut Grid,
    start: Point,
    end: Point,
    observer: &mut O,
) -> Result<SearchOutcome> {
    AstarSolver::new().search(grid, start, end, observer)
}

/// Whether every consecutive pair of points differs by one step in exactly one coordinate.
pub fn path_is_connected(path: &[Point]) -> bool {
    path.iter()
        .tuple_windows()
        .all(|(a, b)| (a.x - b.x).abs() + (a.y - b.y).abs() == 1)
}
