use grid_util::point::Point;

use crate::astar::{Search, SearchOutcome};
use crate::error::{GridError, Result};
use crate::grid::Grid;
use crate::heuristic::{Dijkstra, Heuristic, Manhattan};
use crate::observer::SearchObserver;

/// Validates search requests and runs them to completion. The heuristic defaults to
/// [Manhattan].
#[derive(Clone, Debug, Default)]
pub struct AstarSolver<H = Manhattan> {
    pub heuristic: H,
}

impl AstarSolver<Manhattan> {
    pub fn new() -> AstarSolver<Manhattan> {
        AstarSolver {
            heuristic: Manhattan,
        }
    }
}

impl AstarSolver<Dijkstra> {
    /// A solver without heuristic guidance, expanding in order of distance from the start.
    pub fn dijkstra() -> AstarSolver<Dijkstra> {
        AstarSolver {
            heuristic: Dijkstra,
        }
    }
}

impl<H: Heuristic + Clone> AstarSolver<H> {
    /// Searches from `start` to `end`, which become the grid's designated endpoints. The stored
    /// neighbour lists must be fresh, see [Grid::refresh_all_neighbors].
    pub fn search<O: SearchObserver>(
        &self,
        grid: &mut Grid,
        start: Point,
        end: Point,
        observer: &mut O,
    ) -> Result<SearchOutcome> {
        let search = Search::new(grid, start, end, self.heuristic.clone())?;
        Ok(search.run(observer))
    }

    /// Searches between the grid's designated start and end.
    pub fn search_designated<O: SearchObserver>(
        &self,
        grid: &mut Grid,
        observer: &mut O,
    ) -> Result<SearchOutcome> {
        match (grid.start(), grid.end()) {
            (Some(start), Some(end)) => self.search(grid, start, end, observer),
            (start, end) => Err(GridError::MissingEndpoints {
                start: start.is_some(),
                end: end.is_some(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::{CancelToken, Cancellable, NoopObserver};
    use crate::{path_is_connected, Role};

    fn p(row: i32, col: i32) -> Point {
        Point::new(row, col)
    }

    fn solve(grid: &mut Grid, start: Point, end: Point) -> SearchOutcome {
        grid.refresh_all_neighbors();
        AstarSolver::new()
            .search(grid, start, end, &mut NoopObserver)
            .unwrap()
    }

    /// Asserts the Manhattan length on an open 5x5 grid.
    #[test]
    fn open_grid_corner_to_corner() {
        let mut grid = Grid::new(5, 5);
        let outcome = solve(&mut grid, p(0, 0), p(4, 4));
        assert!(outcome.found());
        assert_eq!(outcome.path_length(), Some(8));
        let path = outcome.path().unwrap();
        assert_eq!(path.len(), 9);
        assert!(path.iter().all(|q| grid.in_bounds(*q)));
        assert_eq!(path.first(), Some(&p(0, 0)));
        assert_eq!(path.last(), Some(&p(4, 4)));
        assert!(path_is_connected(path));
    }

    #[test]
    fn open_grid_lengths_are_manhattan() {
        for r in 0..6 {
            for c in 0..6 {
                let mut grid = Grid::new(6, 6);
                let outcome = solve(&mut grid, p(0, 0), p(r, c));
                assert_eq!(outcome.path_length(), Some((r + c) as u32));
            }
        }
    }

    #[test]
    fn full_wall_blocks() {
        // |S#E|
        // |.#.|
        // |.#.|
        let mut grid = Grid::new(3, 3);
        for row in 0..3 {
            grid.set_barrier(p(row, 1)).unwrap();
        }
        let outcome = solve(&mut grid, p(0, 0), p(0, 2));
        assert_eq!(outcome, SearchOutcome::NoPath);
        assert_eq!(outcome.path_length(), None);
        // The whole left column was flooded.
        assert!(grid.cell(p(2, 0)).unwrap().is_closed());
    }

    #[test]
    fn detour_around_barrier() {
        // |S..|
        // |#..|
        // |E..|
        let mut grid = Grid::new(3, 3);
        grid.set_barrier(p(1, 0)).unwrap();
        let outcome = solve(&mut grid, p(0, 0), p(2, 0));
        assert_eq!(outcome.path_length(), Some(4));
        assert_eq!(
            outcome.path().unwrap(),
            &[p(0, 0), p(0, 1), p(1, 1), p(2, 1), p(2, 0)]
        );
    }

    #[test]
    fn roles_after_success() {
        let mut grid = Grid::new(3, 3);
        grid.set_barrier(p(1, 0)).unwrap();
        let outcome = solve(&mut grid, p(0, 0), p(2, 0));
        let path = outcome.path().unwrap();
        assert!(grid.cell(p(2, 0)).unwrap().is_end());
        // Every cell before the end, the start included, is marked as path.
        for q in &path[..path.len() - 1] {
            assert_eq!(grid.cell(*q).unwrap().role(), Role::Path);
        }
        assert!(grid.cells().iter().all(|c| !c.is_start()));
        assert_eq!(grid.start(), Some(p(0, 0)));

        grid.clear_search();
        assert!(grid.cell(p(0, 0)).unwrap().is_start());
        assert!(grid.cells().iter().all(|c| !c.role().is_transient()));
    }

    #[test]
    fn endpoint_on_barrier_is_freed_and_reached() {
        // |S.#| with the end placed on the barrier after the refresh
        let mut grid = Grid::new(1, 3);
        grid.set_barrier(p(0, 2)).unwrap();
        grid.refresh_all_neighbors();
        let outcome = AstarSolver::new()
            .search(&mut grid, p(0, 0), p(0, 2), &mut NoopObserver)
            .unwrap();
        assert!(!grid.cell(p(0, 2)).unwrap().is_barrier());
        assert_eq!(outcome.path_length(), Some(2));
        assert_eq!(grid.cell(p(0, 1)).unwrap().neighbors(), &[p(0, 2), p(0, 0)]);

        // Same with the start on a barrier.
        let mut grid = Grid::new(3, 1);
        grid.set_barrier(p(0, 0)).unwrap();
        grid.refresh_all_neighbors();
        let outcome = AstarSolver::new()
            .search(&mut grid, p(0, 0), p(2, 0), &mut NoopObserver)
            .unwrap();
        assert_eq!(outcome.path_length(), Some(2));
    }

    #[test]
    fn start_equals_end() {
        let mut grid = Grid::new(2, 2);
        let outcome = solve(&mut grid, p(1, 1), p(1, 1));
        assert_eq!(
            outcome,
            SearchOutcome::Found {
                path: vec![p(1, 1)],
                length: 0
            }
        );
    }

    #[test]
    fn repeated_runs_are_identical() {
        let mut grid = Grid::new(8, 8);
        for (r, c) in [(1, 1), (1, 2), (2, 5), (3, 3), (4, 3), (5, 6), (6, 1)] {
            grid.set_barrier(p(r, c)).unwrap();
        }
        let first = solve(&mut grid, p(0, 0), p(7, 7));
        let second = solve(&mut grid, p(0, 0), p(7, 7));
        assert!(first.found());
        assert_eq!(first, second);
    }

    #[test]
    fn missing_endpoints() {
        let mut grid = Grid::new(3, 3);
        grid.set_start(p(0, 0)).unwrap();
        let err = AstarSolver::new()
            .search_designated(&mut grid, &mut NoopObserver)
            .unwrap_err();
        assert_eq!(
            err,
            GridError::MissingEndpoints {
                start: true,
                end: false
            }
        );
        grid.set_end(p(2, 2)).unwrap();
        grid.refresh_all_neighbors();
        let outcome = AstarSolver::new()
            .search_designated(&mut grid, &mut NoopObserver)
            .unwrap();
        assert_eq!(outcome.path_length(), Some(4));
    }

    #[test]
    fn invalid_endpoint_leaves_grid_untouched() {
        let mut grid = Grid::new(3, 3);
        grid.refresh_all_neighbors();
        let result = AstarSolver::new().search(&mut grid, p(0, 0), p(3, 0), &mut NoopObserver);
        assert!(matches!(result, Err(GridError::InvalidCoordinate { .. })));
        assert!(grid.start().is_none());
        assert!(grid.cells().iter().all(|c| c.role() == Role::Unvisited));
    }

    #[test]
    fn observer_sees_every_step() {
        let mut grid = Grid::new(1, 4);
        grid.refresh_all_neighbors();
        let mut steps = 0;
        let outcome = AstarSolver::new()
            .search(&mut grid, p(0, 0), p(0, 3), &mut |_: &Grid| steps += 1)
            .unwrap();
        // Three expansions before the end is popped, then three cells marked as path.
        assert_eq!(outcome.path_length(), Some(3));
        assert_eq!(steps, 6);
    }

    #[test]
    fn cancellation_stops_the_search() {
        let mut grid = Grid::new(10, 10);
        grid.refresh_all_neighbors();
        let token = CancelToken::new();
        let remote = token.clone();
        let mut steps = 0;
        let mut observer = Cancellable::new(
            |_: &Grid| {
                steps += 1;
                if steps == 3 {
                    remote.cancel();
                }
            },
            token,
        );
        let outcome = AstarSolver::new()
            .search(&mut grid, p(0, 0), p(9, 9), &mut observer)
            .unwrap();
        assert_eq!(outcome, SearchOutcome::Cancelled);
        assert!(grid.cells().iter().all(|c| !c.is_path()));
        drop(observer);
        assert_eq!(steps, 3);
    }

    #[test]
    fn dijkstra_agrees_on_length() {
        let mut grid = Grid::new(7, 7);
        for (r, c) in [(0, 3), (1, 3), (2, 3), (3, 3), (5, 1), (5, 2), (5, 3), (5, 4)] {
            grid.set_barrier(p(r, c)).unwrap();
        }
        grid.refresh_all_neighbors();
        let astar = AstarSolver::new()
            .search(&mut grid, p(0, 0), p(6, 6), &mut NoopObserver)
            .unwrap();
        let dijkstra = AstarSolver::dijkstra()
            .search(&mut grid, p(0, 0), p(6, 6), &mut NoopObserver)
            .unwrap();
        assert_eq!(astar.path_length(), dijkstra.path_length());
    }
}
