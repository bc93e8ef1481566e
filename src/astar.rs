//! The A* session: frontier, per-search cost tables and path reconstruction.
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use fxhash::{FxBuildHasher, FxHashSet};
use grid_util::point::Point;
use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::cell::Role;
use crate::error::Result;
use crate::grid::Grid;
use crate::heuristic::Heuristic;
use crate::observer::SearchObserver;
use crate::STEP_COST;

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// A pending frontier entry. Ordered so that the [BinaryHeap] pops the smallest estimated cost
/// first and, among equal estimates, the entry inserted first.
#[derive(Clone, Copy, Debug)]
pub struct FrontierEntry {
    pub estimated_cost: u32,
    pub sequence: u64,
    pub point: Point,
}

impl Eq for FrontierEntry {}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost == other.estimated_cost && self.sequence == other.sequence
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed on both keys: BinaryHeap is a max-heap.
        other
            .estimated_cost
            .cmp(&self.estimated_cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Result of a single [Search::step].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    /// The point was popped and its neighbours processed.
    Expanded(Point),
    /// The end was popped; the path can be reconstructed.
    Found,
    /// The frontier is empty and the end was never reached.
    Exhausted,
}

/// How a finished [Search::run] ended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SearchOutcome {
    /// `path` runs from start to end inclusive and `length` counts its steps.
    Found { path: Vec<Point>, length: u32 },
    NoPath,
    Cancelled,
}

impl SearchOutcome {
    pub fn found(&self) -> bool {
        matches!(self, SearchOutcome::Found { .. })
    }
    pub fn path_length(&self) -> Option<u32> {
        match self {
            SearchOutcome::Found { length, .. } => Some(*length),
            _ => None,
        }
    }
    pub fn path(&self) -> Option<&[Point]> {
        match self {
            SearchOutcome::Found { path, .. } => Some(path),
            _ => None,
        }
    }
}

/// One A* invocation over a borrowed [Grid]. The session owns the frontier, the cost tables and
/// the predecessor map, all of which die with it.
///
/// Expansion follows the neighbour lists stored in the cells, so the caller must run
/// [Grid::refresh_all_neighbors] after editing barriers and before creating the session.
pub struct Search<'g, H> {
    grid: &'g mut Grid,
    heuristic: H,
    start: Point,
    end: Point,
    frontier: BinaryHeap<FrontierEntry>,
    open: FxHashSet<Point>,
    g_cost: FxIndexMap<Point, u32>,
    f_cost: FxIndexMap<Point, u32>,
    came_from: FxIndexMap<Point, Point>,
    sequence: u64,
    expanded: usize,
    finished: Option<Step>,
}

impl<'g, H: Heuristic> Search<'g, H> {
    /// Prepares a search from `start` to `end`, designating both on the grid if they are not
    /// already and clearing roles left behind by an earlier run. An endpoint placed on a barrier
    /// frees it, and the stored neighbours around it are refreshed. Fails with
    /// [InvalidCoordinate](crate::GridError::InvalidCoordinate) before touching the grid if either
    /// endpoint is out of bounds.
    pub fn new(grid: &'g mut Grid, start: Point, end: Point, heuristic: H) -> Result<Self> {
        grid.checked_ix(start)?;
        grid.checked_ix(end)?;
        let freed = [start, end]
            .into_iter()
            .filter(|p| grid.cell(*p).is_ok_and(|cell| cell.is_barrier()))
            .collect::<Vec<_>>();
        if grid.start() != Some(start) {
            grid.set_start(start)?;
        }
        if grid.end() != Some(end) {
            grid.set_end(end)?;
        }
        for point in freed {
            debug!("Endpoint {} was a barrier, refreshing its neighbourhood", point);
            grid.refresh_around(point)?;
        }
        grid.clear_search();

        let h = heuristic.estimate(&start, &end);
        let mut g_cost = FxIndexMap::default();
        g_cost.insert(start, 0);
        let mut f_cost = FxIndexMap::default();
        f_cost.insert(start, h);
        let mut frontier = BinaryHeap::new();
        frontier.push(FrontierEntry {
            estimated_cost: h,
            sequence: 0,
            point: start,
        });
        let mut open = FxHashSet::default();
        open.insert(start);

        Ok(Search {
            grid,
            heuristic,
            start,
            end,
            frontier,
            open,
            g_cost,
            f_cost,
            came_from: FxIndexMap::default(),
            sequence: 0,
            expanded: 0,
            finished: None,
        })
    }

    pub fn grid(&self) -> &Grid {
        &*self.grid
    }
    /// Best known cost from the start, `None` standing for infinity.
    pub fn g_cost(&self, point: &Point) -> Option<u32> {
        self.g_cost.get(point).copied()
    }
    pub fn f_cost(&self, point: &Point) -> Option<u32> {
        self.f_cost.get(point).copied()
    }
    pub fn predecessor(&self, point: &Point) -> Option<Point> {
        self.came_from.get(point).copied()
    }
    pub fn in_frontier(&self, point: &Point) -> bool {
        self.open.contains(point)
    }
    /// Number of points expanded so far.
    pub fn expanded(&self) -> usize {
        self.expanded
    }

    /// Pops the best frontier entry and expands it. Once the end has been reached or the
    /// frontier has run dry, every further call returns that same terminal step.
    pub fn step(&mut self) -> Step {
        if let Some(finished) = self.finished {
            return finished;
        }
        let Some(FrontierEntry { point: current, .. }) = self.frontier.pop() else {
            self.finished = Some(Step::Exhausted);
            return Step::Exhausted;
        };
        self.open.remove(&current);
        if current == self.end {
            self.set_role(current, Role::End);
            self.finished = Some(Step::Found);
            return Step::Found;
        }

        let current_g = self.g_cost.get(&current).copied().unwrap_or(u32::MAX);
        let neighbors = match self.grid.cell(current) {
            Ok(cell) => cell.neighbors().to_vec(),
            Err(_) => Vec::new(),
        };
        for neighbor in neighbors {
            let candidate = current_g.saturating_add(STEP_COST);
            if self.g_cost.get(&neighbor).is_some_and(|&g| candidate >= g) {
                continue;
            }
            let f = candidate + self.heuristic.estimate(&neighbor, &self.end);
            self.came_from.insert(neighbor, current);
            self.g_cost.insert(neighbor, candidate);
            self.f_cost.insert(neighbor, f);
            if self.open.insert(neighbor) {
                self.sequence += 1;
                self.frontier.push(FrontierEntry {
                    estimated_cost: f,
                    sequence: self.sequence,
                    point: neighbor,
                });
                self.set_role(neighbor, Role::Frontier);
            }
        }

        if current != self.start {
            self.set_role(current, Role::Visited);
        }
        self.expanded += 1;
        debug!("Expanded {} (g = {})", current, current_g);
        Step::Expanded(current)
    }

    /// Expands until the end is reached, the frontier runs dry or the observer asks to stop.
    /// The observer runs after every expansion and after every cell marked as path.
    pub fn run<O: SearchObserver>(mut self, observer: &mut O) -> SearchOutcome {
        info!("Searching from {} to {}", self.start, self.end);
        loop {
            if observer.is_cancelled() {
                warn!(
                    "Search from {} to {} cancelled after {} expansions",
                    self.start, self.end, self.expanded
                );
                return SearchOutcome::Cancelled;
            }
            match self.step() {
                Step::Expanded(_) => observer.on_step(self.grid),
                Step::Found => {
                    let path = reconstruct_path(self.grid, &self.came_from, self.end, observer);
                    let length = (path.len() - 1) as u32;
                    info!(
                        "Found path of length {} after {} expansions",
                        length, self.expanded
                    );
                    return SearchOutcome::Found { path, length };
                }
                Step::Exhausted => {
                    info!(
                        "No path from {} to {} after {} expansions",
                        self.start, self.end, self.expanded
                    );
                    return SearchOutcome::NoPath;
                }
            }
        }
    }

    fn set_role(&mut self, point: Point, role: Role) {
        if let Ok(cell) = self.grid.cell_mut(point) {
            cell.set_role(role);
        }
    }
}

/// Walks the predecessor map back from `end`, marking each predecessor (the start included) as
/// path and notifying the observer after every mark. Returns the path from start to end.
pub fn reconstruct_path<O: SearchObserver>(
    grid: &mut Grid,
    came_from: &FxIndexMap<Point, Point>,
    end: Point,
    observer: &mut O,
) -> Vec<Point> {
    let mut path: Vec<Point> =
        std::iter::successors(Some(end), |point| came_from.get(point).copied()).collect();
    for point in path.iter().skip(1) {
        if let Ok(cell) = grid.cell_mut(*point) {
            cell.set_role(Role::Path);
        }
        observer.on_step(grid);
    }
    path.reverse();
    path
}
