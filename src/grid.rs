use core::fmt;

use grid_util::point::Point;
use log::{debug, info};
use petgraph::unionfind::UnionFind;
use smallvec::SmallVec;

use crate::cell::{Cell, Role};
use crate::error::{GridError, Result};
use crate::N_SMALLVEC_SIZE;

/// A rectangular arrangement of [Cell]s. Points use `x` for the row and `y` for the column.
///
/// Besides the cells the grid tracks the designated start and end and maintains connected
/// components of free cells in a [UnionFind] structure, which answers reachability queries
/// without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cell_size: u32,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    pub components: UnionFind<usize>,
    pub components_dirty: bool,
}

impl Grid {
    /// A `rows` x `cols` grid of free cells with unit display size.
    ///
    /// # Panics
    ///
    /// If either dimension exceeds `i32::MAX`, the range of a [Point] coordinate.
    pub fn new(rows: usize, cols: usize) -> Grid {
        Grid::with_cell_size(rows, cols, 1)
    }

    /// A square `rows` x `rows` grid filling `pixel_width` pixels, each cell being
    /// `pixel_width / rows` pixels wide.
    pub fn build(rows: usize, pixel_width: u32) -> Grid {
        let cell_size = match u32::try_from(rows) {
            Ok(0) | Err(_) => 0,
            Ok(rows) => pixel_width / rows,
        };
        Grid::with_cell_size(rows, rows, cell_size)
    }

    fn with_cell_size(rows: usize, cols: usize, cell_size: u32) -> Grid {
        assert!(
            rows <= i32::MAX as usize && cols <= i32::MAX as usize,
            "{}x{} grid does not fit i32 coordinates",
            rows,
            cols
        );
        let cells = (0..rows)
            .flat_map(|r| (0..cols).map(move |c| (r, c)))
            .map(|(r, c)| Cell::new(Point::new(r as i32, c as i32), cell_size))
            .collect();
        let mut grid = Grid {
            rows,
            cols,
            cell_size,
            cells,
            start: None,
            end: None,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }
    pub fn cols(&self) -> usize {
        self.cols
    }
    pub fn cell_size(&self) -> u32 {
        self.cell_size
    }
    pub fn start(&self) -> Option<Point> {
        self.start
    }
    pub fn end(&self) -> Option<Point> {
        self.end
    }
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.rows
            && (point.y as usize) < self.cols
    }

    fn ix(&self, point: Point) -> Option<usize> {
        self.in_bounds(point)
            .then(|| point.x as usize * self.cols + point.y as usize)
    }

    /// Index of an in-bounds point or [GridError::InvalidCoordinate].
    pub(crate) fn checked_ix(&self, point: Point) -> Result<usize> {
        self.ix(point).ok_or(GridError::InvalidCoordinate {
            point,
            rows: self.rows,
            cols: self.cols,
        })
    }

    pub fn cell(&self, point: Point) -> Result<&Cell> {
        let ix = self.checked_ix(point)?;
        Ok(&self.cells[ix])
    }

    pub(crate) fn cell_mut(&mut self, point: Point) -> Result<&mut Cell> {
        let ix = self.checked_ix(point)?;
        Ok(&mut self.cells[ix])
    }

    pub fn is_free(&self, point: Point) -> bool {
        self.ix(point).is_some_and(|ix| !self.cells[ix].is_barrier())
    }

    /// The in-bounds, free cells orthogonally adjacent to `point` in the order down, up, right,
    /// left. Derived from the current barrier layout, unlike [Cell::neighbors].
    pub fn neighbors_of(&self, point: Point) -> SmallVec<[Point; N_SMALLVEC_SIZE]> {
        [
            Point::new(point.x + 1, point.y),
            Point::new(point.x - 1, point.y),
            Point::new(point.x, point.y + 1),
            Point::new(point.x, point.y - 1),
        ]
        .into_iter()
        .filter(|p| self.is_free(*p))
        .collect()
    }

    /// Stores the current neighbours of `point` in its cell.
    pub fn refresh_neighbors(&mut self, point: Point) -> Result<()> {
        let neighbors = self.neighbors_of(point);
        self.cell_mut(point)?.set_neighbors(neighbors);
        Ok(())
    }

    /// Recomputes every stored neighbour list. Must be called after barrier edits and before a
    /// search: the engine trusts the stored lists and a stale layout silently yields paths over
    /// the old layout.
    pub fn refresh_all_neighbors(&mut self) {
        for ix in 0..self.cells.len() {
            let neighbors = self.neighbors_of(self.cells[ix].position());
            self.cells[ix].set_neighbors(neighbors);
        }
    }

    /// Refreshes the stored neighbours of `point` and of its four orthogonal neighbours, which is
    /// all a passability change at `point` can affect.
    pub fn refresh_around(&mut self, point: Point) -> Result<()> {
        self.checked_ix(point)?;
        for p in [
            point,
            Point::new(point.x + 1, point.y),
            Point::new(point.x - 1, point.y),
            Point::new(point.x, point.y + 1),
            Point::new(point.x, point.y - 1),
        ] {
            if self.in_bounds(p) {
                self.refresh_neighbors(p)?;
            }
        }
        Ok(())
    }

    /// Makes `point` impassable. A start or end placed there loses its designation.
    pub fn set_barrier(&mut self, point: Point) -> Result<()> {
        let ix = self.checked_ix(point)?;
        self.drop_designation(point);
        let cell = &mut self.cells[ix];
        if !cell.is_barrier() {
            self.components_dirty = true;
        }
        cell.reset();
        cell.set_barrier(true);
        Ok(())
    }

    /// Designates `point` as the start. The previous start returns to unvisited; if `point` was
    /// the end or a barrier it stops being one.
    pub fn set_start(&mut self, point: Point) -> Result<()> {
        self.designate(point, Role::Start)
    }

    /// Designates `point` as the end, with the same rules as [set_start](Self::set_start).
    pub fn set_end(&mut self, point: Point) -> Result<()> {
        self.designate(point, Role::End)
    }

    fn designate(&mut self, point: Point, role: Role) -> Result<()> {
        self.checked_ix(point)?;
        let previous = match role {
            Role::Start => self.start,
            _ => self.end,
        };
        if let Some(previous) = previous.filter(|p| *p != point) {
            self.cell_mut(previous)?.reset();
        }
        self.drop_designation(point);
        self.free(point)?;
        self.cell_mut(point)?.set_role(role);
        match role {
            Role::Start => self.start = Some(point),
            _ => self.end = Some(point),
        }
        debug!("{:?} designated at {}", role, point);
        Ok(())
    }

    /// Returns `point` to a free, unvisited cell, dropping any start or end designation.
    pub fn reset_cell(&mut self, point: Point) -> Result<()> {
        self.checked_ix(point)?;
        self.drop_designation(point);
        self.free(point)
    }

    fn drop_designation(&mut self, point: Point) {
        if self.start == Some(point) {
            self.start = None;
        }
        if self.end == Some(point) {
            self.end = None;
        }
    }

    /// Clears barrier and role of `point`, joining it with the components of its neighbours.
    fn free(&mut self, point: Point) -> Result<()> {
        let ix = self.checked_ix(point)?;
        self.cells[ix].reset();
        for n in self.neighbors_of(point) {
            if let Some(n_ix) = self.ix(n) {
                self.components.union(ix, n_ix);
            }
        }
        Ok(())
    }

    /// Returns cells touched by a search to unvisited and restores the start and end roles.
    /// Barriers and designations are kept.
    pub fn clear_search(&mut self) {
        for cell in self.cells.iter_mut() {
            if cell.role().is_transient() {
                cell.set_role(Role::Unvisited);
            }
        }
        for (point, role) in [(self.start, Role::Start), (self.end, Role::End)] {
            if let Some(ix) = point.and_then(|p| self.ix(p)) {
                self.cells[ix].set_role(role);
            }
        }
    }

    /// Resets every cell and forgets both endpoints.
    pub fn clear(&mut self) {
        info!("Clearing {}x{} grid", self.rows, self.cols);
        for cell in self.cells.iter_mut() {
            cell.reset();
        }
        self.start = None;
        self.end = None;
        self.generate_components();
    }

    /// Checks if start and goal are on the same component.
    pub fn reachable(&self, start: &Point, goal: &Point) -> bool {
        !self.unreachable(start, goal)
    }

    /// Checks if start and goal are not on the same component. Components must be up to date,
    /// see [update](Self::update).
    pub fn unreachable(&self, start: &Point, goal: &Point) -> bool {
        match (self.ix(*start), self.ix(*goal)) {
            (Some(start_ix), Some(goal_ix)) => !self.components.equiv(start_ix, goal_ix),
            _ => true,
        }
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up free 4-neighbours to the same
    /// components.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.cells.len());
        self.components_dirty = false;
        for ix in 0..self.cells.len() {
            if self.cells[ix].is_barrier() {
                continue;
            }
            let point = self.cells[ix].position();
            // Down and right suffice, the other two are covered from the opposite side.
            for n in [
                Point::new(point.x + 1, point.y),
                Point::new(point.x, point.y + 1),
            ] {
                if self.is_free(n) {
                    if let Some(n_ix) = self.ix(n) {
                        self.components.union(ix, n_ix);
                    }
                }
            }
        }
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line = row
                .iter()
                .map(|cell| if cell.is_barrier() { '#' } else { cell.role().glyph() })
                .collect::<String>();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
