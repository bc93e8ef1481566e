use grid_util::point::Point;
use smallvec::SmallVec;

use crate::N_SMALLVEC_SIZE;

/// The part a [Cell] currently plays. Roles are pure state: how they look on screen is up to
/// whoever renders the grid (see the [Display](std::fmt::Display) impl of [Grid](crate::Grid)).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Role {
    #[default]
    Unvisited,
    /// Discovered and waiting in the frontier.
    Frontier,
    /// Expanded (closed).
    Visited,
    Start,
    End,
    /// Part of the reconstructed path.
    Path,
}

impl Role {
    /// Whether a cell holding this role may move to `next`.
    pub fn can_become(self, next: Role) -> bool {
        use Role::*;
        match (self, next) {
            (_, Unvisited | Start | End) => true,
            (Unvisited | Visited | End, Frontier) => true,
            (Frontier, Visited) => true,
            (Frontier | Visited | Start, Path) => true,
            _ => false,
        }
    }

    /// Roles written by a search run rather than by the caller.
    pub fn is_transient(self) -> bool {
        matches!(self, Role::Frontier | Role::Visited | Role::Path)
    }

    pub fn glyph(self) -> char {
        match self {
            Role::Unvisited => '.',
            Role::Frontier => 'o',
            Role::Visited => 'x',
            Role::Start => 'S',
            Role::End => 'E',
            Role::Path => '*',
        }
    }
}

/// A single grid position. Passability and role are independent: a barrier is excluded from
/// neighbour derivation whatever its role says.
#[derive(Clone, Debug)]
pub struct Cell {
    position: Point,
    size: u32,
    barrier: bool,
    role: Role,
    neighbors: SmallVec<[Point; N_SMALLVEC_SIZE]>,
}

impl Cell {
    pub fn new(position: Point, size: u32) -> Cell {
        Cell {
            position,
            size,
            barrier: false,
            role: Role::Unvisited,
            neighbors: SmallVec::new(),
        }
    }
    pub fn position(&self) -> Point {
        self.position
    }
    /// Display size in pixels, only meaningful to a renderer.
    pub fn size(&self) -> u32 {
        self.size
    }
    pub fn role(&self) -> Role {
        self.role
    }
    pub fn is_barrier(&self) -> bool {
        self.barrier
    }
    pub fn is_start(&self) -> bool {
        self.role == Role::Start
    }
    pub fn is_end(&self) -> bool {
        self.role == Role::End
    }
    pub fn is_open(&self) -> bool {
        self.role == Role::Frontier
    }
    pub fn is_closed(&self) -> bool {
        self.role == Role::Visited
    }
    pub fn is_path(&self) -> bool {
        self.role == Role::Path
    }
    /// Neighbours as of the last refresh. These are not kept in sync with later barrier edits,
    /// see [Grid::refresh_all_neighbors](crate::Grid::refresh_all_neighbors).
    pub fn neighbors(&self) -> &[Point] {
        &self.neighbors
    }

    pub(crate) fn set_role(&mut self, role: Role) {
        debug_assert!(
            self.role.can_become(role),
            "illegal role transition {:?} -> {:?} at {}",
            self.role,
            role,
            self.position
        );
        self.role = role;
    }
    pub(crate) fn set_barrier(&mut self, barrier: bool) {
        self.barrier = barrier;
    }
    pub(crate) fn set_neighbors(&mut self, neighbors: SmallVec<[Point; N_SMALLVEC_SIZE]>) {
        self.neighbors = neighbors;
    }
    /// Back to a free, unvisited cell.
    pub(crate) fn reset(&mut self) {
        self.barrier = false;
        self.role = Role::Unvisited;
    }
}
