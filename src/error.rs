use grid_util::point::Point;
use thiserror::Error;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

/// Caller errors rejected before any cell is touched. Running out of frontier and being
/// cancelled are regular [SearchOutcome](crate::SearchOutcome)s, not errors.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum GridError {
    /// The coordinate lies outside a `rows` x `cols` grid.
    #[error("coordinate {point} is outside the {rows}x{cols} grid")]
    InvalidCoordinate {
        point: Point,
        rows: usize,
        cols: usize,
    },
    /// A search was requested on a grid that lacks a start and/or an end.
    #[error("search needs both endpoints (start set: {start}, end set: {end})")]
    MissingEndpoints { start: bool, end: bool },
}
