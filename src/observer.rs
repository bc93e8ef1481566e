use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::grid::Grid;

/// Hook called by a running search after every expansion and every path-marking step. It only
/// sees the grid by shared reference and cannot alter the search. An abort request is reported
/// through [is_cancelled](Self::is_cancelled), which the search polls once per iteration.
pub trait SearchObserver {
    fn on_step(&mut self, grid: &Grid);

    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<F> SearchObserver for F
where
    F: FnMut(&Grid),
{
    fn on_step(&mut self, grid: &Grid) {
        self(grid)
    }
}

/// Observer for headless runs.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl SearchObserver for NoopObserver {
    fn on_step(&mut self, _: &Grid) {}
}

/// Shared abort flag, cloned into whichever part of the program receives the quit request.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> CancelToken {
        CancelToken::default()
    }
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Pairs an observer with a [CancelToken].
#[derive(Debug)]
pub struct Cancellable<O> {
    pub observer: O,
    pub token: CancelToken,
}

impl<O: SearchObserver> Cancellable<O> {
    pub fn new(observer: O, token: CancelToken) -> Cancellable<O> {
        Cancellable { observer, token }
    }
}

impl<O: SearchObserver> SearchObserver for Cancellable<O> {
    fn on_step(&mut self, grid: &Grid) {
        self.observer.on_step(grid)
    }
    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.observer.is_cancelled()
    }
}
