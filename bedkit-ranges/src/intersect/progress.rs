use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

///
/// Receives advisory progress from a long intersection: `done` of `total` chromosome
/// groups are finished. Called once per group.
///
pub trait Progress {
    fn update(&mut self, done: usize, total: usize);

    /// Called once after the last group.
    fn finish(&mut self) {}
}

/// Discards all updates.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn update(&mut self, _done: usize, _total: usize) {}
}

impl<F> Progress for F
where
    F: FnMut(usize, usize),
{
    fn update(&mut self, done: usize, total: usize) {
        self(done, total)
    }
}

///
/// A cloneable flag that asks a running intersection to stop. It is checked between
/// chromosome groups, so a group that already started runs to completion.
///
#[derive(Clone, Debug, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
