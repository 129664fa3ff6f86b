use thiserror::Error;

#[derive(Error, Debug)]
pub enum IntersectError {
    #[error("Minimum overlap fraction must be within [0, 1], got {0}")]
    InvalidFraction(f64),

    #[error("Intersection cancelled after {done} of {total} chromosome groups")]
    Cancelled { done: usize, total: usize },

    #[error("Backend '{backend}' failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
