//! Cancellable substring search over a finished tree.

mod engine;

pub use engine::{DEFAULT_PROGRESS_INTERVAL, SearchHit, SearchProgress, SearchSession};
