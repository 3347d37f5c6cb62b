//! Directory walker that feeds the indexer.
//!
//! This is the producer side: it runs on its own OS thread and pushes
//! [`ScanEvent`](dirdex::entry::ScanEvent)s over a channel. The index itself
//! never touches the disk.

mod walker;

pub use walker::{ScannerError, spawn_scan};
