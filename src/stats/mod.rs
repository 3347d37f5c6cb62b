//! Folder statistics over immediate children or whole subtrees.

mod aggregator;

pub use aggregator::{AggregateProgress, FolderStats, stats_direct, stats_recursive};
