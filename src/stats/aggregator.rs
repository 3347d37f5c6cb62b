use std::time::Duration;

use derive_more::{Add, AddAssign};
use tracing::debug;

use crate::generation::GenerationToken;
use crate::slice::{TimeBox, yield_now};
use crate::tree::{Node, NodeKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Add, AddAssign)]
pub struct FolderStats {
    pub folder_count: u64,
    pub file_count: u64,
    /// Files without a known size count as zero bytes.
    pub total_size_bytes: u64,
}

impl FolderStats {
    fn count(&mut self, node: &Node) {
        match node.kind() {
            NodeKind::Folder { .. } => self.folder_count += 1,
            NodeKind::File { size, .. } => {
                self.file_count += 1;
                self.total_size_bytes += size.unwrap_or(0);
            }
        }
    }
}

/// Snapshot sent between slices of [`stats_recursive`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateProgress {
    pub stats: FolderStats,
    pub processed: usize,
    /// Nodes discovered but not yet visited.
    pub remaining: usize,
    /// `processed / (processed + remaining)`, or 0 before anything is known.
    ///
    /// This is only a rough indicator. The subtree size is not known up front
    /// and `remaining` grows as folders are opened, so the ratio can move
    /// backwards and is not a completion percentage.
    pub progress_ratio: f64,
}

impl AggregateProgress {
    fn new(stats: FolderStats, processed: usize, remaining: usize) -> Self {
        let seen = processed + remaining;
        let progress_ratio = if seen == 0 {
            0.0
        } else {
            processed as f64 / seen as f64
        };
        Self {
            stats,
            processed,
            remaining,
            progress_ratio,
        }
    }
}

/// Statistics over a folder's immediate children only.
pub fn stats_direct(folder: &Node) -> FolderStats {
    folder
        .children()
        .unwrap_or_default()
        .iter()
        .fold(FolderStats::default(), |mut stats, child| {
            stats.count(child);
            stats
        })
}

/// Statistics over the folder's whole subtree, excluding the folder itself.
///
/// Runs as a sequence of time-boxed slices over an explicit stack, reporting
/// progress after each slice. Returns `None` when `token` is superseded before
/// the traversal finishes, in which case nothing further is reported.
pub async fn stats_recursive<F>(
    folder: &Node,
    token: &GenerationToken,
    budget: Duration,
    mut on_progress: F,
) -> Option<FolderStats>
where
    F: FnMut(AggregateProgress),
{
    let mut stack = folder
        .children()
        .map(|children| children.iter().collect::<Vec<_>>())
        .unwrap_or_default();
    let mut stats = FolderStats::default();
    let mut processed = 0;

    while !stack.is_empty() {
        if !token.is_current() {
            debug!(
                "Abandoning aggregation of {} after {} nodes",
                folder.full_path().display(),
                processed
            );
            return None;
        }

        let slice = TimeBox::start(budget);
        while let Some(node) = stack.pop() {
            stats.count(node);
            if let Some(children) = node.children() {
                stack.extend(children.iter());
            }
            processed += 1;
            if slice.is_exhausted() {
                break;
            }
        }

        on_progress(AggregateProgress::new(stats, processed, stack.len()));
        if !stack.is_empty() {
            yield_now().await;
        }
    }

    Some(stats)
}
