use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;

use tracing::{debug, info, warn};

use crate::config::IndexConfig;
use crate::export::{FileRows, file_rows};
use crate::generation::GenerationTracker;
use crate::ingest::IngestionScheduler;
use crate::search::{SearchHit, SearchProgress, SearchSession};
use crate::stats::{AggregateProgress, FolderStats, stats_direct, stats_recursive};
use crate::tree::{Node, Tree};

/// Everything one tree view needs: the current tree, the scan-session
/// generation and the search generation.
///
/// Only one tree is live at a time. Starting a scan abandons the previous tree
/// together with any ingestion, aggregation or search still working on it.
#[derive(Debug)]
pub struct IndexSession {
    config: IndexConfig,
    scans: GenerationTracker,
    searches: SearchSession,
    current: Option<Rc<Tree>>,
}

impl Default for IndexSession {
    fn default() -> Self {
        Self::new(IndexConfig::default())
    }
}

impl IndexSession {
    pub fn new(config: IndexConfig) -> Self {
        let searches = SearchSession::new(config.slice_budget, config.search_progress_interval);
        Self {
            config,
            scans: GenerationTracker::new(),
            searches,
            current: None,
        }
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    /// Starts a new scan session rooted at `root`.
    ///
    /// Feed the returned scheduler with scanner output, then hand the finished
    /// tree to [`IndexSession::install`].
    pub fn begin_scan(&mut self, root: impl Into<PathBuf>) -> IngestionScheduler {
        let token = self.scans.advance();
        self.searches.cancel();
        self.current = None;

        let tree = Tree::new(root, token);
        info!(
            "Starting scan session #{} for {}",
            tree.generation().generation(),
            tree.root_path().display()
        );
        IngestionScheduler::new(tree, self.config.slice_budget)
    }

    /// Publishes a finished tree. Trees from superseded sessions are refused.
    pub fn install(&mut self, tree: Tree) -> bool {
        if tree.is_abandoned() {
            warn!(
                "Refusing tree of abandoned scan session for {}",
                tree.root_path().display()
            );
            return false;
        }
        debug!("Installed tree with {} nodes", tree.node_count());
        self.current = Some(Rc::new(tree));
        true
    }

    pub fn tree(&self) -> Option<&Rc<Tree>> {
        self.current.as_ref()
    }

    /// Node at `rel_path` in the current tree.
    pub fn node(&self, rel_path: &str) -> Option<&Node> {
        self.current.as_deref()?.find(rel_path)
    }

    pub fn stats_direct(&self, rel_path: &str) -> Option<FolderStats> {
        self.node(rel_path).map(stats_direct)
    }

    /// Subtree statistics for the folder at `rel_path`.
    ///
    /// Resolves to `None` if the path does not exist or a new scan starts
    /// before the traversal finishes.
    pub fn stats_recursive<F>(
        &self,
        rel_path: &str,
        on_progress: F,
    ) -> impl Future<Output = Option<FolderStats>> + use<F>
    where
        F: FnMut(AggregateProgress) + 'static,
    {
        let tree = self.current.clone();
        let rel_path = rel_path.to_string();
        let budget = self.config.slice_budget;

        async move {
            let tree = tree?;
            let folder = tree.find(&rel_path)?;
            stats_recursive(folder, tree.generation(), budget, on_progress).await
        }
    }

    /// Searches the current tree; see [`SearchSession::search`].
    pub fn search<F>(
        &self,
        query: &str,
        on_progress: F,
    ) -> impl Future<Output = Option<Vec<SearchHit>>> + use<F>
    where
        F: FnMut(SearchProgress) + 'static,
    {
        self.searches
            .search(self.current.clone(), query, on_progress)
    }

    /// Rows for every file below the node at `rel_path`.
    pub fn export_rows(&self, rel_path: &str) -> Option<FileRows<'_>> {
        self.node(rel_path).map(file_rows)
    }
}
