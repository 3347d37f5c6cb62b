//! In-memory directory hierarchy built from scanner entries.
//!
//! The tree is created once per scan session, only grows while entries are
//! being ingested, and is treated as read-only afterwards.

mod builder;
mod node;
mod order;
mod walk;

use std::path::{Path, PathBuf};

pub use builder::{add_entry, ensure_folder_path};
pub use node::{Node, NodeKind};
pub use order::SortOrder;
pub use walk::Walk;

use crate::entry::rel_segments;
use crate::generation::GenerationToken;

#[derive(Debug, Clone)]
pub struct Tree {
    root: Node,
    generation: GenerationToken,
}

impl Tree {
    /// Creates an empty tree rooted at the scanned directory.
    pub fn new(root_path: impl Into<PathBuf>, generation: GenerationToken) -> Self {
        let root_path = root_path.into();
        let name = root_path
            .file_name()
            .map(|name| name.to_string_lossy().to_string())
            .unwrap_or_else(|| root_path.to_string_lossy().to_string());

        Self {
            root: Node::folder(name, root_path),
            generation,
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub fn root_path(&self) -> &Path {
        self.root.full_path()
    }

    /// Token of the scan session this tree belongs to.
    pub fn generation(&self) -> &GenerationToken {
        &self.generation
    }

    /// Whether a newer scan session has replaced this tree.
    pub fn is_abandoned(&self) -> bool {
        !self.generation.is_current()
    }

    /// Number of nodes, the root included.
    pub fn node_count(&self) -> usize {
        self.root.walk().count()
    }

    /// Resolves a path relative to the root. An empty path is the root itself.
    pub fn find(&self, rel_path: &str) -> Option<&Node> {
        let segments = rel_segments(rel_path)?;
        let Some((last, parents)) = segments.split_last() else {
            return Some(&self.root);
        };

        parents
            .iter()
            .try_fold(&self.root, |folder, segment| folder.find_child_folder(segment))?
            .find_child(last)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::PendingEntry;
    use crate::generation::GenerationTracker;

    fn docs_tree() -> Tree {
        let mut tree = Tree::new("/scan", GenerationToken::detached());
        add_entry(
            &mut tree,
            &PendingEntry::file("/scan/docs/a.txt", "docs/a.txt", Some(10), None),
        );
        tree
    }

    #[test]
    fn root_takes_the_directory_name() {
        let tree = Tree::new("/scan/project", GenerationToken::detached());
        assert_eq!(tree.root().name(), "project");
        assert_eq!(tree.root_path(), Path::new("/scan/project"));
        assert!(tree.root().is_folder());
    }

    #[test]
    fn filesystem_root_keeps_its_full_path_as_name() {
        let tree = Tree::new("/", GenerationToken::detached());
        assert_eq!(tree.root().name(), "/");
    }

    #[test]
    fn find_resolves_relative_paths() {
        let tree = docs_tree();
        assert_eq!(tree.find("").unwrap().name(), "scan");
        assert_eq!(tree.find("docs").unwrap().name(), "docs");
        assert_eq!(tree.find("docs\\a.txt").unwrap().size(), Some(10));
        assert!(tree.find("docs/missing").is_none());
        assert!(tree.find("docs/a.txt/deeper").is_none());
    }

    #[test]
    fn node_count_includes_root() {
        assert_eq!(docs_tree().node_count(), 3);
    }

    #[test]
    fn new_generation_abandons_tree() {
        let tracker = GenerationTracker::new();
        let tree = Tree::new("/scan", tracker.advance());
        assert!(!tree.is_abandoned());
        let _ = tracker.advance();
        assert!(tree.is_abandoned());
    }
}
