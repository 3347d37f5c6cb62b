use std::path::{Path, PathBuf};

use crate::entry::EntryKind;
use crate::tree::walk::Walk;

/// One indexed filesystem object.
///
/// Folders own their children outright; there are no parent links. Anything
/// that needs to go upwards looks nodes up by path from the root instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    name: String,
    full_path: PathBuf,
    kind: NodeKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    Folder {
        children: Vec<Node>,
    },
    File {
        size: Option<u64>,
        modified_at_ms: Option<u64>,
    },
}

impl Node {
    pub(crate) fn folder(name: impl Into<String>, full_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            full_path,
            kind: NodeKind::Folder {
                children: Vec::new(),
            },
        }
    }

    pub(crate) fn file(
        name: impl Into<String>,
        full_path: PathBuf,
        size: Option<u64>,
        modified_at_ms: Option<u64>,
    ) -> Self {
        Self {
            name: name.into(),
            full_path,
            kind: NodeKind::File {
                size,
                modified_at_ms,
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_path(&self) -> &Path {
        &self.full_path
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn entry_kind(&self) -> EntryKind {
        match self.kind {
            NodeKind::Folder { .. } => EntryKind::Folder,
            NodeKind::File { .. } => EntryKind::File,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self.kind, NodeKind::Folder { .. })
    }

    pub fn is_file(&self) -> bool {
        matches!(self.kind, NodeKind::File { .. })
    }

    /// Children of a folder, `None` for files.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub(crate) fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.kind {
            NodeKind::Folder { children } => Some(children),
            NodeKind::File { .. } => None,
        }
    }

    pub fn size(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { size, .. } => size,
            NodeKind::Folder { .. } => None,
        }
    }

    pub fn modified_at_ms(&self) -> Option<u64> {
        match self.kind {
            NodeKind::File { modified_at_ms, .. } => modified_at_ms,
            NodeKind::Folder { .. } => None,
        }
    }

    /// First child called `name`, preferring folders.
    pub fn find_child(&self, name: &str) -> Option<&Node> {
        self.find_child_folder(name).or_else(|| {
            self.children()?
                .iter()
                .find(|child| child.name == name)
        })
    }

    pub fn find_child_folder(&self, name: &str) -> Option<&Node> {
        self.children()?
            .iter()
            .find(|child| child.is_folder() && child.name == name)
    }

    /// Looks up or creates the child folder called `name`.
    ///
    /// Returns `None` when called on a file.
    pub(crate) fn intern_child_folder(&mut self, name: &str) -> Option<&mut Node> {
        let child_path = self.full_path.join(name);
        let children = self.children_mut()?;
        let index = match children
            .iter()
            .position(|child| child.is_folder() && child.name == name)
        {
            Some(index) => index,
            None => {
                children.push(Node::folder(name, child_path));
                children.len() - 1
            }
        };
        Some(&mut children[index])
    }

    /// Pre-order walk over this node and everything below it.
    pub fn walk(&self) -> Walk<'_> {
        Walk::new(vec![self])
    }

    /// Like [`Node::walk`], but without the node itself.
    pub fn descendants(&self) -> Walk<'_> {
        Walk::new(self.children().map(|c| c.iter().collect()).unwrap_or_default())
    }

    /// Case-insensitive substring match against the name and the full path.
    ///
    /// `needle` must already be lowercase.
    pub fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self
                .full_path
                .to_string_lossy()
                .to_lowercase()
                .contains(needle)
    }
}

/// Tears subtrees down with an explicit stack so that dropping a deep tree
/// cannot overflow the thread stack.
impl Drop for Node {
    fn drop(&mut self) {
        let NodeKind::Folder { children } = &mut self.kind else {
            return;
        };
        let mut pending = std::mem::take(children);
        while let Some(mut node) = pending.pop() {
            if let NodeKind::Folder { children } = &mut node.kind {
                pending.append(children);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Node {
        let mut root = Node::folder("scan", PathBuf::from("/scan"));
        let docs = root.intern_child_folder("docs").unwrap();
        docs.children_mut().unwrap().push(Node::file(
            "A.txt",
            PathBuf::from("/scan/docs/A.txt"),
            Some(3),
            Some(7),
        ));
        root
    }

    #[test]
    fn interning_reuses_existing_folder() {
        let mut root = sample();
        let again = root.intern_child_folder("docs").unwrap();
        assert_eq!(again.children().unwrap().len(), 1);
        assert_eq!(root.children().unwrap().len(), 1);
    }

    #[test]
    fn interning_joins_full_path() {
        let mut root = sample();
        let created = root.intern_child_folder("music").unwrap();
        assert_eq!(created.full_path(), Path::new("/scan/music"));
        assert_eq!(created.name(), "music");
    }

    #[test]
    fn files_cannot_hold_children() {
        let mut file = Node::file("x", PathBuf::from("/x"), None, None);
        assert!(file.intern_child_folder("y").is_none());
        assert!(file.children().is_none());
    }

    #[test]
    fn file_accessors_expose_metadata() {
        let root = sample();
        let file = root.find_child("docs").unwrap().find_child("A.txt").unwrap();
        assert!(file.is_file());
        assert_eq!(file.size(), Some(3));
        assert_eq!(file.modified_at_ms(), Some(7));
        assert_eq!(file.entry_kind(), EntryKind::File);
    }

    #[test]
    fn match_ignores_case() {
        let root = sample();
        let file = root.find_child("docs").unwrap().find_child("A.txt").unwrap();
        assert!(file.matches("a.txt"));
        assert!(file.matches("/scan/docs"));
        assert!(!file.matches("b.txt"));
    }

    #[test]
    fn walk_includes_self_descendants_do_not() {
        let root = sample();
        assert_eq!(root.walk().count(), 3);
        assert_eq!(root.descendants().count(), 2);
    }
}
