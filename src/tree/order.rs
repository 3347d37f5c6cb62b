use std::cmp::Ordering;

use clap::ValueEnum;

use crate::tree::Node;

/// Display order for a folder's children.
///
/// Child order inside the tree carries no meaning, so presentation code sorts
/// a borrowed view instead of the tree itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SortOrder {
    /// Alphabetical, case-insensitive.
    #[default]
    Name,
    /// Largest first.
    Size,
    /// Newest first.
    Modified,
}

impl SortOrder {
    fn compare(self, a: &Node, b: &Node) -> Ordering {
        match self {
            SortOrder::Name => a.name().to_lowercase().cmp(&b.name().to_lowercase()),
            SortOrder::Size => b.size().cmp(&a.size()),
            SortOrder::Modified => b.modified_at_ms().cmp(&a.modified_at_ms()),
        }
    }
}

impl Node {
    /// Children sorted for display, optionally with folders ahead of files.
    pub fn sorted_children(&self, order: SortOrder, folders_first: bool) -> Vec<&Node> {
        let mut children = self
            .children()
            .map(|children| children.iter().collect::<Vec<_>>())
            .unwrap_or_default();

        children.sort_by(|a, b| {
            let folders = if folders_first {
                b.is_folder().cmp(&a.is_folder())
            } else {
                Ordering::Equal
            };
            folders
                .then_with(|| order.compare(a, b))
                .then_with(|| a.name().cmp(b.name()))
        });
        children
    }
}
