//! Turns pending entries into tree mutations.
//!
//! Nothing here fails: entries that cannot be placed are dropped with a debug
//! log, since the scanner may legitimately hand over partial data.

use tracing::debug;

use crate::entry::{EntryKind, PendingEntry};
use crate::tree::{Node, Tree};

/// Walks down from the root, creating every missing folder on the way.
///
/// Sibling folders are interned by name, so repeated paths always resolve to
/// the same node no matter which entry mentioned them first. Returns `None`
/// only if a segment would have to descend into a file, which the tree never
/// produces on its own.
pub fn ensure_folder_path<'t, S: AsRef<str>>(
    tree: &'t mut Tree,
    segments: &[S],
) -> Option<&'t mut Node> {
    let mut folder = tree.root_mut();
    for segment in segments {
        folder = folder.intern_child_folder(segment.as_ref())?;
    }
    Some(folder)
}

/// Places one entry in the tree.
///
/// Folder entries only intern their path. File entries land under their
/// parent folder unless a file with the same name and full path is already
/// there, which makes re-ingesting an entry a no-op.
pub fn add_entry(tree: &mut Tree, entry: &PendingEntry) {
    let Some(segments) = entry.segments() else {
        debug!("Dropping entry with unusable relative path {:?}", entry.rel_path);
        return;
    };

    match entry.kind {
        EntryKind::Folder => {
            if ensure_folder_path(tree, &segments).is_none() {
                debug!("Could not intern folder path {:?}", entry.rel_path);
            }
        }
        EntryKind::File => {
            let Some((name, parents)) = segments.split_last() else {
                return;
            };
            let Some(parent) = ensure_folder_path(tree, parents) else {
                debug!("Could not find a parent folder for {:?}", entry.rel_path);
                return;
            };

            let full_path = parent.full_path().join(name);
            if full_path != entry.full_path {
                debug!(
                    "Scanner path {} differs from tree path {}",
                    entry.full_path.display(),
                    full_path.display()
                );
            }

            let Some(children) = parent.children_mut() else {
                return;
            };
            let already_present = children.iter().any(|child| {
                child.is_file() && child.name() == *name && child.full_path() == full_path
            });
            if !already_present {
                children.push(Node::file(
                    *name,
                    full_path,
                    entry.size,
                    entry.modified_at_ms,
                ));
            }
        }
    }
}
