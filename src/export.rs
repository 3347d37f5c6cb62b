//! Flat rows for reporting tools.

use std::path::Path;

use crate::entry::EntryKind;
use crate::tree::{Node, Walk};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportRow<'a> {
    pub name: &'a str,
    pub kind: EntryKind,
    pub full_path: &'a Path,
    pub size: Option<u64>,
    pub modified_at_ms: Option<u64>,
}

impl<'a> From<&'a Node> for ExportRow<'a> {
    fn from(node: &'a Node) -> Self {
        Self {
            name: node.name(),
            kind: node.entry_kind(),
            full_path: node.full_path(),
            size: node.size(),
            modified_at_ms: node.modified_at_ms(),
        }
    }
}

/// Every file anywhere below `folder`, in no particular order.
///
/// Runs synchronously in one go; meant for finished trees.
pub fn file_rows(folder: &Node) -> FileRows<'_> {
    FileRows {
        walk: folder.descendants(),
    }
}

#[derive(Debug, Clone)]
pub struct FileRows<'a> {
    walk: Walk<'a>,
}

impl<'a> Iterator for FileRows<'a> {
    type Item = ExportRow<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.walk.find(|node| node.is_file()).map(ExportRow::from)
    }
}
