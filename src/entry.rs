//! Entries reported by the external scanner.

use std::path::PathBuf;
use std::str::FromStr;

use derive_more::Display;
use snafu::Snafu;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum EntryKind {
    #[display("folder")]
    Folder,
    #[display("file")]
    File,
}

impl FromStr for EntryKind {
    type Err = UnknownEntryKind;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        match kind {
            "folder" => Ok(EntryKind::Folder),
            "file" => Ok(EntryKind::File),
            other => UnknownEntryKindSnafu { kind: other }.fail(),
        }
    }
}

#[derive(Debug, Snafu)]
#[snafu(display("Unknown entry kind '{}', expected 'file' or 'folder'", kind))]
pub struct UnknownEntryKind {
    kind: String,
}

/// One filesystem object waiting to be placed in the tree.
///
/// Only `rel_path` decides where the node ends up. It is relative to the scan
/// root and may use either `/` or `\` as separator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingEntry {
    pub kind: EntryKind,
    pub full_path: PathBuf,
    pub rel_path: String,
    pub size: Option<u64>,
    pub modified_at_ms: Option<u64>,
}

impl PendingEntry {
    pub fn folder(full_path: impl Into<PathBuf>, rel_path: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Folder,
            full_path: full_path.into(),
            rel_path: rel_path.into(),
            size: None,
            modified_at_ms: None,
        }
    }

    pub fn file(
        full_path: impl Into<PathBuf>,
        rel_path: impl Into<String>,
        size: Option<u64>,
        modified_at_ms: Option<u64>,
    ) -> Self {
        Self {
            kind: EntryKind::File,
            full_path: full_path.into(),
            rel_path: rel_path.into(),
            size,
            modified_at_ms,
        }
    }

    /// Path segments of `rel_path`, or `None` when the path is unusable.
    pub fn segments(&self) -> Option<Vec<&str>> {
        rel_segments(&self.rel_path).filter(|segments| !segments.is_empty())
    }
}

/// Splits a relative path on either separator, dropping empty and `.` parts.
///
/// Returns `None` for paths that try to climb out with `..`.
pub fn rel_segments(rel_path: &str) -> Option<Vec<&str>> {
    let mut segments = Vec::new();
    for segment in rel_path.split(|c| c == '/' || c == '\\') {
        match segment {
            "" | "." => continue,
            ".." => return None,
            _ => segments.push(segment),
        }
    }
    Some(segments)
}

/// Running counters reported by the scanner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanTotals {
    pub files_scanned: u64,
    pub dirs_scanned: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBatch {
    pub entries: Vec<PendingEntry>,
    pub totals: ScanTotals,
}

/// What the scanner pushes to the indexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    Batch(ScanBatch),
    /// Terminal signal carrying the final totals.
    Complete(ScanTotals),
}
