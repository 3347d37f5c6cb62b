use std::fs;
use std::path::{Path, PathBuf};
use std::thread;

use dirdex::entry::{EntryKind, PendingEntry, ScanBatch, ScanEvent, ScanTotals};
use futures_channel::mpsc::{self, UnboundedReceiver, UnboundedSender};
use snafu::{ResultExt, Snafu, ensure};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::ext::SystemTimeExt;

/// Starts walking `root` on a background thread.
///
/// Entries are sent in batches of at most `batch_size`, each carrying the
/// running totals, followed by a single [`ScanEvent::Complete`]. Entries that
/// cannot be read are skipped. Dropping the receiver stops the walk.
pub fn spawn_scan(
    root: &Path,
    batch_size: usize,
) -> Result<UnboundedReceiver<ScanEvent>, ScannerError> {
    let metadata = fs::metadata(root).context(RootSnafu {
        path: root.to_path_buf(),
    })?;
    ensure!(
        metadata.is_dir(),
        NotADirectorySnafu {
            path: root.to_path_buf()
        }
    );

    let batch_size = batch_size.max(1);
    let (sender, receiver) = mpsc::unbounded();
    let walker = Walker {
        sender,
        batch: Vec::with_capacity(batch_size),
        batch_size,
        totals: ScanTotals::default(),
    };
    let root = root.to_path_buf();
    thread::Builder::new()
        .name("dirdex-scanner".into())
        .spawn(move || walker.walk(root))
        .context(SpawnSnafu)?;

    Ok(receiver)
}

struct Walker {
    sender: UnboundedSender<ScanEvent>,
    batch: Vec<PendingEntry>,
    batch_size: usize,
    totals: ScanTotals,
}

impl Walker {
    fn walk(mut self, root: PathBuf) {
        info!("Scanning {}", root.display());

        for entry in WalkDir::new(&root).min_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            let Some(pending) = Self::describe(&root, &entry) else {
                continue;
            };
            match pending.kind {
                EntryKind::Folder => self.totals.dirs_scanned += 1,
                EntryKind::File => self.totals.files_scanned += 1,
            }

            if !self.push(pending) {
                debug!("Scan of {} abandoned by the receiver", root.display());
                return;
            }
        }

        if self.flush() {
            let _ = self.sender.unbounded_send(ScanEvent::Complete(self.totals));
        }
        debug!(
            "Scanner done: {} files, {} folders",
            self.totals.files_scanned, self.totals.dirs_scanned
        );
    }

    /// Symlinks are reported as files and never followed.
    fn describe(root: &Path, entry: &DirEntry) -> Option<PendingEntry> {
        let rel_path = match entry.path().strip_prefix(root) {
            Ok(rel) => rel
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/"),
            Err(e) => {
                debug!("Skipping {} outside the root: {}", entry.path().display(), e);
                return None;
            }
        };
        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(e) => {
                debug!("Skipping {}: {}", entry.path().display(), e);
                return None;
            }
        };

        if metadata.is_dir() {
            Some(PendingEntry::folder(entry.path(), rel_path))
        } else {
            Some(PendingEntry::file(
                entry.path(),
                rel_path,
                Some(metadata.len()),
                metadata.modified().ok().and_then(|t| t.to_epoch_millis()),
            ))
        }
    }

    /// Returns `false` once the receiver is gone.
    fn push(&mut self, entry: PendingEntry) -> bool {
        self.batch.push(entry);
        if self.batch.len() >= self.batch_size {
            return self.flush();
        }
        true
    }

    fn flush(&mut self) -> bool {
        if self.batch.is_empty() {
            return !self.sender.is_closed();
        }
        let batch = ScanBatch {
            entries: std::mem::replace(&mut self.batch, Vec::with_capacity(self.batch_size)),
            totals: self.totals,
        };
        self.sender.unbounded_send(ScanEvent::Batch(batch)).is_ok()
    }
}

#[derive(Debug, Snafu)]
pub enum ScannerError {
    #[snafu(display("Cannot access scan root {}", path.display()))]
    RootError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Scan root {} is not a directory", path.display()))]
    NotADirectory { path: PathBuf },
    #[snafu(display("Failed to start the scanner thread"))]
    SpawnError { source: std::io::Error },
}
