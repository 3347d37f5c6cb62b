use std::collections::VecDeque;
use std::time::Duration;

use futures::{FutureExt, Stream, StreamExt, stream};
use tracing::{debug, info};

use crate::entry::{PendingEntry, ScanBatch, ScanEvent, ScanTotals};
use crate::slice::{TimeBox, yield_now};
use crate::tree::{Tree, add_entry};

/// Reported after every slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestProgress {
    pub processed: usize,
    pub total_queued: usize,
}

/// Result of one [`IngestionScheduler::run_step`] slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Entries remain; run another slice after yielding.
    Pending(IngestProgress),
    /// The queue is drained.
    Complete(IngestProgress),
    /// A newer scan session replaced this tree. The queue has been dropped.
    Stale,
}

/// Drains queued entries into a tree without hogging the runtime.
///
/// The scheduler owns the tree under construction, so nothing else can touch
/// it until ingestion hands it back.
#[derive(Debug)]
pub struct IngestionScheduler {
    tree: Tree,
    queue: VecDeque<PendingEntry>,
    processed: usize,
    total_queued: usize,
    totals: ScanTotals,
    budget: Duration,
}

impl IngestionScheduler {
    pub fn new(tree: Tree, budget: Duration) -> Self {
        Self {
            tree,
            queue: VecDeque::new(),
            processed: 0,
            total_queued: 0,
            totals: ScanTotals::default(),
            budget,
        }
    }

    pub fn enqueue(&mut self, batch: ScanBatch) {
        self.totals = batch.totals;
        self.enqueue_entries(batch.entries);
    }

    pub fn enqueue_entries(&mut self, entries: impl IntoIterator<Item = PendingEntry>) {
        let before = self.queue.len();
        self.queue.extend(entries);
        let added = self.queue.len() - before;
        self.total_queued += added;
        debug!("Queued {} entries, {} pending", added, self.queue.len());
    }

    /// True while entries are waiting to be placed.
    pub fn is_running(&self) -> bool {
        !self.queue.is_empty()
    }

    pub fn progress(&self) -> IngestProgress {
        IngestProgress {
            processed: self.processed,
            total_queued: self.total_queued,
        }
    }

    /// Latest counters the scanner reported.
    pub fn scan_totals(&self) -> ScanTotals {
        self.totals
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn into_tree(self) -> Tree {
        self.tree
    }

    /// Runs a single slice: places entries from the front of the queue until
    /// it is empty or the slice budget is spent.
    pub fn run_step(&mut self) -> StepOutcome {
        if self.tree.is_abandoned() {
            debug!(
                "Dropping {} queued entries for abandoned scan of {}",
                self.queue.len(),
                self.tree.root_path().display()
            );
            self.queue.clear();
            return StepOutcome::Stale;
        }

        let slice = TimeBox::start(self.budget);
        while let Some(entry) = self.queue.pop_front() {
            add_entry(&mut self.tree, &entry);
            self.processed += 1;
            if slice.is_exhausted() {
                break;
            }
        }

        let progress = self.progress();
        if self.queue.is_empty() {
            StepOutcome::Complete(progress)
        } else {
            StepOutcome::Pending(progress)
        }
    }

    /// Ingests everything already queued.
    pub async fn drain<F>(self, on_progress: F) -> Option<Tree>
    where
        F: FnMut(IngestProgress),
    {
        self.run(stream::empty(), on_progress).await
    }

    /// Consumes scanner events until the scan completes and the queue is empty.
    ///
    /// Batches that arrive while slices are running are picked up between
    /// slices. Returns the finished tree, or `None` if a newer scan session
    /// superseded this one along the way.
    pub async fn run<S, F>(mut self, events: S, mut on_progress: F) -> Option<Tree>
    where
        S: Stream<Item = ScanEvent> + Unpin,
        F: FnMut(IngestProgress),
    {
        let mut events = events.fuse();
        let mut scan_complete = false;

        loop {
            if self.queue.is_empty() && !scan_complete {
                match events.next().await {
                    Some(event) => self.accept(event, &mut scan_complete),
                    None => scan_complete = true,
                }
            }
            while !scan_complete {
                match events.next().now_or_never() {
                    Some(Some(event)) => self.accept(event, &mut scan_complete),
                    Some(None) => scan_complete = true,
                    None => break,
                }
            }

            match self.run_step() {
                StepOutcome::Stale => return None,
                StepOutcome::Pending(progress) => {
                    on_progress(progress);
                    yield_now().await;
                }
                StepOutcome::Complete(progress) => {
                    on_progress(progress);
                    if scan_complete {
                        info!(
                            "Ingested {} entries under {}",
                            progress.processed,
                            self.tree.root_path().display()
                        );
                        return Some(self.tree);
                    }
                }
            }
        }
    }

    fn accept(&mut self, event: ScanEvent, scan_complete: &mut bool) {
        match event {
            ScanEvent::Batch(batch) => self.enqueue(batch),
            ScanEvent::Complete(totals) => {
                debug!(
                    "Scanner finished: {} files, {} folders",
                    totals.files_scanned, totals.dirs_scanned
                );
                self.totals = totals;
                *scan_complete = true;
            }
        }
    }
}
