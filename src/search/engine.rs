use std::future::Future;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::entry::EntryKind;
use crate::generation::GenerationTracker;
use crate::slice::{DEFAULT_SLICE_BUDGET, TimeBox, yield_now};
use crate::tree::{Node, Tree};

pub const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub name: String,
    pub kind: EntryKind,
    pub full_path: PathBuf,
}

impl From<&Node> for SearchHit {
    fn from(node: &Node) -> Self {
        Self {
            name: node.name().to_string(),
            kind: node.entry_kind(),
            full_path: node.full_path().to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchProgress {
    /// Matches found so far.
    pub processed: usize,
    /// Nodes still on the traversal stack.
    pub remaining: usize,
}

/// Owns the search generation for one tree view.
///
/// Starting a search supersedes every search started earlier through the same
/// session (or any clone of it). Superseded searches notice at their next slice
/// boundary and finish with `None` without reporting anything else.
#[derive(Debug, Clone)]
pub struct SearchSession {
    generations: GenerationTracker,
    budget: Duration,
    progress_interval: Duration,
}

impl Default for SearchSession {
    fn default() -> Self {
        Self::new(DEFAULT_SLICE_BUDGET, DEFAULT_PROGRESS_INTERVAL)
    }
}

impl SearchSession {
    pub fn new(budget: Duration, progress_interval: Duration) -> Self {
        Self {
            generations: GenerationTracker::new(),
            budget,
            progress_interval,
        }
    }

    /// Cancels whatever search is in flight without starting a new one.
    pub fn cancel(&self) {
        let _ = self.generations.advance();
    }

    /// Case-insensitive substring search over every node's name and full path.
    ///
    /// The generation is claimed when this is called, not when the returned
    /// future is first polled, so calling it is itself the cancellation signal
    /// for older searches. An empty query or a missing tree resolves to an
    /// empty list right away and leaves running searches alone.
    ///
    /// Hits come back in traversal order, which is stack-pop order and neither
    /// alphabetical nor breadth-first. Sort the list for display.
    pub fn search<F>(
        &self,
        tree: Option<Rc<Tree>>,
        query: &str,
        mut on_progress: F,
    ) -> impl Future<Output = Option<Vec<SearchHit>>> + use<F>
    where
        F: FnMut(SearchProgress) + 'static,
    {
        let job = match tree {
            Some(tree) if !query.is_empty() => {
                Some((tree, query.to_lowercase(), self.generations.advance()))
            }
            _ => None,
        };
        let budget = self.budget;
        let progress_interval = self.progress_interval;

        async move {
            let Some((tree, needle, token)) = job else {
                return Some(Vec::new());
            };
            debug!("Search #{} for {:?} started", token.generation(), needle);

            let mut stack = vec![tree.root()];
            let mut results = Vec::new();
            let mut last_report: Option<Instant> = None;

            while !stack.is_empty() {
                if !token.is_current() {
                    debug!("Search #{} superseded", token.generation());
                    return None;
                }

                let slice = TimeBox::start(budget);
                while let Some(node) = stack.pop() {
                    if node.matches(&needle) {
                        results.push(SearchHit::from(node));
                    }
                    if let Some(children) = node.children() {
                        stack.extend(children.iter());
                    }
                    if slice.is_exhausted() {
                        break;
                    }
                }
                if stack.is_empty() {
                    break;
                }

                if last_report.is_none_or(|at| at.elapsed() >= progress_interval) {
                    on_progress(SearchProgress {
                        processed: results.len(),
                        remaining: stack.len(),
                    });
                    last_report = Some(Instant::now());
                }
                yield_now().await;
            }

            if !token.is_current() {
                return None;
            }
            debug!(
                "Search #{} finished with {} hits",
                token.generation(),
                results.len()
            );
            Some(results)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::path::Path;

    use super::*;
    use crate::entry::PendingEntry;
    use crate::generation::GenerationToken;
    use crate::tree::add_entry;

    fn build(entries: &[PendingEntry]) -> Rc<Tree> {
        let mut tree = Tree::new("/scan", GenerationToken::detached());
        for entry in entries {
            add_entry(&mut tree, entry);
        }
        Rc::new(tree)
    }

    fn file(rel_path: &str, size: u64) -> PendingEntry {
        PendingEntry::file(Path::new("/scan").join(rel_path), rel_path, Some(size), None)
    }

    fn docs_tree() -> Rc<Tree> {
        build(&[file("docs/a.txt", 10), file("docs/sub/b.txt", 20)])
    }

    fn large_tree() -> Rc<Tree> {
        build(
            &(0..200)
                .map(|i| file(&format!("d{}/e{}/item{}.log", i % 7, i % 3, i), 1))
                .collect::<Vec<_>>(),
        )
    }

    fn paths(hits: &[SearchHit]) -> Vec<&Path> {
        let mut paths = hits.iter().map(|hit| hit.full_path.as_path()).collect::<Vec<_>>();
        paths.sort();
        paths
    }

    #[compio::test]
    async fn finds_single_file_by_name() {
        let session = SearchSession::default();
        let hits = session
            .search(Some(docs_tree()), "a.txt", |_| {})
            .await
            .expect("search is current");

        assert_eq!(
            hits,
            vec![SearchHit {
                name: "a.txt".into(),
                kind: EntryKind::File,
                full_path: PathBuf::from("/scan/docs/a.txt"),
            }]
        );
    }

    #[compio::test]
    async fn matching_is_case_insensitive_on_name_and_path() {
        let session = SearchSession::default();
        let hits = session
            .search(Some(docs_tree()), "SUB", |_| {})
            .await
            .unwrap();

        assert_eq!(
            paths(&hits),
            vec![Path::new("/scan/docs/sub"), Path::new("/scan/docs/sub/b.txt")]
        );
    }

    #[compio::test]
    async fn root_takes_part_in_matching() {
        let session = SearchSession::default();
        let hits = session
            .search(Some(docs_tree()), "scan", |_| {})
            .await
            .unwrap();
        assert_eq!(hits.len(), 5);
    }

    #[compio::test]
    async fn empty_query_or_missing_tree_is_empty_result() {
        let session = SearchSession::default();
        assert_eq!(session.search(Some(docs_tree()), "", |_| {}).await, Some(vec![]));
        assert_eq!(session.search(None, "a", |_| {}).await, Some(vec![]));
    }

    #[compio::test]
    async fn empty_query_does_not_cancel_running_search() {
        let session = SearchSession::new(Duration::ZERO, Duration::ZERO);
        let mut running = Box::pin(session.search(Some(large_tree()), "item", |_| {}));
        assert!(futures::poll!(running.as_mut()).is_pending());

        let _ = session.search(Some(large_tree()), "", |_| {}).await;
        assert_eq!(running.await.map(|hits| hits.len()), Some(200));
    }

    #[compio::test]
    async fn slice_size_does_not_change_results() {
        let tree = large_tree();
        let sliced = SearchSession::new(Duration::ZERO, Duration::ZERO)
            .search(Some(tree.clone()), "item1", |_| {})
            .await
            .unwrap();
        let whole = SearchSession::new(Duration::from_secs(60), Duration::ZERO)
            .search(Some(tree), "item1", |_| {})
            .await
            .unwrap();

        assert_eq!(paths(&sliced), paths(&whole));
        // item1, item10..19, item100..199
        assert_eq!(whole.len(), 1 + 10 + 100);
    }

    #[compio::test]
    async fn newer_search_supersedes_older_one() {
        let session = SearchSession::new(Duration::ZERO, Duration::ZERO);
        let events = Rc::new(RefCell::new(Vec::new()));

        let log = events.clone();
        let mut first = Box::pin(session.search(Some(large_tree()), "item", move |_| {
            log.borrow_mut().push("first progress")
        }));
        assert!(futures::poll!(first.as_mut()).is_pending());
        assert!(futures::poll!(first.as_mut()).is_pending());

        let log = events.clone();
        let second = session.search(Some(docs_tree()), "b.txt", move |_| {
            log.borrow_mut().push("second progress")
        });
        events.borrow_mut().push("second started");

        let (first, second) = futures::join!(first, second);
        assert_eq!(first, None);
        assert_eq!(second.map(|hits| hits.len()), Some(1));

        let events = events.borrow();
        let started = events.iter().position(|e| *e == "second started").unwrap();
        assert!(events[started..].iter().all(|e| *e != "first progress"));
    }

    #[compio::test]
    async fn cancel_stops_in_flight_search() {
        let session = SearchSession::new(Duration::ZERO, Duration::ZERO);
        let mut running = Box::pin(session.search(Some(large_tree()), "item", |_| {}));
        assert!(futures::poll!(running.as_mut()).is_pending());

        session.cancel();
        assert_eq!(running.await, None);
    }

    #[compio::test]
    async fn progress_reports_are_rate_limited() {
        let reports = Rc::new(RefCell::new(Vec::new()));
        let sink = reports.clone();
        let hits = SearchSession::new(Duration::ZERO, Duration::from_secs(3600))
            .search(Some(large_tree()), "item", move |progress| {
                sink.borrow_mut().push(progress)
            })
            .await
            .unwrap();

        assert_eq!(hits.len(), 200);
        let reports = reports.borrow();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].processed, 0);
        assert!(reports[0].remaining > 0);
    }
}
