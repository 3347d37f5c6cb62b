use std::path::PathBuf;

use dirdex::config::{IndexConfig, IndexConfigError};
use dirdex::session::IndexSession;
use snafu::Snafu;
use snafu::prelude::*;
use tracing::{debug, info};

use crate::application::RuntimeConfig;
use crate::application::report;
use crate::scanner::{ScannerError, spawn_scan};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let root = app_config.root.canonicalize().context(RootSnafu {
            path: app_config.root.clone(),
        })?;

        let index_config = match &app_config.config_file {
            Some(path) => IndexConfig::from_path(path).await,
            None => IndexConfig::read(&root).await,
        }
        .context(ConfigSnafu)?;
        debug!("Loaded config: {:?}", index_config);

        let mut session = IndexSession::new(index_config);
        let scheduler = session.begin_scan(&root);
        let events =
            spawn_scan(&root, session.config().scan_batch_size).context(ScannerSnafu)?;

        let tree = scheduler
            .run(events, |progress| {
                debug!(
                    "Ingested {}/{} entries",
                    progress.processed, progress.total_queued
                )
            })
            .await
            .context(ScanAbandonedSnafu)?;
        info!("Indexed {} nodes", tree.node_count());
        session.install(tree);

        if let Some(tree) = session.tree() {
            report::print_overview(tree, app_config.sort);
        }

        if let Some(rel_path) = &app_config.stats {
            let direct = session
                .stats_direct(rel_path)
                .context(NodeNotFoundSnafu { rel_path })?;
            let recursive = session
                .stats_recursive(rel_path, |progress| {
                    debug!(
                        "Aggregated {} nodes, {} left (~{:.0}%)",
                        progress.processed,
                        progress.remaining,
                        progress.progress_ratio * 100.0
                    )
                })
                .await
                .context(NodeNotFoundSnafu { rel_path })?;
            report::print_stats(rel_path, direct, recursive);
        }

        if let Some(query) = &app_config.search {
            let mut hits = session
                .search(query, |progress| {
                    debug!(
                        "{} matches so far, {} nodes left",
                        progress.processed, progress.remaining
                    )
                })
                .await
                .unwrap_or_default();
            hits.sort_by(|a, b| a.full_path.cmp(&b.full_path));
            report::print_hits(query, &hits);
        }

        if let Some(rel_path) = &app_config.export {
            let rows = session
                .export_rows(rel_path)
                .context(NodeNotFoundSnafu { rel_path })?;
            report::print_rows(rows);
        }

        Ok(())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Cannot resolve root directory {}", path.display()))]
    RootError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[snafu(display("Critical failure encountered during configuration stage"))]
    ConfigError { source: IndexConfigError },
    #[snafu(display("Failed to start scanning"))]
    ScannerError { source: ScannerError },
    #[snafu(display("Scan was abandoned before indexing finished"))]
    ScanAbandoned,
    #[snafu(display("No entry at '{}' under the scanned root", rel_path))]
    NodeNotFound { rel_path: String },
}
