use std::path::PathBuf;

use dirdex::tree::SortOrder;

use crate::cli::Cli;

/// What a single run should do once the tree is built.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub root: PathBuf,
    pub config_file: Option<PathBuf>,
    pub search: Option<String>,
    pub stats: Option<String>,
    pub export: Option<String>,
    pub sort: SortOrder,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            root: cli.root,
            config_file: cli.config,
            search: cli.search,
            stats: cli.stats,
            export: cli.export,
            sort: cli.sort,
        }
    }
}
