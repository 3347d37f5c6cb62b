use std::path::PathBuf;

use clap::Parser;
use dirdex::tree::SortOrder;

use crate::application::data::LogLevel;

#[derive(Parser, Debug, Clone)]
#[command(version, about = "Index a directory tree, then query it")]
pub struct Cli {
    /// The directory to index
    #[clap(default_value = ".")]
    pub root: PathBuf,

    #[clap(long, short, default_value = "warn", value_enum)]
    pub log_level: LogLevel,

    /// Config file to use instead of <ROOT>/dirdex.yaml
    #[clap(long, short)]
    pub config: Option<PathBuf>,

    /// Case-insensitive substring to look for in names and paths
    #[clap(long, short)]
    pub search: Option<String>,

    /// Folder, relative to the root, to report statistics for
    #[clap(long)]
    pub stats: Option<String>,

    /// Folder, relative to the root, whose files are printed as tab-separated rows
    #[clap(long, short)]
    pub export: Option<String>,

    /// Order of the top-level listing
    #[clap(long, default_value = "name", value_enum)]
    pub sort: SortOrder,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_current_directory() {
        let cli = Cli::try_parse_from(["dirdex"]).unwrap();
        assert_eq!(cli.root, PathBuf::from("."));
        assert_eq!(cli.sort, SortOrder::Name);
        assert!(cli.search.is_none());
    }

    #[test]
    fn parses_queries() {
        let cli = Cli::try_parse_from([
            "dirdex", "/data", "-s", "report", "--stats", "docs", "-e", "docs/sub", "--sort",
            "size",
        ])
        .unwrap();
        assert_eq!(cli.root, PathBuf::from("/data"));
        assert_eq!(cli.search.as_deref(), Some("report"));
        assert_eq!(cli.stats.as_deref(), Some("docs"));
        assert_eq!(cli.export.as_deref(), Some("docs/sub"));
        assert_eq!(cli.sort, SortOrder::Size);
    }

    #[test]
    fn rejects_unknown_sort() {
        assert!(Cli::try_parse_from(["dirdex", "--sort", "color"]).is_err());
    }
}
