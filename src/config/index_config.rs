use std::borrow::Cow;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;

use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use tracing::{debug, info};

use crate::search::DEFAULT_PROGRESS_INTERVAL;
use crate::slice::DEFAULT_SLICE_BUDGET;

pub const CONFIG_FILE_NAME: &str = "dirdex.yaml";

const DEFAULT_SCAN_BATCH_SIZE: usize = 512;

fn get_config_file_path(root: &Path) -> PathBuf {
    root.join(CONFIG_FILE_NAME)
}

/// Tuning knobs for ingestion, aggregation, search and the scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexConfig {
    pub slice_budget: Duration,
    pub search_progress_interval: Duration,
    pub scan_batch_size: usize,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            slice_budget: DEFAULT_SLICE_BUDGET,
            search_progress_interval: DEFAULT_PROGRESS_INTERVAL,
            scan_batch_size: DEFAULT_SCAN_BATCH_SIZE,
        }
    }
}

impl IndexConfig {
    /// Reads `dirdex.yaml` from `root`, falling back to defaults if it is absent.
    pub async fn read(root: &Path) -> Result<Self, IndexConfigError> {
        let path = get_config_file_path(root);
        match Self::from_path(&path).await {
            Err(IndexConfigError::ReadError { source, .. })
                if source.kind() == ErrorKind::NotFound =>
            {
                info!("No {} in {}, using defaults", CONFIG_FILE_NAME, root.display());
                Ok(Self::default())
            }
            other => other,
        }
    }

    pub async fn from_path(path: &Path) -> Result<Self, IndexConfigError> {
        debug!("Reading config file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    fn parse_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, IndexConfigError> {
        let defaults = Self::default();

        let slice_budget = Self::read_positive_integer(top_level, "sliceBudgetMs", true)?
            .map(Duration::from_millis)
            .unwrap_or(defaults.slice_budget);
        let search_progress_interval =
            Self::read_positive_integer(top_level, "searchProgressIntervalMs", true)?
                .map(Duration::from_millis)
                .unwrap_or(defaults.search_progress_interval);
        let scan_batch_size = Self::read_positive_integer(top_level, "scanBatchSize", false)?
            .map(|size| size as usize)
            .unwrap_or(defaults.scan_batch_size);

        Ok(IndexConfig {
            slice_budget,
            search_progress_interval,
            scan_batch_size,
        })
    }

    fn read_positive_integer(
        top_level: &LinkedHashMap<Yaml, Yaml>,
        key: &'static str,
        allow_zero: bool,
    ) -> Result<Option<u64>, IndexConfigError> {
        let Some(value) = top_level.get(&Yaml::Value(Scalar::String(Cow::Borrowed(key)))) else {
            return Ok(None);
        };
        match value {
            Yaml::Value(Scalar::Integer(n)) if *n > 0 || (allow_zero && *n == 0) => {
                Ok(Some(*n as u64))
            }
            _ => InvalidValueSnafu { key }.fail(),
        }
    }
}

impl TryFrom<&str> for IndexConfig {
    type Error = IndexConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().ok_or(IndexConfigError::MalformedConfig)?;
        let top_level = document
            .as_mapping()
            .ok_or(IndexConfigError::TopLevelNotMap)?;

        let config = Self::parse_mapping(top_level)?;
        debug!("Parsed config: {:?}", config);
        Ok(config)
    }
}

#[derive(Debug, Snafu)]
pub enum IndexConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("Config file is not valid UTF-8: {}", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("'{}' should be a positive integer", key))]
    InvalidValue { key: &'static str },
}

#[cfg(test)]
mod tests {
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[compio::test]
    async fn config_returns_error_on_nonexistent_file() {
        let result = IndexConfig::from_path(Path::new("nonexistent.yaml")).await;
        assert!(matches!(result, Err(IndexConfigError::ReadError { .. })));
    }

    #[compio::test]
    async fn missing_config_in_root_falls_back_to_defaults() {
        let root = TempDir::new().expect("Failed to create temp directory");
        let config = IndexConfig::read(root.path()).await.unwrap();
        assert_eq!(config, IndexConfig::default());
    }

    #[compio::test]
    async fn config_in_root_is_picked_up() {
        let root = TempDir::new().expect("Failed to create temp directory");
        std::fs::write(root.path().join(CONFIG_FILE_NAME), "sliceBudgetMs: 4\n")
            .expect("Failed to write config");

        let config = IndexConfig::read(root.path()).await.unwrap();
        assert_eq!(config.slice_budget, Duration::from_millis(4));
        assert_eq!(config.scan_batch_size, DEFAULT_SCAN_BATCH_SIZE);
    }

    #[test]
    fn config_reads_all_keys() {
        let yaml = "sliceBudgetMs: 8\nsearchProgressIntervalMs: 50\nscanBatchSize: 64\n";
        let config: IndexConfig = yaml.try_into().unwrap();
        assert_eq!(
            config,
            IndexConfig {
                slice_budget: Duration::from_millis(8),
                search_progress_interval: Duration::from_millis(50),
                scan_batch_size: 64,
            }
        );
    }

    #[test]
    fn config_ignores_unknown_keys() {
        let config: IndexConfig = "theme: dark".try_into().unwrap();
        assert_eq!(config, IndexConfig::default());
    }

    #[test]
    fn config_returns_error_on_invalid_yaml() {
        let result: Result<IndexConfig, _> = "invalid: yaml: content: [unclosed".try_into();
        assert!(matches!(result, Err(IndexConfigError::ParseError { .. })));
    }

    #[test]
    fn config_returns_error_on_empty_file() {
        let result: Result<IndexConfig, _> = "".try_into();
        assert!(matches!(result, Err(IndexConfigError::MalformedConfig)));
    }

    #[test]
    fn config_returns_error_when_top_level_is_not_map() {
        let result: Result<IndexConfig, _> = "- item1\n- item2".try_into();
        assert!(matches!(result, Err(IndexConfigError::TopLevelNotMap)));
    }

    #[rstest]
    #[case("sliceBudgetMs: -1", "sliceBudgetMs")]
    #[case("sliceBudgetMs: fast", "sliceBudgetMs")]
    #[case("searchProgressIntervalMs: [1, 2]", "searchProgressIntervalMs")]
    #[case("scanBatchSize: 0", "scanBatchSize")]
    fn config_rejects_invalid_values(#[case] yaml: &str, #[case] expected_key: &str) {
        let result: Result<IndexConfig, _> = yaml.try_into();
        match result {
            Err(IndexConfigError::InvalidValue { key }) => assert_eq!(key, expected_key),
            other => panic!("Expected InvalidValue, got {other:?}"),
        }
    }

    #[test]
    fn zero_budget_is_allowed() {
        let config: IndexConfig = "sliceBudgetMs: 0".try_into().unwrap();
        assert_eq!(config.slice_budget, Duration::ZERO);
    }
}
