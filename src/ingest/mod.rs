//! Time-boxed ingestion of scanner entries into a [`Tree`](crate::tree::Tree).

mod scheduler;

pub use scheduler::{IngestProgress, IngestionScheduler, StepOutcome};
