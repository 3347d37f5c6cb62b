//! Incremental directory-hierarchy indexer.
//!
//! Entries from an external scanner are drained into an in-memory [`tree`] in
//! time-boxed slices ([`ingest`]). Finished trees answer folder statistics
//! ([`stats`]), cancellable substring searches ([`search`]) and flat file
//! listings ([`export`]). Everything runs cooperatively on one thread; the
//! [`session`] ties a tree to the generation tokens that retire stale work.

#![allow(clippy::enum_variant_names)]

pub mod config;
pub mod entry;
pub mod export;
pub mod generation;
pub mod ingest;
pub mod search;
pub mod session;
pub mod slice;
pub mod stats;
pub mod tree;
