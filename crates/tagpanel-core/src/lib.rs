//! tagpanel core - shared contract between a music tagger's domain model and
//! its two synchronized tree views
//!
//! The tree engine never owns albums, tracks, clusters or files. It reads them
//! through [`Catalog`], mutates them through [`Tagger`], and follows their
//! lifecycle through [`CatalogEvent`] notifications.
//!
//! - [`types`]: ids, object variants and the [`ObjectRef`] tagged union
//! - [`catalog`]: the `Catalog` / `Tagger` traits and change events
//! - [`columns`]: the injected column schema shared by every node variant
//! - [`urls`]: drop-payload URL recognition (local paths, release/recording links)
//! - [`config`]: YAML settings + persisted view geometry
//! - [`memory`]: in-memory reference catalog used by the CLI and tests

pub mod catalog;
pub mod columns;
pub mod config;
pub mod memory;
pub mod types;
pub mod urls;

pub use catalog::{Catalog, CatalogEvent, MoveTarget, Tagger, VersionsRequest};
pub use columns::{Column, ColumnSchema};
pub use memory::MemoryCatalog;
pub use types::*;
