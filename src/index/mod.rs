//! High-level indexing: walking input paths and keeping the store
//! synchronized with them.

mod controller;
mod ingester;

pub use controller::{Controller, IndexError};
pub use ingester::{IngestOptions, IngestReport, Ingester, slug_from_path};
