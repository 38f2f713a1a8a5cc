//! The SQLite-backed ontology store.
//!
//! Two tables hold everything: `DEFINIENDA` (which IRIs belong to which
//! ontology, and at which in-document fragment) and `DATA` (one blob per
//! ontology and media type). The `ONTOLOGIES` view is the single read
//! surface for the index page.

mod connector;
mod indexer;
mod pool;
mod query;
mod schema;

pub use connector::{Connector, Mode};
pub use indexer::Indexer;
pub use pool::{PooledQuery, QueryPool};
pub use query::{DefiniendumRow, OntologySummary, Query};
pub use schema::TABLE_SCHEMA;
