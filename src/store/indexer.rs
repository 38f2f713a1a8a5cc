//! Write operations against the store.
//!
//! Every mutation runs inside the caller's transaction; this module
//! never begins, commits, or rolls one back itself.

use rusqlite::{Connection, params};

use crate::owl::OntologyRecord;

use super::schema::TABLE_SCHEMA;

/// Low-level database-interacting indexing functionality.
pub struct Indexer<'a> {
    conn: &'a Connection,
}

impl<'a> Indexer<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// Create the schema. Does nothing if it already exists.
    pub fn initialize_schema(&self) -> rusqlite::Result<()> {
        tracing::debug!("initializing schema");
        self.conn.execute_batch(TABLE_SCHEMA)
    }

    /// Remove all indexed data.
    pub fn truncate(&self) -> rusqlite::Result<()> {
        tracing::debug!("truncating store");
        self.conn.execute("DELETE FROM DEFINIENDA", [])?;
        self.conn.execute("DELETE FROM DATA", [])?;
        Ok(())
    }

    /// Remove all rows for the given ontology identifier.
    pub fn remove(&self, identifier: &str) -> rusqlite::Result<()> {
        tracing::debug!(identifier, "removing ontology");
        self.conn.execute(
            "DELETE FROM DEFINIENDA WHERE ONTOLOGY_ID = ?1",
            params![identifier],
        )?;
        self.conn
            .execute("DELETE FROM DATA WHERE ONTOLOGY_ID = ?1", params![identifier])?;
        Ok(())
    }

    /// Insert an ontology, removing any previous rows for the same
    /// identifier first.
    pub fn upsert(
        &self,
        identifier: &str,
        ontology: &OntologyRecord,
        sort_key: Option<&str>,
    ) -> rusqlite::Result<()> {
        self.remove(identifier)?;
        let sort_key = sort_key.unwrap_or(identifier);

        tracing::debug!(identifier, uri = %ontology.uri, "inserting ontology");

        let mut insert_name = self.conn.prepare(
            "INSERT INTO DEFINIENDA (URI, ONTOLOGY_ID, CANONICAL, FRAGMENT, SORT_KEY) \
             VALUES (?1, ?2, ?3, NULL, ?4)",
        )?;
        for (uri, canonical) in ontology.uris() {
            insert_name.execute(params![uri, identifier, canonical, sort_key])?;
        }

        let mut insert_data = self.conn.prepare(
            "INSERT INTO DATA (ONTOLOGY_ID, MIME_TYPE, DATA) VALUES (?1, ?2, CAST(?3 AS BLOB))",
        )?;
        for (media_type, data) in &ontology.encodings {
            insert_data.execute(params![identifier, media_type, data])?;
        }

        let mut insert_definiendum = self.conn.prepare(
            "INSERT INTO DEFINIENDA (URI, ONTOLOGY_ID, CANONICAL, FRAGMENT, SORT_KEY) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (uri, fragment, canonical) in ontology.all_definienda() {
            insert_definiendum.execute(params![uri, identifier, canonical, fragment, sort_key])?;
        }

        Ok(())
    }
}
