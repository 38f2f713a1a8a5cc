//! Read operations against the store.

use rusqlite::{Connection, OptionalExtension, params};

/// An ontology as listed by the `ONTOLOGIES` view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OntologySummary {
    pub identifier: String,
    pub uri: String,
    pub alternate_uris: Vec<String>,
    pub mime_types: Vec<String>,
    pub definienda_count: i64,
}

/// A definienda lookup result; the first row returned for a set of
/// candidate IRIs is the preferred redirect target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefiniendumRow {
    pub uri: String,
    pub ontology_id: String,
    pub canonical: bool,
    pub fragment: Option<String>,
}

/// Read-side interface to an indexed store. Owns its connection; one
/// `Query` is used by at most one thread at a time (see the pool).
pub struct Query {
    conn: Connection,
}

impl Query {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// All indexed ontologies, ordered by descending sort key.
    pub fn list_ontologies(&self) -> rusqlite::Result<Vec<OntologySummary>> {
        let mut statement = self.conn.prepare(
            "SELECT ONTOLOGY_ID, URI, ALTERNATE_URIS, DEFINIENDA_COUNT, MIME_TYPES \
             FROM ONTOLOGIES",
        )?;
        let rows = statement.query_map([], |row| {
            let alternate_json: String = row.get(2)?;
            let mime_json: String = row.get(4)?;
            Ok(OntologySummary {
                identifier: row.get(0)?,
                uri: row.get(1)?,
                alternate_uris: serde_json::from_str(&alternate_json).unwrap_or_default(),
                mime_types: serde_json::from_str(&mime_json).unwrap_or_default(),
                definienda_count: row.get(3)?,
            })
        })?;
        rows.collect()
    }

    /// The stored blob for (ontology, media type), if any.
    pub fn get_data(&self, identifier: &str, mime_type: &str) -> rusqlite::Result<Option<Vec<u8>>> {
        self.conn
            .query_row(
                "SELECT DATA.DATA FROM DATA \
                 WHERE DATA.ONTOLOGY_ID = ?1 AND DATA.MIME_TYPE = ?2 LIMIT 1",
                params![identifier, mime_type],
                |row| row.get(0),
            )
            .optional()
    }

    /// Whether the ontology is stored in the given media type.
    pub fn has_mime_type(&self, identifier: &str, mime_type: &str) -> rusqlite::Result<bool> {
        self.conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM DATA WHERE DATA.MIME_TYPE = ?1 AND DATA.ONTOLOGY_ID = ?2)",
            params![mime_type, identifier],
            |row| row.get(0),
        )
    }

    /// All media types stored for an ontology, ordered.
    pub fn get_mime_types(&self, identifier: &str) -> rusqlite::Result<Vec<String>> {
        let mut statement = self.conn.prepare(
            "SELECT DISTINCT DATA.MIME_TYPE FROM DATA \
             WHERE DATA.ONTOLOGY_ID = ?1 ORDER BY DATA.MIME_TYPE",
        )?;
        let rows = statement.query_map(params![identifier], |row| row.get(0))?;
        rows.collect()
    }

    /// Definienda rows matching any of the candidate IRIs, canonical
    /// rows first, then by descending sort key.
    pub fn get_definienda(&self, uris: &[String]) -> rusqlite::Result<Vec<DefiniendumRow>> {
        if uris.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = (1..=uris.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(",");
        let sql = format!(
            "SELECT DEFINIENDA.URI, DEFINIENDA.ONTOLOGY_ID, DEFINIENDA.CANONICAL, DEFINIENDA.FRAGMENT \
             FROM DEFINIENDA \
             WHERE DEFINIENDA.URI IN ({placeholders}) \
             ORDER BY DEFINIENDA.CANONICAL DESC, DEFINIENDA.SORT_KEY DESC"
        );

        let mut statement = self.conn.prepare(&sql)?;
        let rows = statement.query_map(rusqlite::params_from_iter(uris.iter()), |row| {
            Ok(DefiniendumRow {
                uri: row.get(0)?,
                ontology_id: row.get(1)?,
                canonical: row.get(2)?,
                fragment: row.get(3)?,
            })
        })?;
        rows.collect()
    }
}
