//! The store's DDL.

/// Idempotent schema: both tables, their indexes, and the `ONTOLOGIES`
/// view (always re-created so view changes take effect on upgrade).
pub const TABLE_SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS "DEFINIENDA" (
    "URI"           TEXT NOT NULL,
    "ONTOLOGY_ID"   TEXT NOT NULL,
    "SORT_KEY"      TEXT NOT NULL,
    "CANONICAL"     INTEGER NOT NULL,
    "FRAGMENT"      TEXT
);

CREATE INDEX IF NOT EXISTS DEFINIENDA_ONTOLOGY ON DEFINIENDA ("ONTOLOGY_ID", "FRAGMENT", "SORT_KEY");
CREATE INDEX IF NOT EXISTS DEFINIENDA_FRAGMENT ON DEFINIENDA ("FRAGMENT");

CREATE TABLE IF NOT EXISTS "DATA" (
    "ONTOLOGY_ID"   TEXT NOT NULL,
    "MIME_TYPE"     TEXT NOT NULL,
    "DATA"          BLOB NOT NULL
);
CREATE INDEX IF NOT EXISTS "INDEX_DATA" ON "DATA" ("ONTOLOGY_ID", "MIME_TYPE");

DROP VIEW IF EXISTS "ONTOLOGIES";
CREATE VIEW IF NOT EXISTS
    "ONTOLOGIES"
AS SELECT
  NAMES.ONTOLOGY_ID,
  NAMES.URI,
  (
    SELECT
        JSON_GROUP_ARRAY(DEFINIENDA.URI)
    FROM
        DEFINIENDA
    WHERE
        DEFINIENDA.ONTOLOGY_ID = NAMES.ONTOLOGY_ID
        AND DEFINIENDA.CANONICAL IS FALSE
        AND DEFINIENDA.FRAGMENT IS NULL
    ORDER BY DEFINIENDA.URI
  ) AS ALTERNATE_URIS,
  (
    SELECT
        COUNT(*)
    FROM
        DEFINIENDA
    WHERE
        DEFINIENDA.CANONICAL IS TRUE
        AND DEFINIENDA.FRAGMENT IS NOT NULL
        AND DEFINIENDA.ONTOLOGY_ID = NAMES.ONTOLOGY_ID
  ) AS DEFINIENDA_COUNT,
  (
    SELECT
        JSON_GROUP_ARRAY(DATA.MIME_TYPE)
        FROM
            DATA
        WHERE
            DATA.ONTOLOGY_ID = NAMES.ONTOLOGY_ID
        ORDER BY
            DATA.MIME_TYPE
  ) AS MIME_TYPES
FROM
  DEFINIENDA AS NAMES
WHERE
    NAMES.FRAGMENT IS NULL
    AND NAMES.CANONICAL IS TRUE
ORDER BY
    NAMES.SORT_KEY DESC
"#;
