//! Walks input paths and feeds parsed ontologies to the indexer.
//!
//! Parse and extraction failures of individual files are recovered and
//! reported; store failures are fatal to the surrounding transaction and
//! propagate to the caller.

use std::path::{Path, PathBuf};

use rusqlite::Connection;

use crate::owl;
use crate::store::Indexer;

/// What an ingestion run should do besides indexing.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngestOptions {
    /// Create the schema first.
    pub initialize: bool,
    /// Wipe all previously indexed data first.
    pub truncate: bool,
    /// Remove the given paths' ontologies instead of indexing them.
    pub remove: bool,
}

/// Per-path outcome of an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    /// Identifiers that were indexed.
    pub successful: Vec<String>,
    /// Paths that failed to parse or extract.
    pub failed: Vec<String>,
}

impl IngestReport {
    fn merge(&mut self, other: IngestReport) {
        self.successful.extend(other.successful);
        self.failed.extend(other.failed);
    }
}

/// The ontology identifier for a path: its file stem.
pub fn slug_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// High-level functionality for ingesting ontologies.
///
/// Uses the caller's connection and performs no transaction logic of its
/// own; that is the controller's job.
pub struct Ingester {
    languages: Vec<String>,
}

impl Ingester {
    pub fn new(languages: Vec<String>) -> Self {
        Self { languages }
    }

    /// Ingest (or remove) the given paths.
    pub fn ingest(
        &self,
        conn: &Connection,
        paths: &[PathBuf],
        options: IngestOptions,
    ) -> rusqlite::Result<IngestReport> {
        let indexer = Indexer::new(conn);

        if options.initialize {
            indexer.initialize_schema()?;
        }
        if options.truncate {
            indexer.truncate()?;
        }
        if options.remove {
            for path in paths {
                indexer.remove(&slug_from_path(path))?;
            }
            return Ok(IngestReport::default());
        }

        let mut report = IngestReport::default();
        for path in paths {
            if path.is_file() {
                match self.ingest_file(&indexer, path)? {
                    Some(slug) => report.successful.push(slug),
                    None => report.failed.push(path.display().to_string()),
                }
            } else if path.is_dir() {
                report.merge(self.ingest_directory(&indexer, path)?);
            } else {
                tracing::warn!(path = %path.display(), "neither a file nor a directory");
                report.failed.push(path.display().to_string());
            }
        }
        Ok(report)
    }

    fn ingest_directory(
        &self,
        indexer: &Indexer,
        directory: &Path,
    ) -> rusqlite::Result<IngestReport> {
        let mut report = IngestReport::default();

        let mut entries: Vec<PathBuf> = match std::fs::read_dir(directory) {
            Ok(entries) => entries
                .filter_map(Result::ok)
                .map(|entry| entry.path())
                .collect(),
            Err(err) => {
                tracing::error!(directory = %directory.display(), "cannot read directory: {err}");
                report.failed.push(directory.display().to_string());
                return Ok(report);
            }
        };
        entries.sort();

        for path in entries {
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .is_some_and(|name| name.starts_with('.'));
            if hidden || !path.is_file() {
                continue;
            }
            match self.ingest_file(indexer, &path)? {
                Some(slug) => report.successful.push(slug),
                None => report.failed.push(path.display().to_string()),
            }
        }

        Ok(report)
    }

    /// Index a single file. Returns `None` when the file cannot be
    /// parsed or holds no ontology; store errors propagate.
    fn ingest_file(&self, indexer: &Indexer, path: &Path) -> rusqlite::Result<Option<String>> {
        tracing::debug!(path = %path.display(), "parsing graph data");
        let graph = match crate::parse::parse_path(path) {
            Ok(graph) => graph,
            Err(err) => {
                tracing::error!(path = %path.display(), "unable to parse graph data: {err}");
                return Ok(None);
            }
        };

        tracing::debug!(path = %path.display(), "reading OWL ontology");
        let record = match owl::build_ontology(&graph, &self.languages) {
            Ok(record) => record,
            Err(err) => {
                tracing::error!(path = %path.display(), "unable to read OWL ontology: {err}");
                return Ok(None);
            }
        };

        let slug = slug_from_path(path);
        indexer.upsert(&slug, &record, None)?;

        tracing::info!(uri = %record.uri, path = %path.display(), %slug, "indexed ontology");
        Ok(Some(slug))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const ONTOLOGY: &str = r#"
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
        <http://example.org/o> a owl:Ontology ; rdfs:label "O" .
        <http://example.org/o/Thing> a owl:Class .
    "#;

    fn memory_conn() -> Connection {
        Connection::open_in_memory().unwrap()
    }

    fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn ingests_a_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "onto.ttl", ONTOLOGY);

        let conn = memory_conn();
        let report = Ingester::new(Vec::new())
            .ingest(
                &conn,
                &[path],
                IngestOptions {
                    initialize: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.successful, vec!["onto".to_string()]);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn directory_walk_skips_hidden_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "good.ttl", ONTOLOGY);
        write_file(dir.path(), ".hidden.ttl", ONTOLOGY);
        write_file(dir.path(), "broken.ttl", "not turtle at all {{{");

        let conn = memory_conn();
        let report = Ingester::new(Vec::new())
            .ingest(
                &conn,
                &[dir.path().to_path_buf()],
                IngestOptions {
                    initialize: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert_eq!(report.successful, vec!["good".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(report.failed[0].ends_with("broken.ttl"));
    }

    #[test]
    fn file_without_ontology_is_recorded_as_failed() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            dir.path(),
            "plain.ttl",
            "@prefix ex: <http://example.org/> . ex:s ex:p ex:o .",
        );

        let conn = memory_conn();
        let report = Ingester::new(Vec::new())
            .ingest(
                &conn,
                &[path],
                IngestOptions {
                    initialize: true,
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(report.successful.is_empty());
        assert_eq!(report.failed.len(), 1);
    }

    #[test]
    fn remove_mode_drops_by_slug() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "onto.ttl", ONTOLOGY);

        let conn = memory_conn();
        let ingester = Ingester::new(Vec::new());
        ingester
            .ingest(
                &conn,
                std::slice::from_ref(&path),
                IngestOptions {
                    initialize: true,
                    ..Default::default()
                },
            )
            .unwrap();

        ingester
            .ingest(
                &conn,
                &[path],
                IngestOptions {
                    remove: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM DATA", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn truncate_wipes_previous_runs() {
        let dir = tempfile::tempdir().unwrap();
        let first = write_file(dir.path(), "first.ttl", ONTOLOGY);
        let second = write_file(dir.path(), "second.ttl", ONTOLOGY);

        let conn = memory_conn();
        let ingester = Ingester::new(Vec::new());
        ingester
            .ingest(
                &conn,
                &[first],
                IngestOptions {
                    initialize: true,
                    ..Default::default()
                },
            )
            .unwrap();
        ingester
            .ingest(
                &conn,
                &[second],
                IngestOptions {
                    truncate: true,
                    ..Default::default()
                },
            )
            .unwrap();

        let ids: Vec<String> = conn
            .prepare("SELECT DISTINCT ONTOLOGY_ID FROM DATA")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ids, vec!["second".to_string()]);
    }

    #[test]
    fn slug_is_the_file_stem() {
        assert_eq!(slug_from_path(Path::new("/some/dir/onto.ttl")), "onto");
        assert_eq!(slug_from_path(Path::new("bare")), "bare");
    }
}
