//! Owns the writer connection and keeps the store synchronized with the
//! watched paths.
//!
//! There is at most one in-flight writer transaction at any time: every
//! mutation runs under the writer lock, inside a transaction that is
//! rolled back when a watched re-index fails. Readers use their own
//! pooled connections and are never handed the writer.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use notify::{RecursiveMode, Watcher};
use rusqlite::Connection;
use thiserror::Error;
use tokio::sync::mpsc;

use super::{IngestOptions, IngestReport, Ingester};

/// Quiescence window before a filesystem event triggers a re-index.
const DEBOUNCE: Duration = Duration::from_secs(1);

#[derive(Debug, Error)]
pub enum IndexError {
    #[error(transparent)]
    Store(#[from] rusqlite::Error),
    #[error("failed to ingest {}", failures.join(", "))]
    ReindexFailed { failures: Vec<String> },
}

/// Controls indexing and optionally watches the given paths.
pub struct Controller {
    conn: Mutex<Connection>,
    paths: Vec<PathBuf>,
    ingester: Ingester,
}

impl Controller {
    pub fn new(conn: Connection, paths: Vec<PathBuf>, languages: Vec<String>) -> Self {
        Self {
            conn: Mutex::new(conn),
            paths,
            ingester: Ingester::new(languages),
        }
    }

    /// Initial indexing run. Always commits: files that fail are
    /// reported but do not invalidate the ones that succeeded.
    pub fn index_and_commit(&self) -> Result<IngestReport, IndexError> {
        let mut conn = self.conn.lock().expect("writer lock poisoned");
        tracing::info!(paths = ?self.paths, "ingesting paths");

        let tx = conn.transaction()?;
        let report = self.ingester.ingest(
            &tx,
            &self.paths,
            IngestOptions {
                initialize: true,
                ..Default::default()
            },
        )?;
        tx.commit()?;

        if !report.failed.is_empty() {
            tracing::warn!(failed = ?report.failed, "some files were not indexed");
        }
        Ok(report)
    }

    /// Wipe and rebuild the index in one transaction. If any file
    /// fails, the transaction rolls back and the previous index stays
    /// intact.
    pub fn reindex(&self) -> Result<IngestReport, IndexError> {
        let mut conn = self.conn.lock().expect("writer lock poisoned");
        tracing::info!(paths = ?self.paths, "re-indexing paths");

        let tx = conn.transaction()?;
        let report = self.ingester.ingest(
            &tx,
            &self.paths,
            IngestOptions {
                truncate: true,
                ..Default::default()
            },
        )?;

        if !report.failed.is_empty() {
            tracing::error!(failed = ?report.failed, "rolling back indexed ontologies");
            tx.rollback()?;
            return Err(IndexError::ReindexFailed {
                failures: report.failed,
            });
        }

        tracing::info!("committing indexed ontologies");
        tx.commit()?;
        Ok(report)
    }

    /// Install a recursive watcher on every path and re-index after
    /// events settle for the debounce window. The returned watcher must
    /// be kept alive for watching to continue.
    pub fn start_watching(self: Arc<Self>) -> notify::Result<notify::RecommendedWatcher> {
        let (tx, mut rx) = mpsc::channel::<()>(16);

        let mut watcher = notify::recommended_watcher(move |result: Result<notify::Event, _>| {
            if result.is_ok() {
                let _ = tx.blocking_send(());
            }
        })?;
        for path in &self.paths {
            tracing::info!(path = %path.display(), "starting to watch");
            watcher.watch(path, RecursiveMode::Recursive)?;
        }

        let controller = self;
        tokio::spawn(async move {
            while rx.recv().await.is_some() {
                // wait for the burst to settle; any further event
                // restarts the window
                loop {
                    match tokio::time::timeout(DEBOUNCE, rx.recv()).await {
                        Ok(Some(())) => continue,
                        Ok(None) => return,
                        Err(_) => break,
                    }
                }

                let controller = Arc::clone(&controller);
                let outcome =
                    tokio::task::spawn_blocking(move || controller.reindex()).await;
                match outcome {
                    Ok(Ok(report)) => {
                        tracing::info!(indexed = report.successful.len(), "re-index complete");
                    }
                    Ok(Err(err)) => tracing::error!("re-index failed: {err}"),
                    Err(err) => tracing::error!("re-index task panicked: {err}"),
                }
            }
        });

        Ok(watcher)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    const ONTOLOGY: &str = r#"
        @prefix owl: <http://www.w3.org/2002/07/owl#> .
        <http://example.org/o> a owl:Ontology .
        <http://example.org/o/Thing> a owl:Class .
    "#;

    fn write_file(dir: &Path, name: &str, content: &str) {
        let mut file = std::fs::File::create(dir.join(name)).unwrap();
        file.write_all(content.as_bytes()).unwrap();
    }

    fn data_count(controller: &Controller) -> i64 {
        let conn = controller.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM DATA", [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn initial_index_commits_partial_success() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "good.ttl", ONTOLOGY);
        write_file(dir.path(), "bad.ttl", "{{{ not turtle");

        let controller = Controller::new(
            Connection::open_in_memory().unwrap(),
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        let report = controller.index_and_commit().unwrap();

        assert_eq!(report.successful, vec!["good".to_string()]);
        assert_eq!(report.failed.len(), 1);
        assert!(data_count(&controller) > 0);
    }

    #[test]
    fn failed_reindex_keeps_previous_state() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "good.ttl", ONTOLOGY);

        let controller = Controller::new(
            Connection::open_in_memory().unwrap(),
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        controller.index_and_commit().unwrap();
        let before = data_count(&controller);

        // a broken file makes the whole re-index roll back
        write_file(dir.path(), "bad.ttl", "{{{ not turtle");
        let err = controller.reindex().unwrap_err();
        assert!(matches!(err, IndexError::ReindexFailed { .. }));
        assert_eq!(data_count(&controller), before);
    }

    #[test]
    fn successful_reindex_replaces_state() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "first.ttl", ONTOLOGY);

        let controller = Controller::new(
            Connection::open_in_memory().unwrap(),
            vec![dir.path().to_path_buf()],
            Vec::new(),
        );
        controller.index_and_commit().unwrap();

        std::fs::remove_file(dir.path().join("first.ttl")).unwrap();
        write_file(dir.path(), "second.ttl", ONTOLOGY);
        let report = controller.reindex().unwrap();

        assert_eq!(report.successful, vec!["second".to_string()]);
        let conn = controller.conn.lock().unwrap();
        let ids: Vec<String> = conn
            .prepare("SELECT DISTINCT ONTOLOGY_ID FROM DATA")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(ids, vec!["second".to_string()]);
    }
}
