//! Connection parameters for the SQLite store.

use std::time::Duration;

use rusqlite::{Connection, OpenFlags};

/// How a connection opens the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ReadOnly,
    ReadWrite,
    ReadWriteCreate,
    Memory,
    /// In-memory database shared between all connections using the same
    /// name. Used when the daemon runs without a database file: the
    /// writer and the query pool connect to the same store.
    MemorySharedCache,
}

impl Mode {
    fn query(self) -> &'static str {
        match self {
            Mode::ReadOnly => "mode=ro",
            Mode::ReadWrite => "mode=rw",
            Mode::ReadWriteCreate => "mode=rwc",
            Mode::Memory => "mode=memory",
            Mode::MemorySharedCache => "mode=memory&cache=shared",
        }
    }

    fn flags(self) -> OpenFlags {
        let base = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        match self {
            Mode::ReadOnly => base | OpenFlags::SQLITE_OPEN_READ_ONLY,
            Mode::ReadWrite => base | OpenFlags::SQLITE_OPEN_READ_WRITE,
            Mode::ReadWriteCreate | Mode::Memory | Mode::MemorySharedCache => {
                base | OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE
            }
        }
    }
}

/// Connection parameters; cheap to clone and hand to the pool.
#[derive(Debug, Clone)]
pub struct Connector {
    filename: String,
    mode: Mode,
}

impl Connector {
    pub fn new(filename: impl Into<String>, mode: Mode) -> Self {
        Self {
            filename: filename.into(),
            mode,
        }
    }

    /// The URI used to open the database.
    pub fn connect_url(&self) -> String {
        format!("file:{}?{}", self.filename, self.mode.query())
    }

    pub fn connect(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open_with_flags(self.connect_url(), self.mode.flags())?;
        conn.busy_timeout(Duration::from_secs(5))?;
        Ok(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn connect_url_carries_mode() {
        let connector = Connector::new("test.db", Mode::ReadOnly);
        assert_eq!(connector.connect_url(), "file:test.db?mode=ro");
        let connector = Connector::new("shared", Mode::MemorySharedCache);
        assert_eq!(connector.connect_url(), "file:shared?mode=memory&cache=shared");
    }

    #[test]
    fn memory_database_connects() {
        let connector = Connector::new("connector-test", Mode::MemorySharedCache);
        let conn = connector.connect().unwrap();
        conn.execute_batch("CREATE TABLE T (X); INSERT INTO T VALUES (1);")
            .unwrap();
    }

    #[test]
    fn shared_cache_connections_see_each_other() {
        let connector = Connector::new("connector-shared-test", Mode::MemorySharedCache);
        let writer = connector.connect().unwrap();
        writer
            .execute_batch("CREATE TABLE T (X); INSERT INTO T VALUES (42);")
            .unwrap();

        let reader = connector.connect().unwrap();
        let value: i64 = reader
            .query_row("SELECT X FROM T", [], |row| row.get(0))
            .unwrap();
        assert_eq!(value, 42);
        drop(writer);
    }
}
