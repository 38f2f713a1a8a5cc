//! A bounded FIFO pool of read connections.

use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::Mutex;

use super::{Connector, Query};

/// Holds up to `max_size` idle [`Query`] objects. Acquiring from an
/// empty pool opens a new connection; releasing into a full pool closes
/// the connection instead.
pub struct QueryPool {
    connector: Connector,
    max_size: usize,
    idle: Mutex<VecDeque<Query>>,
}

impl QueryPool {
    pub fn new(max_size: usize, connector: Connector) -> Self {
        Self {
            connector,
            max_size,
            idle: Mutex::new(VecDeque::new()),
        }
    }

    /// Take a query object out of the pool, opening a connection when
    /// none is idle.
    pub fn acquire(&self) -> rusqlite::Result<PooledQuery<'_>> {
        let idle = self
            .idle
            .lock()
            .expect("pool mutex poisoned")
            .pop_front();
        let query = match idle {
            Some(query) => query,
            None => {
                tracing::debug!("establishing new database connection");
                Query::new(self.connector.connect()?)
            }
        };
        Ok(PooledQuery {
            query: Some(query),
            pool: self,
        })
    }

    fn release(&self, query: Query) {
        let mut idle = self.idle.lock().expect("pool mutex poisoned");
        if idle.len() >= self.max_size {
            tracing::debug!("closing database connection, pool full");
            drop(query);
            return;
        }
        idle.push_back(query);
    }

    /// Close every idle connection.
    pub fn teardown(&self) {
        let mut idle = self.idle.lock().expect("pool mutex poisoned");
        while let Some(query) = idle.pop_front() {
            tracing::debug!("closing database connection");
            drop(query);
        }
    }

    #[cfg(test)]
    fn idle_count(&self) -> usize {
        self.idle.lock().expect("pool mutex poisoned").len()
    }
}

/// A pool loan; returns the query to the pool when dropped.
pub struct PooledQuery<'a> {
    query: Option<Query>,
    pool: &'a QueryPool,
}

impl Deref for PooledQuery<'_> {
    type Target = Query;

    fn deref(&self) -> &Query {
        self.query.as_ref().expect("query present until drop")
    }
}

impl Drop for PooledQuery<'_> {
    fn drop(&mut self) {
        if let Some(query) = self.query.take() {
            self.pool.release(query);
        }
    }
}
