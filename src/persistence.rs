//! Database persistence traits.
//!
//! A successful submission writes the item update and the ledger append
//! in one transaction, so the store traits all take a transaction
//! handle rather than talking to the database directly. Expressing a
//! transaction that spans multiple stores without committing to one
//! backend is the fiddly part; the generic associated `Transaction<'a>`
//! type is what makes it possible.

pub mod postgres;

use anyhow::Result;
use parking_lot::{RwLock, RwLockWriteGuard};
use std::sync::Arc;

/// An instance of a persistence (store) that can hold data.
///
/// Must be cloneable and thread-safe.
pub trait Persistence: Send + Sync + Clone {
    type Connection: Connection<Self>;
    type Transaction<'a>: Transaction;

    /// Get a connection to a store.
    fn get_connection(&self) -> Result<Self::Connection>;
}

/// A connection to a database/persistence.
pub trait Connection<P: Persistence> {
    fn start_transaction<'a>(&'a mut self) -> Result<P::Transaction<'a>>;
}

/// A database transaction. Dropping one without committing discards
/// its writes.
pub trait Transaction {
    fn commit(self) -> Result<()>;
    fn rollback(self) -> Result<()>;
}

pub type TransactionOf<'a, P> = <P as Persistence>::Transaction<'a>;

/// Fake in-memory persistence.
///
/// Useful for unit tests. One global write lock stands in for the
/// database's serialization; writes are buffered on the transaction
/// and only applied by `commit`, so a dropped transaction really does
/// roll back.
#[derive(Debug, Clone)]
pub struct InMemoryPersistence {
    lock: Arc<RwLock<()>>,
}

impl InMemoryPersistence {
    pub fn new() -> Self {
        Self {
            lock: Arc::new(RwLock::new(())),
        }
    }
}

impl Default for InMemoryPersistence {
    fn default() -> Self {
        Self::new()
    }
}

impl Persistence for InMemoryPersistence {
    type Connection = InMemoryConnection;
    type Transaction<'a> = InMemoryTransaction<'a>;

    fn get_connection(&self) -> Result<Self::Connection> {
        Ok(InMemoryConnection {
            lock: self.lock.clone(),
        })
    }
}

#[derive(Debug)]
pub struct InMemoryConnection {
    lock: Arc<RwLock<()>>,
}

impl Connection<InMemoryPersistence> for InMemoryConnection {
    fn start_transaction<'a>(&'a mut self) -> Result<InMemoryTransaction<'a>> {
        Ok(InMemoryTransaction {
            _guard: self.lock.write(),
            pending: Vec::new(),
        })
    }
}

pub struct InMemoryTransaction<'a> {
    _guard: RwLockWriteGuard<'a, ()>,
    pending: Vec<Box<dyn FnOnce() + Send>>,
}

impl<'a> InMemoryTransaction<'a> {
    /// Buffer a write to be applied when this transaction commits.
    pub fn defer(&mut self, write: impl FnOnce() + Send + 'static) {
        self.pending.push(Box::new(write));
    }
}

impl<'a> Transaction for InMemoryTransaction<'a> {
    fn commit(mut self) -> Result<()> {
        for write in self.pending.drain(..) {
            write();
        }
        Ok(())
    }

    fn rollback(self) -> Result<()> {
        // buffered writes are simply dropped
        Ok(())
    }
}
