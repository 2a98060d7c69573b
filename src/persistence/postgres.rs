use super::*;
use r2d2_postgres::{postgres::NoTls, PostgresConnectionManager};

#[derive(Clone)]
pub struct PostgresPersistence {
    pool: r2d2::Pool<PostgresConnectionManager<NoTls>>,
}

impl PostgresPersistence {
    /// Connect using a libpq-style parameter string, e.g.
    /// `host=localhost user=gavel dbname=gavel`.
    pub fn connect(params: &str) -> Result<Self> {
        let manager = PostgresConnectionManager::new(params.parse()?, NoTls);
        Ok(Self {
            pool: r2d2::Pool::new(manager)?,
        })
    }
}

impl Persistence for PostgresPersistence {
    type Connection = PostgresConnection;
    type Transaction<'a> = PostgresTransaction<'a>;

    fn get_connection(&self) -> Result<Self::Connection> {
        Ok(self.pool.get()?)
    }
}

pub type PostgresConnection =
    r2d2::PooledConnection<PostgresConnectionManager<NoTls>>;

impl Connection<PostgresPersistence> for PostgresConnection {
    fn start_transaction<'a>(&'a mut self) -> Result<PostgresTransaction<'a>> {
        Ok(self.transaction()?)
    }
}

pub type PostgresTransaction<'a> = ::postgres::Transaction<'a>;

impl<'a> Transaction for PostgresTransaction<'a> {
    fn commit(self) -> Result<()> {
        Ok(::postgres::Transaction::commit(self)?)
    }

    fn rollback(self) -> Result<()> {
        Ok(::postgres::Transaction::rollback(self)?)
    }
}
