// Single-statement transactions over scoped sessions

use std::sync::Arc;
use tracing::debug;

use crate::graph::driver::{AccessMode, GraphDriver, GraphSession, Record, Statement, StoreError};

/// Rows produced by one completed transaction
#[derive(Debug)]
pub struct QueryResult {
    statement: &'static str,
    records: Vec<Record>,
}

impl QueryResult {
    pub(crate) fn new(statement: &'static str, records: Vec<Record>) -> Self {
        Self { statement, records }
    }

    /// Name of the statement that produced these rows
    pub fn statement(&self) -> &'static str {
        self.statement
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Runs each statement in its own session and transaction
///
/// No session is reused across calls and nothing is retried: a failure
/// reported by the store, transient or not, is returned as-is.
pub struct TransactionExecutor<D> {
    driver: Arc<D>,
}

impl<D> Clone for TransactionExecutor<D> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
        }
    }
}

impl<D: GraphDriver> TransactionExecutor<D> {
    pub fn new(driver: Arc<D>) -> Self {
        Self { driver }
    }

    /// Run `statement` in a read transaction
    pub async fn read(&self, statement: Statement) -> Result<QueryResult, StoreError> {
        self.execute(AccessMode::Read, statement).await
    }

    /// Run `statement` in a write transaction
    pub async fn write(&self, statement: Statement) -> Result<QueryResult, StoreError> {
        self.execute(AccessMode::Write, statement).await
    }

    async fn execute(
        &self,
        mode: AccessMode,
        statement: Statement,
    ) -> Result<QueryResult, StoreError> {
        let mut session = ScopedSession::new(self.driver.open_session(mode).await?);

        debug!(statement = statement.name(), %mode, "running transaction");
        let outcome = session.run(&statement).await;
        session.close();

        match outcome {
            Ok(records) => {
                debug!(
                    statement = statement.name(),
                    rows = records.len(),
                    "transaction completed"
                );
                Ok(QueryResult::new(statement.name(), records))
            }
            Err(e) => {
                debug!(statement = statement.name(), error = %e, "transaction failed");
                Err(e)
            }
        }
    }
}

/// Closes the wrapped session exactly once
///
/// Dropping the guard closes the session if `close` was never reached, which
/// covers early returns, panics and cancelled futures.
struct ScopedSession<S: GraphSession> {
    session: S,
    closed: bool,
}

impl<S: GraphSession> ScopedSession<S> {
    fn new(session: S) -> Self {
        Self {
            session,
            closed: false,
        }
    }

    async fn run(&mut self, statement: &Statement) -> Result<Vec<Record>, StoreError> {
        self.session.run(statement).await
    }

    fn close(&mut self) {
        if !self.closed {
            self.closed = true;
            self.session.close();
        }
    }
}

impl<S: GraphSession> Drop for ScopedSession<S> {
    fn drop(&mut self) {
        self.close();
    }
}
