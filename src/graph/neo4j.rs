//! Neo4j backend for the graph driver traits
//!
//! Each session wraps a handle to the shared `neo4rs` connection pool and runs
//! one explicit transaction. Write transactions commit; read transactions are
//! rolled back so a read session can never persist a change.

use async_trait::async_trait;
use neo4rs::{query, ConfigBuilder, Graph, Query, Row, Txn};
use tracing::{debug, info, warn};

use crate::config::GraphSettings;
use crate::graph::driver::{
    AccessMode, GraphDriver, GraphSession, Param, Record, Statement, StoreError,
};

/// Driver backed by a pooled Bolt connection to Neo4j
pub struct Neo4jDriver {
    graph: Graph,
}

impl Neo4jDriver {
    /// Connect to the configured database and verify the connection
    pub async fn connect(settings: &GraphSettings) -> Result<Self, StoreError> {
        debug!("Creating Neo4j connection pool for {}", settings.uri);

        let config = ConfigBuilder::default()
            .uri(settings.uri.as_str())
            .user(settings.username.as_str())
            .password(settings.password.as_str())
            .db(settings.database.as_str())
            .max_connections(settings.max_connections)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let graph = Graph::connect(config)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        info!("Neo4j connection pool created successfully");
        Ok(Self { graph })
    }
}

#[async_trait]
impl GraphDriver for Neo4jDriver {
    type Session = Neo4jSession;

    // Nothing is acquired here; the pool hands out a connection when `run`
    // starts its transaction.
    async fn open_session(&self, mode: AccessMode) -> Result<Self::Session, StoreError> {
        Ok(Neo4jSession {
            graph: self.graph.clone(),
            mode,
            open: true,
        })
    }
}

/// One transaction's worth of access to the pool
///
/// The pooled Bolt connection is taken by the `Txn` that `run` starts and goes
/// back to the pool when that transaction commits, rolls back or is dropped.
/// `close` only marks the session as spent so it cannot run a second
/// statement. The access mode is not sent to the server: it decides whether
/// `run` commits (write) or rolls back (read).
pub struct Neo4jSession {
    graph: Graph,
    mode: AccessMode,
    open: bool,
}

impl Neo4jSession {
    async fn fetch(txn: &mut Txn, statement: &Statement) -> Result<Vec<Record>, StoreError> {
        let mut stream = txn.execute(to_query(statement)).await.map_err(classify)?;

        let mut records = Vec::new();
        while let Some(row) = stream.next(txn.handle()).await.map_err(classify)? {
            records.push(to_record(&row, statement)?);
        }
        Ok(records)
    }
}

#[async_trait]
impl GraphSession for Neo4jSession {
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Record>, StoreError> {
        if !self.open {
            return Err(StoreError::Query("session already closed".to_string()));
        }

        let mut txn = self.graph.start_txn().await.map_err(classify)?;

        match Self::fetch(&mut txn, statement).await {
            Ok(records) => {
                match self.mode {
                    AccessMode::Write => txn.commit().await.map_err(classify)?,
                    AccessMode::Read => txn.rollback().await.map_err(classify)?,
                }
                Ok(records)
            }
            Err(e) => {
                if let Err(rollback) = txn.rollback().await {
                    warn!(
                        statement = statement.name(),
                        "rollback after failed statement also failed: {}", rollback
                    );
                }
                Err(e)
            }
        }
    }

    // The connection was already returned when the transaction ended
    fn close(&mut self) {
        self.open = false;
    }
}

fn to_query(statement: &Statement) -> Query {
    statement
        .params()
        .iter()
        .fold(query(statement.cypher()), |q, (key, value)| match value {
            Param::Text(text) => q.param(key, text.as_str()),
            Param::Integer(number) => q.param(key, *number),
        })
}

fn to_record(row: &Row, statement: &Statement) -> Result<Record, StoreError> {
    let value: serde_json::Value =
        row.get(statement.column())
            .map_err(|e| StoreError::Mapping {
                statement: statement.name(),
                reason: e.to_string(),
            })?;

    match value {
        serde_json::Value::Object(record) => Ok(record),
        other => Err(StoreError::Mapping {
            statement: statement.name(),
            reason: format!(
                "column `{}` is not a map projection: {}",
                statement.column(),
                other
            ),
        }),
    }
}

/// Uniqueness and other schema violations are kept apart so callers can map
/// them to conflicts; everything else is a plain query failure.
fn classify(error: neo4rs::Error) -> StoreError {
    let message = error.to_string();
    if message.contains("ConstraintValidationFailed") {
        StoreError::ConstraintViolation(message)
    } else {
        StoreError::Query(message)
    }
}
