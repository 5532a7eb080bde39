// Store-facing types: statements, records, sessions and the errors they raise

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// A single result row, already reduced to a plain attribute mapping
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Access mode a session is opened with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
}

impl fmt::Display for AccessMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessMode::Read => write!(f, "read"),
            AccessMode::Write => write!(f, "write"),
        }
    }
}

/// Query parameter value
#[derive(Clone, PartialEq)]
pub enum Param {
    Text(String),
    Integer(i64),
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Text(value.to_string())
    }
}

impl From<String> for Param {
    fn from(value: String) -> Self {
        Param::Text(value)
    }
}

impl From<i64> for Param {
    fn from(value: i64) -> Self {
        Param::Integer(value)
    }
}

/// One parameterized Cypher statement
///
/// Every statement returns its rows under a single map-projected column, named
/// by `column`. The `name` identifies the statement in logs and lets test
/// doubles dispatch on it without parsing Cypher.
#[derive(Clone)]
pub struct Statement {
    name: &'static str,
    cypher: String,
    column: &'static str,
    params: Vec<(&'static str, Param)>,
}

impl Statement {
    pub fn new(name: &'static str, cypher: impl Into<String>, column: &'static str) -> Self {
        Self {
            name,
            cypher: cypher.into(),
            column,
            params: Vec::new(),
        }
    }

    /// Bind a parameter, replacing any earlier value for the same key
    pub fn param(mut self, key: &'static str, value: impl Into<Param>) -> Self {
        self.params.retain(|(existing, _)| *existing != key);
        self.params.push((key, value.into()));
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn cypher(&self) -> &str {
        &self.cypher
    }

    pub fn column(&self) -> &'static str {
        self.column
    }

    pub fn params(&self) -> &[(&'static str, Param)] {
        &self.params
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.params.iter().find_map(|(k, v)| match v {
            Param::Text(text) if *k == key => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn integer(&self, key: &str) -> Option<i64> {
        self.params.iter().find_map(|(k, v)| match v {
            Param::Integer(value) if *k == key => Some(*value),
            _ => None,
        })
    }
}

// Parameter values may hold password digests, so only keys are printed.
impl fmt::Debug for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<&str> = self.params.iter().map(|(k, _)| *k).collect();
        f.debug_struct("Statement")
            .field("name", &self.name)
            .field("column", &self.column)
            .field("params", &keys)
            .finish()
    }
}

/// Failures raised by the graph store or while reading its rows
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("could not reach the graph store: {0}")]
    Connection(String),

    #[error("query failed: {0}")]
    Query(String),

    #[error("constraint violated: {0}")]
    ConstraintViolation(String),

    #[error("expected exactly one row from `{statement}`, got {rows}")]
    UnexpectedRowCount { statement: &'static str, rows: usize },

    #[error("could not map row from `{statement}`: {reason}")]
    Mapping {
        statement: &'static str,
        reason: String,
    },
}

/// Process-wide store client
///
/// Created once at startup and shared by every service. Dropping the last
/// handle closes the underlying connection pool.
#[async_trait]
pub trait GraphDriver: Send + Sync + 'static {
    type Session: GraphSession;

    /// Acquire a session scoped to `mode`
    async fn open_session(&self, mode: AccessMode) -> Result<Self::Session, StoreError>;
}

/// A session borrowed from the driver for exactly one transaction
#[async_trait]
pub trait GraphSession: Send {
    /// Run `statement` inside one transaction and return every row
    async fn run(&mut self, statement: &Statement) -> Result<Vec<Record>, StoreError>;

    /// Give the session back to the driver
    fn close(&mut self);
}
