// Graph store access module
// Scoped sessions, single-statement transactions and row mapping

mod driver;
mod executor;
mod mapper;
pub mod neo4j;
pub mod schema;

#[cfg(test)]
pub(crate) mod memory;

pub use driver::{AccessMode, GraphDriver, GraphSession, Param, Record, Statement, StoreError};
pub use executor::{QueryResult, TransactionExecutor};
pub use mapper::ResultMapper;
