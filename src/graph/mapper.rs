// Turns completed transactions into typed records

use serde::de::DeserializeOwned;

use crate::error::ServiceError;
use crate::graph::driver::{Record, StoreError};
use crate::graph::executor::QueryResult;

/// Extracts rows from a [`QueryResult`]
pub struct ResultMapper;

impl ResultMapper {
    /// Exactly one row, converted to `T`
    ///
    /// Zero rows is `NotFound` for `resource`. More than one row breaks the
    /// statement's contract and is reported as a store error rather than
    /// picking one of them.
    pub fn single<T: DeserializeOwned>(
        result: QueryResult,
        resource: &'static str,
    ) -> Result<T, ServiceError> {
        let statement = result.statement();
        let mut records = result.into_records();

        match records.len() {
            0 => Err(ServiceError::NotFound { resource }),
            1 => Ok(Self::convert(statement, records.remove(0))?),
            rows => Err(StoreError::UnexpectedRowCount { statement, rows }.into()),
        }
    }

    /// Every row in store order; an empty result is an empty vector
    pub fn collection<T: DeserializeOwned>(result: QueryResult) -> Result<Vec<T>, ServiceError> {
        let statement = result.statement();

        result
            .into_records()
            .into_iter()
            .map(|record| Self::convert(statement, record).map_err(ServiceError::from))
            .collect()
    }

    fn convert<T: DeserializeOwned>(
        statement: &'static str,
        record: Record,
    ) -> Result<T, StoreError> {
        serde_json::from_value(serde_json::Value::Object(record)).map_err(|e| {
            StoreError::Mapping {
                statement,
                reason: e.to_string(),
            }
        })
    }
}
