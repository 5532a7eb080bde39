// Schema constraints the services rely on

use tracing::info;

use crate::graph::{GraphDriver, Statement, StoreError, TransactionExecutor};

pub const USER_EMAIL_CONSTRAINT: &str = "schema.user_email_unique";
pub const USER_ID_CONSTRAINT: &str = "schema.user_id_unique";

/// Create the uniqueness constraints on `User` if they are missing
///
/// Registration also guards against duplicates in its own statement; the
/// constraint closes the window between two concurrent registrations.
pub async fn ensure_constraints<D: GraphDriver>(
    executor: &TransactionExecutor<D>,
) -> Result<(), StoreError> {
    executor
        .write(Statement::new(
            USER_EMAIL_CONSTRAINT,
            "CREATE CONSTRAINT user_email_unique IF NOT EXISTS \
             FOR (u:User) REQUIRE u.email IS UNIQUE",
            "constraint",
        ))
        .await?;

    executor
        .write(Statement::new(
            USER_ID_CONSTRAINT,
            "CREATE CONSTRAINT user_id_unique IF NOT EXISTS \
             FOR (u:User) REQUIRE u.userId IS UNIQUE",
            "constraint",
        ))
        .await?;

    info!("User uniqueness constraints in place");
    Ok(())
}
