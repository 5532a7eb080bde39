// Authentication service - registration and login against the graph store

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::auth::{
    models::{AuthenticatedUserView, User, UserView},
    password::PasswordHasher,
    token::TokenIssuer,
};
use crate::error::ServiceError;
use crate::graph::{GraphDriver, ResultMapper, Statement, StoreError, TransactionExecutor};

pub const REGISTER_USER: &str = "auth.register";
pub const FIND_USER_BY_EMAIL: &str = "auth.find_by_email";

// Verified against when no user matches the email
const DECOY_PASSWORD: &str = "decoy-password-never-assigned";

/// Registration and login
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Create a user; `Conflict` if the email is already registered
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserView, ServiceError>;

    /// Check credentials and issue a token; `Authentication` on any mismatch
    async fn login(&self, email: &str, password: &str)
        -> Result<AuthenticatedUserView, ServiceError>;
}

/// [`AuthService`] backed by the graph store
pub struct GraphAuthService<D> {
    executor: TransactionExecutor<D>,
    hasher: PasswordHasher,
    tokens: Arc<TokenIssuer>,
    decoy_digest: String,
}

impl<D: GraphDriver> GraphAuthService<D> {
    pub fn new(
        executor: TransactionExecutor<D>,
        hasher: PasswordHasher,
        tokens: Arc<TokenIssuer>,
    ) -> Result<Self, ServiceError> {
        let decoy_digest = hasher.hash(DECOY_PASSWORD)?;
        Ok(Self {
            executor,
            hasher,
            tokens,
            decoy_digest,
        })
    }

    // Argon2 runs on the blocking pool
    async fn hash(&self, password: &str) -> Result<String, ServiceError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| ServiceError::Credential(format!("hashing task failed: {}", e)))?
    }

    async fn verify(&self, password: &str, digest: String) -> Result<bool, ServiceError> {
        let hasher = self.hasher.clone();
        let password = password.to_string();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &digest))
            .await
            .map_err(|e| ServiceError::Credential(format!("verification task failed: {}", e)))
    }
}

#[async_trait]
impl<D: GraphDriver> AuthService for GraphAuthService<D> {
    async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<UserView, ServiceError> {
        let digest = self.hash(password).await?;

        let statement = Statement::new(
            REGISTER_USER,
            r#"
            OPTIONAL MATCH (existing:User {email: $email})
            WITH existing
            WHERE existing IS NULL
            CREATE (u:User {
                userId: $userId,
                email: $email,
                password: $password,
                name: $name,
                createdAt: datetime()
            })
            RETURN u { .userId, .email, .name } AS user
            "#,
            "user",
        )
        .param("userId", Uuid::new_v4().to_string())
        .param("email", email)
        .param("password", digest)
        .param("name", name);

        let result = match self.executor.write(statement).await {
            Ok(result) => result,
            Err(StoreError::ConstraintViolation(_)) => return Err(email_taken(email)),
            Err(e) => return Err(e.into()),
        };

        // The guarded CREATE yields no row when the email is taken
        if result.is_empty() {
            return Err(email_taken(email));
        }

        let user: UserView = ResultMapper::single(result, "User")?;
        info!("Registered user {}", user.user_id);
        Ok(user)
    }

    async fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUserView, ServiceError> {
        let statement = Statement::new(
            FIND_USER_BY_EMAIL,
            r#"
            MATCH (u:User {email: $email})
            RETURN u {
                .userId,
                .email,
                .name,
                .password,
                createdAt: toString(u.createdAt)
            } AS user
            "#,
            "user",
        )
        .param("email", email);

        let result = self.executor.read(statement).await?;
        let user = match ResultMapper::single::<User>(result, "User") {
            Ok(user) => user,
            Err(ServiceError::NotFound { .. }) => {
                self.verify(password, self.decoy_digest.clone()).await?;
                debug!("Login rejected: no user for the given email");
                return Err(ServiceError::Authentication);
            }
            Err(e) => return Err(e),
        };

        if !self.verify(password, user.password.clone()).await? {
            debug!("Login rejected: password mismatch for user {}", user.user_id);
            return Err(ServiceError::Authentication);
        }

        let user = UserView::from(user);
        let token = self.tokens.issue(&user)?;
        debug!("Issued token for user {}", user.user_id);

        Ok(AuthenticatedUserView { user, token })
    }
}

fn email_taken(email: &str) -> ServiceError {
    ServiceError::Conflict(format!("An account already exists with the email address {}", email))
}
