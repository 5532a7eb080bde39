// Neoflix API
// Credential handling and transactional graph access behind an axum router

pub mod auth;
pub mod config;
pub mod error;
pub mod favorites;
pub mod graph;
pub mod models;
pub mod paging;
pub mod ratings;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use auth::{AuthService, GraphAuthService, PasswordHasher, TokenIssuer};
use error::ServiceError;
use favorites::{FavoriteService, GraphFavoriteService};
use graph::{GraphDriver, TransactionExecutor};
use ratings::{GraphRatingService, RatingService};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<dyn AuthService>,
    pub favorites: Arc<dyn FavoriteService>,
    pub ratings: Arc<dyn RatingService>,
    pub tokens: Arc<TokenIssuer>,
}

impl AppState {
    /// Wire every service to one shared driver
    pub fn new<D: GraphDriver>(
        driver: Arc<D>,
        tokens: Arc<TokenIssuer>,
        hasher: PasswordHasher,
    ) -> Result<Self, ServiceError> {
        let executor = TransactionExecutor::new(driver);

        Ok(Self {
            auth: Arc::new(GraphAuthService::new(
                executor.clone(),
                hasher,
                Arc::clone(&tokens),
            )?),
            favorites: Arc::new(GraphFavoriteService::new(executor.clone())),
            ratings: Arc::new(GraphRatingService::new(executor)),
            tokens,
        })
    }
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Creates and configures the application router
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route(
            "/api/account/favorites",
            get(favorites::list_favorites_handler),
        )
        .route(
            "/api/account/favorites/:movie_id",
            post(favorites::add_favorite_handler).delete(favorites::remove_favorite_handler),
        )
        .route(
            "/api/account/ratings/:movie_id",
            post(ratings::save_rating_handler),
        )
        .route(
            "/api/movies/:movie_id/ratings",
            get(ratings::list_ratings_handler),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
