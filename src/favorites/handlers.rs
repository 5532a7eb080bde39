// HTTP handlers for the current user's favorites

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};

use crate::auth::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::MovieView;
use crate::paging::{Paging, PagingParams, MOVIE_SORT_FIELDS};
use crate::AppState;

/// GET /api/account/favorites
pub async fn list_favorites_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    params: Result<Query<PagingParams>, QueryRejection>,
) -> Result<Json<Vec<MovieView>>, ServiceError> {
    let Query(params) = params?;
    let paging = Paging::new(params, &MOVIE_SORT_FIELDS)?;

    let movies = state
        .favorites
        .find_all_by_user(&user.user_id, &paging)
        .await?;
    Ok(Json(movies))
}

/// POST /api/account/favorites/:movie_id
pub async fn add_favorite_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(movie_id): Path<String>,
) -> Result<Json<MovieView>, ServiceError> {
    let movie = state.favorites.save(&user.user_id, &movie_id).await?;
    Ok(Json(movie))
}

/// DELETE /api/account/favorites/:movie_id
pub async fn remove_favorite_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(movie_id): Path<String>,
) -> Result<Json<MovieView>, ServiceError> {
    let movie = state.favorites.delete(&user.user_id, &movie_id).await?;
    Ok(Json(movie))
}
