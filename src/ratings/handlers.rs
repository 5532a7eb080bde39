// HTTP handlers for movie ratings

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use tracing::debug;

use crate::auth::AuthenticatedUser;
use crate::error::ServiceError;
use crate::models::MovieView;
use crate::paging::{Paging, PagingParams, RATING_SORT_FIELDS};
use crate::ratings::models::{RatingView, SaveRatingRequest};
use crate::AppState;

/// Ratings left for a movie, ordered by timestamp unless asked otherwise
/// GET /api/movies/:movie_id/ratings
pub async fn list_ratings_handler(
    State(state): State<AppState>,
    Path(movie_id): Path<String>,
    params: Result<Query<PagingParams>, QueryRejection>,
) -> Result<Json<Vec<RatingView>>, ServiceError> {
    let Query(params) = params?;
    let paging = Paging::new(params, &RATING_SORT_FIELDS)?;

    let ratings = state.ratings.find_all_by_movie(&movie_id, &paging).await?;
    debug!("Found {} ratings for movie {}", ratings.len(), movie_id);
    Ok(Json(ratings))
}

/// Rate a movie as the current user
/// POST /api/account/ratings/:movie_id
pub async fn save_rating_handler(
    State(state): State<AppState>,
    user: AuthenticatedUser,
    Path(movie_id): Path<String>,
    payload: Result<Json<SaveRatingRequest>, JsonRejection>,
) -> Result<Json<MovieView>, ServiceError> {
    let Json(request) = payload?;
    let movie = state
        .ratings
        .save(&user.user_id, &movie_id, request.rating)
        .await?;
    Ok(Json(movie))
}
