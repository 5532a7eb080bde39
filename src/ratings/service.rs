use async_trait::async_trait;
use tracing::info;

use crate::error::ServiceError;
use crate::graph::{GraphDriver, ResultMapper, Statement, TransactionExecutor};
use crate::models::MovieView;
use crate::paging::Paging;
use crate::ratings::models::{RatingView, MAX_RATING, MIN_RATING};

pub const SAVE_RATING: &str = "ratings.save";
pub const RATINGS_BY_MOVIE: &str = "ratings.by_movie";

/// Movie ratings
#[async_trait]
pub trait RatingService: Send + Sync {
    /// Ratings left for `movie_id`, ordered and paged
    async fn find_all_by_movie(
        &self,
        movie_id: &str,
        paging: &Paging,
    ) -> Result<Vec<RatingView>, ServiceError>;

    /// Save `rating` for the pair, replacing any earlier rating by the same user
    async fn save(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: i64,
    ) -> Result<MovieView, ServiceError>;
}

/// [`RatingService`] backed by `RATED` relationships
pub struct GraphRatingService<D> {
    executor: TransactionExecutor<D>,
}

impl<D: GraphDriver> GraphRatingService<D> {
    pub fn new(executor: TransactionExecutor<D>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<D: GraphDriver> RatingService for GraphRatingService<D> {
    async fn find_all_by_movie(
        &self,
        movie_id: &str,
        paging: &Paging,
    ) -> Result<Vec<RatingView>, ServiceError> {
        let statement = Statement::new(
            RATINGS_BY_MOVIE,
            format!(
                r#"
                MATCH (u:User)-[r:RATED]->(m:Movie {{tmdbId: $movieId}})
                RETURN r {{
                    .rating,
                    .timestamp,
                    user: u {{ .userId, .name }}
                }} AS rating
                ORDER BY {}
                SKIP $skip
                LIMIT $limit
                "#,
                paging.order_by("r")
            ),
            "rating",
        )
        .param("movieId", movie_id)
        .param("skip", paging.skip())
        .param("limit", paging.limit());

        let result = self.executor.read(statement).await?;
        ResultMapper::collection(result)
    }

    async fn save(
        &self,
        user_id: &str,
        movie_id: &str,
        rating: i64,
    ) -> Result<MovieView, ServiceError> {
        if !(MIN_RATING..=MAX_RATING).contains(&rating) {
            return Err(ServiceError::validation(format!(
                "Rating must be between {} and {}",
                MIN_RATING, MAX_RATING
            )));
        }

        let statement = Statement::new(
            SAVE_RATING,
            r#"
            MATCH (u:User {userId: $userId})
            MATCH (m:Movie {tmdbId: $movieId})
            MERGE (u)-[r:RATED]->(m)
            SET r.rating = $rating, r.timestamp = timestamp()
            RETURN m { .*, rating: r.rating } AS movie
            "#,
            "movie",
        )
        .param("userId", user_id)
        .param("movieId", movie_id)
        .param("rating", rating);

        let result = self.executor.write(statement).await?;
        let movie: MovieView = ResultMapper::single(result, "User or movie")?;

        info!("User {} rated movie {} with {}", user_id, movie_id, rating);
        Ok(movie)
    }
}
