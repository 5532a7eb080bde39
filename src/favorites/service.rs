use async_trait::async_trait;
use tracing::info;

use crate::error::ServiceError;
use crate::graph::{GraphDriver, ResultMapper, Statement, TransactionExecutor};
use crate::models::MovieView;
use crate::paging::Paging;

pub const SAVE_FAVORITE: &str = "favorites.save";
pub const FAVORITES_BY_USER: &str = "favorites.by_user";
pub const DELETE_FAVORITE: &str = "favorites.delete";

/// A user's favorite movies
#[async_trait]
pub trait FavoriteService: Send + Sync {
    /// Mark `movie_id` as a favorite of `user_id`; repeating it is a no-op
    async fn save(&self, user_id: &str, movie_id: &str) -> Result<MovieView, ServiceError>;

    /// Favorites of `user_id`, ordered and paged
    async fn find_all_by_user(
        &self,
        user_id: &str,
        paging: &Paging,
    ) -> Result<Vec<MovieView>, ServiceError>;

    /// Remove the favorite; `NotFound` if it does not exist
    async fn delete(&self, user_id: &str, movie_id: &str) -> Result<MovieView, ServiceError>;
}

/// [`FavoriteService`] backed by `HAS_FAVORITE` relationships
pub struct GraphFavoriteService<D> {
    executor: TransactionExecutor<D>,
}

impl<D: GraphDriver> GraphFavoriteService<D> {
    pub fn new(executor: TransactionExecutor<D>) -> Self {
        Self { executor }
    }
}

#[async_trait]
impl<D: GraphDriver> FavoriteService for GraphFavoriteService<D> {
    async fn save(&self, user_id: &str, movie_id: &str) -> Result<MovieView, ServiceError> {
        let statement = Statement::new(
            SAVE_FAVORITE,
            r#"
            MATCH (u:User {userId: $userId})
            MATCH (m:Movie {tmdbId: $movieId})
            MERGE (u)-[r:HAS_FAVORITE]->(m)
            ON CREATE SET r.createdAt = datetime()
            RETURN m { .*, favorite: true } AS movie
            "#,
            "movie",
        )
        .param("userId", user_id)
        .param("movieId", movie_id);

        let result = self.executor.write(statement).await?;
        let movie: MovieView = ResultMapper::single(result, "User or movie")?;

        info!("User {} added movie {} to favorites", user_id, movie_id);
        Ok(movie)
    }

    async fn find_all_by_user(
        &self,
        user_id: &str,
        paging: &Paging,
    ) -> Result<Vec<MovieView>, ServiceError> {
        let statement = Statement::new(
            FAVORITES_BY_USER,
            format!(
                r#"
                MATCH (u:User {{userId: $userId}})-[r:HAS_FAVORITE]->(m:Movie)
                RETURN m {{ .*, favorite: true }} AS movie
                ORDER BY {}
                SKIP $skip
                LIMIT $limit
                "#,
                paging.order_by("m")
            ),
            "movie",
        )
        .param("userId", user_id)
        .param("skip", paging.skip())
        .param("limit", paging.limit());

        let result = self.executor.read(statement).await?;
        ResultMapper::collection(result)
    }

    async fn delete(&self, user_id: &str, movie_id: &str) -> Result<MovieView, ServiceError> {
        let statement = Statement::new(
            DELETE_FAVORITE,
            r#"
            MATCH (u:User {userId: $userId})-[r:HAS_FAVORITE]->(m:Movie {tmdbId: $movieId})
            DELETE r
            RETURN m { .*, favorite: false } AS movie
            "#,
            "movie",
        )
        .param("userId", user_id)
        .param("movieId", movie_id);

        let result = self.executor.write(statement).await?;
        let movie: MovieView = ResultMapper::single(result, "Favorite")?;

        info!("User {} removed movie {} from favorites", user_id, movie_id);
        Ok(movie)
    }
}
