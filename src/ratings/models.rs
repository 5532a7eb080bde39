use serde::{Deserialize, Serialize};

pub const MIN_RATING: i64 = 1;
pub const MAX_RATING: i64 = 5;

/// Author of a rating, reduced to public identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingAuthor {
    pub user_id: String,
    pub name: String,
}

/// One `RATED` relationship as listed for a movie
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingView {
    pub rating: i64,
    /// Milliseconds since the epoch of the latest save
    pub timestamp: i64,
    pub user: RatingAuthor,
}

/// Request body for saving a rating
#[derive(Debug, Deserialize)]
pub struct SaveRatingRequest {
    pub rating: i64,
}
