// Ratings module
// RATED relationships carrying a 1-5 score and a save timestamp

pub mod handlers;
pub mod models;
pub mod service;

pub use handlers::{list_ratings_handler, save_rating_handler};
pub use models::{RatingAuthor, RatingView, SaveRatingRequest};
pub use service::{GraphRatingService, RatingService};
