// Favorites module
// HAS_FAVORITE relationships between users and movies

pub mod handlers;
pub mod service;

pub use handlers::{add_favorite_handler, list_favorites_handler, remove_favorite_handler};
pub use service::{FavoriteService, GraphFavoriteService};
