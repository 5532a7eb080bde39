// Authentication module
// Password hashing, token issuing, registration and login

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod password;
pub mod service;
pub mod token;

pub use handlers::{login_handler, register_handler};
pub use middleware::AuthenticatedUser;
pub use models::{AuthenticatedUserView, LoginRequest, RegisterRequest, UserView};
pub use password::PasswordHasher;
pub use service::{AuthService, GraphAuthService};
pub use token::{Claims, TokenIssuer};
