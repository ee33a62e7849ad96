//! Authentication core: password hashing, session token issuance and
//! validation, and the axum middleware that guards protected routes.

pub mod auth_service;
pub mod hashing;
pub mod login_service;
pub mod middleware;
pub mod models;
pub mod token;

pub use auth_service::AuthService;
pub use login_service::LoginService;
pub use models::{AuthError, CurrentUser};
pub use token::{Claims, TokenService};
