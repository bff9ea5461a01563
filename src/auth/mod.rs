pub mod extractor;
pub mod handlers;
pub mod jwt;
pub mod types;
pub mod utils;

use axum::{
    routing::{get, post},
    Router,
};

use crate::api::AppState;

pub use extractor::AuthenticatedUser;
use handlers::{email_login_handler, email_register_handler, me_handler};

/// Email + password auth routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(email_register_handler))
        .route("/api/auth/login", post(email_login_handler))
        .route("/api/auth/me", get(me_handler))
}
