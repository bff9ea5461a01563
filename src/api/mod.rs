use std::sync::Arc;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{
    auth,
    db::{RecipeStore, UserStore},
    pipeline::RecipePipeline,
};

pub mod error;
pub mod handlers;
pub mod types;

use handlers::{delete_recipe, generate_recipe, health, list_recipes, save_recipe};

#[derive(Clone)]
pub struct AppState {
    pub recipes: Arc<dyn RecipeStore>,
    pub users: Arc<dyn UserStore>,
    pub pipeline: Arc<RecipePipeline>,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// One store backs both recipes and users.
    pub fn new<S>(store: Arc<S>, pipeline: RecipePipeline, jwt_secret: &str) -> Self
    where
        S: RecipeStore + UserStore + 'static,
    {
        Self {
            recipes: store.clone(),
            users: store,
            pipeline: Arc::new(pipeline),
            jwt_secret: Arc::from(jwt_secret),
        }
    }
}

/// Full HTTP surface with permissive CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .merge(auth::router())
        .route("/api/generate-recipe", post(generate_recipe))
        .route("/api/recipes", get(list_recipes).post(save_recipe))
        .route("/api/recipes/{id}", delete(delete_recipe))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods(Any),
        )
        .with_state(state)
}
