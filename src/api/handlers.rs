use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use serde_json::Value;
use tracing::{debug, info};

use super::{
    error::ApiError,
    types::{
        GenerateRecipeRequest, GenerateRecipeResponse, RecipeListResponse, SaveRecipeRequest,
        SavedRecipeResponse,
    },
    AppState,
};
use crate::{
    auth::AuthenticatedUser,
    model::recipe::{NewSavedRecipe, RecipeRequest},
    recipe::normalize,
};

pub async fn health() -> &'static str {
    "ok"
}

/// POST /api/generate-recipe
pub async fn generate_recipe(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<GenerateRecipeRequest>, ApiError>,
) -> Result<Json<GenerateRecipeResponse>, ApiError> {
    let request = RecipeRequest::new(
        req.prompt.as_deref().unwrap_or_default(),
        req.cooking_time.unwrap_or_default(),
    );
    debug!(user_id = %auth.user_id, prompt = %request.prompt, "generate recipe");

    let generated = state.pipeline.generate(&request).await?;

    info!(
        user_id = %auth.user_id,
        attempts = generated.attempts,
        title = %generated.recipe.title,
        "recipe served"
    );

    Ok(Json(GenerateRecipeResponse {
        recipe: generated.recipe,
    }))
}

/// GET /api/recipes
pub async fn list_recipes(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<RecipeListResponse>, ApiError> {
    let recipes = state.recipes.list_by_owner(&auth.user_id).await?;
    Ok(Json(RecipeListResponse { recipes }))
}

/// POST /api/recipes
pub async fn save_recipe(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    WithRejection(Json(req), _): WithRejection<Json<SaveRecipeRequest>, ApiError>,
) -> Result<(StatusCode, Json<SavedRecipeResponse>), ApiError> {
    let Value::Object(candidate) = req.recipe else {
        return Err(ApiError::bad_request("Recipe must be a JSON object"));
    };

    let saved = state
        .recipes
        .insert(NewSavedRecipe {
            user_id: auth.user_id,
            prompt: req.prompt.as_deref().unwrap_or_default().trim().to_string(),
            cooking_type: req.cooking_time.unwrap_or_default(),
            recipe: normalize(&candidate),
        })
        .await?;

    info!(user_id = %saved.user_id, recipe_id = %saved.id, "recipe saved");

    Ok((
        StatusCode::CREATED,
        Json(SavedRecipeResponse { recipe: saved }),
    ))
}

/// DELETE /api/recipes/{id}
pub async fn delete_recipe(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.recipes.delete(&auth.user_id, &id).await? {
        info!(user_id = %auth.user_id, recipe_id = %id, "recipe deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found("Recipe not found"))
    }
}
