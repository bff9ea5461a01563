use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    api::{error::ApiError, AppState},
    auth::{
        extractor::AuthenticatedUser,
        jwt::make_jwt,
        types::{EmailAuthResponse, EmailCredentials, MeResponse},
        utils::{hash_password, normalize_email, registration_problem, verify_password},
    },
    db::StoreError,
    model::user::User,
};

pub async fn email_register_handler(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<EmailCredentials>, ApiError>,
) -> Result<Json<EmailAuthResponse>, ApiError> {
    let email = normalize_email(&req.email);

    if let Some(problem) = registration_problem(&email, &req.password) {
        return Err(ApiError::bad_request(problem));
    }

    let hash = hash_password(&req.password).map_err(ApiError::internal)?;

    let user = state
        .users
        .create_user(User::new(Uuid::new_v4().to_string(), email, hash))
        .await
        .map_err(|err| match err {
            StoreError::Conflict(_) => ApiError::conflict("Email already registered"),
            other => ApiError::internal(other),
        })?;

    info!(user_id = %user.id, "user registered");

    let jwt = make_jwt(&state.jwt_secret, &user.id).map_err(ApiError::internal)?;

    Ok(Json(EmailAuthResponse {
        jwt,
        user_id: user.id,
        email: user.email,
    }))
}

pub async fn email_login_handler(
    State(state): State<AppState>,
    WithRejection(Json(req), _): WithRejection<Json<EmailCredentials>, ApiError>,
) -> Result<Json<EmailAuthResponse>, ApiError> {
    let email = normalize_email(&req.email);

    let user = state
        .users
        .find_user_by_email(&email)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let valid = verify_password(&user.password_hash, &req.password).map_err(ApiError::internal)?;
    if !valid {
        warn!(user_id = %user.id, "login with wrong password");
        return Err(ApiError::unauthorized("Invalid credentials"));
    }

    let jwt = make_jwt(&state.jwt_secret, &user.id).map_err(ApiError::internal)?;

    Ok(Json(EmailAuthResponse {
        jwt,
        user_id: user.id,
        email: user.email,
    }))
}

pub async fn me_handler(
    State(state): State<AppState>,
    auth: AuthenticatedUser,
) -> Result<Json<MeResponse>, ApiError> {
    let user = state
        .users
        .load_user(&auth.user_id)
        .await
        .map_err(ApiError::internal)?
        .ok_or_else(|| ApiError::unauthorized("Account no longer exists"))?;

    Ok(Json(MeResponse {
        user_id: user.id,
        email: user.email,
        created_ts: user.created_ts,
    }))
}
