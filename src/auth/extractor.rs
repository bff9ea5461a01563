use axum::{
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::{
    api::{error::ApiError, AppState},
    auth::jwt::decode_jwt,
};

/// Caller identity taken from a valid `Authorization: Bearer` token.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app = AppState::from_ref(state);

        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::unauthorized("Missing Authorization header"))?;

        let claims = decode_jwt(&app.jwt_secret, bearer.token())
            .map_err(|_| ApiError::unauthorized("Invalid or expired token"))?;

        Ok(AuthenticatedUser {
            user_id: claims.sub,
        })
    }
}
