use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
pub struct EmailCredentials {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Serialize)]
pub struct EmailAuthResponse {
    pub jwt: String,
    pub user_id: String,
    pub email: String,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub user_id: String,
    pub email: String,
    pub created_ts: i64,
}
