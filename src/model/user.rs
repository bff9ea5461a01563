use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    pub created_ts: i64,
}

impl User {
    pub fn new(id: String, email: String, password_hash: String) -> Self {
        Self {
            id,
            email,
            password_hash,
            created_ts: chrono::Utc::now().timestamp(),
        }
    }
}
