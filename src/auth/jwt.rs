use anyhow::Result;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7; // 7 days

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

pub fn make_jwt(secret: &str, user_id: &str) -> Result<String> {
    let exp = (chrono::Utc::now().timestamp() + TOKEN_TTL_SECS) as usize;

    let claims = Claims {
        sub: user_id.to_string(),
        exp,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;
    Ok(token)
}

/// Verifies signature and expiry.
pub fn decode_jwt(secret: &str, token: &str) -> Result<Claims> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_round_trip_and_wrong_secret() {
        let token = make_jwt("secret-a", "user-1").unwrap();
        assert_eq!(decode_jwt("secret-a", &token).unwrap().sub, "user-1");
        assert!(decode_jwt("secret-b", &token).is_err());
        assert!(decode_jwt("secret-a", "not.a.token").is_err());
    }
}
