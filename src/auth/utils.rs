use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

pub const MIN_PASSWORD_LEN: usize = 6;

pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string();
    Ok(hash)
}

pub fn verify_password(hash: &str, password: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Trimmed and lowercased, the form emails are stored and looked up in.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Reason the credentials are unacceptable for a new account, if any.
pub fn registration_problem(email: &str, password: &str) -> Option<&'static str> {
    if email.is_empty() || !email.contains('@') {
        return Some("A valid email address is required");
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Some("Password must be at least 6 characters");
    }
    None
}
