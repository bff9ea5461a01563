use std::{str::FromStr, time::Duration};

use anyhow::{Context, Result};

use crate::inference::invoker::{MAX_RETRIES, RETRY_DELAY};

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_PATH: &str = "recipedb";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash-latest";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sampling parameters sent with every generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationParams {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1500,
            top_p: 0.9,
            top_k: 40,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// `None` keeps the server up; generation then fails as unconfigured.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub params: GenerationParams,
}

impl GeminiConfig {
    pub fn from_env() -> Self {
        Self {
            api_key: dotenvy::var("GEMINI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            model: dotenvy::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.into()),
            base_url: dotenvy::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.into()),
            params: GenerationParams::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationSettings {
    pub max_retries: u32,
    pub retry_delay: Duration,
    /// Budget for the whole pipeline, retries and backoff included.
    pub request_timeout: Duration,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            max_retries: MAX_RETRIES,
            retry_delay: RETRY_DELAY,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl GenerationSettings {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            max_retries: env_parse("GENERATION_MAX_RETRIES")?.unwrap_or(defaults.max_retries),
            retry_delay: env_parse("GENERATION_RETRY_DELAY_MS")?
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),
            request_timeout: env_parse("GENERATION_TIMEOUT_SECS")?
                .map(Duration::from_secs)
                .unwrap_or(defaults.request_timeout),
        })
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: String,
    pub db_path: String,
    pub jwt_secret: String,
    pub gemini: GeminiConfig,
    pub generation: GenerationSettings,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let jwt_secret = dotenvy::var("JWT_SECRET").context("JWT_SECRET must be set")?;

        Ok(Self {
            bind_addr: dotenvy::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into()),
            db_path: dotenvy::var("DB_PATH").unwrap_or_else(|_| DEFAULT_DB_PATH.into()),
            jwt_secret,
            gemini: GeminiConfig::from_env(),
            generation: GenerationSettings::from_env()?,
        })
    }
}

/// `Ok(None)` when unset, an error when set but unparsable.
fn env_parse<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match dotenvy::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} has an invalid value: {raw:?}")),
        Err(_) => Ok(None),
    }
}
