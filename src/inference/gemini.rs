use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{ModelTransport, TransportError};
use crate::config::GeminiConfig;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Clone)]
pub struct GeminiTransport {
    client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiTransport {
    pub fn new(config: GeminiConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    fn request_body(&self, instruction: &str) -> GenerateContentRequest {
        let params = &self.config.params;
        GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart {
                    text: instruction.to_string(),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: params.temperature,
                max_output_tokens: params.max_output_tokens,
                top_p: params.top_p,
                top_k: params.top_k,
            },
            safety_settings: ["HARM_CATEGORY_HARASSMENT", "HARM_CATEGORY_HATE_SPEECH"]
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_MEDIUM_AND_ABOVE",
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    max_output_tokens: u32,
    top_p: f32,
    top_k: u32,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present and non-empty.
    fn into_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
            .filter(|text| !text.trim().is_empty())
    }
}

#[async_trait]
impl ModelTransport for GeminiTransport {
    async fn generate(&self, instruction: &str) -> Result<String, TransportError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| TransportError::MissingCredentials(API_KEY_VAR.to_string()))?;

        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, api_key)
            .json(&self.request_body(instruction))
            .send()
            .await
            .map_err(request_error)?;

        let status = response.status();
        let body = response.text().await.map_err(request_error)?;

        if !status.is_success() {
            return Err(TransportError::Status {
                status: status.as_u16(),
                body: body.replace(api_key, "[redacted]"),
            });
        }

        debug!(bytes = body.len(), model = %self.config.model, "provider responded");

        let parsed: GenerateContentResponse =
            serde_json::from_str(&body).map_err(|e| TransportError::Decode(e.to_string()))?;

        parsed.into_text().ok_or(TransportError::EmptyContent)
    }

    fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

// Error text ends up in responses and logs; keep the URL out of it.
fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.without_url().to_string())
}
