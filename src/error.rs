use std::time::Duration;

use thiserror::Error;

use crate::inference::TransportError;

/// Fixed decline text shown to users for off-topic or unsafe requests.
pub const DECLINE_MESSAGE: &str = "Sorry, I'm an AI built specifically for recipes and cooking. I can't assist you with that. Please ask me about food recipes, cooking techniques, or ingredients instead!";

pub const EMPTY_PROMPT_MESSAGE: &str = "Prompt is required";

pub const EXHAUSTED_MESSAGE: &str =
    "Failed to generate recipe after multiple attempts. Please try again.";

pub const TIMEOUT_MESSAGE: &str =
    "The recipe service took too long to respond. Please try again.";

pub const UNAVAILABLE_MESSAGE: &str = "Recipe generation is temporarily unavailable.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    EmptyPrompt,
    ForbiddenKeyword,
    OffTopic,
    ModelDeclined,
}

/// Terminal, user-facing refusal. Not a system failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub kind: RejectionKind,
    pub reason: String,
}

impl Rejection {
    pub fn empty_prompt() -> Self {
        Self {
            kind: RejectionKind::EmptyPrompt,
            reason: EMPTY_PROMPT_MESSAGE.to_string(),
        }
    }

    pub fn declined(kind: RejectionKind) -> Self {
        Self {
            kind,
            reason: DECLINE_MESSAGE.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("request rejected: {}", .0.reason)]
    Rejected(Rejection),

    #[error("model provider request failed: {0}")]
    Transport(String),

    #[error("model returned no usable content: {0}")]
    Model(String),

    #[error("failed to parse recipe data from model response: {0}")]
    Parse(String),

    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("generation failed after {attempts} attempts, last error: {last_error}")]
    Exhausted {
        attempts: u32,
        last_error: Box<GenerationError>,
    },

    #[error("internal error: {0}")]
    Internal(String),
}

impl GenerationError {
    /// Transient failures that a fresh attempt may fix.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Model(_) | Self::Parse(_))
    }

    /// Short, stable text safe to show as the primary message.
    pub fn user_message(&self) -> &str {
        match self {
            Self::Rejected(rejection) => &rejection.reason,
            Self::Exhausted { .. } => EXHAUSTED_MESSAGE,
            Self::Timeout(_) => TIMEOUT_MESSAGE,
            Self::Configuration(_) => UNAVAILABLE_MESSAGE,
            Self::Transport(_) | Self::Model(_) | Self::Parse(_) | Self::Internal(_) => {
                "Internal server error"
            }
        }
    }

    /// Diagnostic detail for logs and the optional `details` field.
    pub fn details(&self) -> Option<String> {
        match self {
            Self::Rejected(_) | Self::Timeout(_) | Self::Configuration(_) => None,
            Self::Exhausted { last_error, .. } => Some(last_error.to_string()),
            other => Some(other.to_string()),
        }
    }

    pub fn rejection(&self) -> Option<&Rejection> {
        match self {
            Self::Rejected(rejection) => Some(rejection),
            _ => None,
        }
    }
}

impl From<TransportError> for GenerationError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::MissingCredentials(name) => {
                Self::Configuration(format!("{name} is not configured"))
            }
            TransportError::EmptyContent => Self::Model(err.to_string()),
            other => Self::Transport(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retry_classification_follows_taxonomy() {
        assert!(GenerationError::Transport("503".into()).is_retryable());
        assert!(GenerationError::Model("empty".into()).is_retryable());
        assert!(GenerationError::Parse("bad json".into()).is_retryable());

        assert!(!GenerationError::Rejected(Rejection::empty_prompt()).is_retryable());
        assert!(!GenerationError::Configuration("key".into()).is_retryable());
        assert!(!GenerationError::Timeout(Duration::from_secs(30)).is_retryable());
    }

    #[test]
    fn exhausted_keeps_provider_text_out_of_primary_message() {
        let err = GenerationError::Exhausted {
            attempts: 3,
            last_error: Box::new(GenerationError::Transport(
                "provider returned 503: overloaded".into(),
            )),
        };

        assert_eq!(err.user_message(), EXHAUSTED_MESSAGE);
        assert!(!err.user_message().contains("overloaded"));
        assert!(err.details().unwrap().contains("overloaded"));
    }

    #[test]
    fn configuration_errors_carry_no_user_details() {
        let err: GenerationError =
            TransportError::MissingCredentials("GEMINI_API_KEY".into()).into();
        assert!(matches!(err, GenerationError::Configuration(_)));
        assert_eq!(err.user_message(), UNAVAILABLE_MESSAGE);
        assert!(err.details().is_none());
    }

    #[test]
    fn empty_content_maps_to_model_error() {
        let err: GenerationError = TransportError::EmptyContent.into();
        assert!(matches!(err, GenerationError::Model(_)));
    }
}
