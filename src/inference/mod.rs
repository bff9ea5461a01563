//! Model provider seam.
//!
//! The pipeline only sees [`ModelTransport`]: send instruction text, get raw
//! generated text back. Retries live in [`invoker`], not in transports.

pub mod fake;
pub mod gemini;
pub mod invoker;

use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

pub use fake::{ScriptedReply, ScriptedTransport};
pub use gemini::GeminiTransport;
pub use invoker::{GenerationContext, Invocation, ModelInvoker, RetryPolicy};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0} is missing")]
    MissingCredentials(String),

    #[error("request to provider failed: {0}")]
    Request(String),

    #[error("provider returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("provider response could not be decoded: {0}")]
    Decode(String),

    #[error("no recipe content generated")]
    EmptyContent,
}

#[async_trait]
pub trait ModelTransport: Send + Sync + fmt::Debug {
    /// Send one generation request and return the generated text.
    async fn generate(&self, instruction: &str) -> Result<String, TransportError>;

    /// Whether the credentials needed for [`generate`](Self::generate) are present.
    fn is_configured(&self) -> bool {
        true
    }

    fn provider_name(&self) -> &'static str;
}
