use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Mutex, PoisonError,
    },
};

use async_trait::async_trait;

use super::{ModelTransport, TransportError};

/// One canned provider outcome.
#[derive(Debug, Clone)]
pub enum ScriptedReply {
    Text(String),
    Fail { status: u16, body: String },
    Empty,
    /// Never completes; used to exercise timeouts.
    Hang,
}

impl ScriptedReply {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    pub fn fail(status: u16, body: impl Into<String>) -> Self {
        Self::Fail {
            status,
            body: body.into(),
        }
    }
}

/// In-process transport that replays a queue of replies, then repeats the
/// fallback. Records every instruction it receives.
#[derive(Debug)]
pub struct ScriptedTransport {
    script: Mutex<VecDeque<ScriptedReply>>,
    fallback: ScriptedReply,
    seen: Mutex<Vec<String>>,
    calls: AtomicUsize,
    configured: bool,
}

impl ScriptedTransport {
    pub fn new(replies: impl IntoIterator<Item = ScriptedReply>) -> Self {
        Self {
            script: Mutex::new(replies.into_iter().collect()),
            fallback: ScriptedReply::Empty,
            seen: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            configured: true,
        }
    }

    /// Every call answers with `reply`.
    pub fn always(reply: ScriptedReply) -> Self {
        Self::new([]).with_fallback(reply)
    }

    /// Behaves like a provider with no API key.
    pub fn unconfigured() -> Self {
        Self {
            configured: false,
            ..Self::new([])
        }
    }

    pub fn with_fallback(mut self, reply: ScriptedReply) -> Self {
        self.fallback = reply;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn instructions(&self) -> Vec<String> {
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn next_reply(&self) -> ScriptedReply {
        self.script
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ModelTransport for ScriptedTransport {
    async fn generate(&self, instruction: &str) -> Result<String, TransportError> {
        if !self.configured {
            return Err(TransportError::MissingCredentials(
                super::gemini::API_KEY_VAR.to_string(),
            ));
        }

        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(instruction.to_string());

        match self.next_reply() {
            ScriptedReply::Text(text) => Ok(text),
            ScriptedReply::Fail { status, body } => Err(TransportError::Status { status, body }),
            ScriptedReply::Empty => Err(TransportError::EmptyContent),
            ScriptedReply::Hang => std::future::pending().await,
        }
    }

    fn is_configured(&self) -> bool {
        self.configured
    }

    fn provider_name(&self) -> &'static str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replays_script_then_fallback() {
        let transport = ScriptedTransport::new([
            ScriptedReply::fail(503, "overloaded"),
            ScriptedReply::text("{}"),
        ])
        .with_fallback(ScriptedReply::text("again"));

        assert!(matches!(
            transport.generate("a").await,
            Err(TransportError::Status { status: 503, .. })
        ));
        assert_eq!(transport.generate("b").await.unwrap(), "{}");
        assert_eq!(transport.generate("c").await.unwrap(), "again");
        assert_eq!(transport.calls(), 3);
        assert_eq!(transport.instructions(), vec!["a", "b", "c"]);
    }
}
