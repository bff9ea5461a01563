use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::{
    error::{GenerationError, Rejection, RejectionKind},
    model::recipe::CandidateObject,
};

/// Substring the model is told to emit when it refuses a request.
pub const DECLINE_PHRASE: &str = "I'm an AI built specifically for recipes";

type ParseStrategy = fn(&str) -> Option<Value>;

/// Tried in order; the first strategy that yields JSON wins.
const PARSE_STRATEGIES: &[(&str, ParseStrategy)] = &[
    ("direct", parse_direct),
    ("strip_fences", parse_without_fences),
    ("brace_span", parse_brace_span),
];

static FENCE_JSON: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"```json\n?").ok());
static FENCE_BARE: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"```\n?").ok());
static BRACE_SPAN: Lazy<Option<Regex>> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").ok());

/// Recover a candidate recipe object from raw model text.
pub fn parse(raw: &str) -> Result<CandidateObject, GenerationError> {
    if raw.contains(DECLINE_PHRASE) {
        return Err(GenerationError::Rejected(Rejection::declined(
            RejectionKind::ModelDeclined,
        )));
    }

    let (strategy, value) = PARSE_STRATEGIES
        .iter()
        .find_map(|(name, strategy)| strategy(raw).map(|value| (*name, value)))
        .ok_or_else(|| GenerationError::Parse("no JSON object found in model output".into()))?;

    match value {
        Value::Object(object) => {
            tracing::trace!(strategy, "parsed model output");
            Ok(object)
        }
        other => Err(GenerationError::Parse(format!(
            "expected a JSON object, found {}",
            json_kind(&other)
        ))),
    }
}

fn parse_direct(raw: &str) -> Option<Value> {
    serde_json::from_str(raw).ok()
}

fn parse_without_fences(raw: &str) -> Option<Value> {
    let (json_fence, bare_fence) = (FENCE_JSON.as_ref()?, FENCE_BARE.as_ref()?);

    let unfenced = json_fence.replace_all(raw, "");
    let unfenced = bare_fence.replace_all(&unfenced, "");
    let cleaned = unfenced
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    serde_json::from_str(cleaned.trim()).ok()
}

fn parse_brace_span(raw: &str) -> Option<Value> {
    let span = BRACE_SPAN.as_ref()?.find(raw)?;
    serde_json::from_str(span.as_str()).ok()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
