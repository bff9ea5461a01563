use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Rejection, RejectionKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Accept,
    Reject(Rejection),
}

/// Blocked unconditionally, whatever the surrounding words.
pub const FORBIDDEN_KEYWORDS: &[&str] = &["bomb", "explosive", "weapon", "drug", "poison"];

// Every pattern is anchored at the start of the prompt so that a food request
// which merely mentions numbers, dates or times still goes through.
static NON_FOOD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        // bare arithmetic: "2+2", "10 - 5", "3*4=?"
        r"^[\d\s.]+[+\-*/×÷^%][\d\s.+\-*/×÷^%()=?]*$",
        // "what is 2+2", "what's 10 * 3?"
        r"^(?:what|how much)(?:'s| is)\s+[\d\s.]+[+\-*/×÷^%x][\d\s.+\-*/×÷^%x()=?]*$",
        r"^(?:please\s+)?(?:can you\s+)?(?:calculate|solve|compute)\b",
        r"^(?:what|which)(?:'s| is) the capital (?:city )?of\b",
        r"^(?:when|what year) (?:was|were|is) .+ born\b",
        r"^how old is\b",
        r"^what(?:'s| is) the (?:weather|temperature|forecast)\b",
        r"^(?:how's|how is) the weather\b",
        r"^(?:will it|is it going to) (?:rain|snow)\b",
        r"^what(?:'s| is) the (?:current )?(?:time|date)\b",
        r"^what time is it\b",
        r"^what day is (?:it|today)\b",
    ]
    .iter()
    .filter_map(|pattern| Regex::new(pattern).ok())
    .collect()
});

/// Trimmed, lowercased view used for matching.
pub fn sanitize(prompt: &str) -> String {
    prompt.trim().to_lowercase()
}

pub fn validate(prompt: &str, sanitized: &str) -> Verdict {
    if prompt.trim().is_empty() {
        return Verdict::Reject(Rejection::empty_prompt());
    }

    if contains_forbidden_keyword(sanitized) {
        return Verdict::Reject(Rejection::declined(RejectionKind::ForbiddenKeyword));
    }

    if is_clearly_non_food(sanitized) {
        return Verdict::Reject(Rejection::declined(RejectionKind::OffTopic));
    }

    Verdict::Accept
}

fn contains_forbidden_keyword(sanitized: &str) -> bool {
    FORBIDDEN_KEYWORDS.iter().any(|kw| sanitized.contains(kw))
}

fn is_clearly_non_food(sanitized: &str) -> bool {
    NON_FOOD_PATTERNS.iter().any(|re| re.is_match(sanitized))
}
