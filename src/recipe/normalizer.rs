use serde_json::Value;

use crate::model::recipe::{CandidateObject, Recipe};

pub const DEFAULT_TITLE: &str = "Generated Recipe";
pub const DEFAULT_COOKING_TIME: &str = "30 minutes";
pub const DEFAULT_SERVING_SIZE: &str = "4 people";
pub const DEFAULT_INGREDIENT: &str = "Ingredients list not available";
pub const DEFAULT_INSTRUCTION: &str = "Instructions not available";
pub const DEFAULT_COOKING_TIPS: &str = "Enjoy your cooking!";
pub const DEFAULT_CUISINE_STYLE: &str = "International";

/// Coerce a candidate object into the fixed recipe schema.
///
/// Total: never fails, every output field is populated. Fields are looked up
/// by their snake_case name first, then the camelCase spelling.
pub fn normalize(candidate: &CandidateObject) -> Recipe {
    Recipe {
        title: text_field(candidate, &["title"], DEFAULT_TITLE),
        cooking_time: text_field(
            candidate,
            &["cooking_time", "cookingTime"],
            DEFAULT_COOKING_TIME,
        ),
        serving_size: text_field(
            candidate,
            &["serving_size", "servingSize"],
            DEFAULT_SERVING_SIZE,
        ),
        ingredients: list_field(candidate, &["ingredients"], DEFAULT_INGREDIENT),
        instructions: list_field(candidate, &["instructions"], DEFAULT_INSTRUCTION),
        cooking_tips: text_field(
            candidate,
            &["cooking_tips", "cookingTips"],
            DEFAULT_COOKING_TIPS,
        ),
        cuisine_style: text_field(
            candidate,
            &["cuisine_style", "cuisineStyle"],
            DEFAULT_CUISINE_STYLE,
        ),
    }
}

fn text_field(candidate: &CandidateObject, keys: &[&str], default: &str) -> String {
    keys.iter()
        .filter_map(|key| candidate.get(*key))
        .find_map(|value| match value {
            Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            _ => None,
        })
        .unwrap_or_else(|| default.to_string())
}

fn list_field(candidate: &CandidateObject, keys: &[&str], default: &str) -> Vec<String> {
    keys.iter()
        .filter_map(|key| candidate.get(*key))
        .find_map(|value| match value {
            Value::Array(items) if !items.is_empty() => {
                Some(items.iter().map(item_text).collect::<Vec<_>>())
            }
            _ => None,
        })
        .unwrap_or_else(|| vec![default.to_string()])
}

fn item_text(item: &Value) -> String {
    match item {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
