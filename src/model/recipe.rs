use serde::{Deserialize, Serialize};

/// Unvalidated structured value pulled out of model output.
pub type CandidateObject = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum CookingTimePreference {
    #[default]
    Normal,
    Long,
}

impl CookingTimePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            CookingTimePreference::Normal => "normal",
            CookingTimePreference::Long => "long",
        }
    }

    pub fn time_range(&self) -> &'static str {
        match self {
            CookingTimePreference::Normal => "15-45 minutes",
            CookingTimePreference::Long => "1-3 hours",
        }
    }
}

// Anything other than "long" means a normal weeknight recipe.
impl From<String> for CookingTimePreference {
    fn from(raw: String) -> Self {
        if raw.trim().eq_ignore_ascii_case("long") {
            CookingTimePreference::Long
        } else {
            CookingTimePreference::Normal
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeRequest {
    pub prompt: String,
    pub cooking_time: CookingTimePreference,
}

impl RecipeRequest {
    pub fn new(prompt: &str, cooking_time: CookingTimePreference) -> Self {
        Self {
            prompt: prompt.trim().to_string(),
            cooking_time,
        }
    }
}

/// Normalized recipe. Every field is always present and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub title: String,
    pub cooking_time: String,
    pub serving_size: String,
    pub ingredients: Vec<String>,
    pub instructions: Vec<String>,
    pub cooking_tips: String,
    pub cuisine_style: String,
}

/// A recipe as kept in a user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedRecipe {
    pub id: String,
    pub user_id: String,
    pub prompt: String,
    pub cooking_type: CookingTimePreference,
    #[serde(flatten)]
    pub recipe: Recipe,
    pub is_saved: bool,
    pub created_ts: i64,
}

/// Insert payload; the store assigns `id` and `created_ts`.
#[derive(Debug, Clone)]
pub struct NewSavedRecipe {
    pub user_id: String,
    pub prompt: String,
    pub cooking_type: CookingTimePreference,
    pub recipe: Recipe,
}

impl NewSavedRecipe {
    pub fn into_saved(self, id: String, created_ts: i64) -> SavedRecipe {
        SavedRecipe {
            id,
            user_id: self.user_id,
            prompt: self.prompt,
            cooking_type: self.cooking_type,
            recipe: self.recipe,
            is_saved: true,
            created_ts,
        }
    }
}
