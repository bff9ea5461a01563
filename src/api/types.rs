use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::recipe::{CookingTimePreference, Recipe, SavedRecipe};

/// Absent and `null` fields are treated alike.
#[derive(Debug, Deserialize)]
pub struct GenerateRecipeRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "cookingTime", alias = "cooking_time")]
    pub cooking_time: Option<CookingTimePreference>,
}

#[derive(Debug, Serialize)]
pub struct GenerateRecipeResponse {
    pub recipe: Recipe,
}

#[derive(Debug, Deserialize)]
pub struct SaveRecipeRequest {
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default, rename = "cookingTime", alias = "cooking_time")]
    pub cooking_time: Option<CookingTimePreference>,
    /// Passed through the normalizer before it is stored.
    #[serde(default)]
    pub recipe: Value,
}

#[derive(Debug, Serialize)]
pub struct SavedRecipeResponse {
    pub recipe: SavedRecipe,
}

#[derive(Debug, Serialize)]
pub struct RecipeListResponse {
    pub recipes: Vec<SavedRecipe>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn null_fields_read_as_absent() {
        let req: GenerateRecipeRequest =
            serde_json::from_str(r#"{"prompt":null,"cookingTime":null}"#).unwrap();
        assert_eq!(req.prompt, None);
        assert_eq!(req.cooking_time, None);

        let req: SaveRecipeRequest =
            serde_json::from_str(r#"{"prompt":null,"cookingTime":null,"recipe":null}"#).unwrap();
        assert_eq!(req.prompt, None);
        assert_eq!(req.cooking_time, None);
        assert!(req.recipe.is_null());
    }

    #[test]
    fn snake_case_cooking_time_is_accepted() {
        let req: GenerateRecipeRequest =
            serde_json::from_str(r#"{"prompt":"stew","cooking_time":"long"}"#).unwrap();
        assert_eq!(req.cooking_time, Some(CookingTimePreference::Long));
    }
}
