use minijinja::{context, Environment};
use once_cell::sync::Lazy;

use crate::{
    error::{GenerationError, DECLINE_MESSAGE},
    model::recipe::CookingTimePreference,
};

const RECIPE_TEMPLATE_NAME: &str = "recipe_system";

macro_rules! template_file {
    ($name:literal) => {
        include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/", $name))
    };
}

static TEMPLATES: Lazy<Result<Environment<'static>, String>> = Lazy::new(|| {
    let mut env = Environment::new();
    env.add_template(RECIPE_TEMPLATE_NAME, template_file!("recipe_system.jinja"))
        .map_err(|err| err.to_string())?;
    Ok(env)
});

/// Build the full instruction text sent to the model.
///
/// Pure: identical inputs always render the identical string.
pub fn compose(
    user_prompt: &str,
    cooking_time: CookingTimePreference,
) -> Result<String, GenerationError> {
    let env = TEMPLATES
        .as_ref()
        .map_err(|err| GenerationError::Internal(format!("prompt template invalid: {err}")))?;

    env.get_template(RECIPE_TEMPLATE_NAME)
        .and_then(|template| {
            template.render(context! {
                decline_message => DECLINE_MESSAGE,
                time_range => cooking_time.time_range(),
                user_prompt => user_prompt,
            })
        })
        .map_err(|err| GenerationError::Internal(format!("prompt rendering failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embeds_time_constraint_for_each_preference() {
        let normal = compose("beef stew", CookingTimePreference::Normal).unwrap();
        let long = compose("beef stew", CookingTimePreference::Long).unwrap();

        assert!(normal.contains("The recipe should take 15-45 minutes to prepare and cook."));
        assert!(!normal.contains("1-3 hours"));
        assert!(long.contains("The recipe should take 1-3 hours to prepare and cook."));
        assert!(!long.contains("15-45 minutes"));
    }

    #[test]
    fn is_stable_across_calls() {
        let first = compose("lemon tart", CookingTimePreference::Normal).unwrap();
        let second = compose("lemon tart", CookingTimePreference::Normal).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn carries_output_shape_and_decline_message() {
        let text = compose("ramen", CookingTimePreference::Normal).unwrap();
        for field in [
            "\"title\"",
            "\"cooking_time\"",
            "\"serving_size\"",
            "\"ingredients\"",
            "\"instructions\"",
            "\"cooking_tips\"",
            "\"cuisine_style\"",
        ] {
            assert!(text.contains(field), "missing {field}");
        }
        assert!(text.contains(DECLINE_MESSAGE));
        assert!(text.ends_with("User request: ramen"));
    }

    #[test]
    fn user_text_is_inserted_verbatim() {
        let text = compose("{{ not a tag }} & <b>soup</b>", CookingTimePreference::Long).unwrap();
        assert!(text.ends_with("User request: {{ not a tag }} & <b>soup</b>"));
    }
}
