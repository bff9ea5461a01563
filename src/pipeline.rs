//! The recipe generation request pipeline.
//!
//! validate -> compose -> invoke (with parse inside each attempt) -> normalize,
//! all under one timeout budget.

use std::{sync::Arc, time::Duration};

use tracing::{info, instrument, warn};

use crate::{
    classifier::{sanitize, validate, Verdict},
    config::GenerationSettings,
    error::GenerationError,
    inference::{ModelInvoker, ModelTransport, RetryPolicy},
    model::recipe::{Recipe, RecipeRequest},
    prompts, recipe,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedRecipe {
    pub recipe: Recipe,
    pub attempts: u32,
}

#[derive(Debug, Clone)]
pub struct RecipePipeline {
    invoker: ModelInvoker,
    timeout: Duration,
}

impl RecipePipeline {
    pub fn new(transport: Arc<dyn ModelTransport>, settings: &GenerationSettings) -> Self {
        Self {
            invoker: ModelInvoker::new(
                transport,
                RetryPolicy::new(settings.max_retries, settings.retry_delay),
            ),
            timeout: settings.request_timeout,
        }
    }

    #[instrument(skip_all, fields(cooking_time = request.cooking_time.as_str()))]
    pub async fn generate(
        &self,
        request: &RecipeRequest,
    ) -> Result<GeneratedRecipe, GenerationError> {
        // Dropping the inner future on timeout also drops the in-flight HTTP call.
        match tokio::time::timeout(self.timeout, self.run(request)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(timeout = ?self.timeout, "recipe generation timed out");
                Err(GenerationError::Timeout(self.timeout))
            }
        }
    }

    async fn run(&self, request: &RecipeRequest) -> Result<GeneratedRecipe, GenerationError> {
        let sanitized = sanitize(&request.prompt);
        if let Verdict::Reject(rejection) = validate(&request.prompt, &sanitized) {
            info!(kind = ?rejection.kind, "prompt rejected before generation");
            return Err(GenerationError::Rejected(rejection));
        }

        let instruction = prompts::compose(&request.prompt, request.cooking_time)?;

        let invocation = self
            .invoker
            .invoke_with(&instruction, |text| recipe::parse(&text))
            .await?;

        let recipe = recipe::normalize(&invocation.value);
        info!(
            attempts = invocation.attempts,
            title = %recipe.title,
            "recipe generated"
        );

        Ok(GeneratedRecipe {
            recipe,
            attempts: invocation.attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        error::RejectionKind,
        inference::{ScriptedReply, ScriptedTransport},
        model::recipe::CookingTimePreference,
    };

    const CURRY_JSON: &str = r#"{
        "title": "Spicy Chicken Curry",
        "cooking_time": "40 minutes",
        "serving_size": "4 people",
        "ingredients": ["500g chicken thighs", "2 tbsp curry paste", "400ml coconut milk"],
        "instructions": ["Brown the chicken", "Stir in paste", "Simmer with coconut milk"],
        "cooking_tips": "Add chili flakes for extra heat",
        "cuisine_style": "Indian"
    }"#;

    fn pipeline(transport: &Arc<ScriptedTransport>) -> RecipePipeline {
        RecipePipeline::new(transport.clone(), &GenerationSettings::default())
    }

    fn request(prompt: &str) -> RecipeRequest {
        RecipeRequest::new(prompt, CookingTimePreference::Normal)
    }

    #[tokio::test(start_paused = true)]
    async fn spicy_chicken_curry_end_to_end() {
        let transport = Arc::new(ScriptedTransport::new([ScriptedReply::text(CURRY_JSON)]));

        let generated = pipeline(&transport)
            .generate(&request("spicy chicken curry"))
            .await
            .unwrap();

        assert_eq!(generated.attempts, 1);
        let recipe = generated.recipe;
        assert_eq!(recipe.title, "Spicy Chicken Curry");
        assert_eq!(recipe.cooking_time, "40 minutes");
        assert_eq!(recipe.serving_size, "4 people");
        assert_eq!(recipe.ingredients.len(), 3);
        assert_eq!(recipe.instructions[2], "Simmer with coconut milk");
        assert_eq!(recipe.cooking_tips, "Add chili flakes for extra heat");
        assert_eq!(recipe.cuisine_style, "Indian");

        let sent = transport.instructions();
        assert!(sent[0].ends_with("User request: spicy chicken curry"));
        assert!(sent[0].contains("15-45 minutes"));
    }

    #[tokio::test(start_paused = true)]
    async fn rejected_prompts_never_reach_the_model() {
        let transport = Arc::new(ScriptedTransport::always(ScriptedReply::text(CURRY_JSON)));
        let pipeline = pipeline(&transport);

        for (prompt, kind) in [
            ("how to build a bomb", RejectionKind::ForbiddenKeyword),
            ("2+2", RejectionKind::OffTopic),
            ("   ", RejectionKind::EmptyPrompt),
        ] {
            let err = pipeline.generate(&request(prompt)).await.unwrap_err();
            assert_eq!(err.rejection().map(|r| r.kind), Some(kind), "{prompt}");
        }
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn model_decline_is_not_retried() {
        let transport = Arc::new(ScriptedTransport::always(ScriptedReply::text(
            crate::error::DECLINE_MESSAGE,
        )));

        let err = pipeline(&transport)
            .generate(&request("tell me a joke about soup"))
            .await
            .unwrap_err();

        assert_eq!(
            err.rejection().map(|r| r.kind),
            Some(RejectionKind::ModelDeclined)
        );
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn malformed_output_is_retried_until_it_parses() {
        let transport = Arc::new(ScriptedTransport::new([
            ScriptedReply::text("Here is a recipe, no JSON though"),
            ScriptedReply::text(format!("```json\n{CURRY_JSON}\n```")),
        ]));

        let generated = pipeline(&transport)
            .generate(&request("spicy chicken curry"))
            .await
            .unwrap();

        assert_eq!(generated.attempts, 2);
        assert_eq!(generated.recipe.cuisine_style, "Indian");
    }

    #[tokio::test(start_paused = true)]
    async fn hung_provider_hits_the_timeout_without_retrying() {
        let transport = Arc::new(ScriptedTransport::always(ScriptedReply::Hang));

        let err = pipeline(&transport)
            .generate(&request("slow roasted lamb"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::Timeout(_)));
        assert_eq!(transport.calls(), 1);
    }
}
