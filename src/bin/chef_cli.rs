use std::{env, process::ExitCode, sync::Arc};

use anyhow::Result;
use chefbot::{
    config::{GeminiConfig, GenerationSettings},
    inference::GeminiTransport,
    model::recipe::{CookingTimePreference, RecipeRequest},
    RecipePipeline,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut cooking_time = CookingTimePreference::Normal;
    let mut words = Vec::new();
    for arg in env::args().skip(1) {
        if arg == "--long" {
            cooking_time = CookingTimePreference::Long;
        } else {
            words.push(arg);
        }
    }

    let prompt = words.join(" ");
    if prompt.trim().is_empty() {
        eprintln!("usage: chef_cli [--long] <what you want to cook>");
        return Ok(ExitCode::from(2));
    }

    let transport = Arc::new(GeminiTransport::new(GeminiConfig::from_env()));
    let pipeline = RecipePipeline::new(transport, &GenerationSettings::from_env()?);

    eprintln!("🍳 Cooking up: {prompt}");

    match pipeline
        .generate(&RecipeRequest::new(&prompt, cooking_time))
        .await
    {
        Ok(generated) => {
            println!("{}", serde_json::to_string_pretty(&generated.recipe)?);
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            eprintln!("{}", err.user_message());
            if let Some(details) = err.details() {
                eprintln!("  {details}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
