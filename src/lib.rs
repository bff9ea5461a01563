pub mod api;
pub mod auth;
pub mod classifier;
pub mod config;
pub mod db;
pub mod error;
pub mod inference;
pub mod model;
pub mod pipeline;
pub mod prompts;
pub mod recipe;

pub use error::GenerationError;
pub use pipeline::{GeneratedRecipe, RecipePipeline};
