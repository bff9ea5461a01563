//! Turning raw model text into a [`Recipe`](crate::model::recipe::Recipe).

pub mod normalizer;
pub mod parser;

pub use normalizer::normalize;
pub use parser::parse;
