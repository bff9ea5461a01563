pub mod content_filter;

pub use content_filter::{sanitize, validate, Verdict};
