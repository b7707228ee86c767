pub mod cli;
pub mod config;
pub mod errors;
pub mod list_literal;
pub mod planner;
pub mod recipe_formatter;
pub mod recipe_record;
pub mod search;

pub use errors::{RecommendError, Result};
