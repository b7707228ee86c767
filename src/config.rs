use std::env;
use std::path::PathBuf;

use crate::errors::{RecommendError, Result};
use crate::planner::meals::RECIPES_PER_MEAL;

pub const DATASET_PATH_ENV_VAR: &str = "RECIPE_DATASET_PATH";
pub const RECIPES_PER_MEAL_ENV_VAR: &str = "RECIPES_PER_MEAL";
pub const DEFAULT_DATASET_PATH: &str = "recipes.csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub dataset_path: PathBuf,
    pub recipes_per_meal: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET_PATH),
            recipes_per_meal: RECIPES_PER_MEAL,
        }
    }
}

impl EngineConfig {
    /// Reads the configuration from the process environment. Call
    /// `dotenv::dotenv()` first for `.env` values to be picked up.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup, falling back to
    /// defaults for unset or blank keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let value_of = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(path) = value_of(DATASET_PATH_ENV_VAR) {
            config.dataset_path = PathBuf::from(path);
        }
        if let Some(raw) = value_of(RECIPES_PER_MEAL_ENV_VAR) {
            config.recipes_per_meal = match raw.parse::<usize>() {
                Ok(n) if n >= 1 => n,
                _ => {
                    return Err(RecommendError::invalid_input(format!(
                        "{} must be a positive integer, got '{}'",
                        RECIPES_PER_MEAL_ENV_VAR, raw
                    )))
                }
            };
        }
        Ok(config)
    }

    pub fn with_dataset_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.dataset_path = path.into();
        self
    }
}
