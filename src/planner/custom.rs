use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::recipe_formatter::{format_results, FormattedRecipe};
use crate::recipe_record::{NutrientColumn, NutrientVector, Nutrients, RecipeRecord};
use crate::search::ingredient_filter::parse_ingredient_terms;
use crate::search::pipeline::{recommend, RecommendParams};

pub const MIN_RECOMMENDATION_COUNT: usize = 1;
pub const MAX_RECOMMENDATION_COUNT: usize = 20;

/// Accepted range for a user-entered nutrient value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientRange {
    pub min: f64,
    pub max: f64,
}

pub fn nutrient_range(column: NutrientColumn) -> NutrientRange {
    let max = match column {
        NutrientColumn::Calories => 2000.0,
        NutrientColumn::Fat => 100.0,
        NutrientColumn::SaturatedFat => 60.0,
        NutrientColumn::Cholesterol => 400.0,
        NutrientColumn::Sodium => 2500.0,
        NutrientColumn::Carbohydrate => 325.0,
        NutrientColumn::Fiber => 60.0,
        NutrientColumn::Sugar => 80.0,
        NutrientColumn::Protein => 120.0,
    };
    NutrientRange { min: 0.0, max }
}

/// A hand-entered nutrient target with an optional ingredient filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomRequest {
    pub nutrients: Nutrients,
    /// Comma-separated ingredient terms, e.g. `"chicken, garlic"`.
    pub ingredients: String,
    pub recommendation_count: usize,
}

impl Default for CustomRequest {
    fn default() -> Self {
        Self {
            nutrients: Nutrients {
                calories: 550.0,
                fat_g: 25.0,
                saturated_fat_g: 10.0,
                cholesterol_mg: 50.0,
                sodium_mg: 800.0,
                carbohydrate_g: 80.0,
                fiber_g: 10.0,
                sugar_g: 20.0,
                protein_g: 25.0,
            },
            ingredients: String::new(),
            recommendation_count: 5,
        }
    }
}

impl CustomRequest {
    /// Clamps every nutrient into its accepted range and the count into 1..=20.
    pub fn clamped(&self) -> Self {
        let mut nutrients = self.nutrients;
        for column in NutrientColumn::ALL {
            let range = nutrient_range(column);
            let value = nutrients.get(column);
            // NaN falls back to the lower bound.
            let clamped = if value.is_nan() { range.min } else { value.clamp(range.min, range.max) };
            nutrients.set(column, clamped);
        }
        Self {
            nutrients,
            ingredients: self.ingredients.clone(),
            recommendation_count: self
                .recommendation_count
                .clamp(MIN_RECOMMENDATION_COUNT, MAX_RECOMMENDATION_COUNT),
        }
    }

    pub fn ingredient_terms(&self) -> Vec<String> {
        parse_ingredient_terms(&self.ingredients)
    }

    pub fn query(&self) -> NutrientVector {
        self.nutrients.to_vector()
    }
}

/// Runs a clamped custom request. An insufficient candidate pool yields an
/// empty list rather than an error.
pub fn custom_recommendations(dataset: &[RecipeRecord], request: &CustomRequest) -> Result<Vec<FormattedRecipe>> {
    let request = request.clamped();
    let params = RecommendParams {
        neighbor_count: request.recommendation_count,
        return_distance: false,
    };
    let terms = request.ingredient_terms();
    let raw = recommend(dataset, request.query().as_slice(), &terms, &params)?;
    let recipes = format_results(raw.as_ref().map(|r| r.recipes.as_slice())).unwrap_or_default();
    if recipes.is_empty() {
        tracing::info!("No recipes match the custom request (terms: {:?})", terms);
    }
    Ok(recipes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamped_limits_values() {
        let request = CustomRequest {
            nutrients: Nutrients {
                calories: 5000.0,
                fat_g: -4.0,
                sodium_mg: f64::NAN,
                ..CustomRequest::default().nutrients
            },
            ingredients: "egg".to_string(),
            recommendation_count: 50,
        };
        let clamped = request.clamped();
        assert_eq!(clamped.nutrients.calories, 2000.0);
        assert_eq!(clamped.nutrients.fat_g, 0.0);
        assert_eq!(clamped.nutrients.sodium_mg, 0.0);
        assert_eq!(clamped.nutrients.protein_g, 25.0);
        assert_eq!(clamped.recommendation_count, 20);

        let zero = CustomRequest {
            recommendation_count: 0,
            ..CustomRequest::default()
        };
        assert_eq!(zero.clamped().recommendation_count, 1);
    }

    #[test]
    fn test_ingredient_terms_from_input() {
        let request = CustomRequest {
            ingredients: "Chicken,  garlic, ".to_string(),
            ..CustomRequest::default()
        };
        assert_eq!(request.ingredient_terms(), vec!["Chicken", "garlic"]);
    }

    #[test]
    fn test_custom_recommendations_empty_when_pool_small() -> Result<()> {
        let empty: [&str; 0] = [];
        let data = vec![RecipeRecord::from_lists(Some(1), "Egg", Nutrients::default(), &["egg"], &empty, None)];
        let recipes = custom_recommendations(&data, &CustomRequest::default())?;
        assert!(recipes.is_empty());
        Ok(())
    }
}
