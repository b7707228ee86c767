use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;
use std::collections::HashSet;

use crate::errors::{RecommendError, Result};
use crate::planner::targets::build_nutrient_vector;
use crate::recipe_formatter::{format_results, FormattedRecipe};
use crate::search::data_loader::{DatasetCache, RecipeSource};
use crate::search::pipeline::{DatasetRecommender, RecipeRecommender, RecommendParams};

pub const RECIPES_PER_MEAL: usize = 5;
/// Largest meal count a plan accepts.
pub const MAX_MEALS_PER_DAY: usize = 10;

/// Lower bound on how many neighbors are requested, whatever the plan size.
const MIN_NEIGHBOR_REQUEST: usize = 30;

const NAMED_MEALS: [&str; 3] = ["breakfast", "lunch", "dinner"];

/// Meal keys for a day: the named meals first, then `meal_4`, `meal_5`, ...
/// A meal count of zero still yields one meal.
pub fn build_meal_keys(meal_count: usize) -> Vec<String> {
    (0..meal_count.max(1))
        .map(|idx| match NAMED_MEALS.get(idx) {
            Some(name) => name.to_string(),
            None => format!("meal_{}", idx + 1),
        })
        .collect()
}

/// Human-readable label for a meal key.
pub fn meal_label(key: &str) -> String {
    match key {
        "breakfast" => "Breakfast".to_string(),
        "lunch" => "Lunch".to_string(),
        "dinner" => "Dinner".to_string(),
        other => match other.strip_prefix("meal_") {
            Some(n) => format!("Meal {}", n),
            None => other.to_string(),
        },
    }
}

/// Recipes assigned to one meal slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MealSlot {
    pub key: String,
    pub label: String,
    pub recipes: Vec<FormattedRecipe>,
}

/// Meal slots in day order. Serializes as a JSON object keyed by meal key,
/// preserving that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MealPlan {
    pub meals: Vec<MealSlot>,
}

impl MealPlan {
    pub fn keys(&self) -> Vec<&str> {
        self.meals.iter().map(|m| m.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&[FormattedRecipe]> {
        self.meals.iter().find(|m| m.key == key).map(|m| m.recipes.as_slice())
    }

    /// All recipes, meal by meal.
    pub fn flatten(&self) -> impl Iterator<Item = &FormattedRecipe> {
        self.meals.iter().flat_map(|m| m.recipes.iter())
    }
}

impl Serialize for MealPlan {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.meals.len()))?;
        for meal in &self.meals {
            map.serialize_entry(&meal.key, &meal.recipes)?;
        }
        map.end()
    }
}

/// Groups nearest-recipe results into meal slots.
pub struct MealAssembler<R: RecipeRecommender> {
    recommender: R,
    recipes_per_meal: usize,
}

impl<R: RecipeRecommender> MealAssembler<R> {
    pub fn new(recommender: R) -> Self {
        Self {
            recommender,
            recipes_per_meal: RECIPES_PER_MEAL,
        }
    }

    pub fn with_recipes_per_meal(mut self, recipes_per_meal: usize) -> Result<Self> {
        if recipes_per_meal == 0 {
            return Err(RecommendError::invalid_input("recipes_per_meal must be at least 1"));
        }
        self.recipes_per_meal = recipes_per_meal;
        Ok(self)
    }

    /// Number of neighbors requested for a plan of `meal_count` meals.
    /// Twice what the plan needs, so duplicates can be dropped.
    pub fn neighbor_request(&self, meal_count: usize) -> usize {
        let recipes_needed = meal_count.max(1).saturating_mul(self.recipes_per_meal);
        recipes_needed.saturating_mul(2).max(MIN_NEIGHBOR_REQUEST)
    }

    /// Builds a meal plan whose recipes match `calories_per_meal`.
    ///
    /// When the recommender cannot supply enough candidates every meal is
    /// left empty. Otherwise recipes are deduplicated by identity, keeping
    /// the nearest occurrence, and dealt out `recipes_per_meal` at a time in
    /// meal order. Later meals may come up short; no recipe appears twice.
    pub fn recommend_meals(&self, calories_per_meal: f64, meal_count: usize) -> Result<MealPlan> {
        if meal_count > MAX_MEALS_PER_DAY {
            return Err(RecommendError::invalid_input(format!(
                "meal count must be at most {}, got {}",
                MAX_MEALS_PER_DAY, meal_count
            )));
        }
        let query = build_nutrient_vector(calories_per_meal);
        let meal_keys = build_meal_keys(meal_count);
        let recipes_needed = meal_keys.len() * self.recipes_per_meal;
        let params = RecommendParams {
            neighbor_count: self.neighbor_request(meal_count),
            return_distance: false,
        };

        let recommendation = self.recommender.recommend(&query, &params)?;
        let formatted = format_results(recommendation.as_ref().map(|r| r.recipes.as_slice()));

        let Some(records) = formatted else {
            tracing::info!(
                "Not enough recipes for {} neighbors, returning {} empty meals",
                params.neighbor_count,
                meal_keys.len()
            );
            return Ok(MealPlan {
                meals: meal_keys.into_iter().map(empty_slot).collect(),
            });
        };

        let fetched = records.len();
        let mut seen = HashSet::new();
        let mut unique: Vec<FormattedRecipe> = Vec::with_capacity(recipes_needed);
        for record in records {
            if !seen.insert(record.identity()) {
                continue;
            }
            unique.push(record);
            if unique.len() >= recipes_needed {
                break;
            }
        }
        tracing::debug!("Kept {} unique recipes out of {} fetched", unique.len(), fetched);
        if unique.len() < recipes_needed {
            tracing::warn!(
                "Only {} unique recipes for {} meal slots, later meals will be short",
                unique.len(),
                recipes_needed
            );
        }

        let mut remaining = unique.into_iter();
        let meals = meal_keys
            .into_iter()
            .map(|key| {
                let recipes: Vec<FormattedRecipe> = remaining.by_ref().take(self.recipes_per_meal).collect();
                MealSlot {
                    label: meal_label(&key),
                    key,
                    recipes,
                }
            })
            .collect();

        Ok(MealPlan { meals })
    }
}

/// Meal plan over the cached dataset with the default slot size.
pub fn recommend_meals<S: RecipeSource>(
    cache: &DatasetCache<S>,
    calories_per_meal: f64,
    meal_count: usize,
) -> anyhow::Result<MealPlan> {
    let dataset = cache.get()?;
    let plan = MealAssembler::new(DatasetRecommender::new(&dataset)).recommend_meals(calories_per_meal, meal_count)?;
    Ok(plan)
}

fn empty_slot(key: String) -> MealSlot {
    MealSlot {
        label: meal_label(&key),
        key,
        recipes: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recipe_record::{NutrientVector, Nutrients, RecipeRecord};
    use crate::search::pipeline::Recommendation;
    use std::cell::RefCell;

    /// Returns a canned list and remembers what it was asked for.
    struct StubRecommender {
        result: Option<Vec<RecipeRecord>>,
        calls: RefCell<Vec<(NutrientVector, RecommendParams)>>,
    }

    impl StubRecommender {
        fn new(result: Option<Vec<RecipeRecord>>) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl RecipeRecommender for &StubRecommender {
        fn recommend(&self, query: &NutrientVector, params: &RecommendParams) -> Result<Option<Recommendation>> {
            self.calls.borrow_mut().push((*query, *params));
            Ok(self.result.clone().map(|recipes| Recommendation {
                recipes,
                distances: None,
            }))
        }
    }

    fn record(id: Option<i64>, name: &str) -> RecipeRecord {
        let empty: [&str; 0] = [];
        RecipeRecord::from_lists(id, name, Nutrients::default(), &empty, &empty, None)
    }

    #[test]
    fn test_build_meal_keys() {
        assert_eq!(build_meal_keys(0), vec!["breakfast"]);
        assert_eq!(build_meal_keys(2), vec!["breakfast", "lunch"]);
        assert_eq!(build_meal_keys(5), vec!["breakfast", "lunch", "dinner", "meal_4", "meal_5"]);
        assert_eq!(meal_label("meal_4"), "Meal 4");
        assert_eq!(meal_label("dinner"), "Dinner");
    }

    #[test]
    fn test_assigns_full_meal_slots_with_unique_recipes() -> Result<()> {
        let mut recipes = vec![record(Some(1), "Duplicate"), record(Some(1), "Duplicate")];
        recipes.extend((2..2 + RECIPES_PER_MEAL as i64 * 2).map(|id| record(Some(id), &format!("Recipe {}", id))));
        let stub = StubRecommender::new(Some(recipes));

        let plan = MealAssembler::new(&stub).recommend_meals(600.0, 2)?;

        assert_eq!(plan.keys(), vec!["breakfast", "lunch"]);
        assert!(plan.meals.iter().all(|m| m.recipes.len() == RECIPES_PER_MEAL));
        let ids: Vec<Option<i64>> = plan.flatten().map(|r| r.recipe_id).collect();
        let distinct: HashSet<Option<i64>> = ids.iter().copied().collect();
        assert_eq!(ids.len(), distinct.len());
        assert_eq!(plan.get("breakfast").map(|r| r[0].recipe_id), Some(Some(1)));

        let calls = stub.calls.borrow();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, build_nutrient_vector(600.0));
        assert_eq!(calls[0].1.neighbor_count, 30);
        assert!(!calls[0].1.return_distance);
        Ok(())
    }

    #[test]
    fn test_neighbor_request_overfetches() {
        let stub = StubRecommender::new(None);
        let assembler = MealAssembler::new(&stub);
        assert_eq!(assembler.neighbor_request(1), 30);
        assert_eq!(assembler.neighbor_request(3), 30);
        assert_eq!(assembler.neighbor_request(4), 40);
        assert_eq!(assembler.neighbor_request(0), 30);
    }

    #[test]
    fn test_rejects_oversized_meal_count() {
        let stub = StubRecommender::new(None);
        let result = MealAssembler::new(&stub).recommend_meals(600.0, usize::MAX);
        assert!(matches!(result, Err(RecommendError::InvalidInput { .. })));
        assert!(stub.calls.borrow().is_empty());
        assert_eq!(MealAssembler::new(&stub).neighbor_request(usize::MAX), usize::MAX);
    }

    #[test]
    fn test_no_candidates_gives_empty_meals() -> Result<()> {
        let stub = StubRecommender::new(None);
        let plan = MealAssembler::new(&stub).recommend_meals(500.0, 4)?;
        assert_eq!(plan.keys(), vec!["breakfast", "lunch", "dinner", "meal_4"]);
        assert!(plan.meals.iter().all(|m| m.recipes.is_empty()));
        Ok(())
    }

    #[test]
    fn test_short_pool_leaves_later_meals_short() -> Result<()> {
        // 7 unique recipes behind a wall of duplicates
        let mut recipes: Vec<RecipeRecord> = (1..=7).map(|id| record(Some(id), "x")).collect();
        recipes.extend((1..=7).map(|id| record(Some(id), "x")));
        let stub = StubRecommender::new(Some(recipes));

        let plan = MealAssembler::new(&stub).recommend_meals(700.0, 3)?;
        let sizes: Vec<usize> = plan.meals.iter().map(|m| m.recipes.len()).collect();
        assert_eq!(sizes, vec![5, 2, 0]);
        Ok(())
    }

    #[test]
    fn test_dedup_falls_back_to_name_without_id() -> Result<()> {
        let recipes = vec![
            record(None, "Stew"),
            record(None, "Stew"),
            record(None, "Curry"),
            record(Some(9), "Stew"),
        ];
        let stub = StubRecommender::new(Some(recipes));
        let plan = MealAssembler::new(&stub).recommend_meals(400.0, 1)?;
        let names: Vec<&str> = plan.flatten().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Stew", "Curry", "Stew"]);
        Ok(())
    }

    #[test]
    fn test_custom_recipes_per_meal() -> Result<()> {
        let recipes: Vec<RecipeRecord> = (1..=10).map(|id| record(Some(id), "r")).collect();
        let stub = StubRecommender::new(Some(recipes));
        let assembler = MealAssembler::new(&stub).with_recipes_per_meal(3)?;
        let plan = assembler.recommend_meals(500.0, 3)?;
        let sizes: Vec<usize> = plan.meals.iter().map(|m| m.recipes.len()).collect();
        assert_eq!(sizes, vec![3, 3, 3]);

        assert!(MealAssembler::new(&stub).with_recipes_per_meal(0).is_err());
        Ok(())
    }

    #[test]
    fn test_meal_plan_serializes_in_meal_order() -> serde_json::Result<()> {
        let plan = MealPlan {
            meals: build_meal_keys(3).into_iter().map(empty_slot).collect(),
        };
        let json = serde_json::to_string(&plan)?;
        assert_eq!(json, r#"{"breakfast":[],"lunch":[],"dinner":[]}"#);
        Ok(())
    }
}
