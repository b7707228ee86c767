use serde::{Deserialize, Serialize};

use crate::recipe_record::{NutrientVector, Nutrients};

/// Share of calories coming from each macronutrient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacroSplit {
    pub fat_pct: f64,
    pub carb_pct: f64,
    pub protein_pct: f64,
}

pub const MACRO_SPLIT: MacroSplit = MacroSplit {
    fat_pct: 0.30,
    carb_pct: 0.45,
    protein_pct: 0.25,
};

pub const KCAL_PER_G_FAT: f64 = 9.0;
pub const KCAL_PER_G_CARB: f64 = 4.0;
pub const KCAL_PER_G_PROTEIN: f64 = 4.0;

/// Saturated fat as a fraction of total fat.
const SATURATED_FAT_SHARE: f64 = 0.35;
/// Fixed daily budgets, split evenly over three meals.
const DAILY_CHOLESTEROL_MG: f64 = 300.0;
const DAILY_SODIUM_MG: f64 = 2300.0;
const DAILY_FIBER_G: f64 = 30.0;
const DAILY_SUGAR_G: f64 = 40.0;
const BUDGET_MEALS: f64 = 3.0;

/// Macronutrient grams are never targeted below this.
const MIN_MACRO_G: f64 = 1.0;

/// Builds the per-meal nutrient target used as the search query for a
/// calorie budget.
///
/// # Arguments
/// * `calories_per_meal`: Energy budget of one meal, in kcal.
///
/// # Returns
/// The nine-value target, in dataset column order.
pub fn build_nutrient_vector(calories_per_meal: f64) -> NutrientVector {
    let fat_g = (calories_per_meal * MACRO_SPLIT.fat_pct / KCAL_PER_G_FAT).max(MIN_MACRO_G);
    let carbohydrate_g = (calories_per_meal * MACRO_SPLIT.carb_pct / KCAL_PER_G_CARB).max(MIN_MACRO_G);
    let protein_g = (calories_per_meal * MACRO_SPLIT.protein_pct / KCAL_PER_G_PROTEIN).max(MIN_MACRO_G);

    Nutrients {
        calories: calories_per_meal,
        fat_g,
        saturated_fat_g: fat_g * SATURATED_FAT_SHARE,
        cholesterol_mg: DAILY_CHOLESTEROL_MG / BUDGET_MEALS,
        sodium_mg: DAILY_SODIUM_MG / BUDGET_MEALS,
        carbohydrate_g,
        fiber_g: DAILY_FIBER_G / BUDGET_MEALS,
        sugar_g: DAILY_SUGAR_G / BUDGET_MEALS,
        protein_g,
    }
    .to_vector()
}

/// Rounded macro targets shown next to a calorie goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub calories: i64,
    pub fat: i64,
    pub carbs: i64,
    pub protein: i64,
}

/// Exact halves round to the even neighbor.
pub fn compute_macro_targets(calories: f64) -> MacroTargets {
    MacroTargets {
        calories: calories.round_ties_even() as i64,
        fat: (calories * MACRO_SPLIT.fat_pct / KCAL_PER_G_FAT).round_ties_even() as i64,
        carbs: (calories * MACRO_SPLIT.carb_pct / KCAL_PER_G_CARB).round_ties_even() as i64,
        protein: (calories * MACRO_SPLIT.protein_pct / KCAL_PER_G_PROTEIN).round_ties_even() as i64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_build_nutrient_vector_600_kcal() {
        let v = build_nutrient_vector(600.0).0;
        assert_eq!(v[0], 600.0);
        assert!(approx(v[1], 20.0)); // 600 * 0.30 / 9
        assert!(approx(v[2], 7.0)); // 35% of fat
        assert!(approx(v[3], 100.0));
        assert!(approx(v[4], 2300.0 / 3.0));
        assert!(approx(v[5], 67.5)); // 600 * 0.45 / 4
        assert!(approx(v[6], 10.0));
        assert!(approx(v[7], 40.0 / 3.0));
        assert!(approx(v[8], 37.5)); // 600 * 0.25 / 4
    }

    #[test]
    fn test_build_nutrient_vector_floors_macros() {
        let v = build_nutrient_vector(0.0).0;
        assert_eq!(v[0], 0.0);
        assert_eq!(v[1], 1.0);
        assert!(approx(v[2], 0.35));
        assert_eq!(v[5], 1.0);
        assert_eq!(v[8], 1.0);
    }

    #[test]
    fn test_compute_macro_targets() {
        let targets = compute_macro_targets(2000.0);
        assert_eq!(
            targets,
            MacroTargets {
                calories: 2000,
                fat: 67,
                carbs: 225,
                protein: 125,
            }
        );
    }

    #[test]
    fn test_compute_macro_targets_rounds_halves_to_even() {
        // carbs 112.5 g, protein 62.5 g
        let targets = compute_macro_targets(1000.0);
        assert_eq!(targets.carbs, 112);
        assert_eq!(targets.protein, 62);
        assert_eq!(compute_macro_targets(1500.5).calories, 1500);
        assert_eq!(compute_macro_targets(1501.5).calories, 1502);
    }
}
