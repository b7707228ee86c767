pub mod body_metrics;
pub mod custom;
pub mod meals;
pub mod targets;

pub use body_metrics::{
    calculate_bmi, calculate_tdee, plan_targets, ActivityLevel, BmiStatus, Gender, PlanTarget, UserProfile, WeightPlan,
};
pub use custom::{custom_recommendations, CustomRequest};
pub use meals::{build_meal_keys, meal_label, recommend_meals, MealAssembler, MealPlan, MealSlot, RECIPES_PER_MEAL};
pub use targets::{build_nutrient_vector, compute_macro_targets, MacroTargets};
