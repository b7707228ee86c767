use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::planner::body_metrics::{ActivityLevel, Gender, UserProfile, WeightPlan};
use crate::planner::custom::CustomRequest;
use crate::planner::meals::MAX_MEALS_PER_DAY;
use crate::recipe_record::Nutrients;

#[derive(Parser, Debug)]
#[command(author, version, about = "Recipe recommendations for a nutrition goal", long_about = None)]
pub struct Cli {
    /// Recipe dataset CSV (overrides RECIPE_DATASET_PATH)
    #[arg(short, long, global = true)]
    pub dataset: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build a daily meal plan from body metrics and a weight plan
    Plan(PlanArgs),
    /// Recommend recipes close to a hand-entered nutrient profile
    Custom(CustomArgs),
}

#[derive(Args, Debug)]
pub struct PlanArgs {
    #[arg(long)]
    pub age: u32,

    #[arg(long)]
    pub height_cm: f64,

    #[arg(long)]
    pub weight_kg: f64,

    /// male or female
    #[arg(long)]
    pub gender: Gender,

    /// sedentary, light, moderate, active or extra
    #[arg(long, default_value = "moderate")]
    pub activity: ActivityLevel,

    /// maintain, mild, loss or extreme
    #[arg(long, default_value = "maintain")]
    pub plan: WeightPlan,

    /// Meals per day (1-10)
    #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=MAX_MEALS_PER_DAY as i64))]
    pub meals_per_day: u8,
}

impl PlanArgs {
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            age: self.age,
            height_cm: self.height_cm,
            weight_kg: self.weight_kg,
            gender: self.gender,
            activity: self.activity,
        }
    }
}

#[derive(Args, Debug)]
pub struct CustomArgs {
    #[arg(long, default_value_t = 550.0)]
    pub calories: f64,
    #[arg(long, default_value_t = 25.0)]
    pub fat: f64,
    #[arg(long, default_value_t = 10.0)]
    pub saturated_fat: f64,
    #[arg(long, default_value_t = 50.0)]
    pub cholesterol: f64,
    #[arg(long, default_value_t = 800.0)]
    pub sodium: f64,
    #[arg(long, default_value_t = 80.0)]
    pub carbohydrate: f64,
    #[arg(long, default_value_t = 10.0)]
    pub fiber: f64,
    #[arg(long, default_value_t = 20.0)]
    pub sugar: f64,
    #[arg(long, default_value_t = 25.0)]
    pub protein: f64,

    /// Comma-separated ingredients every recipe must contain
    #[arg(long, default_value = "")]
    pub ingredients: String,

    /// Number of recipes to return (1-20)
    #[arg(long, default_value_t = 5)]
    pub count: usize,
}

impl CustomArgs {
    pub fn request(&self) -> CustomRequest {
        CustomRequest {
            nutrients: Nutrients {
                calories: self.calories,
                fat_g: self.fat,
                saturated_fat_g: self.saturated_fat,
                cholesterol_mg: self.cholesterol,
                sodium_mg: self.sodium,
                carbohydrate_g: self.carbohydrate,
                fiber_g: self.fiber,
                sugar_g: self.sugar,
                protein_g: self.protein,
            },
            ingredients: self.ingredients.clone(),
            recommendation_count: self.count,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
