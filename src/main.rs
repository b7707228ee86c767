use anyhow::{Context, Result};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use recipe_recommender::cli::{parse_args, Command, CustomArgs, PlanArgs};
use recipe_recommender::config::EngineConfig;
use recipe_recommender::planner::{
    calculate_bmi, calculate_tdee, compute_macro_targets, custom_recommendations, plan_targets, MealAssembler,
};
use recipe_recommender::search::{CsvRecipeSource, DatasetCache, DatasetRecommender};

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("recipe_recommender={}", level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run_plan(cache: &DatasetCache<CsvRecipeSource>, config: &EngineConfig, args: &PlanArgs) -> Result<serde_json::Value> {
    let profile = args.profile();
    let (bmi, bmi_status) = calculate_bmi(profile.weight_kg, profile.height_cm)?;
    let tdee = calculate_tdee(&profile);
    let plans = plan_targets(tdee);
    let target = plans
        .iter()
        .find(|p| p.plan == args.plan)
        .with_context(|| format!("No calorie target for plan {:?}", args.plan))?;

    let meals_per_day = usize::from(args.meals_per_day.max(1));
    let calories_per_meal = target.calories / meals_per_day as f64;
    tracing::info!(
        "TDEE {:.0} kcal, {} at {} kcal/day, {:.0} kcal per meal",
        tdee,
        target.label,
        target.calories,
        calories_per_meal
    );

    let dataset = cache.get()?;
    let meal_plan = MealAssembler::new(DatasetRecommender::new(&dataset))
        .with_recipes_per_meal(config.recipes_per_meal)?
        .recommend_meals(calories_per_meal, meals_per_day)?;

    Ok(json!({
        "bmi": bmi,
        "bmi_status": bmi_status,
        "tdee": tdee.round_ties_even(),
        "plans": plans,
        "selected_plan": target,
        "macros": compute_macro_targets(target.calories),
        "meals": meal_plan,
    }))
}

fn run_custom(cache: &DatasetCache<CsvRecipeSource>, args: &CustomArgs) -> Result<serde_json::Value> {
    let dataset = cache.get()?;
    let recipes = custom_recommendations(&dataset, &args.request())?;
    Ok(json!({ "recipes": recipes }))
}

fn main() -> Result<()> {
    dotenv::dotenv().ok(); // Load .env for the dataset path

    let cli = parse_args();
    init_logging(cli.verbose);

    let mut config = EngineConfig::from_env()?;
    if let Some(path) = &cli.dataset {
        config = config.with_dataset_path(path);
    }
    tracing::debug!("Using recipe dataset at {}", config.dataset_path.display());

    let cache = DatasetCache::new(CsvRecipeSource::new(&config.dataset_path));
    let output = match &cli.command {
        Command::Plan(args) => run_plan(&cache, &config, args),
        Command::Custom(args) => run_custom(&cache, args),
    }
    .with_context(|| format!("Recommendation failed for dataset '{}'", config.dataset_path.display()))?;

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
