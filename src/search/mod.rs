pub mod data_loader;
pub mod ingredient_filter;
pub mod neighbor_index;
pub mod pipeline;
pub mod scaler;

pub use data_loader::{load_recipe_dataset, CsvRecipeSource, DatasetCache, RecipeSource};
pub use ingredient_filter::{filter_by_ingredients, parse_ingredient_terms};
pub use neighbor_index::{Neighbor, NeighborIndex};
pub use pipeline::{
    recommend, DatasetRecommender, RecipeRecommender, RecommendParams, Recommendation, RecommendationPipeline,
};
pub use scaler::FittedScaler;
