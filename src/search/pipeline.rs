use crate::errors::{RecommendError, Result};
use crate::recipe_record::{NutrientVector, RecipeRecord};
use crate::search::ingredient_filter::filter_by_ingredients;
use crate::search::neighbor_index::{Neighbor, NeighborIndex};
use crate::search::scaler::{fit_transform, FittedScaler};

pub const DEFAULT_NEIGHBOR_COUNT: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendParams {
    pub neighbor_count: usize,
    pub return_distance: bool,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            neighbor_count: DEFAULT_NEIGHBOR_COUNT,
            return_distance: false,
        }
    }
}

/// Recipes nearest to the query, nearest first.
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub recipes: Vec<RecipeRecord>,
    /// Cosine distance of each recipe, present only when requested.
    pub distances: Option<Vec<f64>>,
}

/// Scaler and neighbor index fitted on one candidate pool. Queries go through
/// the fitted scaler before hitting the index.
pub struct RecommendationPipeline<'a> {
    pool: Vec<&'a RecipeRecord>,
    scaler: FittedScaler,
    index: NeighborIndex,
}

impl<'a> RecommendationPipeline<'a> {
    pub fn fit(pool: Vec<&'a RecipeRecord>) -> Result<Self> {
        let (scaled, scaler) = fit_transform(&pool)?;
        let index = NeighborIndex::fit(&scaled);
        Ok(Self { pool, scaler, index })
    }

    pub fn scaler(&self) -> &FittedScaler {
        &self.scaler
    }

    pub fn query(&self, query: &NutrientVector, k: usize) -> Result<Vec<(&'a RecipeRecord, Neighbor)>> {
        let scaled_query = self.scaler.transform_vector(query);
        let hits = self.index.query(&scaled_query, k)?;
        Ok(hits.into_iter().map(|hit| (self.pool[hit.index], hit)).collect())
    }
}

/// Finds the recipes whose nutrient profile is closest to `nutrient_vector`
/// among those containing every ingredient term.
///
/// Returns `Ok(None)` when fewer than `neighbor_count` recipes survive the
/// ingredient filter; a short list is never returned. A vector that is not
/// exactly nine finite values is an `InvalidInput` error.
pub fn recommend<S: AsRef<str>>(
    dataset: &[RecipeRecord],
    nutrient_vector: &[f64],
    ingredient_terms: &[S],
    params: &RecommendParams,
) -> Result<Option<Recommendation>> {
    let query = NutrientVector::from_slice(nutrient_vector)?;
    if params.neighbor_count == 0 {
        return Err(RecommendError::invalid_input("neighbor_count must be at least 1"));
    }

    let pool = filter_by_ingredients(dataset, ingredient_terms);
    if pool.len() < params.neighbor_count {
        tracing::debug!(
            "Only {} candidate recipes for {} requested neighbors, returning no recommendation",
            pool.len(),
            params.neighbor_count
        );
        return Ok(None);
    }
    tracing::debug!("Fitting pipeline on {} of {} recipes", pool.len(), dataset.len());

    let pipeline = RecommendationPipeline::fit(pool)?;
    let hits = pipeline.query(&query, params.neighbor_count)?;

    let distances = params
        .return_distance
        .then(|| hits.iter().map(|(_, hit)| hit.distance).collect());
    let recipes = hits.into_iter().map(|(recipe, _)| recipe.clone()).collect();

    Ok(Some(Recommendation { recipes, distances }))
}

/// Source of nearest-recipe recommendations for a nutrient target.
pub trait RecipeRecommender {
    fn recommend(&self, query: &NutrientVector, params: &RecommendParams) -> Result<Option<Recommendation>>;
}

/// `recommend` over an in-memory dataset with a fixed ingredient filter.
pub struct DatasetRecommender<'a> {
    dataset: &'a [RecipeRecord],
    ingredient_terms: Vec<String>,
}

impl<'a> DatasetRecommender<'a> {
    pub fn new(dataset: &'a [RecipeRecord]) -> Self {
        Self {
            dataset,
            ingredient_terms: Vec::new(),
        }
    }

    pub fn with_ingredients(mut self, terms: Vec<String>) -> Self {
        self.ingredient_terms = terms;
        self
    }
}

impl RecipeRecommender for DatasetRecommender<'_> {
    fn recommend(&self, query: &NutrientVector, params: &RecommendParams) -> Result<Option<Recommendation>> {
        recommend(self.dataset, query.as_slice(), &self.ingredient_terms, params)
    }
}
