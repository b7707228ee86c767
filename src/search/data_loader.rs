use anyhow::{Context, Result};
use csv::{ReaderBuilder, StringRecord};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use crate::errors::RecommendError;
use crate::recipe_record::{NutrientColumn, Nutrients, RecipeRecord, NUTRIENT_COUNT};

// Non-nutrient column headers
const ID_COL: &str = "RecipeId";
const NAME_COL: &str = "Name";
const COOK_TIME_COL: &str = "CookTime";
const PREP_TIME_COL: &str = "PrepTime";
const TOTAL_TIME_COL: &str = "TotalTime";
const INGREDIENTS_COL: &str = "RecipeIngredientParts";
const INSTRUCTIONS_COL: &str = "RecipeInstructions";
const IMAGES_COL: &str = "RecipeImages";

fn column_index(headers: &StringRecord, name: &str) -> Result<usize> {
    headers
        .iter()
        .position(|h| h.trim() == name)
        .ok_or_else(|| RecommendError::MissingColumn(name.to_string()).into())
}

fn cell(record: &StringRecord, idx: usize) -> String {
    record.get(idx).unwrap_or("").to_string()
}

fn parse_nutrient(raw: &str, row: usize, column: NutrientColumn) -> Result<f64, RecommendError> {
    let invalid = || RecommendError::InvalidNumber {
        row,
        column: column.header().to_string(),
        value: raw.to_string(),
    };
    let value = raw.trim().parse::<f64>().map_err(|_| invalid())?;
    if !value.is_finite() || value < 0.0 {
        return Err(invalid());
    }
    Ok(value)
}

/// Loads the recipe dataset from a CSV file. Columns are looked up by header,
/// so their order in the file does not matter.
pub fn load_recipe_dataset(csv_path: &Path) -> Result<Vec<RecipeRecord>> {
    if !csv_path.exists() {
        return Err(RecommendError::DatasetLoad {
            path: csv_path.display().to_string(),
            message: "file not found".to_string(),
        }
        .into());
    }

    let file = std::fs::File::open(csv_path)
        .with_context(|| format!("Failed to open recipe CSV file at {:?}", csv_path))?;
    let mut rdr = ReaderBuilder::new().has_headers(true).from_reader(file);

    let headers = rdr.headers()?.clone();

    let id_idx = column_index(&headers, ID_COL)?;
    let name_idx = column_index(&headers, NAME_COL)?;
    let cook_idx = column_index(&headers, COOK_TIME_COL)?;
    let prep_idx = column_index(&headers, PREP_TIME_COL)?;
    let total_idx = column_index(&headers, TOTAL_TIME_COL)?;
    let ingredients_idx = column_index(&headers, INGREDIENTS_COL)?;
    let instructions_idx = column_index(&headers, INSTRUCTIONS_COL)?;
    // Older exports have no image column at all.
    let images_idx = headers.iter().position(|h| h.trim() == IMAGES_COL);

    let mut nutrient_idx = [0usize; NUTRIENT_COUNT];
    for (slot, column) in nutrient_idx.iter_mut().zip(NutrientColumn::ALL) {
        *slot = column_index(&headers, column.header())?;
    }

    let mut recipes = Vec::new();
    for (row_index, result) in rdr.records().enumerate() {
        let record = result.with_context(|| format!("Failed to read record at row index {}", row_index))?;

        let raw_id = cell(&record, id_idx);
        let recipe_id = if raw_id.trim().is_empty() {
            None
        } else {
            let id = raw_id.trim().parse::<i64>().map_err(|_| RecommendError::InvalidNumber {
                row: row_index,
                column: ID_COL.to_string(),
                value: raw_id.clone(),
            })?;
            Some(id)
        };

        let mut nutrients = Nutrients::default();
        for (&idx, column) in nutrient_idx.iter().zip(NutrientColumn::ALL) {
            let value = parse_nutrient(record.get(idx).unwrap_or(""), row_index, column)?;
            nutrients.set(column, value);
        }

        let images = images_idx
            .map(|idx| cell(&record, idx))
            .filter(|raw| !raw.trim().is_empty());

        recipes.push(RecipeRecord {
            recipe_id,
            name: cell(&record, name_idx).trim().to_string(),
            cook_time: cell(&record, cook_idx),
            prep_time: cell(&record, prep_idx),
            total_time: cell(&record, total_idx),
            ingredient_parts: cell(&record, ingredients_idx),
            nutrients,
            instructions: cell(&record, instructions_idx),
            images,
        });
    }

    tracing::info!("Loaded {} recipes from {:?}", recipes.len(), csv_path);
    Ok(recipes)
}

/// Anything that can materialize the full recipe dataset.
pub trait RecipeSource: Send + Sync {
    fn load(&self) -> Result<Vec<RecipeRecord>>;
}

/// Reads the dataset from a CSV export.
#[derive(Debug, Clone)]
pub struct CsvRecipeSource {
    pub path: PathBuf,
}

impl CsvRecipeSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecipeSource for CsvRecipeSource {
    fn load(&self) -> Result<Vec<RecipeRecord>> {
        load_recipe_dataset(&self.path)
    }
}

impl RecipeSource for Vec<RecipeRecord> {
    fn load(&self) -> Result<Vec<RecipeRecord>> {
        Ok(self.clone())
    }
}

/// Load-once cache for the raw dataset. The owner decides its lifetime;
/// once loaded it is only invalidated by `reset`.
pub struct DatasetCache<S: RecipeSource> {
    source: S,
    cached: RwLock<Option<Arc<[RecipeRecord]>>>,
}

impl<S: RecipeSource> DatasetCache<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            cached: RwLock::new(None),
        }
    }

    /// Returns the cached dataset, loading it from the source on first use.
    pub fn get(&self) -> Result<Arc<[RecipeRecord]>> {
        // The slot only ever holds a complete dataset or nothing, so a
        // poisoned lock is recovered.
        {
            let guard = self.cached.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(dataset) = guard.as_ref() {
                return Ok(Arc::clone(dataset));
            }
        }

        let mut guard = self.cached.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have loaded it while we waited for the write lock.
        if let Some(dataset) = guard.as_ref() {
            return Ok(Arc::clone(dataset));
        }
        let dataset: Arc<[RecipeRecord]> = self
            .source
            .load()
            .context("Failed to load recipe dataset into cache")?
            .into();
        tracing::debug!("Dataset cache filled with {} recipes", dataset.len());
        *guard = Some(Arc::clone(&dataset));
        Ok(dataset)
    }

    pub fn is_loaded(&self) -> bool {
        self.cached.read().unwrap_or_else(PoisonError::into_inner).is_some()
    }

    /// Drops the cached dataset; the next `get` reloads from the source.
    pub fn reset(&self) {
        *self.cached.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}
