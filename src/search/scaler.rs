//! Per-column standardization of nutrient features.

use crate::errors::{RecommendError, Result};
use crate::recipe_record::{NutrientColumn, NutrientVector, RecipeRecord, NUTRIENT_COUNT};

/// Columns whose standard deviation falls below this are treated as constant.
const MIN_SCALE: f64 = 1e-12;

/// Whether a column's variance is indistinguishable from rounding noise in
/// its mean. The bound grows with the column magnitude, so a constant column
/// of large values is still recognised.
fn is_constant_column(variance: f64, mean: f64, n: f64) -> bool {
    let upper_bound = n * f64::EPSILON * variance + (n * mean.abs() * f64::EPSILON).powi(2);
    variance <= upper_bound
}

/// Mean and scale of each nutrient column, fitted on one candidate pool.
///
/// `z = (x - mean) / scale`, where `scale` is the population standard
/// deviation of the column, or `1.0` if the column is constant in the pool.
#[derive(Debug, Clone, PartialEq)]
pub struct FittedScaler {
    mean: [f64; NUTRIENT_COUNT],
    scale: [f64; NUTRIENT_COUNT],
}

impl FittedScaler {
    /// Fits the scaler on the given rows. Fails on an empty pool or a
    /// non-finite nutrient value.
    pub fn fit(rows: &[[f64; NUTRIENT_COUNT]]) -> Result<Self> {
        if rows.is_empty() {
            return Err(RecommendError::invalid_input("cannot fit scaler on zero recipes"));
        }
        for (row_idx, row) in rows.iter().enumerate() {
            if let Some(col) = row.iter().position(|v| !v.is_finite()) {
                return Err(RecommendError::invalid_input(format!(
                    "non-finite value in column '{}' of candidate row {}",
                    NutrientColumn::ALL[col].header(),
                    row_idx
                )));
            }
        }

        let n = rows.len() as f64;
        let mut mean = [0.0; NUTRIENT_COUNT];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        for m in mean.iter_mut() {
            *m /= n;
        }

        let mut scale = [0.0; NUTRIENT_COUNT];
        for row in rows {
            for (j, s) in scale.iter_mut().enumerate() {
                let diff = row[j] - mean[j];
                *s += diff * diff;
            }
        }
        for (j, s) in scale.iter_mut().enumerate() {
            let variance = *s / n;
            let std = variance.sqrt();
            *s = if std < MIN_SCALE || is_constant_column(variance, mean[j], n) {
                tracing::debug!(
                    "Column '{}' is constant in the candidate pool, using scale 1",
                    NutrientColumn::ALL[j].header()
                );
                1.0
            } else {
                std
            };
        }

        Ok(Self { mean, scale })
    }

    pub fn mean(&self) -> &[f64; NUTRIENT_COUNT] {
        &self.mean
    }

    pub fn scale(&self) -> &[f64; NUTRIENT_COUNT] {
        &self.scale
    }

    pub fn transform_row(&self, row: &[f64; NUTRIENT_COUNT]) -> [f64; NUTRIENT_COUNT] {
        let mut out = [0.0; NUTRIENT_COUNT];
        for j in 0..NUTRIENT_COUNT {
            out[j] = (row[j] - self.mean[j]) / self.scale[j];
        }
        out
    }

    pub fn transform(&self, rows: &[[f64; NUTRIENT_COUNT]]) -> Vec<[f64; NUTRIENT_COUNT]> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    pub fn transform_vector(&self, query: &NutrientVector) -> [f64; NUTRIENT_COUNT] {
        self.transform_row(&query.0)
    }
}

/// Pulls the nutrient columns out of the candidate pool, selecting each by name.
pub fn feature_matrix(recipes: &[&RecipeRecord]) -> Vec<[f64; NUTRIENT_COUNT]> {
    recipes
        .iter()
        .map(|recipe| NutrientColumn::ALL.map(|column| recipe.nutrients.get(column)))
        .collect()
}

/// Fits a scaler on the pool and returns the standardized matrix with it.
pub fn fit_transform(recipes: &[&RecipeRecord]) -> Result<(Vec<[f64; NUTRIENT_COUNT]>, FittedScaler)> {
    let raw = feature_matrix(recipes);
    let scaler = FittedScaler::fit(&raw)?;
    Ok((scaler.transform(&raw), scaler))
}
